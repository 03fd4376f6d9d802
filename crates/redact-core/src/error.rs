// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Redactwerk.

use thiserror::Error;

use crate::types::SessionId;

/// Top-level error type for all Redactwerk operations.
///
/// Geometry problems (tiny or off-image selections) never show up here: they
/// are recovered where they happen by discarding or clamping.
#[derive(Debug, Error)]
pub enum RedactError {
    // -- Session errors --
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("no image session with id {0}")]
    SessionNotFound(SessionId),

    #[error("pixel buffer mismatch: expected {expected}, got {actual}")]
    BufferMismatch { expected: String, actual: String },

    // -- Rendering errors --
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("render failed: {0}")]
    RenderFailed(String),

    #[error("a final render is already running for this image")]
    RenderInFlight,

    #[error("final render was cancelled")]
    RenderCancelled,

    #[error("service initialisation failed: {0}")]
    ServiceInit(String),

    // -- Host / collaborator errors --
    #[error("image codec error: {0}")]
    Image(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("edit script error: {0}")]
    Script(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RedactError>;
