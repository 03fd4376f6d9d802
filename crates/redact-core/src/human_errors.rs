// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the editor surface.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the host presents it.

use crate::error::RedactError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Safe to simply try again.
    Transient,
    /// The user must change something first (finish a render, pick a file).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether offering a "try again" button makes sense. The engine itself
    /// never retries.
    pub retriable: bool,
    /// Severity level (drives icon/colour in the host).
    pub severity: Severity,
}

/// Convert a `RedactError` into a `HumanError`.
pub fn humanize_error(err: &RedactError) -> HumanError {
    match err {
        RedactError::InvalidImage(_) | RedactError::Image(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a PNG or JPEG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RedactError::SessionNotFound(_) => HumanError {
            message: "That image is no longer open.".into(),
            suggestion: "Load the image again to keep editing it.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RedactError::BufferMismatch { .. } => HumanError {
            message: "The editor had an internal drawing problem.".into(),
            suggestion: "Try again. Your marked areas are unchanged.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RedactError::SurfaceUnavailable(_) => HumanError {
            message: "The preview can't be drawn right now.".into(),
            suggestion: "Make the editor window larger or reopen it. Your marked areas are unchanged.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RedactError::RenderFailed(detail) => {
            if detail.contains("memory") || detail.contains("allocate") {
                HumanError {
                    message: "This image is too large to finish right now.".into(),
                    suggestion: "Close other images or programs to free memory, then apply again.".into(),
                    retriable: true,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Applying the mosaic didn't work.".into(),
                    suggestion: format!("Your marked areas are unchanged, so you can apply again. ({detail})"),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        RedactError::RenderInFlight => HumanError {
            message: "The mosaic is still being applied.".into(),
            suggestion: "Wait for the current run to finish, then apply again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        RedactError::RenderCancelled => HumanError {
            message: "Applying the mosaic was stopped.".into(),
            suggestion: "Nothing was changed. Apply again whenever you're ready.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RedactError::ServiceInit(_) => HumanError {
            message: "The image engine couldn't start.".into(),
            suggestion: "Try again. If this keeps happening, restart the program.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RedactError::Config(_) => HumanError {
            message: "The editor settings aren't valid.".into(),
            suggestion: "Check the block size limits in the settings file, or delete it to use the defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RedactError::Script(_) => HumanError {
            message: "The list of edits couldn't be read.".into(),
            suggestion: "Check the edit script for typos and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RedactError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The program doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick a different folder.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        RedactError::Serialization(_) => HumanError {
            message: "The program had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
