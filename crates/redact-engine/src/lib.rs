// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// redact-engine — Interactive mosaic redaction for Redactwerk.
//
// Provides preview/original coordinate mapping, block-averaging mosaic
// rasterization (square and circular blocks), the per-image region list and
// selection state machine, and the compositor that renders both the live
// preview and the full-resolution output from the same pristine source.

pub mod compose;
pub mod geometry;
pub mod integrity;
pub mod raster;
pub mod session;

// Re-export the primary structs so callers can use `redact_engine::ImageSession` etc.
pub use compose::compositor::{CancelToken, Compositor, FinalImage, PreviewStyle, render_final};
pub use compose::surface::{FrameBuffer, PreviewSurface};
pub use geometry::mapper::{CoordinateMapper, Viewport, fit_viewport};
pub use integrity::{hash_pixels, verify_pixels};
pub use raster::rasterizer::{rasterize, rasterize_in_place};
pub use session::bindings::{EditorCommand, InputBindings, Key, KeyChord};
pub use session::image_session::{ImageSession, RenderSnapshot};
pub use session::selection::{Outcome, PointerEvent, SelectionMachine, SelectionState};
pub use session::store::RegionStore;
pub use session::workspace::Workspace;
