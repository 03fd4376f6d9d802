// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compositing — live preview and full-resolution final render, plus the
// surface the preview is handed to.

pub mod compositor;
pub mod surface;

pub use compositor::{CancelToken, Compositor, FinalImage, PreviewStyle, render_final};
pub use surface::{FrameBuffer, PreviewSurface};
