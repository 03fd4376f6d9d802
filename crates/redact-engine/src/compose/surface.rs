// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview surface abstraction.
//
// The host owns whatever actually shows pixels (a window, a canvas element, a
// terminal). The engine only hands it finished frames.

use image::RgbaImage;
use redact_core::Result;

/// Consumer of rendered preview frames.
pub trait PreviewSurface {
    /// Show `frame`. Returns `RedactError::SurfaceUnavailable` if the surface
    /// cannot be acquired; the caller may retry with a fresh surface.
    fn present(&mut self, frame: &RgbaImage) -> Result<()>;
}

/// In-memory surface that keeps the most recent frame.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    last: Option<RgbaImage>,
    presented: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently presented frame.
    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.last.as_ref()
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl PreviewSurface for FrameBuffer {
    fn present(&mut self, frame: &RgbaImage) -> Result<()> {
        match self.last.as_mut() {
            Some(last) if last.dimensions() == frame.dimensions() => {
                last.copy_from_slice(frame.as_raw());
            }
            _ => self.last = Some(frame.clone()),
        }
        self.presented += 1;
        Ok(())
    }
}
