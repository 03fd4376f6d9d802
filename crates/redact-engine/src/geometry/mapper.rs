// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate mapper — converts between preview-canvas pixels and original-image
// pixels. The preview keeps the image aspect ratio, so one scale factor
// (`original_width / preview_width`) applies to both axes.
//
// Points stay real-valued through every conversion. Rounding to whole pixels
// happens once, when a candidate rectangle becomes a stored `Region`.

use redact_core::{OriginalPoint, PixelRect, PreviewPoint, PreviewRect, Region, Shape, Size};
use tracing::debug;

/// Preview point to original-image space.
pub fn to_original(point: PreviewPoint, scale: f64) -> OriginalPoint {
    OriginalPoint::new(point.x * scale, point.y * scale)
}

/// Original-image point to preview space.
pub fn to_preview(point: OriginalPoint, scale: f64) -> PreviewPoint {
    PreviewPoint::new(point.x / scale, point.y / scale)
}

/// The fitted preview canvas for one image inside one container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Native image size.
    pub original: Size,
    /// Size of the preview canvas.
    pub preview: Size,
    /// `original.width / preview.width`, always >= 1.
    pub scale: f64,
}

impl Viewport {
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.scale)
    }
}

/// Fit `original` into `container` without cropping or upscaling.
///
/// Returns `None` when either size is empty: there is no surface to draw on.
pub fn fit_viewport(original: Size, container: Size) -> Option<Viewport> {
    if original.is_empty() || container.is_empty() {
        return None;
    }

    let fit = (f64::from(original.width) / f64::from(container.width))
        .max(f64::from(original.height) / f64::from(container.height))
        .max(1.0);

    let preview_w = (f64::from(original.width) / fit).round().clamp(1.0, f64::from(original.width));
    let preview_h = (f64::from(original.height) / fit).round().clamp(1.0, f64::from(original.height));
    let preview = Size::new(preview_w as u32, preview_h as u32);

    // Re-derive the scale from the rounded canvas width so that it is exactly
    // original_width / preview_width.
    let scale = f64::from(original.width) / f64::from(preview.width);

    debug!(%original, %container, %preview, scale, "viewport fitted");
    Some(Viewport {
        original,
        preview,
        scale,
    })
}

/// Pure preview <-> original conversion for a fixed scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    scale: f64,
}

impl CoordinateMapper {
    /// Non-finite or non-positive scales fall back to 1.
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_original(&self, point: PreviewPoint) -> OriginalPoint {
        to_original(point, self.scale)
    }

    pub fn to_preview(&self, point: OriginalPoint) -> PreviewPoint {
        to_preview(point, self.scale)
    }

    /// Convert a preview-space candidate into a stored region.
    ///
    /// Edges are scaled, rounded to the nearest pixel, and clamped to
    /// `[0, bounds.width] x [0, bounds.height]`. A candidate that ends up with
    /// no area (for example one drawn entirely outside the image) yields
    /// `None`.
    pub fn candidate_to_region(
        &self,
        candidate: PreviewRect,
        bounds: Size,
        shape: Shape,
        block_size: u32,
    ) -> Option<Region> {
        let top_left = self.to_original(PreviewPoint::new(candidate.x, candidate.y));
        let bottom_right =
            self.to_original(PreviewPoint::new(candidate.right(), candidate.bottom()));

        let x0 = round_clamped(top_left.x, bounds.width);
        let y0 = round_clamped(top_left.y, bounds.height);
        let x1 = round_clamped(bottom_right.x, bounds.width);
        let y1 = round_clamped(bottom_right.y, bounds.height);

        let rect = PixelRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0));
        Region::new(rect, shape, block_size)
    }

    /// Integer preview rectangle covering a stored region.
    ///
    /// A region that is thinner than one preview pixel still gets one pixel
    /// so it stays visible. Returns `None` if nothing of it lies on the canvas.
    pub fn region_to_preview(&self, region: &Region, preview: Size) -> Option<PixelRect> {
        let top_left = self.to_preview(OriginalPoint::new(
            f64::from(region.x()),
            f64::from(region.y()),
        ));
        let bottom_right = self.to_preview(OriginalPoint::new(
            f64::from(region.rect().right()),
            f64::from(region.rect().bottom()),
        ));

        let x0 = round_clamped(top_left.x, preview.width);
        let y0 = round_clamped(top_left.y, preview.height);
        if x0 >= preview.width || y0 >= preview.height {
            return None;
        }
        let x1 = round_clamped(bottom_right.x, preview.width).max(x0 + 1);
        let y1 = round_clamped(bottom_right.y, preview.height).max(y0 + 1);

        Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Block size to use when rasterizing a region on the preview canvas.
    pub fn preview_block_size(&self, block_size: u32) -> u32 {
        let scaled = (f64::from(block_size) / self.scale).round();
        (scaled as u32).max(1)
    }

    /// Nearest integer preview rectangle for an outline stroke.
    pub fn outline_rect(candidate: PreviewRect, preview: Size) -> PixelRect {
        let x0 = round_clamped(candidate.x, preview.width);
        let y0 = round_clamped(candidate.y, preview.height);
        let x1 = round_clamped(candidate.right(), preview.width);
        let y1 = round_clamped(candidate.bottom(), preview.height);
        PixelRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

fn round_clamped(value: f64, max: u32) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(max)) as u32
}
