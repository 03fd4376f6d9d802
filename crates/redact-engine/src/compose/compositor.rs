// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compositor — renders the live preview and the full-resolution output.
//
// Both paths start from a pristine buffer and rasterize every region reading
// from that pristine buffer, never from pixels an earlier region already
// redacted. Rendering the same regions twice therefore yields identical
// bytes, and repeated redraws never compound.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use redact_core::{PreviewRect, RedactError, Region, RenderProgress, Result, StrokeStyle};
use tracing::{debug, info, instrument};

use crate::geometry::mapper::{CoordinateMapper, Viewport};
use crate::integrity::hash_pixels;
use crate::raster::outline::stroke_rect;
use crate::raster::rasterizer::rasterize;

/// Shared cancellation flag for a final render.
///
/// Cloning shares the flag. Cancellation is checked between regions.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Output of a final render.
#[derive(Debug, Clone)]
pub struct FinalImage {
    pixels: RgbaImage,
    regions: Arc<[Region]>,
    digest: String,
    rendered_at: DateTime<Utc>,
}

impl FinalImage {
    pub fn new(pixels: RgbaImage, regions: Arc<[Region]>) -> Self {
        let digest = hash_pixels(&pixels);
        Self {
            pixels,
            regions,
            digest,
            rendered_at: Utc::now(),
        }
    }

    /// The redacted full-resolution pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// The region list this output was rendered from.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// SHA-256 of the dimensions and pixel bytes, lowercase hex.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn rendered_at(&self) -> DateTime<Utc> {
        self.rendered_at
    }
}

/// Outline styles used by the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewStyle {
    pub candidate: StrokeStyle,
    pub committed: Option<StrokeStyle>,
}

/// The scaled-down pristine image for one viewport.
#[derive(Debug, Clone)]
struct PreviewBase {
    viewport: Viewport,
    pixels: RgbaImage,
}

/// Renders preview frames and final output for a single image.
#[derive(Debug, Clone)]
pub struct Compositor {
    original: Arc<RgbaImage>,
    preview: Option<PreviewBase>,
}

impl Compositor {
    pub fn new(original: Arc<RgbaImage>) -> Self {
        Self {
            original,
            preview: None,
        }
    }

    pub fn original(&self) -> &Arc<RgbaImage> {
        &self.original
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.preview.as_ref().map(|base| &base.viewport)
    }

    /// Rebuild the pristine preview base for a new viewport.
    ///
    /// Skipped when the preview size is unchanged.
    #[instrument(skip(self), fields(preview = %viewport.preview, scale = viewport.scale))]
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self
            .preview
            .as_ref()
            .is_some_and(|base| base.viewport.preview == viewport.preview)
        {
            return;
        }

        let pixels = if viewport.preview.width == self.original.width()
            && viewport.preview.height == self.original.height()
        {
            self.original.as_ref().clone()
        } else {
            imageops::resize(
                self.original.as_ref(),
                viewport.preview.width,
                viewport.preview.height,
                FilterType::Triangle,
            )
        };
        debug!("preview base rebuilt");
        self.preview = Some(PreviewBase { viewport, pixels });
    }

    /// Drop the preview base (the surface went away).
    pub fn clear_viewport(&mut self) {
        self.preview = None;
    }

    /// Render one preview frame.
    ///
    /// Committed regions are rasterized at preview scale with
    /// `block_size / scale` (at least 1); the candidate, if any, only gets an
    /// outline.
    pub fn render_preview(
        &self,
        regions: &[Region],
        candidate: Option<PreviewRect>,
        style: &PreviewStyle,
    ) -> Result<RgbaImage> {
        let base = self.preview.as_ref().ok_or_else(|| {
            RedactError::SurfaceUnavailable("no preview viewport has been set".into())
        })?;
        let mapper = base.viewport.mapper();
        let preview_size = base.viewport.preview;

        let mut frame = base.pixels.clone();
        for region in regions {
            if let Some(rect) = mapper.region_to_preview(region, preview_size) {
                let block = mapper.preview_block_size(region.block_size());
                rasterize(&base.pixels, &mut frame, rect, region.shape(), block)?;
            }
        }

        if let Some(outline) = style.committed {
            for region in regions {
                if let Some(rect) = mapper.region_to_preview(region, preview_size) {
                    stroke_rect(&mut frame, rect, &outline);
                }
            }
        }

        if let Some(candidate) = candidate {
            let rect = CoordinateMapper::outline_rect(candidate, preview_size);
            stroke_rect(&mut frame, rect, &style.candidate);
        }

        Ok(frame)
    }

    /// Full-resolution render of `regions` from the pristine original.
    pub fn render_final(
        &self,
        regions: &[Region],
        progress: &mut dyn FnMut(RenderProgress),
        cancel: &CancelToken,
    ) -> Result<RgbaImage> {
        render_final(&self.original, regions, progress, cancel)
    }
}

/// Full-resolution render of `regions` over a fresh copy of `original`.
///
/// Each region is rasterized with its own stored shape and block size,
/// reading from `original`. Progress is reported once before the first region
/// and after every region. Cancellation is honoured between regions.
#[instrument(skip_all, fields(width = original.width(), height = original.height(), region_count = regions.len()))]
pub fn render_final(
    original: &RgbaImage,
    regions: &[Region],
    progress: &mut dyn FnMut(RenderProgress),
    cancel: &CancelToken,
) -> Result<RgbaImage> {
    let total = regions.len();
    progress(RenderProgress::new(0, total));

    let mut output = try_copy(original)?;
    for (index, region) in regions.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(completed = index, total, "final render cancelled");
            return Err(RedactError::RenderCancelled);
        }
        rasterize(
            original,
            &mut output,
            region.rect(),
            region.shape(),
            region.block_size(),
        )?;
        progress(RenderProgress::new(index + 1, total));
    }

    info!("final render complete");
    Ok(output)
}

/// Copy a buffer, reporting allocation failure instead of aborting.
fn try_copy(original: &RgbaImage) -> Result<RgbaImage> {
    let (width, height) = original.dimensions();
    let raw = original.as_raw();

    let mut data = Vec::new();
    data.try_reserve_exact(raw.len()).map_err(|err| {
        RedactError::RenderFailed(format!(
            "cannot allocate {width}x{height} output buffer: {err}"
        ))
    })?;
    data.extend_from_slice(raw);

    RgbaImage::from_raw(width, height, data).ok_or_else(|| RedactError::BufferMismatch {
        expected: format!("{} bytes", width as usize * height as usize * 4),
        actual: format!("{} bytes", raw.len()),
    })
}
