// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region rasterizer — block-averaging mosaic with square or circular blocks.
//
// A region is tiled into `block_size x block_size` blocks starting at its
// top-left corner. The last row and column are clipped to the region, never
// padded. Every pixel the shape mask includes is replaced by the rounded mean
// of the included pixels of the *source* buffer. Pixels outside a circular
// mask keep the colour they already have in the destination.

use image::RgbaImage;
use redact_core::{PixelRect, RedactError, Result, Shape, Size};

/// Rasterize `rect` reading from `src` and writing into `dst`.
///
/// `src` and `dst` must have the same dimensions. The rectangle is clamped to
/// the buffer; an empty intersection is a no-op. `block_size` is in the same
/// pixel units as the buffers and is coerced to at least 1.
pub fn rasterize(
    src: &RgbaImage,
    dst: &mut RgbaImage,
    rect: PixelRect,
    shape: Shape,
    block_size: u32,
) -> Result<()> {
    if src.dimensions() != dst.dimensions() {
        return Err(RedactError::BufferMismatch {
            expected: format!("{}x{}", src.width(), src.height()),
            actual: format!("{}x{}", dst.width(), dst.height()),
        });
    }

    let width = src.width();
    let rect = rect.clamp_to(Size::new(src.width(), src.height()));
    if rect.is_empty() {
        return Ok(());
    }

    let src_raw = src.as_raw();
    let dst_raw: &mut [u8] = dst;
    for block in blocks(rect, block_size) {
        if let Some(mean) = block_mean(src_raw, width, &block, shape) {
            fill_block(dst_raw, width, &block, shape, mean);
        }
    }
    Ok(())
}

/// Rasterize `rect` in place.
///
/// Blocks never overlap, so each block reads its own untouched pixels before
/// writing them; the result equals `rasterize(copy, buf, ..)`.
pub fn rasterize_in_place(buf: &mut RgbaImage, rect: PixelRect, shape: Shape, block_size: u32) {
    let width = buf.width();
    let rect = rect.clamp_to(Size::new(buf.width(), buf.height()));
    if rect.is_empty() {
        return;
    }

    for block in blocks(rect, block_size) {
        let mean = block_mean(buf.as_raw(), width, &block, shape);
        if let Some(mean) = mean {
            fill_block(buf, width, &block, shape, mean);
        }
    }
}

/// One mosaic tile, clipped to its region.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Block {
    /// Pixels of the tile that lie inside the region.
    clip: PixelRect,
    /// Centre of the full (unclipped) tile.
    cx: f64,
    cy: f64,
    /// Radius of the inscribed circle, `block_size / 2`.
    radius: f64,
}

impl Block {
    fn includes(&self, shape: Shape, px: u32, py: u32) -> bool {
        match shape {
            Shape::Square => true,
            Shape::Circle => {
                let dx = f64::from(px) - self.cx;
                let dy = f64::from(py) - self.cy;
                dx * dx + dy * dy <= self.radius * self.radius
            }
        }
    }
}

fn blocks(rect: PixelRect, block_size: u32) -> impl Iterator<Item = Block> {
    let size = block_size.max(1);
    let half = f64::from(size) / 2.0;
    let (right, bottom) = (rect.right(), rect.bottom());

    (rect.y..bottom).step_by(size as usize).flat_map(move |by| {
        (rect.x..right).step_by(size as usize).map(move |bx| Block {
            clip: PixelRect::new(
                bx,
                by,
                size.min(right - bx),
                size.min(bottom - by),
            ),
            cx: f64::from(bx) + half,
            cy: f64::from(by) + half,
            radius: half,
        })
    })
}

fn pixel_index(width: u32, px: u32, py: u32) -> usize {
    (py as usize * width as usize + px as usize) * 4
}

/// Rounded mean colour of the included pixels, or `None` if the mask
/// excludes every pixel of the block.
fn block_mean(raw: &[u8], width: u32, block: &Block, shape: Shape) -> Option<[u8; 4]> {
    let mut sums = [0u64; 4];
    let mut count = 0u64;

    for py in block.clip.y..block.clip.bottom() {
        for px in block.clip.x..block.clip.right() {
            if !block.includes(shape, px, py) {
                continue;
            }
            let idx = pixel_index(width, px, py);
            for (sum, &channel) in sums.iter_mut().zip(&raw[idx..idx + 4]) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some(sums.map(|sum| ((sum + count / 2) / count) as u8))
}

fn fill_block(raw: &mut [u8], width: u32, block: &Block, shape: Shape, color: [u8; 4]) {
    for py in block.clip.y..block.clip.bottom() {
        for px in block.clip.x..block.clip.right() {
            if block.includes(shape, px, py) {
                let idx = pixel_index(width, px, py);
                raw[idx..idx + 4].copy_from_slice(&color);
            }
        }
    }
}
