// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectangle outlines for the preview: solid strokes for committed regions,
// dashed strokes for the candidate being dragged.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use redact_core::{DashPattern, PixelRect, Size, StrokeStyle};

/// Stroke the one-pixel outline of `rect` onto `canvas`.
///
/// The outline runs along the outermost pixels of the rectangle. Pixels
/// falling outside the canvas are skipped. Colours overwrite, they do not
/// blend.
pub fn stroke_rect(canvas: &mut RgbaImage, rect: PixelRect, style: &StrokeStyle) {
    let rect = rect.clamp_to(Size::new(canvas.width(), canvas.height()));
    if rect.is_empty() {
        return;
    }

    let color = Rgba(style.color);
    match style.dash {
        None => draw_hollow_rect_mut(
            canvas,
            Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height),
            color,
        ),
        Some(dash) => stroke_dashed(canvas, rect, dash, color),
    }
}

/// Walk the perimeter clockwise from the top-left corner, painting `on`
/// pixels then skipping `off` pixels. The pattern continues around corners.
fn stroke_dashed(canvas: &mut RgbaImage, rect: PixelRect, dash: DashPattern, color: Rgba<u8>) {
    let period = (dash.on + dash.off).max(1);
    let on = dash.on.max(1);

    let mut step = 0u32;
    for (x, y) in perimeter(rect) {
        if step % period < on {
            canvas.put_pixel(x, y, color);
        }
        step = step.wrapping_add(1);
    }
}

/// Perimeter pixels of a non-empty rectangle in clockwise order, each pixel
/// visited once.
fn perimeter(rect: PixelRect) -> Vec<(u32, u32)> {
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.right() - 1, rect.bottom() - 1);

    let mut points = Vec::with_capacity(2 * (rect.width + rect.height) as usize);
    points.extend((x0..=x1).map(|x| (x, y0)));
    if y1 > y0 {
        points.extend((y0 + 1..=y1).map(|y| (x1, y)));
        if x1 > x0 {
            points.extend((x0..x1).rev().map(|x| (x, y1)));
        }
        if x1 > x0 && y1 > y0 + 1 {
            points.extend((y0 + 1..y1).rev().map(|y| (x0, y)));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn solid_outline_leaves_interior() {
        let mut canvas = RgbaImage::from_pixel(10, 10, BLACK);
        let style = StrokeStyle {
            color: RED,
            dash: None,
        };
        stroke_rect(&mut canvas, PixelRect::new(2, 2, 5, 4), &style);

        assert_eq!(canvas.get_pixel(2, 2).0, RED);
        assert_eq!(canvas.get_pixel(6, 5).0, RED);
        assert_eq!(canvas.get_pixel(4, 3), &BLACK);
        assert_eq!(canvas.get_pixel(7, 2), &BLACK);
    }

    #[test]
    fn dashed_outline_has_gaps() {
        let mut canvas = RgbaImage::from_pixel(20, 20, BLACK);
        let style = StrokeStyle {
            color: RED,
            dash: Some(DashPattern { on: 2, off: 2 }),
        };
        stroke_rect(&mut canvas, PixelRect::new(0, 0, 10, 10), &style);

        assert_eq!(canvas.get_pixel(0, 0).0, RED);
        assert_eq!(canvas.get_pixel(1, 0).0, RED);
        assert_eq!(canvas.get_pixel(2, 0), &BLACK);
        assert_eq!(canvas.get_pixel(4, 0).0, RED);
    }

    #[test]
    fn perimeter_visits_each_pixel_once() {
        let points = perimeter(PixelRect::new(1, 1, 4, 3));
        assert_eq!(points.len(), 2 * 4 + 2 * 3 - 4);
        let mut sorted = points.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), points.len());
    }

    #[test]
    fn degenerate_rects_do_not_panic() {
        let mut canvas = RgbaImage::from_pixel(4, 4, BLACK);
        let style = StrokeStyle {
            color: RED,
            dash: Some(DashPattern { on: 1, off: 1 }),
        };
        stroke_rect(&mut canvas, PixelRect::new(1, 1, 1, 1), &style);
        stroke_rect(&mut canvas, PixelRect::new(0, 2, 4, 1), &style);
        stroke_rect(&mut canvas, PixelRect::new(3, 0, 1, 4), &style);
        stroke_rect(&mut canvas, PixelRect::new(9, 9, 3, 3), &style);
        assert_eq!(canvas.get_pixel(1, 1).0, RED);
    }
}
