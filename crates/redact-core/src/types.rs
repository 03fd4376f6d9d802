// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Redactwerk mosaic engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a loaded image session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rendered interior of a mosaic block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Every pixel of the block is flattened.
    #[default]
    Square,
    /// Only pixels inside the block's inscribed circle are flattened; the
    /// corners keep their colour, giving a dotted look.
    Circle,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Square => f.write_str("square"),
            Self::Circle => f.write_str("circle"),
        }
    }
}

/// What to do when "apply" is requested while a final render is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyPolicy {
    /// Fail the new request with `RedactError::RenderInFlight`.
    #[default]
    Reject,
    /// Wait for the running render, then render the region list as it is at
    /// that moment.
    Queue,
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A point on the preview canvas, in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewPoint {
    pub x: f64,
    pub y: f64,
}

impl PreviewPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in original-image pixel space. Still real-valued: rounding only
/// happens when a [`Region`] is stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OriginalPoint {
    pub x: f64,
    pub y: f64,
}

impl OriginalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in preview space, normalised so that `x,y` is the
/// top-left corner and the extent is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PreviewRect {
    /// Rectangle spanning two corners given in any order.
    pub fn from_corners(a: PreviewPoint, b: PreviewPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Integer pixel rectangle. `x + width` and `y + height` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Intersection with `[0, bounds.width] x [0, bounds.height]`.
    pub fn clamp_to(&self, bounds: Size) -> Self {
        let x0 = self.x.min(bounds.width);
        let y0 = self.y.min(bounds.height);
        let x1 = self.right().min(bounds.width);
        let y1 = self.bottom().min(bounds.height);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// A committed redaction area. Immutable once created.
///
/// Coordinates are in original-image pixels. The shape and block size are the
/// settings that were active when the region was committed; changing the
/// session settings later never touches an existing region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RegionRepr")]
pub struct Region {
    rect: PixelRect,
    shape: Shape,
    block_size: u32,
}

/// Wire form of [`Region`]; deserialisation goes through [`Region::new`].
#[derive(Deserialize)]
struct RegionRepr {
    rect: PixelRect,
    shape: Shape,
    block_size: u32,
}

impl TryFrom<RegionRepr> for Region {
    type Error = String;

    fn try_from(repr: RegionRepr) -> std::result::Result<Self, Self::Error> {
        Region::new(repr.rect, repr.shape, repr.block_size)
            .ok_or_else(|| {
                format!(
                    "region {}x{} has no area",
                    repr.rect.width, repr.rect.height
                )
            })
    }
}

impl Region {
    /// Build a region, returning `None` for a zero-area rectangle.
    /// `block_size` is coerced to at least 1.
    pub fn new(rect: PixelRect, shape: Shape, block_size: u32) -> Option<Self> {
        if rect.is_empty() {
            return None;
        }
        Some(Self {
            rect,
            shape,
            block_size: block_size.max(1),
        })
    }

    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn x(&self) -> u32 {
        self.rect.x
    }

    pub fn y(&self) -> u32 {
        self.rect.y
    }

    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }
}

/// Progress of a final render across the ordered region list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderProgress {
    /// Regions already rasterized.
    pub completed: usize,
    /// Regions in the snapshot being rendered.
    pub total: usize,
}

impl RenderProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Percentage complete (0–100). An empty region list counts as done.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.completed.min(self.total) * 100) / self.total;
        pct as u8
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

/// Display-only metadata about a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub name: String,
    pub original_size: Size,
    pub preview_size: Option<Size>,
    pub preview_scale: Option<f64>,
    pub shape: Shape,
    pub block_size: u32,
    pub region_count: usize,
    pub drawing: bool,
    /// Whether a final render exists and matches the current region list.
    pub final_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_rect_normalises_any_drag_direction() {
        let a = PreviewPoint::new(40.0, 10.0);
        let b = PreviewPoint::new(10.0, 30.0);
        let rect = PreviewRect::from_corners(a, b);
        assert_eq!(rect, PreviewRect::from_corners(b, a));
        assert_eq!((rect.x, rect.y), (10.0, 10.0));
        assert_eq!((rect.width, rect.height), (30.0, 20.0));
    }

    #[test]
    fn pixel_rect_clamps_to_bounds() {
        let rect = PixelRect::new(90, 95, 20, 20).clamp_to(Size::new(100, 100));
        assert_eq!(rect, PixelRect::new(90, 95, 10, 5));

        let outside = PixelRect::new(150, 10, 20, 20).clamp_to(Size::new(100, 100));
        assert!(outside.is_empty());
    }

    #[test]
    fn region_rejects_zero_area() {
        assert!(Region::new(PixelRect::new(1, 1, 0, 4), Shape::Square, 8).is_none());
        assert!(Region::new(PixelRect::new(1, 1, 4, 0), Shape::Square, 8).is_none());
    }

    #[test]
    fn region_coerces_block_size() {
        let region = Region::new(PixelRect::new(0, 0, 4, 4), Shape::Circle, 0).unwrap();
        assert_eq!(region.block_size(), 1);
        assert_eq!(region.shape(), Shape::Circle);
    }

    #[test]
    fn region_deserialises_through_new() {
        let region = Region::new(PixelRect::new(2, 3, 10, 20), Shape::Square, 6).unwrap();
        let json = serde_json::to_string(&region).unwrap();
        assert_eq!(serde_json::from_str::<Region>(&json).unwrap(), region);

        let empty = r#"{"rect":{"x":0,"y":0,"width":0,"height":5},"shape":"square","block_size":4}"#;
        let err = serde_json::from_str::<Region>(empty).unwrap_err();
        assert!(err.to_string().contains("no area"));

        let zero_block = r#"{"rect":{"x":0,"y":0,"width":4,"height":4},"shape":"circle","block_size":0}"#;
        let region: Region = serde_json::from_str(zero_block).unwrap();
        assert_eq!(region.block_size(), 1);
    }

    #[test]
    fn progress_percent() {
        assert_eq!(RenderProgress::new(0, 0).percent(), 100);
        assert_eq!(RenderProgress::new(1, 4).percent(), 25);
        assert_eq!(RenderProgress::new(4, 4).percent(), 100);
        assert!(!RenderProgress::new(3, 4).is_done());
    }

    #[test]
    fn shape_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Shape::Circle).unwrap(), "\"circle\"");
        let parsed: Shape = serde_json::from_str("\"square\"").unwrap();
        assert_eq!(parsed, Shape::Square);
    }
}
