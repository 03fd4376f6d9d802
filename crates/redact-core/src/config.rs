// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{RedactError, Result};
use crate::types::{ApplyPolicy, Shape};

/// Dash pattern for outline strokes, in preview pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashPattern {
    pub on: u32,
    pub off: u32,
}

/// How a rectangle outline is stroked on the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Straight (non-premultiplied) RGBA colour.
    pub color: [u8; 4],
    /// `None` draws a solid line.
    pub dash: Option<DashPattern>,
}

/// Persistent editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shape used for new sessions.
    pub default_shape: Shape,
    /// Block size (original-resolution pixels) used for new sessions.
    pub default_block_size: u32,
    /// Smallest block size the controls allow.
    pub min_block_size: u32,
    /// Largest block size the controls allow.
    pub max_block_size: u32,
    /// Candidates narrower or shorter than this (preview pixels) are dropped.
    pub min_selection_px: f64,
    /// Outline of the rectangle being dragged.
    pub candidate_stroke: StrokeStyle,
    /// Outline drawn around committed regions, if any.
    pub committed_outline: Option<StrokeStyle>,
    /// Behaviour of "apply" while a final render is running.
    pub apply_policy: ApplyPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_shape: Shape::Square,
            default_block_size: 10,
            min_block_size: 3,
            max_block_size: 30,
            min_selection_px: 5.0,
            candidate_stroke: StrokeStyle {
                color: [255, 64, 64, 255],
                dash: Some(DashPattern { on: 6, off: 4 }),
            },
            committed_outline: None,
            apply_policy: ApplyPolicy::Reject,
        }
    }
}

impl EditorConfig {
    /// Check the settings are internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.min_block_size == 0 {
            return Err(RedactError::Config("min_block_size must be at least 1".into()));
        }
        if self.min_block_size > self.max_block_size {
            return Err(RedactError::Config(format!(
                "min_block_size {} exceeds max_block_size {}",
                self.min_block_size, self.max_block_size
            )));
        }
        if !self.min_selection_px.is_finite() || self.min_selection_px < 0.0 {
            return Err(RedactError::Config(
                "min_selection_px must be a non-negative number".into(),
            ));
        }
        if self.candidate_stroke.dash.is_some_and(|dash| dash.on == 0) {
            return Err(RedactError::Config("dash length must be at least 1".into()));
        }
        Ok(())
    }

    /// Clamp a requested block size into the allowed control range.
    pub fn clamp_block_size(&self, block_size: u32) -> u32 {
        let lo = self.min_block_size.max(1);
        let hi = self.max_block_size.max(lo);
        block_size.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clamp_block_size(1), 3);
        assert_eq!(config.clamp_block_size(100), 30);
        assert_eq!(config.clamp_block_size(12), 12);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = EditorConfig {
            min_block_size: 20,
            max_block_size: 10,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RedactError::Config(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "default_shape": "circle", "apply_policy": "queue" }"#)
                .unwrap();
        assert_eq!(config.default_shape, Shape::Circle);
        assert_eq!(config.apply_policy, ApplyPolicy::Queue);
        assert_eq!(config.default_block_size, 10);
    }

    #[test]
    fn json_round_trip() {
        let config = EditorConfig {
            committed_outline: Some(StrokeStyle {
                color: [0, 200, 255, 255],
                dash: None,
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
