// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — mosaic block rasterization and outline strokes.

pub mod outline;
pub mod rasterizer;

pub use rasterizer::{rasterize, rasterize_in_place};
