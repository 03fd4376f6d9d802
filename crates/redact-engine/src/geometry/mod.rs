// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry module — preview/original coordinate conversion and viewport fitting.

pub mod mapper;

pub use mapper::{CoordinateMapper, Viewport, fit_viewport};
