// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editing sessions — region store, selection state machine, per-session key
// bindings, and the workspace that owns one session per loaded image.

pub mod bindings;
pub mod image_session;
pub mod selection;
pub mod store;
pub mod workspace;

pub use image_session::ImageSession;
pub use store::RegionStore;
pub use workspace::Workspace;
