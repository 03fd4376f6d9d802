// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redactwerk Render — runs the full-resolution final render off the editing
// thread, one render per image at a time, and provides the lazily
// initialised service wrapper used for shared engines.

pub mod lazy;
pub mod worker;

pub use lazy::LazyService;
pub use worker::{ApplyHandle, RenderWorker, SharedSession, lock_session, share};
