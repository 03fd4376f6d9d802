// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lazily initialised shared service.
//
// Expensive engines (codecs and the like) are built on first use. Concurrent
// callers all await the same initialisation; a failed initialisation leaves
// the slot empty so a later call can try again.

use std::future::Future;

use redact_core::Result;
use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug)]
pub struct LazyService<T> {
    name: &'static str,
    cell: OnceCell<T>,
}

impl<T> LazyService<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Return the service, running `init` if nobody has succeeded yet.
    pub async fn initialize<F, Fut>(&self, init: F) -> Result<&T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.cell
            .get_or_try_init(|| async {
                info!(service = self.name, "initialising service");
                let result = init().await;
                match &result {
                    Ok(_) => info!(service = self.name, "service ready"),
                    Err(e) => warn!(service = self.name, error = %e, "service initialisation failed"),
                }
                result
            })
            .await
    }

    /// The service, if it has been initialised.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
