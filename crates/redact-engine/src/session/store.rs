// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region store — the ordered, undoable list of committed regions for one
// image. Commit order is undo order.

use std::sync::Arc;

use redact_core::Region;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    regions: Vec<Region>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, region: Region) {
        self.regions.push(region);
        debug!(region_count = self.regions.len(), "region committed");
    }

    /// Remove and return the most recently committed region.
    pub fn undo_last(&mut self) -> Option<Region> {
        let region = self.regions.pop();
        if region.is_some() {
            debug!(region_count = self.regions.len(), "region undone");
        }
        region
    }

    /// Remove every region, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.regions.len();
        self.regions.clear();
        removed
    }

    pub fn list(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Immutable copy of the current list for a render running elsewhere.
    /// Later edits to the store do not affect the snapshot.
    pub fn snapshot(&self) -> Arc<[Region]> {
        Arc::from(self.regions.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::{PixelRect, Shape};

    fn region(x: u32) -> Region {
        Region::new(PixelRect::new(x, 0, 10, 10), Shape::Square, 5).unwrap()
    }

    #[test]
    fn three_commits_two_undos_leaves_first() {
        let mut store = RegionStore::new();
        store.append(region(0));
        store.append(region(20));
        store.append(region(40));

        assert_eq!(store.undo_last(), Some(region(40)));
        assert_eq!(store.undo_last(), Some(region(20)));
        assert_eq!(store.list(), &[region(0)]);
    }

    #[test]
    fn undo_is_inverse_of_append() {
        let mut store = RegionStore::new();
        store.append(region(0));
        let before = store.list().to_vec();

        store.append(region(30));
        store.undo_last();
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut store = RegionStore::new();
        assert_eq!(store.undo_last(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_reports_removed_count() {
        let mut store = RegionStore::new();
        store.append(region(0));
        store.append(region(1));
        assert_eq!(store.clear(), 2);
        assert_eq!(store.clear(), 0);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut store = RegionStore::new();
        store.append(region(0));
        let snapshot = store.snapshot();

        store.append(region(50));
        store.clear();
        assert_eq!(&*snapshot, &[region(0)]);
    }
}
