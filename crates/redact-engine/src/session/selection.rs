// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Selection state machine — turns pointer and keyboard input into committed
// regions.
//
//   Idle --down--> Drawing --move--> Drawing
//   Drawing --up--> Idle        (commit, or discard if too small)
//   Drawing --leave/cancel--> Idle  (discard)
//   Idle --undo / clear--> Idle
//
// Events that do not apply to the current state are ignored.

use redact_core::{PreviewPoint, PreviewRect, Region, Shape, Size};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::mapper::CoordinateMapper;
use crate::session::bindings::EditorCommand;
use crate::session::store::RegionStore;

/// Pointer input in canvas-local preview pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// The pointer left the canvas.
    Leave,
}

impl PointerEvent {
    fn point(&self) -> Option<PreviewPoint> {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } | Self::Up { x, y } => {
                Some(PreviewPoint::new(x, y))
            }
            Self::Leave => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Drawing {
        anchor: PreviewPoint,
        candidate: PreviewRect,
    },
}

/// Settings captured into a region when a candidate is committed.
#[derive(Debug, Clone, Copy)]
pub struct CommitParams {
    pub mapper: CoordinateMapper,
    /// Original image size; regions are clamped to it.
    pub bounds: Size,
    pub shape: Shape,
    pub block_size: u32,
    /// Candidates narrower or shorter than this (preview px) are dropped.
    pub min_selection_px: f64,
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The event did not apply to the current state.
    Ignored,
    Started,
    Resized,
    /// Released below the size threshold or entirely off the image.
    Discarded,
    Committed(Region),
    Cancelled,
    Undone(Region),
    Cleared(usize),
    /// The caller should start a final render.
    ApplyRequested,
}

impl Outcome {
    /// Whether the preview must be repainted.
    pub fn needs_redraw(&self) -> bool {
        match self {
            Self::Ignored | Self::ApplyRequested => false,
            Self::Cleared(removed) => *removed > 0,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SelectionState::Drawing { .. })
    }

    /// The rectangle being dragged, if any.
    pub fn candidate(&self) -> Option<PreviewRect> {
        match self.state {
            SelectionState::Drawing { candidate, .. } => Some(candidate),
            SelectionState::Idle => None,
        }
    }

    pub fn pointer(
        &mut self,
        event: PointerEvent,
        store: &mut RegionStore,
        params: &CommitParams,
    ) -> Outcome {
        match (self.state, event) {
            (SelectionState::Idle, PointerEvent::Down { x, y }) => {
                let anchor = PreviewPoint::new(x, y);
                self.state = SelectionState::Drawing {
                    anchor,
                    candidate: PreviewRect::from_corners(anchor, anchor),
                };
                Outcome::Started
            }
            (SelectionState::Drawing { anchor, .. }, PointerEvent::Move { x, y }) => {
                self.state = SelectionState::Drawing {
                    anchor,
                    candidate: PreviewRect::from_corners(anchor, PreviewPoint::new(x, y)),
                };
                Outcome::Resized
            }
            (SelectionState::Drawing { anchor, .. }, PointerEvent::Up { .. }) => {
                self.state = SelectionState::Idle;
                let end = event.point().unwrap_or(anchor);
                commit(PreviewRect::from_corners(anchor, end), store, params)
            }
            (SelectionState::Drawing { .. }, PointerEvent::Leave) => {
                self.state = SelectionState::Idle;
                debug!("selection cancelled: pointer left canvas");
                Outcome::Cancelled
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn command(&mut self, command: EditorCommand, store: &mut RegionStore) -> Outcome {
        match (self.state, command) {
            (SelectionState::Drawing { .. }, EditorCommand::Cancel) => {
                self.state = SelectionState::Idle;
                Outcome::Cancelled
            }
            (SelectionState::Idle, EditorCommand::Undo) => {
                store.undo_last().map_or(Outcome::Ignored, Outcome::Undone)
            }
            (SelectionState::Idle, EditorCommand::ClearAll) => Outcome::Cleared(store.clear()),
            (SelectionState::Idle, EditorCommand::Apply) => Outcome::ApplyRequested,
            _ => Outcome::Ignored,
        }
    }

    /// Drop any in-progress drag without committing.
    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }
}

fn commit(candidate: PreviewRect, store: &mut RegionStore, params: &CommitParams) -> Outcome {
    if candidate.width < params.min_selection_px || candidate.height < params.min_selection_px {
        debug!(
            width = candidate.width,
            height = candidate.height,
            "selection below minimum size, discarded"
        );
        return Outcome::Discarded;
    }

    match params
        .mapper
        .candidate_to_region(candidate, params.bounds, params.shape, params.block_size)
    {
        Some(region) => {
            store.append(region);
            Outcome::Committed(region)
        }
        None => {
            debug!("selection outside image, discarded");
            Outcome::Discarded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::PixelRect;

    fn params(scale: f64) -> CommitParams {
        CommitParams {
            mapper: CoordinateMapper::new(scale),
            bounds: Size::new(200, 200),
            shape: Shape::Square,
            block_size: 10,
            min_selection_px: 5.0,
        }
    }

    fn drag(
        machine: &mut SelectionMachine,
        store: &mut RegionStore,
        params: &CommitParams,
        from: (f64, f64),
        to: (f64, f64),
    ) -> Outcome {
        machine.pointer(PointerEvent::Down { x: from.0, y: from.1 }, store, params);
        machine.pointer(PointerEvent::Move { x: to.0, y: to.1 }, store, params);
        machine.pointer(PointerEvent::Up { x: to.0, y: to.1 }, store, params)
    }

    #[test]
    fn tiny_drag_is_discarded() {
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let outcome = drag(&mut machine, &mut store, &params(1.0), (10.0, 10.0), (13.0, 13.0));

        assert_eq!(outcome, Outcome::Discarded);
        assert!(store.is_empty());
        assert_eq!(machine.state(), &SelectionState::Idle);
    }

    #[test]
    fn drag_commits_scaled_region() {
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let outcome = drag(&mut machine, &mut store, &params(2.0), (10.0, 20.0), (30.0, 50.0));

        let expected = Region::new(PixelRect::new(20, 40, 40, 60), Shape::Square, 10).unwrap();
        assert_eq!(outcome, Outcome::Committed(expected));
        assert_eq!(store.list(), &[expected]);
    }

    #[test]
    fn drag_direction_does_not_matter() {
        let p = params(1.0);
        let mut forward = RegionStore::new();
        let mut backward = RegionStore::new();
        drag(&mut SelectionMachine::new(), &mut forward, &p, (10.0, 10.0), (40.0, 30.0));
        drag(&mut SelectionMachine::new(), &mut backward, &p, (40.0, 30.0), (10.0, 10.0));
        assert_eq!(forward.list(), backward.list());
        assert_eq!(forward.list()[0].rect(), PixelRect::new(10, 10, 30, 20));
    }

    #[test]
    fn release_point_updates_candidate() {
        // No move events between down and up.
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let p = params(1.0);
        machine.pointer(PointerEvent::Down { x: 0.0, y: 0.0 }, &mut store, &p);
        let outcome = machine.pointer(PointerEvent::Up { x: 20.0, y: 20.0 }, &mut store, &p);
        assert!(matches!(outcome, Outcome::Committed(_)));
    }

    #[test]
    fn leave_cancels_without_commit() {
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let p = params(1.0);
        machine.pointer(PointerEvent::Down { x: 0.0, y: 0.0 }, &mut store, &p);
        machine.pointer(PointerEvent::Move { x: 50.0, y: 50.0 }, &mut store, &p);
        assert_eq!(
            machine.pointer(PointerEvent::Leave, &mut store, &p),
            Outcome::Cancelled
        );
        assert!(store.is_empty());

        // A later release is not a commit either.
        assert_eq!(
            machine.pointer(PointerEvent::Up { x: 50.0, y: 50.0 }, &mut store, &p),
            Outcome::Ignored
        );
    }

    #[test]
    fn escape_cancels_drag() {
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let p = params(1.0);
        machine.pointer(PointerEvent::Down { x: 0.0, y: 0.0 }, &mut store, &p);
        assert_eq!(
            machine.command(EditorCommand::Cancel, &mut store),
            Outcome::Cancelled
        );
        assert!(!machine.is_drawing());
        assert_eq!(
            machine.command(EditorCommand::Cancel, &mut store),
            Outcome::Ignored
        );
    }

    #[test]
    fn undo_ignored_while_drawing() {
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let p = params(1.0);
        drag(&mut machine, &mut store, &p, (0.0, 0.0), (20.0, 20.0));

        machine.pointer(PointerEvent::Down { x: 50.0, y: 50.0 }, &mut store, &p);
        assert_eq!(machine.command(EditorCommand::Undo, &mut store), Outcome::Ignored);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn undo_and_clear_from_idle() {
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let p = params(1.0);
        drag(&mut machine, &mut store, &p, (0.0, 0.0), (20.0, 20.0));
        drag(&mut machine, &mut store, &p, (30.0, 30.0), (60.0, 60.0));

        assert!(matches!(
            machine.command(EditorCommand::Undo, &mut store),
            Outcome::Undone(_)
        ));
        assert_eq!(
            machine.command(EditorCommand::ClearAll, &mut store),
            Outcome::Cleared(1)
        );
        assert_eq!(machine.command(EditorCommand::Undo, &mut store), Outcome::Ignored);
        assert!(!Outcome::Cleared(0).needs_redraw());
    }

    #[test]
    fn second_down_while_drawing_is_ignored() {
        let mut machine = SelectionMachine::new();
        let mut store = RegionStore::new();
        let p = params(1.0);
        machine.pointer(PointerEvent::Down { x: 5.0, y: 5.0 }, &mut store, &p);
        assert_eq!(
            machine.pointer(PointerEvent::Down { x: 90.0, y: 90.0 }, &mut store, &p),
            Outcome::Ignored
        );
        assert_eq!(
            machine.candidate(),
            Some(PreviewRect::from_corners(
                PreviewPoint::new(5.0, 5.0),
                PreviewPoint::new(5.0, 5.0)
            ))
        );
    }

    #[test]
    fn pointer_event_json_shape() {
        let event: PointerEvent = serde_json::from_str(r#"{"kind":"down","x":1.5,"y":2}"#).unwrap();
        assert_eq!(event, PointerEvent::Down { x: 1.5, y: 2.0 });
        let leave: PointerEvent = serde_json::from_str(r#"{"kind":"leave"}"#).unwrap();
        assert_eq!(leave, PointerEvent::Leave);
    }
}
