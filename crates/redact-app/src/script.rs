// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit scripts — a JSON record of the input a user would produce in the
// editor, replayed against a session.
//
// ```json
// {
//   "container": { "width": 800, "height": 600 },
//   "steps": [
//     { "op": "shape", "shape": "circle" },
//     { "op": "block_size", "value": 12 },
//     { "op": "drag", "from": [40, 40], "to": [200, 120] },
//     { "op": "key", "chord": "ctrl+z" },
//     { "op": "pointer", "event": { "kind": "down", "x": 10, "y": 10 } },
//     { "op": "apply" }
//   ]
// }
// ```

use std::path::Path;

use redact_core::{RedactError, RenderProgress, Result, Shape, Size};
use redact_engine::{
    EditorCommand, FinalImage, ImageSession, KeyChord, Outcome, PointerEvent, PreviewSurface,
};
use redact_render::{RenderWorker, lock_session};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditScript {
    /// Size of the preview container the events were recorded in.
    pub container: Size,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// The container was resized.
    Resize { width: u32, height: u32 },
    Shape { shape: Shape },
    BlockSize { value: u32 },
    Pointer { event: PointerEvent },
    /// Shorthand for down at `from`, move to `to`, up at `to`.
    Drag { from: [f64; 2], to: [f64; 2] },
    Key { chord: String },
    Command { command: EditorCommand },
    Apply,
}

/// Counts of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    pub committed: usize,
    pub discarded: usize,
    pub renders: usize,
    /// Preview frames presented.
    pub frames: usize,
}

impl EditScript {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
            .map_err(|e| RedactError::Script(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(json: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(json)?;
        if script.container.is_empty() {
            return Err(RedactError::Script("container has no area".into()));
        }
        Ok(script)
    }
}

/// Replay `script` against the worker's session, redrawing the preview onto
/// `surface` after every event that changes it and running a final render
/// for every apply it reaches.
#[instrument(skip_all, fields(steps = script.steps.len()))]
pub async fn replay(
    script: &EditScript,
    worker: &RenderWorker,
    surface: &mut dyn PreviewSurface,
) -> Result<ReplayReport> {
    let session = worker.session();
    let mut preview = Preview { surface, frames: 0 };
    {
        let mut guard = lock_session(session)?;
        resize(&mut guard, script.container)?;
        preview.frame(&guard)?;
    }

    let mut report = ReplayReport::default();
    for (index, step) in script.steps.iter().enumerate() {
        let outcomes = {
            let mut guard = lock_session(session)?;
            apply_step(&mut guard, step, &mut preview)
                .map_err(|e| RedactError::Script(format!("step {index}: {e}")))?
        };
        report.steps += 1;

        for outcome in outcomes {
            match outcome {
                Outcome::Committed(_) => report.committed += 1,
                Outcome::Discarded => report.discarded += 1,
                Outcome::ApplyRequested => {
                    render(worker).await?;
                    report.renders += 1;
                }
                _ => {}
            }
        }
    }
    report.frames = preview.frames;

    info!(
        committed = report.committed,
        discarded = report.discarded,
        renders = report.renders,
        frames = report.frames,
        "edit script replayed"
    );
    Ok(report)
}

/// Repaints the preview as the session changes.
struct Preview<'a> {
    surface: &'a mut dyn PreviewSurface,
    frames: usize,
}

impl Preview<'_> {
    fn frame(&mut self, session: &ImageSession) -> Result<()> {
        session.redraw(&mut *self.surface)?;
        self.frames += 1;
        Ok(())
    }

    /// Redraw if `outcome` changed the candidate or the regions.
    fn after(&mut self, session: &ImageSession, outcome: Outcome) -> Result<Outcome> {
        if outcome.needs_redraw() {
            self.frame(session)?;
        }
        Ok(outcome)
    }
}

fn resize(session: &mut ImageSession, container: Size) -> Result<()> {
    session
        .resize_viewport(container)
        .map(|_| ())
        .ok_or_else(|| RedactError::SurfaceUnavailable(format!("container {container} has no area")))
}

fn apply_step(session: &mut ImageSession, step: &Step, preview: &mut Preview<'_>) -> Result<Vec<Outcome>> {
    let mut outcomes = Vec::new();
    match step {
        Step::Resize { width, height } => {
            resize(session, Size::new(*width, *height))?;
            preview.frame(session)?;
        }
        Step::Shape { shape } => session.set_shape(*shape),
        Step::BlockSize { value } => {
            let stored = session.set_block_size(*value);
            if stored != *value {
                debug!(requested = value, stored, "block size clamped");
            }
        }
        Step::Pointer { event } => {
            let outcome = session.handle_pointer(*event);
            outcomes.push(preview.after(session, outcome)?);
        }
        Step::Drag { from, to } => {
            for event in [
                PointerEvent::Down {
                    x: from[0],
                    y: from[1],
                },
                PointerEvent::Move { x: to[0], y: to[1] },
                PointerEvent::Up { x: to[0], y: to[1] },
            ] {
                let outcome = session.handle_pointer(event);
                outcomes.push(preview.after(session, outcome)?);
            }
        }
        Step::Key { chord } => {
            let chord: KeyChord = chord.parse()?;
            let outcome = session.handle_key(&chord);
            outcomes.push(preview.after(session, outcome)?);
        }
        Step::Command { command } => {
            let outcome = session.execute(*command);
            outcomes.push(preview.after(session, outcome)?);
        }
        Step::Apply => outcomes.push(session.execute(EditorCommand::Apply)),
    }
    Ok(outcomes)
}

/// Run one final render on the worker, logging progress as it arrives.
pub async fn render(worker: &RenderWorker) -> Result<FinalImage> {
    let handle = worker.start()?;
    let mut progress = handle.progress();
    let reporter = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let step: RenderProgress = *progress.borrow_and_update();
            debug!(
                completed = step.completed,
                total = step.total,
                percent = step.percent(),
                "render progress"
            );
        }
    });

    let result = handle.wait().await;
    reporter.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use redact_core::{ApplyPolicy, EditorConfig, PixelRect};
    use redact_engine::FrameBuffer;
    use redact_render::share;

    const SCRIPT: &str = r#"{
        "container": { "width": 100, "height": 100 },
        "steps": [
            { "op": "shape", "shape": "circle" },
            { "op": "block_size", "value": 50 },
            { "op": "drag", "from": [10, 10], "to": [30, 30] },
            { "op": "shape", "shape": "square" },
            { "op": "block_size", "value": 8 },
            { "op": "drag", "from": [40, 40], "to": [42, 42] },
            { "op": "drag", "from": [60, 60], "to": [90, 80] },
            { "op": "drag", "from": [0, 0], "to": [50, 50] },
            { "op": "key", "chord": "ctrl+z" },
            { "op": "pointer", "event": { "kind": "down", "x": 5, "y": 5 } },
            { "op": "pointer", "event": { "kind": "leave" } },
            { "op": "apply" }
        ]
    }"#;

    fn worker(width: u32, height: u32) -> RenderWorker {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 128, 255])
        });
        let session = ImageSession::new("script.png", image, EditorConfig::default()).unwrap();
        RenderWorker::new(share(session), ApplyPolicy::Reject)
    }

    #[tokio::test]
    async fn replays_edits_and_renders() {
        let script = EditScript::parse(SCRIPT).unwrap();
        let worker = worker(200, 200);

        let mut surface = FrameBuffer::new();

        let report = replay(&script, &worker, &mut surface).await.unwrap();
        // Initial frame, three per drag, then undo, the stray down and its leave.
        assert_eq!(
            report,
            ReplayReport {
                steps: 12,
                committed: 3,
                discarded: 1,
                renders: 1,
                frames: 16,
            }
        );
        assert_eq!(surface.presented(), 16);
        assert_eq!(surface.last_frame().unwrap().dimensions(), (100, 100));

        let session = lock_session(worker.session()).unwrap();
        let regions = session.regions();
        assert_eq!(regions.len(), 2);
        // 200x200 in a 100x100 container: scale 2, block size clamped to 30.
        assert_eq!(regions[0].rect(), PixelRect::new(20, 20, 40, 40));
        assert_eq!(regions[0].shape(), Shape::Circle);
        assert_eq!(regions[0].block_size(), 30);
        assert_eq!(regions[1].rect(), PixelRect::new(120, 120, 60, 40));
        assert_eq!(regions[1].block_size(), 8);
        assert!(session.is_final_current());
    }

    #[tokio::test]
    async fn bad_chord_reports_step() {
        let script = EditScript::parse(
            r#"{ "container": { "width": 50, "height": 50 },
                 "steps": [ { "op": "key", "chord": "ctrl+nope" } ] }"#,
        )
        .unwrap();
        let err = replay(&script, &worker(50, 50), &mut FrameBuffer::new())
            .await
            .unwrap_err();
        match err {
            RedactError::Script(msg) => assert!(msg.starts_with("step 0"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_container_is_rejected() {
        let err = EditScript::parse(r#"{ "container": { "width": 0, "height": 10 } }"#);
        assert!(matches!(err, Err(RedactError::Script(_))));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edits.json");
        std::fs::write(&path, SCRIPT).unwrap();
        let script = EditScript::load(&path).unwrap();
        assert_eq!(script.steps.len(), 12);
        assert_eq!(
            script.steps[2],
            Step::Drag {
                from: [10.0, 10.0],
                to: [30.0, 30.0]
            }
        );

        assert!(matches!(
            EditScript::load(dir.path().join("missing.json")),
            Err(RedactError::Io(_))
        ));
    }

    #[tokio::test]
    async fn render_without_edits_copies_original() {
        let worker = worker(32, 32);
        lock_session(worker.session())
            .unwrap()
            .resize_viewport(Size::new(32, 32));
        let image = render(&worker).await.unwrap();
        let session = lock_session(worker.session()).unwrap();
        assert_eq!(image.pixels(), session.original().as_ref());
        assert!(image.regions().is_empty());
    }
}
