// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image session — everything the editor knows about one loaded image.
//
// The session owns the pristine original, the committed regions, the
// selection state, its own key bindings, and the most recent final render.
// The host dispatches input events and hands the session a surface to draw on.

use std::sync::Arc;

use image::RgbaImage;
use redact_core::{
    EditorConfig, RedactError, Region, RenderProgress, Result, SessionId, SessionSummary, Shape,
    Size,
};
use tracing::{debug, info, instrument, warn};

use crate::compose::compositor::{CancelToken, Compositor, FinalImage, PreviewStyle, render_final};
use crate::compose::surface::PreviewSurface;
use crate::geometry::mapper::{CoordinateMapper, Viewport, fit_viewport};
use crate::session::bindings::{EditorCommand, InputBindings, KeyChord};
use crate::session::selection::{CommitParams, Outcome, PointerEvent, SelectionMachine};
use crate::session::store::RegionStore;

/// Immutable inputs for a final render running away from the session.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub session_id: SessionId,
    pub original: Arc<RgbaImage>,
    pub regions: Arc<[Region]>,
}

impl RenderSnapshot {
    /// Full-resolution render of the snapshot.
    pub fn render(
        &self,
        progress: &mut dyn FnMut(RenderProgress),
        cancel: &CancelToken,
    ) -> Result<FinalImage> {
        let pixels = render_final(&self.original, &self.regions, progress, cancel)?;
        Ok(FinalImage::new(pixels, Arc::clone(&self.regions)))
    }
}

pub struct ImageSession {
    id: SessionId,
    name: String,
    config: EditorConfig,
    original: Arc<RgbaImage>,
    compositor: Compositor,
    store: RegionStore,
    selection: SelectionMachine,
    bindings: InputBindings,
    shape: Shape,
    block_size: u32,
    final_image: Option<FinalImage>,
}

impl std::fmt::Debug for ImageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSession")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size())
            .field("regions", &self.store.len())
            .field("shape", &self.shape)
            .field("block_size", &self.block_size)
            .finish_non_exhaustive()
    }
}

impl ImageSession {
    /// Create a session for a decoded image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn new(name: impl Into<String>, image: RgbaImage, config: EditorConfig) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RedactError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }

        let original = Arc::new(image);
        let block_size = config.clamp_block_size(config.default_block_size);
        let session = Self {
            id: SessionId::new(),
            name: name.into(),
            shape: config.default_shape,
            block_size,
            compositor: Compositor::new(Arc::clone(&original)),
            original,
            store: RegionStore::new(),
            selection: SelectionMachine::new(),
            bindings: InputBindings::default(),
            final_image: None,
            config,
        };
        info!(id = %session.id, name = %session.name, "image session created");
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn original(&self) -> &Arc<RgbaImage> {
        &self.original
    }

    pub fn size(&self) -> Size {
        Size::new(self.original.width(), self.original.height())
    }

    // -- Viewport ---------------------------------------------------------

    /// Fit the preview into a container of the given size.
    ///
    /// A zero-sized container leaves the session without a surface: preview
    /// rendering then fails with `SurfaceUnavailable` until the next resize.
    /// A drag in progress is cancelled when the scale changes.
    pub fn resize_viewport(&mut self, container: Size) -> Option<Viewport> {
        let Some(viewport) = fit_viewport(self.size(), container) else {
            warn!(%container, "container has no area, preview surface unavailable");
            self.selection.reset();
            self.compositor.clear_viewport();
            return None;
        };

        if self.compositor.viewport().map(|vp| vp.scale) != Some(viewport.scale) {
            self.selection.reset();
        }
        self.compositor.set_viewport(viewport);
        Some(viewport)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.compositor.viewport()
    }

    // -- Settings ---------------------------------------------------------

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Shape for future commits. Existing regions keep their own.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Block size for future commits, clamped to the configured bounds.
    /// Returns the value actually stored.
    pub fn set_block_size(&mut self, block_size: u32) -> u32 {
        self.block_size = self.config.clamp_block_size(block_size);
        self.block_size
    }

    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut InputBindings {
        &mut self.bindings
    }

    // -- Editing ----------------------------------------------------------

    pub fn regions(&self) -> &[Region] {
        self.store.list()
    }

    pub fn is_drawing(&self) -> bool {
        self.selection.is_drawing()
    }

    /// Feed a pointer event. Without a viewport there is no canvas to point
    /// at, so every event is ignored.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Outcome {
        let Some(viewport) = self.compositor.viewport() else {
            return Outcome::Ignored;
        };
        let params = CommitParams {
            mapper: viewport.mapper(),
            bounds: self.size(),
            shape: self.shape,
            block_size: self.block_size,
            min_selection_px: self.config.min_selection_px,
        };
        let outcome = self.selection.pointer(event, &mut self.store, &params);
        if let Outcome::Committed(region) = outcome {
            info!(
                x = region.x(),
                y = region.y(),
                width = region.width(),
                height = region.height(),
                shape = %region.shape(),
                block_size = region.block_size(),
                region_count = self.store.len(),
                "region committed"
            );
        }
        outcome
    }

    /// Resolve a key chord through this session's bindings and run it.
    pub fn handle_key(&mut self, chord: &KeyChord) -> Outcome {
        match self.bindings.resolve(chord) {
            Some(command) => self.execute(command),
            None => Outcome::Ignored,
        }
    }

    pub fn execute(&mut self, command: EditorCommand) -> Outcome {
        let outcome = self.selection.command(command, &mut self.store);
        debug!(?command, ?outcome, region_count = self.store.len(), "command executed");
        outcome
    }

    // -- Rendering --------------------------------------------------------

    fn preview_style(&self) -> PreviewStyle {
        PreviewStyle {
            candidate: self.config.candidate_stroke,
            committed: self.config.committed_outline,
        }
    }

    /// Render the current preview frame.
    pub fn render_preview(&self) -> Result<RgbaImage> {
        self.compositor.render_preview(
            self.store.list(),
            self.selection.candidate(),
            &self.preview_style(),
        )
    }

    /// Render the preview and hand it to `surface`.
    pub fn redraw(&self, surface: &mut dyn PreviewSurface) -> Result<()> {
        let frame = self.render_preview()?;
        surface.present(&frame)
    }

    /// Immutable inputs for an off-thread final render.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            session_id: self.id,
            original: Arc::clone(&self.original),
            regions: self.store.snapshot(),
        }
    }

    /// Render the full-resolution output on the calling thread and keep it.
    #[instrument(skip_all, fields(id = %self.id, region_count = self.store.len()))]
    pub fn apply(
        &mut self,
        progress: &mut dyn FnMut(RenderProgress),
        cancel: &CancelToken,
    ) -> Result<&FinalImage> {
        let image = self.snapshot().render(progress, cancel)?;
        Ok(self.store_final(image))
    }

    /// Keep a final render produced elsewhere. Replaces any earlier one.
    pub fn store_final(&mut self, image: FinalImage) -> &FinalImage {
        info!(id = %self.id, digest = image.digest(), "final image stored");
        self.final_image.insert(image)
    }

    pub fn final_image(&self) -> Option<&FinalImage> {
        self.final_image.as_ref()
    }

    pub fn take_final(&mut self) -> Option<FinalImage> {
        self.final_image.take()
    }

    /// Whether the stored final image was rendered from the current regions.
    pub fn is_final_current(&self) -> bool {
        self.final_image
            .as_ref()
            .is_some_and(|image| image.regions() == self.store.list())
    }

    pub fn summary(&self) -> SessionSummary {
        let viewport = self.compositor.viewport();
        SessionSummary {
            id: self.id,
            name: self.name.clone(),
            original_size: self.size(),
            preview_size: viewport.map(|vp| vp.preview),
            preview_scale: viewport.map(|vp| vp.scale),
            shape: self.shape,
            block_size: self.block_size,
            region_count: self.store.len(),
            drawing: self.selection.is_drawing(),
            final_current: self.is_final_current(),
        }
    }

    /// Mapper for the current viewport, if any.
    pub fn mapper(&self) -> Option<CoordinateMapper> {
        self.compositor.viewport().map(Viewport::mapper)
    }
}
