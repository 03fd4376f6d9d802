// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workspace — every loaded image and which one the user is editing.

use image::RgbaImage;
use redact_core::{EditorConfig, RedactError, Result, SessionId, SessionSummary};
use tracing::{info, instrument};

use crate::session::bindings::{EditorCommand, KeyChord};
use crate::session::image_session::ImageSession;
use crate::session::selection::Outcome;

#[derive(Debug, Default)]
pub struct Workspace {
    config: EditorConfig,
    sessions: Vec<ImageSession>,
    active: Option<SessionId>,
}

impl Workspace {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            sessions: Vec::new(),
            active: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Load an image into a new session. The first session becomes active.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn add(&mut self, name: &str, image: RgbaImage) -> Result<SessionId> {
        let session = ImageSession::new(name, image, self.config.clone())?;
        let id = session.id();
        self.sessions.push(session);
        if self.active.is_none() {
            self.active = Some(id);
        }
        info!(%id, session_count = self.sessions.len(), "image added to workspace");
        Ok(id)
    }

    /// Drop a session and everything derived from it.
    pub fn remove(&mut self, id: SessionId) -> Result<ImageSession> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id() == id)
            .ok_or(RedactError::SessionNotFound(id))?;
        let session = self.sessions.remove(index);
        if self.active == Some(id) {
            self.active = self.sessions.first().map(ImageSession::id);
        }
        info!(%id, session_count = self.sessions.len(), "image removed from workspace");
        Ok(session)
    }

    pub fn get(&self, id: SessionId) -> Result<&ImageSession> {
        self.sessions
            .iter()
            .find(|s| s.id() == id)
            .ok_or(RedactError::SessionNotFound(id))
    }

    pub fn get_mut(&mut self, id: SessionId) -> Result<&mut ImageSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(RedactError::SessionNotFound(id))
    }

    /// Switch editing to another session. A drag in progress on the
    /// previously active session is cancelled.
    pub fn set_active(&mut self, id: SessionId) -> Result<()> {
        self.get(id)?;
        if let Some(previous) = self.active.filter(|prev| *prev != id) {
            if let Ok(session) = self.get_mut(previous) {
                session.execute(EditorCommand::Cancel);
            }
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active(&self) -> Option<&ImageSession> {
        self.active.and_then(|id| self.get(id).ok())
    }

    pub fn active_mut(&mut self) -> Option<&mut ImageSession> {
        let id = self.active?;
        self.get_mut(id).ok()
    }

    /// Deliver a key press to the active session only.
    pub fn dispatch_key(&mut self, chord: &KeyChord) -> Outcome {
        match self.active_mut() {
            Some(session) => session.handle_key(chord),
            None => Outcome::Ignored,
        }
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions.iter().map(ImageSession::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::bindings::Key;
    use crate::session::selection::PointerEvent;
    use image::Rgba;
    use redact_core::Size;

    fn image() -> RgbaImage {
        RgbaImage::from_pixel(100, 100, Rgba([10, 20, 30, 255]))
    }

    fn commit_region(session: &mut ImageSession) {
        session.resize_viewport(Size::new(100, 100));
        session.handle_pointer(PointerEvent::Down { x: 0.0, y: 0.0 });
        session.handle_pointer(PointerEvent::Up { x: 20.0, y: 20.0 });
    }

    #[test]
    fn first_image_becomes_active() {
        let mut ws = Workspace::default();
        let a = ws.add("a.png", image()).unwrap();
        let _b = ws.add("b.png", image()).unwrap();
        assert_eq!(ws.active_id(), Some(a));
        assert_eq!(ws.len(), 2);
    }

    #[test]
    fn undo_only_reaches_active_session() {
        let mut ws = Workspace::default();
        let a = ws.add("a.png", image()).unwrap();
        let b = ws.add("b.png", image()).unwrap();
        commit_region(ws.get_mut(a).unwrap());
        commit_region(ws.get_mut(b).unwrap());

        ws.set_active(b).unwrap();
        let outcome = ws.dispatch_key(&KeyChord::new(Key::Char('z')).ctrl());
        assert!(matches!(outcome, Outcome::Undone(_)));

        assert_eq!(ws.get(a).unwrap().regions().len(), 1);
        assert!(ws.get(b).unwrap().regions().is_empty());
    }

    #[test]
    fn rebinding_is_per_session() {
        let mut ws = Workspace::default();
        let a = ws.add("a.png", image()).unwrap();
        let b = ws.add("b.png", image()).unwrap();
        let chord = KeyChord::new(Key::Backspace);
        ws.get_mut(a).unwrap().bindings_mut().bind(chord, EditorCommand::ClearAll);

        assert!(ws.get(b).unwrap().bindings().resolve(&chord).is_none());
    }

    #[test]
    fn switching_cancels_drag_on_previous() {
        let mut ws = Workspace::default();
        let a = ws.add("a.png", image()).unwrap();
        let b = ws.add("b.png", image()).unwrap();
        {
            let session = ws.get_mut(a).unwrap();
            session.resize_viewport(Size::new(100, 100));
            session.handle_pointer(PointerEvent::Down { x: 0.0, y: 0.0 });
            assert!(session.is_drawing());
        }
        ws.set_active(b).unwrap();
        assert!(!ws.get(a).unwrap().is_drawing());
    }

    #[test]
    fn removing_drops_session_and_moves_focus() {
        let mut ws = Workspace::default();
        let a = ws.add("a.png", image()).unwrap();
        let b = ws.add("b.png", image()).unwrap();

        let removed = ws.remove(a).unwrap();
        assert_eq!(removed.id(), a);
        assert_eq!(ws.active_id(), Some(b));
        assert!(matches!(ws.get(a), Err(RedactError::SessionNotFound(_))));
        assert!(matches!(ws.remove(a), Err(RedactError::SessionNotFound(_))));

        ws.remove(b).unwrap();
        assert!(ws.is_empty());
        assert_eq!(ws.dispatch_key(&KeyChord::new(Key::Escape)), Outcome::Ignored);
    }
}
