// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Keyboard bindings, owned per session.
//
// Each `ImageSession` carries its own `InputBindings`; the `Workspace` routes a
// key press to the active session only, so shortcuts never act on an image
// the user is not looking at.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use redact_core::RedactError;
use serde::{Deserialize, Serialize};

/// A physical key, independent of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Delete,
    Backspace,
    /// A printable character, stored lowercase.
    Char(char),
}

/// A key plus modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: Option<Key>,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn new(key: Key) -> Self {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self {
            key: Some(key),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (held, name) in [
            (self.ctrl, "ctrl+"),
            (self.shift, "shift+"),
            (self.alt, "alt+"),
            (self.meta, "meta+"),
        ] {
            if held {
                f.write_str(name)?;
            }
        }
        match self.key {
            Some(Key::Escape) => f.write_str("escape"),
            Some(Key::Enter) => f.write_str("enter"),
            Some(Key::Delete) => f.write_str("delete"),
            Some(Key::Backspace) => f.write_str("backspace"),
            Some(Key::Char(c)) => write!(f, "{c}"),
            None => Ok(()),
        }
    }
}

/// Parses chords written as `"ctrl+shift+delete"`, `"escape"`, `"meta+z"`.
impl FromStr for KeyChord {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord::default();
        for part in s.split('+').map(str::trim) {
            let lower = part.to_ascii_lowercase();
            match lower.as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                "meta" | "cmd" | "super" => chord.meta = true,
                key => {
                    if chord.key.is_some() {
                        return Err(RedactError::Script(format!("more than one key in chord '{s}'")));
                    }
                    chord.key = Some(parse_key(key).ok_or_else(|| {
                        RedactError::Script(format!("unknown key '{part}' in chord '{s}'"))
                    })?);
                }
            }
        }
        if chord.key.is_none() {
            return Err(RedactError::Script(format!("chord '{s}' has no key")));
        }
        Ok(chord)
    }
}

fn parse_key(name: &str) -> Option<Key> {
    match name {
        "escape" | "esc" => Some(Key::Escape),
        "enter" | "return" => Some(Key::Enter),
        "delete" | "del" => Some(Key::Delete),
        "backspace" => Some(Key::Backspace),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c.to_ascii_lowercase())),
                _ => None,
            }
        }
    }
}

/// Editor actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorCommand {
    /// Abandon the rectangle being dragged.
    Cancel,
    /// Remove the most recently committed region.
    Undo,
    /// Remove every region.
    ClearAll,
    /// Request the full-resolution render.
    Apply,
}

/// Chord-to-command table for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBindings {
    map: HashMap<KeyChord, EditorCommand>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert(KeyChord::new(Key::Escape), EditorCommand::Cancel);
        map.insert(KeyChord::new(Key::Char('z')).ctrl(), EditorCommand::Undo);
        map.insert(KeyChord::new(Key::Char('z')).meta(), EditorCommand::Undo);
        map.insert(
            KeyChord::new(Key::Delete).ctrl().shift(),
            EditorCommand::ClearAll,
        );
        map.insert(KeyChord::new(Key::Enter).ctrl(), EditorCommand::Apply);
        Self { map }
    }
}

impl InputBindings {
    /// Bindings with nothing mapped.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Map `chord` to `command`, returning the command it replaced.
    pub fn bind(&mut self, chord: KeyChord, command: EditorCommand) -> Option<EditorCommand> {
        self.map.insert(chord, command)
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<EditorCommand> {
        self.map.remove(chord)
    }

    pub fn resolve(&self, chord: &KeyChord) -> Option<EditorCommand> {
        self.map.get(chord).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
