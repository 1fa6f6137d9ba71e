//! Keyboard bookkeeping
//!
//! The platform layer forwards raw key codes; the simulation only ever sees a
//! [`TickInput`] sampled from the held set once per tick.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Key codes (`KeyboardEvent.code`) mapped to actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub fire: Vec<String>,
    /// One-shot: stop or resume the session
    pub pause: Vec<String>,
    /// One-shot: start over after game over
    pub restart: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let codes =
            |list: &[&str]| -> Vec<String> { list.iter().map(|s| (*s).to_string()).collect() };
        Self {
            left: codes(&["ArrowLeft", "KeyA"]),
            right: codes(&["ArrowRight", "KeyD"]),
            fire: codes(&["Space"]),
            pause: codes(&["KeyP"]),
            restart: codes(&["Enter"]),
        }
    }
}

/// One-shot commands triggered on key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Restart,
}

impl KeyBindings {
    /// Command bound to `code`, if any
    pub fn command(&self, code: &str) -> Option<Command> {
        if self.pause.iter().any(|c| c == code) {
            Some(Command::TogglePause)
        } else if self.restart.iter().any(|c| c == code) {
            Some(Command::Restart)
        } else {
            None
        }
    }

    /// True if the code drives a held action (the browser default should be suppressed)
    pub fn is_game_key(&self, code: &str) -> bool {
        self.left
            .iter()
            .chain(&self.right)
            .chain(&self.fire)
            .any(|c| c == code)
    }
}

/// Set of currently held key codes
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &str) {
        self.held.insert(code.to_string());
    }

    pub fn release(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Forget everything (window lost focus, keyup events will not arrive)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    #[cfg(test)]
    fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    fn any_held(&self, codes: &[String]) -> bool {
        codes.iter().any(|c| self.held.contains(c))
    }

    /// Input for the next tick
    pub fn sample(&self, bindings: &KeyBindings) -> TickInput {
        TickInput {
            left: self.any_held(&bindings.left),
            right: self.any_held(&bindings.right),
            fire: self.any_held(&bindings.fire),
        }
    }
}
