//! Keyboard commands understood by the pickers.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A key press, already decoded from the host's key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Enter,
    Escape,
}

impl KeyCommand {
    /// Day offset of an arrow key in a day grid, `None` for other keys.
    #[must_use]
    pub const fn day_offset(self) -> Option<i64> {
        match self {
            Self::Left => Some(-1),
            Self::Right => Some(1),
            Self::Up => Some(-7),
            Self::Down => Some(7),
            _ => None,
        }
    }

    /// Map a DOM-style key name (`ArrowLeft`, `PageUp`, ...) to a command.
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Self::Left),
            "ArrowRight" | "Right" => Some(Self::Right),
            "ArrowUp" | "Up" => Some(Self::Up),
            "ArrowDown" | "Down" => Some(Self::Down),
            "PageUp" => Some(Self::PageUp),
            "PageDown" => Some(Self::PageDown),
            "Enter" | " " => Some(Self::Enter),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

impl FromStr for KeyCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        let command = match lowered.as_str() {
            "left" | "arrowleft" => Self::Left,
            "right" | "arrowright" => Self::Right,
            "up" | "arrowup" => Self::Up,
            "down" | "arrowdown" => Self::Down,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            "enter" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            _ => return Err(Error::other(format!("unknown key '{s}'"))),
        };
        Ok(command)
    }
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "ArrowLeft",
            Self::Right => "ArrowRight",
            Self::Up => "ArrowUp",
            Self::Down => "ArrowDown",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Enter => "Enter",
            Self::Escape => "Escape",
        };
        write!(f, "{name}")
    }
}
