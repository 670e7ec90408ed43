//! Keyboard input adapter: held key codes in, per-tick control signals out

use std::collections::HashSet;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::warn;

use crate::game::InputFrame;

const LEFT_KEYS: [&str; 2] = ["ArrowLeft", "KeyA"];
const RIGHT_KEYS: [&str; 2] = ["ArrowRight", "KeyD"];
const JUMP_KEYS: [&str; 2] = ["ArrowUp", "KeyW"];
const ATTACK_KEY: &str = "Space";
const RESET_KEY: &str = "KeyR";

/// Press or release of a single key code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Down(String),
    Up(String),
}

/// Key event parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyEventError {
    #[error("Key event must start with '+' or '-': {0:?}")]
    MissingSign(String),

    #[error("Key event has no key code")]
    EmptyCode,
}

impl FromStr for KeyEvent {
    type Err = KeyEventError;

    /// `+Code` presses a key, `-Code` releases it
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (sign, code) = match line.chars().next() {
            Some(c @ ('+' | '-')) => (c, line[1..].trim()),
            _ => return Err(KeyEventError::MissingSign(line.to_string())),
        };
        if code.is_empty() {
            return Err(KeyEventError::EmptyCode);
        }

        Ok(match sign {
            '+' => KeyEvent::Down(code.to_string()),
            _ => KeyEvent::Up(code.to_string()),
        })
    }
}

/// Set of currently held key codes
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    down: HashSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(code) => {
                self.down.insert(code);
            }
            KeyEvent::Up(code) => {
                self.down.remove(&code);
            }
        }
    }

    fn any(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.down.contains(*code))
    }

    /// Sample the four simulation signals
    pub fn frame(&self) -> InputFrame {
        InputFrame {
            left: self.any(&LEFT_KEYS),
            right: self.any(&RIGHT_KEYS),
            jump: self.any(&JUMP_KEYS),
            attack: self.down.contains(ATTACK_KEY),
        }
    }

    /// Restart request, consumed by the host rather than the simulation
    pub fn reset(&self) -> bool {
        self.down.contains(RESET_KEY)
    }
}

/// Forward key events read line by line until EOF or the receiver goes away.
/// Malformed lines are logged and skipped.
pub async fn read_key_events<R>(reader: R, tx: mpsc::Sender<KeyEvent>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<KeyEvent>() {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Ignoring key event"),
        }
    }
    Ok(())
}
