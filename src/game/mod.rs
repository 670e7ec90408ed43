//! Game simulation modules

pub mod ai;
pub mod combat;
pub mod fighter;
pub mod geometry;
pub mod r#match;
pub mod physics;
pub mod snapshot;

pub use fighter::Facing;
pub use r#match::{Match, MatchConfig};
pub use snapshot::SnapshotBuilder;

/// Control signals sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
}

/// What a controller asks a fighter to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    /// Run direction, `None` stands still
    pub run: Option<Facing>,
    /// Direction to face, `None` keeps the current facing
    pub face: Option<Facing>,
    pub jump: bool,
    pub attack: bool,
}

impl MoveIntent {
    /// Map held controls to an intent; right wins when both directions are held
    pub fn from_input(input: &InputFrame) -> Self {
        let run = if input.right {
            Some(Facing::Right)
        } else if input.left {
            Some(Facing::Left)
        } else {
            None
        };

        Self {
            run,
            face: run,
            jump: input.jump,
            attack: input.attack,
        }
    }
}
