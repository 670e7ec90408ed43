//! Read-only projections for the presentation layer

use serde::Serialize;

use super::fighter::{Facing, FighterId, FighterState};
use super::geometry::Aabb;
use super::physics::Platform;
use super::r#match::Score;

/// Sword pivot relative to the fighter's feet
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwordPose {
    /// Swing angle in radians
    pub angle: f32,
    pub x: f32,
    pub y: f32,
}

/// Per-fighter render projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterView {
    pub id: FighterId,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub health: u8,
    pub state: FighterState,
    pub sword: SwordPose,
    /// Active sword box, only while attacking
    pub hitbox: Option<Aabb>,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub camera: Camera,
    pub platforms: Vec<Platform>,
    /// Player first, then bot
    pub actors: [FighterView; 2],
    pub score: Score,
    pub round_over: bool,
}

impl Snapshot {
    #[cfg(test)]
    pub fn actor(&self, id: FighterId) -> &FighterView {
        match id {
            FighterId::Player => &self.actors[0],
            FighterId::Bot => &self.actors[1],
        }
    }
}

/// Decides which rendered frames get a snapshot written out
pub struct SnapshotBuilder {
    /// Frames since last snapshot
    frames_since_snapshot: u32,
    /// Snapshot interval in frames, 0 disables output
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            frames_since_snapshot: 0,
            snapshot_interval,
        }
    }

    pub fn enabled(&self) -> bool {
        self.snapshot_interval > 0
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        if !self.enabled() {
            return false;
        }
        self.frames_since_snapshot += 1;
        if self.frames_since_snapshot >= self.snapshot_interval {
            self.frames_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used for round transitions)
    pub fn force_next(&mut self) {
        self.frames_since_snapshot = self.snapshot_interval;
    }

    /// Serialize a snapshot as a single JSON line
    pub fn encode(&self, snapshot: &Snapshot) -> serde_json::Result<String> {
        serde_json::to_string(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_send_every_interval() {
        let mut builder = SnapshotBuilder::new(3);
        let sent: Vec<bool> = (0..6).map(|_| builder.should_send()).collect();
        assert_eq!(sent, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_force_next() {
        let mut builder = SnapshotBuilder::new(10);
        assert!(!builder.should_send());
        builder.force_next();
        assert!(builder.should_send());
        assert!(!builder.should_send());
    }

    #[test]
    fn test_zero_interval_disables_output() {
        let mut builder = SnapshotBuilder::new(0);
        builder.force_next();
        assert!(!builder.should_send());
        assert!(!builder.enabled());
    }

    #[test]
    fn test_encode_uses_presentation_field_names() {
        let view = FighterView {
            id: FighterId::Bot,
            x: 1.0,
            y: 2.0,
            facing: Facing::Left,
            health: 3,
            state: FighterState::Hitstun,
            sword: SwordPose {
                angle: 0.0,
                x: -12.0,
                y: -28.0,
            },
            hitbox: None,
            color: 0x89cff0,
        };
        let snapshot = Snapshot {
            camera: Camera { x: 0.5, y: 1.0 },
            platforms: vec![Platform::new(40.0, 500.0, 880.0, 16.0)],
            actors: [view.clone(), view],
            score: Score { player: 1, bot: 0 },
            round_over: false,
        };

        let line = SnapshotBuilder::new(1).encode(&snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["actors"][0]["id"], "bot");
        assert_eq!(value["actors"][0]["facing"], -1);
        assert_eq!(value["actors"][0]["state"], "hitstun");
        assert!(value["actors"][0]["hitbox"].is_null());
        assert_eq!(value["score"]["player"], 1);
        assert_eq!(value["round_over"], false);
        assert!(!line.contains('\n'));
    }
}
