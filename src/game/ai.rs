//! Chase policy for the bot fighter

use super::fighter::{Facing, Fighter};
use super::physics::Platform;
use super::MoveIntent;

/// Horizontal gap below which the bot stops running
const DEAD_ZONE: f32 = 8.0;
/// Target must be this far above to be worth a jump
const JUMP_HEIGHT_GAP: f32 = 40.0;
/// Extra slack around the mid platform for the jump alignment check
const MID_PLATFORM_MARGIN: f32 = 50.0;
const ATTACK_RANGE_X: f32 = 40.0;
const ATTACK_RANGE_Y: f32 = 30.0;

/// Decide the bot's intent for this tick.
///
/// Runs toward `target`, always faces it, jumps only to contest the mid
/// platform when roughly under it, and swings when the target is close.
pub fn chase(me: &Fighter, target: &Fighter, mid: &Platform) -> MoveIntent {
    let dx = target.x() - me.x();
    let dy = target.y() - me.y();
    let toward = Facing::towards(me.x(), target.x());

    let run = (dx.abs() > DEAD_ZONE).then_some(toward);

    let target_above = target.y() < me.y() - JUMP_HEIGHT_GAP;
    let near_mid = (me.x() - mid.center_x()).abs() < mid.w / 2.0 + MID_PLATFORM_MARGIN;
    let jump = target_above && me.on_ground() && near_mid;

    let attack = dx.abs() < ATTACK_RANGE_X && dy.abs() < ATTACK_RANGE_Y && !me.is_attacking();

    MoveIntent {
        run,
        face: Some(toward),
        jump,
        attack,
    }
}
