//! Combat system - attack timing, damage, hit detection

use tracing::debug;

use super::fighter::{Facing, Fighter, FighterId};
use super::geometry::overlap;

/// Starting and maximum health
pub const MAX_HEALTH: u8 = 3;
/// Length of one sword swing (seconds)
pub const ATTACK_DURATION: f32 = 0.18;
/// Invulnerability after taking a hit (seconds)
pub const IFRAMES_DURATION: f32 = 0.5;

const KNOCKBACK_SPEED_X: f32 = 260.0;
const KNOCKBACK_SPEED_Y: f32 = -420.0;

/// Combat system for swing timing and damage
pub struct CombatSystem;

impl CombatSystem {
    /// A new swing may start once the previous one ran out
    pub fn can_attack(attack_timer: f32) -> bool {
        attack_timer <= 0.0
    }

    /// Count a timer down, clamped at zero
    pub fn decay(timer: f32, dt: f32) -> f32 {
        (timer - dt).max(0.0)
    }

    /// One point of damage, floored at zero
    pub fn apply_damage(health: u8) -> u8 {
        health.saturating_sub(1)
    }

    /// Knockback velocity for a hit landed from `from`
    pub fn knockback(from: Facing) -> (f32, f32) {
        (from.sign() * KNOCKBACK_SPEED_X, KNOCKBACK_SPEED_Y)
    }

    /// Whether `attacker`'s active swing touches `target`'s body
    pub fn sword_connects(attacker: &Fighter, target: &Fighter) -> bool {
        overlap(attacker.hitbox().as_ref(), Some(&target.body_aabb()))
            && !target.is_invulnerable()
    }

    /// Check both swings against the same pre-hit state, then apply damage.
    /// Both fighters can be hit in the same tick.
    pub fn resolve(a: &mut Fighter, b: &mut Fighter) -> Vec<HitResult> {
        let mut hits = Vec::with_capacity(2);
        if Self::sword_connects(a, b) {
            hits.push(HitResult::new(a, b));
        }
        if Self::sword_connects(b, a) {
            hits.push(HitResult::new(b, a));
        }

        for hit in &mut hits {
            let target = if hit.target == a.id() { &mut *a } else { &mut *b };
            target.take_hit(hit.direction);
            hit.target_health = target.health();

            debug!(
                attacker = ?hit.attacker,
                target = ?hit.target,
                health = hit.target_health,
                "Sword hit"
            );
        }

        hits
    }
}

/// Hit result from combat resolution
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub attacker: FighterId,
    pub target: FighterId,
    /// Knockback direction, the attacker's facing
    pub direction: Facing,
    pub target_health: u8,
}

impl HitResult {
    fn new(attacker: &Fighter, target: &Fighter) -> Self {
        Self {
            attacker: attacker.id(),
            target: target.id(),
            direction: attacker.facing(),
            target_health: target.health(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fighter::Spawn;
    use crate::game::MoveIntent;

    fn fighter(id: FighterId, x: f32, facing: Facing) -> Fighter {
        Fighter::new(id, Spawn { x, y: 500.0, facing }, 0)
    }

    fn swing(f: &mut Fighter) {
        f.apply_move_intent(&MoveIntent {
            attack: true,
            ..Default::default()
        });
    }

    #[test]
    fn test_decay_clamps() {
        assert_eq!(CombatSystem::decay(0.1, 0.5), 0.0);
        assert_eq!(CombatSystem::decay(0.0, 0.01), 0.0);
        assert_eq!(CombatSystem::decay(1.0, 0.25), 0.75);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        assert_eq!(CombatSystem::apply_damage(3), 2);
        assert_eq!(CombatSystem::apply_damage(0), 0);
    }

    #[test]
    fn test_double_hit_trade() {
        let mut player = fighter(FighterId::Player, 100.0, Facing::Right);
        let mut bot = fighter(FighterId::Bot, 110.0, Facing::Left);
        swing(&mut player);
        swing(&mut bot);

        let hits = CombatSystem::resolve(&mut player, &mut bot);
        assert_eq!(hits.len(), 2);
        assert_eq!(player.health(), 2);
        assert_eq!(bot.health(), 2);
        assert_eq!(bot.velocity().0, 260.0);
        assert_eq!(player.velocity().0, -260.0);
    }

    #[test]
    fn test_no_hit_without_swing() {
        let mut player = fighter(FighterId::Player, 100.0, Facing::Right);
        let mut bot = fighter(FighterId::Bot, 110.0, Facing::Left);
        assert!(CombatSystem::resolve(&mut player, &mut bot).is_empty());
        assert_eq!(player.health(), 3);
        assert_eq!(bot.health(), 3);
    }

    #[test]
    fn test_swing_facing_away_misses() {
        let mut player = fighter(FighterId::Player, 100.0, Facing::Left);
        let mut bot = fighter(FighterId::Bot, 130.0, Facing::Left);
        swing(&mut player);
        assert!(CombatSystem::resolve(&mut player, &mut bot).is_empty());
    }

    #[test]
    fn test_out_of_reach_misses() {
        let mut player = fighter(FighterId::Player, 100.0, Facing::Right);
        let mut bot = fighter(FighterId::Bot, 200.0, Facing::Left);
        swing(&mut player);
        assert!(CombatSystem::resolve(&mut player, &mut bot).is_empty());
    }

    #[test]
    fn test_iframes_block_repeat_hits() {
        let mut player = fighter(FighterId::Player, 100.0, Facing::Right);
        let mut bot = fighter(FighterId::Bot, 130.0, Facing::Left);
        swing(&mut player);

        let first = CombatSystem::resolve(&mut player, &mut bot);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].target, FighterId::Bot);
        assert_eq!(first[0].target_health, 2);

        // still overlapping, same swing
        assert!(CombatSystem::resolve(&mut player, &mut bot).is_empty());
        assert_eq!(bot.health(), 2);
    }

    #[test]
    fn test_killing_blow_is_reported() {
        let mut bot = fighter(FighterId::Bot, 130.0, Facing::Left);
        for _ in 0..2 {
            bot.take_hit(Facing::Right);
            bot.integrate_physics(0.6, 0.0);
        }
        let spawn = Spawn {
            x: bot.x() - 30.0,
            y: bot.y(),
            facing: Facing::Right,
        };
        let mut player = Fighter::new(FighterId::Player, spawn, 0);

        swing(&mut player);
        let hits = CombatSystem::resolve(&mut player, &mut bot);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_health, 0);
        assert!(bot.is_dead());
    }
}
