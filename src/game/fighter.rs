//! Fighter state: kinematics, combat timers and the per-tick state machine

use serde::Serialize;

use super::combat::{CombatSystem, ATTACK_DURATION, IFRAMES_DURATION, MAX_HEALTH};
use super::geometry::Aabb;
use super::physics::{Body, FighterStats, PhysicsSystem, Platform};
use super::snapshot::{FighterView, SwordPose};
use super::MoveIntent;

const BODY_WIDTH: f32 = 28.0;
const BODY_HEIGHT: f32 = 40.0;

const SWORD_LENGTH: f32 = 42.0;
const SWORD_HEIGHT: f32 = 10.0;
/// Gap between body center and the sword box
const SWORD_REACH: f32 = 12.0;
/// Sword box top, measured up from the feet
const SWORD_TOP: f32 = 32.0;
/// Sword pivot height above the feet, for presentation
const SWORD_PIVOT_Y: f32 = -28.0;
const SWORD_SWING_ANGLE: f32 = 0.35;

/// Horizontal speed below which a grounded fighter counts as standing
const RUN_THRESHOLD: f32 = 1.0;

/// Which side of the duel a fighter is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FighterId {
    /// Driven by the input provider
    Player,
    /// Driven by the chase policy
    Bot,
}

/// Horizontal facing, serialized as +1 / -1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i8")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Direction from `from_x` towards `to_x`; ties face left
    pub fn towards(from_x: f32, to_x: f32) -> Self {
        if to_x > from_x {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

impl From<Facing> for i8 {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }
}

/// Discrete fighter state, derived once per mutation from kinematics and timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FighterState {
    Idle,
    Run,
    Jump,
    Fall,
    Attack,
    Hitstun,
    Dead,
}

/// Where and how a fighter starts each round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
}

/// One combatant. Fields are only mutated through the operations below.
#[derive(Debug, Clone)]
pub struct Fighter {
    id: FighterId,
    color: u32,
    spawn: Spawn,
    stats: FighterStats,
    body: Body,
    facing: Facing,
    health: u8,
    attack_timer: f32,
    iframes: f32,
    state: FighterState,
}

impl Fighter {
    pub fn new(id: FighterId, spawn: Spawn, color: u32) -> Self {
        let mut fighter = Self {
            id,
            color,
            spawn,
            stats: FighterStats::for_id(id),
            body: Body::at_rest(spawn.x, spawn.y),
            facing: spawn.facing,
            health: MAX_HEALTH,
            attack_timer: 0.0,
            iframes: 0.0,
            state: FighterState::Idle,
        };
        fighter.state = fighter.next_state();
        fighter
    }

    pub fn id(&self) -> FighterId {
        self.id
    }

    pub fn x(&self) -> f32 {
        self.body.x
    }

    pub fn y(&self) -> f32 {
        self.body.y
    }

    #[cfg(test)]
    pub fn velocity(&self) -> (f32, f32) {
        (self.body.vx, self.body.vy)
    }

    pub fn on_ground(&self) -> bool {
        self.body.on_ground
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    #[cfg(test)]
    pub fn state(&self) -> FighterState {
        self.state
    }

    #[cfg(test)]
    pub fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    #[cfg(test)]
    pub fn iframes(&self) -> f32 {
        self.iframes
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.iframes > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Hurtbox, centered on x and standing on the feet
    pub fn body_aabb(&self) -> Aabb {
        Aabb::new(
            self.body.x - BODY_WIDTH / 2.0,
            self.body.y - BODY_HEIGHT,
            BODY_WIDTH,
            BODY_HEIGHT,
        )
    }

    /// Forward stab box; only meaningful while attacking
    pub fn sword_aabb(&self) -> Aabb {
        let x0 = match self.facing {
            Facing::Right => self.body.x + SWORD_REACH,
            Facing::Left => self.body.x - SWORD_REACH - SWORD_LENGTH,
        };
        Aabb::new(x0, self.body.y - SWORD_TOP, SWORD_LENGTH, SWORD_HEIGHT)
    }

    /// Active hitbox, `None` outside an attack swing
    pub fn hitbox(&self) -> Option<Aabb> {
        self.is_attacking().then(|| self.sword_aabb())
    }

    pub fn apply_move_intent(&mut self, intent: &MoveIntent) {
        self.body.vx = intent
            .run
            .map_or(0.0, |dir| dir.sign() * self.stats.run_speed);

        if let Some(face) = intent.face {
            self.facing = face;
        }

        if intent.jump && self.body.on_ground {
            self.body.vy = -self.stats.jump_speed;
            self.body.on_ground = false;
        }

        if intent.attack && CombatSystem::can_attack(self.attack_timer) {
            self.attack_timer = ATTACK_DURATION;
        }

        self.state = self.next_state();
    }

    pub fn integrate_physics(&mut self, dt: f32, gravity: f32) {
        self.iframes = CombatSystem::decay(self.iframes, dt);
        self.attack_timer = CombatSystem::decay(self.attack_timer, dt);

        PhysicsSystem::integrate(&mut self.body, dt, gravity);
        self.state = self.next_state();
    }

    /// Land on the first platform caught this tick. Returns `on_ground`.
    pub fn resolve_platform_collision(&mut self, platforms: &[Platform]) -> bool {
        PhysicsSystem::land(&mut self.body, platforms);
        self.state = self.next_state();
        self.body.on_ground
    }

    /// Take one point of damage, knocked back in direction `from`.
    /// Returns false when the hit was absorbed by iframes.
    pub fn take_hit(&mut self, from: Facing) -> bool {
        if self.is_invulnerable() {
            return false;
        }

        self.health = CombatSystem::apply_damage(self.health);
        self.iframes = IFRAMES_DURATION;
        let (vx, vy) = CombatSystem::knockback(from);
        self.body.vx = vx;
        self.body.vy = vy;
        self.state = self.next_state();
        true
    }

    /// Back to spawn with full health and cleared timers
    pub fn reset_to_spawn(&mut self) {
        self.body = Body::at_rest(self.spawn.x, self.spawn.y);
        self.facing = self.spawn.facing;
        self.health = MAX_HEALTH;
        self.attack_timer = 0.0;
        self.iframes = 0.0;
        self.state = self.next_state();
    }

    pub fn render_info(&self) -> FighterView {
        let angle = if self.is_attacking() {
            SWORD_SWING_ANGLE
        } else {
            0.0
        };

        FighterView {
            id: self.id,
            x: self.body.x,
            y: self.body.y,
            facing: self.facing,
            health: self.health,
            state: self.state,
            sword: SwordPose {
                angle,
                x: self.facing.sign() * SWORD_REACH,
                y: SWORD_PIVOT_Y,
            },
            hitbox: self.hitbox(),
            color: self.color,
        }
    }

    /// The only place the state label is decided. Guards are in precedence order.
    fn next_state(&self) -> FighterState {
        let airborne = !self.body.on_ground;

        if self.health == 0 {
            FighterState::Dead
        } else if self.is_invulnerable() && (airborne || self.body.vy < 0.0) {
            // knocked back and not landed yet
            FighterState::Hitstun
        } else if self.is_attacking() {
            FighterState::Attack
        } else if airborne && self.body.vy < 0.0 {
            FighterState::Jump
        } else if airborne {
            FighterState::Fall
        } else if self.body.vx.abs() > RUN_THRESHOLD {
            FighterState::Run
        } else {
            FighterState::Idle
        }
    }
}
