//! Fighter physics, platform layout and one-way platform collision

use serde::Serialize;

use super::fighter::FighterId;

/// Default downward acceleration in units/s²
pub const GRAVITY: f32 = 2000.0;

/// How far below a surface the feet may sink and still land on it
const LAND_TOLERANCE: f32 = 10.0;
/// Band around the surface the feet must be inside to snap onto it
const LAND_BAND_ABOVE: f32 = 4.0;
const LAND_BAND_BELOW: f32 = 20.0;

/// Movement constants per fighter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterStats {
    /// Horizontal speed while running
    pub run_speed: f32,
    /// Upward launch speed of a jump
    pub jump_speed: f32,
}

impl FighterStats {
    pub fn for_id(id: FighterId) -> Self {
        match id {
            FighterId::Player => Self {
                run_speed: 260.0,
                jump_speed: 720.0,
            },
            FighterId::Bot => Self {
                run_speed: 220.0,
                jump_speed: 700.0,
            },
        }
    }
}

/// Static one-way platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Inclusive horizontal span check
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.x + self.w
    }
}

/// Platform layout errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArenaError {
    #[error("Arena needs exactly 2 platforms (floor, mid), got {0}")]
    PlatformCount(usize),

    #[error("Platform {0} has a non-positive width or height")]
    DegeneratePlatform(usize),
}

/// Validated platform layout: index 0 is the floor, index 1 the mid platform
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    platforms: Vec<Platform>,
}

impl Arena {
    pub fn new(platforms: Vec<Platform>) -> Result<Self, ArenaError> {
        if platforms.len() != 2 {
            return Err(ArenaError::PlatformCount(platforms.len()));
        }
        if let Some(idx) = platforms.iter().position(|p| p.w <= 0.0 || p.h <= 0.0) {
            return Err(ArenaError::DegeneratePlatform(idx));
        }
        Ok(Self { platforms })
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn floor(&self) -> &Platform {
        &self.platforms[0]
    }

    pub fn mid(&self) -> &Platform {
        &self.platforms[1]
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            platforms: vec![
                Platform::new(40.0, 500.0, 880.0, 16.0),
                Platform::new(260.0, 340.0, 440.0, 12.0),
            ],
        }
    }
}

/// Kinematic state of one fighter; `y` is the feet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub on_ground: bool,
}

impl Body {
    pub fn at_rest(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            on_ground: true,
        }
    }
}

/// Physics system for integrating and landing fighter bodies
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Apply gravity then semi-implicit Euler step
    pub fn integrate(body: &mut Body, dt: f32, gravity: f32) {
        body.vy += gravity * dt;
        body.x += body.vx * dt;
        body.y += body.vy * dt;
    }

    /// Whether a fighter standing still stays on its platform at this step size.
    /// The first tick's fall, `gravity * dt²`, must stay inside the landing tolerance.
    pub fn holds_ground(gravity: f32, dt: f32) -> bool {
        gravity * dt * dt <= LAND_TOLERANCE
    }

    /// Whether the feet would land on `platform` this tick
    pub fn lands_on(body: &Body, platform: &Platform) -> bool {
        let feet = body.y;
        platform.spans(body.x)
            && body.vy >= 0.0
            && feet <= platform.y + LAND_TOLERANCE
            && feet + LAND_BAND_ABOVE >= platform.y
            && feet <= platform.y + LAND_BAND_BELOW
    }

    /// Snap onto the first platform landed on, in list order.
    /// Returns the index of that platform.
    pub fn land(body: &mut Body, platforms: &[Platform]) -> Option<usize> {
        let hit = platforms.iter().position(|p| Self::lands_on(body, p));
        match hit {
            Some(idx) => {
                body.y = platforms[idx].y;
                body.vy = 0.0;
                body.on_ground = true;
            }
            None => body.on_ground = false,
        }
        hit
    }
}
