//! Match state, authoritative tick and round flow

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::ai;
use super::combat::CombatSystem;
use super::fighter::{Facing, Fighter, FighterId, Spawn};
use super::physics::{Arena, ArenaError, Platform, GRAVITY};
use super::snapshot::{Camera, Snapshot};
use super::{InputFrame, MoveIntent};

const PLAYER_SPAWN_X: f32 = 140.0;
const BOT_SPAWN_X: f32 = 820.0;
const PLAYER_COLOR: u32 = 0xffc857;
const BOT_COLOR: u32 = 0x89cff0;

/// Pause between a knockout and the next round
pub const ROUND_RESET_DELAY: Duration = Duration::from_millis(1500);

/// Simulation settings for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Pause after a knockout before the round resets
    pub round_reset_delay: Duration,
    /// Floor first, then the mid platform
    pub platforms: Vec<Platform>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            round_reset_delay: ROUND_RESET_DELAY,
            platforms: Arena::default().platforms().to_vec(),
        }
    }
}

/// Match construction errors
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Invalid platform layout: {0}")]
    Arena(#[from] ArenaError),

    #[error("Match must be created inside a tokio runtime")]
    NoRuntime,
}

/// Rounds won by each fighter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub player: u32,
    pub bot: u32,
}

/// Match state (shared with the round reset task)
struct MatchState {
    player: Fighter,
    bot: Fighter,
    arena: Arena,
    gravity: f32,
    score: Score,
    round_over: bool,
    /// Bumped on every knockout and restart; a reset only fires for its own round
    round: u64,
    tick: u64,
}

impl MatchState {
    fn new(arena: Arena, gravity: f32) -> Self {
        let floor_y = arena.floor().y;
        let player = Fighter::new(
            FighterId::Player,
            Spawn {
                x: PLAYER_SPAWN_X,
                y: floor_y,
                facing: Facing::Right,
            },
            PLAYER_COLOR,
        );
        let bot = Fighter::new(
            FighterId::Bot,
            Spawn {
                x: BOT_SPAWN_X,
                y: floor_y,
                facing: Facing::Left,
            },
            BOT_COLOR,
        );

        Self {
            player,
            bot,
            arena,
            gravity,
            score: Score::default(),
            round_over: false,
            round: 0,
            tick: 0,
        }
    }

    /// Run a single simulation tick. Returns the round number on a knockout.
    fn run_tick(&mut self, dt: f32, input: &InputFrame) -> Option<u64> {
        self.tick += 1;

        // Intents
        self.player.apply_move_intent(&MoveIntent::from_input(input));
        let bot_intent = ai::chase(&self.bot, &self.player, self.arena.mid());
        self.bot.apply_move_intent(&bot_intent);

        // Physics
        self.player.integrate_physics(dt, self.gravity);
        self.bot.integrate_physics(dt, self.gravity);

        // Platforms
        self.player.resolve_platform_collision(self.arena.platforms());
        self.bot.resolve_platform_collision(self.arena.platforms());

        self.resolve_combat();
        self.check_round_end()
    }

    fn resolve_combat(&mut self) {
        CombatSystem::resolve(&mut self.player, &mut self.bot);
    }

    fn check_round_end(&mut self) -> Option<u64> {
        let player_down = self.player.is_dead();
        let bot_down = self.bot.is_dead();
        if !player_down && !bot_down {
            return None;
        }

        if player_down {
            self.score.bot += 1;
        }
        if bot_down {
            self.score.player += 1;
        }
        self.round_over = true;
        self.round += 1;

        let winner = match (player_down, bot_down) {
            (false, true) => Some(FighterId::Player),
            (true, false) => Some(FighterId::Bot),
            _ => None,
        };
        info!(
            round = self.round,
            tick = self.tick,
            winner = ?winner,
            player_wins = self.score.player,
            bot_wins = self.score.bot,
            "Round over"
        );

        Some(self.round)
    }

    fn reset_round(&mut self) {
        self.player.reset_to_spawn();
        self.bot.reset_to_spawn();
        self.round_over = false;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            camera: Camera {
                x: (self.player.x() + self.bot.x()) / 2.0,
                y: (self.player.y() + self.bot.y()) / 2.0,
            },
            platforms: self.arena.platforms().to_vec(),
            actors: [self.player.render_info(), self.bot.render_info()],
            score: self.score,
            round_over: self.round_over,
        }
    }
}

/// The authoritative duel: two fighters, the arena, score and round flow
pub struct Match {
    state: Arc<Mutex<MatchState>>,
    runtime: Handle,
    round_reset_delay: Duration,
    pending_reset: Option<JoinHandle<()>>,
}

impl Match {
    /// Create a match. Must be called from within a tokio runtime, which
    /// later runs the delayed round resets.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        let arena = Arena::new(config.platforms)?;
        let runtime = Handle::try_current().map_err(|_| MatchError::NoRuntime)?;

        Ok(Self {
            state: Arc::new(Mutex::new(MatchState::new(arena, config.gravity))),
            runtime,
            round_reset_delay: config.round_reset_delay,
            pending_reset: None,
        })
    }

    /// Advance the simulation by one fixed step. No-op while a round is over.
    pub fn update(&mut self, dt: f32, input: &InputFrame) {
        let knockout = {
            let mut state = self.state.lock();
            if state.round_over {
                return;
            }
            state.run_tick(dt, input)
        };

        if let Some(round) = knockout {
            self.schedule_reset(round);
        }
    }

    /// Full reset: spawn positions, health and score. Cancels a pending round reset.
    pub fn restart(&mut self) {
        self.cancel_pending_reset();

        let mut state = self.state.lock();
        state.round += 1;
        state.player.reset_to_spawn();
        state.bot.reset_to_spawn();
        state.score = Score::default();
        state.round_over = false;

        info!(round = state.round, "Match restarted");
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().snapshot()
    }

    pub fn score(&self) -> Score {
        self.state.lock().score
    }

    pub fn round_over(&self) -> bool {
        self.state.lock().round_over
    }

    /// Whether a delayed round reset is still waiting to fire
    #[cfg(test)]
    pub fn reset_pending(&self) -> bool {
        self.pending_reset
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn schedule_reset(&mut self, round: u64) {
        self.cancel_pending_reset();

        let state: Weak<Mutex<MatchState>> = Arc::downgrade(&self.state);
        let delay = self.round_reset_delay;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(state) = state.upgrade() else {
                return;
            };
            let mut state = state.lock();
            if state.round == round && state.round_over {
                state.reset_round();
                info!(round, "Round reset");
            }
        });

        self.pending_reset = Some(handle);
    }

    fn cancel_pending_reset(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending round reset");
            }
            handle.abort();
        }
    }
}

impl Drop for Match {
    fn drop(&mut self) {
        self.cancel_pending_reset();
    }
}
