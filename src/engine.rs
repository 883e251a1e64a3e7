//! The game engine: one owned aggregate holding the whole simulation.
//!
//! The host drives it with [`Engine::frame`] once per animation frame and
//! forwards input through the `handle_*` methods between frames.  Input
//! that makes no sense in the current state is ignored, never an error.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::compute;
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus, Obstacle};
use crate::error::EngineError;
use crate::render;
use crate::sprites::{ImageSlot, SpriteSheet};
use crate::surface::Surface;

/// Delta used for the first frame after (re)scheduling, when there is no
/// previous timestamp to diff against.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

pub struct Engine<S: Surface> {
    surface: S,
    config: GameConfig,
    state: GameState,
    rng: StdRng,
    sprites: SpriteSheet,
    debug_mode: bool,
    scheduled: bool,
    last_timestamp: Option<f64>,
    idle_frame: u64,
    on_game_over: Option<Box<dyn FnMut()>>,
}

impl<S: Surface> Engine<S> {
    /// Take ownership of `surface`.  Fails when the surface is degenerate or
    /// too short to hold the ground line and a standing player.
    pub fn new(surface: S, config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let (width, height) = surface.size();
        let min_height = config.ground_offset + config.player.height;
        if !(width > 0.0 && height > min_height) {
            return Err(EngineError::SurfaceUnavailable { width, height });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = compute::idle_state(&config, width, height);

        Ok(Self {
            surface,
            config,
            state,
            rng,
            sprites: SpriteSheet::pending(),
            debug_mode: false,
            scheduled: false,
            last_timestamp: None,
            idle_frame: 0,
            on_game_over: None,
        })
    }

    /// Register the game-over hook.  It fires once per run; read the final
    /// score through the queries.
    pub fn on_game_over(&mut self, callback: impl FnMut() + 'static) {
        self.on_game_over = Some(Box::new(callback));
    }

    /// Report the outcome of the host's sprite sheet load.
    pub fn set_sprite_image(&mut self, slot: ImageSlot) {
        self.sprites.slot = slot;
    }

    /// Seed the in-memory high score from the host's own storage.
    pub fn restore_high_score(&mut self, high_score: u32) {
        self.state.high_score = self.state.high_score.max(high_score);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Begin a new run from any state.  Only the high score carries over,
    /// including the score of a run abandoned without a game over.
    pub fn start(&mut self) {
        let (width, height) = (self.state.width, self.state.height);
        let high_score = self.state.high_score.max(self.state.score);
        self.state = compute::init_state(&self.config, width, height, high_score);
        self.scheduled = true;
        self.last_timestamp = None;
        info!(high_score = self.state.high_score, "run started");
    }

    /// Cancel tick scheduling.  State is left as-is for inspection.
    pub fn stop(&mut self) {
        self.scheduled = false;
        self.last_timestamp = None;
    }

    /// One host animation frame: update by the time since the previous
    /// frame, then draw.  Returns `false` without doing anything when the
    /// engine is not scheduled.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<bool, EngineError> {
        if !self.scheduled {
            return Ok(false);
        }
        let dt = match self.last_timestamp {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => NOMINAL_FRAME_MS,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.update(dt);
        self.draw()?;
        Ok(true)
    }

    /// Advance the simulation by one tick.  A paused or finished game does
    /// not move.
    pub fn update(&mut self, dt_ms: f64) {
        let was_running = self.state.status == GameStatus::Running;
        self.state = compute::tick(&self.state, &self.config, &mut self.rng, dt_ms);

        if was_running && self.state.status == GameStatus::GameOver {
            info!(
                score = self.state.score,
                high_score = self.state.high_score,
                frame = self.state.frame,
                "game over"
            );
            if let Some(callback) = self.on_game_over.as_mut() {
                callback();
            }
        }
    }

    pub fn draw(&mut self) -> Result<(), EngineError> {
        render::render(&mut self.surface, &self.state, &self.sprites, self.debug_mode)?;
        Ok(())
    }

    /// Idle animation shown before the first start.  No-op afterwards.
    pub fn draw_initial_state(&mut self) -> Result<(), EngineError> {
        if self.state.status != GameStatus::Idle {
            return Ok(());
        }
        self.idle_frame += 1;
        render::render_idle(&mut self.surface, &self.state, &self.sprites, self.idle_frame)?;
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Jump, or (re)start the game when it is not running.
    pub fn handle_jump(&mut self) {
        match self.state.status {
            GameStatus::Idle | GameStatus::GameOver => self.start(),
            GameStatus::Running => self.state = compute::jump(&self.state, &self.config),
            GameStatus::Paused => {}
        }
    }

    pub fn handle_shoot(&mut self) {
        self.state = compute::shoot(&self.state, &self.config);
    }

    pub fn handle_crouch(&mut self, pressed: bool) {
        self.state = compute::crouch(&self.state, pressed);
    }

    pub fn toggle_pause(&mut self) {
        self.state = compute::toggle_pause(&self.state);
    }

    pub fn activate_turbo(&mut self) {
        self.state = compute::activate_turbo(&self.state, &self.config);
    }

    pub fn toggle_debug_mode(&mut self) {
        self.debug_mode = !self.debug_mode;
    }

    /// Put an obstacle into the world as-is.  Used by scripted scenarios
    /// and replays; ignored unless a run is in progress.
    pub fn insert_obstacle(&mut self, obstacle: Obstacle) {
        if matches!(self.state.status, GameStatus::Running | GameStatus::Paused) {
            self.state.obstacles.push(obstacle);
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn is_game_started(&self) -> bool {
        self.state.is_started()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.status == GameStatus::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.state.status == GameStatus::Paused
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn has_weapon(&self) -> bool {
        self.state.player.has_weapon
    }

    pub fn is_crouching(&self) -> bool {
        self.state.player.crouching
    }

    pub fn is_turbo_active(&self) -> bool {
        self.state.turbo.is_active()
    }

    pub fn is_turbo_cooldown(&self) -> bool {
        self.state.turbo.is_cooldown()
    }

    /// Milliseconds left in the current turbo or cooldown phase.
    pub fn turbo_time_left(&self) -> u64 {
        self.state.turbo.time_left_ms()
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn game_speed(&self) -> f32 {
        self.state.game_speed
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
