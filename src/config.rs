//! Tunable game constants.
//!
//! Everything the simulation reads lives in [`GameConfig`].  The defaults are
//! the shipped balance; a JSON file can override any subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const SURFACE_WIDTH: f32 = 800.0;
pub const SURFACE_HEIGHT: f32 = 300.0;

pub const GRAVITY: f32 = 0.6;
pub const JUMP_VELOCITY: f32 = -12.0;

pub const INITIAL_SPEED: f32 = 7.0;
pub const MAX_SPEED: f32 = 17.0;

pub const SCORE_INTERVAL: u64 = 6;
pub const SCORE_INCREMENT: u32 = 1;
pub const MONSTER_SCORE: u32 = 20;
pub const WEAPON_SCORE_THRESHOLD: u32 = 400;
pub const MONSTER_SCORE_THRESHOLD: u32 = 200;

/// Collision height kept while crouching (40% reduction).
pub const CROUCH_HEIGHT_FACTOR: f32 = 0.6;

pub const TURBO_DURATION_MS: f64 = 5_000.0;
pub const TURBO_COOLDOWN_MS: f64 = 10_000.0;
pub const TURBO_SPEED_FACTOR: f32 = 1.5;

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Range of gaps between the ground and a monster's underside.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightBand {
    pub min_clearance: f32,
    pub max_clearance: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Logical surface size the host should allocate.
    pub surface: Size,
    /// Distance from the bottom of the surface to the ground line.
    pub ground_offset: f32,

    pub player_x: f32,
    pub player: Size,
    pub crouch_height_factor: f32,
    pub gravity: f32,
    pub jump_velocity: f32,

    pub initial_speed: f32,
    pub max_speed: f32,

    pub score_interval: u64,
    pub score_increment: u32,
    pub monster_score: u32,

    pub obstacle_spawn_interval: u64,
    pub obstacle_spawn_chance: f64,
    /// Probability that a spawned obstacle is the small kind.
    pub small_obstacle_weight: f64,
    pub small_obstacle: Size,
    pub large_obstacle: Size,

    pub monster_score_threshold: u32,
    pub monster_spawn_interval: u64,
    pub monster_spawn_chance: f64,
    pub monster_speed_factor: f32,
    pub monster: Size,
    pub monster_bands: Vec<HeightBand>,

    pub weapon_score_threshold: u32,
    pub weapon: Size,
    pub weapon_clearance: f32,

    pub bullet: Size,
    pub bullet_speed: f32,
    pub max_bullets: usize,

    pub turbo_duration_ms: f64,
    pub turbo_cooldown_ms: f64,
    pub turbo_speed_factor: f32,

    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            surface: Size::new(SURFACE_WIDTH, SURFACE_HEIGHT),
            ground_offset: 30.0,
            player_x: 50.0,
            player: Size::new(44.0, 47.0),
            crouch_height_factor: CROUCH_HEIGHT_FACTOR,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            initial_speed: INITIAL_SPEED,
            max_speed: MAX_SPEED,
            score_interval: SCORE_INTERVAL,
            score_increment: SCORE_INCREMENT,
            monster_score: MONSTER_SCORE,
            obstacle_spawn_interval: 50,
            obstacle_spawn_chance: 0.6,
            small_obstacle_weight: 0.7,
            small_obstacle: Size::new(17.0, 35.0),
            large_obstacle: Size::new(25.0, 50.0),
            monster_score_threshold: MONSTER_SCORE_THRESHOLD,
            monster_spawn_interval: 120,
            monster_spawn_chance: 0.5,
            monster_speed_factor: 0.75,
            monster: Size::new(46.0, 30.0),
            // Low band: a standing player is hit, a crouching one passes.
            // High band: only a jump reaches it.
            monster_bands: vec![
                HeightBand { min_clearance: 32.0, max_clearance: 42.0 },
                HeightBand { min_clearance: 70.0, max_clearance: 90.0 },
            ],
            weapon_score_threshold: WEAPON_SCORE_THRESHOLD,
            weapon: Size::new(30.0, 20.0),
            weapon_clearance: 5.0,
            bullet: Size::new(12.0, 4.0),
            bullet_speed: 14.0,
            max_bullets: 3,
            turbo_duration_ms: TURBO_DURATION_MS,
            turbo_cooldown_ms: TURBO_COOLDOWN_MS,
            turbo_speed_factor: TURBO_SPEED_FACTOR,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Read a JSON config; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.into()))
        }

        let sizes = [
            ("surface", self.surface),
            ("player", self.player),
            ("small_obstacle", self.small_obstacle),
            ("large_obstacle", self.large_obstacle),
            ("monster", self.monster),
            ("weapon", self.weapon),
            ("bullet", self.bullet),
        ];
        for (name, size) in sizes {
            if !(size.width > 0.0 && size.height > 0.0) {
                return invalid(format!("{name} size must be positive"));
            }
        }

        if self.ground_offset < 0.0 || self.player_x < 0.0 {
            return invalid("ground_offset and player_x must not be negative");
        }
        if !(self.initial_speed > 0.0 && self.initial_speed <= self.max_speed) {
            return invalid("initial_speed must be in (0, max_speed]");
        }
        if self.gravity <= 0.0 || self.jump_velocity >= 0.0 {
            return invalid("gravity must be positive and jump_velocity negative");
        }
        if !(self.crouch_height_factor > 0.0 && self.crouch_height_factor <= 1.0) {
            return invalid("crouch_height_factor must be in (0, 1]");
        }
        if self.score_interval == 0
            || self.obstacle_spawn_interval == 0
            || self.monster_spawn_interval == 0
        {
            return invalid("tick intervals must be non-zero");
        }
        for (name, p) in [
            ("obstacle_spawn_chance", self.obstacle_spawn_chance),
            ("monster_spawn_chance", self.monster_spawn_chance),
            ("small_obstacle_weight", self.small_obstacle_weight),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be a probability"));
            }
        }
        if self.monster_bands.is_empty() {
            return invalid("at least one monster height band is required");
        }
        if self
            .monster_bands
            .iter()
            .any(|b| b.min_clearance < 0.0 || b.min_clearance > b.max_clearance)
        {
            return invalid("monster bands need 0 <= min_clearance <= max_clearance");
        }
        if self.bullet_speed <= 0.0 || self.monster_speed_factor <= 0.0 {
            return invalid("bullet_speed and monster_speed_factor must be positive");
        }
        if self.turbo_duration_ms <= 0.0
            || self.turbo_cooldown_ms < 0.0
            || self.turbo_speed_factor < 1.0
        {
            return invalid("turbo needs a positive duration and a factor >= 1");
        }
        Ok(())
    }
}
