//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the config and, where needed, an RNG handle) and returns
//! a brand-new `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;
use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::entities::{
    overlaps, Bullet, GameState, GameStatus, Hitbox, Monster, Obstacle, ObstacleKind, Player,
    Rect, TurboState, Weapon,
};

// ── Difficulty ────────────────────────────────────────────────────────────────

/// Forward speed for a given score, clamped to `[initial_speed, max_speed]`.
pub fn game_speed(config: &GameConfig, score: u32, turbo: &TurboState) -> f32 {
    let base = config.initial_speed + score as f32 / 100.0;
    let boosted = if turbo.is_active() {
        base * config.turbo_speed_factor
    } else {
        base
    };
    boosted.clamp(config.initial_speed, config.max_speed)
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build a fresh run on a `width` x `height` surface.  Only `high_score`
/// survives from the previous run.
pub fn init_state(config: &GameConfig, width: f32, height: f32, high_score: u32) -> GameState {
    let ground_y = height - config.ground_offset;
    GameState {
        player: Player {
            x: config.player_x,
            y: ground_y - config.player.height,
            width: config.player.width,
            height: config.player.height,
            crouch_height: config.player.height * config.crouch_height_factor,
            velocity_y: 0.0,
            jumping: false,
            crouching: false,
            has_weapon: false,
        },
        obstacles: Vec::new(),
        monsters: Vec::new(),
        weapon: None,
        bullets: Vec::new(),
        score: 0,
        high_score,
        game_speed: config.initial_speed,
        turbo: TurboState::Idle,
        status: GameStatus::Running,
        frame: 0,
        width,
        height,
        ground_y,
    }
}

/// Same layout as a new run, but waiting for the first start.
pub fn idle_state(config: &GameConfig, width: f32, height: f32) -> GameState {
    GameState {
        status: GameStatus::Idle,
        ..init_state(config, width, height, 0)
    }
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Launch the player.  Ignored unless running, grounded and standing.
pub fn jump(state: &GameState, config: &GameConfig) -> GameState {
    let p = &state.player;
    if state.status != GameStatus::Running || p.jumping || p.crouching {
        return state.clone();
    }
    GameState {
        player: Player {
            velocity_y: config.jump_velocity,
            jumping: true,
            ..p.clone()
        },
        ..state.clone()
    }
}

/// Crouch only takes effect on the ground; releasing always stands up.
pub fn crouch(state: &GameState, pressed: bool) -> GameState {
    let p = &state.player;
    let crouching = if pressed {
        p.crouching || (state.status == GameStatus::Running && !p.jumping)
    } else {
        false
    };
    GameState {
        player: Player {
            crouching,
            ..p.clone()
        },
        ..state.clone()
    }
}

/// Fire from the player's front edge — needs a weapon, capped at
/// `max_bullets` in flight.
pub fn shoot(state: &GameState, config: &GameConfig) -> GameState {
    let p = &state.player;
    if state.status != GameStatus::Running
        || !p.has_weapon
        || state.bullets.len() >= config.max_bullets
    {
        return state.clone();
    }
    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        x: p.x + p.width,
        y: p.y + p.height / 3.0,
        width: config.bullet.width,
        height: config.bullet.height,
        speed: config.bullet_speed,
    });
    GameState {
        bullets,
        ..state.clone()
    }
}

pub fn activate_turbo(state: &GameState, config: &GameConfig) -> GameState {
    if state.status != GameStatus::Running || state.turbo != TurboState::Idle {
        return state.clone();
    }
    debug!("turbo active for {}ms", config.turbo_duration_ms);
    let turbo = TurboState::Active {
        remaining_ms: config.turbo_duration_ms,
    };
    GameState {
        turbo,
        game_speed: game_speed(config, state.score, &turbo),
        ..state.clone()
    }
}

/// Running ↔ Paused.  Any other status is left alone.
pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Running => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Running,
        other => other,
    };
    GameState {
        status,
        ..state.clone()
    }
}

// ── Subsystem steps ───────────────────────────────────────────────────────────

/// Count the current turbo phase down by `dt_ms`.
pub fn advance_turbo(turbo: &TurboState, config: &GameConfig, dt_ms: f64) -> TurboState {
    match *turbo {
        TurboState::Idle => TurboState::Idle,
        TurboState::Active { remaining_ms } => {
            let left = remaining_ms - dt_ms;
            if left > 0.0 {
                TurboState::Active { remaining_ms: left }
            } else {
                debug!("turbo expired, cooling down for {}ms", config.turbo_cooldown_ms);
                TurboState::Cooldown {
                    remaining_ms: config.turbo_cooldown_ms,
                }
            }
        }
        TurboState::Cooldown { remaining_ms } => {
            let left = remaining_ms - dt_ms;
            if left > 0.0 {
                TurboState::Cooldown { remaining_ms: left }
            } else {
                debug!("turbo ready");
                TurboState::Idle
            }
        }
    }
}

/// Gravity, integration and the ground clamp.
pub fn apply_physics(player: &Player, config: &GameConfig, ground_y: f32) -> Player {
    let velocity_y = player.velocity_y + config.gravity;
    let y = player.y + velocity_y;
    let floor = ground_y - player.height;
    if y >= floor {
        Player {
            y: floor,
            velocity_y: 0.0,
            jumping: false,
            ..player.clone()
        }
    } else {
        Player {
            y,
            velocity_y,
            ..player.clone()
        }
    }
}

pub fn spawn_obstacle(config: &GameConfig, state: &GameState, rng: &mut impl Rng) -> Obstacle {
    let kind = if rng.gen_bool(config.small_obstacle_weight) {
        ObstacleKind::Small
    } else {
        ObstacleKind::Large
    };
    let base = match kind {
        ObstacleKind::Small => config.small_obstacle,
        ObstacleKind::Large => config.large_obstacle,
    };
    let cluster: u8 = rng.gen_range(1..=3);
    Obstacle {
        x: state.width,
        y: state.ground_y - base.height,
        width: base.width * cluster as f32,
        height: base.height,
        kind,
        cluster,
    }
}

pub fn spawn_monster(
    config: &GameConfig,
    state: &GameState,
    game_speed: f32,
    rng: &mut impl Rng,
) -> Monster {
    let band = config.monster_bands[rng.gen_range(0..config.monster_bands.len())];
    let clearance = rng.gen_range(band.min_clearance..=band.max_clearance);
    Monster {
        x: state.width,
        y: state.ground_y - clearance - config.monster.height,
        width: config.monster.width,
        height: config.monster.height,
        speed: game_speed * config.monster_speed_factor,
    }
}

pub fn spawn_weapon(config: &GameConfig, state: &GameState) -> Weapon {
    Weapon {
        x: state.width,
        y: state.ground_y - config.weapon_clearance - config.weapon.height,
        width: config.weapon.width,
        height: config.weapon.height,
        visible: true,
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by one tick of `dt_ms` wall-clock milliseconds.
/// Anything but a running game comes back unchanged.
///
/// Physics, spawning and scoring are per tick; only the turbo timers use
/// `dt_ms`.  All randomness comes through `rng` so callers control
/// determinism.
pub fn tick(
    state: &GameState,
    config: &GameConfig,
    rng: &mut impl Rng,
    dt_ms: f64,
) -> GameState {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    let frame = state.frame + 1;

    // ── 1. Score cadence & difficulty ───────────────────────────────────────
    let mut score = if frame % config.score_interval == 0 {
        state.score + config.score_increment
    } else {
        state.score
    };
    let turbo = advance_turbo(&state.turbo, config, dt_ms.max(0.0));
    let speed = game_speed(config, score, &turbo);

    // ── 2. Player physics ───────────────────────────────────────────────────
    let mut player = apply_physics(&state.player, config, state.ground_y);

    // ── 3. Move & prune ─────────────────────────────────────────────────────
    let mut obstacles: Vec<Obstacle> = state
        .obstacles
        .iter()
        .map(|o| Obstacle { x: o.x - speed, ..o.clone() })
        .filter(|o| o.x + o.width > 0.0)
        .collect();

    let mut monsters: Vec<Monster> = state
        .monsters
        .iter()
        .map(|m| Monster { x: m.x - m.speed, ..m.clone() })
        .filter(|m| m.x + m.width > 0.0)
        .collect();

    let mut weapon = state
        .weapon
        .as_ref()
        .map(|w| Weapon { x: w.x - speed, ..w.clone() })
        .filter(|w| w.x + w.width > 0.0);

    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .map(|b| Bullet { x: b.x + b.speed, ..b.clone() })
        .filter(|b| b.x < state.width)
        .collect();

    // ── 4. Spawn ────────────────────────────────────────────────────────────
    if frame % config.obstacle_spawn_interval == 0 && rng.gen_bool(config.obstacle_spawn_chance) {
        let obstacle = spawn_obstacle(config, state, rng);
        debug!(kind = ?obstacle.kind, cluster = obstacle.cluster, "spawned obstacle");
        obstacles.push(obstacle);
    }

    if score > config.monster_score_threshold
        && frame % config.monster_spawn_interval == 0
        && rng.gen_bool(config.monster_spawn_chance)
    {
        let monster = spawn_monster(config, state, speed, rng);
        debug!(y = monster.y, speed = monster.speed, "spawned monster");
        monsters.push(monster);
    }

    if weapon.is_none() && !player.has_weapon && score >= config.weapon_score_threshold {
        debug!(score, "spawned weapon");
        weapon = Some(spawn_weapon(config, state));
    }

    // ── 5. Collision: player ↔ hazards ──────────────────────────────────────
    let player_hit = obstacles.iter().any(|o| overlaps(&player, o))
        || monsters.iter().any(|m| overlaps(&player, m));

    if player_hit {
        return GameState {
            player,
            obstacles,
            monsters,
            weapon,
            bullets,
            score,
            high_score: state.high_score.max(score),
            game_speed: speed,
            turbo,
            status: GameStatus::GameOver,
            frame,
            ..state.clone()
        };
    }

    // ── 6. Collision: bullets ↔ monsters ────────────────────────────────────
    let mut killed_monsters: Vec<usize> = Vec::new();
    let mut used_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        // First overlapping monster only
        if let Some(mi) = monsters
            .iter()
            .enumerate()
            .position(|(mi, m)| !killed_monsters.contains(&mi) && overlaps(bullet, m))
        {
            killed_monsters.push(mi);
            used_bullets.push(bi);
        }
    }

    score += config.monster_score * killed_monsters.len() as u32;

    let monsters: Vec<Monster> = monsters
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !killed_monsters.contains(i))
        .map(|(_, m)| m)
        .collect();

    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b)
        .collect();

    // ── 7. Collision: player ↔ weapon pickup ────────────────────────────────
    if let Some(w) = &weapon {
        if w.visible && overlaps(&player, w) {
            debug!("weapon picked up");
            player.has_weapon = true;
            weapon = None;
        }
    }

    trace!(frame, score, speed, "tick");

    GameState {
        player,
        obstacles,
        monsters,
        weapon,
        bullets,
        score,
        game_speed: game_speed(config, score, &turbo),
        turbo,
        frame,
        ..state.clone()
    }
}

/// Every collision box that the debug overlay outlines.
pub fn hitboxes(state: &GameState) -> Vec<Rect> {
    state.entities().map(|e| e.hitbox()).collect()
}
