use dino_runner::compute::*;
use dino_runner::config::{GameConfig, HeightBand};
use dino_runner::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f64 = 1000.0 / 60.0;

/// No random spawns and no score ticking unless a test turns them on.
fn quiet_config() -> GameConfig {
    GameConfig {
        obstacle_spawn_chance: 0.0,
        monster_spawn_chance: 0.0,
        score_interval: 1_000_000,
        ..GameConfig::default()
    }
}

fn make_state(config: &GameConfig) -> GameState {
    init_state(config, 800.0, 300.0, 0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn run_ticks(state: &GameState, config: &GameConfig, n: usize) -> GameState {
    let mut rng = seeded_rng();
    let mut s = state.clone();
    for _ in 0..n {
        s = tick(&s, config, &mut rng, DT);
    }
    s
}

fn obstacle_at(x: f32, s: &GameState) -> Obstacle {
    Obstacle {
        x,
        y: s.ground_y - 35.0,
        width: 17.0,
        height: 35.0,
        kind: ObstacleKind::Small,
        cluster: 1,
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_on_ground() {
    let config = GameConfig::default();
    let s = make_state(&config);
    assert_eq!(s.ground_y, 270.0); // height - ground_offset
    assert_eq!(s.player.x, 50.0);
    assert_eq!(s.player.y + s.player.height, s.ground_y);
    assert_eq!(s.player.velocity_y, 0.0);
    assert!(!s.player.jumping && !s.player.crouching && !s.player.has_weapon);
}

#[test]
fn init_state_empty_world_keeps_high_score() {
    let config = GameConfig::default();
    let s = init_state(&config, 800.0, 300.0, 77);
    assert!(s.obstacles.is_empty());
    assert!(s.monsters.is_empty());
    assert!(s.bullets.is_empty());
    assert!(s.weapon.is_none());
    assert_eq!(s.score, 0);
    assert_eq!(s.high_score, 77);
    assert_eq!(s.frame, 0);
    assert_eq!(s.game_speed, 7.0);
    assert_eq!(s.turbo, TurboState::Idle);
    assert_eq!(s.status, GameStatus::Running);
}

#[test]
fn idle_state_waits_for_start() {
    let config = GameConfig::default();
    let s = idle_state(&config, 800.0, 300.0);
    assert_eq!(s.status, GameStatus::Idle);
    assert!(!s.is_started());
    // Nothing moves before the first start
    let s2 = run_ticks(&s, &config, 10);
    assert_eq!(s2.frame, 0);
}

// ── game_speed ────────────────────────────────────────────────────────────────

#[test]
fn speed_scales_with_score_and_caps() {
    let config = GameConfig::default();
    let idle = TurboState::Idle;
    assert_eq!(game_speed(&config, 0, &idle), 7.0);
    assert_eq!(game_speed(&config, 500, &idle), 12.0);
    assert_eq!(game_speed(&config, 1000, &idle), 17.0);
    assert_eq!(game_speed(&config, 50_000, &idle), 17.0);
}

#[test]
fn turbo_boost_is_still_capped() {
    let config = GameConfig::default();
    let active = TurboState::Active { remaining_ms: 100.0 };
    assert_eq!(game_speed(&config, 0, &active), 10.5);
    assert_eq!(game_speed(&config, 1000, &active), 17.0);
    // Cooldown gives no boost
    let cooling = TurboState::Cooldown { remaining_ms: 100.0 };
    assert_eq!(game_speed(&config, 0, &cooling), 7.0);
}

// ── jump & physics ────────────────────────────────────────────────────────────

#[test]
fn jump_applies_impulse_once() {
    let config = quiet_config();
    let s = make_state(&config);
    let s2 = jump(&s, &config);
    assert!(s2.player.jumping);
    assert_eq!(s2.player.velocity_y, config.jump_velocity);

    // Already airborne: no second impulse
    let mut airborne = s2.clone();
    airborne.player.velocity_y = -3.0;
    let s3 = jump(&airborne, &config);
    assert_eq!(s3.player.velocity_y, -3.0);
}

#[test]
fn jump_ignored_while_crouching_or_not_running() {
    let config = quiet_config();
    let s = make_state(&config);

    let crouched = crouch(&s, true);
    assert!(!jump(&crouched, &config).player.jumping);

    let paused = toggle_pause(&s);
    assert!(!jump(&paused, &config).player.jumping);

    let mut over = s.clone();
    over.status = GameStatus::GameOver;
    assert!(!jump(&over, &config).player.jumping);
}

#[test]
fn jump_arc_rises_then_lands() {
    let config = quiet_config();
    let mut rng = seeded_rng();
    let mut s = jump(&make_state(&config), &config);
    let floor = s.ground_y - s.player.height;

    let mut peak = floor;
    let mut landed_after = None;
    for i in 1..=60 {
        s = tick(&s, &config, &mut rng, DT);
        assert!(s.player.y + s.player.height <= s.ground_y);
        peak = peak.min(s.player.y);
        if !s.player.jumping {
            landed_after = Some(i);
            break;
        }
    }
    let landed_after = landed_after.expect("player never landed");
    assert!((39..=41).contains(&landed_after));
    assert!(floor - peak > 100.0);
    assert_eq!(s.player.y, floor);
    assert_eq!(s.player.velocity_y, 0.0);
}

#[test]
fn physics_clamps_overshoot_to_ground() {
    let config = quiet_config();
    let s = make_state(&config);
    let falling = Player {
        y: s.ground_y - s.player.height - 1.0,
        velocity_y: 20.0,
        jumping: true,
        ..s.player.clone()
    };
    let landed = apply_physics(&falling, &config, s.ground_y);
    assert_eq!(landed.y, s.ground_y - s.player.height);
    assert_eq!(landed.velocity_y, 0.0);
    assert!(!landed.jumping);
}

// ── crouch ────────────────────────────────────────────────────────────────────

#[test]
fn crouch_only_when_grounded() {
    let config = quiet_config();
    let s = make_state(&config);
    assert!(crouch(&s, true).player.crouching);

    let airborne = jump(&s, &config);
    assert!(!crouch(&airborne, true).player.crouching);
}

#[test]
fn crouch_release_always_stands() {
    let config = quiet_config();
    let s = crouch(&make_state(&config), true);
    assert!(!crouch(&s, false).player.crouching);
}

#[test]
fn crouch_does_not_move_player_or_change_score() {
    let config = GameConfig {
        score_interval: 6,
        ..quiet_config()
    };
    let standing = run_ticks(&make_state(&config), &config, 60);
    let crouching = run_ticks(&crouch(&make_state(&config), true), &config, 60);
    assert_eq!(standing.score, crouching.score);
    assert_eq!(standing.player.x, crouching.player.x);
    assert_eq!(standing.player.y, crouching.player.y);
}

// ── scoring & difficulty over time ────────────────────────────────────────────

#[test]
fn score_cadence_six_hundred_ticks() {
    let config = GameConfig {
        score_interval: 6,
        score_increment: 1,
        ..quiet_config()
    };
    let s = run_ticks(&make_state(&config), &config, 600);
    assert_eq!(s.frame, 600);
    assert_eq!(s.score, 100);
    assert_eq!(s.game_speed, 8.0);
    assert_eq!(s.status, GameStatus::Running);
}

#[test]
fn tick_does_nothing_unless_running() {
    let config = quiet_config();
    let mut rng = seeded_rng();
    let paused = toggle_pause(&make_state(&config));
    let s2 = tick(&paused, &config, &mut rng, DT);
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.status, GameStatus::Paused);

    let resumed = toggle_pause(&s2);
    assert_eq!(resumed.status, GameStatus::Running);
}

// ── movement & pruning ────────────────────────────────────────────────────────

#[test]
fn obstacles_move_at_game_speed_and_are_pruned() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.obstacles.push(obstacle_at(400.0, &s));
    s.obstacles.push(obstacle_at(-10.0, &s)); // right edge at 7 → gone after one tick

    let s2 = run_ticks(&s, &config, 1);
    assert_eq!(s2.obstacles.len(), 1);
    assert_eq!(s2.obstacles[0].x, 400.0 - 7.0);
}

#[test]
fn monsters_use_their_own_speed() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.monsters.push(Monster { x: 500.0, y: 100.0, width: 46.0, height: 30.0, speed: 3.0 });
    let s2 = run_ticks(&s, &config, 2);
    assert_eq!(s2.monsters[0].x, 494.0);
}

#[test]
fn bullets_fly_right_and_leave_the_surface() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.bullets.push(Bullet { x: 100.0, y: 50.0, width: 12.0, height: 4.0, speed: 14.0 });
    s.bullets.push(Bullet { x: 790.0, y: 50.0, width: 12.0, height: 4.0, speed: 14.0 });
    let s2 = run_ticks(&s, &config, 1);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].x, 114.0);
}

#[test]
fn weapon_leaving_screen_is_removed() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.weapon = Some(Weapon { x: -25.0, y: 245.0, width: 30.0, height: 20.0, visible: true });
    let s2 = run_ticks(&s, &config, 1);
    assert!(s2.weapon.is_none());
}

// ── spawner ───────────────────────────────────────────────────────────────────

#[test]
fn obstacle_spawns_at_right_edge_on_ground() {
    let config = GameConfig {
        obstacle_spawn_interval: 1,
        obstacle_spawn_chance: 1.0,
        ..quiet_config()
    };
    let s = run_ticks(&make_state(&config), &config, 1);
    assert_eq!(s.obstacles.len(), 1);
    let o = &s.obstacles[0];
    assert_eq!(o.x, 800.0);
    assert!((1..=3).contains(&o.cluster));
    let base = match o.kind {
        ObstacleKind::Small => config.small_obstacle,
        ObstacleKind::Large => config.large_obstacle,
    };
    assert_eq!(o.width, base.width * o.cluster as f32);
    assert_eq!(o.y + o.height, s.ground_y);
}

#[test]
fn obstacles_only_on_interval() {
    let config = GameConfig {
        obstacle_spawn_interval: 50,
        obstacle_spawn_chance: 1.0,
        ..quiet_config()
    };
    let s = run_ticks(&make_state(&config), &config, 49);
    assert!(s.obstacles.is_empty());
    let s = run_ticks(&s, &config, 1);
    assert_eq!(s.obstacles.len(), 1);
}

#[test]
fn spawn_obstacle_covers_both_kinds_and_all_clusters() {
    let config = GameConfig::default();
    let s = make_state(&config);
    let mut rng = seeded_rng();
    let spawned: Vec<Obstacle> = (0..200).map(|_| spawn_obstacle(&config, &s, &mut rng)).collect();
    assert!(spawned.iter().any(|o| o.kind == ObstacleKind::Small));
    assert!(spawned.iter().any(|o| o.kind == ObstacleKind::Large));
    for cluster in 1..=3u8 {
        assert!(spawned.iter().any(|o| o.cluster == cluster));
    }
    let small = spawned.iter().filter(|o| o.kind == ObstacleKind::Small).count();
    assert!(small > 100, "small obstacles should dominate, got {small}");
}

#[test]
fn monsters_wait_for_score_threshold() {
    let config = GameConfig {
        monster_spawn_interval: 1,
        monster_spawn_chance: 1.0,
        ..quiet_config()
    };
    let mut s = make_state(&config);
    s.score = config.monster_score_threshold;
    assert!(run_ticks(&s, &config, 5).monsters.is_empty());

    s.score = config.monster_score_threshold + 1;
    assert_eq!(run_ticks(&s, &config, 1).monsters.len(), 1);
}

#[test]
fn monster_height_and_speed_follow_config() {
    let config = GameConfig {
        monster_spawn_interval: 1,
        monster_spawn_chance: 1.0,
        monster_score_threshold: 0,
        monster_bands: vec![HeightBand { min_clearance: 80.0, max_clearance: 80.0 }],
        ..quiet_config()
    };
    let mut s = make_state(&config);
    s.score = 100; // speed 8
    let s2 = run_ticks(&s, &config, 1);
    let m = &s2.monsters[0];
    assert_eq!(m.x, 800.0);
    assert_eq!(m.y + m.height, s.ground_y - 80.0);
    assert_eq!(m.speed, 8.0 * config.monster_speed_factor);
}

#[test]
fn simultaneous_spawns_are_independent() {
    let config = GameConfig {
        obstacle_spawn_interval: 1,
        obstacle_spawn_chance: 1.0,
        monster_spawn_interval: 1,
        monster_spawn_chance: 1.0,
        monster_score_threshold: 0,
        ..quiet_config()
    };
    let mut s = make_state(&config);
    s.score = config.weapon_score_threshold;
    let s2 = run_ticks(&s, &config, 1);
    assert_eq!(s2.obstacles.len(), 1);
    assert_eq!(s2.monsters.len(), 1);
    assert!(s2.weapon.is_some());
}

#[test]
fn weapon_spawn_gating() {
    let config = quiet_config();
    let mut s = make_state(&config);

    s.score = config.weapon_score_threshold - 1;
    assert!(run_ticks(&s, &config, 1).weapon.is_none());

    s.score = config.weapon_score_threshold;
    let s2 = run_ticks(&s, &config, 1);
    let w = s2.weapon.as_ref().expect("weapon should spawn");
    assert!(w.visible);
    assert_eq!(w.x, 800.0);

    // Never duplicated: the existing one just keeps moving
    let s3 = run_ticks(&s2, &config, 1);
    assert_eq!(s3.weapon.as_ref().map(|w| w.x), Some(800.0 - s3.game_speed));

    // Already armed: nothing spawns
    let mut armed = s.clone();
    armed.player.has_weapon = true;
    assert!(run_ticks(&armed, &config, 1).weapon.is_none());
}

// ── collisions ────────────────────────────────────────────────────────────────

#[test]
fn obstacle_hit_ends_the_run() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.score = 12;
    s.high_score = 5;
    s.obstacles.push(obstacle_at(60.0, &s));

    let s2 = run_ticks(&s, &config, 1);
    assert_eq!(s2.status, GameStatus::GameOver);
    assert_eq!(s2.high_score, 12);
    assert_eq!(s2.frame, 1);

    // Frozen afterwards
    let s3 = run_ticks(&s2, &config, 10);
    assert_eq!(s3.frame, 1);
    assert_eq!(s3.obstacles, s2.obstacles);
}

#[test]
fn lower_score_keeps_previous_high_score() {
    let config = quiet_config();
    let mut s = init_state(&config, 800.0, 300.0, 500);
    s.obstacles.push(obstacle_at(60.0, &s));
    let s2 = run_ticks(&s, &config, 1);
    assert_eq!(s2.status, GameStatus::GameOver);
    assert_eq!(s2.high_score, 500);
}

#[test]
fn crouching_passes_under_low_monster() {
    let config = quiet_config();
    let mut s = make_state(&config);
    // Underside 35px above the ground: between crouched and standing head
    s.monsters.push(Monster {
        x: 50.0,
        y: s.ground_y - 35.0 - 30.0,
        width: 46.0,
        height: 30.0,
        speed: 0.0,
    });

    assert_eq!(run_ticks(&s, &config, 1).status, GameStatus::GameOver);
    assert_eq!(run_ticks(&crouch(&s, true), &config, 1).status, GameStatus::Running);
}

#[test]
fn high_monster_only_hits_jumping_player() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.monsters.push(Monster {
        x: 50.0,
        y: s.ground_y - 80.0 - 30.0,
        width: 46.0,
        height: 30.0,
        speed: 0.0,
    });
    assert_eq!(run_ticks(&s, &config, 5).status, GameStatus::Running);
    assert_eq!(run_ticks(&jump(&s, &config), &config, 5).status, GameStatus::GameOver);
}

#[test]
fn bullet_monster_exchange() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.monsters.push(Monster { x: 300.0, y: 100.0, width: 46.0, height: 30.0, speed: 5.0 });
    s.bullets.push(Bullet { x: 300.0, y: 110.0, width: 12.0, height: 4.0, speed: 14.0 });

    let s2 = run_ticks(&s, &config, 1);
    assert!(s2.monsters.is_empty());
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.score, config.monster_score);
    assert_eq!(s2.status, GameStatus::Running);
}

#[test]
fn bullet_destroys_only_first_monster() {
    let config = quiet_config();
    let mut s = make_state(&config);
    for _ in 0..2 {
        s.monsters.push(Monster { x: 300.0, y: 100.0, width: 46.0, height: 30.0, speed: 0.0 });
    }
    s.bullets.push(Bullet { x: 300.0, y: 110.0, width: 12.0, height: 4.0, speed: 0.0 });

    let s2 = run_ticks(&s, &config, 1);
    assert_eq!(s2.monsters.len(), 1);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.score, 20);
}

#[test]
fn two_bullets_one_monster_spends_one_bullet() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.monsters.push(Monster { x: 300.0, y: 100.0, width: 46.0, height: 30.0, speed: 0.0 });
    for _ in 0..2 {
        s.bullets.push(Bullet { x: 300.0, y: 110.0, width: 12.0, height: 4.0, speed: 0.0 });
    }
    let s2 = run_ticks(&s, &config, 1);
    assert!(s2.monsters.is_empty());
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.score, 20);
}

#[test]
fn weapon_pickup_arms_player() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.weapon = Some(Weapon { x: 60.0, y: s.ground_y - 25.0, width: 30.0, height: 20.0, visible: true });
    let s2 = run_ticks(&s, &config, 1);
    assert!(s2.player.has_weapon);
    assert!(s2.weapon.is_none());
}

// ── shooting ──────────────────────────────────────────────────────────────────

#[test]
fn shoot_needs_a_weapon() {
    let config = quiet_config();
    let s = make_state(&config);
    assert!(shoot(&s, &config).bullets.is_empty());
}

#[test]
fn shoot_spawns_bullet_at_front_edge() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.player.has_weapon = true;
    let s2 = shoot(&s, &config);
    assert_eq!(s2.bullets.len(), 1);
    let b = &s2.bullets[0];
    assert_eq!(b.x, s.player.x + s.player.width);
    assert_eq!(b.y, s.player.y + s.player.height / 3.0);
    assert_eq!(b.speed, config.bullet_speed);
    // Weapon is not consumed
    assert!(s2.player.has_weapon);
}

#[test]
fn shoot_cap_at_max_bullets() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.player.has_weapon = true;
    for _ in 0..config.max_bullets {
        s = shoot(&s, &config);
    }
    assert_eq!(s.bullets.len(), config.max_bullets);
    assert_eq!(shoot(&s, &config).bullets.len(), config.max_bullets);
}

#[test]
fn shoot_ignored_after_game_over() {
    let config = quiet_config();
    let mut s = make_state(&config);
    s.player.has_weapon = true;
    s.status = GameStatus::GameOver;
    assert!(shoot(&s, &config).bullets.is_empty());
}

// ── turbo ─────────────────────────────────────────────────────────────────────

#[test]
fn turbo_activation_boosts_speed() {
    let config = quiet_config();
    let s = activate_turbo(&make_state(&config), &config);
    assert!(s.turbo.is_active());
    assert_eq!(s.turbo.time_left_ms(), 5000);
    assert_eq!(s.game_speed, 10.5);
}

#[test]
fn turbo_activation_is_exclusive() {
    let config = quiet_config();
    let active = TurboState::Active { remaining_ms: 1200.0 };
    let cooling = TurboState::Cooldown { remaining_ms: 3400.0 };
    for turbo in [active, cooling] {
        let s = GameState { turbo, ..make_state(&config) };
        assert_eq!(activate_turbo(&s, &config).turbo, turbo);
    }
}

#[test]
fn turbo_requires_running_game() {
    let config = quiet_config();
    let paused = toggle_pause(&make_state(&config));
    assert_eq!(activate_turbo(&paused, &config).turbo, TurboState::Idle);
}

#[test]
fn turbo_phases_follow_elapsed_time() {
    let config = quiet_config();
    let t = TurboState::Active { remaining_ms: config.turbo_duration_ms };

    let t = advance_turbo(&t, &config, 4000.0);
    assert_eq!(t, TurboState::Active { remaining_ms: 1000.0 });

    let t = advance_turbo(&t, &config, 1000.0);
    assert_eq!(t, TurboState::Cooldown { remaining_ms: config.turbo_cooldown_ms });

    let t = advance_turbo(&t, &config, 9999.0);
    assert!(t.is_cooldown());
    assert_eq!(t.time_left_ms(), 1);

    assert_eq!(advance_turbo(&t, &config, 5.0), TurboState::Idle);
}

#[test]
fn tick_drives_turbo_with_irregular_deltas() {
    let config = quiet_config();
    let mut rng = seeded_rng();
    let mut s = activate_turbo(&make_state(&config), &config);
    for dt in [100.0, 2500.0, 16.0, 1384.0] {
        s = tick(&s, &config, &mut rng, dt);
    }
    assert_eq!(s.turbo.time_left_ms(), 1000);
    assert_eq!(s.game_speed, 10.5);

    s = tick(&s, &config, &mut rng, 1000.0);
    assert!(s.turbo.is_cooldown());
    assert_eq!(s.game_speed, 7.0);
}

// ── debug boxes ───────────────────────────────────────────────────────────────

#[test]
fn hitboxes_use_crouch_adjusted_player() {
    let config = quiet_config();
    let mut s = crouch(&make_state(&config), true);
    s.obstacles.push(obstacle_at(400.0, &s));
    let boxes = hitboxes(&s);
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0], s.player.hitbox());
    assert!(boxes[0].h < s.player.height);
    assert_eq!(boxes[1], s.obstacles[0].hitbox());
}
