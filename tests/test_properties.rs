use dino_runner::compute::*;
use dino_runner::config::GameConfig;
use dino_runner::entities::*;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f64 = 1000.0 / 60.0;

#[derive(Clone, Copy, Debug)]
enum Input {
    Nothing,
    Jump,
    CrouchDown,
    CrouchUp,
    Shoot,
    Turbo,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        4 => Just(Input::Nothing),
        2 => Just(Input::Jump),
        1 => Just(Input::CrouchDown),
        1 => Just(Input::CrouchUp),
        1 => Just(Input::Shoot),
        1 => Just(Input::Turbo),
    ]
}

fn apply(state: &GameState, config: &GameConfig, input: Input) -> GameState {
    match input {
        Input::Nothing => state.clone(),
        Input::Jump => jump(state, config),
        Input::CrouchDown => crouch(state, true),
        Input::CrouchUp => crouch(state, false),
        Input::Shoot => shoot(state, config),
        Input::Turbo => activate_turbo(state, config),
    }
}

proptest! {
    #[test]
    fn speed_is_monotonic_and_bounded(a in 0u32..5_000, b in 0u32..5_000) {
        let config = GameConfig::default();
        let (lo, hi) = (a.min(b), a.max(b));
        let idle = TurboState::Idle;
        let s_lo = game_speed(&config, lo, &idle);
        let s_hi = game_speed(&config, hi, &idle);
        prop_assert!(s_lo <= s_hi);
        prop_assert!(s_lo >= config.initial_speed);
        prop_assert!(s_hi <= config.max_speed);

        let boosted = game_speed(&config, lo, &TurboState::Active { remaining_ms: 1.0 });
        prop_assert!(boosted >= s_lo && boosted <= config.max_speed);
    }

    #[test]
    fn rect_overlap_is_symmetric(
        ax in -100f32..100.0, ay in -100f32..100.0, aw in 1f32..50.0, ah in 1f32..50.0,
        bx in -100f32..100.0, by in -100f32..100.0, bw in 1f32..50.0, bh in 1f32..50.0,
    ) {
        let a = Rect::new(ax, ay, aw, ah);
        let b = Rect::new(bx, by, bw, bh);
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn world_invariants_hold_under_any_input(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input(), 1..400),
    ) {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s = init_state(&config, 800.0, 300.0, 0);
        let floor = s.ground_y - s.player.height;

        for input in inputs {
            let before = s.score;
            s = tick(&apply(&s, &config, input), &config, &mut rng, DT);

            prop_assert!(s.player.y <= floor);
            if !s.player.jumping {
                prop_assert_eq!(s.player.y, floor);
            }
            prop_assert!(!(s.player.jumping && s.player.crouching));
            prop_assert!(s.score >= before);
            prop_assert!(s.game_speed >= config.initial_speed && s.game_speed <= config.max_speed);
            prop_assert!(s.bullets.len() <= config.max_bullets);
            prop_assert!(!(s.player.has_weapon && s.weapon.is_some()));
            for o in &s.obstacles {
                prop_assert!((1..=3).contains(&o.cluster));
                prop_assert_eq!(o.y + o.height, s.ground_y);
            }
            if s.status == GameStatus::GameOver {
                prop_assert!(s.high_score >= s.score);
                break;
            }
        }
    }
}
