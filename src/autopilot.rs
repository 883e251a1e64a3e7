//! A simple reflex bot for headless smoke runs.
//!
//! It looks a fixed number of ticks ahead: jump over anything on the ground,
//! duck under monsters that would hit a standing player, shoot monsters when
//! armed, and fire turbo whenever it is ready.

use crate::entities::{GameState, GameStatus, Hitbox, Rect};

/// Ticks of look-ahead when deciding to jump.
const JUMP_LEAD_TICKS: f32 = 10.0;
/// Ticks of look-ahead when deciding to duck.
const DUCK_LEAD_TICKS: f32 = 12.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    pub jump: bool,
    pub crouch: bool,
    pub shoot: bool,
    pub turbo: bool,
}

fn approaching(player: &Rect, hazard: &Rect, closing_speed: f32, lead: f32) -> bool {
    let gap = hazard.x - player.right();
    hazard.right() > player.x && gap <= closing_speed * lead
}

pub fn decide(state: &GameState) -> Decision {
    if state.status != GameStatus::Running {
        return Decision::default();
    }
    let player = state.player.bounds();

    let obstacle_near = state
        .obstacles
        .iter()
        .any(|o| approaching(&player, &o.hitbox(), state.game_speed, JUMP_LEAD_TICKS));

    // Monsters whose underside sits below a standing player's head
    let low_monster_near = state.monsters.iter().any(|m| {
        let b = m.hitbox();
        b.bottom() > player.y && approaching(&player, &b, m.speed, DUCK_LEAD_TICKS)
    });

    Decision {
        jump: obstacle_near && !state.player.jumping,
        crouch: low_monster_near && !obstacle_near,
        shoot: state.player.has_weapon && !state.monsters.is_empty(),
        turbo: state.turbo.time_left_ms() == 0 && state.score > 50,
    }
}
