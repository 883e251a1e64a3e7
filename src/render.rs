//! Rendering layer — all drawing lives here.
//!
//! Each function receives the target surface and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into draw calls.

use std::io;

use crossterm::style::Color;

use crate::entities::{EntityRef, GameState, GameStatus, Hitbox, Player, Rect, TurboState};
use crate::sprites::SpriteSheet;
use crate::surface::{Surface, TextAlign};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::White;
const C_HUD_HIGH: Color = Color::Grey;
const C_TURBO_ACTIVE: Color = Color::Yellow;
const C_TURBO_COOLDOWN: Color = Color::DarkYellow;
const C_WEAPON_TAG: Color = Color::Cyan;
const C_OVERLAY_TITLE: Color = Color::Red;
const C_OVERLAY_TEXT: Color = Color::White;
const C_DEBUG_PLAYER: Color = Color::Green;
const C_DEBUG_HAZARD: Color = Color::Red;
const C_DEBUG_PICKUP: Color = Color::Cyan;
const C_DEBUG_BULLET: Color = Color::Magenta;

const HUD_MARGIN: f32 = 10.0;
const HUD_LINE: f32 = 20.0;

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<S: Surface>(
    out: &mut S,
    state: &GameState,
    sprites: &SpriteSheet,
    debug: bool,
) -> io::Result<()> {
    out.clear_rect(Rect::new(0.0, 0.0, state.width, state.height))?;

    draw_ground(out, state)?;
    draw_player(out, state, sprites)?;

    for obstacle in &state.obstacles {
        let src = sprites.regions.obstacle(obstacle.kind, obstacle.cluster);
        draw_sprite(out, sprites, src, obstacle.hitbox())?;
    }
    let wing = (state.frame % 2) as usize;
    for monster in &state.monsters {
        draw_sprite(out, sprites, sprites.regions.monster[wing], monster.hitbox())?;
    }
    if let Some(weapon) = state.weapon.as_ref().filter(|w| w.visible) {
        draw_sprite(out, sprites, sprites.regions.weapon, weapon.hitbox())?;
    }
    for bullet in &state.bullets {
        draw_sprite(out, sprites, sprites.regions.bullet, bullet.hitbox())?;
    }

    draw_hud(out, state)?;

    if debug {
        draw_hitboxes(out, state)?;
    }

    match state.status {
        GameStatus::GameOver => draw_game_over(out, state)?,
        GameStatus::Paused => draw_paused(out, state)?,
        GameStatus::Idle | GameStatus::Running => {}
    }

    out.present()
}

/// Pre-start frame: ground and the idle player animation, nothing else.
pub fn render_idle<S: Surface>(
    out: &mut S,
    state: &GameState,
    sprites: &SpriteSheet,
    idle_frame: u64,
) -> io::Result<()> {
    out.clear_rect(Rect::new(0.0, 0.0, state.width, state.height))?;
    draw_ground(out, state)?;
    // Blink every 30 frames
    let pose = usize::from(idle_frame % 30 == 0);
    draw_sprite(out, sprites, sprites.regions.player_idle[pose], state.player.bounds())?;
    out.present()
}

// ── Pieces ────────────────────────────────────────────────────────────────────

/// Skipped silently while the sheet is not loaded.
fn draw_sprite<S: Surface>(out: &mut S, sprites: &SpriteSheet, src: Rect, dst: Rect) -> io::Result<()> {
    match sprites.image() {
        Some(image) => out.draw_image(image, src, dst),
        None => Ok(()),
    }
}

fn draw_ground<S: Surface>(out: &mut S, state: &GameState) -> io::Result<()> {
    out.line((0.0, state.ground_y), (state.width, state.ground_y), C_GROUND)
}

fn player_pose(player: &Player, frame: u64, sprites: &SpriteSheet) -> Rect {
    if player.jumping {
        sprites.regions.player_jump
    } else if player.crouching {
        sprites.regions.player_crouch
    } else {
        sprites.regions.player_run[(frame % 2) as usize]
    }
}

fn draw_player<S: Surface>(out: &mut S, state: &GameState, sprites: &SpriteSheet) -> io::Result<()> {
    let src = player_pose(&state.player, state.frame, sprites);
    draw_sprite(out, sprites, src, state.player.bounds())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<S: Surface>(out: &mut S, state: &GameState) -> io::Result<()> {
    // Score and high score — right
    let right = state.width - HUD_MARGIN;
    out.fill_text(
        &format!("{:05}", state.score),
        right,
        HUD_LINE,
        TextAlign::Right,
        C_HUD_SCORE,
    )?;
    if state.high_score > 0 {
        out.fill_text(
            &format!("HI {:05}", state.high_score),
            right - 70.0,
            HUD_LINE,
            TextAlign::Right,
            C_HUD_HIGH,
        )?;
    }

    // Turbo and weapon — left
    match state.turbo {
        TurboState::Active { .. } => out.fill_text(
            &format!("TURBO {:.1}s", state.turbo.time_left_ms() as f64 / 1000.0),
            HUD_MARGIN,
            HUD_LINE,
            TextAlign::Left,
            C_TURBO_ACTIVE,
        )?,
        TurboState::Cooldown { .. } => out.fill_text(
            &format!("COOLDOWN {}s", state.turbo.time_left_ms().div_ceil(1000)),
            HUD_MARGIN,
            HUD_LINE,
            TextAlign::Left,
            C_TURBO_COOLDOWN,
        )?,
        TurboState::Idle => {}
    }
    if state.player.has_weapon {
        out.fill_text(
            "WEAPON",
            HUD_MARGIN,
            HUD_LINE * 2.0,
            TextAlign::Left,
            C_WEAPON_TAG,
        )?;
    }
    Ok(())
}

// ── Debug overlay ─────────────────────────────────────────────────────────────

/// Outline every collision box; the player's is crouch-adjusted.
fn draw_hitboxes<S: Surface>(out: &mut S, state: &GameState) -> io::Result<()> {
    for entity in state.entities() {
        let color = match entity {
            EntityRef::Player(_) => C_DEBUG_PLAYER,
            EntityRef::Obstacle(_) | EntityRef::Monster(_) => C_DEBUG_HAZARD,
            EntityRef::Weapon(_) => C_DEBUG_PICKUP,
            EntityRef::Bullet(_) => C_DEBUG_BULLET,
        };
        out.stroke_rect(entity.hitbox(), color)?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_game_over<S: Surface>(out: &mut S, state: &GameState) -> io::Result<()> {
    let cx = state.width / 2.0;
    let cy = state.height / 2.0;

    out.fill_text("GAME OVER", cx, cy - HUD_LINE, TextAlign::Center, C_OVERLAY_TITLE)?;

    out.fill_text(
        &format!("Final Score: {}", state.score),
        cx,
        cy,
        TextAlign::Center,
        C_OVERLAY_TEXT,
    )?;
    out.fill_text(
        "Press SPACE to play again",
        cx,
        cy + HUD_LINE,
        TextAlign::Center,
        C_OVERLAY_TEXT,
    )?;
    if state.score > 0 && state.score >= state.high_score {
        out.fill_text("NEW BEST!", cx, cy + HUD_LINE * 2.0, TextAlign::Center, C_TURBO_ACTIVE)?;
    }
    Ok(())
}

fn draw_paused<S: Surface>(out: &mut S, state: &GameState) -> io::Result<()> {
    out.fill_text(
        "PAUSED",
        state.width / 2.0,
        state.height / 2.0,
        TextAlign::Center,
        C_OVERLAY_TEXT,
    )
}
