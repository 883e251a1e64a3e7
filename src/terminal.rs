//! Terminal surface — all terminal I/O lives here.
//!
//! Pixel coordinates from the engine are scaled onto the character grid.
//! Sprites become solid runs of one glyph per sheet region; there is no
//! raster image to load, so the sheet is ready as soon as this exists.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use dino_runner::entities::Rect;
use dino_runner::sprites::SpriteRegions;
use dino_runner::surface::{ImageId, Surface, TextAlign};

/// The only "image" this surface knows.
pub const SHEET_IMAGE: ImageId = 1;

// ── Glyph palette ─────────────────────────────────────────────────────────────

fn glyph_table(regions: &SpriteRegions) -> Vec<(Rect, char, Color)> {
    let mut table = vec![
        (regions.player_jump, '█', Color::White),
        (regions.player_crouch, '▄', Color::White),
        (regions.small_obstacle, '▲', Color::Green),
        (regions.large_obstacle, '█', Color::DarkGreen),
        (regions.weapon, '¥', Color::Yellow),
        (regions.bullet, '═', Color::Cyan),
    ];
    for r in regions.player_run {
        table.push((r, '█', Color::White));
    }
    for r in regions.player_idle {
        table.push((r, '█', Color::Grey));
    }
    table.push((regions.monster[0], '▼', Color::Magenta));
    table.push((regions.monster[1], '▲', Color::Magenta));
    table
}

pub struct TerminalSurface<W: Write> {
    out: W,
    width: f32,
    height: f32,
    cols: u16,
    rows: u16,
    glyphs: Vec<(Rect, char, Color)>,
}

impl<W: Write> TerminalSurface<W> {
    /// A `width` x `height` pixel surface spread over `cols` x `rows` cells.
    pub fn new(out: W, width: f32, height: f32, cols: u16, rows: u16, regions: &SpriteRegions) -> Self {
        Self {
            out,
            width,
            height,
            cols: cols.max(1),
            rows: rows.max(1),
            glyphs: glyph_table(regions),
        }
    }

    fn col(&self, x: f32) -> i32 {
        (x / self.width * self.cols as f32).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        (y / self.height * self.rows as f32).floor() as i32
    }

    /// Inclusive cell span covered by `rect`, clipped to the grid.
    fn span(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = self.col(rect.x).max(0);
        let r0 = self.row(rect.y).max(0);
        let c1 = self.col(rect.right() - 0.01).min(self.cols as i32 - 1);
        let r1 = self.row(rect.bottom() - 0.01).min(self.rows as i32 - 1);
        if c0 > c1 || r0 > r1 {
            return None;
        }
        Some((c0 as u16, r0 as u16, c1 as u16, r1 as u16))
    }

    fn fill_cells(&mut self, rect: Rect, glyph: char) -> io::Result<()> {
        if let Some((c0, r0, c1, r1)) = self.span(rect) {
            let run: String = std::iter::repeat(glyph).take((c1 - c0 + 1) as usize).collect();
            for row in r0..=r1 {
                self.out.queue(cursor::MoveTo(c0, row))?;
                self.out.queue(Print(&run))?;
            }
        }
        Ok(())
    }

    fn glyph_for(&self, src: Rect) -> Option<(char, Color)> {
        self.glyphs
            .iter()
            .find(|(region, _, _)| {
                src.x >= region.x && src.x < region.right() && src.y >= region.y && src.y < region.bottom()
            })
            .map(|(_, glyph, color)| (*glyph, *color))
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) -> io::Result<()> {
        if rect == Rect::new(0.0, 0.0, self.width, self.height) {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
            return Ok(());
        }
        self.out.queue(style::ResetColor)?;
        self.fill_cells(rect, ' ')
    }

    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect) -> io::Result<()> {
        if image != SHEET_IMAGE {
            return Ok(());
        }
        match self.glyph_for(src) {
            Some((glyph, color)) => {
                self.out.queue(style::SetForegroundColor(color))?;
                self.fill_cells(dst, glyph)
            }
            None => Ok(()),
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.out.queue(style::SetBackgroundColor(color))?;
        self.fill_cells(rect, ' ')?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let Some((c0, r0, c1, r1)) = self.span(rect) else {
            return Ok(());
        };
        self.out.queue(style::SetForegroundColor(color))?;
        let width = (c1 - c0 + 1) as usize;
        for row in [r0, r1] {
            self.out.queue(cursor::MoveTo(c0, row))?;
            self.out.queue(Print("·".repeat(width)))?;
        }
        for row in r0..=r1 {
            self.out.queue(cursor::MoveTo(c0, row))?;
            self.out.queue(Print("·"))?;
            self.out.queue(cursor::MoveTo(c1, row))?;
            self.out.queue(Print("·"))?;
        }
        Ok(())
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) -> io::Result<()> {
        let (c0, r0) = (self.col(from.0), self.row(from.1));
        let (c1, r1) = (self.col(to.0), self.row(to.1));
        let glyph = if r0 == r1 { "─" } else { "·" };
        let steps = (c1 - c0).abs().max((r1 - r0).abs()).max(1);

        self.out.queue(style::SetForegroundColor(color))?;
        for i in 0..=steps {
            let c = c0 + (c1 - c0) * i / steps;
            let r = r0 + (r1 - r0) * i / steps;
            if (0..self.cols as i32).contains(&c) && (0..self.rows as i32).contains(&r) {
                self.out.queue(cursor::MoveTo(c as u16, r as u16))?;
                self.out.queue(Print(glyph))?;
            }
        }
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        align: TextAlign,
        color: Color,
    ) -> io::Result<()> {
        let len = text.chars().count() as i32;
        let anchor = self.col(x);
        let start = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2,
            TextAlign::Right => anchor - len,
        };
        let row = self.row(y).clamp(0, self.rows as i32 - 1);
        self.out.queue(cursor::MoveTo(start.max(0) as u16, row as u16))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}
