//! The drawable surface the renderer targets.
//!
//! A host provides one [`Surface`] with a fixed pixel size.  Coordinates are
//! surface pixels with the origin at the top-left.  [`Recorder`] is an
//! in-memory surface that keeps the draw calls of the current frame; the
//! headless runner and the tests draw into it.

use std::io;

use crossterm::style::Color;

use crate::entities::Rect;

/// Handle of an image the host has finished loading.
pub type ImageId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

pub trait Surface {
    /// Pixel size `(width, height)`.
    fn size(&self) -> (f32, f32);

    fn clear_rect(&mut self, rect: Rect) -> io::Result<()>;

    /// Copy the `src` region of `image` into `dst`, scaling as needed.
    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect) -> io::Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;

    fn stroke_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) -> io::Result<()>;

    /// `(x, y)` is the text baseline anchor; `align` picks which end of the
    /// text sits on `x`.
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        align: TextAlign,
        color: Color,
    ) -> io::Result<()>;

    /// Called once a frame is complete.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Recording surface ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Image { image: ImageId, src: Rect, dst: Rect },
    Fill(Rect, Color),
    Stroke(Rect, Color),
    Line { from: (f32, f32), to: (f32, f32), color: Color },
    Text { text: String, x: f32, y: f32, align: TextAlign },
}

/// Surface that stores draw calls instead of rasterizing them.  Clearing the
/// whole surface starts a new frame and drops the previous one.
#[derive(Clone, Debug)]
pub struct Recorder {
    width: f32,
    height: f32,
    pub commands: Vec<DrawCommand>,
    pub frames_presented: u64,
}

impl Recorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames_presented: 0,
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn strokes(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke(rect, _) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<(Rect, Rect)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { src, dst, .. } => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for Recorder {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) -> io::Result<()> {
        if rect == Rect::new(0.0, 0.0, self.width, self.height) {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::Clear(rect));
        Ok(())
    }

    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect) -> io::Result<()> {
        self.commands.push(DrawCommand::Image { image, src, dst });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.commands.push(DrawCommand::Fill(rect, color));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.commands.push(DrawCommand::Stroke(rect, color));
        Ok(())
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) -> io::Result<()> {
        self.commands.push(DrawCommand::Line { from, to, color });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        align: TextAlign,
        _color: Color,
    ) -> io::Result<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            align,
        });
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames_presented += 1;
        Ok(())
    }
}
