//! Sprite sheet layout and load state.
//!
//! The host loads the sheet image on its own schedule and reports the result
//! through [`ImageSlot`].  Until the slot is `Ready` the renderer skips every
//! sprite draw; a failed load degrades the same way.

use crate::entities::{ObstacleKind, Rect};
use crate::surface::ImageId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSlot {
    Pending,
    Ready(ImageId),
    Failed,
}

/// Source regions inside the sheet.  Obstacle regions hold three obstacles
/// side by side; a cluster of `n` takes the first `n` of them.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteRegions {
    pub player_run: [Rect; 2],
    pub player_jump: Rect,
    pub player_crouch: Rect,
    pub player_idle: [Rect; 2],
    pub small_obstacle: Rect,
    pub large_obstacle: Rect,
    pub monster: [Rect; 2],
    pub weapon: Rect,
    pub bullet: Rect,
}

impl Default for SpriteRegions {
    fn default() -> Self {
        Self {
            player_run: [Rect::new(0.0, 0.0, 44.0, 47.0), Rect::new(44.0, 0.0, 44.0, 47.0)],
            player_jump: Rect::new(88.0, 0.0, 44.0, 47.0),
            player_crouch: Rect::new(132.0, 0.0, 44.0, 47.0),
            player_idle: [Rect::new(176.0, 0.0, 44.0, 47.0), Rect::new(220.0, 0.0, 44.0, 47.0)],
            small_obstacle: Rect::new(0.0, 60.0, 17.0, 35.0),
            large_obstacle: Rect::new(60.0, 60.0, 25.0, 50.0),
            monster: [Rect::new(0.0, 120.0, 46.0, 30.0), Rect::new(46.0, 120.0, 46.0, 30.0)],
            weapon: Rect::new(100.0, 120.0, 30.0, 20.0),
            bullet: Rect::new(130.0, 120.0, 12.0, 4.0),
        }
    }
}

impl SpriteRegions {
    /// Sheet slice for an obstacle group: one base sprite wide per member.
    pub fn obstacle(&self, kind: ObstacleKind, cluster: u8) -> Rect {
        let base = match kind {
            ObstacleKind::Small => self.small_obstacle,
            ObstacleKind::Large => self.large_obstacle,
        };
        Rect {
            w: base.w * cluster.clamp(1, 3) as f32,
            ..base
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSheet {
    pub slot: ImageSlot,
    pub regions: SpriteRegions,
}

impl SpriteSheet {
    pub fn pending() -> Self {
        Self {
            slot: ImageSlot::Pending,
            regions: SpriteRegions::default(),
        }
    }

    pub fn ready(image: ImageId) -> Self {
        Self {
            slot: ImageSlot::Ready(image),
            ..Self::pending()
        }
    }

    pub fn image(&self) -> Option<ImageId> {
        match self.slot {
            ImageSlot::Ready(id) => Some(id),
            ImageSlot::Pending | ImageSlot::Failed => None,
        }
    }
}
