//! All game entity types — pure data, no game logic.
//!
//! The only behaviour here is geometric: every entity exposes the box it
//! collides with through [`Hitbox`], so collision checks and the debug
//! overlay can be written once against "anything with a box".

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in surface pixels.  `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Anything that can take part in a collision test.
pub trait Hitbox {
    fn hitbox(&self) -> Rect;
}

pub fn overlaps(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    a.hitbox().intersects(&b.hitbox())
}

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Constructed, never started.
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Small,
    Large,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Collision height while crouching.  Rendering always uses `height`.
    pub crouch_height: f32,
    /// Vertical velocity in pixels per tick (negative = upward).
    pub velocity_y: f32,
    pub jumping: bool,
    pub crouching: bool,
    pub has_weapon: bool,
}

impl Player {
    /// Sprite bounds, independent of posture.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Hitbox for Player {
    /// Crouching shrinks the box from the top; the feet stay put.
    fn hitbox(&self) -> Rect {
        if self.crouching {
            let drop = self.height - self.crouch_height;
            Rect::new(self.x, self.y + drop, self.width, self.crouch_height)
        } else {
            self.bounds()
        }
    }
}

// ── Hazards & pickups ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    /// Already scaled by `cluster`.
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Number of grouped obstacles, 1 to 3.
    pub cluster: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Monster {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Leftward pixels per tick, fixed at spawn time.
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Weapon {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rightward pixels per tick.
    pub speed: f32,
}

macro_rules! plain_hitbox {
    ($($ty:ty),*) => {
        $(impl Hitbox for $ty {
            fn hitbox(&self) -> Rect {
                Rect::new(self.x, self.y, self.width, self.height)
            }
        })*
    };
}

plain_hitbox!(Obstacle, Monster, Weapon, Bullet);

/// Borrowed view over every kind of world entity.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
    Player(&'a Player),
    Obstacle(&'a Obstacle),
    Monster(&'a Monster),
    Weapon(&'a Weapon),
    Bullet(&'a Bullet),
}

impl Hitbox for EntityRef<'_> {
    fn hitbox(&self) -> Rect {
        match self {
            EntityRef::Player(p) => p.hitbox(),
            EntityRef::Obstacle(o) => o.hitbox(),
            EntityRef::Monster(m) => m.hitbox(),
            EntityRef::Weapon(w) => w.hitbox(),
            EntityRef::Bullet(b) => b.hitbox(),
        }
    }
}

// ── Turbo ─────────────────────────────────────────────────────────────────────

/// Timed speed buff.  Active and cooldown cannot overlap: they are separate
/// variants of one value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurboState {
    Idle,
    Active { remaining_ms: f64 },
    Cooldown { remaining_ms: f64 },
}

impl TurboState {
    pub fn is_active(&self) -> bool {
        matches!(self, TurboState::Active { .. })
    }

    pub fn is_cooldown(&self) -> bool {
        matches!(self, TurboState::Cooldown { .. })
    }

    /// Whole milliseconds left in the current phase, 0 when idle.
    pub fn time_left_ms(&self) -> u64 {
        match self {
            TurboState::Idle => 0,
            TurboState::Active { remaining_ms } | TurboState::Cooldown { remaining_ms } => {
                remaining_ms.max(0.0).ceil() as u64
            }
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so the pure update functions in
/// `compute` can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub monsters: Vec<Monster>,
    /// At most one pickup exists at a time.
    pub weapon: Option<Weapon>,
    pub bullets: Vec<Bullet>,
    pub score: u32,
    /// Highest score seen by this engine instance.
    pub high_score: u32,
    pub game_speed: f32,
    pub turbo: TurboState,
    pub status: GameStatus,
    /// Ticks simulated since the last start.
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
}

impl GameState {
    pub fn is_started(&self) -> bool {
        self.status != GameStatus::Idle
    }

    /// Every live entity, player first, in draw order.
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        std::iter::once(EntityRef::Player(&self.player))
            .chain(self.obstacles.iter().map(EntityRef::Obstacle))
            .chain(self.monsters.iter().map(EntityRef::Monster))
            .chain(self.weapon.iter().filter(|w| w.visible).map(EntityRef::Weapon))
            .chain(self.bullets.iter().map(EntityRef::Bullet))
    }
}
