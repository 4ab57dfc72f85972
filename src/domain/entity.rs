/// Entities: every object on the board is a `Block` with a kind tag.
/// Walls, pellets, cherries, the power pellet, ghosts and the avatar all
/// share one record shape; only ghosts use `scared`.

use super::tile::GhostColor;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    /// Velocity for this facing at `speed` pixels per tick.
    pub fn velocity(self, speed: i32) -> (i32, i32) {
        match self {
            Facing::Up => (0, -speed),
            Facing::Down => (0, speed),
            Facing::Left => (-speed, 0),
            Facing::Right => (speed, 0),
        }
    }
}

/// Opaque image handle. The core never looks inside; the renderer maps
/// each id to something drawable.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SpriteId {
    Wall,
    BlueGhost,
    OrangeGhost,
    PinkGhost,
    RedGhost,
    ScaredGhost,
    Cherry,
    PowerFood,
    PacmanUp,
    PacmanDown,
    PacmanLeft,
    PacmanRight,
}

impl SpriteId {
    pub const ALL: [SpriteId; 12] = [
        SpriteId::Wall,
        SpriteId::BlueGhost,
        SpriteId::OrangeGhost,
        SpriteId::PinkGhost,
        SpriteId::RedGhost,
        SpriteId::ScaredGhost,
        SpriteId::Cherry,
        SpriteId::PowerFood,
        SpriteId::PacmanUp,
        SpriteId::PacmanDown,
        SpriteId::PacmanLeft,
        SpriteId::PacmanRight,
    ];

    /// Asset name, as used in the `[sprites]` config table.
    pub fn name(self) -> &'static str {
        match self {
            SpriteId::Wall => "wall",
            SpriteId::BlueGhost => "blue_ghost",
            SpriteId::OrangeGhost => "orange_ghost",
            SpriteId::PinkGhost => "pink_ghost",
            SpriteId::RedGhost => "red_ghost",
            SpriteId::ScaredGhost => "scared_ghost",
            SpriteId::Cherry => "cherry",
            SpriteId::PowerFood => "power_food",
            SpriteId::PacmanUp => "pacman_up",
            SpriteId::PacmanDown => "pacman_down",
            SpriteId::PacmanLeft => "pacman_left",
            SpriteId::PacmanRight => "pacman_right",
        }
    }

    pub fn for_ghost(color: GhostColor) -> SpriteId {
        match color {
            GhostColor::Red => SpriteId::RedGhost,
            GhostColor::Blue => SpriteId::BlueGhost,
            GhostColor::Pink => SpriteId::PinkGhost,
            GhostColor::Orange => SpriteId::OrangeGhost,
        }
    }

    /// Directional avatar image.
    pub fn for_avatar(facing: Facing) -> SpriteId {
        match facing {
            Facing::Up => SpriteId::PacmanUp,
            Facing::Down => SpriteId::PacmanDown,
            Facing::Left => SpriteId::PacmanLeft,
            Facing::Right => SpriteId::PacmanRight,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Kind {
    Wall,
    Pellet,
    Cherry,
    PowerPellet,
    Ghost(GhostColor),
    Avatar,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub kind: Kind,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub home_x: i32, // spawn position, restored by reset()
    pub home_y: i32,
    pub speed: i32,
    pub facing: Facing,
    pub vx: i32,
    pub vy: i32,
    /// `None` for pellet dots (drawn as a filled square).
    pub sprite: Option<SpriteId>,
    pub scared: bool,
}

impl Block {
    /// Spawned facing up but standing still; velocity is only set by a
    /// direction change.
    pub fn new(kind: Kind, x: i32, y: i32, w: i32, h: i32, sprite: Option<SpriteId>) -> Self {
        Block {
            kind,
            x, y, w, h,
            home_x: x,
            home_y: y,
            speed: w / 4,
            facing: Facing::Up,
            vx: 0,
            vy: 0,
            sprite,
            scared: false,
        }
    }

    /// Set facing and recompute velocity from it.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
        let (vx, vy) = facing.velocity(self.speed);
        self.vx = vx;
        self.vy = vy;
    }

    /// Back to the spawn position. Facing and velocity are untouched.
    pub fn reset(&mut self) {
        self.x = self.home_x;
        self.y = self.home_y;
    }

    pub fn stop(&mut self) {
        self.vx = 0;
        self.vy = 0;
    }
}
