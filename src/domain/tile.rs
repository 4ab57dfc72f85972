/// Maze legend: one `Tile` per descriptor character.
/// What each character spawns is decided by the loader; this module only
/// names the characters so the legend lives in one place.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GhostColor {
    Red,
    Blue,
    Pink,
    Orange,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,                // 'X'
    Empty,               // ' '  pellet or (rarely) cherry
    Skip,                // 'O'  tunnel lane, nothing spawned
    AvatarSpawn,         // 'P'
    GhostSpawn(GhostColor),
    PowerPellet,         // 'F'
    Unknown(char),       // anything else: spawns nothing
}

impl Tile {
    pub fn from_char(ch: char) -> Tile {
        match ch {
            'X' => Tile::Wall,
            ' ' => Tile::Empty,
            'O' => Tile::Skip,
            'P' => Tile::AvatarSpawn,
            'r' => Tile::GhostSpawn(GhostColor::Red),
            'b' => Tile::GhostSpawn(GhostColor::Blue),
            'p' => Tile::GhostSpawn(GhostColor::Pink),
            'o' => Tile::GhostSpawn(GhostColor::Orange),
            'F' => Tile::PowerPellet,
            other => Tile::Unknown(other),
        }
    }
}
