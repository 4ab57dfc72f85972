/// Maze catalog and loader.
///
/// ## Sources
///   1. `maze_dir` from config (individual `.txt` files, sorted by name)
///   2. Built-in catalog of three mazes
///
/// ## Maze file format (`.txt`):
///   Optional line 1: `# Maze Name`
///   Remaining lines: map rows
///
/// ## Legend:
///   'X' = Wall              ' ' = Pellet (or, rarely, a cherry)
///   'O' = Nothing (tunnel)  'P' = Avatar spawn
///   'r' 'b' 'p' 'o' = Red / blue / pink / orange ghost
///   'F' = Power pellet
///
/// Rows past `ROW_COUNT` and columns past `COLUMN_COUNT` are ignored.
/// Any other character spawns nothing.

use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::domain::ai;
use crate::domain::entity::{Block, Kind, SpriteId};
use crate::domain::physics::{COLUMN_COUNT, PELLET_OFFSET, PELLET_SIZE, ROW_COUNT, TILE_SIZE};
use crate::domain::tile::Tile;
use crate::sim::world::WorldState;

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("maze '{0}' has no rows")]
    Empty(String),
    #[error("maze '{0}' has no avatar spawn ('P')")]
    NoAvatarSpawn(String),
    #[error("maze '{0}' has no pellet cells (' ')")]
    NoPellets(String),
    #[error("no mazes to play")]
    NoMazes,
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A validated maze: trimmed to the board, guaranteed to place an avatar and
/// at least one pellet.
#[derive(Clone, Debug)]
pub struct Maze {
    pub name: String,
    cells: Vec<Vec<Tile>>,
    avatar_spawn: (usize, usize), // (column, row)
}

impl Maze {
    pub fn parse<S: AsRef<str>>(name: &str, rows: &[S]) -> Result<Maze, MazeError> {
        if rows.is_empty() {
            return Err(MazeError::Empty(name.to_string()));
        }

        let cells: Vec<Vec<Tile>> = rows.iter()
            .take(ROW_COUNT)
            .map(|row| row.as_ref().chars().take(COLUMN_COUNT).map(Tile::from_char).collect())
            .collect();

        // Last 'P' wins
        let mut avatar_spawn = None;
        for (r, row) in cells.iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if *tile == Tile::AvatarSpawn {
                    avatar_spawn = Some((c, r));
                }
            }
        }

        let Some(avatar_spawn) = avatar_spawn else {
            return Err(MazeError::NoAvatarSpawn(name.to_string()));
        };
        // Without a pellet the level would clear on every tick
        if !cells.iter().flatten().any(|t| *t == Tile::Empty) {
            return Err(MazeError::NoPellets(name.to_string()));
        }

        Ok(Maze { name: name.to_string(), cells, avatar_spawn })
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.cells
    }

    pub fn avatar_spawn(&self) -> (usize, usize) {
        self.avatar_spawn
    }
}

/// The ordered set of mazes a game cycles through. Never empty.
#[derive(Clone, Debug)]
pub struct Catalog {
    mazes: Vec<Maze>,
}

impl Catalog {
    pub fn from_mazes(mazes: Vec<Maze>) -> Result<Catalog, MazeError> {
        if mazes.is_empty() {
            return Err(MazeError::NoMazes);
        }
        Ok(Catalog { mazes })
    }

    pub fn builtin() -> Result<Catalog, MazeError> {
        let mazes = (1..=BUILTIN_COUNT)
            .map(|n| Maze::parse(&format!("Maze {n}"), get_level(n)))
            .collect::<Result<Vec<_>, _>>()?;
        Catalog::from_mazes(mazes)
    }

    /// Load every `.txt` maze in `dir`. Unparseable files are skipped.
    pub fn from_dir(dir: &Path) -> Result<Catalog, MazeError> {
        let entries = std::fs::read_dir(dir).map_err(|source| MazeError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |e| e == "txt"))
            .collect();
        files.sort();

        let mut mazes = vec![];
        for path in files {
            match read_maze_file(&path) {
                Ok(maze) => mazes.push(maze),
                Err(e) => log::warn!("skipping maze {}: {e}", path.display()),
            }
        }
        Catalog::from_mazes(mazes)
    }

    /// 1-based lookup. Anything outside the catalog is level 1.
    pub fn get(&self, level: u32) -> &Maze {
        let idx = level as usize;
        if idx >= 1 && idx <= self.mazes.len() {
            &self.mazes[idx - 1]
        } else {
            &self.mazes[0]
        }
    }

    pub fn len(&self) -> usize {
        self.mazes.len()
    }
}

fn read_maze_file(path: &Path) -> Result<Maze, MazeError> {
    let text = std::fs::read_to_string(path).map_err(|source| MazeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fallback = path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    parse_maze_text(&text, &fallback)
}

/// `# Name` on the first line is optional; everything else is map rows.
fn parse_maze_text(text: &str, fallback_name: &str) -> Result<Maze, MazeError> {
    let mut lines: Vec<&str> = text.lines().collect();
    let name = match lines.first() {
        Some(first) if first.starts_with('#') => {
            let name = first[1..].trim().to_string();
            lines.remove(0);
            name
        }
        _ => fallback_name.to_string(),
    };
    while lines.last().map_or(false, |l| l.trim().is_empty()) {
        lines.pop();
    }
    Maze::parse(&name, &lines[..])
}

// ══════════════════════════════════════════════════════════════
// Loader
// ══════════════════════════════════════════════════════════════

/// Rebuild every entity from the maze for `level`.
/// Score, high score, lives and the level counter are untouched.
pub fn load_map(world: &mut WorldState, level: u32) {
    world.walls.clear();
    world.pellets.clear();
    world.cherries.clear();
    world.ghosts.clear();
    world.power_pellet = None;

    let maze = world.catalog.get(level);
    log::info!("loading {} for level {}", maze.name, level);

    for (r, row) in maze.rows().iter().enumerate() {
        let y = r as i32 * TILE_SIZE;
        for (c, tile) in row.iter().enumerate() {
            let x = c as i32 * TILE_SIZE;
            match *tile {
                Tile::Wall => {
                    world.walls.push(tile_block(Kind::Wall, x, y, Some(SpriteId::Wall)));
                }
                Tile::GhostSpawn(color) => {
                    world.ghosts.push(tile_block(Kind::Ghost(color), x, y, Some(SpriteId::for_ghost(color))));
                }
                Tile::PowerPellet => {
                    world.power_pellet = Some(tile_block(Kind::PowerPellet, x, y, Some(SpriteId::PowerFood)));
                }
                Tile::Empty => {
                    let one_in = world.rules.cherry_one_in;
                    // Cap is checked with <=, so one extra cherry can slip in
                    if one_in > 0
                        && world.cherries.len() <= world.rules.cherry_cap
                        && world.rng.random_range(0..one_in) == 0
                    {
                        world.cherries.push(tile_block(Kind::Cherry, x, y, Some(SpriteId::Cherry)));
                    } else {
                        world.pellets.push(Block::new(
                            Kind::Pellet,
                            x + PELLET_OFFSET, y + PELLET_OFFSET,
                            PELLET_SIZE, PELLET_SIZE,
                            None,
                        ));
                    }
                }
                Tile::AvatarSpawn | Tile::Skip | Tile::Unknown(_) => {}
            }
        }
    }

    let (c, r) = maze.avatar_spawn();
    world.avatar = tile_block(
        Kind::Avatar,
        c as i32 * TILE_SIZE, r as i32 * TILE_SIZE,
        Some(SpriteId::PacmanRight),
    );

    for ghost in world.ghosts.iter_mut() {
        ai::redirect(ghost, &world.walls, &mut world.rng);
    }
}

fn tile_block(kind: Kind, x: i32, y: i32, sprite: Option<SpriteId>) -> Block {
    Block::new(kind, x, y, TILE_SIZE, TILE_SIZE, sprite)
}

// ══════════════════════════════════════════════════════════════
// Built-in catalog
// ══════════════════════════════════════════════════════════════

pub const BUILTIN_COUNT: u32 = 3;

/// Descriptor for built-in level `n` (1-based). Unknown levels get level 1.
pub fn get_level(n: u32) -> &'static [&'static str] {
    match n {
        1 => &LEVEL_1,
        2 => &LEVEL_2,
        3 => &LEVEL_3,
        _ => &LEVEL_1,
    }
}

const LEVEL_1: [&str; ROW_COUNT] = [
    "XXXXXXXXXXXXXXXXXXX",
    "X        X        X",
    "X XX XXX X XXX XX X",
    "X                 X",
    "X XX X XXXXX X XX X",
    "X    X       X    X",
    "XXXX XXXX XXXX XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXrXX X XXXX",
    "O       bpo       O",
    "XXXX X XXXXX X XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXXXX X XXXX",
    "X        X        X",
    "X XX XXX X XXX XX X",
    "X  X     P     X  X",
    "XX X X XXXXX X X XX",
    "X    X   X   X    X",
    "X XXXXXX X XXXXXX X",
    "X                 X",
    "XXXXXXXXXXXXXXXXXXX",
];

// Same layout as level 1 with a vertical tunnel through the top and bottom.
const LEVEL_2: [&str; ROW_COUNT] = [
    "XXXXXXXXX XXXXXXXXX",
    "X                 X",
    "X XX XXX X XXX XX X",
    "X                 X",
    "X XX X XXXXX X XX X",
    "X    X       X    X",
    "XXXX XXXX XXXX XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXrXX X XXXX",
    "O       bpo       O",
    "XXXX X XXXXX X XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXXXX X XXXX",
    "X        X        X",
    "X XX XXX X XXX XX X",
    "X  X     P     X  X",
    "XX X X XXXXX X X XX",
    "X    X   X   X    X",
    "X XXXXXX X XXXXXX X",
    "X                 X",
    "XXXXXXXXX XXXXXXXXX",
];

const LEVEL_3: [&str; ROW_COUNT] = [
    "XXXXXXXXXXXXXXXXXXX",
    "X   X         X   X",
    "X X X XXXXXXX X X X",
    "X X             X X",
    "X XXX XX X XX XXX X",
    "X        X        X",
    "XXXX XXX X XXX XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXrXX X XXXX",
    "O       bpo       O",
    "XXXX X XXXXX X XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXXXX X XXXX",
    "X    X   X   X    X",
    "X XX X X X X X XX X",
    "X  X   X P X   X  X",
    "XX X XXX X XXX X XX",
    "X    X       X    X",
    "X XXXX XXXXX XXXX X",
    "X                 X",
    "XXXXXXXXXXXXXXXXXXX",
];
