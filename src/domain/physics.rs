/// Pixel physics: rectangle overlap, stepping, wall blocking, wraparound.
///
/// ## Model
///
/// Every entity is an axis-aligned rectangle in board pixels. Movement is a
/// whole step of `(vx, vy)` per tick; there is no sliding. A step that ends
/// overlapping any wall is undone in full.
///
/// ## Turn gating
///
/// `update_direction` takes the step immediately. If the new direction
/// walls the entity, the step and the facing are both reverted. This gives
/// "latch at corners" turning: a turn only sticks where the corridor in
/// the new direction is already open.
///
/// ## Wraparound
///
/// Leaving one edge fully (`x <= -w`) reappears at the opposite edge
/// (`x = W`), and vice versa. The same rule applies vertically.

use super::entity::{Block, Facing};

pub const ROW_COUNT: usize = 21;
pub const COLUMN_COUNT: usize = 19;
pub const TILE_SIZE: i32 = 32;

/// Pellet dots: 4×4, centred in the tile.
pub const PELLET_SIZE: i32 = 4;
pub const PELLET_OFFSET: i32 = 14;

/// Board dimensions in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Board {
    pub fn new(columns: usize, rows: usize, tile: i32) -> Self {
        Board {
            width: columns as i32 * tile,
            height: rows as i32 * tile,
        }
    }

    /// The nominal 19×21 board of 32 px tiles (608×672).
    pub fn standard() -> Self {
        Board::new(COLUMN_COUNT, ROW_COUNT, TILE_SIZE)
    }
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

/// Strict AABB overlap. Touching edges do not collide.
#[inline]
pub fn overlaps(a: &Block, b: &Block) -> bool {
    a.x < b.x + b.w
        && a.x + a.w > b.x
        && a.y < b.y + b.h
        && a.y + a.h > b.y
}

#[inline]
pub fn hits_any(block: &Block, others: &[Block]) -> bool {
    others.iter().any(|o| overlaps(block, o))
}

/// Index of the first entry in `others` that overlaps `block`.
pub fn first_overlap(block: &Block, others: &[Block]) -> Option<usize> {
    others.iter().position(|o| overlaps(block, o))
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

/// Apply one step of the block's velocity. No collision handling.
#[inline]
pub fn step(block: &mut Block) {
    block.x += block.vx;
    block.y += block.vy;
}

#[inline]
fn unstep(block: &mut Block) {
    block.x -= block.vx;
    block.y -= block.vy;
}

/// Step, and undo the step if it lands in a wall.
/// Returns true if the wall blocked the move.
pub fn advance(block: &mut Block, walls: &[Block]) -> bool {
    step(block);
    if hits_any(block, walls) {
        unstep(block);
        true
    } else {
        false
    }
}

/// Change direction with immediate step; revert if the step is walled.
/// Returns true if the new facing stuck.
pub fn update_direction(block: &mut Block, facing: Facing, walls: &[Block]) -> bool {
    let previous = block.facing;
    block.set_facing(facing);
    step(block);
    if hits_any(block, walls) {
        unstep(block);
        block.set_facing(previous);
        false
    } else {
        true
    }
}

/// Teleport to the opposite edge once fully off the board.
pub fn wrap(block: &mut Block, board: Board) {
    if block.x <= -block.w {
        block.x = board.width;
    } else if block.x >= board.width {
        block.x = -block.w;
    }
    if block.y <= -block.h {
        block.y = board.height;
    } else if block.y >= board.height {
        block.y = -block.h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Kind;

    fn tile(kind: Kind, col: i32, row: i32) -> Block {
        Block::new(kind, col * TILE_SIZE, row * TILE_SIZE, TILE_SIZE, TILE_SIZE, None)
    }

    fn wall(col: i32, row: i32) -> Block {
        tile(Kind::Wall, col, row)
    }

    // ── overlaps ──

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = tile(Kind::Avatar, 0, 0);
        let b = wall(1, 0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn one_pixel_in_overlaps() {
        let mut a = tile(Kind::Avatar, 0, 0);
        a.x = 1;
        assert!(overlaps(&a, &wall(1, 0)));
    }

    #[test]
    fn pellet_overlaps_only_when_reached() {
        let pellet = Block::new(Kind::Pellet, 32 + PELLET_OFFSET, PELLET_OFFSET, 4, 4, None);
        let mut a = tile(Kind::Avatar, 0, 0);
        a.x = 8;
        assert!(!overlaps(&a, &pellet));
        a.x = 16;
        assert!(overlaps(&a, &pellet));
    }

    // ── advance ──

    #[test]
    fn advance_blocked_by_wall_is_undone() {
        let walls = vec![wall(1, 0)];
        let mut a = tile(Kind::Avatar, 0, 0);
        a.set_facing(Facing::Right);
        assert!(advance(&mut a, &walls));
        assert_eq!(a.x, 0);
    }

    #[test]
    fn advance_into_open_space() {
        let walls = vec![wall(0, 1)];
        let mut a = tile(Kind::Avatar, 0, 0);
        a.set_facing(Facing::Right);
        assert!(!advance(&mut a, &walls));
        assert_eq!(a.x, 8);
    }

    // ── update_direction ──

    #[test]
    fn turn_into_wall_is_refused() {
        let walls = vec![wall(0, 1)];
        let mut a = tile(Kind::Avatar, 0, 0);
        a.set_facing(Facing::Right);
        assert!(!update_direction(&mut a, Facing::Down, &walls));
        assert_eq!(a.facing, Facing::Right);
        assert_eq!((a.vx, a.vy), (8, 0));
        assert_eq!((a.x, a.y), (0, 0));
    }

    #[test]
    fn turn_into_open_corridor_steps_immediately() {
        let walls = vec![wall(1, 0)];
        let mut a = tile(Kind::Avatar, 0, 0);
        assert!(update_direction(&mut a, Facing::Down, &walls));
        assert_eq!(a.facing, Facing::Down);
        assert_eq!((a.x, a.y), (0, 8));
    }

    #[test]
    fn turn_off_grid_line_is_refused() {
        // Half way along a corridor, the side opening is not yet reachable.
        let walls = vec![wall(0, 1), wall(1, 1)];
        let mut a = tile(Kind::Avatar, 0, 0);
        a.x = 16;
        a.set_facing(Facing::Right);
        assert!(!update_direction(&mut a, Facing::Down, &walls));
        assert_eq!(a.x, 16);
    }

    // ── wrap ──

    #[test]
    fn wraps_left_edge_to_right() {
        let board = Board::standard();
        let mut a = tile(Kind::Avatar, 0, 9);
        a.x = -TILE_SIZE;
        wrap(&mut a, board);
        assert_eq!(a.x, board.width);
    }

    #[test]
    fn wraps_right_edge_to_left() {
        let board = Board::standard();
        let mut a = tile(Kind::Avatar, 0, 9);
        a.x = board.width;
        wrap(&mut a, board);
        assert_eq!(a.x, -TILE_SIZE);
    }

    #[test]
    fn wraps_vertically() {
        let board = Board::standard();
        let mut a = tile(Kind::Avatar, 9, 0);
        a.y = -TILE_SIZE;
        wrap(&mut a, board);
        assert_eq!(a.y, board.height);
        wrap(&mut a, board);
        assert_eq!(a.y, -TILE_SIZE);
    }

    #[test]
    fn partially_off_board_does_not_wrap() {
        let board = Board::standard();
        let mut a = tile(Kind::Avatar, 0, 9);
        a.x = -8;
        wrap(&mut a, board);
        assert_eq!(a.x, -8);
    }

    #[test]
    fn standard_board_is_608_by_672() {
        let b = Board::standard();
        assert_eq!((b.width, b.height), (608, 672));
    }
}
