/// Read-only snapshot handed to the renderer between ticks.
///
/// Static sets (walls, pellets, cherries, power pellet) are borrowed as-is.
/// Ghosts are resolved to a `SpriteDraw` because their image depends on
/// scare state: the scared sprite is shown only while both the global
/// flag and the ghost's own flag are set.

use crate::domain::entity::{Block, SpriteId};
use crate::domain::physics::Board;
use super::world::{Phase, WorldState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpriteDraw {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub sprite: Option<SpriteId>,
}

impl SpriteDraw {
    fn of(block: &Block, sprite: Option<SpriteId>) -> Self {
        SpriteDraw { x: block.x, y: block.y, w: block.w, h: block.h, sprite }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Hud {
    pub lives: u32,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub paused: bool,
    pub game_over: bool,
}

pub struct FrameView<'a> {
    pub board: Board,
    pub walls: &'a [Block],
    pub pellets: &'a [Block],
    pub cherries: &'a [Block],
    pub power_pellet: Option<&'a Block>,
    pub ghosts: Vec<SpriteDraw>,
    pub avatar: SpriteDraw,
    pub hud: Hud,
}

impl<'a> FrameView<'a> {
    pub fn of(world: &'a WorldState) -> Self {
        FrameView {
            board: world.board,
            walls: &world.walls,
            pellets: &world.pellets,
            cherries: &world.cherries,
            power_pellet: world.power_pellet.as_ref(),
            ghosts: world.ghosts.iter()
                .map(|g| SpriteDraw::of(g, ghost_sprite(g, world.scared)))
                .collect(),
            avatar: SpriteDraw::of(&world.avatar, world.avatar.sprite),
            hud: Hud {
                lives: world.lives,
                score: world.score,
                high_score: world.high_score,
                level: world.level,
                paused: world.phase == Phase::Paused,
                game_over: world.phase == Phase::GameOver,
            },
        }
    }
}

pub fn ghost_sprite(ghost: &Block, globally_scared: bool) -> Option<SpriteId> {
    if globally_scared && ghost.scared {
        Some(SpriteId::ScaredGhost)
    } else {
        ghost.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::sim::level::{Catalog, Maze};

    fn world() -> WorldState {
        let rules = RuleConfig { seed: Some(2), cherry_one_in: 0, ..RuleConfig::default() };
        let maze = Maze::parse("test", &["XXXXXX", "XrPb X", "XXXXXX"]).unwrap();
        WorldState::new(rules, Catalog::from_mazes(vec![maze]).unwrap())
    }

    #[test]
    fn scared_sprite_needs_both_flags() {
        let mut w = world();
        w.ghosts[0].scared = true;
        let view = FrameView::of(&w);
        assert_eq!(view.ghosts[0].sprite, Some(SpriteId::RedGhost));

        w.scared = true;
        let view = FrameView::of(&w);
        assert_eq!(view.ghosts[0].sprite, Some(SpriteId::ScaredGhost));
        assert_eq!(view.ghosts[1].sprite, Some(SpriteId::BlueGhost));
    }

    #[test]
    fn hud_reflects_phase_and_counters() {
        let mut w = world();
        w.add_score(30);
        let view = FrameView::of(&w);
        assert_eq!(view.hud, Hud {
            lives: 3, score: 30, high_score: 30, level: 1, paused: true, game_over: false,
        });

        w.phase = Phase::GameOver;
        let hud = FrameView::of(&w).hud;
        assert!(hud.game_over);
        assert!(!hud.paused);
    }

    #[test]
    fn avatar_draw_carries_directional_sprite() {
        let w = world();
        let view = FrameView::of(&w);
        assert_eq!(view.avatar.sprite, Some(SpriteId::PacmanRight));
        assert_eq!((view.avatar.x, view.avatar.y), (64, 32));
        assert_eq!(view.walls.len(), 14);
        assert_eq!(view.pellets.len(), 1);
        assert!(view.power_pellet.is_none());
    }
}
