/// WorldState: the complete snapshot of a running game.
///
/// ## Ownership
///
/// The world exclusively owns every entity set. Walls, pellets, cherries and
/// ghosts are plain `Vec<Block>`s (membership is the only query); the
/// avatar is always present and the power pellet is optional.
///
/// ## Counters that survive a maze load
///
/// `score`, `high_score`, `lives` and `level` live here rather than with
/// the entities, so `level::load_map` can rebuild the board without
/// touching them.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::RuleConfig;
use crate::domain::ai::{self, RedirectClock};
use crate::domain::entity::{Block, Kind, SpriteId};
use crate::domain::physics::Board;

use super::level::{self, Catalog};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Paused,
    Running,
    GameOver,
}

pub struct WorldState {
    // ── Entities ──
    pub walls: Vec<Block>,
    pub pellets: Vec<Block>,
    pub cherries: Vec<Block>,
    pub ghosts: Vec<Block>,
    pub avatar: Block,
    pub power_pellet: Option<Block>,

    pub board: Board,

    // ── HUD ──
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub level: u32,

    // ── Engine state ──
    pub phase: Phase,
    pub scared: bool,
    pub scare_elapsed_ms: u32,
    pub redirect: RedirectClock,
    pub tick: u64,

    pub rules: RuleConfig,
    pub catalog: Catalog,
    pub rng: Pcg32,
}

// ── Construction ──

impl WorldState {
    /// Fresh game on level 1, paused.
    pub fn new(rules: RuleConfig, catalog: Catalog) -> Self {
        let seed = rules.seed.unwrap_or_else(rand::random);
        let mut world = WorldState {
            walls: vec![],
            pellets: vec![],
            cherries: vec![],
            ghosts: vec![],
            avatar: Block::new(Kind::Avatar, 0, 0, 0, 0, Some(SpriteId::PacmanRight)),
            power_pellet: None,
            board: Board::standard(),
            score: 0,
            high_score: 0,
            lives: rules.lives,
            level: 1,
            phase: Phase::Paused,
            scared: false,
            scare_elapsed_ms: 0,
            redirect: RedirectClock::new(rules.ghost_redirect_ticks),
            tick: 0,
            rules,
            catalog,
            rng: Pcg32::seed_from_u64(seed),
        };
        level::load_map(&mut world, 1);
        world
    }
}

// ── Scoring / reset ──

impl WorldState {
    /// Add points; the high score follows whenever it is matched or passed.
    pub fn add_score(&mut self, points: u32) {
        self.score += points;
        if self.score >= self.high_score {
            self.high_score = self.score;
        }
    }

    /// Avatar home and stopped (facing kept); every ghost home with a
    /// fresh random heading.
    pub fn reset_positions(&mut self) {
        self.avatar.reset();
        self.avatar.stop();
        for ghost in self.ghosts.iter_mut() {
            ghost.reset();
            ai::redirect(ghost, &self.walls, &mut self.rng);
        }
    }

    /// Start over from level 1 with full lives and zero score.
    /// The high score is kept for the life of the process.
    pub fn restart(&mut self) {
        self.level = 1;
        self.score = 0;
        self.lives = self.rules.lives;
        self.scared = false;
        self.scare_elapsed_ms = 0;
        level::load_map(self, 1);
        self.reset_positions();
        self.redirect.reset();
        self.phase = Phase::Paused;
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Maze;

    fn rules() -> RuleConfig {
        RuleConfig { seed: Some(3), cherry_one_in: 0, ..RuleConfig::default() }
    }

    fn world_from(rows: &[&str]) -> WorldState {
        let maze = Maze::parse("test", rows).unwrap();
        WorldState::new(rules(), Catalog::from_mazes(vec![maze]).unwrap())
    }

    #[test]
    fn new_world_starts_paused_on_level_one() {
        let w = WorldState::new(rules(), Catalog::builtin().unwrap());
        assert_eq!(w.phase, Phase::Paused);
        assert_eq!(w.level, 1);
        assert_eq!(w.lives, 3);
        assert_eq!(w.score, 0);
        assert_eq!(w.high_score, 0);
        assert!(!w.scared);
    }

    #[test]
    fn high_score_tracks_score() {
        let mut w = world_from(&["XP X"]);
        w.add_score(10);
        assert_eq!((w.score, w.high_score), (10, 10));
        w.score = 0;
        w.add_score(5);
        assert_eq!((w.score, w.high_score), (5, 10));
        w.add_score(5);
        assert_eq!((w.score, w.high_score), (10, 10));
        w.add_score(1);
        assert_eq!(w.high_score, 11);
    }

    #[test]
    fn reset_positions_stops_avatar_at_home() {
        let mut w = world_from(&["X  P  X"]);
        w.avatar.set_facing(crate::domain::entity::Facing::Left);
        w.avatar.x -= 16;
        w.reset_positions();
        assert_eq!((w.avatar.x, w.avatar.y), (96, 0));
        assert_eq!((w.avatar.vx, w.avatar.vy), (0, 0));
        assert_eq!(w.avatar.facing, crate::domain::entity::Facing::Left);
    }

    #[test]
    fn restart_keeps_high_score() {
        let mut w = world_from(&["XP  X"]);
        w.add_score(120);
        w.lives = 0;
        w.level = 3;
        w.phase = Phase::GameOver;
        w.restart();
        assert_eq!(w.score, 0);
        assert_eq!(w.high_score, 120);
        assert_eq!(w.lives, 3);
        assert_eq!(w.level, 1);
        assert_eq!(w.phase, Phase::Paused);
        assert_eq!(w.redirect.frame_count, 0);
    }
}
