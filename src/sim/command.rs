/// Player commands and the engine state machine.
///
/// ```text
///            TogglePause           lives hit 0
///   Paused ──────────────▶ Running ───────────▶ GameOver
///     ▲  ◀──────────────────┘                      │
///     │      TogglePause                           │
///     └────────────────────────────────────────────┘
///                        Restart
/// ```
///
/// Commands are applied between ticks. Input adapters only translate
/// devices into `Command`s; all gating lives here.

use crate::domain::entity::{Facing, SpriteId};
use crate::domain::physics;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Turn(Facing),
    TogglePause,
    Restart,
}

pub fn apply(world: &mut WorldState, command: Command) -> Vec<GameEvent> {
    match command {
        Command::Turn(facing) => {
            if world.is_running() {
                physics::update_direction(&mut world.avatar, facing, &world.walls);
                // Sprite follows the facing that stuck, not the one requested
                world.avatar.sprite = Some(SpriteId::for_avatar(world.avatar.facing));
            }
            vec![]
        }
        Command::TogglePause => match world.phase {
            Phase::Running => {
                world.phase = Phase::Paused;
                world.redirect.reset();
                vec![GameEvent::Paused]
            }
            Phase::Paused => {
                world.phase = Phase::Running;
                vec![GameEvent::Resumed]
            }
            Phase::GameOver => vec![],
        },
        Command::Restart => {
            if world.phase != Phase::GameOver { return vec![]; }
            world.restart();
            vec![GameEvent::Restarted]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::sim::level::{Catalog, Maze};

    fn world_from(rows: &[&str]) -> WorldState {
        let rules = RuleConfig { seed: Some(9), cherry_one_in: 0, ..RuleConfig::default() };
        let maze = Maze::parse("test", rows).unwrap();
        WorldState::new(rules, Catalog::from_mazes(vec![maze]).unwrap())
    }

    const CORNER: [&str; 3] = [
        "XXXX",
        "XP X",
        "X XX",
    ];

    #[test]
    fn space_toggles_between_paused_and_running() {
        let mut w = world_from(&CORNER);
        assert_eq!(apply(&mut w, Command::TogglePause), vec![GameEvent::Resumed]);
        assert_eq!(w.phase, Phase::Running);
        w.redirect.tick();
        assert_eq!(apply(&mut w, Command::TogglePause), vec![GameEvent::Paused]);
        assert_eq!(w.phase, Phase::Paused);
        assert_eq!(w.redirect.frame_count, 0);
    }

    #[test]
    fn pause_is_ignored_after_game_over() {
        let mut w = world_from(&CORNER);
        w.phase = Phase::GameOver;
        assert!(apply(&mut w, Command::TogglePause).is_empty());
        assert_eq!(w.phase, Phase::GameOver);
    }

    #[test]
    fn restart_only_from_game_over() {
        let mut w = world_from(&CORNER);
        w.add_score(30);
        assert!(apply(&mut w, Command::Restart).is_empty());
        apply(&mut w, Command::TogglePause);
        assert!(apply(&mut w, Command::Restart).is_empty());
        assert_eq!(w.score, 30);
        assert_eq!(w.phase, Phase::Running);
    }

    #[test]
    fn turn_ignored_unless_running() {
        let mut w = world_from(&CORNER);
        apply(&mut w, Command::Turn(Facing::Right));
        assert_eq!(w.avatar.x, 32);
        assert_eq!(w.avatar.facing, Facing::Up);
    }

    #[test]
    fn turn_into_open_cell_steps_and_changes_sprite() {
        let mut w = world_from(&CORNER);
        apply(&mut w, Command::TogglePause);
        apply(&mut w, Command::Turn(Facing::Down));
        assert_eq!(w.avatar.facing, Facing::Down);
        assert_eq!((w.avatar.x, w.avatar.y), (32, 40));
        assert_eq!(w.avatar.sprite, Some(SpriteId::PacmanDown));
    }

    #[test]
    fn turn_into_wall_keeps_facing_and_sprite() {
        let mut w = world_from(&CORNER);
        apply(&mut w, Command::TogglePause);
        apply(&mut w, Command::Turn(Facing::Right));
        assert_eq!(w.avatar.x, 40);
        apply(&mut w, Command::Turn(Facing::Down));
        assert_eq!(w.avatar.facing, Facing::Right);
        assert_eq!((w.avatar.x, w.avatar.y), (40, 32));
        assert_eq!(w.avatar.sprite, Some(SpriteId::PacmanRight));
    }

    #[test]
    fn refused_first_turn_shows_up_sprite() {
        let mut w = world_from(&CORNER);
        apply(&mut w, Command::TogglePause);
        apply(&mut w, Command::Turn(Facing::Left));
        assert_eq!(w.avatar.facing, Facing::Up);
        assert_eq!(w.avatar.sprite, Some(SpriteId::PacmanUp));
    }
}
