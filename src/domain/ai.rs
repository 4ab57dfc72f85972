/// Ghost AI: a random walk constrained by walls.
///
/// Ghosts keep their heading until one of three things happens:
///   1. They walk into a wall → pick a fresh random facing.
///   2. The shared redirect clock fires → every ghost re-picks at once.
///   3. They are reset (capture, life loss, level load) → re-pick.
///
/// Re-picks go through `physics::update_direction`, so a pick that points
/// into a wall is silently refused and the old heading is kept.

use rand::Rng;

use super::entity::{Block, Facing};
use super::physics;

/// Uniform pick from {Up, Down, Left, Right}.
pub fn random_facing<R: Rng + ?Sized>(rng: &mut R) -> Facing {
    Facing::ALL[rng.random_range(0..Facing::ALL.len())]
}

/// Pick a random facing and try to turn to it.
pub fn redirect<R: Rng + ?Sized>(ghost: &mut Block, walls: &[Block], rng: &mut R) {
    let facing = random_facing(rng);
    physics::update_direction(ghost, facing, walls);
}

/// Shared frame counter for the redirect cadence.
///
/// Counts ticks; on the tick where the count reaches `period` it resets
/// and reports that all ghosts should re-pick.
#[derive(Clone, Debug)]
pub struct RedirectClock {
    pub frame_count: u32,
    period: u32,
}

impl RedirectClock {
    pub fn new(period: u32) -> Self {
        RedirectClock { frame_count: 0, period }
    }

    /// Advance one tick. Returns true on the cadence tick.
    pub fn tick(&mut self) -> bool {
        self.frame_count += 1;
        if self.period > 0 && self.frame_count >= self.period {
            self.frame_count = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.frame_count = 0;
    }
}
