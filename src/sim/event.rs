/// Events emitted by a simulation step or an applied command.
/// The front end only logs them; tests use them to observe a tick.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PelletEaten { x: i32, y: i32 },
    CherryEaten { x: i32, y: i32 },
    PowerPelletEaten,
    GhostEaten { index: usize },
    LifeLost { lives_left: u32 },
    GameOver { score: u32 },
    ScareEnded,
    LevelCleared { next_level: u32 },
    Paused,
    Resumed,
    Restarted,
}
