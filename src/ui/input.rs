/// Keyboard adapter.
///
/// Drains every pending terminal event once per frame and keeps the fresh
/// key presses, in order. Each press maps to at most one `Command`:
///   Arrows  →  Turn
///   Space   →  TogglePause
///   R       →  Restart
/// Esc, Q and Ctrl+C ask the program to quit.
///
/// Most terminals never report key releases, so the press is the trigger.
/// Auto-repeat events are dropped; holding an arrow does not re-send turns.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Facing;
use crate::sim::command::Command;

pub struct InputState {
    /// Key presses seen during the most recent `drain_events()` call.
    fresh_presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.record(key),
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event read failed: {e}");
                    break;
                }
            }
        }
    }

    fn record(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Press {
            self.fresh_presses.push(key);
        }
    }

    /// Commands for this frame's presses, in the order they were typed.
    pub fn commands(&self) -> Vec<Command> {
        self.fresh_presses.iter()
            .filter_map(|k| command_for_key(k.code))
            .collect()
    }

    pub fn quit_requested(&self) -> bool {
        self.fresh_presses.iter().any(|k| is_quit(k))
    }
}

pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up => Some(Command::Turn(Facing::Up)),
        KeyCode::Down => Some(Command::Turn(Facing::Down)),
        KeyCode::Left => Some(Command::Turn(Facing::Left)),
        KeyCode::Right => Some(Command::Turn(Facing::Right)),
        KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
