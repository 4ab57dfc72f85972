/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::command::{self, Command};
use sim::event::GameEvent;
use sim::level::Catalog;
use sim::step;
use sim::view::FrameView;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sprites::SpriteSheet;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();

    let sheet = match SpriteSheet::load(&config.sprites) {
        Ok(sheet) => sheet,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Cannot start: {e}");
            std::process::exit(1);
        }
    };

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Cannot start: {e}");
            std::process::exit(1);
        }
    };

    let mut world = WorldState::new(config.rules.clone(), catalog);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &sheet, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Chomper!");
    println!("Score: {}   High Score: {}", world.score, world.high_score);
}

/// Mazes from `maze_dir` when it yields any, else the built-in three.
fn load_catalog(config: &GameConfig) -> Result<Catalog, sim::level::MazeError> {
    if let Some(dir) = &config.maze_dir {
        match Catalog::from_dir(dir) {
            Ok(catalog) => {
                log::info!("{} mazes from {}", catalog.len(), dir.display());
                return Ok(catalog);
            }
            Err(e) => log::warn!("maze_dir {}: {e}; using built-in mazes", dir.display()),
        }
    }
    Catalog::builtin()
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sheet: &SpriteSheet,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    log::debug!("gamepad connected: {}", gp.connected);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.rules.tick_rate_ms.max(1));

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_requested() {
            break;
        }

        let commands: Vec<Command> = kb.commands().into_iter().chain(gp.commands()).collect();
        for cmd in commands {
            let was_running = world.is_running();
            let events = command::apply(world, cmd);
            log_events(&events);
            // Resuming starts a fresh period rather than catching up
            if !was_running && world.is_running() {
                last_tick = Instant::now();
            }
        }

        if world.is_running() && last_tick.elapsed() >= tick_rate {
            let events = step::step(world);
            log_events(&events);
            last_tick = Instant::now();
        }

        renderer.render(&FrameView::of(world), sheet)?;

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::LifeLost { .. }
            | GameEvent::LevelCleared { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::Restarted => log::info!("{event:?}"),
            _ => log::debug!("{event:?}"),
        }
    }
}
