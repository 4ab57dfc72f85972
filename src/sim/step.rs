/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Scare countdown
///   2. Avatar movement (advance → wall undo → wraparound)
///   3. Ghosts, one at a time:
///      avatar contact → advance → cadence redirect → wall undo → wraparound
///   4. Power pellet
///   5. Cherry (at most one)
///   6. Pellet (at most one)
///   7. Level clear
///
/// Nothing happens unless the phase is `Running`. Losing the last life ends
/// the tick on the spot.

use crate::domain::ai;
use crate::domain::physics;
use super::event::GameEvent;
use super::level;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState) -> Vec<GameEvent> {
    if world.phase != Phase::Running { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    resolve_scare_timer(world, &mut events);
    resolve_avatar_movement(world);
    if resolve_ghosts(world, &mut events) { return events; }
    resolve_power_pellet(world, &mut events);
    resolve_cherry(world, &mut events);
    resolve_pellet(world, &mut events);
    resolve_level_clear(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Scare countdown
// ══════════════════════════════════════════════════════════════

fn resolve_scare_timer(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if !world.scared { return; }

    let tick_ms = u32::try_from(world.rules.tick_rate_ms.max(1)).unwrap_or(u32::MAX);
    world.scare_elapsed_ms = world.scare_elapsed_ms.saturating_add(tick_ms);
    if world.scare_elapsed_ms >= world.rules.scare_duration_ms {
        world.scared = false;
        world.scare_elapsed_ms = 0;
        for ghost in world.ghosts.iter_mut() {
            ghost.scared = false;
        }
        events.push(GameEvent::ScareEnded);
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_avatar_movement(world: &mut WorldState) {
    physics::advance(&mut world.avatar, &world.walls);
    physics::wrap(&mut world.avatar, world.board);
}

/// Returns true if the game ended during the ghost pass.
fn resolve_ghosts(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    // One clock tick per world tick, shared by every ghost
    let redirect_all = world.redirect.tick();

    for i in 0..world.ghosts.len() {
        if physics::overlaps(&world.ghosts[i], &world.avatar) {
            if world.scared && world.ghosts[i].scared {
                world.add_score(world.rules.points.ghost);
                let ghost = &mut world.ghosts[i];
                ghost.scared = false;
                ghost.reset();
                ai::redirect(ghost, &world.walls, &mut world.rng);
                log::debug!("ghost {i} eaten on tick {}", world.tick);
                events.push(GameEvent::GhostEaten { index: i });
            } else {
                world.lives = world.lives.saturating_sub(1);
                events.push(GameEvent::LifeLost { lives_left: world.lives });
                world.reset_positions();
                if world.lives == 0 {
                    world.phase = Phase::GameOver;
                    events.push(GameEvent::GameOver { score: world.score });
                    return true;
                }
            }
        }

        let ghost = &mut world.ghosts[i];
        let (prev_x, prev_y) = (ghost.x, ghost.y);
        physics::step(ghost);

        if redirect_all {
            ai::redirect(ghost, &world.walls, &mut world.rng);
        }

        if physics::hits_any(ghost, &world.walls) {
            ghost.x = prev_x;
            ghost.y = prev_y;
            ai::redirect(ghost, &world.walls, &mut world.rng);
        }

        physics::wrap(ghost, world.board);
    }

    false
}

// ══════════════════════════════════════════════════════════════
// Consumption
// ══════════════════════════════════════════════════════════════

fn resolve_power_pellet(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let eaten = world.power_pellet.as_ref()
        .map_or(false, |p| physics::overlaps(&world.avatar, p));
    if !eaten { return; }

    world.add_score(world.rules.points.power_pellet);
    for ghost in world.ghosts.iter_mut() {
        ghost.scared = true;
    }
    world.scared = true;
    world.scare_elapsed_ms = 0;
    world.power_pellet = None;
    log::debug!("power pellet eaten");
    events.push(GameEvent::PowerPelletEaten);
}

fn resolve_cherry(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if let Some(i) = physics::first_overlap(&world.avatar, &world.cherries) {
        let cherry = world.cherries.remove(i);
        world.add_score(world.rules.points.cherry);
        log::debug!("cherry eaten at ({}, {})", cherry.x, cherry.y);
        events.push(GameEvent::CherryEaten { x: cherry.x, y: cherry.y });
    }
}

fn resolve_pellet(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if let Some(i) = physics::first_overlap(&world.avatar, &world.pellets) {
        let pellet = world.pellets.remove(i);
        world.add_score(world.rules.points.pellet);
        events.push(GameEvent::PelletEaten { x: pellet.x, y: pellet.y });
    }
}

// ══════════════════════════════════════════════════════════════
// Level clear
// ══════════════════════════════════════════════════════════════

fn resolve_level_clear(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if !world.pellets.is_empty() { return; }

    world.level += 1;
    let next = world.level;
    level::load_map(world, next);
    world.reset_positions();
    world.redirect.reset();
    world.add_score(world.rules.points.level_clear);
    events.push(GameEvent::LevelCleared { next_level: next });
}
