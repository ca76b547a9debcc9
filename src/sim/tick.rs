//! Per-frame simulation step
//!
//! Order within a frame: hero, arrows, quiver/hand bookkeeping, slimes,
//! spawning. Rendering reads the state afterwards.

use glam::Vec2;

use super::arrow::ArrowState;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent per axis, each in {-1, 0, 1}
    pub movement: Vec2,
    /// Cursor position in world space
    pub cursor: Vec2,
    /// Release the arrow in hand (edge triggered)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the hero plays itself
    pub idle_mode: bool,
}

/// Advance the session by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.2}s", state.elapsed);
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }
    if state.phase == GamePhase::Paused || dt <= 0.0 {
        return;
    }

    state.elapsed += dt;
    state.frame += 1;

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;
    let hero_alive = state.hero.alive();

    // Hero
    let intent = if hero_alive { input.movement } else { Vec2::ZERO };
    state.hero.update(dt, intent, &state.world);
    if hero_alive {
        state.aim_bow(input.cursor);
    }

    // Arrows
    for arrow in &mut state.arrows {
        arrow.update(dt, &state.world);
    }

    // Hand, quiver and arrows on the floor
    state.draw_arrow();
    if hero_alive {
        if input.fire {
            state.fire(input.cursor);
        }
        state.recover_arrows();
        state.attach_carried_arrows(input.cursor);
    }

    // Slimes
    let mut killed_at = Vec::new();
    {
        let GameState {
            slimes,
            hero,
            arrows,
            world,
            ..
        } = &mut *state;
        for slime in slimes.iter_mut() {
            if slime.update(dt, hero, arrows, world) {
                killed_at.push(slime.pos());
            }
        }
    }
    for pos in killed_at {
        let points = state.kill_score(pos);
        state.score += points;
        state.kills += 1;
        log::debug!("Slime killed at {pos:?} for {points} points");
    }

    // Spawning
    if state.elapsed > state.next_spawn_at {
        state.spawn_slime();
        state.next_spawn_at = state.spawn_schedule.next(state.elapsed);
    }

    if state.phase == GamePhase::Playing && !state.hero.alive() {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at {:.1}s: score {} ({} kills)",
            state.elapsed,
            state.score,
            state.kills
        );
    }
}

/// Map a direction to per-axis intents, ignoring weak components
fn intent_toward(v: Vec2) -> Vec2 {
    let dead = v.length() * 0.25;
    let axis = |c: f32| {
        if c > dead {
            1.0
        } else if c < -dead {
            -1.0
        } else {
            0.0
        }
    };
    Vec2::new(axis(v.x), axis(v.y))
}

/// Drive the hero: shoot the nearest slime, back off when one gets close,
/// and collect arrows when it is quiet
fn autopilot(state: &GameState, input: &mut TickInput) {
    let hero = state.hero.pos();
    let nearest = state
        .slimes
        .iter()
        .filter(|s| s.alive)
        .min_by(|a, b| {
            a.pos()
                .distance_squared(hero)
                .partial_cmp(&b.pos().distance_squared(hero))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let stuck = state
        .arrows
        .iter()
        .filter(|a| a.state == ArrowState::Stuck)
        .min_by(|a, b| {
            a.pos()
                .distance_squared(hero)
                .partial_cmp(&b.pos().distance_squared(hero))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    input.movement = Vec2::ZERO;
    input.fire = false;

    let threat = nearest.map(|s| (s.pos(), s.pos().distance(hero)));
    if let Some((pos, dist)) = threat {
        input.cursor = pos;
        input.fire = state.quiver.in_hand.is_some() && (40.0..=220.0).contains(&dist);
        if dist < SLIME_SENSE_RADIUS * 0.6 {
            input.movement = intent_toward(hero - pos);
            return;
        }
    }
    let quiet = threat.is_none_or(|(_, d)| d > SLIME_SENSE_RADIUS * 1.2);
    if let Some(arrow) = stuck {
        if quiet || state.quiver.available() == 0 {
            input.movement = intent_toward(arrow.pos() - hero);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = SIM_DT;

    fn run(state: &mut GameState, input: &TickInput, seconds: f32) {
        let frames = (seconds / DT).ceil() as u32;
        for _ in 0..frames {
            tick(state, input, DT);
        }
    }

    fn place_slime(state: &mut GameState, pos: Vec2, speed: f32) -> usize {
        let slot = 0;
        state.slimes[slot].spawn(&mut state.rng, pos, 0.0);
        state.slimes[slot].speed = speed;
        slot
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default(), DT);
        let elapsed = state.elapsed;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        run(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.elapsed, elapsed);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.elapsed > elapsed);
    }

    #[test]
    fn test_fire_and_recover_cycle() {
        let mut state = GameState::new(1);
        let idle = TickInput {
            cursor: state.hero.pos() + Vec2::new(30.0, 0.0),
            ..Default::default()
        };
        run(&mut state, &idle, 1.1);
        assert!(state.quiver.in_hand.is_some());
        assert_eq!(state.quiver.available(), 3);
        assert_eq!(state.arrows_in(ArrowState::InHand), 1);

        let fire = TickInput {
            fire: true,
            ..idle.clone()
        };
        tick(&mut state, &fire, DT);
        assert_eq!(state.arrows_in(ArrowState::Flying), 1);
        assert_eq!(state.quiver.available(), 2);

        run(&mut state, &idle, 0.5);
        assert_eq!(state.arrows_in(ArrowState::Stuck), 1);
        assert_eq!(state.quiver.available(), 2);

        let walk = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..idle.clone()
        };
        let mut frames = 0;
        while state.quiver.available() < 3 {
            tick(&mut state, &walk, DT);
            frames += 1;
            assert!(frames < 120, "hero never picked the arrow up");
        }
        assert_eq!(state.arrows_in(ArrowState::Stuck), 0);
        assert_eq!(state.arrows_in(ArrowState::Flying), 0);
    }

    #[test]
    fn test_stuck_arrow_stays_stuck_without_hero() {
        let mut state = GameState::new(1);
        let target = state.hero.pos() + Vec2::new(200.0, 100.0);
        let idle = TickInput {
            cursor: target,
            ..Default::default()
        };
        run(&mut state, &idle, 1.1);
        tick(&mut state, &TickInput { fire: true, ..idle.clone() }, DT);
        run(&mut state, &idle, 3.0);
        assert_eq!(state.arrows_in(ArrowState::Stuck), 1);
        run(&mut state, &idle, 3.0);
        assert_eq!(state.arrows_in(ArrowState::Stuck), 1);
    }

    #[test]
    fn test_grounded_arrow_scores_kill() {
        let mut state = GameState::new(1);
        let target = state.hero.pos() + Vec2::new(100.0, 0.0);
        let slot = place_slime(&mut state, target, 0.0);
        let idle = TickInput {
            cursor: target,
            ..Default::default()
        };
        run(&mut state, &idle, 1.1);
        tick(&mut state, &TickInput { fire: true, ..idle.clone() }, DT);
        run(&mut state, &idle, 1.0);

        assert!(!state.slimes[slot].alive);
        assert_eq!(state.kills, 1);
        assert!((99..=101).contains(&state.score));
        assert_eq!(state.arrows_in(ArrowState::Stuck), 1);
    }

    #[test]
    fn test_slimes_spawn_on_schedule() {
        let mut state = GameState::new(5);
        run(&mut state, &TickInput::default(), SPAWN_INTERVAL - 0.5);
        assert_eq!(state.live_slimes(), 0);
        run(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.live_slimes(), 1);
        assert!(state.next_spawn_at > SPAWN_INTERVAL);
    }

    #[test]
    fn test_game_over_freezes_hero() {
        let mut state = GameState::new(2);
        state.hero.health = 1.0;
        let pos = state.hero.pos();
        place_slime(&mut state, pos, 0.0);
        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.hero.alive());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.game_over());

        let walk = TickInput {
            movement: Vec2::new(1.0, 1.0),
            fire: true,
            ..Default::default()
        };
        run(&mut state, &walk, 1.0);
        assert_eq!(state.hero.pos(), pos);
        assert_eq!(state.hero.health, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        run(&mut state1, &input, 30.0);
        run(&mut state2, &input, 30.0);

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.live_slimes(), state2.live_slimes());
        assert_eq!(state1.hero.pos(), state2.hero.pos());
    }

    #[test]
    fn test_autopilot_session_holds_invariants() {
        let mut state = GameState::new(2024);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..(90.0 / DT) as u32 {
            tick(&mut state, &input, DT);
            let hero = &state.hero;
            assert!(hero.vel.length() <= hero.max_speed + 1e-3);
            assert!(hero.health >= 0.0 && hero.health <= hero.max_health);
            assert!(state.quiver.available() <= state.arrows.len());
            let carried = state.arrows_in(ArrowState::InQuiver) + state.arrows_in(ArrowState::InHand);
            assert_eq!(carried, state.quiver.available());
        }
        assert!(state.live_slimes() + state.kills as usize >= 1);
    }
}
