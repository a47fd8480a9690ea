//! Entity spawning, motion and culling
//!
//! Hazards are admitted on a level-dependent cooldown, answer tokens arrive
//! in sets of four with each new problem, and beams come from the player.

use glam::Vec2;
use rand::Rng;

use super::layout::layout_tokens;
use super::problem::{generate_problem, generate_wrong_answers};
use super::state::{
    AnswerToken, AsteroidSize, Beam, Entity, EntityKind, GameEvent, GameState, Hazard, HazardKind,
    TokenVisual,
};
use crate::consts::MAX_WEAPON_TIER;
use crate::{ms_to_ticks, rand_range};

/// Entities further than this past an edge are culled
const CULL_BELOW: f32 = 50.0;
const CULL_ABOVE: f32 = 100.0;
const CULL_SIDE: f32 = 100.0;
/// Beams leave a little sooner
const BEAM_MARGIN: f32 = 20.0;

/// Spawn heights (negative = above the top edge)
const ASTEROID_SPAWN_Y: f32 = -40.0;
const ALIEN_SPAWN_Y: f32 = -30.0;
const ALIEN_EDGE_MARGIN: f32 = 30.0;
/// Gap between the player's edge and a freshly fired beam
const BEAM_NOSE_OFFSET: f32 = 4.0;

/// Weapon tier (1-5) for a level
pub fn weapon_tier(level: u32) -> u8 {
    match level {
        0..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        10..=12 => 4,
        _ => MAX_WEAPON_TIER,
    }
}

/// Generate a new problem and drop its four tokens in from the top
pub fn present_problem(state: &mut GameState) {
    let level = state.progress.level;
    let problem = generate_problem(&mut state.rng, level);
    log::debug!("Problem at level {}: {} (answer {})", level, problem, problem.answer);

    state.remove_tokens();
    state.problem = Some(problem);
    state.problem_started_tick = state.time_ticks;
    spawn_answer_tokens(state, problem.answer);
    state.push_event(GameEvent::ProblemPresented { problem });
}

/// Spawn one correct token and three distractors
pub fn spawn_answer_tokens(state: &mut GameState, correct: u32) {
    let mut values = vec![correct];
    values.extend(generate_wrong_answers(&mut state.rng, correct));

    let radius = state.tuning.token_radius;
    let fall = state.tuning.token_fall(state.progress.level);
    let drift = state.tuning.token_drift;
    let slots = layout_tokens(
        &mut state.rng,
        &values,
        state.arena.width,
        radius,
        state.tuning.token_padding,
    );

    for slot in slots {
        let vx = rand_range(&mut state.rng, -drift, drift);
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            pos: Vec2::new(slot.x, -radius),
            vel: Vec2::new(vx, fall),
            radius,
            kind: EntityKind::Token(AnswerToken {
                value: slot.value,
                is_correct: slot.value == correct,
                visual: TokenVisual::Normal,
            }),
        });
    }
}

/// Spawn a hazard if the cooldown has elapsed
pub fn maybe_spawn_hazard(state: &mut GameState) {
    state.spawn_cooldown.advance();
    if state.spawn_cooldown.is_running() {
        return;
    }
    let interval = state.tuning.spawn_interval_ticks(state.progress.level);
    state.spawn_cooldown.start(interval);

    if state.rng.random_bool(state.tuning.alien_chance.clamp(0.0, 1.0)) {
        spawn_alien(state);
    } else {
        spawn_asteroid(state);
    }
}

pub fn spawn_asteroid(state: &mut GameState) {
    let roll: f32 = state.rng.random();
    let size = if roll < 0.6 {
        AsteroidSize::Small
    } else if roll < 0.9 {
        AsteroidSize::Medium
    } else {
        AsteroidSize::Large
    };
    let t = &state.tuning;
    let idx = size.index();
    let radius = t.asteroid_radius[idx];
    let hp = t.asteroid_hp[idx].max(1);
    let (max_drift, max_spin, max_fall) = (t.asteroid_max_drift, t.asteroid_max_spin, t.asteroid_max_fall);
    let base_fall = t.asteroid_base_fall
        + state.progress.level as f32 * t.asteroid_fall_per_level
        + t.asteroid_speed_boost[idx];
    let jitter = t.asteroid_fall_jitter;

    let rng = &mut state.rng;
    let x = rand_range(rng, radius, state.arena.width - radius);
    let vx = rand_range(rng, -max_drift, max_drift);
    let vy = (base_fall + rand_range(rng, 0.0, jitter)).min(max_fall);
    let rotation = rand_range(rng, 0.0, std::f32::consts::TAU);
    let spin = rand_range(rng, -max_spin, max_spin);

    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        pos: Vec2::new(x, ASTEROID_SPAWN_Y),
        vel: Vec2::new(vx, vy),
        radius,
        kind: EntityKind::Hazard(Hazard {
            kind: HazardKind::Asteroid(size),
            hp,
            rotation,
            spin,
        }),
    });
    log::debug!("Spawned {:?} asteroid at x={:.0}", size, x);
}

pub fn spawn_alien(state: &mut GameState) {
    let x = rand_range(
        &mut state.rng,
        ALIEN_EDGE_MARGIN,
        state.arena.width - ALIEN_EDGE_MARGIN,
    );
    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        pos: Vec2::new(x, ALIEN_SPAWN_Y),
        vel: Vec2::new(0.0, state.tuning.alien_fall),
        radius: state.tuning.alien_radius,
        kind: EntityKind::Hazard(Hazard {
            kind: HazardKind::Alien,
            hp: 1,
            rotation: 0.0,
            spin: 0.0,
        }),
    });
    log::debug!("Spawned alien at x={:.0}", x);
}

/// Fire a beam from the player's nose. Returns false if firing is blocked.
pub fn fire_beam(state: &mut GameState) -> bool {
    if state.shooting_disabled || state.beam_cooldown.is_running() {
        return false;
    }
    state
        .beam_cooldown
        .start(ms_to_ticks(state.tuning.beam_cooldown_ms));

    let tier = weapon_tier(state.progress.level);
    let nose = state.player.pos - Vec2::new(0.0, state.player_radius() + BEAM_NOSE_OFFSET);
    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        pos: nose,
        vel: Vec2::new(0.0, -state.tuning.beam_speed(tier)),
        radius: state.tuning.beam_radius(tier),
        kind: EntityKind::Beam(Beam {
            tier,
            life: state.tuning.beam_life,
        }),
    });
    state.push_event(GameEvent::BeamFired { tier });
    true
}

/// Move beams and expire old ones. While shooting is disabled every beam is cleared.
pub fn advance_beams(state: &mut GameState) {
    state.beam_cooldown.advance();

    if state.shooting_disabled {
        state.clear_beams();
        return;
    }

    let height = state.arena.height;
    state.entities.retain_mut(|e| {
        let EntityKind::Beam(beam) = &mut e.kind else {
            return true;
        };
        e.pos += e.vel;
        beam.life = beam.life.saturating_sub(1);
        beam.life > 0 && e.pos.y >= -BEAM_MARGIN && e.pos.y <= height + BEAM_MARGIN
    });
}

/// Per-tick motion for hazards and tokens
pub fn advance_entities(state: &mut GameState) {
    let frame = state.time_ticks as f32;
    let sway = state.tuning.alien_sway_amplitude * (state.tuning.alien_sway_frequency * frame).sin();
    let width = state.arena.width;

    for e in state.entities.iter_mut() {
        match &mut e.kind {
            EntityKind::Beam(_) => continue,
            EntityKind::Hazard(h) => {
                match h.kind {
                    HazardKind::Alien => e.vel.x = sway,
                    HazardKind::Asteroid(_) => h.rotation += h.spin,
                }
                e.pos += e.vel;
            }
            EntityKind::Token(_) => {
                e.pos += e.vel;
                // Bounce off the side walls
                if e.pos.x - e.radius < 0.0 {
                    e.pos.x = e.radius;
                    e.vel.x = e.vel.x.abs();
                } else if e.pos.x + e.radius > width {
                    e.pos.x = width - e.radius;
                    e.vel.x = -e.vel.x.abs();
                }
            }
        }
    }

    // Shooting comes back once the whole new set is on screen
    if state.shooting_disabled
        && state.token_count() > 0
        && state.tokens().all(|t| t.pos.y >= t.radius)
    {
        state.shooting_disabled = false;
    }
}

/// Remove hazards and tokens that left the arena
pub fn cull_entities(state: &mut GameState) {
    let (width, height) = (state.arena.width, state.arena.height);
    state.entities.retain(|e| {
        if e.is_beam() {
            return true;
        }
        e.pos.y <= height + CULL_BELOW
            && e.pos.y >= -CULL_ABOVE
            && e.pos.x >= -CULL_SIDE
            && e.pos.x <= width + CULL_SIDE
    });

    // Every token fell away unanswered: queue a fresh problem
    if state.problem.is_some() && !state.next_problem.is_running() && state.token_count() == 0 {
        let delay = ms_to_ticks(state.tuning.tokens_lost_delay_ms);
        log::debug!("Tokens lost, next problem in {} ticks", delay);
        state.next_problem.start(delay.max(1));
    }
}
