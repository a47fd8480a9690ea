//! Circle-circle collision resolution
//!
//! Two passes per tick:
//! 1. Player body vs hazards/tokens: at most one contact per tick.
//! 2. Beams vs hazards first, then tokens: each beam hits at most once.

use glam::Vec2;

use super::progression::{resolve_answer, take_damage};
use super::state::{AnswerToken, EntityKind, GameEvent, GamePhase, GameState, HazardKind};

/// True if two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Run both collision passes. The beam pass is skipped if the player pass
/// ended gameplay for this tick.
pub fn resolve_collisions(state: &mut GameState) {
    resolve_player_contact(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_beam_hits(state);
}

/// Player body vs the first overlapping hazard or token
pub fn resolve_player_contact(state: &mut GameState) {
    if state.player.is_protected() {
        return;
    }
    let (pp, pr) = (state.player.pos, state.player_radius());

    let Some(idx) = state
        .entities
        .iter()
        .position(|e| !e.is_beam() && circles_overlap(pp, pr, e.pos, e.radius))
    else {
        return;
    };

    match state.entities[idx].kind {
        EntityKind::Hazard(_) => {
            let hazard = state.entities.remove(idx);
            let impact = (pp + hazard.pos) / 2.0;
            state.push_event(GameEvent::PlayerHit { pos: impact });
            take_damage(state);
        }
        EntityKind::Token(token) => {
            let pos = state.entities[idx].pos;
            state.push_event(GameEvent::TokenCollected { pos });
            resolve_answer(state, token, pos);
        }
        EntityKind::Beam(_) => {}
    }
}

/// Beams vs entities, hazards taking priority over tokens
pub fn resolve_beam_hits(state: &mut GameState) {
    let n = state.entities.len();
    let mut removed = vec![false; n];
    let mut events = Vec::new();
    let mut killed_hazard = false;
    let mut answer_hit: Option<(AnswerToken, Vec2)> = None;

    for bi in 0..n {
        let EntityKind::Beam(beam) = state.entities[bi].kind else {
            continue;
        };
        let bpos = state.entities[bi].pos;
        let br = state.tuning.beam_radius(beam.tier);

        let entities = &state.entities;
        let hazard_idx = (0..n).find(|&i| {
            !removed[i]
                && entities[i].is_hazard()
                && circles_overlap(bpos, br, entities[i].pos, entities[i].radius)
        });

        if let Some(i) = hazard_idx {
            removed[bi] = true;
            let target = &mut state.entities[i];
            let EntityKind::Hazard(hazard) = &mut target.kind else {
                continue;
            };
            let destroyed = match hazard.kind {
                HazardKind::Alien => true,
                HazardKind::Asteroid(_) => {
                    hazard.hp = hazard.hp.saturating_sub(1);
                    hazard.hp == 0
                }
            };
            if destroyed {
                removed[i] = true;
                killed_hazard = true;
                events.push(GameEvent::HazardDestroyed {
                    pos: target.pos,
                    kind: hazard.kind,
                });
            } else {
                events.push(GameEvent::HazardDamaged { pos: target.pos });
            }
            continue;
        }

        // The token set resolves at most once per tick
        if answer_hit.is_some() {
            continue;
        }
        let entities = &state.entities;
        let token_idx = (0..n).find(|&i| {
            !removed[i]
                && entities[i].is_token()
                && circles_overlap(bpos, br, entities[i].pos, entities[i].radius)
        });
        if let Some(i) = token_idx {
            removed[bi] = true;
            if let EntityKind::Token(token) = entities[i].kind {
                answer_hit = Some((token, entities[i].pos));
            }
        }
    }

    let mut idx = 0;
    state.entities.retain(|_| {
        let keep = !removed[idx];
        idx += 1;
        keep
    });
    state.events.extend(events);

    if killed_hazard {
        let floor = state.tuning.kill_invuln_floor;
        state.player.raise_invuln(floor);
    }

    if let Some((token, pos)) = answer_hit {
        resolve_answer(state, token, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::present_problem;
    use crate::sim::state::{Arena, AsteroidSize, Beam, Entity, Hazard};
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(9, Arena::new(800.0, 600.0), Tuning::default());
        state.phase = GamePhase::Playing;
        state
    }

    fn push_asteroid(state: &mut GameState, pos: Vec2, size: AsteroidSize, hp: u8) -> u32 {
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: state.tuning.asteroid_radius[size.index()],
            kind: EntityKind::Hazard(Hazard {
                kind: HazardKind::Asteroid(size),
                hp,
                rotation: 0.0,
                spin: 0.0,
            }),
        });
        id
    }

    fn push_beam(state: &mut GameState, pos: Vec2, tier: u8) {
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            pos,
            vel: Vec2::new(0.0, -11.0),
            radius: state.tuning.beam_radius(tier),
            kind: EntityKind::Beam(Beam { tier, life: 100 }),
        });
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_player_hits_hazard() {
        let mut state = playing_state();
        let pos = state.player.pos;
        push_asteroid(&mut state, pos, AsteroidSize::Small, 1);
        resolve_collisions(&mut state);

        assert_eq!(state.progress.health, 2);
        assert_eq!(state.player.invuln_frames, 90);
        assert_eq!(state.hazard_count(), 0);
    }

    #[test]
    fn test_invulnerable_or_shielded_player_ignores_contact() {
        let mut state = playing_state();
        let pos = state.player.pos;
        push_asteroid(&mut state, pos, AsteroidSize::Small, 1);

        state.player.invuln_frames = 1;
        resolve_collisions(&mut state);
        assert_eq!(state.progress.health, 3);

        state.player.invuln_frames = 0;
        state.grant_shield(10);
        resolve_collisions(&mut state);
        assert_eq!(state.progress.health, 3);
        assert_eq!(state.hazard_count(), 1);
    }

    #[test]
    fn test_one_player_contact_per_tick() {
        let mut state = playing_state();
        let pos = state.player.pos;
        push_asteroid(&mut state, pos, AsteroidSize::Small, 1);
        push_asteroid(&mut state, pos + Vec2::new(3.0, 0.0), AsteroidSize::Small, 1);
        resolve_player_contact(&mut state);
        assert_eq!(state.progress.health, 2);
        assert_eq!(state.hazard_count(), 1);
    }

    #[test]
    fn test_player_touches_token() {
        let mut state = playing_state();
        present_problem(&mut state);
        let correct = state
            .entities
            .iter_mut()
            .find(|e| e.as_token().is_some_and(|t| t.is_correct))
            .unwrap();
        correct.pos = state.player.pos;
        resolve_collisions(&mut state);

        assert_eq!(state.progress.total_correct, 1);
        assert_eq!(state.token_count(), 0);
        assert!(matches!(state.events[1], GameEvent::TokenCollected { .. }));
    }

    #[test]
    fn test_small_asteroid_one_shot_raises_invuln_floor() {
        for tier in 1..=5 {
            let mut state = playing_state();
            state.player.invuln_frames = 5;
            push_asteroid(&mut state, Vec2::new(100.0, 100.0), AsteroidSize::Small, 1);
            push_beam(&mut state, Vec2::new(100.0, 110.0), tier);
            resolve_beam_hits(&mut state);

            assert_eq!(state.hazard_count(), 0);
            assert_eq!(state.beam_count(), 0);
            assert_eq!(state.player.invuln_frames, 20);
        }
    }

    #[test]
    fn test_invuln_floor_never_lowers() {
        let mut state = playing_state();
        state.player.invuln_frames = 60;
        push_asteroid(&mut state, Vec2::new(100.0, 100.0), AsteroidSize::Small, 1);
        push_beam(&mut state, Vec2::new(100.0, 100.0), 1);
        resolve_beam_hits(&mut state);
        assert_eq!(state.player.invuln_frames, 60);
    }

    #[test]
    fn test_large_asteroid_takes_three_hits() {
        let mut state = playing_state();
        push_asteroid(&mut state, Vec2::new(100.0, 100.0), AsteroidSize::Large, 3);
        for hit in 1..=3 {
            push_beam(&mut state, Vec2::new(100.0, 100.0), 1);
            resolve_beam_hits(&mut state);
            let expected = if hit < 3 { 1 } else { 0 };
            assert_eq!(state.hazard_count(), expected);
        }
        assert_eq!(state.player.invuln_frames, 20);
    }

    #[test]
    fn test_hazard_shields_token_behind_it() {
        let mut state = playing_state();
        present_problem(&mut state);
        let token_pos = Vec2::new(400.0, 200.0);
        for e in state.entities.iter_mut() {
            e.pos = token_pos;
        }
        push_asteroid(&mut state, token_pos, AsteroidSize::Medium, 2);
        push_beam(&mut state, token_pos, 1);
        resolve_beam_hits(&mut state);

        // Beam spent on the asteroid, tokens untouched
        assert_eq!(state.token_count(), 4);
        assert_eq!(state.hazard_count(), 1);
        assert_eq!(state.progress.total_correct + state.progress.total_wrong, 0);
    }

    #[test]
    fn test_two_beams_resolve_tokens_once() {
        let mut state = playing_state();
        present_problem(&mut state);
        let pos = Vec2::new(400.0, 200.0);
        for e in state.entities.iter_mut() {
            e.pos = pos;
        }
        push_beam(&mut state, pos, 1);
        push_beam(&mut state, pos, 1);
        resolve_beam_hits(&mut state);

        assert_eq!(state.progress.questions_in_level, 1);
        assert_eq!(state.token_count(), 0);
        // Second beam flies on and is cleared next tick
        assert_eq!(state.beam_count(), 1);
        assert!(state.shooting_disabled);
    }

    #[test]
    fn test_alien_dies_in_one_hit() {
        let mut state = playing_state();
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            pos: Vec2::new(300.0, 100.0),
            vel: Vec2::ZERO,
            radius: 18.0,
            kind: EntityKind::Hazard(Hazard {
                kind: HazardKind::Alien,
                hp: 1,
                rotation: 0.0,
                spin: 0.0,
            }),
        });
        push_beam(&mut state, Vec2::new(300.0, 120.0), 2);
        resolve_beam_hits(&mut state);
        assert_eq!(state.hazard_count(), 0);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::HazardDestroyed {
                kind: HazardKind::Alien,
                ..
            }
        )));
    }
}
