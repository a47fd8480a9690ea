//! Per-frame simulation tick and phase transitions
//!
//! One call to [`tick`] advances the world by exactly one frame. World
//! updates only happen in `Playing`; every other phase only reacts to the
//! pause toggle and to explicit acknowledgment calls.

use super::collision::resolve_collisions;
use super::player::update_player;
use super::progression::check_evolution;
use super::spawn::{
    advance_beams, advance_entities, cull_entities, fire_beam, maybe_spawn_hazard,
    present_problem,
};
use super::state::{GamePhase, GameState, PauseGate, Progression};

/// Logical actions held during a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Fire beams (held)
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match (state.phase, state.gate) {
            (GamePhase::Playing, _) => {
                state.pause();
                return;
            }
            (GamePhase::Paused, Some(PauseGate::User)) => {
                state.acknowledge_pause();
            }
            _ => {}
        }
    }

    // Don't tick unless playing
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;

    update_player(state, input);
    if input.fire {
        fire_beam(state);
    }
    advance_beams(state);

    resolve_collisions(state);
    // Game over or level-up: the rest of the world waits
    if state.phase != GamePhase::Playing {
        state.normalize_order();
        return;
    }

    advance_entities(state);
    maybe_spawn_hazard(state);
    cull_entities(state);

    if state.next_problem.advance() {
        present_problem(state);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Steer toward the correct token, dodge hazards falling overhead, fire when lined up
fn autopilot(state: &GameState, input: &mut TickInput) {
    const DEAD_ZONE: f32 = 6.0;
    const THREAT_RANGE: f32 = 160.0;

    let p = state.player.pos;
    let radius = state.player_radius();
    let home_y = state.arena.height * 0.8;

    let threat = state
        .entities
        .iter()
        .filter(|e| e.is_hazard())
        .filter(|e| e.pos.y < p.y && p.y - e.pos.y < THREAT_RANGE)
        .filter(|e| (e.pos.x - p.x).abs() < e.radius + radius + 10.0)
        .min_by(|a, b| (p.y - a.pos.y).total_cmp(&(p.y - b.pos.y)));

    let target = state
        .tokens()
        .find(|e| e.as_token().is_some_and(|t| t.is_correct));

    let target_x = match (threat, target) {
        (Some(h), _) => {
            // Sidestep toward the roomier side
            if h.pos.x >= p.x && p.x > radius * 3.0 {
                p.x - THREAT_RANGE
            } else {
                p.x + THREAT_RANGE
            }
        }
        (None, Some(t)) => t.pos.x,
        (None, None) => state.arena.width / 2.0,
    };

    input.move_left = target_x < p.x - DEAD_ZONE;
    input.move_right = target_x > p.x + DEAD_ZONE;
    input.move_up = p.y > home_y + DEAD_ZONE;
    input.move_down = p.y < home_y - DEAD_ZONE;
    input.fire = target.is_some_and(|t| (t.pos.x - p.x).abs() < t.radius * 0.5 && t.pos.y > 0.0);
}

impl GameState {
    /// Fresh run: reset progression and transients, show the first problem
    pub fn start_game(&mut self) {
        self.progress = Progression::new(self.tuning.max_health);
        self.reset_transient();
        self.phase = GamePhase::Playing;
        log::info!("Game started (seed {})", self.seed);
        present_problem(self);
    }

    /// Restart after game over (or at any time)
    pub fn restart(&mut self) {
        self.start_game();
    }

    /// Continue from restored progression with fresh transient state
    pub fn apply_save(&mut self, progress: Progression) {
        self.progress = progress;
        self.reset_transient();
        self.phase = GamePhase::Playing;
        log::info!("Resumed saved game at level {}", self.progress.level);
        present_problem(self);
    }

    /// Pause on player request. Only valid while playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.gate = Some(PauseGate::User);
        log::info!("Paused");
        true
    }

    pub fn acknowledge_pause(&mut self) -> bool {
        if self.gate != Some(PauseGate::User) {
            return false;
        }
        self.resume();
        true
    }

    /// Close the level-up screen; may open the evolution gate instead of resuming
    pub fn acknowledge_level_up(&mut self) -> bool {
        if self.gate != Some(PauseGate::LevelUp) {
            return false;
        }
        if check_evolution(self) {
            self.gate = Some(PauseGate::Evolution);
        } else {
            self.resume();
        }
        true
    }

    pub fn acknowledge_evolution(&mut self) -> bool {
        if self.gate != Some(PauseGate::Evolution) {
            return false;
        }
        self.resume();
        true
    }

    /// Back to playing; a missing problem is replaced right away
    fn resume(&mut self) {
        self.phase = GamePhase::Playing;
        self.gate = None;
        if self.problem.is_none() {
            self.next_problem.cancel();
            present_problem(self);
        }
        log::info!("Resumed at level {}", self.progress.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Arena, AsteroidSize, Entity, EntityKind, GameEvent, Hazard, HazardKind};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, Arena::new(800.0, 600.0), Tuning::default())
    }

    fn correct_token_id(state: &GameState) -> u32 {
        state
            .tokens()
            .find(|e| e.as_token().is_some_and(|t| t.is_correct))
            .map(|e| e.id)
            .unwrap()
    }

    /// Park the correct token on the player so the next tick answers it
    fn answer_correctly(state: &mut GameState) {
        let id = correct_token_id(state);
        let target = state.player.pos;
        for e in state.entities.iter_mut() {
            if e.id == id {
                e.pos = target;
                e.vel = Vec2::ZERO;
            }
        }
        state.player.invuln_frames = 0;
        tick(state, &TickInput::default());
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = new_state(1);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_start_game_presents_problem() {
        let mut state = new_state(1);
        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.problem.is_some());
        assert_eq!(state.token_count(), 4);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 1);
        // First hazard spawns immediately
        assert_eq!(state.hazard_count(), 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state(12345);
        state.start_game();
        tick(&mut state, &TickInput::default());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let frozen_ticks = state.time_ticks;
        let frozen: Vec<_> = state.entities.iter().map(|e| e.pos).collect();

        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.time_ticks, frozen_ticks);
        let after: Vec<_> = state.entities.iter().map(|e| e.pos).collect();
        assert_eq!(frozen, after);

        // Unpause
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, frozen_ticks + 1);
    }

    #[test]
    fn test_pause_freezes_next_problem_delay() {
        let mut state = new_state(3);
        state.start_game();
        answer_correctly(&mut state);
        assert!(state.problem.is_none());
        let remaining = state.next_problem.remaining();
        assert!(remaining > 0);

        state.pause();
        for _ in 0..1000 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.next_problem.remaining(), remaining);
    }

    #[test]
    fn test_resume_without_problem_presents_immediately() {
        let mut state = new_state(4);
        state.start_game();
        answer_correctly(&mut state);
        assert!(state.problem.is_none());

        assert!(state.pause());
        assert!(state.acknowledge_pause());
        assert!(state.problem.is_some());
        assert_eq!(state.token_count(), 4);
        assert!(!state.next_problem.is_running());
    }

    #[test]
    fn test_delayed_problem_arrives_after_delay() {
        let mut state = new_state(5);
        state.start_game();
        answer_correctly(&mut state);
        let delay = state.next_problem.remaining();
        for _ in 0..delay - 1 {
            tick(&mut state, &TickInput::default());
            assert!(state.problem.is_none());
        }
        tick(&mut state, &TickInput::default());
        assert!(state.problem.is_some());
        assert_eq!(state.token_count(), 4);
    }

    #[test]
    fn test_acknowledgments_only_match_their_gate() {
        let mut state = new_state(6);
        state.start_game();
        assert!(!state.acknowledge_level_up());
        assert!(!state.acknowledge_evolution());
        assert!(!state.acknowledge_pause());
        state.pause();
        assert!(!state.acknowledge_level_up());
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_level_up_gate_leads_to_evolution_gate() {
        let mut state = new_state(7);
        state.start_game();
        state.progress.level = 2;
        state.progress.questions_in_level = 9;
        answer_correctly(&mut state);

        assert_eq!(state.progress.level, 3);
        assert_eq!(state.gate, Some(PauseGate::LevelUp));

        // Pause toggle does not dismiss a level-up screen
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.gate, Some(PauseGate::LevelUp));

        assert!(state.acknowledge_level_up());
        assert_eq!(state.gate, Some(PauseGate::Evolution));
        assert_eq!(state.progress.creature_stage, 2);
        assert_eq!(state.phase, GamePhase::Paused);

        assert!(state.acknowledge_evolution());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.problem.is_some());
    }

    #[test]
    fn test_level_up_without_evolution_resumes() {
        let mut state = new_state(8);
        state.start_game();
        state.progress.questions_in_level = 9;
        answer_correctly(&mut state);
        assert_eq!(state.progress.level, 2);
        assert!(state.acknowledge_level_up());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.progress.creature_stage, 1);
    }

    #[test]
    fn test_hazard_contact_through_tick() {
        let mut state = new_state(9);
        state.start_game();
        state.remove_tokens();
        state.problem = None;
        state.spawn_cooldown.start(1000);
        let id = state.next_entity_id();
        let pos = state.player.pos;
        state.entities.push(Entity {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: 15.0,
            kind: EntityKind::Hazard(Hazard {
                kind: HazardKind::Asteroid(AsteroidSize::Small),
                hp: 1,
                rotation: 0.0,
                spin: 0.0,
            }),
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.progress.health, 2);
        assert_eq!(state.player.invuln_frames, 90);
        assert_eq!(state.hazard_count(), 0);
    }

    #[test]
    fn test_game_over_stops_world() {
        let mut state = new_state(10);
        state.start_game();
        state.progress.health = 1;
        let id = correct_token_id(&state);
        let target = state.player.pos;
        for e in state.entities.iter_mut() {
            if e.as_token().is_some() && e.id != id {
                e.pos = target;
                break;
            }
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::GameOver));

        let ticks = state.time_ticks;
        let entity_count = state.entities.len();
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.entities.len(), entity_count);
        assert!(!state.pause());

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.progress.health, 3);
        assert_eq!(state.progress.total_wrong, 0);
        assert_eq!(state.token_count(), 4);
    }

    #[test]
    fn test_fire_input_spawns_beam() {
        let mut state = new_state(11);
        state.start_game();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire);
        assert_eq!(state.beam_count(), 1);
        assert!(state.events.contains(&GameEvent::BeamFired { tier: 1 }));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);
        state1.start_game();
        state2.start_game();

        let inputs = [
            TickInput {
                move_left: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                move_up: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.entities, state2.entities);
        assert_eq!(state1.progress, state2.progress);
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    #[test]
    fn test_idle_mode_answers_questions() {
        let mut state = new_state(2024);
        state.start_game();
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state, &idle);
            state.acknowledge_level_up();
            state.acknowledge_evolution();
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        let p = &state.progress;
        assert!(p.total_correct + p.total_wrong > 0);
    }
}
