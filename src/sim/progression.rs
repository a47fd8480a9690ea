//! Answer resolution and the progression ladder
//!
//! Streaks, XP, level-ups, creature evolution and badges all move here.
//! Level and creature stage only ever go up within a run.

use glam::Vec2;

use super::state::{
    AnswerToken, Badge, GameEvent, GamePhase, GameState, PauseGate, TokenVisual,
};
use crate::ms_to_ticks;

/// Creature stages: (stage, name, first level)
pub const CREATURES: [(u8, &str, u32); 5] = [
    (1, "Hatchling", 1),
    (2, "Sparky", 3),
    (3, "Blazer", 6),
    (4, "Stormclaw", 10),
    (5, "Legendragon", 15),
];

/// Player titles: (first level, title)
pub const TITLES: [(u32, &str); 5] = [
    (1, "Math Rookie"),
    (3, "Number Explorer"),
    (6, "Math Ninja"),
    (10, "Math Champion"),
    (15, "Math Legend"),
];

/// Answers faster than this earn a speed bonus
const SPEED_BONUS_WINDOW_SECS: f32 = 5.0;
/// Answers faster than this count toward the speed badge
const FAST_ANSWER_SECS: f32 = 3.0;
const BASE_XP: u32 = 10;
const MAX_SPEED_BONUS: f32 = 10.0;

/// Creature stage earned by a level (pure, non-decreasing in level)
pub fn creature_stage_for_level(level: u32) -> u8 {
    CREATURES
        .iter()
        .rev()
        .find(|(_, _, min_level)| level >= *min_level)
        .map(|(stage, _, _)| *stage)
        .unwrap_or(1)
}

pub fn creature_name(stage: u8) -> &'static str {
    CREATURES
        .iter()
        .find(|(s, _, _)| *s == stage)
        .map(|(_, name, _)| *name)
        .unwrap_or(CREATURES[0].1)
}

pub fn title_for_level(level: u32) -> &'static str {
    TITLES
        .iter()
        .rev()
        .find(|(min_level, _)| level >= *min_level)
        .map(|(_, title)| *title)
        .unwrap_or(TITLES[0].1)
}

/// XP for a correct answer given after `elapsed` seconds with the new streak
pub fn answer_xp(elapsed: f32, streak: u32) -> u32 {
    let mut xp = BASE_XP;
    if elapsed < SPEED_BONUS_WINDOW_SECS {
        let bonus = ((1.0 - elapsed.max(0.0) / SPEED_BONUS_WINDOW_SECS) * MAX_SPEED_BONUS).round();
        xp += bonus as u32;
    }
    match streak {
        5.. => xp * 3,
        3..=4 => xp * 2,
        _ => xp,
    }
}

/// Lose one heart and become briefly invulnerable; ends the run at zero
pub fn take_damage(state: &mut GameState) {
    state.progress.health = state.progress.health.saturating_sub(1);
    state.player.invuln_frames = state.tuning.hit_invuln_frames;
    log::debug!("Player damaged, health {}", state.progress.health);

    if state.progress.health == 0 {
        trigger_game_over(state);
    }
}

pub fn trigger_game_over(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.gate = None;
    log::info!(
        "Game over at level {} ({} correct, {} wrong, best streak {})",
        state.progress.level,
        state.progress.total_correct,
        state.progress.total_wrong,
        state.progress.best_streak
    );
    state.push_event(GameEvent::GameOver);
}

/// Score a hit answer token, clear the set and queue the next problem.
///
/// Shared by body contact and beam hits.
pub fn resolve_answer(state: &mut GameState, token: AnswerToken, pos: Vec2) {
    let elapsed = state.problem_elapsed_secs();

    let visual = if token.is_correct {
        let p = &mut state.progress;
        p.streak += 1;
        p.best_streak = p.best_streak.max(p.streak);
        p.total_correct += 1;
        let fast = elapsed < FAST_ANSWER_SECS;
        if fast {
            p.fast_answers += 1;
        }
        let xp = answer_xp(elapsed, p.streak);
        p.xp += xp as u64;
        state.push_event(GameEvent::CorrectAnswer { xp, fast });
        TokenVisual::Correct
    } else {
        state.progress.streak = 0;
        state.progress.total_wrong += 1;
        state.push_event(GameEvent::WrongAnswer);
        take_damage(state);
        TokenVisual::Wrong
    };

    state.push_event(GameEvent::AnswerResolved {
        value: token.value,
        visual,
        pos,
    });

    state.remove_tokens();
    state.shooting_disabled = true;
    state.problem = None;

    let delay_ms = if token.is_correct {
        state.tuning.correct_delay_ms
    } else {
        state.tuning.wrong_delay_ms
    };
    state.next_problem.start(ms_to_ticks(delay_ms).max(1));

    record_question(state);
    check_badges(state);
}

/// Count an answered question toward the next level
fn record_question(state: &mut GameState) {
    state.progress.questions_in_level += 1;
    if state.phase == GamePhase::GameOver {
        return;
    }
    if state.progress.questions_in_level >= state.tuning.questions_per_level {
        level_up(state);
    }
}

/// Advance one level, refill health and wait on the level-up gate
pub fn level_up(state: &mut GameState) {
    let p = &mut state.progress;
    p.questions_in_level = 0;
    p.level += 1;
    p.health = p.max_health;
    let level = p.level;
    let title = title_for_level(level);

    state.phase = GamePhase::Paused;
    state.gate = Some(PauseGate::LevelUp);
    log::info!("Level up! Now level {} ({})", level, title);
    state.push_event(GameEvent::LevelUp { level, title });
}

/// Raise the creature stage if the level earned one. Returns true on evolution.
pub fn check_evolution(state: &mut GameState) -> bool {
    let from = state.progress.creature_stage;
    let to = creature_stage_for_level(state.progress.level);
    if to <= from {
        return false;
    }
    state.progress.creature_stage = to;
    log::info!("Evolved: {} -> {}", creature_name(from), creature_name(to));
    state.push_event(GameEvent::Evolved { from, to });
    true
}

/// Unlock any badges whose condition now holds
pub fn check_badges(state: &mut GameState) {
    let p = &state.progress;
    let checks = [
        (Badge::Streak5, p.best_streak >= 5),
        (Badge::Streak10, p.best_streak >= 10),
        (Badge::Speed, p.fast_answers >= 10),
        (Badge::Perfect, p.total_correct >= 10 && p.total_wrong == 0),
        (Badge::Century, p.total_correct >= 100),
    ];

    for (badge, earned) in checks {
        if earned && state.progress.badges.unlock(badge) {
            log::info!("Badge unlocked: {:?}", badge);
            state.push_event(GameEvent::BadgeUnlocked(badge));
        }
    }
}
