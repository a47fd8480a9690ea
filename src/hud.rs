//! Read-only HUD snapshot

use std::fmt;

use crate::sim::GameState;
use crate::sim::progression::{creature_name, title_for_level};

/// Everything the HUD shows, copied out of the state between ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudSnapshot {
    pub level: u32,
    pub title: &'static str,
    pub creature: &'static str,
    pub questions_in_level: u32,
    pub questions_per_level: u32,
    pub health: u8,
    pub max_health: u8,
    pub streak: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub best_streak: u32,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let p = &state.progress;
        Self {
            level: p.level,
            title: title_for_level(p.level),
            creature: creature_name(p.creature_stage),
            questions_in_level: p.questions_in_level,
            questions_per_level: state.tuning.questions_per_level,
            health: p.health,
            max_health: p.max_health,
            streak: p.streak,
            total_correct: p.total_correct,
            total_wrong: p.total_wrong,
            best_streak: p.best_streak,
        }
    }
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lv {} {} ({}) | {}/{} | HP {}/{} | streak {} (best {}) | {} right, {} wrong",
            self.level,
            self.title,
            self.creature,
            self.questions_in_level,
            self.questions_per_level,
            self.health,
            self.max_health,
            self.streak,
            self.best_streak,
            self.total_correct,
            self.total_wrong
        )
    }
}
