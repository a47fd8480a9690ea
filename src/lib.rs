//! Math Monster Arena - arcade arithmetic trainer
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (problems, spawning, collisions, progression)
//! - `platform`: Boundary traits for input, render, audio and HUD collaborators
//! - `persistence`: Save/load of progression with field-by-field recovery
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod hud;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use hud::HudSnapshot;
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per animation frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default arena size used by the headless runner
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Answer tokens on screen per problem
    pub const TOKEN_COUNT: usize = 4;
    /// Distractors generated alongside the correct answer
    pub const WRONG_ANSWER_COUNT: usize = TOKEN_COUNT - 1;

    /// Highest weapon tier / creature stage
    pub const MAX_WEAPON_TIER: u8 = 5;
    pub const MAX_CREATURE_STAGE: u8 = 5;
}

/// Convert a millisecond duration to whole ticks (rounded, saturating)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as u64 * consts::TICKS_PER_SECOND as u64 + 500) / 1000;
    ticks.min(u32::MAX as u64) as u32
}

/// Clamp that never panics: if the bounds cross, `min` wins
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        min
    } else if v > max {
        max.max(min)
    } else {
        v
    }
}

/// Uniform float in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform integer in `[min, max]`; returns `min` for an empty range
#[inline]
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}
