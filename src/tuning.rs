//! Data-driven game balance
//!
//! Every field has a default, so a tuning file only needs the values it
//! overrides. Durations in `*_ms` fields are converted to ticks at load.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CREATURE_STAGE;
use crate::ms_to_ticks;

/// Balance knobs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Answer tokens ===
    pub token_radius: f32,
    /// Minimum gap between neighbouring tokens at spawn
    pub token_padding: f32,
    pub token_base_fall: f32,
    pub token_fall_per_level: f32,
    pub token_max_fall: f32,
    /// Max horizontal drift speed (either direction)
    pub token_drift: f32,

    // === Hazard spawning ===
    pub spawn_interval_base_ms: u32,
    pub spawn_interval_per_level_ms: u32,
    pub spawn_interval_min_ms: u32,
    /// Probability an asteroid spawn is replaced by an alien
    pub alien_chance: f64,

    // === Asteroids ===
    pub asteroid_radius: [f32; 3],
    pub asteroid_hp: [u8; 3],
    /// Extra fall speed per size (small, medium, large)
    pub asteroid_speed_boost: [f32; 3],
    pub asteroid_base_fall: f32,
    pub asteroid_fall_per_level: f32,
    pub asteroid_fall_jitter: f32,
    pub asteroid_max_fall: f32,
    pub asteroid_max_drift: f32,
    pub asteroid_max_spin: f32,

    // === Aliens ===
    pub alien_radius: f32,
    pub alien_fall: f32,
    pub alien_sway_amplitude: f32,
    pub alien_sway_frequency: f32,

    // === Player ===
    pub player_accel: f32,
    pub player_damping: f32,
    pub player_max_speed: f32,
    /// Collision radius per creature stage (1..=5)
    pub player_radius: [f32; MAX_CREATURE_STAGE as usize],
    pub max_health: u8,
    pub hit_invuln_frames: u32,
    pub kill_invuln_floor: u32,

    // === Beams ===
    pub beam_cooldown_ms: u32,
    pub beam_life: u32,
    pub beam_base_speed: f32,
    pub beam_speed_per_tier: f32,
    pub beam_base_radius: f32,
    pub beam_radius_per_tier: f32,

    // === Progression ===
    pub questions_per_level: u32,
    pub tokens_lost_delay_ms: u32,
    pub correct_delay_ms: u32,
    pub wrong_delay_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            token_radius: 72.0,
            token_padding: 8.0,
            token_base_fall: 1.0,
            token_fall_per_level: 0.15,
            token_max_fall: 4.0,
            token_drift: 0.3,

            spawn_interval_base_ms: 2000,
            spawn_interval_per_level_ms: 100,
            spawn_interval_min_ms: 800,
            alien_chance: 0.05,

            asteroid_radius: [15.0, 25.0, 35.0],
            asteroid_hp: [1, 2, 3],
            asteroid_speed_boost: [0.5, 0.25, 0.0],
            asteroid_base_fall: 1.0,
            asteroid_fall_per_level: 0.1,
            asteroid_fall_jitter: 0.5,
            asteroid_max_fall: 4.0,
            asteroid_max_drift: 0.5,
            asteroid_max_spin: 0.04,

            alien_radius: 18.0,
            alien_fall: 1.5,
            alien_sway_amplitude: 1.5,
            alien_sway_frequency: 0.03,

            player_accel: 0.84,
            player_damping: 0.88,
            player_max_speed: 9.6,
            player_radius: [22.0, 24.0, 28.0, 32.0, 36.0],
            max_health: 3,
            hit_invuln_frames: 90,
            kill_invuln_floor: 20,

            beam_cooldown_ms: 250,
            beam_life: 120,
            beam_base_speed: 10.0,
            beam_speed_per_tier: 1.0,
            beam_base_radius: 4.0,
            beam_radius_per_tier: 1.5,

            questions_per_level: 10,
            tokens_lost_delay_ms: 300,
            correct_delay_ms: 500,
            wrong_delay_ms: 1000,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Hazard spawn interval for a level, in ticks
    pub fn spawn_interval_ticks(&self, level: u32) -> u32 {
        let shrink = self.spawn_interval_per_level_ms.saturating_mul(level);
        let ms = self
            .spawn_interval_base_ms
            .saturating_sub(shrink)
            .max(self.spawn_interval_min_ms);
        ms_to_ticks(ms)
    }

    /// Token fall speed at a level
    pub fn token_fall(&self, level: u32) -> f32 {
        (self.token_base_fall + level as f32 * self.token_fall_per_level).min(self.token_max_fall)
    }

    /// Player collision radius for a creature stage (out-of-range stages use stage 1)
    pub fn player_radius_for_stage(&self, stage: u8) -> f32 {
        match stage {
            1..=MAX_CREATURE_STAGE => self.player_radius[stage as usize - 1],
            _ => self.player_radius[0],
        }
    }

    /// Beam hit radius for a weapon tier
    pub fn beam_radius(&self, tier: u8) -> f32 {
        self.beam_base_radius + tier as f32 * self.beam_radius_per_tier
    }

    pub fn beam_speed(&self, tier: u8) -> f32 {
        self.beam_base_speed + tier as f32 * self.beam_speed_per_tier
    }
}
