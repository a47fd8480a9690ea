//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod layout;
pub mod player;
pub mod problem;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{circles_overlap, resolve_collisions};
pub use layout::{TokenSlot, layout_tokens, spread_positions};
pub use problem::{NumberRanges, generate_problem, generate_wrong_answers, number_ranges};
pub use progression::{creature_name, creature_stage_for_level, title_for_level};
pub use spawn::{present_problem, weapon_tier};
pub use state::{
    AnswerToken, Arena, AsteroidSize, Badge, Badges, Beam, Entity, EntityKind, GameEvent,
    GamePhase, GameState, Hazard, HazardKind, Operator, PauseGate, Player, Problem, Progression,
    TokenVisual,
};
pub use tick::{TickInput, tick};
pub use timer::TickTimer;
