//! Player movement physics

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;
use crate::clamp;

/// Acceleration requested by the held direction keys (unit grid, not normalized)
pub fn input_direction(input: &TickInput) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if input.move_left {
        dir.x -= 1.0;
    }
    if input.move_right {
        dir.x += 1.0;
    }
    if input.move_up {
        dir.y -= 1.0;
    }
    if input.move_down {
        dir.y += 1.0;
    }
    dir
}

/// Advance the player one tick: accelerate, damp, cap speed, integrate, clamp, decay timers
pub fn update_player(state: &mut GameState, input: &TickInput) {
    let radius = state.player_radius();
    let (width, height) = (state.arena.width, state.arena.height);
    let t = &state.tuning;
    let (accel, damping, max_speed) = (t.player_accel, t.player_damping, t.player_max_speed);

    let p = &mut state.player;
    p.vel += input_direction(input) * accel;
    p.vel *= damping;
    p.vel = p.vel.clamp_length_max(max_speed);
    p.pos += p.vel;
    p.pos.x = clamp(p.pos.x, radius, width - radius);
    p.pos.y = clamp(p.pos.y, radius, height - radius);

    p.invuln_frames = p.invuln_frames.saturating_sub(1);
    p.shield_frames = p.shield_frames.saturating_sub(1);
}
