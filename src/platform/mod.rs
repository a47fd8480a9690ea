//! Platform abstraction layer
//!
//! The simulation talks to the outside world only through these traits:
//! - Input: logical actions polled once per tick
//! - Render: reads the state between ticks as a draw list
//! - Audio/HUD: fire-and-forget notifications, never fed back into the sim

use std::collections::VecDeque;

use glam::Vec2;

use crate::audio::SoundEffect;
use crate::hud::HudSnapshot;
use crate::sim::{EntityKind, GameEvent, GameState, HazardKind, TickInput, TokenVisual};

/// Source of the actions held during the next tick
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Draws a frame from the current state
pub trait RenderSink {
    fn present(&mut self, state: &GameState);
}

pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

pub trait HudSink {
    fn push(&mut self, hud: &HudSnapshot);
}

/// Input replayed from a queue, then a fixed fallback
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<TickInput>,
    fallback: TickInput,
}

impl ScriptedInput {
    pub fn new(fallback: TickInput) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback,
        }
    }

    pub fn push(&mut self, input: TickInput) {
        self.queue.push_back(input);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        self.queue.pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

/// What a renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Player { stage: u8, protected: bool },
    Hazard { kind: HazardKind, rotation: f32 },
    Token { value: u32, visual: TokenVisual },
    Beam { tier: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: SpriteKind,
}

/// Draw list for the current state: player first, then entities in id order
pub fn sprites(state: &GameState) -> Vec<Sprite> {
    let mut out = Vec::with_capacity(state.entities.len() + 1);
    out.push(Sprite {
        pos: state.player.pos,
        radius: state.player_radius(),
        kind: SpriteKind::Player {
            stage: state.progress.creature_stage,
            protected: state.player.is_protected(),
        },
    });
    out.extend(state.entities.iter().map(|e| Sprite {
        pos: e.pos,
        radius: e.radius,
        kind: match e.kind {
            EntityKind::Hazard(h) => SpriteKind::Hazard {
                kind: h.kind,
                rotation: h.rotation,
            },
            EntityKind::Token(t) => SpriteKind::Token {
                value: t.value,
                visual: t.visual,
            },
            EntityKind::Beam(b) => SpriteKind::Beam { tier: b.tier },
        },
    }));
    out
}

/// Headless renderer: builds the draw list every frame and traces it
#[derive(Debug, Default)]
pub struct LogRender {
    frames: u64,
    last_sprites: usize,
}

impl LogRender {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sprites drawn in the last frame
    pub fn last_sprites(&self) -> usize {
        self.last_sprites
    }
}

impl RenderSink for LogRender {
    fn present(&mut self, state: &GameState) {
        let list = sprites(state);
        self.frames += 1;
        self.last_sprites = list.len();
        log::trace!("Frame {}: {} sprites", self.frames, list.len());
        for sprite in &list {
            log::trace!(
                "  {:?} at ({:.0}, {:.0}) r={:.0}",
                sprite.kind,
                sprite.pos.x,
                sprite.pos.y,
                sprite.radius
            );
        }
    }
}

/// Drain this tick's events into the audio sink and refresh the HUD if anything happened.
/// Returns the drained events for any further effects handling.
pub fn dispatch_events(
    state: &mut GameState,
    audio: &mut dyn AudioSink,
    hud: &mut dyn HudSink,
) -> Vec<GameEvent> {
    let events = state.drain_events();
    for effect in events.iter().filter_map(SoundEffect::from_event) {
        audio.play(effect);
    }
    if !events.is_empty() {
        hud.push(&HudSnapshot::from_state(state));
    }
    events
}
