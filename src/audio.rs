//! Sound cues for simulation events
//!
//! Procedurally described sound effects - each cue is a handful of
//! oscillator tones. The simulation only emits events; this module maps
//! them to cues and hands them to whatever backend renders sound.

use crate::platform::AudioSink;
use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One oscillator note with an exponential fade-out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub freq: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
    /// Seconds after the cue starts
    pub delay: f32,
    pub gain: f32,
}

impl Tone {
    const fn new(freq: f32, duration: f32, waveform: Waveform, delay: f32, gain: f32) -> Self {
        Self {
            freq,
            duration,
            waveform,
            delay,
            gain,
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Rising major arpeggio
    CorrectAnswer,
    /// Low buzz
    WrongAnswer,
    LevelUp,
    /// Hazard destroyed, damaged or rammed
    HazardHit,
    /// Token touched or badge earned
    TokenCollected,
    /// Beam shot; pitch rises with weapon tier
    BeamFired(u8),
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CorrectAnswer { .. } => Some(SoundEffect::CorrectAnswer),
            GameEvent::WrongAnswer => Some(SoundEffect::WrongAnswer),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::HazardDamaged { .. }
            | GameEvent::HazardDestroyed { .. }
            | GameEvent::PlayerHit { .. } => Some(SoundEffect::HazardHit),
            GameEvent::TokenCollected { .. } | GameEvent::BadgeUnlocked(_) => {
                Some(SoundEffect::TokenCollected)
            }
            GameEvent::BeamFired { tier } => Some(SoundEffect::BeamFired(*tier)),
            _ => None,
        }
    }

    pub fn tones(&self) -> Vec<Tone> {
        use Waveform::*;
        match *self {
            SoundEffect::CorrectAnswer => vec![
                Tone::new(523.0, 0.12, Sine, 0.0, 0.18),
                Tone::new(659.0, 0.12, Sine, 0.08, 0.18),
                Tone::new(784.0, 0.18, Sine, 0.16, 0.18),
            ],
            SoundEffect::WrongAnswer => vec![
                Tone::new(220.0, 0.15, Sawtooth, 0.0, 0.12),
                Tone::new(180.0, 0.2, Sawtooth, 0.1, 0.12),
            ],
            SoundEffect::LevelUp => vec![
                Tone::new(523.0, 0.1, Sine, 0.0, 0.15),
                Tone::new(659.0, 0.1, Sine, 0.08, 0.15),
                Tone::new(784.0, 0.1, Sine, 0.16, 0.15),
                Tone::new(1047.0, 0.25, Triangle, 0.24, 0.2),
            ],
            SoundEffect::HazardHit => vec![
                Tone::new(100.0, 0.15, Square, 0.0, 0.2),
                Tone::new(80.0, 0.1, Square, 0.05, 0.15),
            ],
            SoundEffect::TokenCollected => vec![
                Tone::new(880.0, 0.08, Sine, 0.0, 0.12),
                Tone::new(1100.0, 0.1, Sine, 0.06, 0.12),
            ],
            SoundEffect::BeamFired(tier) => {
                let base = 600.0 + tier as f32 * 120.0;
                let mut tones = vec![
                    Tone::new(base, 0.06, Sine, 0.0, 0.10),
                    Tone::new(base * 1.4, 0.04, Triangle, 0.02, 0.08),
                ];
                // Heavier weapons get a low square thump
                if tier >= 3 {
                    tones.push(Tone::new(base * 0.5, 0.08, Square, 0.0, 0.05));
                }
                tones
            }
        }
    }
}

/// Audio manager for the game
///
/// Without a sound device it logs each cue at debug level.
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues actually voiced so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        for tone in effect.tones() {
            log::debug!(
                "{:?}: {:.0} Hz {:?} for {:.2}s at +{:.2}s, gain {:.3}",
                effect,
                tone.freq,
                tone.waveform,
                tone.duration,
                tone.delay,
                tone.gain * vol
            );
        }
    }
}
