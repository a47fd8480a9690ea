//! Tick-based countdown timer
//!
//! All delayed effects in the simulation count frames, not wall-clock time.
//! A timer only advances when the tick orchestrator advances it, so every
//! timer is frozen while the game is not in `Playing`.

/// Countdown measured in simulation ticks. Zero means idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickTimer {
    remaining: u32,
}

impl TickTimer {
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    /// (Re)start the countdown
    pub fn start(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn cancel(&mut self) {
        self.remaining = 0;
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance one tick. Returns true on the tick the countdown reaches zero.
    pub fn advance(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}
