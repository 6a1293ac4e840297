//! Debounced headset state machine.
//!
//! Converts the noisy per-poll status stream into a stable [`HeadsetState`].
//! A state flip requires `debounce_threshold` consecutive confirming samples,
//! which absorbs single-sample glitches (USB read errors, the race between
//! dock and power events) without flapping audio routing.

use std::time::Instant;

use tracing::warn;

use crate::reading::{HeadsetReading, HeadsetState, HeadsetStatus};

/// Tunables for the state machine.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Consecutive confirming samples required before a state flip.
    pub debounce_threshold: u32,
    /// Consecutive `Unavailable` polls before a degraded-mode warning is
    /// logged. The warning repeats every further `degraded_after` polls.
    pub degraded_after: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { debounce_threshold: 2, degraded_after: 30 }
    }
}

/// Owns the debounced [`HeadsetState`] and its streak counters.
///
/// The state transitions only through [`HeadsetMonitor::observe`]; nothing
/// else mutates it.
#[derive(Debug)]
pub struct HeadsetMonitor {
    state: HeadsetState,
    active_streak: u32,
    inactive_streak: u32,
    unavailable_streak: u32,
    last_change: Option<Instant>,
    config: MonitorConfig,
}

impl HeadsetMonitor {
    /// Create a monitor in the initial `Inactive` state.
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            state: HeadsetState::Inactive,
            active_streak: 0,
            inactive_streak: 0,
            unavailable_streak: 0,
            last_change: None,
            config,
        }
    }

    /// Current debounced state.
    #[must_use]
    pub fn state(&self) -> HeadsetState {
        self.state
    }

    /// When the state last flipped, if it ever has.
    #[must_use]
    pub fn last_change(&self) -> Option<Instant> {
        self.last_change
    }

    /// Consecutive `Unavailable` polls observed since the last real reading.
    #[must_use]
    pub fn unavailable_streak(&self) -> u32 {
        self.unavailable_streak
    }

    /// Feed one sample into the state machine.
    ///
    /// Returns the new state if the sample caused a flip, `None` otherwise.
    pub fn observe(&mut self, reading: HeadsetReading) -> Option<HeadsetState> {
        match reading.status {
            HeadsetStatus::Active => {
                self.unavailable_streak = 0;
                self.active_streak += 1;
                self.inactive_streak = 0;
            }
            // Docked and powered-off both read as Docked; either way the
            // headset is not being worn.
            HeadsetStatus::Docked => {
                self.unavailable_streak = 0;
                self.inactive_streak += 1;
                self.active_streak = 0;
            }
            HeadsetStatus::Unavailable => {
                // No-op sample: neither confirms nor denies, so neither
                // streak resets. A transient I/O error never triggers a
                // switch and never undoes progress toward one.
                self.unavailable_streak += 1;
                if self.config.degraded_after > 0
                    && self.unavailable_streak % self.config.degraded_after == 0
                {
                    warn!(
                        polls = self.unavailable_streak,
                        state = ?self.state,
                        "Base station unreachable for an extended period; keeping last known state"
                    );
                }
                return None;
            }
        }

        let next = match self.state {
            HeadsetState::Inactive if self.active_streak >= self.config.debounce_threshold => {
                HeadsetState::Active
            }
            HeadsetState::Active if self.inactive_streak >= self.config.debounce_threshold => {
                HeadsetState::Inactive
            }
            _ => return None,
        };

        self.state = next;
        self.last_change = Some(reading.at);
        self.active_streak = 0;
        self.inactive_streak = 0;
        Some(next)
    }
}

impl Default for HeadsetMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
