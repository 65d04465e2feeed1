//! Firing intent and the single-slot shared intent value.
//!
//! Driver and autonomous code run on execution contexts distinct from
//! the cycle task; both only ever *write* the intent. The slot is a
//! single overwrite-on-write value (last write wins) guarded by a
//! `parking_lot::Mutex`, read once per control cycle.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// What the operator or autonomous routine wants the launcher to do.
///
/// Recomputed every cycle, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringIntent {
    /// No fire request.
    Idle,
    /// Fire exactly one revolution at the given velocity [rpm].
    ///
    /// Honored immediately as a manual override, even with no
    /// projectile detected.
    FireOnce(i32),
    /// Sustain firing at the given velocity [rpm] until replaced.
    ///
    /// Gated on projectile presence while the mechanism is cocked
    /// (match-load pacing).
    FireContinuous(i32),
}

impl FiringIntent {
    /// Requested velocity [rpm]; `Idle` is 0.
    #[inline]
    pub const fn velocity(&self) -> i32 {
        match self {
            Self::Idle => 0,
            Self::FireOnce(v) | Self::FireContinuous(v) => *v,
        }
    }

    /// True for either fire request variant.
    #[inline]
    pub const fn is_fire_request(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl Default for FiringIntent {
    fn default() -> Self {
        Self::Idle
    }
}

/// Single-slot shared intent value.
///
/// Cloning produces another handle to the same slot. Writers overwrite
/// unconditionally; the cycle task observes only the latest value.
#[derive(Debug, Clone, Default)]
pub struct IntentSlot {
    slot: Arc<Mutex<FiringIntent>>,
}

impl IntentSlot {
    /// Create a slot holding `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot. Last write wins.
    #[inline]
    pub fn set(&self, intent: FiringIntent) {
        *self.slot.lock() = intent;
    }

    /// Read the current value without consuming it.
    #[inline]
    pub fn get(&self) -> FiringIntent {
        *self.slot.lock()
    }

    /// Reset the slot to `Idle` only if it still holds `expected`.
    ///
    /// Used by the cycle task to consume a `FireOnce` without stomping
    /// a newer write that landed after the cycle read it.
    pub fn consume(&self, expected: FiringIntent) {
        let mut slot = self.slot.lock();
        if *slot == expected {
            *slot = FiringIntent::Idle;
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
