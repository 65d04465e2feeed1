//! State types for the launcher control loop.
//!
//! All enums use `#[repr(u8)]` for compact layout. `MechanismState` is
//! owned exclusively by the controller and mutated only inside the
//! per-cycle update; everything else here is per-cycle value data.

use serde::{Deserialize, Serialize};
use static_assertions::assert_eq_size;

/// Launcher mechanism state.
///
/// Initial state is `Cocked` — the arm is assumed held on the limit
/// switch at startup. There is no terminal state; the machine runs for
/// the lifetime of the control task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MechanismState {
    /// Arm held at the mechanical stop, limit switch engaged.
    Cocked = 0,
    /// Motor driving the arm through a revolution.
    Firing = 1,
    /// Revolution complete, settling back onto the limit switch.
    Resetting = 2,
}

impl MechanismState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Cocked),
            1 => Some(Self::Firing),
            2 => Some(Self::Resetting),
            _ => None,
        }
    }
}

impl Default for MechanismState {
    fn default() -> Self {
        Self::Cocked
    }
}

assert_eq_size!(MechanismState, u8);

/// Motor command issued by the controller, exactly one per cycle.
///
/// `Stop` is equivalent to driving at zero velocity; it is a distinct
/// variant so call sites read as the transition table does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCommand {
    /// Hold the motor at zero output.
    Stop,
    /// Drive at the given signed velocity [rpm].
    Drive(i32),
}

impl MotorCommand {
    /// Commanded velocity [rpm]; `Stop` is 0.
    #[inline]
    pub const fn velocity(&self) -> i32 {
        match self {
            Self::Stop => 0,
            Self::Drive(v) => *v,
        }
    }

    /// True if this command produces motor output.
    #[inline]
    pub const fn is_drive(&self) -> bool {
        !matches!(self, Self::Stop) && self.velocity() != 0
    }
}

/// Sensor readings taken fresh at the start of each control cycle.
///
/// Never cached across cycles beyond the transition logic that consumes
/// it — stale hardware state must not drive the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct SensorSnapshot {
    /// Limit switch engaged — arm at the mechanical hold position.
    pub limit_engaged: bool,
    /// Projectile detected within the configured distance threshold.
    pub projectile_loaded: bool,
}

impl SensorSnapshot {
    /// Safe-default snapshot used when sensor reads fail: not ready,
    /// not loaded. A disconnected sensor must never cause a fire.
    pub const SAFE: Self = Self {
        limit_engaged: false,
        projectile_loaded: false,
    };
}

assert_eq_size!(SensorSnapshot, [u8; 2]);

// ─── Tests ──────────────────────────────────────────────────────────
