//! Adapter error taxonomy and latched runtime fault flags.
//!
//! No error here is fatal to the control task: sensor failures degrade
//! to safe defaults, actuator failures are retried next cycle, and
//! out-of-range velocities are clamped. Faults latch into `FaultFlags`
//! so a degraded run is visible after the fact.

use bitflags::bitflags;
use thiserror::Error;

/// Error produced by a hardware adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// A sensor could not produce a reading. The caller must degrade to
    /// the safe default (`ready=false`, `loaded=false`) — never fire on
    /// a guess.
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// The motor controller did not acknowledge a command. The caller
    /// retries on the next cycle; hardware may reconnect.
    #[error("actuator unresponsive: {0}")]
    ActuatorUnresponsive(String),
}

bitflags! {
    /// Latched runtime fault flags.
    ///
    /// Set when a degraded condition is first observed; never cleared by
    /// the control loop itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FaultFlags: u8 {
        /// Limit switch read failed at least once.
        const READY_SENSOR_LOST = 0x01;
        /// Distance sensor read failed at least once.
        const LOAD_SENSOR_LOST  = 0x02;
        /// A motor command went unacknowledged at least once.
        const MOTOR_UNRESPONSIVE = 0x04;
        /// A caller supplied an out-of-range velocity that was clamped.
        const VELOCITY_CLAMPED  = 0x08;
    }
}

impl FaultFlags {
    /// Flags indicating a sensor degradation of some kind.
    pub const SENSOR_MASK: Self =
        Self::from_bits_truncate(Self::READY_SENSOR_LOST.bits() | Self::LOAD_SENSOR_LOST.bits());

    /// True if any sensor fault has latched.
    #[inline]
    pub const fn has_sensor_fault(&self) -> bool {
        self.intersects(Self::SENSOR_MASK)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_flags_default_empty() {
        assert_eq!(FaultFlags::default(), FaultFlags::empty());
        assert!(!FaultFlags::default().has_sensor_fault());
    }

    #[test]
    fn sensor_mask_covers_both_sensors() {
        assert!(FaultFlags::READY_SENSOR_LOST.has_sensor_fault());
        assert!(FaultFlags::LOAD_SENSOR_LOST.has_sensor_fault());
        assert!(!FaultFlags::MOTOR_UNRESPONSIVE.has_sensor_fault());
        assert!(!FaultFlags::VELOCITY_CLAMPED.has_sensor_fault());
    }

    #[test]
    fn adapter_error_display() {
        let e = AdapterError::SensorUnavailable("limit switch port H".into());
        assert!(e.to_string().contains("limit switch port H"));
        let e = AdapterError::ActuatorUnresponsive("launcher group".into());
        assert!(e.to_string().starts_with("actuator unresponsive"));
    }
}
