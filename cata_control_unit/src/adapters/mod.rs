//! Hardware adapter seams.
//!
//! The control loop never touches ports or buses directly. It sees three
//! narrow traits — [`LimitSwitch`], [`DistanceSensor`], [`LauncherMotor`] —
//! and two wrappers that enforce the failure policy: sensor reads degrade
//! to safe defaults, motor writes are deduplicated and retried.
//!
//! Implementations are injected at controller construction, so the same
//! loop runs against real hardware or the simulated rig in [`sim`].

pub mod motor;
pub mod sensors;
pub mod sim;

pub use motor::MotorAdapter;
pub use sensors::SensorAdapter;

use cata_common::error::AdapterError;

/// Binary sensor confirming the launcher arm is at its resting/ready
/// position.
pub trait LimitSwitch {
    /// True iff the switch is mechanically engaged. Must not block.
    fn is_engaged(&mut self) -> Result<bool, AdapterError>;
}

/// Distance sensor watching the launch path for a projectile.
pub trait DistanceSensor {
    /// Distance to the nearest object [mm]. Must not block.
    fn distance_mm(&mut self) -> Result<u32, AdapterError>;
}

/// Velocity-commanded launcher motor (or motor group).
pub trait LauncherMotor {
    /// Set the commanded velocity [rpm] immediately, no queuing.
    /// Zero velocity is a stop.
    fn set_velocity(&mut self, rpm: i32) -> Result<(), AdapterError>;
}
