//! Simulated launcher hardware.
//!
//! Software stand-ins for the limit switch, distance sensor, and motor
//! group, used by the binary, the integration tests, and the benches.
//! Each device is a cheap cloneable handle over shared state, so a test
//! can keep a handle for scripting while the adapters own another.
//!
//! [`SimLauncherRig`] adds a coarse physical model on top: the arm
//! revolves at the commanded rpm, releasing and re-engaging the limit
//! switch, and the feeder refills the launch path a fixed delay after
//! each shot leaves it.

use std::sync::Arc;

use cata_common::error::AdapterError;
use parking_lot::Mutex;

use super::{DistanceSensor, LauncherMotor, LimitSwitch};

/// Distance reported when the launch path is empty [mm].
const EMPTY_PATH_MM: u32 = 200;

// ─── Devices ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SwitchState {
    engaged: bool,
    fail: bool,
}

/// Scriptable limit switch.
#[derive(Debug, Clone, Default)]
pub struct SimLimitSwitch {
    state: Arc<Mutex<SwitchState>>,
}

impl SimLimitSwitch {
    /// Switch starting engaged (arm cocked), the normal power-on state.
    pub fn engaged() -> Self {
        let sw = Self::default();
        sw.set_engaged(true);
        sw
    }

    pub fn set_engaged(&self, engaged: bool) {
        self.state.lock().engaged = engaged;
    }

    /// Make subsequent reads fail, as a disconnected switch would.
    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().fail = fail;
    }
}

impl LimitSwitch for SimLimitSwitch {
    fn is_engaged(&mut self) -> Result<bool, AdapterError> {
        let state = self.state.lock();
        if state.fail {
            return Err(AdapterError::SensorUnavailable("sim limit switch".into()));
        }
        Ok(state.engaged)
    }
}

#[derive(Debug)]
struct DistanceState {
    distance_mm: u32,
    fail: bool,
}

/// Scriptable distance sensor.
#[derive(Debug, Clone)]
pub struct SimDistanceSensor {
    state: Arc<Mutex<DistanceState>>,
}

impl SimDistanceSensor {
    pub fn with_distance(distance_mm: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(DistanceState {
                distance_mm,
                fail: false,
            })),
        }
    }

    /// Sensor seeing an empty launch path.
    pub fn empty() -> Self {
        Self::with_distance(EMPTY_PATH_MM)
    }

    pub fn set_distance(&self, distance_mm: u32) {
        self.state.lock().distance_mm = distance_mm;
    }

    /// Distance the sensor currently reports.
    pub fn current_mm(&self) -> u32 {
        self.state.lock().distance_mm
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().fail = fail;
    }
}

impl DistanceSensor for SimDistanceSensor {
    fn distance_mm(&mut self) -> Result<u32, AdapterError> {
        let state = self.state.lock();
        if state.fail {
            return Err(AdapterError::SensorUnavailable("sim distance sensor".into()));
        }
        Ok(state.distance_mm)
    }
}

#[derive(Debug, Default)]
struct MotorState {
    current_rpm: i32,
    sent: Vec<i32>,
    fail: bool,
}

/// Recording motor: every acknowledged command is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct SimMotor {
    state: Arc<Mutex<MotorState>>,
}

impl SimMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every velocity the motor acknowledged, in order.
    pub fn sent_commands(&self) -> Vec<i32> {
        self.state.lock().sent.clone()
    }

    /// Nonzero commands only — the `drive()` calls a test asserts on.
    pub fn drive_commands(&self) -> Vec<i32> {
        self.state.lock().sent.iter().copied().filter(|&v| v != 0).collect()
    }

    /// Number of acknowledged stops.
    pub fn stop_count(&self) -> usize {
        self.state.lock().sent.iter().filter(|&&v| v == 0).count()
    }

    /// Velocity the motor currently holds.
    pub fn current_rpm(&self) -> i32 {
        self.state.lock().current_rpm
    }

    /// Make subsequent writes fail, as an unresponsive controller would.
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail = fail;
    }
}

impl LauncherMotor for SimMotor {
    fn set_velocity(&mut self, rpm: i32) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        if state.fail {
            return Err(AdapterError::ActuatorUnresponsive("sim motor group".into()));
        }
        state.current_rpm = rpm;
        state.sent.push(rpm);
        Ok(())
    }
}

// ─── Rig ────────────────────────────────────────────────────────────

/// Coarse launcher physics driven once per control cycle.
///
/// The arm position is tracked as a revolution fraction in `[0, 1)`;
/// the limit switch engages inside a small window around zero. Firing
/// consumes the projectile at mid-revolution, and the feeder drops the
/// next one in after `reload_ms`.
#[derive(Debug)]
pub struct SimLauncherRig {
    pub limit: SimLimitSwitch,
    pub distance: SimDistanceSensor,
    pub motor: SimMotor,
    /// Arm position as a fraction of one revolution.
    arm_position: f64,
    /// Milliseconds until the feeder refills, if a reload is pending.
    reload_remaining_ms: Option<u64>,
    reload_ms: u64,
    loaded_distance_mm: u32,
}

/// Limit switch engagement window around the rest position.
const LIMIT_WINDOW: f64 = 0.05;

impl SimLauncherRig {
    /// Rig starting cocked with a projectile loaded.
    pub fn new(reload_ms: u64, loaded_distance_mm: u32) -> Self {
        Self {
            limit: SimLimitSwitch::engaged(),
            distance: SimDistanceSensor::with_distance(loaded_distance_mm),
            motor: SimMotor::new(),
            arm_position: 0.0,
            reload_remaining_ms: None,
            reload_ms,
            loaded_distance_mm,
        }
    }

    /// Advance the model by one cycle of `dt_ms` milliseconds.
    pub fn step(&mut self, dt_ms: u64) {
        let rpm = self.motor.current_rpm();
        if rpm != 0 {
            let revs = rpm.unsigned_abs() as f64 / 60_000.0 * dt_ms as f64;
            let before = self.arm_position;
            self.arm_position = (self.arm_position + revs) % 1.0;

            // Projectile leaves at mid-revolution.
            if before < 0.5 && (self.arm_position >= 0.5 || self.arm_position < before) {
                if self.reload_remaining_ms.is_none() {
                    self.distance.set_distance(EMPTY_PATH_MM);
                    self.reload_remaining_ms = Some(self.reload_ms);
                }
            }
        }

        self.limit
            .set_engaged(self.arm_position < LIMIT_WINDOW || self.arm_position > 1.0 - LIMIT_WINDOW);

        if let Some(remaining) = self.reload_remaining_ms {
            if remaining <= dt_ms {
                self.distance.set_distance(self.loaded_distance_mm);
                self.reload_remaining_ms = None;
            } else {
                self.reload_remaining_ms = Some(remaining - dt_ms);
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
