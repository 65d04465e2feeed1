//! Launcher mechanism state machine: `Cocked → Firing → Resetting`.
//!
//! Evaluated exactly once per control cycle with the resolved intent
//! and a fresh sensor snapshot; produces exactly one motor command.
//!
//! Two rules distinguish this from a plain button-to-motor mapping:
//!
//! - **Match-load pacing**: `FireContinuous` leaves `Cocked` (or chains
//!   into the next revolution) only while a projectile is detected, so
//!   the mechanism never free-spins through an empty feed. `FireOnce`
//!   bypasses the gate as a manual override.
//! - **Revolution completion**: the limit switch is still engaged when a
//!   shot starts, so a shot completes only on a released→engaged edge
//!   observed since entering `Firing`.

use cata_common::config::ResetStyle;
use cata_common::intent::FiringIntent;
use cata_common::state::{MechanismState, MotorCommand, SensorSnapshot};

/// Outcome of one state machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// The explicit command for this cycle (run or stop, never absent).
    pub command: MotorCommand,
    /// A pending `FireOnce` was used up this cycle — either it started
    /// a shot, or an in-flight shot completed while it was pending.
    /// The caller must clear it from the intent slot.
    pub consumed_single_fire: bool,
}

impl StepResult {
    const fn stop() -> Self {
        Self {
            command: MotorCommand::Stop,
            consumed_single_fire: false,
        }
    }

    const fn drive(rpm: i32) -> Self {
        Self {
            command: MotorCommand::Drive(rpm),
            consumed_single_fire: false,
        }
    }
}

/// The launcher state machine. Single-owner: only the cycle task holds
/// a mutable reference, and only [`step`](Self::step) mutates state.
#[derive(Debug, Clone)]
pub struct LauncherStateMachine {
    state: MechanismState,
    /// Intent that started the in-flight shot; holds the latched
    /// velocity when the live intent no longer carries one.
    shot: Option<FiringIntent>,
    /// Limit switch has released since the current shot started.
    limit_released: bool,
    /// Command issued while settling in `Resetting`.
    reset_command: MotorCommand,
}

impl LauncherStateMachine {
    /// Create a machine in `Cocked` (limit switch assumed engaged at
    /// startup).
    pub fn new(reset_style: ResetStyle, creep_velocity: i32) -> Self {
        let reset_command = match reset_style {
            ResetStyle::Coast => MotorCommand::Stop,
            ResetStyle::Creep => MotorCommand::Drive(creep_velocity),
        };
        Self {
            state: MechanismState::Cocked,
            shot: None,
            limit_released: false,
            reset_command,
        }
    }

    /// Current mechanism state.
    #[inline]
    pub const fn state(&self) -> MechanismState {
        self.state
    }

    /// True while a shot is in flight.
    #[inline]
    pub const fn is_firing(&self) -> bool {
        matches!(self.state, MechanismState::Firing)
    }

    /// Advance one control cycle.
    pub fn step(&mut self, intent: FiringIntent, sensors: SensorSnapshot) -> StepResult {
        match self.state {
            MechanismState::Cocked => self.step_cocked(intent, sensors),
            MechanismState::Firing => self.step_firing(intent, sensors),
            MechanismState::Resetting => self.step_resetting(sensors),
        }
    }

    fn step_cocked(&mut self, intent: FiringIntent, sensors: SensorSnapshot) -> StepResult {
        match intent {
            FiringIntent::Idle => StepResult::stop(),

            // Manual override: always honored, loaded or not.
            FiringIntent::FireOnce(rpm) => {
                self.begin_shot(intent, sensors);
                StepResult {
                    command: MotorCommand::Drive(rpm),
                    consumed_single_fire: true,
                }
            }

            FiringIntent::FireContinuous(rpm) => {
                if sensors.projectile_loaded {
                    self.begin_shot(intent, sensors);
                    StepResult::drive(rpm)
                } else {
                    // Match-load pacing: hold cocked until the feeder
                    // delivers.
                    StepResult::stop()
                }
            }
        }
    }

    fn step_firing(&mut self, intent: FiringIntent, sensors: SensorSnapshot) -> StepResult {
        if !sensors.limit_engaged {
            self.limit_released = true;
        }

        let revolution_complete = sensors.limit_engaged && self.limit_released;
        if revolution_complete {
            if let FiringIntent::FireContinuous(rpm) = intent {
                if sensors.projectile_loaded {
                    // Chain straight into the next shot.
                    self.begin_shot(intent, sensors);
                    return StepResult::drive(rpm);
                }
            }
            // Shot done: settle onto the switch. A FireOnce pending at
            // completion was the request for this very shot.
            self.state = MechanismState::Resetting;
            self.shot = None;
            self.limit_released = false;
            return StepResult {
                command: MotorCommand::Stop,
                consumed_single_fire: matches!(intent, FiringIntent::FireOnce(_)),
            };
        }

        // Mid-revolution: re-assert continuous velocity (handles the
        // target changing mid-fire), otherwise hold the latched one.
        let rpm = match intent {
            FiringIntent::FireContinuous(rpm) => {
                self.shot = Some(intent);
                rpm
            }
            _ => self.shot.map_or(0, |shot| shot.velocity()),
        };
        StepResult::drive(rpm)
    }

    fn step_resetting(&mut self, sensors: SensorSnapshot) -> StepResult {
        if sensors.limit_engaged {
            // Confirm the hold — the motor is always stopped entering
            // Cocked, preventing overshoot past the switch.
            self.state = MechanismState::Cocked;
            StepResult::stop()
        } else {
            StepResult {
                command: self.reset_command,
                consumed_single_fire: false,
            }
        }
    }

    fn begin_shot(&mut self, intent: FiringIntent, sensors: SensorSnapshot) {
        self.state = MechanismState::Firing;
        self.shot = Some(intent);
        self.limit_released = !sensors.limit_engaged;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
