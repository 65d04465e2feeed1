//! Catapult controller: intent resolution and the per-cycle update.
//!
//! The controller owns the dependency-injected adapters and the state
//! machine; [`tick`](CatapultController::tick) is the only place
//! mechanism state advances. Driver input arrives through
//! [`spin_cata_driver`](CatapultController::spin_cata_driver) (called
//! once per cycle with the raw button level); autonomous routines hold
//! an [`IntentHandle`] and may call it from any task.

use cata_common::config::LauncherConfig;
use cata_common::consts::{DEFAULT_MATCHLOAD_RPM, MIN_MATCHLOAD_RPM};
use cata_common::error::FaultFlags;
use cata_common::intent::{FiringIntent, IntentSlot};
use cata_common::state::{MechanismState, MotorCommand};
use tracing::{debug, warn};

use crate::adapters::{DistanceSensor, LauncherMotor, LimitSwitch, MotorAdapter, SensorAdapter};
use crate::machine::LauncherStateMachine;

// ─── Autonomous Handle ──────────────────────────────────────────────

/// Cloneable handle for autonomous firing commands.
///
/// Writes take effect on the next control cycle, never synchronously;
/// both calls are safe from tasks other than the cycle task. Last
/// write wins.
#[derive(Debug, Clone)]
pub struct IntentHandle {
    slot: IntentSlot,
}

impl IntentHandle {
    /// Sustain firing at `velocity` rpm until [`stop_cata_auto`]
    /// replaces the intent.
    ///
    /// [`stop_cata_auto`]: Self::stop_cata_auto
    pub fn spin_cata_auto(&self, velocity: i32) {
        self.slot.set(FiringIntent::FireContinuous(velocity));
    }

    /// Return the launcher to idle. Callable at any time; idempotent.
    pub fn stop_cata_auto(&self) {
        self.slot.set(FiringIntent::Idle);
    }
}

// ─── Match-load Speed Control ───────────────────────────────────────

/// Driver-adjustable match-load firing speed.
///
/// Bound to the speed up/down controller buttons; the result feeds the
/// velocity argument of `spin_cata_driver`.
#[derive(Debug, Clone, Copy)]
pub struct MatchLoadSpeed {
    rpm: i32,
    step: i32,
    max: i32,
}

impl MatchLoadSpeed {
    pub fn new(config: &LauncherConfig) -> Self {
        Self {
            rpm: DEFAULT_MATCHLOAD_RPM.min(config.max_velocity),
            step: config.matchload_step,
            max: config.max_velocity,
        }
    }

    /// Current speed [rpm].
    #[inline]
    pub const fn rpm(&self) -> i32 {
        self.rpm
    }

    /// Raise the speed one step, saturating at the velocity clamp.
    pub fn up(&mut self) -> i32 {
        self.rpm = (self.rpm + self.step).min(self.max);
        self.rpm
    }

    /// Lower the speed one step, saturating at the minimum usable speed.
    pub fn down(&mut self) -> i32 {
        self.rpm = (self.rpm - self.step).max(MIN_MATCHLOAD_RPM);
        self.rpm
    }
}

// ─── Controller ─────────────────────────────────────────────────────

/// Firing control for the catapult mechanism.
pub struct CatapultController<L, D, M> {
    config: LauncherConfig,
    sensors: SensorAdapter<L, D>,
    motor: MotorAdapter<M>,
    machine: LauncherStateMachine,
    intent: IntentSlot,
    /// Driver button level from the previous cycle.
    button_was_pressed: bool,
    /// Cycles the button has been held in the current press.
    press_cycles: u64,
    /// Controller-level latched faults (velocity clamping).
    faults: FaultFlags,
    /// Command issued on the most recent cycle.
    last_command: MotorCommand,
}

impl<L, D, M> CatapultController<L, D, M>
where
    L: LimitSwitch,
    D: DistanceSensor,
    M: LauncherMotor,
{
    /// Build a controller from validated config and injected devices.
    pub fn new(config: LauncherConfig, limit: L, distance: D, motor: M) -> Self {
        let sensors = SensorAdapter::new(limit, distance, config.load_distance_mm);
        let machine = LauncherStateMachine::new(config.reset_style, config.creep_velocity);
        Self {
            config,
            sensors,
            motor: MotorAdapter::new(motor),
            machine,
            intent: IntentSlot::new(),
            button_was_pressed: false,
            press_cycles: 0,
            faults: FaultFlags::empty(),
            last_command: MotorCommand::Stop,
        }
    }

    /// Handle for autonomous routines running on other tasks.
    pub fn intent_handle(&self) -> IntentHandle {
        IntentHandle {
            slot: self.intent.clone(),
        }
    }

    /// Driver fire button, sampled once per control cycle.
    ///
    /// While held past the debounce window the intent is continuous
    /// fire at `velocity`. A release classifies the press: within the
    /// single-fire window it latches one shot (which completes even
    /// though the button is up); longer holds simply go idle. Writes
    /// happen only on press/hold/release events, so an idle driver
    /// loop does not overwrite a concurrent autonomous intent.
    pub fn spin_cata_driver(&mut self, pressed: bool, velocity: i32) {
        if pressed {
            self.press_cycles += 1;
            if self.held_ms() >= self.config.press_debounce_ms {
                self.intent.set(FiringIntent::FireContinuous(velocity));
            }
        } else if self.button_was_pressed {
            let held_ms = self.held_ms();
            if held_ms < self.config.press_debounce_ms {
                // Switch bounce: nothing was ever asserted.
            } else if held_ms <= self.config.single_fire_max_press_ms {
                self.intent.set(FiringIntent::FireOnce(velocity));
            } else {
                self.intent.set(FiringIntent::Idle);
            }
            self.press_cycles = 0;
        }
        self.button_was_pressed = pressed;
    }

    /// One control cycle: read sensors, resolve intent, advance the
    /// state machine, issue the motor command. Never fails — adapter
    /// errors degrade inside the adapters.
    pub fn tick(&mut self) -> MotorCommand {
        let snapshot = self.sensors.snapshot();
        let raw = self.intent.get();
        let intent = self.resolve_intent(raw);

        let result = self.machine.step(intent, snapshot);

        if result.consumed_single_fire {
            if let FiringIntent::FireOnce(_) = raw {
                // Clear it only if no newer write landed meanwhile.
                self.intent.consume(raw);
            }
        }

        self.motor.apply(result.command);
        self.last_command = result.command;
        result.command
    }

    /// Current mechanism state.
    #[inline]
    pub fn state(&self) -> MechanismState {
        self.machine.state()
    }

    /// Command issued on the most recent cycle.
    #[inline]
    pub fn last_command(&self) -> MotorCommand {
        self.last_command
    }

    /// Union of all latched faults across controller and adapters.
    pub fn faults(&self) -> FaultFlags {
        self.faults | self.sensors.faults() | self.motor.faults()
    }

    /// Best-effort motor stop, used on shutdown.
    pub fn shutdown(&mut self) {
        self.intent.set(FiringIntent::Idle);
        self.motor.stop();
        debug!("controller shutdown: motor stopped, intent idle");
    }

    fn held_ms(&self) -> u64 {
        self.press_cycles * self.config.cycle_time_ms
    }

    /// Clamp out-of-range velocities instead of rejecting the request.
    fn resolve_intent(&mut self, raw: FiringIntent) -> FiringIntent {
        let (clamped, was_clamped) = self.config.clamp_velocity(raw.velocity());
        if was_clamped && !self.faults.contains(FaultFlags::VELOCITY_CLAMPED) {
            warn!(
                "requested velocity {} out of range, clamped to {clamped}",
                raw.velocity()
            );
        }
        if was_clamped {
            self.faults |= FaultFlags::VELOCITY_CLAMPED;
        }
        match raw {
            FiringIntent::Idle => FiringIntent::Idle,
            FiringIntent::FireOnce(_) => FiringIntent::FireOnce(clamped),
            FiringIntent::FireContinuous(_) => FiringIntent::FireContinuous(clamped),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
