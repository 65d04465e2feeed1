//! Motor adapter: command deduplication and best-effort retry.
//!
//! The controller decides an explicit command every cycle so actuator
//! state is never ambiguous; this wrapper suppresses redundant identical
//! writes so an unchanged command does not hit the motor bus again. A
//! failed write clears the memo, which makes the same command go out
//! again next cycle — the loop keeps cycling while hardware reconnects.

use cata_common::error::FaultFlags;
use cata_common::state::MotorCommand;
use tracing::warn;

use super::LauncherMotor;

/// Wraps the launcher motor behind one per-cycle apply call.
#[derive(Debug)]
pub struct MotorAdapter<M> {
    motor: M,
    /// Last velocity acknowledged by the motor. Starts at zero: the
    /// motor controller powers on holding zero output, so an idle loop
    /// does not open with a redundant stop.
    last_sent: Option<i32>,
    /// Latched actuator faults.
    faults: FaultFlags,
}

impl<M: LauncherMotor> MotorAdapter<M> {
    pub fn new(motor: M) -> Self {
        Self {
            motor,
            last_sent: Some(0),
            faults: FaultFlags::empty(),
        }
    }

    /// Apply this cycle's command. Sends to hardware only when the
    /// commanded velocity differs from the last acknowledged one.
    pub fn apply(&mut self, command: MotorCommand) {
        let rpm = command.velocity();
        if self.last_sent == Some(rpm) {
            return;
        }
        match self.motor.set_velocity(rpm) {
            Ok(()) => {
                self.last_sent = Some(rpm);
            }
            Err(e) => {
                if !self.faults.contains(FaultFlags::MOTOR_UNRESPONSIVE) {
                    warn!("motor command unacknowledged, will retry: {e}");
                }
                self.faults |= FaultFlags::MOTOR_UNRESPONSIVE;
                // Memo stays cleared so the command is retried next cycle.
                self.last_sent = None;
            }
        }
    }

    /// Best-effort immediate stop, used on shutdown.
    pub fn stop(&mut self) {
        self.apply(MotorCommand::Stop);
    }

    /// Latched actuator faults observed so far.
    #[inline]
    pub fn faults(&self) -> FaultFlags {
        self.faults
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::SimMotor;

    #[test]
    fn identical_commands_are_sent_once() {
        let motor = SimMotor::new();
        let mut adapter = MotorAdapter::new(motor.clone());

        adapter.apply(MotorCommand::Drive(120));
        adapter.apply(MotorCommand::Drive(120));
        adapter.apply(MotorCommand::Drive(120));
        assert_eq!(motor.sent_commands(), vec![120]);
    }

    #[test]
    fn velocity_change_is_sent() {
        let motor = SimMotor::new();
        let mut adapter = MotorAdapter::new(motor.clone());

        adapter.apply(MotorCommand::Drive(120));
        adapter.apply(MotorCommand::Drive(150));
        adapter.apply(MotorCommand::Stop);
        adapter.apply(MotorCommand::Stop);
        assert_eq!(motor.sent_commands(), vec![120, 150, 0]);
    }

    #[test]
    fn stop_equals_drive_zero() {
        let motor = SimMotor::new();
        let mut adapter = MotorAdapter::new(motor.clone());

        // Power-on state is already zero, so neither form of a zero
        // command reaches the bus until a drive intervenes.
        adapter.apply(MotorCommand::Stop);
        adapter.apply(MotorCommand::Drive(0));
        assert!(motor.sent_commands().is_empty());

        adapter.apply(MotorCommand::Drive(90));
        adapter.apply(MotorCommand::Drive(0));
        adapter.apply(MotorCommand::Stop);
        assert_eq!(motor.sent_commands(), vec![90, 0]);
    }

    #[test]
    fn failed_write_is_retried_next_cycle() {
        let motor = SimMotor::new();
        motor.fail_writes(true);
        let mut adapter = MotorAdapter::new(motor.clone());

        adapter.apply(MotorCommand::Drive(120));
        assert!(motor.sent_commands().is_empty());
        assert!(adapter.faults().contains(FaultFlags::MOTOR_UNRESPONSIVE));

        // Controller reconnects: the same command goes out on retry.
        motor.fail_writes(false);
        adapter.apply(MotorCommand::Drive(120));
        assert_eq!(motor.sent_commands(), vec![120]);
    }
}
