mod firing_properties;
mod matchload_rig;

use cata_common::config::LauncherConfig;
use cata_control_unit::adapters::sim::{SimDistanceSensor, SimLimitSwitch, SimMotor};
use cata_control_unit::controller::CatapultController;

pub type SimController = CatapultController<SimLimitSwitch, SimDistanceSensor, SimMotor>;

pub struct TestRig {
    pub controller: SimController,
    pub limit: SimLimitSwitch,
    pub distance: SimDistanceSensor,
    pub motor: SimMotor,
}

/// Controller on default config (10 ms cycles), cocked and loaded.
pub fn test_rig() -> TestRig {
    let limit = SimLimitSwitch::engaged();
    let distance = SimDistanceSensor::with_distance(20);
    let motor = SimMotor::new();
    let controller = CatapultController::new(
        LauncherConfig::default(),
        limit.clone(),
        distance.clone(),
        motor.clone(),
    );
    TestRig {
        controller,
        limit,
        distance,
        motor,
    }
}

impl TestRig {
    /// Walk an in-flight shot through one arm revolution: the limit
    /// switch releases, stays released for a few cycles, then
    /// re-engages.
    pub fn complete_revolution(&mut self) {
        self.limit.set_engaged(false);
        for _ in 0..3 {
            self.controller.tick();
        }
        self.limit.set_engaged(true);
        self.controller.tick();
    }
}
