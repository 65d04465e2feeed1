//! Scenario tests for the firing contract: pacing, latching,
//! idempotence, and the exact motor command sequences they imply.

use cata_common::state::{MechanismState, MotorCommand};

use super::test_rig;

#[test]
fn idle_never_drives_regardless_of_sensor_noise() {
    let mut r = test_rig();
    // Sensor state flaps; intent stays idle throughout.
    for i in 0..60 {
        r.limit.set_engaged(i % 3 != 0);
        r.distance.set_distance(if i % 2 == 0 { 10 } else { 120 });
        assert_eq!(r.controller.tick(), MotorCommand::Stop);
        assert_eq!(r.controller.state(), MechanismState::Cocked);
    }
    assert!(r.motor.drive_commands().is_empty());
}

#[test]
fn single_fire_scenario_drive_then_stop_cocked() {
    let mut r = test_rig();

    // Short press (3 cycles = 30 ms) then release → FireOnce.
    for _ in 0..3 {
        r.controller.spin_cata_driver(true, 150);
        r.controller.tick();
    }
    r.controller.spin_cata_driver(false, 150);
    r.complete_revolution();
    r.controller.tick(); // settle → Cocked

    assert_eq!(r.controller.state(), MechanismState::Cocked);
    assert_eq!(r.motor.drive_commands(), vec![150], "exactly one drive");
    assert_eq!(r.motor.stop_count(), 1, "exactly one stop");

    // Nothing residual: the launcher stays put.
    for _ in 0..20 {
        assert_eq!(r.controller.tick(), MotorCommand::Stop);
    }
    assert_eq!(r.motor.drive_commands(), vec![150]);
}

#[test]
fn matchload_with_empty_feed_never_fires_for_50_cycles() {
    let mut r = test_rig();
    r.distance.set_distance(150); // no projectile

    let auto = r.controller.intent_handle();
    auto.spin_cata_auto(200);

    for _ in 0..50 {
        r.controller.tick();
        assert_eq!(r.controller.state(), MechanismState::Cocked);
    }
    assert!(r.motor.drive_commands().is_empty(), "zero drive() calls");
}

#[test]
fn fresh_continuous_request_waits_for_projectile() {
    let mut r = test_rig();
    r.distance.set_distance(150);

    let auto = r.controller.intent_handle();
    auto.spin_cata_auto(120);
    for _ in 0..10 {
        r.controller.tick();
    }
    assert_eq!(r.controller.state(), MechanismState::Cocked);

    // Feeder delivers: the very next cycle fires.
    r.distance.set_distance(20);
    assert_eq!(r.controller.tick(), MotorCommand::Drive(120));
    assert_eq!(r.controller.state(), MechanismState::Firing);
}

#[test]
fn load_lost_during_latched_shot_still_progresses_to_reset() {
    let mut r = test_rig();

    for _ in 0..3 {
        r.controller.spin_cata_driver(true, 150);
        r.controller.tick();
    }
    r.controller.spin_cata_driver(false, 150); // FireOnce latched

    // Projectile reading drops mid-revolution.
    r.limit.set_engaged(false);
    r.distance.set_distance(150);
    for _ in 0..3 {
        assert_eq!(r.controller.tick(), MotorCommand::Drive(150));
    }

    r.limit.set_engaged(true);
    r.controller.tick();
    assert_eq!(r.controller.state(), MechanismState::Resetting);
}

#[test]
fn double_stop_cata_auto_is_one_motor_stop() {
    let mut r = test_rig();
    let auto = r.controller.intent_handle();

    auto.spin_cata_auto(150);
    r.controller.tick(); // → Firing
    r.limit.set_engaged(false);
    r.controller.tick();

    auto.stop_cata_auto();
    auto.stop_cata_auto();

    r.limit.set_engaged(true);
    r.controller.tick(); // revolution done → Resetting, stop
    r.controller.tick(); // → Cocked
    for _ in 0..10 {
        r.controller.tick();
    }

    assert_eq!(r.motor.stop_count(), 1);
    assert_eq!(r.controller.state(), MechanismState::Cocked);
}

#[test]
fn controller_observes_only_latest_intent_across_tasks() {
    let mut r = test_rig();
    let auto = r.controller.intent_handle();

    // Writer task fires and stops before the next cycle boundary.
    let writer = std::thread::spawn(move || {
        auto.spin_cata_auto(300);
        auto.stop_cata_auto();
    });
    writer.join().unwrap();

    for _ in 0..10 {
        assert_eq!(r.controller.tick(), MotorCommand::Stop);
    }
    assert!(r.motor.drive_commands().is_empty(), "stale FireContinuous leaked");
}

#[test]
fn continuous_velocity_change_reasserts_mid_burst() {
    let mut r = test_rig();
    let auto = r.controller.intent_handle();

    auto.spin_cata_auto(120);
    r.controller.tick();
    r.limit.set_engaged(false);
    r.controller.tick();

    auto.spin_cata_auto(170);
    assert_eq!(r.controller.tick(), MotorCommand::Drive(170));
    assert_eq!(r.motor.sent_commands(), vec![120, 170]);
}
