//! Launcher configuration structs.
//!
//! Deserialized from TOML with per-field defaults, then bounds-checked
//! via [`LauncherConfig::validate`]. Loading from disk lives in the
//! control unit crate; the structs stay here so both crates share one
//! definition.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CREEP_RPM, DEFAULT_CYCLE_TIME_MS, DEFAULT_LOAD_DISTANCE_MM, DEFAULT_MATCHLOAD_STEP_RPM,
    DEFAULT_PRESS_DEBOUNCE_MS, DEFAULT_SINGLE_FIRE_MAX_PRESS_MS, DEFAULT_TELEMETRY_INTERVAL,
    MAX_MOTOR_RPM,
};

/// How the mechanism returns onto the limit switch after a revolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResetStyle {
    /// Spring/gravity settle with the motor stopped.
    #[default]
    Coast,
    /// Drive at a small fixed creep velocity until the limit re-engages.
    Creep,
}

/// Complete launcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Control cycle period [ms].
    pub cycle_time_ms: u64,
    /// Velocity clamp applied to every caller-supplied target [rpm].
    pub max_velocity: i32,
    /// Creep velocity for motor-assisted reset [rpm].
    pub creep_velocity: i32,
    /// Reset behavior while the limit switch is disengaged.
    pub reset_style: ResetStyle,
    /// Projectile-detection distance threshold [mm].
    pub load_distance_mm: u32,
    /// Presses shorter than this are ignored as bounce [ms].
    pub press_debounce_ms: u64,
    /// Releases at or below this press duration fire one shot [ms].
    pub single_fire_max_press_ms: u64,
    /// Step for the match-load speed up/down controls [rpm].
    pub matchload_step: i32,
    /// Telemetry log interval [cycles].
    pub telemetry_interval: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            cycle_time_ms: DEFAULT_CYCLE_TIME_MS,
            max_velocity: MAX_MOTOR_RPM,
            creep_velocity: DEFAULT_CREEP_RPM,
            reset_style: ResetStyle::default(),
            load_distance_mm: DEFAULT_LOAD_DISTANCE_MM,
            press_debounce_ms: DEFAULT_PRESS_DEBOUNCE_MS,
            single_fire_max_press_ms: DEFAULT_SINGLE_FIRE_MAX_PRESS_MS,
            matchload_step: DEFAULT_MATCHLOAD_STEP_RPM,
            telemetry_interval: DEFAULT_TELEMETRY_INTERVAL,
        }
    }
}

impl LauncherConfig {
    /// Bounds-check every parameter. Returns the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_time_ms == 0 || self.cycle_time_ms > 100 {
            return Err(format!(
                "cycle_time_ms must be in 1..=100, got {}",
                self.cycle_time_ms
            ));
        }
        if self.max_velocity <= 0 || self.max_velocity > MAX_MOTOR_RPM {
            return Err(format!(
                "max_velocity must be in 1..={MAX_MOTOR_RPM}, got {}",
                self.max_velocity
            ));
        }
        if self.creep_velocity <= 0 || self.creep_velocity > self.max_velocity {
            return Err(format!(
                "creep_velocity must be in 1..=max_velocity ({}), got {}",
                self.max_velocity, self.creep_velocity
            ));
        }
        if self.load_distance_mm == 0 {
            return Err("load_distance_mm must be nonzero".into());
        }
        if self.press_debounce_ms >= self.single_fire_max_press_ms {
            return Err(format!(
                "press_debounce_ms ({}) must be below single_fire_max_press_ms ({})",
                self.press_debounce_ms, self.single_fire_max_press_ms
            ));
        }
        if self.matchload_step <= 0 {
            return Err(format!("matchload_step must be positive, got {}", self.matchload_step));
        }
        if self.telemetry_interval == 0 {
            return Err("telemetry_interval must be nonzero".into());
        }
        Ok(())
    }

    /// Clamp a caller-supplied velocity to the configured range,
    /// preserving sign. Returns the clamped value and whether clamping
    /// occurred.
    pub fn clamp_velocity(&self, velocity: i32) -> (i32, bool) {
        let clamped = velocity.clamp(-self.max_velocity, self.max_velocity);
        (clamped, clamped != velocity)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
