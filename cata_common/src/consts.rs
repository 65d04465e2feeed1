//! System-wide constants for the catapult workspace.
//!
//! Single source of truth for numeric limits and defaults.
//! Imported by both crates — no duplication permitted.

/// Default control cycle period in milliseconds.
pub const DEFAULT_CYCLE_TIME_MS: u64 = 10;

/// Maximum commandable launcher velocity [rpm].
///
/// The launcher runs 200 rpm motor cartridges; anything above this is
/// clamped, never rejected.
pub const MAX_MOTOR_RPM: i32 = 200;

/// Default firing velocity for match-load mode [rpm].
pub const DEFAULT_MATCHLOAD_RPM: i32 = 120;

/// Default step applied by the match-load speed up/down controls [rpm].
pub const DEFAULT_MATCHLOAD_STEP_RPM: i32 = 10;

/// Minimum match-load velocity the speed controls may select [rpm].
pub const MIN_MATCHLOAD_RPM: i32 = 40;

/// Default creep velocity for motor-assisted reset toward the limit
/// switch [rpm].
pub const DEFAULT_CREEP_RPM: i32 = 35;

/// Default projectile-detection threshold [mm]. A distance reading at or
/// below this means a projectile sits in the launch path.
pub const DEFAULT_LOAD_DISTANCE_MM: u32 = 30;

/// Presses shorter than this are treated as switch bounce [ms].
pub const DEFAULT_PRESS_DEBOUNCE_MS: u64 = 20;

/// Releases after a press of at most this duration fire a single shot [ms].
pub const DEFAULT_SINGLE_FIRE_MAX_PRESS_MS: u64 = 250;

/// Telemetry log interval [cycles].
pub const DEFAULT_TELEMETRY_INTERVAL: u64 = 100;
