//! # Catapult Control Unit
//!
//! Firing control for a competition robot's catapult mechanism. A small
//! real-time state machine decides once per control cycle whether the
//! launcher motor runs or holds, from three inputs: driver intent
//! (edge-detected fire button), autonomous intent (sustained fire at a
//! target velocity), and two sensors — a limit switch confirming the arm
//! is cocked and a distance sensor confirming a projectile is loaded.
//!
//! ## Architecture
//!
//! - [`adapters`] — hardware seams: sensor/motor traits, degrade-to-safe
//!   wrappers, and a simulated rig for tests and bench runs
//! - [`machine`] — the `Cocked → Firing → Resetting` transition table
//! - [`controller`] — intent resolution, button edge/debounce handling,
//!   velocity clamping, per-cycle tick
//! - [`cycle`] — fixed-period loop with cycle statistics and optional
//!   PREEMPT_RT pacing (`rt` feature)
//! - [`config`] — TOML loading and validation
//!
//! ## Single-writer rule
//!
//! Exactly one execution context — the cycle task — advances mechanism
//! state. Driver and autonomous callers only overwrite the shared intent
//! slot; their writes take effect on the next cycle, never synchronously.

pub mod adapters;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod machine;
