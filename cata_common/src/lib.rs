//! Catapult Common Library
//!
//! Shared leaf types for the catapult launcher control workspace:
//! state enums, firing intent and the shared intent slot, sensor
//! snapshot, motor command, fault flags, and configuration structs.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide constants and defaults
//! - [`state`] - Mechanism state, motor command, sensor snapshot
//! - [`intent`] - Firing intent and the single-slot shared intent value
//! - [`error`] - Adapter error taxonomy and latched fault flags
//! - [`config`] - Launcher configuration with validation

pub mod config;
pub mod consts;
pub mod error;
pub mod intent;
pub mod state;
