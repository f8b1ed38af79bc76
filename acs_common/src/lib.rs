//! ACS Common Library
//!
//! Shared types for the attitude-control subsystem workspace: the closed
//! state/function/command enumerations, the fixed-width command/status frame
//! codec used at the field-bus boundary, the sticky diagnostic fault flags,
//! the actuator driver trait, and TOML configuration loading.
//!
//! # Module Structure
//!
//! - [`state`] - State, function and command enumerations with wire codes
//! - [`frame`] - Command/status frame layout and codec
//! - [`fault`] - Sticky diagnostic fault flags
//! - [`actuator`] - Pluggable actuator driver trait
//! - [`config`] - TOML configuration loading and validation

pub mod actuator;
pub mod config;
pub mod fault;
pub mod frame;
pub mod state;
