//! # ACS Control Core
//!
//! Guarded finite-state machine for a small satellite's attitude-control
//! subsystem. Arbitrates which actuator (reaction wheel or magnetorquer rod)
//! is active, enforces which operations are legal in which state, and exposes
//! the control surface to the bus master through a fixed-width command/status
//! frame protocol.
//!
//! ## Architecture
//!
//! - [`table`] — static transition/function tables: the declarative safety
//!   policy ("is this edge licensed", "is this command licensed here")
//! - [`engine`] — the live ACS aggregate; sole writer of the current state
//! - [`dispatch`] — decode → lookup → invoke → encode, one status per command
//! - [`thread`] — the single execution context owning the ACS instance
//! - [`bus`] — transport seam to the field-bus stack
//! - [`sim`] — simulated actuator drivers with instrumentation probes
//!
//! ## Safety guarantees
//!
//! A function handler can never execute in a state the function table does
//! not license it for, a transition absent from the transition table never
//! moves the state, and a failed entry/exit hook leaves the state exactly as
//! it was. Bad commands are answered, never fatal: every inbound frame yields
//! exactly one status frame.

pub mod bus;
pub mod dispatch;
pub mod engine;
pub mod sim;
pub mod table;
pub mod thread;
