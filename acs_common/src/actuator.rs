//! Actuator driver trait and error type.
//!
//! The control core drives one reaction-wheel motor and one magnetorquer
//! coil through this trait; the concrete peripherals (BLDC commutation,
//! coil H-bridge) live behind it and are out of scope here. Drivers are
//! invoked only from transition/function hooks, never by the dispatcher,
//! and are expected to return quickly — a driver call that blocks stalls
//! all further command processing.

use thiserror::Error;

/// Error type for actuator operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuatorError {
    /// Duty cycle outside the driver's configured ceiling.
    #[error("duty cycle {requested} exceeds limit {limit}")]
    DutyCycleOutOfRange { requested: u8, limit: u8 },

    /// Command issued while the peripheral is not running.
    #[error("actuator not running")]
    NotRunning,

    /// Peripheral-reported fault.
    #[error("peripheral fault: {0}")]
    Peripheral(&'static str),
}

/// Trait defining the interface for actuator drivers.
///
/// # Lifecycle
///
/// Drivers are constructed at boot and handed to the ACS aggregate, which
/// owns them for the process lifetime. `start`/`stop`
/// bracket the actuator's powered window; `set_duty_cycle` is only
/// meaningful in between.
pub trait ActuatorDriver: Send {
    /// Short identifier used in logs (e.g. "rw-sim", "mtqr-sim").
    fn name(&self) -> &'static str;

    /// Power the actuator up at zero output.
    fn start(&mut self) -> Result<(), ActuatorError>;

    /// Spin down / de-energize and power off.
    fn stop(&mut self) -> Result<(), ActuatorError>;

    /// Set the output duty cycle in percent (0..=100).
    fn set_duty_cycle(&mut self, duty: u8) -> Result<(), ActuatorError>;
}
