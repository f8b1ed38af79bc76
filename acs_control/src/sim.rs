//! Simulated actuator drivers.
//!
//! Stand-ins for the reaction-wheel motor controller and the magnetorquer
//! coil driver, used by the binary's exerciser mode and the test suite.
//! Every driver hands out a [`SimProbe`] so tests can observe call counts
//! and output state after the driver has been boxed into the ACS aggregate,
//! and can arm a one-shot fault to exercise the hook-failure paths.

use acs_common::actuator::{ActuatorDriver, ActuatorError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

#[derive(Debug, Default)]
struct ProbeInner {
    start_calls: AtomicU32,
    stop_calls: AtomicU32,
    duty_calls: AtomicU32,
    running: AtomicBool,
    duty: AtomicU8,
    fail_next: AtomicBool,
}

/// Shared observation/injection handle onto one simulated driver.
#[derive(Debug, Clone, Default)]
pub struct SimProbe(Arc<ProbeInner>);

impl SimProbe {
    pub fn start_calls(&self) -> u32 {
        self.0.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> u32 {
        self.0.stop_calls.load(Ordering::SeqCst)
    }

    pub fn duty_calls(&self) -> u32 {
        self.0.duty_calls.load(Ordering::SeqCst)
    }

    /// Total driver invocations of any kind.
    pub fn total_calls(&self) -> u32 {
        self.start_calls() + self.stop_calls() + self.duty_calls()
    }

    pub fn is_running(&self) -> bool {
        self.0.running.load(Ordering::SeqCst)
    }

    pub fn duty(&self) -> u8 {
        self.0.duty.load(Ordering::SeqCst)
    }

    /// Arm the driver to fail its next call with a peripheral fault.
    pub fn inject_fault(&self) {
        self.0.fail_next.store(true, Ordering::SeqCst);
    }
}

/// Simulated actuator: tracks running state and duty cycle, enforces the
/// configured duty ceiling, and counts every call.
#[derive(Debug)]
pub struct SimulatedActuator {
    name: &'static str,
    duty_limit: u8,
    probe: SimProbe,
}

impl SimulatedActuator {
    pub fn new(name: &'static str, duty_limit: u8) -> Self {
        Self {
            name,
            duty_limit,
            probe: SimProbe::default(),
        }
    }

    /// Clone the probe before handing the driver to the ACS.
    pub fn probe(&self) -> SimProbe {
        self.probe.clone()
    }

    fn take_injected_fault(&self) -> Result<(), ActuatorError> {
        if self.probe.0.fail_next.swap(false, Ordering::SeqCst) {
            Err(ActuatorError::Peripheral("injected fault"))
        } else {
            Ok(())
        }
    }
}

impl ActuatorDriver for SimulatedActuator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn start(&mut self) -> Result<(), ActuatorError> {
        self.probe.0.start_calls.fetch_add(1, Ordering::SeqCst);
        self.take_injected_fault()?;
        self.probe.0.running.store(true, Ordering::SeqCst);
        self.probe.0.duty.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.probe.0.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.take_injected_fault()?;
        self.probe.0.running.store(false, Ordering::SeqCst);
        self.probe.0.duty.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn set_duty_cycle(&mut self, duty: u8) -> Result<(), ActuatorError> {
        self.probe.0.duty_calls.fetch_add(1, Ordering::SeqCst);
        self.take_injected_fault()?;
        if !self.probe.0.running.load(Ordering::SeqCst) {
            return Err(ActuatorError::NotRunning);
        }
        if duty > self.duty_limit {
            return Err(ActuatorError::DutyCycleOutOfRange {
                requested: duty,
                limit: self.duty_limit,
            });
        }
        self.probe.0.duty.store(duty, Ordering::SeqCst);
        Ok(())
    }
}
