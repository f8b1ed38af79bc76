//! The control thread: the single execution context owning the ACS.
//!
//! Non-reentrant by construction — one command is processed to completion
//! (decode → lookup → hook → encode) before the next is pulled, so commands
//! never interleave and the ACS needs no internal locking. There is no
//! cancellation of an in-flight dispatch and no intrinsic timeout: a hook
//! that blocks stalls further command processing, which is the documented
//! contract for hooks, not something this loop papers over.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::bus::{BusError, BusTransport};
use crate::dispatch::dispatch;
use crate::engine::Acs;

/// Command-loop wrapper around one [`Acs`] and one transport.
pub struct ControlThread<B: BusTransport> {
    acs: Acs,
    bus: B,
    running: Arc<AtomicBool>,
}

impl<B: BusTransport> ControlThread<B> {
    pub fn new(acs: Acs, bus: B) -> Self {
        Self {
            acs,
            bus,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared shutdown flag, for signal-handler wiring.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn acs(&self) -> &Acs {
        &self.acs
    }

    /// Recover the ACS after the loop has ended (it stays in its last
    /// valid state; shutdown performs no implicit safe-state transition).
    pub fn into_acs(self) -> Acs {
        self.acs
    }

    /// Pull commands until shutdown or transport disconnect.
    ///
    /// Every received frame is dispatched and answered before the next is
    /// considered; timed-out receives only re-check the shutdown flag.
    pub fn run(&mut self) {
        info!(state = ?self.acs.current_state(), "control thread entering command loop");

        while self.running.load(Ordering::SeqCst) {
            match self.bus.receive_command() {
                Ok(frame) => {
                    let status = dispatch(&mut self.acs, &frame);
                    if let Err(e) = self.bus.send_status(status) {
                        warn!(error = %e, "status send failed; stopping");
                        break;
                    }
                }
                Err(BusError::TimedOut) => continue,
                Err(BusError::Disconnected) => {
                    info!("bus transport disconnected");
                    break;
                }
            }
        }

        info!(
            state = ?self.acs.current_state(),
            "control thread stopped; ACS left in last valid state"
        );
    }
}
