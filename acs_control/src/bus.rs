//! Bus transport seam.
//!
//! The physical field-bus stack (PDO mapping, framing, timing) is an
//! external collaborator; the control thread only needs something that
//! hands over inbound command frames and accepts outbound status frames.
//! [`ChannelBus`] is the in-process implementation backing the exerciser
//! mode and the integration tests, with a [`BusMaster`] far end standing in
//! for the spacecraft bus master.

use acs_common::frame::RawFrame;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use thiserror::Error;

/// Bus transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// No frame arrived within the poll interval; the caller should
    /// re-check its shutdown flag and try again.
    #[error("no frame within the poll interval")]
    TimedOut,

    /// The far end is gone; no further frames will move.
    #[error("bus transport disconnected")]
    Disconnected,
}

/// Transport contract consumed by the control thread.
///
/// `receive_command` suspends the caller until a frame is available, up to
/// the transport's poll interval. Frame size is fixed and shared by the
/// command and status layouts.
pub trait BusTransport: Send {
    fn receive_command(&mut self) -> Result<RawFrame, BusError>;
    fn send_status(&mut self, status: RawFrame) -> Result<(), BusError>;
}

/// In-process channel-backed transport (subsystem side).
pub struct ChannelBus {
    commands: Receiver<RawFrame>,
    statuses: Sender<RawFrame>,
    poll: Duration,
}

/// Far end of a [`ChannelBus`]: issues commands, consumes statuses.
pub struct BusMaster {
    commands: Sender<RawFrame>,
    statuses: Receiver<RawFrame>,
}

/// Build a connected transport/master pair.
pub fn channel_pair(poll: Duration) -> (ChannelBus, BusMaster) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (status_tx, status_rx) = mpsc::channel();
    (
        ChannelBus {
            commands: cmd_rx,
            statuses: status_tx,
            poll,
        },
        BusMaster {
            commands: cmd_tx,
            statuses: status_rx,
        },
    )
}

impl BusTransport for ChannelBus {
    fn receive_command(&mut self) -> Result<RawFrame, BusError> {
        match self.commands.recv_timeout(self.poll) {
            Ok(frame) => Ok(frame),
            Err(RecvTimeoutError::Timeout) => Err(BusError::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(BusError::Disconnected),
        }
    }

    fn send_status(&mut self, status: RawFrame) -> Result<(), BusError> {
        self.statuses.send(status).map_err(|_| BusError::Disconnected)
    }
}

impl BusMaster {
    pub fn send_command(&self, command: RawFrame) -> Result<(), BusError> {
        self.commands.send(command).map_err(|_| BusError::Disconnected)
    }

    pub fn recv_status(&self, timeout: Duration) -> Result<RawFrame, BusError> {
        match self.statuses.recv_timeout(timeout) {
            Ok(frame) => Ok(frame),
            Err(RecvTimeoutError::Timeout) => Err(BusError::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(BusError::Disconnected),
        }
    }

    /// Send one command and wait for the one status it must produce.
    pub fn transact(&self, command: RawFrame, timeout: Duration) -> Result<RawFrame, BusError> {
        self.send_command(command)?;
        self.recv_status(timeout)
    }
}
