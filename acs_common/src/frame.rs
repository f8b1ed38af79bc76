//! Command/status frame layout and codec.
//!
//! Command and status share one fixed 8-byte frame at the bus boundary.
//! The byte offsets below are the wire contract with the bus master; the
//! typed [`Command`] and [`Status`] structs exist only on this side of it.
//!
//! Command layout: `[0]=kind, [1]=argument, [2]=parameter, [3..8)=reserved`.
//! Byte 2 carries the handler-scoped parameter (e.g. the duty cycle for a
//! `WheelSetDutyCycle` call); handlers read it out of the live command
//! buffer held by the ACS aggregate.
//!
//! Status layout: `[0]=current_state, [1]=previous_state,
//! [2]=transition_status, [3]=last_function_called, [4]=function_status,
//! [5..7)=reserved, [7]=ping_counter`.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;
use thiserror::Error;

use crate::state::{AcsState, CommandKind, FunctionStatus, TransitionStatus};

/// Fixed frame size shared by command and status layouts.
pub const FRAME_LEN: usize = 8;

/// Raw frame as delivered by / handed to the bus transport.
pub type RawFrame = [u8; FRAME_LEN];

// Command frame offsets.
pub const CMD_KIND: usize = 0;
pub const CMD_ARG: usize = 1;
pub const CMD_PARAM: usize = 2;

// Status frame offsets.
pub const STATUS_STATE: usize = 0;
pub const STATUS_PREV_STATE: usize = 1;
pub const STATUS_TRANSITION: usize = 2;
pub const STATUS_FN_CALLED: usize = 3;
pub const STATUS_FN_STATUS: usize = 4;
pub const STATUS_PING: usize = 7;

const_assert!(CMD_PARAM < FRAME_LEN);
const_assert!(STATUS_FN_STATUS < STATUS_PING);
const_assert!(STATUS_PING == FRAME_LEN - 1);

/// Frame decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Command kind byte outside the closed command set.
    #[error("unrecognized command kind byte 0x{0:02X}")]
    UnknownKind(u8),
    /// A status field byte outside its closed enumeration.
    #[error("invalid status field at byte {offset}: 0x{value:02X}")]
    InvalidStatusField { offset: usize, value: u8 },
}

/// Typed view of an inbound command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    /// Target state code or function code, depending on `kind`.
    pub argument: u8,
    /// Handler-scoped parameter byte.
    pub parameter: u8,
}

impl Command {
    /// Decode a raw frame. Unrecognized kind bytes are an error here;
    /// the dispatcher maps that error to a malformed-command status
    /// rather than dropping the frame.
    pub fn decode(raw: &RawFrame) -> Result<Self, FrameError> {
        let kind =
            CommandKind::from_u8(raw[CMD_KIND]).ok_or(FrameError::UnknownKind(raw[CMD_KIND]))?;
        Ok(Self {
            kind,
            argument: raw[CMD_ARG],
            parameter: raw[CMD_PARAM],
        })
    }

    /// Encode into a raw frame (reserved bytes zeroed). Used by bus-master
    /// test harnesses and the exerciser; flight commands arrive pre-encoded.
    pub fn encode(&self) -> RawFrame {
        let mut raw = [0u8; FRAME_LEN];
        raw[CMD_KIND] = self.kind as u8;
        raw[CMD_ARG] = self.argument;
        raw[CMD_PARAM] = self.parameter;
        raw
    }
}

/// Typed view of the outbound status frame.
///
/// The ACS aggregate keeps one `Status` alive for its whole lifetime and
/// mutates only the fields the current dispatch touches, so fields persist
/// across dispatches exactly as the bus master observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub current_state: AcsState,
    /// State before the most recent applied transition; `None` until the
    /// first transition after boot or reset.
    pub previous_state: Option<AcsState>,
    pub transition_status: TransitionStatus,
    /// Raw code of the most recently requested function (0 = none yet).
    pub last_function_called: u8,
    pub function_status: FunctionStatus,
    /// Wrapping liveness counter, bumped once per dispatch.
    pub ping_counter: u8,
}

impl Status {
    /// Encode into a raw frame (reserved bytes zeroed).
    pub fn encode(&self) -> RawFrame {
        let mut raw = [0u8; FRAME_LEN];
        raw[STATUS_STATE] = self.current_state as u8;
        raw[STATUS_PREV_STATE] = AcsState::encode_opt(self.previous_state);
        raw[STATUS_TRANSITION] = self.transition_status as u8;
        raw[STATUS_FN_CALLED] = self.last_function_called;
        raw[STATUS_FN_STATUS] = self.function_status as u8;
        raw[STATUS_PING] = self.ping_counter;
        raw
    }

    /// Decode a raw status frame back into the typed form.
    pub fn decode(raw: &RawFrame) -> Result<Self, FrameError> {
        let current_state =
            AcsState::from_u8(raw[STATUS_STATE]).ok_or(FrameError::InvalidStatusField {
                offset: STATUS_STATE,
                value: raw[STATUS_STATE],
            })?;
        let previous_state = match raw[STATUS_PREV_STATE] {
            crate::state::STATE_NONE => None,
            v => Some(AcsState::from_u8(v).ok_or(FrameError::InvalidStatusField {
                offset: STATUS_PREV_STATE,
                value: v,
            })?),
        };
        let transition_status = TransitionStatus::from_u8(raw[STATUS_TRANSITION]).ok_or(
            FrameError::InvalidStatusField {
                offset: STATUS_TRANSITION,
                value: raw[STATUS_TRANSITION],
            },
        )?;
        let function_status = FunctionStatus::from_u8(raw[STATUS_FN_STATUS]).ok_or(
            FrameError::InvalidStatusField {
                offset: STATUS_FN_STATUS,
                value: raw[STATUS_FN_STATUS],
            },
        )?;
        Ok(Self {
            current_state,
            previous_state,
            transition_status,
            last_function_called: raw[STATUS_FN_CALLED],
            function_status,
            ping_counter: raw[STATUS_PING],
        })
    }
}
