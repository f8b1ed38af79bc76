//! State, function and command enumerations for the ACS.
//!
//! All enums use `#[repr(u8)]` so the discriminants double as the wire codes
//! carried in command/status frames. Conversions from raw bytes go through
//! `from_u8` and return `None` for anything outside the closed set — there
//! are no sentinel values and no catch-all variants.

use serde::{Deserialize, Serialize};

/// Wire code used where "no state" is reported (boot-time `previous_state`)
/// or requested (a `ChangeState` argument that targets nothing).
///
/// This is a frame placeholder only, never a resting state.
pub const STATE_NONE: u8 = 0;

/// Resting states of the attitude-control subsystem.
///
/// Exactly one state is current at any time; only the FSM engine mutates it.
/// Discriminant 0 is reserved for [`STATE_NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AcsState {
    /// Low-power, no actuator engaged.
    Idle = 1,
    /// Reaction wheel engaged.
    ReactionWheelActive = 2,
    /// Magnetorquer rod engaged.
    MagnetorquerActive = 3,
    /// Reserved high-draw mode.
    MaxPower = 4,
}

impl AcsState {
    /// Convert from raw `u8`. Returns `None` for invalid values,
    /// including the [`STATE_NONE`] placeholder.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Idle),
            2 => Some(Self::ReactionWheelActive),
            3 => Some(Self::MagnetorquerActive),
            4 => Some(Self::MaxPower),
            _ => None,
        }
    }

    /// Wire code for an optional state; `None` encodes as [`STATE_NONE`].
    #[inline]
    pub const fn encode_opt(state: Option<Self>) -> u8 {
        match state {
            Some(s) => s as u8,
            None => STATE_NONE,
        }
    }
}

impl Default for AcsState {
    fn default() -> Self {
        Self::Idle
    }
}

/// State-scoped actuator functions.
///
/// A function is only invocable while the ACS is in a state the function
/// table licenses it for. Discriminant 0 is reserved ("no function called").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FunctionId {
    /// Spin the reaction wheel up.
    WheelStart = 1,
    /// Spin the reaction wheel down.
    WheelStop = 2,
    /// Set the reaction wheel duty cycle from the frame parameter byte.
    WheelSetDutyCycle = 3,
    /// Set the magnetorquer duty cycle from the frame parameter byte.
    TorquerSetDutyCycle = 4,
}

impl FunctionId {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::WheelStart),
            2 => Some(Self::WheelStop),
            3 => Some(Self::WheelSetDutyCycle),
            4 => Some(Self::TorquerSetDutyCycle),
            _ => None,
        }
    }
}

/// Command kinds accepted off the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommandKind {
    /// Liveness heartbeat; touches nothing but the ping counter.
    NoOp = 0,
    /// Request a state transition; argument is the target state code.
    ChangeState = 1,
    /// Invoke a state-scoped function; argument is the function code.
    CallFunction = 2,
}

impl CommandKind {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NoOp),
            1 => Some(Self::ChangeState),
            2 => Some(Self::CallFunction),
            _ => None,
        }
    }
}

/// Verdict of the most recent `ChangeState` command (status byte 2).
///
/// This slot doubles as the overall command verdict: `Malformed` is
/// reported here when the command kind byte itself is unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransitionStatus {
    /// No transition has been commanded since reset.
    None = 0,
    /// Transition applied; `current_state` reflects the new state.
    Applied = 1,
    /// No such edge in the transition table; state untouched.
    Rejected = 2,
    /// An entry/exit hook failed; state untouched.
    HandlerFault = 3,
    /// Unrecognized command kind byte; treated as a no-effect NoOp.
    Malformed = 4,
}

impl TransitionStatus {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Applied),
            2 => Some(Self::Rejected),
            3 => Some(Self::HandlerFault),
            4 => Some(Self::Malformed),
            _ => None,
        }
    }
}

impl Default for TransitionStatus {
    fn default() -> Self {
        Self::None
    }
}

/// Verdict of the most recent `CallFunction` command (status byte 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FunctionStatus {
    /// No function has been called since reset.
    None = 0,
    /// Handler ran and reported success.
    Completed = 1,
    /// Function not licensed in the current state; handler never ran.
    NotLicensed = 2,
    /// Handler ran and reported failure.
    HandlerFault = 3,
}

impl FunctionStatus {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Completed),
            2 => Some(Self::NotLicensed),
            3 => Some(Self::HandlerFault),
            _ => None,
        }
    }
}

impl Default for FunctionStatus {
    fn default() -> Self {
        Self::None
    }
}
