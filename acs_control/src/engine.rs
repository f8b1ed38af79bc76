//! The live ACS aggregate and FSM engine.
//!
//! [`Acs`] holds the state vector, the live command/status buffers, the
//! sticky fault flags, both actuator handles and both dispatch tables. It is
//! created once at boot, owned exclusively by the control thread, and is the
//! sole writer of the current state.
//!
//! Transitions are atomic: a hook failure at any point leaves
//! `current_state` exactly as it was, and a rejected transition never runs
//! the entry hook. An unlicensed function never runs at all.

use acs_common::actuator::{ActuatorDriver, ActuatorError};
use acs_common::fault::FaultFlags;
use acs_common::frame::{CMD_PARAM, FRAME_LEN, RawFrame, Status};
use acs_common::state::{AcsState, FunctionId};
use thiserror::Error;

use crate::table::{FunctionTable, TableError, TransitionTable};

/// Why a requested transition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The `(from, to)` edge is absent from the transition table.
    #[error("no licensed transition {from:?} -> {to:?}")]
    NotLicensed { from: AcsState, to: AcsState },

    /// The exit hook of the current state failed; entry hook never ran.
    #[error("exit hook failed leaving {from:?}: {source}")]
    ExitHook { from: AcsState, source: ActuatorError },

    /// The entry hook of the target state failed.
    #[error("entry hook failed entering {to:?}: {source}")]
    EntryHook { to: AcsState, source: ActuatorError },
}

/// Result of [`Acs::request_transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Transition applied; `current_state` is the requested state.
    Applied,
    /// Transition rejected; `current_state` untouched.
    Rejected(TransitionError),
}

/// Why a requested function call was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// No rule licenses this function in the current state. The handler
    /// was never invoked.
    #[error("function {function:?} not licensed in state {state:?}")]
    NotLicensed {
        state: AcsState,
        function: FunctionId,
    },

    /// The licensed handler ran and reported failure.
    #[error("function handler failed: {0}")]
    Handler(ActuatorError),
}

/// Result of [`Acs::invoke_function`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionOutcome {
    /// Handler ran and reported success.
    Completed,
    /// Call rejected, or handler ran and failed.
    Rejected(FunctionError),
}

/// Last / current / next state vector.
///
/// `last` is diagnostic only — the state before the most recent applied
/// transition. `next` is transient: set while a transition request is in
/// flight, cleared once applied or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateVector {
    pub last: Option<AcsState>,
    pub current: AcsState,
    pub next: Option<AcsState>,
}

impl Default for StateVector {
    fn default() -> Self {
        Self {
            last: None,
            current: AcsState::Idle,
            next: None,
        }
    }
}

/// The ACS aggregate root.
pub struct Acs {
    state: StateVector,
    pending_function: Option<FunctionId>,
    command_buf: RawFrame,
    status_buf: RawFrame,
    status: Status,
    faults: FaultFlags,
    wheel: Box<dyn ActuatorDriver>,
    torquer: Box<dyn ActuatorDriver>,
    transitions: TransitionTable,
    functions: FunctionTable,
}

impl Acs {
    /// Boot-time init: flight tables, state forced to `Idle`.
    ///
    /// The only fatal error path in the subsystem — a defective table must
    /// never reach the command loop.
    pub fn new(
        wheel: Box<dyn ActuatorDriver>,
        torquer: Box<dyn ActuatorDriver>,
    ) -> Result<Self, TableError> {
        Ok(Self::with_tables(
            wheel,
            torquer,
            TransitionTable::flight()?,
            FunctionTable::flight()?,
        ))
    }

    /// Construct with explicit tables (test seam; also used by `new`).
    pub fn with_tables(
        wheel: Box<dyn ActuatorDriver>,
        torquer: Box<dyn ActuatorDriver>,
        transitions: TransitionTable,
        functions: FunctionTable,
    ) -> Self {
        Self {
            state: StateVector::default(),
            pending_function: None,
            command_buf: [0; FRAME_LEN],
            status_buf: Status::default().encode(),
            status: Status::default(),
            faults: FaultFlags::empty(),
            wheel,
            torquer,
            transitions,
            functions,
        }
    }

    // ── Observers ───────────────────────────────────────────────────

    #[inline]
    pub fn current_state(&self) -> AcsState {
        self.state.current
    }

    #[inline]
    pub fn last_state(&self) -> Option<AcsState> {
        self.state.last
    }

    #[inline]
    pub fn state_vector(&self) -> StateVector {
        self.state
    }

    #[inline]
    pub fn pending_function(&self) -> Option<FunctionId> {
        self.pending_function
    }

    #[inline]
    pub fn faults(&self) -> FaultFlags {
        self.faults
    }

    /// Persistent typed status, as last published.
    #[inline]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Live command buffer (the frame currently being dispatched).
    #[inline]
    pub fn live_command(&self) -> &RawFrame {
        &self.command_buf
    }

    /// Live status buffer (the frame last handed to the bus).
    #[inline]
    pub fn live_status(&self) -> &RawFrame {
        &self.status_buf
    }

    // ── Engine operations ───────────────────────────────────────────

    /// Apply the transition table to a state-change request.
    ///
    /// The state is only ever mutated on the `Applied` path; every
    /// rejection leaves it untouched.
    pub fn request_transition(&mut self, to: AcsState) -> TransitionOutcome {
        self.state.next = Some(to);
        let outcome = self.apply_transition(to);
        self.state.next = None;

        match &outcome {
            TransitionOutcome::Applied => {}
            TransitionOutcome::Rejected(TransitionError::NotLicensed { .. }) => {
                self.faults.insert(FaultFlags::INVALID_TRANSITION);
            }
            TransitionOutcome::Rejected(_) => {
                self.faults.insert(FaultFlags::TRANSITION_HOOK_FAULT);
            }
        }
        outcome
    }

    fn apply_transition(&mut self, to: AcsState) -> TransitionOutcome {
        let from = self.state.current;
        let Some(rule) = self.transitions.lookup(from, to) else {
            return TransitionOutcome::Rejected(TransitionError::NotLicensed { from, to });
        };

        if let Some(hook) = rule.exit
            && let Err(source) = hook.apply(self)
        {
            return TransitionOutcome::Rejected(TransitionError::ExitHook { from, source });
        }
        if let Some(hook) = rule.entry
            && let Err(source) = hook.apply(self)
        {
            return TransitionOutcome::Rejected(TransitionError::EntryHook { to, source });
        }

        self.state.last = Some(from);
        self.state.current = to;
        TransitionOutcome::Applied
    }

    /// Apply the function table to a function-call request.
    ///
    /// The core safety guarantee lives here: if no rule licenses
    /// `(current_state, function)`, the handler is never invoked.
    pub fn invoke_function(&mut self, function: FunctionId) -> FunctionOutcome {
        self.pending_function = Some(function);
        let state = self.state.current;

        let Some(rule) = self.functions.lookup(state, function) else {
            self.faults.insert(FaultFlags::FUNCTION_NOT_LICENSED);
            return FunctionOutcome::Rejected(FunctionError::NotLicensed { state, function });
        };

        match rule.hook.apply(self) {
            Ok(()) => FunctionOutcome::Completed,
            Err(e) => {
                self.faults.insert(FaultFlags::FUNCTION_HOOK_FAULT);
                FunctionOutcome::Rejected(FunctionError::Handler(e))
            }
        }
    }

    /// Hard reset: force `Idle`, clear the state vector, pending fields and
    /// fault flags. Runs no entry/exit hooks — this is a re-init, not a
    /// transition. The ping counter survives so the bus master keeps an
    /// unbroken liveness sequence.
    pub fn reset(&mut self) {
        let ping = self.status.ping_counter;
        self.state = StateVector::default();
        self.pending_function = None;
        self.command_buf = [0; FRAME_LEN];
        self.faults = FaultFlags::empty();
        self.status = Status {
            ping_counter: ping,
            ..Status::default()
        };
        self.status_buf = self.status.encode();
    }

    // ── Crate-internal access for the dispatcher and hooks ──────────

    pub(crate) fn load_command(&mut self, raw: &RawFrame) {
        self.command_buf = *raw;
    }

    /// Handler-scoped parameter byte of the live command frame.
    pub(crate) fn command_parameter(&self) -> u8 {
        self.command_buf[CMD_PARAM]
    }

    pub(crate) fn record_fault(&mut self, flag: FaultFlags) {
        self.faults.insert(flag);
    }

    pub(crate) fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    pub(crate) fn store_status(&mut self, raw: RawFrame) {
        self.status_buf = raw;
    }

    pub(crate) fn wheel_mut(&mut self) -> &mut dyn ActuatorDriver {
        self.wheel.as_mut()
    }

    pub(crate) fn torquer_mut(&mut self) -> &mut dyn ActuatorDriver {
        self.torquer.as_mut()
    }
}
