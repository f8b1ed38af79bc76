//! Command/status dispatcher: decode → lookup → invoke → encode.
//!
//! The only entry point driven by the bus. Every inbound frame — valid,
//! rejected or malformed — produces exactly one status frame; the bus
//! master never waits on a command that went unanswered. All command-path
//! errors are recovered here and surfaced through the status buffer; nothing
//! on this path can halt the control thread.
//!
//! Status fields persist across dispatches: a command only overwrites the
//! fields that report on it, so the bus master sees the last verdict of each
//! kind until a newer command of that kind arrives.

use acs_common::fault::FaultFlags;
use acs_common::frame::{CMD_ARG, CMD_KIND, RawFrame};
use acs_common::state::{
    AcsState, CommandKind, FunctionId, FunctionStatus, TransitionStatus,
};
use tracing::{debug, info, warn};

use crate::engine::{Acs, FunctionError, FunctionOutcome, TransitionError, TransitionOutcome};

/// Run one full dispatch cycle for an inbound command frame.
pub fn dispatch(acs: &mut Acs, raw: &RawFrame) -> RawFrame {
    acs.load_command(raw);

    match CommandKind::from_u8(raw[CMD_KIND]) {
        Some(CommandKind::NoOp) => {
            debug!("noop heartbeat");
        }
        Some(CommandKind::ChangeState) => handle_change_state(acs, raw[CMD_ARG]),
        Some(CommandKind::CallFunction) => handle_call_function(acs, raw[CMD_ARG]),
        None => {
            // Not silently ignored: no-effect for state purposes, but the
            // verdict slot and the fault register both record it.
            warn!(kind = raw[CMD_KIND], "malformed command frame");
            acs.record_fault(FaultFlags::MALFORMED_COMMAND);
            acs.status_mut().transition_status = TransitionStatus::Malformed;
        }
    }

    publish_status(acs)
}

fn handle_change_state(acs: &mut Acs, target: u8) {
    let Some(to) = AcsState::from_u8(target) else {
        // Includes the NoOp placeholder 0: no edge can target a non-state.
        warn!(target, "change-state target is not a resting state");
        acs.record_fault(FaultFlags::INVALID_TRANSITION);
        acs.status_mut().transition_status = TransitionStatus::Rejected;
        return;
    };

    let verdict = match acs.request_transition(to) {
        TransitionOutcome::Applied => {
            info!(from = ?acs.last_state(), to = ?to, "transition applied");
            TransitionStatus::Applied
        }
        TransitionOutcome::Rejected(TransitionError::NotLicensed { from, to }) => {
            warn!(?from, ?to, "transition not licensed");
            TransitionStatus::Rejected
        }
        TransitionOutcome::Rejected(ref e) => {
            warn!(error = %e, "transition hook failed");
            TransitionStatus::HandlerFault
        }
    };
    acs.status_mut().transition_status = verdict;
}

fn handle_call_function(acs: &mut Acs, code: u8) {
    // The raw requested code is reported even when it decodes to nothing.
    acs.status_mut().last_function_called = code;

    let Some(function) = FunctionId::from_u8(code) else {
        warn!(code, "unknown function code");
        acs.record_fault(FaultFlags::FUNCTION_NOT_LICENSED);
        acs.status_mut().function_status = FunctionStatus::NotLicensed;
        return;
    };

    let verdict = match acs.invoke_function(function) {
        FunctionOutcome::Completed => {
            debug!(?function, "function completed");
            FunctionStatus::Completed
        }
        FunctionOutcome::Rejected(FunctionError::NotLicensed { state, function }) => {
            warn!(?state, ?function, "function not licensed in current state");
            FunctionStatus::NotLicensed
        }
        FunctionOutcome::Rejected(FunctionError::Handler(ref e)) => {
            warn!(?function, error = %e, "function handler failed");
            FunctionStatus::HandlerFault
        }
    };
    acs.status_mut().function_status = verdict;
}

/// Refresh the state fields, bump the ping counter and hand the encoded
/// frame back — the one status every dispatch must produce.
fn publish_status(acs: &mut Acs) -> RawFrame {
    let current = acs.current_state();
    let previous = acs.last_state();

    let status = acs.status_mut();
    status.current_state = current;
    status.previous_state = previous;
    status.ping_counter = status.ping_counter.wrapping_add(1);

    let raw = status.encode();
    acs.store_status(raw);
    raw
}
