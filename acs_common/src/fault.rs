//! Sticky diagnostic fault flags.
//!
//! Every rejected command leaves a flag here so ground can tell *what kind*
//! of garbage the subsystem has been fed since the last reset, even when the
//! per-command status byte has since been overwritten. Cleared only by a
//! hard reset.

use bitflags::bitflags;

bitflags! {
    /// Sticky record of rejected commands since the last reset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaultFlags: u8 {
        /// A `ChangeState` named an edge absent from the transition table.
        const INVALID_TRANSITION     = 0x01;
        /// An entry/exit hook reported failure; the transition was aborted.
        const TRANSITION_HOOK_FAULT  = 0x02;
        /// A `CallFunction` named a function not licensed in the state.
        const FUNCTION_NOT_LICENSED  = 0x04;
        /// A licensed function handler reported failure.
        const FUNCTION_HOOK_FAULT    = 0x08;
        /// A frame arrived with an unrecognized command kind byte.
        const MALFORMED_COMMAND      = 0x10;
    }
}

impl Default for FaultFlags {
    fn default() -> Self {
        Self::empty()
    }
}
