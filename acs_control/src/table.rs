//! Static transition and function tables.
//!
//! The tables are the declarative safety policy of the subsystem: an edge or
//! function absent from them is illegal, full stop. Both are built once at
//! init into bounded storage and never mutated afterwards; duplicate keys are
//! a construction error, caught before the control thread starts.
//!
//! Hooks are tagged variants rather than raw function pointers — each variant
//! names one actuator action and is applied to the live ACS aggregate through
//! [`TransitionHook::apply`] / [`FunctionHook::apply`].

use acs_common::actuator::ActuatorError;
use acs_common::state::{AcsState, FunctionId};
use thiserror::Error;

use crate::engine::Acs;

/// Capacity of the transition rule storage.
pub const MAX_TRANSITION_RULES: usize = 16;
/// Capacity of the function rule storage.
pub const MAX_FUNCTION_RULES: usize = 16;

/// Table construction error. Fatal at init time by design — a defective
/// table must never reach the command loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate transition rule {from:?} -> {to:?}")]
    DuplicateTransition { from: AcsState, to: AcsState },
    #[error("duplicate function rule ({state:?}, {function:?})")]
    DuplicateFunction {
        state: AcsState,
        function: FunctionId,
    },
    #[error("table capacity exceeded")]
    Capacity,
}

/// Actuator action run while entering or leaving a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionHook {
    /// Power the reaction wheel controller up.
    WheelPowerOn,
    /// Spin down and power the reaction wheel controller off.
    WheelPowerOff,
    /// Energize the magnetorquer rod driver.
    TorquerEnergize,
    /// De-energize the magnetorquer rod driver.
    TorquerRelease,
}

impl TransitionHook {
    pub(crate) fn apply(self, acs: &mut Acs) -> Result<(), ActuatorError> {
        match self {
            Self::WheelPowerOn => acs.wheel_mut().start(),
            Self::WheelPowerOff => acs.wheel_mut().stop(),
            Self::TorquerEnergize => acs.torquer_mut().start(),
            Self::TorquerRelease => acs.torquer_mut().stop(),
        }
    }
}

/// Actuator action run by a licensed `CallFunction` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionHook {
    WheelStart,
    WheelStop,
    /// Duty cycle taken from the live command frame's parameter byte.
    WheelSetDutyCycle,
    /// Duty cycle taken from the live command frame's parameter byte.
    TorquerSetDutyCycle,
}

impl FunctionHook {
    pub(crate) fn apply(self, acs: &mut Acs) -> Result<(), ActuatorError> {
        match self {
            Self::WheelStart => acs.wheel_mut().start(),
            Self::WheelStop => acs.wheel_mut().stop(),
            Self::WheelSetDutyCycle => {
                let duty = acs.command_parameter();
                acs.wheel_mut().set_duty_cycle(duty)
            }
            Self::TorquerSetDutyCycle => {
                let duty = acs.command_parameter();
                acs.torquer_mut().set_duty_cycle(duty)
            }
        }
    }
}

/// One licensed state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: AcsState,
    pub to: AcsState,
    pub entry: Option<TransitionHook>,
    pub exit: Option<TransitionHook>,
}

/// Directed graph of licensed transitions over [`AcsState`].
///
/// Self-edges are legal only when explicitly listed; the flight table lists
/// none, so `from == to` is rejected like any other missing edge.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    rules: heapless::Vec<TransitionRule, MAX_TRANSITION_RULES>,
}

impl TransitionTable {
    /// Empty table; combine with [`TransitionTable::insert`] in tests.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert a rule, rejecting duplicate `(from, to)` keys.
    pub fn insert(&mut self, rule: TransitionRule) -> Result<(), TableError> {
        if self
            .rules
            .iter()
            .any(|r| r.from == rule.from && r.to == rule.to)
        {
            return Err(TableError::DuplicateTransition {
                from: rule.from,
                to: rule.to,
            });
        }
        self.rules.push(rule).map_err(|_| TableError::Capacity)
    }

    /// Look up the rule licensing `from -> to`, if any.
    #[inline]
    pub fn lookup(&self, from: AcsState, to: AcsState) -> Option<TransitionRule> {
        self.rules
            .iter()
            .copied()
            .find(|r| r.from == from && r.to == to)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The flight edge set.
    ///
    /// Each actuator mode is entered from and left to `Idle`; there is no
    /// direct edge between actuator modes, so a mode swap always passes
    /// through the low-power state. `MaxPower` is reserved and carries no
    /// hooks yet.
    pub fn flight() -> Result<Self, TableError> {
        use AcsState::*;
        use TransitionHook::*;

        let mut table = Self::empty();
        for rule in [
            TransitionRule {
                from: Idle,
                to: ReactionWheelActive,
                entry: Some(WheelPowerOn),
                exit: None,
            },
            TransitionRule {
                from: ReactionWheelActive,
                to: Idle,
                entry: None,
                exit: Some(WheelPowerOff),
            },
            TransitionRule {
                from: Idle,
                to: MagnetorquerActive,
                entry: Some(TorquerEnergize),
                exit: None,
            },
            TransitionRule {
                from: MagnetorquerActive,
                to: Idle,
                entry: None,
                exit: Some(TorquerRelease),
            },
            TransitionRule {
                from: Idle,
                to: MaxPower,
                entry: None,
                exit: None,
            },
            TransitionRule {
                from: MaxPower,
                to: Idle,
                entry: None,
                exit: None,
            },
        ] {
            table.insert(rule)?;
        }
        Ok(table)
    }
}

/// One licensed `(state, function)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionRule {
    pub state: AcsState,
    pub function: FunctionId,
    pub hook: FunctionHook,
}

/// Licensing table for state-scoped functions.
///
/// The same `FunctionId` may appear under several states with different
/// hooks (context-dependent dispatch); the key is the `(state, function)`
/// pair.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    rules: heapless::Vec<FunctionRule, MAX_FUNCTION_RULES>,
}

impl FunctionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert a rule, rejecting duplicate `(state, function)` keys.
    pub fn insert(&mut self, rule: FunctionRule) -> Result<(), TableError> {
        if self
            .rules
            .iter()
            .any(|r| r.state == rule.state && r.function == rule.function)
        {
            return Err(TableError::DuplicateFunction {
                state: rule.state,
                function: rule.function,
            });
        }
        self.rules.push(rule).map_err(|_| TableError::Capacity)
    }

    /// Look up the rule licensing `function` while in `state`, if any.
    #[inline]
    pub fn lookup(&self, state: AcsState, function: FunctionId) -> Option<FunctionRule> {
        self.rules
            .iter()
            .copied()
            .find(|r| r.state == state && r.function == function)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The flight rule set: wheel functions only under
    /// `ReactionWheelActive`, torquer functions only under
    /// `MagnetorquerActive`.
    pub fn flight() -> Result<Self, TableError> {
        use AcsState::*;

        let mut table = Self::empty();
        for rule in [
            FunctionRule {
                state: ReactionWheelActive,
                function: FunctionId::WheelStart,
                hook: FunctionHook::WheelStart,
            },
            FunctionRule {
                state: ReactionWheelActive,
                function: FunctionId::WheelStop,
                hook: FunctionHook::WheelStop,
            },
            FunctionRule {
                state: ReactionWheelActive,
                function: FunctionId::WheelSetDutyCycle,
                hook: FunctionHook::WheelSetDutyCycle,
            },
            FunctionRule {
                state: MagnetorquerActive,
                function: FunctionId::TorquerSetDutyCycle,
                hook: FunctionHook::TorquerSetDutyCycle,
            },
        ] {
            table.insert(rule)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AcsState::*;

    #[test]
    fn flight_transition_table_builds() {
        let table = TransitionTable::flight().unwrap();
        assert_eq!(table.len(), 6);
        assert!(table.lookup(Idle, ReactionWheelActive).is_some());
        assert!(table.lookup(ReactionWheelActive, Idle).is_some());
        assert!(table.lookup(Idle, MagnetorquerActive).is_some());
        assert!(table.lookup(MagnetorquerActive, Idle).is_some());
        assert!(table.lookup(Idle, MaxPower).is_some());
        assert!(table.lookup(MaxPower, Idle).is_some());
    }

    #[test]
    fn flight_table_has_no_actuator_mode_cross_edges() {
        let table = TransitionTable::flight().unwrap();
        assert!(table.lookup(ReactionWheelActive, MagnetorquerActive).is_none());
        assert!(table.lookup(MagnetorquerActive, ReactionWheelActive).is_none());
        assert!(table.lookup(ReactionWheelActive, MaxPower).is_none());
        assert!(table.lookup(MaxPower, ReactionWheelActive).is_none());
    }

    #[test]
    fn flight_table_has_no_self_edges() {
        let table = TransitionTable::flight().unwrap();
        for s in [Idle, ReactionWheelActive, MagnetorquerActive, MaxPower] {
            assert!(table.lookup(s, s).is_none(), "self-edge listed for {s:?}");
        }
    }

    #[test]
    fn duplicate_transition_rejected() {
        let mut table = TransitionTable::flight().unwrap();
        let err = table
            .insert(TransitionRule {
                from: Idle,
                to: MaxPower,
                entry: None,
                exit: None,
            })
            .unwrap_err();
        assert_eq!(
            err,
            TableError::DuplicateTransition {
                from: Idle,
                to: MaxPower
            }
        );
    }

    #[test]
    fn flight_function_table_builds() {
        let table = FunctionTable::flight().unwrap();
        assert_eq!(table.len(), 4);
        assert!(
            table
                .lookup(ReactionWheelActive, FunctionId::WheelSetDutyCycle)
                .is_some()
        );
        assert!(
            table
                .lookup(MagnetorquerActive, FunctionId::TorquerSetDutyCycle)
                .is_some()
        );
    }

    #[test]
    fn wheel_functions_not_licensed_elsewhere() {
        let table = FunctionTable::flight().unwrap();
        for state in [Idle, MagnetorquerActive, MaxPower] {
            for function in [
                FunctionId::WheelStart,
                FunctionId::WheelStop,
                FunctionId::WheelSetDutyCycle,
            ] {
                assert!(
                    table.lookup(state, function).is_none(),
                    "{function:?} must not be licensed under {state:?}"
                );
            }
        }
    }

    #[test]
    fn duplicate_function_rejected() {
        let mut table = FunctionTable::flight().unwrap();
        let err = table
            .insert(FunctionRule {
                state: ReactionWheelActive,
                function: FunctionId::WheelStart,
                hook: FunctionHook::WheelStop,
            })
            .unwrap_err();
        assert_eq!(
            err,
            TableError::DuplicateFunction {
                state: ReactionWheelActive,
                function: FunctionId::WheelStart,
            }
        );
    }

    #[test]
    fn shared_function_id_across_states() {
        // Context-dependent dispatch: one id, different hooks per state.
        let mut table = FunctionTable::empty();
        table
            .insert(FunctionRule {
                state: ReactionWheelActive,
                function: FunctionId::WheelSetDutyCycle,
                hook: FunctionHook::WheelSetDutyCycle,
            })
            .unwrap();
        table
            .insert(FunctionRule {
                state: MaxPower,
                function: FunctionId::WheelSetDutyCycle,
                hook: FunctionHook::WheelStart,
            })
            .unwrap();
        assert_eq!(
            table
                .lookup(ReactionWheelActive, FunctionId::WheelSetDutyCycle)
                .unwrap()
                .hook,
            FunctionHook::WheelSetDutyCycle
        );
        assert_eq!(
            table
                .lookup(MaxPower, FunctionId::WheelSetDutyCycle)
                .unwrap()
                .hook,
            FunctionHook::WheelStart
        );
    }
}
