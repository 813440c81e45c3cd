//! Errors reported by machines and state units.

use thiserror::Error;

/// Rejections reported by a [`Machine`](crate::machine::Machine).
///
/// None of these are fatal. The call that produced one was a no-op and the
/// machine stays in its prior valid state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State machine '{machine}' already contains key '{state}'")]
    DuplicateStateKey { machine: String, state: String },

    #[error("State instance for '{state}' in state machine '{machine}' is already bound to a machine")]
    InvalidStateInstance { machine: String, state: String },

    #[error("State '{state}' does not exist in state machine '{machine}'")]
    UnknownStateTarget { machine: String, state: String },

    #[error("State machine '{machine}' is already in state '{state}'")]
    RedundantTransition { machine: String, state: String },

    #[error("State machine '{machine}' has no states defined")]
    NoActiveState { machine: String },

    #[error("State machine '{machine}' is ticking; '{state}' can no longer be registered")]
    RegistrySealed { machine: String, state: String },

    #[error("State machine '{machine}' has already been awakened")]
    AlreadyAwake { machine: String },

    #[error("Controller of state machine '{machine}' is already borrowed")]
    ControllerBusy { machine: String },

    #[error("State machine '{machine}' has no cooperative task scheduler")]
    NoTaskScheduler { machine: String },

    #[error("State unit is already bound to a state machine")]
    AlreadyBound,

    #[error("State unit is not bound to a state machine")]
    Unbound,

    #[error("State machine owning this unit has been dropped")]
    MachineDropped,
}
