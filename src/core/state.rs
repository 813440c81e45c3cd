//! State discriminant trait.
//!
//! A machine keys its registry by a small, finite, comparable value,
//! typically a fieldless enum. This trait is the only requirement placed on
//! that value.

use std::fmt::Debug;
use std::hash::Hash;

/// Discriminant identifying which state a machine is in.
///
/// Implementations are usually fieldless enums. Each value maps to at most
/// one registered [`StateUnit`](crate::unit::StateUnit) in a machine.
///
/// # Required Traits
///
/// - `Clone`: discriminants are copied into the current/previous slots
/// - `Eq` + `Hash`: discriminants key the registry
/// - `Debug`: discriminants appear in diagnostics
///
/// # Example
///
/// ```rust
/// use tickstate::core::State;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum GuardState {
///     Idle,
///     Patrol,
///     Chase,
/// }
///
/// impl State for GuardState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Patrol => "Patrol",
///             Self::Chase => "Chase",
///         }
///     }
/// }
///
/// assert_eq!(GuardState::Chase.name(), "Chase");
/// ```
pub trait State: Clone + Eq + Hash + Debug + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Idle,
        Running,
        Paused,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Running => "Running",
                Self::Paused => "Paused",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Running.name(), "Running");
        assert_eq!(TestState::Paused.name(), "Paused");
    }

    #[test]
    fn states_are_usable_as_keys() {
        let mut keys = HashSet::new();
        assert!(keys.insert(TestState::Idle));
        assert!(keys.insert(TestState::Running));
        assert!(!keys.insert(TestState::Idle));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn state_is_comparable() {
        let state1 = TestState::Running;
        let state2 = TestState::Running;
        let state3 = TestState::Paused;

        assert_eq!(state1, state2);
        assert_ne!(state1, state3);
    }
}
