//! Non-owning handle to a machine.

use super::instance::{Machine, Shared};
use super::{Controller, MachineError};
use crate::core::Payload;
use crate::task::CooperativeTask;
use std::fmt;
use std::rc::Weak;

/// Weak reference to a [`Machine`], held by bound state units.
///
/// Every operation fails with [`MachineError::MachineDropped`] once the
/// machine's owner has dropped it.
pub struct MachineRef<C: Controller> {
    shared: Weak<Shared<C>>,
}

impl<C: Controller> MachineRef<C> {
    pub(crate) fn new(shared: Weak<Shared<C>>) -> Self {
        Self { shared }
    }

    fn upgrade(&self) -> Result<Machine<C>, MachineError> {
        self.shared
            .upgrade()
            .map(Machine::from_shared)
            .ok_or(MachineError::MachineDropped)
    }

    /// Whether the machine still exists.
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// See [`Machine::transition_to`].
    pub fn transition_to(
        &self,
        state: C::State,
        data: impl Into<Option<Payload>>,
    ) -> Result<(), MachineError> {
        self.upgrade()?.transition_to(state, data)
    }

    /// See [`Machine::transition_to_previous`].
    pub fn transition_to_previous(
        &self,
        data: impl Into<Option<Payload>>,
    ) -> Result<(), MachineError> {
        self.upgrade()?.transition_to_previous(data)
    }

    /// See [`Machine::schedule_cooperative_task`].
    pub fn schedule_cooperative_task(
        &self,
        task: CooperativeTask<C::Env>,
    ) -> Result<(), MachineError> {
        self.upgrade()?.schedule_cooperative_task(task)
    }

    /// See [`Machine::with_controller`].
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, MachineError> {
        self.upgrade()?.with_controller(f)
    }

    /// See [`Machine::current_state`].
    pub fn current_state(&self) -> Result<Option<C::State>, MachineError> {
        Ok(self.upgrade()?.current_state())
    }

    /// See [`Machine::previous_state`].
    pub fn previous_state(&self) -> Result<Option<C::State>, MachineError> {
        Ok(self.upgrade()?.previous_state())
    }
}

impl<C: Controller> Clone for MachineRef<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<C: Controller> fmt::Debug for MachineRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineRef")
            .field("alive", &self.is_alive())
            .finish()
    }
}
