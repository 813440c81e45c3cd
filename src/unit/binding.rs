//! Per-unit binding to the owning machine.

use crate::core::Payload;
use crate::machine::{Controller, Machine, MachineError, MachineRef};
use crate::task::CooperativeTask;
use std::cell::{Cell, OnceCell};
use std::fmt;
use tracing::info;

struct Binding<C: Controller> {
    machine: MachineRef<C>,
    machine_name: String,
}

/// State shared by every [`StateUnit`](super::StateUnit): the back-reference
/// to the owning machine and the unit's own debug flag.
///
/// Units embed one and return it from [`StateUnit::core`](super::StateUnit::core).
/// The back-reference is weak, so a unit never keeps its machine alive.
pub struct StateCore<C: Controller> {
    binding: OnceCell<Binding<C>>,
    debug: Cell<bool>,
}

impl<C: Controller> StateCore<C> {
    /// Create an unbound core with debug output off.
    pub fn new() -> Self {
        Self {
            binding: OnceCell::new(),
            debug: Cell::new(false),
        }
    }

    /// Bind to `machine` and capture its current debug flag.
    ///
    /// A core binds exactly once; later calls fail with
    /// [`MachineError::AlreadyBound`] and leave the first binding in place.
    pub fn bind(&self, machine: &Machine<C>) -> Result<(), MachineError> {
        let binding = Binding {
            machine: machine.handle(),
            machine_name: machine.name().to_string(),
        };
        self.binding
            .set(binding)
            .map_err(|_| MachineError::AlreadyBound)?;
        self.debug.set(machine.debug_enabled());
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    /// Override this unit's debug flag independently of the machine's.
    pub fn set_debug(&self, debug: bool) -> &Self {
        self.debug.set(debug);
        self
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.get()
    }

    /// Handle to the owning machine.
    pub fn machine(&self) -> Result<&MachineRef<C>, MachineError> {
        self.binding
            .get()
            .map(|binding| &binding.machine)
            .ok_or(MachineError::Unbound)
    }

    /// Name of the owning machine, if bound.
    pub fn machine_name(&self) -> Option<&str> {
        self.binding
            .get()
            .map(|binding| binding.machine_name.as_str())
    }

    /// Ask the owning machine to transition to `state`.
    pub fn request_transition(
        &self,
        state: C::State,
        data: impl Into<Option<Payload>>,
    ) -> Result<(), MachineError> {
        self.machine()?.transition_to(state, data)
    }

    /// Ask the owning machine to return to its previous state.
    pub fn request_previous_state(
        &self,
        data: impl Into<Option<Payload>>,
    ) -> Result<(), MachineError> {
        self.machine()?.transition_to_previous(data)
    }

    /// Forward a cooperative task to the owning machine's host scheduler.
    pub fn schedule_cooperative_task(
        &self,
        task: CooperativeTask<C::Env>,
    ) -> Result<(), MachineError> {
        self.machine()?.schedule_cooperative_task(task)
    }

    /// Emit the "entering" diagnostic for `state` when debug is on.
    pub fn log_enter(&self, state: &str) {
        if let Some(machine) = self.debug_target() {
            info!(machine, "{machine}: Entering state '{state}'");
        }
    }

    /// Emit the "leaving" diagnostic for `state` when debug is on.
    pub fn log_exit(&self, state: &str) {
        if let Some(machine) = self.debug_target() {
            info!(machine, "{machine}: Leaving state '{state}'");
        }
    }

    fn debug_target(&self) -> Option<&str> {
        if self.debug.get() {
            self.machine_name()
        } else {
            None
        }
    }
}

impl<C: Controller> Default for StateCore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Controller> fmt::Debug for StateCore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCore")
            .field("machine", &self.machine_name())
            .field("debug", &self.debug.get())
            .finish()
    }
}
