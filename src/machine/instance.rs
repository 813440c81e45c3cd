//! Machine owning the registry and dispatching host ticks.

use super::error::MachineError;
use super::handle::MachineRef;
use super::registry::{Registry, SharedUnit};
use super::status::MachineStatus;
use super::Controller;
use crate::config::MachineConfig;
use crate::core::{Payload, State};
use crate::task::{CooperativeTask, TaskOrigin, TaskScheduler};
use crate::unit::StateUnit;
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

pub(crate) struct Shared<C: Controller> {
    id: Uuid,
    name: String,
    config: MachineConfig,
    debug: Cell<bool>,
    awake: Cell<bool>,
    sealed: Cell<bool>,
    ticks: Cell<u64>,
    fixed_ticks: Cell<u64>,
    registry: RefCell<Registry<C>>,
    controller: RefCell<C>,
    scheduler: RefCell<Option<Rc<dyn TaskScheduler<C::Env>>>>,
}

impl<C: Controller> Shared<C> {
    /// Log a rejection when debug is on and hand it back to the caller.
    fn reject<T>(&self, err: MachineError) -> Result<T, MachineError> {
        if self.debug.get() {
            warn!(machine = %self.name, id = %self.id, "{err}");
        }
        Err(err)
    }
}

/// Finite state machine driven by a host loop.
///
/// The host owns the `Machine`; registered units only hold a weak
/// [`MachineRef`]. Internal state lives behind `Rc` + `RefCell`, and no
/// borrow is held while a unit hook runs, so hooks may call back into the
/// machine (transitions requested from `on_update` take effect immediately).
///
/// A machine is single-threaded: it is neither `Send` nor `Sync`.
///
/// # Example
///
/// ```rust
/// use tickstate::machine::{Controller, Machine};
/// use tickstate::unit::{StateCore, StateUnit};
/// use tickstate::state_enum;
///
/// state_enum! {
///     enum Phase {
///         Idle,
///         Running,
///         Paused,
///     }
/// }
///
/// #[derive(Default)]
/// struct Step {
///     core: StateCore<Player>,
/// }
///
/// impl StateUnit<Player> for Step {
///     fn core(&self) -> &StateCore<Player> {
///         &self.core
///     }
/// }
///
/// struct Player;
///
/// impl Controller for Player {
///     type State = Phase;
///     type Env = ();
///
///     fn initialize(&mut self, machine: &Machine<Self>) {
///         for phase in [Phase::Idle, Phase::Running, Phase::Paused] {
///             let _ = machine.register_state(phase, Step::default());
///         }
///     }
/// }
///
/// let machine = Machine::new(Player);
/// machine.awake().unwrap();
/// assert_eq!(machine.current_state(), Some(Phase::Idle));
///
/// machine.transition_to(Phase::Running, None).unwrap();
/// assert!(machine.transition_to(Phase::Running, None).is_err());
///
/// machine.transition_to_previous(None).unwrap();
/// assert_eq!(machine.current_state(), Some(Phase::Idle));
/// assert_eq!(machine.previous_state(), Some(Phase::Running));
/// ```
pub struct Machine<C: Controller> {
    shared: Rc<Shared<C>>,
}

impl<C: Controller> Machine<C> {
    /// Create a machine with the default configuration.
    pub fn new(controller: C) -> Self {
        Self::with_config(controller, MachineConfig::default())
    }

    /// Create a machine with an explicit configuration.
    pub fn with_config(controller: C, config: MachineConfig) -> Self {
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| crate::short_type_name::<C>().to_string());
        let shared = Shared {
            id: Uuid::new_v4(),
            name,
            debug: Cell::new(config.debug),
            config,
            awake: Cell::new(false),
            sealed: Cell::new(false),
            ticks: Cell::new(0),
            fixed_ticks: Cell::new(0),
            registry: RefCell::new(Registry::new()),
            controller: RefCell::new(controller),
            scheduler: RefCell::new(None),
        };
        Self {
            shared: Rc::new(shared),
        }
    }

    pub(crate) fn from_shared(shared: Rc<Shared<C>>) -> Self {
        Self { shared }
    }

    /// Attach the host's cooperative task scheduler.
    pub fn with_scheduler(self, scheduler: impl TaskScheduler<C::Env> + 'static) -> Self {
        self.set_scheduler(scheduler);
        self
    }

    /// Replace the host's cooperative task scheduler.
    pub fn set_scheduler(&self, scheduler: impl TaskScheduler<C::Env> + 'static) {
        *self.shared.scheduler.borrow_mut() = Some(Rc::new(scheduler));
    }

    /// Instance id, unique per machine.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Display name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Configuration the machine was created with.
    pub fn config(&self) -> &MachineConfig {
        &self.shared.config
    }

    /// Set the machine-level debug flag.
    ///
    /// Units capture this flag when they are registered; changing it later
    /// does not affect units that are already bound.
    pub fn set_debug(&self, debug: bool) {
        self.shared.debug.set(debug);
    }

    /// Current machine-level debug flag.
    pub fn debug_enabled(&self) -> bool {
        self.shared.debug.get()
    }

    /// Weak handle to this machine.
    pub fn handle(&self) -> MachineRef<C> {
        MachineRef::new(Rc::downgrade(&self.shared))
    }

    /// Register `unit` as the behavior for `state`.
    ///
    /// The first state ever registered becomes current.
    pub fn register_state<U>(&self, state: C::State, unit: U) -> Result<(), MachineError>
    where
        U: StateUnit<C>,
    {
        self.register_shared(state, Rc::new(unit))
    }

    /// Register a unit the caller keeps a reference to.
    ///
    /// A unit that is already bound, to this machine or another one, is
    /// rejected with [`MachineError::InvalidStateInstance`].
    pub fn register_shared(
        &self,
        state: C::State,
        unit: Rc<dyn StateUnit<C>>,
    ) -> Result<(), MachineError> {
        if self.shared.sealed.get() {
            return self.shared.reject(MachineError::RegistrySealed {
                machine: self.shared.name.clone(),
                state: state.name().to_string(),
            });
        }

        if self.shared.registry.borrow().contains(&state) {
            return self.shared.reject(MachineError::DuplicateStateKey {
                machine: self.shared.name.clone(),
                state: state.name().to_string(),
            });
        }

        if unit.core().bind(self).is_err() {
            return self.shared.reject(MachineError::InvalidStateInstance {
                machine: self.shared.name.clone(),
                state: state.name().to_string(),
            });
        }

        if self.shared.debug.get() {
            debug!(
                machine = %self.shared.name,
                state = state.name(),
                unit = unit.name(),
                "Registered state"
            );
        }
        self.shared.registry.borrow_mut().insert(state, unit);
        Ok(())
    }

    /// Run the awake phase: reset the debug flag to the configured value,
    /// let the controller register its states, then call `on_awake` on every
    /// unit in registration order.
    ///
    /// Runs at most once per machine.
    pub fn awake(&self) -> Result<(), MachineError> {
        if self.shared.awake.get() {
            return self.shared.reject(MachineError::AlreadyAwake {
                machine: self.shared.name.clone(),
            });
        }

        let Ok(mut controller) = self.shared.controller.try_borrow_mut() else {
            return self.shared.reject(MachineError::ControllerBusy {
                machine: self.shared.name.clone(),
            });
        };

        self.shared.awake.set(true);
        self.shared.debug.set(self.shared.config.debug);
        controller.initialize(self);
        drop(controller);

        let units = self.shared.registry.borrow().units_in_order();
        for unit in &units {
            unit.on_awake();
        }

        if self.shared.debug.get() {
            debug!(machine = %self.shared.name, states = units.len(), "State machine awake");
        }
        Ok(())
    }

    /// Transition to `state`, running `on_exit` on the old unit and then
    /// `on_enter(data)` on the new one.
    ///
    /// Rejected when `state` is not registered or is already current; in
    /// both cases no hook runs and current/previous are unchanged.
    pub fn transition_to(
        &self,
        state: C::State,
        data: impl Into<Option<Payload>>,
    ) -> Result<(), MachineError> {
        let switch = self
            .shared
            .registry
            .borrow_mut()
            .switch_to(&self.shared.name, &state);
        let switch = match switch {
            Ok(switch) => switch,
            Err(err) => return self.shared.reject(err),
        };

        if let Some(exiting) = switch.exiting {
            exiting.on_exit();
        }
        switch.entering.on_enter(data.into());
        Ok(())
    }

    /// Transition back to the previous state. A no-op when no transition
    /// has happened yet.
    ///
    /// Only one step of history is kept, so repeated calls alternate
    /// between the last two states.
    pub fn transition_to_previous(
        &self,
        data: impl Into<Option<Payload>>,
    ) -> Result<(), MachineError> {
        let previous = self.shared.registry.borrow().previous().cloned();
        match previous {
            Some(previous) => self.transition_to(previous, data),
            None => Ok(()),
        }
    }

    /// Dispatch `on_update` to the active unit.
    pub fn tick(&self) -> Result<(), MachineError> {
        let unit = self.active_unit()?;
        self.shared.ticks.set(self.shared.ticks.get() + 1);
        unit.on_update();
        Ok(())
    }

    /// Dispatch `on_fixed_update` to the active unit.
    pub fn fixed_tick(&self) -> Result<(), MachineError> {
        let unit = self.active_unit()?;
        self.shared.fixed_ticks.set(self.shared.fixed_ticks.get() + 1);
        unit.on_fixed_update();
        Ok(())
    }

    // The first dispatch seals the registry.
    fn active_unit(&self) -> Result<SharedUnit<C>, MachineError> {
        let active = self.shared.registry.borrow().active();
        match active {
            Some(unit) => {
                self.shared.sealed.set(true);
                Ok(unit)
            }
            None => self.shared.reject(MachineError::NoActiveState {
                machine: self.shared.name.clone(),
            }),
        }
    }

    /// Hand a cooperative task to the host scheduler on behalf of the
    /// current state.
    pub fn schedule_cooperative_task(
        &self,
        task: CooperativeTask<C::Env>,
    ) -> Result<(), MachineError> {
        // The scheduler may call back into the machine, so no borrow is held.
        let scheduler = self.shared.scheduler.borrow().clone();
        let Some(scheduler) = scheduler else {
            return self.shared.reject(MachineError::NoTaskScheduler {
                machine: self.shared.name.clone(),
            });
        };

        let origin = TaskOrigin {
            machine_id: self.shared.id,
            machine: self.shared.name.clone(),
            state: self
                .shared
                .registry
                .borrow()
                .current()
                .map(|state| state.name().to_string()),
        };
        scheduler.schedule(origin, task);
        Ok(())
    }

    /// Run `f` with mutable access to the controller.
    ///
    /// Fails with [`MachineError::ControllerBusy`] when called while the
    /// controller is already borrowed, e.g. from inside `initialize`.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, MachineError> {
        match self.shared.controller.try_borrow_mut() {
            Ok(mut controller) => Ok(f(&mut controller)),
            Err(_) => self.shared.reject(MachineError::ControllerBusy {
                machine: self.shared.name.clone(),
            }),
        }
    }

    /// Key of the active state, if any state is registered.
    pub fn current_state(&self) -> Option<C::State> {
        self.shared.registry.borrow().current().cloned()
    }

    /// Key of the state that was active before the last transition.
    pub fn previous_state(&self) -> Option<C::State> {
        self.shared.registry.borrow().previous().cloned()
    }

    /// Whether a unit is registered under `state`.
    pub fn contains_state(&self, state: &C::State) -> bool {
        self.shared.registry.borrow().contains(state)
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.shared.registry.borrow().len()
    }

    /// Whether [`Machine::awake`] has run.
    pub fn is_awake(&self) -> bool {
        self.shared.awake.get()
    }

    /// Time spent in the current state so far.
    pub fn time_in_state(&self) -> Option<Duration> {
        self.status().time_in_state_at(Utc::now())
    }

    /// Snapshot of the machine for diagnostics.
    pub fn status(&self) -> MachineStatus<C::State> {
        let registry = self.shared.registry.borrow();
        MachineStatus {
            id: self.shared.id,
            name: self.shared.name.clone(),
            current: registry.current().cloned(),
            previous: registry.previous().cloned(),
            entered_at: registry.entered_at(),
            states: registry.len(),
            transitions: registry.transitions(),
            ticks: self.shared.ticks.get(),
            fixed_ticks: self.shared.fixed_ticks.get(),
            debug: self.shared.debug.get(),
            awake: self.shared.awake.get(),
        }
    }
}

impl<C: Controller> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.borrow();
        f.debug_struct("Machine")
            .field("name", &self.shared.name)
            .field("current", &registry.current())
            .field("previous", &registry.previous())
            .field("states", &registry.len())
            .finish()
    }
}
