//! State units: the behavior registered for one discriminant.
//!
//! A unit is created once, handed to [`Machine::register_state`], and owned
//! by that machine for its whole life. The machine drives the unit through
//! lifecycle hooks; the unit drives the machine back through the proxy
//! operations on its [`StateCore`].
//!
//! Hooks take `&self`. A transition requested from inside `on_update` runs
//! synchronously, which means `on_exit` of the same unit is called while its
//! `on_update` is still on the stack. Units keep their own mutable data in
//! `Cell`/`RefCell` fields for that reason.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use tickstate::machine::{Controller, Machine};
//! use tickstate::unit::{StateCore, StateUnit};
//! use tickstate::state_enum;
//!
//! state_enum! {
//!     enum Door {
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! struct DoorController;
//!
//! impl Controller for DoorController {
//!     type State = Door;
//!     type Env = ();
//!
//!     fn initialize(&mut self, machine: &Machine<Self>) {
//!         let _ = machine.register_state(Door::Closed, Closed::default());
//!         let _ = machine.register_state(Door::Open, StaysOpen::default());
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Closed {
//!     core: StateCore<DoorController>,
//! }
//!
//! impl StateUnit<DoorController> for Closed {
//!     fn core(&self) -> &StateCore<DoorController> {
//!         &self.core
//!     }
//!
//!     fn on_update(&self) {
//!         let _ = self.request_transition(Door::Open, None);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct StaysOpen {
//!     core: StateCore<DoorController>,
//!     ticks: Cell<u32>,
//! }
//!
//! impl StateUnit<DoorController> for StaysOpen {
//!     fn core(&self) -> &StateCore<DoorController> {
//!         &self.core
//!     }
//!
//!     fn on_update(&self) {
//!         self.ticks.set(self.ticks.get() + 1);
//!     }
//! }
//!
//! let machine = Machine::new(DoorController);
//! machine.awake().unwrap();
//! machine.tick().unwrap();
//! assert_eq!(machine.current_state(), Some(Door::Open));
//! assert_eq!(machine.previous_state(), Some(Door::Closed));
//! ```
//!
//! [`Machine::register_state`]: crate::machine::Machine::register_state

mod binding;

pub use binding::StateCore;

use crate::core::Payload;
use crate::machine::{Controller, MachineError};
use crate::task::CooperativeTask;

/// Behavior bound to one discriminant of a machine.
///
/// Every hook has an empty default except `on_enter`/`on_exit`, which emit a
/// diagnostic when the unit's debug flag is on. Overrides that want to keep
/// that output call [`StateCore::log_enter`] / [`StateCore::log_exit`].
pub trait StateUnit<C: Controller>: 'static {
    /// The embedded binding and debug flag.
    fn core(&self) -> &StateCore<C>;

    /// Name used in diagnostics. Defaults to the unit's type name.
    fn name(&self) -> &str {
        crate::short_type_name::<Self>()
    }

    /// Reserved extension point. The machine never calls it.
    fn on_reason(&self) {}

    /// Called once after all states are registered, before the first tick.
    fn on_awake(&self) {}

    /// Called when this unit becomes active.
    fn on_enter(&self, _data: Option<Payload>) {
        self.core().log_enter(self.name());
    }

    /// Called when this unit stops being active.
    fn on_exit(&self) {
        self.core().log_exit(self.name());
    }

    /// Called once per tick while active.
    fn on_update(&self) {}

    /// Called once per fixed tick while active.
    fn on_fixed_update(&self) {}

    /// Override the unit's debug flag, returning the unit.
    fn set_debug(&self, debug: bool) -> &Self
    where
        Self: Sized,
    {
        self.core().set_debug(debug);
        self
    }

    /// See [`StateCore::request_transition`].
    fn request_transition(
        &self,
        state: C::State,
        data: impl Into<Option<Payload>>,
    ) -> Result<(), MachineError>
    where
        Self: Sized,
    {
        self.core().request_transition(state, data)
    }

    /// See [`StateCore::request_previous_state`].
    fn request_previous_state(&self, data: impl Into<Option<Payload>>) -> Result<(), MachineError>
    where
        Self: Sized,
    {
        self.core().request_previous_state(data)
    }

    /// See [`StateCore::schedule_cooperative_task`].
    fn schedule_cooperative_task(&self, task: CooperativeTask<C::Env>) -> Result<(), MachineError>
    where
        Self: Sized,
    {
        self.core().schedule_cooperative_task(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::machine::Machine;
    use crate::state_enum;
    use std::cell::RefCell;
    use std::rc::Rc;

    state_enum! {
        enum Light {
            Off,
            On,
        }
    }

    struct Lamp;

    impl Controller for Lamp {
        type State = Light;
        type Env = ();

        fn initialize(&mut self, _machine: &Machine<Self>) {}
    }

    #[derive(Default)]
    struct Plain {
        core: StateCore<Lamp>,
    }

    impl StateUnit<Lamp> for Plain {
        fn core(&self) -> &StateCore<Lamp> {
            &self.core
        }
    }

    #[derive(Default)]
    struct Carrier {
        core: StateCore<Lamp>,
        received: RefCell<Option<String>>,
    }

    impl StateUnit<Lamp> for Carrier {
        fn core(&self) -> &StateCore<Lamp> {
            &self.core
        }

        fn on_enter(&self, data: Option<Payload>) {
            let text = data.and_then(|payload| payload.downcast::<String>().ok());
            *self.received.borrow_mut() = text;
        }
    }

    #[test]
    fn unbound_unit_rejects_proxies() {
        let unit = Plain::default();

        assert!(!unit.core().is_bound());
        assert_eq!(
            unit.request_transition(Light::On, None),
            Err(MachineError::Unbound)
        );
        assert_eq!(unit.request_previous_state(None), Err(MachineError::Unbound));
    }

    #[test]
    fn bind_captures_machine_debug_flag() {
        let machine = Machine::with_config(Lamp, MachineConfig::new().with_debug(true));
        let unit = Plain::default();

        unit.core().bind(&machine).unwrap();

        assert!(unit.core().is_bound());
        assert!(unit.core().debug_enabled());
        assert_eq!(unit.core().machine_name(), Some("Lamp"));
    }

    #[test]
    fn second_bind_is_rejected() {
        let first = Machine::new(Lamp);
        let second = Machine::with_config(Lamp, MachineConfig::new().with_name("Other"));
        let unit = Plain::default();

        unit.core().bind(&first).unwrap();
        assert_eq!(unit.core().bind(&second), Err(MachineError::AlreadyBound));
        assert_eq!(unit.core().machine_name(), Some("Lamp"));
    }

    #[test]
    fn set_debug_overrides_captured_flag() {
        let machine = Machine::new(Lamp);
        let unit = Plain::default();
        unit.core().bind(&machine).unwrap();
        assert!(!unit.core().debug_enabled());

        assert!(unit.set_debug(true).core().debug_enabled());
        assert!(!machine.debug_enabled());
    }

    #[test]
    fn default_name_is_type_name() {
        assert_eq!(Plain::default().name(), "Plain");
    }

    #[test]
    fn proxy_transition_delivers_payload() {
        let machine = Machine::new(Lamp);
        let carrier = Rc::new(Carrier::default());
        machine.register_state(Light::Off, Plain::default()).unwrap();
        machine
            .register_shared(Light::On, carrier.clone())
            .unwrap();

        carrier
            .request_transition(Light::On, Payload::new("switched".to_string()))
            .unwrap();

        assert_eq!(machine.current_state(), Some(Light::On));
        assert_eq!(carrier.received.borrow().as_deref(), Some("switched"));
    }

    #[test]
    fn proxies_fail_after_machine_is_dropped() {
        let carrier = Rc::new(Carrier::default());
        {
            let machine = Machine::new(Lamp);
            machine
                .register_shared(Light::Off, carrier.clone())
                .unwrap();
        }

        assert_eq!(
            carrier.request_transition(Light::On, None),
            Err(MachineError::MachineDropped)
        );
    }
}
