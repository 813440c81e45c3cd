//! Tickstate: a generic finite state machine driven by a host tick loop
//!
//! A [`Machine`](machine::Machine) owns one [`StateUnit`](unit::StateUnit)
//! per discriminant value and forwards the host's per-tick and
//! per-fixed-tick calls to whichever unit is active. Units request
//! transitions back through their binding; the machine validates each
//! request and runs `on_exit` on the old unit before `on_enter` on the new
//! one.
//!
//! # Core Concepts
//!
//! - **State**: the finite discriminant keying the registry
//! - **StateUnit**: behavior for one discriminant, with lifecycle hooks
//! - **Controller**: the concrete machine type that registers its units
//! - **Machine**: registry, current/previous slots and tick dispatch
//!
//! Misuse (duplicate keys, unknown targets, self-transitions, ticking an
//! empty machine) is reported as a [`MachineError`](machine::MachineError)
//! and absorbed: the machine stays where it was. With debug on, every
//! rejection and every enter/exit is logged through `tracing`.
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
//!     enum Stance {
//!         Idle,
//!         Running,
//!     }
//! }
//!
//! struct Runner {
//!     stamina: u32,
//! }
//!
//! impl Controller for Runner {
//!     type State = Stance;
//!     type Env = ();
//!
//!     fn initialize(&mut self, machine: &Machine<Self>) {
//!         let _ = machine.register_state(Stance::Idle, Idle::default());
//!         let _ = machine.register_state(Stance::Running, Running::default());
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Idle {
//!     core: StateCore<Runner>,
//! }
//!
//! impl StateUnit<Runner> for Idle {
//!     fn core(&self) -> &StateCore<Runner> {
//!         &self.core
//!     }
//!
//!     fn on_update(&self) {
//!         let _ = self.request_transition(Stance::Running, None);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Running {
//!     core: StateCore<Runner>,
//!     steps: Cell<u32>,
//! }
//!
//! impl StateUnit<Runner> for Running {
//!     fn core(&self) -> &StateCore<Runner> {
//!         &self.core
//!     }
//!
//!     fn on_update(&self) {
//!         self.steps.set(self.steps.get() + 1);
//!         let Ok(machine) = self.core().machine() else { return };
//!         let exhausted = machine
//!             .with_controller(|runner| {
//!                 runner.stamina = runner.stamina.saturating_sub(1);
//!                 runner.stamina == 0
//!             })
//!             .unwrap_or(false);
//!         if exhausted {
//!             let _ = self.request_previous_state(None);
//!         }
//!     }
//! }
//!
//! let machine = Machine::new(Runner { stamina: 2 });
//! machine.awake().unwrap();
//!
//! machine.tick().unwrap(); // Idle -> Running
//! machine.tick().unwrap(); // stamina 1
//! machine.tick().unwrap(); // stamina 0, back to Idle
//! assert_eq!(machine.current_state(), Some(Stance::Idle));
//! assert_eq!(machine.previous_state(), Some(Stance::Running));
//! ```

pub mod config;
pub mod core;
pub mod machine;
mod macros;
pub mod task;
pub mod unit;

// Re-export commonly used types
pub use config::MachineConfig;
pub use crate::core::{Payload, State};
pub use machine::{Controller, Machine, MachineError, MachineRef, MachineStatus};
pub use task::{CooperativeTask, TaskError, TaskOrigin, TaskScheduler};
pub use unit::{StateCore, StateUnit};

/// Last path segment of a type name, without generic arguments.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
