//! The machine: state registry, transition protocol and tick dispatch.
//!
//! # Key Concepts
//!
//! - **Controller**: the concrete machine type. It names the discriminant
//!   domain and registers one unit per discriminant in `initialize`.
//! - **Machine**: owns the registry and the current/previous slots, and
//!   dispatches host ticks to the active unit.
//! - **MachineRef**: the weak back-reference a unit receives when bound.
//!
//! # Lifecycle
//!
//! 1. `Machine::new(controller)`
//! 2. `awake()` once: runs `Controller::initialize`, then `on_awake` on
//!    every unit in registration order
//! 3. `tick()` / `fixed_tick()` from the host loop
//!
//! Every rejection is returned as a [`MachineError`] and, when the machine's
//! debug flag is on, logged at `warn`. A rejected call never changes the
//! machine.

mod error;
mod handle;
mod instance;
mod registry;
mod status;

pub use error::MachineError;
pub use handle::MachineRef;
pub use instance::Machine;
pub use status::MachineStatus;

use crate::core::State;

/// The concrete machine type driving one kind of entity.
///
/// It plays two roles: it fixes the discriminant domain and task
/// environment, and it holds whatever entity data the state units need,
/// reachable through [`Machine::with_controller`].
pub trait Controller: Sized + 'static {
    /// Discriminant domain of this machine.
    type State: State;

    /// Environment cooperative tasks are run against.
    type Env: Clone + Send + Sync + 'static;

    /// Register every state unit. Called once from [`Machine::awake`].
    fn initialize(&mut self, machine: &Machine<Self>);
}
