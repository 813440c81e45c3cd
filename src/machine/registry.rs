//! State registry and current/previous bookkeeping.
//!
//! Everything here is plain data manipulation. The registry decides whether
//! a request is legal and updates its slots; running hooks is left to the
//! machine, after the registry borrow has been released.

use super::error::MachineError;
use super::Controller;
use crate::core::State;
use crate::unit::StateUnit;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) type SharedUnit<C> = Rc<dyn StateUnit<C>>;

/// Units whose hooks must run to complete a transition.
pub(crate) struct Switch<C: Controller> {
    pub(crate) exiting: Option<SharedUnit<C>>,
    pub(crate) entering: SharedUnit<C>,
}

pub(crate) struct Registry<C: Controller> {
    units: HashMap<C::State, SharedUnit<C>>,
    order: Vec<C::State>,
    current: Option<C::State>,
    previous: Option<C::State>,
    entered_at: Option<DateTime<Utc>>,
    transitions: u64,
}

impl<C: Controller> Registry<C> {
    pub(crate) fn new() -> Self {
        Self {
            units: HashMap::new(),
            order: Vec::new(),
            current: None,
            previous: None,
            entered_at: None,
            transitions: 0,
        }
    }

    pub(crate) fn contains(&self, state: &C::State) -> bool {
        self.units.contains_key(state)
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    pub(crate) fn current(&self) -> Option<&C::State> {
        self.current.as_ref()
    }

    pub(crate) fn previous(&self) -> Option<&C::State> {
        self.previous.as_ref()
    }

    pub(crate) fn entered_at(&self) -> Option<DateTime<Utc>> {
        self.entered_at
    }

    pub(crate) fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Insert a unit under a key the caller has checked is free.
    ///
    /// The first key ever inserted becomes current.
    pub(crate) fn insert(&mut self, state: C::State, unit: SharedUnit<C>) {
        if self.current.is_none() {
            self.current = Some(state.clone());
            self.entered_at = Some(Utc::now());
        }
        self.order.push(state.clone());
        self.units.insert(state, unit);
    }

    /// Validate a transition to `target` and, if legal, move the slots.
    pub(crate) fn switch_to(
        &mut self,
        machine: &str,
        target: &C::State,
    ) -> Result<Switch<C>, MachineError> {
        let Some(entering) = self.units.get(target).cloned() else {
            return Err(MachineError::UnknownStateTarget {
                machine: machine.to_string(),
                state: target.name().to_string(),
            });
        };

        if self.current.as_ref() == Some(target) {
            return Err(MachineError::RedundantTransition {
                machine: machine.to_string(),
                state: target.name().to_string(),
            });
        }

        self.previous = self.current.replace(target.clone());
        self.entered_at = Some(Utc::now());
        self.transitions += 1;

        let exiting = self
            .previous
            .as_ref()
            .and_then(|previous| self.units.get(previous).cloned());

        Ok(Switch { exiting, entering })
    }

    /// Unit that should receive tick dispatch.
    pub(crate) fn active(&self) -> Option<SharedUnit<C>> {
        self.current
            .as_ref()
            .and_then(|current| self.units.get(current).cloned())
    }

    /// All units in registration order.
    pub(crate) fn units_in_order(&self) -> Vec<SharedUnit<C>> {
        self.order
            .iter()
            .filter_map(|state| self.units.get(state).cloned())
            .collect()
    }
}
