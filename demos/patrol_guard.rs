//! Patrol Guard
//!
//! This example drives a guard entity's state machine from a host loop.
//!
//! Key concepts:
//! - One state unit per discriminant, registered in `initialize`
//! - Transitions requested from inside `on_update`
//! - Returning to the previous state
//! - Cooperative tasks handed to the host scheduler
//!
//! Run with: cargo run --example patrol_guard

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use stillwater::effect::Effect;
use stillwater::prelude::*;
use tickstate::machine::{Controller, Machine};
use tickstate::state_enum;
use tickstate::task::{CooperativeTask, TaskError, TaskOrigin, TaskScheduler};
use tickstate::unit::{StateCore, StateUnit};
use tickstate::{MachineConfig, Payload};

state_enum! {
    enum GuardState {
        Idle,
        Patrol,
        Chase,
    }
}

#[derive(Clone)]
struct World {
    alarm_armed: bool,
}

struct Guard {
    position: i32,
    intruder_at: Option<i32>,
}

impl Controller for Guard {
    type State = GuardState;
    type Env = World;

    fn initialize(&mut self, machine: &Machine<Self>) {
        let _ = machine.register_state(GuardState::Idle, Idle::default());
        let _ = machine.register_state(GuardState::Patrol, Patrol::default());
        let _ = machine.register_state(GuardState::Chase, Chase::default());
    }
}

#[derive(Default)]
struct Idle {
    core: StateCore<Guard>,
    rested: Cell<u32>,
}

impl StateUnit<Guard> for Idle {
    fn core(&self) -> &StateCore<Guard> {
        &self.core
    }

    fn on_update(&self) {
        self.rested.set(self.rested.get() + 1);
        if self.rested.get() >= 2 {
            self.rested.set(0);
            let _ = self.request_transition(GuardState::Patrol, None);
        }
    }
}

#[derive(Default)]
struct Patrol {
    core: StateCore<Guard>,
}

impl StateUnit<Guard> for Patrol {
    fn core(&self) -> &StateCore<Guard> {
        &self.core
    }

    fn on_fixed_update(&self) {
        let Ok(machine) = self.core().machine() else {
            return;
        };
        let spotted = machine
            .with_controller(|guard| {
                guard.position += 1;
                guard
                    .intruder_at
                    .filter(|at| (at - guard.position).abs() <= 1)
            })
            .ok()
            .flatten();
        if let Some(at) = spotted {
            let _ = self.request_transition(GuardState::Chase, Payload::new(at));
        }
    }
}

#[derive(Default)]
struct Chase {
    core: StateCore<Guard>,
    target: Cell<Option<i32>>,
}

impl StateUnit<Guard> for Chase {
    fn core(&self) -> &StateCore<Guard> {
        &self.core
    }

    fn on_enter(&self, data: Option<Payload>) {
        self.core.log_enter(self.name());
        let target = data.and_then(|payload| payload.downcast::<i32>().ok());
        self.target.set(target);

        let alert = from_fn(|world: &World| {
            if world.alarm_armed {
                println!("  [Task] Alarm raised");
                Ok(())
            } else {
                Err(TaskError::Aborted {
                    reason: "alarm disarmed".to_string(),
                })
            }
        })
        .boxed();
        let _ = self.schedule_cooperative_task(alert);
    }

    fn on_update(&self) {
        let Ok(machine) = self.core().machine() else {
            return;
        };
        let _ = machine.with_controller(|guard| guard.intruder_at = None);
        self.target.set(None);
        let _ = self.request_previous_state(None);
    }
}

#[derive(Clone, Default)]
struct TaskQueue {
    pending: Rc<RefCell<Vec<(TaskOrigin, CooperativeTask<World>)>>>,
}

impl TaskScheduler<World> for TaskQueue {
    fn schedule(&self, origin: TaskOrigin, task: CooperativeTask<World>) {
        println!("  [Host] Task queued by {} in {:?}", origin.machine, origin.state);
        self.pending.borrow_mut().push((origin, task));
    }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Patrol Guard State Machine ===\n");

    let queue = TaskQueue::default();
    let guard = Guard {
        position: 0,
        intruder_at: Some(5),
    };
    let machine = Machine::with_config(guard, MachineConfig::new().with_debug(true))
        .with_scheduler(queue.clone());

    if let Err(err) = machine.awake() {
        println!("Awake failed: {err}");
        return;
    }
    println!("Initial state: {:?}\n", machine.current_state());

    for frame in 0..12 {
        let _ = machine.tick();
        if frame % 2 == 0 {
            let _ = machine.fixed_tick();
        }
        println!("Frame {frame:>2}: {:?}", machine.current_state());
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            println!("Could not start runtime: {err}");
            return;
        }
    };
    let world = World { alarm_armed: true };
    let pending = queue.pending.borrow_mut().drain(..).collect::<Vec<_>>();
    println!("\nRunning {} queued task(s):", pending.len());
    for (origin, task) in pending {
        let result = runtime.block_on(task.run(&world));
        println!("  {} -> {:?}", origin.machine, result);
    }

    println!("\nFinal status:");
    match serde_json::to_string_pretty(&machine.status()) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Could not serialize status: {err}"),
    }

    println!("\n=== Example Complete ===");
}
