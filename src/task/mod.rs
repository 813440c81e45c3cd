//! Cooperative tasks forwarded from states to the host.
//!
//! A state may need work that spans many ticks (a timed sequence, a fade, a
//! network round trip). The machine does not run such work itself: it hands
//! the task to a [`TaskScheduler`] supplied by the host, which decides when
//! and how to drive it.
//!
//! Tasks are Stillwater effects, so the host runs them against its own
//! environment with `task.run(&env).await`.

use stillwater::effect::BoxedEffect;
use thiserror::Error;
use uuid::Uuid;

/// Errors a cooperative task can finish with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskError {
    #[error("Cooperative task failed: {0}")]
    Failed(String),

    #[error("Cooperative task aborted: {reason}")]
    Aborted { reason: String },
}

/// Suspendable unit of work run by the host on behalf of a state.
pub type CooperativeTask<Env> = BoxedEffect<(), TaskError, Env>;

/// Where a scheduling request came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskOrigin {
    /// Instance id of the requesting machine
    pub machine_id: Uuid,
    /// Display name of the requesting machine
    pub machine: String,
    /// Name of the machine's current state when the request was made
    pub state: Option<String>,
}

/// Host capability that accepts cooperative tasks.
///
/// Implementations typically queue the task and drive it from the host's
/// own executor. The machine makes no assumption about when it runs.
pub trait TaskScheduler<Env: Clone + Send + Sync + 'static> {
    /// Accept a task for later execution.
    fn schedule(&self, origin: TaskOrigin, task: CooperativeTask<Env>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use stillwater::effect::Effect;
    use stillwater::prelude::*;

    #[derive(Clone)]
    struct TestEnv {
        ready: bool,
    }

    #[derive(Default)]
    struct Queue {
        tasks: RefCell<Vec<(TaskOrigin, CooperativeTask<TestEnv>)>>,
    }

    impl TaskScheduler<TestEnv> for Queue {
        fn schedule(&self, origin: TaskOrigin, task: CooperativeTask<TestEnv>) {
            self.tasks.borrow_mut().push((origin, task));
        }
    }

    fn origin() -> TaskOrigin {
        TaskOrigin {
            machine_id: Uuid::new_v4(),
            machine: "GuardMachine".to_string(),
            state: Some("Patrol".to_string()),
        }
    }

    #[tokio::test]
    async fn scheduled_task_runs_against_environment() {
        let queue = Queue::default();
        queue.schedule(
            origin(),
            from_fn(|env: &TestEnv| {
                if env.ready {
                    Ok(())
                } else {
                    Err(TaskError::Aborted {
                        reason: "not ready".to_string(),
                    })
                }
            })
            .boxed(),
        );

        let (origin, task) = queue.tasks.borrow_mut().remove(0);
        assert_eq!(origin.state.as_deref(), Some("Patrol"));

        let result = task.run(&TestEnv { ready: false }).await;
        assert_eq!(
            result,
            Err(TaskError::Aborted {
                reason: "not ready".to_string()
            })
        );
    }

    #[tokio::test]
    async fn pure_task_succeeds() {
        let task: CooperativeTask<TestEnv> = pure(()).boxed();
        assert!(task.run(&TestEnv { ready: true }).await.is_ok());
    }
}
