use std::sync::{Arc, Mutex};
use std::time::Duration;

use dagrun::dag::{Task, TaskContext};
use dagrun::exec::{BodyFuture, TaskBody};
use dagrun::types::TaskOutcome;
use tokio::sync::Barrier;
use tracing::debug;

/// Something a fake body did, in the order it happened across all bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyEvent {
    Started(String),
    Finished(String),
}

/// How a [`FakeBody`] behaves once started.
#[derive(Debug, Clone)]
pub enum FakeBehaviour {
    Succeed,
    Fail(i32),
    Skip,
    Panic,
    /// Sleep, then succeed.
    Sleep(Duration),
    /// Wait until every party of the barrier has arrived, then succeed.
    /// Only completes if the parties run at the same time.
    Rendezvous(Arc<Barrier>),
}

/// Shared log of body events plus a factory for recording tasks.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<BodyEvent>>>,
    contexts: Arc<Mutex<Vec<TaskContext>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A task whose body records start/finish and succeeds.
    pub fn task<const N: usize>(&self, name: &str, deps: [&str; N]) -> Task {
        self.task_with(name, deps, FakeBehaviour::Succeed)
    }

    pub fn task_with<const N: usize>(
        &self,
        name: &str,
        deps: [&str; N],
        behaviour: FakeBehaviour,
    ) -> Task {
        Task::new(name, deps, self.body(behaviour))
    }

    pub fn body(&self, behaviour: FakeBehaviour) -> FakeBody {
        FakeBody {
            recorder: self.clone(),
            behaviour,
        }
    }

    pub fn events(&self) -> Vec<BodyEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Names in the order their bodies started.
    pub fn started(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BodyEvent::Started(name) => Some(name),
                BodyEvent::Finished(_) => None,
            })
            .collect()
    }

    pub fn start_count(&self, name: &str) -> usize {
        self.started().iter().filter(|n| n.as_str() == name).count()
    }

    /// Index of an event in the log, if it happened.
    pub fn position(&self, event: &BodyEvent) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    /// Context a body received when it was launched.
    pub fn context_of(&self, name: &str) -> Option<TaskContext> {
        self.contexts
            .lock()
            .unwrap()
            .iter()
            .find(|ctx| ctx.name() == name)
            .cloned()
    }

    fn push(&self, event: BodyEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A task body that records what happens to it instead of doing real work.
pub struct FakeBody {
    recorder: Recorder,
    behaviour: FakeBehaviour,
}

impl TaskBody for FakeBody {
    fn run(&self, ctx: TaskContext) -> BodyFuture {
        let recorder = self.recorder.clone();
        let behaviour = self.behaviour.clone();

        Box::pin(async move {
            let name = ctx.name().to_string();
            debug!(task = %name, layer = ctx.layer(), ?behaviour, "fake body started");
            recorder.contexts.lock().unwrap().push(ctx);
            recorder.push(BodyEvent::Started(name.clone()));

            // Give sibling bodies a chance to start before this one finishes.
            tokio::task::yield_now().await;

            let outcome = match behaviour {
                FakeBehaviour::Succeed => TaskOutcome::Success,
                FakeBehaviour::Fail(code) => TaskOutcome::Failed(code),
                FakeBehaviour::Skip => TaskOutcome::Skipped,
                FakeBehaviour::Panic => panic!("fake body '{name}' panicked"),
                FakeBehaviour::Sleep(duration) => {
                    tokio::time::sleep(duration).await;
                    TaskOutcome::Success
                }
                FakeBehaviour::Rendezvous(barrier) => {
                    barrier.wait().await;
                    TaskOutcome::Success
                }
            };

            debug!(task = %name, %outcome, "fake body finished");
            recorder.push(BodyEvent::Finished(name));
            outcome
        })
    }
}
