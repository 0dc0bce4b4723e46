#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use workvisor::{
    Payload, RunFile, RuntimeEvent, SpawnError, SpawnedWorker, WorkError, WorkFn, WorkerContext,
    WorkerControl, WorkerId, WorkerRuntime,
};

/// Control handle that only records what the manager asked for.
#[derive(Default)]
pub struct ScriptedControl {
    terminated: AtomicUsize,
    unrefed: AtomicBool,
}

impl ScriptedControl {
    pub fn terminate_count(&self) -> usize {
        self.terminated.load(Ordering::SeqCst)
    }

    pub fn is_unrefed(&self) -> bool {
        self.unrefed.load(Ordering::SeqCst)
    }
}

impl WorkerControl for ScriptedControl {
    fn terminate(&self) {
        self.terminated.fetch_add(1, Ordering::SeqCst);
    }

    fn unref(&self) {
        self.unrefed.store(true, Ordering::SeqCst);
    }
}

struct ScriptedWorker {
    control: Arc<ScriptedControl>,
    events: mpsc::UnboundedSender<RuntimeEvent>,
    data: Option<Payload>,
}

/// Runtime that runs nothing: tests push events by hand.
#[derive(Default)]
pub struct ScriptedRuntime {
    next_id: AtomicU64,
    spawns: AtomicUsize,
    reject: AtomicBool,
    workers: Mutex<HashMap<WorkerId, ScriptedWorker>>,
}

impl ScriptedRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every following spawn fail.
    pub fn reject_spawns(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub fn spawn_count(&self) -> usize {
        self.spawns.load(Ordering::SeqCst)
    }

    pub fn emit(&self, id: WorkerId, event: RuntimeEvent) {
        let workers = self.workers.lock().unwrap();
        workers[&id].events.send(event).unwrap();
    }

    pub fn control(&self, id: WorkerId) -> Arc<ScriptedControl> {
        Arc::clone(&self.workers.lock().unwrap()[&id].control)
    }

    pub fn worker_data(&self, id: WorkerId) -> Option<Payload> {
        self.workers.lock().unwrap()[&id].data.clone()
    }
}

impl WorkerRuntime for ScriptedRuntime {
    fn spawn(
        &self,
        _run_file: &RunFile,
        worker_data: Option<Payload>,
    ) -> Result<SpawnedWorker, SpawnError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(SpawnError::Rejected {
                reason: "scripted rejection".into(),
            });
        }
        self.spawns.fetch_add(1, Ordering::SeqCst);
        let id = WorkerId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let (tx, rx) = mpsc::unbounded_channel();
        let control = Arc::new(ScriptedControl::default());
        self.workers.lock().unwrap().insert(
            id,
            ScriptedWorker {
                control: Arc::clone(&control),
                events: tx,
                data: worker_data,
            },
        );
        Ok(SpawnedWorker {
            id,
            control,
            events: rx,
        })
    }
}

/// Counts callback invocations and keeps their arguments.
pub struct Calls<T> {
    seen: Mutex<Vec<T>>,
}

impl<T: Clone> Calls<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, value: T) {
        self.seen.lock().unwrap().push(value);
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<T> {
        self.seen.lock().unwrap().clone()
    }
}

/// A run file for the scripted runtime, which never executes it.
pub fn noop_run_file() -> RunFile {
    WorkFn::arc("noop", |_ctx: WorkerContext| async { Ok::<_, WorkError>(()) })
}

/// Polls `cond` every 5ms until it holds or `limit` elapses.
pub async fn wait_until(limit: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(5)).await;
    }
}

/// Gives spawned relay tasks a chance to drain their queues.
pub async fn settle() {
    sleep(Duration::from_millis(20)).await;
}
