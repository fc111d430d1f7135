use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use parking_lot::{Condvar, Mutex};
use thiserror::Error;

use super::state::{Task, TaskId};
use crate::mining::catalog::DatasetCatalog;
use crate::mining::config::SearchConfig;
use crate::mining::engine;
use crate::mining::error::{MiningError, Result};
use crate::mining::query::Query;
use crate::mining::store::MiningResult;

/// Returned by [`TaskRunner::submit`] while another task holds the slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("a mining task is already pending, processing or awaiting acknowledgment")]
pub struct Rejected {
    pub active: Option<TaskId>,
}

/// Runs at most one mining task at a time.
///
/// The slot is claimed with a compare-and-swap on `occupied` and released
/// only by [`TaskRunner::acknowledge`] once the stored task is terminal.
/// Each state change swaps in a whole new [`Task`] snapshot; the mutex
/// guards that pointer swap and is never held while mining.
pub struct TaskRunner {
    shared: Arc<Shared>,
}

struct Shared {
    occupied: AtomicBool,
    current: Mutex<Option<Arc<Task>>>,
    settled: Condvar,
    next_id: AtomicU64,
    catalog: Arc<dyn DatasetCatalog>,
    config: SearchConfig,
}

impl TaskRunner {
    pub fn new(catalog: impl DatasetCatalog + 'static) -> Self {
        Self::with_config(catalog, SearchConfig::default())
    }

    pub fn with_config(catalog: impl DatasetCatalog + 'static, config: SearchConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                occupied: AtomicBool::new(false),
                current: Mutex::new(None),
                settled: Condvar::new(),
                next_id: AtomicU64::new(1),
                catalog: Arc::new(catalog),
                config,
            }),
        }
    }

    /// Creates a task for `query` and starts it on a worker thread, or
    /// rejects immediately if the slot is taken.
    pub fn submit(&self, query: Query) -> std::result::Result<Arc<Task>, Rejected> {
        if self
            .shared
            .occupied
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let active = self.status().map(|task| task.id());
            debug!("Rejected {} query: slot held by task {:?}", query.family, active);
            return Err(Rejected { active });
        }

        let id = TaskId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let task = Arc::new(Task::new(id, query));
        *self.shared.current.lock() = Some(Arc::clone(&task));
        info!(
            "Task {} submitted: {} on {}",
            id,
            task.query().family,
            task.query().dataset
        );

        let shared = Arc::clone(&self.shared);
        let pending = Arc::clone(&task);
        let spawned = thread::Builder::new()
            .name(format!("motifs-task-{}", id))
            .spawn(move || shared.execute(&pending));
        if let Err(err) = spawned {
            error!("Task {} could not be started: {}", id, err);
            self.shared
                .force_failed(&task, format!("could not start worker thread: {}", err));
        }
        Ok(task)
    }

    /// Latest snapshot of the stored task, whatever its state.
    pub fn status(&self) -> Option<Arc<Task>> {
        self.shared.current.lock().clone()
    }

    /// Flags the stored task for cancellation if it has not finished yet.
    pub fn request_cancellation(&self) -> bool {
        let current = self.shared.current.lock();
        match current.as_ref() {
            Some(task) if !task.status().is_terminal() => {
                task.cancel_token().cancel();
                info!("Cancellation requested for task {}", task.id());
                true
            }
            _ => false,
        }
    }

    /// Clears a terminal task and frees the slot for the next submission.
    pub fn acknowledge(&self) -> bool {
        let mut current = self.shared.current.lock();
        match current.as_ref() {
            Some(task) if task.status().is_terminal() => {
                debug!("Task {} acknowledged ({})", task.id(), task.status());
                *current = None;
                self.shared.occupied.store(false, Ordering::Release);
                true
            }
            _ => false,
        }
    }

    /// Blocks until the stored task is terminal or `timeout` elapses, then
    /// returns the latest snapshot.
    pub fn wait_for_terminal(&self, timeout: Duration) -> Option<Arc<Task>> {
        let deadline = Instant::now() + timeout;
        let mut current = self.shared.current.lock();
        loop {
            match current.as_ref() {
                None => return None,
                Some(task) if task.status().is_terminal() => return Some(Arc::clone(task)),
                Some(_) => {}
            }
            if self
                .shared
                .settled
                .wait_until(&mut current, deadline)
                .timed_out()
            {
                return current.clone();
            }
        }
    }
}

impl Shared {
    fn execute(&self, pending: &Task) {
        let running = match pending.processing() {
            Ok(task) => Arc::new(task),
            Err(err) => {
                error!("{}", err);
                return;
            }
        };
        *self.current.lock() = Some(Arc::clone(&running));
        debug!("Task {} processing", running.id());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(&running)))
            .unwrap_or_else(|payload| Err(MiningError::Failed(panic_message(payload.as_ref()))));
        self.finish(&running, outcome);
    }

    fn run(&self, task: &Task) -> Result<Vec<MiningResult>> {
        let query = task.query();
        let db = self.catalog.open(&query.dataset)?;
        let pattern = query.pattern(&db)?;
        let token = task.cancel_token();
        let mined = engine::mine(&db, &pattern, &self.config, || token.is_cancelled())?;
        Ok(mined.results.to_results())
    }

    /// Publishes the terminal snapshot. The flag is checked under the lock
    /// so that an accepted cancellation request always ends CANCELLED.
    fn finish(&self, running: &Task, outcome: Result<Vec<MiningResult>>) {
        let mut current = self.current.lock();
        let next = match outcome {
            _ if running.is_cancellation_requested() => {
                running.cancelled(MiningError::Cancelled.to_string())
            }
            Ok(results) => running.completed(results),
            Err(MiningError::Cancelled) => running.cancelled(MiningError::Cancelled.to_string()),
            Err(err) => running.failed(err.to_string()),
        };
        match next {
            Ok(task) => {
                info!("Task {} finished: {}", task.id(), task.status());
                *current = Some(Arc::new(task));
            }
            Err(err) => error!("{}", err),
        }
        self.settled.notify_all();
    }

    fn force_failed(&self, pending: &Task, message: String) {
        let outcome = pending
            .processing()
            .and_then(|running| running.failed(message));
        let mut current = self.current.lock();
        match outcome {
            Ok(task) => *current = Some(Arc::new(task)),
            Err(err) => error!("{}", err),
        }
        self.settled.notify_all();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("search panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("search panicked: {}", msg)
    } else {
        "search panicked".to_string()
    }
}

impl Drop for TaskRunner {
    // Nobody can observe the task any more; stop the worker at its next checkpoint.
    fn drop(&mut self) {
        if let Some(task) = self.shared.current.lock().as_ref() {
            if !task.status().is_terminal() {
                task.cancel_token().cancel();
            }
        }
    }
}
