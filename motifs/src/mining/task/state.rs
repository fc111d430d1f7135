use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::mining::query::Query;
use crate::mining::store::MiningResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    pub fn can_become(self, next: TaskStatus) -> bool {
        match self {
            TaskStatus::Pending => next == TaskStatus::Processing,
            TaskStatus::Processing => next.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Processing => "PROCESSING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Immutable snapshot of a mining task. Every state change produces a new
/// snapshot; only the cancellation flag is shared between snapshots.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    status: TaskStatus,
    query: Query,
    result: Option<Vec<MiningResult>>,
    error: Option<String>,
    cancel: CancelToken,
}

impl Task {
    pub(crate) fn new(id: TaskId, query: Query) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            query,
            result: None,
            error: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Mined patterns; present only once the task is completed.
    pub fn result(&self) -> Option<&[MiningResult]> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_cancellation_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn advance(&self, next: TaskStatus) -> Result<Task, String> {
        if !self.status.can_become(next) {
            return Err(format!(
                "Cannot move task {} from {} to {}",
                self.id, self.status, next
            ));
        }
        Ok(Task {
            status: next,
            ..self.clone()
        })
    }

    pub(crate) fn processing(&self) -> Result<Task, String> {
        self.advance(TaskStatus::Processing)
    }

    pub(crate) fn completed(&self, results: Vec<MiningResult>) -> Result<Task, String> {
        let mut task = self.advance(TaskStatus::Completed)?;
        task.result = Some(results);
        Ok(task)
    }

    pub(crate) fn failed(&self, error: String) -> Result<Task, String> {
        let mut task = self.advance(TaskStatus::Failed)?;
        task.error = Some(error);
        Ok(task)
    }

    pub(crate) fn cancelled(&self, error: String) -> Result<Task, String> {
        let mut task = self.advance(TaskStatus::Cancelled)?;
        task.error = Some(error);
        Ok(task)
    }
}
