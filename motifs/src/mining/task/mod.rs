//! Single-flight, cooperatively cancellable execution of mining queries.

mod runner;
mod state;

pub use runner::{Rejected, TaskRunner};
pub use state::{CancelToken, Task, TaskId, TaskStatus};
