pub mod catalog;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod query;
pub mod store;
pub mod task;

pub use catalog::{DatasetCatalog, DirectoryCatalog, MemoryCatalog};
pub use config::SearchConfig;
pub use database::{Cover, ItemId, Itemset, TransactionDb};
pub use engine::{mine, mine_all, mine_family, Mined, SearchStats};
pub use error::{MiningError, Result};
pub use pattern::{Bound, Pattern};
pub use query::{Family, Query};
pub use store::{MiningResult, PatternStore};
pub use task::{Rejected, Task, TaskId, TaskRunner, TaskStatus};
