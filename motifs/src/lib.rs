//! Constrained itemset mining over in-memory transactional databases.
//!
//! [`mining`] holds the engine (database, pattern families, search) and the
//! single-flight task runner. With the `python` feature the crate also
//! builds the `motifs` Python extension module.

pub mod mining;

#[cfg(feature = "python")]
mod python;

pub use mining::{
    mine, mine_all, DatasetCatalog, DirectoryCatalog, Family, MemoryCatalog, MiningError,
    MiningResult, Pattern, Query, SearchConfig, Task, TaskRunner, TaskStatus, TransactionDb,
};
