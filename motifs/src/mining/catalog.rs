//! Resolution of a query's dataset identifier into a loaded database.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::database::{read_dat, TransactionDb};
use super::error::{MiningError, Result};

pub trait DatasetCatalog: Send + Sync {
    fn open(&self, dataset: &str) -> Result<Arc<TransactionDb>>;
}

/// Reads `.dat` files from disk. An identifier naming an existing file is
/// used as-is, anything else is looked up under `root`.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, dataset: &str) -> Option<PathBuf> {
        let direct = Path::new(dataset);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        let under_root = self.root.join(dataset);
        under_root.is_file().then_some(under_root)
    }
}

impl DatasetCatalog for DirectoryCatalog {
    fn open(&self, dataset: &str) -> Result<Arc<TransactionDb>> {
        let dataset = dataset.trim();
        if dataset.is_empty() {
            return Err(MiningError::Database(
                "Dataset path cannot be empty".to_string(),
            ));
        }

        let path = self
            .locate(dataset)
            .ok_or_else(|| MiningError::Database(format!("Dataset file not found: {}", dataset)))?;
        read_dat(path).map(Arc::new)
    }
}

/// Named databases kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    datasets: HashMap<String, Arc<TransactionDb>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>, db: TransactionDb) -> Self {
        self.insert(name, db);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, db: TransactionDb) {
        self.datasets.insert(name.into(), Arc::new(db));
    }
}

impl DatasetCatalog for MemoryCatalog {
    fn open(&self, dataset: &str) -> Result<Arc<TransactionDb>> {
        self.datasets
            .get(dataset)
            .cloned()
            .ok_or_else(|| MiningError::Database(format!("Dataset not found: {}", dataset)))
    }
}
