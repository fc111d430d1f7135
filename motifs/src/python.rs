use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use numpy::ndarray::ArrayView2;
use numpy::PyReadonlyArray2;
use once_cell::sync::Lazy;
use pyo3::exceptions::PyValueError;
use pyo3::{pymodule, types::PyModule, Bound, PyResult, Python};

use crate::mining::{
    mine_family, DirectoryCatalog, Family, ItemId, Mined, Query, SearchConfig, Task, TaskRunner,
    TransactionDb,
};

/// Environment variable naming the directory datasets are resolved against.
const DATASET_ROOT_ENV: &str = "MOTIFS_DATASET_ROOT";

// Task slot shared by every caller of the module.
static RUNNER: Lazy<TaskRunner> = Lazy::new(|| {
    let root = std::env::var(DATASET_ROOT_ENV).unwrap_or_else(|_| ".".to_string());
    TaskRunner::new(DirectoryCatalog::new(root))
});

type PyPattern = (Vec<ItemId>, u32);
type PyTask = (u64, &'static str, Option<Vec<PyPattern>>, Option<String>);

fn to_params(params: Option<HashMap<String, String>>) -> BTreeMap<String, String> {
    params.unwrap_or_default().into_iter().collect()
}

fn to_patterns(mined: &Mined) -> Vec<PyPattern> {
    mined
        .results
        .iter()
        .map(|(pattern, support)| (pattern.to_vec(), support))
        .collect()
}

fn to_py_task(task: &Task) -> PyTask {
    let result = task.result().map(|results| {
        results
            .iter()
            .map(|r| (r.pattern.clone(), r.freq))
            .collect()
    });
    (
        task.id().get(),
        task.status().as_str(),
        result,
        task.error().map(str::to_string),
    )
}

/// Binary transaction matrix to item lists; column `j` is item `j + 1`.
fn matrix_to_transactions(transactions: ArrayView2<i32>) -> Vec<Vec<ItemId>> {
    transactions
        .outer_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, &value)| value != 0)
                .map(|(col, _)| col as ItemId + 1)
                .collect()
        })
        .collect()
}

fn run(
    py: Python<'_>,
    transactions: Vec<Vec<ItemId>>,
    family: &str,
    params: BTreeMap<String, String>,
) -> PyResult<Vec<PyPattern>> {
    let family: Family = family.parse()?;
    let mined = py.allow_threads(move || {
        let db = TransactionDb::new(transactions)?;
        mine_family(&db, family, &params, &SearchConfig::default(), || false)
    })?;
    Ok(to_patterns(&mined))
}

#[pymodule]
fn motifs<'py>(m: &Bound<'py, PyModule>) -> PyResult<()> {
    #[pyfn(m)]
    #[pyo3(name = "mine", signature = (transactions, family, params = None))]
    fn mine_py(
        py: Python<'_>,
        transactions: Vec<Vec<ItemId>>,
        family: &str,
        params: Option<HashMap<String, String>>,
    ) -> PyResult<Vec<PyPattern>> {
        run(py, transactions, family, to_params(params))
    }

    #[pyfn(m)]
    #[pyo3(name = "mine_dense", signature = (transactions, family, params = None))]
    fn mine_dense_py<'py>(
        py: Python<'py>,
        transactions: PyReadonlyArray2<'py, i32>,
        family: &str,
        params: Option<HashMap<String, String>>,
    ) -> PyResult<Vec<PyPattern>> {
        let transactions = matrix_to_transactions(transactions.as_array());
        run(py, transactions, family, to_params(params))
    }

    // Task slot functions. submit_task returns None while a task holds the slot.
    #[pyfn(m)]
    #[pyo3(name = "submit_task", signature = (family, dataset, params = None))]
    fn submit_task_py(
        family: &str,
        dataset: &str,
        params: Option<HashMap<String, String>>,
    ) -> PyResult<Option<u64>> {
        let family: Family = family.parse()?;
        let query = Query {
            family,
            dataset: dataset.to_string(),
            params: to_params(params),
        };
        Ok(RUNNER.submit(query).ok().map(|task| task.id().get()))
    }

    #[pyfn(m)]
    #[pyo3(name = "task_status")]
    fn task_status_py() -> Option<PyTask> {
        RUNNER.status().map(|task| to_py_task(&task))
    }

    #[pyfn(m)]
    #[pyo3(name = "cancel_task")]
    fn cancel_task_py() -> bool {
        RUNNER.request_cancellation()
    }

    #[pyfn(m)]
    #[pyo3(name = "acknowledge_task")]
    fn acknowledge_task_py() -> bool {
        RUNNER.acknowledge()
    }

    #[pyfn(m)]
    #[pyo3(name = "wait_task")]
    fn wait_task_py(py: Python<'_>, timeout_secs: f64) -> PyResult<Option<PyTask>> {
        if !(timeout_secs.is_finite() && timeout_secs >= 0.0) {
            return Err(PyValueError::new_err("timeout_secs must be a non-negative number"));
        }
        let timeout = Duration::from_secs_f64(timeout_secs);
        let task = py.allow_threads(|| RUNNER.wait_for_terminal(timeout));
        Ok(task.map(|task| to_py_task(&task)))
    }

    Ok(())
}
