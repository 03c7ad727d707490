#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use splitbite::{
    config::ConfigManager,
    core::Session,
    domain::{Expense, ExpenseDraft},
    storage::{JsonFileStore, SplitStore},
    utils::paths::store_dir_in,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory laid out like `~/.splitbite`.
pub fn setup_test_env() -> (PathBuf, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, config_manager)
}

/// A fresh file-backed store under `base`.
pub fn file_store(base: &Path) -> SplitStore {
    let backend = JsonFileStore::new(store_dir_in(base)).expect("create json file store");
    SplitStore::new(backend)
}

pub fn open_session(base: &Path) -> Session {
    Session::open(file_store(base)).expect("open session")
}

/// Records an expense paid by the member at 1-based `payer`.
pub fn record(session: &mut Session, date: &str, amount: f64, payer: usize, what: &str) -> Expense {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date");
    let paid_by = session.members()[payer - 1].id;
    session
        .add_expense(ExpenseDraft::new(date, what, amount, paid_by))
        .expect("add expense")
}
