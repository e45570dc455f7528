use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use renobudget::{config::ConfigManager, storage::BudgetStore};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated store and config manager backed by a unique base
/// directory for each test. The base path is returned so tests can place
/// scratch files next to the store.
#[allow(dead_code)]
pub fn setup_test_env() -> (BudgetStore, ConfigManager, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = BudgetStore::new(Some(base.clone()), Some(3)).expect("create budget store");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");

    (store, config_manager, base)
}
