use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".renobudget";
const BUDGET_DIR: &str = "budgets";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.renobudget`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("RENOBUDGET_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the managed budget files under the given base.
pub fn budgets_dir_in(base: &Path) -> PathBuf {
    base.join(BUDGET_DIR)
}

/// Directory holding per-budget backup snapshots under the given base.
pub fn backups_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

/// Path of the configuration file under the given base.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Creates the directory (and parents) when missing.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
