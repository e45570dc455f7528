use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, Result},
    ledger::{ItemRecord, Ledger},
};

use super::paths::{self, ensure_dir};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem store for budgets: `<root>/budgets/<slug>.json` for the live
/// files, timestamped copies under `<root>/backups/<slug>/`.
#[derive(Clone)]
pub struct BudgetStore {
    budgets_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl BudgetStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = root.unwrap_or_else(paths::app_data_dir);
        ensure_dir(&base)?;
        let budgets_dir = paths::budgets_dir_in(&base);
        let backups_dir = paths::backups_dir_in(&base);
        ensure_dir(&budgets_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            budgets_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn budget_path(&self, name: &str) -> PathBuf {
        self.budgets_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    /// Saves the ledger under `name`. The previous file, if any, is copied
    /// into the backup directory first; the new contents go through a
    /// temporary file and rename, so a failed write never truncates the
    /// existing budget.
    pub fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.budget_path(name);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let json = ledger.to_json()?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Reads the persisted array for `name`. Turning the records into
    /// ledger contents is the caller's move, via `Ledger::load_records`,
    /// so the bulk-replace semantics stay in one place.
    pub fn load(&self, name: &str) -> Result<Vec<ItemRecord>> {
        load_records_from_path(&self.budget_path(name))
    }

    pub fn save_to_path(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        save_ledger_to_path(ledger, path)
    }

    pub fn load_from_path(&self, path: &Path) -> Result<Vec<ItemRecord>> {
        load_records_from_path(path)
    }

    /// Slugged names of every stored budget, sorted.
    pub fn list_budgets(&self) -> Result<Vec<String>> {
        if !self.budgets_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.budgets_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Backup file names for `name`, newest first.
    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|stem| stem.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(file_name);
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    /// Copies the named backup over the live file and returns its records.
    pub fn restore(&self, name: &str, backup_name: &str) -> Result<Vec<ItemRecord>> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(LedgerError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let target = self.budget_path(name);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        fs::copy(&backup_path, &target)?;
        load_records_from_path(&target)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BACKUP_EXTENSION
        );
        fs::copy(path, dir.join(backup_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = ledger.to_json()?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_records_from_path(path: &Path) -> Result<Vec<ItemRecord>> {
    if !path.exists() {
        return Err(LedgerError::Storage(format!(
            "budget file `{}` not found",
            path.display()
        )));
    }
    let data = fs::read_to_string(path)?;
    let records: Vec<ItemRecord> = serde_json::from_str(&data)?;
    Ok(records)
}

pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "budget".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    let date_part = parts.get(parts.len() - 2)?;
    let time_part = parts.last()?;
    if !is_digits(date_part, 8) || !time_part.ends_with(".json") {
        return None;
    }
    let time_digits = &time_part[..time_part.len() - 5];
    if !is_digits(time_digits, 4) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_digits);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
