use std::{fs, path::Path};

use crate::{
    errors::{LedgerError, Result},
    storage::paths::ensure_dir,
};

use super::table::TableSnapshot;

/// Renders the snapshot as RFC-4180 CSV: header row first, then one line
/// per entry.
pub fn to_csv(table: &TableSnapshot) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.headers)
        .map_err(|err| LedgerError::ExportResource(err.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|err| LedgerError::ExportResource(err.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| LedgerError::ExportResource(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| LedgerError::ExportResource(err.to_string()))
}

pub fn write_csv_file(table: &TableSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let data = to_csv(table)?;
    fs::write(path, data)?;
    Ok(())
}
