//! Import and the three export surfaces: JSON, CSV, printable report.

use std::path::Path;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::export::report::{write_report_file, PageEncoding, ReportOptions};
use crate::export::spreadsheet::write_csv_file;
use crate::export::table::snapshot;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "import",
            "Replace the current entries with a budget JSON file",
            "import <path>",
            cmd_import,
        ),
        CommandEntry::new(
            "export-json",
            "Write the current budget as JSON",
            "export-json <path>",
            cmd_export_json,
        ),
        CommandEntry::new(
            "export-csv",
            "Write the current budget as a CSV spreadsheet",
            "export-csv <path>",
            cmd_export_csv,
        ),
        CommandEntry::new(
            "export-report",
            "Write the printable budget report",
            "export-report <path> [--latin1]",
            cmd_export_report,
        ),
    ]
}

fn require_path<'a>(args: &[&'a str], usage: &str) -> Result<&'a Path, CommandError> {
    args.first()
        .copied()
        .map(Path::new)
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = require_path(args, "import <path>")?;
    let records = context.store.load_from_path(path)?;
    let count = context.ledger.load_records(records)?;
    output::success(format!(
        "Imported {} entries from `{}`.",
        count,
        path.display()
    ));
    Ok(())
}

fn cmd_export_json(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = require_path(args, "export-json <path>")?;
    context.store.save_to_path(&context.ledger, path)?;
    output::success(format!(
        "Exported {} entries to `{}`.",
        context.ledger.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_export_csv(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = require_path(args, "export-csv <path>")?;
    let table = snapshot(&context.ledger, context.currency_symbol());
    write_csv_file(&table, path)?;
    output::success(format!(
        "Exported {} entries to `{}`.",
        table.rows.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_export_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut encoding = PageEncoding::Utf8;
    let mut path = None;
    for arg in args {
        match *arg {
            "--latin1" => encoding = PageEncoding::Latin1,
            value if path.is_none() => path = Some(value),
            value => {
                return Err(CommandError::InvalidArguments(format!(
                    "unexpected argument `{}`. usage: export-report <path> [--latin1]",
                    value
                )))
            }
        }
    }
    let path = path.ok_or_else(|| {
        CommandError::InvalidArguments("usage: export-report <path> [--latin1]".into())
    })?;

    let options = ReportOptions {
        currency_symbol: context.currency_symbol().to_string(),
        encoding,
        ..ReportOptions::default()
    };
    write_report_file(&context.ledger, &options, Path::new(path))?;
    output::success(format!("Wrote budget report to `{}`.", path));
    Ok(())
}
