//! Named-budget storage commands: list, open, save, backups, restore.

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::storage::canonical_name;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("budgets", "List stored budgets", "budgets", cmd_budgets),
        CommandEntry::new(
            "open",
            "Open a stored budget, replacing the current entries",
            "open <name>",
            cmd_open,
        ),
        CommandEntry::new(
            "save",
            "Save the current budget under a name",
            "save [name]",
            cmd_save,
        ),
        CommandEntry::new(
            "backups",
            "List backups of a stored budget, newest first",
            "backups [name]",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Restore a stored budget from one of its backups",
            "restore <name> <backup_file>",
            cmd_restore,
        ),
    ]
}

fn cmd_budgets(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let names = context.store.list_budgets()?;
    if names.is_empty() {
        output::info("No stored budgets yet. Use `save <name>` to create one.");
        return Ok(());
    }

    output::section("Stored budgets");
    for name in names {
        let marker = if context.current_budget.as_deref() == Some(name.as_str()) {
            " (open)"
        } else {
            ""
        };
        output::info(format!("  {}{}", name, marker));
    }
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: open <name>".into()))?;

    let records = context.store.load(name)?;
    let count = context.ledger.load_records(records)?;

    let slug = canonical_name(name);
    context.current_budget = Some(slug.clone());
    context.update_last_opened(Some(&slug))?;
    output::success(format!("Opened budget `{}` ({} entries).", slug, count));
    Ok(())
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = match args.first() {
        Some(name) => name.to_string(),
        None => context.current_budget.clone().ok_or_else(|| {
            CommandError::InvalidArguments("usage: save <name> (no budget is open yet)".into())
        })?,
    };

    context.store.save(&context.ledger, &name)?;

    let slug = canonical_name(&name);
    context.current_budget = Some(slug.clone());
    context.update_last_opened(Some(&slug))?;
    output::success(format!(
        "Saved budget `{}` ({} entries).",
        slug,
        context.ledger.len()
    ));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = match args.first() {
        Some(name) => name.to_string(),
        None => context.current_budget.clone().ok_or_else(|| {
            CommandError::InvalidArguments("usage: backups <name> (no budget is open yet)".into())
        })?,
    };

    let backups = context.store.list_backups(&name)?;
    if backups.is_empty() {
        output::info(format!("No backups for `{}` yet.", canonical_name(&name)));
        return Ok(());
    }

    output::section(format!("Backups of `{}`", canonical_name(&name)));
    for backup in backups {
        output::info(format!("  {}", backup));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, backup) = match args {
        [name, backup] => (*name, *backup),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: restore <name> <backup_file> (see `backups <name>`)".into(),
            ))
        }
    };

    let records = context.store.restore(name, backup)?;
    let count = context.ledger.load_records(records)?;

    let slug = canonical_name(name);
    context.current_budget = Some(slug.clone());
    context.update_last_opened(Some(&slug))?;
    output::success(format!(
        "Restored budget `{}` from `{}` ({} entries).",
        slug, backup, count
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::context::script_context;
    use crate::cli::context::CommandError;
    use tempfile::TempDir;

    #[test]
    fn save_then_open_round_trips_entries() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        context
            .process_line("add Kitchen Floors Parquet Tile length 10 25")
            .expect("add");
        context.process_line("save household").expect("save");
        assert_eq!(context.current_budget.as_deref(), Some("household"));

        context.process_line("clear").expect("clear");
        assert!(context.ledger.is_empty());

        context.process_line("open household").expect("open");
        assert_eq!(context.ledger.len(), 1);
        assert_eq!(context.ledger.entries()[0].total_cost, 250.0);
        // Bulk replace, not a series of adds: the original snapshot stands alone.
        assert_eq!(context.ledger.history().len(), 1);
    }

    #[test]
    fn save_remembers_the_last_opened_budget() {
        let temp = TempDir::new().expect("temp dir");
        {
            let mut context = script_context(temp.path());
            context
                .process_line("add Kitchen Floors Parquet Tile length 10 25")
                .expect("add");
            context.process_line("save loft").expect("save");
        }

        let context = script_context(temp.path());
        assert_eq!(context.config.last_opened_budget.as_deref(), Some("loft"));
    }

    #[test]
    fn open_missing_budget_reports_storage_error() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        let err = context.process_line("open nowhere").unwrap_err();
        assert!(matches!(err, CommandError::Core(_)));
    }

    #[test]
    fn restore_needs_both_arguments() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        assert!(matches!(
            context.process_line("restore household"),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
