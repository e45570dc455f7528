//! Line-item commands: add, list, remove, clear, and the history view.

use dialoguer::{Input, Select};

use crate::cli::context::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::export::table::{format_money, format_quantity, snapshot};
use crate::ledger::{AddOutcome, ItemDraft, UnitKind};

const ADD_USAGE: &str =
    "add <room> <category> <subcategory|-> <product> <length|count|piece|weight> <quantity> <unit_price>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Add a budget entry (wizard without arguments)",
            ADD_USAGE,
            cmd_add,
        ),
        CommandEntry::new(
            "allow-empty-subcategory",
            "Allow entries without a subcategory for this session",
            "allow-empty-subcategory",
            cmd_allow_empty_subcategory,
        ),
        CommandEntry::new("list", "List budget entries", "list", cmd_list),
        CommandEntry::new(
            "remove",
            "Remove the entry at an index from `list`",
            "remove <index>",
            cmd_remove,
        ),
        CommandEntry::new("clear", "Remove all entries", "clear", cmd_clear),
        CommandEntry::new(
            "history",
            "Show the snapshots recorded after each added entry",
            "history",
            cmd_history,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() {
        if context.mode() != CliMode::Interactive {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {}",
                ADD_USAGE
            )));
        }
        add_wizard(context)?
    } else {
        draft_from_args(args)?
    };

    submit_draft(context, draft)
}

fn submit_draft(context: &mut ShellContext, draft: ItemDraft) -> CommandResult {
    match context.ledger.add(draft.clone())? {
        AddOutcome::Added => {
            report_added(context);
            Ok(())
        }
        AddOutcome::Deferred => resolve_deferred(context, draft),
    }
}

/// The deferred add surfaces the one-shot acknowledgment. Interactive
/// sessions get a single confirmation; once accepted it stays accepted for
/// the rest of the session. Script sessions are pointed at the explicit
/// `allow-empty-subcategory` command instead.
fn resolve_deferred(context: &mut ShellContext, draft: ItemDraft) -> CommandResult {
    if context.mode() != CliMode::Interactive {
        output::warning(
            "Entry deferred: it has no subcategory. Run `allow-empty-subcategory` first, then add it again.",
        );
        return Ok(());
    }

    let proceed = context.confirm_action(
        "This entry has no subcategory. Add it (and future ones) without asking again?",
        false,
    )?;
    if !proceed {
        output::info("Entry not added.");
        return Ok(());
    }

    context.ledger.allow_missing_subcategory();
    match context.ledger.add(draft)? {
        AddOutcome::Added => report_added(context),
        AddOutcome::Deferred => {
            output::warning("Entry still deferred; nothing was added.");
        }
    }
    Ok(())
}

fn report_added(context: &ShellContext) {
    let index = context.ledger.len() - 1;
    let entry = &context.ledger.entries()[index];
    output::success(format!(
        "Added entry {}: {} ({} {} at {} {}), total {} {}.",
        index,
        entry.product,
        format_quantity(entry.quantity),
        entry.unit_type.label(),
        format_money(entry.unit_price),
        context.currency_symbol(),
        format_money(entry.total_cost),
        context.currency_symbol(),
    ));
}

fn draft_from_args(args: &[&str]) -> Result<ItemDraft, CommandError> {
    let &[room, category, subcategory, product, unit, quantity_arg, price_arg] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {}",
            ADD_USAGE
        )));
    };

    let unit_type = UnitKind::parse(unit).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown unit type `{}`. Available: length, count, piece, weight",
            unit
        ))
    })?;
    let quantity = parse_number(quantity_arg, "quantity")?;
    let unit_price = parse_number(price_arg, "unit price")?;

    let mut draft = ItemDraft::new(room, category, product, unit_type, unit_price)
        .with_quantity(quantity);
    if subcategory != "-" {
        draft = draft.with_subcategory(subcategory);
    }
    Ok(draft)
}

fn parse_number(value: &str, label: &str) -> Result<f64, CommandError> {
    value.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid {} `{}` (expected a number)", label, value))
    })
}

fn add_wizard(context: &ShellContext) -> Result<ItemDraft, CommandError> {
    let theme = &context.theme;

    let room: String = Input::with_theme(theme)
        .with_prompt("Room")
        .validate_with(require_text("Room"))
        .interact_text()?;
    let category: String = Input::with_theme(theme)
        .with_prompt("Category")
        .validate_with(require_text("Category"))
        .interact_text()?;
    let subcategory: String = Input::with_theme(theme)
        .with_prompt("Subcategory (leave empty for none)")
        .allow_empty(true)
        .interact_text()?;
    let product: String = Input::with_theme(theme)
        .with_prompt("Product")
        .validate_with(require_text("Product"))
        .interact_text()?;

    let labels: Vec<&str> = UnitKind::ALL.iter().map(|kind| kind.label()).collect();
    let unit_index = Select::with_theme(theme)
        .with_prompt("Unit type")
        .items(&labels)
        .default(0)
        .interact()?;

    let quantity: f64 = Input::with_theme(theme)
        .with_prompt("Quantity")
        .default(1.0)
        .validate_with(|value: &f64| -> Result<(), &str> {
            if value.is_finite() && *value > 0.0 {
                Ok(())
            } else {
                Err("Quantity must be greater than 0")
            }
        })
        .interact()?;
    let unit_price: f64 = Input::with_theme(theme)
        .with_prompt(format!("Unit price ({})", context.currency_symbol()))
        .validate_with(|value: &f64| -> Result<(), &str> {
            if value.is_finite() && *value >= 0.0 {
                Ok(())
            } else {
                Err("Unit price must not be negative")
            }
        })
        .interact()?;

    let mut draft = ItemDraft::new(room, category, product, UnitKind::ALL[unit_index], unit_price)
        .with_quantity(quantity);
    let subcategory = subcategory.trim();
    if !subcategory.is_empty() {
        draft = draft.with_subcategory(subcategory);
    }
    Ok(draft)
}

fn require_text(label: &'static str) -> impl Fn(&String) -> Result<(), String> {
    move |value: &String| {
        if value.trim().is_empty() {
            Err(format!("{} is required", label))
        } else {
            Ok(())
        }
    }
}

fn cmd_allow_empty_subcategory(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.ledger.subcategory_acknowledged() {
        output::info("Entries without a subcategory are already allowed.");
        return Ok(());
    }
    context.ledger.allow_missing_subcategory();
    output::success("Entries without a subcategory are now allowed for this session.");
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.ledger.is_empty() {
        output::info("The budget is empty. Use `add` to create an entry.");
        return Ok(());
    }

    let table_data = snapshot(&context.ledger, context.currency_symbol());
    let mut columns = vec![TableColumn::right("#")];
    for (index, header) in table_data.headers.iter().enumerate() {
        // Quantity and the two money columns read best right-aligned.
        if index >= 5 {
            columns.push(TableColumn::right(header));
        } else {
            columns.push(TableColumn::left(header));
        }
    }

    let mut table = Table::new(columns);
    for (index, row) in table_data.rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(row.len() + 1);
        cells.push(index.to_string());
        cells.extend(row.iter().cloned());
        table.add_row(cells);
    }

    println!("{}", table.render());
    output::info(format!("{} entries.", context.ledger.len()));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index_arg = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: remove <index> (see `list` for indices)".into())
    })?;
    let index: usize = index_arg.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid index `{}`", index_arg))
    })?;

    let removed = context.ledger.remove(index)?;
    output::success(format!(
        "Removed entry {}: {} ({}, {} {}).",
        index,
        removed.product,
        removed.room,
        format_money(removed.total_cost),
        context.currency_symbol(),
    ));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.ledger.is_empty() {
        output::info("The budget is already empty.");
        return Ok(());
    }

    let prompt = format!("Remove all {} entries?", context.ledger.len());
    if !context.confirm_action(&prompt, false)? {
        output::info("Clear cancelled.");
        return Ok(());
    }

    context.ledger.clear();
    output::success("Budget cleared.");
    Ok(())
}

fn cmd_history(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let history = context.ledger.history();
    if history.is_empty() {
        output::info("No history yet; a snapshot is recorded after every added entry.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Taken at (UTC)"),
        TableColumn::right("Entries"),
        TableColumn::right(format!("Subtotal ({})", context.currency_symbol())),
    ]);
    for (index, snap) in history.iter().enumerate() {
        let subtotal: f64 = snap.entries.iter().map(|entry| entry.total_cost).sum();
        table.add_row(vec![
            index.to_string(),
            snap.taken_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            snap.entries.len().to_string(),
            format_money(subtotal),
        ]);
    }

    println!("{}", table.render());
    output::info(format!("{} snapshots.", history.len()));
    Ok(())
}
