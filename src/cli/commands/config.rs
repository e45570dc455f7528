//! Persisted preferences: currency symbol and the default tax rate.

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::export::table::format_quantity;

use super::summary::parse_rate;

const CONFIG_USAGE: &str = "config [show|set <currency|tax-rate> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change persisted preferences",
        CONFIG_USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            let &[key, value] = &args[1..] else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: {}",
                    CONFIG_USAGE
                )));
            };
            set_config_value(context, key, value)
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: {}",
            CONFIG_USAGE
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    output::info(format!(
        "  Currency symbol  : {}",
        context.config.currency_symbol
    ));
    output::info(format!(
        "  Default tax rate : {}%",
        format_quantity(context.config.default_tax_rate)
    ));
    output::info(format!(
        "  Last opened      : {}",
        context
            .config
            .last_opened_budget
            .as_deref()
            .unwrap_or("(none)")
    ));
    output::info(format!(
        "  Config file      : {}",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    match key.to_lowercase().as_str() {
        "currency" => {
            if value.trim().is_empty() {
                return Err(CommandError::InvalidArguments(
                    "currency symbol must not be empty".into(),
                ));
            }
            context.config.currency_symbol = value.trim().to_string();
            context.persist_config()?;
            output::success(format!(
                "Currency symbol set to `{}`.",
                context.config.currency_symbol
            ));
            Ok(())
        }
        "tax-rate" => {
            let rate = parse_rate(value)?;
            context.config.default_tax_rate = rate.percent();
            // New sessions and the current one pick up the same default.
            context.tax_rate = rate;
            context.persist_config()?;
            output::success(format!(
                "Default tax rate set to {}%.",
                format_quantity(rate.percent())
            ));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown configuration key `{}`. usage: {}",
            other, CONFIG_USAGE
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::script_context;
    use tempfile::TempDir;

    #[test]
    fn set_currency_persists_across_contexts() {
        let temp = TempDir::new().expect("temp dir");
        {
            let mut context = script_context(temp.path());
            context.process_line("config set currency $").expect("set");
            assert_eq!(context.config.currency_symbol, "$");
        }
        let context = script_context(temp.path());
        assert_eq!(context.config.currency_symbol, "$");
    }

    #[test]
    fn set_tax_rate_updates_session_and_default() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        context
            .process_line("config set tax-rate 13")
            .expect("set rate");
        assert_eq!(context.tax_rate.percent(), 13.0);
        assert_eq!(context.config.default_tax_rate, 13.0);

        let reopened = script_context(temp.path());
        assert_eq!(reopened.tax_rate.percent(), 13.0);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        assert!(matches!(
            context.process_line("config set theme dark"),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
