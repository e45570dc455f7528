//! Shell state, dispatch, and command error plumbing.

use std::{io, path::PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    errors::LedgerError,
    ledger::{Ledger, TaxRate},
    storage::{paths, BudgetStore},
};

use super::commands;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Shell-level failures that abort the whole session.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

/// Failures raised and reported per command; the loop keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Everything a command handler can reach: the open ledger, the store and
/// configuration, and the session tax rate. One context per shell session;
/// the ledger is exclusively owned here, so no locking is involved.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: BudgetStore,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub ledger: Ledger,
    pub current_budget: Option<String>,
    pub tax_rate: TaxRate,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, paths::app_data_dir())
    }

    /// Builds a context rooted at an explicit data directory. Tests use
    /// this to keep sessions away from `~/.renobudget`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let store = BudgetStore::new(Some(base.clone()), None)?;
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;

        output::set_preferences(OutputPreferences {
            plain_mode: mode == CliMode::Script,
            quiet_mode: false,
        });

        let mut context = ShellContext {
            mode,
            registry,
            store,
            config_manager,
            tax_rate: TaxRate::new(config.default_tax_rate),
            config,
            ledger: Ledger::new(),
            current_budget: None,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        };

        context.auto_open_last();
        Ok(context)
    }

    /// Reopens the last saved budget when an interactive session starts.
    /// A stale name is ignored silently; the user just starts empty.
    fn auto_open_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(name) = self.config.last_opened_budget.clone() else {
            return;
        };
        let Ok(records) = self.store.load(&name) else {
            return;
        };
        if let Ok(count) = self.ledger.load_records(records) {
            self.current_budget = Some(name.clone());
            output::success(format!(
                "Automatically opened last budget `{}` ({} entries).",
                name, count
            ));
        }
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn currency_symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    pub(crate) fn prompt(&self) -> String {
        match &self.current_budget {
            Some(name) => format!("renobudget ({})> ", name),
            None => "renobudget> ".to_string(),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.confirm_action("Exit shell?", true).map_err(CliError::from)
    }

    /// Yes/no gate for destructive commands. Script mode auto-accepts:
    /// scripted sessions have no terminal to answer the prompt.
    pub(crate) fn confirm_action(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn persist_config(&self) -> Result<(), CommandError> {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    pub(crate) fn update_last_opened(&mut self, name: Option<&str>) -> CommandResult {
        self.config.last_opened_budget = name.map(|value| value.to_string());
        self.persist_config()
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }
}

#[cfg(test)]
pub(crate) fn script_context(base: &std::path::Path) -> ShellContext {
    ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())
        .expect("script context for tests")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn script_context_starts_empty() {
        let temp = TempDir::new().expect("temp dir");
        let context = script_context(temp.path());
        assert!(context.ledger.is_empty());
        assert!(context.current_budget.is_none());
        assert_eq!(context.tax_rate.percent(), 21.0);
        assert!(context.running);
    }

    #[test]
    fn prompt_reflects_open_budget() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        assert_eq!(context.prompt(), "renobudget> ");
        context.current_budget = Some("loft".into());
        assert_eq!(context.prompt(), "renobudget (loft)> ");
    }

    #[test]
    fn unknown_command_keeps_loop_running() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        let control = context.process_line("definitely-not-a-command").expect("dispatch");
        assert_eq!(control, LoopControl::Continue);
    }

    #[test]
    fn exit_command_requests_loop_exit() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        let control = context.process_line("exit").expect("dispatch");
        assert_eq!(control, LoopControl::Exit);
    }
}
