use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::context::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

type ShellEditor = Editor<CommandHelper, DefaultHistory>;

/// Entry point for the shell. `RENOBUDGET_CLI_SCRIPT` switches the session
/// into non-interactive mode: commands are read from stdin and confirmation
/// prompts are auto-accepted, which is what the integration suite drives.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os("RENOBUDGET_CLI_SCRIPT").is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn build_editor(context: &ShellContext) -> Result<ShellEditor, CliError> {
    let mut editor = ShellEditor::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    Ok(editor)
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = build_editor(context)?;

    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while context.running {
        let Some(line) = lines.next() else {
            break;
        };
        match handle_line(context, &line?) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Cannot parse command line: {err}"));
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    // Completes the command word only; arguments are free-form.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let word_start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);

        // Anything non-blank before the current word means the command
        // word is already complete.
        if !prefix[..word_start].trim().is_empty() {
            return Ok((word_start, Vec::new()));
        }

        let needle = prefix[word_start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((word_start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::script_context;
    use tempfile::TempDir;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens =
            shell_words::split("add \"Living room\" Floors - Oak length 3 40").expect("parse");
        assert_eq!(tokens[1], "Living room");
        assert_eq!(tokens.len(), 8);
    }

    #[test]
    fn unbalanced_quotes_are_reported_not_fatal() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        let control = handle_line(&mut context, "add \"Kitchen").expect("handled");
        assert_eq!(control, LoopControl::Continue);
        assert!(context.ledger.is_empty());
    }

    #[test]
    fn handled_lines_are_remembered() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        handle_line(&mut context, "  help  ").expect("handled");
        assert_eq!(context.last_command.as_deref(), Some("help"));
    }

    #[test]
    fn exit_stops_the_session() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = script_context(temp.path());
        let control = handle_line(&mut context, "exit").expect("handled");
        assert_eq!(control, LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn completion_only_offers_the_first_word() {
        let helper = CommandHelper::new(vec!["help", "history", "exit"]);
        let history = DefaultHistory::new();
        let readline_ctx = ReadlineContext::new(&history);

        let (start, pairs) = helper.complete("hi", 2, &readline_ctx).expect("complete");
        assert_eq!(start, 0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "history");

        let (_, none) = helper
            .complete("history kit", 11, &readline_ctx)
            .expect("complete");
        assert!(none.is_empty());
    }
}
