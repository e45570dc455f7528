pub mod commands;
pub mod context;
pub mod help;
pub mod output;
pub mod registry;
pub mod table;

mod shell;

pub use context::{CliError, CliMode, ShellContext};
pub use shell::run_cli;
