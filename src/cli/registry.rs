use std::collections::HashMap;

use crate::cli::context::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One dispatchable shell command: metadata for `help` plus the handler.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Ordered command table. Registration order drives the `help` listing;
/// lookups go through the name index. Re-registering a name replaces the
/// entry but keeps its original position.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.index.get(entry.name) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(entry.name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Registers a command group in its definition order.
    pub fn register_group(&mut self, entries: Vec<CommandEntry>) {
        for entry in entries {
            self.register(entry);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}
