pub mod budgets;
pub mod config;
pub mod entry;
pub mod exports;
pub mod summary;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_group(system::definitions());
    registry.register_group(entry::definitions());
    registry.register_group(summary::definitions());
    registry.register_group(budgets::definitions());
    registry.register_group(exports::definitions());
    registry.register_group(config::definitions());
}
