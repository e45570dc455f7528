//! Ledger domain models, persistence-friendly records, and aggregation.

pub mod item;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;
pub mod summary;

pub use item::{ItemDraft, LineItem, UnitKind, NO_SUBCATEGORY};
pub use ledger::{AddOutcome, HistorySnapshot, Ledger};
pub use record::ItemRecord;
pub use summary::{BudgetSummary, TaxRate, MAX_TAX_RATE_PERCENT};
