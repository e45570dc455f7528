pub mod json_backend;
pub mod paths;

pub use json_backend::{
    canonical_name, load_records_from_path, save_ledger_to_path, BudgetStore,
};
