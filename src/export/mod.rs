//! Stable export surfaces: tabular snapshot, CSV, and the printable
//! report.

pub mod report;
pub mod spreadsheet;
pub mod table;

pub use report::{PageEncoding, ReportOptions, DEFAULT_REPORT_TITLE};
pub use spreadsheet::{to_csv, write_csv_file};
pub use table::{snapshot, TableSnapshot, FIELD_LABELS, SHEET_NAME};
