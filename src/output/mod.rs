//! Report and result output
//!
//! - `config` - Output configuration types
//! - `report` - Colored per-file report for batch rewrites
//! - `json` - JSON output

mod config;
mod json;
mod report;

pub use config::OutputConfig;
pub use json::print_json;
pub use report::{Summary, print_reports, write_reports};
