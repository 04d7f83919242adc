pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod storage;

pub use error::{ReportError, Result};
pub use report::{generate_incident_report, print_error_line, ReportGenerator, ReportOutcome};
