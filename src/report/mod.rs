pub mod generator;
pub mod output;
pub mod template;

pub use generator::{generate_incident_report, print_error_line, ReportGenerator, ReportOutcome};
pub use output::report_filename;
pub use template::render_report;
