use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::error::Result;

/// `incident_report_<id>_<YYYYMMDD>.txt`
pub fn report_filename(incident_id: i64, date: NaiveDate) -> String {
    format!("incident_report_{}_{}.txt", incident_id, date.format("%Y%m%d"))
}

/// Write the report into `directory`, replacing any same-day file for the id.
pub fn write_report(directory: &Path, filename: &str, report: &str) -> Result<PathBuf> {
    // The working directory keeps the bare file name
    let path = if directory == Path::new(".") {
        PathBuf::from(filename)
    } else {
        directory.join(filename)
    };
    fs::write(&path, report)?;
    debug!("Wrote {} bytes to {}", report.len(), path.display());
    Ok(path)
}
