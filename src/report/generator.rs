use chrono::{Local, NaiveDate};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use crate::config::Settings;
use crate::error::Result;
use crate::report::output::{report_filename, write_report};
use crate::report::template::render_report;
use crate::storage::IncidentDatabase;

/// What a single invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Saved { path: PathBuf, report: String },
    NotFound { incident_id: i64 },
    Failed { message: String },
}

pub struct ReportGenerator {
    settings: Settings,
    report_date: Option<NaiveDate>,
}

impl ReportGenerator {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            report_date: None,
        }
    }

    /// Pin the date used in the file name instead of today's local date
    pub fn with_report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = Some(date);
        self
    }

    /// Generate the report, turning any failure into a printed error line.
    pub async fn run<W: Write>(&self, incident_id: i64, out: &mut W) -> ReportOutcome {
        match self.generate(incident_id, out).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Report generation for incident {} failed: {}", incident_id, e);
                let message = e.to_string();
                print_error_line(out, &message);
                ReportOutcome::Failed { message }
            }
        }
    }

    /// Connect, look up, render and persist. Once opened, the connection is
    /// closed on every path.
    pub async fn generate<W: Write>(&self, incident_id: i64, out: &mut W) -> Result<ReportOutcome> {
        let mut database = IncidentDatabase::connect(&self.settings.database).await?;
        info!("Connected to {} incident database", database.backend());

        let result = self.report_from(&mut database, incident_id, out).await;

        if let Err(e) = database.close().await {
            warn!("Failed to close database connection: {}", e);
        }

        result
    }

    async fn report_from<W: Write>(
        &self,
        database: &mut IncidentDatabase,
        incident_id: i64,
        out: &mut W,
    ) -> Result<ReportOutcome> {
        let Some(incident) = database.fetch_incident(incident_id).await? else {
            info!("Incident {} not found, no report written", incident_id);
            writeln!(out, "Incident {} not found", incident_id)?;
            return Ok(ReportOutcome::NotFound { incident_id });
        };

        debug!("Rendering report for {}", incident.summary());
        let report = render_report(&incident);
        writeln!(out, "{}", report)?;

        let date = self
            .report_date
            .unwrap_or_else(|| Local::now().date_naive());
        let filename = report_filename(incident_id, date);
        let path = write_report(&self.settings.output.directory, &filename, &report)?;

        writeln!(out, "Report saved to: {}", path.display())?;
        info!(
            "✓ Report for incident {} saved to {} (resolved: {})",
            incident_id,
            path.display(),
            incident.is_resolved()
        );

        Ok(ReportOutcome::Saved { path, report })
    }
}

/// Print the user-facing failure line. A broken output stream is logged
/// rather than raised.
pub fn print_error_line<W: Write>(out: &mut W, message: &str) {
    if let Err(e) = writeln!(out, "Error generating report: {}", message) {
        warn!("Failed to print error line: {}", e);
    }
}

/// Generate, print and save the report for one incident. Never returns an
/// error: failures are printed as `Error generating report: ...`.
pub async fn generate_incident_report<W: Write>(
    incident_id: i64,
    settings: &Settings,
    out: &mut W,
) -> ReportOutcome {
    ReportGenerator::new(settings.clone())
        .run(incident_id, out)
        .await
}
