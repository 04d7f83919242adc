use chrono::{NaiveDateTime, Timelike};
use crate::storage::Incident;

pub const BANNER_WIDTH: usize = 60;
pub const REPORT_TITLE: &str = "SECURITY INCIDENT REPORT";
pub const UNRESOLVED: &str = "Not yet resolved";
pub const NOT_RECORDED: &str = "Not recorded";

/// Render `YYYY-MM-DD HH:MM:SS`, adding microseconds only when present.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

fn text_or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_RECORDED)
}

/// Render the fixed plaintext report for one incident.
pub fn render_report(incident: &Incident) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let resolved = incident
        .resolved_time
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| UNRESOLVED.to_string());

    format!(
        "
{banner}
{REPORT_TITLE}
{banner}

Incident ID: {id}
Type: {incident_type}
Severity: {severity}
Status: {status}
Assigned To: {assigned_to}

Description:
{description}

Detected: {detected}
Resolved: {resolved}

{banner}
",
        id = incident.incident_id,
        incident_type = text_or_missing(&incident.incident_type),
        severity = text_or_missing(&incident.severity),
        status = text_or_missing(&incident.status),
        assigned_to = text_or_missing(&incident.assigned_to),
        description = text_or_missing(&incident.description),
        detected = format_timestamp(&incident.detected_time),
    )
}
