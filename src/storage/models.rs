use chrono::NaiveDateTime;

/// A row of `security_incidents`. The tool only ever reads these.
///
/// Text columns are optional so a NULL decodes the same way on every backend.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Incident {
    pub incident_id: i64,
    pub incident_type: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub detected_time: NaiveDateTime,
    pub resolved_time: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

impl Incident {
    pub fn is_resolved(&self) -> bool {
        self.resolved_time.is_some()
    }

    /// Short form for log lines
    pub fn summary(&self) -> String {
        format!(
            "#{} [{}] {} ({})",
            self.incident_id,
            self.severity.as_deref().unwrap_or("-"),
            self.incident_type.as_deref().unwrap_or("-"),
            self.status.as_deref().unwrap_or("-")
        )
    }
}
