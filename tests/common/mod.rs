#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use incident_report::config::Settings;
use incident_report::storage::Incident;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::PathBuf;
use tempfile::TempDir;

pub const SCHEMA: &str = include_str!("../../schema/security_incidents.sql");

/// Same columns as the reference schema, without the primary key.
pub const SCHEMA_WITHOUT_KEY: &str = "CREATE TABLE security_incidents (
    incident_id   BIGINT NOT NULL,
    incident_type TEXT NOT NULL,
    severity      TEXT NOT NULL,
    description   TEXT NOT NULL,
    detected_time TIMESTAMP NOT NULL,
    resolved_time TIMESTAMP,
    status        TEXT NOT NULL,
    assigned_to   TEXT NOT NULL
)";

/// Reference columns with every text column nullable.
pub const SCHEMA_NULLABLE_TEXT: &str = "CREATE TABLE security_incidents (
    incident_id   BIGINT PRIMARY KEY,
    incident_type TEXT,
    severity      TEXT,
    description   TEXT,
    detected_time TIMESTAMP NOT NULL,
    resolved_time TIMESTAMP,
    status        TEXT,
    assigned_to   TEXT
)";

/// A SQLite incident database plus an empty report directory.
pub struct Fixture {
    pub dir: TempDir,
    pub db_path: PathBuf,
    pub reports: PathBuf,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_schema(SCHEMA).await
    }

    pub async fn with_schema(schema: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("incidents.db");
        let reports = dir.path().join("reports");
        std::fs::create_dir(&reports).expect("reports dir");

        let fixture = Self { dir, db_path, reports };
        let mut conn = fixture.connect().await;
        sqlx::raw_sql(schema).execute(&mut conn).await.expect("schema");
        conn.close().await.expect("close");
        fixture
    }

    /// Writable connection for seeding
    pub async fn connect(&self) -> SqliteConnection {
        SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true)
            .connect()
            .await
            .expect("open fixture database")
    }

    pub async fn insert(&self, incident: &Incident) {
        let mut conn = self.connect().await;
        sqlx::query(
            "INSERT INTO security_incidents
             (incident_id, incident_type, severity, description, detected_time, resolved_time, status, assigned_to)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(incident.incident_id)
        .bind(&incident.incident_type)
        .bind(&incident.severity)
        .bind(&incident.description)
        .bind(incident.detected_time)
        .bind(incident.resolved_time)
        .bind(&incident.status)
        .bind(&incident.assigned_to)
        .execute(&mut conn)
        .await
        .expect("insert incident");
        conn.close().await.expect("close");
    }

    pub async fn set_status(&self, incident_id: i64, status: &str) {
        let mut conn = self.connect().await;
        sqlx::query("UPDATE security_incidents SET status = ? WHERE incident_id = ?")
            .bind(status)
            .bind(incident_id)
            .execute(&mut conn)
            .await
            .expect("update status");
        conn.close().await.expect("close");
    }

    pub async fn count(&self) -> i64 {
        let mut conn = self.connect().await;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM security_incidents")
            .fetch_one(&mut conn)
            .await
            .expect("count");
        conn.close().await.expect("close");
        count
    }

    pub fn dsn(&self) -> String {
        format!("sqlite:{}", self.db_path.display())
    }

    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.database.dsn = Some(self.dsn());
        settings.output.directory = self.reports.clone();
        settings
    }

    pub fn report_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.reports)
            .expect("read reports dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

pub fn phishing_incident() -> Incident {
    Incident {
        incident_id: 1042,
        incident_type: Some("Phishing".to_string()),
        severity: Some("High".to_string()),
        description: Some("Credential harvesting email reported by finance.".to_string()),
        detected_time: ts(2024, 3, 5, 9, 15, 0),
        resolved_time: None,
        status: Some("open".to_string()),
        assigned_to: Some("soc-tier2".to_string()),
    }
}

pub fn malware_incident() -> Incident {
    Incident {
        incident_id: 2001,
        incident_type: Some("Malware".to_string()),
        severity: Some("Critical".to_string()),
        description: Some("Ransomware beacon blocked on build host.".to_string()),
        detected_time: ts(2024, 2, 28, 22, 4, 11),
        resolved_time: Some(ts(2024, 3, 1, 6, 30, 0)),
        status: Some("closed".to_string()),
        assigned_to: Some("ir-oncall".to_string()),
    }
}

pub fn output_text(out: Vec<u8>) -> String {
    String::from_utf8(out).expect("utf-8 output")
}
