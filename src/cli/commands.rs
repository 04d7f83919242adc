use clap::Parser;
use std::path::PathBuf;
use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "incident-report")]
#[command(about = "Generate a security incident report from the incident database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Incident ID
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub incident_id: i64,

    /// Database username
    #[arg(long, env = "INCIDENT_DB_USERNAME")]
    pub username: Option<String>,

    /// Database password
    #[arg(long, env = "INCIDENT_DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database DSN (postgres://..., host[:port]/service or sqlite:path)
    #[arg(long, env = "INCIDENT_DB_DSN")]
    pub dsn: Option<String>,

    /// Path to an optional YAML configuration file
    #[arg(short, long, env = "INCIDENT_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the report file is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    /// Layer flags (and their environment fallbacks) over file settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(dsn) = &self.dsn {
            settings.database.dsn = Some(dsn.clone());
        }
        if let Some(username) = &self.username {
            settings.database.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            settings.database.password = Some(password.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output.directory = output_dir.clone();
        }
    }
}
