use anyhow::Context;
use clap::Parser;
use incident_report::{cli::Cli, config::{LoggingConfig, Settings}, print_error_line, ReportGenerator};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Pick up INCIDENT_DB_* variables from a local .env before clap reads them
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Failures are reported, not propagated as an exit status
    if let Err(e) = run(cli).await {
        print_error_line(&mut std::io::stdout(), &format!("{:#}", e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_to(&mut settings);
    settings.validate()?;

    init_logging(&settings.logging);

    info!("Incident Report Generator v{}", env!("CARGO_PKG_VERSION"));
    if let Some(config) = &cli.config {
        info!("Configuration loaded from: {}", config.display());
    }

    let generator = ReportGenerator::new(settings);
    let mut stdout = std::io::stdout();
    generator.run(cli.incident_id, &mut stdout).await;

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    // stdout carries the report; diagnostics go to stderr
    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
