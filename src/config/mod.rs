pub mod settings;

pub use settings::{DatabaseConfig, LoggingConfig, OutputConfig, Settings};
