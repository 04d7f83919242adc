pub mod database;
pub mod models;

pub use database::{Backend, IncidentDatabase, Locator};
pub use models::Incident;
