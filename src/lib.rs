pub mod build_info;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod store;

pub use config::MigrationConfig;
pub use error::{MigrateError, Result};
pub use store::migration::{MigrateOptions, MigrationEvent, MigrationSummary, migrate};
