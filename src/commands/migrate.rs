use crate::config::MigrationConfig;
use crate::error::Result;
use crate::output::{self, Format};
use crate::store::migration::{MigrateOptions, migrate};

pub fn run(config: &MigrationConfig, dry_run: bool, format: Format) -> Result<()> {
    if format == Format::Pretty {
        println!("Starting migration to chapter-based structure...");
    }

    let mut output_error = None;
    let summary = migrate(config, MigrateOptions { dry_run }, |event| {
        if output_error.is_none() {
            output_error = output::print_event(event, dry_run, format).err();
        }
    })?;

    if let Some(err) = output_error {
        return Err(err);
    }

    output::print_summary(&summary, format)
}
