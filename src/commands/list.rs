use crate::config::MigrationConfig;
use crate::error::Result;
use crate::output::{self, Format};
use crate::store::discovery::discover_chapters;

pub fn run(config: &MigrationConfig, format: Format) -> Result<()> {
    let chapters = discover_chapters(&config.source_dir, &config.output_dir)?;
    output::print_chapters(&chapters, format)
}
