use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::build_info;
use crate::config::{ConfigOverrides, MigrationConfig};
use crate::error::Result;
use crate::output::Format;

#[derive(Parser)]
#[command(
    name = "chapter-migrate",
    version,
    long_version = build_info::long_version(),
    about = "Split monolithic chapter JSON files into per-exercise directories"
)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    format: Format,
    /// Project root holding src/assets (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// JSON file with source_dir/output_dir/markdown_source_dir/markdown_output_dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the <chapter>.json files
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,
    /// Directory receiving the <chapter>/ directories (defaults to --source-dir)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
    /// Directory holding <chapter>.md companions
    #[arg(long, global = true)]
    markdown_dir: Option<PathBuf>,
    /// Directory the markdown companions are copied into
    #[arg(long, global = true)]
    chapters_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every chapter file (the default when no command is given)
    Migrate {
        /// Validate and report without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List chapters in the source directory, migrated or not
    List,
}

impl Cli {
    fn migration_config(&self) -> Result<MigrationConfig> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let base = match &self.config {
            Some(path) => MigrationConfig::load(path, &root)?,
            None => MigrationConfig::for_project(&root),
        };
        Ok(base.with_overrides(ConfigOverrides {
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            markdown_source_dir: self.markdown_dir.clone(),
            markdown_output_dir: self.chapters_dir.clone(),
        }))
    }
}

fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    let config = cli.migration_config()?;

    match cli.command.unwrap_or(Commands::Migrate { dry_run: false }) {
        Commands::Migrate { dry_run } => crate::commands::migrate::run(&config, dry_run, format),
        Commands::List => crate::commands::list::run(&config, format),
    }
}

/// Parse arguments, run, report any error on stderr, and return the exit code.
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    let format = cli.format;
    match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            match format {
                Format::Json => {
                    eprintln!(
                        "{}",
                        serde_json::json!({
                            "error": e.code(),
                            "message": e.to_string()
                        })
                    );
                }
                Format::Pretty => eprintln!("error: {e}"),
            }
            1
        }
    }
}
