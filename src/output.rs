use std::path::Path;

use clap::ValueEnum;
use colored::Colorize;

use crate::error::Result;
use crate::store::discovery::{ChapterFormat, DiscoveredChapter};
use crate::store::migration::{MigrationEvent, MigrationSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One line per event: human text for pretty, a JSON object for json.
pub fn print_event(event: &MigrationEvent, dry_run: bool, format: Format) -> Result<()> {
    if format == Format::Json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let verb = |done: &'static str, planned: &'static str| if dry_run { planned } else { done };

    match event {
        MigrationEvent::NothingToDo { source_dir } => println!(
            "No JSON files found in {}. Already migrated?",
            source_dir.display()
        ),
        MigrationEvent::Discovered { count, .. } => {
            let mode = if dry_run { " (dry-run)" } else { "" };
            println!(
                "Found {} JSON files to migrate{}",
                count.to_string().bold(),
                mode.dimmed()
            );
        }
        MigrationEvent::ChapterStarted { chapter } => {
            println!("Processing chapter: {}", chapter.cyan().bold())
        }
        MigrationEvent::BackedUp { path, .. } => println!(
            "  - Backed up {} to backup directory",
            file_name(path)
        ),
        MigrationEvent::DirectoryCreated { path, .. } => println!(
            "  - {} directory: {}",
            verb("Created", "Would create"),
            path.display()
        ),
        MigrationEvent::MetadataWritten { path, .. } => println!(
            "  - {} {}",
            verb("Created", "Would write"),
            file_name(path)
        ),
        MigrationEvent::ExerciseWritten { path, .. } => println!(
            "  - {} exercise file: {}",
            verb("Created", "Would create"),
            file_name(path)
        ),
        MigrationEvent::MarkdownCopied { path, .. } => println!(
            "  - {} markdown file to {}",
            verb("Copied", "Would copy"),
            path.parent().unwrap_or(path).display()
        ),
    }
    Ok(())
}

pub fn print_summary(summary: &MigrationSummary, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let mut value = serde_json::to_value(summary)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("event".into(), "summary".into());
            }
            println!("{}", serde_json::to_string(&value)?);
        }
        Format::Pretty => {
            if summary.nothing_to_do() {
                return Ok(());
            }
            println!();
            if summary.dry_run {
                println!(
                    "{} {} chapters, {} exercise files would be written",
                    "Dry run complete:".bold(),
                    summary.chapters.len(),
                    summary.exercise_count()
                );
            } else {
                println!("{}", "Migration completed successfully!".green().bold());
                println!(
                    "You can verify the new structure and then remove the files in the backup directory."
                );
            }
        }
    }
    Ok(())
}

pub fn print_chapters(chapters: &[DiscoveredChapter], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(chapters)?),
        Format::Pretty => {
            if chapters.is_empty() {
                println!("{}", "No chapters found.".dimmed());
                return Ok(());
            }
            for chapter in chapters {
                let leftover = if chapter.legacy_file && chapter.format == ChapterFormat::Directory {
                    " (original file still present)".yellow().to_string()
                } else {
                    String::new()
                };
                println!(
                    "{} {:10} {:3} exercises  {}{}",
                    format!("{:20}", chapter.name).bold(),
                    chapter.format.to_string(),
                    chapter.exercises,
                    chapter.title,
                    leftover
                );
            }
        }
    }
    Ok(())
}
