use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::MigrationConfig;
use crate::error::{MigrateError, Result};
use crate::model::{ChapterDocument, ChapterId};
use crate::store::files::{copy_preserving_times, json_file_paths, write_json_pretty};
use crate::store::layout::{CHAPTER_INFO_FILE, ChapterLayout};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Validate every chapter and report what would be written, touching nothing.
    pub dry_run: bool,
}

/// Progress notifications, delivered in the order the steps happen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MigrationEvent {
    NothingToDo { source_dir: PathBuf },
    Discovered { source_dir: PathBuf, count: usize },
    ChapterStarted { chapter: String },
    BackedUp { chapter: String, path: PathBuf },
    DirectoryCreated { chapter: String, path: PathBuf },
    MetadataWritten { chapter: String, path: PathBuf },
    ExerciseWritten { chapter: String, path: PathBuf },
    MarkdownCopied { chapter: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterReport {
    pub chapter: String,
    pub id: ChapterId,
    pub title: String,
    /// Absent on dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    pub directory: PathBuf,
    pub exercise_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationSummary {
    pub source_dir: PathBuf,
    pub dry_run: bool,
    pub chapters: Vec<ChapterReport>,
}

impl MigrationSummary {
    /// No chapter files were found. Not an error: the source may already be migrated.
    pub fn nothing_to_do(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn exercise_count(&self) -> usize {
        self.chapters.iter().map(|c| c.exercise_files.len()).sum()
    }
}

/// Split every top-level `<chapter>.json` in `config.source_dir` into a
/// `<chapter>/` directory holding `chapter-info.json` plus one file per
/// exercise. Stops at the first chapter that fails; chapters already written
/// stay on disk and the originals are never removed.
pub fn migrate<F>(
    config: &MigrationConfig,
    options: MigrateOptions,
    mut on_event: F,
) -> Result<MigrationSummary>
where
    F: FnMut(&MigrationEvent),
{
    let paths = json_file_paths(&config.source_dir)?;

    let mut summary = MigrationSummary {
        source_dir: config.source_dir.clone(),
        dry_run: options.dry_run,
        chapters: Vec::with_capacity(paths.len()),
    };

    if paths.is_empty() {
        on_event(&MigrationEvent::NothingToDo {
            source_dir: config.source_dir.clone(),
        });
        return Ok(summary);
    }

    on_event(&MigrationEvent::Discovered {
        source_dir: config.source_dir.clone(),
        count: paths.len(),
    });

    for path in &paths {
        let report = migrate_chapter(config, path, options, &mut on_event)?;
        summary.chapters.push(report);
    }

    Ok(summary)
}

/// Migrate a single chapter file: backup, load and validate, then write.
pub fn migrate_chapter(
    config: &MigrationConfig,
    source_file: &Path,
    options: MigrateOptions,
    on_event: &mut dyn FnMut(&MigrationEvent),
) -> Result<ChapterReport> {
    let layout = ChapterLayout::new(config, source_file)?;
    check_layout(&layout)?;
    let chapter = layout.name().to_string();

    on_event(&MigrationEvent::ChapterStarted {
        chapter: chapter.clone(),
    });

    // Nothing below may run before the original is safely copied.
    let backup = if options.dry_run {
        None
    } else {
        let path = backup_chapter(&layout)?;
        on_event(&MigrationEvent::BackedUp {
            chapter: chapter.clone(),
            path: path.clone(),
        });
        Some(path)
    };

    let document = ChapterDocument::load(source_file)?;
    check_exercise_file_names(&layout, &document)?;

    if !layout.chapter_dir().is_dir() {
        if !options.dry_run {
            fs::create_dir_all(layout.chapter_dir())?;
        }
        on_event(&MigrationEvent::DirectoryCreated {
            chapter: chapter.clone(),
            path: layout.chapter_dir().to_path_buf(),
        });
    }

    let info_path = layout.info_path();
    if !options.dry_run {
        write_json_pretty(&info_path, &document.metadata())?;
    }
    on_event(&MigrationEvent::MetadataWritten {
        chapter: chapter.clone(),
        path: info_path,
    });

    let ChapterDocument { id, title, exercises, .. } = document;

    let mut exercise_files = Vec::with_capacity(exercises.len());
    for mut exercise in exercises {
        exercise.set_chapter_id(&id);
        let path = layout.exercise_path(exercise.name());
        if !options.dry_run {
            write_json_pretty(&path, &exercise)?;
        }
        exercise_files.push(layout.exercise_file_name(exercise.name()));
        on_event(&MigrationEvent::ExerciseWritten {
            chapter: chapter.clone(),
            path,
        });
    }

    // A directory in place of the markdown file fails on the copy.
    let markdown = if layout.markdown_source().exists() {
        let target = layout.markdown_target();
        if !options.dry_run {
            fs::create_dir_all(layout.markdown_output_dir())?;
            copy_preserving_times(layout.markdown_source(), &target)?;
        }
        on_event(&MigrationEvent::MarkdownCopied {
            chapter: chapter.clone(),
            path: target.clone(),
        });
        Some(target)
    } else {
        None
    };

    Ok(ChapterReport {
        chapter,
        id,
        title,
        backup,
        directory: layout.chapter_dir().to_path_buf(),
        exercise_files,
        markdown,
    })
}

fn backup_chapter(layout: &ChapterLayout) -> Result<PathBuf> {
    let target = layout.backup_file();
    fs::create_dir_all(layout.backup_dir())
        .and_then(|()| copy_preserving_times(layout.source_file(), &target))
        .map_err(|source| MigrateError::Backup {
            path: layout.source_file().to_path_buf(),
            source,
        })?;
    Ok(target)
}

/// A chapter named `backup` would write into the backup directory.
fn check_layout(layout: &ChapterLayout) -> Result<()> {
    if layout.chapter_dir() == layout.backup_dir() {
        return Err(MigrateError::invalid_chapter(
            layout.source_file(),
            format!(
                "chapter directory '{}' would collide with the backup directory",
                layout.chapter_dir().display()
            ),
        ));
    }
    Ok(())
}

fn check_exercise_file_names(layout: &ChapterLayout, document: &ChapterDocument) -> Result<()> {
    for exercise in &document.exercises {
        if layout.exercise_file_name(exercise.name()) == CHAPTER_INFO_FILE {
            return Err(MigrateError::invalid_chapter(
                layout.source_file(),
                format!(
                    "exercise '{}' would overwrite {CHAPTER_INFO_FILE}",
                    exercise.name()
                ),
            ));
        }
    }
    Ok(())
}
