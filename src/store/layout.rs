use std::path::{Path, PathBuf};

use crate::config::MigrationConfig;
use crate::error::{MigrateError, Result};

pub const BACKUP_DIR: &str = "backup";
pub const CHAPTER_INFO_FILE: &str = "chapter-info.json";

/// Every path touched while migrating one chapter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLayout {
    name: String,
    source_file: PathBuf,
    backup_dir: PathBuf,
    chapter_dir: PathBuf,
    markdown_source: PathBuf,
    markdown_output_dir: PathBuf,
}

impl ChapterLayout {
    pub fn new(config: &MigrationConfig, source_file: &Path) -> Result<Self> {
        let name = chapter_name(source_file)?;
        let file_name = format!("{name}.md");

        Ok(Self {
            backup_dir: config.source_dir.join(BACKUP_DIR),
            chapter_dir: config.output_dir.join(&name),
            markdown_source: config.markdown_source_dir.join(&file_name),
            markdown_output_dir: config.markdown_output_dir.clone(),
            source_file: source_file.to_path_buf(),
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn backup_file(&self) -> PathBuf {
        match self.source_file.file_name() {
            Some(file_name) => self.backup_dir.join(file_name),
            None => self.backup_dir.join(format!("{}.json", self.name)),
        }
    }

    pub fn chapter_dir(&self) -> &Path {
        &self.chapter_dir
    }

    pub fn info_path(&self) -> PathBuf {
        self.chapter_dir.join(CHAPTER_INFO_FILE)
    }

    pub fn exercise_file_name(&self, exercise_name: &str) -> String {
        format!("{}-{}.json", self.name, exercise_name)
    }

    pub fn exercise_path(&self, exercise_name: &str) -> PathBuf {
        self.chapter_dir.join(self.exercise_file_name(exercise_name))
    }

    pub fn markdown_source(&self) -> &Path {
        &self.markdown_source
    }

    pub fn markdown_output_dir(&self) -> &Path {
        &self.markdown_output_dir
    }

    pub fn markdown_target(&self) -> PathBuf {
        self.markdown_output_dir.join(format!("{}.md", self.name))
    }
}

/// File name without its `.json` extension.
pub fn chapter_name(source_file: &Path) -> Result<String> {
    source_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            MigrateError::invalid_chapter(source_file, "file name is not valid UTF-8 or is empty")
        })
}
