use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MigrateError, Result};

/// Directories a migration run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Holds the monolithic `<chapter>.json` files and receives `backup/`.
    pub source_dir: PathBuf,
    /// Receives one `<chapter>/` directory per chapter.
    pub output_dir: PathBuf,
    pub markdown_source_dir: PathBuf,
    pub markdown_output_dir: PathBuf,
}

/// On-disk config file. Every field is optional; relative paths resolve
/// against the directory that contains the file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    markdown_source_dir: Option<PathBuf>,
    markdown_output_dir: Option<PathBuf>,
}

/// Per-directory overrides, applied on top of a base config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub markdown_source_dir: Option<PathBuf>,
    pub markdown_output_dir: Option<PathBuf>,
}

impl MigrationConfig {
    /// Same directory for input and chapter output, as a plain migration expects.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        markdown_source_dir: impl Into<PathBuf>,
        markdown_output_dir: impl Into<PathBuf>,
    ) -> Self {
        let source_dir = source_dir.into();
        Self {
            output_dir: source_dir.clone(),
            source_dir,
            markdown_source_dir: markdown_source_dir.into(),
            markdown_output_dir: markdown_output_dir.into(),
        }
    }

    /// The course extension layout under a project root.
    pub fn for_project(root: &Path) -> Self {
        let assets = root.join("src").join("assets");
        Self::new(
            assets.join("exercises"),
            assets.join("templates").join("markdown"),
            assets.join("templates").join("chapters"),
        )
    }

    /// Start from `for_project(root)` and apply the values found in `path`.
    pub fn load(path: &Path, root: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|err| MigrateError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let file: ConfigFile = serde_json::from_str(&data).map_err(|err| MigrateError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let resolve = |p: Option<PathBuf>| p.map(|p| base.join(p));

        Ok(Self::for_project(root).with_overrides(ConfigOverrides {
            source_dir: resolve(file.source_dir),
            output_dir: resolve(file.output_dir),
            markdown_source_dir: resolve(file.markdown_source_dir),
            markdown_output_dir: resolve(file.markdown_output_dir),
        }))
    }

    /// Replace the directories that are set. Moving `source_dir` without
    /// naming an `output_dir` moves the chapter output along with it.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        let output_follows_source = self.output_dir == self.source_dir;

        if let Some(source_dir) = overrides.source_dir {
            self.source_dir = source_dir;
        }
        match overrides.output_dir {
            Some(output_dir) => self.output_dir = output_dir,
            None if output_follows_source => self.output_dir = self.source_dir.clone(),
            None => {}
        }
        if let Some(dir) = overrides.markdown_source_dir {
            self.markdown_source_dir = dir;
        }
        if let Some(dir) = overrides.markdown_output_dir {
            self.markdown_output_dir = dir;
        }
        self
    }
}
