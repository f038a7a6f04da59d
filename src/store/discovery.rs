use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MigrateError, Result};
use crate::model::{ChapterDocument, ChapterId};
use crate::store::files::json_file_paths;
use crate::store::layout::{CHAPTER_INFO_FILE, chapter_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterFormat {
    /// `<chapter>/chapter-info.json` plus one file per exercise.
    Directory,
    /// A single top-level `<chapter>.json`.
    Legacy,
}

impl std::fmt::Display for ChapterFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredChapter {
    pub name: String,
    pub id: ChapterId,
    pub title: String,
    pub format: ChapterFormat,
    pub exercises: usize,
    /// The original single-file chapter still sits next to the migrated directory.
    pub legacy_file: bool,
    pub path: PathBuf,
}

#[derive(Deserialize)]
struct ChapterInfo {
    id: Value,
    title: String,
}

/// List every chapter, migrated or not, sorted by name. Migrated chapter
/// directories are read from `output_dir`, single-file chapters from
/// `source_dir`; the two may be the same directory.
pub fn discover_chapters(source_dir: &Path, output_dir: &Path) -> Result<Vec<DiscoveredChapter>> {
    let mut chapters = migrated_chapters(output_dir)?;

    for path in json_file_paths(source_dir)? {
        let name = chapter_name(&path)?;
        if let Some(migrated) = chapters
            .iter_mut()
            .find(|c| c.format == ChapterFormat::Directory && c.name == name)
        {
            migrated.legacy_file = true;
            continue;
        }
        chapters.push(read_legacy_chapter(&path, name)?);
    }

    chapters.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(chapters)
}

fn migrated_chapters(dir: &Path) -> Result<Vec<DiscoveredChapter>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut chapters = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let info_path = path.join(CHAPTER_INFO_FILE);
        if !info_path.is_file() {
            continue;
        }
        chapters.push(read_directory_chapter(&path, &info_path)?);
    }

    Ok(chapters)
}

fn read_directory_chapter(dir: &Path, info_path: &Path) -> Result<DiscoveredChapter> {
    let data = fs::read_to_string(info_path)?;
    let info: ChapterInfo = serde_json::from_str(&data)
        .map_err(|err| MigrateError::invalid_chapter(info_path, err.to_string()))?;
    let id = ChapterId::from_value(info.id).ok_or_else(|| {
        MigrateError::invalid_chapter(info_path, "field `id` must be a string, number or boolean")
    })?;

    let exercises = json_file_paths(dir)?
        .iter()
        .filter(|p| !p.ends_with(CHAPTER_INFO_FILE))
        .count();

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(DiscoveredChapter {
        name,
        id,
        title: info.title,
        format: ChapterFormat::Directory,
        exercises,
        legacy_file: false,
        path: dir.to_path_buf(),
    })
}

fn read_legacy_chapter(path: &Path, name: String) -> Result<DiscoveredChapter> {
    let document = ChapterDocument::load(path)?;

    Ok(DiscoveredChapter {
        name,
        id: document.id,
        title: document.title,
        format: ChapterFormat::Legacy,
        exercises: document.exercises.len(),
        legacy_file: true,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MigrationConfig;
    use crate::store::migration::{MigrateOptions, migrate};
    use tempfile::tempdir;

    #[test]
    fn lists_legacy_chapters_before_migration() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"id": "b", "title": "Bee", "exercises": [{"name": "x"}, {"name": "y"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("a.json"), r#"{"id": 1, "title": "Ay"}"#).unwrap();

        let chapters = discover_chapters(dir.path(), dir.path()).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].name, "a");
        assert_eq!(chapters[0].format, ChapterFormat::Legacy);
        assert_eq!(chapters[1].title, "Bee");
        assert_eq!(chapters[1].exercises, 2);
    }

    #[test]
    fn migrated_chapters_are_reported_once_and_flag_the_leftover_original() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("exercises");
        fs::create_dir_all(&source).unwrap();
        fs::write(
            source.join("intro.json"),
            r#"{"id": "ch1", "title": "Intro", "exercises": [{"name": "e1"}, {"name": "e2"}]}"#,
        )
        .unwrap();
        let config = MigrationConfig::new(&source, dir.path().join("md"), dir.path().join("out"));
        migrate(&config, MigrateOptions::default(), |_| {}).unwrap();

        let chapters = discover_chapters(&source, &source).unwrap();
        assert_eq!(chapters.len(), 1, "backup dir and original file fold away");
        let intro = &chapters[0];
        assert_eq!(intro.format, ChapterFormat::Directory);
        assert_eq!(intro.id, ChapterId::from("ch1"));
        assert_eq!(intro.exercises, 2);
        assert!(intro.legacy_file);

        fs::remove_file(source.join("intro.json")).unwrap();
        let chapters = discover_chapters(&source, &source).unwrap();
        assert!(!chapters[0].legacy_file);
    }

    #[test]
    fn separate_output_dir_is_read_for_migrated_chapters() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("exercises");
        fs::create_dir_all(&source).unwrap();
        fs::write(
            source.join("c.json"),
            r#"{"id": "c", "title": "C", "exercises": [{"name": "e"}]}"#,
        )
        .unwrap();
        fs::write(source.join("d.json"), r#"{"id": "d", "title": "D"}"#).unwrap();

        let mut config = MigrationConfig::new(&source, dir.path().join("md"), dir.path().join("ch"));
        config.output_dir = dir.path().join("out");
        migrate(&config, MigrateOptions::default(), |_| {}).unwrap();
        fs::remove_file(source.join("d.json")).unwrap();
        fs::write(source.join("legacy.json"), r#"{"id": "l", "title": "L"}"#).unwrap();

        let chapters = discover_chapters(&config.source_dir, &config.output_dir).unwrap();
        let summary: Vec<_> = chapters
            .iter()
            .map(|c| (c.name.as_str(), c.format, c.legacy_file))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("c", ChapterFormat::Directory, true),
                ("d", ChapterFormat::Directory, false),
                ("legacy", ChapterFormat::Legacy, true),
            ]
        );
        assert_eq!(chapters[0].path, config.output_dir.join("c"));
        assert_eq!(chapters[0].exercises, 1);
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let dir = tempdir().unwrap();
        assert!(discover_chapters(&dir.path().join("none"), &dir.path().join("none")).unwrap().is_empty());
    }
}
