use std::fs;
use std::path::Path;

use chapter_migrate::store::files::json_file_paths;
use chapter_migrate::store::layout::CHAPTER_INFO_FILE;
use chapter_migrate::{MigrateOptions, MigrationConfig, migrate};
use filetime::FileTime;
use serde_json::{Value, json};
use tempfile::tempdir;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn fixture_chapters() -> Vec<(&'static str, Value)> {
    vec![
        (
            "basics",
            json!({
                "id": "basics",
                "title": "Basics",
                "resources": {"docs": ["https://doc.rust-lang.org/book/"]},
                "level": "beginner",
                "exercises": [
                    {"name": "hello", "prompt": "Print hello", "tests": ["t1"]},
                    {"name": "vars", "prompt": "Bind a variable"}
                ]
            }),
        ),
        ("empty", json!({"id": 2, "title": "No exercises"})),
        (
            "ownership",
            json!({
                "id": 3,
                "title": "Ownership",
                "exercises": [
                    {"name": "move"},
                    {"name": "borrow"},
                    {"name": "clone"},
                    {"name": "lifetimes", "hints": {"first": "think scopes"}}
                ]
            }),
        ),
    ]
}

#[test]
fn every_chapter_yields_metadata_and_tagged_exercises() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("exercises");
    fs::create_dir_all(&source).unwrap();

    let old = FileTime::from_unix_time(1_600_000_000, 0);
    for (name, doc) in fixture_chapters() {
        let path = source.join(format!("{name}.json"));
        fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
        filetime::set_file_mtime(&path, old).unwrap();
    }

    let config = MigrationConfig::new(&source, dir.path().join("md"), dir.path().join("chapters"));
    let summary = migrate(&config, MigrateOptions::default(), |_| {}).unwrap();
    assert_eq!(summary.chapters.len(), 3);
    assert_eq!(summary.exercise_count(), 6);

    for (name, doc) in fixture_chapters() {
        let chapter_dir = source.join(name);

        let info = read_json(&chapter_dir.join(CHAPTER_INFO_FILE));
        let keys: Vec<&str> = info.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "title", "resources"], "chapter {name}");
        assert_eq!(info["id"], doc["id"]);
        assert_eq!(info["resources"], doc.get("resources").cloned().unwrap_or(json!({})));

        let expected = doc["exercises"].as_array().map(Vec::len).unwrap_or(0);
        let exercise_files: Vec<_> = json_file_paths(&chapter_dir)
            .unwrap()
            .into_iter()
            .filter(|p| !p.ends_with(CHAPTER_INFO_FILE))
            .collect();
        assert_eq!(exercise_files.len(), expected, "chapter {name}");

        for path in &exercise_files {
            let exercise = read_json(path);
            assert_eq!(exercise["chapterId"], doc["id"]);
            let file = path.file_name().unwrap().to_str().unwrap();
            assert_eq!(
                file,
                format!("{name}-{}.json", exercise["name"].as_str().unwrap())
            );
        }

        let original = source.join(format!("{name}.json"));
        let backup = source.join("backup").join(format!("{name}.json"));
        assert_eq!(fs::read(&backup).unwrap(), fs::read(&original).unwrap());
        assert_eq!(
            FileTime::from_last_modification_time(&fs::metadata(&backup).unwrap()),
            old
        );
    }
}

#[test]
fn existing_chapter_directories_are_never_inputs() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("exercises");
    let migrated = source.join("old");
    fs::create_dir_all(&migrated).unwrap();
    fs::write(migrated.join(CHAPTER_INFO_FILE), r#"{"id": "old", "title": "Old", "resources": {}}"#)
        .unwrap();
    fs::write(migrated.join("old-a.json"), r#"{"name": "a", "chapterId": "old"}"#).unwrap();

    let config = MigrationConfig::new(&source, dir.path().join("md"), dir.path().join("chapters"));
    let summary = migrate(&config, MigrateOptions::default(), |_| {}).unwrap();

    assert!(summary.nothing_to_do());
    assert!(!source.join("backup").exists());
    assert!(!migrated.join("old").exists());
}
