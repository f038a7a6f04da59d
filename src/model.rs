use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{MigrateError, Result};

/// Field injected into every exercise written to its own file.
pub const CHAPTER_ID_FIELD: &str = "chapterId";

/// Chapter identifier. Any JSON scalar is accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChapterId(Value);

impl ChapterId {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(Self(value)),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{s}"),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for ChapterId {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

/// One exercise object. Field order from the source file is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    name: String,
    fields: Map<String, Value>,
}

impl Exercise {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Tag the exercise with its parent chapter, replacing any existing value.
    pub fn set_chapter_id(&mut self, id: &ChapterId) {
        self.fields
            .insert(CHAPTER_ID_FIELD.to_string(), id.as_value().clone());
    }

    fn from_value(index: usize, value: Value) -> std::result::Result<Self, String> {
        let Value::Object(fields) = value else {
            return Err(format!("exercise #{index} is not a JSON object"));
        };
        let name = match fields.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(format!("exercise #{index} field `name` is not a string")),
            None => return Err(format!("exercise #{index} is missing field `name`")),
        };
        validate_exercise_name(&name).map_err(|why| format!("exercise '{name}' {why}"))?;
        Ok(Self { name, fields })
    }
}

impl Serialize for Exercise {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Exercise names become part of a file name.
fn validate_exercise_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("has an empty name");
    }
    if name == "." || name == ".." {
        return Err("has a reserved name");
    }
    if name.contains(['/', '\\', '\0']) {
        return Err("name contains a path separator");
    }
    Ok(())
}

/// A chapter file in the monolithic layout, validated at load time.
///
/// Validation is stricter than a plain JSON load: `id` must be a string,
/// number or boolean (`null` is rejected), and every exercise `name` must be
/// a non-blank string usable as part of a file name, unique in its chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterDocument {
    pub id: ChapterId,
    pub title: String,
    pub resources: Map<String, Value>,
    pub exercises: Vec<Exercise>,
}

/// The `chapter-info.json` record. Field order is part of the output format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterMetadata {
    pub id: ChapterId,
    pub title: String,
    pub resources: Map<String, Value>,
}

impl ChapterDocument {
    /// Read a chapter file. Contents that are not UTF-8 are reported against the file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let data = String::from_utf8(bytes).map_err(|err| {
            MigrateError::invalid_chapter(path, format!("not valid UTF-8: {err}"))
        })?;
        Self::from_json(path, &data)
    }

    /// Parse and validate raw file contents. `path` is only used in errors.
    pub fn from_json(path: &Path, data: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(data)
            .map_err(|err| MigrateError::invalid_chapter(path, format!("not valid JSON: {err}")))?;
        Self::from_value(value).map_err(|reason| MigrateError::invalid_chapter(path, reason))
    }

    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        let Value::Object(mut root) = value else {
            return Err("top-level value is not a JSON object".into());
        };

        let id = match root.remove("id") {
            None => return Err("missing field `id`".into()),
            Some(raw) => ChapterId::from_value(raw)
                .ok_or_else(|| "field `id` must be a string, number or boolean".to_string())?,
        };

        let title = match root.remove("title") {
            Some(Value::String(title)) => title,
            Some(_) => return Err("field `title` is not a string".into()),
            None => return Err("missing field `title`".into()),
        };

        let resources = match root.remove("resources") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(resources)) => resources,
            Some(_) => return Err("field `resources` is not a JSON object".into()),
        };

        let raw_exercises = match root.remove("exercises") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => return Err("field `exercises` is not a JSON array".into()),
        };

        let mut seen = HashSet::new();
        let mut exercises = Vec::with_capacity(raw_exercises.len());
        for (index, raw) in raw_exercises.into_iter().enumerate() {
            let exercise = Exercise::from_value(index, raw)?;
            if !seen.insert(exercise.name.clone()) {
                return Err(format!("duplicate exercise name '{}'", exercise.name));
            }
            exercises.push(exercise);
        }

        Ok(Self {
            id,
            title,
            resources,
            exercises,
        })
    }

    pub fn metadata(&self) -> ChapterMetadata {
        ChapterMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            resources: self.resources.clone(),
        }
    }
}
