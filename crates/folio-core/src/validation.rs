//! Validation gate for incoming portfolio documents
//!
//! Validation is all-or-nothing and runs before any store mutation. Checks run
//! in a fixed order and stop at the first failure:
//!
//! 1. the candidate is a JSON object
//! 2. `name` and `title`
//! 3. the `about` array and each paragraph
//! 4. the `projects` array, each project and each of its tags
//!
//! Lengths count UTF-16 code units, so a character outside the Basic
//! Multilingual Plane (most emoji) counts as two.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::document::{Document, Project, ValidDocument};

/// Size limits enforced by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub name_chars: usize,
    pub title_chars: usize,
    pub about_entries: usize,
    pub about_chars: usize,
    pub project_entries: usize,
    pub project_title_chars: usize,
    pub project_description_chars: usize,
    pub tag_entries: usize,
    pub tag_chars: usize,
}

impl Limits {
    pub const DEFAULT: Limits = Limits {
        name_chars: 100,
        title_chars: 200,
        about_entries: 20,
        about_chars: 2000,
        project_entries: 50,
        project_title_chars: 200,
        project_description_chars: 2000,
        tag_entries: 20,
        tag_chars: 50,
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Structural or size violation in a candidate document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be an object")]
    NotAnObject { field: String },

    #[error("{field} must be a string")]
    NotAString { field: String },

    #[error("{field} must be an array")]
    NotAnArray { field: String },

    #[error("{field} exceeds {max} characters (got {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("{field} exceeds {max} entries (got {actual})")]
    TooMany {
        field: String,
        max: usize,
        actual: usize,
    },
}

impl ValidationError {
    /// Path of the offending field, e.g. `projects[2].tags[0]`
    pub fn field(&self) -> &str {
        match self {
            Self::NotAnObject { field }
            | Self::NotAString { field }
            | Self::NotAnArray { field }
            | Self::TooLong { field, .. }
            | Self::TooMany { field, .. } => field,
        }
    }
}

/// Validate an untyped candidate with the default limits
pub fn validate(candidate: &Value) -> Result<ValidDocument, ValidationError> {
    validate_with(candidate, &Limits::DEFAULT)
}

/// Validate an untyped candidate against explicit limits
pub fn validate_with(candidate: &Value, limits: &Limits) -> Result<ValidDocument, ValidationError> {
    let root = candidate.as_object().ok_or_else(|| ValidationError::NotAnObject {
        field: "document".to_string(),
    })?;

    let name = string_field(root, "name", "name", limits.name_chars)?;
    let title = string_field(root, "title", "title", limits.title_chars)?;

    let about_values = array_field(root, "about", "about", limits.about_entries)?;
    let mut about = Vec::with_capacity(about_values.len());
    for (index, value) in about_values.iter().enumerate() {
        about.push(bounded_string(value, &format!("about[{index}]"), limits.about_chars)?);
    }

    let project_values = array_field(root, "projects", "projects", limits.project_entries)?;
    let mut projects = Vec::with_capacity(project_values.len());
    for (index, value) in project_values.iter().enumerate() {
        let path = format!("projects[{index}]");
        let project = value
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject { field: path.clone() })?;

        let title = string_field(
            project,
            "title",
            &format!("{path}.title"),
            limits.project_title_chars,
        )?;
        let description = string_field(
            project,
            "description",
            &format!("{path}.description"),
            limits.project_description_chars,
        )?;

        let tags_path = format!("{path}.tags");
        let tag_values = array_field(project, "tags", &tags_path, limits.tag_entries)?;
        let mut tags = Vec::with_capacity(tag_values.len());
        for (tag_index, tag) in tag_values.iter().enumerate() {
            tags.push(bounded_string(
                tag,
                &format!("{tags_path}[{tag_index}]"),
                limits.tag_chars,
            )?);
        }

        projects.push(Project {
            title,
            description,
            tags,
        });
    }

    Ok(ValidDocument::new_unchecked(Document {
        name,
        title,
        about,
        projects,
    }))
}

/// Run the gate over an already-typed document
pub fn validate_document(document: &Document) -> Result<ValidDocument, ValidationError> {
    let value = serde_json::to_value(document).map_err(|_| ValidationError::NotAnObject {
        field: "document".to_string(),
    })?;
    validate(&value)
}

fn string_field(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    max: usize,
) -> Result<String, ValidationError> {
    match object.get(key) {
        Some(value) => bounded_string(value, path, max),
        None => Err(ValidationError::NotAString {
            field: path.to_string(),
        }),
    }
}

fn bounded_string(value: &Value, path: &str, max: usize) -> Result<String, ValidationError> {
    let text = value.as_str().ok_or_else(|| ValidationError::NotAString {
        field: path.to_string(),
    })?;

    let actual = text.encode_utf16().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: path.to_string(),
            max,
            actual,
        });
    }

    Ok(text.to_string())
}

fn array_field<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
    max: usize,
) -> Result<&'a Vec<Value>, ValidationError> {
    let items = object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::NotAnArray {
            field: path.to_string(),
        })?;

    if items.len() > max {
        return Err(ValidationError::TooMany {
            field: path.to_string(),
            max,
            actual: items.len(),
        });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({"name": "Ada", "title": "Engineer", "about": [], "projects": []})
    }

    fn full_size(about: usize, projects: usize, tags: usize) -> Value {
        json!({
            "name": "n".repeat(100),
            "title": "t".repeat(200),
            "about": vec!["a".repeat(2000); about],
            "projects": (0..projects).map(|i| json!({
                "title": format!("project {i}"),
                "description": "d".repeat(2000),
                "tags": vec!["g".repeat(50); tags],
            })).collect::<Vec<_>>(),
        })
    }

    #[test]
    fn test_accepts_minimal_document() {
        let doc = validate(&minimal()).unwrap();
        assert_eq!(doc.name, "Ada");
        assert!(doc.about.is_empty());
    }

    #[test]
    fn test_rejects_non_objects() {
        for candidate in [Value::Null, json!(42), json!("text"), json!([1, 2])] {
            let err = validate(&candidate).unwrap_err();
            assert!(matches!(err, ValidationError::NotAnObject { .. }), "{candidate}");
        }
    }

    #[test]
    fn test_accepts_exact_boundaries() {
        let doc = validate(&full_size(20, 50, 20)).unwrap();
        assert_eq!(doc.about.len(), 20);
        assert_eq!(doc.projects.len(), 50);
        assert!(doc.projects.iter().all(|p| p.tags.len() == 20));
    }

    #[test]
    fn test_rejects_too_many_about() {
        let err = validate(&full_size(21, 0, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooMany {
                field: "about".to_string(),
                max: 20,
                actual: 21
            }
        );
    }

    #[test]
    fn test_rejects_too_many_projects() {
        let err = validate(&full_size(0, 51, 0)).unwrap_err();
        assert_eq!(err.field(), "projects");
    }

    #[test]
    fn test_rejects_too_many_tags() {
        let err = validate(&full_size(0, 1, 21)).unwrap_err();
        assert_eq!(err.field(), "projects[0].tags");
    }

    #[test]
    fn test_rejects_about_string() {
        let mut candidate = minimal();
        candidate["about"] = json!("<script>alert(1)</script>");
        let err = validate(&candidate).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAnArray {
                field: "about".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_long_fields() {
        let mut candidate = minimal();
        candidate["name"] = json!("x".repeat(101));
        assert_eq!(validate(&candidate).unwrap_err().field(), "name");

        let mut candidate = minimal();
        candidate["projects"] = json!([{"title": "a", "description": "b", "tags": ["t".repeat(51)]}]);
        assert_eq!(validate(&candidate).unwrap_err().field(), "projects[0].tags[0]");
    }

    #[test]
    fn test_bmp_characters_count_once() {
        let mut candidate = minimal();
        candidate["name"] = json!("é".repeat(100));
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn test_astral_characters_count_twice() {
        let mut candidate = minimal();
        candidate["name"] = json!("😀".repeat(51));
        assert_eq!(
            validate(&candidate).unwrap_err(),
            ValidationError::TooLong {
                field: "name".to_string(),
                max: 100,
                actual: 102,
            }
        );

        let mut candidate = minimal();
        candidate["name"] = json!("😀".repeat(50));
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn test_short_circuits_in_order() {
        // name is checked before about
        let candidate = json!({"name": 1, "title": "t", "about": "oops", "projects": []});
        assert_eq!(validate(&candidate).unwrap_err().field(), "name");
    }

    #[test]
    fn test_rejects_missing_and_non_string_members() {
        let candidate = json!({"title": "t", "about": [], "projects": []});
        assert!(matches!(
            validate(&candidate).unwrap_err(),
            ValidationError::NotAString { .. }
        ));

        let mut candidate = minimal();
        candidate["about"] = json!(["ok", 3]);
        assert_eq!(validate(&candidate).unwrap_err().field(), "about[1]");

        let mut candidate = minimal();
        candidate["projects"] = json!(["not a project"]);
        assert!(matches!(
            validate(&candidate).unwrap_err(),
            ValidationError::NotAnObject { .. }
        ));
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let mut candidate = minimal();
        candidate["extra"] = json!({"anything": true});
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn test_validate_document_roundtrip() {
        let doc = Document::new("Ada", "Engineer")
            .with_projects(vec![Project::new("A", "d").with_tags(["x", "y"])]);
        let valid = validate_document(&doc).unwrap();
        assert_eq!(valid.into_inner(), doc);
    }
}
