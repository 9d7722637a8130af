//! Loading local catalogs and saved server responses.

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Local activities read from a YAML catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub path: PathBuf,
    pub courses: Vec<Value>,
}

impl Catalog {
    /// Reads a catalog: a `courses:` list (with an optional `defaults` anchor
    /// host) or a single activity record. Merge keys are resolved first.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::ReadError(path.to_path_buf(), e))?;
        let courses = parse_catalog(&contents)
            .map_err(|e| CatalogError::ParseError(path.to_path_buf(), e))?;
        tracing::info!("Loaded {} course(s) from {}", courses.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            courses,
        })
    }

    /// The course whose `_key` is `key`.
    pub fn find(&self, key: &str) -> Option<&Value> {
        self.courses.iter().find(|c| record_key(c) == Some(key))
    }
}

fn parse_catalog(contents: &str) -> Result<Vec<Value>, String> {
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(contents).map_err(|e| e.to_string())?;
    yaml.apply_merge().map_err(|e| e.to_string())?;
    let root: Value = serde_json::to_value(&yaml).map_err(|e| e.to_string())?;

    match root {
        Value::Object(mut map) => match map.remove("courses") {
            Some(Value::Array(courses)) => Ok(courses),
            Some(_) => Err("`courses` must be a list".to_string()),
            None => Ok(vec![Value::Object(map)]),
        },
        Value::Null => Ok(Vec::new()),
        _ => Err("expected a mapping at the top level".to_string()),
    }
}

/// Reads saved server activities: a single activity, a list of activities,
/// or a page with an `items` list.
pub fn load_server_records(path: &Path) -> Result<Vec<Value>, CatalogError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CatalogError::ReadError(path.to_path_buf(), e))?;
    let root: Value = serde_json::from_str(&contents)
        .map_err(|e| CatalogError::ParseError(path.to_path_buf(), e.to_string()))?;
    server_records(root).map_err(|e| CatalogError::ParseError(path.to_path_buf(), e))
}

fn server_records(root: Value) -> Result<Vec<Value>, String> {
    match root {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err("`items` must be a list".to_string()),
            None => Ok(vec![Value::Object(map)]),
        },
        _ => Err("expected a JSON object or array".to_string()),
    }
}

/// The `_key` of a record, local or remote.
pub fn record_key(record: &Value) -> Option<&str> {
    record.get("_key").and_then(Value::as_str)
}

/// Finnish title, for display.
pub fn record_title(record: &Value) -> &str {
    record
        .pointer("/title/fi")
        .or_else(|| record.pointer("/traits/translations/fi/name"))
        .and_then(Value::as_str)
        .unwrap_or("(untitled)")
}

#[derive(Debug)]
pub enum CatalogError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::ReadError(path, e) => {
                write!(f, "Failed to read '{}': {}", path.display(), e)
            }
            CatalogError::ParseError(path, e) => {
                write!(f, "Failed to parse '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_courses_with_merge_keys() {
        let yaml = r#"
defaults:
  registration: &registration
    required: true
    email: info@example.com

courses:
  - _key: "1"
    title:
      fi: Jooga
    registration:
      <<: *registration
      url: https://example.com
  - title:
      fi: Taiji
    registration: *registration
"#;
        let courses = parse_catalog(yaml).unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(
            courses[0]["registration"],
            json!({"required": true, "email": "info@example.com", "url": "https://example.com"})
        );
        assert_eq!(courses[1]["registration"]["email"], json!("info@example.com"));
        assert_eq!(record_key(&courses[0]), Some("1"));
        assert_eq!(record_key(&courses[1]), None);
    }

    #[test]
    fn test_single_record_catalog() {
        let courses = parse_catalog("title:\n  fi: Jooga\n").unwrap();
        assert_eq!(courses, vec![json!({"title": {"fi": "Jooga"}})]);
        assert_eq!(record_title(&courses[0]), "Jooga");
    }

    #[test]
    fn test_invalid_courses() {
        assert!(parse_catalog("courses: nope\n").is_err());
        assert!(parse_catalog("- a\n- b\n").is_err());
        assert!(parse_catalog("~\n").unwrap().is_empty());
    }

    #[test]
    fn test_server_record_shapes() {
        let one = json!({"_key": "a"});
        assert_eq!(server_records(one.clone()).unwrap(), vec![one.clone()]);
        assert_eq!(server_records(json!([one.clone()])).unwrap(), vec![one.clone()]);
        assert_eq!(
            server_records(json!({"items": [one.clone()], "total": 1})).unwrap(),
            vec![one]
        );
        assert!(server_records(json!("text")).is_err());
    }

    #[test]
    fn test_load_files() {
        let dir = tempdir().unwrap();
        let catalog_path = dir.path().join("courses.yaml");
        let mut file = std::fs::File::create(&catalog_path).unwrap();
        writeln!(file, "courses:\n  - _key: k1\n    title:\n      fi: Jooga").unwrap();

        let catalog = Catalog::load(&catalog_path).unwrap();
        assert_eq!(record_title(catalog.find("k1").unwrap()), "Jooga");
        assert!(catalog.find("k2").is_none());

        let server_path = dir.path().join("server.json");
        std::fs::write(&server_path, r#"{"items": [{"_key": "k1"}]}"#).unwrap();
        assert_eq!(load_server_records(&server_path).unwrap().len(), 1);

        let err = Catalog::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
