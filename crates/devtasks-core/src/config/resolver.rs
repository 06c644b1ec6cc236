//! Nested value lookup with shape-describing errors

use super::scalar::Scalar;
use super::store::{BUILD_SOURCE, PACKAGE_SOURCE};
use crate::error::GeneratorError;
use serde_json::Value;

/// Token rendered at the innermost level of an expected-shape skeleton
const VALUE_TOKEN: &str = "\"<value>\"";

/// Resolve `path` inside `tree` to a string or number
///
/// A missing segment and a value of the wrong type both produce
/// [`GeneratorError::MissingConfigPath`]; either way the config needs fixing.
pub fn resolve<S: AsRef<str>>(tree: &Value, path: &[S]) -> Result<Scalar, GeneratorError> {
    let segments: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
    if segments.is_empty() {
        return Err(missing(&segments, 0));
    }

    let mut current = tree;
    for (depth, segment) in segments.iter().enumerate() {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Err(missing(&segments, depth)),
        }
    }

    match current {
        Value::String(s) => Ok(Scalar::String(s.clone())),
        Value::Number(n) => Ok(Scalar::Number(n.clone())),
        _ => Err(missing(&segments, segments.len() - 1)),
    }
}

fn missing(path: &[String], depth: usize) -> GeneratorError {
    let (source_hint, shape) = match path.split_first() {
        Some((first, rest)) if !rest.is_empty() => match source_file(first) {
            Some(file) => (file.to_string(), rest),
            None => ("your configuration".to_string(), path),
        },
        _ => ("your configuration".to_string(), path),
    };

    GeneratorError::MissingConfigPath {
        path: path.to_vec(),
        missing: path
            .get(..=depth.min(path.len().saturating_sub(1)))
            .map(|p| p.join("."))
            .unwrap_or_default(),
        source_hint,
        expected: skeleton(shape),
    }
}

fn source_file(source: &str) -> Option<&'static str> {
    match source {
        PACKAGE_SOURCE => Some("package.json"),
        BUILD_SOURCE => Some("devtasks.yaml"),
        _ => None,
    }
}

/// Render the nesting of `segments` as a JSON-like block
///
/// `["author", "name"]` becomes:
///
/// ```text
/// {
///   "author": {
///     "name": "<value>"
///   }
/// }
/// ```
pub fn skeleton<S: AsRef<str>>(segments: &[S]) -> String {
    fn nest<S: AsRef<str>>(segments: &[S], indent: usize) -> String {
        match segments.split_first() {
            None => VALUE_TOKEN.to_string(),
            Some((head, rest)) => {
                let pad = "  ".repeat(indent + 1);
                let close = "  ".repeat(indent);
                format!(
                    "{{\n{}\"{}\": {}\n{}}}",
                    pad,
                    head.as_ref(),
                    nest(rest, indent + 1),
                    close
                )
            }
        }
    }
    nest(segments, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_string_and_number() {
        let tree = json!({"package": {"name": "widgets", "stars": 42}});
        assert_eq!(
            resolve(&tree, &["package", "name"]).unwrap(),
            Scalar::from("widgets")
        );
        assert_eq!(
            resolve(&tree, &["package", "stars"]).unwrap(),
            Scalar::from(42)
        );
    }

    #[test]
    fn test_missing_path_message_names_every_segment() {
        let err = resolve(&json!({}), &["author", "name"]).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingConfigPath { .. }));
        let message = err.to_string();
        assert!(message.contains("author"));
        assert!(message.contains("name"));
    }

    #[test]
    fn test_missing_path_names_source_file() {
        let tree = json!({"package": {}});
        let err = resolve(&tree, &["package", "author", "name"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("package.json"));
        assert!(message.contains("\"author\": {"));
        assert!(message.contains("\"name\": \"<value>\""));
    }

    #[test]
    fn test_wrong_type_is_reported_as_missing() {
        let tree = json!({"package": {"author": {"name": true}, "keywords": ["a"]}});
        for path in [
            vec!["package", "author", "name"],
            vec!["package", "author"],
            vec!["package", "keywords"],
        ] {
            let err = resolve(&tree, &path).unwrap_err();
            assert!(matches!(err, GeneratorError::MissingConfigPath { .. }));
        }
    }

    #[test]
    fn test_intermediate_scalar_stops_traversal() {
        let tree = json!({"package": {"author": "A"}});
        let err = resolve(&tree, &["package", "author", "name"]).unwrap_err();
        match err {
            GeneratorError::MissingConfigPath { missing, .. } => {
                assert_eq!(missing, "package.author.name")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_path_fails() {
        let empty: [&str; 0] = [];
        assert!(resolve(&json!({"a": "b"}), &empty).is_err());
    }

    #[test]
    fn test_skeleton_layout() {
        assert_eq!(
            skeleton(&["author", "name"]),
            "{\n  \"author\": {\n    \"name\": \"<value>\"\n  }\n}"
        );
        let empty: [&str; 0] = [];
        assert_eq!(skeleton(&empty), "\"<value>\"");
    }
}
