//
//  bitbucket-ops
//  batch/loader.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Reading operation records from files.
//!
//! A records file holds either a list of records or one record. `.yaml` and
//! `.yml` files are read as YAML; anything else, and `-` for stdin, as JSON.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::operations::Operation;

/// Syntax of a records file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A JSON array or object.
    Json,
    /// A YAML sequence or mapping.
    Yaml,
}

impl RecordFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Loads records from a file, or from stdin when `path` is `-`.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Operation>> {
    let path = path.as_ref();

    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read records from stdin")?;
        return parse_records(&text, RecordFormat::Json);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    parse_records(&text, RecordFormat::from_path(path))
        .with_context(|| format!("Invalid records file {}", path.display()))
}

/// Parses records from text.
///
/// Each record is decoded on its own so an unknown or missing `operation`
/// is reported with the record's position.
pub fn parse_records(text: &str, format: RecordFormat) -> Result<Vec<Operation>> {
    let document: Value = match format {
        RecordFormat::Json => serde_json::from_str(text).context("Malformed JSON")?,
        RecordFormat::Yaml => serde_yaml::from_str(text).context("Malformed YAML")?,
    };

    let items = match document {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        Value::Null => Vec::new(),
        other => bail!("Expected a list of records, found {}", kind_of(&other)),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).with_context(|| format!("Invalid record {}", index))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationKind;
    use std::io::Write;

    #[test]
    fn test_json_array() {
        let records = parse_records(
            r#"[
                {"operation": "getPR", "repository": "app", "pullRequestId": 1},
                {"operation": "search_pull_requests", "repository": "app", "state": "OPEN"}
            ]"#,
            RecordFormat::Json,
        )
        .unwrap();

        let kinds: Vec<_> = records.iter().map(Operation::kind).collect();
        assert_eq!(
            kinds,
            vec![OperationKind::GetPullRequest, OperationKind::SearchPullRequests]
        );
    }

    #[test]
    fn test_single_object() {
        let records = parse_records(
            r#"{"operation": "getFileContent", "repository": "app", "branch": "main", "filePath": "a.txt"}"#,
            RecordFormat::Json,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_yaml_sequence() {
        let yaml = r##"
- operation: commit_files
  repository: app
  branch: main
  message: Update docs
  files:
    - path: docs/a.md
      content: "# A"
- operation: mergePR
  repository: app
  pullRequestId: 7
  mergeStrategy: squash
"##;
        let records = parse_records(yaml, RecordFormat::Yaml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].pull_request_id(), Some(7));
    }

    #[test]
    fn test_file_data_collection() {
        let records = parse_records(
            r#"{"operation": "commitFiles", "repository": "app", "branch": "main",
                "commitMessage": "m", "files": {"fileData": [{"path": "a.txt", "content": "hi"}]}}"#,
            RecordFormat::Json,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].validate().is_ok());
    }

    #[test]
    fn test_bad_record_names_its_index() {
        let err = parse_records(
            r#"[{"operation": "getPR", "repository": "app"}, {"operation": "dropTable"}]"#,
            RecordFormat::Json,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).starts_with("Invalid record 1"));
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let err = parse_records("42", RecordFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "Expected a list of records, found a number");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RecordFormat::from_path(Path::new("a.yml")), RecordFormat::Yaml);
        assert_eq!(RecordFormat::from_path(Path::new("a.YAML")), RecordFormat::Yaml);
        assert_eq!(RecordFormat::from_path(Path::new("a.json")), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path(Path::new("records")), RecordFormat::Json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- {{operation: getPR, repository: app, pullRequestId: 3}}").unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].pull_request_id(), Some(3));
    }

    #[test]
    fn test_missing_file() {
        let err = load_records("/nonexistent/records.json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read records file"));
    }
}
