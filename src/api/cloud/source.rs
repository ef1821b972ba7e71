//
//  bitbucket-ops
//  api/cloud/source.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud source (`/src`) API types.
//!
//! The `/src` endpoint commits files through a form-encoded body where every
//! file is one field keyed by its repository path, alongside the `message`
//! and `branch` fields. Reading a file from `/src/{branch}/{path}` returns the
//! raw file bytes, which [`FileContent`] wraps with the path and branch.

use serde::{Deserialize, Serialize};

/// A file to commit: repository path and its full text content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Path of the file inside the repository (e.g. `docs/README.md`).
    #[serde(default)]
    pub path: String,

    /// Full new content of the file.
    #[serde(default)]
    pub content: String,
}

impl FileEntry {
    /// Creates a file entry.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Form body for `POST /repositories/{ws}/{repo}/src`.
///
/// Field order follows insertion order. Inserting an existing key replaces
/// its value in place, so a file literally named `message` is overwritten by
/// the commit message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitFilesForm {
    fields: Vec<(String, String)>,
}

impl CommitFilesForm {
    /// Builds the form from files, commit message and target branch.
    pub fn new(files: &[FileEntry], message: &str, branch: &str) -> Self {
        let mut form = Self::default();
        for file in files {
            form.insert(&file.path, &file.content);
        }
        form.insert("message", message);
        form.insert("branch", branch);
        form
    }

    /// Sets a field, replacing the value if the key already exists.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }

    /// Returns the value of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all fields in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Consumes the form and returns its fields.
    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Normalized result of reading a file from a branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileContent {
    /// Raw file content as text.
    pub content: String,

    /// The path that was requested.
    pub path: String,

    /// The branch that was read.
    pub branch: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_form_fields() {
        let form = CommitFilesForm::new(&[FileEntry::new("a.txt", "hi")], "m", "main");
        assert_eq!(
            form.fields(),
            &[
                ("a.txt".to_string(), "hi".to_string()),
                ("message".to_string(), "m".to_string()),
                ("branch".to_string(), "main".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_paths_keep_last_content() {
        let files = [FileEntry::new("a.txt", "one"), FileEntry::new("a.txt", "two")];
        let form = CommitFilesForm::new(&files, "m", "main");
        assert_eq!(form.fields().len(), 3);
        assert_eq!(form.get("a.txt"), Some("two"));
    }

    #[test]
    fn test_reserved_field_names_are_overwritten() {
        let form = CommitFilesForm::new(&[FileEntry::new("branch", "x")], "m", "main");
        assert_eq!(form.get("branch"), Some("main"));
        assert_eq!(form.fields().len(), 2);
    }
}
