//
//  bitbucket-ops
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O
//!
//! Thin helpers for reading and writing the configuration file. Errors carry
//! the offending path as context.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use bitbucket_ops::config::{config_exists, read_config_file, write_config_file};
//!
//! let path = Path::new("/tmp/bbops/config.toml");
//! if !config_exists(path) {
//!     write_config_file(path, "[credentials]\nworkspace = \"acme\"\n")?;
//! }
//! let content = read_config_file(path)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the contents of a configuration file.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read or is not
/// valid UTF-8.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))
}

/// Writes a configuration file, creating parent directories as needed.
///
/// Existing content is overwritten.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

/// Returns `true` if a configuration file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(!config_exists(&path));
        write_config_file(&path, "x = 1\n").unwrap();
        assert!(config_exists(&path));
        assert_eq!(read_config_file(&path).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_read_missing_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
