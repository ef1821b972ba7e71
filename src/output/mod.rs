//
//  bitbucket-ops
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Rendering of operation results for the terminal:
//!
//! - **Table format**: a per-record summary table for interactive use
//! - **JSON format**: the raw result array (or single result) for scripting
//!
//! ## Architecture
//!
//! - [`table`]: Table formatting utilities using `comfy_table`
//! - [`json`]: JSON serialization utilities using `serde_json`
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitbucket_ops::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write_report(&report)?;
//! writer.write_success("Done");
//! ```

mod json;
mod table;

pub use json::*;
pub use table::*;

use crate::batch::BatchReport;

/// The available output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary tables.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Picks JSON when `json` is set, tables otherwise.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Writes results and status messages in the selected format.
///
/// Status messages go to stderr in JSON mode so stdout stays parseable.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer; colors follow the terminal's capabilities.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Returns `true` in JSON mode.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes a batch report.
    ///
    /// JSON mode prints the results array, one element per input record.
    pub fn write_report(&self, report: &BatchReport) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&report.results()),
            OutputFormat::Table => {
                report.print_table(self.color);
                Ok(())
            }
        }
    }

    /// Writes the result of a single operation.
    ///
    /// JSON mode prints the result object itself, table mode its key fields.
    pub fn write_result(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Table => {
                print_result_fields(value, self.color);
                Ok(())
            }
        }
    }

    /// Writes a success message with a check mark.
    pub fn write_success(&self, msg: &str) {
        use console::style;
        let line = if self.color {
            format!("{} {}", style("✓").green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        };
        if self.is_json() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Types that can print themselves as a table.
pub trait TableOutput {
    /// Prints the value as a table to stdout.
    fn print_table(&self, color: bool);
}

/// Prints a bold header line with an underline.
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints a `key: value` line, dimming the key when colored.
pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_format() {
        assert!(OutputWriter::new(OutputFormat::from_json_flag(true)).is_json());
        assert!(!OutputWriter::new(OutputFormat::from_json_flag(false)).is_json());
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
