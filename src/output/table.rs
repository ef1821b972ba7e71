//
//  bitbucket-ops
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Human-readable rendering of results using [`comfy_table`], with optional
//! coloring through [`console`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitbucket_ops::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(vec!["#", "Operation", "Status", "Detail"])
//!     .row(vec!["0", "get_pull_request", "ok", "#7 Fix login [OPEN]"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

use super::{print_field, print_header, TableOutput};
use crate::batch::{BatchReport, OperationResult};
use crate::util::{single_line, truncate};

const DETAIL_WIDTH: usize = 60;

/// Creates a table with the standard UTF-8 preset and dynamic widths.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Fluent builder for tables with optionally colored headers.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    /// Creates a builder; colors follow the terminal's capabilities.
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Enables or disables colored headers.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the header row.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            let cells: Vec<Cell> = headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect();
            self.table.set_header(cells);
        } else {
            self.table.set_header(headers);
        }
        self
    }

    /// Appends a data row.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    /// Prints the table to stdout.
    pub fn print(self) {
        println!("{}", self.table);
    }

    /// Returns the finished table.
    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a record status, green for success and red for failure.
pub fn format_status(success: bool, color: bool) -> String {
    use console::style;
    match (success, color) {
        (true, true) => style("ok").green().to_string(),
        (false, true) => style("failed").red().to_string(),
        (true, false) => "ok".to_string(),
        (false, false) => "failed".to_string(),
    }
}

/// Condenses a result into one line for the detail column.
///
/// Recognizes the shapes Bitbucket returns for pull requests, pull request
/// lists, comments, branches and file reads; anything else is shown as
/// compact JSON.
pub fn summarize(value: &Value) -> String {
    let text = |key: &str| value.get(key).and_then(Value::as_str);

    if value.as_object().is_some_and(|o| o.is_empty()) {
        return "done".to_string();
    }

    if let Some(values) = value.get("values").and_then(Value::as_array) {
        let ids: Vec<String> = values
            .iter()
            .filter_map(|v| v.get("id").and_then(Value::as_i64))
            .map(|id| format!("#{}", id))
            .collect();
        let summary = match values.len() {
            1 => "1 item".to_string(),
            n => format!("{} items", n),
        };
        return if ids.is_empty() {
            summary
        } else {
            truncate(&format!("{}: {}", summary, ids.join(" ")), DETAIL_WIDTH)
        };
    }

    if let (Some(content), Some(path)) = (text("content"), text("path")) {
        return format!("{} ({} bytes)", path, content.len());
    }

    if let Some(raw) = value.pointer("/content/raw").and_then(Value::as_str) {
        let id = value.get("id").and_then(Value::as_i64).unwrap_or_default();
        return truncate(&format!("comment #{}: {}", id, single_line(raw)), DETAIL_WIDTH);
    }

    if let (Some(id), Some(title)) = (value.get("id").and_then(Value::as_i64), text("title")) {
        let state = text("state").unwrap_or("?");
        return truncate(&format!("#{} {} [{}]", id, single_line(title), state), DETAIL_WIDTH);
    }

    if let (Some(name), Some(hash)) = (
        text("name"),
        value.pointer("/target/hash").and_then(Value::as_str),
    ) {
        return format!("{} @ {}", name, truncate(hash, 12));
    }

    truncate(&value.to_string(), DETAIL_WIDTH)
}

impl TableOutput for BatchReport {
    fn print_table(&self, color: bool) {
        let mut builder = TableBuilder::new()
            .color(color)
            .headers(vec!["#", "Operation", "Status", "Detail"]);

        for outcome in self.outcomes() {
            let detail = match &outcome.result {
                OperationResult::Success(data) => summarize(data),
                OperationResult::Failure { error } => truncate(&single_line(error), DETAIL_WIDTH),
            };
            builder = builder.row(vec![
                outcome.index.to_string(),
                outcome.operation.to_string(),
                format_status(outcome.result.is_success(), color),
                detail,
            ]);
        }
        builder.print();

        let failed = self.failed();
        let footer = format!("{} succeeded, {} failed", self.len() - failed, failed);
        if color {
            use console::style;
            if failed == 0 {
                println!("{}", style(footer).green());
            } else {
                println!("{}", style(footer).yellow());
            }
        } else {
            println!("{}", footer);
        }
    }
}

/// Prints a single result as fields.
///
/// File reads print the file content under a header; other objects print
/// their top-level fields, with nested values condensed.
pub fn print_result_fields(value: &Value, color: bool) {
    if let (Some(content), Some(path), Some(branch)) = (
        value.get("content").and_then(Value::as_str),
        value.get("path").and_then(Value::as_str),
        value.get("branch").and_then(Value::as_str),
    ) {
        print_header(&format!("{} @ {}", path, branch));
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
        return;
    }

    let Some(object) = value.as_object() else {
        println!("{}", value);
        return;
    };

    if object.is_empty() {
        println!("{}", summarize(value));
        return;
    }

    for (key, field) in object {
        let rendered = match field {
            Value::Null => continue,
            Value::String(s) => truncate(&single_line(s), DETAIL_WIDTH),
            Value::Array(items) => format!("{} items", items.len()),
            Value::Object(_) => summarize(field),
            other => other.to_string(),
        };
        print_field(key, &rendered, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_shapes() {
        assert_eq!(summarize(&json!({})), "done");
        assert_eq!(
            summarize(&json!({"id": 7, "title": "Fix login", "state": "OPEN"})),
            "#7 Fix login [OPEN]"
        );
        assert_eq!(
            summarize(&json!({"values": [{"id": 1}, {"id": 4}], "size": 2})),
            "2 items: #1 #4"
        );
        assert_eq!(summarize(&json!({"values": []})), "0 items");
        assert_eq!(
            summarize(&json!({"content": "hello", "path": "a.txt", "branch": "main"})),
            "a.txt (5 bytes)"
        );
        assert_eq!(
            summarize(&json!({"id": 99, "content": {"raw": "LGTM\nthanks"}})),
            "comment #99: LGTM thanks"
        );
        assert_eq!(
            summarize(&json!({"name": "feature/y", "target": {"hash": "abc123"}})),
            "feature/y @ abc123"
        );
    }

    #[test]
    fn test_summarize_falls_back_to_json() {
        assert_eq!(summarize(&json!({"ok": true})), r#"{"ok":true}"#);
    }

    #[test]
    fn test_format_status_plain() {
        assert_eq!(format_status(true, false), "ok");
        assert_eq!(format_status(false, false), "failed");
    }

    #[test]
    fn test_table_builder() {
        let table = TableBuilder::new()
            .color(false)
            .headers(vec!["#", "Operation"])
            .row(vec!["0", "get_pull_request"])
            .build();
        let rendered = table.to_string();
        assert!(rendered.contains("Operation"));
        assert!(rendered.contains("get_pull_request"));
    }
}
