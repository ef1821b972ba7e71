//
//  bitbucket-ops
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Small helpers shared by the operation validator, the credential provider
//! and the output layer.
//!
//! ## Categories
//!
//! - **Validation**: [`is_valid_slug`]
//! - **String Utilities**: [`truncate`], [`single_line`]
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_ops::util::{is_valid_slug, truncate};
//!
//! assert!(is_valid_slug("my-repo"));
//! assert!(!is_valid_slug("my repo"));
//! assert_eq!(truncate("hello world", 8), "hello...");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Workspace and repository slugs: letters, digits, `.`, `_` and `-`.
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

/// Checks whether a string is a valid Bitbucket workspace or repository slug.
///
/// Bitbucket slugs only contain ASCII letters, digits, dots, underscores and
/// hyphens. Anything else (spaces, slashes, `{uuid}` forms) is rejected so it
/// never reaches a URL path. A slug made only of dots is rejected too, since
/// `.` and `..` are resolved away as path segments.
///
/// # Examples
///
/// ```rust
/// use bitbucket_ops::util::is_valid_slug;
///
/// assert!(is_valid_slug("acme"));
/// assert!(is_valid_slug("web_app.v2"));
/// assert!(!is_valid_slug("acme/app"));
/// assert!(!is_valid_slug(""));
/// assert!(!is_valid_slug(".."));
/// ```
pub fn is_valid_slug(s: &str) -> bool {
    SLUG_RE.is_match(s) && !is_dot_segment(s)
}

/// Returns `true` for strings made only of dots, such as `.` or `..`.
pub fn is_dot_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '.')
}

/// Truncates a string to a maximum length with ellipsis.
///
/// Counts characters rather than bytes, so multi-byte text never splits
/// inside a code point. When truncation happens the last three characters of
/// the budget are replaced with `...`.
///
/// # Parameters
///
/// * `s` - The string to truncate
/// * `max_len` - Maximum length in characters, including the ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Collapses all whitespace runs (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
