//
//  bitbucket-ops
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive Prompts Module
//!
//! Thin wrappers around `dialoguer` used by `bbops auth login` and
//! `bbops auth logout`.
//!
//! # Example
//!
//! ```no_run
//! use bitbucket_ops::interactive::prompt::{prompt_input, prompt_password};
//!
//! let workspace = prompt_input("Workspace").unwrap();
//! let secret = prompt_password("API key").unwrap();
//! ```

use anyhow::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompts for a single line of non-empty text.
pub fn prompt_input(message: &str) -> Result<String> {
    let input: String = Input::new().with_prompt(message).interact_text()?;
    Ok(input)
}

/// Prompts for text, offering `default` when the user just presses enter.
pub fn prompt_input_with_default(message: &str, default: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(message)
        .default(default.to_string())
        .interact_text()?;
    Ok(input)
}

/// Prompts for text with a default when one is known, without otherwise.
pub fn prompt_input_or_default(message: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) => prompt_input_with_default(message, default),
        None => prompt_input(message),
    }
}

/// Prompts for a secret; input is not echoed.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

/// Asks a yes/no question with a default answer.
pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}
