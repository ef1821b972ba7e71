//
//  bitbucket-ops
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 payload types.
//!
//! Typed request bodies and response fragments for the endpoints the
//! operations call, organized by resource type:
//!
//! - [`pullrequests`] - Pull request creation, comments, merging, state filters
//! - [`refs`] - Branch lookup and creation
//! - [`source`] - File commits and file content
//!
//! # Notes
//!
//! - Response bodies are passed through to callers as JSON; only the fields
//!   an operation depends on (such as a branch's head hash) are typed here.

pub mod pullrequests;
pub mod refs;
pub mod source;

pub use pullrequests::*;
pub use refs::*;
pub use source::*;
