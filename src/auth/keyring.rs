//
//  bitbucket-ops
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Secret storage in the system keyring.
//!
//! Secrets are stored under the `bitbucket-ops` service with one entry per
//! `{workspace}/{username}` pair, so switching workspaces in the config file
//! picks up the matching secret without re-entering it.

use anyhow::Result;
use keyring::Entry;

const SERVICE_NAME: &str = "bitbucket-ops";

/// System keyring backed secret store.
///
/// Uses the platform keychain (macOS Keychain, Windows Credential Manager,
/// Secret Service on Linux).
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store using the default service name.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Returns the keyring account name for a workspace/username pair.
    pub fn account(workspace: &str, username: &str) -> String {
        format!("{}/{}", workspace, username)
    }

    /// Stores the secret for a workspace/username pair, replacing any existing one.
    pub fn store(&self, workspace: &str, username: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, &Self::account(workspace, username))?;
        entry.set_password(secret)?;
        Ok(())
    }

    /// Retrieves the secret for a workspace/username pair.
    ///
    /// Returns `Ok(None)` when no entry exists.
    pub fn get(&self, workspace: &str, username: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, &Self::account(workspace, username))?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the secret for a workspace/username pair.
    ///
    /// Deleting a missing entry is not an error.
    pub fn delete(&self, workspace: &str, username: &str) -> Result<()> {
        let entry = Entry::new(&self.service, &Self::account(workspace, username))?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(e.into()),
        }
    }
}
