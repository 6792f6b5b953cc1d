//! Token storage
//!
//! Tokens go to the system keyring (macOS Keychain, Secret Service,
//! Windows Credential Manager) under the `basecamp-cli` service, one entry
//! per account. When no keyring is reachable they go to `tokens.json` in
//! the configuration directory instead, keyed by account id (or `default`)
//! and readable only by the current user.

use super::types::{StoredTokens, TokenResponse};
use crate::config::{write_private_file, Config};
use crate::error::{Error, Result};
use keyring::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

const TOKENS_FILE: &str = "tokens.json";

/// Keyring service every entry is stored under
pub const KEYRING_SERVICE: &str = "basecamp-cli";

/// Key used when no account id is known
pub const DEFAULT_ACCOUNT_KEY: &str = "default";

static KEYRING_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Where a store keeps its tokens
#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Keyring,
    File(PathBuf),
}

/// Token store scoped to one account
#[derive(Debug, Clone)]
pub struct TokenStore {
    backend: Backend,
    account_key: String,
}

impl TokenStore {
    /// Store chosen for `config`
    ///
    /// Uses the keyring when the configuration allows it and one is
    /// reachable, and `tokens.json` in the configuration directory otherwise.
    pub fn for_config(config: &Config, account_id: Option<u64>) -> Self {
        if config.uses_keyring() {
            if keyring_available() {
                return Self::keyring(account_id);
            }
            warn!("System keyring unavailable, storing tokens in {}", TOKENS_FILE);
        }
        Self::file(config.dir(), account_id)
    }

    /// Store in the system keyring for the given account (`None` = default slot)
    pub fn keyring(account_id: Option<u64>) -> Self {
        Self {
            backend: Backend::Keyring,
            account_key: account_key(account_id),
        }
    }

    /// Store in `dir/tokens.json` for the given account (`None` = default slot)
    pub fn file(dir: impl AsRef<Path>, account_id: Option<u64>) -> Self {
        Self {
            backend: Backend::File(dir.as_ref().join(TOKENS_FILE)),
            account_key: account_key(account_id),
        }
    }

    /// Account key this store reads and writes
    pub fn account_key(&self) -> &str {
        &self.account_key
    }

    /// Backing file, when tokens are not kept in the keyring
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path),
            Backend::Keyring => None,
        }
    }

    /// Short name of the backend, for messages
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Keyring => "keyring",
            Backend::File(_) => "file",
        }
    }

    /// Persist tokens from a token endpoint response
    pub fn store_response(&self, response: TokenResponse) -> Result<StoredTokens> {
        let tokens = StoredTokens::from_response(response);
        self.store(&tokens)?;
        Ok(tokens)
    }

    /// Persist tokens for this account
    pub fn store(&self, tokens: &StoredTokens) -> Result<()> {
        match &self.backend {
            Backend::Keyring => {
                let json = serde_json::to_string(tokens)?;
                self.entry()?
                    .set_password(&json)
                    .map_err(|e| Error::token_store(format!("Failed to write keyring entry: {e}")))?;
            }
            Backend::File(path) => {
                let mut all = read_all(path)?;
                all.insert(self.account_key.clone(), tokens.clone());
                write_all(path, &all)?;
            }
        }
        debug!(backend = self.backend_name(), "Stored tokens for account {}", self.account_key);
        Ok(())
    }

    /// Stored tokens for this account
    pub fn get(&self) -> Result<Option<StoredTokens>> {
        match &self.backend {
            Backend::Keyring => match self.entry()?.get_password() {
                Ok(json) => serde_json::from_str(&json).map(Some).map_err(|e| {
                    Error::token_store(format!("Failed to parse tokens from keyring: {e}"))
                }),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(Error::token_store(format!(
                    "Failed to read keyring entry: {e}"
                ))),
            },
            Backend::File(path) => Ok(read_all(path)?.remove(&self.account_key)),
        }
    }

    /// The stored access token, if any
    pub fn access_token(&self) -> Result<Option<String>> {
        Ok(self.get()?.map(|t| t.access_token))
    }

    /// True when tokens are missing or past their expiry
    pub fn is_expired(&self) -> Result<bool> {
        Ok(self.get()?.map_or(true, |t| t.is_expired()))
    }

    /// Remove this account's tokens; removing nothing is not an error
    pub fn clear(&self) -> Result<bool> {
        match &self.backend {
            Backend::Keyring => match self.entry()?.delete_password() {
                Ok(()) => Ok(true),
                Err(keyring::Error::NoEntry) => Ok(false),
                Err(e) => Err(Error::token_store(format!(
                    "Failed to delete keyring entry: {e}"
                ))),
            },
            Backend::File(path) => {
                let mut all = read_all(path)?;
                let removed = all.remove(&self.account_key).is_some();
                if removed {
                    write_all(path, &all)?;
                }
                Ok(removed)
            }
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE, &self.account_key)
            .map_err(|e| Error::token_store(format!("Failed to open keyring entry: {e}")))
    }
}

fn account_key(account_id: Option<u64>) -> String {
    account_id.map_or_else(|| DEFAULT_ACCOUNT_KEY.to_string(), |id| id.to_string())
}

/// Whether a keyring backend answers; checked once per process
pub fn keyring_available() -> bool {
    *KEYRING_AVAILABLE.get_or_init(|| {
        let available = match Entry::new(KEYRING_SERVICE, "availability-check") {
            Ok(entry) => match entry.get_password() {
                Ok(_) | Err(keyring::Error::NoEntry) => true,
                Err(keyring::Error::NoStorageAccess(_) | keyring::Error::PlatformFailure(_)) => {
                    false
                }
                Err(_) => true,
            },
            Err(_) => false,
        };
        debug!(available, "Checked system keyring");
        available
    })
}

fn read_all(path: &Path) -> Result<BTreeMap<String, StoredTokens>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::token_store(format!("Failed to read tokens: {e}")))?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&contents)
        .map_err(|e| Error::token_store(format!("Failed to parse tokens: {e}")))
}

fn write_all(path: &Path, all: &BTreeMap<String, StoredTokens>) -> Result<()> {
    let contents = serde_json::to_string_pretty(all)?;
    write_private_file(path, &contents)
        .map_err(|e| Error::token_store(format!("Failed to write tokens: {e}")))
}
