//! Configuration storage
//!
//! Settings live in `~/.basecamp/config.json` (or `$BASECAMP_CONFIG_DIR`).
//! Files are written atomically and restricted to the current user.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "BASECAMP_CONFIG_DIR";

/// Environment variable selecting token storage; `file` skips the keyring
pub const TOKEN_STORE_ENV: &str = "BASECAMP_TOKEN_STORE";

/// Redirect URI used when none is configured
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";

/// Out-of-band redirect URI (poorly supported by modern browsers)
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

const CONFIG_FILE: &str = "config.json";

// ============================================================================
// Settings
// ============================================================================

/// OAuth2 application credentials registered in Basecamp Launchpad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

impl OAuthSettings {
    /// Whether the redirect URI is the out-of-band URN
    pub fn is_oob(&self) -> bool {
        self.redirect_uri == OOB_REDIRECT_URI
    }
}

/// Contents of `config.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,

    /// Keys written by other tools are carried through untouched
    #[serde(flatten)]
    pub extra: JsonObject,
}

// ============================================================================
// Config
// ============================================================================

/// Handle on the configuration directory
#[derive(Debug, Clone)]
pub struct Config {
    dir: PathBuf,
    file: PathBuf,
    keyring: bool,
}

impl Config {
    /// Open the configuration in the default directory
    ///
    /// Tokens go to the system keyring unless `$BASECAMP_TOKEN_STORE` is
    /// `file`.
    pub fn new() -> Result<Self> {
        let keyring = std::env::var(TOKEN_STORE_ENV)
            .map_or(true, |value| !value.eq_ignore_ascii_case("file"));
        Ok(Self::with_dir(Self::default_dir()?).with_keyring(keyring))
    }

    /// Open the configuration in a specific directory
    ///
    /// Tokens are kept in files next to `config.json`; see
    /// [`Config::with_keyring`].
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let file = dir.join(CONFIG_FILE);
        Self {
            dir,
            file,
            keyring: false,
        }
    }

    /// Allow or forbid the system keyring for tokens
    #[must_use]
    pub fn with_keyring(mut self, enabled: bool) -> Self {
        self.keyring = enabled;
        self
    }

    /// Whether tokens may go to the system keyring
    pub fn uses_keyring(&self) -> bool {
        self.keyring
    }

    /// `$BASECAMP_CONFIG_DIR`, falling back to `~/.basecamp`
    pub fn default_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::home_dir()
            .map(|home| home.join(".basecamp"))
            .ok_or_else(|| Error::config("Could not determine home directory"))
    }

    /// Configuration directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `config.json`
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Whether `config.json` exists
    pub fn exists(&self) -> bool {
        self.file.exists()
    }

    /// Load settings; a missing or unreadable file yields empty settings
    pub fn load(&self) -> Settings {
        if !self.file.exists() {
            return Settings::default();
        }
        let loaded = fs::read_to_string(&self.file)
            .map_err(Error::from)
            .and_then(|contents| serde_json::from_str(&contents).map_err(Error::from));
        match loaded {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Error loading config {}: {e}", self.file.display());
                Settings::default()
            }
        }
    }

    /// Persist settings
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let contents = serde_json::to_string_pretty(settings)?;
        write_private_file(&self.file, &contents)
            .map_err(|e| Error::config(format!("Error saving config: {e}")))?;
        debug!("Saved config to {}", self.file.display());
        Ok(())
    }

    /// Store OAuth2 application credentials
    pub fn configure_oauth(
        &self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Result<()> {
        let mut settings = self.load();
        settings.oauth = Some(OAuthSettings {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        });
        self.save(&settings)
    }

    /// OAuth2 application credentials, if configured
    pub fn oauth(&self) -> Option<OAuthSettings> {
        self.load().oauth
    }

    /// Default account id, if configured
    pub fn account_id(&self) -> Option<u64> {
        self.load().account_id
    }

    /// Remember an account id as the default
    pub fn set_account_id(&self, account_id: u64) -> Result<()> {
        let mut settings = self.load();
        settings.account_id = Some(account_id);
        self.save(&settings)
    }

    /// Explicit account id, else the configured default
    pub fn resolve_account_id(&self, explicit: Option<u64>) -> Result<u64> {
        explicit
            .or_else(|| self.account_id())
            .ok_or(Error::MissingAccountId)
    }
}

/// Write a file readable only by the current user, via temp file + rename
pub(crate) fn write_private_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&temp_path)?;
    // The mode only applies on creation
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path());
        assert!(!config.exists());
        assert_eq!(config.load(), Settings::default());
    }

    #[test]
    fn test_configure_oauth_roundtrip() {
        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path().join("nested"));

        config
            .configure_oauth("client", "secret", DEFAULT_REDIRECT_URI)
            .unwrap();

        let oauth = config.oauth().unwrap();
        assert_eq!(oauth.client_id, "client");
        assert_eq!(oauth.client_secret, "secret");
        assert!(!oauth.is_oob());
        assert!(config.exists());
    }

    #[test]
    fn test_account_id_preserves_oauth() {
        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path());

        config.configure_oauth("id", "secret", OOB_REDIRECT_URI).unwrap();
        config.set_account_id(999_999).unwrap();

        assert_eq!(config.account_id(), Some(999_999));
        assert!(config.oauth().unwrap().is_oob());
    }

    #[test]
    fn test_resolve_account_id() {
        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path());

        assert!(matches!(
            config.resolve_account_id(None),
            Err(Error::MissingAccountId)
        ));
        assert_eq!(config.resolve_account_id(Some(7)).unwrap(), 7);

        config.set_account_id(12).unwrap();
        assert_eq!(config.resolve_account_id(None).unwrap(), 12);
        assert_eq!(config.resolve_account_id(Some(7)).unwrap(), 7);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path());
        fs::write(config.file(), "{ not json").unwrap();

        assert_eq!(config.load(), Settings::default());
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path());
        fs::write(config.file(), r#"{"editor": "vim"}"#).unwrap();

        config.set_account_id(1).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(config.file()).unwrap()).unwrap();
        assert_eq!(raw["editor"], "vim");
        assert_eq!(raw["account_id"], 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path());
        config.set_account_id(1).unwrap();

        let mode = fs::metadata(config.file()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_temp_file_does_not_leak_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let target = dir.path().join("tokens.json");
        let temp = dir.path().join("tokens.tmp");
        fs::write(&temp, "stale").unwrap();
        fs::set_permissions(&temp, fs::Permissions::from_mode(0o644)).unwrap();

        write_private_file(&target, "{}").unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
        assert!(!temp.exists());
    }

    #[test]
    fn test_with_dir_keeps_tokens_in_files() {
        let dir = tempdir().unwrap();
        let config = Config::with_dir(dir.path());
        assert!(!config.uses_keyring());
        assert!(config.with_keyring(true).uses_keyring());
    }
}
