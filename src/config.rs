use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "release.toml";

/// Represents the complete configuration for release-bump.
///
/// Contains the product name, project file locations and the source-control policy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Product name used in `config.json`'s `name`. Falls back to
    /// `productName` / `name` from `package.json` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_package_file() -> String {
    "package.json".to_string()
}

fn default_config_file() -> String {
    "config.json".to_string()
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

/// Paths of the three rewritten files, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_package_file")]
    pub package: String,

    #[serde(default = "default_config_file")]
    pub config: String,

    #[serde(default = "default_changelog_file")]
    pub changelog: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            package: default_package_file(),
            config: default_config_file(),
            changelog: default_changelog_file(),
        }
    }
}

/// Kind of tag created for the release commit.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    #[default]
    Annotated,
    Lightweight,
}

/// What to do when the tag to delete does not exist.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagDeletion {
    /// Missing tag aborts the release
    Strict,
    /// Missing tag is reported and skipped, so re-runs are idempotent
    #[default]
    Tolerant,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_user_name() -> String {
    "GitHub Action".to_string()
}

fn default_user_email() -> String {
    "action@github.com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

/// Source-control policy for the release commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Remote branch the release commit is pushed to
    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_user_name")]
    pub user_name: String,

    #[serde(default = "default_user_email")]
    pub user_email: String,

    #[serde(default)]
    pub tag_kind: TagKind,

    #[serde(default = "default_true")]
    pub delete_remote_tag: bool,

    #[serde(default)]
    pub tag_deletion: TagDeletion,

    /// Fast-forward from the remote branch before touching files
    #[serde(default = "default_true")]
    pub pull: bool,

    /// Environment variable holding an HTTPS token for the remote
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            branch: default_branch(),
            user_name: default_user_name(),
            user_email: default_user_email(),
            tag_kind: TagKind::default(),
            delete_remote_tag: true,
            tag_deletion: TagDeletion::default(),
            pull: true,
            token_env: default_token_env(),
        }
    }
}

/// The two values a release run is driven by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInputs {
    /// Version as received, e.g. `refs/tags/v1.2.3`
    pub version: String,
    /// Changelog excerpt for this release
    pub changelog: String,
}

impl ReleaseInputs {
    pub fn new(version: impl Into<String>, changelog: impl Into<String>) -> Self {
        ReleaseInputs {
            version: version.into(),
            changelog: changelog.into(),
        }
    }

    /// Both inputs are required; an empty version is rejected up front.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(ReleaseError::input("version"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the repository root
/// 3. `.release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>, root: &Path) -> Result<Config> {
    let repo_config = root.join(CONFIG_FILE);

    let (path, config_str) = if let Some(path) = config_path {
        (path.to_string(), read(path)?)
    } else if repo_config.exists() {
        (repo_config.display().to_string(), read(&repo_config)?)
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE));
        if config_path.exists() {
            (config_path.display().to_string(), read(&config_path)?)
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReleaseError::config(format!("{}: {}", path, e)))
}

/// Parses TOML configuration text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))
}

fn read(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| ReleaseError::file(path.display().to_string(), e))
}
