use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_FILE_VAR: &str = "MAILEXTRA_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub folder: FolderConfig,
    #[serde(default)]
    pub extra: ExtraConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderConfig {
    pub path: PathBuf,
    pub summary_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtraConfig {
    #[serde(default = "default_reply_prefixes")]
    pub reply_prefixes: Vec<String>,
    #[serde(default = "default_forward_prefixes")]
    pub forward_prefixes: Vec<String>,
}

impl Default for ExtraConfig {
    fn default() -> Self {
        Self {
            reply_prefixes: default_reply_prefixes(),
            forward_prefixes: default_forward_prefixes(),
        }
    }
}

fn default_reply_prefixes() -> Vec<String> {
    vec!["Re".to_string()]
}

fn default_forward_prefixes() -> Vec<String> {
    vec!["Fwd".to_string(), "Fw".to_string()]
}

/// Split a comma-separated list, dropping empty entries
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    /// Load from the file named by `MAILEXTRA_CONFIG`, or from the environment
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        match std::env::var(CONFIG_FILE_VAR) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => Self::from_env(),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            folder: FolderConfig {
                path: PathBuf::from(
                    std::env::var("MAIL_FOLDER").unwrap_or_else(|_| "./mail".to_string()),
                ),
                summary_file: std::env::var("MAIL_SUMMARY_FILE").ok().map(PathBuf::from),
            },
            extra: ExtraConfig {
                reply_prefixes: std::env::var("EXTRA_REPLY_PREFIXES")
                    .map(|v| split_list(&v))
                    .unwrap_or_else(|_| default_reply_prefixes()),
                forward_prefixes: std::env::var("EXTRA_FORWARD_PREFIXES")
                    .map(|v| split_list(&v))
                    .unwrap_or_else(|_| default_forward_prefixes()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Re, AW,,Sv "), vec!["Re", "AW", "Sv"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_toml_with_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [folder]
            path = "/var/mail/inbox"
            "#,
        )
        .unwrap();
        assert_eq!(config.folder.path, PathBuf::from("/var/mail/inbox"));
        assert!(config.folder.summary_file.is_none());
        assert_eq!(config.extra.reply_prefixes, vec!["Re"]);
        assert_eq!(config.extra.forward_prefixes, vec!["Fwd", "Fw"]);
    }

    #[test]
    fn test_toml_full() {
        let config = AppConfig::from_toml(
            r#"
            [folder]
            path = "inbox"
            summary_file = "inbox.summary"

            [extra]
            reply_prefixes = ["Re", "AW"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.folder.summary_file,
            Some(PathBuf::from("inbox.summary"))
        );
        assert_eq!(config.extra.reply_prefixes, vec!["Re", "AW"]);
        assert_eq!(config.extra.forward_prefixes, vec!["Fwd", "Fw"]);
    }

    #[test]
    fn test_toml_missing_folder_fails() {
        assert!(AppConfig::from_toml("[extra]\nreply_prefixes = []\n").is_err());
    }
}
