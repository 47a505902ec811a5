use crate::auth::Credential;
use crate::error::{Result, SubletError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

const API_URL_ENV: &str = "SUBLET_API_URL";
const API_TOKEN_ENV: &str = "SUBLET_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub token: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            token: None,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SubletError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sublet-images").join("config.json"))
    }

    /// APIのベースURL（環境変数を優先、末尾の `/` は除く）
    pub fn api_base_url(&self) -> String {
        let url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api_base_url.clone());
        url.trim_end_matches('/').to_string()
    }

    /// 認証情報（環境変数を優先）。未設定ならNone
    pub fn credential(&self) -> Option<Credential> {
        credential_from(std::env::var(API_TOKEN_ENV).ok(), self.token.clone())
    }

    pub fn set_token(&mut self, token: String) -> Result<()> {
        if Credential::new(token.clone()).is_none() {
            return Err(SubletError::Config("トークンが空です".into()));
        }
        self.token = Some(token);
        self.save()
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SubletError::Config(format!("URLが不正です: {}", url)));
        }
        self.api_base_url = url;
        self.save()
    }
}

/// 空白だけの値は未設定として次の候補へ進む
fn credential_from(env: Option<String>, file: Option<String>) -> Option<Credential> {
    env.and_then(Credential::new)
        .or_else(|| file.and_then(Credential::new))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.token.is_none());
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_base_url: "https://api.example.com/api/v1".into(),
            token: Some("tok".into()),
            timeout_seconds: 5,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url, "https://api.example.com/api/v1");
        assert_eq!(loaded.token.as_deref(), Some("tok"));
        assert_eq!(loaded.timeout_seconds, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token": "abc"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(loaded.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_env_token_falls_back_to_file() {
        let credential = credential_from(Some("  ".into()), Some("file-token".into())).unwrap();
        assert_eq!(credential.bearer(), "Bearer file-token");

        let credential = credential_from(Some("env-token".into()), Some("file-token".into())).unwrap();
        assert_eq!(credential.bearer(), "Bearer env-token");

        assert!(credential_from(Some(String::new()), Some(" ".into())).is_none());
        assert!(credential_from(None, None).is_none());
    }
}
