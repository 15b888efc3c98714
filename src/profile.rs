use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

const PROFILE_DIR_ENV: &str = "MEDIBOOK_HOME";
const PROFILE_DIR: &str = ".medibook";

/// Client-side configuration persisted in the profile directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub api: Option<ApiConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

/// The profile directory holding `config.json` and `session.json`.
#[derive(Clone)]
pub struct Profile {
    root: PathBuf,
}

impl Profile {
    /// Resolve the profile directory: `$MEDIBOOK_HOME` if set, otherwise
    /// `$HOME/.medibook`. Creates it on first use.
    pub fn open_default() -> Result<Self> {
        let root = match std::env::var_os(PROFILE_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = std::env::var_os("HOME")
                    .ok_or_else(|| anyhow!("HOME not set (set {} explicitly)", PROFILE_DIR_ENV))?;
                PathBuf::from(home).join(PROFILE_DIR)
            }
        };
        Self::open_at(root)
    }

    pub fn open_at(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)
            .with_context(|| format!("create profile dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn read_config(&self) -> Result<ClientConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(ClientConfig {
                version: 1,
                api: None,
            });
        }
        let bytes = fs::read(&path).context("read config.json")?;
        let cfg: ClientConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ClientConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.config_path(), &bytes).context("write config.json")?;
        Ok(())
    }

    /// Configured API base URL, or an actionable error.
    pub fn require_base_url(&self) -> Result<String> {
        let cfg = self.read_config()?;
        cfg.api.map(|a| a.base_url).context(
            "no API configured (run `medibook config set-url --url https://host/api/v1`)",
        )
    }
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
