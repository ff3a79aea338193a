use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub fn ledgerly_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ledgerly"))
}

pub fn ensure_ledgerly_home() -> Result<PathBuf> {
    let dir = ledgerly_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub api_token: Option<String>,
    pub default_ledger: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_token: None,
            default_ledger: None,
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:3000/api".to_string()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ledgerly_home()?.join("config.json"))
}

pub fn read_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn write_config(config: &Config) -> Result<()> {
    let p = config_path()?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
