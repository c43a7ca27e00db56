use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_DASHBOARD_PERIOD_DAYS: u32 = 7;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the PhishGard-AI backend, e.g. "http://127.0.0.1:8000".
    pub api_base_url: String,
    pub poll_interval_secs: Option<u64>,
    pub dashboard_period_days: Option<u32>,
}

impl Config {
    pub fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    pub fn dashboard_period_days(&self) -> u32 {
        self.dashboard_period_days
            .unwrap_or(DEFAULT_DASHBOARD_PERIOD_DAYS)
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("phishgard_client"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        // create a template config for users to edit
        let sample = Config {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            poll_interval_secs: Some(DEFAULT_POLL_INTERVAL_SECS),
            dashboard_period_days: Some(DEFAULT_DASHBOARD_PERIOD_DAYS),
        };
        let tom = toml::to_string_pretty(&sample)?;
        fs::write(&path, tom)?;
        return Err(anyhow::anyhow!(
            "Created template config at {} — edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}
