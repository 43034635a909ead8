use crate::codec::HexCase;

use serde::Deserialize;
use std::{env, fs, path::Path, time::Duration};
use anyhow::{Context, Result};
use tracing::warn;

pub const DEFAULT_PATH: &str = "config/console.toml";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub kv_url:        String,      // ex http://localhost:8000
    pub blockmeta_url: String,      // ex http://localhost:7878
    pub explorer_url:  String,      // block links go to {explorer_url}/block/{number}
    pub hex_case:      HexCase,     // raw payload rendering, "lower" | "upper"
    pub timeout_ms:    u64,         // handed to the HTTP client as is
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            kv_url:        "http://localhost:8000".to_string(),
            blockmeta_url: "http://localhost:7878".to_string(),
            explorer_url:  "https://etherscan.io".to_string(),
            hex_case:      HexCase::Lower,
            timeout_ms:    10_000,
        }
    }
}

impl ConsoleConfig {
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing console config as TOML")
    }

    pub fn load(path: &str) -> Result<Self> {
        let cfg = if Path::new(path).exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file `{}`", path))?;
            toml::from_str(&s)
                .with_context(|| format!("parsing `{}` as TOML", path))?
        } else {
            warn!(path, "config file not found, using defaults");
            ConsoleConfig::default()
        };
        Ok(cfg.with_env_overrides(|k| env::var(k).ok()))
    }

    // KV_API_URL / BLOCKMETA_API_URL win over the file
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("KV_API_URL").filter(|v| !v.is_empty()) {
            self.kv_url = v;
        }
        if let Some(v) = lookup("BLOCKMETA_API_URL").filter(|v| !v.is_empty()) {
            self.blockmeta_url = v;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = ConsoleConfig::parse("hex_case = \"upper\"\ntimeout_ms = 2500\n").unwrap();
        assert_eq!(cfg.hex_case, HexCase::Upper);
        assert_eq!(cfg.timeout(), Duration::from_millis(2500));
        assert_eq!(cfg.kv_url, "http://localhost:8000");
        assert_eq!(cfg.blockmeta_url, "http://localhost:7878");
    }

    #[test]
    fn bad_hex_case_is_rejected() {
        assert!(ConsoleConfig::parse("hex_case = \"mixed\"").is_err());
    }

    #[test]
    fn env_overrides_base_urls() {
        let cfg = ConsoleConfig::default().with_env_overrides(|k| match k {
            "KV_API_URL" => Some("http://kv.internal:9000".to_string()),
            "BLOCKMETA_API_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.kv_url, "http://kv.internal:9000");
        assert_eq!(cfg.blockmeta_url, "http://localhost:7878");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = ConsoleConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(cfg.explorer_url, "https://etherscan.io");
    }
}
