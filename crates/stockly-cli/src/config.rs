// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "stockly";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_EXPIRY_DAYS: u32 = 30;
const DEFAULT_DEAD_STOCK_MONTHS: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub session: SessionSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
            session: SessionSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some("5s".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub expiry_days: Option<u32>,
    pub dead_stock_months: Option<u32>,
    pub report_dir: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            expiry_days: Some(DEFAULT_EXPIRY_DAYS),
            dead_stock_months: Some(DEFAULT_DEAD_STOCK_MONTHS),
            report_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSection {
    pub path: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("STOCKLY_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set STOCKLY_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [api], [ui], and [session]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.base_url().is_empty() {
            bail!("api.base_url in {} must not be empty", path.display());
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(days) = self.ui.expiry_days
            && !(1..=90).contains(&days)
        {
            bail!(
                "ui.expiry_days in {} must be between 1 and 90, got {}",
                path.display(),
                days
            );
        }

        if let Some(months) = self.ui.dead_stock_months
            && !(1..=24).contains(&months)
        {
            bail!(
                "ui.dead_stock_months in {} must be between 1 and 24, got {}",
                path.display(),
                months
            );
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or("5s"))
    }

    pub fn expiry_days(&self) -> u32 {
        self.ui.expiry_days.unwrap_or(DEFAULT_EXPIRY_DAYS)
    }

    pub fn dead_stock_months(&self) -> u32 {
        self.ui.dead_stock_months.unwrap_or(DEFAULT_DEAD_STOCK_MONTHS)
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session.path {
            return Ok(PathBuf::from(path));
        }

        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [session].path in the config")
        })?;
        Ok(data_root.join(APP_NAME).join("session.toml"))
    }

    pub fn report_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.ui.report_dir {
            return Ok(PathBuf::from(dir));
        }

        if let Some(downloads) = dirs::download_dir() {
            return Ok(downloads);
        }
        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve a download directory; set [ui].report_dir in the config")
        })?;
        Ok(data_root.join(APP_NAME).join("reports"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# stockly config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\ntimeout = \"5s\"\n\n[ui]\nexpiry_days = {}\ndead_stock_months = {}\n# Optional. Default is the platform download dir\n# report_dir = \"/absolute/path/for/reports\"\n\n[session]\n# Optional. Default is the platform data dir (for example ~/.local/share/stockly/session.toml)\n# path = \"/absolute/path/to/session.toml\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_EXPIRY_DAYS,
            DEFAULT_DEAD_STOCK_MONTHS,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.base_url(), "http://127.0.0.1:5000");
        assert_eq!(config.expiry_days(), 30);
        assert_eq!(config.dead_stock_months(), 3);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url = \"http://localhost:5000\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [ui], and [session]"));
        Ok(())
    }

    #[test]
    fn wrong_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("future version should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn valid_config_parses_and_trims_base_url() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"http://stock.example.com/\"\ntimeout = \"2s\"\n[ui]\nexpiry_days = 14\ndead_stock_months = 6\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.base_url(), "http://stock.example.com");
        assert_eq!(config.timeout()?, Duration::from_secs(2));
        assert_eq!(config.expiry_days(), 14);
        assert_eq!(config.dead_stock_months(), 6);
        Ok(())
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nexpiry_days = 120\n")?;
        let error = Config::load(&path).expect_err("expiry_days out of range");
        assert!(error.to_string().contains("between 1 and 90"));

        let (_temp, path) = write_config("version = 1\n[ui]\ndead_stock_months = 0\n")?;
        let error = Config::load(&path).expect_err("dead_stock_months out of range");
        assert!(error.to_string().contains("between 1 and 24"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn durations_parse_all_supported_suffixes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));

        let error = parse_duration("5h").expect_err("hours are not supported");
        assert!(error.to_string().contains("invalid duration"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips() -> Result<()> {
        let (_temp, path) = write_config(&Config::example_config(std::path::Path::new(
            "/tmp/config.toml",
        )))?;
        let config = Config::load(&path)?;
        assert_eq!(config.version, 1);
        assert_eq!(config.expiry_days(), 30);
        Ok(())
    }
}
