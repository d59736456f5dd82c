use crate::calc::GradingScheme;
use crate::group::CourseGroup;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

pub const CONFIG_ENV: &str = "CALCUD_CONFIG";
pub const LOG_ENV: &str = "CALCUD_LOG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub log_level: String,
    pub scheme: GradingScheme,
    pub default_group: CourseGroup,
    pub seed_blank_student: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            scheme: GradingScheme::default(),
            default_group: CourseGroup::default(),
            seed_blank_student: true,
        }
    }
}

impl Config {
    /// Defaults, then the JSON file named by `CALCUD_CONFIG`, then
    /// `CALCUD_LOG` for the log level.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => Self::from_file(Path::new(&p))?,
            _ => Self::default(),
        };
        if let Ok(level) = std::env::var(LOG_ENV) {
            if !level.trim().is_empty() {
                cfg.log_level = level.trim().to_string();
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.scheme
            .validate()
            .map_err(|m| anyhow::anyhow!("invalid grading scheme: {m}"))?;
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> anyhow::Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("invalid log level: {}", self.log_level))
    }
}
