use anyhow::{Context, Result};
use clap::ValueEnum;
use salesdash_ingest::QuantityPolicy;
use salesdash_ingest::normalize::DEFAULT_DATE_FORMATS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub ingest: IngestSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSection {
    /// Local CSV export of the ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
    /// CSV export URL; takes precedence over `csv_path` when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    /// Google Sheets document id, used when `sheet_url` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSection {
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
    #[serde(default)]
    pub quantity_policy: QuantityPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub format: OutputFormat,
    /// Prefix for money values in text output.
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect()
}

fn default_currency() -> String {
    "S/.".to_string()
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            date_formats: default_date_formats(),
            quantity_policy: QuantityPolicy::default(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            currency: default_currency(),
        }
    }
}

pub fn salesdash_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".salesdash"))
}

pub fn ensure_salesdash_home() -> Result<PathBuf> {
    let dir = salesdash_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(salesdash_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn to_toml(cfg: &Config) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

pub fn init_config() -> Result<()> {
    let p = ensure_salesdash_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    fs::write(&p, to_toml(&Config::default())?).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.ingest.quantity_policy, QuantityPolicy::Skip);
        assert_eq!(cfg.ingest.date_formats.len(), DEFAULT_DATE_FORMATS.len());
        assert_eq!(cfg.report.format, OutputFormat::Text);
        assert!(cfg.source.csv_path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[source]
sheet_url = "https://example.com/export?format=csv"
sheet_id = "abc123"

[ingest]
quantity_policy = "abort"

[report]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(cfg.source.sheet_url.as_deref(), Some("https://example.com/export?format=csv"));
        assert_eq!(cfg.source.sheet_id.as_deref(), Some("abc123"));
        assert_eq!(cfg.ingest.quantity_policy, QuantityPolicy::Abort);
        assert_eq!(cfg.ingest.date_formats[0], "%Y-%m-%d");
        assert_eq!(cfg.report.format, OutputFormat::Json);
        assert_eq!(cfg.report.currency, "S/.");
    }

    #[test]
    fn test_default_config_survives_toml() {
        let s = to_toml(&Config::default()).unwrap();
        let back = parse_config(&s).unwrap();
        assert_eq!(back.ingest.date_formats, Config::default().ingest.date_formats);
    }
}
