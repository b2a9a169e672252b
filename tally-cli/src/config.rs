use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tally_ingest::SourceFormat;
use tally_report::{Layout, ReportOptions};

use crate::state::{ensure_tally_home, tally_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory reports are written to when no output path is given
    pub dir: PathBuf,
    /// File name prefix placed before the input's stem
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Forces a layout; unset picks one from the source format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    pub tax_code: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: "categorized_".to_string(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            layout: None,
            tax_code: "T9".to_string(),
        }
    }
}

impl Config {
    /// Report options for a source; an explicit layout beats the config, which beats the format default.
    pub fn report_options(&self, format: SourceFormat, layout: Option<Layout>) -> ReportOptions {
        let layout = layout.or(self.report.layout).unwrap_or(match format {
            SourceFormat::Csv => Layout::Standard,
            SourceFormat::Pdf => Layout::Accounting,
        });
        ReportOptions {
            layout,
            tax_code: self.report.tax_code.clone(),
        }
    }

    /// `<dir>/<prefix><input stem>.xlsx`
    pub fn default_output(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "statement".to_string());
        self.output.dir.join(format!("{}{stem}.xlsx", self.output.prefix))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    parse_config_file(&p)
}

fn parse_config_file(p: &Path) -> Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_tally_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config()?;
    let source = if p.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
