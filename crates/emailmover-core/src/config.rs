use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_SOURCE_ROOT: &str = "/akl_live/newforma_pm/";
const DEFAULT_TARGET_ROOT: &str = "/akl_live/akl_office/data/hcg/hr/admin/SensitiveEmails/";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Manifest CSV of (directory, subject) rows.
    pub manifest_path: PathBuf,
    /// Root the normalized manifest paths currently live under.
    pub source_root: PathBuf,
    /// Root matched files get moved under, mirroring the relative paths.
    pub target_root: PathBuf,
    /// Where info.csv, output.csv and output_questionable.csv are written.
    pub output_dir: PathBuf,
    /// Move matched files after the audit tables are written.
    pub relocate: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("list.csv"),
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
            target_root: PathBuf::from(DEFAULT_TARGET_ROOT),
            output_dir: PathBuf::from("."),
            relocate: false,
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, Error> {
    load_configuration_from(Path::new("Config"))
}

/// Layer an optional config file (extension inferred) and `EMAILMOVER_*`
/// environment variables over the defaults.
pub fn load_configuration_from(path: &Path) -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(false))
        .add_source(Environment::with_prefix("EMAILMOVER"))
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}
