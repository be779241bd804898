//! Layered settings.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! `TOPLOG_*` environment variables, command line flags.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Config file read from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "toplog.toml";

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory searched for logs when no files are named.
    pub input_dir: PathBuf,
    /// Directory CSV results are written to.
    pub output_dir: PathBuf,
    /// Minimum value a process needs to appear in a `top` table.
    pub threshold: f64,
    /// Number of processes drawn per `top` chart.
    pub rank_limit: usize,
    /// Number of x axis labels per chart.
    pub tick_count: usize,
    /// Also write an Excel workbook per `top` table.
    pub with_excel: bool,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub rank_limit: Option<usize>,
    pub with_excel: Option<bool>,
}

impl Settings {
    /// Build settings from every layer.
    ///
    /// An explicit `file` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used if present.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        Config::builder()
            .set_default("input_dir", "input")?
            .set_default("output_dir", "output")?
            .set_default("threshold", crate::data::DEFAULT_THRESHOLD)?
            .set_default("rank_limit", 5_i64)?
            .set_default("tick_count", crate::export::DEFAULT_TICK_COUNT as i64)?
            .set_default("with_excel", false)?
            .add_source(file_source)
            .add_source(Environment::with_prefix("TOPLOG"))
            .set_override_option("input_dir", path_value(&overrides.input_dir))?
            .set_override_option("output_dir", path_value(&overrides.output_dir))?
            .set_override_option("threshold", overrides.threshold)?
            .set_override_option("rank_limit", overrides.rank_limit.map(|n| n as i64))?
            .set_override_option("with_excel", overrides.with_excel)?
            .build()?
            .try_deserialize()
    }
}

fn path_value(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.to_string_lossy().into_owned())
}
