// src/config.rs

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};
use tracing::info;

use crate::data::DEFAULT_BOUNDARIES_URL;

/// Command-line args, each with an environment fallback.
#[derive(Parser, Debug, Clone)]
#[command(name = "prenoms", about = "French first-name usage dashboard")]
pub struct Args {
    /// Semicolon-delimited name table, or a cleaned `.parquet` table
    #[arg(long, env = "PRENOMS_TABLE", default_value = "merged.csv")]
    pub table: PathBuf,

    /// Department boundary GeoJSON: an http(s) URL or a local path
    #[arg(long, env = "PRENOMS_BOUNDARIES", default_value = DEFAULT_BOUNDARIES_URL)]
    pub boundaries: String,

    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 8050)]
    pub port: u16,

    /// Optional YAML file overriding dashboard settings
    #[arg(long, env = "PRENOMS_SETTINGS")]
    pub settings: Option<PathBuf>,
}

impl Args {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Presentation settings. Every field has a default, so a settings file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
    /// Initial checklist selection, sent as-is with the first update even
    /// when a label has no checkbox. The stock value names a label the data
    /// never produces, which leaves the first render empty until the user
    /// picks a sex.
    pub default_sexes: Vec<String>,
    pub year_mark_step: u32,
    /// GeoJSON property holding the department code.
    pub feature_key: String,
    pub map: MapSettings,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "France First Name Dashboard".to_string(),
            default_sexes: vec!["Homme".to_string()],
            year_mark_step: 5,
            feature_key: "code".to_string(),
            map: MapSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub style: String,
    pub zoom: f64,
    pub center: MapCenter,
    pub opacity: f64,
    pub color_scale: String,
    pub colorbar_title: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            style: "carto-positron".to_string(),
            zoom: 5.0,
            center: MapCenter::default(),
            opacity: 0.5,
            color_scale: "Reds".to_string(),
            colorbar_title: "Nombre de prenoms".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

impl Default for MapCenter {
    fn default() -> Self {
        Self {
            lat: 46.603354,
            lon: 1.888334,
        }
    }
}

impl DashboardSettings {
    /// Read settings from `path`, or use the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading settings {}", path.display()))?;
                let settings = Self::from_yaml(&text)
                    .with_context(|| format!("parsing settings {}", path.display()))?;
                info!(path = %path.display(), "loaded dashboard settings");
                settings
            }
            None => Self::default(),
        };
        Ok(settings)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.year_mark_step == 0 {
            bail!("year_mark_step must be at least 1");
        }
        if self.feature_key.trim().is_empty() {
            bail!("feature_key must not be empty");
        }
        if !(0.0..=1.0).contains(&self.map.opacity) {
            bail!("map opacity {} is outside 0..=1", self.map.opacity);
        }
        Ok(())
    }
}
