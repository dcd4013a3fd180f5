// src/data/boundaries.rs

use anyhow::{bail, Context, Result};
use geojson::{FeatureCollection, GeoJson};
use reqwest::Client;
use serde_json::Value;
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/gregoiredavid/france-geojson/master/departements.geojson";

/// Department polygons, keyed by the code stored under `properties.<feature_key>`.
#[derive(Debug, Clone)]
pub struct Boundaries {
    document: Arc<Value>,
    feature_key: String,
    codes: HashSet<String>,
    feature_count: usize,
}

impl Boundaries {
    pub fn new(collection: &FeatureCollection, feature_key: &str) -> Result<Self> {
        let codes = collection
            .features
            .iter()
            .filter_map(|f| f.property(feature_key))
            .filter_map(feature_code)
            .collect::<HashSet<_>>();
        if codes.len() < collection.features.len() {
            debug!(
                features = collection.features.len(),
                coded = codes.len(),
                feature_key,
                "some boundary features carry no usable code"
            );
        }
        let document =
            serde_json::to_value(collection).context("serialising boundary collection")?;

        Ok(Self {
            document: Arc::new(document),
            feature_key: feature_key.to_string(),
            codes,
            feature_count: collection.features.len(),
        })
    }

    pub fn from_geojson_str(text: &str, feature_key: &str) -> Result<Self> {
        let geojson: GeoJson = text.parse().context("parsing boundary GeoJSON")?;
        match geojson {
            GeoJson::FeatureCollection(collection) => Self::new(&collection, feature_key),
            GeoJson::Feature(_) => bail!("boundary document is a single Feature, expected a FeatureCollection"),
            GeoJson::Geometry(_) => bail!("boundary document is a bare Geometry, expected a FeatureCollection"),
        }
    }

    /// The collection as plotly expects it in a `geojson` trace attribute.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Plotly `featureidkey`, e.g. `properties.code`.
    pub fn feature_id_key(&self) -> String {
        format!("properties.{}", self.feature_key)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.feature_count
    }

    pub fn is_empty(&self) -> bool {
        self.feature_count == 0
    }
}

fn feature_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Load boundaries from an `http(s)` URL or, failing that, a local file path.
#[instrument(skip(client))]
pub async fn load_boundaries(client: &Client, source: &str, feature_key: &str) -> Result<Boundaries> {
    let text = match Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => fetch_text(client, &url).await?,
        _ => tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("reading boundaries from {}", source))?,
    };

    let boundaries = Boundaries::from_geojson_str(&text, feature_key)
        .with_context(|| format!("loading boundaries from {}", source))?;
    info!(features = boundaries.len(), "loaded department boundaries");
    Ok(boundaries)
}

async fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching boundaries from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}
