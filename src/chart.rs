// src/chart.rs

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::{config::MapSettings, context::DashboardContext, data::Boundaries};

/// Counts per year for the current filter, drawn as a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub points: Vec<(i32, i64)>,
}

impl LineChart {
    pub fn new(name: Option<&str>, totals: BTreeMap<i32, i64>) -> Self {
        Self {
            title: line_title(name),
            points: totals.into_iter().collect(),
        }
    }

    pub fn total(&self) -> i64 {
        self.points.iter().map(|(_, count)| count).sum()
    }

    /// plotly.js figure.
    pub fn figure(&self) -> Value {
        let (x, y): (Vec<i32>, Vec<i64>) = self.points.iter().copied().unzip();
        json!({
            "data": [{
                "type": "scatter",
                "mode": "lines",
                "x": x,
                "y": y,
                "hovertemplate": "Annee=%{x}<br>Nombre=%{y}<extra></extra>",
            }],
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": "Annee" } },
                "yaxis": { "title": { "text": "Number of people" } },
            },
        })
    }
}

/// Title carries the name filter text as typed, empty when there is none.
pub fn line_title(name: Option<&str>) -> String {
    format!("Number of people for the first name\"{}\"", name.unwrap_or_default())
}

/// Counts per department joined against the boundary features.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethMap {
    /// Every department total from the filtered rows.
    pub totals: BTreeMap<String, i64>,
    /// Totals whose code matches a boundary feature; these are the coloured regions.
    pub regions: Vec<(String, i64)>,
    /// Codes with rows but no matching feature.
    pub unmatched: Vec<String>,
}

impl ChoroplethMap {
    pub fn join(totals: BTreeMap<String, i64>, boundaries: &Boundaries) -> Self {
        let (matched, unmatched): (Vec<_>, Vec<_>) = totals
            .iter()
            .map(|(code, total)| (code.clone(), *total))
            .partition(|(code, _)| boundaries.contains(code));
        let unmatched: Vec<String> = unmatched.into_iter().map(|(code, _)| code).collect();
        if !unmatched.is_empty() {
            debug!(?unmatched, "department totals without a boundary feature");
        }

        Self {
            totals,
            regions: matched,
            unmatched,
        }
    }

    /// Coloured value for `code`; `None` means no data, which is not zero.
    pub fn value(&self, code: &str) -> Option<i64> {
        self.regions
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, total)| *total)
    }

    pub fn total(&self) -> i64 {
        self.totals.values().sum()
    }

    /// plotly.js `choroplethmapbox` figure.
    pub fn figure(&self, boundaries: &Boundaries, map: &MapSettings) -> Value {
        let (locations, z): (Vec<&str>, Vec<i64>) = self
            .regions
            .iter()
            .map(|(code, total)| (code.as_str(), *total))
            .unzip();
        json!({
            "data": [{
                "type": "choroplethmapbox",
                "geojson": boundaries.document(),
                "featureidkey": boundaries.feature_id_key(),
                "locations": locations,
                "z": z,
                "colorscale": map.color_scale,
                "marker": { "opacity": map.opacity },
                "colorbar": {
                    "title": { "text": map.colorbar_title },
                    "x": 0,
                    "len": 0.5,
                },
                "hovertemplate": "Departement=%{location}<br>Nombre=%{z}<extra></extra>",
            }],
            "layout": {
                "mapbox": {
                    "style": map.style,
                    "zoom": map.zoom,
                    "center": { "lat": map.center.lat, "lon": map.center.lon },
                },
                "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
            },
        })
    }
}

/// Handler output: the line chart and the map, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPair {
    pub line: LineChart,
    pub map: ChoroplethMap,
}

impl ChartPair {
    pub fn figures(&self, ctx: &DashboardContext) -> FigurePair {
        FigurePair {
            line: self.line.figure(),
            map: self.map.figure(ctx.boundaries(), &ctx.settings().map),
        }
    }
}

/// Rendered figures as sent to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigurePair {
    pub line: Value,
    pub map: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_boundaries;

    #[test]
    fn test_line_title_keeps_literal_text() {
        assert_eq!(
            line_title(Some("Jean")),
            "Number of people for the first name\"Jean\""
        );
        assert_eq!(line_title(None), "Number of people for the first name\"\"");
    }

    #[test]
    fn test_line_figure_series() {
        let chart = LineChart::new(Some("Jean"), BTreeMap::from([(1951, 3), (1950, 100)]));
        assert_eq!(chart.points, vec![(1950, 100), (1951, 3)]);
        assert_eq!(chart.total(), 103);

        let figure = chart.figure();
        assert_eq!(figure["data"][0]["x"], json!([1950, 1951]));
        assert_eq!(figure["data"][0]["y"], json!([100, 3]));
        assert_eq!(figure["layout"]["title"]["text"], chart.title);
    }

    #[test]
    fn test_join_drops_codes_without_features() {
        let boundaries = sample_boundaries();
        let totals = BTreeMap::from([("01".to_string(), 10), ("99".to_string(), 4)]);
        let map = ChoroplethMap::join(totals, &boundaries);

        assert_eq!(map.regions, vec![("01".to_string(), 10)]);
        assert_eq!(map.unmatched, vec!["99"]);
        assert_eq!(map.total(), 14);
        assert_eq!(map.value("01"), Some(10));
        assert_eq!(map.value("75"), None);
    }

    #[test]
    fn test_map_figure_fields() {
        let boundaries = sample_boundaries();
        let map = ChoroplethMap::join(BTreeMap::from([("75".to_string(), 7)]), &boundaries);
        let figure = map.figure(&boundaries, &MapSettings::default());

        let trace = &figure["data"][0];
        assert_eq!(trace["type"], "choroplethmapbox");
        assert_eq!(trace["featureidkey"], "properties.code");
        assert_eq!(trace["locations"], json!(["75"]));
        assert_eq!(trace["z"], json!([7]));
        assert_eq!(trace["colorscale"], "Reds");
        assert_eq!(trace["geojson"]["type"], "FeatureCollection");
        assert_eq!(figure["layout"]["mapbox"]["style"], "carto-positron");
        assert_eq!(figure["layout"]["margin"]["t"], 0);
    }

    #[test]
    fn test_empty_charts() {
        let boundaries = sample_boundaries();
        let line = LineChart::new(Some("Nobody"), BTreeMap::new());
        let map = ChoroplethMap::join(BTreeMap::new(), &boundaries);

        assert_eq!(line.figure()["data"][0]["x"], json!([]));
        assert_eq!(
            map.figure(&boundaries, &MapSettings::default())["data"][0]["z"],
            json!([])
        );
    }
}
