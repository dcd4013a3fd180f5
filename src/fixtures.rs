// src/fixtures.rs
// Shared test data.

use crate::{
    config::DashboardSettings,
    context::DashboardContext,
    data::{Boundaries, NameTable, RawRecord},
};

pub const SAMPLE_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"code": "01", "nom": "Ain"},
     "geometry": {"type": "Polygon", "coordinates": [[[5.0, 46.0], [5.5, 46.0], [5.5, 46.5], [5.0, 46.0]]]}},
    {"type": "Feature", "properties": {"code": "75", "nom": "Paris"},
     "geometry": {"type": "Polygon", "coordinates": [[[2.2, 48.8], [2.4, 48.8], [2.4, 48.9], [2.2, 48.8]]]}},
    {"type": "Feature", "properties": {"code": "2A", "nom": "Corse-du-Sud"},
     "geometry": {"type": "Polygon", "coordinates": [[[8.6, 41.6], [9.2, 41.6], [9.2, 42.1], [8.6, 41.6]]]}}
  ]
}"#;

pub fn record(sex: &str, first_name: &str, year: i32, department: &str, count: i64) -> RawRecord {
    RawRecord {
        sex: sex.to_string(),
        first_name: first_name.to_string(),
        year,
        department: department.to_string(),
        count,
    }
}

pub fn sample_table() -> NameTable {
    NameTable::from_records(&[
        record("1", "Jean", 1950, "1", 100),
        record("2", "Marie", 1950, "1", 80),
        record("1", "Jean", 1950, "75", 40),
        record("1", "Jean", 1990, "2A", 20),
        record("2", "Marie", 1990, "75", 30),
        record("2", "Marie", 2001, "2A", 10),
        record("1", "Paul", 2001, "75", 5),
    ])
    .expect("sample table is valid")
}

pub fn sample_boundaries() -> Boundaries {
    Boundaries::from_geojson_str(SAMPLE_GEOJSON, "code").expect("sample GeoJSON is valid")
}

pub fn context_with(table: NameTable) -> DashboardContext {
    DashboardContext::new(table, sample_boundaries(), DashboardSettings::default())
}

pub fn sample_context() -> DashboardContext {
    context_with(sample_table())
}
