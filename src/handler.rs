// src/handler.rs

use anyhow::Result;
use tracing::{debug, instrument};

use crate::{
    aggregate::{sum_by_department, sum_by_year},
    chart::{ChartPair, ChoroplethMap, LineChart},
    context::DashboardContext,
    filter::{self, FilterParams},
};

/// Filter the base table by the control values and rebuild both charts.
/// Pure over the context: no state is kept between calls.
#[instrument(skip(ctx))]
pub fn update_charts(ctx: &DashboardContext, params: &FilterParams) -> Result<ChartPair> {
    let table = ctx.table();
    let full_range = table.year_bounds().unwrap_or((i32::MIN, i32::MAX));
    let predicates = params.predicates(full_range);

    let filtered = filter::apply(table.batch(), &predicates)?;
    debug!(
        rows = table.len(),
        filtered = filtered.num_rows(),
        "applied filters"
    );

    let line = LineChart::new(params.name.as_deref(), sum_by_year(&filtered)?);
    let map = ChoroplethMap::join(sum_by_department(&filtered)?, ctx.boundaries());
    Ok(ChartPair { line, map })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NameTable;
    use crate::fixtures::{context_with, record, sample_context};

    #[test]
    fn test_jean_in_ain() {
        let ctx = context_with(
            NameTable::from_records(&[
                record("1", "Jean", 1950, "1", 100),
                record("2", "Marie", 1950, "1", 80),
            ])
            .unwrap(),
        );
        let params = FilterParams {
            name: Some("Jean".into()),
            sexes: vec!["Man".into()],
            years: Some([1900, 2000]),
            departments: None,
        };

        let charts = update_charts(&ctx, &params).unwrap();
        assert_eq!(charts.line.points, vec![(1950, 100)]);
        assert_eq!(charts.map.regions, vec![("01".to_string(), 100)]);
        assert_eq!(charts.map.value("01"), Some(100));
        assert!(charts.line.title.contains("\"Jean\""));
    }

    #[test]
    fn test_unknown_name_gives_empty_charts() {
        let ctx = sample_context();
        let params = FilterParams {
            name: Some("Zébulon".into()),
            ..Default::default()
        };

        let charts = update_charts(&ctx, &params).unwrap();
        assert!(charts.line.points.is_empty());
        assert!(charts.map.regions.is_empty());
        for code in ctx.boundaries().codes() {
            assert_eq!(charts.map.value(code), None);
        }
    }

    #[test]
    fn test_unfiltered_totals_match() {
        let ctx = sample_context();
        let charts = update_charts(&ctx, &FilterParams::default()).unwrap();
        assert_eq!(charts.line.total(), 285);
        assert_eq!(charts.line.total(), charts.map.total());
        assert!(charts.line.title.ends_with("\"\""));
    }

    #[test]
    fn test_filtered_totals_match() {
        let ctx = sample_context();
        let params = FilterParams {
            sexes: vec!["Woman".into()],
            years: Some([1950, 1990]),
            ..Default::default()
        };
        let charts = update_charts(&ctx, &params).unwrap();
        assert_eq!(charts.line.points, vec![(1950, 80), (1990, 30)]);
        assert_eq!(charts.map.total(), 110);
    }

    #[test]
    fn test_quirky_default_sex_selects_nothing() {
        let ctx = sample_context();
        let params = FilterParams {
            sexes: ctx.settings().default_sexes.clone(),
            ..Default::default()
        };
        let charts = update_charts(&ctx, &params).unwrap();
        assert!(charts.line.points.is_empty());
    }
}
