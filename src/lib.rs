//! # Bank Earnings Analytics
//!
//! Scenario modeling and line-item ingestion behind a bank earnings
//! dashboard.
//!
//! ## Core Concepts
//!
//! - **Levers**: five what-if inputs (loan growth, deposit rate change,
//!   provisioning change, fee growth, cost growth), each with a fixed range
//! - **Baseline**: the latest value of the thirteen scenario metrics, taken
//!   from the metric catalogue
//! - **Scenario**: the baseline recalculated under the levers, every metric
//!   clamped to its documented floor or ceiling
//! - **Narrative**: a qualitative band and summary text chosen from the
//!   change in net profit and NIM
//! - **Line items**: the fixed-schema earnings CSV, parsed into typed rows
//!   and cached by a [`LineItemStore`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use bank_earnings_analytics::*;
//!
//! let catalogue = MetricCatalogue::reference();
//! let inputs = ScenarioInputs::default()
//!     .with(Lever::LoanGrowth, 10.0)
//!     .with(Lever::DepositRateChange, -25.0);
//!
//! let report = analyze_scenario(&catalogue, &inputs, &["PAT", "NIM", "ROE"]).unwrap();
//! println!("{}", report.summary.text);
//! ```

pub mod assistant;
pub mod bounds;
pub mod catalogue;
pub mod engine;
pub mod error;
pub mod line_items;
pub mod metrics;
pub mod narrative;
pub mod report;
pub mod schema;
pub mod source;
pub mod store;
pub mod utils;

pub use assistant::{respond, AssistantReply, Topic};
pub use bounds::{bound_violations, bounds_for, verify_bounds, MetricBounds};
pub use catalogue::{HistoricalPoint, MetricCatalogue, MetricDefinition};
pub use engine::{compute_scenario, compute_scenario_checked, LeverImpacts, ScenarioEngine};
pub use error::{EarningsError, Result};
pub use line_items::{
    bank_metrics, filter_line_items, filter_options, historical_data, parse_line_items,
    FilterOptions, HistoricalValue, LineItem, LineItemFilter, Period,
};
pub use metrics::{MetricId, MetricUnit, MetricVector};
pub use narrative::{assess, summarize, ImpactBand, ScenarioSummary};
pub use report::{select_display_metrics, ComparisonRow, ScenarioReport};
pub use schema::{Lever, LeverRange, ScenarioInputs};
pub use source::{CsvSource, FileCsvSource, LoaderConfig, StaticCsvSource};
pub use store::{LineItemStore, LoadStatus};

#[cfg(feature = "http")]
pub use source::HttpCsvSource;

use log::{debug, info};

/// Runs a what-if scenario end to end: baseline from the catalogue,
/// recalculation, narrative and the comparison rows for `selection`.
pub struct ScenarioAnalyzer;

impl ScenarioAnalyzer {
    pub fn analyze<S: AsRef<str>>(
        catalogue: &MetricCatalogue,
        inputs: &ScenarioInputs,
        selection: &[S],
    ) -> Result<ScenarioReport> {
        inputs.validate()?;

        let baseline = catalogue.baseline()?;
        info!("Analyzing scenario over {} catalogue metrics", catalogue.len());
        debug!("Scenario inputs: {:?}", inputs);

        let results = compute_scenario(inputs, &baseline);
        let report = ScenarioReport::build(catalogue, *inputs, baseline, results, selection);

        debug!(
            "Scenario band {:?}, {} comparison rows",
            report.summary.band,
            report.rows.len()
        );

        Ok(report)
    }

    /// Like [`analyze`](Self::analyze), but fails when any recalculated
    /// metric is non-finite or outside its bounds.
    pub fn analyze_with_verification<S: AsRef<str>>(
        catalogue: &MetricCatalogue,
        inputs: &ScenarioInputs,
        selection: &[S],
    ) -> Result<ScenarioReport> {
        let report = Self::analyze(catalogue, inputs, selection)?;

        verify_bounds(&report.results)?;

        Ok(report)
    }
}

pub fn analyze_scenario<S: AsRef<str>>(
    catalogue: &MetricCatalogue,
    inputs: &ScenarioInputs,
    selection: &[S],
) -> Result<ScenarioReport> {
    ScenarioAnalyzer::analyze(catalogue, inputs, selection)
}

pub fn analyze_with_verification<S: AsRef<str>>(
    catalogue: &MetricCatalogue,
    inputs: &ScenarioInputs,
    selection: &[S],
) -> Result<ScenarioReport> {
    ScenarioAnalyzer::analyze_with_verification(catalogue, inputs, selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_analysis() {
        let catalogue = MetricCatalogue::reference();
        let inputs = ScenarioInputs::default()
            .with(Lever::LoanGrowth, 10.0)
            .with(Lever::DepositRateChange, -25.0);

        let report = analyze_with_verification(&catalogue, &inputs, &["PAT", "NIM", "ROE"]).unwrap();

        assert_eq!(report.rows.len(), 3);
        assert!(report.results.pat > report.baseline.pat);
        assert_eq!(report.summary.band, ImpactBand::HighlyFavorable);
    }

    #[test]
    fn test_neutral_analysis_is_identity() {
        let catalogue = MetricCatalogue::reference();
        let report = analyze_scenario(&catalogue, &ScenarioInputs::default(), &["PBR"]).unwrap();

        assert_eq!(report.results, report.baseline);
        assert_eq!(report.rows[0].change, 0.0);
        assert_eq!(report.summary.band, ImpactBand::Minimal);
    }

    #[test]
    fn test_out_of_range_lever_is_rejected() {
        let catalogue = MetricCatalogue::reference();
        let inputs = ScenarioInputs::default().with(Lever::CostGrowth, 40.0);

        match analyze_scenario(&catalogue, &inputs, &["ER"]) {
            Err(EarningsError::LeverOutOfRange { lever, value, .. }) => {
                assert_eq!(lever, "Cost Growth");
                assert_eq!(value, 40.0);
            }
            other => panic!("expected LeverOutOfRange, got {:?}", other.map(|r| r.rows.len())),
        }
    }

    #[test]
    fn test_catalogue_without_baseline_metric_fails() {
        let catalogue = MetricCatalogue::new(Vec::new());
        let result = analyze_scenario(&catalogue, &ScenarioInputs::default(), &["PAT"]);
        assert!(matches!(result, Err(EarningsError::UnknownMetric(_))));
    }
}
