use crate::catalogue::{MetricCatalogue, MetricDefinition};
use crate::error::{EarningsError, Result};
use crate::metrics::{MetricUnit, MetricVector};
use crate::narrative::{assess, ScenarioSummary};
use crate::schema::{Lever, ScenarioInputs};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Filters the catalogue down to `selection`, in selection order. Duplicate
/// and unknown ids are skipped.
pub fn select_display_metrics<'a, S: AsRef<str>>(
    catalogue: &'a MetricCatalogue,
    selection: &[S],
) -> Vec<&'a MetricDefinition> {
    let mut seen = HashSet::new();
    selection
        .iter()
        .map(|id| id.as_ref())
        .filter(|id| seen.insert(*id))
        .filter_map(|id| catalogue.get(id))
        .collect()
}

/// One row of the baseline-versus-scenario comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub id: String,
    pub name: String,
    pub unit: MetricUnit,
    pub baseline: f64,
    pub scenario: f64,
    pub change: f64,
    pub change_percent: Option<f64>,
}

impl ComparisonRow {
    fn new(definition: &MetricDefinition, baseline: f64, scenario: f64) -> Self {
        let change = scenario - baseline;
        let change_percent = if baseline != 0.0 {
            Some(change / baseline * 100.0)
        } else {
            None
        };
        Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            unit: definition.unit,
            baseline,
            scenario,
            change,
            change_percent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub inputs: ScenarioInputs,
    pub baseline: MetricVector,
    pub results: MetricVector,
    pub summary: ScenarioSummary,
    pub rows: Vec<ComparisonRow>,
}

impl ScenarioReport {
    pub fn build<S: AsRef<str>>(
        catalogue: &MetricCatalogue,
        inputs: ScenarioInputs,
        baseline: MetricVector,
        results: MetricVector,
        selection: &[S],
    ) -> Self {
        let rows = select_display_metrics(catalogue, selection)
            .into_iter()
            .filter_map(|definition| {
                let (base, scenario) = match definition.metric_id() {
                    Some(id) => (baseline.get(id), results.get(id)),
                    None => {
                        let latest = definition.latest_value()?;
                        (latest, latest)
                    }
                };
                Some(ComparisonRow::new(definition, base, scenario))
            })
            .collect();

        Self {
            inputs,
            baseline,
            results,
            summary: assess(&baseline, &results),
            rows,
        }
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| EarningsError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| {
            EarningsError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# What-If Scenario\n\n");
        output.push_str("## Inputs\n\n");
        for lever in Lever::ALL {
            output.push_str(&format!(
                "- {}: {:+}{}\n",
                lever.label(),
                self.inputs.get(lever),
                lever.range().unit
            ));
        }
        output.push('\n');

        output.push_str(&format!("## {}\n\n", self.summary.band.title()));
        output.push_str(&self.summary.text);
        output.push_str("\n\n");

        if !self.rows.is_empty() {
            output.push_str("## Metrics\n\n");
            output.push_str("| Metric | Baseline | Scenario | Change |\n");
            output.push_str("|---|---|---|---|\n");
            for row in &self.rows {
                output.push_str(&format!(
                    "| {} | {} | {} | {:+.2} |\n",
                    row.name,
                    row.unit.format(row.baseline),
                    row.unit.format(row.scenario),
                    row.change
                ));
            }
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_scenario;

    fn report(selection: &[&str]) -> ScenarioReport {
        let catalogue = MetricCatalogue::reference();
        let baseline = catalogue.baseline().unwrap();
        let inputs = ScenarioInputs::default().with(Lever::FeeGrowth, 10.0);
        let results = compute_scenario(&inputs, &baseline);
        ScenarioReport::build(&catalogue, inputs, baseline, results, selection)
    }

    #[test]
    fn test_selection_keeps_order_and_drops_duplicates() {
        let catalogue = MetricCatalogue::reference();
        let selected = select_display_metrics(&catalogue, &["ROE", "NIM", "ROE", "bogus", "LCR"]);
        let ids: Vec<&str> = selected.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["ROE", "NIM", "LCR"]);
    }

    #[test]
    fn test_rows_compare_baseline_and_scenario() {
        let report = report(&["PAT", "LCR"]);
        assert_eq!(report.rows.len(), 2);

        let pat = &report.rows[0];
        assert_eq!(pat.baseline, 890.0);
        assert!((pat.change - 42.0).abs() < 1e-9);

        let lcr = &report.rows[1];
        assert_eq!(lcr.change, 0.0);
        assert_eq!(lcr.change_percent, Some(0.0));
    }

    #[test]
    fn test_report_to_markdown() {
        let markdown = report(&["NIM", "ER"]).to_markdown();
        assert!(markdown.contains("# What-If Scenario"));
        assert!(markdown.contains("- Fee Income Growth: +10%"));
        assert!(markdown.contains("| Net Interest Margin | 3.45% |"));
        assert!(markdown.contains("## Moderately Positive"));
    }

    #[test]
    fn test_report_to_csv() {
        let csv = report(&["PAT"]).to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,unit,baseline,scenario,change,change_percent")
        );
        assert!(lines.next().unwrap().starts_with("PAT,Profit After Tax,$M,890.0,"));
    }

    #[test]
    fn test_report_to_json() {
        let json = report(&["ROE"]).to_json().unwrap();
        assert!(json.contains("\"band\": \"moderately_positive\""));
        assert!(json.contains("\"loanGrowth\""));
    }
}
