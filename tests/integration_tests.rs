use anyhow::Result;
use bank_earnings_analytics::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("adib_line_items.csv")
}

fn fixture_csv() -> Result<String> {
    Ok(std::fs::read_to_string(fixture_path())?)
}

/// Every combination of min, zero and max across the five levers.
fn extreme_scenarios() -> Vec<ScenarioInputs> {
    let mut scenarios = vec![ScenarioInputs::default()];
    for lever in Lever::ALL {
        let range = lever.range();
        scenarios = scenarios
            .into_iter()
            .flat_map(|s| {
                [range.min, 0.0, range.max]
                    .into_iter()
                    .map(move |v| s.with(lever, v))
            })
            .collect();
    }
    scenarios
}

#[test]
fn test_bounds_hold_across_lever_extremes() -> Result<()> {
    let engine = ScenarioEngine::from_catalogue(&MetricCatalogue::reference())?;
    let scenarios = extreme_scenarios();
    assert_eq!(scenarios.len(), 243);

    for inputs in &scenarios {
        let results = engine.compute_checked(inputs)?;
        assert!(results.is_finite());
        assert!(results.car >= 8.0 && results.cet1 >= 6.0);
        assert!((60.0..=100.0).contains(&results.ldr));
        assert!((25.0..=60.0).contains(&results.casa));
        assert!((45.0..=80.0).contains(&results.er));
    }

    Ok(())
}

#[test]
fn test_every_slider_step_is_within_bounds() -> Result<()> {
    let engine = ScenarioEngine::from_catalogue(&MetricCatalogue::reference())?;

    for lever in Lever::ALL {
        for value in lever.steps() {
            let inputs = ScenarioInputs::default().with(lever, value);
            inputs.validate()?;
            let results = engine.compute(&inputs);
            assert!(
                bound_violations(&results).is_empty(),
                "{:?} = {} violates {:?}",
                lever,
                value,
                bound_violations(&results)
            );
        }
    }

    Ok(())
}

#[test]
fn test_profit_moves_with_each_lever() -> Result<()> {
    let engine = ScenarioEngine::from_catalogue(&MetricCatalogue::reference())?;

    // (lever, whether raising it raises net profit)
    let directions = [
        (Lever::LoanGrowth, true),
        (Lever::DepositRateChange, false),
        (Lever::ProvisioningChange, false),
        (Lever::FeeGrowth, true),
        (Lever::CostGrowth, false),
    ];

    for (lever, rises) in directions {
        let profits: Vec<f64> = lever
            .steps()
            .into_iter()
            .map(|v| engine.compute(&ScenarioInputs::default().with(lever, v)).pat)
            .collect();

        for pair in profits.windows(2) {
            if rises {
                assert!(pair[1] >= pair[0], "{:?} should not lower profit", lever);
            } else {
                assert!(pair[1] <= pair[0], "{:?} should not raise profit", lever);
            }
        }
    }

    Ok(())
}

#[test]
fn test_margin_and_returns_strictly_track_rates() -> Result<()> {
    let engine = ScenarioEngine::from_catalogue(&MetricCatalogue::reference())?;
    let sweep = |lever: Lever| -> Vec<MetricVector> {
        lever
            .steps()
            .into_iter()
            .map(|v| engine.compute(&ScenarioInputs::default().with(lever, v)))
            .collect()
    };

    let loans = sweep(Lever::LoanGrowth);
    for pair in loans.windows(2) {
        assert!(pair[1].nim > pair[0].nim, "NIM {} -> {}", pair[0].nim, pair[1].nim);
        assert!(pair[1].roe > pair[0].roe, "ROE {} -> {}", pair[0].roe, pair[1].roe);
    }

    let deposits = sweep(Lever::DepositRateChange);
    for pair in deposits.windows(2) {
        assert!(pair[1].nim < pair[0].nim, "NIM {} -> {}", pair[0].nim, pair[1].nim);
    }

    Ok(())
}

#[test]
fn test_neutral_inputs_return_the_baseline() -> Result<()> {
    let catalogue = MetricCatalogue::reference();
    let baseline = catalogue.baseline()?;

    let results = compute_scenario(&ScenarioInputs::default(), &baseline);
    assert_eq!(results, baseline);
    assert_eq!(summarize(&baseline, &results), assess(&baseline, &results).text);
    assert_eq!(assess(&baseline, &results).band, ImpactBand::Minimal);

    Ok(())
}

#[test]
fn test_report_exports() -> Result<()> {
    let catalogue = MetricCatalogue::reference();
    let inputs = ScenarioInputs::default()
        .with(Lever::ProvisioningChange, 50.0)
        .with(Lever::CostGrowth, 10.0);

    let report = analyze_with_verification(&catalogue, &inputs, &["PAT", "ROE", "NPLR", "ER"])?;
    assert!(report.results.pat < report.baseline.pat);

    let json = report.to_json()?;
    let parsed: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(parsed["rows"].as_array().map(|r| r.len()), Some(4));
    assert_eq!(parsed["inputs"]["costGrowth"], 10.0);

    let csv = report.to_csv()?;
    assert_eq!(csv.lines().count(), 5);

    let markdown = report.to_markdown();
    // Costs and provisions cut profit but leave NIM untouched.
    assert!(markdown.contains("## Moderately Negative"));
    assert!(markdown.contains("| Profit After Tax | $890M |"));

    Ok(())
}

#[test]
fn test_fixture_parses_known_rows() -> Result<()> {
    let items = parse_line_items(&fixture_csv()?, "ADIB");

    // Row 14 is short and row 21 has no mapping.
    assert_eq!(items.len(), 19);
    assert!(items.iter().all(|i| i.source_id != "14" && i.source_id != "21"));

    let provisions = items
        .iter()
        .find(|i| i.id == "item-13")
        .ok_or_else(|| anyhow::anyhow!("impairment row missing"))?;
    assert_eq!(provisions.item, "Impairment Charges");
    assert_eq!(provisions.segment, "Risk");
    assert_eq!(provisions.variance, Some(27.0));
    assert_eq!(provisions.periods.get(Period::Q2TMinus2), Some(95.0));
    assert_eq!(provisions.periods.get(Period::Q3TMinus2), None);

    let options = filter_options(&items);
    assert_eq!(options.categories, vec!["P&L", "Balance Sheet"]);
    assert_eq!(
        options.segments,
        vec!["Revenue", "Expenses", "Risk", "Profitability", "Assets"]
    );

    Ok(())
}

#[test]
fn test_fixture_history_and_bank_metrics() -> Result<()> {
    let items = parse_line_items(&fixture_csv()?, "ADIB");

    let history = historical_data(&items, "ADIB", &["NIM", "item-13"], 2024);
    let nim: Vec<(&str, f64)> = history["NIM"]
        .iter()
        .map(|h| (h.quarter.as_str(), h.value))
        .collect();
    assert_eq!(
        nim,
        vec![
            ("Q1 2023", 1540.0),
            ("Q2 2023", 1575.0),
            ("Q3 2023", 1610.0),
            ("Q1 2024", 1780.0)
        ]
    );
    assert_eq!(history["item-13"].len(), 3);

    let metrics = bank_metrics(&items, &["ADIB"], &["NIM", "ROE", "ER", "CAR"]);
    let adib = &metrics["ADIB"];
    assert_eq!(adib["ROE"], 890.0);
    assert_eq!(adib["ER"], 1650.0);
    assert_eq!(adib["CAR"], 69500.0);

    Ok(())
}

struct CountingSource {
    inner: FileCsvSource,
    calls: Arc<AtomicUsize>,
}

impl CsvSource for CountingSource {
    async fn fetch_csv(&self) -> bank_earnings_analytics::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        self.inner.fetch_csv().await
    }
}

#[tokio::test]
async fn test_store_over_file_source() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = LineItemStore::new(
        CountingSource {
            inner: FileCsvSource::new(fixture_path()),
            calls: Arc::clone(&calls),
        },
        LoaderConfig::default(),
    );

    let risk_only = LineItemFilter {
        segments: vec!["Risk".to_string()],
        ..Default::default()
    };
    let (items, risk, status_before) = tokio::join!(
        store.load(),
        store.filter(&risk_only),
        async { store.error() },
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(items.len(), 19);
    assert_eq!(risk.len(), 1);
    assert!(status_before.is_none());

    let status = store.status().await;
    assert!(status.is_loaded);
    assert!(status.loaded_at.is_some());

    store.clear_cache().await;
    store.load().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_store_reports_fetch_failure() -> Result<()> {
    let store = LineItemStore::new(
        FileCsvSource::new("/nonexistent/adib.csv"),
        LoaderConfig::default(),
    );

    assert!(store.load().await.is_empty());
    let message = store
        .error()
        .ok_or_else(|| anyhow::anyhow!("error should be recorded"))?;
    assert!(message.starts_with("IO error"));
    assert!(store.historical_data("ADIB", &["NIM"]).await["NIM"].is_empty());

    Ok(())
}

#[test]
fn test_assistant_routes_dashboard_questions() {
    assert_eq!(respond("Give me the quarterly snapshot").topic, Topic::EarningsOverview);
    assert_eq!(respond("Benchmark us against FAB").topic, Topic::PeerComparison);
    assert_eq!(respond("What can you do?").topic, Topic::General);
}
