use bank_earnings_analytics::*;
use std::error::Error;
use std::path::PathBuf;

fn print_report(title: &str, report: &ScenarioReport) {
    println!("\n📊 {} ({})", title, report.summary.band.title());
    for row in &report.rows {
        println!(
            "   {:<28} {:>10} -> {:>10}  ({:+.2})",
            row.name,
            row.unit.format(row.baseline),
            row.unit.format(row.scenario),
            row.change
        );
    }
    println!("   {}", report.summary.text);
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    let catalogue = MetricCatalogue::reference();
    let selection = ["PAT", "earnings-per-share", "NIM", "ROE", "CAR", "NPLR", "ER"];

    println!("🏦 Baseline: {} metrics in catalogue", catalogue.len());

    let growth = ScenarioInputs::default()
        .with(Lever::LoanGrowth, 12.0)
        .with(Lever::FeeGrowth, 5.0)
        .with(Lever::DepositRateChange, -25.0);
    print_report("Growth case", &analyze_with_verification(&catalogue, &growth, &selection)?);

    let stress = ScenarioInputs::default()
        .with(Lever::LoanGrowth, -10.0)
        .with(Lever::DepositRateChange, 100.0)
        .with(Lever::ProvisioningChange, 50.0);
    let stress_report = analyze_with_verification(&catalogue, &stress, &selection)?;
    print_report("Stress case", &stress_report);

    println!("\n📝 Markdown export:\n{}", stress_report.to_markdown());

    let csv_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/adib_line_items.csv")
        });

    let config = LoaderConfig::default();
    let store = LineItemStore::new(FileCsvSource::new(csv_path), config.clone());
    let items = store.load().await;

    if let Some(error) = store.error() {
        println!("❌ Line items unavailable: {}", error);
        return Ok(());
    }

    println!("✅ Loaded {} line items for {}", items.len(), config.bank_code);
    for item in items.iter().filter(|i| i.level == 0) {
        let variance = item
            .variance_percent
            .map(|v| format!("{:+.1}%", v))
            .unwrap_or_else(|| "n/a".to_string());
        let current = item
            .current
            .map(|v| format!("{:.0}", v))
            .unwrap_or_else(|| "n/a".to_string());
        println!("   {:<26} {:>10} {:>8}", item.item, current, variance);
    }

    let history = store.historical_data(&config.bank_code, &["NIM", "ROE"]).await;
    for (id, points) in &history {
        let series: Vec<String> = points
            .iter()
            .map(|p| format!("{}: {}", p.quarter, p.value))
            .collect();
        println!("📈 {} -> {}", id, series.join(", "));
    }

    let reply = respond("How did provisions move this quarter?");
    println!("\n💬 {:?}: {}", reply.topic, reply.text);

    Ok(())
}
