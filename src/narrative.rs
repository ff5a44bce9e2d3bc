use crate::metrics::MetricVector;
use log::debug;
use serde::{Deserialize, Serialize};

/// Qualitative band a scenario falls into, judged on the change in net
/// profit ($M) and NIM (bps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactBand {
    Minimal,
    HighlyFavorable,
    PositiveGrowth,
    ModeratelyPositive,
    SevereDownturn,
    Challenging,
    ModeratelyNegative,
    Unchanged,
}

impl ImpactBand {
    /// Bands overlap, so the checks run in a fixed order and the first
    /// match wins. `Unchanged` is only reached when a delta is NaN.
    pub fn classify(profit_change: f64, nim_change_bps: f64) -> Self {
        if profit_change.abs() < 5.0 && nim_change_bps.abs() < 5.0 {
            ImpactBand::Minimal
        } else if profit_change > 50.0 && nim_change_bps > 10.0 {
            ImpactBand::HighlyFavorable
        } else if profit_change > 20.0 && nim_change_bps > 5.0 {
            ImpactBand::PositiveGrowth
        } else if profit_change > 0.0 || nim_change_bps > 0.0 {
            ImpactBand::ModeratelyPositive
        } else if profit_change < -50.0 && nim_change_bps < -10.0 {
            ImpactBand::SevereDownturn
        } else if profit_change < -20.0 && nim_change_bps < -5.0 {
            ImpactBand::Challenging
        } else if profit_change < 0.0 || nim_change_bps < 0.0 {
            ImpactBand::ModeratelyNegative
        } else {
            ImpactBand::Unchanged
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ImpactBand::Minimal => "Minimal Impact",
            ImpactBand::HighlyFavorable => "Highly Favorable",
            ImpactBand::PositiveGrowth => "Positive Growth",
            ImpactBand::ModeratelyPositive => "Moderately Positive",
            ImpactBand::SevereDownturn => "Severe Downturn",
            ImpactBand::Challenging => "Challenging",
            ImpactBand::ModeratelyNegative => "Moderately Negative",
            ImpactBand::Unchanged => "Baseline Unchanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub band: ImpactBand,
    pub profit_change: f64,
    pub profit_change_percent: f64,
    pub nim_change_bps: f64,
    pub text: String,
}

pub fn summarize(baseline: &MetricVector, results: &MetricVector) -> String {
    assess(baseline, results).text
}

pub fn assess(baseline: &MetricVector, results: &MetricVector) -> ScenarioSummary {
    let profit_change = results.pat - baseline.pat;
    let profit_change_percent = if baseline.pat != 0.0 {
        profit_change / baseline.pat * 100.0
    } else {
        0.0
    };
    let nim_change_bps = (results.nim - baseline.nim) * 100.0;

    let band = ImpactBand::classify(profit_change, nim_change_bps);
    debug!(
        "Scenario classified as {:?} (profit {:.2}M, NIM {:.1}bps)",
        band, profit_change, nim_change_bps
    );

    let profit = signed_millions(profit_change);
    let pct = profit_change_percent;
    let bps = nim_change_bps;

    let text = match band {
        ImpactBand::Minimal => format!(
            "The scenario has minimal impact on earnings. Net profit moves by {} ({:+.1}%) and NIM by {:+.0}bps, \
             leaving the financial profile essentially in line with the current quarter.",
            profit, pct, bps
        ),
        ImpactBand::HighlyFavorable => format!(
            "The scenario is highly favorable. Net profit increases by {} ({:+.1}%) while NIM expands {:.0}bps to {:.2}%. \
             ROE improves to {:.2}% and capital adequacy stays strong at {:.2}%, supporting sustainable earnings growth.",
            profit, pct, bps, results.nim, results.roe, results.car
        ),
        ImpactBand::PositiveGrowth => format!(
            "The scenario points to positive growth. Net profit rises by {} ({:+.1}%) and NIM improves {:.0}bps, \
             driven by balance sheet expansion and disciplined funding costs. ROE reaches {:.2}%.",
            profit, pct, bps, results.roe
        ),
        ImpactBand::ModeratelyPositive => format!(
            "The scenario is moderately positive. Net profit changes by {} ({:+.1}%) with NIM moving {:+.0}bps. \
             Gains are modest and depend on execution of the underlying growth assumptions.",
            profit, pct, bps
        ),
        ImpactBand::SevereDownturn => format!(
            "The scenario describes a severe downturn. Net profit falls by {} ({:+.1}%) and NIM compresses {:.0}bps to {:.2}%. \
             ROE drops to {:.2}% and the NPL ratio reaches {:.2}%, calling for immediate funding and cost actions.",
            signed_millions(profit_change.abs()).trim_start_matches('+'),
            pct,
            bps.abs(),
            results.nim,
            results.roe,
            results.nplr
        ),
        ImpactBand::Challenging => format!(
            "The scenario is challenging. Net profit declines by {} ({:+.1}%) and NIM narrows {:.0}bps. \
             Margin pressure and higher funding costs weigh on returns, with ROE at {:.2}%.",
            signed_millions(profit_change.abs()).trim_start_matches('+'),
            pct,
            bps.abs(),
            results.roe
        ),
        ImpactBand::ModeratelyNegative => format!(
            "The scenario is moderately negative. Net profit changes by {} ({:+.1}%) with NIM moving {:+.0}bps. \
             Headwinds are manageable but warrant monitoring of provisioning and cost discipline.",
            profit, pct, bps
        ),
        ImpactBand::Unchanged => {
            "The scenario leaves the baseline unchanged; projected metrics could not be compared with the current quarter."
                .to_string()
        }
    };

    ScenarioSummary {
        band,
        profit_change,
        profit_change_percent,
        nim_change_bps,
        text,
    }
}

fn signed_millions(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.1}M", value.abs())
    } else {
        format!("+${:.1}M", value)
    }
}
