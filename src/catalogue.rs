//! Reference catalogue of reported bank metrics.
//!
//! Each definition carries a most-recent-first history. The scenario
//! baseline is read from the latest point of the thirteen metrics the
//! engine knows about; every other catalogue entry passes through a
//! scenario untouched.

use crate::error::{EarningsError, Result};
use crate::metrics::{MetricId, MetricUnit, MetricVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    pub period: String,
    pub value: f64,
    pub qoq_change: f64,
    pub yoy_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: String,
    pub name: String,
    pub unit: MetricUnit,
    pub category: String,
    pub is_popular: bool,
    /// Ordered most recent first.
    pub historical_data: Vec<HistoricalPoint>,
}

impl MetricDefinition {
    pub fn latest_value(&self) -> Option<f64> {
        self.historical_data.first().map(|point| point.value)
    }

    /// The engine metric this definition maps to, if any.
    pub fn metric_id(&self) -> Option<MetricId> {
        self.id.parse().ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricCatalogue {
    pub metrics: Vec<MetricDefinition>,
}

impl MetricCatalogue {
    pub fn new(metrics: Vec<MetricDefinition>) -> Self {
        Self { metrics }
    }

    /// The Q3 2024 reference catalogue used by the dashboard.
    pub fn reference() -> Self {
        let mut metrics: Vec<MetricDefinition> = REFERENCE_ROWS
            .iter()
            .map(|row| MetricDefinition {
                id: row.id.to_string(),
                name: row.name.to_string(),
                unit: row.unit,
                category: row.category.to_string(),
                is_popular: row.is_popular,
                historical_data: row
                    .history
                    .iter()
                    .zip(REFERENCE_PERIODS)
                    .map(|(&(value, qoq_change, yoy_change), period)| HistoricalPoint {
                        period: period.to_string(),
                        value,
                        qoq_change,
                        yoy_change,
                    })
                    .collect(),
            })
            .collect();

        metrics.sort_by_key(|m| !m.is_popular);
        Self { metrics }
    }

    pub fn get(&self, id: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn popular(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.iter().filter(|m| m.is_popular)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Latest values of the engine metrics. Fails if any of the thirteen is
    /// missing or has no history.
    pub fn baseline(&self) -> Result<MetricVector> {
        MetricVector::try_from_lookup(|id| self.get(id.code()).and_then(|m| m.latest_value()))
    }

    /// Scenario value for every catalogue entry: recalculated metrics take
    /// the result, the rest keep their latest historical value.
    pub fn project(&self, results: &MetricVector) -> BTreeMap<String, f64> {
        self.metrics
            .iter()
            .filter_map(|m| {
                let value = match m.metric_id() {
                    Some(id) => Some(results.get(id)),
                    None => m.latest_value(),
                };
                value.map(|v| (m.id.clone(), v))
            })
            .collect()
    }

    pub fn require(&self, id: &str) -> Result<&MetricDefinition> {
        self.get(id)
            .ok_or_else(|| EarningsError::UnknownMetric(id.to_string()))
    }
}

struct ReferenceRow {
    id: &'static str,
    name: &'static str,
    unit: MetricUnit,
    category: &'static str,
    is_popular: bool,
    /// (value, qoq %, yoy %) most recent first, aligned with REFERENCE_PERIODS.
    history: &'static [(f64, f64, f64)],
}

const REFERENCE_PERIODS: [&str; 4] = ["Q3 2024", "Q2 2024", "Q1 2024", "Q4 2023"];

const REFERENCE_ROWS: &[ReferenceRow] = &[
    ReferenceRow {
        id: "PAT",
        name: "Profit After Tax",
        unit: MetricUnit::Millions,
        category: "Profitability",
        is_popular: true,
        history: &[
            (890.0, 5.3, 12.5),
            (845.0, 2.8, 8.7),
            (822.0, 1.9, 6.8),
            (807.0, 1.4, 5.9),
        ],
    },
    ReferenceRow {
        id: "earnings-per-share",
        name: "Earnings Per Share",
        unit: MetricUnit::Currency,
        category: "Profitability",
        is_popular: true,
        history: &[
            (4.25, 5.7, 11.8),
            (4.02, 2.3, 8.1),
            (3.93, 1.8, 6.5),
            (3.86, 1.6, 5.8),
        ],
    },
    ReferenceRow {
        id: "NIM",
        name: "Net Interest Margin",
        unit: MetricUnit::Percent,
        category: "Profitability",
        is_popular: true,
        history: &[
            (3.45, 2.4, -0.6),
            (3.37, -2.3, -6.9),
            (3.45, 4.5, -3.4),
            (3.30, -1.5, -5.2),
        ],
    },
    ReferenceRow {
        id: "ROE",
        name: "Return on Equity",
        unit: MetricUnit::Percent,
        category: "Profitability",
        is_popular: true,
        history: &[
            (12.8, 5.8, 5.8),
            (12.1, 1.7, 3.4),
            (11.9, 0.8, 2.6),
            (11.8, 1.7, 2.2),
        ],
    },
    ReferenceRow {
        id: "ROA",
        name: "Return on Assets",
        unit: MetricUnit::Percent,
        category: "Profitability",
        is_popular: true,
        history: &[
            (1.28, 5.8, 6.7),
            (1.21, 2.5, 4.3),
            (1.18, 0.9, 3.5),
            (1.17, 1.7, 2.6),
        ],
    },
    ReferenceRow {
        id: "CAR",
        name: "Capital Adequacy Ratio",
        unit: MetricUnit::Percent,
        category: "Capital",
        is_popular: true,
        history: &[
            (15.2, 0.7, 2.0),
            (15.1, 0.7, 1.3),
            (15.0, 0.0, 0.7),
            (15.0, 0.7, 0.0),
        ],
    },
    ReferenceRow {
        id: "CET1",
        name: "Common Equity Tier 1",
        unit: MetricUnit::Percent,
        category: "Capital",
        is_popular: false,
        history: &[
            (12.1, 0.8, 2.5),
            (12.0, 0.8, 1.7),
            (11.9, 0.8, 0.8),
            (11.8, 0.0, 0.0),
        ],
    },
    ReferenceRow {
        id: "NPLR",
        name: "Non-Performing Loan Ratio",
        unit: MetricUnit::Percent,
        category: "Asset Quality",
        is_popular: true,
        history: &[
            (1.8, -5.3, -14.3),
            (1.9, -5.0, -9.5),
            (2.0, -4.8, -4.8),
            (2.1, 0.0, 0.0),
        ],
    },
    ReferenceRow {
        id: "LDR",
        name: "Loan-to-Deposit Ratio",
        unit: MetricUnit::Percent,
        category: "Liquidity",
        is_popular: false,
        history: &[
            (82.5, 0.4, 1.2),
            (82.2, 0.2, 0.9),
            (82.0, 0.4, 0.7),
            (81.7, 0.2, 0.4),
        ],
    },
    ReferenceRow {
        id: "CASA",
        name: "CASA Ratio",
        unit: MetricUnit::Percent,
        category: "Liquidity",
        is_popular: false,
        history: &[
            (42.0, 1.0, 3.4),
            (41.6, 0.7, 2.7),
            (41.3, 1.0, 1.7),
            (40.9, 0.7, 1.0),
        ],
    },
    ReferenceRow {
        id: "PER",
        name: "Price-to-Earnings Ratio",
        unit: MetricUnit::Multiple,
        category: "Valuation",
        is_popular: false,
        history: &[
            (11.5, -1.7, -4.2),
            (11.7, 0.9, -2.5),
            (11.6, -0.9, -1.7),
            (11.7, 0.0, 0.0),
        ],
    },
    ReferenceRow {
        id: "PBR",
        name: "Price-to-Book Ratio",
        unit: MetricUnit::Multiple,
        category: "Valuation",
        is_popular: false,
        history: &[
            (1.45, 2.1, 6.6),
            (1.42, 1.4, 4.4),
            (1.40, 1.4, 2.9),
            (1.38, 1.5, 1.5),
        ],
    },
    ReferenceRow {
        id: "ER",
        name: "Efficiency Ratio",
        unit: MetricUnit::Percent,
        category: "Efficiency",
        is_popular: true,
        history: &[
            (58.2, -2.7, -4.9),
            (59.8, -2.6, -3.9),
            (61.4, 0.7, -1.6),
            (61.0, -0.8, -2.2),
        ],
    },
    ReferenceRow {
        id: "cost-of-risk",
        name: "Cost of Risk",
        unit: MetricUnit::Percent,
        category: "Asset Quality",
        is_popular: false,
        history: &[
            (0.72, 26.3, 18.0),
            (0.57, 3.6, -5.0),
            (0.55, -8.3, -12.7),
            (0.60, -4.8, -6.3),
        ],
    },
    ReferenceRow {
        id: "LCR",
        name: "Liquidity Coverage Ratio",
        unit: MetricUnit::Percent,
        category: "Liquidity",
        is_popular: false,
        history: &[
            (138.0, 1.5, 4.5),
            (136.0, 0.7, 3.0),
            (135.0, 1.5, 2.3),
            (133.0, 0.8, 0.8),
        ],
    },
    ReferenceRow {
        id: "revenue",
        name: "Total Operating Income",
        unit: MetricUnit::Millions,
        category: "Profitability",
        is_popular: false,
        history: &[
            (2847.0, 2.9, 7.8),
            (2766.0, 2.1, 6.2),
            (2708.0, 1.6, 4.9),
            (2665.0, 1.2, 4.1),
        ],
    },
];
