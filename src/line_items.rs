use crate::utils::{clean_cell, parse_cell, quarter_label, variance, variance_percent};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemInfo {
    pub name: &'static str,
    pub category: &'static str,
    pub segment: &'static str,
    pub level: u8,
}

const fn info(name: &'static str, category: &'static str, segment: &'static str, level: u8) -> ItemInfo {
    ItemInfo {
        name,
        category,
        segment,
        level,
    }
}

/// Row id in column 0 of the source CSV -> display metadata.
const ITEM_TABLE: &[(&str, ItemInfo)] = &[
    ("1", info("Net Interest Income", "P&L", "Revenue", 0)),
    ("2", info("Interest Income", "P&L", "Revenue", 1)),
    ("3", info("Interest Expense", "P&L", "Revenue", 1)),
    ("4", info("Non-Interest Income", "P&L", "Revenue", 0)),
    ("5", info("Fee and Commission Income", "P&L", "Revenue", 1)),
    ("6", info("Trading Income", "P&L", "Revenue", 1)),
    ("7", info("Other Operating Income", "P&L", "Revenue", 1)),
    ("8", info("Total Operating Income", "P&L", "Revenue", 0)),
    ("9", info("Operating Expenses", "P&L", "Expenses", 0)),
    ("10", info("Staff Costs", "P&L", "Expenses", 1)),
    ("11", info("Other Operating Expenses", "P&L", "Expenses", 1)),
    ("12", info("Depreciation", "P&L", "Expenses", 1)),
    ("13", info("Impairment Charges", "P&L", "Risk", 0)),
    ("14", info("Profit Before Tax", "P&L", "Profitability", 0)),
    ("15", info("Tax Expense", "P&L", "Profitability", 1)),
    ("16", info("Net Profit", "P&L", "Profitability", 0)),
    ("17", info("Total Assets", "Balance Sheet", "Assets", 0)),
    ("18", info("Loans and Advances", "Balance Sheet", "Assets", 1)),
    ("19", info("Investment Securities", "Balance Sheet", "Assets", 1)),
    ("20", info("Cash and Bank Balances", "Balance Sheet", "Assets", 1)),
];

/// Dashboard metric ids that are charted from a line-item row.
const METRIC_ROWS: &[(&str, &str)] = &[
    ("NIM", "1"),
    ("ROE", "16"),
    ("ROA", "16"),
    ("ER", "9"),
    ("CAR", "17"),
];

pub fn item_info(row_id: &str) -> Option<&'static ItemInfo> {
    ITEM_TABLE
        .iter()
        .find(|(id, _)| *id == row_id)
        .map(|(_, info)| info)
}

/// The nine period columns that follow the item id, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Q1T,
    Q1TMinus1,
    Q2TMinus1,
    Q3TMinus1,
    FTMinus1,
    Q1TMinus2,
    Q2TMinus2,
    Q3TMinus2,
    FTMinus2,
}

impl Period {
    pub const ALL: [Period; 9] = [
        Period::Q1T,
        Period::Q1TMinus1,
        Period::Q2TMinus1,
        Period::Q3TMinus1,
        Period::FTMinus1,
        Period::Q1TMinus2,
        Period::Q2TMinus2,
        Period::Q3TMinus2,
        Period::FTMinus2,
    ];

    /// Periods offered as filter options.
    pub const REPORTABLE: [Period; 5] = [
        Period::Q1T,
        Period::Q1TMinus1,
        Period::Q2TMinus1,
        Period::Q3TMinus1,
        Period::FTMinus1,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Period::Q1T => "q1_t",
            Period::Q1TMinus1 => "q1_t_minus_1",
            Period::Q2TMinus1 => "q2_t_minus_1",
            Period::Q3TMinus1 => "q3_t_minus_1",
            Period::FTMinus1 => "f_t_minus_1",
            Period::Q1TMinus2 => "q1_t_minus_2",
            Period::Q2TMinus2 => "q2_t_minus_2",
            Period::Q3TMinus2 => "q3_t_minus_2",
            Period::FTMinus2 => "f_t_minus_2",
        }
    }

    /// CSV column holding this period; column 0 is the item id.
    pub fn column(self) -> usize {
        self as usize + 1
    }
}

/// Quarters charted by [`historical_data`], oldest first, with the year
/// offset of their label relative to the reporting year.
const HISTORY_PERIODS: [(Period, u8, i32); 4] = [
    (Period::Q1TMinus2, 1, -1),
    (Period::Q2TMinus2, 2, -1),
    (Period::Q3TMinus2, 3, -1),
    (Period::Q1T, 1, 0),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodValues([Option<f64>; 9]);

impl PeriodValues {
    pub fn get(&self, period: Period) -> Option<f64> {
        self.0[period as usize]
    }

    fn set(&mut self, period: Period, value: Option<f64>) {
        self.0[period as usize] = value;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub source_id: String,
    pub item: String,
    pub bank: String,
    pub category: String,
    pub segment: String,
    pub level: u8,
    pub current: Option<f64>,
    pub previous: Option<f64>,
    pub variance: Option<f64>,
    pub variance_percent: Option<f64>,
    pub periods: PeriodValues,
}

impl LineItem {
    fn from_row(source_id: &str, info: &ItemInfo, bank: &str, periods: PeriodValues) -> Self {
        let current = periods.get(Period::Q1T);
        let previous = periods.get(Period::Q1TMinus1);
        let variance = variance(current, previous);

        Self {
            id: format!("item-{}", source_id),
            source_id: source_id.to_string(),
            item: info.name.to_string(),
            bank: bank.to_string(),
            category: info.category.to_string(),
            segment: info.segment.to_string(),
            level: info.level,
            current,
            previous,
            variance,
            variance_percent: variance_percent(variance, previous),
            periods,
        }
    }
}

/// Parses the line-item CSV. Malformed input never fails: rows with an
/// unknown id or fewer cells than the header are dropped, and unreadable
/// numbers become `None`.
pub fn parse_line_items(csv_text: &str, bank: &str) -> Vec<LineItem> {
    // Quotes are stripped per cell, so an unbalanced quote stays on its line.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let header_len = match reader.headers() {
        Ok(headers) => headers.len(),
        Err(e) => {
            debug!("Line-item CSV has no readable header: {}", e);
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("Dropping unreadable row {}: {}", index + 1, e);
                continue;
            }
        };

        if record.len() < header_len {
            debug!(
                "Dropping row {}: {} cells, header has {}",
                index + 1,
                record.len(),
                header_len
            );
            continue;
        }

        let source_id = clean_cell(record.get(0).unwrap_or_default());
        let Some(info) = item_info(&source_id) else {
            debug!("Dropping row {}: unknown item id '{}'", index + 1, source_id);
            continue;
        };

        let mut periods = PeriodValues::default();
        for period in Period::ALL {
            periods.set(period, record.get(period.column()).and_then(parse_cell));
        }

        items.push(LineItem::from_row(&source_id, info, bank, periods));
    }

    items
}

/// Restricts line items per dimension; an empty list leaves that
/// dimension unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemFilter {
    #[serde(default)]
    pub banks: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub segments: Vec<String>,
}

impl LineItemFilter {
    pub fn matches(&self, item: &LineItem) -> bool {
        admits(&self.banks, &item.bank)
            && admits(&self.categories, &item.category)
            && admits(&self.segments, &item.segment)
    }
}

fn admits(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a == value)
}

pub fn filter_line_items<'a>(items: &'a [LineItem], filter: &LineItemFilter) -> Vec<&'a LineItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub banks: Vec<String>,
    pub categories: Vec<String>,
    pub segments: Vec<String>,
    pub periods: Vec<String>,
}

/// Distinct banks, categories and segments in first-seen order.
pub fn filter_options(items: &[LineItem]) -> FilterOptions {
    fn push_unique(values: &mut Vec<String>, value: &str) {
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }

    let mut options = FilterOptions {
        periods: Period::REPORTABLE
            .iter()
            .map(|p| p.code().to_string())
            .collect(),
        ..FilterOptions::default()
    };

    for item in items {
        push_unique(&mut options.banks, &item.bank);
        push_unique(&mut options.categories, &item.category);
        push_unique(&mut options.segments, &item.segment);
    }

    options
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalValue {
    pub quarter: String,
    pub value: f64,
}

/// Resolves a dashboard metric id, a line-item id (`item-16`) or a raw row
/// id (`16`) to a row id of the item table.
pub fn resolve_row_id(id: &str) -> Option<&'static str> {
    if let Some((_, row)) = METRIC_ROWS.iter().find(|(metric, _)| *metric == id) {
        return Some(*row);
    }
    let raw = id.strip_prefix("item-").unwrap_or(id);
    ITEM_TABLE
        .iter()
        .find(|(row, _)| *row == raw)
        .map(|(row, _)| *row)
}

fn find_row<'a>(items: &'a [LineItem], bank: &str, id: &str) -> Option<&'a LineItem> {
    let row_id = resolve_row_id(id)?;
    items
        .iter()
        .find(|item| item.bank == bank && item.source_id == row_id)
}

/// Quarterly history for each requested id, keeping only quarters with a
/// value. Unknown banks or ids map to an empty list.
pub fn historical_data<S: AsRef<str>>(
    items: &[LineItem],
    bank: &str,
    ids: &[S],
    reporting_year: i32,
) -> BTreeMap<String, Vec<HistoricalValue>> {
    ids.iter()
        .map(|id| {
            let id = id.as_ref();
            let history: Vec<HistoricalValue> = find_row(items, bank, id)
                .map(|row| {
                    HISTORY_PERIODS
                        .iter()
                        .filter_map(|&(period, quarter, year_offset)| {
                            row.periods.get(period).map(|value| HistoricalValue {
                                quarter: quarter_label(quarter, reporting_year + year_offset),
                                value,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            (id.to_string(), history)
        })
        .collect()
}

/// Current-quarter value of each metric for each requested bank that has
/// data. Metrics without a value are left out.
pub fn bank_metrics<B: AsRef<str>, M: AsRef<str>>(
    items: &[LineItem],
    banks: &[B],
    metric_ids: &[M],
) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut result = BTreeMap::new();

    for bank in banks.iter().map(|b| b.as_ref()) {
        if !items.iter().any(|item| item.bank == bank) {
            continue;
        }

        let values: BTreeMap<String, f64> = metric_ids
            .iter()
            .map(|m| m.as_ref())
            .filter(|m| METRIC_ROWS.iter().any(|(metric, _)| metric == m))
            .filter_map(|m| {
                let value = find_row(items, bank, m)?.current?;
                Some((m.to_string(), value))
            })
            .collect();

        result.insert(bank.to_string(), values);
    }

    result
}
