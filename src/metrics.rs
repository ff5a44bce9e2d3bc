use crate::error::{EarningsError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of ratios the scenario engine recalculates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum MetricId {
    #[serde(rename = "PAT")]
    Pat,
    #[serde(rename = "earnings-per-share")]
    Eps,
    #[serde(rename = "NIM")]
    Nim,
    #[serde(rename = "ROE")]
    Roe,
    #[serde(rename = "ROA")]
    Roa,
    #[serde(rename = "CAR")]
    Car,
    #[serde(rename = "CET1")]
    Cet1,
    #[serde(rename = "NPLR")]
    Nplr,
    #[serde(rename = "LDR")]
    Ldr,
    #[serde(rename = "CASA")]
    Casa,
    #[serde(rename = "PER")]
    Per,
    #[serde(rename = "PBR")]
    Pbr,
    #[serde(rename = "ER")]
    Er,
}

impl MetricId {
    pub const ALL: [MetricId; 13] = [
        MetricId::Pat,
        MetricId::Eps,
        MetricId::Nim,
        MetricId::Roe,
        MetricId::Roa,
        MetricId::Car,
        MetricId::Cet1,
        MetricId::Nplr,
        MetricId::Ldr,
        MetricId::Casa,
        MetricId::Per,
        MetricId::Pbr,
        MetricId::Er,
    ];

    /// Catalogue identifier, e.g. `NIM` or `earnings-per-share`.
    pub fn code(self) -> &'static str {
        match self {
            MetricId::Pat => "PAT",
            MetricId::Eps => "earnings-per-share",
            MetricId::Nim => "NIM",
            MetricId::Roe => "ROE",
            MetricId::Roa => "ROA",
            MetricId::Car => "CAR",
            MetricId::Cet1 => "CET1",
            MetricId::Nplr => "NPLR",
            MetricId::Ldr => "LDR",
            MetricId::Casa => "CASA",
            MetricId::Per => "PER",
            MetricId::Pbr => "PBR",
            MetricId::Er => "ER",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MetricId::Pat => "Profit After Tax",
            MetricId::Eps => "Earnings Per Share",
            MetricId::Nim => "Net Interest Margin",
            MetricId::Roe => "Return on Equity",
            MetricId::Roa => "Return on Assets",
            MetricId::Car => "Capital Adequacy Ratio",
            MetricId::Cet1 => "Common Equity Tier 1",
            MetricId::Nplr => "Non-Performing Loan Ratio",
            MetricId::Ldr => "Loan-to-Deposit Ratio",
            MetricId::Casa => "CASA Ratio",
            MetricId::Per => "Price-to-Earnings Ratio",
            MetricId::Pbr => "Price-to-Book Ratio",
            MetricId::Er => "Efficiency Ratio",
        }
    }

    pub fn unit(self) -> MetricUnit {
        match self {
            MetricId::Pat => MetricUnit::Millions,
            MetricId::Eps => MetricUnit::Currency,
            MetricId::Per | MetricId::Pbr => MetricUnit::Multiple,
            MetricId::Nim
            | MetricId::Roe
            | MetricId::Roa
            | MetricId::Car
            | MetricId::Cet1
            | MetricId::Nplr
            | MetricId::Ldr
            | MetricId::Casa
            | MetricId::Er => MetricUnit::Percent,
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MetricId {
    type Err = EarningsError;

    fn from_str(s: &str) -> Result<Self> {
        MetricId::ALL
            .into_iter()
            .find(|id| id.code() == s)
            .ok_or_else(|| EarningsError::UnknownMetric(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MetricUnit {
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "x")]
    Multiple,
    #[serde(rename = "$M")]
    Millions,
    #[serde(rename = "$")]
    Currency,
}

impl MetricUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            MetricUnit::Percent => "%",
            MetricUnit::Multiple => "x",
            MetricUnit::Millions => "$M",
            MetricUnit::Currency => "$",
        }
    }

    pub fn format(self, value: f64) -> String {
        match self {
            MetricUnit::Percent => format!("{:.2}%", value),
            MetricUnit::Multiple => format!("{:.2}x", value),
            MetricUnit::Millions => format!("${:.0}M", value),
            MetricUnit::Currency => format!("${:.2}", value),
        }
    }
}

/// A value for every [`MetricId`]. Used for both the baseline and the
/// recomputed scenario, so a result can never miss a baseline key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricVector {
    #[serde(rename = "PAT")]
    pub pat: f64,
    #[serde(rename = "earnings-per-share")]
    pub eps: f64,
    #[serde(rename = "NIM")]
    pub nim: f64,
    #[serde(rename = "ROE")]
    pub roe: f64,
    #[serde(rename = "ROA")]
    pub roa: f64,
    #[serde(rename = "CAR")]
    pub car: f64,
    #[serde(rename = "CET1")]
    pub cet1: f64,
    #[serde(rename = "NPLR")]
    pub nplr: f64,
    #[serde(rename = "LDR")]
    pub ldr: f64,
    #[serde(rename = "CASA")]
    pub casa: f64,
    #[serde(rename = "PER")]
    pub per: f64,
    #[serde(rename = "PBR")]
    pub pbr: f64,
    #[serde(rename = "ER")]
    pub er: f64,
}

impl MetricVector {
    pub fn get(&self, id: MetricId) -> f64 {
        match id {
            MetricId::Pat => self.pat,
            MetricId::Eps => self.eps,
            MetricId::Nim => self.nim,
            MetricId::Roe => self.roe,
            MetricId::Roa => self.roa,
            MetricId::Car => self.car,
            MetricId::Cet1 => self.cet1,
            MetricId::Nplr => self.nplr,
            MetricId::Ldr => self.ldr,
            MetricId::Casa => self.casa,
            MetricId::Per => self.per,
            MetricId::Pbr => self.pbr,
            MetricId::Er => self.er,
        }
    }

    pub fn set(&mut self, id: MetricId, value: f64) {
        let slot = match id {
            MetricId::Pat => &mut self.pat,
            MetricId::Eps => &mut self.eps,
            MetricId::Nim => &mut self.nim,
            MetricId::Roe => &mut self.roe,
            MetricId::Roa => &mut self.roa,
            MetricId::Car => &mut self.car,
            MetricId::Cet1 => &mut self.cet1,
            MetricId::Nplr => &mut self.nplr,
            MetricId::Ldr => &mut self.ldr,
            MetricId::Casa => &mut self.casa,
            MetricId::Per => &mut self.per,
            MetricId::Pbr => &mut self.pbr,
            MetricId::Er => &mut self.er,
        };
        *slot = value;
    }

    /// Builds a vector by asking `lookup` for every metric; fails on the
    /// first metric it cannot supply.
    pub fn try_from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(MetricId) -> Option<f64>,
    {
        let mut vector = MetricVector::zeroed();
        for id in MetricId::ALL {
            let value =
                lookup(id).ok_or_else(|| EarningsError::UnknownMetric(id.code().to_string()))?;
            vector.set(id, value);
        }
        Ok(vector)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricId, f64)> + '_ {
        MetricId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    /// String-keyed view for callers that render by catalogue id.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(id, value)| (id.code().to_string(), value))
            .collect()
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, value)| value.is_finite())
    }

    fn zeroed() -> Self {
        Self {
            pat: 0.0,
            eps: 0.0,
            nim: 0.0,
            roe: 0.0,
            roa: 0.0,
            car: 0.0,
            cet1: 0.0,
            nplr: 0.0,
            ldr: 0.0,
            casa: 0.0,
            per: 0.0,
            pbr: 0.0,
            er: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_codes_round_trip_through_from_str() {
        for id in MetricId::ALL {
            assert_eq!(id.code().parse::<MetricId>().unwrap(), id);
        }
        assert!(matches!(
            "EPS".parse::<MetricId>(),
            Err(EarningsError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_try_from_lookup_requires_every_metric() {
        let vector = MetricVector::try_from_lookup(|id| Some(id as usize as f64)).unwrap();
        assert_eq!(vector.get(MetricId::Er), 12.0);
        assert_eq!(vector.to_map().len(), 13);

        let missing = MetricVector::try_from_lookup(|id| match id {
            MetricId::Casa => None,
            _ => Some(1.0),
        });
        match missing {
            Err(EarningsError::UnknownMetric(code)) => assert_eq!(code, "CASA"),
            other => panic!("expected UnknownMetric, got {:?}", other),
        }
    }

    #[test]
    fn test_serializes_with_catalogue_keys() {
        let vector = MetricVector::try_from_lookup(|_| Some(1.5)).unwrap();
        let json = serde_json::to_string(&vector).unwrap();
        assert!(json.contains("\"earnings-per-share\":1.5"));
        assert!(json.contains("\"CET1\":1.5"));
    }

    #[test]
    fn test_unit_formatting() {
        assert_eq!(MetricUnit::Percent.format(3.456), "3.46%");
        assert_eq!(MetricUnit::Millions.format(890.4), "$890M");
        assert_eq!(MetricId::Pbr.unit(), MetricUnit::Multiple);
    }
}
