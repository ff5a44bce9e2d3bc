use crate::error::{EarningsError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The five business levers a what-if scenario is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Lever {
    #[schemars(description = "Loan book growth in percent, -10 to +20 in steps of 1")]
    LoanGrowth,

    #[schemars(description = "Deposit rate change in basis points, -50 to +100 in steps of 5")]
    DepositRateChange,

    #[schemars(description = "Change in loan loss provisioning in percent, -25 to +50 in steps of 5")]
    ProvisioningChange,

    #[schemars(description = "Fee income growth in percent, -15 to +15 in steps of 1")]
    FeeGrowth,

    #[schemars(description = "Operating cost growth in percent, -10 to +10 in steps of 1")]
    CostGrowth,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeverRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: &'static str,
}

impl LeverRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Lever {
    pub const ALL: [Lever; 5] = [
        Lever::LoanGrowth,
        Lever::DepositRateChange,
        Lever::ProvisioningChange,
        Lever::FeeGrowth,
        Lever::CostGrowth,
    ];

    pub fn range(self) -> LeverRange {
        match self {
            Lever::LoanGrowth => LeverRange {
                min: -10.0,
                max: 20.0,
                step: 1.0,
                unit: "%",
            },
            Lever::DepositRateChange => LeverRange {
                min: -50.0,
                max: 100.0,
                step: 5.0,
                unit: "bps",
            },
            Lever::ProvisioningChange => LeverRange {
                min: -25.0,
                max: 50.0,
                step: 5.0,
                unit: "%",
            },
            Lever::FeeGrowth => LeverRange {
                min: -15.0,
                max: 15.0,
                step: 1.0,
                unit: "%",
            },
            Lever::CostGrowth => LeverRange {
                min: -10.0,
                max: 10.0,
                step: 1.0,
                unit: "%",
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lever::LoanGrowth => "Loan Growth",
            Lever::DepositRateChange => "Deposit Rate Change",
            Lever::ProvisioningChange => "Provisioning Change",
            Lever::FeeGrowth => "Fee Income Growth",
            Lever::CostGrowth => "Cost Growth",
        }
    }

    /// Every value the slider for this lever can take, in ascending order.
    pub fn steps(self) -> Vec<f64> {
        let range = self.range();
        let count = ((range.max - range.min) / range.step).round() as usize;
        (0..=count)
            .map(|i| range.min + i as f64 * range.step)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInputs {
    #[schemars(description = "Loan book growth in percent. Range -10 to 20.")]
    pub loan_growth: f64,

    #[schemars(description = "Deposit rate change in basis points. Range -50 to 100.")]
    pub deposit_rate_change: f64,

    #[schemars(description = "Change in provisioning in percent. Range -25 to 50.")]
    pub provisioning_change: f64,

    #[schemars(description = "Fee income growth in percent. Range -15 to 15.")]
    pub fee_growth: f64,

    #[schemars(description = "Operating cost growth in percent. Range -10 to 10.")]
    pub cost_growth: f64,
}

impl ScenarioInputs {
    pub fn get(&self, lever: Lever) -> f64 {
        match lever {
            Lever::LoanGrowth => self.loan_growth,
            Lever::DepositRateChange => self.deposit_rate_change,
            Lever::ProvisioningChange => self.provisioning_change,
            Lever::FeeGrowth => self.fee_growth,
            Lever::CostGrowth => self.cost_growth,
        }
    }

    pub fn set(&mut self, lever: Lever, value: f64) {
        match lever {
            Lever::LoanGrowth => self.loan_growth = value,
            Lever::DepositRateChange => self.deposit_rate_change = value,
            Lever::ProvisioningChange => self.provisioning_change = value,
            Lever::FeeGrowth => self.fee_growth = value,
            Lever::CostGrowth => self.cost_growth = value,
        }
    }

    pub fn with(mut self, lever: Lever, value: f64) -> Self {
        self.set(lever, value);
        self
    }

    /// True when every lever sits at zero.
    pub fn is_neutral(&self) -> bool {
        Lever::ALL.iter().all(|lever| self.get(*lever) == 0.0)
    }

    /// Returns a copy with every lever clamped to its declared range.
    pub fn clamped(&self) -> Self {
        let mut clamped = *self;
        for lever in Lever::ALL {
            clamped.set(lever, lever.range().clamp(self.get(lever)));
        }
        clamped
    }

    pub fn validate(&self) -> Result<()> {
        for lever in Lever::ALL {
            let range = lever.range();
            let value = self.get(lever);
            if !range.contains(value) {
                return Err(EarningsError::LeverOutOfRange {
                    lever: lever.label().to_string(),
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ScenarioInputs)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = ScenarioInputs::schema_as_json().unwrap();
        assert!(schema_json.contains("loanGrowth"));
        assert!(schema_json.contains("depositRateChange"));
        assert!(schema_json.contains("Range -50 to 100"));
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let inputs = ScenarioInputs::default()
            .with(Lever::LoanGrowth, 5.0)
            .with(Lever::CostGrowth, -2.0);

        let json = serde_json::to_string(&inputs).unwrap();
        assert!(json.contains("\"loanGrowth\":5.0"));

        let deserialized: ScenarioInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, inputs);
    }

    #[test]
    fn test_clamped_and_validate() {
        let raw = ScenarioInputs {
            loan_growth: 35.0,
            deposit_rate_change: -80.0,
            provisioning_change: 10.0,
            fee_growth: 0.0,
            cost_growth: 0.0,
        };

        match raw.validate() {
            Err(EarningsError::LeverOutOfRange { lever, max, .. }) => {
                assert_eq!(lever, "Loan Growth");
                assert_eq!(max, 20.0);
            }
            other => panic!("expected LeverOutOfRange, got {:?}", other),
        }

        let clamped = raw.clamped();
        assert_eq!(clamped.loan_growth, 20.0);
        assert_eq!(clamped.deposit_rate_change, -50.0);
        assert_eq!(clamped.provisioning_change, 10.0);
        assert!(clamped.validate().is_ok());
    }

    #[test]
    fn test_lever_steps_cover_range() {
        let deposit = Lever::DepositRateChange.steps();
        assert_eq!(deposit.len(), 31);
        assert_eq!(deposit[0], -50.0);
        assert_eq!(*deposit.last().unwrap(), 100.0);

        assert_eq!(Lever::LoanGrowth.steps().len(), 31);
        assert_eq!(Lever::CostGrowth.steps().len(), 21);
    }

    #[test]
    fn test_neutral_inputs() {
        assert!(ScenarioInputs::default().is_neutral());
        assert!(!ScenarioInputs::default()
            .with(Lever::FeeGrowth, 1.0)
            .is_neutral());
    }
}
