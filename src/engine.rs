use crate::bounds::verify_bounds;
use crate::catalogue::MetricCatalogue;
use crate::error::Result;
use crate::metrics::MetricVector;
use crate::schema::ScenarioInputs;
use log::debug;

/// Interest-earning loan book ($M) and the share of it that reprices.
const LOAN_BOOK: f64 = 1850.0;
const LOAN_REPRICING_SHARE: f64 = 0.6;
/// Deposit base ($M) and the average earning assets NIM is measured on.
const DEPOSIT_BASE: f64 = 15000.0;
const QUARTERLY_PROVISIONS: f64 = 125.0;
const FEE_INCOME: f64 = 420.0;
const OPERATING_COSTS: f64 = 1650.0;
const OPERATING_INCOME: f64 = 2850.0;
const EQUITY_BASE: f64 = 6950.0;
const ASSET_BASE: f64 = 69500.0;

const CAR_FLOOR: f64 = 8.0;
const CET1_FLOOR: f64 = 6.0;
const NPLR_FLOOR: f64 = 0.5;
const PER_FLOOR: f64 = 5.0;
const PBR_FLOOR: f64 = 0.5;

/// Dollar impact of each lever on quarterly profit, in $M.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverImpacts {
    pub loan_book: f64,
    pub deposit_cost: f64,
    pub provisions: f64,
    pub fees: f64,
    pub costs: f64,
}

impl LeverImpacts {
    pub fn from_inputs(inputs: &ScenarioInputs) -> Self {
        Self {
            loan_book: inputs.loan_growth / 100.0 * LOAN_BOOK * LOAN_REPRICING_SHARE,
            deposit_cost: inputs.deposit_rate_change / 10000.0 * DEPOSIT_BASE,
            provisions: inputs.provisioning_change / 100.0 * QUARTERLY_PROVISIONS,
            fees: inputs.fee_growth / 100.0 * FEE_INCOME,
            costs: inputs.cost_growth / 100.0 * OPERATING_COSTS,
        }
    }

    pub fn net_profit_change(&self) -> f64 {
        self.loan_book - self.deposit_cost - self.provisions + self.fees - self.costs
    }
}

/// Recalculates every metric for a lever vector against a fixed baseline.
///
/// Levers are assumed to be inside their declared ranges already. Ratios
/// that divide by a zero baseline EPS or ROE come out non-finite; use
/// [`compute_scenario_checked`] to turn that into an error.
pub fn compute_scenario(inputs: &ScenarioInputs, baseline: &MetricVector) -> MetricVector {
    // The valuation terms are not neutral at zero input (PBR carries a 0.8
    // damping factor), so a neutral scenario is the baseline itself.
    if inputs.is_neutral() {
        return *baseline;
    }

    let impacts = LeverImpacts::from_inputs(inputs);
    let net_profit_change = impacts.net_profit_change();

    let pat = floor_at(baseline.pat + net_profit_change, 0.0);
    let eps = floor_at(pat / baseline.pat * baseline.eps, 0.0);
    let nim = floor_at(
        baseline.nim + (impacts.loan_book - impacts.deposit_cost) / DEPOSIT_BASE * 100.0,
        0.0,
    );
    let roe = floor_at(pat / EQUITY_BASE * 100.0, 0.0);
    let roa = floor_at(pat / ASSET_BASE * 100.0, 0.0);

    let capital_impact = inputs.loan_growth / 100.0 * 0.1;
    let profitability_boost = (pat - baseline.pat) / 1000.0 * 0.05;
    let car = floor_at(baseline.car - capital_impact + profitability_boost, CAR_FLOOR);
    let cet1 = floor_at(
        baseline.cet1 - capital_impact * 0.8 + profitability_boost * 0.8,
        CET1_FLOOR,
    );

    let nplr = floor_at(
        baseline.nplr
            + inputs.provisioning_change / 100.0 * 0.2
            + inputs.loan_growth / 100.0 * 0.1,
        NPLR_FLOOR,
    );

    let ldr = (baseline.ldr + inputs.loan_growth / 100.0 * 2.0
        - inputs.deposit_rate_change / 100.0 * 0.5)
        .clamp(60.0, 100.0);
    let casa = (baseline.casa + inputs.deposit_rate_change / 100.0 * -0.3).clamp(25.0, 60.0);

    let per = floor_at(baseline.per * baseline.eps / eps, PER_FLOOR);
    let pbr = floor_at(baseline.pbr * roe / baseline.roe * 0.8, PBR_FLOOR);

    let revenue_change = impacts.loan_book + impacts.fees;
    let efficiency_impact =
        (impacts.costs - revenue_change) / (OPERATING_INCOME + revenue_change) * 100.0;
    let er = (baseline.er + efficiency_impact).clamp(45.0, 80.0);

    debug!(
        "Scenario computed: profit change {:.2}M, NIM {:.4} -> {:.4}",
        pat - baseline.pat,
        baseline.nim,
        nim
    );

    MetricVector {
        pat,
        eps,
        nim,
        roe,
        roa,
        car,
        cet1,
        nplr,
        ldr,
        casa,
        per,
        pbr,
        er,
    }
}

/// Like [`compute_scenario`], but rejects results that are non-finite or
/// outside their documented bounds.
pub fn compute_scenario_checked(
    inputs: &ScenarioInputs,
    baseline: &MetricVector,
) -> Result<MetricVector> {
    let results = compute_scenario(inputs, baseline);
    verify_bounds(&results)?;
    Ok(results)
}

/// `value.max(floor)` that lets NaN through instead of masking it.
fn floor_at(value: f64, floor: f64) -> f64 {
    if value.is_nan() {
        value
    } else {
        value.max(floor)
    }
}

/// Holds the baseline a dashboard session recomputes against.
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    baseline: MetricVector,
}

impl ScenarioEngine {
    pub fn new(baseline: MetricVector) -> Self {
        Self { baseline }
    }

    pub fn from_catalogue(catalogue: &MetricCatalogue) -> Result<Self> {
        Ok(Self::new(catalogue.baseline()?))
    }

    pub fn baseline(&self) -> &MetricVector {
        &self.baseline
    }

    pub fn compute(&self, inputs: &ScenarioInputs) -> MetricVector {
        compute_scenario(inputs, &self.baseline)
    }

    pub fn compute_checked(&self, inputs: &ScenarioInputs) -> Result<MetricVector> {
        compute_scenario_checked(inputs, &self.baseline)
    }
}
