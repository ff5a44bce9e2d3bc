use crate::error::{EarningsError, Result};
use crate::metrics::{MetricId, MetricVector};

/// Documented floor and ceiling of a recalculated metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBounds {
    pub floor: f64,
    pub ceiling: f64,
}

impl MetricBounds {
    const fn at_least(floor: f64) -> Self {
        Self {
            floor,
            ceiling: f64::INFINITY,
        }
    }

    const fn between(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    pub fn admits(&self, value: f64) -> bool {
        value.is_finite() && value >= self.floor && value <= self.ceiling
    }
}

pub fn bounds_for(id: MetricId) -> MetricBounds {
    match id {
        MetricId::Pat | MetricId::Eps | MetricId::Nim | MetricId::Roe | MetricId::Roa => {
            MetricBounds::at_least(0.0)
        }
        MetricId::Car => MetricBounds::at_least(8.0),
        MetricId::Cet1 => MetricBounds::at_least(6.0),
        MetricId::Nplr => MetricBounds::at_least(0.5),
        MetricId::Ldr => MetricBounds::between(60.0, 100.0),
        MetricId::Casa => MetricBounds::between(25.0, 60.0),
        MetricId::Per => MetricBounds::at_least(5.0),
        MetricId::Pbr => MetricBounds::at_least(0.5),
        MetricId::Er => MetricBounds::between(45.0, 80.0),
    }
}

/// Every metric in `results` that is non-finite or out of bounds.
pub fn bound_violations(results: &MetricVector) -> Vec<MetricId> {
    results
        .iter()
        .filter(|(id, value)| !bounds_for(*id).admits(*value))
        .map(|(id, _)| id)
        .collect()
}

pub fn verify_bounds(results: &MetricVector) -> Result<()> {
    for (id, value) in results.iter() {
        let bounds = bounds_for(id);
        if !bounds.admits(value) {
            return Err(EarningsError::BoundViolation {
                metric: id.code().to_string(),
                value,
                floor: bounds.floor,
                ceiling: bounds.ceiling,
            });
        }
    }
    Ok(())
}
