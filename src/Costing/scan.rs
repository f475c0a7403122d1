//! Value scans and sensitivity analysis.
//!
//! Each scanned value is costed from the same starting state: the context is snapshotted
//! before the loop and restored after every value, so results do not depend on the order
//! of the values.
use crate::Costing::cost_errors::CostError;
use crate::Costing::overrides::ValueField;
use crate::Costing::post_processing::PmiTable;
use crate::Costing::route_cost::RouteCost;
use crate::Costing::route_dataset::RouteDataset;
use log::{info, warn};
use serde::Serialize;

/// cost response of the route to a ±fraction change of one input value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityRecord {
    #[serde(rename = "Prod")]
    pub reaction: String,
    #[serde(rename = "Compound")]
    pub compound: String,
    #[serde(rename = "Value")]
    pub value: f64,
    /// % change of the final cost when the value is raised by the fraction
    #[serde(rename = "% change (+)")]
    pub pct_change_up: Option<f64>,
    /// % change of the final cost when the value is lowered by the fraction
    #[serde(rename = "% change (-)")]
    pub pct_change_down: Option<f64>,
}

struct Snapshot {
    dataset: RouteDataset,
    cost: Option<f64>,
    pmi: Option<PmiTable>,
}

impl RouteCost {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            dataset: self.dataset.clone(),
            cost: self.cost,
            pmi: self.pmi.clone(),
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.dataset.clone_from(&snapshot.dataset);
        self.cost = snapshot.cost;
        self.pmi.clone_from(&snapshot.pmi);
    }

    /// Costs the route once per value of `field` for `compound` and returns the final costs
    /// in the order of `values`. The context is left exactly as it was before the call.
    pub fn value_scan(
        &mut self,
        compound: &str,
        values: &[f64],
        field: ValueField,
        scope: Option<&str>,
    ) -> Result<Vec<f64>, CostError> {
        let snapshot = self.snapshot();
        let mut costs = Vec::with_capacity(values.len());
        for &value in values {
            self.value_mod(compound, value, field, scope)?;
            let result = self.calc_cost();
            self.overrides.pop();
            self.restore(&snapshot);
            costs.push(result?);
        }
        Ok(costs)
    }

    /// Same contract as `value_scan`, each value costed on its own copy of the context in
    /// a separate thread. `self` is not touched.
    pub fn value_scan_parallel(
        &self,
        compound: &str,
        values: &[f64],
        field: ValueField,
        scope: Option<&str>,
    ) -> Result<Vec<f64>, CostError> {
        std::thread::scope(|s| {
            let handles: Vec<_> = values
                .iter()
                .map(|&value| {
                    let mut worker = self.clone();
                    s.spawn(move || {
                        worker.value_mod(compound, value, field, scope)?;
                        worker.calc_cost()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    /// Raises and lowers by `fraction` every defined value of `field` on the costed route,
    /// one row at a time, and reports the % change of the final cost in both directions.
    /// Calculated costs are not perturbed. A direction that would take the value out of its
    /// domain is reported as `None`. The context is restored afterwards.
    pub fn sensitivity(
        &mut self,
        field: ValueField,
        fraction: f64,
    ) -> Result<Vec<SensitivityRecord>, CostError> {
        if !(fraction.is_finite() && fraction > 0.0) {
            return Err(CostError::InvalidFraction(fraction));
        }
        let snapshot = self.snapshot();
        let result = self.sensitivity_inner(field, fraction);
        self.restore(&snapshot);
        result
    }

    fn sensitivity_inner(
        &mut self,
        field: ValueField,
        fraction: f64,
    ) -> Result<Vec<SensitivityRecord>, CostError> {
        let base = self.calc_cost()?;
        let targets: Vec<(String, String, f64)> = self
            .dataset
            .rows()
            .iter()
            .filter(|r| r.kg_per_kg_rxn.is_some())
            .filter(|r| !(field == ValueField::Cost && r.cost_calc))
            .filter_map(|r| {
                field
                    .get(r)
                    .map(|v| (r.prod.clone(), r.compound.clone(), v))
            })
            .collect();
        info!(
            "sensitivity of {} at ±{}%: {} values",
            field,
            fraction * 100.0,
            targets.len()
        );
        let mut records = Vec::with_capacity(targets.len());
        for (reaction, compound, value) in targets {
            let pct_change_up =
                self.perturbed_change(&reaction, &compound, value * (1.0 + fraction), field, base)?;
            let pct_change_down =
                self.perturbed_change(&reaction, &compound, value * (1.0 - fraction), field, base)?;
            records.push(SensitivityRecord {
                pct_change_up,
                pct_change_down,
                reaction,
                compound,
                value,
            });
        }
        Ok(records)
    }

    /// % change of the final cost with one value replaced. `None` when the value leaves the
    /// domain of its field (e.g. a recycle fraction pushed to 1 or above) or the base is 0.
    fn perturbed_change(
        &mut self,
        reaction: &str,
        compound: &str,
        value: f64,
        field: ValueField,
        base: f64,
    ) -> Result<Option<f64>, CostError> {
        match self.value_scan(compound, &[value], field, Some(reaction)) {
            Ok(costs) if base != 0.0 => Ok(Some(100.0 * (costs[0] - base) / base)),
            Ok(_) => Ok(None),
            Err(CostError::InvalidValue { .. }) => {
                warn!(
                    "{} of '{}' in reaction '{}' cannot be set to {}, change not reported",
                    field, compound, reaction, value
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
