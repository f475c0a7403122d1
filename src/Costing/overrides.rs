//! Manual overrides of dataset values.
//!
//! Overrides are recorded, not applied: the dataset only sees them when it is reset before
//! a calculation, at which point every recorded override is replayed in insertion order.
use crate::Costing::cost_errors::CostError;
use crate::Costing::route_dataset::{RouteDataset, RouteRow};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// input columns that can be overridden, scanned or perturbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueField {
    Cost,
    Equiv,
    Volumes,
    SolRecyc,
    Density,
    MW,
    Opex,
}

impl ValueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueField::Cost => "Cost",
            ValueField::Equiv => "Equiv",
            ValueField::Volumes => "Volumes",
            ValueField::SolRecyc => "Sol Recyc",
            ValueField::Density => "Density",
            ValueField::MW => "MW",
            ValueField::Opex => "OPEX",
        }
    }

    pub fn get(&self, row: &RouteRow) -> Option<f64> {
        match self {
            ValueField::Cost => row.cost,
            ValueField::Equiv => row.equiv,
            ValueField::Volumes => row.volumes,
            ValueField::SolRecyc => row.sol_recyc,
            ValueField::Density => row.density,
            ValueField::MW => Some(row.mw),
            ValueField::Opex => row.opex,
        }
    }

    /// Writes `value` into the row. A manual cost replaces a calculated one, so the
    /// cost-calculated flag is dropped on every line except the reaction's own product.
    pub fn set(&self, row: &mut RouteRow, value: f64) {
        match self {
            ValueField::Cost => {
                row.cost = Some(value);
                if !row.is_product_line() {
                    row.cost_calc = false;
                }
            }
            ValueField::Equiv => row.equiv = Some(value),
            ValueField::Volumes => row.volumes = Some(value),
            ValueField::SolRecyc => row.sol_recyc = Some(value),
            ValueField::Density => row.density = Some(value),
            ValueField::MW => row.mw = value,
            ValueField::Opex => row.opex = Some(value),
        }
    }
}

impl fmt::Display for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueField {
    type Err = CostError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Cost" | "cost" => Ok(ValueField::Cost),
            "Equiv" | "equiv" => Ok(ValueField::Equiv),
            "Volumes" | "volumes" => Ok(ValueField::Volumes),
            "Sol Recyc" | "sol_recyc" => Ok(ValueField::SolRecyc),
            "Density" | "density" => Ok(ValueField::Density),
            "MW" | "mw" => Ok(ValueField::MW),
            "OPEX" | "opex" => Ok(ValueField::Opex),
            other => Err(CostError::UnknownField(other.to_string())),
        }
    }
}

/// one recorded override. `scope == None` hits the compound in every reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    pub compound: String,
    pub value: f64,
    pub field: ValueField,
    pub scope: Option<String>,
}

impl Override {
    /// Applies the override to the dataset and re-validates the touched rows.
    pub fn apply(&self, dataset: &mut RouteDataset) -> Result<(), CostError> {
        let targets = self.targets(dataset)?;
        for i in targets {
            let row = &mut dataset.rows_mut()[i];
            self.field.set(row, self.value);
            row.validate_inputs()?;
        }
        Ok(())
    }

    fn targets(&self, dataset: &RouteDataset) -> Result<Vec<usize>, CostError> {
        let targets = match &self.scope {
            Some(reaction) => dataset
                .row_index(reaction, &self.compound)
                .into_iter()
                .collect(),
            None => dataset.compound_indices(&self.compound),
        };
        if targets.is_empty() {
            return Err(CostError::UnknownOverrideTarget {
                compound: self.compound.clone(),
                scope: self.scope.clone(),
            });
        }
        Ok(targets)
    }
}

/// ordered list of overrides, replayed on every reset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideManager {
    overrides: Vec<Override>,
}

impl OverrideManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an override after checking it names existing rows. Nothing is recalculated.
    pub fn record(
        &mut self,
        dataset: &RouteDataset,
        compound: &str,
        value: f64,
        field: ValueField,
        scope: Option<&str>,
    ) -> Result<(), CostError> {
        let ovr = Override {
            compound: compound.to_string(),
            value,
            field,
            scope: scope.map(|s| s.to_string()),
        };
        ovr.targets(dataset)?;
        info!(
            "override recorded: {} of '{}' = {}{}",
            field,
            compound,
            value,
            scope.map(|s| format!(" in reaction '{}'", s)).unwrap_or_default()
        );
        self.overrides.push(ovr);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Override> {
        self.overrides.pop()
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Resets the dataset for a new calculation: inputs back to their built values,
    /// computed columns emptied, costs of calculated materials forgotten (a stale catalog
    /// cost must not stand in for a calculation), then every override replayed in order.
    pub fn clear_and_reapply(&self, dataset: &mut RouteDataset) -> Result<(), CostError> {
        dataset.reset();
        for row in dataset.rows_mut().iter_mut() {
            row.clear_computed();
            if row.cost_calc {
                row.cost = None;
            }
        }
        for ovr in &self.overrides {
            ovr.apply(dataset)?;
        }
        Ok(())
    }
}
