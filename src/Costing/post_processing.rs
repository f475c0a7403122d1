//! Route-level percentages and process mass intensity, computed once the recursive
//! costing has filled the dataset.
use crate::Costing::cost_errors::CostError;
use crate::Costing::route_dataset::RouteDataset;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// label of the whole-route row; compound names are never bracketed
pub const ROUTE_PMI_LABEL: &str = "[Route]";

/// Key of a PMI entry: a reaction, or the synthetic whole-route entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PmiKey {
    Reaction(String),
    Route,
}

impl fmt::Display for PmiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PmiKey::Reaction(name) => write!(f, "{}", name),
            PmiKey::Route => write!(f, "{}", ROUTE_PMI_LABEL),
        }
    }
}

/// exported form of one PMI entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PmiRecord {
    #[serde(rename = "Prod")]
    pub key: String,
    #[serde(rename = "PMI (kg/kg)")]
    pub pmi: f64,
}

/// process mass intensity: kg of material per kg of product
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PmiTable {
    per_reaction: BTreeMap<String, f64>,
    route: f64,
}

impl PmiTable {
    /// PMI of one reaction per kg of its own product
    pub fn reaction(&self, name: &str) -> Option<f64> {
        self.per_reaction.get(name).copied()
    }

    /// PMI of the whole route per kg of final product
    pub fn route(&self) -> f64 {
        self.route
    }

    pub fn entries(&self) -> Vec<(PmiKey, f64)> {
        let mut entries: Vec<(PmiKey, f64)> = self
            .per_reaction
            .iter()
            .map(|(name, pmi)| (PmiKey::Reaction(name.clone()), *pmi))
            .collect();
        entries.push((PmiKey::Route, self.route));
        entries
    }

    pub fn records(&self) -> Vec<PmiRecord> {
        self.entries()
            .into_iter()
            .map(|(key, pmi)| PmiRecord {
                key: key.to_string(),
                pmi,
            })
            .collect()
    }
}

/// Single pass over a fully costed dataset.
///
/// * the final product line shows the delivered cost (with OPEX) when the final reaction has OPEX
/// * `% RM cost/kg prod` is taken relative to the raw-material cost of the final product
/// * cost-calculated lines lose their per-final-product values: their cost already sits in the
///   rows of the sub-reaction, so the columns sum to the final cost and to the route PMI
/// * the final product's `kg/kg prod` is 1 by definition
pub fn rxn_data_post(
    data: &mut RouteDataset,
    final_prod: &str,
    final_cost: f64,
) -> Result<PmiTable, CostError> {
    let final_idx = data
        .row_index(final_prod, final_prod)
        .ok_or_else(|| CostError::MissingProductRow {
            reaction: final_prod.to_string(),
        })?;
    let rows = data.rows_mut();
    if rows[final_idx].opex.is_some() {
        rows[final_idx].cost = Some(final_cost);
    }
    let rm_cost = rows[final_idx].rm_cost_per_kg_rxn.unwrap_or(0.0);

    for row in rows.iter_mut() {
        row.pct_rm_cost_per_kg_prod = match row.rm_cost_per_kg_prod {
            Some(c) if rm_cost != 0.0 => Some(100.0 * c / rm_cost),
            _ => None,
        };
        if row.cost_calc {
            row.rm_cost_per_kg_prod = None;
            row.pct_rm_cost_per_kg_prod = None;
            row.kg_per_kg_prod = None;
        }
    }
    rows[final_idx].kg_per_kg_prod = Some(1.0);

    let mut per_reaction: BTreeMap<String, f64> = BTreeMap::new();
    for row in data.rows() {
        if let Some(ratio) = row.kg_per_kg_rxn {
            *per_reaction.entry(row.prod.clone()).or_insert(0.0) += ratio;
        }
    }
    let route = data.rows().iter().filter_map(|r| r.kg_per_kg_prod).sum();
    Ok(PmiTable {
        per_reaction,
        route,
    })
}
