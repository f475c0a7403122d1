//! # Route Dataset
//!
//! ## Aim
//! The merged, indexed working table of a synthesis route. Every reaction line is joined
//! with the catalog entry of its compound and extended with the columns the costing fills in.
//!
//! ## Main Data Structures and Logic
//! - `RouteRow`: one (reaction, compound) line with typed inputs and optional computed values.
//!   `None` in a computed column means "not calculated yet", never zero.
//! - `RouteDataset`: rows sorted by (reaction, compound) plus a map from reaction name to
//!   its contiguous slice of rows. The sort order is fixed at build time, rows are never
//!   added or removed afterwards, so slicing a reaction is a map lookup.
//!
//! ## Validation
//! `RouteDataset::build` refuses to return a dataset that the costing could silently turn
//! into NaN: materials missing from the catalog, costs that are neither known nor calculated,
//! duplicated compounds inside a reaction, reactions without a product line, solvents with a
//! broken relative basis or without density, out-of-domain numbers.
use crate::Costing::cost_errors::CostError;
use crate::Costing::materials::MaterialsCatalog;
use crate::Costing::reactions::ReactionTable;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRow {
    #[serde(rename = "Prod")]
    pub prod: String,
    #[serde(rename = "Compound")]
    pub compound: String,
    #[serde(rename = "MW")]
    pub mw: f64,
    #[serde(rename = "Density")]
    pub density: Option<f64>,
    #[serde(rename = "Cost")]
    pub cost: Option<f64>,
    #[serde(rename = "Equiv")]
    pub equiv: Option<f64>,
    #[serde(rename = "Volumes")]
    pub volumes: Option<f64>,
    #[serde(rename = "Relative")]
    pub relative: Option<String>,
    #[serde(rename = "Sol Recyc")]
    pub sol_recyc: Option<f64>,
    #[serde(rename = "Cost calc")]
    pub cost_calc: bool,
    #[serde(rename = "OPEX")]
    pub opex: Option<f64>,
    // computed columns
    #[serde(rename = "kg/kg rxn")]
    pub kg_per_kg_rxn: Option<f64>,
    #[serde(rename = "RM cost/kg rxn")]
    pub rm_cost_per_kg_rxn: Option<f64>,
    #[serde(rename = "% RM cost/kg rxn")]
    pub pct_rm_cost_per_kg_rxn: Option<f64>,
    #[serde(rename = "kg/kg prod")]
    pub kg_per_kg_prod: Option<f64>,
    #[serde(rename = "RM cost/kg prod")]
    pub rm_cost_per_kg_prod: Option<f64>,
    #[serde(rename = "% RM cost/kg prod")]
    pub pct_rm_cost_per_kg_prod: Option<f64>,
}

impl RouteRow {
    /// true for the line of the reaction's own product
    pub fn is_product_line(&self) -> bool {
        self.prod == self.compound
    }

    pub fn is_solvent(&self) -> bool {
        self.volumes.is_some()
    }

    pub fn clear_computed(&mut self) {
        self.kg_per_kg_rxn = None;
        self.rm_cost_per_kg_rxn = None;
        self.pct_rm_cost_per_kg_rxn = None;
        self.kg_per_kg_prod = None;
        self.rm_cost_per_kg_prod = None;
        self.pct_rm_cost_per_kg_prod = None;
    }

    /// checks every input number against its domain
    pub fn validate_inputs(&self) -> Result<(), CostError> {
        let invalid = |field: &str, value: f64| CostError::InvalidValue {
            reaction: self.prod.clone(),
            compound: self.compound.clone(),
            field: field.to_string(),
            value,
        };
        if !(self.mw.is_finite() && self.mw > 0.0) {
            return Err(invalid("MW", self.mw));
        }
        for (field, value) in [
            ("Cost", self.cost),
            ("OPEX", self.opex),
            ("Density", self.density),
            ("Volumes", self.volumes),
            ("Equiv", self.equiv),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v >= 0.0) {
                    return Err(invalid(field, v));
                }
            }
        }
        if let Some(recyc) = self.sol_recyc {
            if !(0.0..1.0).contains(&recyc) {
                return Err(invalid("Sol Recyc", recyc));
            }
        }
        if self.is_product_line() {
            match self.equiv {
                Some(e) if e > 0.0 => {}
                Some(e) => return Err(invalid("Equiv", e)),
                None => return Err(invalid("Equiv", f64::NAN)),
            }
        } else if !self.is_solvent() && self.equiv.is_none() {
            return Err(CostError::Schema(format!(
                "Equiv is blank for '{}' in reaction '{}', which is not a solvent",
                self.compound, self.prod
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteDataset {
    rows: Vec<RouteRow>,
    /// rows exactly as built; resets start from here
    baseline: Vec<RouteRow>,
    reactions: BTreeMap<String, Range<usize>>,
}

impl RouteDataset {
    /// Joins the reaction table with the catalog (every reaction line survives the join)
    /// and validates the result.
    pub fn build(
        catalog: &MaterialsCatalog,
        reactions: &ReactionTable,
    ) -> Result<RouteDataset, CostError> {
        if reactions.is_empty() {
            return Err(CostError::Schema("reaction table is empty".to_string()));
        }
        let mut rows = Vec::with_capacity(reactions.len());
        for line in &reactions.lines {
            let prod = line.prod.trim().to_string();
            let compound = line.compound.trim().to_string();
            let material = catalog
                .get(&compound)
                .ok_or_else(|| CostError::MissingMaterial {
                    reaction: prod.clone(),
                    compound: compound.clone(),
                })?;
            let is_product = prod == compound;
            let row = RouteRow {
                mw: material.mw,
                density: material.density,
                cost: material.cost,
                equiv: line.equiv,
                volumes: line.volumes,
                relative: line.relative.as_ref().map(|r| r.trim().to_string()),
                sol_recyc: line.sol_recyc,
                // a reaction's own product always takes its cost from the reaction
                cost_calc: line.cost_calc || is_product,
                opex: line.opex,
                kg_per_kg_rxn: None,
                rm_cost_per_kg_rxn: None,
                pct_rm_cost_per_kg_rxn: None,
                kg_per_kg_prod: None,
                rm_cost_per_kg_prod: None,
                pct_rm_cost_per_kg_prod: None,
                prod,
                compound,
            };
            row.validate_inputs()?;
            if row.cost.is_none() && !row.cost_calc {
                return Err(CostError::MissingCost {
                    reaction: row.prod,
                    compound: row.compound,
                });
            }
            if row.opex.is_some() && !is_product {
                warn!(
                    "OPEX given for '{}' in reaction '{}' is ignored: only the product line carries OPEX",
                    row.compound, row.prod
                );
            }
            rows.push(row);
        }

        rows.sort_by(|a, b| (&a.prod, &a.compound).cmp(&(&b.prod, &b.compound)));
        if let Some(pair) = rows
            .windows(2)
            .find(|w| w[0].prod == w[1].prod && w[0].compound == w[1].compound)
        {
            return Err(CostError::DuplicateMaterial {
                compound: pair[0].compound.clone(),
                reaction: Some(pair[0].prod.clone()),
            });
        }

        let mut index: BTreeMap<String, Range<usize>> = BTreeMap::new();
        let mut start = 0;
        for i in 1..=rows.len() {
            if i == rows.len() || rows[i].prod != rows[start].prod {
                index.insert(rows[start].prod.clone(), start..i);
                start = i;
            }
        }

        let dataset = RouteDataset {
            baseline: rows.clone(),
            rows,
            reactions: index,
        };
        for reaction in dataset.reactions.keys() {
            dataset.check_reaction(reaction)?;
        }
        info!(
            "route dataset built: {} rows in {} reactions",
            dataset.rows.len(),
            dataset.reactions.len()
        );
        Ok(dataset)
    }

    /// Structural checks of one reaction: it has a product line, every solvent has a density
    /// and its relative basis names exactly one line of the same reaction carrying equivalents.
    pub fn check_reaction(&self, reaction: &str) -> Result<(), CostError> {
        let rows = self.rows_for(reaction);
        if !rows.iter().any(|r| r.is_product_line()) {
            return Err(CostError::MissingProductRow {
                reaction: reaction.to_string(),
            });
        }
        for row in rows.iter().filter(|r| r.is_solvent()) {
            let matches = match &row.relative {
                Some(rel) => rows
                    .iter()
                    .filter(|r| &r.compound == rel && r.equiv.is_some())
                    .count(),
                None => 0,
            };
            if matches != 1 {
                return Err(CostError::InvalidRelativeBasis {
                    reaction: row.prod.clone(),
                    compound: row.compound.clone(),
                    relative: row.relative.clone(),
                    matches,
                });
            }
            if row.density.is_none() {
                return Err(CostError::MissingDensity {
                    reaction: row.prod.clone(),
                    compound: row.compound.clone(),
                });
            }
        }
        Ok(())
    }

    /// Puts every row back to its state as built: inputs restored, computed columns empty.
    pub fn reset(&mut self) {
        self.rows.clone_from(&self.baseline);
    }

    pub fn clear_computed(&mut self) {
        for row in self.rows.iter_mut() {
            row.clear_computed();
        }
    }

    pub fn rows(&self) -> &[RouteRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [RouteRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_reaction(&self, reaction: &str) -> bool {
        self.reactions.contains_key(reaction)
    }

    /// reaction names in sorted order
    pub fn reaction_names(&self) -> impl Iterator<Item = &String> {
        self.reactions.keys()
    }

    pub fn reaction_range(&self, reaction: &str) -> Option<Range<usize>> {
        self.reactions.get(reaction).cloned()
    }

    /// all rows of a reaction; empty if there is no such reaction
    pub fn rows_for(&self, reaction: &str) -> &[RouteRow] {
        match self.reactions.get(reaction) {
            Some(range) => &self.rows[range.clone()],
            None => &[],
        }
    }

    pub fn row_index(&self, reaction: &str, compound: &str) -> Option<usize> {
        let range = self.reactions.get(reaction)?;
        self.rows[range.clone()]
            .binary_search_by(|r| r.compound.as_str().cmp(compound))
            .ok()
            .map(|i| range.start + i)
    }

    pub fn row(&self, reaction: &str, compound: &str) -> Option<&RouteRow> {
        self.row_index(reaction, compound).map(|i| &self.rows[i])
    }

    /// indices of every row of `compound`, across all reactions
    pub fn compound_indices(&self, compound: &str) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.compound == compound)
            .map(|(i, _)| i)
            .collect()
    }
}
