//! # Cost Propagation Engine
//!
//! ## Aim
//! Recursive costing of a reaction route. For one reaction the engine computes the mass of
//! every input per kg of that reaction's product, costs any input that is itself made on-site
//! by recursing into the reaction of the same name, and sums the contributions into the unit
//! cost of the product.
//!
//! ## Amplifier
//! `amp` is the number of kg of the current reaction's product needed per kg of the final
//! product. It starts at 1 and is multiplied by the mass ratio of each intermediate on the
//! way down, which gives the per-final-product columns of every sub-reaction.
//!
//! ## Cycles
//! The chain of reactions being costed is carried along the recursion. Entering a reaction
//! already on the chain is reported as `CostError::CyclicRoute`. A reaction consumed by two
//! different reactions is not a cycle and is costed once per consumer: its per-reaction
//! columns are the same on every visit, its per-final-product columns (`kg/kg prod`,
//! `RM cost/kg prod`) add up the share of every visit.
use crate::Costing::cost_errors::CostError;
use crate::Costing::route_dataset::{RouteDataset, RouteRow};
use log::debug;

/// Mass of every line of a reaction per mol of product (kg per kmol, the unit cancels on
/// normalization). Non-solvents weigh `Equiv * MW`; solvents weigh
/// `Volumes * Density * (1 - Sol Recyc)` times the mass of their relative compound.
pub fn reaction_masses(rows: &[RouteRow]) -> Result<Vec<f64>, CostError> {
    let raw: Vec<f64> = rows
        .iter()
        .map(|r| r.equiv.unwrap_or(0.0) * r.mw)
        .collect();
    let mut masses = raw.clone();
    for (i, row) in rows.iter().enumerate() {
        let Some(volumes) = row.volumes else {
            continue;
        };
        let rel_pos = relative_position(rows, row)?;
        let density = row.density.ok_or_else(|| CostError::MissingDensity {
            reaction: row.prod.clone(),
            compound: row.compound.clone(),
        })?;
        let recycle = row.sol_recyc.unwrap_or(0.0);
        masses[i] = volumes * density * (1.0 - recycle) * raw[rel_pos];
    }
    Ok(masses)
}

fn relative_position(rows: &[RouteRow], solvent: &RouteRow) -> Result<usize, CostError> {
    let candidates: Vec<usize> = match &solvent.relative {
        Some(rel) => rows
            .iter()
            .enumerate()
            .filter(|(_, r)| &r.compound == rel && r.equiv.is_some())
            .map(|(i, _)| i)
            .collect(),
        None => Vec::new(),
    };
    match candidates.as_slice() {
        [single] => Ok(*single),
        _ => Err(CostError::InvalidRelativeBasis {
            reaction: solvent.prod.clone(),
            compound: solvent.compound.clone(),
            relative: solvent.relative.clone(),
            matches: candidates.len(),
        }),
    }
}

/// Costs reaction `prod` and every sub-reaction it depends on, filling the computed columns
/// of their rows. Returns the unit cost of `prod` ($/kg) including the reaction's OPEX.
pub fn rxn_cost(
    data: &mut RouteDataset,
    prod: &str,
    amp: f64,
    chain: &mut Vec<String>,
) -> Result<f64, CostError> {
    if chain.iter().any(|r| r == prod) {
        let mut cycle = chain.clone();
        cycle.push(prod.to_string());
        return Err(CostError::CyclicRoute { chain: cycle });
    }
    if !data.has_reaction(prod) {
        return Err(match chain.last() {
            Some(parent) => CostError::UnresolvedReference {
                reaction: parent.clone(),
                compound: prod.to_string(),
            },
            None => CostError::UnknownFinalProduct(prod.to_string()),
        });
    }
    chain.push(prod.to_string());
    let result = cost_one_reaction(data, prod, amp, chain);
    chain.pop();
    result
}

fn cost_one_reaction(
    data: &mut RouteDataset,
    prod: &str,
    amp: f64,
    chain: &mut Vec<String>,
) -> Result<f64, CostError> {
    // overrides may have changed solvents since the dataset was built
    data.check_reaction(prod)?;
    let Some(range) = data.reaction_range(prod) else {
        return Err(CostError::UnknownFinalProduct(prod.to_string()));
    };
    let Some(prod_idx) = data.row_index(prod, prod) else {
        return Err(CostError::MissingProductRow {
            reaction: prod.to_string(),
        });
    };
    let prod_pos = prod_idx - range.start;

    let masses = reaction_masses(data.rows_for(prod))?;
    let prod_mass = masses[prod_pos];
    let ratios: Vec<f64> = masses.iter().map(|m| m / prod_mass).collect();
    for (row, ratio) in data.rows_mut()[range.clone()].iter_mut().zip(&ratios) {
        row.kg_per_kg_rxn = Some(*ratio);
    }

    // calculated inputs are re-costed on every visit so that each consumer passes its own
    // amplifier down the sub-tree
    let unknown: Vec<(usize, String, bool)> = data
        .rows_for(prod)
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_product_line() && (r.cost_calc || r.cost.is_none()))
        .map(|(pos, r)| (pos, r.compound.clone(), r.cost_calc))
        .collect();
    for (pos, compound, cost_calc) in unknown {
        if !cost_calc {
            return Err(CostError::MissingCost {
                reaction: prod.to_string(),
                compound,
            });
        }
        let new_amp = amp * ratios[pos];
        debug!(
            "reaction '{}' needs {:.4} kg of '{}' per kg of final product",
            prod, new_amp, compound
        );
        let cost = rxn_cost(data, &compound, new_amp, chain)?;
        data.rows_mut()[range.start + pos].cost = Some(cost);
    }

    let rows = &mut data.rows_mut()[range];
    let mut total = 0.0;
    for (row, ratio) in rows.iter_mut().zip(&ratios) {
        if row.is_product_line() {
            continue;
        }
        let cost = row.cost.ok_or_else(|| CostError::MissingCost {
            reaction: row.prod.clone(),
            compound: row.compound.clone(),
        })?;
        let contribution = ratio * cost;
        row.rm_cost_per_kg_rxn = Some(contribution);
        total += contribution;
    }
    let opex = rows[prod_pos].opex.unwrap_or(0.0);
    rows[prod_pos].rm_cost_per_kg_rxn = Some(total);
    rows[prod_pos].cost = Some(total);

    for (row, ratio) in rows.iter_mut().zip(&ratios) {
        row.pct_rm_cost_per_kg_rxn = match row.rm_cost_per_kg_rxn {
            Some(c) if !row.is_product_line() && total != 0.0 => Some(100.0 * c / total),
            _ => None,
        };
        if let Some(c) = row.rm_cost_per_kg_rxn {
            row.rm_cost_per_kg_prod = Some(row.rm_cost_per_kg_prod.unwrap_or(0.0) + c * amp);
        }
        row.kg_per_kg_prod = Some(row.kg_per_kg_prod.unwrap_or(0.0) + ratio * amp);
    }

    debug!(
        "reaction '{}': raw materials {:.4} $/kg, OPEX {:.4} $/kg",
        prod, total, opex
    );
    Ok(total + opex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Costing::materials::{Material, MaterialsCatalog};
    use crate::Costing::reactions::{ReactionLine, ReactionTable};
    use approx::assert_relative_eq;

    fn dataset(materials: Vec<Material>, lines: Vec<ReactionLine>) -> RouteDataset {
        let catalog = MaterialsCatalog::from_materials(materials).unwrap();
        RouteDataset::build(&catalog, &ReactionTable::new(lines)).unwrap()
    }

    #[test]
    fn test_reaction_masses_with_solvent() {
        let data = dataset(
            vec![
                Material::new("P", 150.0, None, None),
                Material::new("R", 100.0, None, Some(5.0)),
                Material::new("S", 80.0, Some(0.8), Some(2.0)),
            ],
            vec![
                ReactionLine::product("P"),
                ReactionLine::reagent("P", "R", 1.5),
                ReactionLine::solvent("P", "S", 10.0, "R", 0.25),
            ],
        );
        // rows are sorted: P, R, S
        let masses = reaction_masses(data.rows_for("P")).unwrap();
        assert_relative_eq!(masses[0], 150.0);
        assert_relative_eq!(masses[1], 150.0);
        assert_relative_eq!(masses[2], 10.0 * 0.8 * 0.75 * 150.0);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut data = dataset(
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("B", 100.0, None, None),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "B", 1.0).calculated(),
                ReactionLine::product("B"),
                ReactionLine::reagent("B", "A", 1.0).calculated(),
            ],
        );
        let mut chain = Vec::new();
        let err = rxn_cost(&mut data, "A", 1.0, &mut chain).unwrap_err();
        match err {
            CostError::CyclicRoute { chain } => assert_eq!(chain, vec!["A", "B", "A"]),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(chain.is_empty());
    }

    #[test]
    fn test_unresolved_reference() {
        let mut data = dataset(
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("X", 50.0, None, None),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "X", 1.0).calculated(),
            ],
        );
        let err = rxn_cost(&mut data, "A", 1.0, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            CostError::UnresolvedReference { ref reaction, ref compound }
                if reaction == "A" && compound == "X"
        ));
    }
}
