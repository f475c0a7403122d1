//! # Costing
//!
//! Raw-material cost of a multi-step synthesis route. A route is a tree of reactions: each
//! reaction consumes materials, and a material flagged as cost calculated is the product of
//! another reaction of the same name. The cost of the final product is propagated from the
//! leaves of the tree, together with mass ratios and process mass intensity (PMI).
//!
//! Data flow: `MaterialsCatalog` + `ReactionTable` -> `RouteDataset::build` -> `RouteCost::calc_cost`
//! (recursive costing, then post-processing) -> dataset and PMI views.
//!
//! # Examples
//! ```
//! use CostCalc::Costing::materials::{Material, MaterialsCatalog};
//! use CostCalc::Costing::reactions::{ReactionLine, ReactionTable};
//! use CostCalc::Costing::route_cost::RouteCost;
//!
//! let catalog = MaterialsCatalog::from_materials(vec![
//!     Material::new("A", 100.0, None, None),
//!     Material::new("R", 100.0, None, Some(5.0)),
//!     Material::new("S", 50.0, Some(1.0), Some(1.0)),
//! ])
//! .unwrap();
//! let reactions = ReactionTable::new(vec![
//!     ReactionLine::product("A"),
//!     ReactionLine::reagent("A", "R", 1.0),
//!     ReactionLine::solvent("A", "S", 5.0, "R", 0.0),
//! ]);
//! let mut route = RouteCost::new("A", &catalog, &reactions).unwrap();
//! let cost = route.calc_cost().unwrap();
//! // 1 kg R at 5 $/kg and 5 kg S at 1 $/kg per kg A
//! assert!((cost - 10.0).abs() < 1e-12);
//! ```

/// faults of dataset building and costing
pub mod cost_errors;
/// materials catalog: molecular weight, density and cost of compounds
pub mod materials;
/// reaction table: lines of (reaction, compound, equivalents, solvent data, flags)
pub mod reactions;
/// merged and validated working table of a route
pub mod route_dataset;
/// manual overrides replayed before every calculation
pub mod overrides;
/// recursive cost propagation
pub mod cost_engine;
/// route-level percentages and PMI
pub mod post_processing;
/// calculation context of one route
pub mod route_cost;
/// value scans and sensitivity analysis
pub mod scan;
/// console tables
pub mod route_output;
#[cfg(test)]
mod route_cost_tests;
