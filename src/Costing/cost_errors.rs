//! Faults raised while building a route dataset or costing it.
//!
//! All of them are input faults: a material missing from the catalog, a cost that is
//! neither known nor calculated, a broken reference between reactions and so on. They
//! carry the reaction and compound involved so the offending spreadsheet cell can be found.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CostError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Reaction '{reaction}' uses '{compound}', which is missing from the materials catalog")]
    MissingMaterial { reaction: String, compound: String },

    #[error(
        "Material '{compound}' in reaction '{reaction}' has no cost and is not marked as cost calculated"
    )]
    MissingCost { reaction: String, compound: String },

    #[error("Duplicated material '{compound}'{}", in_reaction(.reaction))]
    DuplicateMaterial {
        compound: String,
        reaction: Option<String>,
    },

    #[error(
        "Reaction '{reaction}' needs the cost of '{compound}', but no reaction produces it"
    )]
    UnresolvedReference { reaction: String, compound: String },

    #[error(
        "Solvent '{compound}' in reaction '{reaction}' is relative to {relative:?}, which must name exactly one non-solvent line of that reaction (found {matches})"
    )]
    InvalidRelativeBasis {
        reaction: String,
        compound: String,
        relative: Option<String>,
        matches: usize,
    },

    #[error("Reaction '{reaction}' has no row for its own product")]
    MissingProductRow { reaction: String },

    #[error("Solvent '{compound}' in reaction '{reaction}' has no density")]
    MissingDensity { reaction: String, compound: String },

    #[error("Invalid {field} = {value} for '{compound}' in reaction '{reaction}'")]
    InvalidValue {
        reaction: String,
        compound: String,
        field: String,
        value: f64,
    },

    #[error("Reaction route is cyclic: {}", .chain.join(" -> "))]
    CyclicRoute { chain: Vec<String> },

    #[error("Override target '{compound}'{} does not exist", in_reaction(.scope))]
    UnknownOverrideTarget {
        compound: String,
        scope: Option<String>,
    },

    #[error("Final product '{0}' has no reaction")]
    UnknownFinalProduct(String),

    #[error("Unknown value field '{0}'")]
    UnknownField(String),

    #[error("Perturbation fraction must be a finite positive number, got {0}")]
    InvalidFraction(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn in_reaction(reaction: &Option<String>) -> String {
    match reaction {
        Some(r) => format!(" in reaction '{}'", r),
        None => String::new(),
    }
}
