//! Reaction table: one line per material consumed by a named reaction.
use serde::{Deserialize, Deserializer, Serialize};

/// one row of the reactions sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionLine {
    /// name of the reaction, which is also the name of its product
    #[serde(rename = "Prod")]
    pub prod: String,
    #[serde(rename = "Compound")]
    pub compound: String,
    /// molar equivalents relative to the product; blank for solvents
    #[serde(rename = "Equiv", default)]
    pub equiv: Option<f64>,
    /// solvent volume per mass of the relative compound; only solvents have it
    #[serde(rename = "Volumes", default)]
    pub volumes: Option<f64>,
    #[serde(rename = "Relative", default)]
    pub relative: Option<String>,
    #[serde(rename = "Sol Recyc", default)]
    pub sol_recyc: Option<f64>,
    #[serde(
        rename = "Cost calc",
        default,
        deserialize_with = "flag_from_cell",
        serialize_with = "flag_to_cell"
    )]
    pub cost_calc: bool,
    #[serde(rename = "OPEX", default)]
    pub opex: Option<f64>,
}

impl ReactionLine {
    /// a plain reagent line
    pub fn reagent(prod: &str, compound: &str, equiv: f64) -> Self {
        Self {
            prod: prod.to_string(),
            compound: compound.to_string(),
            equiv: Some(equiv),
            volumes: None,
            relative: None,
            sol_recyc: None,
            cost_calc: false,
            opex: None,
        }
    }

    /// a solvent line, `volumes` relative to the mass of `relative`
    pub fn solvent(prod: &str, compound: &str, volumes: f64, relative: &str, recycle: f64) -> Self {
        Self {
            volumes: Some(volumes),
            relative: Some(relative.to_string()),
            sol_recyc: Some(recycle),
            equiv: None,
            ..Self::reagent(prod, compound, 0.0)
        }
    }

    /// the line of the reaction's own product
    pub fn product(prod: &str) -> Self {
        Self {
            cost_calc: true,
            ..Self::reagent(prod, prod, 1.0)
        }
    }

    pub fn calculated(mut self) -> Self {
        self.cost_calc = true;
        self
    }

    pub fn with_opex(mut self, opex: f64) -> Self {
        self.opex = Some(opex);
        self
    }

    pub fn is_product_line(&self) -> bool {
        self.prod == self.compound
    }
}

/// ordered collection of reaction lines as they were read
#[derive(Debug, Clone, Default)]
pub struct ReactionTable {
    pub lines: Vec<ReactionLine>,
}

impl ReactionTable {
    pub fn new(lines: Vec<ReactionLine>) -> Self {
        Self { lines }
    }

    /// names of all reactions in order of first appearance
    pub fn reaction_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for line in &self.lines {
            if !names.contains(&line.prod) {
                names.push(line.prod.clone());
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// Any non-blank cell sets the flag ("x", "yes", "0"...). A JSON `false` is the only
// non-blank value read as unset.
fn flag_from_cell<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Flag(bool),
        Number(f64),
        Text(String),
    }
    let cell: Option<Cell> = Option::deserialize(deserializer)?;
    Ok(match cell {
        Some(Cell::Flag(flag)) => flag,
        Some(Cell::Number(_)) => true,
        Some(Cell::Text(text)) => !text.trim().is_empty(),
        None => false,
    })
}

fn flag_to_cell<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if *flag {
        serializer.serialize_str("x")
    } else {
        serializer.serialize_str("")
    }
}
