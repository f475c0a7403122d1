//! Loaders for the materials and reactions tables.
//!
//! The costing only needs a `MaterialsCatalog` and a `ReactionTable`; where they come from is
//! behind the `TableSource` trait. CSV files (spreadsheet exports) and JSON arrays of records
//! are supported, picked by file extension.
use crate::Costing::cost_errors::CostError;
use crate::Costing::materials::MaterialsCatalog;
use crate::Costing::reactions::{ReactionLine, ReactionTable};
use csv::{ReaderBuilder, Trim};
use enum_dispatch::enum_dispatch;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const MATERIAL_COLUMNS: [&str; 3] = ["Compound", "MW", "Cost"];
pub const REACTION_COLUMNS: [&str; 3] = ["Prod", "Compound", "Equiv"];

#[enum_dispatch]
pub trait TableSource {
    /// materials catalog, with the alternate catalog appended when there is one
    fn load_materials(&self) -> Result<MaterialsCatalog, CostError>;
    fn load_reactions(&self) -> Result<ReactionTable, CostError>;
}

/// CSV files with a header row
#[derive(Debug, Clone)]
pub struct CsvTables {
    pub materials: PathBuf,
    pub alt_materials: Option<PathBuf>,
    pub reactions: PathBuf,
}

/// JSON files, each an array of records keyed by column name
#[derive(Debug, Clone)]
pub struct JsonTables {
    pub materials: PathBuf,
    pub alt_materials: Option<PathBuf>,
    pub reactions: PathBuf,
}

#[derive(Debug, Clone)]
#[enum_dispatch(TableSource)]
pub enum TableLoader {
    Csv(CsvTables),
    Json(JsonTables),
}

/// Picks the loader from the extension of the reactions file (".csv" or ".json").
pub fn create_loader_by_extension(
    materials: &Path,
    alt_materials: Option<&Path>,
    reactions: &Path,
) -> Result<TableLoader, CostError> {
    let ext = reactions
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let materials = materials.to_path_buf();
    let alt_materials = alt_materials.map(|p| p.to_path_buf());
    let reactions = reactions.to_path_buf();
    match ext.as_str() {
        "csv" => Ok(TableLoader::Csv(CsvTables {
            materials,
            alt_materials,
            reactions,
        })),
        "json" => Ok(TableLoader::Json(JsonTables {
            materials,
            alt_materials,
            reactions,
        })),
        other => Err(CostError::Schema(format!(
            "unsupported table format '{}' (only .csv and .json)",
            other
        ))),
    }
}

impl TableSource for CsvTables {
    fn load_materials(&self) -> Result<MaterialsCatalog, CostError> {
        let catalog =
            MaterialsCatalog::from_materials(read_csv_records(&self.materials, &MATERIAL_COLUMNS)?)?;
        match &self.alt_materials {
            Some(alt) => catalog.combine(MaterialsCatalog::from_materials(read_csv_records(
                alt,
                &MATERIAL_COLUMNS,
            )?)?),
            None => Ok(catalog),
        }
    }

    fn load_reactions(&self) -> Result<ReactionTable, CostError> {
        let lines: Vec<ReactionLine> = read_csv_records(&self.reactions, &REACTION_COLUMNS)?;
        Ok(ReactionTable::new(lines))
    }
}

impl TableSource for JsonTables {
    fn load_materials(&self) -> Result<MaterialsCatalog, CostError> {
        let catalog = MaterialsCatalog::from_materials(read_json_records(&self.materials)?)?;
        match &self.alt_materials {
            Some(alt) => {
                catalog.combine(MaterialsCatalog::from_materials(read_json_records(alt)?)?)
            }
            None => Ok(catalog),
        }
    }

    fn load_reactions(&self) -> Result<ReactionTable, CostError> {
        let lines: Vec<ReactionLine> = read_json_records(&self.reactions)?;
        Ok(ReactionTable::new(lines))
    }
}

fn open_existing(path: &Path) -> Result<File, CostError> {
    if !path.exists() {
        let msg = format!("File '{}' does not exist", path.display());
        error!("{}", msg);
        return Err(CostError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            msg,
        )));
    }
    Ok(File::open(path)?)
}

/// Reads a CSV table into typed records. Headers and cells are trimmed, blank rows are
/// skipped, columns not known to the record type are ignored.
pub fn read_csv_records<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>, CostError> {
    let file = open_existing(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);
    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(CostError::Schema(format!(
            "'{}' is missing columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let typed: T = record.deserialize(Some(&headers)).map_err(|e| {
            // header is line 1
            CostError::Schema(format!("'{}' line {}: {}", path.display(), i + 2, e))
        })?;
        records.push(typed);
    }
    info!(
        "{} records read from '{}'",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Reads a JSON array of records. Well-formed JSON whose records do not fit the record type
/// (a missing required field, a string where a number belongs) is a `Schema` fault, as
/// in the CSV reader; malformed JSON stays a `Json` fault.
pub fn read_json_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CostError> {
    let file = open_existing(path)?;
    let records: Vec<T> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        error!(
            "Error parsing '{}' at line {}, column {}: {}",
            path.display(),
            e.line(),
            e.column(),
            e
        );
        match e.classify() {
            Category::Data => CostError::Schema(format!("'{}': {}", path.display(), e)),
            _ => CostError::Json(e),
        }
    })?;
    info!(
        "{} records read from '{}'",
        records.len(),
        path.display()
    );
    Ok(records)
}
