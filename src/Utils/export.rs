//! Export of a calculated route: the route dataset and the PMI table, as CSV or JSON.
use crate::Costing::cost_errors::CostError;
use crate::Costing::post_processing::PmiRecord;
use crate::Costing::route_cost::RouteCost;
use crate::Costing::route_dataset::RouteRow;
use csv::Writer;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct RouteReport<'a> {
    final_product: &'a str,
    cost: Option<f64>,
    rows: &'a [RouteRow],
    pmi: Vec<PmiRecord>,
}

/// writes the route dataset, one line per (reaction, compound)
pub fn write_route_csv(route: &RouteCost, path: &Path) -> Result<(), CostError> {
    let mut writer = Writer::from_path(path)?;
    for row in route.dataset().rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("route dataset written to '{}'", path.display());
    Ok(())
}

/// writes the PMI table; nothing is written before the route has been costed
pub fn write_pmi_csv(route: &RouteCost, path: &Path) -> Result<(), CostError> {
    let Some(pmi) = route.pmi() else {
        return Err(CostError::Schema(format!(
            "PMI of '{}' is not calculated",
            route.final_prod
        )));
    };
    let mut writer = Writer::from_path(path)?;
    for record in pmi.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("PMI table written to '{}'", path.display());
    Ok(())
}

/// cost, dataset and PMI in one pretty JSON document
pub fn write_route_json(route: &RouteCost, path: &Path) -> Result<(), CostError> {
    let report = RouteReport {
        final_product: &route.final_prod,
        cost: route.cost(),
        rows: route.dataset().rows(),
        pmi: route.pmi().map(|p| p.records()).unwrap_or_default(),
    };
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(serde_json::to_string_pretty(&report)?.as_bytes())?;
    file.flush()?;
    info!("route report written to '{}'", path.display());
    Ok(())
}

/// CSV or JSON by the extension of `path`
pub fn export_route(route: &RouteCost, path: &Path) -> Result<(), CostError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => write_route_json(route, path),
        Some("csv") => write_route_csv(route, path),
        _ => Err(CostError::Schema(format!(
            "cannot export to '{}': use a .csv or .json file",
            path.display()
        ))),
    }
}
