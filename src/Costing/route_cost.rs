//! `RouteCost`: the calculation context of one synthesis route.
//!
//! It owns the route dataset, the list of manual overrides and the results of the last
//! calculation. Every engine operation works on this explicit value; scans copy it instead
//! of sharing it.
use crate::Costing::cost_engine::rxn_cost;
use crate::Costing::cost_errors::CostError;
use crate::Costing::materials::MaterialsCatalog;
use crate::Costing::overrides::{Override, OverrideManager, ValueField};
use crate::Costing::post_processing::{PmiTable, rxn_data_post};
use crate::Costing::reactions::ReactionTable;
use crate::Costing::route_dataset::{RouteDataset, RouteRow};
use crate::Utils::load_from_file::TableSource;
use log::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub struct RouteCost {
    /// final product of the route, also the name of the last reaction
    pub final_prod: String,
    pub(crate) dataset: RouteDataset,
    pub(crate) overrides: OverrideManager,
    pub(crate) cost: Option<f64>,
    pub(crate) pmi: Option<PmiTable>,
}

impl RouteCost {
    pub fn new(
        final_prod: &str,
        catalog: &MaterialsCatalog,
        reactions: &ReactionTable,
    ) -> Result<Self, CostError> {
        let dataset = RouteDataset::build(catalog, reactions)?;
        Self::from_dataset(final_prod, dataset)
    }

    pub fn from_dataset(final_prod: &str, dataset: RouteDataset) -> Result<Self, CostError> {
        let final_prod = final_prod.trim().to_string();
        if !dataset.has_reaction(&final_prod) {
            return Err(CostError::UnknownFinalProduct(final_prod));
        }
        Ok(Self {
            final_prod,
            dataset,
            overrides: OverrideManager::new(),
            cost: None,
            pmi: None,
        })
    }

    /// loads both tables through any loader and builds the route
    pub fn from_source<S: TableSource>(final_prod: &str, source: &S) -> Result<Self, CostError> {
        let catalog = source.load_materials()?;
        let reactions = source.load_reactions()?;
        Self::new(final_prod, &catalog, &reactions)
    }

    ////////////////////////////OVERRIDES////////////////////////////////////////
    /// Records a manual value for `compound`. Nothing is recalculated until `calc_cost`.
    /// `scope` limits the override to one reaction; `None` hits the compound everywhere.
    pub fn value_mod(
        &mut self,
        compound: &str,
        value: f64,
        field: ValueField,
        scope: Option<&str>,
    ) -> Result<(), CostError> {
        self.overrides
            .record(&self.dataset, compound, value, field, scope)
    }

    pub fn pop_override(&mut self) -> Option<Override> {
        self.overrides.pop()
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    pub fn overrides(&self) -> &[Override] {
        self.overrides.overrides()
    }

    /// resets the dataset and replays the overrides, without costing
    pub fn clear_and_reapply(&mut self) -> Result<(), CostError> {
        self.cost = None;
        self.pmi = None;
        self.overrides.clear_and_reapply(&mut self.dataset)
    }

    ////////////////////////////CALCULATION////////////////////////////////////////
    /// Full calculation: reset, recursive costing from the final product, post-processing.
    /// On failure the results are cleared and the dataset stays partly filled until the
    /// next reset.
    pub fn calc_cost(&mut self) -> Result<f64, CostError> {
        self.clear_and_reapply()?;
        let mut chain = Vec::new();
        let result = rxn_cost(&mut self.dataset, &self.final_prod, 1.0, &mut chain)
            .and_then(|cost| {
                rxn_data_post(&mut self.dataset, &self.final_prod, cost).map(|pmi| (cost, pmi))
            });
        match result {
            Ok((cost, pmi)) => {
                info!(
                    "cost of '{}': {:.4} $/kg, route PMI {:.3} kg/kg",
                    self.final_prod,
                    cost,
                    pmi.route()
                );
                self.cost = Some(cost);
                self.pmi = Some(pmi);
                Ok(cost)
            }
            Err(e) => {
                error!("costing of '{}' failed: {}", self.final_prod, e);
                Err(e)
            }
        }
    }

    ////////////////////////////READ VIEWS////////////////////////////////////////
    /// final cost of the last successful calculation, $/kg
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn pmi(&self) -> Option<&PmiTable> {
        self.pmi.as_ref()
    }

    pub fn dataset(&self) -> &RouteDataset {
        &self.dataset
    }

    pub fn rows_for(&self, reaction: &str) -> &[RouteRow] {
        self.dataset.rows_for(reaction)
    }

    pub fn row(&self, reaction: &str, compound: &str) -> Option<&RouteRow> {
        self.dataset.row(reaction, compound)
    }
}
