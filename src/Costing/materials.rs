//! Materials catalog: intrinsic properties of every compound a route may use.
use crate::Costing::cost_errors::CostError;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// one row of the materials sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "Compound")]
    pub compound: String,
    /// molecular weight, g/mol
    #[serde(rename = "MW")]
    pub mw: f64,
    /// g/mL, needed only for solvents
    #[serde(rename = "Density", default)]
    pub density: Option<f64>,
    /// $/kg; absent when the cost is derived from a reaction
    #[serde(rename = "Cost", default)]
    pub cost: Option<f64>,
}

impl Material {
    pub fn new(compound: &str, mw: f64, density: Option<f64>, cost: Option<f64>) -> Self {
        Self {
            compound: compound.to_string(),
            mw,
            density,
            cost,
        }
    }
}

/// lookup of materials by compound name. Compound names are unique.
#[derive(Debug, Clone, Default)]
pub struct MaterialsCatalog {
    materials: Vec<Material>,
    index: HashMap<String, usize>,
}

impl MaterialsCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// builds the catalog, rejecting duplicated names
    pub fn from_materials(materials: Vec<Material>) -> Result<Self, CostError> {
        let mut catalog = Self::new();
        for material in materials {
            catalog.insert(material)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, material: Material) -> Result<(), CostError> {
        let compound = material.compound.trim().to_string();
        if self.index.contains_key(&compound) {
            return Err(CostError::DuplicateMaterial {
                compound,
                reaction: None,
            });
        }
        self.index.insert(compound.clone(), self.materials.len());
        self.materials.push(Material {
            compound,
            ..material
        });
        Ok(())
    }

    /// Concatenates an alternate catalog to this one. A compound present in both is
    /// a fault: it would be ambiguous which entry the route should use.
    pub fn combine(mut self, alternate: MaterialsCatalog) -> Result<Self, CostError> {
        let mine: HashSet<&String> = self.index.keys().collect();
        if let Some(dup) = alternate.index.keys().find(|k| mine.contains(k)) {
            return Err(CostError::DuplicateMaterial {
                compound: dup.clone(),
                reaction: None,
            });
        }
        let n_alt = alternate.len();
        for material in alternate.materials {
            self.insert(material)?;
        }
        info!("{} materials added from the alternate catalog", n_alt);
        Ok(self)
    }

    pub fn get(&self, compound: &str) -> Option<&Material> {
        self.index.get(compound).map(|&i| &self.materials[i])
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = MaterialsCatalog::from_materials(vec![
            Material::new("Toluene", 92.14, Some(0.87), Some(1.2)),
            Material::new(" Benzoic acid ", 122.12, None, None),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Toluene").unwrap().mw, 92.14);
        // names are trimmed on insertion
        assert!(catalog.get("Benzoic acid").is_some());
        assert!(catalog.get("Water").is_none());
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let result = MaterialsCatalog::from_materials(vec![
            Material::new("Toluene", 92.14, Some(0.87), Some(1.2)),
            Material::new("Toluene", 92.14, Some(0.87), Some(1.5)),
        ]);
        assert!(matches!(
            result,
            Err(CostError::DuplicateMaterial { reaction: None, .. })
        ));
    }

    #[test]
    fn test_combine_catalogs() {
        let main = MaterialsCatalog::from_materials(vec![Material::new(
            "Toluene",
            92.14,
            Some(0.87),
            Some(1.2),
        )])
        .unwrap();
        let alt = MaterialsCatalog::from_materials(vec![Material::new(
            "Water",
            18.02,
            Some(1.0),
            Some(0.0),
        )])
        .unwrap();
        let combined = main.clone().combine(alt).unwrap();
        assert_eq!(combined.len(), 2);
        assert!(combined.get("Water").is_some());

        let clash =
            MaterialsCatalog::from_materials(vec![Material::new("Toluene", 92.14, None, None)])
                .unwrap();
        assert!(matches!(
            main.combine(clash),
            Err(CostError::DuplicateMaterial { .. })
        ));
    }
}
