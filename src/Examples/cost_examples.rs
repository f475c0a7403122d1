use crate::Costing::cost_errors::CostError;
use crate::Costing::materials::{Material, MaterialsCatalog};
use crate::Costing::overrides::ValueField;
use crate::Costing::reactions::{ReactionLine, ReactionTable};
use crate::Costing::route_cost::RouteCost;
use crate::Costing::route_output::pretty_print_sensitivity;

pub const DEMO_PRODUCT: &str = "Product";

/// catalog of the two-step demonstration route
pub fn demo_catalog() -> Result<MaterialsCatalog, CostError> {
    MaterialsCatalog::from_materials(vec![
        Material::new("Product", 250.3, None, None),
        Material::new("Intermediate", 180.2, None, None),
        Material::new("Starting material", 120.1, None, Some(35.0)),
        Material::new("Reagent A", 98.0, None, Some(12.0)),
        Material::new("Catalyst", 350.0, None, Some(900.0)),
        Material::new("Base", 138.2, None, Some(3.5)),
        Material::new("THF", 72.1, Some(0.889), Some(4.0)),
        Material::new("Toluene", 92.14, Some(0.867), Some(1.6)),
        Material::new("Water", 18.02, Some(1.0), Some(0.0)),
    ])
}

/// Starting material -> Intermediate -> Product. Yields sit in the product Equiv;
/// the last step carries OPEX.
pub fn demo_reactions() -> ReactionTable {
    ReactionTable::new(vec![
        ReactionLine {
            equiv: Some(0.85),
            ..ReactionLine::product("Intermediate")
        },
        ReactionLine::reagent("Intermediate", "Starting material", 1.0),
        ReactionLine::reagent("Intermediate", "Reagent A", 1.2),
        ReactionLine::solvent("Intermediate", "THF", 8.0, "Starting material", 0.6),
        ReactionLine::solvent("Intermediate", "Water", 5.0, "Starting material", 0.0),
        ReactionLine {
            equiv: Some(0.9),
            ..ReactionLine::product("Product")
        }
        .with_opex(20.0),
        ReactionLine::reagent("Product", "Intermediate", 1.0).calculated(),
        ReactionLine::reagent("Product", "Base", 2.0),
        ReactionLine::reagent("Product", "Catalyst", 0.01),
        ReactionLine::solvent("Product", "Toluene", 10.0, "Intermediate", 0.8),
    ])
}

pub fn demo_route() -> Result<RouteCost, CostError> {
    RouteCost::new(DEMO_PRODUCT, &demo_catalog()?, &demo_reactions())
}

pub fn cost_examples(task: usize) {
    let mut route = match demo_route() {
        Ok(route) => route,
        Err(e) => {
            println!("demo route is broken: {}", e);
            return;
        }
    };
    match task {
        0 => {
            // plain costing
            if let Err(e) = route.calc_cost() {
                println!("Error: {}", e);
                return;
            }
            route.pretty_print_route();
            route.pretty_print_pmi();
        }
        1 => {
            // what if the catalyst were cheaper
            let prices = [900.0, 600.0, 300.0, 100.0];
            match route.value_scan("Catalyst", &prices, ValueField::Cost, None) {
                Ok(costs) => {
                    for (price, cost) in prices.iter().zip(costs) {
                        println!("Catalyst at {:>6.1} $/kg -> Product {:.2} $/kg", price, cost);
                    }
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        2 => {
            // ±10 % on every equivalent
            match route.sensitivity(ValueField::Equiv, 0.1) {
                Ok(records) => pretty_print_sensitivity(&records),
                Err(e) => println!("Error: {}", e),
            }
        }
        3 => {
            // intermediate bought instead of made
            let made = route.calc_cost();
            let bought = route
                .value_mod("Intermediate", 150.0, ValueField::Cost, Some(DEMO_PRODUCT))
                .and_then(|_| route.calc_cost());
            match (made, bought) {
                (Ok(made), Ok(bought)) => {
                    println!("Intermediate made on-site: {:.2} $/kg", made);
                    println!("Intermediate bought at 150 $/kg: {:.2} $/kg", bought);
                }
                (Err(e), _) | (_, Err(e)) => println!("Error: {}", e),
            }
        }
        _ => println!("no such example"),
    }
}
