#[cfg(test)]
mod tests {
    use crate::Costing::cost_errors::CostError;
    use crate::Costing::materials::{Material, MaterialsCatalog};
    use crate::Costing::overrides::ValueField;
    use crate::Costing::reactions::{ReactionLine, ReactionTable};
    use crate::Costing::route_cost::RouteCost;
    use crate::Examples::cost_examples::{DEMO_PRODUCT, demo_route};
    use approx::assert_relative_eq;

    fn build(
        final_prod: &str,
        materials: Vec<Material>,
        lines: Vec<ReactionLine>,
    ) -> Result<RouteCost, CostError> {
        let catalog = MaterialsCatalog::from_materials(materials)?;
        RouteCost::new(final_prod, &catalog, &ReactionTable::new(lines))
    }

    /// A from R (1 equiv, MW 100, 5 $/kg) in 5 volumes of S (density 1, 1 $/kg)
    fn single_step() -> RouteCost {
        build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(5.0)),
                Material::new("S", 50.0, Some(1.0), Some(1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
                ReactionLine::solvent("A", "S", 5.0, "R", 0.0),
            ],
        )
        .unwrap()
    }

    /// A from 2 equiv of B, B from 1 equiv of C at 2 $/kg; all MW 100
    fn two_step() -> RouteCost {
        build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("B", 100.0, None, None),
                Material::new("C", 100.0, None, Some(2.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "B", 2.0).calculated(),
                ReactionLine::product("B"),
                ReactionLine::reagent("B", "C", 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_single_step_cost() {
        let mut route = single_step();
        let cost = route.calc_cost().unwrap();
        assert_relative_eq!(cost, 10.0, epsilon = 1e-12);
        assert_eq!(route.cost(), Some(cost));

        let s = route.row("A", "S").unwrap();
        assert_relative_eq!(s.kg_per_kg_rxn.unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(s.rm_cost_per_kg_rxn.unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(s.pct_rm_cost_per_kg_rxn.unwrap(), 50.0, epsilon = 1e-12);

        let a = route.row("A", "A").unwrap();
        assert_relative_eq!(a.kg_per_kg_rxn.unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(a.rm_cost_per_kg_rxn.unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(a.cost.unwrap(), 10.0, epsilon = 1e-12);
        assert_eq!(a.kg_per_kg_prod, Some(1.0));
        assert_eq!(a.pct_rm_cost_per_kg_rxn, None);

        let pmi = route.pmi().unwrap();
        assert_relative_eq!(pmi.reaction("A").unwrap(), 7.0, epsilon = 1e-12);
        assert_relative_eq!(pmi.route(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_product_equiv_acts_as_yield() {
        let mut route = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(5.0)),
            ],
            vec![
                ReactionLine {
                    equiv: Some(0.5),
                    ..ReactionLine::product("A")
                },
                ReactionLine::reagent("A", "R", 1.0),
            ],
        )
        .unwrap();
        let cost = route.calc_cost().unwrap();
        assert_relative_eq!(cost, 10.0, epsilon = 1e-12);
        assert_relative_eq!(
            route.row("A", "R").unwrap().kg_per_kg_rxn.unwrap(),
            2.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            route.row("A", "A").unwrap().kg_per_kg_rxn.unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_two_step_amplifier() {
        let mut route = two_step();
        let cost = route.calc_cost().unwrap();
        assert_relative_eq!(cost, 4.0, epsilon = 1e-12);

        let b_in_a = route.row("A", "B").unwrap();
        assert_relative_eq!(b_in_a.cost.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(b_in_a.kg_per_kg_rxn.unwrap(), 2.0, epsilon = 1e-12);
        // calculated lines carry no per-final-product values
        assert_eq!(b_in_a.kg_per_kg_prod, None);
        assert_eq!(b_in_a.rm_cost_per_kg_prod, None);

        let c = route.row("B", "C").unwrap();
        assert_relative_eq!(c.kg_per_kg_rxn.unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.kg_per_kg_prod.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.rm_cost_per_kg_prod.unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(c.pct_rm_cost_per_kg_prod.unwrap(), 100.0, epsilon = 1e-12);

        // RM cost per kg of final product adds up to the final cost
        let total: f64 = route
            .dataset()
            .rows()
            .iter()
            .filter_map(|r| r.rm_cost_per_kg_prod)
            .sum();
        assert_relative_eq!(total, cost, epsilon = 1e-12);
    }

    #[test]
    fn test_final_opex_is_added() {
        let mut route = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(5.0)),
                Material::new("S", 50.0, Some(1.0), Some(1.0)),
            ],
            vec![
                ReactionLine::product("A").with_opex(3.0),
                ReactionLine::reagent("A", "R", 1.0),
                ReactionLine::solvent("A", "S", 5.0, "R", 0.0),
            ],
        )
        .unwrap();
        let cost = route.calc_cost().unwrap();
        assert_relative_eq!(cost, 13.0, epsilon = 1e-12);
        let a = route.row("A", "A").unwrap();
        assert_relative_eq!(a.rm_cost_per_kg_rxn.unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(a.cost.unwrap(), 13.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sub_reaction_opex_propagates() {
        let mut route = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("B", 100.0, None, None),
                Material::new("C", 100.0, None, Some(2.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "B", 2.0).calculated(),
                ReactionLine::product("B").with_opex(1.0),
                ReactionLine::reagent("B", "C", 1.0),
            ],
        )
        .unwrap();
        let cost = route.calc_cost().unwrap();
        assert_relative_eq!(cost, 6.0, epsilon = 1e-12);
        assert_relative_eq!(route.row("A", "B").unwrap().cost.unwrap(), 3.0, epsilon = 1e-12);
    }

    /// A from B and C; B and C both from D; D from F; F from E at 1 $/kg; all MW 100
    fn shared_intermediate() -> RouteCost {
        build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("B", 100.0, None, None),
                Material::new("C", 100.0, None, None),
                Material::new("D", 100.0, None, None),
                Material::new("F", 100.0, None, None),
                Material::new("E", 100.0, None, Some(1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "B", 1.0).calculated(),
                ReactionLine::reagent("A", "C", 1.0).calculated(),
                ReactionLine::product("B"),
                ReactionLine::reagent("B", "D", 1.0).calculated(),
                ReactionLine::product("C"),
                ReactionLine::reagent("C", "D", 1.0).calculated(),
                ReactionLine::product("D"),
                ReactionLine::reagent("D", "F", 1.0).calculated(),
                ReactionLine::product("F"),
                ReactionLine::reagent("F", "E", 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_shared_intermediate_is_not_a_cycle() {
        let mut route = shared_intermediate();
        let cost = route.calc_cost().unwrap();
        assert_relative_eq!(cost, 2.0, epsilon = 1e-12);

        // D is reached through B and through C, E below it serves both
        let e = route.row("F", "E").unwrap();
        assert_relative_eq!(e.kg_per_kg_rxn.unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(e.kg_per_kg_prod.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(e.rm_cost_per_kg_prod.unwrap(), 2.0, epsilon = 1e-12);

        let rows = route.dataset().rows();
        let rm_sum: f64 = rows.iter().filter_map(|r| r.rm_cost_per_kg_prod).sum();
        let pct_sum: f64 = rows.iter().filter_map(|r| r.pct_rm_cost_per_kg_prod).sum();
        assert_relative_eq!(rm_sum, cost, epsilon = 1e-12);
        assert_relative_eq!(pct_sum, 100.0, epsilon = 1e-9);
        assert_relative_eq!(route.pmi().unwrap().route(), 3.0, epsilon = 1e-12);

        // repeated calculations do not keep adding up
        assert_relative_eq!(route.calc_cost().unwrap(), cost, epsilon = 1e-12);
        assert_relative_eq!(
            route.row("F", "E").unwrap().kg_per_kg_prod.unwrap(),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_calculation_is_repeatable() {
        let mut route = two_step();
        let first = route.calc_cost().unwrap();
        let dataset = route.dataset().clone();
        let second = route.calc_cost().unwrap();
        assert_eq!(first, second);
        assert_eq!(&dataset, route.dataset());
    }

    #[test]
    fn test_percentages_within_reaction() {
        let mut route = demo_route().unwrap();
        route.calc_cost().unwrap();
        let names: Vec<String> = route.dataset().reaction_names().cloned().collect();
        for name in names {
            let sum: f64 = route
                .rows_for(&name)
                .iter()
                .filter_map(|r| r.pct_rm_cost_per_kg_rxn)
                .sum();
            assert_relative_eq!(sum, 100.0, epsilon = 1e-9);
            let self_row = route.row(&name, &name).unwrap();
            assert_relative_eq!(self_row.kg_per_kg_rxn.unwrap(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pmi_sums() {
        let mut route = demo_route().unwrap();
        route.calc_cost().unwrap();
        let pmi = route.pmi().unwrap().clone();
        let route_sum: f64 = route
            .dataset()
            .rows()
            .iter()
            .filter_map(|r| r.kg_per_kg_prod)
            .sum();
        assert_relative_eq!(pmi.route(), route_sum, epsilon = 1e-12);
        for name in ["Intermediate", DEMO_PRODUCT] {
            let sum: f64 = route
                .rows_for(name)
                .iter()
                .filter_map(|r| r.kg_per_kg_rxn)
                .sum();
            assert_relative_eq!(pmi.reaction(name).unwrap(), sum, epsilon = 1e-12);
        }
        // whole-route entry comes last
        let records = pmi.records();
        assert_eq!(records.last().unwrap().key, "[Route]");
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_demo_route_opex() {
        let mut route = demo_route().unwrap();
        let cost = route.calc_cost().unwrap();
        let product = route.row(DEMO_PRODUCT, DEMO_PRODUCT).unwrap();
        assert_relative_eq!(
            product.rm_cost_per_kg_rxn.unwrap() + 20.0,
            cost,
            epsilon = 1e-9
        );
        assert_relative_eq!(product.cost.unwrap(), cost, epsilon = 1e-9);
        assert!(route.row(DEMO_PRODUCT, "Intermediate").unwrap().cost_calc);
    }

    #[test]
    fn test_value_mod_does_not_recalculate() {
        let mut route = single_step();
        route.calc_cost().unwrap();
        route.value_mod("R", 7.0, ValueField::Cost, None).unwrap();
        assert_eq!(route.cost(), Some(10.0));
        assert_relative_eq!(route.calc_cost().unwrap(), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cost_override_replaces_calculation() {
        let mut route = two_step();
        route.calc_cost().unwrap();
        route
            .value_mod("B", 3.0, ValueField::Cost, Some("A"))
            .unwrap();
        let cost = route.calc_cost().unwrap();
        assert_relative_eq!(cost, 6.0, epsilon = 1e-12);
        let b_in_a = route.row("A", "B").unwrap();
        assert!(!b_in_a.cost_calc);
        assert_relative_eq!(b_in_a.kg_per_kg_prod.unwrap(), 2.0, epsilon = 1e-12);
        // reaction B is no longer visited
        assert!(route.rows_for("B").iter().all(|r| r.kg_per_kg_rxn.is_none()));
        assert_relative_eq!(route.pmi().unwrap().route(), 3.0, epsilon = 1e-12);

        let popped = route.pop_override().unwrap();
        assert_eq!(popped.compound, "B");
        assert_relative_eq!(route.calc_cost().unwrap(), 4.0, epsilon = 1e-12);
        assert!(route.row("A", "B").unwrap().cost_calc);
    }

    #[test]
    fn test_scoped_override() {
        let mut route = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("B", 100.0, None, None),
                Material::new("R", 100.0, None, Some(1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "B", 1.0).calculated(),
                ReactionLine::reagent("A", "R", 1.0),
                ReactionLine::product("B"),
                ReactionLine::reagent("B", "R", 1.0),
            ],
        )
        .unwrap();
        assert_relative_eq!(route.calc_cost().unwrap(), 2.0, epsilon = 1e-12);

        route
            .value_mod("R", 5.0, ValueField::Cost, Some("B"))
            .unwrap();
        assert_relative_eq!(route.calc_cost().unwrap(), 6.0, epsilon = 1e-12);
        assert_eq!(route.row("A", "R").unwrap().cost, Some(1.0));

        route.value_mod("R", 5.0, ValueField::Cost, None).unwrap();
        assert_relative_eq!(route.calc_cost().unwrap(), 10.0, epsilon = 1e-12);

        route.clear_overrides();
        assert!(route.overrides().is_empty());
        assert_relative_eq!(route.calc_cost().unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_value_scan_is_order_independent() {
        let mut route = single_step();
        route.calc_cost().unwrap();
        let before = route.clone();

        let forward = route
            .value_scan("R", &[1.0, 5.0, 9.0], ValueField::Cost, None)
            .unwrap();
        let backward = route
            .value_scan("R", &[9.0, 5.0, 1.0], ValueField::Cost, None)
            .unwrap();
        assert_relative_eq!(forward[0], 6.0, epsilon = 1e-12);
        assert_relative_eq!(forward[1], 10.0, epsilon = 1e-12);
        assert_relative_eq!(forward[2], 14.0, epsilon = 1e-12);
        assert_eq!(forward[0], backward[2]);
        assert_eq!(forward[2], backward[0]);
        assert_eq!(route, before);
    }

    #[test]
    fn test_value_scan_keeps_other_overrides() {
        let mut route = single_step();
        route.value_mod("S", 2.0, ValueField::Cost, None).unwrap();
        let costs = route
            .value_scan("R", &[5.0], ValueField::Cost, None)
            .unwrap();
        assert_relative_eq!(costs[0], 15.0, epsilon = 1e-12);
        assert_eq!(route.overrides().len(), 1);
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let mut route = demo_route().unwrap();
        let values = [900.0, 600.0, 300.0, 100.0, 0.0];
        let parallel = route
            .value_scan_parallel("Catalyst", &values, ValueField::Cost, None)
            .unwrap();
        let sequential = route
            .value_scan("Catalyst", &values, ValueField::Cost, None)
            .unwrap();
        assert_eq!(parallel.len(), values.len());
        for (p, s) in parallel.iter().zip(&sequential) {
            assert_relative_eq!(*p, *s, epsilon = 1e-12);
        }
        assert!(parallel.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_scan_error_leaves_state() {
        let mut route = single_step();
        route.calc_cost().unwrap();
        let before = route.clone();
        let err = route
            .value_scan("S", &[0.5, 1.5], ValueField::SolRecyc, None)
            .unwrap_err();
        assert!(matches!(err, CostError::InvalidValue { ref field, .. } if field == "Sol Recyc"));
        assert_eq!(route, before);
    }

    #[test]
    fn test_sensitivity_of_costs() {
        let mut route = single_step();
        route.calc_cost().unwrap();
        let before = route.clone();
        let records = route.sensitivity(ValueField::Cost, 0.1).unwrap();
        // the product line is calculated and never perturbed
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.reaction, "A");
            assert_relative_eq!(record.pct_change_up.unwrap(), 5.0, epsilon = 1e-9);
            assert_relative_eq!(record.pct_change_down.unwrap(), -5.0, epsilon = 1e-9);
        }
        assert_eq!(route, before);
    }

    #[test]
    fn test_sensitivity_skips_unvisited_reactions() {
        let mut route = two_step();
        route
            .value_mod("B", 3.0, ValueField::Cost, Some("A"))
            .unwrap();
        let records = route.sensitivity(ValueField::Equiv, 0.1).unwrap();
        assert!(records.iter().all(|r| r.reaction == "A"));
        assert_eq!(route.overrides().len(), 1);
    }

    #[test]
    fn test_sensitivity_near_recycle_limit() {
        let mut route = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(5.0)),
                Material::new("S", 50.0, Some(1.0), Some(1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
                ReactionLine::solvent("A", "S", 5.0, "R", 0.95),
            ],
        )
        .unwrap();
        let base = route.calc_cost().unwrap();
        assert_relative_eq!(base, 5.25, epsilon = 1e-9);
        let before = route.clone();

        let records = route.sensitivity(ValueField::SolRecyc, 0.1).unwrap();
        assert_eq!(records.len(), 1);
        let s = &records[0];
        assert_eq!(s.compound, "S");
        // 0.95 * 1.1 is not a recycle fraction
        assert_eq!(s.pct_change_up, None);
        // 0.855 recycled: 5 * 0.145 kg of S per kg of A
        let expected = 100.0 * (5.0 + 0.725 - base) / base;
        assert_relative_eq!(s.pct_change_down.unwrap(), expected, epsilon = 1e-9);
        assert_eq!(route, before);
    }

    #[test]
    fn test_failed_calculation_recovers_after_pop() {
        let mut clean = single_step();
        clean.value_mod("R", 7.0, ValueField::Cost, None).unwrap();
        let clean_cost = clean.calc_cost().unwrap();

        let mut route = single_step();
        route.calc_cost().unwrap();
        route.value_mod("R", 7.0, ValueField::Cost, None).unwrap();
        route
            .value_mod("S", 1.0, ValueField::SolRecyc, None)
            .unwrap();
        assert!(route.calc_cost().is_err());
        assert_eq!(route.cost(), None);
        assert!(route.pmi().is_none());

        let popped = route.pop_override().unwrap();
        assert_eq!(popped.field, ValueField::SolRecyc);
        assert_eq!(route.calc_cost().unwrap(), clean_cost);
        assert_eq!(route.dataset(), clean.dataset());
        assert_eq!(route.pmi(), clean.pmi());
    }

    #[test]
    fn test_sensitivity_rejects_bad_fraction() {
        let mut route = single_step();
        for fraction in [0.0, -0.1, f64::NAN] {
            assert!(matches!(
                route.sensitivity(ValueField::Cost, fraction),
                Err(CostError::InvalidFraction(_))
            ));
        }
    }

    ////////////////////////////FAULTS////////////////////////////////////////
    #[test]
    fn test_missing_material() {
        let err = build(
            "A",
            vec![Material::new("A", 100.0, None, None)],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
            ],
        )
        .unwrap_err();
        assert!(
            matches!(err, CostError::MissingMaterial { ref reaction, ref compound } if reaction == "A" && compound == "R")
        );
    }

    #[test]
    fn test_missing_cost() {
        let err = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, None),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CostError::MissingCost { ref compound, .. } if compound == "R"));
    }

    #[test]
    fn test_duplicate_material() {
        let err = MaterialsCatalog::from_materials(vec![
            Material::new("R", 100.0, None, Some(1.0)),
            Material::new("R", 90.0, None, Some(2.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, CostError::DuplicateMaterial { reaction: None, .. }));

        let err = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
                ReactionLine::reagent("A", "R", 2.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CostError::DuplicateMaterial { ref compound, reaction: Some(ref r) } if compound == "R" && r == "A"
        ));
    }

    #[test]
    fn test_unresolved_reference() {
        let mut route = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("X", 100.0, None, None),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "X", 1.0).calculated(),
            ],
        )
        .unwrap();
        let err = route.calc_cost().unwrap_err();
        assert!(matches!(err, CostError::UnresolvedReference { ref compound, .. } if compound == "X"));
        assert_eq!(route.cost(), None);
    }

    #[test]
    fn test_invalid_relative_basis() {
        let err = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(1.0)),
                Material::new("S", 50.0, Some(1.0), Some(1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
                ReactionLine::solvent("A", "S", 5.0, "Q", 0.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CostError::InvalidRelativeBasis { matches: 0, .. }));
    }

    #[test]
    fn test_missing_product_row() {
        let err = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(1.0)),
            ],
            vec![ReactionLine::reagent("A", "R", 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, CostError::MissingProductRow { ref reaction } if reaction == "A"));
    }

    #[test]
    fn test_missing_density() {
        let err = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(1.0)),
                Material::new("S", 50.0, None, Some(1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
                ReactionLine::solvent("A", "S", 5.0, "R", 0.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CostError::MissingDensity { ref compound, .. } if compound == "S"));
    }

    #[test]
    fn test_invalid_value() {
        let err = build(
            "A",
            vec![
                Material::new("A", 100.0, None, None),
                Material::new("R", 100.0, None, Some(-1.0)),
            ],
            vec![
                ReactionLine::product("A"),
                ReactionLine::reagent("A", "R", 1.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CostError::InvalidValue { ref field, .. } if field == "Cost"));

        let mut route = single_step();
        route
            .value_mod("S", 1.0, ValueField::SolRecyc, None)
            .unwrap();
        assert!(matches!(
            route.calc_cost(),
            Err(CostError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_cyclic_route() {
        let mut route = build(
            "A",
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
        )
        .unwrap();
        assert!(matches!(
            route.calc_cost(),
            Err(CostError::CyclicRoute { ref chain }) if chain.len() == 3
        ));
    }

    #[test]
    fn test_unknown_override_target() {
        let mut route = two_step();
        assert!(matches!(
            route.value_mod("Nope", 1.0, ValueField::Cost, None),
            Err(CostError::UnknownOverrideTarget { scope: None, .. })
        ));
        // C exists, but not in reaction A
        assert!(matches!(
            route.value_mod("C", 1.0, ValueField::Cost, Some("A")),
            Err(CostError::UnknownOverrideTarget { scope: Some(_), .. })
        ));
        assert!(route.overrides().is_empty());
    }

    #[test]
    fn test_unknown_final_product() {
        let catalog =
            MaterialsCatalog::from_materials(vec![Material::new("A", 100.0, None, None)]).unwrap();
        let reactions = ReactionTable::new(vec![ReactionLine::product("A")]);
        assert!(matches!(
            RouteCost::new("Z", &catalog, &reactions),
            Err(CostError::UnknownFinalProduct(ref p)) if p == "Z"
        ));
    }
}
