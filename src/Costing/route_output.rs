use crate::Costing::post_processing::PmiTable;
use crate::Costing::route_cost::RouteCost;
use crate::Costing::route_dataset::RouteRow;
use crate::Costing::scan::SensitivityRecord;
use prettytable::{Cell, Row, Table, row};

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => String::new(),
    }
}

const ROUTE_HEADER: [&str; 13] = [
    "Prod",
    "Compound",
    "MW",
    "Cost",
    "Equiv",
    "Volumes",
    "Cost calc",
    "kg/kg rxn",
    "RM cost/kg rxn",
    "% RM cost/kg rxn",
    "kg/kg prod",
    "RM cost/kg prod",
    "% RM cost/kg prod",
];

fn route_row(row: &RouteRow) -> Row {
    Row::new(vec![
        Cell::new(&row.prod),
        Cell::new(&row.compound),
        Cell::new(&format!("{:.2}", row.mw)),
        Cell::new(&fmt_opt(row.cost)),
        Cell::new(&fmt_opt(row.equiv)),
        Cell::new(&fmt_opt(row.volumes)),
        Cell::new(if row.cost_calc { "x" } else { "" }),
        Cell::new(&fmt_opt(row.kg_per_kg_rxn)),
        Cell::new(&fmt_opt(row.rm_cost_per_kg_rxn)),
        Cell::new(&fmt_opt(row.pct_rm_cost_per_kg_rxn)),
        Cell::new(&fmt_opt(row.kg_per_kg_prod)),
        Cell::new(&fmt_opt(row.rm_cost_per_kg_prod)),
        Cell::new(&fmt_opt(row.pct_rm_cost_per_kg_prod)),
    ])
}

pub fn pmi_table(pmi: &PmiTable) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Prod", "PMI (kg/kg)"]);
    for (key, value) in pmi.entries() {
        table.add_row(row![key.to_string(), format!("{:.3}", value)]);
    }
    table
}

pub fn sensitivity_table(records: &[SensitivityRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Prod", "Compound", "Value", "% change (+)", "% change (-)"]);
    for rec in records {
        table.add_row(row![
            rec.reaction,
            rec.compound,
            format!("{:.4}", rec.value),
            fmt_opt(rec.pct_change_up),
            fmt_opt(rec.pct_change_down),
        ]);
    }
    table
}

impl RouteCost {
    ////////////////////////INPUT/OUTPUT////////////////////////////////////////////////////////
    /// the whole route dataset as a table
    pub fn route_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(ROUTE_HEADER.iter().map(|h| Cell::new(h)).collect()));
        for row in self.dataset.rows() {
            table.add_row(route_row(row));
        }
        table
    }

    /// only the rows of one reaction
    pub fn reaction_table(&self, reaction: &str) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(ROUTE_HEADER.iter().map(|h| Cell::new(h)).collect()));
        for row in self.dataset.rows_for(reaction) {
            table.add_row(route_row(row));
        }
        table
    }

    pub fn pretty_print_route(&self) {
        println!("__________route of {}__________", self.final_prod);
        self.route_table().printstd();
        match self.cost {
            Some(cost) => println!("Cost of {}: {:.2} $/kg", self.final_prod, cost),
            None => println!("Cost of {} is not calculated", self.final_prod),
        }
        println!("_____________________________________________________________");
    }

    pub fn pretty_print_pmi(&self) {
        match &self.pmi {
            Some(pmi) => {
                println!("__________process mass intensity__________");
                pmi_table(pmi).printstd();
            }
            None => println!("PMI is not calculated"),
        }
    }
}

pub fn pretty_print_sensitivity(records: &[SensitivityRecord]) {
    println!("__________sensitivity__________");
    sensitivity_table(records).printstd();
}
