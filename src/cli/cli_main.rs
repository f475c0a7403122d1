use super::cli_examples::examples_menu;
use crate::Costing::overrides::ValueField;
use crate::Costing::route_cost::RouteCost;
use crate::Costing::route_output::pretty_print_sensitivity;
use crate::Examples::cost_examples::demo_route;
use crate::Utils::export::{export_route, write_pmi_csv};
use crate::settings::RouteSettings;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub fn run_interactive_menu(settings: RouteSettings) {
    let mut route: Option<RouteCost> = match settings.load_route() {
        Ok(route) => Some(route),
        Err(e) => {
            println!(
                "\x1b[31mRoute from '{}' not loaded: {}\x1b[0m",
                settings.config_file(),
                e
            );
            None
        }
    };
    loop {
        show_main_menu(route.as_ref());
        let Some(choice) = read_menu_choice() else {
            println!("\nInput closed. Goodbye!");
            break;
        };
        let mut loaded: Option<RouteCost> = None;
        match (choice.trim(), route.as_mut()) {
            ("1", Some(r)) => calculate(r),
            ("2", Some(r)) => r.pretty_print_pmi(),
            ("3", Some(r)) => scan_menu(r),
            ("4", Some(r)) => sensitivity_menu(r),
            ("5", Some(r)) => override_menu(r),
            ("6", Some(r)) => export_menu(r, &settings),
            ("1" | "2" | "3" | "4" | "5" | "6", None) => {
                println!("No route loaded. Load the demo route or fix the configuration.")
            }
            ("7", _) => match demo_route() {
                Ok(demo) => loaded = Some(demo),
                Err(e) => println!("Error: {}", e),
            },
            ("8", _) => examples_menu(),
            ("0", _) => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
        if loaded.is_some() {
            route = loaded;
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text
Yellow (\x1b[33m) - Menu options
Cyan (\x1b[36m) - prompts
Red (\x1b[31m) - errors
Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu(route: Option<&RouteCost>) {
    println!("\x1b[34m\n CostCalc: raw-material cost of synthesis routes \n\x1b[0m");
    match route {
        Some(r) => println!("Route of '{}', {} overrides", r.final_prod, r.overrides().len()),
        None => println!("No route loaded"),
    }
    println!("\x1b[33m1. Calculate cost\x1b[0m");
    println!("\x1b[33m2. Show PMI\x1b[0m");
    println!("\x1b[33m3. Scan a value\x1b[0m");
    println!("\x1b[33m4. Sensitivity analysis\x1b[0m");
    println!("\x1b[33m5. Overrides\x1b[0m");
    println!("\x1b[33m6. Export results\x1b[0m");
    println!("\x1b[33m7. Load demo route\x1b[0m");
    println!("\x1b[33m8. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    prompt("Enter your choice: ");
}

fn calculate(route: &mut RouteCost) {
    match route.calc_cost() {
        Ok(_) => route.pretty_print_route(),
        Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
    }
}

fn scan_menu(route: &mut RouteCost) {
    let (compound, field, scope) = match ask_target() {
        Some(target) => target,
        None => return,
    };
    prompt("Values, separated by spaces: ");
    let values: Result<Vec<f64>, _> = get_user_input()
        .split_whitespace()
        .map(|v| v.parse::<f64>())
        .collect();
    let values = match values {
        Ok(v) if !v.is_empty() => v,
        _ => {
            println!("Values must be numbers");
            return;
        }
    };
    match route.value_scan(&compound, &values, field, scope.as_deref()) {
        Ok(costs) => {
            for (value, cost) in values.iter().zip(costs) {
                println!("{} {} = {} -> {:.4} $/kg", compound, field, value, cost);
            }
        }
        Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
    }
}

fn sensitivity_menu(route: &mut RouteCost) {
    prompt("Field (Cost, Equiv, Volumes, Sol Recyc, Density, MW, OPEX): ");
    let field: ValueField = match get_user_input().parse() {
        Ok(f) => f,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    prompt("Fraction (e.g. 0.1): ");
    let fraction: f64 = match get_user_input().trim().parse() {
        Ok(f) => f,
        Err(_) => {
            println!("Fraction must be a number");
            return;
        }
    };
    match route.sensitivity(field, fraction) {
        Ok(records) => pretty_print_sensitivity(&records),
        Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
    }
}

fn override_menu(route: &mut RouteCost) {
    for (i, o) in route.overrides().iter().enumerate() {
        println!(
            "{}. {} of '{}' = {} {}",
            i + 1,
            o.field,
            o.compound,
            o.value,
            o.scope.as_deref().unwrap_or("(all reactions)")
        );
    }
    println!("\x1b[33m1. Add override\x1b[0m");
    println!("\x1b[33m2. Remove last override\x1b[0m");
    println!("\x1b[33m3. Remove all overrides\x1b[0m");
    prompt("Enter your choice: ");
    match get_user_input().trim() {
        "1" => {
            let Some((compound, field, scope)) = ask_target() else {
                return;
            };
            prompt("Value: ");
            let Ok(value) = get_user_input().trim().parse::<f64>() else {
                println!("Value must be a number");
                return;
            };
            if let Err(e) = route.value_mod(&compound, value, field, scope.as_deref()) {
                println!("\x1b[31mError: {}\x1b[0m", e);
            }
        }
        "2" => {
            route.pop_override();
        }
        "3" => route.clear_overrides(),
        _ => println!("Invalid choice."),
    }
}

fn export_menu(route: &RouteCost, settings: &RouteSettings) {
    let default = settings
        .config()
        .export_path
        .clone()
        .unwrap_or_else(|| "route_results.csv".to_string());
    prompt(&format!("File (.csv or .json) [{}]: ", default));
    let input = get_user_input();
    let path = match input.trim() {
        "" => default,
        p => p.to_string(),
    };
    let path = Path::new(&path);
    if let Err(e) = export_route(route, path) {
        println!("\x1b[31mError: {}\x1b[0m", e);
        return;
    }
    if path.extension().and_then(|e| e.to_str()) == Some("csv") && route.pmi().is_some() {
        let pmi_path = path.with_extension("pmi.csv");
        if let Err(e) = write_pmi_csv(route, &pmi_path) {
            println!("\x1b[31mError: {}\x1b[0m", e);
        }
    }
}

/// asks for compound, field and optional reaction scope
fn ask_target() -> Option<(String, ValueField, Option<String>)> {
    prompt("Compound: ");
    let compound = get_user_input().trim().to_string();
    prompt("Field [Cost]: ");
    let field_input = get_user_input();
    let field = match field_input.trim() {
        "" => ValueField::Cost,
        f => match f.parse() {
            Ok(field) => field,
            Err(e) => {
                println!("{}", e);
                return None;
            }
        },
    };
    prompt("Reaction (empty for all): ");
    let scope = get_user_input().trim().to_string();
    let scope = if scope.is_empty() { None } else { Some(scope) };
    Some((compound, field, scope))
}

fn prompt(text: &str) {
    print!("\x1b[36m{}\x1b[0m", text);
    let _ = io::stdout().flush();
}

/// one line of input; `None` once the input is closed or unreadable
pub(crate) fn read_line_from<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

pub(crate) fn read_menu_choice() -> Option<String> {
    read_line_from(&mut io::stdin().lock())
}

/// answer to a prompt; a closed input reads as an empty answer
pub(crate) fn get_user_input() -> String {
    read_menu_choice().unwrap_or_default()
}
