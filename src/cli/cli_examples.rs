use super::cli_main::read_menu_choice;
use crate::Examples::cost_examples::cost_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Cost of the demo route");
        println!("2. Catalyst price scan");
        println!("3. Sensitivity to equivalents");
        println!("4. Make or buy the intermediate");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let Some(choice) = read_menu_choice() else {
            break;
        };
        match choice.trim() {
            "1" => cost_examples(0),
            "2" => cost_examples(1),
            "3" => cost_examples(2),
            "4" => cost_examples(3),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
