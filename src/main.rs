use CostCalc::cli::cli_main::run_interactive_menu;
use CostCalc::settings::{DEFAULT_CONFIG_FILE, RouteSettings};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

pub fn main() {
    // first argument: route configuration file
    let config_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let settings = RouteSettings::with_config_file(&config_file);
    if let Err(e) = TermLogger::init(
        settings.log_level(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger not initialized: {}", e);
    }
    run_interactive_menu(settings);
}
