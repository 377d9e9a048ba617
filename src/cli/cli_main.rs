use super::cli_calculator::{buttons_menu, precision_menu, quantity_menu, show_view};
use super::cli_settings::settings_menu;
use crate::Preview::session::{Calculator, PreviewOutcome, Session};
use crate::Service::http_service::HttpService;
use crate::settings::ConfigManager;
use log::{LevelFilter, info, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::{self, Write};
use tokio::runtime::Builder;

pub fn run_interactive_menu() -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = ConfigManager::new();
    let config = manager.get_config().clone();
    init_logging(config.level_filter());
    info!("configuration read from {}", manager.config_file());

    let runtime = Builder::new_current_thread().enable_all().build()?;
    let service = HttpService::new(&config.service_url)?;
    let calc = Calculator::new(service, Session::from_config(&config));
    report_preview(runtime.block_on(calc.refresh()));
    show_view(&calc);

    loop {
        show_main_menu();
        let choice = get_user_input()?;

        match choice.trim() {
            "1" => {
                let text = prompt("Expression (latex): ")?;
                report_preview(runtime.block_on(calc.edit_expression(text.trim())));
                show_view(&calc);
            }
            "2" => buttons_menu(&runtime, &calc)?,
            "3" => quantity_menu(&runtime, &calc)?,
            "4" => precision_menu(&runtime, &calc)?,
            "5" => show_view(&calc),
            "6" => settings_menu(&mut manager)?,
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}

fn init_logging(level: LevelFilter) {
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger not initialized: {}", e);
    }
}

pub(crate) fn report_preview(outcome: PreviewOutcome) {
    if outcome == PreviewOutcome::TransportFailed {
        warn!("showing the previous result, the service did not answer");
    }
}

/* colors
Blue (\x1b[34m) - headers

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - prompts

Red (\x1b[31m) - syntax and service errors

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!("\x1b[34m\n ChemCalc: molecules, equations and alkanes, live \n\x1b[0m");
    println!("\x1b[33m1. Enter expression\x1b[0m");
    println!("\x1b[33m2. Insert symbol\x1b[0m");
    println!("\x1b[33m3. Mass / moles\x1b[0m");
    println!("\x1b[33m4. Precision\x1b[0m");
    println!("\x1b[33m5. Show result\x1b[0m");
    println!("\x1b[33m6. Settings\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
}

pub(crate) fn get_user_input() -> io::Result<String> {
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

pub(crate) fn prompt(text: &str) -> io::Result<String> {
    print!("\x1b[36m{}\x1b[0m", text);
    get_user_input()
}
