use super::cli_main::prompt;
use crate::Rendering::result_renderer::InitialInputs;
use crate::settings::ConfigManager;
use std::io;

pub fn settings_menu(manager: &mut ConfigManager) -> io::Result<()> {
    loop {
        let config = manager.get_config();
        println!("\n=== Settings ({}) ===", manager.config_file());
        println!("\x1b[33m1. Service URL: {}\x1b[0m", config.service_url);
        println!("\x1b[33m2. Default precision: {}\x1b[0m", config.default_precision);
        println!("\x1b[33m3. Initial expression: {}\x1b[0m", config.initial_expression);
        println!(
            "\x1b[33m4. Initial mass / moles: {:?} / {:?}\x1b[0m",
            config.initial_inputs.mass, config.initial_inputs.mole
        );
        println!("\x1b[33m5. Log level: {}\x1b[0m", config.log_level);
        println!("\x1b[33m6. Reset to defaults\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");

        let choice = prompt("Enter your choice: ")?;
        let result = match choice.trim() {
            "1" => {
                let url = prompt("Service URL: ")?;
                manager.set_service_url(url.trim())
            }
            "2" => {
                let precision = prompt("Decimals: ")?;
                match precision.trim().parse::<u32>() {
                    Ok(precision) => manager.set_default_precision(precision),
                    Err(e) => Err(e.into()),
                }
            }
            "3" => {
                let latex = prompt("Expression (latex): ")?;
                manager.set_initial_expression(latex.trim())
            }
            "4" => {
                let mass = prompt("Mass / g: ")?;
                let mole = prompt("Moles / mol: ")?;
                manager.set_initial_inputs(InitialInputs {
                    mass: mass.trim().to_string(),
                    mole: mole.trim().to_string(),
                })
            }
            "5" => {
                let level = prompt("Log level (error, warn, info, debug, trace): ")?;
                manager.set_log_level(level.trim())
            }
            "6" => manager.reset_to_defaults(),
            "0" => break,
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };
        match result {
            Ok(()) => println!("Saved. Changes apply from the next start."),
            Err(e) => println!("\x1b[31m{}\x1b[0m", e),
        }
    }
    Ok(())
}
