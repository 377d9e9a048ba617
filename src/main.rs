use ChemCalc::cli::cli_main::run_interactive_menu;

pub fn main() {
    if let Err(e) = run_interactive_menu() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
