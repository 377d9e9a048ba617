/// main menu, logging and the async runtime of the terminal client
pub mod cli_main;
/// expression buttons, mass/mole fields and precision selectors
pub mod cli_calculator;
/// editing of the persistent configuration
pub mod cli_settings;
