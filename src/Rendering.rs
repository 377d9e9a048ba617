/// Plain-text rendering of result views: `TextView` trait, prettytable tables, HTML flattening
pub mod text_view;
/// Layout of a balanced equation as a row of cells: reactants, `+` operators, the arrow
/// and products, with trivial species (coefficient 0) flagged
/// # Examples
/// ```
/// use ChemCalc::Rendering::equation_table::{build, Coefficient};
/// let reactants = vec!["H_2".to_string(), "O_2".to_string()];
/// let products = vec!["H_2O".to_string()];
/// let coefficients: Vec<Coefficient> = ["2", "1", "2"].iter().map(|c| Coefficient::new(c)).collect();
/// let cells = build(&reactants, &products, &coefficients, &[]).unwrap();
/// assert_eq!(cells.len(), 5);
/// assert_eq!(cells[3].text, "\\rightarrow");
/// assert_eq!(cells[0].display_text(), "2H_2");
/// ```
pub mod equation_table;
/// Full-precision values behind every displayed number and the precision selectors
pub mod precision;
mod precision_tests;
/// mass <-> mole pairs kept consistent through the conversion service
pub mod bidirectional_sync;
/// View models of the live preview answers, one per mode
pub mod result_renderer;
