/// Classification of an expression into its processing mode
/// # Examples
/// ```
/// use ChemCalc::Preview::mode_classifier::{Mode, classify};
/// assert_eq!(classify(""), Mode::This);
/// assert_eq!(classify("H_2"), Mode::Molecule);
/// assert_eq!(classify("H_2+O_2\\rightarrow H_2O"), Mode::Equation);
/// assert_eq!(classify("K:1.82"), Mode::Empirical);
/// assert_eq!(classify("alkane::5"), Mode::Organic);
/// ```
pub mod mode_classifier;
/// math-input widget capability and the toolbar commands
pub mod editor;
/// one tokenized `/live_preview` request per edit; only the latest answer is applied
pub mod live_preview;
/// Client state of one calculator page and the async drivers of its round trips
/// # Examples
/// ```rust, ignore
/// let calc = Calculator::new(HttpService::new("http://127.0.0.1:5000")?, Session::from_config(&config));
/// calc.edit_expression("H_2 + O_2 \\rightarrow H_2O").await;
/// calc.edit_quantity(QuantityTarget::species(0, QuantityKind::Mass), "4").await;
/// println!("{}", calc.session().view().render_text(calc.session().precision()));
/// ```
pub mod session;
mod session_tests;
