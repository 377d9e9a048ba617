//! # Result Renderer Module
//!
//! ## Aim
//! Turns one live preview answer into the view model of its mode. Rendering is pure
//! apart from the precision bindings it registers; it never talks to the service.
//!
//! ## Main Data Structures and Logic
//! - `ResultView`: one variant per kind of view, dispatched to `TextView` with `enum_dispatch`
//! - `MoleculeView`: formula parts and charge, molar mass, element percentages sorted by
//!   descending value, oxidation states and one mass/mole `SyncPair`
//! - `EquationView`: equation cells, one `SpeciesEntry` per species holding its molar mass
//!   binding, its `SyncPair` (non-trivial species only) and its read-only reaction totals
//! - `OrganicView`: the named properties of an organic compound
//! - `PlaceholderView`/`ErrorView`: welcome and empirical placeholders, error messages
//!
//! Every numeric value shown with a precision is registered in the `PrecisionStore` and
//! the view only keeps the field id. Bindings of the previous view are dropped first.
//!
//! ## Example
//! ```rust, ignore
//! let view = render(&response, "H_2O", &mut store, &InitialInputs::default());
//! println!("{}", view.render_text(&store));
//! ```
use crate::Preview::mode_classifier::Mode;
use crate::Rendering::bidirectional_sync::SyncPair;
use crate::Rendering::equation_table::{self, Coefficient, EquationCell};
use crate::Rendering::precision::{PrecisionStore, selectors};
use crate::Rendering::text_view::TextView;
use crate::Service::service_api::{
    EquationPayload, LivePreviewResponse, MassMoleEquationRequest, MassMoleEquationResponse,
    MoleculePayload, OrganicPayload, ServiceError, display_value,
};
use enum_dispatch::enum_dispatch;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// composition entry holding the charge instead of an element count
const CHARGE_KEY: &str = "sign";
/// organic properties shown as formulas
const MATH_PROPERTIES: [&str; 2] = ["molecular-formula", "condensed-structural-formula"];

/// mass and mole text the molecule view starts with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialInputs {
    #[serde(default)]
    pub mass: String,
    #[serde(default)]
    pub mole: String,
}

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(TextView)]
pub enum ResultView {
    Placeholder(PlaceholderView),
    Error(ErrorView),
    Molecule(MoleculeView),
    Equation(EquationView),
    Organic(OrganicView),
}

impl Default for ResultView {
    fn default() -> Self {
        PlaceholderView::for_mode(Mode::This).into()
    }
}

impl ResultView {
    pub fn mode(&self) -> Mode {
        match self {
            ResultView::Placeholder(view) => view.mode,
            ResultView::Error(view) => view.mode,
            ResultView::Molecule(_) => Mode::Molecule,
            ResultView::Equation(_) => Mode::Equation,
            ResultView::Organic(_) => Mode::Organic,
        }
    }

    pub fn as_molecule_mut(&mut self) -> Option<&mut MoleculeView> {
        match self {
            ResultView::Molecule(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_equation(&self) -> Option<&EquationView> {
        match self {
            ResultView::Equation(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_equation_mut(&mut self) -> Option<&mut EquationView> {
        match self {
            ResultView::Equation(view) => Some(view),
            _ => None,
        }
    }
}

////////////////////////////////////PLACEHOLDERS & ERRORS/////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderView {
    pub mode: Mode,
    pub message: String,
    /// error the service reported for the expression, shown under the message
    pub error: Option<String>,
}

impl PlaceholderView {
    pub fn for_mode(mode: Mode) -> Self {
        let message = match mode {
            Mode::Empirical => {
                "Empirical formula: percentages separated by ':' (no result view yet)"
            }
            _ => "Type a molecule (H_2O), an equation (H_2 + O_2 \\rightarrow H_2O) or an alkane",
        };
        Self {
            mode,
            message: message.to_string(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<&str>) -> Self {
        self.error = error.map(str::to_string);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorView {
    pub mode: Mode,
    pub message: String,
}

////////////////////////////////////MOLECULE//////////////////////////////////////////////////////

/// element symbol with its subscript; `count` is `None` when the element occurs once
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaPart {
    pub symbol: String,
    pub count: Option<i64>,
}

/// a labelled number whose text lives in the `PrecisionStore`
#[derive(Debug, Clone, PartialEq)]
pub struct BoundValue {
    pub label: String,
    pub field_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeView {
    pub formula: Vec<FormulaPart>,
    pub charge: i64,
    pub molar_mass: BoundValue,
    pub percentages: Vec<BoundValue>,
    pub oxidation: Vec<(String, String)>,
    pub pair: SyncPair,
}

impl MoleculeView {
    /// formula in latex, e.g. `H_{2}O^{2-}`
    pub fn formula_latex(&self) -> String {
        let mut latex = String::new();
        for part in &self.formula {
            latex.push_str(&part.symbol);
            if let Some(count) = part.count {
                latex.push_str(&format!("_{{{}}}", count));
            }
        }
        match self.charge {
            0 => {}
            1 => latex.push_str("^{+}"),
            -1 => latex.push_str("^{-}"),
            c if c > 0 => latex.push_str(&format!("^{{{}+}}", c)),
            c => latex.push_str(&format!("^{{{}-}}", -c)),
        }
        latex
    }
}

////////////////////////////////////EQUATION//////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesEntry {
    pub index: usize,
    pub formula: String,
    pub is_trivial: bool,
    pub molar_mass: Option<BoundValue>,
    /// `None` for trivial species
    pub pair: Option<SyncPair>,
    pub total_mass: String,
    pub total_mole: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalsRequest {
    pub token: u64,
    pub request: MassMoleEquationRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsOutcome {
    Applied,
    Stale,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquationView {
    pub reaction_type: Option<String>,
    pub cells: Vec<EquationCell>,
    pub species: Vec<SpeciesEntry>,
    parsed: Option<Value>,
    totals_token: u64,
}

impl EquationView {
    fn error(message: &str) -> Self {
        Self {
            reaction_type: None,
            cells: vec![EquationCell::error(message)],
            species: Vec::new(),
            parsed: None,
            totals_token: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.species.is_empty()
    }

    pub fn species_mut(&mut self, index: usize) -> Option<&mut SpeciesEntry> {
        self.species.get_mut(index)
    }

    /// Collects every species' mass and mole text in table order for the reaction totals.
    /// Needs the `parsed` echo of the answer the view was built from.
    pub fn begin_totals(&mut self) -> Option<TotalsRequest> {
        let Some(components) = self.parsed.clone() else {
            debug!("no parsed equation to compute totals for");
            return None;
        };
        let text_of = |entry: &SpeciesEntry, mass: bool| match &entry.pair {
            Some(pair) if mass => pair.mass().to_string(),
            Some(pair) => pair.mole().to_string(),
            None => String::new(),
        };
        self.totals_token += 1;
        Some(TotalsRequest {
            token: self.totals_token,
            request: MassMoleEquationRequest {
                components,
                mass_array: self.species.iter().map(|e| text_of(e, true)).collect(),
                mole_array: self.species.iter().map(|e| text_of(e, false)).collect(),
            },
        })
    }

    /// Writes the totals to the non-trivial species in order
    pub fn apply_totals(
        &mut self,
        request: &TotalsRequest,
        result: Result<MassMoleEquationResponse, ServiceError>,
    ) -> TotalsOutcome {
        if request.token != self.totals_token {
            debug!("dropping stale reaction totals #{}", request.token);
            return TotalsOutcome::Stale;
        }
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("reaction totals failed: {}", e);
                return TotalsOutcome::Failed;
            }
        };
        for (k, entry) in self.species.iter_mut().filter(|e| !e.is_trivial).enumerate() {
            entry.total_mass = response
                .reaction_masses
                .get(k)
                .map(display_value)
                .unwrap_or_default();
            entry.total_mole = response
                .reaction_moles
                .get(k)
                .map(display_value)
                .unwrap_or_default();
        }
        TotalsOutcome::Applied
    }
}

////////////////////////////////////ORGANIC///////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyDisplay {
    Math,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrganicProperty {
    pub name: String,
    pub value: String,
    pub display: PropertyDisplay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrganicView {
    pub properties: Vec<OrganicProperty>,
}

////////////////////////////////////RENDERING/////////////////////////////////////////////////////

/// Builds the view of a live preview answer for the expression `latex`
pub fn render(
    response: &LivePreviewResponse,
    latex: &str,
    store: &mut PrecisionStore,
    inputs: &InitialInputs,
) -> ResultView {
    store.clear_bindings();
    let mode = response.mode();
    if matches!(mode, Mode::This | Mode::Empirical) {
        return PlaceholderView::for_mode(mode)
            .with_error(response.error())
            .into();
    }
    if let Some(error) = response.error() {
        info!("{} error: {}", mode, error);
        return match response {
            LivePreviewResponse::Equation(_) => EquationView::error(error).into(),
            _ => ErrorView {
                mode,
                message: error.to_string(),
            }
            .into(),
        };
    }
    match response {
        LivePreviewResponse::This(_) | LivePreviewResponse::Empirical(_) => {
            PlaceholderView::for_mode(mode).into()
        }
        LivePreviewResponse::Molecule(payload) => render_molecule(payload, latex, store, inputs),
        LivePreviewResponse::Equation(payload) => render_equation(payload, store).into(),
        LivePreviewResponse::Organic(payload) => render_organic(payload).into(),
    }
}

fn render_molecule(
    payload: &MoleculePayload,
    latex: &str,
    store: &mut PrecisionStore,
    inputs: &InitialInputs,
) -> ResultView {
    let Some(info) = &payload.info else {
        return ErrorView {
            mode: Mode::Molecule,
            message: "The service sent no molecule information".to_string(),
        }
        .into();
    };
    let formula = payload
        .molecule
        .iter()
        .filter(|(symbol, _)| symbol.as_str() != CHARGE_KEY)
        .map(|(symbol, &count)| FormulaPart {
            symbol: symbol.clone(),
            count: (count != 1).then_some(count),
        })
        .collect();
    let charge = payload.molecule.get(CHARGE_KEY).copied().unwrap_or(0);

    store.bind(selectors::MOLAR_MASS, "mr", info.mr);
    let molar_mass = BoundValue {
        label: "Mr".to_string(),
        field_id: "mr".to_string(),
    };

    let mut percentages: Vec<(&String, f64)> = info
        .element_percentages
        .iter()
        .map(|(symbol, &value)| (symbol, value))
        .collect();
    percentages.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let percentages = percentages
        .into_iter()
        .map(|(symbol, value)| {
            let field_id = format!("percentage:{}", symbol);
            store.bind(selectors::PERCENTAGES, &field_id, value);
            BoundValue {
                label: symbol.clone(),
                field_id,
            }
        })
        .collect();

    let oxidation = info
        .oxidation
        .iter()
        .map(|(symbol, state)| (symbol.clone(), display_value(state)))
        .collect();

    MoleculeView {
        formula,
        charge,
        molar_mass,
        percentages,
        oxidation,
        pair: SyncPair::with_inputs(latex, &inputs.mass, &inputs.mole),
    }
    .into()
}

fn render_equation(payload: &EquationPayload, store: &mut PrecisionStore) -> EquationView {
    let coefficients: Vec<Coefficient> =
        payload.coefficients.iter().map(Coefficient::from_value).collect();
    let cells = match equation_table::build(
        &payload.reactants,
        &payload.products,
        &coefficients,
        &payload.mr,
    ) {
        Ok(cells) => cells,
        Err(e) => {
            warn!("equation table not built: {}", e);
            return EquationView::error(&e.to_string());
        }
    };

    let species = cells
        .iter()
        .filter_map(|cell| cell.species.map(|index| (index, cell)))
        .map(|(index, cell)| {
            let molar_mass = cell.molar_mass.map(|mr| {
                let field_id = format!("mr:{}", index);
                store.bind(selectors::EQUATION_MR, &field_id, mr);
                BoundValue {
                    label: cell.text.clone(),
                    field_id,
                }
            });
            SpeciesEntry {
                index,
                formula: cell.text.clone(),
                is_trivial: cell.is_trivial,
                molar_mass,
                pair: (!cell.is_trivial).then(|| SyncPair::new(&cell.text)),
                total_mass: String::new(),
                total_mole: String::new(),
            }
        })
        .collect();

    EquationView {
        reaction_type: payload.reaction_type.clone(),
        cells,
        species,
        parsed: payload.parsed.clone(),
        totals_token: 0,
    }
}

fn render_organic(payload: &OrganicPayload) -> OrganicView {
    let properties = payload
        .properties
        .iter()
        .map(|(name, value)| OrganicProperty {
            name: name.clone(),
            value: display_value(value),
            display: if MATH_PROPERTIES.contains(&name.as_str()) {
                PropertyDisplay::Math
            } else {
                PropertyDisplay::Text
            },
        })
        .collect();
    OrganicView { properties }
}
