//! # Equation Table Module
//!
//! ## Aim
//! Lays out a balanced equation as one ordered row of cells: reactants separated by
//! `+`, the arrow, products separated by `+`. For `R` reactants and `P` products the
//! row has exactly `2R + 2P - 1` cells and the arrow sits at index `2R - 1`.
//!
//! ## Main Data Structures and Logic
//! - `EquationCell`: molecule, operator, arrow or error cell with its coefficient,
//!   molar mass, theme and triviality flag
//! - `Coefficient`: stoichiometric coefficient as displayed text; `0` marks a trivial
//!   species, `1` is never shown as a multiplier
//! - `build()`: the layout algorithm
//!
//! A species with coefficient `0` is trivial: its cell and the `+`/arrow cell before it
//! are flagged so the view can hide them, and no mass/mole fields are created for it.
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Molecule,
    Operator,
    Arrow,
    Error,
}

/// Side of the equation a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Reactants,
    Products,
}

impl Theme {
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Reactants => "left-is-reactants",
            Theme::Products => "right-is-products",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient(String);

impl Coefficient {
    pub fn new(text: &str) -> Self {
        Coefficient(text.trim().to_string())
    }

    /// integral floats (`2.0`) are shown as integers
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Coefficient(i.to_string()),
                (None, Some(f)) if f.fract() == 0.0 => Coefficient(format!("{}", f as i64)),
                _ => Coefficient(n.to_string()),
            },
            Value::String(s) => Coefficient::new(s),
            other => Coefficient(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<f64> {
        self.0.parse::<f64>().ok()
    }

    pub fn is_zero(&self) -> bool {
        self.numeric() == Some(0.0)
    }

    pub fn is_one(&self) -> bool {
        self.numeric() == Some(1.0)
    }

    /// leading multiplier shown before the formula
    pub fn prefix(&self) -> &str {
        if self.is_zero() || self.is_one() {
            ""
        } else {
            &self.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquationCell {
    pub kind: CellKind,
    pub text: String,
    pub coefficient: Option<Coefficient>,
    pub molar_mass: Option<f64>,
    pub is_trivial: bool,
    pub theme: Theme,
    /// position of the species in reactants followed by products
    pub species: Option<usize>,
}

impl EquationCell {
    fn operator(text: &str, kind: CellKind, theme: Theme) -> Self {
        Self {
            kind,
            text: text.to_string(),
            coefficient: None,
            molar_mass: None,
            is_trivial: false,
            theme,
            species: None,
        }
    }

    fn molecule(
        species: usize,
        text: &str,
        coefficient: Coefficient,
        molar_mass: Option<f64>,
        theme: Theme,
    ) -> Self {
        Self {
            kind: CellKind::Molecule,
            text: text.to_string(),
            coefficient: Some(coefficient),
            molar_mass,
            is_trivial: false,
            theme,
            species: Some(species),
        }
    }

    /// the single cell replacing the whole row when the equation has an error
    pub fn error(message: &str) -> Self {
        Self::operator(message, CellKind::Error, Theme::Reactants)
    }

    /// formula with its coefficient as leading multiplier
    pub fn display_text(&self) -> String {
        match &self.coefficient {
            Some(coefficient) => format!("{}{}", coefficient.prefix(), self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("An equation needs at least one reactant and one product")]
    EmptySide,
    #[error("Expected {expected} coefficients, got {found}")]
    CoefficientCount { expected: usize, found: usize },
    #[error("Expected {expected} molar masses, got {found}")]
    MolarMassCount { expected: usize, found: usize },
}

/// Builds the cell row of a balanced equation from parallel arrays indexed by
/// reactants followed by products. An empty `molar_masses` means they are unknown.
pub fn build(
    reactants: &[String],
    products: &[String],
    coefficients: &[Coefficient],
    molar_masses: &[f64],
) -> Result<Vec<EquationCell>, TableError> {
    let (r, p) = (reactants.len(), products.len());
    if r == 0 || p == 0 {
        return Err(TableError::EmptySide);
    }
    if coefficients.len() != r + p {
        return Err(TableError::CoefficientCount {
            expected: r + p,
            found: coefficients.len(),
        });
    }
    if !molar_masses.is_empty() && molar_masses.len() != r + p {
        return Err(TableError::MolarMassCount {
            expected: r + p,
            found: molar_masses.len(),
        });
    }
    let species_cell = |index: usize, name: &String, theme: Theme| {
        EquationCell::molecule(
            index,
            name,
            coefficients[index].clone(),
            molar_masses.get(index).copied(),
            theme,
        )
    };

    let arrow_position = 2 * r - 1;
    let mut cells = Vec::with_capacity(2 * r + 2 * p - 1);
    for i in 0..=(2 * r + 2 * p - 2) {
        let cell = if i < arrow_position {
            if i % 2 == 0 {
                species_cell(i / 2, &reactants[i / 2], Theme::Reactants)
            } else {
                EquationCell::operator("+", CellKind::Operator, Theme::Reactants)
            }
        } else if i == arrow_position {
            EquationCell::operator("\\rightarrow", CellKind::Arrow, Theme::Products)
        } else if i % 2 == 0 {
            let j = (i - 2 * r) / 2;
            species_cell(r + j, &products[j], Theme::Products)
        } else {
            EquationCell::operator("+", CellKind::Operator, Theme::Products)
        };
        cells.push(cell);
    }
    mark_trivial(&mut cells);
    Ok(cells)
}

fn mark_trivial(cells: &mut [EquationCell]) {
    let trivial_positions: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.coefficient.as_ref().is_some_and(Coefficient::is_zero))
        .map(|(i, _)| i)
        .collect();
    for i in trivial_positions {
        cells[i].is_trivial = true;
        if i > 0 {
            cells[i - 1].is_trivial = true;
        } else if cells.len() > 1 && cells[1].kind == CellKind::Operator {
            // the first species has nothing before it
            cells[1].is_trivial = true;
        }
    }
}
