//! Plain-text rendering of the result views for the terminal
use crate::Preview::mode_classifier::Mode;
use crate::Rendering::equation_table::CellKind;
use crate::Rendering::precision::PrecisionStore;
use crate::Rendering::result_renderer::{
    BoundValue, EquationView, ErrorView, MoleculeView, OrganicView, PlaceholderView,
    PropertyDisplay,
};
use enum_dispatch::enum_dispatch;
use prettytable::{Cell, Row, Table, row};
use scraper::{Html, Node};

#[enum_dispatch]
pub trait TextView {
    fn title(&self) -> String;
    /// body of the view; precision-bound numbers are read from `store`
    fn render_text(&self, store: &PrecisionStore) -> String;
}

/// Text content of an HTML fragment: `<br/>` becomes a line break, `<sup>` a caret
pub fn flatten_html(fragment: &str) -> String {
    if !fragment.contains('<') {
        return fragment.to_string();
    }
    let html = Html::parse_fragment(fragment);
    let mut text = String::new();
    for node in html.root_element().descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            Node::Element(e) if e.name() == "sup" => text.push('^'),
            _ => {}
        }
    }
    text
}

fn bound_text(store: &PrecisionStore, value: &BoundValue) -> String {
    store.display(&value.field_id).unwrap_or("").to_string()
}

impl TextView for PlaceholderView {
    fn title(&self) -> String {
        match self.mode {
            Mode::Empirical => "Empirical formula".to_string(),
            _ => "ChemCalc".to_string(),
        }
    }

    fn render_text(&self, _store: &PrecisionStore) -> String {
        match &self.error {
            Some(error) => format!("{}\n{}\n", self.message, error),
            None => format!("{}\n", self.message),
        }
    }
}

impl TextView for ErrorView {
    fn title(&self) -> String {
        format!("Error ({})", self.mode)
    }

    fn render_text(&self, _store: &PrecisionStore) -> String {
        format!("{}\n", self.message)
    }
}

impl TextView for MoleculeView {
    fn title(&self) -> String {
        format!("Molecule {}", self.formula_latex())
    }

    fn render_text(&self, store: &PrecisionStore) -> String {
        let mut out = format!(
            "{} = {} g/mol\n",
            self.molar_mass.label,
            bound_text(store, &self.molar_mass)
        );

        let mut percentages = Table::new();
        percentages.add_row(row!["Element", "Mass %", "Oxidation state"]);
        for value in &self.percentages {
            let oxidation = self
                .oxidation
                .iter()
                .find(|(symbol, _)| *symbol == value.label)
                .map(|(_, state)| state.as_str())
                .unwrap_or("");
            percentages.add_row(Row::new(vec![
                Cell::new(&value.label),
                Cell::new(&bound_text(store, value)),
                Cell::new(oxidation),
            ]));
        }
        out.push_str(&percentages.to_string());

        let mut quantities = Table::new();
        quantities.add_row(row!["Mass / g", "Moles / mol"]);
        quantities.add_row(row![self.pair.mass(), self.pair.mole()]);
        out.push_str(&quantities.to_string());
        out
    }
}

impl TextView for EquationView {
    fn title(&self) -> String {
        match &self.reaction_type {
            Some(reaction_type) => format!("Equation ({})", reaction_type),
            None => "Equation".to_string(),
        }
    }

    fn render_text(&self, store: &PrecisionStore) -> String {
        let visible: Vec<String> = self
            .cells
            .iter()
            .filter(|cell| !cell.is_trivial)
            .map(|cell| cell.display_text())
            .collect();
        let mut out = format!("{}\n", visible.join(" "));
        if self.cells.iter().any(|cell| cell.kind == CellKind::Error) {
            return out;
        }

        let mut table = Table::new();
        table.add_row(row![
            "#", "Species", "Side", "Mr", "Mass / g", "Moles / mol", "Reacting mass",
            "Reacting moles"
        ]);
        for entry in self.species.iter().filter(|e| !e.is_trivial) {
            let side = self
                .cells
                .iter()
                .find(|cell| cell.species == Some(entry.index))
                .map(|cell| cell.theme.css_class())
                .unwrap_or("");
            let mr = entry
                .molar_mass
                .as_ref()
                .map(|value| bound_text(store, value))
                .unwrap_or_default();
            let (mass, mole) = entry
                .pair
                .as_ref()
                .map(|pair| (pair.mass(), pair.mole()))
                .unwrap_or(("", ""));
            table.add_row(Row::new(vec![
                Cell::new(&entry.index.to_string()),
                Cell::new(&entry.formula),
                Cell::new(side),
                Cell::new(&mr),
                Cell::new(mass),
                Cell::new(mole),
                Cell::new(&entry.total_mass),
                Cell::new(&entry.total_mole),
            ]));
        }
        out.push_str(&table.to_string());
        out
    }
}

impl TextView for OrganicView {
    fn title(&self) -> String {
        self.properties
            .iter()
            .find(|p| p.name == "organic-name")
            .map(|p| p.value.clone())
            .unwrap_or_else(|| "Organic compound".to_string())
    }

    fn render_text(&self, _store: &PrecisionStore) -> String {
        let mut table = Table::new();
        table.add_row(row!["Property", "Value"]);
        for property in &self.properties {
            let value = match property.display {
                PropertyDisplay::Math => format!("${}$", property.value),
                PropertyDisplay::Text => flatten_html(&property.value),
            };
            table.add_row(Row::new(vec![Cell::new(&property.name), Cell::new(&value)]));
        }
        table.to_string()
    }
}
