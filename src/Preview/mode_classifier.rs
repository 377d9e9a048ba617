use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing mode of an expression. Derived from the editor text, never chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// welcome/info state of an empty editor
    #[default]
    This,
    Molecule,
    Equation,
    Empirical,
    Organic,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::This => "this",
            Mode::Molecule => "molecule",
            Mode::Equation => "equation",
            Mode::Empirical => "empirical",
            Mode::Organic => "organic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps raw editor text to a mode. First match wins:
/// `rightarrow` > `alkane` > `:` > non-empty > empty.
pub fn classify(text: &str) -> Mode {
    let lowercase = text.to_lowercase();
    if lowercase.contains("rightarrow") {
        Mode::Equation
    } else if lowercase.contains("alkane") {
        Mode::Organic
    } else if text.contains(':') {
        Mode::Empirical
    } else if !text.is_empty() {
        Mode::Molecule
    } else {
        Mode::This
    }
}
