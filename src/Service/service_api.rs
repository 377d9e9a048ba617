//! # Computation Service API
//!
//! ## Aim
//! Typed contracts of the remote chemistry computation service. The client never
//! balances equations or computes molar masses itself; it only sends the four
//! requests below and turns their JSON answers into view models.
//!
//! ## Main Data Structures and Logic
//! - `ComputeService`: async trait over the four endpoints (dependency injection seam,
//!   the real implementation is `HttpService`, tests use in-memory mocks)
//! - `LivePreviewResponse`: union tagged by the `mode` field, one variant per `Mode`
//! - `RoundRequest`/`RoundResponse`: server-side rounding of full-precision values
//! - `MassMoleRequest`/`MassMoleResponse`: mass <-> mole conversion of one species
//! - `MassMoleEquationRequest`/`MassMoleEquationResponse`: reacting masses and moles
//!   of a balanced equation
//!
//! | Endpoint | Encoding | Request fields |
//! |----------|----------|----------------|
//! | `/live_preview` | form | `latex`, `mode` |
//! | `/round` | form | `num_array[]` (repeated), `precision` |
//! | `/mass_mole` | form | `molecule_latex`, `mass` or `mole` |
//! | `/mass_mole_equation` | JSON | `components`, `mass_array`, `mole_array` |
use crate::Preview::mode_classifier::Mode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// error types of a round trip to the computation service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// The remote computation service. Every method is one non-blocking round trip.
#[async_trait]
pub trait ComputeService: Send + Sync {
    async fn live_preview(
        &self,
        latex: &str,
        mode: Mode,
    ) -> Result<LivePreviewResponse, ServiceError>;
    async fn round(&self, request: &RoundRequest) -> Result<RoundResponse, ServiceError>;
    async fn mass_mole(&self, request: &MassMoleRequest)
    -> Result<MassMoleResponse, ServiceError>;
    async fn mass_mole_equation(
        &self,
        request: &MassMoleEquationRequest,
    ) -> Result<MassMoleEquationResponse, ServiceError>;
}

////////////////////////////////////LIVE PREVIEW//////////////////////////////////////////////////

/// answer of `/live_preview`, tagged by its `mode` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LivePreviewResponse {
    This(StatusPayload),
    Molecule(MoleculePayload),
    Equation(EquationPayload),
    Empirical(StatusPayload),
    Organic(OrganicPayload),
}

/// payload of the modes that carry nothing but the syntax status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub syntax: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculePayload {
    pub syntax: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// element -> count; the service adds a `sign` entry holding the charge
    #[serde(default)]
    pub molecule: BTreeMap<String, i64>,
    #[serde(default)]
    pub info: Option<MoleculeInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeInfo {
    pub mr: f64,
    #[serde(default)]
    pub element_percentages: BTreeMap<String, f64>,
    #[serde(default)]
    pub oxidation: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationPayload {
    pub syntax: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// opaque structure echoed back on `/mass_mole_equation`
    #[serde(default)]
    pub parsed: Option<Value>,
    #[serde(default)]
    pub reaction_type: Option<String>,
    #[serde(default)]
    pub reactants: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    /// numbers or strings, one per reactant then product
    #[serde(default)]
    pub coefficients: Vec<Value>,
    #[serde(default)]
    pub mr: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicPayload {
    pub syntax: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// every other key of the answer: `organic-name`, `molecular-formula`, `lewis-structure` ...
    #[serde(flatten)]
    pub properties: BTreeMap<String, Value>,
}

impl LivePreviewResponse {
    pub fn mode(&self) -> Mode {
        match self {
            LivePreviewResponse::This(_) => Mode::This,
            LivePreviewResponse::Molecule(_) => Mode::Molecule,
            LivePreviewResponse::Equation(_) => Mode::Equation,
            LivePreviewResponse::Empirical(_) => Mode::Empirical,
            LivePreviewResponse::Organic(_) => Mode::Organic,
        }
    }

    pub fn syntax(&self) -> bool {
        match self {
            LivePreviewResponse::This(p) | LivePreviewResponse::Empirical(p) => p.syntax,
            LivePreviewResponse::Molecule(p) => p.syntax,
            LivePreviewResponse::Equation(p) => p.syntax,
            LivePreviewResponse::Organic(p) => p.syntax,
        }
    }

    pub fn error(&self) -> Option<&str> {
        let error = match self {
            LivePreviewResponse::This(p) | LivePreviewResponse::Empirical(p) => &p.error,
            LivePreviewResponse::Molecule(p) => &p.error,
            LivePreviewResponse::Equation(p) => &p.error,
            LivePreviewResponse::Organic(p) => &p.error,
        };
        error.as_deref().filter(|e| !e.is_empty())
    }
}

////////////////////////////////////ROUNDING//////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct RoundRequest {
    pub num_array: Vec<f64>,
    pub precision: u32,
}

impl RoundRequest {
    /// form body in the bracketed-array convention the service reads (`num_array[]=..`)
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .num_array
            .iter()
            .map(|num| ("num_array[]".to_string(), num.to_string()))
            .collect();
        pairs.push(("precision".to_string(), self.precision.to_string()));
        pairs
    }
}

/// `result` has the length and order of the request's `num_array`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResponse {
    pub result: Vec<Value>,
}

////////////////////////////////////MASS <-> MOLE/////////////////////////////////////////////////

/// The two derived quantities of a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    Mass,
    Mole,
}

impl QuantityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityKind::Mass => "mass",
            QuantityKind::Mole => "mole",
        }
    }

    pub fn counterpart(&self) -> QuantityKind {
        match self {
            QuantityKind::Mass => QuantityKind::Mole,
            QuantityKind::Mole => QuantityKind::Mass,
        }
    }
}

/// carries exactly one of `mass`/`mole`
#[derive(Debug, Clone, PartialEq)]
pub struct MassMoleRequest {
    pub molecule_latex: String,
    pub kind: QuantityKind,
    pub value: String,
}

impl MassMoleRequest {
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("molecule_latex".to_string(), self.molecule_latex.clone()),
            (self.kind.as_str().to_string(), self.value.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MassMoleResponse {
    #[serde(default)]
    pub mass: Option<Value>,
    #[serde(default)]
    pub mole: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    /// sanitized replacement for the rejected input
    #[serde(default)]
    pub correct: Option<String>,
}

impl MassMoleResponse {
    pub fn value_of(&self, kind: QuantityKind) -> Option<&Value> {
        match kind {
            QuantityKind::Mass => self.mass.as_ref(),
            QuantityKind::Mole => self.mole.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassMoleEquationRequest {
    /// the `parsed` echo of the live preview answer
    pub components: Value,
    pub mass_array: Vec<String>,
    pub mole_array: Vec<String>,
}

/// one entry per non-trivial species
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MassMoleEquationResponse {
    #[serde(default)]
    pub reaction_masses: Vec<Value>,
    #[serde(default)]
    pub reaction_moles: Vec<Value>,
}

/// Text of a JSON value the service may send either as number or as string
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
