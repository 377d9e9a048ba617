//! In-memory `ComputeService` for tests: canned live preview answers, real rounding,
//! mass/mole conversion through a molar mass table, and optional gates that hold a
//! live preview answer back until the test releases it.
use crate::Preview::mode_classifier::Mode;
use crate::Service::service_api::{
    ComputeService, LivePreviewResponse, MassMoleEquationRequest, MassMoleEquationResponse,
    MassMoleRequest, MassMoleResponse, QuantityKind, RoundRequest, RoundResponse, ServiceError,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Default)]
pub struct MockService {
    previews: Mutex<HashMap<String, Value>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    molar_masses: Mutex<HashMap<String, f64>>,
    equation_answer: Mutex<Option<MassMoleEquationResponse>>,
    pub calls: Mutex<Vec<String>>,
    pub equation_requests: Mutex<Vec<MassMoleEquationRequest>>,
    pub fail_transport: Mutex<bool>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preview(self, latex: &str, answer: Value) -> Self {
        self.previews
            .lock()
            .unwrap()
            .insert(latex.to_string(), answer);
        self
    }

    pub fn with_molar_mass(self, latex: &str, mr: f64) -> Self {
        self.molar_masses
            .lock()
            .unwrap()
            .insert(latex.to_string(), mr);
        self
    }

    pub fn with_equation_answer(self, answer: MassMoleEquationResponse) -> Self {
        *self.equation_answer.lock().unwrap() = Some(answer);
        self
    }

    /// the live preview of `latex` will wait until the returned sender fires
    pub fn gate(&self, latex: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(latex.to_string(), rx);
        tx
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == endpoint)
            .count()
    }

    fn record(&self, endpoint: &str) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        if *self.fail_transport.lock().unwrap() {
            return Err(ServiceError::UnexpectedShape(
                "service unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ComputeService for MockService {
    async fn live_preview(
        &self,
        latex: &str,
        mode: Mode,
    ) -> Result<LivePreviewResponse, ServiceError> {
        self.record("live_preview")?;
        let gate = self.gates.lock().unwrap().remove(latex);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let answer = self
            .previews
            .lock()
            .unwrap()
            .get(latex)
            .cloned()
            .unwrap_or_else(|| json!({"mode": mode.as_str(), "syntax": true, "error": null}));
        Ok(serde_json::from_value(answer)?)
    }

    async fn round(&self, request: &RoundRequest) -> Result<RoundResponse, ServiceError> {
        self.record("round")?;
        let precision = request.precision as usize;
        Ok(RoundResponse {
            result: request
                .num_array
                .iter()
                .map(|n| Value::String(format!("{:.*}", precision, n)))
                .collect(),
        })
    }

    async fn mass_mole(
        &self,
        request: &MassMoleRequest,
    ) -> Result<MassMoleResponse, ServiceError> {
        self.record("mass_mole")?;
        let mr = self
            .molar_masses
            .lock()
            .unwrap()
            .get(&request.molecule_latex)
            .copied()
            .unwrap_or(1.0);
        let mut response = MassMoleResponse::default();
        match request.value.parse::<f64>() {
            Ok(amount) => {
                let counterpart = match request.kind {
                    QuantityKind::Mass => amount / mr,
                    QuantityKind::Mole => amount * mr,
                };
                match request.kind.counterpart() {
                    QuantityKind::Mass => {
                        response.mass = Some(json!(counterpart))
                    }
                    QuantityKind::Mole => {
                        response.mole = Some(json!(counterpart))
                    }
                }
            }
            Err(_) if request.value.is_empty() => {}
            Err(_) => {
                response.error = Some(format!("Invalid character in {} input", request.kind.as_str()));
                response.correct = Some(
                    request
                        .value
                        .chars()
                        .filter(|c| !c.is_ascii_alphabetic())
                        .collect(),
                );
            }
        }
        Ok(response)
    }

    async fn mass_mole_equation(
        &self,
        request: &MassMoleEquationRequest,
    ) -> Result<MassMoleEquationResponse, ServiceError> {
        self.record("mass_mole_equation")?;
        self.equation_requests.lock().unwrap().push(request.clone());
        Ok(self
            .equation_answer
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default())
    }
}
