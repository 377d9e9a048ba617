//! # Bidirectional Sync Module
//!
//! ## Aim
//! Keeps the mass field and the mole field of one species consistent: the user edits
//! one of them, the service converts, and the other one is overwritten with the result.
//!
//! ## Main Data Structures and Logic
//! - `SyncPair`: the two fields of one species plus the token of its latest request
//! - `EditOrigin`: who changed a field. Only `User` edits start a conversion, so writing
//!   the converted value into the sibling field can never start another one
//! - `SyncRequest`/`SyncOutcome`: the two halves of a conversion round trip
//! - `SyncController`: runs the round trip against a `ComputeService`
//!
//! A response is applied only if it answers the latest request of the pair and the
//! edited field still holds the text that was sent.
use crate::Service::service_api::{
    ComputeService, MassMoleRequest, MassMoleResponse, QuantityKind, ServiceError, display_value,
};
use log::{debug, info, warn};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    User,
    Programmatic,
}

/// multiplication glyphs typed in a quantity field become the latex command
pub fn normalize_multiplication(text: &str) -> Cow<'_, str> {
    if text.contains(['×', '*']) {
        Cow::Owned(text.replace(['×', '*'], "\\times "))
    } else {
        Cow::Borrowed(text)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantityField {
    text: String,
    focused: bool,
}

impl QuantityField {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            focused: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub token: u64,
    pub request: MassMoleRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// the sibling field received the converted value
    Updated { kind: QuantityKind, text: String },
    /// the input was rejected and the edited field reset to the sanitized text
    Corrected { kind: QuantityKind, text: String },
    Stale,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncPair {
    molecule_latex: String,
    mass: QuantityField,
    mole: QuantityField,
    latest: u64,
}

impl SyncPair {
    pub fn new(molecule_latex: &str) -> Self {
        Self::with_inputs(molecule_latex, "", "")
    }

    /// pair pre-populated with initial mass and mole text
    pub fn with_inputs(molecule_latex: &str, mass: &str, mole: &str) -> Self {
        Self {
            molecule_latex: molecule_latex.to_string(),
            mass: QuantityField::new(mass),
            mole: QuantityField::new(mole),
            latest: 0,
        }
    }

    pub fn molecule_latex(&self) -> &str {
        &self.molecule_latex
    }

    pub fn field(&self, kind: QuantityKind) -> &QuantityField {
        match kind {
            QuantityKind::Mass => &self.mass,
            QuantityKind::Mole => &self.mole,
        }
    }

    fn field_mut(&mut self, kind: QuantityKind) -> &mut QuantityField {
        match kind {
            QuantityKind::Mass => &mut self.mass,
            QuantityKind::Mole => &mut self.mole,
        }
    }

    pub fn mass(&self) -> &str {
        self.mass.text()
    }

    pub fn mole(&self) -> &str {
        self.mole.text()
    }

    pub fn latest_token(&self) -> u64 {
        self.latest
    }

    /// Writes `text` into one field. A user edit focuses that field and returns the
    /// conversion request; a programmatic write never does.
    pub fn edit(&mut self, kind: QuantityKind, text: &str, origin: EditOrigin) -> Option<SyncRequest> {
        let text = normalize_multiplication(text).into_owned();
        self.field_mut(kind).text = text.clone();
        match origin {
            EditOrigin::Programmatic => None,
            EditOrigin::User => {
                self.field_mut(kind).focused = true;
                self.field_mut(kind.counterpart()).focused = false;
                self.latest += 1;
                debug!(
                    "{} of {} edited, conversion #{}",
                    kind.as_str(),
                    self.molecule_latex,
                    self.latest
                );
                Some(SyncRequest {
                    token: self.latest,
                    request: MassMoleRequest {
                        molecule_latex: self.molecule_latex.clone(),
                        kind,
                        value: text,
                    },
                })
            }
        }
    }

    pub fn apply(
        &mut self,
        request: &SyncRequest,
        result: Result<MassMoleResponse, ServiceError>,
    ) -> SyncOutcome {
        let kind = request.request.kind;
        if request.token != self.latest || self.field(kind).text != request.request.value {
            debug!("dropping stale conversion #{} of {}", request.token, self.molecule_latex);
            return SyncOutcome::Stale;
        }
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("conversion of {} failed: {}", self.molecule_latex, e);
                return SyncOutcome::Failed;
            }
        };
        if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
            info!("{} rejected: {}", kind.as_str(), error);
            let correct = response.correct.clone().unwrap_or_default();
            let field = self.field_mut(kind);
            field.text = correct.clone();
            field.focused = false;
            return SyncOutcome::Corrected { kind, text: correct };
        }
        let other = kind.counterpart();
        let text = response
            .value_of(other)
            .map(display_value)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "0".to_string());
        self.edit(other, &text, EditOrigin::Programmatic);
        SyncOutcome::Updated { kind: other, text }
    }
}

/// Runs conversion round trips for pairs owned by the caller
pub struct SyncController<'a, S: ComputeService + ?Sized> {
    service: &'a S,
}

impl<'a, S: ComputeService + ?Sized> SyncController<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn send(&self, request: &SyncRequest) -> Result<MassMoleResponse, ServiceError> {
        self.service.mass_mole(&request.request).await
    }

    /// user edit followed by its conversion, on a pair nobody else touches meanwhile
    pub async fn sync(&self, pair: &mut SyncPair, kind: QuantityKind, text: &str) -> SyncOutcome {
        match pair.edit(kind, text, EditOrigin::User) {
            Some(request) => {
                let result = self.send(&request).await;
                pair.apply(&request, result)
            }
            None => SyncOutcome::Stale,
        }
    }
}
