//! # Session Module
//!
//! ## Aim
//! Owns the whole client state of one calculator page and drives the round trips that
//! change it.
//!
//! ## Main Data Structures and Logic
//! - `Session`: editor, dispatcher, status line, active mode, current view, precision store
//!   and the initial mass/mole inputs. Every change goes through a `begin_*` method that
//!   returns a request and an `apply_*` method that takes the service answer; answers that
//!   were superseded meanwhile are dropped there
//! - `Calculator`: a `Session` in a `RefCell` plus the `ComputeService`. Its async methods
//!   borrow the session only between awaits, so several edits may be in flight on one task
//!   and complete in any order
//!
//! Transport failures keep the previous view and set a transient status message that the
//! next applied answer clears.
use crate::Preview::editor::{EditorButton, MathEditor, MathField};
use crate::Preview::live_preview::{LivePreviewDispatcher, PreviewRequest};
use crate::Preview::mode_classifier::Mode;
use crate::Rendering::bidirectional_sync::{EditOrigin, SyncController, SyncOutcome, SyncPair, SyncRequest};
use crate::Rendering::precision::{PrecisionController, PrecisionStore, RoundOutcome};
use crate::Rendering::result_renderer::{
    InitialInputs, ResultView, TotalsOutcome, TotalsRequest, render,
};
use crate::Service::service_api::{
    ComputeService, LivePreviewResponse, MassMoleEquationResponse, MassMoleResponse,
    QuantityKind, ServiceError,
};
use crate::settings::ClientConfig;
use log::{debug, info, warn};
use std::cell::{Ref, RefCell, RefMut};

/// persistent syntax indicator and transient message
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub syntax_ok: bool,
    pub message: Option<String>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            syntax_ok: true,
            message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Applied,
    Stale,
    TransportFailed,
}

/// a quantity field of the current view: the molecule pair (`species: None`) or the
/// pair of one equation species
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityTarget {
    pub species: Option<usize>,
    pub kind: QuantityKind,
}

impl QuantityTarget {
    pub fn molecule(kind: QuantityKind) -> Self {
        Self { species: None, kind }
    }

    pub fn species(index: usize, kind: QuantityKind) -> Self {
        Self {
            species: Some(index),
            kind,
        }
    }
}

/// conversion request tied to the view it was issued from
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityEdit {
    pub target: QuantityTarget,
    pub generation: u64,
    pub sync: SyncRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalsEdit {
    pub generation: u64,
    pub totals: TotalsRequest,
}

#[derive(Debug, Clone)]
pub struct Session {
    editor: MathField,
    dispatcher: LivePreviewDispatcher,
    status: Status,
    mode: Mode,
    view: ResultView,
    /// number of views rendered so far
    generation: u64,
    precision: PrecisionStore,
    inputs: InitialInputs,
}

impl Session {
    pub fn new(initial_expression: &str, default_precision: u32, inputs: InitialInputs) -> Self {
        Self {
            editor: MathField::new(initial_expression),
            dispatcher: LivePreviewDispatcher::new(),
            status: Status::default(),
            mode: Mode::This,
            view: ResultView::default(),
            generation: 0,
            precision: PrecisionStore::new(default_precision),
            inputs,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            &config.initial_expression,
            config.default_precision,
            config.initial_inputs.clone(),
        )
    }

    pub fn expression(&self) -> String {
        self.editor.latex()
    }

    pub fn editor(&self) -> &MathField {
        &self.editor
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn precision(&self) -> &PrecisionStore {
        &self.precision
    }

    pub fn precision_mut(&mut self) -> &mut PrecisionStore {
        &mut self.precision
    }

    ////////////////////////////////////LIVE PREVIEW//////////////////////////////////////////////

    /// request for the text currently in the editor
    pub fn begin_edit(&mut self) -> PreviewRequest {
        self.dispatcher.on_edit(&mut self.editor)
    }

    /// the user replaced the whole expression
    pub fn type_expression(&mut self, text: &str) -> PreviewRequest {
        self.editor.focus();
        self.editor.set_latex(text);
        self.begin_edit()
    }

    /// toolbar button: insert its command and give the focus back to the editor
    pub fn press(&mut self, button: EditorButton) -> PreviewRequest {
        self.editor.cmd(button.command());
        self.editor.focus();
        self.begin_edit()
    }

    pub fn apply_preview(
        &mut self,
        request: &PreviewRequest,
        result: Result<LivePreviewResponse, ServiceError>,
    ) -> PreviewOutcome {
        if !self.dispatcher.accepts(request.token) {
            debug!(
                "dropping live preview #{}, latest is #{}",
                request.token,
                self.dispatcher.latest_token()
            );
            return PreviewOutcome::Stale;
        }
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("live preview #{} failed: {}", request.token, e);
                self.status.message = Some(format!("Service unavailable: {}", e));
                return PreviewOutcome::TransportFailed;
            }
        };
        self.status.syntax_ok = response.syntax();
        self.status.message = None;
        self.mode = response.mode();
        self.view = render(&response, &request.latex, &mut self.precision, &self.inputs);
        self.generation += 1;
        info!("view #{} rendered in {} mode", self.generation, self.mode);
        PreviewOutcome::Applied
    }

    ////////////////////////////////////MASS <-> MOLE/////////////////////////////////////////////

    fn pair_mut(&mut self, species: Option<usize>) -> Option<&mut SyncPair> {
        match species {
            None => self.view.as_molecule_mut().map(|view| &mut view.pair),
            Some(index) => self
                .view
                .as_equation_mut()
                .and_then(|view| view.species_mut(index))
                .and_then(|entry| entry.pair.as_mut()),
        }
    }

    /// `None` when the current view has no such field
    pub fn begin_quantity_edit(&mut self, target: QuantityTarget, text: &str) -> Option<QuantityEdit> {
        let generation = self.generation;
        let pair = self.pair_mut(target.species)?;
        let sync = pair.edit(target.kind, text, EditOrigin::User)?;
        Some(QuantityEdit {
            target,
            generation,
            sync,
        })
    }

    pub fn apply_quantity(
        &mut self,
        edit: &QuantityEdit,
        result: Result<MassMoleResponse, ServiceError>,
    ) -> SyncOutcome {
        if edit.generation != self.generation {
            debug!("dropping conversion issued for view #{}", edit.generation);
            return SyncOutcome::Stale;
        }
        match self.pair_mut(edit.target.species) {
            Some(pair) => pair.apply(&edit.sync, result),
            None => SyncOutcome::Stale,
        }
    }

    pub fn begin_totals(&mut self) -> Option<TotalsEdit> {
        let generation = self.generation;
        let totals = self.view.as_equation_mut()?.begin_totals()?;
        Some(TotalsEdit { generation, totals })
    }

    pub fn apply_totals(
        &mut self,
        edit: &TotalsEdit,
        result: Result<MassMoleEquationResponse, ServiceError>,
    ) -> TotalsOutcome {
        if edit.generation != self.generation {
            return TotalsOutcome::Stale;
        }
        match self.view.as_equation_mut() {
            Some(view) => view.apply_totals(&edit.totals, result),
            None => TotalsOutcome::Stale,
        }
    }
}

/// A session wired to a computation service
pub struct Calculator<S: ComputeService> {
    service: S,
    session: RefCell<Session>,
}

impl<S: ComputeService> Calculator<S> {
    pub fn new(service: S, session: Session) -> Self {
        Self {
            service,
            session: RefCell::new(session),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn session(&self) -> Ref<'_, Session> {
        self.session.borrow()
    }

    /// must not be held across an await of this calculator
    pub fn session_mut(&self) -> RefMut<'_, Session> {
        self.session.borrow_mut()
    }

    async fn preview(&self, request: PreviewRequest) -> PreviewOutcome {
        let result = self.service.live_preview(&request.latex, request.mode).await;
        self.session.borrow_mut().apply_preview(&request, result)
    }

    /// live preview of the text already in the editor
    pub async fn refresh(&self) -> PreviewOutcome {
        let request = self.session.borrow_mut().begin_edit();
        self.preview(request).await
    }

    pub async fn edit_expression(&self, text: &str) -> PreviewOutcome {
        let request = self.session.borrow_mut().type_expression(text);
        self.preview(request).await
    }

    pub async fn press_button(&self, button: EditorButton) -> PreviewOutcome {
        let request = self.session.borrow_mut().press(button);
        self.preview(request).await
    }

    /// User edit of a mass or mole field. In equation mode every edit that was not superseded
    /// is followed by the reaction totals, whether the conversion succeeded, corrected the
    /// input or failed. `None` when the view has no such field.
    pub async fn edit_quantity(&self, target: QuantityTarget, text: &str) -> Option<SyncOutcome> {
        let edit = self.session.borrow_mut().begin_quantity_edit(target, text)?;
        let result = SyncController::new(&self.service).send(&edit.sync).await;
        let outcome = self.session.borrow_mut().apply_quantity(&edit, result);
        if outcome != SyncOutcome::Stale && target.species.is_some() {
            self.update_totals().await;
        }
        Some(outcome)
    }

    pub async fn update_totals(&self) -> Option<TotalsOutcome> {
        let edit = self.session.borrow_mut().begin_totals()?;
        let result = self.service.mass_mole_equation(&edit.totals.request).await;
        Some(self.session.borrow_mut().apply_totals(&edit, result))
    }

    /// re-renders every value under `selector`; returns how many were updated
    pub async fn set_precision(&self, selector: &str, precision: u32) -> usize {
        let jobs = self
            .session
            .borrow_mut()
            .precision_mut()
            .begin_precision_change(selector, precision);
        let results = PrecisionController::new(&self.service).round_all(jobs).await;
        let mut session = self.session.borrow_mut();
        let mut applied = 0;
        for (job, result) in results {
            if session.precision_mut().apply_round(&job, result) == RoundOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }
}
