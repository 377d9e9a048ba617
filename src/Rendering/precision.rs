//! # Precision Module
//!
//! ## Aim
//! Keeps every displayed number next to its full-precision source so the user can change
//! the number of decimals without ever losing the original value.
//!
//! ## Main Data Structures and Logic
//! - `FieldBinding`: full-precision value, selected precision, displayed text
//! - `PrecisionStore`: bindings by field id, grouped under precision selectors. A selector
//!   controls one value (molar mass) or a group (all element percentages)
//! - `RoundJob`: one `/round` request for one binding, tagged with a token
//! - `PrecisionController`: runs the round trips of a precision change
//!
//! ## Usage
//! ```rust, ignore
//! let jobs = store.begin_precision_change(selectors::PERCENTAGES, 4);
//! for (job, result) in PrecisionController::new(&service).round_all(jobs).await {
//!     store.apply_round(&job, result);
//! }
//! ```
use crate::Service::service_api::{
    ComputeService, RoundRequest, RoundResponse, ServiceError, display_value,
};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_PRECISION: u32 = 2;
/// more decimals than an f64 carries are meaningless
pub const MAX_PRECISION: u32 = 15;

/// names of the precision selectors the views create
pub mod selectors {
    pub const MOLAR_MASS: &str = "molar-mass";
    pub const PERCENTAGES: &str = "percentages";
    pub const EQUATION_MR: &str = "equation-mr";
}

/// fixed-decimals text used before the service has rounded a new value
pub fn format_fixed(value: f64, precision: u32) -> String {
    format!("{:.*}", precision as usize, value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    full_value: f64,
    precision: u32,
    display: String,
    pending: Option<u64>,
}

impl FieldBinding {
    /// The first display is formatted locally so a fresh view shows numbers at once;
    /// the rounding service is asked only when the user changes a precision.
    pub fn new(full_value: f64, precision: u32) -> Self {
        Self {
            full_value,
            precision,
            display: format_fixed(full_value, precision),
            pending: None,
        }
    }

    pub fn full_value(&self) -> f64 {
        self.full_value
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundJob {
    pub field_id: String,
    pub token: u64,
    pub request: RoundRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Applied,
    /// the binding was re-rendered or asked again since the request left
    Stale,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PrecisionStore {
    default_precision: u32,
    selector_precision: HashMap<String, u32>,
    bindings: BTreeMap<String, FieldBinding>,
    groups: BTreeMap<String, Vec<String>>,
    next_token: u64,
}

impl Default for PrecisionStore {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl PrecisionStore {
    /// `default_precision` above `MAX_PRECISION` is clamped
    pub fn new(default_precision: u32) -> Self {
        if default_precision > MAX_PRECISION {
            warn!(
                "default precision {} clamped to {}",
                default_precision, MAX_PRECISION
            );
        }
        Self {
            default_precision: default_precision.min(MAX_PRECISION),
            selector_precision: HashMap::new(),
            bindings: BTreeMap::new(),
            groups: BTreeMap::new(),
            next_token: 0,
        }
    }

    /// precision currently selected for a selector; the default until the user changes it
    pub fn precision_of(&self, selector: &str) -> u32 {
        self.selector_precision
            .get(selector)
            .copied()
            .unwrap_or(self.default_precision)
    }

    /// Registers a new full-precision value under a selector at the selector's precision.
    /// Re-binding an existing id replaces its value and forgets any pending rounding.
    pub fn bind(&mut self, selector: &str, field_id: &str, full_value: f64) -> &FieldBinding {
        let precision = self.precision_of(selector);
        let group = self.groups.entry(selector.to_string()).or_default();
        if !group.iter().any(|id| id == field_id) {
            group.push(field_id.to_string());
        }
        self.bindings
            .insert(field_id.to_string(), FieldBinding::new(full_value, precision));
        &self.bindings[field_id]
    }

    /// drops the bindings of the previous view; selected precisions survive
    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
        self.groups.clear();
    }

    pub fn binding(&self, field_id: &str) -> Option<&FieldBinding> {
        self.bindings.get(field_id)
    }

    pub fn display(&self, field_id: &str) -> Option<&str> {
        self.bindings.get(field_id).map(FieldBinding::display)
    }

    pub fn fields_under(&self, selector: &str) -> &[String] {
        self.groups.get(selector).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Stores the new precision and prepares one rounding request per binding under the selector.
    /// A precision above `MAX_PRECISION` is rejected: nothing is stored and no job is made.
    pub fn begin_precision_change(&mut self, selector: &str, precision: u32) -> Vec<RoundJob> {
        if precision > MAX_PRECISION {
            warn!(
                "precision {} of {} rejected, at most {} decimals",
                precision, selector, MAX_PRECISION
            );
            return Vec::new();
        }
        self.selector_precision
            .insert(selector.to_string(), precision);
        let field_ids = self.fields_under(selector).to_vec();
        let mut jobs = Vec::with_capacity(field_ids.len());
        for field_id in field_ids {
            if let Some(binding) = self.bindings.get_mut(&field_id) {
                self.next_token += 1;
                binding.precision = precision;
                binding.pending = Some(self.next_token);
                jobs.push(RoundJob {
                    request: RoundRequest {
                        num_array: vec![binding.full_value],
                        precision,
                    },
                    field_id,
                    token: self.next_token,
                });
            }
        }
        debug!(
            "precision of {} set to {}: {} values to round",
            selector,
            precision,
            jobs.len()
        );
        jobs
    }

    /// Replaces the displayed text of the binding; the full value is left untouched
    pub fn apply_round(
        &mut self,
        job: &RoundJob,
        result: Result<RoundResponse, ServiceError>,
    ) -> RoundOutcome {
        let Some(binding) = self.bindings.get_mut(&job.field_id) else {
            return RoundOutcome::Stale;
        };
        if binding.pending != Some(job.token) {
            debug!("dropping stale rounding #{} of {}", job.token, job.field_id);
            return RoundOutcome::Stale;
        }
        binding.pending = None;
        match result {
            Ok(response) => match response.result.first() {
                Some(value) if response.result.len() == job.request.num_array.len() => {
                    binding.display = display_value(value);
                    RoundOutcome::Applied
                }
                _ => {
                    warn!(
                        "rounding of {} returned {} values",
                        job.field_id,
                        response.result.len()
                    );
                    RoundOutcome::Failed
                }
            },
            Err(e) => {
                warn!("rounding of {} failed: {}", job.field_id, e);
                RoundOutcome::Failed
            }
        }
    }
}

/// Runs the rounding round trips of a precision change, one per affected binding
pub struct PrecisionController<'a, S: ComputeService + ?Sized> {
    service: &'a S,
}

impl<'a, S: ComputeService + ?Sized> PrecisionController<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn round_all(
        &self,
        jobs: Vec<RoundJob>,
    ) -> Vec<(RoundJob, Result<RoundResponse, ServiceError>)> {
        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            let result = self.service.round(&job.request).await;
            results.push((job, result));
        }
        results
    }

    /// whole precision change on a store owned by the caller; returns the number of
    /// re-rendered values
    pub async fn set_precision(
        &self,
        store: &mut PrecisionStore,
        selector: &str,
        precision: u32,
    ) -> usize {
        let jobs = store.begin_precision_change(selector, precision);
        let mut applied = 0;
        for (job, result) in self.round_all(jobs).await {
            if store.apply_round(&job, result) == RoundOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }
}
