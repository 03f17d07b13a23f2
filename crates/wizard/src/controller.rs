//! Multi-step wizard controller.
//!
//! Sequences the steps of a [`RuleSet`], owns the form data and error map,
//! and drives the terminal submission through a [`SubmitCollaborator`].
//! A successful submission resets the wizard to step 1 with the declared
//! defaults, so one controller serves any number of tickets in a session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use helpdesk_core::validation::CustomPredicate;
use helpdesk_core::{
    CoreError, ErrorMap, FieldValue, FormRecord, Scope, ValidationEngine, FORM_ERROR_KEY,
};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::LoadedForm;
use crate::error::WizardError;
use crate::submit::{SubmitCollaborator, SubmitOutcome, SubmittedHook};

/// First step number (1-based).
pub const FIRST_STEP: usize = 1;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of [`WizardController::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The current step validated; the wizard moved from `from` to `to`.
    /// On the last step `from == to`.
    Advanced { from: usize, to: usize },
    /// The current step has errors; the wizard stayed put.
    Blocked,
}

/// Result of [`WizardController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Local validation over every step failed; nothing was sent.
    Invalid,
    /// The backend accepted the form and the wizard was reset.
    Submitted,
    /// The backend rejected the form with field errors.
    Rejected,
    /// The collaborator failed without field detail; the message is shown
    /// under the form-level error key.
    Failed,
    /// The wizard was reset while the submission was in flight, so its
    /// outcome was ignored.
    Discarded,
}

/// Serializable view of the wizard for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub current_step: usize,
    pub step_count: usize,
    pub step_id: String,
    pub step_label: String,
    pub form_data: FormRecord,
    pub errors: ErrorMap,
    pub processing: bool,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

struct WizardState {
    current_step: usize,
    form_data: FormRecord,
    errors: ErrorMap,
    /// Bumped on every reset; a submission whose epoch no longer matches
    /// belongs to a discarded session.
    epoch: u64,
}

impl WizardState {
    fn initial(defaults: &FormRecord, epoch: u64) -> Self {
        Self {
            current_step: FIRST_STEP,
            form_data: defaults.clone(),
            errors: ErrorMap::new(),
            epoch,
        }
    }
}

/// Holds the in-flight flag for one submission and clears it when dropped,
/// whether the submission completed or its future was abandoned.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, WizardError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| Self(flag))
            .map_err(|_| WizardError::SubmitInProgress)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives one ticket-creation flow.
///
/// Thread-safe via interior `Mutex`; wrap in `Arc` to share between the UI
/// event loop and the task awaiting a submission. The lock is not held
/// while the collaborator runs, so field edits stay responsive and
/// `next`/`previous`/`submit` can observe the in-flight flag and refuse.
/// At most one submission is outstanding per controller, across resets.
pub struct WizardController {
    engine: Arc<ValidationEngine>,
    defaults: FormRecord,
    collaborator: Arc<dyn SubmitCollaborator>,
    on_submitted: Option<SubmittedHook>,
    state: Mutex<WizardState>,
    in_flight: AtomicBool,
}

impl WizardController {
    /// Create a controller at step 1 with `defaults` as the form data.
    pub fn new(
        engine: Arc<ValidationEngine>,
        defaults: FormRecord,
        collaborator: Arc<dyn SubmitCollaborator>,
    ) -> Self {
        let state = Mutex::new(WizardState::initial(&defaults, 0));
        Self {
            engine,
            defaults,
            collaborator,
            on_submitted: None,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Create a controller from a loaded rule set and its defaults.
    pub fn from_form(
        form: LoadedForm,
        collaborator: Arc<dyn SubmitCollaborator>,
    ) -> Result<Self, WizardError> {
        Self::from_form_with_custom(form, HashMap::new(), collaborator)
    }

    /// Like [`from_form`](Self::from_form), resolving `custom` rules in the
    /// loaded rule set against `custom`.
    pub fn from_form_with_custom(
        form: LoadedForm,
        custom: HashMap<String, CustomPredicate>,
        collaborator: Arc<dyn SubmitCollaborator>,
    ) -> Result<Self, WizardError> {
        let engine = ValidationEngine::with_custom(form.rule_set, custom)?;
        Ok(Self::new(Arc::new(engine), form.defaults, collaborator))
    }

    /// Register the callback run after a successful submission.
    pub fn with_submitted_hook(mut self, hook: SubmittedHook) -> Self {
        self.on_submitted = Some(hook);
        self
    }

    pub fn step_count(&self) -> usize {
        self.engine.rule_set().step_count()
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Write a field value and drop that field's stale error, if any.
    /// Does not re-validate.
    pub async fn update_field(&self, name: &str, value: impl Into<FieldValue>) {
        let mut state = self.state.lock().await;
        state.form_data.set(name, value);
        if state.errors.remove(name).is_some() {
            tracing::trace!(field = name, "Cleared stale field error");
        }
    }

    /// Validate the current step; advance and clear every error if it
    /// passes, otherwise replace the errors with this step's failures.
    pub async fn next(&self) -> Result<StepOutcome, WizardError> {
        let mut state = self.state.lock().await;
        self.ensure_idle()?;

        let from = state.current_step;
        let scope = self.scope_at(from)?;
        let outcome = self.engine.validate(&state.form_data, &scope)?;

        if !outcome.valid {
            tracing::debug!(step = from, failed = outcome.errors.len(), "Step blocked");
            state.errors = outcome.errors;
            return Ok(StepOutcome::Blocked);
        }

        let to = (from + 1).min(self.step_count());
        state.current_step = to;
        state.errors.clear();
        tracing::debug!(from, to, "Step advanced");
        Ok(StepOutcome::Advanced { from, to })
    }

    /// Step back without validating; clears every error.
    pub async fn previous(&self) -> Result<usize, WizardError> {
        let mut state = self.state.lock().await;
        self.ensure_idle()?;

        let from = state.current_step;
        let to = from.saturating_sub(1).max(FIRST_STEP);
        state.current_step = to;
        state.errors.clear();
        tracing::debug!(from, to, "Step retreated");
        Ok(to)
    }

    /// Validate every step and, if clean, send the form to the collaborator.
    ///
    /// The wizard keeps its step and data on any failure. Dropping the
    /// returned future mid-flight releases the in-flight flag and leaves the
    /// wizard as it was before the call.
    pub async fn submit(&self) -> Result<SubmitResult, WizardError> {
        let (payload, epoch, in_flight) = {
            let mut state = self.state.lock().await;
            let in_flight = InFlight::acquire(&self.in_flight)?;

            let outcome = self.engine.validate(&state.form_data, &Scope::All)?;
            if !outcome.valid {
                tracing::debug!(failed = outcome.errors.len(), "Submission blocked by validation");
                state.errors = outcome.errors;
                return Ok(SubmitResult::Invalid);
            }

            (state.form_data.clone(), state.epoch, in_flight)
        };

        tracing::debug!(fields = payload.len(), "Submitting form");
        let result = self.collaborator.submit(&payload).await;

        let mut state = self.state.lock().await;
        drop(in_flight);
        if state.epoch != epoch {
            tracing::warn!("Wizard was reset during submission; ignoring outcome");
            return Ok(SubmitResult::Discarded);
        }

        match result {
            Ok(SubmitOutcome::Success) => {
                *state = WizardState::initial(&self.defaults, epoch + 1);
                drop(state);
                tracing::info!("Form submitted");
                if let Some(hook) = &self.on_submitted {
                    hook();
                }
                Ok(SubmitResult::Submitted)
            }
            Ok(SubmitOutcome::ValidationFailure(server_errors)) => {
                tracing::warn!(fields = server_errors.len(), "Submission rejected by server");
                state.errors = ValidationEngine::merge_server_errors(&state.errors, &server_errors);
                Ok(SubmitResult::Rejected)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Submission failed");
                state.errors = [(FORM_ERROR_KEY, e.to_string())].into_iter().collect();
                Ok(SubmitResult::Failed)
            }
        }
    }

    /// Return to step 1 with the declared defaults and no errors. Any
    /// submission still in flight will have its outcome discarded, and stays
    /// the only outstanding one until it returns.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let epoch = state.epoch + 1;
        *state = WizardState::initial(&self.defaults, epoch);
        tracing::debug!("Wizard reset");
    }

    pub async fn current_step(&self) -> usize {
        self.state.lock().await.current_step
    }

    pub async fn errors(&self) -> ErrorMap {
        self.state.lock().await.errors.clone()
    }

    pub async fn form_data(&self) -> FormRecord {
        self.state.lock().await.form_data.clone()
    }

    pub async fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        let state = self.state.lock().await;
        let step = self.engine.rule_set().step_at(state.current_step);
        WizardSnapshot {
            current_step: state.current_step,
            step_count: self.step_count(),
            step_id: step.map(|s| s.id.clone()).unwrap_or_default(),
            step_label: step.map(|s| s.label.clone()).unwrap_or_default(),
            form_data: state.form_data.clone(),
            errors: state.errors.clone(),
            processing: self.in_flight.load(Ordering::SeqCst),
        }
    }

    /// Checked with the state lock held, so it agrees with the state that
    /// `submit` observed when it took the flag.
    fn ensure_idle(&self) -> Result<(), WizardError> {
        if self.in_flight.load(Ordering::SeqCst) {
            return Err(WizardError::SubmitInProgress);
        }
        Ok(())
    }

    fn scope_at(&self, position: usize) -> Result<Scope, CoreError> {
        self.engine
            .rule_set()
            .step_at(position)
            .map(|s| Scope::step(s.id.clone()))
            .ok_or_else(|| CoreError::UnknownScope(format!("step {position}")))
    }
}
