use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::{build_report, AnalysisReport};
use crate::backend::{BackendError, BackendInterface};
use crate::config::SessionConfig;
use crate::entitlement::{self, EntitlementState, GateDecision};
use crate::history::HistoryEntry;
use crate::request::{
    AnalysisVariant, ChartImage, ParameterForm, SubmissionRequest, TradingParameters,
    ValidationErrors,
};

/// Where a session currently stands. Linear except for the premium detour
/// through the parameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    VariantSelected,
    ParametersPending,
    ParametersCollected,
    ImageSelected,
    Submitting,
    Result,
    Failed,
}

/// Everything a single upload attempt carries.
#[derive(Debug, Clone)]
pub struct WorkflowSession {
    pub id: Uuid,
    pub phase: WorkflowPhase,
    pub variant: Option<AnalysisVariant>,
    pub parameters: Option<TradingParameters>,
    pub image: Option<ChartImage>,
    pub report: Option<AnalysisReport>,
    pub last_error: Option<String>,
}

impl WorkflowSession {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: WorkflowPhase::Idle,
            variant: None,
            parameters: None,
            image: None,
            report: None,
            last_error: None,
        }
    }
}

/// What `select_variant` did with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantChoice {
    Accepted { needs_parameters: bool },
    UpgradeRequired,
    Ignored,
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Completed(AnalysisReport),
    UpgradeRequired { server_enforced: bool },
    VariantMissing,
    NotReady,
    Failed(String),
}

/// Drives one chart upload end to end: variant choice, the premium parameter
/// form, image selection, the entitlement gate and finally the backend call.
/// One submission may be in flight per session, never more.
pub struct UploadWorkflow {
    backend: Arc<dyn BackendInterface>,
    config: SessionConfig,
    entitlement: Option<EntitlementState>,
    session: WorkflowSession,
}

impl UploadWorkflow {
    pub fn new(backend: Arc<dyn BackendInterface>, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            entitlement: None,
            session: WorkflowSession::new(),
        }
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.session.phase
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    pub fn entitlement(&self) -> Option<&EntitlementState> {
        self.entitlement.as_ref()
    }

    /// Pick (or re-pick) the analysis variant. Premium variants detour
    /// through the parameter form; a cached entitlement snapshot can route
    /// straight to the upgrade surface instead.
    pub fn select_variant(&mut self, variant: AnalysisVariant) -> VariantChoice {
        if self.session.phase == WorkflowPhase::Submitting {
            warn!("🚫 Variant change ignored while a request is in flight");
            return VariantChoice::Ignored;
        }

        if let Some(state) = &self.entitlement {
            if entitlement::variant_requires_upgrade(state, variant) {
                warn!(
                    "🔒 {} requires the premium plan (current: {})",
                    variant.as_str(),
                    state.plan.as_str()
                );
                return VariantChoice::UpgradeRequired;
            }
        }

        // Re-selection clears downstream inputs; a kept image keeps its place
        self.session.variant = Some(variant);
        self.session.parameters = None;
        self.session.report = None;
        self.session.last_error = None;

        let needs_parameters = variant.is_premium();
        self.session.phase = if needs_parameters {
            WorkflowPhase::ParametersPending
        } else if self.session.image.is_some() {
            WorkflowPhase::ImageSelected
        } else {
            WorkflowPhase::VariantSelected
        };

        info!("🎯 Variant selected: {}", variant.as_str());
        VariantChoice::Accepted { needs_parameters }
    }

    /// Validate the premium parameter form. Failures are field-addressed and
    /// leave the phase untouched; outside the premium flow the form is
    /// ignored entirely.
    pub fn collect_parameters(&mut self, form: &ParameterForm) -> Result<(), ValidationErrors> {
        let premium = self
            .session
            .variant
            .map(|v| v.is_premium())
            .unwrap_or(false);
        let accepting = matches!(
            self.session.phase,
            WorkflowPhase::ParametersPending
                | WorkflowPhase::ParametersCollected
                | WorkflowPhase::ImageSelected
        );
        if !premium || !accepting {
            warn!("⚠️ Parameter form submitted outside the premium flow, ignoring");
            return Ok(());
        }

        match form.validate() {
            Ok(parameters) => {
                info!(
                    "📝 Parameters collected: risk {}%, {}x leverage",
                    parameters.risk_percent, parameters.leverage
                );
                self.session.parameters = Some(parameters);
                self.session.phase = if self.session.image.is_some() {
                    WorkflowPhase::ImageSelected
                } else {
                    WorkflowPhase::ParametersCollected
                };
                Ok(())
            }
            Err(errors) => {
                for issue in &errors.issues {
                    warn!("⚠️ {}: {}", issue.field, issue.message);
                }
                Err(errors)
            }
        }
    }

    /// Attach the chart. Exactly one image per session; a new selection
    /// replaces the prior one.
    pub fn select_image(&mut self, image: ChartImage) -> bool {
        if image.bytes.len() > self.config.max_image_bytes {
            warn!(
                "🖼️ Rejecting {} ({} bytes, limit {})",
                image.file_name,
                image.bytes.len(),
                self.config.max_image_bytes
            );
            return false;
        }

        let accepting = matches!(
            self.session.phase,
            WorkflowPhase::VariantSelected
                | WorkflowPhase::ParametersCollected
                | WorkflowPhase::ImageSelected
        );
        if !accepting {
            warn!("⚠️ Image ignored in phase {:?}", self.session.phase);
            return false;
        }

        info!(
            "🖼️ Image selected: {} ({} bytes)",
            image.file_name,
            image.bytes.len()
        );
        self.session.image = Some(image);
        self.session.report = None;
        self.session.last_error = None;
        self.session.phase = WorkflowPhase::ImageSelected;
        true
    }

    /// Send the session to the backend. Fires only from ImageSelected and
    /// only when the entitlement gate clears; a gate block keeps the image
    /// and the phase so the caller can upgrade and resubmit.
    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.session.phase {
            WorkflowPhase::ImageSelected => {}
            WorkflowPhase::Submitting => {
                warn!("🚫 Submit ignored: a request is already in flight");
                return SubmitOutcome::NotReady;
            }
            other => {
                warn!("⚠️ Submit ignored in phase {:?}", other);
                return SubmitOutcome::NotReady;
            }
        }

        // Entitlement is fetched lazily on the first submit of a session
        let state = match &self.entitlement {
            Some(state) => state.clone(),
            None => match self.refresh_entitlement().await {
                Ok(state) => state,
                Err(e) => {
                    let message = e.to_string();
                    error!("❌ Could not fetch entitlement: {}", message);
                    self.session.last_error = Some(message.clone());
                    self.session.phase = WorkflowPhase::Failed;
                    return SubmitOutcome::Failed(message);
                }
            },
        };

        match entitlement::evaluate(&state, self.session.variant) {
            GateDecision::Proceed => {}
            GateDecision::RequireVariant => return SubmitOutcome::VariantMissing,
            GateDecision::RequireUpgrade => {
                return SubmitOutcome::UpgradeRequired {
                    server_enforced: false,
                };
            }
        }

        // The gate guarantees a variant; the phase guard guarantees an image
        let (variant, image) = match (self.session.variant, &self.session.image) {
            (Some(variant), Some(image)) => (variant, image.clone()),
            _ => return SubmitOutcome::NotReady,
        };

        let request = SubmissionRequest {
            request_id: self.session.id,
            image,
            variant,
            parameters: self.session.parameters.clone(),
            language: self.config.language.clone(),
        };

        self.session.phase = WorkflowPhase::Submitting;
        info!(
            "📤 Submitting {} analysis for {}",
            variant.as_str(),
            request.image.file_name
        );

        match self.backend.submit_chart(&request).await {
            Ok(response) => {
                let report =
                    build_report(&response.analysis, &response.trend, &response.confidence);
                info!(
                    "✅ Analysis complete: {:?} at {}/100",
                    report.analysis.signal, report.confidence_score
                );

                // Usage lives server-side; re-read it rather than counting here
                if let Err(e) = self.refresh_entitlement().await {
                    warn!("⚠️ Entitlement refresh failed after analysis: {}", e);
                }

                self.session.report = Some(report.clone());
                self.session.last_error = None;
                self.session.phase = WorkflowPhase::Result;
                SubmitOutcome::Completed(report)
            }
            Err(BackendError::Denied { detail }) => {
                warn!("🔒 Server denied the analysis: {}", detail);
                self.session.last_error = Some(detail);
                self.session.phase = WorkflowPhase::ImageSelected;
                SubmitOutcome::UpgradeRequired {
                    server_enforced: true,
                }
            }
            Err(e) => {
                let message = e.to_string();
                error!("❌ Analysis request failed: {}", message);
                self.session.last_error = Some(message.clone());
                self.session.phase = WorkflowPhase::Failed;
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Bring a failed session back to the point right before submission.
    pub fn retry(&mut self) -> bool {
        if self.session.phase != WorkflowPhase::Failed {
            return false;
        }
        if self.session.image.is_some() {
            self.session.last_error = None;
            self.session.phase = WorkflowPhase::ImageSelected;
            info!("🔁 Retrying with the same image");
            true
        } else {
            // A failed session without an image has nothing to retry
            self.session.phase = WorkflowPhase::Idle;
            false
        }
    }

    /// Discard the session and start a fresh one. No-op while Submitting.
    pub fn reset(&mut self) -> bool {
        if self.session.phase == WorkflowPhase::Submitting {
            warn!("🚫 Reset ignored while a request is in flight");
            return false;
        }
        self.session = WorkflowSession::new();
        true
    }

    /// Pull the authoritative plan and usage snapshot from the backend.
    pub async fn refresh_entitlement(&mut self) -> Result<EntitlementState, BackendError> {
        let state = self.backend.fetch_entitlement().await?;
        info!(
            "📊 Entitlement: {} plan, {} of {} used",
            state.plan.as_str(),
            state.analyses_used,
            state.analyses_limit
        );
        self.entitlement = Some(state.clone());
        Ok(state)
    }

    /// Past analyses, re-parsed into structured reports on the way out.
    pub async fn load_history(&self) -> Result<Vec<HistoryEntry>, BackendError> {
        let stored = self.backend.list_past_analyses().await?;
        info!("🗂  Loaded {} past analyses", stored.len());
        Ok(stored.into_iter().map(HistoryEntry::from).collect())
    }

    pub async fn delete_history_entry(&self, id: i64) -> Result<(), BackendError> {
        self.backend.delete_analysis(id).await?;
        info!("🗑️ Deleted analysis #{}", id);
        Ok(())
    }
}
