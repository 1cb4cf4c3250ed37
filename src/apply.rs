use chrono::Utc;

use crate::api::{ApplyResponse, RecruitingApi};
use crate::error::ApiError;
use crate::models::{Application, ApplicationStatus, Job};
use crate::store::ApplicationStore;
use crate::validate::{ResumeFile, ValidationError, validate_resume};

pub const APPLY_FALLBACK_MESSAGE: &str = "Application failed";

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    InvalidFile(#[from] ValidationError),

    #[error("Application failed: could not reach the recruiting service ({0})")]
    Transport(String),

    /// Server-provided detail, or the generic fallback.
    #[error("{0}")]
    Server(String),

    #[error("No application ID returned from server")]
    MissingApplicationId,
}

impl From<ApiError> for ApplyError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(msg) => ApplyError::Transport(msg),
            other => ApplyError::Server(other.message_or(APPLY_FALLBACK_MESSAGE)),
        }
    }
}

/// Phases of one application submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyPhase {
    Idle,
    Uploading { job: Job },
    AwaitingServerProcessing { job: Job },
    Success { application: Application },
    Failed { job: Job, message: String },
}

#[derive(Debug, Clone)]
pub enum ApplyEvent {
    /// A validated resume was attached to a pending job.
    FileAttached(Job),
    /// The request is on the wire.
    RequestSent,
    Accepted(Application),
    Rejected(String),
    Reset,
}

impl ApplyPhase {
    /// Pure transition function. Events that do not apply to the current
    /// phase leave it unchanged.
    pub fn next(self, event: ApplyEvent) -> ApplyPhase {
        match (self, event) {
            (ApplyPhase::Idle, ApplyEvent::FileAttached(job)) => ApplyPhase::Uploading { job },
            (ApplyPhase::Uploading { job }, ApplyEvent::RequestSent) => {
                ApplyPhase::AwaitingServerProcessing { job }
            }
            (ApplyPhase::AwaitingServerProcessing { .. }, ApplyEvent::Accepted(application)) => {
                ApplyPhase::Success { application }
            }
            (ApplyPhase::AwaitingServerProcessing { job }, ApplyEvent::Rejected(message)) => {
                ApplyPhase::Failed { job, message }
            }
            (phase, ApplyEvent::Reset) if phase.is_terminal() => ApplyPhase::Idle,
            (phase, _) => phase,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplyPhase::Success { .. } | ApplyPhase::Failed { .. })
    }

    /// A submission is on its way and apply controls should be disabled.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            ApplyPhase::Uploading { .. } | ApplyPhase::AwaitingServerProcessing { .. }
        )
    }

    pub fn pending_job(&self) -> Option<&Job> {
        match self {
            ApplyPhase::Uploading { job }
            | ApplyPhase::AwaitingServerProcessing { job }
            | ApplyPhase::Failed { job, .. } => Some(job),
            _ => None,
        }
    }
}

/// Builds the local record for an accepted submission.
pub fn application_from_response(job: &Job, response: &ApplyResponse) -> Result<Application, ApplyError> {
    let id = response.application_id().ok_or(ApplyError::MissingApplicationId)?;
    let now = Utc::now().to_rfc3339();
    Ok(Application {
        id: id.to_string(),
        job_id: job.id.clone(),
        position: job.title.clone(),
        company: job.company.clone(),
        status: ApplicationStatus::Applied,
        applied_date: now.clone(),
        last_update: now,
        structured_data: response.structured_data.clone(),
        log: response.log.clone(),
        resume_filename: response.application.as_ref().and_then(|a| a.resume_filename.clone()),
    })
}

/// Drives one submission at a time from a validated resume to a stored
/// application, reporting every phase to the observer.
pub struct ApplySequencer<'a> {
    api: &'a dyn RecruitingApi,
    phase: ApplyPhase,
}

impl<'a> ApplySequencer<'a> {
    pub fn new(api: &'a dyn RecruitingApi) -> Self {
        Self { api, phase: ApplyPhase::Idle }
    }

    pub fn phase(&self) -> &ApplyPhase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_in_flight()
    }

    fn advance(&mut self, event: ApplyEvent, observer: &mut dyn FnMut(&ApplyPhase)) {
        let phase = std::mem::replace(&mut self.phase, ApplyPhase::Idle);
        self.phase = phase.next(event);
        observer(&self.phase);
    }

    /// Validates, submits, and on success prepends the new application to
    /// `store`. Always returns to `Idle`.
    pub fn submit(
        &mut self,
        job: &Job,
        resume: &ResumeFile,
        store: &mut ApplicationStore<'_>,
        observer: &mut dyn FnMut(&ApplyPhase),
    ) -> Result<Application, ApplyError> {
        validate_resume(resume)?;

        self.advance(ApplyEvent::FileAttached(job.clone()), observer);
        self.advance(ApplyEvent::RequestSent, observer);

        let span = tracing::info_span!("apply", job_id = %job.id, file = %resume.file_name);
        let _enter = span.enter();

        let outcome = self
            .api
            .apply(job, resume)
            .map_err(ApplyError::from)
            .and_then(|response| application_from_response(job, &response));

        match &outcome {
            Ok(application) => {
                tracing::info!(application_id = %application.id, "application accepted");
                if let Err(e) = store.add(application.clone()) {
                    tracing::warn!(error = %e, "application accepted but local cache update failed");
                }
                self.advance(ApplyEvent::Accepted(application.clone()), observer);
            }
            Err(e) => {
                tracing::warn!(error = %e, "application failed");
                self.advance(ApplyEvent::Rejected(e.to_string()), observer);
            }
        }

        self.advance(ApplyEvent::Reset, observer);
        outcome
    }
}

/// What a toggle did.
#[derive(Debug)]
pub enum ToggleOutcome {
    Applied(Application),
    Withdrawn(Application),
}

/// Applies when the job has no application yet, otherwise withdraws the
/// existing one locally. `resume` is only read when applying.
pub fn toggle_application(
    sequencer: &mut ApplySequencer<'_>,
    job: &Job,
    resume: Option<&ResumeFile>,
    store: &mut ApplicationStore<'_>,
    observer: &mut dyn FnMut(&ApplyPhase),
) -> anyhow::Result<ToggleOutcome> {
    if let Some(removed) = store.unapply(&job.id)? {
        return Ok(ToggleOutcome::Withdrawn(removed));
    }
    let resume = resume.ok_or_else(|| anyhow::anyhow!("Select a resume file to apply for '{}'", job.title))?;
    let application = sequencer.submit(job, resume, store, observer)?;
    Ok(ToggleOutcome::Applied(application))
}
