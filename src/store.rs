use anyhow::Result;

use crate::api::RecruitingApi;
use crate::db::{APPLICATIONS_KEY, Database, PROFILE_KEY, SAVED_JOBS_KEY};
use crate::error::ApiError;
use crate::models::{Application, ApplicationStats, ApplicationStatus, Profile};

/// Where the current application list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    /// The remote list was unavailable; contents are the last cached list.
    Cache { reason: String },
    Empty,
}

/// The candidate's applications, mirrored into the local cache after every
/// change.
pub struct ApplicationStore<'db> {
    db: &'db Database,
    applications: Vec<Application>,
    source: LoadSource,
}

impl<'db> ApplicationStore<'db> {
    /// Loads from the service when reachable, otherwise from the cache.
    pub fn load(api: &dyn RecruitingApi, db: &'db Database) -> Result<Self> {
        match api.list_applications() {
            Ok(applications) => {
                tracing::info!(count = applications.len(), "loaded applications from service");
                let store = Self { db, applications, source: LoadSource::Remote };
                store.persist()?;
                Ok(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load applications from service, using local cache");
                Ok(Self::from_cache_with_reason(db, &e))
            }
        }
    }

    pub fn from_cache(db: &'db Database) -> Self {
        let applications: Vec<Application> = db.get_or_default(APPLICATIONS_KEY);
        let source = if applications.is_empty() {
            LoadSource::Empty
        } else {
            LoadSource::Cache { reason: "offline".to_string() }
        };
        Self { db, applications, source }
    }

    fn from_cache_with_reason(db: &'db Database, err: &ApiError) -> Self {
        let mut store = Self::from_cache(db);
        if store.source != LoadSource::Empty {
            store.source = LoadSource::Cache { reason: err.to_string() };
        }
        store
    }

    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn find_by_job(&self, job_id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.job_id == job_id)
    }

    pub fn has_applied(&self, job_id: &str) -> bool {
        self.find_by_job(job_id).is_some()
    }

    pub fn status_for(&self, job_id: &str) -> Option<ApplicationStatus> {
        self.find_by_job(job_id).map(|a| a.status)
    }

    pub fn stats(&self) -> ApplicationStats {
        ApplicationStats::from_applications(&self.applications)
    }

    /// Prepends `application`, replacing any record for the same job.
    pub fn add(&mut self, application: Application) -> Result<()> {
        self.applications.retain(|a| a.job_id != application.job_id);
        self.applications.insert(0, application);
        self.persist()
    }

    /// Local-only withdrawal. Returns the removed record, or `None` when the
    /// job had no application.
    pub fn unapply(&mut self, job_id: &str) -> Result<Option<Application>> {
        let Some(index) = self.applications.iter().position(|a| a.job_id == job_id) else {
            return Ok(None);
        };
        let removed = self.applications.remove(index);
        self.persist()?;
        tracing::info!(job_id, application_id = %removed.id, "removed application locally; service not notified");
        Ok(Some(removed))
    }

    /// Pushes a status change to the service and replaces the local record
    /// with the one it returns.
    pub fn update_status(
        &mut self,
        api: &dyn RecruitingApi,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let updated = api.update_application_status(application_id, status)?;
        match self.applications.iter_mut().find(|a| a.id == updated.id) {
            Some(existing) => *existing = updated.clone(),
            None => self.applications.insert(0, updated.clone()),
        }
        self.persist()?;
        Ok(updated)
    }

    fn persist(&self) -> Result<()> {
        self.db.set_json(APPLICATIONS_KEY, &self.applications)
    }
}

/// Bookmarked job ids, kept only in the local cache.
pub struct SavedJobs<'db> {
    db: &'db Database,
    ids: Vec<String>,
}

impl<'db> SavedJobs<'db> {
    pub fn load(db: &'db Database) -> Self {
        let ids = db.get_or_default(SAVED_JOBS_KEY);
        Self { db, ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.ids.iter().any(|id| id == job_id)
    }

    /// Returns true if the job is saved afterwards.
    pub fn toggle(&mut self, job_id: &str) -> Result<bool> {
        let saved = if self.contains(job_id) {
            self.ids.retain(|id| id != job_id);
            false
        } else {
            self.ids.push(job_id.to_string());
            true
        };
        self.db.set_json(SAVED_JOBS_KEY, &self.ids)?;
        Ok(saved)
    }
}

pub fn load_profile(db: &Database) -> Profile {
    db.get_or_default(PROFILE_KEY)
}

pub fn save_profile(db: &Database, profile: &Profile) -> Result<()> {
    db.set_json(PROFILE_KEY, profile)
}
