use anyhow::{Result, anyhow};

use crate::api::RecruitingApi;
use crate::models::{Round, RoundDraft};

/// Interview rounds of one job. There is no local copy beyond the last
/// fetch; every mutation re-reads the full list from the service.
pub struct RoundManager<'a> {
    api: &'a dyn RecruitingApi,
    job_id: String,
    rounds: Vec<Round>,
}

impl<'a> RoundManager<'a> {
    pub fn new(api: &'a dyn RecruitingApi, job_id: &str) -> Self {
        Self {
            api,
            job_id: job_id.to_string(),
            rounds: Vec::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Rounds sorted by their sequence order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Default order for a new round.
    pub fn next_order(&self) -> u32 {
        self.rounds.len() as u32 + 1
    }

    /// On failure the list is cleared and the error returned.
    pub fn refresh(&mut self) -> Result<&[Round]> {
        match self.api.list_rounds(&self.job_id) {
            Ok(mut rounds) => {
                rounds.sort_by_key(|r| r.draft.order);
                self.rounds = rounds;
                Ok(self.rounds.as_slice())
            }
            Err(e) => {
                self.rounds.clear();
                Err(anyhow::Error::new(e).context(format!("Failed to load rounds for job {}", self.job_id)))
            }
        }
    }

    pub fn create(&mut self, draft: RoundDraft) -> Result<Round> {
        let draft = self.check(draft)?;
        let created = self.api.create_round(&draft)?;
        tracing::info!(round_id = %created.id, job_id = %self.job_id, "round created");
        self.refresh()?;
        Ok(created)
    }

    pub fn update(&mut self, round_id: &str, draft: RoundDraft) -> Result<Round> {
        let draft = self.check(draft)?;
        let updated = self.api.update_round(round_id, &draft)?;
        self.refresh()?;
        Ok(updated)
    }

    pub fn delete(&mut self, round_id: &str) -> Result<()> {
        self.api.delete_round(round_id)?;
        tracing::info!(round_id, job_id = %self.job_id, "round deleted");
        self.refresh()?;
        Ok(())
    }

    pub fn find(&self, round_id: &str) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == round_id)
    }

    fn check(&self, mut draft: RoundDraft) -> Result<RoundDraft> {
        draft.name = draft.name.trim().to_string();
        if draft.name.is_empty() {
            return Err(anyhow!("Round name must not be empty"));
        }
        draft.job_id = self.job_id.clone();
        Ok(draft)
    }
}
