use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::RecruitingApi;
use crate::error::ApiError;
use crate::models::StructuredData;
use crate::validate::{ResumeFile, ValidationError, validate_resume};

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Please select a file.")]
    NoFile,
    #[error(transparent)]
    InvalidFile(#[from] ValidationError),
    #[error("No job ID.")]
    NoUploadId,
    #[error("No parsed text.")]
    NoParsedText,
    #[error("No structured data.")]
    NoStructuredData,
    #[error("Upload failed. ({0})")]
    Upload(#[source] ApiError),
    #[error("Parsing failed. ({0})")]
    Parse(#[source] ApiError),
    #[error("Structuring failed. ({0})")]
    Structure(#[source] ApiError),
    #[error("Saving to Sheets failed. ({0})")]
    Save(#[source] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    Idle,
    Uploaded,
    Parsed,
    Structured,
    Saved,
}

impl WizardStage {
    /// One-based step number shown to the user.
    pub fn step(&self) -> u8 {
        match self {
            WizardStage::Idle => 1,
            WizardStage::Uploaded => 2,
            WizardStage::Parsed => 3,
            WizardStage::Structured => 4,
            WizardStage::Saved => 5,
        }
    }
}

/// Upload → parse → structure → save, each step run on demand and each
/// requiring the artifact of the one before it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeWizard {
    pub file_name: Option<String>,
    pub upload_id: Option<String>,
    pub parsed_text: Option<String>,
    pub structured: Option<StructuredData>,
    pub result: Option<Value>,
}

impl ResumeWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WizardStage {
        if self.result.is_some() {
            WizardStage::Saved
        } else if self.structured.is_some() {
            WizardStage::Structured
        } else if self.parsed_text.is_some() {
            WizardStage::Parsed
        } else if self.upload_id.is_some() {
            WizardStage::Uploaded
        } else {
            WizardStage::Idle
        }
    }

    /// Selecting a new file starts over.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn upload(&mut self, api: &dyn RecruitingApi, file: Option<&ResumeFile>) -> Result<&str, WizardError> {
        let file = file.ok_or(WizardError::NoFile)?;
        validate_resume(file)?;
        self.reset();
        self.file_name = Some(file.file_name.clone());

        let upload_id = api.upload_resume(file).map_err(WizardError::Upload)?;
        tracing::info!(upload_id = %upload_id, file = %file.file_name, "resume uploaded");
        Ok(self.upload_id.insert(upload_id).as_str())
    }

    pub fn parse(&mut self, api: &dyn RecruitingApi) -> Result<&str, WizardError> {
        let upload_id = self
            .upload_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(WizardError::NoUploadId)?;

        let text = api.parse_resume(upload_id).map_err(WizardError::Parse)?;
        self.structured = None;
        self.result = None;
        Ok(self.parsed_text.insert(text).as_str())
    }

    pub fn structure(&mut self, api: &dyn RecruitingApi) -> Result<&StructuredData, WizardError> {
        let text = self
            .parsed_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(WizardError::NoParsedText)?;

        let structured = api.structure_resume(text).map_err(WizardError::Structure)?;
        self.result = None;
        Ok(&*self.structured.insert(structured))
    }

    pub fn save(&mut self, api: &dyn RecruitingApi) -> Result<&Value, WizardError> {
        let data = self.structured.as_ref().ok_or(WizardError::NoStructuredData)?;
        let result = api.save_resume(data).map_err(WizardError::Save)?;
        Ok(&*self.result.insert(result))
    }
}
