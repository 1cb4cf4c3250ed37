use anyhow::{Context, Result, anyhow};
use std::path::Path;

pub const ALLOWED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const ALLOWED_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload only PDF, DOC, or DOCX files.")]
    UnsupportedType { file_name: String, mime_type: String },
}

/// A resume selected for upload, with the MIME type it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Not a file path: {}", path.display()))?
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read resume file: {}", path.display()))?;
        let mime_type = mime_for_name(&file_name).to_string();
        Ok(Self { file_name, mime_type, bytes })
    }
}

fn mime_for_name(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        ALLOWED_MIME_TYPES[0]
    } else if lower.ends_with(".docx") {
        ALLOWED_MIME_TYPES[2]
    } else if lower.ends_with(".doc") {
        ALLOWED_MIME_TYPES[1]
    } else {
        "application/octet-stream"
    }
}

/// Accepts a file when either its declared MIME type or its extension is on
/// the allow-list.
pub fn validate_resume(file: &ResumeFile) -> Result<(), ValidationError> {
    let mime_ok = ALLOWED_MIME_TYPES.contains(&file.mime_type.trim());
    let lower = file.file_name.to_lowercase();
    let ext_ok = ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));

    if mime_ok || ext_ok {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedType {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> ResumeFile {
        ResumeFile::new(name, mime, b"%PDF-1.4".to_vec())
    }

    #[test]
    fn test_accepts_allowed_extensions_any_case() {
        for name in ["cv.pdf", "CV.PDF", "resume.Doc", "resume.docx"] {
            assert!(validate_resume(&file(name, "")).is_ok(), "{} should pass", name);
        }
    }

    #[test]
    fn test_accepts_allowed_mime_with_odd_name() {
        assert!(validate_resume(&file("resume", "application/pdf")).is_ok());
        assert!(validate_resume(&file("upload.bin", "application/msword")).is_ok());
    }

    #[test]
    fn test_rejects_everything_else() {
        for (name, mime) in [
            ("resume.txt", "text/plain"),
            ("photo.png", "image/png"),
            ("pdf", "application/octet-stream"),
            ("resume.pdf.exe", "application/x-msdownload"),
        ] {
            let err = validate_resume(&file(name, mime)).unwrap_err();
            assert_eq!(err.to_string(), "Please upload only PDF, DOC, or DOCX files.");
        }
    }

    #[test]
    fn test_mime_for_name() {
        assert_eq!(mime_for_name("a.PDF"), "application/pdf");
        assert_eq!(mime_for_name("a.doc"), "application/msword");
        assert_eq!(
            mime_for_name("a.docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(mime_for_name("a.rtf"), "application/octet-stream");
    }

    #[test]
    fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join(format!("hireease-validate-{}.docx", std::process::id()));
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let resume = ResumeFile::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(resume.file_name.ends_with(".docx"));
        assert_eq!(resume.bytes, b"PK\x03\x04");
        assert!(validate_resume(&resume).is_ok());
    }
}
