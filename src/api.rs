use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::ApiError;
use crate::filter::ShortlistQuery;
use crate::models::{
    Application, ApplicationStatus, Job, JobPosting, Round, RoundDraft, ShortlistResult, StructuredData,
    optional_flexible_id,
};
use crate::validate::ResumeFile;

/// The calls this client makes against the recruiting service.
pub trait RecruitingApi {
    fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;
    fn create_job(&self, posting: &JobPosting) -> Result<Job, ApiError>;
    fn list_applications(&self) -> Result<Vec<Application>, ApiError>;
    fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, ApiError>;
    /// Combined upload + AI processing of one application.
    fn apply(&self, job: &Job, resume: &ResumeFile) -> Result<ApplyResponse, ApiError>;

    fn list_rounds(&self, job_id: &str) -> Result<Vec<Round>, ApiError>;
    fn create_round(&self, draft: &RoundDraft) -> Result<Round, ApiError>;
    fn update_round(&self, round_id: &str, draft: &RoundDraft) -> Result<Round, ApiError>;
    fn delete_round(&self, round_id: &str) -> Result<(), ApiError>;

    /// Returns the upload id used by the later wizard steps.
    fn upload_resume(&self, resume: &ResumeFile) -> Result<String, ApiError>;
    fn parse_resume(&self, upload_id: &str) -> Result<String, ApiError>;
    fn structure_resume(&self, text: &str) -> Result<StructuredData, ApiError>;
    fn save_resume(&self, data: &StructuredData) -> Result<Value, ApiError>;

    fn shortlist(&self, query: &ShortlistQuery) -> Result<ShortlistResult, ApiError>;
}

/// Body of a 2xx `/apply/` response. The id is optional here so that a
/// missing id is reported by the apply workflow, not as a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplyResponse {
    #[serde(default)]
    pub application: Option<AppliedRecord>,
    #[serde(default)]
    pub structured_data: Option<StructuredData>,
    #[serde(default)]
    pub log: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppliedRecord {
    #[serde(default, deserialize_with = "optional_flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub resume_filename: Option<String>,
}

impl ApplyResponse {
    pub fn application_id(&self) -> Option<&str> {
        self.application
            .as_ref()
            .and_then(|a| a.id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(deserialize_with = "crate::models::flexible_id")]
    job_id: String,
}

#[derive(Deserialize)]
struct ParseResponse {
    parsed_text: String,
}

#[derive(Deserialize)]
struct StructureResponse {
    structured: StructuredData,
}

#[derive(Deserialize)]
struct SaveResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Serialize)]
struct JobPayload<'a> {
    id: &'a str,
    #[serde(flatten)]
    posting: &'a JobPosting,
}

#[derive(Serialize)]
struct RoundPayload<'a> {
    id: &'a str,
    #[serde(flatten)]
    draft: &'a RoundDraft,
}

/// Checks the status and decodes a response body. Non-2xx bodies become
/// server errors; 2xx bodies that do not decode are contract violations.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str, endpoint: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::from_response(status, body));
    }
    serde_json::from_str(body)
        .map_err(|e| ApiError::Contract(format!("Unexpected response from {}: {}", endpoint, e)))
}

/// The shortlist endpoint reports upstream failures as a 200 with an
/// `error` field.
pub fn decode_shortlist(status: u16, body: &str) -> Result<ShortlistResult, ApiError> {
    let value: Value = decode_body(status, body, "/shortlist")?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Server { status, detail: Some(error.to_string()) });
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::Contract(format!("Unexpected response from /shortlist: {}", e)))
}

#[derive(Debug)]
pub struct HttpApi {
    base: Url,
    client: Client,
}

impl HttpApi {
    /// Requests have no deadline unless `config.http_timeout` sets one; resume
    /// processing on the service can take well over a minute.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_url.clone()));
        }
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Appends each segment to the base path, percent-encoding it, so ids
    /// containing `/`, `?` or spaces stay inside their own segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, endpoint: &str) -> Result<T, ApiError> {
        let (status, body) = self.send_raw(request, endpoint)?;
        decode_body(status, &body, endpoint)
    }

    fn send_raw(&self, request: RequestBuilder, endpoint: &str) -> Result<(u16, String), ApiError> {
        tracing::debug!(endpoint, "sending request");
        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        tracing::debug!(endpoint, status, bytes = body.len(), "received response");
        Ok((status, body))
    }

    fn resume_form(resume: &ResumeFile) -> Result<multipart::Form, ApiError> {
        let part = multipart::Part::bytes(resume.bytes.clone())
            .file_name(resume.file_name.clone())
            .mime_str(&resume.mime_type)?;
        Ok(multipart::Form::new().part("file", part))
    }
}

impl RecruitingApi for HttpApi {
    fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.send(self.client.get(self.url(&["jobs"])), "/jobs")
    }

    fn create_job(&self, posting: &JobPosting) -> Result<Job, ApiError> {
        let request = self
            .client
            .post(self.url(&["jobs"]))
            .json(&JobPayload { id: "", posting });
        self.send(request, "/jobs")
    }

    fn list_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.send(self.client.get(self.url(&["applications"])), "/applications")
    }

    fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, ApiError> {
        let request = self
            .client
            .put(self.url(&["applications", application_id]))
            .json(&json!({ "status": status }));
        self.send(request, "/applications/{id}")
    }

    fn apply(&self, job: &Job, resume: &ResumeFile) -> Result<ApplyResponse, ApiError> {
        let request = self
            .client
            .post(self.url(&["apply", ""]))
            .query(&[
                ("jobId", job.id.as_str()),
                ("position", job.title.as_str()),
                ("company", job.company.as_str()),
            ])
            .multipart(Self::resume_form(resume)?);
        self.send(request, "/apply/")
    }

    fn list_rounds(&self, job_id: &str) -> Result<Vec<Round>, ApiError> {
        let request = self.client.get(self.url(&["rounds"])).query(&[("job_id", job_id)]);
        self.send(request, "/rounds")
    }

    fn create_round(&self, draft: &RoundDraft) -> Result<Round, ApiError> {
        let request = self
            .client
            .post(self.url(&["rounds"]))
            .json(&RoundPayload { id: "", draft });
        self.send(request, "/rounds")
    }

    fn update_round(&self, round_id: &str, draft: &RoundDraft) -> Result<Round, ApiError> {
        let request = self
            .client
            .put(self.url(&["rounds", round_id]))
            .json(&RoundPayload { id: round_id, draft });
        self.send(request, "/rounds/{id}")
    }

    fn delete_round(&self, round_id: &str) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(&["rounds", round_id]));
        let (status, body) = self.send_raw(request, "/rounds/{id}")?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(ApiError::from_response(status, &body))
        }
    }

    fn upload_resume(&self, resume: &ResumeFile) -> Result<String, ApiError> {
        let request = self
            .client
            .post(self.url(&["upload"]))
            .multipart(Self::resume_form(resume)?);
        let response: UploadResponse = self.send(request, "/upload")?;
        Ok(response.job_id)
    }

    fn parse_resume(&self, upload_id: &str) -> Result<String, ApiError> {
        let request = self.client.get(self.url(&["parse", upload_id]));
        let response: ParseResponse = self.send(request, "/parse/{job_id}")?;
        Ok(response.parsed_text)
    }

    fn structure_resume(&self, text: &str) -> Result<StructuredData, ApiError> {
        let request = self
            .client
            .post(self.url(&["structure"]))
            .json(&json!({ "text": text }));
        let response: StructureResponse = self.send(request, "/structure")?;
        Ok(response.structured)
    }

    fn save_resume(&self, data: &StructuredData) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(&["save"])).json(data);
        let response: SaveResponse = self.send(request, "/save")?;
        Ok(response.result)
    }

    fn shortlist(&self, query: &ShortlistQuery) -> Result<ShortlistResult, ApiError> {
        let request = self.client.post(self.url(&["shortlist"])).json(query);
        let (status, body) = self.send_raw(request, "/shortlist")?;
        decode_shortlist(status, &body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoundType;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_apply_response_with_id() {
        let response: ApplyResponse = decode_body(
            200,
            r#"{"success": true, "application": {"id": "abc-123", "jobId": "1"},
                "structured_data": {"Full Name": "Sam"}, "log": ["parsed", "structured"]}"#,
            "/apply/",
        )
        .unwrap();
        assert_eq!(response.application_id(), Some("abc-123"));
        assert_eq!(response.structured_data.unwrap()["Full Name"], "Sam");
        assert_eq!(response.log.unwrap().len(), 2);
    }

    #[test]
    fn test_apply_response_missing_or_blank_id() {
        for body in [r#"{"success": true}"#, r#"{"application": {}}"#, r#"{"application": {"id": "  "}}"#] {
            let response: ApplyResponse = decode_body(200, body, "/apply/").unwrap();
            assert_eq!(response.application_id(), None, "body: {}", body);
        }
    }

    #[test]
    fn test_apply_response_numeric_id() {
        let response: ApplyResponse = decode_body(200, r#"{"application": {"id": 42}}"#, "/apply/").unwrap();
        assert_eq!(response.application_id(), Some("42"));
    }

    #[test]
    fn test_decode_body_server_error() {
        let err = decode_body::<ApplyResponse>(500, r#"{"detail": "Application failed: boom"}"#, "/apply/")
            .unwrap_err();
        assert_eq!(err.to_string(), "Application failed: boom");
    }

    #[test]
    fn test_decode_body_contract_violation() {
        let err = decode_body::<Vec<Application>>(200, r#"{"applications": []}"#, "/applications")
            .unwrap_err();
        assert!(matches!(err, ApiError::Contract(_)));
        assert!(err.to_string().contains("/applications"));
    }

    #[test]
    fn test_decode_shortlist() {
        let result = decode_shortlist(
            200,
            r#"{"headers": ["Full Name", "Age"], "rows": [["Sam", "34"]], "message": "Shortlisted 1"}"#,
        )
        .unwrap();
        assert_eq!(result.headers, vec!["Full Name", "Age"]);
        assert_eq!(result.rows, vec![vec!["Sam".to_string(), "34".to_string()]]);

        let err = decode_shortlist(200, r#"{"error": "Error fetching data: timeout"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Error fetching data: timeout");
    }

    #[test]
    fn test_job_payload_sends_empty_id() {
        let posting = JobPosting {
            title: "QA Lead".to_string(),
            department: "Quality".to_string(),
            skills: vec!["Selenium".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(JobPayload { id: "", posting: &posting }).unwrap();
        assert_eq!(value["id"], "");
        assert_eq!(value["title"], "QA Lead");
        assert_eq!(value["type"], "full-time");
        assert_eq!(value["skills"], json!(["Selenium"]));
    }

    #[test]
    fn test_created_job_decodes_from_service_echo() {
        let job: Job = decode_body(
            200,
            r#"{"id": "5f1c", "title": "QA Lead", "department": "Quality", "location": "Remote",
                "type": "full-time", "description": "", "requirements": [], "minSalary": 0}"#,
            "/jobs",
        )
        .unwrap();
        assert_eq!(job.id, "5f1c");
        assert_eq!(job.company, "Quality");
    }

    #[test]
    fn test_round_payload_for_create_sends_empty_id() {
        let draft = RoundDraft {
            job_id: "job-1".to_string(),
            name: "Tech".to_string(),
            round_type: RoundType::Technical,
            description: "Pairing".to_string(),
            duration: 90,
            order: 2,
            is_active: true,
        };
        let value = serde_json::to_value(RoundPayload { id: "", draft: &draft }).unwrap();
        assert_eq!(value["id"], "");
        assert_eq!(value["jobId"], "job-1");
        assert_eq!(value["type"], "technical");
        assert_eq!(value["duration"], 90);
    }

    #[test]
    fn test_http_api_url_join() {
        let config = Config::new("http://localhost:8000/", None, None);
        let api = HttpApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url(&["rounds"]).as_str(), "http://localhost:8000/rounds");
        assert_eq!(api.url(&["apply", ""]).as_str(), "http://localhost:8000/apply/");

        let prefixed = HttpApi::new(&Config::new("http://localhost:8000/api", None, None)).unwrap();
        assert_eq!(prefixed.url(&["jobs"]).as_str(), "http://localhost:8000/api/jobs");
    }

    #[test]
    fn test_ids_are_encoded_as_single_segments() {
        let api = HttpApi::new(&Config::new("http://localhost:8000", None, None)).unwrap();
        assert_eq!(
            api.url(&["rounds", "a/b c"]).as_str(),
            "http://localhost:8000/rounds/a%2Fb%20c"
        );
        assert_eq!(
            api.url(&["applications", "x?y#z"]).as_str(),
            "http://localhost:8000/applications/x%3Fy%23z"
        );
    }

    #[test]
    fn test_invalid_service_url() {
        let err = HttpApi::new(&Config::new("not a url", None, None)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    /// Serves one request with `body` after sleeping for `delay`.
    fn slow_service(delay: Duration, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            thread::sleep(delay);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_slow_response_without_timeout_completes() {
        let url = slow_service(Duration::from_secs(35), "[]");
        let api = HttpApi::new(&Config::new(&url, None, None)).unwrap();
        assert_eq!(api.list_jobs().unwrap(), Vec::<Job>::new());
    }

    #[test]
    fn test_configured_timeout_is_enforced() {
        let url = slow_service(Duration::from_secs(3), "[]");
        let api = HttpApi::new(&Config::new(&url, None, Some(Duration::from_millis(500)))).unwrap();
        let err = api.list_jobs().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{:?}", err);
    }
}
