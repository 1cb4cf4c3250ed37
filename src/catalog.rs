use anyhow::{Result, bail};

use crate::api::RecruitingApi;
use crate::models::{Job, JobPosting};

/// Listing shown when the service has no job endpoint or is unreachable.
pub fn demo_jobs() -> Vec<Job> {
    let job = |id: &str, title: &str, company: &str, location: &str, description: &str, posted_by: &str| Job {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        posted_by: Some(posted_by.to_string()),
    };
    vec![
        job(
            "1",
            "Frontend Developer",
            "Acme Corp",
            "Remote",
            "Build and maintain React applications. Collaborate with UX/UI teams.",
            "recruiter@acme.com",
        ),
        job(
            "2",
            "Backend Engineer",
            "Tech Solutions",
            "Bangalore",
            "Develop REST APIs and work with Node.js and MongoDB.",
            "recruiter@techsolutions.com",
        ),
        job(
            "3",
            "UI/UX Designer",
            "Designify",
            "Chennai",
            "Design user interfaces and experiences for web and mobile apps.",
            "recruiter@designify.com",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    Demo,
}

pub struct Catalog {
    jobs: Vec<Job>,
    source: CatalogSource,
}

impl Catalog {
    pub fn load(api: &dyn RecruitingApi) -> Self {
        match api.list_jobs() {
            Ok(jobs) if !jobs.is_empty() => Self { jobs, source: CatalogSource::Remote },
            Ok(_) => Self::demo(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load jobs from service, using demo listing");
                Self::demo()
            }
        }
    }

    pub fn demo() -> Self {
        Self { jobs: demo_jobs(), source: CatalogSource::Demo }
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Case-insensitive match on title, company, or location. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<&Job> {
        let needle = query.trim().to_lowercase();
        self.jobs
            .iter()
            .filter(|job| {
                needle.is_empty()
                    || job.title.to_lowercase().contains(&needle)
                    || job.company.to_lowercase().contains(&needle)
                    || job.location.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Posts a new job. Blank list entries are dropped and text fields trimmed
/// before anything is sent.
pub fn post_job(api: &dyn RecruitingApi, mut posting: JobPosting) -> Result<Job> {
    for field in [
        &mut posting.title,
        &mut posting.department,
        &mut posting.location,
        &mut posting.description,
        &mut posting.education,
    ] {
        *field = field.trim().to_string();
    }
    for list in [&mut posting.requirements, &mut posting.skills, &mut posting.benefits] {
        list.retain(|entry| !entry.trim().is_empty());
        for entry in list.iter_mut() {
            *entry = entry.trim().to_string();
        }
    }

    for (name, value) in [
        ("Title", &posting.title),
        ("Department", &posting.department),
        ("Location", &posting.location),
        ("Description", &posting.description),
    ] {
        if value.is_empty() {
            bail!("{} must not be empty", name);
        }
    }
    let amounts = [
        posting.min_salary,
        posting.max_salary,
        posting.min_experience,
        posting.max_experience,
    ];
    if amounts.iter().any(|v| !v.is_finite() || *v < 0.0) {
        bail!("Salary and experience must be non-negative numbers");
    }
    if posting.max_salary > 0.0 && posting.min_salary > posting.max_salary {
        bail!("Minimum salary is above the maximum");
    }
    if posting.max_experience > 0.0 && posting.min_experience > posting.max_experience {
        bail!("Minimum experience is above the maximum");
    }

    let job = api.create_job(&posting)?;
    tracing::info!(job_id = %job.id, title = %job.title, "job posted");
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeApi, transport_error};
    use crate::models::EmploymentType;

    fn posting(title: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            department: "Engineering".to_string(),
            location: "Remote".to_string(),
            employment_type: EmploymentType::Contract,
            description: "Keep the pipelines green".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_fields() {
        let catalog = Catalog::demo();
        let titles = |q: &str| catalog.search(q).iter().map(|j| j.title.clone()).collect::<Vec<_>>();

        assert_eq!(titles("backend"), vec!["Backend Engineer"]);
        assert_eq!(titles("DESIGNIFY"), vec!["UI/UX Designer"]);
        assert_eq!(titles("remote"), vec!["Frontend Developer"]);
        assert_eq!(titles("").len(), 3);
        assert!(titles("kotlin").is_empty());
    }

    #[test]
    fn test_load_falls_back_to_demo() {
        let api = FakeApi::new();
        *api.jobs.borrow_mut() = Some(Err(transport_error()));
        let catalog = Catalog::load(&api);
        assert_eq!(catalog.source(), CatalogSource::Demo);
        assert_eq!(catalog.get("2").unwrap().company, "Tech Solutions");
    }

    #[test]
    fn test_load_uses_remote_jobs() {
        let api = FakeApi::new();
        let mut remote = demo_jobs();
        remote.truncate(1);
        remote[0].id = "uuid-1".to_string();
        *api.jobs.borrow_mut() = Some(Ok(remote));

        let catalog = Catalog::load(&api);
        assert_eq!(catalog.source(), CatalogSource::Remote);
        assert_eq!(catalog.jobs().len(), 1);
        assert!(catalog.get("uuid-1").is_some());
    }

    #[test]
    fn test_post_job_cleans_lists_and_returns_assigned_id() {
        let api = FakeApi::new();
        let mut draft = posting("  DevOps Engineer ");
        draft.skills = vec!["".to_string(), " Terraform ".to_string(), "  ".to_string()];
        draft.min_salary = 40000.0;
        draft.max_salary = 60000.0;

        let job = post_job(&api, draft).unwrap();
        assert_eq!(job.id, "job-1");
        assert_eq!(job.title, "DevOps Engineer");
        assert_eq!(api.calls(), vec!["create_job DevOps Engineer"]);

        let sent = &api.posted_jobs.borrow()[0];
        assert_eq!(sent.skills, vec!["Terraform"]);
        assert_eq!(sent.employment_type, EmploymentType::Contract);
    }

    #[test]
    fn test_post_job_rejects_before_sending() {
        let api = FakeApi::new();

        let err = post_job(&api, posting("   ")).unwrap_err();
        assert_eq!(err.to_string(), "Title must not be empty");

        let mut inverted = posting("Analyst");
        inverted.min_salary = 90000.0;
        inverted.max_salary = 50000.0;
        assert!(post_job(&api, inverted).unwrap_err().to_string().contains("salary"));

        let mut negative = posting("Analyst");
        negative.min_experience = -1.0;
        assert!(post_job(&api, negative).is_err());

        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_post_job_zero_maximum_is_open_ended() {
        let api = FakeApi::new();
        let mut draft = posting("Recruiter");
        draft.min_salary = 30000.0;
        draft.min_experience = 2.0;
        assert!(post_job(&api, draft).is_ok());
    }

    #[test]
    fn test_post_job_surfaces_service_errors() {
        let api = FakeApi::new();
        api.fail_create_job.set(true);
        let err = post_job(&api, posting("Recruiter")).unwrap_err();
        assert!(err.to_string().contains("could not reach"), "{}", err);
    }
}
