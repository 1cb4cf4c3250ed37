mod api;
mod apply;
mod auth;
mod catalog;
mod config;
mod db;
mod error;
mod filter;
mod models;
mod rounds;
mod store;
mod tui;
mod validate;
mod wizard;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api::{HttpApi, RecruitingApi};
use apply::{ApplyPhase, ApplySequencer};
use auth::{Registration, Session};
use catalog::{Catalog, CatalogSource};
use config::Config;
use db::{Database, WIZARD_KEY};
use filter::{FilterBuilder, FilterClause};
use models::{
    ApplicationStatus, EmploymentType, JobPosting, Role, RoundDraft, RoundType, ShortlistResult,
};
use rounds::RoundManager;
use store::{ApplicationStore, LoadSource, SavedJobs};
use validate::ResumeFile;
use wizard::{ResumeWizard, WizardStage};

#[derive(Parser)]
#[command(name = "hireease")]
#[command(about = "HireEase recruiting client - browse jobs, apply, track applications, shortlist candidates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the local cache
    Init,

    /// Browse open jobs
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Apply to a job with a resume (PDF, DOC, or DOCX)
    Apply {
        /// Job ID
        job_id: String,

        /// Path to resume file
        file: PathBuf,
    },

    /// Withdraw an application (local only)
    Unapply {
        /// Job ID
        job_id: String,
    },

    /// Track applications
    Applications {
        #[command(subcommand)]
        command: ApplicationCommands,
    },

    /// Save or unsave a job
    Save {
        /// Job ID
        job_id: String,
    },

    /// Candidate profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Log in as a demo user
    Login {
        /// Email address
        email: String,
    },

    /// Register a new user
    Register {
        /// Email address
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Role (recruiter, candidate)
        #[arg(short, long, default_value = "candidate")]
        role: Role,
    },

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage interview rounds of a job
    Rounds {
        /// Job ID
        #[arg(short, long, global = true)]
        job: Option<String>,

        #[command(subcommand)]
        command: RoundCommands,
    },

    /// Step through upload, parse, structure, and save of a resume
    Resume {
        #[command(subcommand)]
        command: ResumeCommands,
    },

    /// Shortlist candidates from the spreadsheet
    Shortlist {
        /// Filter clause, e.g. "age>=30" or "name contains Sam" (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<FilterClause>,

        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<u32>,

        /// Number of rows to skip
        #[arg(short, long)]
        offset: Option<u32>,
    },

    /// Interactive candidate dashboard
    Browse {
        /// Only jobs matching this text
        #[arg(short, long)]
        search: Option<String>,

        /// Resume used when applying from the dashboard
        #[arg(short, long)]
        resume: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// List jobs
    List {
        /// Case-insensitive match on title, company, or location
        #[arg(short, long)]
        search: Option<String>,

        /// Only saved jobs
        #[arg(long)]
        saved: bool,
    },

    /// Show job details
    Show {
        /// Job ID
        id: String,
    },

    /// Post a new job
    Create {
        /// Job title
        title: String,

        #[arg(short, long)]
        department: String,

        #[arg(short, long)]
        location: String,

        /// Employment type (full-time, part-time, contract)
        #[arg(short = 't', long = "type", default_value = "full-time")]
        employment_type: EmploymentType,

        #[arg(long)]
        description: String,

        /// Requirement (repeatable)
        #[arg(short, long = "requirement")]
        requirements: Vec<String>,

        /// Skill (repeatable)
        #[arg(short, long = "skill")]
        skills: Vec<String>,

        /// Benefit (repeatable)
        #[arg(short, long = "benefit")]
        benefits: Vec<String>,

        #[arg(long, default_value = "")]
        education: String,

        #[arg(long, default_value_t = 0.0)]
        min_salary: f64,

        /// 0 leaves the range open
        #[arg(long, default_value_t = 0.0)]
        max_salary: f64,

        /// Years
        #[arg(long, default_value_t = 0.0)]
        min_experience: f64,

        #[arg(long, default_value_t = 0.0)]
        max_experience: f64,
    },
}

#[derive(Subcommand)]
enum ApplicationCommands {
    /// List applications
    List {
        /// Filter by status (applied, screening, interview, hired, rejected)
        #[arg(short, long)]
        status: Option<ApplicationStatus>,
    },

    /// Show application counts
    Stats,

    /// Change the status of an application
    SetStatus {
        /// Application ID
        id: String,

        /// New status
        status: ApplicationStatus,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the profile
    Show,

    /// Update profile fields
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        education: Option<String>,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long)]
        skills: Option<String>,
        /// Resume file name or link
        #[arg(long)]
        resume: Option<String>,
    },
}

#[derive(Subcommand)]
enum RoundCommands {
    /// List rounds
    List,

    /// Create a round
    Create {
        /// Round name
        name: String,

        /// Type (screening, technical, hr, final)
        #[arg(short = 't', long = "type", default_value = "screening")]
        round_type: RoundType,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Duration in minutes
        #[arg(long, default_value = "60")]
        duration: u32,

        /// Position in the sequence (default: after the last round)
        #[arg(long)]
        order: Option<u32>,

        /// Create the round disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Update a round
    Update {
        /// Round ID
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short = 't', long = "type")]
        round_type: Option<RoundType>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        duration: Option<u32>,

        #[arg(long)]
        order: Option<u32>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a round
    Delete {
        /// Round ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ResumeCommands {
    /// Upload a resume file (starts over)
    Upload {
        /// Path to resume file
        file: PathBuf,
    },

    /// Parse the uploaded resume
    Parse,

    /// Extract structured fields from the parsed text
    Structure,

    /// Save the structured fields to the spreadsheet
    Save,

    /// Show the current step and its artifacts
    Status,

    /// Discard all steps
    Reset,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = Config::from_env()?;
    let db = Database::open(config.data_dir.as_deref())?;
    let api = HttpApi::new(&config).context("Failed to build HTTP client")?;
    tracing::debug!(api_url = %api.base_url(), cache = %db.path().display(), "starting");

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!("Cache initialized at {}", db.path().display());
        }

        Commands::Jobs { command } => {
            match command {
                JobCommands::List { search, saved } => {
                    let catalog = load_catalog(&api);
                    let saved_jobs = SavedJobs::load(&db);
                    let store = load_store(&api, &db)?;
                    let jobs: Vec<_> = catalog
                        .search(search.as_deref().unwrap_or(""))
                        .into_iter()
                        .filter(|job| !saved || saved_jobs.contains(&job.id))
                        .collect();
                    if jobs.is_empty() {
                        println!("No jobs found.");
                    } else {
                        println!("{:<8} {:<30} {:<20} {:<15} {:<11} {:<5}", "ID", "TITLE", "COMPANY", "LOCATION", "STATUS", "SAVED");
                        println!("{}", "-".repeat(94));
                        for job in jobs {
                            let status = store
                                .status_for(&job.id)
                                .map(|s| s.to_string())
                                .unwrap_or_else(|| "-".to_string());
                            println!(
                                "{:<8} {:<30} {:<20} {:<15} {:<11} {:<5}",
                                truncate(&job.id, 8),
                                truncate(&job.title, 28),
                                truncate(&job.company, 18),
                                truncate(&job.location, 13),
                                status,
                                if saved_jobs.contains(&job.id) { "yes" } else { "" }
                            );
                        }
                    }
                }

                JobCommands::Show { id } => match load_catalog(&api).get(&id) {
                    Some(job) => {
                        println!("Job #{}", job.id);
                        println!("Title: {}", job.title);
                        println!("Company: {}", job.company);
                        println!("Location: {}", job.location);
                        if let Some(poster) = &job.posted_by {
                            println!("Posted by: {}", poster);
                        }
                        let store = load_store(&api, &db)?;
                        if let Some(application) = store.find_by_job(&job.id) {
                            println!("Application: {} ({})", application.status, application.id);
                        }
                        if SavedJobs::load(&db).contains(&job.id) {
                            println!("Saved: yes");
                        }
                        println!("\n--- Description ---\n{}", textwrap::fill(&job.description, 80));
                    }
                    None => {
                        println!("Job #{} not found.", id);
                    }
                },

                JobCommands::Create {
                    title,
                    department,
                    location,
                    employment_type,
                    description,
                    requirements,
                    skills,
                    benefits,
                    education,
                    min_salary,
                    max_salary,
                    min_experience,
                    max_experience,
                } => {
                    let posting = JobPosting {
                        title,
                        department,
                        location,
                        employment_type,
                        description,
                        requirements,
                        min_salary,
                        max_salary,
                        min_experience,
                        max_experience,
                        education,
                        skills,
                        benefits,
                    };
                    let job = catalog::post_job(&api, posting)?;
                    println!("Posted job '{}' (ID: {})", job.title, job.id);
                }
            }
        }

        Commands::Apply { job_id, file } => {
            let catalog = load_catalog(&api);
            let job = catalog
                .get(&job_id)
                .ok_or_else(|| anyhow!("Job #{} not found", job_id))?;
            let resume = ResumeFile::from_path(&file)?;
            let mut store = load_store(&api, &db)?;
            if let Some(existing) = store.find_by_job(&job.id) {
                bail!(
                    "Already applied to '{}' (application {}, status {}). Run `hireease unapply {}` first.",
                    job.title,
                    existing.id,
                    existing.status,
                    job.id
                );
            }

            let mut sequencer = ApplySequencer::new(&api);
            let application = sequencer.submit(job, &resume, &mut store, &mut |phase: &ApplyPhase| {
                if let Some(label) = tui::progress_label(phase) {
                    println!("{}", label);
                }
            })?;

            println!("Applied to {} at {} (application {})", application.position, application.company, application.id);
            if let Some(log) = &application.log {
                for line in log {
                    println!("  {}", line);
                }
            }
        }

        Commands::Unapply { job_id } => {
            let mut store = ApplicationStore::from_cache(&db);
            match store.unapply(&job_id)? {
                Some(removed) => println!("Withdrew application {} for {}.", removed.id, removed.position),
                None => println!("No application for job #{}.", job_id),
            }
        }

        Commands::Applications { command } => match command {
            ApplicationCommands::List { status } => {
                let store = load_store(&api, &db)?;
                let applications: Vec<_> = store
                    .applications()
                    .iter()
                    .filter(|a| status.is_none_or(|s| a.status == s))
                    .collect();
                if applications.is_empty() {
                    println!("No applications found.");
                } else {
                    println!("{:<10} {:<8} {:<28} {:<20} {:<11} {:<12}", "ID", "JOB", "POSITION", "COMPANY", "STATUS", "APPLIED");
                    println!("{}", "-".repeat(94));
                    for application in applications {
                        println!(
                            "{:<10} {:<8} {:<28} {:<20} {:<11} {:<12}",
                            truncate(&application.id, 10),
                            truncate(&application.job_id, 8),
                            truncate(&application.position, 26),
                            truncate(&application.company, 18),
                            application.status,
                            truncate(&application.applied_date, 10)
                        );
                    }
                }
            }

            ApplicationCommands::Stats => {
                let store = load_store(&api, &db)?;
                let stats = store.stats();
                println!("Total:       {}", stats.total);
                println!("In progress: {}", stats.in_progress);
                println!("Hired:       {}", stats.hired);
                println!("Rejected:    {}", stats.rejected);
            }

            ApplicationCommands::SetStatus { id, status } => {
                let mut store = ApplicationStore::from_cache(&db);
                let updated = store
                    .update_status(&api, &id, status)
                    .with_context(|| format!("Failed to update application {}", id))?;
                println!("Application {} is now {}.", updated.id, updated.status);
            }
        },

        Commands::Save { job_id } => {
            let mut saved = SavedJobs::load(&db);
            if saved.toggle(&job_id)? {
                println!("Saved job #{}.", job_id);
            } else {
                println!("Removed job #{} from saved jobs.", job_id);
            }
        }

        Commands::Profile { command } => match command {
            ProfileCommands::Show => {
                let profile = store::load_profile(&db);
                for (label, value) in [
                    ("Name", &profile.name),
                    ("Email", &profile.email),
                    ("Phone", &profile.phone),
                    ("Education", &profile.education),
                    ("Experience", &profile.experience),
                    ("Skills", &profile.skills),
                    ("Resume", &profile.resume),
                ] {
                    println!("{:<11} {}", format!("{}:", label), if value.is_empty() { "-" } else { value.as_str() });
                }
            }

            ProfileCommands::Edit {
                name,
                email,
                phone,
                education,
                experience,
                skills,
                resume,
            } => {
                let mut profile = store::load_profile(&db);
                for (slot, value) in [
                    (&mut profile.name, name),
                    (&mut profile.email, email),
                    (&mut profile.phone, phone),
                    (&mut profile.education, education),
                    (&mut profile.experience, experience),
                    (&mut profile.skills, skills),
                    (&mut profile.resume, resume),
                ] {
                    if let Some(value) = value {
                        *slot = value;
                    }
                }
                store::save_profile(&db, &profile)?;
                println!("Profile updated.");
            }
        },

        Commands::Login { email } => {
            let mut session = Session::load(&db);
            let user = session.login(&email)?;
            println!("Logged in as {} {} ({}).", user.first_name, user.last_name, user.role);
        }

        Commands::Register {
            email,
            first_name,
            last_name,
            role,
        } => {
            let mut session = Session::load(&db);
            let user = session.register(Registration {
                email: &email,
                first_name: &first_name,
                last_name: &last_name,
                role,
            })?;
            println!("Registered {} {} as {} (ID: {}).", user.first_name, user.last_name, user.role, user.id);
        }

        Commands::Logout => {
            Session::load(&db).logout()?;
            println!("Logged out.");
        }

        Commands::Whoami => match Session::load(&db).current() {
            Some(user) => println!("{} {} <{}> ({})", user.first_name, user.last_name, user.email, user.role),
            None => println!("Not logged in."),
        },

        Commands::Rounds { job, command } => {
            let job_id = job.ok_or_else(|| anyhow!("--job is required"))?;
            let mut manager = RoundManager::new(&api, &job_id);
            manager.refresh()?;
            match command {
                RoundCommands::List => print_rounds(&manager),

                RoundCommands::Create {
                    name,
                    round_type,
                    description,
                    duration,
                    order,
                    inactive,
                } => {
                    let draft = RoundDraft {
                        job_id: job_id.clone(),
                        name,
                        round_type,
                        description,
                        duration,
                        order: order.unwrap_or_else(|| manager.next_order()),
                        is_active: !inactive,
                    };
                    let round = manager.create(draft)?;
                    println!("Created round '{}' (ID: {})", round.draft.name, round.id);
                    print_rounds(&manager);
                }

                RoundCommands::Update {
                    id,
                    name,
                    round_type,
                    description,
                    duration,
                    order,
                    active,
                } => {
                    let mut draft = manager
                        .find(&id)
                        .ok_or_else(|| anyhow!("Round {} not found for job #{}", id, job_id))?
                        .draft
                        .clone();
                    if let Some(name) = name {
                        draft.name = name;
                    }
                    if let Some(round_type) = round_type {
                        draft.round_type = round_type;
                    }
                    if let Some(description) = description {
                        draft.description = description;
                    }
                    if let Some(duration) = duration {
                        draft.duration = duration;
                    }
                    if let Some(order) = order {
                        draft.order = order;
                    }
                    if let Some(active) = active {
                        draft.is_active = active;
                    }
                    manager.update(&id, draft)?;
                    println!("Updated round {}.", id);
                    print_rounds(&manager);
                }

                RoundCommands::Delete { id } => {
                    manager.delete(&id)?;
                    println!("Deleted round {}.", id);
                    print_rounds(&manager);
                }
            }
        }

        Commands::Resume { command } => {
            let mut wizard: ResumeWizard = db.get_or_default(WIZARD_KEY);
            let outcome = match command {
                ResumeCommands::Upload { file } => {
                    let resume = ResumeFile::from_path(&file)?;
                    wizard
                        .upload(&api, Some(&resume))
                        .map(|id| println!("Uploaded {} (upload ID: {})", resume.file_name, id))
                }
                ResumeCommands::Parse => wizard
                    .parse(&api)
                    .map(|text| println!("--- Parsed Text ---\n{}", text)),
                ResumeCommands::Structure => wizard.structure(&api).map(|data| {
                    println!("--- Structured Data ---");
                    for (field, value) in data {
                        println!("{}: {}", field, display_value(value));
                    }
                }),
                ResumeCommands::Save => wizard.save(&api).map(|result| {
                    println!("Saved to spreadsheet.");
                    println!("{}", serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string()));
                }),
                ResumeCommands::Status => {
                    print_wizard(&wizard);
                    Ok(())
                }
                ResumeCommands::Reset => {
                    wizard.reset();
                    println!("Resume wizard reset.");
                    Ok(())
                }
            };
            db.set_json(WIZARD_KEY, &wizard)?;
            outcome?;
        }

        Commands::Shortlist {
            filters,
            limit,
            offset,
        } => {
            let mut builder = FilterBuilder::new();
            for clause in filters {
                builder.add(clause);
            }
            builder.limit(limit).offset(offset);
            let query = builder.build();
            tracing::debug!(filters = %serde_json::Value::Object(query.filters.clone()), "shortlisting");

            let result = api.shortlist(&query).context("Shortlisting failed")?;
            print_shortlist(&result);
        }

        Commands::Browse { search, resume } => {
            let resume = resume.map(|path| ResumeFile::from_path(&path)).transpose()?;
            let catalog = load_catalog(&api);
            let jobs = catalog
                .search(search.as_deref().unwrap_or(""))
                .into_iter()
                .cloned()
                .collect();
            tui::run_browse(&api, &db, jobs, resume)?;
        }
    }

    Ok(())
}

fn load_catalog(api: &dyn RecruitingApi) -> Catalog {
    let catalog = Catalog::load(api);
    if catalog.source() == CatalogSource::Demo {
        eprintln!("(Job service unavailable - showing demo jobs)");
    }
    catalog
}

fn load_store<'db>(api: &dyn RecruitingApi, db: &'db Database) -> Result<ApplicationStore<'db>> {
    let store = ApplicationStore::load(api, db)?;
    if let LoadSource::Cache { reason } = store.source() {
        eprintln!("(Showing cached applications: {})", reason);
    }
    Ok(store)
}

fn print_rounds(manager: &RoundManager<'_>) {
    let rounds = manager.rounds();
    if rounds.is_empty() {
        println!("No rounds for job #{}.", manager.job_id());
        return;
    }
    println!("{:<6} {:<10} {:<24} {:<10} {:>8} {:<6}", "ORDER", "ID", "NAME", "TYPE", "MINUTES", "ACTIVE");
    println!("{}", "-".repeat(69));
    for round in rounds {
        println!(
            "{:<6} {:<10} {:<24} {:<10} {:>8} {:<6}",
            round.draft.order,
            truncate(&round.id, 10),
            truncate(&round.draft.name, 22),
            round.draft.round_type,
            round.draft.duration,
            if round.draft.is_active { "yes" } else { "no" }
        );
    }
}

fn print_wizard(wizard: &ResumeWizard) {
    let stage = wizard.stage();
    println!("Step {} of 5 ({:?})", stage.step(), stage);
    if let Some(name) = &wizard.file_name {
        println!("File: {}", name);
    }
    if let Some(id) = &wizard.upload_id {
        println!("Upload ID: {}", id);
    }
    if let Some(text) = &wizard.parsed_text {
        println!("Parsed text: {} characters", text.chars().count());
    }
    if let Some(data) = &wizard.structured {
        println!("Structured fields: {}", data.len());
    }
    let next = match stage {
        WizardStage::Idle => "hireease resume upload <FILE>",
        WizardStage::Uploaded => "hireease resume parse",
        WizardStage::Parsed => "hireease resume structure",
        WizardStage::Structured => "hireease resume save",
        WizardStage::Saved => "done",
    };
    println!("Next: {}", next);
}

fn print_shortlist(result: &ShortlistResult) {
    if !result.message.is_empty() {
        println!("{}", result.message);
    }
    if result.rows.is_empty() {
        println!("No candidates matched.");
        return;
    }

    const MAX_WIDTH: usize = 24;
    let mut widths: Vec<usize> = result.headers.iter().map(|h| h.chars().count().min(MAX_WIDTH)).collect();
    for row in &result.rows {
        for (i, cell) in row.iter().enumerate() {
            let width = cell.chars().count().min(MAX_WIDTH);
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }

    let format_row = |cells: &[String]| {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", truncate(cell, *w), width = *w)
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", format_row(result.headers.as_slice()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &result.rows {
        println!("{}", format_row(row.as_slice()));
    }
    println!("\n{} row(s)", result.rows.len());
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Shortens `s` to at most `max` characters, ending in "..." when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Frontend Developer", 10), "Fronten...");
        assert_eq!(truncate("Ünïcödé résumé", 8), "Ünïcö...");
    }

    #[test]
    fn test_cli_parses_filters_and_pagination() {
        let cli = Cli::try_parse_from([
            "hireease",
            "shortlist",
            "--filter",
            "age>=30",
            "-f",
            "name contains Sam",
            "--limit",
            "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Shortlist { filters, limit, offset } => {
                assert_eq!(filters.len(), 2);
                assert_eq!(filters[0].column, "age");
                assert_eq!(limit, Some(10));
                assert_eq!(offset, None);
            }
            _ => panic!("expected shortlist"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["hireease", "applications", "set-status", "7", "pending"]).is_err());
    }

    #[test]
    fn test_cli_rounds_job_is_global() {
        let cli = Cli::try_parse_from(["hireease", "rounds", "create", "Phone screen", "--job", "42", "-t", "hr"]).unwrap();
        match cli.command {
            Commands::Rounds { job, command: RoundCommands::Create { round_type, .. } } => {
                assert_eq!(job.as_deref(), Some("42"));
                assert_eq!(round_type, RoundType::Hr);
            }
            _ => panic!("expected rounds create"),
        }
    }

    #[test]
    fn test_cli_parses_job_posting() {
        let cli = Cli::try_parse_from([
            "hireease", "jobs", "create", "Site Reliability Engineer",
            "-d", "Platform", "-l", "Remote", "--description", "Keep it up",
            "-t", "contract", "-s", "Rust", "-s", "Kubernetes", "--max-salary", "120000",
        ])
        .unwrap();
        match cli.command {
            Commands::Jobs {
                command: JobCommands::Create { title, employment_type, skills, max_salary, min_salary, benefits, .. },
            } => {
                assert_eq!(title, "Site Reliability Engineer");
                assert_eq!(employment_type, EmploymentType::Contract);
                assert_eq!(skills, vec!["Rust", "Kubernetes"]);
                assert_eq!(max_salary, 120000.0);
                assert_eq!(min_salary, 0.0);
                assert!(benefits.is_empty());
            }
            _ => panic!("expected jobs create"),
        }

        assert!(Cli::try_parse_from(["hireease", "jobs", "create", "x", "-d", "a", "-l", "b", "--description", "c", "-t", "gig"]).is_err());
    }
}
