use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::api::RecruitingApi;
use crate::apply::{ApplyPhase, ApplySequencer, ToggleOutcome, toggle_application};
use crate::db::Database;
use crate::models::{ApplicationStatus, Job};
use crate::store::{ApplicationStore, LoadSource, SavedJobs};
use crate::validate::ResumeFile;

/// Label shown while a submission is in flight. Both labels cover the same
/// request; the switch only marks the hand-off to server-side processing.
pub fn progress_label(phase: &ApplyPhase) -> Option<&'static str> {
    match phase {
        ApplyPhase::Uploading { .. } => Some("Uploading resume..."),
        ApplyPhase::AwaitingServerProcessing { .. } => Some("Processing resume with AI..."),
        _ => None,
    }
}

enum Notice {
    Info(String),
    Error(String),
}

struct AppState<'db> {
    jobs: Vec<Job>,
    selected: usize,
    scroll_offset: u16,
    store: ApplicationStore<'db>,
    saved: SavedJobs<'db>,
    notice: Option<Notice>,
}

impl<'db> AppState<'db> {
    fn new(jobs: Vec<Job>, store: ApplicationStore<'db>, saved: SavedJobs<'db>) -> Self {
        let notice = match store.source() {
            LoadSource::Cache { reason } => {
                Some(Notice::Error(format!("Showing cached applications ({})", reason)))
            }
            _ => None,
        };
        Self {
            jobs,
            selected: 0,
            scroll_offset: 0,
            store,
            saved,
            notice,
        }
    }

    fn current_job(&self) -> Option<&Job> {
        self.jobs.get(self.selected)
    }

    fn next(&mut self) {
        if !self.jobs.is_empty() && self.selected < self.jobs.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn toggle_saved(&mut self) {
        let Some(job) = self.current_job() else { return };
        let (id, title) = (job.id.clone(), job.title.clone());
        self.notice = Some(match self.saved.toggle(&id) {
            Ok(true) => Notice::Info(format!("Saved '{}'", title)),
            Ok(false) => Notice::Info(format!("Removed '{}' from saved jobs", title)),
            Err(e) => Notice::Error(format!("{:#}", e)),
        });
    }
}

/// Candidate dashboard: job list with application and saved markers, the
/// selected job's detail, and apply/save toggles.
pub fn run_browse(
    api: &dyn RecruitingApi,
    db: &Database,
    jobs: Vec<Job>,
    resume: Option<ResumeFile>,
) -> Result<()> {
    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    let store = ApplicationStore::load(api, db)?;
    let mut state = AppState::new(jobs, store, SavedJobs::load(db));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, api, resume.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState<'_>,
    api: &dyn RecruitingApi,
    resume: Option<&ResumeFile>,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));
    let mut sequencer = ApplySequencer::new(api);

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let prev_selected = state.selected;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('a') => {
                    if sequencer.is_busy() {
                        continue;
                    }
                    let Some(job) = state.current_job().cloned() else { continue };
                    let outcome = toggle_application(
                        &mut sequencer,
                        &job,
                        resume,
                        &mut state.store,
                        &mut |phase: &ApplyPhase| show_progress(terminal, phase),
                    );
                    state.notice = Some(match outcome {
                        Ok(ToggleOutcome::Applied(application)) => Notice::Info(format!(
                            "Applied to {} at {} (application {})",
                            application.position, application.company, application.id
                        )),
                        Ok(ToggleOutcome::Withdrawn(application)) => {
                            Notice::Info(format!("Withdrew application for {}", application.position))
                        }
                        Err(e) => Notice::Error(e.to_string()),
                    });
                }
                KeyCode::Char('s') => state.toggle_saved(),
                _ => {}
            }
            if state.selected != prev_selected {
                list_state.select(Some(state.selected));
            }
        }
    }
    Ok(())
}

fn status_icon(status: Option<ApplicationStatus>) -> &'static str {
    match status {
        None => " ",
        Some(ApplicationStatus::Applied) => "+",
        Some(ApplicationStatus::Screening) => "~",
        Some(ApplicationStatus::Interview) => "*",
        Some(ApplicationStatus::Hired) => "H",
        Some(ApplicationStatus::Rejected) => "x",
    }
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Applied => Style::default().fg(Color::Cyan),
        ApplicationStatus::Screening | ApplicationStatus::Interview => Style::default().fg(Color::Yellow),
        ApplicationStatus::Hired => Style::default().fg(Color::Green),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
    }
}

fn draw(frame: &mut Frame, state: &AppState<'_>, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let stats = state.store.stats();
    let header = Paragraph::new(format!(
        " Applications: {}  In progress: {}  Hired: {}  Rejected: {}  Saved: {}",
        stats.total,
        stats.in_progress,
        stats.hired,
        stats.rejected,
        state.saved.ids().len()
    ))
    .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    // Left panel: job list
    let items: Vec<ListItem> = state
        .jobs
        .iter()
        .map(|job| {
            let icon = status_icon(state.store.status_for(&job.id));
            let saved = if state.saved.contains(&job.id) { "s" } else { " " };
            ListItem::new(format!(
                "{}{} {} | {}",
                icon,
                saved,
                crate::truncate(&job.title, 30),
                job.company
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Jobs ({}) ", state.jobs.len()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = build_detail(state);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    if let Some(notice) = &state.notice {
        let (text, style) = match notice {
            Notice::Info(msg) => (msg.as_str(), Style::default().fg(Color::Green)),
            Notice::Error(msg) => (msg.as_str(), Style::default().fg(Color::Red)),
        };
        frame.render_widget(Paragraph::new(format!(" {}", text)).style(style), rows[2]);
    }

    let help = Paragraph::new(" j/k:navigate  J/K:scroll  a:apply/withdraw  s:save/unsave  q:quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[3]);
}

/// Redraws the whole screen with the in-flight label. A failed draw only
/// loses one frame, so it is logged and the submission carries on.
fn show_progress<B: Backend>(terminal: &mut Terminal<B>, phase: &ApplyPhase) {
    let (Some(label), Some(job)) = (progress_label(phase), phase.pending_job()) else {
        return;
    };
    if let Err(e) = terminal.draw(|frame| draw_progress(frame, job, label)) {
        tracing::debug!(error = %e, label, "failed to draw apply progress");
    }
}

fn draw_progress(frame: &mut Frame, job: &Job, label: &str) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(label.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} at {}", job.title, job.company),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Applying "));
    frame.render_widget(widget, frame.area());
}

fn build_detail<'a>(state: &'a AppState<'_>) -> Text<'a> {
    let Some(job) = state.current_job() else {
        return Text::raw("No job selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(
        &job.title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company)));
    if !job.location.is_empty() {
        lines.push(Line::from(format!("Location: {}", job.location)));
    }
    if let Some(poster) = &job.posted_by {
        lines.push(Line::from(format!("Posted by: {}", poster)));
    }
    if state.saved.contains(&job.id) {
        lines.push(Line::from(Span::styled("Saved", Style::default().fg(Color::Magenta))));
    }

    match state.store.find_by_job(&job.id) {
        Some(application) => {
            lines.push(Line::from(Span::styled(
                format!("Status: {}", application.status),
                status_style(application.status),
            )));
            lines.push(Line::from(format!("Applied: {}", application.applied_date)));
            if let Some(file) = &application.resume_filename {
                lines.push(Line::from(format!("Resume: {}", file)));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Not applied",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    lines.push(Line::from(""));

    if job.description.is_empty() {
        lines.push(Line::from(Span::styled(
            "(No description)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(&job.description, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    // Fields the service extracted from the submitted resume
    if let Some(data) = state
        .store
        .find_by_job(&job.id)
        .and_then(|a| a.structured_data.as_ref())
        .filter(|d| !d.is_empty())
    {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Extracted from resume",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (field, value) in data {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(Line::from(format!("  {}: {}", field, value)));
        }
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn job() -> Job {
        Job {
            id: "1".to_string(),
            title: "Frontend Developer".to_string(),
            company: "Acme Corp".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            posted_by: None,
        }
    }

    #[test]
    fn test_progress_labels_follow_phase() {
        assert_eq!(
            progress_label(&ApplyPhase::Uploading { job: job() }),
            Some("Uploading resume...")
        );
        assert_eq!(
            progress_label(&ApplyPhase::AwaitingServerProcessing { job: job() }),
            Some("Processing resume with AI...")
        );
        assert_eq!(progress_label(&ApplyPhase::Idle), None);
        assert_eq!(
            progress_label(&ApplyPhase::Failed { job: job(), message: "x".into() }),
            None
        );
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_show_progress_draws_in_flight_phases_only() {
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();

        show_progress(&mut terminal, &ApplyPhase::Idle);
        assert!(!screen_text(&terminal).contains("Applying"));

        show_progress(&mut terminal, &ApplyPhase::AwaitingServerProcessing { job: job() });
        let screen = screen_text(&terminal);
        assert!(screen.contains("Processing resume with AI..."));
        assert!(screen.contains("Frontend Developer at Acme Corp"));
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let db = Database::open_in_memory().unwrap();
        let mut state = AppState::new(
            vec![job(), job()],
            ApplicationStore::from_cache(&db),
            SavedJobs::load(&db),
        );
        state.prev();
        assert_eq!(state.selected, 0);
        state.next();
        state.next();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn test_toggle_saved_sets_notice() {
        let db = Database::open_in_memory().unwrap();
        let mut state = AppState::new(vec![job()], ApplicationStore::from_cache(&db), SavedJobs::load(&db));
        state.toggle_saved();
        assert!(state.saved.contains("1"));
        assert!(matches!(&state.notice, Some(Notice::Info(msg)) if msg == "Saved 'Frontend Developer'"));
    }
}
