//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Reads state from the store, renders the active view and dispatches what the user picks.
//! Form input and the search term are transient UI state; only dispatched actions persist.

use crate::adapters::ui::render;
use crate::domain::{
    seed_state, Action, ActionDraft, ActionType, AppState, DomainError, Patient, PatientDraft,
    PatientStatus, TriageLevel, ViewState,
};
use crate::ports::InputPort;
use crate::usecases::persistence::decode_snapshot;
use crate::usecases::{queries, CareStore, SessionService};
use async_trait::async_trait;
use crossterm::style::Stylize;
use inquire::error::InquireResult;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Confirm, InquireError, Select, Text};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Prompt prefix and highlight colors shared by every prompt.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("+").with_fg(Color::LightCyan))
        .with_highlighted_option_prefix(Styled::new(">").with_fg(Color::LightRed));
    inquire::set_global_render_config(config);
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn notice(msg: &str) {
    println!("{}", msg.green());
}

fn complain(msg: &str) {
    println!("{}", msg.red());
}

/// Esc / Ctrl-C on a prompt.
fn cancelled(e: &InquireError) -> bool {
    matches!(
        e,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Unwrap a prompt result: `None` when the user backed out.
fn ask<T>(r: InquireResult<T>) -> Result<Option<T>, DomainError> {
    match r {
        Ok(v) => Ok(Some(v)),
        Err(e) if cancelled(&e) => Ok(None),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Go(ViewState),
    Search,
    ClearSearch,
    OpenPatient,
    RegisterPatient,
    LogAction,
    ExportSnapshot,
    ImportSnapshot,
    ResetDemo,
    SignOut,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Go(ViewState::Dashboard) => f.write_str("Go to Dashboard"),
            MenuItem::Go(ViewState::Patients) => f.write_str("Go to Patients"),
            MenuItem::Go(ViewState::Departments) => f.write_str("Go to Departments"),
            MenuItem::Go(ViewState::Settings) => f.write_str("Go to Settings"),
            MenuItem::Search => f.write_str("Search by name or room"),
            MenuItem::ClearSearch => f.write_str("Clear search"),
            MenuItem::OpenPatient => f.write_str("Open patient"),
            MenuItem::RegisterPatient => f.write_str("Register new patient"),
            MenuItem::LogAction => f.write_str("Log clinical action"),
            MenuItem::ExportSnapshot => f.write_str("Export snapshot to file"),
            MenuItem::ImportSnapshot => f.write_str("Import snapshot from file"),
            MenuItem::ResetDemo => f.write_str("Reset to demo data"),
            MenuItem::SignOut => f.write_str("Sign out"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

/// Options for the active view, followed by navigation to the other views.
fn menu_for(view: ViewState, searching: bool) -> Vec<MenuItem> {
    let mut items = match view {
        ViewState::Dashboard => vec![
            MenuItem::RegisterPatient,
            MenuItem::LogAction,
            MenuItem::OpenPatient,
        ],
        ViewState::Patients => {
            let mut v = vec![MenuItem::Search];
            if searching {
                v.push(MenuItem::ClearSearch);
            }
            v.extend([
                MenuItem::OpenPatient,
                MenuItem::RegisterPatient,
                MenuItem::LogAction,
            ]);
            v
        }
        ViewState::Departments => Vec::new(),
        ViewState::Settings => vec![
            MenuItem::ExportSnapshot,
            MenuItem::ImportSnapshot,
            MenuItem::ResetDemo,
            MenuItem::SignOut,
        ],
    };
    items.extend(
        ViewState::ALL
            .into_iter()
            .filter(|v| *v != view)
            .map(MenuItem::Go),
    );
    items.push(MenuItem::Quit);
    items
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailItem {
    Edit,
    LogAction,
    AdvanceAction,
    Delete,
    Back,
}

impl fmt::Display for DetailItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DetailItem::Edit => "Edit patient",
            DetailItem::LogAction => "Log action for this patient",
            DetailItem::AdvanceAction => "Advance an action's status",
            DetailItem::Delete => "Delete patient",
            DetailItem::Back => "Back",
        })
    }
}

/// Select option carrying a record id alongside its label.
struct Choice {
    id: String,
    label: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn patient_choices<'a>(patients: impl IntoIterator<Item = &'a Patient>) -> Vec<Choice> {
    patients
        .into_iter()
        .map(|p| Choice {
            id: p.id.clone(),
            label: format!("{} (room {}, {})", p.name, p.room, p.triage_level),
        })
        .collect()
}

fn cursor_of<T: PartialEq>(all: &[T], current: &T) -> usize {
    all.iter().position(|v| v == current).unwrap_or(0)
}

enum Step {
    Continue,
    Quit,
}

/// TUI adapter. Inquire prompts over the shared store.
pub struct TuiInputPort {
    store: Arc<CareStore>,
    session: Arc<SessionService>,
    data_dir: PathBuf,
    search: Mutex<String>,
}

impl TuiInputPort {
    pub fn new(store: Arc<CareStore>, session: Arc<SessionService>, data_dir: PathBuf) -> Self {
        Self {
            store,
            session,
            data_dir,
            search: Mutex::new(String::new()),
        }
    }

    fn search_term(&self) -> String {
        self.search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_search_term(&self, term: String) {
        *self.search.lock().unwrap_or_else(PoisonError::into_inner) = term;
    }

    /// Returns false if the user declined to sign in.
    async fn sign_in_gate(&self) -> Result<bool, DomainError> {
        println!("\n{}", "Clinical workflow, streamlined. Sign in to continue.".bold());
        let confirmed = ask(Confirm::new("Sign in?").with_default(true).prompt())?;
        if confirmed != Some(true) {
            return Ok(false);
        }
        self.session.sign_in().await?;
        Ok(true)
    }

    fn render(&self, state: &AppState) -> String {
        let now = now_ms();
        match state.active_view {
            ViewState::Dashboard => render::dashboard(state, now),
            ViewState::Patients => render::patient_list(state, &self.search_term(), now),
            ViewState::Departments => render::departments(state),
            ViewState::Settings => render::settings(state),
        }
    }

    async fn handle(&self, item: MenuItem) -> Result<Step, DomainError> {
        match item {
            MenuItem::Go(view) => {
                self.store.dispatch(Action::SetView(view));
            }
            MenuItem::Search => {
                let current = self.search_term();
                if let Some(term) = ask(
                    Text::new("Search by name or room:")
                        .with_default(&current)
                        .prompt(),
                )? {
                    self.set_search_term(term);
                }
            }
            MenuItem::ClearSearch => self.set_search_term(String::new()),
            MenuItem::OpenPatient => {
                let state = self.store.state();
                let term = self.search_term();
                let candidates = if state.active_view == ViewState::Patients {
                    queries::search_patients(&state, &term)
                } else {
                    state.patients.iter().collect()
                };
                if let Some(id) = self.pick_patient(candidates)? {
                    self.patient_detail(&id).await?;
                }
            }
            MenuItem::RegisterPatient => self.register_patient()?,
            MenuItem::LogAction => self.log_action(None)?,
            MenuItem::ExportSnapshot => self.export_snapshot().await?,
            MenuItem::ImportSnapshot => self.import_snapshot().await?,
            MenuItem::ResetDemo => self.reset_demo()?,
            MenuItem::SignOut => {
                self.session.sign_out().await?;
                notice("Signed out.");
            }
            MenuItem::Quit => return Ok(Step::Quit),
        }
        Ok(Step::Continue)
    }

    fn pick_patient(&self, candidates: Vec<&Patient>) -> Result<Option<String>, DomainError> {
        if candidates.is_empty() {
            complain("No patients to choose from.");
            return Ok(None);
        }
        let choice = ask(Select::new("Patient:", patient_choices(candidates)).prompt())?;
        Ok(choice.map(|c| c.id))
    }

    fn register_patient(&self) -> Result<(), DomainError> {
        let defaults = PatientDraft::default();
        let Some(name) = ask(Text::new("Full name:").prompt())? else {
            return Ok(());
        };
        let Some(age) = ask(Text::new("Age:").prompt())? else {
            return Ok(());
        };
        let Some(room) = ask(Text::new("Room:").prompt())? else {
            return Ok(());
        };
        let Some(triage_level) = ask(
            Select::new("Triage level:", TriageLevel::ALL.to_vec())
                .with_starting_cursor(cursor_of(&TriageLevel::ALL, &defaults.triage_level))
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(status) = ask(
            Select::new("Status:", PatientStatus::ALL.to_vec())
                .with_starting_cursor(cursor_of(&PatientStatus::ALL, &defaults.status))
                .prompt(),
        )?
        else {
            return Ok(());
        };

        let draft = PatientDraft {
            name,
            age,
            room,
            triage_level,
            status,
        };
        match draft.into_patient(now_ms()) {
            Ok(patient) => {
                info!(patient_id = %patient.id, "patient registered");
                let name = patient.name.clone();
                self.store.dispatch(Action::AddPatient(patient));
                notice(&format!("Registered {}.", name));
            }
            Err(e) => complain(&e.to_string()),
        }
        Ok(())
    }

    /// Log a new action. Prompts for the patient unless one is given.
    fn log_action(&self, patient_id: Option<&str>) -> Result<(), DomainError> {
        let state = self.store.state();
        let patient_id = match patient_id {
            Some(id) => id.to_string(),
            None => match self.pick_patient(state.patients.iter().collect())? {
                Some(id) => id,
                None => return Ok(()),
            },
        };
        let mut draft = ActionDraft::new(patient_id);
        let Some(title) = ask(Text::new("Title:").prompt())? else {
            return Ok(());
        };
        let Some(kind) = ask(
            Select::new("Department:", ActionType::ALL.to_vec())
                .with_starting_cursor(cursor_of(&ActionType::ALL, &draft.kind))
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(details) = ask(Text::new("Details:").prompt())? else {
            return Ok(());
        };
        draft.title = title;
        draft.kind = kind;
        draft.details = details;

        match draft.into_action(&state.user_name, now_ms()) {
            Ok(action) => {
                info!(action_id = %action.id, patient_id = %action.patient_id, kind = %action.kind, "action logged");
                self.store.dispatch(Action::AddAction(action));
                notice("Action logged.");
            }
            Err(e) => complain(&e.to_string()),
        }
        Ok(())
    }

    async fn patient_detail(&self, patient_id: &str) -> Result<(), DomainError> {
        loop {
            let state = self.store.state();
            let Some(patient) = state.patient(patient_id).cloned() else {
                return Ok(());
            };
            println!("\n{}", render::patient_detail(&state, &patient, now_ms()));

            let items = vec![
                DetailItem::Edit,
                DetailItem::LogAction,
                DetailItem::AdvanceAction,
                DetailItem::Delete,
                DetailItem::Back,
            ];
            let Some(item) = ask(Select::new("Patient action:", items).prompt())? else {
                return Ok(());
            };
            match item {
                DetailItem::Edit => self.edit_patient(&patient)?,
                DetailItem::LogAction => self.log_action(Some(patient_id))?,
                DetailItem::AdvanceAction => self.advance_action(&state, patient_id)?,
                DetailItem::Delete => {
                    let prompt = format!("Delete {}? Logged actions are kept.", patient.name);
                    if ask(Confirm::new(&prompt).with_default(false).prompt())? == Some(true) {
                        self.store.dispatch(Action::DeletePatient(patient.id.clone()));
                        info!(patient_id = %patient.id, "patient deleted");
                        notice("Patient removed.");
                        return Ok(());
                    }
                }
                DetailItem::Back => return Ok(()),
            }
        }
    }

    fn edit_patient(&self, patient: &Patient) -> Result<(), DomainError> {
        let mut draft = PatientDraft::from_patient(patient);
        let Some(name) = ask(Text::new("Full name:").with_default(&draft.name).prompt())? else {
            return Ok(());
        };
        let Some(age) = ask(Text::new("Age:").with_default(&draft.age).prompt())? else {
            return Ok(());
        };
        let Some(room) = ask(Text::new("Room:").with_default(&draft.room).prompt())? else {
            return Ok(());
        };
        let Some(triage_level) = ask(
            Select::new("Triage level:", TriageLevel::ALL.to_vec())
                .with_starting_cursor(cursor_of(&TriageLevel::ALL, &draft.triage_level))
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(status) = ask(
            Select::new("Status:", PatientStatus::ALL.to_vec())
                .with_starting_cursor(cursor_of(&PatientStatus::ALL, &draft.status))
                .prompt(),
        )?
        else {
            return Ok(());
        };
        draft.name = name;
        draft.age = age;
        draft.room = room;
        draft.triage_level = triage_level;
        draft.status = status;

        match draft.apply_to(patient) {
            Ok(updated) => {
                self.store.dispatch(Action::UpdatePatient(updated));
                notice("Patient updated.");
            }
            Err(e) => complain(&e.to_string()),
        }
        Ok(())
    }

    fn advance_action(&self, state: &AppState, patient_id: &str) -> Result<(), DomainError> {
        let open: Vec<Choice> = queries::patient_timeline(state, patient_id)
            .into_iter()
            .filter(|a| a.status.next().is_some())
            .map(|a| Choice {
                id: a.id.clone(),
                label: format!("{} [{}] {}", a.title, a.department, a.status),
            })
            .collect();
        if open.is_empty() {
            complain("No open actions for this patient.");
            return Ok(());
        }
        let Some(choice) = ask(Select::new("Action:", open).prompt())? else {
            return Ok(());
        };
        let Some(current) = state.action(&choice.id) else {
            return Ok(());
        };
        if let Some(next) = current.status.next() {
            let mut updated = current.clone();
            updated.status = next;
            self.store.dispatch(Action::UpdateAction(updated));
            notice(&format!("Marked {}.", next));
        }
        Ok(())
    }

    async fn export_snapshot(&self) -> Result<(), DomainError> {
        let default = self.data_dir.join("careflow-export.json");
        let Some(path) = ask(
            Text::new("Export to:")
                .with_default(&default.to_string_lossy())
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&*self.store.state())
            .map_err(|e| DomainError::Snapshot(e.to_string()))?;
        match tokio::fs::write(&path, json).await {
            Ok(()) => {
                info!(path = %path, "snapshot exported");
                notice(&format!("Exported to {}.", path));
            }
            Err(e) => complain(&format!("Export failed: {}", e)),
        }
        Ok(())
    }

    /// Replaces the whole state with a snapshot file. Unreadable files change nothing.
    async fn import_snapshot(&self) -> Result<(), DomainError> {
        let Some(path) = ask(Text::new("Import from:").prompt())? else {
            return Ok(());
        };
        let raw = match tokio::fs::read_to_string(path.trim()).await {
            Ok(raw) => raw,
            Err(e) => {
                complain(&format!("Cannot read {}: {}", path, e));
                return Ok(());
            }
        };
        match decode_snapshot(&raw) {
            Ok(snapshot) => {
                self.store.dispatch(Action::load_state(snapshot));
                info!(path = %path, "snapshot imported");
                notice("Snapshot loaded.");
            }
            Err(e) => {
                warn!(path = %path, error = %e, "rejected snapshot import");
                complain(&e.to_string());
            }
        }
        Ok(())
    }

    fn reset_demo(&self) -> Result<(), DomainError> {
        let confirmed = ask(
            Confirm::new("Replace all patients and actions with demo data?")
                .with_default(false)
                .prompt(),
        )?;
        if confirmed != Some(true) {
            return Ok(());
        }
        let mut seed = seed_state(now_ms());
        seed.user_name = self.store.state().user_name.clone();
        seed.active_view = ViewState::Settings;
        self.store.dispatch(Action::load_state(seed));
        notice("Demo data restored.");
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            if !self.session.is_authenticated().await? && !self.sign_in_gate().await? {
                return Ok(());
            }

            let state = self.store.state();
            println!("\n{}", self.render(&state));

            let searching = !self.search_term().trim().is_empty();
            let items = menu_for(state.active_view, searching);
            let Some(item) = ask(Select::new("What next?", items).prompt())? else {
                return Ok(());
            };
            if let Step::Quit = self.handle(item).await? {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_navigates_to_other_views_only() {
        for view in ViewState::ALL {
            let items = menu_for(view, false);
            assert!(!items.contains(&MenuItem::Go(view)));
            for other in ViewState::ALL.into_iter().filter(|v| *v != view) {
                assert!(items.contains(&MenuItem::Go(other)));
            }
            assert_eq!(items.last(), Some(&MenuItem::Quit));
        }
    }

    #[test]
    fn test_menu_view_specific_items() {
        assert!(menu_for(ViewState::Settings, false).contains(&MenuItem::SignOut));
        assert!(!menu_for(ViewState::Dashboard, false).contains(&MenuItem::SignOut));
        assert!(menu_for(ViewState::Patients, true).contains(&MenuItem::ClearSearch));
        assert!(!menu_for(ViewState::Patients, false).contains(&MenuItem::ClearSearch));
    }

    #[test]
    fn test_patient_choices_labels() {
        let state = seed_state(0);
        let choices = patient_choices(&state.patients);
        assert_eq!(choices.len(), 4);
        assert_eq!(choices[0].id, "p1");
        assert_eq!(choices[0].to_string(), "Elena Gilbert (room 204A, Critical)");
    }

    #[test]
    fn test_cursor_of() {
        assert_eq!(cursor_of(&TriageLevel::ALL, &TriageLevel::Stable), 2);
        assert_eq!(cursor_of(&ActionType::ALL, &ActionType::Er), 1);
    }
}
