//! Plain-text views. Each function renders one screen from a state reference.

use crate::domain::{AppState, Department, Patient, WorkflowAction};
use crate::usecases::queries;
use chrono::{DateTime, Local};
use std::fmt::Write;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Elapsed time between two epoch-ms instants as "3h 05m" / "12m". Clamped at zero.
pub fn elapsed(now_ms: i64, then_ms: i64) -> String {
    let minutes = now_ms.saturating_sub(then_ms).max(0) / 60_000;
    let (h, m) = (minutes / 60, minutes % 60);
    if h == 0 {
        format!("{}m", m)
    } else {
        format!("{}h {:02}m", h, m)
    }
}

/// Local wall-clock time of day for an epoch-ms timestamp.
pub fn clock(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn patient_row(out: &mut String, p: &Patient, now_ms: i64) {
    let _ = writeln!(
        out,
        "  {:<20} {:>3}y  {:<9} {:<10} room {:<6} in {}",
        p.name,
        p.age,
        p.triage_level,
        p.status,
        p.room,
        elapsed(now_ms, p.admitted_at)
    );
}

fn department_row(out: &mut String, d: &Department) {
    let _ = writeln!(
        out,
        "  {:<18} {:>3} staff  queue {:>3}  active {:>3}  done {:>4}  ({:.0}% complete)",
        d.name,
        d.staff_count,
        d.pending,
        d.in_progress,
        d.completed,
        queries::completion_ratio(d) * 100.0
    );
}

fn action_row(out: &mut String, a: &WorkflowAction) {
    let _ = writeln!(
        out,
        "  {}  [{}] {:<11} {} ({})",
        clock(a.timestamp),
        a.department,
        a.status,
        a.title,
        a.assigned_by
    );
    if !a.details.is_empty() {
        let _ = writeln!(out, "         {}", a.details);
    }
}

pub fn dashboard(state: &AppState, now_ms: i64) -> String {
    let d = queries::dashboard(state);
    let mut out = String::new();
    let _ = writeln!(out, "Good shift, Dr. {}", d.greeting_name);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "  Patients {}   Critical {}   Open actions {}",
        d.patient_count, d.critical_count, d.open_actions
    );
    let _ = writeln!(out, "\nRecent patients");
    if d.recent_patients.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for p in d.recent_patients {
        patient_row(&mut out, p, now_ms);
    }
    let _ = writeln!(out, "\nSystem metrics");
    for dept in d.departments {
        department_row(&mut out, dept);
    }
    out
}

pub fn patient_list(state: &AppState, search: &str, now_ms: i64) -> String {
    let matches = queries::search_patients(state, search);
    let mut out = String::new();
    let _ = writeln!(out, "Patient Directory");
    let _ = writeln!(out, "{}", RULE);
    if search.trim().is_empty() {
        let _ = writeln!(out, "  Managing {} active clinical entries.", state.patients.len());
    } else {
        let _ = writeln!(
            out,
            "  {} of {} match {:?}",
            matches.len(),
            state.patients.len(),
            search.trim()
        );
    }
    for p in matches {
        patient_row(&mut out, p, now_ms);
    }
    out
}

pub fn patient_detail(state: &AppState, patient: &Patient, now_ms: i64) -> String {
    let timeline = queries::patient_timeline(state, &patient.id);
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}y), room {}", patient.name, patient.age, patient.room);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "  Triage {}   Status {}   Admitted {} ago",
        patient.triage_level,
        patient.status,
        elapsed(now_ms, patient.admitted_at)
    );
    let _ = writeln!(
        out,
        "  Awaiting {} open action(s).",
        queries::count_open(timeline.iter().copied())
    );
    let _ = writeln!(out, "\nTimeline");
    if timeline.is_empty() {
        let _ = writeln!(out, "  No actions logged for this patient yet.");
    }
    for a in timeline {
        action_row(&mut out, a);
    }
    out
}

pub fn departments(state: &AppState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Departments");
    let _ = writeln!(out, "{}", RULE);
    for d in &state.departments {
        department_row(&mut out, d);
    }
    out
}

pub fn settings(state: &AppState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Settings");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  Signed in as {}", state.user_name);
    let _ = writeln!(
        out,
        "  {} patients, {} actions, {} departments stored",
        state.patients.len(),
        state.actions.len(),
        state.departments.len()
    );
    out
}
