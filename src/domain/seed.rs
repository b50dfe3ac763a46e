//! Hardcoded seed used when no snapshot is stored (or the stored one is unreadable).

use crate::domain::{AppState, Department, Patient, PatientStatus, TriageLevel, ViewState};

pub const SEED_USER_NAME: &str = "Sarah Chen";

const HOUR_MS: i64 = 3_600_000;

fn department(
    id: &str,
    name: &str,
    staff: u32,
    pending: u32,
    in_progress: u32,
    completed: u32,
) -> Department {
    Department {
        id: id.to_string(),
        name: name.to_string(),
        staff_count: staff,
        pending,
        in_progress,
        completed,
    }
}

fn patient(
    id: &str,
    name: &str,
    age: u32,
    triage_level: TriageLevel,
    status: PatientStatus,
    room: &str,
    admitted_at: i64,
) -> Patient {
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        age,
        triage_level,
        status,
        room: room.to_string(),
        admitted_at,
    }
}

pub fn seed_departments() -> Vec<Department> {
    vec![
        department("1", "Radiology", 12, 4, 2, 45),
        department("2", "Emergency Room", 24, 15, 8, 120),
        department("3", "Pharmacy", 8, 32, 12, 210),
        department("4", "Internal Medicine", 18, 8, 5, 88),
        department("5", "Cardiology", 10, 3, 4, 34),
    ]
}

/// Demo state: four patients admitted relative to `now_ms`, five departments, no actions.
#[rustfmt::skip]
pub fn seed_state(now_ms: i64) -> AppState {
    AppState {
        patients: vec![
            patient("p1", "Elena Gilbert", 24, TriageLevel::Critical, PatientStatus::Admitted, "204A", now_ms - 2 * HOUR_MS),
            patient("p2", "Damon Salvatore", 31, TriageLevel::Stable, PatientStatus::Pending, "102B", now_ms - 5 * HOUR_MS),
            patient("p3", "Bonnie Bennett", 22, TriageLevel::Urgent, PatientStatus::Admitted, "305C", now_ms - HOUR_MS),
            patient("p4", "Alaric Saltzman", 45, TriageLevel::Observing, PatientStatus::Transfer, "401", now_ms - 8 * HOUR_MS),
        ],
        actions: Vec::new(),
        departments: seed_departments(),
        active_view: ViewState::Dashboard,
        user_name: SEED_USER_NAME.to_string(),
    }
}
