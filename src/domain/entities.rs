//! Domain entities. Pure data structures for the core business.
//!
//! Field names on the wire match the dashboard's stored snapshots, so an existing
//! `careflow_state` value keeps loading. All enums are closed: unknown values fail
//! deserialization instead of flowing into state.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A patient in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub triage_level: TriageLevel,
    pub status: PatientStatus,
    pub room: String,
    /// Milliseconds since epoch.
    #[serde(rename = "admittedAt")]
    pub admitted_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriageLevel {
    Critical,
    Urgent,
    Stable,
    Observing,
}

impl TriageLevel {
    pub const ALL: [TriageLevel; 4] = [
        TriageLevel::Critical,
        TriageLevel::Urgent,
        TriageLevel::Stable,
        TriageLevel::Observing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TriageLevel::Critical => "Critical",
            TriageLevel::Urgent => "Urgent",
            TriageLevel::Stable => "Stable",
            TriageLevel::Observing => "Observing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    Admitted,
    Discharged,
    Pending,
    Transfer,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 4] = [
        PatientStatus::Admitted,
        PatientStatus::Discharged,
        PatientStatus::Pending,
        PatientStatus::Transfer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Admitted => "Admitted",
            PatientStatus::Discharged => "Discharged",
            PatientStatus::Pending => "Pending",
            PatientStatus::Transfer => "Transfer",
        }
    }
}

/// A unit of clinical work logged against a patient and routed to a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAction {
    pub id: String,
    /// Not enforced: may point at a patient that has since been deleted.
    pub patient_id: String,
    pub department: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub status: ActionStatus,
    pub timestamp: i64,
    pub details: String,
    pub assigned_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Radiology,
    #[serde(rename = "ER")]
    Er,
    Pharmacy,
    Medicine,
    Cardiology,
    Notes,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::Radiology,
        ActionType::Er,
        ActionType::Pharmacy,
        ActionType::Medicine,
        ActionType::Cardiology,
        ActionType::Notes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Radiology => "Radiology",
            ActionType::Er => "ER",
            ActionType::Pharmacy => "Pharmacy",
            ActionType::Medicine => "Medicine",
            ActionType::Cardiology => "Cardiology",
            ActionType::Notes => "Notes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl ActionStatus {
    pub const ALL: [ActionStatus; 3] = [
        ActionStatus::Pending,
        ActionStatus::InProgress,
        ActionStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::Pending => "Pending",
            ActionStatus::InProgress => "In Progress",
            ActionStatus::Completed => "Completed",
        }
    }

    /// Next status in the Pending -> In Progress -> Completed flow. `None` once completed.
    pub fn next(self) -> Option<ActionStatus> {
        match self {
            ActionStatus::Pending => Some(ActionStatus::InProgress),
            ActionStatus::InProgress => Some(ActionStatus::Completed),
            ActionStatus::Completed => None,
        }
    }
}

/// Organizational unit with seeded workload counters. Read-only from the store's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub staff_count: u32,
    pub pending: u32,
    pub in_progress: u32,
    pub completed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Dashboard,
    Patients,
    Departments,
    Settings,
}

impl ViewState {
    pub const ALL: [ViewState; 4] = [
        ViewState::Dashboard,
        ViewState::Patients,
        ViewState::Departments,
        ViewState::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewState::Dashboard => "dashboard",
            ViewState::Patients => "patients",
            ViewState::Departments => "departments",
            ViewState::Settings => "settings",
        }
    }
}

/// Aggregate root. Owned by the store; replaced wholesale on snapshot load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub patients: Vec<Patient>,
    pub actions: Vec<WorkflowAction>,
    pub departments: Vec<Department>,
    pub active_view: ViewState,
    pub user_name: String,
}

impl AppState {
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn action(&self, id: &str) -> Option<&WorkflowAction> {
        self.actions.iter().find(|a| a.id == id)
    }
}

macro_rules! display_and_parse {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            /// Case-insensitive match on the display name; anything else is rejected.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DomainError::Validation(format!("unknown {}: {:?}", $what, s)))
            }
        }
    };
}

display_and_parse!(TriageLevel, "triage level");
display_and_parse!(PatientStatus, "patient status");
display_and_parse!(ActionType, "action type");
display_and_parse!(ActionStatus, "action status");
display_and_parse!(ViewState, "view");
