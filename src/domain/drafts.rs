//! Form input for new records. Validated here, at the boundary, before anything is dispatched.

use crate::domain::{
    ActionStatus, ActionType, DomainError, Patient, PatientStatus, TriageLevel, WorkflowAction,
};
use uuid::Uuid;

/// Patient registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDraft {
    pub name: String,
    /// Raw text as typed.
    pub age: String,
    pub room: String,
    pub triage_level: TriageLevel,
    pub status: PatientStatus,
}

impl Default for PatientDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            room: String::new(),
            triage_level: TriageLevel::Stable,
            status: PatientStatus::Pending,
        }
    }
}

impl PatientDraft {
    pub fn into_patient(self, now_ms: i64) -> Result<Patient, DomainError> {
        let name = required(&self.name, "name")?;
        let age = self.age.trim().parse::<u32>().map_err(|_| {
            DomainError::Validation(format!("age must be a non-negative integer, got {:?}", self.age))
        })?;
        Ok(Patient {
            id: new_id(),
            name,
            age,
            triage_level: self.triage_level,
            status: self.status,
            room: self.room.trim().to_string(),
            admitted_at: now_ms,
        })
    }

    /// Form pre-filled from an existing record, for editing.
    pub fn from_patient(p: &Patient) -> Self {
        Self {
            name: p.name.clone(),
            age: p.age.to_string(),
            room: p.room.clone(),
            triage_level: p.triage_level,
            status: p.status,
        }
    }

    /// Validate the edited form onto `existing`, keeping its id and admission time.
    pub fn apply_to(self, existing: &Patient) -> Result<Patient, DomainError> {
        let mut p = self.into_patient(existing.admitted_at)?;
        p.id = existing.id.clone();
        Ok(p)
    }
}

/// Clinical action form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDraft {
    pub patient_id: String,
    pub title: String,
    pub kind: ActionType,
    pub details: String,
}

impl ActionDraft {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            title: String::new(),
            kind: ActionType::Er,
            details: String::new(),
        }
    }

    /// New actions start Pending, are routed to the department named by their type and
    /// attributed to `assigned_by` (the current user).
    pub fn into_action(self, assigned_by: &str, now_ms: i64) -> Result<WorkflowAction, DomainError> {
        let patient_id = required(&self.patient_id, "patient")?;
        let title = required(&self.title, "title")?;
        Ok(WorkflowAction {
            id: new_id(),
            patient_id,
            department: self.kind.as_str().to_string(),
            title,
            kind: self.kind,
            status: ActionStatus::Pending,
            timestamp: now_ms,
            details: self.details.trim().to_string(),
            assigned_by: assigned_by.to_string(),
        })
    }
}

fn required(value: &str, field: &str) -> Result<String, DomainError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(v.to_string())
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
