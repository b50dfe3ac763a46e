//! The dispatchable action set.
//!
//! Encoded as `{"type": "ADD_PATIENT", "payload": {...}}`. A tag outside the set
//! decodes to [`Action::Unknown`] whatever its payload, and the reducer treats it as a no-op.

use crate::domain::{AppState, Patient, ViewState, WorkflowAction};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetView(ViewState),
    AddAction(WorkflowAction),
    UpdateAction(WorkflowAction),
    AddPatient(Patient),
    UpdatePatient(Patient),
    /// Payload is the patient id.
    DeletePatient(String),
    LoadState(Box<AppState>),
    Unknown,
}

/// Tags that decode to a real variant. Must list every `Known` variant.
const KNOWN_TAGS: [&str; 7] = [
    "SET_VIEW",
    "ADD_ACTION",
    "UPDATE_ACTION",
    "ADD_PATIENT",
    "UPDATE_PATIENT",
    "DELETE_PATIENT",
    "LOAD_STATE",
];

/// Decoding mirror of [`Action`] without the catch-all.
#[derive(Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
enum Known {
    SetView(ViewState),
    AddAction(WorkflowAction),
    UpdateAction(WorkflowAction),
    AddPatient(Patient),
    UpdatePatient(Patient),
    DeletePatient(String),
    LoadState(Box<AppState>),
}

impl From<Known> for Action {
    fn from(k: Known) -> Self {
        match k {
            Known::SetView(v) => Action::SetView(v),
            Known::AddAction(a) => Action::AddAction(a),
            Known::UpdateAction(a) => Action::UpdateAction(a),
            Known::AddPatient(p) => Action::AddPatient(p),
            Known::UpdatePatient(p) => Action::UpdatePatient(p),
            Known::DeletePatient(id) => Action::DeletePatient(id),
            Known::LoadState(s) => Action::LoadState(s),
        }
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value.get("type").and_then(Value::as_str) {
            None => Err(de::Error::missing_field("type")),
            Some(tag) if !KNOWN_TAGS.contains(&tag) => Ok(Action::Unknown),
            Some(_) => Known::deserialize(value)
                .map(Action::from)
                .map_err(de::Error::custom),
        }
    }
}

impl Action {
    /// Wire tag, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::SetView(_) => "SET_VIEW",
            Action::AddAction(_) => "ADD_ACTION",
            Action::UpdateAction(_) => "UPDATE_ACTION",
            Action::AddPatient(_) => "ADD_PATIENT",
            Action::UpdatePatient(_) => "UPDATE_PATIENT",
            Action::DeletePatient(_) => "DELETE_PATIENT",
            Action::LoadState(_) => "LOAD_STATE",
            Action::Unknown => "UNKNOWN",
        }
    }

    pub fn load_state(state: AppState) -> Self {
        Action::LoadState(Box::new(state))
    }
}
