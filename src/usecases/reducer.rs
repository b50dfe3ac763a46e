//! Pure state transitions: `(state, action) -> state`.
//!
//! The input is never mutated. When an action changes nothing (unknown tag, update or
//! delete of an id that is not present) the same `Arc` is returned, so callers can
//! detect "no change" with `Arc::ptr_eq`.

use crate::domain::{Action, AppState};
use std::sync::Arc;

pub fn reduce(state: &Arc<AppState>, action: Action) -> Arc<AppState> {
    match action {
        Action::SetView(view) => with(state, |s| s.active_view = view),
        Action::AddAction(a) => with(state, |s| s.actions.insert(0, a)),
        Action::UpdateAction(a) => {
            if !state.actions.iter().any(|x| x.id == a.id) {
                return Arc::clone(state);
            }
            with(state, |s| {
                for slot in s.actions.iter_mut().filter(|x| x.id == a.id) {
                    *slot = a.clone();
                }
            })
        }
        Action::AddPatient(p) => with(state, |s| s.patients.insert(0, p)),
        Action::UpdatePatient(p) => {
            if !state.patients.iter().any(|x| x.id == p.id) {
                return Arc::clone(state);
            }
            with(state, |s| {
                for slot in s.patients.iter_mut().filter(|x| x.id == p.id) {
                    *slot = p.clone();
                }
            })
        }
        // Actions referencing the patient are left alone; see `delete_keeps_actions` below.
        Action::DeletePatient(id) => {
            if !state.patients.iter().any(|x| x.id == id) {
                return Arc::clone(state);
            }
            with(state, |s| s.patients.retain(|x| x.id != id))
        }
        Action::LoadState(snapshot) => Arc::new(*snapshot),
        Action::Unknown => Arc::clone(state),
    }
}

/// Copy-on-write: clone the current state, apply `f`, wrap the result.
fn with(state: &Arc<AppState>, f: impl FnOnce(&mut AppState)) -> Arc<AppState> {
    let mut next = AppState::clone(state);
    f(&mut next);
    Arc::new(next)
}
