//! Read-only selectors over AppState, used by the views. Nothing here dispatches.

use crate::domain::{ActionStatus, AppState, Department, Patient, TriageLevel, WorkflowAction};

/// How many patients / departments the dashboard previews.
pub const DASHBOARD_PREVIEW: usize = 4;

#[derive(Debug)]
pub struct DashboardSummary<'a> {
    /// First word of the user's display name.
    pub greeting_name: &'a str,
    pub patient_count: usize,
    pub critical_count: usize,
    pub open_actions: usize,
    pub recent_patients: &'a [Patient],
    pub departments: &'a [Department],
}

pub fn dashboard(state: &AppState) -> DashboardSummary<'_> {
    DashboardSummary {
        greeting_name: state.user_name.split_whitespace().next().unwrap_or(""),
        patient_count: state.patients.len(),
        critical_count: state
            .patients
            .iter()
            .filter(|p| p.triage_level == TriageLevel::Critical)
            .count(),
        open_actions: count_open(&state.actions),
        recent_patients: &state.patients[..state.patients.len().min(DASHBOARD_PREVIEW)],
        departments: &state.departments[..state.departments.len().min(DASHBOARD_PREVIEW)],
    }
}

/// Case-insensitive substring match on name or room. A blank term matches everyone.
pub fn search_patients<'a>(state: &'a AppState, term: &str) -> Vec<&'a Patient> {
    let needle = term.trim().to_lowercase();
    state
        .patients
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.room.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Actions logged against `patient_id`, newest first.
pub fn patient_timeline<'a>(state: &'a AppState, patient_id: &str) -> Vec<&'a WorkflowAction> {
    let mut out: Vec<&WorkflowAction> = state
        .actions
        .iter()
        .filter(|a| a.patient_id == patient_id)
        .collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}

/// Actions not yet completed.
pub fn count_open<'a>(actions: impl IntoIterator<Item = &'a WorkflowAction>) -> usize {
    actions
        .into_iter()
        .filter(|a| a.status != ActionStatus::Completed)
        .count()
}

/// Share of a department's logged work that is completed, 0.0 ..= 1.0.
pub fn completion_ratio(dept: &Department) -> f64 {
    let total = u64::from(dept.pending) + u64::from(dept.in_progress) + u64::from(dept.completed);
    if total == 0 {
        return 0.0;
    }
    dept.completed as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{seed_state, ActionType};

    fn action(id: &str, patient_id: &str, ts: i64, status: ActionStatus) -> WorkflowAction {
        WorkflowAction {
            id: id.into(),
            patient_id: patient_id.into(),
            department: "Pharmacy".into(),
            title: "Dispense".into(),
            kind: ActionType::Pharmacy,
            status,
            timestamp: ts,
            details: String::new(),
            assigned_by: "Sarah Chen".into(),
        }
    }

    #[test]
    fn test_dashboard_on_seed() {
        let mut state = seed_state(0);
        state.actions = vec![
            action("a1", "p1", 1, ActionStatus::Pending),
            action("a2", "p1", 2, ActionStatus::Completed),
        ];
        let d = dashboard(&state);
        assert_eq!(d.greeting_name, "Sarah");
        assert_eq!(d.patient_count, 4);
        assert_eq!(d.critical_count, 1);
        assert_eq!(d.open_actions, 1);
        assert_eq!(d.recent_patients.len(), 4);
        assert_eq!(d.departments.len(), 4);
        assert_eq!(d.departments[0].name, "Radiology");
    }

    #[test]
    fn test_dashboard_on_empty_state() {
        let mut state = seed_state(0);
        state.patients.clear();
        state.departments.clear();
        state.user_name.clear();
        let d = dashboard(&state);
        assert_eq!(d.greeting_name, "");
        assert!(d.recent_patients.is_empty());
        assert!(d.departments.is_empty());
    }

    #[test]
    fn test_search_by_name_or_room() {
        let state = seed_state(0);
        let ids = |term: &str| -> Vec<String> {
            search_patients(&state, term).iter().map(|p| p.id.clone()).collect()
        };
        assert_eq!(ids("bonnie"), ["p3"]);
        assert_eq!(ids("102b"), ["p2"]);
        assert_eq!(ids("  "), ["p1", "p2", "p3", "p4"]);
        assert!(ids("zzz").is_empty());
    }

    #[test]
    fn test_timeline_newest_first_and_dangling_ok() {
        let mut state = seed_state(0);
        state.actions = vec![
            action("a1", "p1", 10, ActionStatus::Pending),
            action("a2", "p2", 30, ActionStatus::Pending),
            action("a3", "p1", 20, ActionStatus::InProgress),
            action("a4", "gone", 5, ActionStatus::Pending),
        ];
        let ids: Vec<&str> = patient_timeline(&state, "p1").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a3", "a1"]);
        assert_eq!(patient_timeline(&state, "gone").len(), 1);
        assert_eq!(count_open(patient_timeline(&state, "p1")), 2);
    }

    #[test]
    fn test_completion_ratio() {
        let state = seed_state(0);
        let radiology = &state.departments[0];
        assert!((completion_ratio(radiology) - 45.0 / 51.0).abs() < 1e-9);
        let mut empty = radiology.clone();
        empty.pending = 0;
        empty.in_progress = 0;
        empty.completed = 0;
        assert_eq!(completion_ratio(&empty), 0.0);
    }
}
