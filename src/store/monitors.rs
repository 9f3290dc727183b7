//! Cached monitor list and the selected-monitor pointer.

use crate::api::Monitor;
use chrono::{DateTime, Utc};

/// Monitors as last reported by the backend.
///
/// `selected_id` is always `None` or the id of an element of `monitors`.
/// Every mutator below restores that before returning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorState {
    monitors: Vec<Monitor>,
    selected_id: Option<String>,
    /// Last successful list refresh.
    pub last_updated: Option<DateTime<Utc>>,
}

impl MonitorState {
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&Monitor> {
        let id = self.selected_id.as_deref()?;
        self.get(id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected_id.as_deref()?;
        self.monitors.iter().position(|m| m.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Replace the list with exactly what the server returned.
    pub fn replace_all(&mut self, monitors: Vec<Monitor>) {
        self.monitors = monitors;
        self.last_updated = Some(Utc::now());
        self.repair_selection();
    }

    /// Append a newly created monitor and make it the selection. A refresh
    /// may already have delivered it, in which case it is replaced in place.
    pub fn push_selected(&mut self, monitor: Monitor) {
        self.selected_id = Some(monitor.id.clone());
        if let Some(slot) = self.monitors.iter_mut().find(|m| m.id == monitor.id) {
            *slot = monitor;
        } else {
            self.monitors.push(monitor);
        }
    }

    /// Swap in the server's version of one monitor. Unknown ids are ignored.
    pub fn replace_one(&mut self, monitor: Monitor) -> bool {
        match self.monitors.iter_mut().find(|m| m.id == monitor.id) {
            Some(slot) => {
                *slot = monitor;
                true
            }
            None => false,
        }
    }

    /// Drop a monitor; if it was selected, fall back to the first remaining.
    pub fn remove(&mut self, id: &str) -> Option<Monitor> {
        let index = self.monitors.iter().position(|m| m.id == id)?;
        let removed = self.monitors.remove(index);
        self.repair_selection();
        Some(removed)
    }

    /// Select by id. Ids not in the list leave the selection unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.selected_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Move the selection by `delta` positions, clamped to the list.
    pub fn select_offset(&mut self, delta: i32) {
        if self.monitors.is_empty() {
            return;
        }
        let current = self.selected_index().unwrap_or(0) as i32;
        let max_index = self.monitors.len() as i32 - 1;
        let next = (current + delta).clamp(0, max_index) as usize;
        self.selected_id = Some(self.monitors[next].id.clone());
    }

    fn repair_selection(&mut self) {
        let valid = self
            .selected_id
            .as_deref()
            .is_some_and(|id| self.monitors.iter().any(|m| m.id == id));
        if !valid {
            self.selected_id = self.monitors.first().map(|m| m.id.clone());
        }
    }

    /// True when the selection invariant holds.
    pub fn selection_is_consistent(&self) -> bool {
        match self.selected_id.as_deref() {
            None => true,
            Some(id) => self.monitors.iter().any(|m| m.id == id),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{MonitorConfig, MonitorStatus};
    use pretty_assertions::assert_eq;

    pub(crate) fn monitor(id: &str, status: MonitorStatus) -> Monitor {
        Monitor {
            id: id.to_string(),
            name: format!("EA {id}"),
            status,
            config: MonitorConfig::default(),
            last_signal: None,
            last_price: None,
            indicator_values: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn ids(state: &MonitorState) -> Vec<&str> {
        state.monitors().iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_first_fetch_selects_first() {
        let mut state = MonitorState::default();
        state.replace_all(vec![monitor("a", MonitorStatus::Stopped)]);
        assert_eq!(state.selected_id(), Some("a"));
    }

    #[test]
    fn test_refresh_keeps_valid_selection() {
        let mut state = MonitorState::default();
        state.replace_all(vec![
            monitor("a", MonitorStatus::Stopped),
            monitor("b", MonitorStatus::Running),
        ]);
        assert!(state.select("b"));
        state.replace_all(vec![
            monitor("b", MonitorStatus::Running),
            monitor("c", MonitorStatus::Stopped),
        ]);
        assert_eq!(state.selected_id(), Some("b"));
    }

    #[test]
    fn test_refresh_drops_dangling_selection() {
        let mut state = MonitorState::default();
        state.replace_all(vec![monitor("a", MonitorStatus::Stopped)]);
        state.replace_all(vec![monitor("z", MonitorStatus::Stopped)]);
        assert_eq!(state.selected_id(), Some("z"));
        state.replace_all(Vec::new());
        assert_eq!(state.selected_id(), None);
    }

    #[test]
    fn test_created_monitor_already_listed_is_not_duplicated() {
        let mut state = MonitorState::default();
        state.replace_all(vec![
            monitor("a", MonitorStatus::Stopped),
            monitor("n", MonitorStatus::Stopped),
        ]);

        state.push_selected(monitor("n", MonitorStatus::Running));

        assert_eq!(ids(&state), vec!["a", "n"]);
        assert_eq!(state.selected_id(), Some("n"));
        assert_eq!(state.selected().map(|m| m.status), Some(MonitorStatus::Running));
    }

    #[test]
    fn test_delete_selected_falls_back_to_first() {
        let mut state = MonitorState::default();
        state.replace_all(vec![
            monitor("a", MonitorStatus::Stopped),
            monitor("b", MonitorStatus::Stopped),
        ]);
        state.remove("a");
        assert_eq!(ids(&state), vec!["b"]);
        assert_eq!(state.selected_id(), Some("b"));

        state.remove("b");
        assert_eq!(state.selected_id(), None);
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut state = MonitorState::default();
        state.replace_all(vec![
            monitor("a", MonitorStatus::Stopped),
            monitor("b", MonitorStatus::Stopped),
        ]);
        state.select("b");
        state.remove("a");
        assert_eq!(state.selected_id(), Some("b"));
        assert!(state.remove("missing").is_none());
    }

    #[test]
    fn test_push_selects_new_monitor() {
        let mut state = MonitorState::default();
        state.replace_all(vec![monitor("a", MonitorStatus::Stopped)]);
        state.push_selected(monitor("n", MonitorStatus::Stopped));
        assert_eq!(ids(&state), vec!["a", "n"]);
        assert_eq!(state.selected_id(), Some("n"));
    }

    #[test]
    fn test_select_unknown_is_ignored() {
        let mut state = MonitorState::default();
        state.replace_all(vec![monitor("a", MonitorStatus::Stopped)]);
        assert!(!state.select("nope"));
        assert_eq!(state.selected_id(), Some("a"));
    }

    #[test]
    fn test_select_offset_clamps() {
        let mut state = MonitorState::default();
        state.replace_all(vec![
            monitor("a", MonitorStatus::Stopped),
            monitor("b", MonitorStatus::Stopped),
            monitor("c", MonitorStatus::Stopped),
        ]);
        state.select_offset(10);
        assert_eq!(state.selected_id(), Some("c"));
        state.select_offset(-1);
        assert_eq!(state.selected_id(), Some("b"));
        state.select_offset(-10);
        assert_eq!(state.selected_id(), Some("a"));
    }

    #[test]
    fn test_selection_invariant_over_mixed_sequence() {
        let mut state = MonitorState::default();
        let steps: Vec<Box<dyn Fn(&mut MonitorState)>> = vec![
            Box::new(|s| s.replace_all(vec![monitor("a", MonitorStatus::Stopped)])),
            Box::new(|s| s.push_selected(monitor("b", MonitorStatus::Running))),
            Box::new(|s| {
                s.remove("b");
            }),
            Box::new(|s| s.replace_all(vec![monitor("c", MonitorStatus::Stopped)])),
            Box::new(|s| {
                s.select("a");
            }),
            Box::new(|s| {
                s.remove("c");
            }),
            Box::new(|s| s.push_selected(monitor("d", MonitorStatus::Stopped))),
            Box::new(|s| s.replace_all(Vec::new())),
        ];

        for step in steps {
            step(&mut state);
            assert!(state.selection_is_consistent(), "broken after step: {state:?}");
        }
    }
}
