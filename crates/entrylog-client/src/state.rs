//! View state and its pure derivations.
//!
//! Everything a UI needs to render (done/under-construction status per
//! building, the progress figure, the filtered list) is recomputed from the
//! record set on demand and never stored. The record set itself is the union
//! of confirmed records (fetched or optimistically applied) and records
//! still sitting in the offline queue.

use std::collections::HashSet;

use entrylog_shared::types::{Building, VisitRecord};

/// Where the application is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unauthenticated,
    /// A remote refresh is in flight.
    Loading,
    Ready,
}

/// Central application state.
#[derive(Debug)]
pub struct AppState {
    pub phase: Phase,

    /// Buildings to render, from the remote store, the cached snapshot, or
    /// the bundled fallback list.
    pub buildings: Vec<Building>,

    /// Records confirmed remotely, plus optimistically applied ones.
    pub confirmed: Vec<VisitRecord>,

    /// Records still waiting in the offline queue.
    pub queued: Vec<VisitRecord>,

    /// Banner message when the last refresh fell back to local data.
    pub degraded: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Unauthenticated,
            buildings: Vec::new(),
            confirmed: Vec::new(),
            queued: Vec::new(),
            degraded: None,
        }
    }

    // -- updates ---------------------------------------------------------

    /// Replace local data with a freshly fetched remote payload.
    pub fn apply_snapshot(&mut self, buildings: Vec<Building>, logs: Vec<VisitRecord>) {
        self.buildings = buildings;
        self.confirmed = logs;
        self.degraded = None;
        self.phase = Phase::Ready;
    }

    /// Fall back to cached or bundled data after a failed refresh.
    pub fn apply_fallback(
        &mut self,
        buildings: Vec<Building>,
        logs: Vec<VisitRecord>,
        reason: String,
    ) {
        self.buildings = buildings;
        self.confirmed = logs;
        self.degraded = Some(reason);
        self.phase = Phase::Ready;
    }

    /// Optimistically apply a record that was confirmed remotely.
    pub fn push_confirmed(&mut self, record: VisitRecord) {
        self.confirmed.push(record);
    }

    /// Optimistically apply a record that landed in the offline queue.
    pub fn push_queued(&mut self, record: VisitRecord) {
        self.queued.push(record);
    }

    /// Replace the queued view, e.g. after a drain.
    pub fn set_queued(&mut self, records: Vec<VisitRecord>) {
        self.queued = records;
    }

    // -- derivations -----------------------------------------------------

    fn records(&self) -> impl Iterator<Item = &VisitRecord> {
        self.confirmed.iter().chain(self.queued.iter())
    }

    /// Buildings with at least one record, confirmed or queued.
    pub fn done_set(&self) -> HashSet<&str> {
        self.records().map(|r| r.building_id.as_str()).collect()
    }

    /// Buildings with at least one record flagged under construction.
    pub fn construction_set(&self) -> HashSet<&str> {
        self.records()
            .filter(|r| r.under_construction)
            .map(|r| r.building_id.as_str())
            .collect()
    }

    pub fn is_done(&self, building_id: &str) -> bool {
        self.records().any(|r| r.building_id == building_id)
    }

    pub fn is_under_construction(&self, building_id: &str) -> bool {
        self.records()
            .any(|r| r.building_id == building_id && r.under_construction)
    }

    /// Share of listed buildings that are done, rounded to whole percent.
    /// Zero when there are no buildings.
    pub fn progress_percent(&self) -> u8 {
        if self.buildings.is_empty() {
            return 0;
        }
        let done_set = self.done_set();
        let done = self
            .buildings
            .iter()
            .filter(|b| done_set.contains(b.id.as_str()))
            .count();
        (100.0 * done as f64 / self.buildings.len() as f64).round() as u8
    }

    /// Case-insensitive substring match against building name or id.
    pub fn filter_buildings(&self, query: &str) -> Vec<&Building> {
        let needle = query.to_lowercase();
        self.buildings
            .iter()
            .filter(|b| {
                b.name.to_lowercase().contains(&needle) || b.id.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrylog_shared::types::Position;

    fn record(building_id: &str, under_construction: bool) -> VisitRecord {
        VisitRecord::new(
            "device-1",
            &Building::new(building_id, format!("Building {building_id}")),
            1,
            Position::new(40.0, -75.0, 8.0),
            under_construction,
        )
    }

    fn state_with_buildings(ids: &[&str]) -> AppState {
        let mut state = AppState::new();
        state.buildings = ids.iter().map(|id| Building::new(*id, format!("B {id}"))).collect();
        state
    }

    #[test]
    fn progress_is_zero_with_no_buildings() {
        let state = AppState::new();
        assert_eq!(state.progress_percent(), 0);
    }

    #[test]
    fn progress_rounds_to_whole_percent() {
        let mut state = state_with_buildings(&["A", "B", "C"]);
        state.push_confirmed(record("A", false));
        assert_eq!(state.progress_percent(), 33);

        state.push_confirmed(record("B", false));
        assert_eq!(state.progress_percent(), 67);
    }

    #[test]
    fn queued_records_count_as_done() {
        let mut state = state_with_buildings(&["A", "B"]);
        state.push_queued(record("A", false));

        assert!(state.is_done("A"));
        assert!(!state.is_done("B"));
        assert_eq!(state.progress_percent(), 50);
    }

    #[test]
    fn construction_set_tracks_flagged_records_only() {
        let mut state = state_with_buildings(&["A", "B"]);
        state.push_confirmed(record("A", true));
        state.push_confirmed(record("B", false));

        assert!(state.is_under_construction("A"));
        assert!(!state.is_under_construction("B"));
        assert_eq!(state.construction_set(), HashSet::from(["A"]));
    }

    #[test]
    fn records_outside_the_building_list_do_not_move_progress() {
        let mut state = state_with_buildings(&["A"]);
        state.push_confirmed(record("GHOST", false));
        assert_eq!(state.progress_percent(), 0);
    }

    #[test]
    fn search_matches_name_or_id_case_insensitively() {
        let mut state = AppState::new();
        state.buildings = vec![
            Building::new("LIB-01", "Main Library"),
            Building::new("ENG-01", "Engineering Building A"),
        ];

        let hits = state.filter_buildings("library");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "LIB-01");

        let hits = state.filter_buildings("eng-0");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "ENG-01");

        assert_eq!(state.filter_buildings("").len(), 2);
    }
}
