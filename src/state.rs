use std::collections::BTreeMap;

use chrono::Weekday;

use crate::data::aggregate::{self, AgeSummary};
use crate::data::filter::{self, ChartId, FilterId, FilterState, init_filter_state};
use crate::data::model::{AgeGroup, AppointmentDataset, Attendance, WaitingGroup};

// ---------------------------------------------------------------------------
// Cached chart data
// ---------------------------------------------------------------------------

/// The aggregated datasets backing the six charts. Each entry is replaced
/// wholesale when its chart is recomputed; nothing is updated in place.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub attendance_split: BTreeMap<Attendance, u64>,
    pub age_summaries: Vec<AgeSummary>,
    pub weekday_counts: Vec<(Weekday, u64)>,
    pub chronic_counts: BTreeMap<(u8, Attendance), u64>,
    pub waiting_counts: BTreeMap<(WaitingGroup, Attendance), u64>,
    pub neighborhood_counts: BTreeMap<(String, Attendance), u64>,
}

/// Which central view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Table,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (immutable once set; replaced wholesale on re-load).
    pub dataset: Option<AppointmentDataset>,

    /// Selections for the two dashboard filters.
    pub filters: FilterState,

    /// Cached aggregates for the six charts.
    pub charts: ChartData,

    /// Active central view.
    pub view: View,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            charts: ChartData::default(),
            view: View::Dashboard,
            status_message: None,
        }
    }
}

impl AppState {
    /// State for a dataset loaded at startup.
    pub fn with_dataset(dataset: AppointmentDataset) -> Self {
        let mut state = Self::default();
        state.set_dataset(dataset);
        state
    }

    /// Ingest a newly loaded dataset: initialise the filters and compute
    /// every chart once.
    pub fn set_dataset(&mut self, dataset: AppointmentDataset) {
        self.filters = init_filter_state(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute_all();
    }

    /// Compute all six charts from scratch.
    pub fn recompute_all(&mut self) {
        for chart in [
            ChartId::AttendanceSplit,
            ChartId::AgeGender,
            ChartId::Weekly,
            ChartId::Chronic,
            ChartId::Waiting,
            ChartId::Neighborhood,
        ] {
            self.recompute(chart);
        }
    }

    /// Recompute only the charts that depend on the changed filter; the
    /// other charts keep their full-dataset aggregates.
    pub fn on_filter_changed(&mut self, filter: FilterId) {
        for &chart in filter.dependents() {
            self.recompute(chart);
        }
    }

    fn recompute(&mut self, chart: ChartId) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match chart {
            ChartId::AttendanceSplit => {
                self.charts.attendance_split = aggregate::attendance_split(&filter::all_records(ds));
            }
            ChartId::AgeGender => {
                let subset = filter::by_age_group(ds, &self.filters.age_groups);
                self.charts.age_summaries = aggregate::age_summaries(&subset);
            }
            ChartId::Weekly => {
                self.charts.weekday_counts = aggregate::weekday_counts(&filter::all_records(ds));
            }
            ChartId::Chronic => {
                self.charts.chronic_counts = aggregate::chronic_counts(&filter::all_records(ds));
            }
            ChartId::Waiting => {
                self.charts.waiting_counts = aggregate::waiting_counts(&filter::all_records(ds));
            }
            ChartId::Neighborhood => {
                let subset = filter::by_neighborhood(ds, &self.filters.neighborhoods);
                self.charts.neighborhood_counts = aggregate::neighborhood_counts(&subset);
            }
        }
    }

    // ---- Filter mutations (each triggers only its dependent charts) ----

    pub fn toggle_age_group(&mut self, group: AgeGroup) {
        if !self.filters.age_groups.remove(&group) {
            self.filters.age_groups.insert(group);
        }
        self.on_filter_changed(FilterId::AgeGroups);
    }

    pub fn toggle_neighborhood(&mut self, name: &str) {
        if !self.filters.neighborhoods.remove(name) {
            self.filters.neighborhoods.insert(name.to_string());
        }
        self.on_filter_changed(FilterId::Neighborhoods);
    }

    pub fn select_all_age_groups(&mut self) {
        self.filters.age_groups = AgeGroup::ALL.into_iter().collect();
        self.on_filter_changed(FilterId::AgeGroups);
    }

    pub fn select_no_age_groups(&mut self) {
        self.filters.age_groups.clear();
        self.on_filter_changed(FilterId::AgeGroups);
    }

    pub fn select_all_neighborhoods(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.neighborhoods = ds.neighborhoods.clone();
        }
        self.on_filter_changed(FilterId::Neighborhoods);
    }

    pub fn select_no_neighborhoods(&mut self) {
        self.filters.neighborhoods.clear();
        self.on_filter_changed(FilterId::Neighborhoods);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
