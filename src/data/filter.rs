use std::collections::BTreeSet;

use super::model::{AgeGroup, Appointment, AppointmentDataset};

// ---------------------------------------------------------------------------
// Filter state: which values are selected for each dashboard filter
// ---------------------------------------------------------------------------

/// Multi-select state for the two dashboard filters. An empty set means
/// "nothing selected": the dependent chart renders with zero rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub age_groups: BTreeSet<AgeGroup>,
    pub neighborhoods: BTreeSet<String>,
}

/// How many neighborhoods start selected, in sorted order.
pub const DEFAULT_NEIGHBORHOOD_SELECTION: usize = 10;

/// Initialise a [`FilterState`] for a freshly loaded dataset: every age
/// group selected, and the first [`DEFAULT_NEIGHBORHOOD_SELECTION`]
/// neighborhoods selected.
pub fn init_filter_state(dataset: &AppointmentDataset) -> FilterState {
    FilterState {
        age_groups: AgeGroup::ALL.into_iter().collect(),
        neighborhoods: dataset
            .neighborhoods
            .iter()
            .take(DEFAULT_NEIGHBORHOOD_SELECTION)
            .cloned()
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Read-only subset selection
// ---------------------------------------------------------------------------

/// Records whose age bucket is in the selection.
///
/// * Empty selection → empty subset.
/// * Records without an age bucket (age outside the defined brackets)
///   never match a selection.
pub fn by_age_group<'a>(
    dataset: &'a AppointmentDataset,
    selected: &BTreeSet<AgeGroup>,
) -> Vec<&'a Appointment> {
    dataset
        .records
        .iter()
        .filter(|r| r.age_group.is_some_and(|g| selected.contains(&g)))
        .collect()
}

/// Records whose neighborhood is in the selection.
pub fn by_neighborhood<'a>(
    dataset: &'a AppointmentDataset,
    selected: &BTreeSet<String>,
) -> Vec<&'a Appointment> {
    dataset
        .records
        .iter()
        .filter(|r| selected.contains(&r.neighborhood))
        .collect()
}

/// The full dataset as a subset (for the charts with no filter dependency).
pub fn all_records(dataset: &AppointmentDataset) -> Vec<&Appointment> {
    dataset.records.iter().collect()
}

// ---------------------------------------------------------------------------
// Filter → chart dependency wiring
// ---------------------------------------------------------------------------

/// The two filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterId {
    AgeGroups,
    Neighborhoods,
}

/// The six charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartId {
    AttendanceSplit,
    AgeGender,
    Weekly,
    Chronic,
    Waiting,
    Neighborhood,
}

impl FilterId {
    /// Charts that must be recomputed when this filter changes. Charts not
    /// listed under any filter are computed once over the full dataset and
    /// never change.
    pub const fn dependents(self) -> &'static [ChartId] {
        match self {
            FilterId::AgeGroups => &[ChartId::AgeGender],
            FilterId::Neighborhoods => &[ChartId::Neighborhood],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
