use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categorical columns
// ---------------------------------------------------------------------------

/// Patient gender as encoded in the source table (`F` / `M`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F", alias = "Female")]
    Female,
    #[serde(rename = "M", alias = "Male")]
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The dependent variable: did the patient attend?
///
/// The source encodes this as a `No-show` column with values `Yes` (missed)
/// and `No` (attended). Never derived, always read from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attendance {
    #[serde(rename = "No")]
    ShowedUp,
    #[serde(rename = "Yes")]
    NoShow,
}

impl Attendance {
    pub const ALL: [Attendance; 2] = [Attendance::ShowedUp, Attendance::NoShow];

    pub fn label(self) -> &'static str {
        match self {
            Attendance::ShowedUp => "Show-up",
            Attendance::NoShow => "No-show",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Derived buckets
// ---------------------------------------------------------------------------

/// Age bucket on the boundaries `-1, 12, 18, 60, 120` (left-open intervals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeGroup {
    Kid,
    Teen,
    Adult,
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Kid,
        AgeGroup::Teen,
        AgeGroup::Adult,
        AgeGroup::Senior,
    ];

    /// Bucket an age. Ages outside `(-1, 120]` have no bucket.
    pub fn of(age: i32) -> Option<AgeGroup> {
        match age {
            0..=12 => Some(AgeGroup::Kid),
            13..=18 => Some(AgeGroup::Teen),
            19..=60 => Some(AgeGroup::Adult),
            61..=120 => Some(AgeGroup::Senior),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Kid => "Kid",
            AgeGroup::Teen => "Teen",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Waiting-time bucket, half-open on the right: `[0,2) [2,5) [5,10) [10,178)`.
///
/// Waits of 178 days or more fall outside every bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WaitingGroup {
    Days0To2,
    Days3To5,
    Days6To10,
    Days11To178,
}

impl WaitingGroup {
    pub const ALL: [WaitingGroup; 4] = [
        WaitingGroup::Days0To2,
        WaitingGroup::Days3To5,
        WaitingGroup::Days6To10,
        WaitingGroup::Days11To178,
    ];

    /// Bucket a (non-negative) waiting-day count.
    pub fn of(waiting_days: i64) -> Option<WaitingGroup> {
        match waiting_days {
            0..=1 => Some(WaitingGroup::Days0To2),
            2..=4 => Some(WaitingGroup::Days3To5),
            5..=9 => Some(WaitingGroup::Days6To10),
            10..=177 => Some(WaitingGroup::Days11To178),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaitingGroup::Days0To2 => "0-2",
            WaitingGroup::Days3To5 => "3-5",
            WaitingGroup::Days6To10 => "6-10",
            WaitingGroup::Days11To178 => "11-178",
        }
    }
}

impl fmt::Display for WaitingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full weekday name for chart labels.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// RawAppointment – one row of the source table
// ---------------------------------------------------------------------------

/// One source row, field names mapped from the input's column headers.
/// Columns not listed here (patient ids, SMS flags, …) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAppointment {
    #[serde(rename = "ScheduledDay")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "AppointmentDay")]
    pub appointment_at: DateTime<Utc>,
    #[serde(rename = "Age")]
    pub age: i32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Neighbourhood")]
    pub neighborhood: String,
    #[serde(rename = "Hipertension")]
    pub hypertension: u8,
    #[serde(rename = "Diabetes")]
    pub diabetes: u8,
    #[serde(rename = "Alcoholism")]
    pub alcoholism: u8,
    #[serde(rename = "Handcap")]
    pub handicap: u8,
    #[serde(rename = "No-show")]
    pub attendance: Attendance,
}

// ---------------------------------------------------------------------------
// Appointment – enriched record
// ---------------------------------------------------------------------------

/// An enriched appointment record: the source fields plus the derived
/// columns. Derivation is pure, so re-running it on the same source row
/// always yields the same values.
#[derive(Debug, Clone)]
pub struct Appointment {
    pub scheduled_at: DateTime<Utc>,
    pub appointment_at: DateTime<Utc>,
    pub age: i32,
    pub gender: Gender,
    pub neighborhood: String,
    pub hypertension: u8,
    pub diabetes: u8,
    pub alcoholism: u8,
    pub handicap: u8,
    pub attendance: Attendance,

    /// Calendar days between scheduling and appointment, clamped at zero.
    pub waiting_days: i64,
    /// `None` when `waiting_days >= 178`.
    pub waiting_group: Option<WaitingGroup>,
    /// Weekday of the appointment itself.
    pub weekday: Weekday,
    /// Sum of the four chronic indicators.
    pub chronic_conditions: u8,
    /// `None` for ages outside `(-1, 120]`.
    pub age_group: Option<AgeGroup>,
}

/// Calendar days from scheduling to appointment, clamped at zero.
/// Negative raw differences are data errors in the source; they are kept
/// as same-day appointments rather than dropped.
pub fn waiting_days(scheduled_at: DateTime<Utc>, appointment_at: DateTime<Utc>) -> i64 {
    (appointment_at.date_naive() - scheduled_at.date_naive())
        .num_days()
        .max(0)
}

impl Appointment {
    /// Enrich a source row with the derived columns.
    pub fn from_raw(raw: RawAppointment) -> Self {
        let waiting_days = waiting_days(raw.scheduled_at, raw.appointment_at);
        Appointment {
            waiting_group: WaitingGroup::of(waiting_days),
            weekday: raw.appointment_at.weekday(),
            chronic_conditions: raw.hypertension + raw.diabetes + raw.alcoholism + raw.handicap,
            age_group: AgeGroup::of(raw.age),
            waiting_days,
            scheduled_at: raw.scheduled_at,
            appointment_at: raw.appointment_at,
            age: raw.age,
            gender: raw.gender,
            neighborhood: raw.neighborhood,
            hypertension: raw.hypertension,
            diabetes: raw.diabetes,
            alcoholism: raw.alcoholism,
            handicap: raw.handicap,
            attendance: raw.attendance,
        }
    }
}

// ---------------------------------------------------------------------------
// AppointmentDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full enriched dataset. Immutable after loading: filters produce
/// read-only subsets, never mutations.
#[derive(Debug, Clone)]
pub struct AppointmentDataset {
    /// All records, in source order.
    pub records: Vec<Appointment>,
    /// Sorted unique neighborhood names.
    pub neighborhoods: BTreeSet<String>,
}

impl AppointmentDataset {
    /// Enrich the raw rows (row-wise, no row dropped or reordered) and
    /// index the unique neighborhoods.
    pub fn from_raw(raws: Vec<RawAppointment>) -> Self {
        let records: Vec<Appointment> = raws.into_iter().map(Appointment::from_raw).collect();
        let neighborhoods = records
            .iter()
            .map(|r| r.neighborhood.clone())
            .collect::<BTreeSet<String>>();
        AppointmentDataset {
            records,
            neighborhoods,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(scheduled: &str, appointment: &str) -> RawAppointment {
        RawAppointment {
            scheduled_at: scheduled.parse().unwrap(),
            appointment_at: appointment.parse().unwrap(),
            age: 30,
            gender: Gender::Female,
            neighborhood: "CENTRO".to_string(),
            hypertension: 0,
            diabetes: 0,
            alcoholism: 0,
            handicap: 0,
            attendance: Attendance::ShowedUp,
        }
    }

    #[test]
    fn age_bucket_boundaries() {
        assert_eq!(AgeGroup::of(0), Some(AgeGroup::Kid));
        assert_eq!(AgeGroup::of(12), Some(AgeGroup::Kid));
        assert_eq!(AgeGroup::of(13), Some(AgeGroup::Teen));
        assert_eq!(AgeGroup::of(18), Some(AgeGroup::Teen));
        assert_eq!(AgeGroup::of(19), Some(AgeGroup::Adult));
        assert_eq!(AgeGroup::of(60), Some(AgeGroup::Adult));
        assert_eq!(AgeGroup::of(61), Some(AgeGroup::Senior));
        assert_eq!(AgeGroup::of(120), Some(AgeGroup::Senior));
    }

    #[test]
    fn out_of_range_ages_have_no_bucket() {
        assert_eq!(AgeGroup::of(-1), None);
        assert_eq!(AgeGroup::of(121), None);
    }

    #[test]
    fn waiting_bucket_boundaries() {
        assert_eq!(WaitingGroup::of(0), Some(WaitingGroup::Days0To2));
        assert_eq!(WaitingGroup::of(1), Some(WaitingGroup::Days0To2));
        assert_eq!(WaitingGroup::of(2), Some(WaitingGroup::Days3To5));
        assert_eq!(WaitingGroup::of(4), Some(WaitingGroup::Days3To5));
        assert_eq!(WaitingGroup::of(5), Some(WaitingGroup::Days6To10));
        assert_eq!(WaitingGroup::of(9), Some(WaitingGroup::Days6To10));
        assert_eq!(WaitingGroup::of(10), Some(WaitingGroup::Days11To178));
        assert_eq!(WaitingGroup::of(177), Some(WaitingGroup::Days11To178));
        assert_eq!(WaitingGroup::of(178), None);
        assert_eq!(WaitingGroup::of(400), None);
    }

    #[test]
    fn bucketing_is_deterministic() {
        for age in -5..130 {
            assert_eq!(AgeGroup::of(age), AgeGroup::of(age));
        }
        for days in 0..200 {
            assert_eq!(WaitingGroup::of(days), WaitingGroup::of(days));
        }
    }

    #[test]
    fn same_day_appointment_waits_zero_days() {
        let r = Appointment::from_raw(raw("2016-04-29T18:38:08Z", "2016-04-29T00:00:00Z"));
        assert_eq!(r.waiting_days, 0);
        assert_eq!(r.waiting_group, Some(WaitingGroup::Days0To2));
    }

    #[test]
    fn negative_raw_difference_clamps_to_zero() {
        // Appointment booked after the appointment date: a source data error,
        // kept as waiting_days = 0.
        let r = Appointment::from_raw(raw("2016-05-02T10:00:00Z", "2016-04-29T00:00:00Z"));
        assert_eq!(r.waiting_days, 0);
    }

    #[test]
    fn chronic_count_is_sum_of_flags() {
        let mut r = raw("2016-04-29T08:00:00Z", "2016-05-03T00:00:00Z");
        r.hypertension = 1;
        r.diabetes = 1;
        r.alcoholism = 0;
        r.handicap = 1;
        let enriched = Appointment::from_raw(r);
        assert_eq!(enriched.chronic_conditions, 3);
        assert!(enriched.chronic_conditions <= 4);
    }

    #[test]
    fn weekday_follows_appointment_date() {
        // 2016-05-03 was a Tuesday.
        let r = Appointment::from_raw(raw("2016-04-29T08:00:00Z", "2016-05-03T00:00:00Z"));
        assert_eq!(r.weekday, Weekday::Tue);
        assert_eq!(day_name(r.weekday), "Tuesday");
        assert_eq!(r.waiting_days, 4);
        assert_eq!(r.waiting_group, Some(WaitingGroup::Days3To5));
    }

    #[test]
    fn dataset_preserves_order_and_indexes_neighborhoods() {
        let mut a = raw("2016-04-29T08:00:00Z", "2016-04-29T00:00:00Z");
        a.neighborhood = "B".to_string();
        let mut b = raw("2016-04-29T09:00:00Z", "2016-04-30T00:00:00Z");
        b.neighborhood = "A".to_string();
        let ds = AppointmentDataset::from_raw(vec![a, b]);

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].neighborhood, "B");
        assert_eq!(ds.records[1].neighborhood, "A");
        let names: Vec<&String> = ds.neighborhoods.iter().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn timestamps_parse_from_rfc3339() {
        let r = raw("2016-04-29T18:38:08Z", "2016-04-29T00:00:00Z");
        assert_eq!(
            r.scheduled_at,
            Utc.with_ymd_and_hms(2016, 4, 29, 18, 38, 8).unwrap()
        );
    }
}
