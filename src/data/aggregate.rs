use std::collections::BTreeMap;

use chrono::Weekday;

use super::model::{Appointment, Attendance, Gender, WaitingGroup};

// ---------------------------------------------------------------------------
// Aggregation operations – pure functions from a record subset to grouped
// counts, recomputed from scratch on every filter change
// ---------------------------------------------------------------------------

/// Count of records per attendance value.
pub fn attendance_split(records: &[&Appointment]) -> BTreeMap<Attendance, u64> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts.entry(r.attendance).or_insert(0) += 1;
    }
    counts
}

/// Count of records per weekday of the appointment, Monday through Sunday.
/// The calendar ordering here is an iteration order, not a data contract.
pub fn weekday_counts(records: &[&Appointment]) -> Vec<(Weekday, u64)> {
    let mut counts = [0u64; 7];
    for r in records {
        counts[r.weekday.num_days_from_monday() as usize] += 1;
    }
    let mut day = Weekday::Mon;
    let mut out = Vec::with_capacity(7);
    for &count in &counts {
        out.push((day, count));
        day = day.succ();
    }
    out
}

/// Count of records per (chronic-condition count, attendance) pair.
pub fn chronic_counts(records: &[&Appointment]) -> BTreeMap<(u8, Attendance), u64> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts
            .entry((r.chronic_conditions, r.attendance))
            .or_insert(0) += 1;
    }
    counts
}

/// Count of records per (waiting-days group, attendance) pair. Records
/// whose wait falls outside every bucket carry no group and are excluded.
pub fn waiting_counts(records: &[&Appointment]) -> BTreeMap<(WaitingGroup, Attendance), u64> {
    let mut counts = BTreeMap::new();
    for r in records {
        if let Some(group) = r.waiting_group {
            *counts.entry((group, r.attendance)).or_insert(0) += 1;
        }
    }
    counts
}

/// Count of records per (neighborhood, attendance) pair. The caller passes
/// the subset already restricted to the selected neighborhoods.
pub fn neighborhood_counts(records: &[&Appointment]) -> BTreeMap<(String, Attendance), u64> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts
            .entry((r.neighborhood.clone(), r.attendance))
            .or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Age distribution summaries (box-plot statistics)
// ---------------------------------------------------------------------------

/// Five-number summary of the ages in one (gender, attendance) group.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeSummary {
    pub gender: Gender,
    pub attendance: Attendance,
    pub count: u64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Per (gender, attendance) pair, the five-number summary of the ages.
/// Empty groups are omitted. Order: Female/Male × Show-up/No-show.
pub fn age_summaries(records: &[&Appointment]) -> Vec<AgeSummary> {
    let mut out = Vec::new();
    for gender in Gender::ALL {
        for attendance in Attendance::ALL {
            let mut ages: Vec<f64> = records
                .iter()
                .filter(|r| r.gender == gender && r.attendance == attendance)
                .map(|r| f64::from(r.age))
                .collect();
            if ages.is_empty() {
                continue;
            }
            ages.sort_by(f64::total_cmp);
            out.push(AgeSummary {
                gender,
                attendance,
                count: ages.len() as u64,
                min: ages[0],
                q1: quantile(&ages, 0.25),
                median: quantile(&ages, 0.5),
                q3: quantile(&ages, 0.75),
                max: ages[ages.len() - 1],
            });
        }
    }
    out
}

/// Quantile of a sorted, non-empty sample by linear interpolation.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AppointmentDataset, RawAppointment};

    fn raw(
        age: i32,
        gender: Gender,
        neighborhood: &str,
        attendance: Attendance,
        wait_days: i64,
    ) -> RawAppointment {
        let scheduled: chrono::DateTime<chrono::Utc> = "2016-04-29T08:00:00Z".parse().unwrap();
        RawAppointment {
            scheduled_at: scheduled,
            appointment_at: scheduled + chrono::Duration::days(wait_days),
            age,
            gender,
            neighborhood: neighborhood.to_string(),
            hypertension: 0,
            diabetes: 0,
            alcoholism: 0,
            handicap: 0,
            attendance,
        }
    }

    fn records() -> AppointmentDataset {
        AppointmentDataset::from_raw(vec![
            raw(10, Gender::Female, "A", Attendance::ShowedUp, 0),
            raw(20, Gender::Female, "A", Attendance::NoShow, 3),
            raw(30, Gender::Male, "B", Attendance::ShowedUp, 7),
            raw(40, Gender::Male, "B", Attendance::ShowedUp, 20),
            raw(50, Gender::Female, "C", Attendance::NoShow, 200),
        ])
    }

    fn refs(ds: &AppointmentDataset) -> Vec<&Appointment> {
        ds.records.iter().collect()
    }

    #[test]
    fn attendance_split_sums_to_row_count() {
        let ds = records();
        let split = attendance_split(&refs(&ds));
        assert_eq!(split[&Attendance::ShowedUp], 3);
        assert_eq!(split[&Attendance::NoShow], 2);
        assert_eq!(split.values().sum::<u64>(), ds.len() as u64);
    }

    #[test]
    fn weekday_counts_sum_to_row_count() {
        let ds = records();
        let counts = weekday_counts(&refs(&ds));
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0].0, Weekday::Mon);
        assert_eq!(counts[6].0, Weekday::Sun);
        let total: u64 = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, ds.len() as u64);
    }

    #[test]
    fn chronic_counts_sum_to_row_count() {
        let ds = records();
        let counts = chronic_counts(&refs(&ds));
        assert_eq!(counts.values().sum::<u64>(), ds.len() as u64);
        assert_eq!(counts[&(0, Attendance::ShowedUp)], 3);
    }

    #[test]
    fn waiting_counts_exclude_unbucketed_rows() {
        let ds = records();
        let counts = waiting_counts(&refs(&ds));
        // The 200-day wait has no bucket and is silently excluded.
        assert_eq!(counts.values().sum::<u64>(), ds.len() as u64 - 1);
        assert_eq!(counts[&(WaitingGroup::Days0To2, Attendance::ShowedUp)], 1);
        assert_eq!(counts[&(WaitingGroup::Days3To5, Attendance::NoShow)], 1);
        assert_eq!(counts[&(WaitingGroup::Days6To10, Attendance::ShowedUp)], 1);
        assert_eq!(counts[&(WaitingGroup::Days11To178, Attendance::ShowedUp)], 1);
    }

    #[test]
    fn neighborhood_counts_respect_selection() {
        let ds = records();
        let selected: std::collections::BTreeSet<String> =
            ["A", "B"].iter().map(|s| s.to_string()).collect();
        let subset = crate::data::filter::by_neighborhood(&ds, &selected);
        let counts = neighborhood_counts(&subset);

        let in_selection = ds
            .records
            .iter()
            .filter(|r| selected.contains(&r.neighborhood))
            .count() as u64;
        assert_eq!(counts.values().sum::<u64>(), in_selection);
        assert!(!counts.contains_key(&("C".to_string(), Attendance::NoShow)));
    }

    #[test]
    fn age_summaries_cover_every_nonempty_group() {
        let ds = records();
        let summaries = age_summaries(&refs(&ds));
        // Male/NoShow has no rows and is omitted.
        assert_eq!(summaries.len(), 3);
        let total: u64 = summaries.iter().map(|s| s.count).sum();
        assert_eq!(total, ds.len() as u64);

        let male_show = summaries
            .iter()
            .find(|s| s.gender == Gender::Male && s.attendance == Attendance::ShowedUp)
            .unwrap();
        assert_eq!(male_show.min, 30.0);
        assert_eq!(male_show.median, 35.0);
        assert_eq!(male_show.max, 40.0);
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.75), 3.25);
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);

        let single = [7.0];
        assert_eq!(quantile(&single, 0.5), 7.0);
    }
}
