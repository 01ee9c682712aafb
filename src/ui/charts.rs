use eframe::egui::{ScrollArea, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot};

use crate::color;
use crate::data::model::{Attendance, Gender, WaitingGroup, day_name};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel): the six charts in a scrollable column
// ---------------------------------------------------------------------------

pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to view charts  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            attendance_split(ui, state);
            age_gender(ui, state);
            weekly(ui, state);
            chronic(ui, state);
            waiting(ui, state);
            neighborhood(ui, state);
        });
}

/// Axis formatter for categorical x axes: label integer positions, hide
/// the fractional grid marks.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 0.05 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// 1. Overall attendance
// ---------------------------------------------------------------------------

fn attendance_split(ui: &mut Ui, state: &AppState) {
    ui.heading("No-show vs Show-up Distribution");

    let bars: Vec<Bar> = state
        .charts
        .attendance_split
        .iter()
        .enumerate()
        .map(|(i, (&attendance, &count))| {
            Bar::new(i as f64, count as f64)
                .name(attendance.label())
                .fill(color::attendance_color(attendance))
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = state
        .charts
        .attendance_split
        .keys()
        .map(|a| a.label().to_string())
        .collect();

    Plot::new("attendance_split")
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_label("Appointments")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
    ui.add_space(24.0);
}

// ---------------------------------------------------------------------------
// 2. Age distribution by gender and attendance (box plot)
// ---------------------------------------------------------------------------

fn age_gender(ui: &mut Ui, state: &AppState) {
    ui.heading("Age Distribution by Gender and Attendance");

    let mut show_boxes = Vec::new();
    let mut no_show_boxes = Vec::new();

    for summary in &state.charts.age_summaries {
        let gender_slot = Gender::ALL
            .iter()
            .position(|&g| g == summary.gender)
            .unwrap_or(0) as f64;
        // Offset the two attendance boxes around the gender position.
        let offset = match summary.attendance {
            Attendance::ShowedUp => -0.18,
            Attendance::NoShow => 0.18,
        };
        let fill = color::attendance_color(summary.attendance).gamma_multiply(0.4);
        let stroke = Stroke::new(1.5, color::attendance_color(summary.attendance));
        let elem = BoxElem::new(
            gender_slot + offset,
            BoxSpread::new(
                summary.min,
                summary.q1,
                summary.median,
                summary.q3,
                summary.max,
            ),
        )
        .name(format!("{} · {}", summary.gender, summary.attendance))
        .fill(fill)
        .stroke(stroke)
        .box_width(0.25)
        .whisker_width(0.15);

        match summary.attendance {
            Attendance::ShowedUp => show_boxes.push(elem),
            Attendance::NoShow => no_show_boxes.push(elem),
        }
    }

    let labels: Vec<String> = Gender::ALL.iter().map(|g| g.label().to_string()).collect();

    Plot::new("age_gender")
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_label("Age")
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(show_boxes).name(Attendance::ShowedUp.label()));
            plot_ui.box_plot(BoxPlot::new(no_show_boxes).name(Attendance::NoShow.label()));
        });
    ui.add_space(24.0);
}

// ---------------------------------------------------------------------------
// 3. Weekly pattern
// ---------------------------------------------------------------------------

fn weekly(ui: &mut Ui, state: &AppState) {
    ui.heading("Appointments by Day of Week");

    let palette = color::generate_palette(state.charts.weekday_counts.len());
    let bars: Vec<Bar> = state
        .charts
        .weekday_counts
        .iter()
        .enumerate()
        .map(|(i, &(day, count))| {
            Bar::new(i as f64, count as f64)
                .name(day_name(day))
                .fill(palette[i])
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = state
        .charts
        .weekday_counts
        .iter()
        .map(|&(day, _)| day_name(day).to_string())
        .collect();

    Plot::new("weekly")
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_label("Appointments")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
    ui.add_space(24.0);
}

// ---------------------------------------------------------------------------
// 4. Chronic conditions (stacked)
// ---------------------------------------------------------------------------

fn chronic(ui: &mut Ui, state: &AppState) {
    ui.heading("Impact of Chronic Conditions");

    let count_of = |conditions: u8, attendance: Attendance| -> f64 {
        state
            .charts
            .chronic_counts
            .get(&(conditions, attendance))
            .copied()
            .unwrap_or(0) as f64
    };

    let make_bars = |attendance: Attendance| -> Vec<Bar> {
        (0u8..=4)
            .map(|n| {
                Bar::new(f64::from(n), count_of(n, attendance))
                    .name(format!("{n} conditions"))
                    .width(0.6)
            })
            .collect()
    };

    let labels: Vec<String> = (0..=4).map(|n: i32| n.to_string()).collect();
    let show_chart = BarChart::new(make_bars(Attendance::ShowedUp))
        .name(Attendance::ShowedUp.label())
        .color(color::SHOW_UP);
    let no_show_chart = BarChart::new(make_bars(Attendance::NoShow))
        .name(Attendance::NoShow.label())
        .color(color::NO_SHOW)
        .stack_on(&[&show_chart]);

    Plot::new("chronic")
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_label("Appointments")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(show_chart);
            plot_ui.bar_chart(no_show_chart);
        });
    ui.add_space(24.0);
}

// ---------------------------------------------------------------------------
// 5. Waiting time (grouped)
// ---------------------------------------------------------------------------

fn waiting(ui: &mut Ui, state: &AppState) {
    ui.heading("Delay Between Scheduling and Appointment");

    let count_of = |group: WaitingGroup, attendance: Attendance| -> f64 {
        state
            .charts
            .waiting_counts
            .get(&(group, attendance))
            .copied()
            .unwrap_or(0) as f64
    };

    let make_bars = |attendance: Attendance, offset: f64| -> Vec<Bar> {
        WaitingGroup::ALL
            .iter()
            .enumerate()
            .map(|(i, &group)| {
                Bar::new(i as f64 + offset, count_of(group, attendance))
                    .name(format!("{group} days"))
                    .width(0.35)
            })
            .collect()
    };

    let labels: Vec<String> = WaitingGroup::ALL
        .iter()
        .map(|g| g.label().to_string())
        .collect();
    let show_chart = BarChart::new(make_bars(Attendance::ShowedUp, -0.2))
        .name(Attendance::ShowedUp.label())
        .color(color::SHOW_UP);
    let no_show_chart = BarChart::new(make_bars(Attendance::NoShow, 0.2))
        .name(Attendance::NoShow.label())
        .color(color::NO_SHOW);

    Plot::new("waiting")
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_label("Appointments")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(show_chart);
            plot_ui.bar_chart(no_show_chart);
        });
    ui.add_space(24.0);
}

// ---------------------------------------------------------------------------
// 6. Neighborhoods (stacked, filter-dependent)
// ---------------------------------------------------------------------------

fn neighborhood(ui: &mut Ui, state: &AppState) {
    ui.heading("Neighborhood Attendance Patterns");

    // Keys are sorted, so consecutive duplicates collapse into the
    // category list.
    let mut names: Vec<String> = state
        .charts
        .neighborhood_counts
        .keys()
        .map(|(name, _)| name.clone())
        .collect();
    names.dedup();

    let count_of = |name: &str, attendance: Attendance| -> f64 {
        state
            .charts
            .neighborhood_counts
            .get(&(name.to_string(), attendance))
            .copied()
            .unwrap_or(0) as f64
    };

    let make_bars = |attendance: Attendance| -> Vec<Bar> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Bar::new(i as f64, count_of(name, attendance))
                    .name(name.clone())
                    .width(0.6)
            })
            .collect()
    };

    let show_chart = BarChart::new(make_bars(Attendance::ShowedUp))
        .name(Attendance::ShowedUp.label())
        .color(color::SHOW_UP);
    let no_show_chart = BarChart::new(make_bars(Attendance::NoShow))
        .name(Attendance::NoShow.label())
        .color(color::NO_SHOW)
        .stack_on(&[&show_chart]);

    Plot::new("neighborhood")
        .height(CHART_HEIGHT)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .y_axis_label("Appointments")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(show_chart);
            plot_ui.bar_chart(no_show_chart);
        });
    ui.add_space(24.0);
}
