use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Attendance;

// ---------------------------------------------------------------------------
// Fixed dashboard colors
// ---------------------------------------------------------------------------

/// Alert red for missed appointments.
pub const NO_SHOW: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);
/// Positive green for attended appointments.
pub const SHOW_UP: Color32 = Color32::from_rgb(0x10, 0xB9, 0x81);

/// The fixed color contract for the no-show dimension: wherever a chart
/// splits by attendance, no-show is the alert color and show-up the
/// positive one.
pub fn attendance_color(attendance: Attendance) -> Color32 {
    match attendance {
        Attendance::ShowedUp => SHOW_UP,
        Attendance::NoShow => NO_SHOW,
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used for categorical series without an attendance split (weekday bars).
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_colors_are_fixed() {
        assert_eq!(attendance_color(Attendance::NoShow), NO_SHOW);
        assert_eq!(attendance_color(Attendance::ShowedUp), SHOW_UP);
        assert_ne!(NO_SHOW, SHOW_UP);
    }

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }
}
