//! Terminal rendering of progress bars, percentage pills and task badges
//!
//! Colours come from the severity band of each percentage, so bars, health
//! badges and pills always agree.

use colored::{Color, ColoredString, Colorize};
use cultivapp_common::progress::{Gradient, SeverityBand};
use cultivapp_common::tasks::TaskStatus;

/// Default bar width in cells
pub const BAR_WIDTH: usize = 24;

/// Text colour for a band
pub fn band_color(band: SeverityBand) -> Color {
    match band {
        SeverityBand::Low => Color::Red,
        SeverityBand::Medium => Color::Yellow,
        SeverityBand::High => Color::Green,
    }
}

/// `#rrggbb` to a truecolor value
pub fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::TrueColor {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Colour of cell `index` out of `cells` filled cells, interpolated along the gradient
fn gradient_cell(gradient: Gradient, index: usize, cells: usize, fallback: Color) -> Color {
    let (Some(Color::TrueColor { r: r0, g: g0, b: b0 }), Some(Color::TrueColor { r: r1, g: g1, b: b1 })) =
        (hex_color(gradient.from), hex_color(gradient.to))
    else {
        return fallback;
    };

    let t = if cells <= 1 {
        0.0
    } else {
        index as f64 / (cells - 1) as f64
    };
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;

    Color::TrueColor {
        r: mix(r0, r1),
        g: mix(g0, g1),
        b: mix(b0, b1),
    }
}

/// Number of filled cells for a percentage
pub fn filled_cells(percent: f64, width: usize) -> usize {
    let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    ((percent / 100.0) * width as f64).round() as usize
}

/// Whole percentage as printed; NaN reads as 0
pub fn displayed_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.round()
    }
}

/// A `[#####-----]  62%` bar coloured by band
pub fn render_bar(percent: f64, width: usize) -> String {
    let percent = displayed_percent(percent);
    let band = SeverityBand::from_percent(percent);
    let filled = filled_cells(percent, width);
    let gradient = band.gradient();

    let mut bar = String::from("[");
    for i in 0..filled {
        let color = gradient_cell(gradient, i, filled, band_color(band));
        bar.push_str(&"█".color(color).to_string());
    }
    bar.push_str(&"░".repeat(width - filled).dimmed().to_string());
    bar.push(']');

    format!("{} {}", bar, percent_pill(percent))
}

/// Percentage text in the band colour, e.g. ` 75%`.
///
/// The band is taken from the printed value, so ` 75%` is always medium.
pub fn percent_pill(percent: f64) -> ColoredString {
    let percent = displayed_percent(percent);
    let band = SeverityBand::from_percent(percent);
    format!("{:>3.0}%", percent)
        .color(band_color(band))
        .bold()
}

/// Task status badge
pub fn task_badge(status: TaskStatus) -> ColoredString {
    let label = status.label();
    match status {
        TaskStatus::Completed => label.green(),
        TaskStatus::Overdue => label.red().bold(),
        TaskStatus::DueInDays(_) => label.yellow(),
        TaskStatus::DueToday => label.cyan(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(
            hex_color("#22c55e"),
            Some(Color::TrueColor {
                r: 0x22,
                g: 0xc5,
                b: 0x5e
            })
        );
        assert_eq!(hex_color("22c55e"), None);
        assert_eq!(hex_color("#xyzxyz"), None);
    }

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(0.0, 20), 0);
        assert_eq!(filled_cells(50.0, 20), 10);
        assert_eq!(filled_cells(100.0, 20), 20);
        assert_eq!(filled_cells(180.0, 20), 20);
        assert_eq!(filled_cells(f64::NAN, 20), 0);
    }

    #[test]
    fn test_gradient_endpoints() {
        let gradient = SeverityBand::High.gradient();
        assert_eq!(
            gradient_cell(gradient, 0, 5, Color::Green),
            hex_color(gradient.from).unwrap()
        );
        assert_eq!(
            gradient_cell(gradient, 4, 5, Color::Green),
            hex_color(gradient.to).unwrap()
        );
    }

    #[test]
    fn test_band_colors_match_label_color() {
        for band in [SeverityBand::Low, SeverityBand::Medium, SeverityBand::High] {
            let expected: Color = band.label_color().into();
            assert_eq!(band_color(band), expected);
        }
    }

    #[test]
    fn test_render_bar_contains_percent() {
        colored::control::set_override(false);
        let bar = render_bar(75.0, 8);
        assert!(bar.ends_with(" 75%"));
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 6);
    }

    #[test]
    fn test_pill_band_follows_printed_value() {
        let pill = percent_pill(75.4);
        assert_eq!(&*pill, " 75%");
        assert_eq!(pill.fgcolor(), Some(Color::Yellow));

        let pill = percent_pill(75.6);
        assert_eq!(&*pill, " 76%");
        assert_eq!(pill.fgcolor(), Some(Color::Green));

        let pill = percent_pill(49.5);
        assert_eq!(&*pill, " 50%");
        assert_eq!(pill.fgcolor(), Some(Color::Yellow));
    }

    #[test]
    fn test_render_bar_band_matches_rounded_value() {
        colored::control::set_override(false);
        assert!(render_bar(75.4, 8).ends_with(" 75%"));
        assert_eq!(displayed_percent(f64::NAN), 0.0);
    }
}
