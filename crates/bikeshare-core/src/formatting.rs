use std::time::Duration;

/// Round `value` to `places` decimal places, halves away from zero.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::round_to;
///
/// assert_eq!(round_to(3.333_333, 2), 3.33);
/// assert_eq!(round_to(2.5, 0), 3.0);
/// assert_eq!(round_to(-1.25, 1), -1.3);
/// ```
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    // Nudge by a scaled epsilon so binary representations just below a
    // midpoint (e.g. 1.005) still round up.
    let epsilon = f64::EPSILON * value.abs() * factor;
    let scaled = value * factor;
    let rounded = if value < 0.0 {
        (scaled - epsilon).round()
    } else {
        (scaled + epsilon).round()
    };
    rounded / factor
}

/// Render an already-rounded number the way a Python `print` would:
/// shortest form, but always at least one decimal.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_decimal;
///
/// assert_eq!(format_decimal(10.0), "10.0");
/// assert_eq!(format_decimal(3.33), "3.33");
/// assert_eq!(format_decimal(0.5), "0.5");
/// ```
pub fn format_decimal(value: f64) -> String {
    let s = value.to_string();
    if s.contains('.') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

/// Format a minute quantity for display, e.g. `"3.33 minutes"`.
pub fn format_minutes(minutes: f64) -> String {
    format!("{} minutes", format_decimal(minutes))
}

/// Format a wall-clock measurement as seconds rounded to 2 decimals.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bikeshare_core::formatting::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(1234)), "1.23");
/// assert_eq!(format_elapsed(Duration::ZERO), "0.0");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    format_decimal(round_to(elapsed.as_secs_f64(), 2))
}

/// Pad `text` on the right with `width - len` spaces, where `len` is the
/// caller-measured display width.
pub fn pad_right(text: &str, display_width: usize, width: usize) -> String {
    let pad = width.saturating_sub(display_width);
    format!("{text}{}", " ".repeat(pad))
}
