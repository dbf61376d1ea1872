//! Numeric helpers shared by the engine and the HUD-facing summaries.

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics when the bounds are inverted;
/// `max` wins, matching how the economy caps are applied.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

const COMPACT_UNITS: [(f64, &str); 4] = [
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Human-readable number for HUD lines.
///
/// Below 1,000 the value keeps one decimal (`12.0`). Above that it is
/// compacted with a K/M/B/T suffix and at most one fractional digit
/// (`2.4K`, `125.7K`, and `1000` becomes `1K`).
pub fn format_number(value: f64) -> String {
    format_number_or(value, "0")
}

/// As [`format_number`], with an explicit fallback for NaN and infinities.
pub fn format_number_or(value: f64, fallback: &str) -> String {
    if !value.is_finite() {
        return fallback.to_string();
    }
    if value.abs() < 1_000.0 {
        return format!("{value:.1}");
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // Walk from the largest unit down; a value that rounds up to 1000 of
    // one unit is promoted to the next one (999_960 -> 1M, not 1000K).
    let mut chosen = COMPACT_UNITS.len() - 1;
    for (i, (scale, _)) in COMPACT_UNITS.iter().enumerate() {
        if magnitude >= *scale {
            chosen = i;
            break;
        }
    }
    let (scale, suffix) = COMPACT_UNITS[chosen];
    let mut scaled = (magnitude / scale * 10.0).round() / 10.0;
    let mut suffix = suffix;
    if scaled >= 1_000.0 && chosen > 0 {
        let (bigger_scale, bigger_suffix) = COMPACT_UNITS[chosen - 1];
        scaled = (magnitude / bigger_scale * 10.0).round() / 10.0;
        suffix = bigger_suffix;
    }

    format!("{sign}{}{suffix}", trim_fraction(scaled))
}

/// Fraction to whole percent, clamped to `[0%, 100%]`.
pub fn percent_from_fraction(fraction: f64) -> String {
    format!("{}%", (clamp(fraction, 0.0, 1.0) * 100.0).round() as i64)
}

/// Integer with thousands separators, as used in cost messages.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        format!("-{out}")
    } else {
        out
    }
}

fn trim_fraction(value: f64) -> String {
    let text = format!("{value:.1}");
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}
