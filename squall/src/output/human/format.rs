use std::time::Duration;

pub(crate) fn format_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.0}")
    } else {
        "0".to_string()
    }
}

/// Rates that are undefined (no requests, zero elapsed) render as `n/a`.
pub(crate) fn format_rate_opt(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.2} req/s"),
        _ => "n/a".to_string(),
    }
}

/// Single rounded component in one of: us, ms, s.
pub(crate) fn format_duration(d: Duration) -> String {
    const NS_PER_US: u128 = 1_000;
    const NS_PER_MS: u128 = 1_000_000;
    const NS_PER_S: u128 = 1_000_000_000;

    fn round_div(value: u128, unit: u128) -> u128 {
        (value + (unit / 2)) / unit
    }

    let total_ns = d.as_nanos();
    if total_ns >= NS_PER_S {
        return format!("{}s", round_div(total_ns, NS_PER_S));
    }
    if total_ns >= NS_PER_MS {
        return format!("{}ms", round_div(total_ns, NS_PER_MS));
    }
    format!("{}us", round_div(total_ns, NS_PER_US))
}

/// Seconds with millisecond precision, for totals that may span minutes.
pub(crate) fn format_secs(d: Duration) -> String {
    format!("{:.3}s", d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_round_to_one_unit() {
        assert_eq!(format_duration(Duration::from_micros(400)), "400us");
        assert_eq!(format_duration(Duration::from_micros(1_499)), "1ms");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "2ms");
        assert_eq!(format_duration(Duration::from_millis(2_600)), "3s");
    }

    #[test]
    fn undefined_rates_are_not_available() {
        assert_eq!(format_rate_opt(None), "n/a");
        assert_eq!(format_rate_opt(Some(f64::INFINITY)), "n/a");
        assert_eq!(format_rate_opt(Some(12.5)), "12.50 req/s");
        assert_eq!(format_rate(f64::NAN), "0");
    }

    #[test]
    fn seconds_keep_millis() {
        assert_eq!(format_secs(Duration::from_millis(1_234)), "1.234s");
    }
}
