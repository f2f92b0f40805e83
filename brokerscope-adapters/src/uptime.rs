//! Millisecond uptime → `"1d 2h 3m 4s"`.

/// Leading zero units are dropped; seconds are always present.
pub fn format_uptime_ms(uptime_ms: u64) -> String {
    let total_secs = uptime_ms / 1000;
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_breakdown() {
        let ms = ((86_400 + 2 * 3_600 + 3 * 60 + 4) * 1000) as u64;
        assert_eq!(format_uptime_ms(ms), "1d 2h 3m 4s");
    }

    #[test]
    fn drops_leading_zero_units() {
        assert_eq!(format_uptime_ms(65_999), "1m 5s");
        assert_eq!(format_uptime_ms(3_600_000), "1h 0m 0s");
        assert_eq!(format_uptime_ms(0), "0s");
    }
}
