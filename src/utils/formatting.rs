pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Round to two decimals, as shown in rollup listings.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Replace every non-alphanumeric character with `_`.
pub fn file_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(125_000), "2m 5s");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(8.456), 8.46);
        assert_eq!(round2(1.2), 1.2);
    }

    #[test]
    fn test_file_component() {
        assert_eq!(file_component("2024-03-15"), "2024_03_15");
        assert_eq!(file_component("Acme Steel & Co."), "Acme_Steel___Co_");
    }
}
