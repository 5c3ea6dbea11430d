//! Number formatting shared by detector evidence and the report.

/// Format a ratio as a percentage with two decimals (`0.65` -> `65.00%`).
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Format a value with thousands separators and fixed decimals.
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Dollar amount with thousands separators (`37600.0, 2` -> `$37,600.00`).
pub fn currency(value: f64, decimals: usize) -> String {
    let body = thousands(value, decimals);
    match body.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.65), "65.00%");
        assert_eq!(percent(0.0), "0.00%");
        assert_eq!(percent(1.0), "100.00%");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(thousands(0.0, 2), "0.00");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(37_600.0, 2), "37,600.00");
        assert_eq!(thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(thousands(-1500.5, 1), "-1,500.5");
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(9000.0, 0), "$9,000");
        assert_eq!(currency(9400.0, 2), "$9,400.00");
        assert_eq!(currency(-12.5, 2), "-$12.50");
    }
}
