/// Trims whitespace and strips every double quote from a raw CSV cell.
pub fn clean_cell(raw: &str) -> String {
    raw.trim().replace('"', "").trim().to_string()
}

/// Parses a numeric CSV cell. Empty cells, `na` in any case, garbage and
/// non-finite values all come back as `None`; `"0"` stays `Some(0.0)`.
pub fn parse_cell(raw: &str) -> Option<f64> {
    let cell = clean_cell(raw);
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") {
        return None;
    }
    cell.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// `current - previous` when both are known.
pub fn variance(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    Some(current? - previous?)
}

/// Variance as a percentage of `previous`; unknown when `previous` is zero.
pub fn variance_percent(variance: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let variance = variance?;
    let previous = previous.filter(|p| *p != 0.0)?;
    Some(variance / previous * 100.0)
}

/// Label for a quarter, e.g. `quarter_label(1, 2024)` is `"Q1 2024"`.
pub fn quarter_label(quarter: u8, year: i32) -> String {
    format!("Q{} {}", quarter, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_null_forms() {
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("   "), None);
        assert_eq!(parse_cell("NA"), None);
        assert_eq!(parse_cell("na"), None);
        assert_eq!(parse_cell("\"Na\""), None);
        assert_eq!(parse_cell("n/a"), None);
        assert_eq!(parse_cell("12abc"), None);
        assert_eq!(parse_cell("NaN"), None);
        assert_eq!(parse_cell("inf"), None);
    }

    #[test]
    fn test_parse_cell_numbers() {
        assert_eq!(parse_cell("0"), Some(0.0));
        assert_eq!(parse_cell(" \"1250.5\" "), Some(1250.5));
        assert_eq!(parse_cell("-42"), Some(-42.0));
    }

    #[test]
    fn test_variance_helpers() {
        assert_eq!(variance(Some(100.0), Some(90.0)), Some(10.0));
        assert_eq!(variance(None, Some(90.0)), None);
        assert_eq!(variance(Some(100.0), None), None);

        let pct = variance_percent(Some(10.0), Some(90.0)).unwrap();
        assert!((pct - 11.111_111).abs() < 1e-5);
        assert_eq!(variance_percent(Some(10.0), Some(0.0)), None);
        assert_eq!(variance_percent(None, Some(90.0)), None);
    }

    #[test]
    fn test_quarter_label() {
        assert_eq!(quarter_label(3, 2023), "Q3 2023");
    }
}
