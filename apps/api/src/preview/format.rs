use chrono::NaiveDate;

/// Shown in place of an empty end date.
pub const PRESENT: &str = "Present";

/// Formats a `YYYY-MM` value as abbreviated month + year ("2022-05" → "May 2022").
///
/// Empty input yields an empty string. Anything that is not a valid
/// year-month is returned verbatim rather than as an error marker.
pub fn format_month(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        Ok(date) => date.format("%b %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// "Jan 2022 - Present", "Jan 2022 - Mar 2023".
pub fn format_range(start: &str, end: &str) -> String {
    let end = if end.trim().is_empty() {
        PRESENT.to_string()
    } else {
        format_month(end)
    };
    format!("{} - {}", format_month(start), end)
}

/// "BSc in Physics", or just the degree when no field is given.
pub fn degree_heading(degree: &str, field: &str) -> String {
    if field.is_empty() {
        degree.to_string()
    } else {
        format!("{degree} in {field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_month() {
        assert_eq!(format_month("2022-05"), "May 2022");
        assert_eq!(format_month("1999-12"), "Dec 1999");
    }

    #[test]
    fn test_empty_month_is_empty() {
        assert_eq!(format_month(""), "");
        assert_eq!(format_month("   "), "");
    }

    #[test]
    fn test_invalid_month_is_shown_verbatim() {
        assert_eq!(format_month("2022-13"), "2022-13");
        assert_eq!(format_month("last spring"), "last spring");
    }

    #[test]
    fn test_open_range_renders_present() {
        assert_eq!(format_range("2022-01", ""), "Jan 2022 - Present");
    }

    #[test]
    fn test_closed_range() {
        assert_eq!(format_range("2019-09", "2021-06"), "Sep 2019 - Jun 2021");
    }

    #[test]
    fn test_range_with_empty_start() {
        assert_eq!(format_range("", "2021-06"), " - Jun 2021");
    }

    #[test]
    fn test_degree_heading() {
        assert_eq!(degree_heading("BSc", "Physics"), "BSc in Physics");
        assert_eq!(degree_heading("MBA", ""), "MBA");
    }
}
