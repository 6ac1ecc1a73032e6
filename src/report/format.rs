//! Number formatting for console output.

/// Insert `,` every three digits of an already formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// `1234.5` -> `"1234.5"` with `decimals`; NaN -> `"nan"`.
pub fn fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    format!("{:.*}", decimals, value)
}

/// Whole dollars with thousands separators: `$1,234,568`, `$-1,234`.
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", fixed(value, 0));
    }
    format!("${}", group_thousands(&format!("{:.0}", value)))
}

/// One decimal and a percent sign: `12.3%`.
pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value, 1))
}

/// Thousands, rounded: `452_000.0` -> `"452"`.
pub fn thousands(value: f64) -> String {
    fixed(value / 1000.0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(999.4), "$999");
        assert_eq!(currency(1000.0), "$1,000");
        assert_eq!(currency(321_950.0), "$321,950");
        assert_eq!(currency(1_234_567.8), "$1,234,568");
        assert_eq!(currency(-1234.0), "$-1,234");
        assert_eq!(currency(f64::NAN), "$nan");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(12.345), "12.3%");
        assert_eq!(percent(-4.0), "-4.0%");
        assert_eq!(percent(f64::NAN), "nan%");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(452_000.0), "452");
        assert_eq!(thousands(451_600.0), "452");
    }

    #[test]
    fn test_group_thousands_keeps_fraction() {
        assert_eq!(group_thousands("1234567.25"), "1,234,567.25");
        assert_eq!(group_thousands("123"), "123");
    }
}
