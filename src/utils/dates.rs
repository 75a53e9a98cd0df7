use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse the date forms the web client sends: ISO date-times with or without
/// seconds, RFC 3339 (converted to its local wall time), or a bare date
/// (midnight).
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn accepts_client_formats() {
        assert_eq!(parse_datetime("2026-05-04"), Some(expected(0, 0, 0)));
        assert_eq!(parse_datetime("2026-05-04T13:45:10"), Some(expected(13, 45, 10)));
        assert_eq!(parse_datetime("2026-05-04 13:45:10"), Some(expected(13, 45, 10)));
        assert_eq!(parse_datetime("2026-05-04T13:45"), Some(expected(13, 45, 0)));
        assert_eq!(
            parse_datetime("2026-05-04T13:45:10-03:00"),
            Some(expected(13, 45, 10))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime("2026-13-40"), None);
        assert_eq!(parse_datetime(""), None);
    }
}
