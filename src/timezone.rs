use anyhow::Context;
use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// The zone post dates and permalinks are rendered in.
///
/// Either an IANA name such as `Europe/Madrid`, which follows daylight
/// saving, or a fixed offset such as `-05:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl SiteTimezone {
    pub fn utc() -> Self {
        SiteTimezone::Named(Tz::UTC)
    }

    /// Tries an IANA zone name first, then a fixed offset.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();
        if let Ok(tz) = raw.parse::<Tz>() {
            return Ok(SiteTimezone::Named(tz));
        }
        parse_utc_offset(raw)
            .map(SiteTimezone::Fixed)
            .with_context(|| format!("{:?} is neither a zone name nor a UTC offset", raw))
    }

    /// Wall-clock time in this zone for a UTC instant.
    pub fn local(&self, utc: &NaiveDateTime) -> NaiveDateTime {
        match self {
            SiteTimezone::Named(tz) => tz.from_utc_datetime(utc).naive_local(),
            SiteTimezone::Fixed(offset) => offset.from_utc_datetime(utc).naive_local(),
        }
    }
}

/// Parses `Z`, `UTC`, `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH`.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).context("zero offset");
    }

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => anyhow::bail!("offset must start with '+' or '-'"),
    };

    if !rest.is_ascii() {
        anyhow::bail!("offset contains non-digit characters");
    }
    let (hours, minutes) = match (rest.len(), rest.find(':')) {
        (5, Some(2)) => (&rest[..2], &rest[3..]),
        (4, None) => (&rest[..2], &rest[2..]),
        (2, None) => (rest, "00"),
        _ => anyhow::bail!("offset must look like +HH:MM"),
    };
    if !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit()) {
        anyhow::bail!("offset contains non-digit characters");
    }
    let hours: i32 = hours.parse()?;
    let minutes: i32 = minutes.parse()?;
    if hours > 23 || minutes > 59 {
        anyhow::bail!("offset out of range");
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).context("offset out of range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parse_prefers_zone_names() {
        assert_eq!(
            SiteTimezone::parse("Europe/Madrid").unwrap(),
            SiteTimezone::Named(chrono_tz::Europe::Madrid)
        );
        assert_eq!(SiteTimezone::parse("UTC").unwrap(), SiteTimezone::utc());
        assert_eq!(
            SiteTimezone::parse("-05:00").unwrap(),
            SiteTimezone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap())
        );
    }

    #[test]
    fn parse_rejects_unknown_zone() {
        assert!(SiteTimezone::parse("Mars/Olympus").is_err());
        assert!(SiteTimezone::parse("").is_err());
    }

    #[test]
    fn named_zone_follows_daylight_saving() {
        let madrid = SiteTimezone::parse("Europe/Madrid").unwrap();
        // Clocks go forward at 01:00 UTC on 2024-03-31.
        assert_eq!(madrid.local(&at(2024, 3, 31, 0, 59, 59)), at(2024, 3, 31, 1, 59, 59));
        assert_eq!(madrid.local(&at(2024, 3, 31, 1, 0, 0)), at(2024, 3, 31, 3, 0, 0));
        assert_eq!(madrid.local(&at(2024, 1, 15, 12, 0, 0)), at(2024, 1, 15, 13, 0, 0));
        assert_eq!(madrid.local(&at(2024, 7, 15, 12, 0, 0)), at(2024, 7, 15, 14, 0, 0));
    }

    #[test]
    fn fixed_offset_ignores_season() {
        let fixed = SiteTimezone::parse("+01:00").unwrap();
        assert_eq!(fixed.local(&at(2024, 7, 15, 12, 0, 0)), at(2024, 7, 15, 13, 0, 0));
    }

    #[test]
    fn parse_utc_offset_accepts_common_forms() {
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("utc").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+02:00").unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_utc_offset("-0330").unwrap().local_minus_utc(), -12600);
        assert_eq!(parse_utc_offset("+05").unwrap().local_minus_utc(), 18000);
    }

    #[test]
    fn parse_utc_offset_rejects_garbage() {
        assert!(parse_utc_offset("02:00").is_err());
        assert!(parse_utc_offset("+2:0").is_err());
        assert!(parse_utc_offset("+24:00").is_err());
        assert!(parse_utc_offset("+ab:cd").is_err());
    }
}
