//! Publish-date normalization.
//!
//! Feeds disagree about how to write a timestamp. [`normalize`] runs the
//! input against a fixed, ordered table of layouts and returns the instant
//! produced by the first one that matches. Order is significant: a few
//! layouts are loose enough to accept strings written for a later entry.
//!
//! Matching is purely structural. A leading weekday is checked for syntax
//! only (it does not have to agree with the date). Zone abbreviations go
//! through the RFC 822 table; any other abbreviation must be three to five
//! uppercase letters and reads as a zero offset.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc, Weekday};
use thiserror::Error;

/// No layout in the table matched the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized date format: {input:?}")]
pub struct DateFormatUnrecognized {
    input: String,
}

impl DateFormatUnrecognized {
    /// The string that failed to parse, exactly as it was passed in.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// What precedes the layout proper.
#[derive(Debug, Clone, Copy)]
enum Prefix {
    None,
    /// `Mon Jan ...`
    Weekday,
    /// `Mon, 02 Jan ...` or `Monday, 02-Jan-06 ...`
    WeekdayComma,
}

/// Where a layout keeps its time zone.
#[derive(Debug, Clone, Copy)]
enum Zone {
    /// Numeric offset, parsed by chrono from the layout itself.
    Numeric,
    Rfc3339,
    /// Alphabetic abbreviation in a whitespace-separated token.
    Abbrev(Token),
    /// No zone at all; the time is UTC.
    Utc,
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Nth(usize),
    Last,
}

struct DateFormat {
    name: &'static str,
    prefix: Prefix,
    /// chrono layout for what is left after the prefix and any abbreviated
    /// zone token are removed.
    layout: &'static str,
    zone: Zone,
}

static DATE_FORMATS: &[DateFormat] = &[
    // 02 Jan 06 15:04 MST
    DateFormat {
        name: "rfc822",
        prefix: Prefix::None,
        layout: "%d %b %y %H:%M",
        zone: Zone::Abbrev(Token::Last),
    },
    // 02 Jan 06 15:04 -0700
    DateFormat {
        name: "rfc822z",
        prefix: Prefix::None,
        layout: "%d %b %y %H:%M %z",
        zone: Zone::Numeric,
    },
    // 2006-01-02T15:04:05Z07:00
    DateFormat {
        name: "rfc3339",
        prefix: Prefix::None,
        layout: "",
        zone: Zone::Rfc3339,
    },
    // Mon Jan _2 15:04:05 MST 2006
    DateFormat {
        name: "unix",
        prefix: Prefix::Weekday,
        layout: "%b %e %H:%M:%S %Y",
        zone: Zone::Abbrev(Token::Nth(3)),
    },
    // Mon Jan 02 15:04:05 -0700 2006
    DateFormat {
        name: "ruby",
        prefix: Prefix::Weekday,
        layout: "%b %d %H:%M:%S %z %Y",
        zone: Zone::Numeric,
    },
    // Monday, 02-Jan-06 15:04:05 MST
    DateFormat {
        name: "rfc850",
        prefix: Prefix::WeekdayComma,
        layout: "%d-%b-%y %H:%M:%S",
        zone: Zone::Abbrev(Token::Last),
    },
    // Mon, 02 Jan 2006 15:04:05 -0700
    DateFormat {
        name: "rfc1123z",
        prefix: Prefix::WeekdayComma,
        layout: "%d %b %Y %H:%M:%S %z",
        zone: Zone::Numeric,
    },
    // Mon, 02 Jan 2006 15:04:05 MST
    DateFormat {
        name: "rfc1123",
        prefix: Prefix::WeekdayComma,
        layout: "%d %b %Y %H:%M:%S",
        zone: Zone::Abbrev(Token::Last),
    },
    // Mon Jan _2 15:04:05 2006
    DateFormat {
        name: "ansic",
        prefix: Prefix::Weekday,
        layout: "%b %e %H:%M:%S %Y",
        zone: Zone::Utc,
    },
    // Mon, January 2 2006 15:04:05 -0700
    DateFormat {
        name: "long-month",
        prefix: Prefix::WeekdayComma,
        layout: "%B %e %Y %H:%M:%S %z",
        zone: Zone::Numeric,
    },
    // Mon, Jan 2 2006 15:04:05 -07
    DateFormat {
        name: "short-month-hour-offset",
        prefix: Prefix::WeekdayComma,
        layout: "%b %e %Y %H:%M:%S %#z",
        zone: Zone::Numeric,
    },
    // Mon, Jan 2 2006 15:04:05 -0700
    DateFormat {
        name: "short-month",
        prefix: Prefix::WeekdayComma,
        layout: "%b %e %Y %H:%M:%S %z",
        zone: Zone::Numeric,
    },
];

/// Parse a feed timestamp into an absolute UTC instant.
///
/// Surrounding whitespace is ignored. The first matching layout wins.
///
/// # Errors
///
/// [`DateFormatUnrecognized`] carrying `input` when no layout matches.
pub fn normalize(input: &str) -> Result<DateTime<Utc>, DateFormatUnrecognized> {
    let trimmed = input.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| {
            let parsed = format.parse(trimmed)?;
            tracing::trace!(format = format.name, input = trimmed, "matched date format");
            Some(parsed)
        })
        .ok_or_else(|| DateFormatUnrecognized {
            input: input.to_owned(),
        })
}

impl DateFormat {
    fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let rest = match self.prefix {
            Prefix::None => input,
            Prefix::Weekday => strip_weekday(input, false)?,
            Prefix::WeekdayComma => strip_weekday(input, true)?,
        };

        match self.zone {
            Zone::Numeric => DateTime::parse_from_str(rest, self.layout)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Rfc3339 => DateTime::parse_from_rfc3339(rest)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Utc => NaiveDateTime::parse_from_str(rest, self.layout)
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive)),
            Zone::Abbrev(token) => {
                let mut tokens: Vec<&str> = rest.split_whitespace().collect();
                let index = match token {
                    Token::Nth(n) => n,
                    Token::Last => tokens.len().checked_sub(1)?,
                };
                if index >= tokens.len() {
                    return None;
                }
                let offset = abbrev_offset(tokens.remove(index))?;
                let naive = NaiveDateTime::parse_from_str(&tokens.join(" "), self.layout).ok()?;
                offset
                    .from_local_datetime(&naive)
                    .single()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

/// Drop a leading weekday name and the separator after it.
fn strip_weekday(input: &str, comma: bool) -> Option<&str> {
    let end = input.find(|c: char| c == ',' || c.is_whitespace())?;
    let (day, rest) = input.split_at(end);
    day.parse::<Weekday>().ok()?;

    let rest = if comma { rest.strip_prefix(',')? } else { rest };
    let trimmed = rest.trim_start();
    // at least one space between the weekday and the date
    (trimmed.len() < rest.len()).then_some(trimmed)
}

/// Offset for a zone abbreviation.
///
/// RFC 822 names map to their offsets. Any other name must be three to five
/// uppercase ASCII letters and reads as a zero offset.
fn abbrev_offset(abbrev: &str) -> Option<FixedOffset> {
    let hours = match abbrev {
        "UT" | "UTC" | "GMT" | "Z" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ if (3..=5).contains(&abbrev.len())
            && abbrev.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            0
        }
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn rfc822_with_zone_name() {
        assert_eq!(normalize("06 Sep 09 16:20 GMT").unwrap(), utc(2009, 9, 6, 16, 20, 0));
        assert_eq!(normalize("06 Sep 09 16:20 EST").unwrap(), utc(2009, 9, 6, 21, 20, 0));
    }

    #[test]
    fn rfc822_with_numeric_zone() {
        assert_eq!(normalize("06 Sep 09 16:20 +0200").unwrap(), utc(2009, 9, 6, 14, 20, 0));
    }

    #[test]
    fn rfc3339() {
        assert_eq!(
            normalize("2009-09-06T16:20:00+02:00").unwrap(),
            utc(2009, 9, 6, 14, 20, 0)
        );
        assert_eq!(
            normalize("2009-09-06T16:20:00.500Z").unwrap().timestamp_millis(),
            utc(2009, 9, 6, 16, 20, 0).timestamp_millis() + 500
        );
    }

    #[test]
    fn unix_date() {
        assert_eq!(
            normalize("Sun Sep  6 16:20:00 UTC 2009").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
        assert_eq!(
            normalize("Sun Sep  6 16:20:00 PDT 2009").unwrap(),
            utc(2009, 9, 6, 23, 20, 0)
        );
    }

    #[test]
    fn ruby_date() {
        assert_eq!(
            normalize("Sun Sep 06 16:20:00 -0700 2009").unwrap(),
            utc(2009, 9, 6, 23, 20, 0)
        );
    }

    #[test]
    fn rfc850() {
        assert_eq!(
            normalize("Sunday, 06-Sep-09 16:20:00 GMT").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
    }

    #[test]
    fn rfc1123_numeric_zone() {
        assert_eq!(
            normalize("Sun, 06 Sep 2009 16:20:00 +0000").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
        assert_eq!(
            normalize("Sun, 06 Sep 2009 18:20:00 +0200").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
    }

    #[test]
    fn rfc1123_zone_name() {
        assert_eq!(
            normalize("Sun, 06 Sep 2009 16:20:00 GMT").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
        assert_eq!(
            normalize("Sun, 06 Sep 2009 16:20:00 CDT").unwrap(),
            utc(2009, 9, 6, 21, 20, 0)
        );
    }

    #[test]
    fn unknown_zone_name_is_zero_offset() {
        assert_eq!(
            normalize("Sun, 06 Sep 2009 16:20:00 CEST").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
    }

    #[test]
    fn short_rfc822_zone_names() {
        assert_eq!(normalize("06 Sep 09 16:20 Z").unwrap(), utc(2009, 9, 6, 16, 20, 0));
        assert_eq!(normalize("06 Sep 09 16:20 UT").unwrap(), utc(2009, 9, 6, 16, 20, 0));
    }

    #[test]
    fn ansic() {
        assert_eq!(
            normalize("Sun Sep  6 16:20:00 2009").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
    }

    #[test]
    fn long_month_name() {
        assert_eq!(
            normalize("Sun, September 6 2009 16:20:00 -0700").unwrap(),
            utc(2009, 9, 6, 23, 20, 0)
        );
    }

    #[test]
    fn short_month_with_hour_offset() {
        assert_eq!(
            normalize("Sun, Sep 6 2009 16:20:00 -07").unwrap(),
            utc(2009, 9, 6, 23, 20, 0)
        );
    }

    #[test]
    fn short_month_with_full_offset() {
        assert_eq!(
            normalize("Sun, Sep 6 2009 16:20:00 +0130").unwrap(),
            utc(2009, 9, 6, 14, 50, 0)
        );
    }

    #[test]
    fn weekday_is_not_checked_against_date() {
        assert_eq!(
            normalize("Mon, 06 Sep 2009 16:20:00 +0000").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
    }

    #[test]
    fn single_digit_day() {
        assert_eq!(
            normalize("Sun, 6 Sep 2009 16:20:00 GMT").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
        assert_eq!(
            normalize("Sun, 6 Sep 2009 16:20:00 +0000").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            normalize("\n  Sun, 06 Sep 2009 16:20:00 +0000  \n").unwrap(),
            utc(2009, 9, 6, 16, 20, 0)
        );
    }

    #[test]
    fn rejects_non_dates() {
        for input in [
            "not-a-date",
            "",
            "yesterday",
            "2009-13-45T00:00:00Z",
            "Sun, 06 Sep 2009 16:20:00 +0000 extra",
            "Funday, 06 Sep 2009 16:20:00 GMT",
            "Sun, 06 Sep 2009 16:20:00 garbage",
            "Sun, 06 Sep 2009 16:20:00 x",
            "06 Sep 09 16:20 x",
            "06 Sep 09 16:20 gmt",
            "Sun, 06 Sep 2009 16:20:00 ABCDEF",
            "Sun Sep  6 16:20:00 junk 2009",
        ] {
            assert!(normalize(input).is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn error_carries_input() {
        let err = normalize("not-a-date").unwrap_err();
        assert_eq!(err.input(), "not-a-date");
        assert_eq!(err.to_string(), r#"unrecognized date format: "not-a-date""#);
    }
}
