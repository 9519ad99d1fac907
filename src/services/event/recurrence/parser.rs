use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::models::recurrence::{weekday_from_code, ByDay, Frequency, RecurrenceRule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceParseError {
    #[error("recurrence rule is empty")]
    Empty,
    #[error("unsupported frequency '{0}'")]
    UnknownFrequency(String),
    #[error("invalid {key} value '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("invalid weekday code '{0}'")]
    InvalidWeekday(String),
    #[error("invalid UNTIL value '{0}'")]
    InvalidUntil(String),
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

/// Parse an RRULE line (with or without the `RRULE:` prefix).
///
/// Keys are case-insensitive and unknown keys are ignored. A rule without
/// FREQ is treated as daily.
pub fn parse_rule(input: &str) -> Result<RecurrenceRule, RecurrenceParseError> {
    let fields = split_fields(input);
    if fields.is_empty() {
        return Err(RecurrenceParseError::Empty);
    }

    let field = |key: &str| {
        fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    };

    let frequency = match field("FREQ") {
        Some(code) => Frequency::from_code(&code.to_ascii_uppercase())
            .ok_or_else(|| RecurrenceParseError::UnknownFrequency(code.clone()))?,
        None => Frequency::Daily,
    };

    let interval = match field("INTERVAL") {
        Some(value) => parse_positive("INTERVAL", value)?,
        None => 1,
    };

    let by_day = match field("BYDAY") {
        Some(value) => parse_by_day(value)?,
        None => Vec::new(),
    };

    let by_month_day = field("BYMONTHDAY")
        .map(|value| parse_month_day(value))
        .transpose()?;

    let until = field("UNTIL")
        .map(|value| parse_until(value))
        .transpose()?;

    let count = field("COUNT")
        .map(|value| parse_positive("COUNT", value))
        .transpose()?;

    let extensions = fields
        .iter()
        .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
        .cloned()
        .collect();

    Ok(RecurrenceRule {
        frequency,
        interval,
        by_day,
        by_month_day,
        until,
        count,
        extensions,
    })
}

/// UNTIL and COUNT read on their own, skipping values that do not parse.
///
/// Used to keep the ending of a rule whose frequency is not supported.
pub(crate) fn parse_end_fields(input: &str) -> (Option<NaiveDateTime>, Option<u32>) {
    let fields = split_fields(input);
    let value = |key: &str| {
        fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    };
    let until = value("UNTIL").and_then(|v| parse_until(v).ok());
    let count = value("COUNT").and_then(|v| parse_positive("COUNT", v).ok());
    (until, count)
}

const KNOWN_KEYS: [&str; 6] = ["FREQ", "INTERVAL", "BYDAY", "BYMONTHDAY", "UNTIL", "COUNT"];

/// Split `KEY=VALUE;KEY=VALUE` into pairs with uppercased keys, in input order.
fn split_fields(input: &str) -> Vec<(String, String)> {
    let trimmed = input.trim();
    let raw = match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("RRULE:") => &trimmed[6..],
        _ => trimmed,
    };

    raw.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (key.trim().to_ascii_uppercase(), value.trim().to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn parse_positive(key: &'static str, value: &str) -> Result<u32, RecurrenceParseError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| RecurrenceParseError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

fn parse_month_day(value: &str) -> Result<i32, RecurrenceParseError> {
    value
        .parse::<i32>()
        .ok()
        .filter(|day| *day != 0 && (-31..=31).contains(day))
        .ok_or_else(|| RecurrenceParseError::InvalidNumber {
            key: "BYMONTHDAY",
            value: value.to_string(),
        })
}

fn parse_by_day(value: &str) -> Result<Vec<ByDay>, RecurrenceParseError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(parse_by_day_entry)
        .collect()
}

fn parse_by_day_entry(entry: &str) -> Result<ByDay, RecurrenceParseError> {
    let invalid = || RecurrenceParseError::InvalidWeekday(entry.to_string());
    let upper = entry.to_ascii_uppercase();
    if upper.len() < 2 || !upper.is_ascii() {
        return Err(invalid());
    }

    let (position, code) = upper.split_at(upper.len() - 2);
    let weekday = weekday_from_code(code).ok_or_else(invalid)?;
    let ordinal = if position.is_empty() {
        None
    } else {
        let ordinal = position.parse::<i8>().map_err(|_| invalid())?;
        if ordinal == 0 {
            return Err(invalid());
        }
        Some(ordinal)
    };

    Ok(ByDay { ordinal, weekday })
}

/// Accepts `YYYYMMDD` and `YYYYMMDDTHHMMSS`, each with an optional trailing `Z`.
fn parse_until(value: &str) -> Result<NaiveDateTime, RecurrenceParseError> {
    let invalid = || RecurrenceParseError::InvalidUntil(value.to_string());
    let compact = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .unwrap_or(value);

    if compact.len() == 8 {
        let date = NaiveDate::parse_from_str(compact, "%Y%m%d").map_err(|_| invalid())?;
        return Ok(date.and_time(NaiveTime::MIN));
    }

    NaiveDateTime::parse_from_str(compact, "%Y%m%dT%H%M%S").map_err(|_| invalid())
}
