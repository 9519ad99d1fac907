use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::models::recurrence::{weekday_name, Frequency, RecurrenceRule};

use super::parser::{parse_end_fields, parse_rule};

/// Label shown for rules the summarizer cannot describe.
pub const CUSTOM_RECURRENCE: &str = "Custom recurrence";

/// Describe an RRULE line in plain English.
///
/// `anchor` is the series start; it supplies the weekday, day-of-month and
/// month whenever the rule leaves them out. Never fails: anything that does
/// not parse is reported as [`CUSTOM_RECURRENCE`], still followed by any
/// readable UNTIL or COUNT.
pub fn summarize_rule(rule: &str, anchor: NaiveDate) -> String {
    match parse_rule(rule) {
        Ok(parsed) => describe(&parsed, anchor),
        Err(err) => {
            log::debug!("Cannot summarize recurrence rule {:?}: {}", rule, err);
            let (until, count) = parse_end_fields(rule);
            format!("{}{}", CUSTOM_RECURRENCE, ending(until, count))
        }
    }
}

pub fn describe(rule: &RecurrenceRule, anchor: NaiveDate) -> String {
    let every = |unit: &str| {
        if rule.interval <= 1 {
            format!("Repeat every {}", unit)
        } else {
            format!("Repeat every {} {}s", rule.interval, unit)
        }
    };

    let day_of_month = rule
        .by_month_day
        .unwrap_or_else(|| anchor.day() as i32);

    let base = match rule.frequency {
        Frequency::Daily => every("day"),
        Frequency::Weekly => {
            let days = if rule.by_day.is_empty() {
                weekday_name(anchor.weekday()).to_string()
            } else {
                rule.by_day
                    .iter()
                    .map(|day| weekday_name(day.weekday))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!("{} on {}", every("week"), days)
        }
        Frequency::Monthly => format!("{} on day {}", every("month"), day_of_month),
        Frequency::Yearly => format!(
            "{} on {}/{}",
            every("year"),
            day_of_month,
            anchor.month()
        ),
    };

    format!("{}{}", base, ending(rule.until, rule.count))
}

fn ending(until: Option<NaiveDateTime>, count: Option<u32>) -> String {
    if let Some(until) = until {
        format!(" until {}", until.format("%b %-d, %Y"))
    } else if let Some(count) = count {
        let plural = if count > 1 { "s" } else { "" };
        format!(" for {} occurrence{}", count, plural)
    } else {
        String::new()
    }
}
