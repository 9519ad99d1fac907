// Unit tests for the public recurrence rule surface
// Parsing, rendering and summarizing RRULE lines through the crate's public API

use chrono::{NaiveDate, Weekday};
use test_case::test_case;

use calendar_grid::models::recurrence::{ByDay, Frequency, RecurrenceRule};
use calendar_grid::services::event::recurrence::{
    parse_rule, summarize_rule, RecurrenceParseError, CUSTOM_RECURRENCE,
};

/// Monday, March 10 2025
fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[test_case("RRULE:FREQ=DAILY", "Repeat every day" ; "daily")]
#[test_case("RRULE:FREQ=DAILY;INTERVAL=3", "Repeat every 3 days" ; "every third day")]
#[test_case("RRULE:FREQ=WEEKLY", "Repeat every week on Monday" ; "weekly defaults to anchor weekday")]
#[test_case("RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR", "Repeat every week on Monday, Wednesday, Friday" ; "weekly on three days")]
#[test_case("RRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=TU", "Repeat every 2 weeks on Tuesday" ; "fortnightly")]
#[test_case("RRULE:FREQ=MONTHLY", "Repeat every month on day 10" ; "monthly defaults to anchor day")]
#[test_case("RRULE:FREQ=MONTHLY;INTERVAL=3;BYMONTHDAY=1", "Repeat every 3 months on day 1" ; "quarterly")]
#[test_case("RRULE:FREQ=YEARLY", "Repeat every year on 10/3" ; "yearly")]
#[test_case("RRULE:FREQ=DAILY;COUNT=1", "Repeat every day for 1 occurrence" ; "single occurrence")]
#[test_case("RRULE:FREQ=WEEKLY;BYDAY=FR;UNTIL=20250627T000000Z", "Repeat every week on Friday until Jun 27, 2025" ; "until date")]
#[test_case("rrule:freq=daily;interval=2", "Repeat every 2 days" ; "lowercase")]
fn test_summaries(rule: &str, expected: &str) {
    assert_eq!(summarize_rule(rule, anchor()), expected);
}

#[test_case("" ; "empty")]
#[test_case("RRULE:FREQ=HOURLY" ; "unsupported frequency")]
#[test_case("RRULE:FREQ=DAILY;INTERVAL=0" ; "zero interval")]
#[test_case("RRULE:FREQ=WEEKLY;BYDAY=XX" ; "bad weekday")]
#[test_case("RRULE:FREQ=DAILY;UNTIL=tomorrow" ; "bad until")]
fn test_malformed_rules_are_custom(rule: &str) {
    assert_eq!(summarize_rule(rule, anchor()), CUSTOM_RECURRENCE);
}

#[test]
fn test_unsupported_frequency_keeps_ending_clause() {
    assert_eq!(
        summarize_rule("RRULE:FREQ=HOURLY;COUNT=3", anchor()),
        "Custom recurrence for 3 occurrences"
    );
}

#[test]
fn test_parse_structured_value() {
    let rule = parse_rule("RRULE:FREQ=MONTHLY;INTERVAL=2;BYDAY=-1FR;COUNT=6").unwrap();
    assert_eq!(rule.frequency, Frequency::Monthly);
    assert_eq!(rule.interval, 2);
    assert_eq!(
        rule.by_day,
        vec![ByDay {
            ordinal: Some(-1),
            weekday: Weekday::Fri
        }]
    );
    assert_eq!(rule.count, Some(6));
    assert_eq!(rule.until, None);
}

#[test]
fn test_rendered_rule_parses_back() {
    let rule = RecurrenceRule::weekly_on(Weekday::Wed).with_interval(2).with_count(4);
    let reparsed: RecurrenceRule = rule.to_rrule_string().parse().unwrap();
    assert_eq!(reparsed, rule);
}

#[test]
fn test_parse_errors_are_typed() {
    assert_eq!(parse_rule("   "), Err(RecurrenceParseError::Empty));
    assert!(matches!(
        parse_rule("FREQ=SECONDLY"),
        Err(RecurrenceParseError::UnknownFrequency(_))
    ));
}
