// Recurrence module
// Structured form of the constrained RRULE grammar understood by the grid

use std::fmt;

use chrono::{NaiveDateTime, Weekday};

/// Compact UTC form used for UNTIL values, e.g. `20250317T085959Z`.
pub const UNTIL_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

/// One BYDAY entry, optionally with an ordinal (`1MO`, `-1FR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByDay {
    pub ordinal: Option<i8>,
    pub weekday: Weekday,
}

impl ByDay {
    pub fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }
}

impl fmt::Display for ByDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ordinal) = self.ordinal {
            write!(f, "{}", ordinal)?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub by_day: Vec<ByDay>,
    pub by_month_day: Option<i32>,
    pub until: Option<NaiveDateTime>,
    pub count: Option<u32>,
    /// Keys outside the supported grammar, kept verbatim so a rewritten rule
    /// does not lose them.
    pub extensions: Vec<(String, String)>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_day: Vec::new(),
            by_month_day: None,
            until: None,
            count: None,
            extensions: Vec::new(),
        }
    }

    /// Default rule for an occurrence whose series rule is unknown.
    pub fn weekly_on(weekday: Weekday) -> Self {
        Self {
            by_day: vec![ByDay::every(weekday)],
            ..Self::new(Frequency::Weekly)
        }
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// End the series at `until`, replacing any COUNT.
    pub fn with_until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self.count = None;
        self
    }

    /// End the series after `count` occurrences, replacing any UNTIL.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count.max(1));
        self.until = None;
        self
    }

    /// Render as an `RRULE:` line. INTERVAL is always written.
    pub fn to_rrule_string(&self) -> String {
        let mut parts = vec![
            format!("FREQ={}", self.frequency.as_str()),
            format!("INTERVAL={}", self.interval.max(1)),
        ];
        if !self.by_day.is_empty() {
            let days: Vec<String> = self.by_day.iter().map(ByDay::to_string).collect();
            parts.push(format!("BYDAY={}", days.join(",")));
        }
        if let Some(day) = self.by_month_day {
            parts.push(format!("BYMONTHDAY={}", day));
        }
        if let Some(until) = self.until {
            parts.push(format!("UNTIL={}", until.format(UNTIL_FORMAT)));
        } else if let Some(count) = self.count {
            parts.push(format!("COUNT={}", count));
        }
        parts.extend(
            self.extensions
                .iter()
                .map(|(key, value)| format!("{}={}", key, value)),
        );
        format!("RRULE:{}", parts.join(";"))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rrule_string())
    }
}

pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "SU" => Some(Weekday::Sun),
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "SU",
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}
