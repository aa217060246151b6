//! Weekly opening hours as served by the store API.
//!
//! Each day holds free-form text. A day is either closed (missing, empty or a
//! closed marker), a single `H:MM-H:MM` range, or arbitrary text that is shown
//! as-is and treated as always open.

use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;
use serde::Serialize;

use crate::Locale;

/// Day keys in `Weekday::num_days_from_sunday` order.
pub const DAY_KEYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Display order for weekly tables.
pub const WEEK_FROM_MONDAY: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}):([0-9]{2})-([0-9]{1,2}):([0-9]{2})").expect("valid hours range regex")
});

/// Lowercase API key for a weekday (`"monday"`, ...).
#[must_use]
pub fn day_key(day: Weekday) -> &'static str {
    DAY_KEYS[day.num_days_from_sunday() as usize]
}

/// Localized, capitalized day name.
#[must_use]
pub fn day_name(day: Weekday, locale: Locale) -> &'static str {
    match (locale, day) {
        (Locale::Fr, Weekday::Mon) => "Lundi",
        (Locale::Fr, Weekday::Tue) => "Mardi",
        (Locale::Fr, Weekday::Wed) => "Mercredi",
        (Locale::Fr, Weekday::Thu) => "Jeudi",
        (Locale::Fr, Weekday::Fri) => "Vendredi",
        (Locale::Fr, Weekday::Sat) => "Samedi",
        (Locale::Fr, Weekday::Sun) => "Dimanche",
        (Locale::En, Weekday::Mon) => "Monday",
        (Locale::En, Weekday::Tue) => "Tuesday",
        (Locale::En, Weekday::Wed) => "Wednesday",
        (Locale::En, Weekday::Thu) => "Thursday",
        (Locale::En, Weekday::Fri) => "Friday",
        (Locale::En, Weekday::Sat) => "Saturday",
        (Locale::En, Weekday::Sun) => "Sunday",
    }
}

/// A time of day as written in the hours string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    /// Original `H:MM` text, reused verbatim in status messages.
    pub text: String,
}

impl ClockTime {
    /// `HH*100+MM`. Monotonic within a day as long as minutes stay below 60.
    #[must_use]
    pub fn hhmm(&self) -> u32 {
        self.hour * 100 + self.minute
    }
}

/// A same-day opening interval, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub open: ClockTime,
    pub close: ClockTime,
}

impl TimeRange {
    /// Find the first `H:MM-H:MM` range anywhere in `raw`.
    #[must_use]
    pub fn find(raw: &str) -> Option<Self> {
        let caps = RANGE_RE.captures(raw)?;
        let clock = |h: usize, m: usize| -> Option<ClockTime> {
            let hour_text = caps.get(h)?.as_str();
            let minute_text = caps.get(m)?.as_str();
            Some(ClockTime {
                hour: hour_text.parse().ok()?,
                minute: minute_text.parse().ok()?,
                text: format!("{hour_text}:{minute_text}"),
            })
        };
        Some(Self {
            open: clock(1, 2)?,
            close: clock(3, 4)?,
        })
    }
}

/// Classification of one day's hours string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoursEntry {
    Closed,
    Range(TimeRange),
    /// Unparseable text, displayed verbatim and never time-gated.
    FreeText(String),
}

impl HoursEntry {
    #[must_use]
    pub fn classify(raw: Option<&str>, closed_markers: &[String]) -> Self {
        let Some(raw) = raw else {
            return HoursEntry::Closed;
        };
        if raw.is_empty() || is_closed_marker(raw, closed_markers) {
            return HoursEntry::Closed;
        }
        match TimeRange::find(raw) {
            Some(range) => HoursEntry::Range(range),
            None => HoursEntry::FreeText(raw.to_string()),
        }
    }
}

/// Case-insensitive, whitespace-trimmed comparison against each marker.
#[must_use]
pub fn is_closed_marker(raw: &str, closed_markers: &[String]) -> bool {
    let needle = raw.trim().to_lowercase();
    closed_markers
        .iter()
        .any(|marker| marker.trim().to_lowercase() == needle)
}

/// Opening hours for the seven days of the week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyHours {
    days: [Option<String>; 7],
}

impl WeeklyHours {
    /// Read hours from an upstream JSON value.
    ///
    /// Returns `None` when the value is not an object. Day values that are not
    /// strings are dropped, so that day reads as closed.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut hours = Self::default();
        for (idx, key) in DAY_KEYS.iter().enumerate() {
            hours.days[idx] = map
                .get(*key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
        }
        Some(hours)
    }

    #[must_use]
    pub fn with_day(mut self, day: Weekday, hours: impl Into<String>) -> Self {
        self.days[day.num_days_from_sunday() as usize] = Some(hours.into());
        self
    }

    #[must_use]
    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.days[day.num_days_from_sunday() as usize].as_deref()
    }

    #[must_use]
    pub fn entry(&self, day: Weekday, closed_markers: &[String]) -> HoursEntry {
        HoursEntry::classify(self.get(day), closed_markers)
    }

    /// Monday-first table of the week for store detail views.
    ///
    /// Missing or empty days display `closed_label`.
    #[must_use]
    pub fn schedule(&self, today: Weekday, locale: Locale, closed_label: &str) -> Vec<DaySchedule> {
        WEEK_FROM_MONDAY
            .iter()
            .map(|&day| DaySchedule {
                day: day_key(day),
                name: day_name(day, locale),
                hours: self
                    .get(day)
                    .filter(|h| !h.is_empty())
                    .unwrap_or(closed_label)
                    .to_string(),
                is_today: day == today,
            })
            .collect()
    }
}

/// One row of a weekly hours table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub day: &'static str,
    pub name: &'static str,
    pub hours: String,
    pub is_today: bool,
}

#[cfg(test)]
#[path = "hours_test.rs"]
mod tests;
