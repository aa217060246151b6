//! Open/closed status badges derived from weekly hours.
//!
//! Evaluation is total: every input shape maps to a [`StoreStatus`], with
//! missing or malformed data degrading to `Unknown` or a free-text `Open`.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::config::DEFAULT_CLOSED_MARKERS;
use crate::hours::{HoursEntry, WeeklyHours};
use crate::{AppConfig, Locale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Unknown,
    Open,
    Closed,
}

impl StatusCategory {
    #[must_use]
    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Fr, StatusCategory::Unknown) => "Inconnu",
            (Locale::Fr, StatusCategory::Open) => "Ouvert",
            (Locale::Fr, StatusCategory::Closed) => "Fermé",
            (Locale::En, StatusCategory::Unknown) => "Unknown",
            (Locale::En, StatusCategory::Open) => "Open",
            (Locale::En, StatusCategory::Closed) => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Red,
    Orange,
    Gray,
}

impl StatusColor {
    /// Badge background class used by the web client.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            StatusColor::Green => "bg-green-500",
            StatusColor::Red => "bg-red-500",
            StatusColor::Orange => "bg-orange-500",
            StatusColor::Gray => "bg-gray-500",
        }
    }
}

impl std::fmt::Display for StatusColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusColor::Green => write!(f, "green"),
            StatusColor::Red => write!(f, "red"),
            StatusColor::Orange => write!(f, "orange"),
            StatusColor::Gray => write!(f, "gray"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub category: StatusCategory,
    pub text: String,
    pub color: StatusColor,
}

impl StoreStatus {
    fn new(category: StatusCategory, text: impl Into<String>, color: StatusColor) -> Self {
        Self {
            category,
            text: text.into(),
            color,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.category == StatusCategory::Open
    }
}

/// Computes [`StoreStatus`] values for a fixed set of closed markers and locale.
#[derive(Debug, Clone)]
pub struct StatusEvaluator {
    closed_markers: Vec<String>,
    locale: Locale,
}

impl Default for StatusEvaluator {
    fn default() -> Self {
        Self::new(
            DEFAULT_CLOSED_MARKERS.split(',').map(str::to_string).collect(),
            Locale::default(),
        )
    }
}

impl StatusEvaluator {
    #[must_use]
    pub fn new(closed_markers: Vec<String>, locale: Locale) -> Self {
        Self {
            closed_markers,
            locale,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.closed_markers.clone(), config.locale)
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn closed_markers(&self) -> &[String] {
        &self.closed_markers
    }

    /// Text shown in the weekly table for a closed day, in the evaluator's locale.
    #[must_use]
    pub fn closed_label(&self) -> &'static str {
        StatusCategory::Closed.label(self.locale)
    }

    /// Status of a store at `now` given its parsed weekly hours.
    #[must_use]
    pub fn evaluate(&self, hours: Option<&WeeklyHours>, now: NaiveDateTime) -> StoreStatus {
        let Some(hours) = hours else {
            return StoreStatus::new(
                StatusCategory::Unknown,
                self.text(Message::NotProvided),
                StatusColor::Gray,
            );
        };

        match hours.entry(now.weekday(), &self.closed_markers) {
            HoursEntry::Closed => StoreStatus::new(
                StatusCategory::Closed,
                self.text(Message::ClosedToday),
                StatusColor::Red,
            ),
            HoursEntry::FreeText(text) => {
                StoreStatus::new(StatusCategory::Open, text, StatusColor::Green)
            }
            HoursEntry::Range(range) => {
                let current = now.hour() * 100 + now.minute();
                if current < range.open.hhmm() {
                    StoreStatus::new(
                        StatusCategory::Closed,
                        self.text(Message::OpensAt(&range.open.text)),
                        StatusColor::Orange,
                    )
                } else if current > range.close.hhmm() {
                    StoreStatus::new(
                        StatusCategory::Closed,
                        self.text(Message::OpensTomorrow),
                        StatusColor::Red,
                    )
                } else {
                    StoreStatus::new(
                        StatusCategory::Open,
                        self.text(Message::OpenUntil(&range.close.text)),
                        StatusColor::Green,
                    )
                }
            }
        }
    }

    /// Status from a raw upstream `openingHours` value of any shape.
    #[must_use]
    pub fn evaluate_value(
        &self,
        hours: Option<&serde_json::Value>,
        now: NaiveDateTime,
    ) -> StoreStatus {
        let parsed = hours.and_then(WeeklyHours::from_value);
        self.evaluate(parsed.as_ref(), now)
    }

    /// Like [`Self::evaluate_value`], at the local wall-clock time.
    #[must_use]
    pub fn evaluate_now(&self, hours: Option<&serde_json::Value>) -> StoreStatus {
        self.evaluate_value(hours, Local::now().naive_local())
    }

    fn text(&self, message: Message<'_>) -> String {
        match (self.locale, message) {
            (Locale::Fr, Message::NotProvided) => "Heures non renseignées".to_string(),
            (Locale::Fr, Message::ClosedToday) => "Fermé aujourd'hui".to_string(),
            (Locale::Fr, Message::OpenUntil(close)) => format!("Ouvert jusqu'à {close}"),
            (Locale::Fr, Message::OpensAt(open)) => format!("Ouvre à {open}"),
            (Locale::Fr, Message::OpensTomorrow) => "Fermé (ouvre demain)".to_string(),
            (Locale::En, Message::NotProvided) => "Hours not provided".to_string(),
            (Locale::En, Message::ClosedToday) => "Closed today".to_string(),
            (Locale::En, Message::OpenUntil(close)) => format!("Open until {close}"),
            (Locale::En, Message::OpensAt(open)) => format!("Opens at {open}"),
            (Locale::En, Message::OpensTomorrow) => "Closed (opens tomorrow)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Message<'a> {
    NotProvided,
    ClosedToday,
    OpenUntil(&'a str),
    OpensAt(&'a str),
    OpensTomorrow,
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
