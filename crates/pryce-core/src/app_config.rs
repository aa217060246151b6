use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, InvalidCoordinates};
use crate::CoreError;

/// Language used for status labels, status texts and day names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Fr => write!(f, "fr"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-be" | "fr-fr" => Ok(Locale::Fr),
            "en" | "en-gb" | "en-us" => Ok(Locale::En),
            other => Err(CoreError::InvalidLocale(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub stores_path: PathBuf,
    pub locale: Locale,
    /// Day values meaning "not open this day", compared case-insensitively.
    pub closed_markers: Vec<String>,
    /// Reference point used when the caller has no location of its own.
    pub default_location: Option<GeoPoint>,
    pub invalid_coordinates: InvalidCoordinates,
    pub nearby_limit: usize,
}
