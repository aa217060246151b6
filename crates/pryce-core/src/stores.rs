use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::{coerce_coordinate, GeoPoint, Locatable};
use crate::hours::WeeklyHours;
use crate::status::{StatusEvaluator, StoreStatus};
use crate::{ConfigError, CoreError};

/// A store record in the shape served by the store API.
///
/// Coordinates and opening hours stay as raw JSON because upstream data may
/// carry numeric strings, nulls or malformed objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<serde_json::Value>,
    #[serde(default)]
    pub longitude: Option<serde_json::Value>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub opening_hours: Option<serde_json::Value>,
}

fn default_active() -> bool {
    true
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}

impl Store {
    /// Parsed opening hours, `None` when absent or not an object.
    #[must_use]
    pub fn weekly_hours(&self) -> Option<WeeklyHours> {
        self.opening_hours.as_ref().and_then(WeeklyHours::from_value)
    }

    #[must_use]
    pub fn status_at(&self, evaluator: &StatusEvaluator, now: NaiveDateTime) -> StoreStatus {
        evaluator.evaluate_value(self.opening_hours.as_ref(), now)
    }
}

impl Locatable for Store {
    fn location(&self) -> Option<GeoPoint> {
        let lat = coerce_coordinate(self.latitude.as_ref()?)?;
        let lng = coerce_coordinate(self.longitude.as_ref()?)?;
        GeoPoint::new(lat, lng).location()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<Store>,
}

impl StoresFile {
    /// Stores flagged active, in file order.
    pub fn active(&self) -> impl Iterator<Item = &Store> {
        self.stores.iter().filter(|s| s.is_active)
    }

    /// # Errors
    ///
    /// Returns `CoreError::StoreNotFound` when no store has this id.
    pub fn find(&self, id: &str) -> Result<&Store, CoreError> {
        self.stores
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::StoreNotFound(id.to_string()))
    }
}

/// Parse and validate a stores document (YAML, or JSON as a YAML subset).
///
/// # Errors
///
/// Returns `ConfigError` if the document cannot be parsed or fails validation.
pub fn parse_stores(content: &str) -> Result<StoresFile, ConfigError> {
    let stores_file: StoresFile =
        serde_yaml::from_str(content).map_err(ConfigError::StoresFileParse)?;
    validate_stores(&stores_file)?;
    Ok(stores_file)
}

/// Load and validate the stores catalog from a YAML or JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_stores(&content)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for store in &stores_file.stores {
        if store.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty id",
                store.name
            )));
        }

        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty name",
                store.id
            )));
        }

        if !seen_ids.insert(store.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
