use crate::app_config::{AppConfig, Locale};
use crate::geo::{GeoPoint, InvalidCoordinates};
use crate::ConfigError;

/// Closed markers used when `PRYCE_CLOSED_MARKERS` is unset.
pub const DEFAULT_CLOSED_MARKERS: &str = "Fermé,Closed";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<Option<f64>, ConfigError> {
        let raw = or_default(var, default);
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("none") || raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("PRYCE_LOG_LEVEL", "info");
    let stores_path = PathBuf::from(or_default("PRYCE_STORES_PATH", "./config/stores.yaml"));

    let locale = or_default("PRYCE_LOCALE", "fr")
        .parse::<Locale>()
        .map_err(|e| invalid("PRYCE_LOCALE", e.to_string()))?;

    let closed_markers = parse_closed_markers(&or_default(
        "PRYCE_CLOSED_MARKERS",
        DEFAULT_CLOSED_MARKERS,
    ));

    let default_lat = parse_f64("PRYCE_DEFAULT_LAT", "50.8503")?;
    let default_lng = parse_f64("PRYCE_DEFAULT_LNG", "4.3517")?;
    let default_location = match (default_lat, default_lng) {
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(invalid(
                    "PRYCE_DEFAULT_LAT",
                    format!("latitude {lat} is outside [-90, 90]"),
                ));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(invalid(
                    "PRYCE_DEFAULT_LNG",
                    format!("longitude {lng} is outside [-180, 180]"),
                ));
            }
            Some(GeoPoint::new(lat, lng))
        }
        (None, None) => None,
        (Some(_), None) => {
            return Err(invalid(
                "PRYCE_DEFAULT_LNG",
                "must be set when PRYCE_DEFAULT_LAT is set".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(invalid(
                "PRYCE_DEFAULT_LAT",
                "must be set when PRYCE_DEFAULT_LNG is set".to_string(),
            ))
        }
    };

    let invalid_coordinates = or_default("PRYCE_INVALID_COORDINATES", "zero")
        .parse::<InvalidCoordinates>()
        .map_err(|e| invalid("PRYCE_INVALID_COORDINATES", e.to_string()))?;

    let nearby_limit = parse_usize("PRYCE_NEARBY_LIMIT", "10")?;

    Ok(AppConfig {
        log_level,
        stores_path,
        locale,
        closed_markers,
        default_location,
        invalid_coordinates,
        nearby_limit,
    })
}

/// Split a comma-separated marker list, dropping blank entries.
fn parse_closed_markers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
