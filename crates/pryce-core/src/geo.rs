//! Great-circle distances and nearest-first ordering.
//!
//! Distances use the haversine formula on a spherical Earth of radius
//! [`EARTH_RADIUS_KM`], which is accurate to well under 1% at city scale.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Longest leading decimal literal, optionally signed and with an exponent.
static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("float prefix regex is valid")
});

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers. Enough to compute a distance.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite and within latitude/longitude bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Haversine distance between two points, in kilometers.
#[must_use]
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Anything that can be placed on a map.
pub trait Locatable {
    /// `None` when a coordinate is missing or not a finite number.
    ///
    /// Out-of-range values still count as located; ranking uses whatever
    /// distance the haversine formula yields for them.
    fn location(&self) -> Option<GeoPoint>;
}

impl Locatable for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        self.is_finite().then_some(*self)
    }
}

impl<T: Locatable> Locatable for &T {
    fn location(&self) -> Option<GeoPoint> {
        (**self).location()
    }
}

/// Read an upstream coordinate that may be a JSON number or a numeric string.
///
/// Strings are read up to the end of their leading number, so `"50.9314 N"`
/// yields `50.9314` and `"north"` yields `None`.
#[must_use]
pub fn coerce_coordinate(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn parse_float_prefix(raw: &str) -> Option<f64> {
    let m = FLOAT_PREFIX_RE.find(raw.trim_start())?;
    m.as_str().parse::<f64>().ok()
}

/// What to do with entities whose coordinates cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidCoordinates {
    /// Rank at distance 0, ahead of every located entity.
    #[default]
    Zero,
    /// Keep after all located entities, without a distance.
    Last,
    /// Drop from the result.
    Exclude,
}

impl std::fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidCoordinates::Zero => write!(f, "zero"),
            InvalidCoordinates::Last => write!(f, "last"),
            InvalidCoordinates::Exclude => write!(f, "exclude"),
        }
    }
}

impl FromStr for InvalidCoordinates {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(InvalidCoordinates::Zero),
            "last" => Ok(InvalidCoordinates::Last),
            "exclude" => Ok(InvalidCoordinates::Exclude),
            other => Err(CoreError::InvalidCoordinatePolicy(other.to_string())),
        }
    }
}

/// An entity annotated with its distance from the reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub entity: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Annotate `entities` with their distance from `reference` and sort them
/// nearest-first. Equal distances keep their input order.
///
/// Without a (valid) reference the input is returned in its original order
/// with no distances attached.
#[must_use]
pub fn rank_by_distance<T: Locatable>(
    reference: Option<GeoPoint>,
    entities: Vec<T>,
    policy: InvalidCoordinates,
) -> Vec<Ranked<T>> {
    let Some(reference) = reference.filter(GeoPoint::is_valid) else {
        return entities
            .into_iter()
            .map(|entity| Ranked {
                entity,
                distance_km: None,
            })
            .collect();
    };

    let mut located = Vec::with_capacity(entities.len());
    let mut unlocated = Vec::new();

    for entity in entities {
        match (entity.location(), policy) {
            (Some(point), _) => {
                let distance = haversine_km(reference, point);
                located.push(Ranked {
                    entity,
                    distance_km: Some(distance),
                });
            }
            (None, InvalidCoordinates::Zero) => located.push(Ranked {
                entity,
                distance_km: Some(0.0),
            }),
            (None, InvalidCoordinates::Last) => unlocated.push(Ranked {
                entity,
                distance_km: None,
            }),
            (None, InvalidCoordinates::Exclude) => {}
        }
    }

    // `sort_by` is stable, so ties keep input order.
    located.sort_by(|a, b| {
        a.distance_km
            .unwrap_or(0.0)
            .total_cmp(&b.distance_km.unwrap_or(0.0))
    });
    located.extend(unlocated);
    located
}

/// The `limit` entities closest to `reference`.
#[must_use]
pub fn nearest<T: Locatable>(
    reference: Option<GeoPoint>,
    entities: Vec<T>,
    limit: usize,
    policy: InvalidCoordinates,
) -> Vec<Ranked<T>> {
    let mut ranked = rank_by_distance(reference, entities, policy);
    ranked.truncate(limit);
    ranked
}

/// Prefer the user's own location, else the configured fallback.
#[must_use]
pub fn resolve_reference(user: Option<GeoPoint>, fallback: Option<GeoPoint>) -> Option<GeoPoint> {
    user.filter(GeoPoint::is_valid)
        .or_else(|| fallback.filter(GeoPoint::is_valid))
}

/// Distance label as shown on store cards, e.g. `"1.4 km"`.
#[must_use]
pub fn format_distance_km(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}

#[cfg(test)]
#[path = "geo_test.rs"]
mod tests;
