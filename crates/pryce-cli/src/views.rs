//! Command handlers for the CLI.
//!
//! Each `run_*` loads the catalog, builds its rows with a pure helper and
//! prints them. Data-quality problems are reported, never fatal.

use std::path::Path;

use chrono::{Datelike, Local, NaiveDateTime};
use pryce_core::geo::{format_distance_km, resolve_reference};
use pryce_core::hours::{day_key, HoursEntry, WEEK_FROM_MONDAY};
use pryce_core::{
    nearest, AppConfig, GeoPoint, Locatable, Locale, Ranked, StatusEvaluator, Store,
    StoreStatus, StoresFile,
};

fn load_catalog(path: &Path) -> anyhow::Result<StoresFile> {
    let catalog = pryce_core::load_stores(path)?;
    tracing::debug!(
        path = %path.display(),
        stores = catalog.stores.len(),
        "loaded stores catalog"
    );
    Ok(catalog)
}

/// Status of the requested store, or of every active store.
pub(crate) fn status_rows<'a>(
    catalog: &'a StoresFile,
    evaluator: &StatusEvaluator,
    now: NaiveDateTime,
    only: Option<&str>,
) -> anyhow::Result<Vec<(&'a Store, StoreStatus)>> {
    if let Some(id) = only {
        let store = catalog.find(id)?;
        return Ok(vec![(store, store.status_at(evaluator, now))]);
    }
    Ok(catalog
        .active()
        .map(|store| (store, store.status_at(evaluator, now)))
        .collect())
}

pub(crate) fn status_line(store: &Store, status: &StoreStatus, locale: Locale) -> String {
    format!(
        "{:<32} {:<8} {:<7} {}",
        store.name,
        status.category.label(locale),
        status.color.to_string(),
        status.text
    )
}

/// Print status badges for active stores (or one store).
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or `only` names an
/// unknown store.
pub(crate) fn run_status(
    config: &AppConfig,
    stores_path: &Path,
    only: Option<&str>,
    at: Option<NaiveDateTime>,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(stores_path)?;
    let evaluator = StatusEvaluator::from_config(config);
    let now = at.unwrap_or_else(|| Local::now().naive_local());
    let rows = status_rows(&catalog, &evaluator, now, only)?;

    if json {
        let payload: Vec<_> = rows
            .iter()
            .map(|(store, status)| {
                serde_json::json!({
                    "id": store.id,
                    "name": store.name,
                    "label": status.category.label(evaluator.locale()),
                    "status": status,
                    "badge_class": status.color.css_class(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for (store, status) in &rows {
        println!("{}", status_line(store, status, evaluator.locale()));
    }
    Ok(())
}

/// Active stores ranked around the user location or the configured fallback.
pub(crate) fn nearby_rows<'a>(
    config: &AppConfig,
    catalog: &'a StoresFile,
    user: Option<GeoPoint>,
    limit: Option<usize>,
) -> Vec<Ranked<&'a Store>> {
    let reference = resolve_reference(user, config.default_location);
    if reference.is_none() {
        tracing::info!("no reference point available; keeping catalog order");
    }
    nearest(
        reference,
        catalog.active().collect(),
        limit.unwrap_or(config.nearby_limit),
        config.invalid_coordinates,
    )
}

pub(crate) fn nearby_line(ranked: &Ranked<&Store>) -> String {
    let distance = ranked
        .distance_km
        .map_or_else(|| "-".to_string(), format_distance_km);
    format!(
        "{:>10}  {:<32} {}",
        distance,
        ranked.entity.name,
        ranked.entity.city.as_deref().unwrap_or("")
    )
}

/// Print active stores nearest-first.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or serialized.
pub(crate) fn run_nearby(
    config: &AppConfig,
    stores_path: &Path,
    user: Option<GeoPoint>,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(stores_path)?;
    let rows = nearby_rows(config, &catalog, user, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!("{}", nearby_line(row));
    }
    Ok(())
}

/// Weekly hours table lines for one store, today marked with `*`.
pub(crate) fn hours_lines(
    store: &Store,
    evaluator: &StatusEvaluator,
    now: NaiveDateTime,
) -> Vec<String> {
    let status = store.status_at(evaluator, now);
    let mut lines = vec![format!(
        "{} - {}: {}",
        store.name,
        status.category.label(evaluator.locale()),
        status.text
    )];

    match store.weekly_hours() {
        Some(hours) => {
            for row in hours.schedule(now.weekday(), evaluator.locale(), evaluator.closed_label()) {
                let marker = if row.is_today { "*" } else { " " };
                lines.push(format!("{marker} {:<10} {}", row.name, row.hours));
            }
        }
        None => lines.push(evaluator.evaluate(None, now).text),
    }
    lines
}

/// Print the weekly hours of one store.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the store is unknown.
pub(crate) fn run_hours(config: &AppConfig, stores_path: &Path, id: &str) -> anyhow::Result<()> {
    let catalog = load_catalog(stores_path)?;
    let evaluator = StatusEvaluator::from_config(config);
    let store = catalog.find(id)?;
    for line in hours_lines(store, &evaluator, Local::now().naive_local()) {
        println!("{line}");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Issue {
    pub store_id: String,
    pub message: String,
}

/// Catalog entries whose hours or coordinates will degrade to a fallback.
pub(crate) fn check_catalog(catalog: &StoresFile, evaluator: &StatusEvaluator) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut push = |store: &Store, message: String| {
        issues.push(Issue {
            store_id: store.id.clone(),
            message,
        });
    };

    for store in &catalog.stores {
        match (store.opening_hours.as_ref(), store.weekly_hours()) {
            (None, _) => push(store, "no opening hours".to_string()),
            (Some(_), None) => push(store, "opening hours are not a weekly map".to_string()),
            (Some(_), Some(hours)) => {
                for day in WEEK_FROM_MONDAY {
                    match hours.entry(day, evaluator.closed_markers()) {
                        HoursEntry::FreeText(text) => push(
                            store,
                            format!(
                                "{}: '{text}' is not an HH:MM-HH:MM range and reads as always open",
                                day_key(day)
                            ),
                        ),
                        HoursEntry::Range(range) if range.close.hhmm() < range.open.hhmm() => {
                            push(
                                store,
                                format!(
                                    "{}: closes at {} before opening at {}; overnight ranges are not supported",
                                    day_key(day),
                                    range.close.text,
                                    range.open.text
                                ),
                            );
                        }
                        HoursEntry::Closed | HoursEntry::Range(_) => {}
                    }
                }
            }
        }

        match store.location() {
            None => push(store, "missing or invalid coordinates".to_string()),
            Some(point) if !point.is_valid() => push(
                store,
                format!(
                    "coordinates ({}, {}) are out of range and rank by their raw distance",
                    point.lat, point.lng
                ),
            ),
            Some(_) => {}
        }
    }

    issues
}

/// Print data-quality warnings for the whole catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub(crate) fn run_check(config: &AppConfig, stores_path: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(stores_path)?;
    let evaluator = StatusEvaluator::from_config(config);
    let issues = check_catalog(&catalog, &evaluator);

    for issue in &issues {
        tracing::warn!(store = %issue.store_id, "{}", issue.message);
        println!("{}: {}", issue.store_id, issue.message);
    }
    println!(
        "checked {} stores, {} issue(s)",
        catalog.stores.len(),
        issues.len()
    );
    Ok(())
}
