use std::path::PathBuf;

use chrono::{NaiveDate, Timelike};
use pryce_core::{
    parse_stores, AppConfig, GeoPoint, InvalidCoordinates, Locale, StatusCategory,
    StatusEvaluator, StoresFile,
};

use super::*;

const CATALOG: &str = r#"
stores:
  - id: 1
    name: Delhaize Grand-Place
    city: Bruxelles
    latitude: 50.8593
    longitude: 4.3517
    openingHours:
      monday: "08:00-20:00"
      tuesday: "24h/24"
      wednesday: "22:00-06:00"
      sunday: Fermé
  - id: 2
    name: Carrefour Vilvoorde
    city: Vilvoorde
    latitude: "50.9314"
    longitude: "4.3517"
    openingHours: "lun-sam 9h-21h"
  - id: 3
    name: Lidl sans adresse
  - id: 4
    name: Aldi fermé définitivement
    isActive: false
    latitude: 50.8504
    longitude: 4.3517
"#;

fn catalog() -> StoresFile {
    parse_stores(CATALOG).expect("valid test catalog")
}

fn test_config() -> AppConfig {
    AppConfig {
        log_level: "info".to_string(),
        stores_path: PathBuf::from("./config/stores.yaml"),
        locale: Locale::En,
        closed_markers: vec!["Fermé".to_string(), "Closed".to_string()],
        default_location: Some(GeoPoint::new(50.8503, 4.3517)),
        invalid_coordinates: InvalidCoordinates::Last,
        nearby_limit: 10,
    }
}

fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["pryce-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.stores.is_none());
}

#[test]
fn parses_status_with_time_and_store() {
    let cli = Cli::try_parse_from([
        "pryce-cli",
        "status",
        "--store",
        "1",
        "--at",
        "2024-01-01T09:15",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Status { store, at, json }) => {
            assert_eq!(store.as_deref(), Some("1"));
            let at = at.unwrap();
            assert_eq!((at.hour(), at.minute()), (9, 15));
            assert!(!json);
        }
        other => panic!("expected status command, got {other:?}"),
    }
}

#[test]
fn rejects_malformed_status_time() {
    let result = Cli::try_parse_from(["pryce-cli", "status", "--at", "monday 9am"]);
    assert!(result.is_err());
}

#[test]
fn parses_nearby_with_negative_longitude() {
    let cli = Cli::try_parse_from([
        "pryce-cli",
        "--stores",
        "/tmp/stores.json",
        "nearby",
        "--lat",
        "51.5074",
        "--lng",
        "-0.1278",
        "--limit",
        "3",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.stores, Some(PathBuf::from("/tmp/stores.json")));
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            lat: Some(_),
            lng: Some(_),
            limit: Some(3),
            json: false,
        })
    ));
}

#[test]
fn nearby_lat_requires_lng() {
    let result = Cli::try_parse_from(["pryce-cli", "nearby", "--lat", "50.85"]);
    assert!(result.is_err());
}

#[test]
fn hours_requires_store() {
    assert!(Cli::try_parse_from(["pryce-cli", "hours"]).is_err());
    let cli = Cli::try_parse_from(["pryce-cli", "hours", "--store", "2"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Hours { ref store }) if store == "2"));
}

#[test]
fn parse_at_accepts_space_and_seconds() {
    assert_eq!(parse_at("2024-01-01 07:00").unwrap(), monday_at(7, 0));
    assert_eq!(parse_at("2024-01-01T21:00:00").unwrap(), monday_at(21, 0));
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[test]
fn status_rows_cover_active_stores() {
    let catalog = catalog();
    let evaluator = StatusEvaluator::from_config(&test_config());
    let rows = views::status_rows(&catalog, &evaluator, monday_at(9, 0), None).unwrap();

    let ids: Vec<_> = rows.iter().map(|(s, _)| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(rows[0].1.category, StatusCategory::Open);
    assert_eq!(rows[1].1.category, StatusCategory::Unknown);
    assert_eq!(rows[2].1.category, StatusCategory::Unknown);

    let line = views::status_line(rows[0].0, &rows[0].1, Locale::En);
    assert!(line.contains("Delhaize Grand-Place"));
    assert!(line.contains("Open until 20:00"));
}

#[test]
fn status_rows_for_unknown_store_fail() {
    let catalog = catalog();
    let evaluator = StatusEvaluator::from_config(&test_config());
    assert!(views::status_rows(&catalog, &evaluator, monday_at(9, 0), Some("99")).is_err());
}

#[test]
fn status_rows_can_target_inactive_store() {
    let catalog = catalog();
    let evaluator = StatusEvaluator::from_config(&test_config());
    let rows = views::status_rows(&catalog, &evaluator, monday_at(9, 0), Some("4")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0.id, "4");
}

#[test]
fn nearby_rows_use_default_location() {
    let config = test_config();
    let catalog = catalog();
    let rows = views::nearby_rows(&config, &catalog, None, None);

    let ids: Vec<_> = rows.iter().map(|r| r.entity.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(views::nearby_line(&rows[0]).contains("1.0 km"));
    let unlocated = views::nearby_line(&rows[2]);
    assert!(unlocated.trim_start().starts_with("- "), "{unlocated}");
    assert!(unlocated.is_ascii(), "{unlocated}");
}

#[test]
fn nearby_rows_rank_out_of_range_store_by_raw_distance() {
    let catalog = parse_stores(
        r#"
stores:
  - id: bogus
    name: Typo Market
    latitude: 123.0
    longitude: 4.0
  - id: near
    name: Delhaize Grand-Place
    latitude: "50.8593 N"
    longitude: "4.3517 E"
"#,
    )
    .unwrap();
    let config = AppConfig {
        invalid_coordinates: InvalidCoordinates::Zero,
        ..test_config()
    };
    let rows = views::nearby_rows(&config, &catalog, None, None);

    let ids: Vec<_> = rows.iter().map(|r| r.entity.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "bogus"]);
    assert!((rows[0].distance_km.unwrap() - 1.0).abs() < 0.05);
    assert!(rows[1].distance_km.unwrap() > 7000.0);

    let evaluator = StatusEvaluator::from_config(&config);
    let issues = views::check_catalog(&catalog, &evaluator);
    let bogus: Vec<_> = issues.iter().filter(|i| i.store_id == "bogus").collect();
    assert_eq!(bogus.len(), 2, "{issues:?}");
    assert!(bogus[1].message.contains("out of range"));
    assert!(issues.iter().all(|i| i.store_id != "near" || !i.message.contains("coordinates")));
}

#[test]
fn nearby_rows_prefer_user_location_and_limit() {
    let config = test_config();
    let catalog = catalog();
    let vilvoorde = GeoPoint::new(50.9314, 4.3517);
    let rows = views::nearby_rows(&config, &catalog, Some(vilvoorde), Some(1));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entity.id, "2");
}

#[test]
fn nearby_rows_without_any_reference_keep_order() {
    let config = AppConfig {
        default_location: None,
        ..test_config()
    };
    let catalog = catalog();
    let rows = views::nearby_rows(&config, &catalog, None, None);
    let ids: Vec<_> = rows.iter().map(|r| r.entity.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(rows.iter().all(|r| r.distance_km.is_none()));
}

#[test]
fn hours_lines_mark_today() {
    let catalog = catalog();
    let evaluator = StatusEvaluator::from_config(&test_config());
    let lines = views::hours_lines(catalog.find("1").unwrap(), &evaluator, monday_at(7, 0));

    assert_eq!(lines.len(), 8);
    assert!(lines[0].contains("Opens at 08:00"), "{}", lines[0]);
    assert!(lines[1].starts_with("* Monday"), "{}", lines[1]);
    assert!(lines[1].contains("08:00-20:00"));
    assert!(lines[0].starts_with("Delhaize Grand-Place - Closed:"), "{}", lines[0]);
    assert!(lines[4].contains("Closed"), "{}", lines[4]);
    assert!(!lines[4].contains("Fermé"), "{}", lines[4]);
    assert!(lines[7].starts_with("  Sunday"), "{}", lines[7]);
}

#[test]
fn hours_lines_without_weekly_map() {
    let catalog = catalog();
    let evaluator = StatusEvaluator::from_config(&test_config());
    let lines = views::hours_lines(catalog.find("2").unwrap(), &evaluator, monday_at(7, 0));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "Hours not provided");
}

#[test]
fn check_catalog_reports_degraded_entries() {
    let catalog = catalog();
    let evaluator = StatusEvaluator::from_config(&test_config());
    let issues = views::check_catalog(&catalog, &evaluator);

    let for_store = |id: &str| -> Vec<&str> {
        issues
            .iter()
            .filter(|i| i.store_id == id)
            .map(|i| i.message.as_str())
            .collect()
    };

    let first = for_store("1");
    assert_eq!(first.len(), 2, "{first:?}");
    assert!(first[0].starts_with("tuesday:"));
    assert!(first[1].starts_with("wednesday:") && first[1].contains("overnight"));

    assert_eq!(for_store("2"), vec!["opening hours are not a weekly map"]);
    assert_eq!(
        for_store("3"),
        vec!["no opening hours", "missing or invalid coordinates"]
    );
    assert_eq!(for_store("4"), vec!["no opening hours"]);
}
