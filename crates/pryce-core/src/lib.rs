pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod hours;
pub mod status;
pub mod stores;

pub use app_config::{AppConfig, Locale};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use geo::{
    haversine_km, nearest, rank_by_distance, GeoPoint, InvalidCoordinates, Locatable, Ranked,
};
pub use hours::{HoursEntry, TimeRange, WeeklyHours};
pub use status::{StatusCategory, StatusColor, StatusEvaluator, StoreStatus};
pub use stores::{load_stores, parse_stores, Store, StoresFile};
