#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

pub mod error;
pub mod export;
pub mod geometry;
pub mod map;

pub use geometry::bounds;
pub use geometry::geo_point;
pub use geometry::hull;
pub use geometry::polygon;

// Re-export key types for external use
pub use error::{InputError, SettingsError};
pub use geo_point::GeoPoint;
pub use hull::{compute_hull, hull_of};
pub use map::scene::MapScene;
pub use map::settings::{MapLayer, MapSettings, MapStyle};
pub use map::snapshot::MeshSnapshot;
pub use polygon::HullPolygon;

/// Parse a log level string into LevelFilter.
pub fn parse_log_level(level: Option<&str>) -> Result<log::LevelFilter, SettingsError> {
    match level {
        Some("error") => Ok(log::LevelFilter::Error),
        Some("warn") => Ok(log::LevelFilter::Warn),
        Some("info") | Some("") | None => Ok(log::LevelFilter::Info),
        Some("debug") => Ok(log::LevelFilter::Debug),
        Some("trace") => Ok(log::LevelFilter::Trace),
        Some(level) => Err(SettingsError::InvalidLogLevel(level.to_string())),
    }
}
