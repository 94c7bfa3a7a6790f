//! WASM bindings for mesh map hulls and overlays.
//!
//! A browser map surface hands over plain JS objects (positions, waypoints,
//! preferences) and gets back drawable data: hull vertices, a [`MapScene`],
//! or GeoJSON.

use chrono::{DateTime, Utc};
use geojson::GeoJson;
use log::{error, info};
use meshmap_core::{
    export::scene_to_geojson,
    map::{position::PositionRecord, state::MapViewState, waypoint::Waypoint},
    GeoPoint, MapScene, MapSettings, MeshSnapshot,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;

/// Initializes the logging system for WASM.
///
/// Sets up console logging and panic hooks for better error reporting in the browser.
/// Should be called once at application startup.
#[wasm_bindgen]
pub fn init_logs() {
    match log::set_logger(&DEFAULT_LOGGER) {
        Ok(_) => info!("Initialized console.logger"),
        Err(e) => error!("failed to set console.logger: {}", e),
    };
    console_error_panic_hook::set_once();
}

/// Updates the log level filter.
///
/// # Arguments
/// * `level` - Log level string: "error", "warn", "info", "debug", or "trace".
///   Defaults to "info" if empty or null.
#[wasm_bindgen]
pub fn update_log_level(level: JsValue) -> Result<(), JsError> {
    let level: Option<String> = serde_wasm_bindgen::from_value(level)?;
    let level = meshmap_core::parse_log_level(level.as_deref())?;
    log::set_max_level(level);
    Ok(())
}

/// Computes the convex hull of a set of node positions.
///
/// # Arguments
/// * `points` - Array of `{lat, lon}` objects; `null` entries are skipped.
///
/// # Returns
/// Counter-clockwise hull vertices. Fewer than three entries means the hull
/// is degenerate (empty, a point, or a segment).
#[wasm_bindgen]
pub fn compute_hull(points: JsValue) -> Result<JsValue, JsError> {
    let points: Vec<Option<GeoPoint>> = serde_wasm_bindgen::from_value(points)?;
    let hull = meshmap_core::hull_of(points);
    Ok(serde_wasm_bindgen::to_value(&hull)?)
}

fn snapshot_from(records: JsValue, waypoints: JsValue, settings: JsValue) -> Result<MeshSnapshot, JsError> {
    let records: Vec<PositionRecord> = serde_wasm_bindgen::from_value(records)?;
    let waypoints: Vec<Waypoint> = if waypoints.is_undefined() || waypoints.is_null() {
        vec![]
    } else {
        serde_wasm_bindgen::from_value(waypoints)?
    };
    let settings: MapSettings = if settings.is_undefined() || settings.is_null() {
        MapSettings::default()
    } else {
        serde_wasm_bindgen::from_value(settings)?
    };
    Ok(MeshSnapshot { records, waypoints, settings, show_waypoints: false })
}

/// `now_ms` or, when absent, the browser clock.
fn instant(now_ms: Option<f64>) -> Result<DateTime<Utc>, JsError> {
    let now_ms = now_ms.unwrap_or_else(js_sys::Date::now);
    DateTime::<Utc>::from_timestamp_millis(now_ms as i64)
        .ok_or_else(|| JsError::new(&format!("timestamp out of range: {}", now_ms)))
}

/// Builds everything the map should draw.
///
/// # Arguments
/// * `records` - Position records from the position store.
/// * `waypoints` - Waypoints (optional); expired ones are dropped.
/// * `state` - A [`MapViewState`] (settings, style, toggles, selection).
/// * `now_ms` - Current time in milliseconds since the epoch; defaults to `Date.now()`.
#[wasm_bindgen]
pub fn build_scene(records: JsValue, waypoints: JsValue, state: JsValue, now_ms: Option<f64>) -> Result<JsValue, JsError> {
    let state: MapViewState = serde_wasm_bindgen::from_value(state)?;
    let snapshot = snapshot_from(records, waypoints, JsValue::NULL)?;
    let now = instant(now_ms)?;
    let waypoints = meshmap_core::map::waypoint::active_waypoints(&snapshot.waypoints, now);
    let scene = MapScene::build(&snapshot.positions(now), &waypoints, &state);
    Ok(serde_wasm_bindgen::to_value(&scene)?)
}

/// Initial view state for a set of stored preferences.
#[wasm_bindgen]
pub fn initial_state(settings: JsValue) -> Result<JsValue, JsError> {
    let settings: MapSettings = serde_wasm_bindgen::from_value(settings)?;
    Ok(serde_wasm_bindgen::to_value(&MapViewState::new(settings))?)
}

/// Applies a map layer change to a view state.
///
/// # Returns
/// The updated [`MapViewState`]; choosing "offline" keeps the current style.
#[wasm_bindgen]
pub fn set_layer(state: JsValue, layer: &str) -> Result<JsValue, JsError> {
    let mut state: MapViewState = serde_wasm_bindgen::from_value(state)?;
    state.set_layer(layer.parse()?);
    Ok(serde_wasm_bindgen::to_value(&state)?)
}

/// Same inputs as [`build_scene`] with plain settings, returned as a GeoJSON
/// `FeatureCollection` (as a JSON string).
#[wasm_bindgen]
pub fn scene_geojson(records: JsValue, waypoints: JsValue, settings: JsValue, now_ms: Option<f64>) -> Result<String, JsError> {
    let mut snapshot = snapshot_from(records, waypoints, settings)?;
    snapshot.show_waypoints = !snapshot.waypoints.is_empty();
    let scene = snapshot.scene(instant(now_ms)?);
    Ok(GeoJson::from(scene_to_geojson(&scene)).to_string())
}
