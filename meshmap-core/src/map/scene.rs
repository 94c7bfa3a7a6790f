//! Assembles what the rendering surface should draw for one snapshot.
//!
//! Nothing here touches a map widget: the output is plain data (markers,
//! polygons, polylines and their styling), rebuilt from scratch whenever the
//! snapshot or the view state changes.

use log::debug;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::geometry::{geo_point::GeoPoint, polygon::HullPolygon};

use super::{
    color::Rgb,
    position::{PositionRecord, PositionSnapshot},
    settings::MapStyle,
    state::MapViewState,
    waypoint::Waypoint,
};

pub const WAYPOINT_SIZE: f64 = 35.;
pub const NODE_SIZE: f64 = 40.;
pub const HISTORY_PIN_SIZE: f64 = 12.;
pub const HISTORY_PIN_BORDER: f64 = 2.;
pub const HULL_STROKE_WIDTH: f64 = 3.;
pub const HULL_FILL_OPACITY: f64 = 0.4;
pub const ROUTE_STROKE_WIDTH: f64 = 3.;
pub const ROUTE_DASH: [f64; 2] = [10., 10.];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct WaypointMarker {
    pub id: u32,
    pub label: String,
    pub glyph: String,
    pub coordinate: GeoPoint,
    pub color: Rgb,
    pub size: f64,
}

impl From<&Waypoint> for WaypointMarker {
    fn from(w: &Waypoint) -> Self {
        WaypointMarker {
            id: w.id,
            label: w.label().to_string(),
            glyph: w.glyph().to_string(),
            coordinate: w.coordinate,
            color: Rgb::ORANGE,
            size: WAYPOINT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct NodeMarker {
    pub node_num: u32,
    /// Long name, shown as the annotation title.
    pub label: String,
    /// Short name, drawn inside the circle.
    pub badge: String,
    pub coordinate: GeoPoint,
    pub color: Rgb,
    pub size: f64,
    /// Online nodes get a pulsing halo in a lighter shade.
    pub pulse: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct HullOverlay {
    pub polygon: HullPolygon,
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub fill: Rgb,
    pub fill_opacity: f64,
}

impl HullOverlay {
    pub fn new(polygon: HullPolygon) -> Self {
        HullOverlay {
            polygon,
            stroke: Rgb::BLUE,
            stroke_width: HULL_STROKE_WIDTH,
            fill: Rgb::INDIGO,
            fill_opacity: HULL_FILL_OPACITY,
        }
    }
}

/// Dashed polyline through a node's track, shaded from light (oldest) to the
/// node colour (newest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct RouteLine {
    pub node_num: u32,
    pub coordinates: Vec<GeoPoint>,
    pub gradient: [Rgb; 3],
    pub stroke_width: f64,
    pub dash: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPin {
    pub node_num: u32,
    /// Only the node's current fix is labelled.
    pub label: Option<String>,
    pub coordinate: GeoPoint,
    pub fill: Rgb,
    pub border: Rgb,
    pub border_width: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct MapScene {
    pub style: MapStyle,
    pub waypoints: Vec<WaypointMarker>,
    pub hull: Option<HullOverlay>,
    pub nodes: Vec<NodeMarker>,
    pub routes: Vec<RouteLine>,
    pub history: Vec<HistoryPin>,
}

impl MapScene {
    /// `waypoints` should already be filtered to the active ones (see
    /// [`active_waypoints`](super::waypoint::active_waypoints)).
    pub fn build(snapshot: &PositionSnapshot, waypoints: &[Waypoint], state: &MapViewState) -> MapScene {
        let settings = &state.settings;
        let mut scene = MapScene {
            style: state.style,
            ..MapScene::default()
        };

        if state.show_waypoints {
            scene.waypoints = waypoints.iter().map(WaypointMarker::from).collect();
        }

        if settings.show_convex_hull {
            scene.hull = Some(HullOverlay::new(snapshot.hull()));
        }

        for record in snapshot.iter() {
            let Some(coordinate) = record.location() else {
                debug!("scene: node {} has no coordinate, not plotted", record.node_num);
                continue;
            };
            let color = record.color();
            scene.nodes.push(NodeMarker {
                node_num: record.node_num,
                label: record.long_label().to_string(),
                badge: record.short_label().to_string(),
                coordinate,
                color,
                size: NODE_SIZE,
                pulse: record.online.then(|| color.lighter()),
            });
            if settings.show_route_lines {
                if let Some(route) = route_line(record) {
                    scene.routes.push(route);
                }
            }
            if settings.show_node_history {
                scene.history.extend(history_pins(record));
            }
        }

        debug!(
            "scene: {} nodes, {} waypoints, hull {:?}, {} routes, {} history pins",
            scene.nodes.len(),
            scene.waypoints.len(),
            scene.hull.as_ref().map(|h| h.polygon.len()),
            scene.routes.len(),
            scene.history.len(),
        );
        scene
    }
}

/// History coordinates followed by the current fix, oldest first.
fn full_track(record: &PositionRecord) -> Vec<GeoPoint> {
    let mut track = record.track();
    if let Some(current) = record.location() {
        if track.last() != Some(&current) {
            track.push(current);
        }
    }
    track
}

fn route_line(record: &PositionRecord) -> Option<RouteLine> {
    let coordinates = full_track(record);
    if coordinates.len() < 2 {
        return None;
    }
    let color = record.color();
    Some(RouteLine {
        node_num: record.node_num,
        coordinates,
        gradient: [color.lighter().lighter(), color.lighter(), color],
        stroke_width: ROUTE_STROKE_WIDTH,
        dash: ROUTE_DASH,
    })
}

fn history_pins(record: &PositionRecord) -> Vec<HistoryPin> {
    let color = record.color();
    // Newest first: the current fix, when present, is the first pin.
    let current_first = record.latest && record.location().is_some();
    full_track(record)
        .into_iter()
        .rev()
        .enumerate()
        .map(|(idx, coordinate)| HistoryPin {
            node_num: record.node_num,
            label: (idx == 0 && current_first).then(|| record.short_label().to_string()),
            coordinate,
            fill: color,
            border: color.contrast(),
            border_width: HISTORY_PIN_BORDER,
            size: HISTORY_PIN_SIZE,
        })
        .collect()
}
