//! GeoJSON output for rendering surfaces that take standard features.
//!
//! Positions are written `[lon, lat]`; polygon rings are explicitly closed.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde_json::json;

use crate::{
    geometry::{geo_point::GeoPoint, polygon::HullPolygon},
    map::scene::MapScene,
};

fn position(p: &GeoPoint) -> Vec<f64> {
    p.lon_lat().to_vec()
}

fn positions(points: &[GeoPoint]) -> Vec<Vec<f64>> {
    points.iter().map(position).collect()
}

/// Geometry for a hull: `Polygon` with a closed ring, or `Point` /
/// `LineString` for degenerate hulls. `None` when the hull is empty.
pub fn hull_geometry(hull: &HullPolygon) -> Option<Geometry> {
    let value = match hull.len() {
        0 => return None,
        1 => Value::Point(position(&hull[0])),
        2 => Value::LineString(positions(hull)),
        _ => Value::Polygon(vec![positions(&hull.closed())]),
    };
    Some(Geometry::new(value))
}

/// `properties` must be a JSON object literal.
fn feature(geometry: Option<Geometry>, properties: JsonValue) -> Feature {
    let properties: Option<JsonObject> = match properties {
        JsonValue::Object(map) => Some(map),
        _ => None,
    };
    Feature {
        bbox: None,
        geometry,
        id: None,
        properties,
        foreign_members: None,
    }
}

fn point(p: &GeoPoint) -> Option<Geometry> {
    Some(Geometry::new(Value::Point(position(p))))
}

/// The hull alone, as a single feature (with no geometry when empty).
pub fn hull_to_geojson(hull: &HullPolygon) -> Feature {
    feature(
        hull_geometry(hull),
        json!({ "kind": "hull", "vertices": hull.len(), "area": hull.area() }),
    )
}

/// Every drawable element of `scene` as one `FeatureCollection`.
pub fn scene_to_geojson(scene: &MapScene) -> FeatureCollection {
    let mut features = Vec::new();

    if let Some(hull) = &scene.hull {
        if let Some(geometry) = hull_geometry(&hull.polygon) {
            features.push(feature(Some(geometry), json!({
                "kind": "hull",
                "stroke": hull.stroke.to_hex(),
                "stroke-width": hull.stroke_width,
                "fill": hull.fill.to_hex(),
                "fill-opacity": hull.fill_opacity,
            })));
        }
    }

    for route in &scene.routes {
        features.push(feature(
            Some(Geometry::new(Value::LineString(positions(&route.coordinates)))),
            json!({
                "kind": "route",
                "nodeNum": route.node_num,
                "stroke": route.gradient[2].to_hex(),
                "stroke-width": route.stroke_width,
                "dash": route.dash,
            }),
        ));
    }

    for pin in &scene.history {
        features.push(feature(
            point(&pin.coordinate),
            json!({
                "kind": "history",
                "nodeNum": pin.node_num,
                "label": pin.label,
                "marker-color": pin.fill.to_hex(),
            }),
        ));
    }

    for node in &scene.nodes {
        features.push(feature(
            point(&node.coordinate),
            json!({
                "kind": "node",
                "nodeNum": node.node_num,
                "title": node.label,
                "badge": node.badge,
                "marker-color": node.color.to_hex(),
                "online": node.pulse.is_some(),
            }),
        ));
    }

    for waypoint in &scene.waypoints {
        features.push(feature(
            point(&waypoint.coordinate),
            json!({
                "kind": "waypoint",
                "id": waypoint.id,
                "title": waypoint.label,
                "glyph": waypoint.glyph,
                "marker-color": waypoint.color.to_hex(),
            }),
        ));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
