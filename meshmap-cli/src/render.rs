//! SVG preview of a map scene (no base map, just the overlays).

use std::fmt::{self, Write};

use meshmap_core::{bounds::Bounds, GeoPoint, MapScene};

/// SVG rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Padding around the plotted points (fraction of their extent)
    pub padding: f64,
    /// Whether to draw node short names
    pub show_labels: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 0.1,
            show_labels: true,
        }
    }
}

/// Degrees of padding used when everything sits on one point or line.
const MIN_PAD_DEGREES: f64 = 0.001;

/// Maps degrees onto the canvas, north up.
struct Projection {
    bounds: Bounds,
    width: f64,
    height: f64,
}

impl Projection {
    fn xy(&self, p: &GeoPoint) -> (f64, f64) {
        let x = (p.lon - self.bounds.min_lon) / self.bounds.width() * self.width;
        let y = (self.bounds.max_lat - p.lat) / self.bounds.height() * self.height;
        (x, y)
    }

    fn points(&self, pts: &[GeoPoint]) -> String {
        pts.iter()
            .map(|p| {
                let (x, y) = self.xy(p);
                format!("{:.2},{:.2}", x, y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Every coordinate the scene draws.
fn scene_points(scene: &MapScene) -> Vec<GeoPoint> {
    let mut pts: Vec<GeoPoint> = scene.nodes.iter().map(|n| n.coordinate).collect();
    pts.extend(scene.waypoints.iter().map(|w| w.coordinate));
    pts.extend(scene.history.iter().map(|h| h.coordinate));
    pts.extend(scene.routes.iter().flat_map(|r| r.coordinates.iter().copied()));
    if let Some(hull) = &scene.hull {
        pts.extend(hull.polygon.iter().copied());
    }
    pts
}

/// Render scene overlays to an SVG string
pub fn render_svg(scene: &MapScene, config: &RenderConfig) -> Result<String, fmt::Error> {
    let bounds = Bounds::of(&scene_points(scene))
        .unwrap_or(Bounds { min_lat: -1., max_lat: 1., min_lon: -1., max_lon: 1. })
        .padded(config.padding, MIN_PAD_DEGREES);
    let proj = Projection { bounds, width: config.width, height: config.height };

    let mut svg = String::new();

    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, config.height, config.width, config.height
    )?;
    writeln!(&mut svg, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;

    if let Some(hull) = &scene.hull {
        let style = format!(
            r#"fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{}""#,
            hull.fill, hull.fill_opacity, hull.stroke, hull.stroke_width
        );
        match hull.polygon.len() {
            0 | 1 => {}
            2 => writeln!(&mut svg, r#"  <polyline class="hull" points="{}" {}/>"#, proj.points(&hull.polygon), style)?,
            _ => writeln!(&mut svg, r#"  <polygon class="hull" points="{}" {}/>"#, proj.points(&hull.polygon), style)?,
        }
    }

    for route in &scene.routes {
        writeln!(
            &mut svg,
            r#"  <polyline class="route" points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-dasharray="{} {}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            proj.points(&route.coordinates), route.gradient[2], route.stroke_width, route.dash[0], route.dash[1]
        )?;
    }

    for pin in &scene.history {
        let (x, y) = proj.xy(&pin.coordinate);
        writeln!(
            &mut svg,
            r#"  <circle class="history" cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            x, y, pin.size / 2., pin.fill, pin.border, pin.border_width
        )?;
    }

    for waypoint in &scene.waypoints {
        let (x, y) = proj.xy(&waypoint.coordinate);
        writeln!(
            &mut svg,
            r#"  <circle class="waypoint" cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
            x, y, waypoint.size / 2., waypoint.color
        )?;
        writeln!(
            &mut svg,
            r#"  <text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
            x, y, waypoint.size / 2., escape(&waypoint.glyph)
        )?;
    }

    for node in &scene.nodes {
        let (x, y) = proj.xy(&node.coordinate);
        if let Some(pulse) = node.pulse {
            writeln!(
                &mut svg,
                r#"  <circle class="pulse" cx="{:.2}" cy="{:.2}" r="{}" fill="{}" fill-opacity="0.4"/>"#,
                x, y, node.size * 0.75, pulse
            )?;
        }
        writeln!(
            &mut svg,
            r#"  <circle class="node" cx="{:.2}" cy="{:.2}" r="{}" fill="{}"><title>{}</title></circle>"#,
            x, y, node.size / 2., node.color, escape(&node.label)
        )?;
        if config.show_labels {
            writeln!(
                &mut svg,
                r#"  <text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
                x, y, node.size / 3., node.color.contrast(), escape(&node.badge)
            )?;
        }
    }

    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshmap_core::{
        compute_hull,
        map::{color::Rgb, scene::{HullOverlay, NodeMarker}},
    };

    fn node(num: u32, lat: f64, lon: f64) -> NodeMarker {
        NodeMarker {
            node_num: num,
            label: format!("<Node {}>", num),
            badge: format!("N{}", num),
            coordinate: GeoPoint::new(lat, lon),
            color: Rgb::from_node_num(num),
            size: 40.,
            pulse: None,
        }
    }

    #[test]
    fn test_render_scene() {
        let nodes = vec![node(1, 0., 0.), node(2, 0., 1.), node(3, 1., 0.5)];
        let hull = compute_hull(&nodes.iter().map(|n| n.coordinate).collect::<Vec<_>>());
        let scene = MapScene {
            nodes,
            hull: Some(HullOverlay::new(hull)),
            ..MapScene::default()
        };

        let svg = render_svg(&scene, &RenderConfig::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<polygon class="hull""#));
        assert_eq!(svg.matches(r#"class="node""#).count(), 3);
        assert!(svg.contains("&lt;Node 1&gt;"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_projection_north_up() {
        let proj = Projection {
            bounds: Bounds { min_lat: 0., max_lat: 1., min_lon: 0., max_lon: 2. },
            width: 200.,
            height: 100.,
        };
        assert_eq!(proj.xy(&GeoPoint::new(1., 0.)), (0., 0.));
        assert_eq!(proj.xy(&GeoPoint::new(0., 2.)), (200., 100.));
    }

    #[test]
    fn test_render_empty_and_single() {
        let svg = render_svg(&MapScene::default(), &RenderConfig::default()).unwrap();
        assert!(!svg.contains("<circle"));

        let scene = MapScene { nodes: vec![node(1, 47., -122.)], ..MapScene::default() };
        let svg = render_svg(&scene, &RenderConfig::default()).unwrap();
        assert!(!svg.contains("NaN"));
        assert!(svg.contains(r#"cx="400.00" cy="300.00""#));
    }
}
