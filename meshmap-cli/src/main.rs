//! CLI and server for mesh map overlays.
//!
//! Provides:
//! - Hull and scene computation for snapshot files (plain or gzipped JSON)
//! - Parallel batch summaries over many snapshots
//! - SVG previews and synthetic snapshots
//! - WebSocket server for live map clients

mod files;
mod random;
mod render;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use meshmap_core::{export::{hull_to_geojson, scene_to_geojson}, GeoPoint, MapLayer, MeshSnapshot};

use crate::{
    random::RandomMesh,
    render::{render_svg, RenderConfig},
    server::ServerConfig,
};

#[derive(Parser)]
#[command(name = "meshmap")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MESHMAP_BUILD_SHA"), ")"))]
#[command(about = "Convex hull and map overlays for mesh radio nodes", long_about = None)]
struct Cli {
    /// Evaluate freshness and expiry at this instant (RFC 3339) instead of now
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum HullFormat {
    Json,
    Geojson,
    Text,
}

/// Overrides applied on top of a snapshot's own settings
#[derive(Args, Debug, Default)]
struct SettingsArgs {
    /// Settings file (JSON with preference keys) replacing the snapshot's settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Show the convex hull
    #[arg(long)]
    hull: bool,

    /// Show route lines
    #[arg(long)]
    routes: bool,

    /// Show node history pins
    #[arg(long)]
    history: bool,

    /// Show active waypoints
    #[arg(long)]
    waypoints: bool,

    /// Base map layer
    #[arg(long)]
    layer: Option<MapLayer>,
}

impl SettingsArgs {
    fn apply(&self, snapshot: &mut MeshSnapshot) -> Result<()> {
        if let Some(path) = &self.settings {
            snapshot.settings = files::load_settings(path)?;
        }
        let settings = &mut snapshot.settings;
        settings.show_convex_hull |= self.hull;
        settings.show_route_lines |= self.routes;
        settings.show_node_history |= self.history;
        if let Some(layer) = self.layer {
            settings.map_layer = layer;
        }
        snapshot.show_waypoints |= self.waypoints;
        Ok(())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convex hull of the nodes plotted from a snapshot
    Hull {
        /// Snapshot file (JSON, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: HullFormat,
    },

    /// Summarize many snapshots in parallel
    Batch {
        /// Snapshot files (JSON, optionally .gz)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Everything the map would draw for a snapshot
    Scene {
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Emit a GeoJSON FeatureCollection instead of the scene JSON
        #[arg(long)]
        geojson: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a snapshot's overlays to SVG
    Render {
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, default_value = "800")]
        width: f64,

        #[arg(long, default_value = "600")]
        height: f64,

        /// Omit node short names
        #[arg(long)]
        no_labels: bool,
    },

    /// Generate a synthetic snapshot
    Random {
        /// Number of nodes
        #[arg(short, long, default_value = "20")]
        nodes: usize,

        #[arg(long, default_value = "47.6062", allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, default_value = "-122.3321", allow_hyphen_values = true)]
        lon: f64,

        /// Max offset from the center, in degrees
        #[arg(long, default_value = "0.05")]
        spread: f64,

        /// History points per node
        #[arg(long, default_value = "0")]
        history: usize,

        #[arg(long, default_value = "0")]
        waypoints: usize,

        #[arg(long)]
        seed: Option<u64>,

        /// Output file (stdout if omitted; gzipped for .gz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start WebSocket server for live map clients
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Attach GeoJSON to scene replies
        #[arg(long)]
        geojson: bool,
    },
}

/// One line of `batch` output
#[derive(Debug, Clone, PartialEq)]
struct Summary {
    records: usize,
    plotted: usize,
    vertices: usize,
    area: f64,
}

impl Summary {
    fn of(snapshot: &MeshSnapshot, now: DateTime<Utc>) -> Summary {
        let positions = snapshot.positions(now);
        let hull = positions.hull();
        Summary {
            records: snapshot.records.len(),
            plotted: positions.iter().filter(|r| r.location().is_some()).count(),
            vertices: hull.len(),
            area: hull.area(),
        }
    }
}

fn summarize(path: &Path, now: DateTime<Utc>) -> Result<Summary> {
    Ok(Summary::of(&files::load_snapshot(path)?, now))
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{}", text),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(Utc::now);

    match cli.command {
        Commands::Hull { input, format } => {
            let snapshot = files::load_snapshot(&input)?;
            let hull = snapshot.positions(now).hull();
            info!("{}: {} hull vertices", input.display(), hull.len());
            match format {
                HullFormat::Json => files::write_json(&hull, None)?,
                HullFormat::Geojson => files::write_json(&hull_to_geojson(&hull), None)?,
                HullFormat::Text => {
                    for GeoPoint { lat, lon } in hull.iter() {
                        println!("{},{}", lat, lon);
                    }
                }
            }
        }
        Commands::Batch { inputs } => {
            let results: Vec<(PathBuf, Result<Summary>)> = inputs
                .into_par_iter()
                .map(|path| {
                    let summary = summarize(&path, now);
                    (path, summary)
                })
                .collect();
            let mut failed = 0;
            println!("file\trecords\tplotted\tvertices\tarea");
            for (path, summary) in &results {
                match summary {
                    Ok(s) => println!("{}\t{}\t{}\t{}\t{:.6e}", path.display(), s.records, s.plotted, s.vertices, s.area),
                    Err(e) => {
                        error!("{}: {:#}", path.display(), e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                return Err(anyhow!("{} of {} snapshots failed", failed, results.len()));
            }
        }
        Commands::Scene { input, settings, geojson, output } => {
            let mut snapshot = files::load_snapshot(&input)?;
            settings.apply(&mut snapshot)?;
            let scene = snapshot.scene(now);
            if geojson {
                files::write_json(&scene_to_geojson(&scene), output.as_deref())?;
            } else {
                files::write_json(&scene, output.as_deref())?;
            }
        }
        Commands::Render { input, settings, output, width, height, no_labels } => {
            let mut snapshot = files::load_snapshot(&input)?;
            settings.apply(&mut snapshot)?;
            let config = RenderConfig {
                width,
                height,
                show_labels: !no_labels,
                ..RenderConfig::default()
            };
            let svg = render_svg(&snapshot.scene(now), &config)?;
            write_text(&svg, output.as_deref())?;
        }
        Commands::Random { nodes, lat, lon, spread, history, waypoints, seed, output } => {
            let mesh = RandomMesh { nodes, center: GeoPoint::new(lat, lon), spread, history, waypoints };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let snapshot = mesh.snapshot(&mut rng, now)?;
            files::write_json(&snapshot, output.as_deref())?;
        }
        Commands::Serve { port, geojson } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::run_server(port, ServerConfig { geojson }))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use clap::CommandFactory;
    use meshmap_core::map::position::PositionRecord;
    use tempfile::TempDir;

    #[test]
    fn cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_args() {
        let cli = Cli::parse_from([
            "meshmap", "render", "-i", "s.json", "--hull", "--layer", "Satellite", "--now", "2024-03-01T00:00:00Z",
        ]);
        assert_eq!(cli.now, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        match cli.command {
            Commands::Render { settings, no_labels, .. } => {
                assert!(settings.hull);
                assert!(!settings.routes);
                assert_eq!(settings.layer, Some(MapLayer::Satellite));
                assert!(!no_labels);
            }
            _ => panic!("expected render"),
        }
        assert!(Cli::try_parse_from(["meshmap", "render", "-i", "s.json", "--layer", "moon"]).is_err());
    }

    #[test]
    fn settings_overrides() {
        let mut snapshot = MeshSnapshot::default();
        snapshot.settings.show_route_lines = true;
        let args = SettingsArgs { hull: true, waypoints: true, layer: Some(MapLayer::Offline), ..SettingsArgs::default() };
        args.apply(&mut snapshot).unwrap();
        assert!(snapshot.settings.show_convex_hull);
        assert!(snapshot.settings.show_route_lines);
        assert!(snapshot.show_waypoints);
        assert_eq!(snapshot.settings.map_layer, MapLayer::Offline);
    }

    #[test]
    fn batch_summary() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mesh = RandomMesh {
            nodes: 10,
            center: GeoPoint::new(0., 0.),
            spread: 1.,
            history: 0,
            waypoints: 0,
        };
        let snapshot = mesh.snapshot(&mut StdRng::seed_from_u64(3), now).unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batch.json.gz");
        files::write_json(&snapshot, Some(&path)).unwrap();

        let summary = summarize(&path, now).unwrap();
        let hull = snapshot.positions(now).hull();
        assert_eq!(summary.records, 10);
        assert_eq!(summary.vertices, hull.len());
        assert_relative_eq!(summary.area, hull.area());

        assert!(summarize(&dir.path().join("missing.json"), now).is_err());
    }

    #[test]
    fn summary_counts_drawable_nodes() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let record = |node_num: u32, lat: f64, lon: f64| PositionRecord {
            node_num,
            long_name: None,
            short_name: None,
            coordinate: Some(GeoPoint::new(lat, lon)),
            time: now,
            latest: true,
            online: false,
            history: vec![],
        };
        let mut snapshot = MeshSnapshot {
            records: vec![record(1, 0., 0.), record(2, 0., 1.), record(3, 1., 0.), record(4, f64::NAN, 0.)],
            ..MeshSnapshot::default()
        };
        snapshot.records[1].coordinate = None;
        let summary = Summary::of(&snapshot, now);
        assert_eq!(summary, Summary { records: 4, plotted: 2, vertices: 2, area: 0. });
    }
}
