//! Reading snapshots and settings from disk, gzip-aware.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use log::debug;
use meshmap_core::{MapSettings, MeshSnapshot};

fn is_gz(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn load_snapshot(path: &Path) -> Result<MeshSnapshot> {
    debug!("loading snapshot {}", path.display());
    if is_gz(path) {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        MeshSnapshot::from_reader(GzDecoder::new(BufReader::new(file)))
            .with_context(|| format!("reading {}", path.display()))
    } else {
        Ok(MeshSnapshot::from_path(path)?)
    }
}

pub fn load_settings(path: &Path) -> Result<MapSettings> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing settings {}", path.display()))
}

/// Pretty-print `value` to `path` (gzipped for `.gz`), or to stdout.
pub fn write_json<T: serde::Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    match path {
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let writer = BufWriter::new(file);
            if is_gz(path) {
                let mut gz = GzEncoder::new(writer, Compression::default());
                serde_json::to_writer(&mut gz, value)?;
                gz.finish()?.flush()?;
            } else {
                let mut writer = writer;
                serde_json::to_writer_pretty(&mut writer, value)?;
                writer.flush()?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshmap_core::{map::position::PositionRecord, GeoPoint};
    use tempfile::TempDir;

    fn snapshot() -> MeshSnapshot {
        MeshSnapshot {
            records: vec![PositionRecord {
                node_num: 1,
                long_name: None,
                short_name: Some("A".to_string()),
                coordinate: Some(GeoPoint::new(1., 2.)),
                time: "2024-03-01T00:00:00Z".parse().unwrap(),
                latest: true,
                online: false,
                history: vec![],
            }],
            ..MeshSnapshot::default()
        }
    }

    #[test]
    fn gz_round_trip() {
        let dir = TempDir::new().unwrap();
        for name in ["snapshot.json", "snapshot.json.gz"] {
            let path = dir.path().join(name);
            write_json(&snapshot(), Some(&path)).unwrap();
            assert_eq!(load_snapshot(&path).unwrap(), snapshot());
        }
    }

    #[test]
    fn missing_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let err = load_settings(&path).unwrap_err();
        assert!(err.to_string().contains("settings.json"));

        std::fs::write(&path, r#"{"mapLayer": "Satellite", "enableMapConvexHull": true}"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.map_layer, meshmap_core::MapLayer::Satellite);
        assert!(settings.show_convex_hull);
    }
}
