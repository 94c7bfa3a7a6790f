//! WebSocket server for live map clients.
//!
//! A client pushes whole snapshots (position records, waypoints, settings)
//! and gets back the scene to draw. Each request is computed on the blocking
//! pool and answered before the next one from the same socket is read, so a
//! client never sees replies out of order.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use geojson::FeatureCollection;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::mpsc};

use meshmap_core::{export::scene_to_geojson, hull_of, GeoPoint, HullPolygon, MapScene, MeshSnapshot};

/// Server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Attach a GeoJSON rendition to every scene reply
    pub geojson: bool,
}

/// Messages from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Draw this snapshot
    Snapshot {
        #[serde(flatten)]
        snapshot: MeshSnapshot,
        /// Evaluate freshness and expiry at this instant instead of the server clock
        #[serde(default)]
        now: Option<DateTime<Utc>>,
    },
    /// Hull of bare points; `null` entries are skipped
    Hull { points: Vec<Option<GeoPoint>> },
    /// Ping to keep connection alive
    Ping,
}

/// Messages from server to client
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    Scene {
        scene: MapScene,
        #[serde(skip_serializing_if = "Option::is_none")]
        geojson: Option<FeatureCollection>,
    },
    Hull { vertices: HullPolygon, area: f64 },
    /// Error occurred
    Error { message: String },
    /// Pong response
    Pong,
}

/// Run the WebSocket server on all interfaces
pub async fn run_server(port: u16, config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("WebSocket server listening on ws://{}/ws", addr);
    serve(listener, config).await?;
    Ok(())
}

/// Serve `/ws` on an already-bound listener
pub async fn serve(listener: TcpListener, config: ServerConfig) -> std::io::Result<()> {
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(Arc::new(config));
    axum::serve(listener, app).await
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(config): State<Arc<ServerConfig>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, config))
}

async fn handle_socket(socket: WebSocket, config: Arc<ServerConfig>) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("failed to encode reply: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let msg = match result {
            Ok(m) => m,
            Err(e) => {
                warn!("websocket receive failed: {}", e);
                break;
            }
        };
        let reply = match msg {
            Message::Text(text) => handle_text(text, config.clone()).await,
            Message::Close(_) => break,
            _ => continue,
        };
        if tx.send(reply).await.is_err() {
            break;
        }
    }

    drop(tx);
    let _ = send_task.await;
}

async fn handle_text(text: String, config: Arc<ServerConfig>) -> ServerMessage {
    let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
        Ok(msg) => msg,
        Err(e) => {
            return ServerMessage::Error {
                message: format!("Invalid message: {}", e),
            }
        }
    };
    match client_msg {
        ClientMessage::Ping => ServerMessage::Pong,
        ClientMessage::Snapshot { snapshot, now } => {
            let now = now.unwrap_or_else(Utc::now);
            debug!("snapshot: {} records at {}", snapshot.records.len(), now);
            tokio::task::spawn_blocking(move || scene_reply(&snapshot, now, config.geojson))
                .await
                .unwrap_or_else(|e| ServerMessage::Error {
                    message: format!("Scene computation failed: {}", e),
                })
        }
        ClientMessage::Hull { points } => tokio::task::spawn_blocking(move || {
            let vertices = hull_of(points);
            let area = vertices.area();
            ServerMessage::Hull { vertices, area }
        })
        .await
        .unwrap_or_else(|e| ServerMessage::Error {
            message: format!("Hull computation failed: {}", e),
        }),
    }
}

fn scene_reply(snapshot: &MeshSnapshot, now: DateTime<Utc>, geojson: bool) -> ServerMessage {
    let scene = snapshot.scene(now);
    let geojson = geojson.then(|| scene_to_geojson(&scene));
    ServerMessage::Scene { scene, geojson }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

    async fn start(config: ServerConfig) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, config));
        addr
    }

    async fn round_trip(addr: SocketAddr, requests: Vec<Value>) -> Vec<Value> {
        let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
        let mut replies = vec![];
        for request in requests {
            ws.send(WsMessage::Text(request.to_string())).await.unwrap();
            let reply = ws.next().await.unwrap().unwrap();
            replies.push(serde_json::from_str(reply.to_text().unwrap()).unwrap());
        }
        ws.close(None).await.unwrap();
        replies
    }

    #[test]
    fn parse_client_messages() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "Snapshot",
            "records": [],
            "settings": {"enableMapConvexHull": true},
            "now": "2024-03-01T00:00:00Z",
        }))
        .unwrap();
        match msg {
            ClientMessage::Snapshot { snapshot, now } => {
                assert!(snapshot.settings.show_convex_hull);
                assert!(snapshot.waypoints.is_empty());
                assert!(now.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            serde_json::from_value::<ClientMessage>(json!({"type": "Ping"})).unwrap(),
            ClientMessage::Ping
        ));
    }

    #[tokio::test]
    async fn scene_over_websocket() {
        let addr = start(ServerConfig { geojson: true }).await;
        let snapshot = json!({
            "type": "Snapshot",
            "now": "2024-03-01T00:00:00Z",
            "records": [
                {"nodeNum": 1, "shortName": "A", "coordinate": {"lat": 0, "lon": 0}, "time": "2024-02-29T00:00:00Z"},
                {"nodeNum": 2, "shortName": "B", "coordinate": {"lat": 0, "lon": 1}, "time": "2024-02-29T00:00:00Z"},
                {"nodeNum": 3, "shortName": "C", "coordinate": {"lat": 1, "lon": 0}, "time": "2024-02-29T00:00:00Z"}
            ],
            "settings": {"enableMapConvexHull": true},
        });
        let replies = round_trip(addr, vec![json!({"type": "Ping"}), snapshot]).await;

        assert_eq!(replies[0], json!({"type": "Pong"}));
        let scene = &replies[1];
        assert_eq!(scene["type"], "Scene");
        assert_eq!(scene["scene"]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(scene["scene"]["hull"]["polygon"].as_array().unwrap().len(), 3);
        assert_eq!(scene["geojson"]["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn hull_and_errors() {
        let addr = start(ServerConfig::default()).await;
        let replies = round_trip(
            addr,
            vec![
                json!({"type": "Hull", "points": [{"lat": 0, "lon": 0}, null, {"lat": 0, "lon": 2}, {"lat": 2, "lon": 2}, {"lat": 2, "lon": 0}]}),
                json!({"type": "Bogus"}),
            ],
        )
        .await;

        assert_eq!(replies[0]["type"], "Hull");
        assert_eq!(replies[0]["vertices"].as_array().unwrap().len(), 4);
        assert_eq!(replies[0]["area"], 4.);
        assert_eq!(replies[1]["type"], "Error");
        assert!(replies[1]["message"].as_str().unwrap().starts_with("Invalid message"));
    }
}
