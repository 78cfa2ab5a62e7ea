//! [`CockpitServer`] – HTTP + WebSocket server for the viewer page.
//!
//! Listens on `0.0.0.0:8080` (configurable via [`CockpitServer::with_port`]).
//!
//! * `GET /` → the embedded viewer HTML.
//! * `GET /scene.json` → [`SceneSettings`] for the renderer.
//! * `GET /URDF/...` → files from the asset directory (URDF and meshes).
//! * WebSocket upgrades → bidirectional bridge to the [`EventBus`].

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use jointview_hal::urdf;
use jointview_middleware::{EventBus, Topic};
use jointview_types::{Event, EventPayload, InputEvent, ViewError};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Default TCP port for the viewer HTTP/WebSocket server.
pub const DEFAULT_PORT: u16 = 8080;

/// The compiled-in viewer page (HTML + CSS + JS).
const VIEWER_HTML: &str = include_str!("viewer.html");

const SOURCE: &str = "jointview-cockpit::server";

// ---------------------------------------------------------------------------
// Scene settings
// ---------------------------------------------------------------------------

/// How the renderer places the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSettings {
    pub model: String,
    /// URL the page fetches the URDF from.
    pub urdf_path: String,
    /// Euler rotation (x, y, z) in radians.
    pub rotation: [f64; 3],
    /// Uniform scale factor.
    pub scale: f64,
}

impl SceneSettings {
    /// Defaults for `model`: Z-up URDF turned Y-up and facing the camera,
    /// scaled 15×.
    pub fn for_model(model: &str) -> Self {
        Self {
            model: model.to_string(),
            urdf_path: urdf::asset_path(model),
            rotation: [-std::f64::consts::FRAC_PI_2, 0.0, -std::f64::consts::PI],
            scale: 15.0,
        }
    }
}

// ---------------------------------------------------------------------------
// CockpitServer
// ---------------------------------------------------------------------------

/// Lightweight HTTP + WebSocket server that serves the viewer and bridges
/// the internal [`EventBus`] to every connected browser.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use jointview_middleware::EventBus;
/// use jointview_cockpit::CockpitServer;
///
/// #[tokio::main]
/// async fn main() {
///     let bus = Arc::new(EventBus::default());
///     CockpitServer::new(Arc::clone(&bus))
///         .with_asset_dir("./URDF")
///         .run()
///         .await
///         .expect("cockpit server failed");
/// }
/// ```
pub struct CockpitServer {
    bus: Arc<EventBus>,
    port: u16,
    asset_dir: PathBuf,
    scene: SceneSettings,
}

impl CockpitServer {
    /// Create a server backed by `bus` on the [`DEFAULT_PORT`], serving the
    /// default model from `./URDF`.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            port: DEFAULT_PORT,
            asset_dir: PathBuf::from("URDF"),
            scene: SceneSettings::for_model(urdf::DEFAULT_MODEL),
        }
    }

    /// Override the listening port (builder-style).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Directory served under `/URDF/` (builder-style).
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Replace the scene settings (builder-style).
    pub fn with_scene(mut self, scene: SceneSettings) -> Self {
        self.scene = scene;
        self
    }

    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Bind `0.0.0.0:{port}` and serve forever.
    pub async fn run(self) -> Result<(), ViewError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr).await?;
        info!("Viewer listening on http://localhost:{}", self.port);
        self.serve(listener).await
    }

    /// Serve connections accepted on an already bound `listener`.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ViewError> {
        let shared = Arc::new(Shared {
            asset_dir: self.asset_dir,
            scene_json: serde_json::to_string(&self.scene)
                .map_err(|e| ViewError::Serialization(e.to_string()))?,
        });

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let bus = Arc::clone(&self.bus);
                    let shared = Arc::clone(&shared);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, bus, shared).await {
                            debug!(%peer, error = %e, "Client connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Accept error");
                }
            }
        }
    }
}

/// Read-only state shared by every connection task.
struct Shared {
    asset_dir: PathBuf,
    scene_json: String,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Viewer,
    Scene,
    /// Path relative to the asset directory.
    Asset(PathBuf),
    NotFound,
}

fn route(path: &str) -> Route {
    let path = path.split(['?', '#']).next().unwrap_or("");
    match path {
        "/" | "/index.html" => Route::Viewer,
        "/scene.json" => Route::Scene,
        _ => match path.strip_prefix("/URDF/") {
            Some(rest) => safe_relative(rest).map_or(Route::NotFound, Route::Asset),
            None => Route::NotFound,
        },
    }
}

/// `rest` as a relative path with no parent or root components.
fn safe_relative(rest: &str) -> Option<PathBuf> {
    let path = Path::new(rest);
    if rest.is_empty() || !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(path.to_path_buf())
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("urdf") | Some("xml") | Some("xacro") => "application/xml",
        Some("dae") => "model/vnd.collada+xml",
        Some("stl") | Some("STL") => "model/stl",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Per-connection handler
// ---------------------------------------------------------------------------

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    bus: Arc<EventBus>,
    shared: Arc<Shared>,
) -> Result<(), ViewError> {
    // `peek` does not consume the data, so tungstenite's handshaker still
    // sees the full HTTP request.
    let mut buf = [0u8; 2048];
    let n = stream.peek(&mut buf).await?;

    let header_preview = String::from_utf8_lossy(&buf[..n]).into_owned();
    let is_ws_upgrade = header_preview.lines().any(|line| {
        let line = line.to_lowercase();
        line.starts_with("upgrade:") && line.contains("websocket")
    });

    if is_ws_upgrade {
        return handle_ws(stream, peer, bus).await;
    }

    // Drain what was peeked before answering.
    let _ = stream.read(&mut buf).await?;

    let path = header_preview
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    match route(path) {
        Route::Viewer => {
            write_response(&mut stream, "200 OK", "text/html; charset=utf-8", VIEWER_HTML.as_bytes())
                .await
        }
        Route::Scene => {
            write_response(&mut stream, "200 OK", "application/json", shared.scene_json.as_bytes())
                .await
        }
        Route::Asset(rel) => {
            let file = shared.asset_dir.join(&rel);
            match tokio::fs::read(&file).await {
                Ok(body) => write_response(&mut stream, "200 OK", content_type(&rel), &body).await,
                Err(e) => {
                    debug!(path = %file.display(), error = %e, "Asset not served");
                    write_response(&mut stream, "404 Not Found", "text/plain", b"not found").await
                }
            }
        }
        Route::NotFound => {
            write_response(&mut stream, "404 Not Found", "text/plain", b"not found").await
        }
    }
}

async fn write_response(
    stream: &mut TcpStream,
    status: &str,
    content_type: &str,
    body: &[u8],
) -> Result<(), ViewError> {
    let head = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body).await?;
    stream.flush().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// WebSocket: bidirectional EventBus bridge
// ---------------------------------------------------------------------------

async fn handle_ws(stream: TcpStream, peer: SocketAddr, bus: Arc<EventBus>) -> Result<(), ViewError> {
    let ws_stream = accept_async(stream)
        .await
        .map_err(|e| ViewError::Channel(format!("WS handshake from {peer}: {e}")))?;
    info!(%peer, "Viewer connected");

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let mut scene_rx = bus.subscribe_to(Topic::Scene);
    let mut ui_rx = bus.subscribe_to(Topic::Ui);

    loop {
        let downstream = tokio::select! {
            // ── Downstream: EventBus → browser ─────────────────────────────
            result = scene_rx.recv() => result,
            result = ui_rx.recv() => result,
            // ── Upstream: browser → EventBus ────────────────────────────────
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_upstream_message(text.as_str(), &bus);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
                continue;
            }
        };

        match downstream {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Event serialization error"),
            },
            Err(RecvError::Lagged(n)) => {
                warn!(%peer, lagged_by = n, "Viewer lagged behind the bus");
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!(%peer, "Viewer disconnected");
    Ok(())
}

// ---------------------------------------------------------------------------
// Upstream message parser
// ---------------------------------------------------------------------------

/// Decode a browser message of the form `{"topic":"/input/<kind>","msg":{..}}`.
///
/// Recognised kinds: `key`, `speed`, `click`, `resize`, `ready`.  Anything
/// else, including malformed JSON, yields `None`.
pub(crate) fn parse_upstream(text: &str) -> Option<InputEvent> {
    let json: Value = serde_json::from_str(text).ok()?;
    let kind = json.get("topic")?.as_str()?.strip_prefix("/input/")?;
    let mut fields = match json.get("msg") {
        Some(Value::Object(map)) => map.clone(),
        None | Some(Value::Null) => Map::new(),
        Some(_) => return None,
    };
    fields.insert("input".to_string(), Value::String(kind.to_string()));
    serde_json::from_value(Value::Object(fields)).ok()
}

/// Publish a recognised browser message on [`Topic::Input`]; ignore the
/// rest.
pub(crate) fn handle_upstream_message(text: &str, bus: &Arc<EventBus>) {
    let Some(input) = parse_upstream(text) else {
        debug!(message = text, "Ignoring upstream message");
        return;
    };
    if let Err(e) = bus.publish_to(Topic::Input, Event::new(SOURCE, EventPayload::Input(input))) {
        debug!(error = %e, "Input dropped");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
