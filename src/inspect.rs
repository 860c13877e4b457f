//! Read-only HTTP endpoint for inspecting device configuration.
//!
//! Serves the registry as JSON with `tiny_http`:
//!
//! - `GET /devices` lists registered device ids
//! - `GET /devices/<id>` dumps one device's store (secrets redacted) and
//!   the last accepted hardware snapshot
//!
//! # Example Response
//!
//! ```json
//! {
//!   "id": 0,
//!   "features": { "dot11ax": true, "fils": true, "oce": true },
//!   "config": {
//!     "radio": { "rts_threshold": 2347, "frag_threshold": 8000 },
//!     "wep": { "key_1": "<redacted>" }
//!   },
//!   "last_snapshot": null
//! }
//! ```

use log::{error, info, warn};
use serde_json::json;
use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};

use crate::device::{DeviceContext, DeviceRegistry};
use crate::schema::CapabilityTag;
use crate::DeviceId;

/// Default port for the inspection server.
pub const DEFAULT_INSPECT_PORT: u16 = 8347;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Response computed for one request, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Json(String),
    Redirect(&'static str),
    NotFound,
    MethodNotAllowed,
}

/// Resolve a request against the registry.
pub fn route(method: &Method, path: &str, registry: &DeviceRegistry) -> Reply {
    if method != &Method::Get {
        return Reply::MethodNotAllowed;
    }
    let path = path.split('?').next().unwrap_or(path).trim_end_matches('/');
    match path {
        "" => Reply::Redirect("/devices"),
        "/devices" => Reply::Json(json!({ "devices": registry.ids() }).to_string()),
        _ => match path
            .strip_prefix("/devices/")
            .and_then(|id| id.parse::<DeviceId>().ok())
            .and_then(|id| registry.get(id).ok())
        {
            Some(device) => Reply::Json(device_json(&device).to_string()),
            None => Reply::NotFound,
        },
    }
}

fn device_json(device: &DeviceContext) -> serde_json::Value {
    let store = device.store();
    let features = store.features();
    let snapshot = device
        .last_snapshot()
        .and_then(|s| serde_json::to_value(s).ok())
        .unwrap_or(serde_json::Value::Null);
    json!({
        "id": device.id(),
        "features": {
            "dot11ax": features.contains(CapabilityTag::Dot11ax),
            "fils": features.contains(CapabilityTag::Fils),
            "oce": features.contains(CapabilityTag::Oce),
        },
        "config": store.to_json(),
        "last_snapshot": snapshot,
    })
}

/// HTTP inspection server.
///
/// Runs in a background thread. Drop it to stop the server.
pub struct InspectServer {
    handle: Option<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InspectServer {
    /// Start serving `registry` on `bind_addr:port` (`None` binds 0.0.0.0).
    pub fn start(
        bind_addr: Option<IpAddr>,
        port: u16,
        registry: Arc<DeviceRegistry>,
    ) -> Result<Self, io::Error> {
        let addr = match bind_addr {
            Some(ip) => format!("{}:{}", ip, port),
            None => format!("0.0.0.0:{}", port),
        };

        let headers = Headers::new()?;
        let server = Server::http(&addr)
            .map_err(|e| io::Error::new(io::ErrorKind::AddrInUse, format!("{}", e)))?;

        info!("Inspect server listening on http://{}/devices", addr);

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::spawn(move || {
            Self::run_server(server, registry, headers, shutdown_clone);
        });

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    fn run_server(
        server: Server,
        registry: Arc<DeviceRegistry>,
        headers: Headers,
        shutdown: Arc<AtomicBool>,
    ) {
        loop {
            if shutdown.load(Ordering::Acquire) {
                info!("Inspect server shutting down");
                break;
            }

            match server.recv_timeout(POLL_INTERVAL) {
                Ok(Some(request)) => {
                    let reply = route(request.method(), request.url(), &registry);
                    let result = match reply {
                        Reply::Json(body) => request.respond(
                            Response::from_string(body)
                                .with_header(headers.content_type.clone())
                                .with_status_code(200),
                        ),
                        Reply::Redirect(target) => match header("Location", target) {
                            Ok(location) => request.respond(
                                Response::from_string(format!("See {}", target))
                                    .with_status_code(302)
                                    .with_header(location),
                            ),
                            Err(e) => Err(e),
                        },
                        Reply::NotFound => {
                            request.respond(Response::from_string("Not Found").with_status_code(404))
                        }
                        Reply::MethodNotAllowed => request.respond(
                            Response::from_string("Method Not Allowed")
                                .with_status_code(405)
                                .with_header(headers.allow_get.clone()),
                        ),
                    };
                    if let Err(e) = result {
                        warn!("Failed to send response: {}", e);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Server error: {}", e);
                    break;
                }
            }
        }
    }

    /// Stop the server. May take up to one polling interval.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InspectServer {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Headers {
    content_type: Header,
    allow_get: Header,
}

impl Headers {
    fn new() -> Result<Self, io::Error> {
        Ok(Self {
            content_type: header("Content-Type", "application/json")?,
            allow_get: header("Allow", "GET")?,
        })
    }
}

fn header(name: &str, value: &str) -> Result<Header, io::Error> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid header {}: {}", name, value),
        )
    })
}
