use crate::bridges::{BridgeInfo, BridgeRegistry};
use crate::config::ServerConfig;
use crate::events::events_handler;
use crate::sink::BroadcastSink;
use anyhow::Context;
use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};
use hostbridge_capabilities::{
    ContactBridge, DatabaseBridge, FileSystemBridge, LifecycleBridge, OsBridge, SecurityBridge,
};
use hostbridge_core::{
    ApiBridge, ApiRequest, ApiResponse, BridgeError, Capability, Correlator, Router,
    WebSinkAdapter,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

/// Routers for every built-in capability, kept typed so delegates can be
/// bound or swapped after registration.
#[derive(Debug, Clone)]
pub struct StandardBridges {
    pub os: Arc<Router<OsBridge>>,
    pub file_system: Arc<Router<FileSystemBridge>>,
    pub contact: Arc<Router<ContactBridge>>,
    pub security: Arc<Router<SecurityBridge>>,
    pub database: Arc<Router<DatabaseBridge>>,
    pub lifecycle: Arc<Router<LifecycleBridge>>,
}

/// Hosts capability routers for a web view.
///
/// Synchronous answers go back in the HTTP response. Callback and listener
/// deliveries are pushed as scripts to every socket connected on `/events`.
#[derive(Debug, Clone)]
pub struct Server {
    config: ServerConfig,
    sink: BroadcastSink,
    correlator: Arc<Correlator>,
    bridges: Arc<BridgeRegistry>,
}

#[derive(Clone)]
struct AppState {
    bridges: Arc<BridgeRegistry>,
    sink: BroadcastSink,
}

impl FromRef<AppState> for BroadcastSink {
    fn from_ref(state: &AppState) -> Self {
        state.sink.clone()
    }
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        let sink = BroadcastSink::new(config.event_buffer);
        let adapter =
            WebSinkAdapter::with_namespace(Arc::new(sink.clone()), config.namespace.clone());
        Server {
            config,
            sink,
            correlator: Arc::new(Correlator::new(adapter)),
            bridges: Arc::new(BridgeRegistry::new()),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn correlator(&self) -> &Arc<Correlator> {
        &self.correlator
    }

    pub fn bridges(&self) -> &Arc<BridgeRegistry> {
        &self.bridges
    }

    pub fn sink(&self) -> &BroadcastSink {
        &self.sink
    }

    /// Unbound router sharing this server's correlator and API version.
    pub fn router<C: Capability>(&self) -> Router<C> {
        Router::new(Arc::clone(&self.correlator)).with_api_version(self.config.api_version.clone())
    }

    pub fn register(&self, bridge: Arc<dyn ApiBridge>) {
        if let Some(previous) = self.bridges.insert(bridge) {
            warn!(interface = previous.interface(), "replaced existing bridge");
        }
    }

    /// Create and register an unbound router for `C`.
    pub fn mount<C: Capability>(&self) -> Arc<Router<C>> {
        let router = Arc::new(self.router::<C>());
        self.register(router.clone());
        router
    }

    /// Register every built-in capability with no delegate bound.
    pub fn mount_standard_bridges(&self) -> StandardBridges {
        StandardBridges {
            os: self.mount(),
            file_system: self.mount(),
            contact: self.mount(),
            security: self.mount(),
            database: self.mount(),
            lifecycle: self.mount(),
        }
    }

    pub fn app(&self) -> axum::Router {
        let state = AppState {
            bridges: Arc::clone(&self.bridges),
            sink: self.sink.clone(),
        };

        axum::Router::new()
            .route("/health", get(handle_health))
            .route("/api", get(handle_list))
            .route("/api/{bridge}", post(handle_call))
            .route("/events", get(events_handler))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(state)
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        self.serve(listener, shutdown_signal()).await
    }

    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let local = listener.local_addr()?;
        info!("hostbridge listening on http://{local}");
        info!("  API endpoint:    http://{local}/api/{{interface}}");
        info!("  Event feed:      ws://{local}/events");
        info!("  Health endpoint: http://{local}/health");

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("hostbridge stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

async fn handle_health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

async fn handle_list(State(state): State<AppState>) -> Json<Vec<BridgeInfo>> {
    Json(state.bridges.describe())
}

/// The HTTP status mirrors the envelope's `statusCode`.
async fn handle_call(
    State(state): State<AppState>,
    Path(interface): Path<String>,
    body: String,
) -> (StatusCode, Json<ApiResponse>) {
    debug!(interface = %interface, body_len = body.len(), "api request");

    let request: ApiRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(interface = %interface, "malformed api request: {e}");
            return failure(&BridgeError::from(e));
        }
    };

    let Some(bridge) = state.bridges.lookup(&interface) else {
        warn!(interface = %interface, method = %request.method_name, "no such bridge");
        return failure(&BridgeError::UnknownBridge(interface));
    };

    match bridge.invoke(&request) {
        Ok(response) => (status_of(response.status_code), Json(response)),
        Err(e) => {
            warn!(interface = %interface, method = %request.method_name, "rejected call: {e}");
            failure(&e)
        }
    }
}

fn status_of(code: i32) -> StatusCode {
    u16::try_from(code)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn failure(err: &BridgeError) -> (StatusCode, Json<ApiResponse>) {
    let code = i32::from(err.status_code());
    (status_of(code), Json(ApiResponse::error(code, err.to_string())))
}
