//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with API, admin and site routes
//! - Wire up middleware (request ID, tracing, timeout, limits, CORS, headers)
//! - Bind the server to a listener
//! - Apply configuration reloads and stop on shutdown

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::LeadsConfig;
use crate::http::handlers;
use crate::http::request::{
    propagate_request_id_layer, set_request_id_layer, track_requests, RequestIdExt,
};
use crate::leads::{JsonFileStore, LeadIntake};
use crate::security::headers::{cors_layer, security_header_layers};
use crate::security::limits::{body_limit_layer, in_flight_limit_layer};
use crate::security::rate_limit::{rate_limit_middleware, FixedWindowLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<LeadIntake>,
    pub limiter: Arc<FixedWindowLimiter>,
    /// Current configuration; replaced on reload.
    pub config: Arc<ArcSwap<LeadsConfig>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: LeadsConfig) -> Self {
        let store = Arc::new(JsonFileStore::new(&config.storage.leads_path));
        Self {
            intake: Arc::new(LeadIntake::new(store, config.validation.clone())),
            limiter: Arc::new(FixedWindowLimiter::new(config.rate_limit.clone())),
            config: Arc::new(ArcSwap::from_pointee(config)),
            started_at: Instant::now(),
        }
    }

    /// Swap in a reloaded configuration.
    ///
    /// Validation bounds, rate limits and the admin key take effect at once.
    /// Listener, storage, CORS, site and security changes need a restart.
    pub fn apply(&self, config: LeadsConfig) {
        let current = self.config.load_full();
        if current.listener != config.listener
            || current.storage != config.storage
            || current.cors != config.cors
            || current.site != config.site
            || current.security != config.security
            || current.admin.enabled != config.admin.enabled
        {
            tracing::warn!("Some configuration changes only apply after a restart");
        }

        self.intake.update_limits(config.validation.clone());
        self.limiter.update(config.rate_limit.clone());
        self.config.store(Arc::new(config));
        tracing::info!("Configuration reloaded");
    }
}

/// HTTP server for the lead service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: LeadsConfig) -> Self {
        let state = AppState::new(config);
        let router = Self::build_router(&state);
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: &AppState) -> Router {
        let config = state.config.load_full();

        let leads = Router::new()
            .route("/api/leads", post(handlers::submit_lead))
            .route_layer(middleware::from_fn_with_state(
                state.limiter.clone(),
                rate_limit_middleware,
            ));

        let mut api = Router::new()
            .merge(leads)
            .route("/api/calculators/payment", post(handlers::payment))
            .route("/api/calculators/affordability", post(handlers::affordability))
            .route("/api/calculators/down-payment", post(handlers::down_payment))
            .route("/health", get(handlers::health));

        if config.admin.enabled {
            api = api.merge(admin::router(state.clone()));
        }

        let mut app = api
            .route_layer(middleware::from_fn(track_requests))
            .with_state(state.clone());

        if let Some(root) = &config.site.root {
            let index = Path::new(root).join("index.html");
            app = app.fallback_service(ServeDir::new(root).fallback(ServeFile::new(index)));
        }

        if config.security.enable_headers {
            for layer in security_header_layers() {
                app = app.layer(layer);
            }
        }

        app.layer(cors_layer(&config.cors))
            .layer(body_limit_layer(&config.security))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(in_flight_limit_layer(&config.listener))
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request.request_id(),
                    )
                }),
            )
            .layer(set_request_id_layer())
    }

    /// Shared state, as seen by handlers.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// A handle to the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs arriving on `config_updates` are applied in place. The server
    /// drains and returns once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<LeadsConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = self.state.limiter.spawn_sweeper(shutdown.resubscribe());

        let state = self.state.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => state.apply(config),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        let _ = sweeper.await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
