//! The hook sink: route registration, request dispatch and serving.

use std::any::type_name;
use std::collections::BTreeMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::request::Parts,
    middleware,
    response::Response,
    routing::post,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower::ServiceExt;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::SinkError;
use crate::handler::{Capability, Hook};
use crate::web::{authenticate, push_webhook, AuthChain, AuthFunction, PushRoute, Secret};
use crate::Config;

/// A webhook receiver.
///
/// Handlers are bound to paths with [`HookSink::add`]; every bound path accepts
/// `POST` requests carrying a JSON payload. The secret is fixed at construction.
pub struct HookSink {
    addr: SocketAddr,
    secret: Secret,
    routes: BTreeMap<String, Capability>,
    auth: Option<AuthFunction>,
}

impl HookSink {
    /// Create a sink from a configuration.
    ///
    /// Use a non-empty secret matching the one configured at the sender. With
    /// an empty secret no signature checking is performed at all.
    pub fn new(config: Config) -> Self {
        Self {
            addr: config.addr,
            secret: Secret::new(config.secret),
            routes: BTreeMap::new(),
            auth: None,
        }
    }

    /// Create a sink on the default address with the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(Config {
            secret: secret.into(),
            ..Config::default()
        })
    }

    /// Address [`HookSink::start`] binds to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Install an extra authentication check, e.g. an API key in the query
    /// string. It runs after signature verification, on every route. Calling
    /// this again replaces the previous check.
    pub fn authenticate<F>(&mut self, predicate: F)
    where
        F: Fn(&Parts) -> bool + Send + Sync + 'static,
    {
        self.auth = Some(Arc::new(predicate));
    }

    /// Bind a handler to a path.
    ///
    /// Fails if the path is not a literal absolute path, is already bound, or
    /// if the handler does not resolve to a known capability. A failed
    /// registration leaves the sink unchanged.
    pub fn add<H: Hook>(&mut self, path: &str, handler: H) -> Result<(), SinkError> {
        validate_path(path)?;

        if self.routes.contains_key(path) {
            return Err(SinkError::DuplicateRoute(path.to_string()));
        }

        let capability =
            Arc::new(handler)
                .capability()
                .ok_or_else(|| SinkError::UnrecognizedHandler {
                    path: path.to_string(),
                    handler: type_name::<H>(),
                })?;

        info!(path = %path, kind = capability.kind(), "handler_registered");
        self.routes.insert(path.to_string(), capability);
        Ok(())
    }

    /// Build the router for the current registrations.
    pub fn router(&self) -> Router {
        let mut router = Router::new();

        for (path, capability) in &self.routes {
            router = match capability {
                Capability::Push(handler) => router.route(
                    path,
                    post(push_webhook).with_state(PushRoute::new(path, Arc::clone(handler))),
                ),
            };
        }

        // route_layer panics on a router without routes
        if !self.routes.is_empty() {
            let chain = AuthChain::new(self.secret.clone(), self.auth.clone());
            router = router.route_layer(middleware::from_fn_with_state(chain, authenticate));
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Dispatch a single request without binding a socket.
    pub async fn handle(&self, request: Request) -> Response {
        match self.router().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        }
    }

    /// Bind the configured address and serve until SIGINT/SIGTERM.
    pub async fn start(self) -> Result<(), SinkError> {
        let addr = self.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| SinkError::Bind { addr, source })?;

        info!(address = %addr, "hooksink_listening");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), SinkError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(
            routes = self.routes.len(),
            signature_verification = self.secret.is_enabled(),
            auth_predicate = self.auth.is_some(),
            "hooksink_serving"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(SinkError::Serve)?;

        info!("hooksink_shutdown_complete");
        Ok(())
    }
}

fn validate_path(path: &str) -> Result<(), SinkError> {
    if !path.starts_with('/') || path.contains([':', '*']) {
        return Err(SinkError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("hooksink_shutting_down");
}
