//! Authenticator chain middleware.
//!
//! Applied as a route layer to every registered path. For each request it:
//! 1. Buffers the body
//! 2. Verifies `X-Hub-Signature` (skipped when no secret is configured)
//! 3. Runs the optional auth predicate
//!
//! The buffered body is handed on to the route as a [`RawPayload`] extension.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::web::handlers::Rejection;
use crate::web::signature::{verify_hub_signature, Secret, SIGNATURE_HEADER};

/// Secondary authentication check over the request head.
///
/// `Parts` gives access to the method, path, query string and headers. The
/// body is not available; it has already been covered by the signature check.
pub type AuthFunction = Arc<dyn Fn(&Parts) -> bool + Send + Sync>;

/// The request body exactly as received, buffered by [`authenticate`].
#[derive(Debug, Clone)]
pub struct RawPayload(pub Bytes);

/// State shared by every invocation of [`authenticate`].
#[derive(Clone)]
pub struct AuthChain {
    pub secret: Secret,
    pub predicate: Option<AuthFunction>,
}

impl AuthChain {
    pub fn new(secret: Secret, predicate: Option<AuthFunction>) -> Self {
        Self { secret, predicate }
    }
}

/// Run the authenticator chain before the route sees the request.
///
/// The signature is checked first; the predicate only runs for requests that
/// already passed it.
pub async fn authenticate(
    State(chain): State<AuthChain>,
    request: Request,
    next: Next,
) -> Result<Response, Rejection> {
    let (mut parts, body) = request.into_parts();

    let payload = to_bytes(body, usize::MAX).await.map_err(|e| {
        error!(error = %e, path = %parts.uri.path(), "request_body_read_failed");
        Rejection::BodyRead(e)
    })?;

    if chain.secret.is_enabled() {
        let provided = parts
            .headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !verify_hub_signature(&payload, chain.secret.as_bytes(), provided) {
            warn!(path = %parts.uri.path(), "hub_signature_invalid");
            return Err(Rejection::Unauthorized);
        }
    }

    if let Some(predicate) = &chain.predicate {
        if !predicate(&parts) {
            warn!(path = %parts.uri.path(), "auth_predicate_rejected");
            return Err(Rejection::Unauthorized);
        }
    }

    parts.extensions.insert(RawPayload(payload));
    Ok(next.run(Request::from_parts(parts, Body::empty())).await)
}
