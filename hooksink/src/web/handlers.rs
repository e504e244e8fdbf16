//! Webhook endpoint handlers.
//!
//! By the time a request reaches [`push_webhook`] the authenticator chain has
//! already run. The handler only:
//! 1. Decodes the payload
//! 2. Spawns the registered push handler without awaiting it
//! 3. Returns 200 OK

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::handler::{parse_query, PushHandler};
use crate::message::{decode_push, DecodeError};
use crate::web::auth::RawPayload;

/// Per-route state for a push consumer.
#[derive(Clone)]
pub struct PushRoute {
    pub path: Arc<str>,
    pub handler: Arc<dyn PushHandler>,
}

impl PushRoute {
    pub fn new(path: &str, handler: Arc<dyn PushHandler>) -> Self {
        Self {
            path: Arc::from(path),
            handler,
        }
    }
}

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

/// Reasons a webhook request is turned away.
///
/// Senders only ever see the status code and a one-word status body.
#[derive(Debug, Error)]
pub enum Rejection {
    /// Signature missing or invalid, or the auth predicate said no
    #[error("unauthorized")]
    Unauthorized,
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl Rejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Rejection::Unauthorized => StatusCode::UNAUTHORIZED,
            Rejection::BodyRead(_) | Rejection::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = match self {
            Rejection::Unauthorized => "unauthorized",
            _ => "error",
        };
        (self.status_code(), Json(WebhookResponse { status })).into_response()
    }
}

/// Push webhook endpoint.
///
/// Expects the body already buffered by [`crate::web::authenticate`].
///
/// The push handler runs on a detached task: the response is written as soon
/// as the task is spawned, and nothing the handler does afterwards (including
/// failing) is visible to the sender.
pub async fn push_webhook(
    State(route): State<PushRoute>,
    uri: Uri,
    Extension(RawPayload(payload)): Extension<RawPayload>,
) -> Result<(StatusCode, Json<WebhookResponse>), Rejection> {
    let params = parse_query(uri.query());

    info!(
        path = %route.path,
        body_length = payload.len(),
        query_params = params.len(),
        "push_webhook_received"
    );

    let msg = decode_push(&payload).map_err(|e| {
        error!(error = %e, path = %route.path, "push_decode_failed");
        Rejection::from(e)
    })?;

    let handler = Arc::clone(&route.handler);
    tokio::spawn(async move {
        handler.push(msg, params).await;
    });

    info!(path = %route.path, "push_dispatched");

    Ok((StatusCode::OK, Json(WebhookResponse { status: "accepted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Bytes;
    use tokio::sync::mpsc;

    use crate::handler::QueryParams;
    use crate::message::PushMessage;

    struct Forward(mpsc::UnboundedSender<(PushMessage, QueryParams)>);

    #[async_trait]
    impl PushHandler for Forward {
        async fn push(&self, msg: PushMessage, params: QueryParams) {
            let _ = self.0.send((msg, params));
        }
    }

    #[tokio::test]
    async fn test_push_webhook_decodes_buffered_payload() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let route = PushRoute::new("/hook", Arc::new(Forward(tx)));
        let payload = RawPayload(Bytes::from_static(br#"{"after":"deadbeef"}"#));

        let result = push_webhook(
            State(route.clone()),
            Uri::from_static("/hook?env=prod"),
            Extension(payload),
        )
        .await;
        assert_eq!(result.unwrap().0, StatusCode::OK);

        let (msg, params) = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(msg.after, "deadbeef");
        assert_eq!(params["env"], vec!["prod"]);

        let malformed = RawPayload(Bytes::from_static(b"{"));
        let result = push_webhook(State(route), Uri::from_static("/hook"), Extension(malformed)).await;
        assert!(matches!(result, Err(Rejection::Decode(_))));
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(Rejection::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);

        let read = axum::Error::new(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert_eq!(
            Rejection::BodyRead(read).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let decode = PushMessage::decode(b"{").unwrap_err();
        assert_eq!(
            Rejection::from(decode).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejection_into_response() {
        let response = Rejection::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let decode = PushMessage::decode(b"[").unwrap_err();
        let response = Rejection::Decode(decode).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let read = axum::Error::new(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        let response = Rejection::BodyRead(read).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
