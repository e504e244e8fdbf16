//! Web layer for receiving push webhooks.
//!
//! This module provides:
//! - HMAC-SHA1 `X-Hub-Signature` verification
//! - The authenticator chain, layered over every registered route
//! - The push endpoint, which decodes the payload and dispatches it on a
//!   detached task before returning 200 OK

pub mod auth;
pub mod handlers;
pub mod signature;

pub use auth::{authenticate, AuthChain, AuthFunction, RawPayload};
pub use handlers::{push_webhook, PushRoute, Rejection, WebhookResponse};
pub use signature::{
    hub_signature, is_signature_verification_enabled, verify_hub_signature, Secret,
    SIGNATURE_HEADER,
};
