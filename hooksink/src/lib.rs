//! HookSink - Signed push-event webhook receiver.
//!
//! Binds handlers to URL paths and, for every `POST` to a bound path:
//! - Verifies the `X-Hub-Signature` HMAC-SHA1 against the shared secret
//! - Runs the optional auth predicate
//! - Decodes the JSON payload into a [`PushMessage`]
//! - Hands the message to the handler on a detached task and returns 200 OK
//!
//! ## Architecture
//!
//! ```text
//! Request → Authenticator Chain → Decoder → tokio::spawn(handler.push) → 200
//!               │ 401 / 500          │ 500
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use hooksink::{async_trait, HookSink, PushHandler, PushMessage, QueryParams};
//!
//! struct Logger;
//!
//! #[async_trait]
//! impl PushHandler for Logger {
//!     async fn push(&self, msg: PushMessage, _params: QueryParams) {
//!         println!("push to {}: {}", msg.repository.repo_name, msg.after);
//!     }
//! }
//!
//! # async fn run() -> Result<(), hooksink::SinkError> {
//! let mut sink = HookSink::with_secret("ssshhhh!");
//! sink.add("/build", Logger)?;
//! sink.start().await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod sink;
pub mod web;

// Re-export commonly used types
pub use async_trait::async_trait;
pub use config::Config;
pub use error::SinkError;
pub use handler::{parse_query, Capability, Hook, PushHandler, QueryParams};
pub use message::{decode_push, DecodeError, PushMessage};
pub use sink::HookSink;
pub use web::{hub_signature, verify_hub_signature, Rejection, SIGNATURE_HEADER};
