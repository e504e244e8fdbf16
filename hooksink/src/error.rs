//! Errors raised while configuring or running a sink.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    /// The handler resolved to no known capability. Callers should treat this
    /// as fatal and refuse to start serving.
    #[error("handler {handler} registered at {path} does not implement any known handler capability")]
    UnrecognizedHandler { path: String, handler: &'static str },

    #[error("a handler is already registered at {0}")]
    DuplicateRoute(String),

    #[error("invalid route path {0:?}: expected a literal path starting with '/'")]
    InvalidPath(String),

    #[error("failed to bind to {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error")]
    Serve(#[source] io::Error),
}
