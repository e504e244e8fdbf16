//! Configuration module for environment variable parsing.
//!
//! The sink itself only needs two things: where to listen and which shared
//! secret to verify `X-Hub-Signature` headers against.

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::warn;

/// Port used when neither `HOOKSINK_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Sink configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,

    /// Shared secret for HMAC-SHA1 payload signatures.
    ///
    /// An empty secret disables signature verification entirely. That is only
    /// ever appropriate for local testing.
    pub secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            secret: String::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("secret", &if self.secret.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `HOOKSINK_ADDR` takes precedence; otherwise the address is assembled from
    /// `HOST` and `PORT`.
    pub fn from_env() -> Self {
        Config {
            addr: parse_addr(),
            secret: env::var("HOOKSINK_SECRET").unwrap_or_default(),
        }
    }
}

fn parse_addr() -> SocketAddr {
    let default = Config::default().addr;

    if let Ok(raw) = env::var("HOOKSINK_ADDR") {
        match raw.trim().parse::<SocketAddr>() {
            Ok(addr) => return addr,
            Err(_) => {
                warn!(env_var = "HOOKSINK_ADDR", value = %raw, "Invalid socket address, falling back to HOST/PORT");
            }
        }
    }

    let host = match env::var("HOST") {
        Ok(raw) => raw.trim().parse::<IpAddr>().unwrap_or_else(|_| {
            warn!(env_var = "HOST", value = %raw, "Invalid host, using default");
            default.ip()
        }),
        Err(_) => default.ip(),
    };

    let port = match env::var("PORT") {
        Ok(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
            warn!(env_var = "PORT", value = %raw, "Invalid port, using default");
            default.port()
        }),
        Err(_) => default.port(),
    };

    SocketAddr::new(host, port)
}
