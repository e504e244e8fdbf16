//! Handler capabilities.
//!
//! A handler registered with [`crate::HookSink::add`] is any [`Hook`]. At
//! registration time the hook is resolved to a [`Capability`], which tells the
//! sink which kind of event it consumes. Only push consumers exist today; new
//! event kinds become new `Capability` variants and leave existing
//! registrations untouched.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::message::PushMessage;

/// Query-string parameters of the webhook URL, in the order they appeared.
pub type QueryParams = HashMap<String, Vec<String>>;

/// Consumer of push events.
///
/// `push` runs on its own detached task. Its outcome (including a panic) is
/// never reported back to the webhook sender.
#[async_trait]
pub trait PushHandler: Send + Sync + 'static {
    async fn push(&self, msg: PushMessage, params: QueryParams);
}

/// The event kinds a registered handler can consume.
#[derive(Clone)]
#[non_exhaustive]
pub enum Capability {
    /// Receives decoded push events
    Push(Arc<dyn PushHandler>),
    // Future event kinds (e.g. pull requests) are added here.
}

impl Capability {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Capability::Push(_) => "push",
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Capability").field(&self.kind()).finish()
    }
}

/// Anything that can be registered at a path.
///
/// The default resolves to no capability, which makes registration fail.
/// Every [`PushHandler`] is a `Hook` resolving to [`Capability::Push`].
pub trait Hook: Send + Sync + 'static {
    fn capability(self: Arc<Self>) -> Option<Capability> {
        None
    }
}

impl<H: PushHandler> Hook for H {
    fn capability(self: Arc<Self>) -> Option<Capability> {
        Some(Capability::Push(self))
    }
}

/// Parse a raw query string into [`QueryParams`].
///
/// Repeated keys keep every value in order; keys without a value map to an
/// empty string.
pub fn parse_query(query: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }
    params
}
