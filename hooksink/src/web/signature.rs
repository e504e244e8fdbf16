//! `X-Hub-Signature` verification.
//!
//! The sender signs the raw request body with HMAC-SHA1 under the shared
//! secret and sends `sha1=<lowercase hex digest>` in the header.

use std::fmt;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// The shared secret, fixed for the lifetime of a sink.
#[derive(Clone)]
pub struct Secret(Arc<[u8]>);

impl Secret {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Secret(Arc::from(secret.as_ref()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether payloads must carry a valid signature.
    pub fn is_enabled(&self) -> bool {
        is_signature_verification_enabled(&self.0)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_enabled() { "Secret(<redacted>)" } else { "Secret(<unset>)" })
    }
}

/// Compute the `sha1=<hex>` signature of `payload` under `secret`.
pub fn hub_signature(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verify a hub signature.
///
/// # Arguments
///
/// * `payload` - The raw request body, exactly as received
/// * `secret` - The shared secret
/// * `provided` - The value of the `X-Hub-Signature` header, empty if absent
///
/// # Returns
///
/// `true` only if `provided` matches the computed signature. The comparison
/// runs in constant time with respect to where the values differ.
pub fn verify_hub_signature(payload: &[u8], secret: &[u8], provided: &str) -> bool {
    if provided.is_empty() {
        warn!("hub_signature_missing");
        return false;
    }

    let expected = hub_signature(secret, payload);
    let valid: bool = expected.as_bytes().ct_eq(provided.as_bytes()).into();

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = provided.len(),
            "hub_signature_mismatch"
        );
    }

    valid
}

/// Check if signature verification is enabled for a secret.
///
/// Only a completely empty secret disables verification.
pub fn is_signature_verification_enabled(secret: &[u8]) -> bool {
    !secret.is_empty()
}
