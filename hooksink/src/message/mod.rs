//! Push-event message types and decoding.
//!
//! Decoding is strict on JSON syntax and lenient on schema: unknown fields are
//! ignored and missing (or `null`) fields fall back to zero values.

pub mod types;

pub use types::{decode_push, DecodeError, HeadCommit, Owner, PushData, PushMessage, Repository};
