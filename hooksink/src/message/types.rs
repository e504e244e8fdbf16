//! Push-event payload types.
//!
//! Field names match the wire format exactly (`repo_url`, `star_count`, ...).
//! Every field is best-effort: absent or `null` values decode to the zero
//! value, while a value of the wrong JSON type is still a decode error.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error returned when a payload cannot be decoded into a [`PushMessage`].
#[derive(Debug, Error)]
#[error("invalid push payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// A decoded push event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushMessage {
    /// Repository the push landed in
    #[serde(deserialize_with = "null_default")]
    pub repository: Repository,
    /// Commit at the tip of the pushed ref
    #[serde(deserialize_with = "null_default")]
    pub head_commit: HeadCommit,
    /// Registry-style push details (pusher, images, timestamp)
    #[serde(deserialize_with = "null_default")]
    pub push_data: PushData,
    /// Commit hash the ref points to after the push
    #[serde(deserialize_with = "null_default")]
    pub after: String,
}

impl PushMessage {
    /// Decode a raw JSON payload.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        decode_push(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(deserialize_with = "null_default")]
    pub repo_url: String,
    #[serde(deserialize_with = "null_default")]
    pub owner: Owner,
    #[serde(deserialize_with = "null_default")]
    pub is_private: bool,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub star_count: i64,
    /// Fully qualified name, e.g. `owner/name`
    #[serde(deserialize_with = "null_default")]
    pub repo_name: String,
    #[serde(deserialize_with = "null_default")]
    pub git_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadCommit {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushData {
    /// Unix epoch seconds
    #[serde(deserialize_with = "null_default")]
    pub pushed_at: i64,
    #[serde(deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub pusher: String,
}

/// Decode a raw JSON payload into a [`PushMessage`].
///
/// A bare `null` payload decodes to an empty message.
pub fn decode_push(raw: &[u8]) -> Result<PushMessage, DecodeError> {
    let msg: Option<PushMessage> = serde_json::from_slice(raw)?;
    Ok(msg.unwrap_or_default())
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "repository": {"repo_url": "https://x", "name": "r", "star_count": 3},
        "head_commit": {"id": "abc123"},
        "push_data": {"pushed_at": 1000, "images": ["a", "b"], "pusher": "bob"},
        "after": "deadbeef"
    }"#;

    #[test]
    fn test_decode_field_mapping() {
        let msg = decode_push(FULL_PAYLOAD.as_bytes()).unwrap();

        assert_eq!(msg.repository.repo_url, "https://x");
        assert_eq!(msg.repository.name, "r");
        assert_eq!(msg.repository.star_count, 3);
        assert_eq!(msg.head_commit.id, "abc123");
        assert_eq!(msg.push_data.pushed_at, 1000);
        assert_eq!(msg.push_data.images, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(msg.push_data.pusher, "bob");
        assert_eq!(msg.after, "deadbeef");
    }

    #[test]
    fn test_decode_nested_repository_fields() {
        let raw = r#"{"repository": {
            "status": "Active",
            "owner": {"name": "ada", "email": "ada@example.com"},
            "is_private": true,
            "repo_name": "ada/engine",
            "git_url": "git://example.com/ada/engine.git"
        }}"#;

        let msg = PushMessage::decode(raw.as_bytes()).unwrap();
        let repo = &msg.repository;
        assert_eq!(repo.status, "Active");
        assert_eq!(repo.owner.name, "ada");
        assert_eq!(repo.owner.email, "ada@example.com");
        assert!(repo.is_private);
        assert_eq!(repo.repo_name, "ada/engine");
        assert_eq!(repo.git_url, "git://example.com/ada/engine.git");
    }

    #[test]
    fn test_decode_missing_sections_default() {
        let msg = decode_push(br#"{"after": "cafe"}"#).unwrap();
        assert_eq!(msg.after, "cafe");
        assert_eq!(msg.push_data, PushData::default());
        assert_eq!(msg.repository, Repository::default());
        assert!(msg.head_commit.id.is_empty());

        assert_eq!(decode_push(b"{}").unwrap(), PushMessage::default());
    }

    #[test]
    fn test_decode_null_fields_default() {
        let raw = r#"{"head_commit": null, "repository": {"owner": null, "star_count": null}, "after": null}"#;
        let msg = decode_push(raw.as_bytes()).unwrap();
        assert_eq!(msg, PushMessage::default());
    }

    #[test]
    fn test_decode_top_level_null() {
        assert_eq!(decode_push(b"null").unwrap(), PushMessage::default());
        assert_eq!(decode_push(b" null\n").unwrap(), PushMessage::default());
        assert!(decode_push(b"nul").is_err());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let raw = r#"{"ref": "refs/heads/main", "repository": {"name": "r", "forks": 12}}"#;
        let msg = decode_push(raw.as_bytes()).unwrap();
        assert_eq!(msg.repository.name, "r");
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(decode_push(b"{").is_err());
        assert!(decode_push(b"").is_err());
        assert!(decode_push(b"not json").is_err());
    }

    #[test]
    fn test_decode_type_mismatch() {
        let err = decode_push(br#"{"repository": {"star_count": "three"}}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid push payload"));

        assert!(decode_push(br#"{"push_data": {"images": "a"}}"#).is_err());
        assert!(decode_push(br#"{"repository": {"is_private": "yes"}}"#).is_err());
    }
}
