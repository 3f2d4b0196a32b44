use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

/// Opaque 24-hex-character identifier assigned to every stored record.
///
/// Layout matches a document-store object id: 4 bytes of big-endian Unix
/// seconds followed by 8 random bytes. The canonical form is lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "507f1f77bcf86cd799439011")]
pub struct ResourceId(String);

impl ResourceId {
    pub const LENGTH: usize = 24;

    pub fn new() -> Self {
        let seconds = chrono::Utc::now().timestamp() as u32;
        let tail: [u8; 8] = rand::random();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&tail);

        Self(hex::encode(bytes))
    }

    /// Format check used after sanitization: exactly 24 ASCII hex digits.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() == Self::LENGTH && candidate.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ResourceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(DomainError::InvalidResourceId(s.to_string()))
        }
    }
}

impl TryFrom<String> for ResourceId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resource_id_new_is_valid() {
        let id = ResourceId::new();
        assert_eq!(id.as_str().len(), ResourceId::LENGTH);
        assert!(ResourceId::is_valid(id.as_str()));
    }

    #[test]
    fn test_resource_id_new_creates_unique_ids() {
        let ids: HashSet<ResourceId> = (0..1000).map(|_| ResourceId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_resource_id_leading_bytes_are_timestamp() {
        let before = chrono::Utc::now().timestamp() as u32;
        let id = ResourceId::new();
        let seconds = u32::from_str_radix(&id.as_str()[..8], 16).unwrap();
        assert!(seconds >= before);
    }

    #[test]
    fn test_resource_id_from_str_lowercases() {
        let id: ResourceId = "507F1F77BCF86CD799439011".parse().unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_resource_id_from_str_invalid() {
        let invalid = vec![
            "",
            "507f1f77bcf86cd79943901",   // 23 chars
            "507f1f77bcf86cd7994390111", // 25 chars
            "507f1f77bcf86cd79943901g",  // non-hex
            "507f1f77-bcf8-6cd7-9943-9011",
        ];

        for candidate in invalid {
            assert!(
                candidate.parse::<ResourceId>().is_err(),
                "Should reject: {}",
                candidate
            );
        }
    }

    #[test]
    fn test_resource_id_serialization() {
        let id: ResourceId = "507f1f77bcf86cd799439011".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"507f1f77bcf86cd799439011\"");

        let back: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<ResourceId>("\"not-an-id\"").is_err());
    }
}
