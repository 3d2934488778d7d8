//! Artist identity types.
//!
//! A provider artist record may carry up to three identifiers (`channelId`,
//! `browseId`, `id`) and they are not guaranteed to agree with each other or
//! with the identifier that was requested.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of channel-style artist identifiers.
pub const CHANNEL_ID_PREFIX: &str = "UC";

/// Exact length of channel-style artist identifiers.
pub const CHANNEL_ID_LEN: usize = 24;

/// Prefix of browse-style identifiers.
pub const BROWSE_ID_PREFIX: &str = "MPRE";

/// Recognized identifier shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistIdShape {
    Channel,
    Browse,
    Unrecognized,
}

impl ArtistIdShape {
    pub fn classify(id: &str) -> Self {
        if id.starts_with(CHANNEL_ID_PREFIX) && id.chars().count() == CHANNEL_ID_LEN {
            ArtistIdShape::Channel
        } else if id.starts_with(BROWSE_ID_PREFIX) {
            ArtistIdShape::Browse
        } else {
            ArtistIdShape::Unrecognized
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ArtistIdShape::Unrecognized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtistIdShape::Channel => "channel",
            ArtistIdShape::Browse => "browse",
            ArtistIdShape::Unrecognized => "unrecognized",
        }
    }
}

/// Raw identifier fields found on a provider artist record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnedIds {
    pub browse_id: Option<String>,
    pub channel_id: Option<String>,
    pub record_id: Option<String>,
}

impl ReturnedIds {
    pub fn from_record(record: &Value) -> Self {
        Self {
            browse_id: non_empty_str(record, "browseId"),
            channel_id: non_empty_str(record, "channelId"),
            record_id: non_empty_str(record, "id"),
        }
    }

    /// Preferred identifier: channelId, then browseId, then id.
    pub fn primary(&self) -> Option<&str> {
        self.channel_id
            .as_deref()
            .or(self.browse_id.as_deref())
            .or(self.record_id.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.primary().is_none()
    }
}

/// Read a string field, treating empty strings as absent.
pub fn non_empty_str(record: &Value, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Provenance of a resolved artist record.
///
/// Serialized as the `_debug` block of the artist response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistIdentity {
    pub requested_id: String,
    pub id_shape: ArtistIdShape,
    pub returned_browse_id: Option<String>,
    pub returned_channel_id: Option<String>,
    #[serde(rename = "returnedId")]
    pub returned_record_id: Option<String>,
    pub primary_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub consistent: bool,
}

impl ArtistIdentity {
    /// True when the resolved id is not the one the caller asked for.
    pub fn drifted(&self) -> bool {
        self.primary_id != self.requested_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_channel_id() {
        assert_eq!(
            ArtistIdShape::classify("UCmMUZbaYdNH0bEd1PAlAqsA"),
            ArtistIdShape::Channel
        );
        // Right prefix, wrong length
        assert_eq!(ArtistIdShape::classify("UCshort"), ArtistIdShape::Unrecognized);
    }

    #[test]
    fn test_classify_browse_id() {
        assert_eq!(
            ArtistIdShape::classify("MPREb_4pL8gzRtw1p"),
            ArtistIdShape::Browse
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        let shape = ArtistIdShape::classify("some-artist");
        assert_eq!(shape, ArtistIdShape::Unrecognized);
        assert!(!shape.is_recognized());
    }

    #[test]
    fn test_primary_prefers_channel_then_browse_then_id() {
        let all = ReturnedIds::from_record(&json!({
            "channelId": "UC_channel",
            "browseId": "MPRE_browse",
            "id": "plain"
        }));
        assert_eq!(all.primary(), Some("UC_channel"));

        let no_channel = ReturnedIds::from_record(&json!({
            "channelId": "",
            "browseId": "MPRE_browse",
            "id": "plain"
        }));
        assert_eq!(no_channel.primary(), Some("MPRE_browse"));

        let only_id = ReturnedIds::from_record(&json!({ "id": "plain" }));
        assert_eq!(only_id.primary(), Some("plain"));

        let none = ReturnedIds::from_record(&json!({ "name": "Nobody", "channelId": null }));
        assert!(none.is_empty());
    }

    #[test]
    fn test_identity_serializes_as_debug_block() {
        let identity = ArtistIdentity {
            requested_id: "req".to_string(),
            id_shape: ArtistIdShape::Unrecognized,
            returned_browse_id: None,
            returned_channel_id: Some("UC_x".to_string()),
            returned_record_id: None,
            primary_id: "UC_x".to_string(),
            name: None,
            consistent: false,
        };
        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(value["requestedId"], "req");
        assert_eq!(value["idShape"], "unrecognized");
        assert_eq!(value["returnedChannelId"], "UC_x");
        assert!(value["returnedId"].is_null());
        assert_eq!(value["primaryId"], "UC_x");
        assert_eq!(value["consistent"], false);
        assert!(identity.drifted());
    }
}
