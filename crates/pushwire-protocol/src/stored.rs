//! Persisting a whole [`Message`], metadata included.
//!
//! The wire format drops the topic and expiry time. Replay buffers that
//! store messages need them back, so `Message` implements serde through
//! this shape instead:
//!
//! ```json
//! { "topic": "news", "expires_at": null, "event": "data: hi\n\n" }
//! ```
//!
//! The event travels as its wire text, which keeps the stored form
//! readable and reuses the codec for validation on the way back in.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

#[cfg(feature = "json")]
use crate::JsonError;
use crate::{Message, UnmarshalError};

#[derive(Serialize, Deserialize)]
pub(crate) struct StoredMessage {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    expires_at: Option<SystemTime>,
    event: String,
}

impl From<Message> for StoredMessage {
    fn from(msg: Message) -> Self {
        Self {
            event: msg.to_string(),
            topic: msg.topic,
            expires_at: msg.expires_at,
        }
    }
}

impl TryFrom<StoredMessage> for Message {
    type Error = UnmarshalError;

    fn try_from(stored: StoredMessage) -> Result<Self, Self::Error> {
        let mut msg = Message::new();
        // An event with no fields encodes as a bare blank line, which the
        // decoder rejects. Store and restore it as an empty event instead.
        if !stored.event.trim_start_matches(['\r', '\n']).is_empty() {
            msg.unmarshal_text(stored.event.as_bytes())?;
        }
        msg.topic = stored.topic;
        msg.expires_at = stored.expires_at;
        Ok(msg)
    }
}

#[cfg(feature = "json")]
impl Message {
    /// Serializes the message, topic and expiry included, as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, JsonError> {
        serde_json::to_vec(self).map_err(JsonError::Encode)
    }

    /// Restores a message written by [`to_json`](Self::to_json).
    pub fn from_json(data: &[u8]) -> Result<Self, JsonError> {
        serde_json::from_slice(data).map_err(JsonError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::EventId;

    fn stored_sample() -> Message {
        let mut msg = Message::new();
        msg.topic = "news".into();
        msg.expires_at = Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        msg.set_id(EventId::new("9").unwrap());
        msg.append_data(["line one\nline two"]);
        msg
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(stored_sample()).unwrap();

        assert_eq!(json["topic"], "news");
        assert_eq!(json["event"], "id: 9\ndata: line one\ndata: line two\n\n");
        assert!(json["expires_at"].is_object());
    }

    #[test]
    fn test_json_keeps_topic_and_expiry() {
        let msg = stored_sample();
        let json = serde_json::to_vec(&msg).unwrap();
        let decoded: Message = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_empty_event_survives() {
        let mut msg = Message::new();
        msg.topic = "only-topic".into();

        let json = serde_json::to_vec(&msg).unwrap();
        let decoded: Message = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let decoded: Message = serde_json::from_str(r#"{"event": "data: x\n\n"}"#).unwrap();
        assert_eq!(decoded.topic, "");
        assert_eq!(decoded.expires_at, None);
        assert_eq!(decoded.chunks()[0].content(), "x");
    }

    #[test]
    fn test_invalid_embedded_event_is_rejected() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"event": "retry: soon\n\n"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("retry field invalid"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_json_from_json() {
        let msg = stored_sample();
        let bytes = msg.to_json().unwrap();
        assert_eq!(Message::from_json(&bytes).unwrap(), msg);

        let err = Message::from_json(b"not json").unwrap_err();
        assert!(matches!(err, JsonError::Decode(_)));
    }
}
