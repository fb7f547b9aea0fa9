use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "general")]
    Chat,
    #[serde(rename = "rollresult")]
    Roll,
    /// Inline rolls are sometimes reported as plain chat by the platform.
    #[serde(rename = "inlinerollresult")]
    InlineRoll,
    #[serde(rename = "whisper")]
    Whisper,
    /// Emotes, descriptions and anything else the archive may contain.
    #[default]
    #[serde(rename = "other", other)]
    Other,
}

/// A message as sent on the campaign chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub avatar: String,
    /// Send timestamp, in milliseconds.
    #[serde(rename(deserialize = ".priority", serialize = "priority"))]
    pub priority: f64,
    /// Command that triggered the roll, e.g. `1d20`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_roll: Option<String>,
    /// Either plain text or an expression describing the roll.
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    /// Campaign specific id of the sender.
    pub player_id: String,
    /// Character name of the sender.
    pub who: String,
}

/// Which kinds of message a caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageOptions {
    pub include_rolls: bool,
    pub include_chat: bool,
    pub include_whispers: bool,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            include_rolls: true,
            include_chat: true,
            include_whispers: false,
        }
    }
}

impl MessageOptions {
    pub fn is_allowed(&self, message: &Message) -> bool {
        match message.kind {
            MessageType::Roll | MessageType::InlineRoll => self.include_rolls,
            MessageType::Chat => self.include_chat,
            MessageType::Whisper => self.include_whispers,
            MessageType::Other => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: MessageType) -> Message {
        Message {
            kind,
            content: "hello".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_options_skip_whispers() {
        let options = MessageOptions::default();
        assert!(options.is_allowed(&message(MessageType::Chat)));
        assert!(options.is_allowed(&message(MessageType::Roll)));
        assert!(options.is_allowed(&message(MessageType::InlineRoll)));
        assert!(!options.is_allowed(&message(MessageType::Whisper)));
        assert!(!options.is_allowed(&message(MessageType::Other)));
    }

    #[test]
    fn rolls_only() {
        let options = MessageOptions {
            include_chat: false,
            ..Default::default()
        };
        assert!(!options.is_allowed(&message(MessageType::Chat)));
        assert!(options.is_allowed(&message(MessageType::InlineRoll)));
    }

    #[test]
    fn filtering_leaves_the_message_untouched() {
        let original = message(MessageType::Whisper);
        let copy = original.clone();
        let everything = MessageOptions {
            include_whispers: true,
            ..Default::default()
        };

        assert!(everything.is_allowed(&copy));
        assert!(!MessageOptions::default().is_allowed(&copy));
        assert_eq!(original, copy);
    }

    #[test]
    fn deserializes_archive_record() {
        let raw = r#"{
            "avatar": "/users/avatar/1/30",
            ".priority": 1612345678901.5,
            "origRoll": "1d20+3",
            "content": "{\"type\":\"V\"}",
            "type": "rollresult",
            "playerId": "-Mabc",
            "who": "Thorin",
            "signature": "ignored"
        }"#;
        let message: Message = serde_json::from_str(raw).unwrap();

        assert_eq!(message.kind, MessageType::Roll);
        assert_eq!(message.priority, 1612345678901.5);
        assert_eq!(message.orig_roll.as_deref(), Some("1d20+3"));
        assert_eq!(message.who, "Thorin");
    }

    #[test]
    fn unknown_type_and_missing_fields_fall_back() {
        let message: Message = serde_json::from_str(r#"{"type": "emote"}"#).unwrap();
        assert_eq!(message.kind, MessageType::Other);
        assert_eq!(message.priority, 0.0);
        assert!(message.orig_roll.is_none());
    }

    #[test]
    fn serializes_priority_without_dot() {
        let json = serde_json::to_value(message(MessageType::Chat)).unwrap();
        assert!(json.get("priority").is_some());
        assert!(json.get(".priority").is_none());
        assert!(json.get("origRoll").is_none());
        assert_eq!(json["type"], "general");
    }
}
