use serde::{Deserialize, Serialize};

/// A message to send back for a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub content: String,
    /// Only shown to the user who ran the command, where the platform supports it.
    #[serde(default)]
    pub ephemeral: bool,
}

impl Reply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

impl From<String> for Reply {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<&str> for Reply {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
const EPHEMERAL_FLAG: u64 = 1 << 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
    pub replied_user: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    pub allowed_mentions: AllowedMentions,
}

impl From<&Reply> for MessageData {
    fn from(reply: &Reply) -> Self {
        Self {
            content: reply.content.clone(),
            flags: reply.ephemeral.then_some(EPHEMERAL_FLAG),
            // replies never ping anyone
            allowed_mentions: AllowedMentions {
                parse: Vec::new(),
                replied_user: false,
            },
        }
    }
}

/// Body of an interaction response carrying a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    pub data: MessageData,
}

impl From<&Reply> for InteractionResponse {
    fn from(reply: &Reply) -> Self {
        Self {
            kind: CHANNEL_MESSAGE_WITH_SOURCE,
            data: reply.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ephemeral_reply_sets_flag() {
        let response = InteractionResponse::from(&Reply::ephemeral("nope"));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "type": 4,
                "data": {
                    "content": "nope",
                    "flags": 64,
                    "allowed_mentions": { "parse": [], "replied_user": false }
                }
            })
        );
    }

    #[test]
    fn plain_reply_has_no_flags() {
        let value = serde_json::to_value(InteractionResponse::from(&Reply::from("pong"))).unwrap();

        assert!(value["data"].get("flags").is_none());
    }
}
