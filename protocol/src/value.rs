use core::fmt;

use serde::{Deserialize, Serialize};

/// Option types as numbered by the chat platform's application command API.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OptionType {
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
}

impl TryFrom<u8> for OptionType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use OptionType::*;
        Ok(match value {
            3 => String,
            4 => Integer,
            5 => Boolean,
            6 => User,
            7 => Channel,
            8 => Role,
            9 => Mentionable,
            10 => Number,
            11 => Attachment,
            other => return Err(ProtocolError::UnknownOptionType(other)),
        })
    }
}

impl From<OptionType> for u8 {
    fn from(value: OptionType) -> Self {
        use OptionType::*;
        match value {
            String => 3,
            Integer => 4,
            Boolean => 5,
            User => 6,
            Channel => 7,
            Role => 8,
            Mentionable => 9,
            Number => 10,
            Attachment => 11,
        }
    }
}

/// Snowflake id of a channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<#{}>", self.0)
    }
}

/// A typed value for one command option, from either text parsing or a structured payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Channel(ChannelId),
    /// Ids of users, roles and attachments, only produced by structured payloads.
    Snowflake(u64),
}

impl OptionValue {
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Self::Number(value) => Some(value),
            Self::Integer(value) => Some(value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<ChannelId> {
        match *self {
            Self::Channel(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => value.fmt(f),
            Self::Integer(value) => value.fmt(f),
            Self::Number(value) => value.fmt(f),
            Self::String(value) => value.fmt(f),
            Self::Channel(id) => id.fmt(f),
            Self::Snowflake(id) => id.fmt(f),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unknown option type {0}")]
    UnknownOptionType(u8),
    #[error("Option `{name}` has a value that does not match its type {kind:?}")]
    InvalidValue { name: String, kind: OptionType },
    #[error("Option `{0}` has no value")]
    MissingValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_type_numbers_round_trip() {
        for number in [3, 4, 5, 6, 7, 8, 9, 10, 11] {
            let kind = OptionType::try_from(number).unwrap();
            assert_eq!(u8::from(kind), number);
        }
        assert_eq!(
            OptionType::try_from(1),
            Err(ProtocolError::UnknownOptionType(1))
        );
    }

    #[test]
    fn numbers_widen_but_do_not_narrow() {
        assert_eq!(OptionValue::Integer(3).as_number(), Some(3.0));
        assert_eq!(OptionValue::Number(3.5).as_integer(), None);
    }

    #[test]
    fn channel_displays_as_mention() {
        assert_eq!(OptionValue::Channel(ChannelId(42)).to_string(), "<#42>");
    }
}
