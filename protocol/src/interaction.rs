use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

use crate::*;

/// Looks up structured option values by option name.
pub trait OptionLookup {
    fn get(&self, name: &str) -> Option<&OptionValue>;
}

impl OptionLookup for HashMap<String, OptionValue> {
    fn get(&self, name: &str) -> Option<&OptionValue> {
        HashMap::get(self, name)
    }
}

impl OptionLookup for BTreeMap<String, OptionValue> {
    fn get(&self, name: &str) -> Option<&OptionValue> {
        BTreeMap::get(self, name)
    }
}

#[derive(Deserialize)]
struct RawCommandOption {
    name: String,
    #[serde(rename = "type")]
    kind: OptionType,
    #[serde(default)]
    value: Option<Value>,
}

/// One option of a slash command invocation, with its value already typed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawCommandOption")]
pub struct CommandOption {
    pub name: String,
    pub kind: OptionType,
    pub value: OptionValue,
}

impl TryFrom<RawCommandOption> for CommandOption {
    type Error = ProtocolError;

    fn try_from(raw: RawCommandOption) -> Result<Self, Self::Error> {
        let Some(value) = raw.value else {
            return Err(ProtocolError::MissingValue(raw.name));
        };
        let invalid = || ProtocolError::InvalidValue {
            name: raw.name.clone(),
            kind: raw.kind,
        };

        let value = match raw.kind {
            OptionType::String => {
                OptionValue::String(value.as_str().ok_or_else(invalid)?.to_owned())
            }
            OptionType::Integer => OptionValue::Integer(value.as_i64().ok_or_else(invalid)?),
            OptionType::Number => OptionValue::Number(value.as_f64().ok_or_else(invalid)?),
            OptionType::Boolean => OptionValue::Boolean(value.as_bool().ok_or_else(invalid)?),
            OptionType::Channel => {
                OptionValue::Channel(ChannelId(parse_snowflake(&value).ok_or_else(invalid)?))
            }
            OptionType::User
            | OptionType::Role
            | OptionType::Mentionable
            | OptionType::Attachment => {
                OptionValue::Snowflake(parse_snowflake(&value).ok_or_else(invalid)?)
            }
        };

        Ok(Self {
            name: raw.name,
            kind: raw.kind,
            value,
        })
    }
}

/// Snowflakes are sent as strings since they do not fit in a double.
fn parse_snowflake(value: &Value) -> Option<u64> {
    match value {
        Value::String(text) => text.parse().ok(),
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}

/// The `data` object of a slash command interaction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InteractionData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl InteractionData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl OptionLookup for InteractionData {
    fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| &option.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_typed_options() {
        let data: InteractionData = serde_json::from_value(json!({
            "name": "minesweeper",
            "options": [
                { "name": "game-width", "type": 4, "value": 10 },
                { "name": "dont-start-uncovered", "type": 5, "value": true },
                { "name": "channel", "type": 7, "value": "1042572396864999534" }
            ]
        }))
        .unwrap();

        assert_eq!(data.name, "minesweeper");
        assert_eq!(data.get("game-width"), Some(&OptionValue::Integer(10)));
        assert_eq!(data.get("dont-start-uncovered"), Some(&OptionValue::Boolean(true)));
        assert_eq!(
            data.get("channel"),
            Some(&OptionValue::Channel(ChannelId(1042572396864999534)))
        );
        assert_eq!(data.get("num-mines"), None);
    }

    #[test]
    fn options_default_to_empty() {
        let data = InteractionData::from_json(r#"{ "name": "ping" }"#).unwrap();

        assert!(data.options.is_empty());
    }

    #[test]
    fn rejects_mistyped_values() {
        let result: Result<InteractionData, _> = serde_json::from_value(json!({
            "name": "minesweeper",
            "options": [{ "name": "game-width", "type": 4, "value": "ten" }]
        }));

        let err = result.unwrap_err().to_string();
        assert!(err.contains("game-width"), "{err}");
    }
}
