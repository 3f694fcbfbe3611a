use std::fmt;
use std::sync::Arc;

use spoilsweeper_protocol::{ChannelId, OptionType, OptionValue};
use thiserror::Error;

use crate::*;

/// What kind of input a node accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    /// Must be typed exactly as the node's name.
    Literal,
    String,
    Integer,
    Number,
    /// `false`/`no` prefixes are false, anything else is true.
    Boolean,
    /// A `<#digits>` channel mention.
    ChannelRef,
    /// Values the text parser cannot produce, such as attachments.
    StructuredOnly(OptionType),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputErrorKind {
    #[error("Missing argument")]
    MissingArgument,
    #[error("Invalid option")]
    InvalidOption,
    #[error("Unmatched quote")]
    UnmatchedQuote,
    #[error("Not a valid number")]
    NotANumber,
    #[error("Not an integer")]
    NotAnInteger,
    #[error("Not a channel mention")]
    NotAChannelMention,
    #[error("This argument is only supported in slash commands")]
    StructuredOnly,
}

/// Input rejected by a node, together with the text it looked at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: `{input}`")]
pub struct InputError {
    pub kind: InputErrorKind,
    pub input: String,
}

impl InputError {
    fn new(kind: InputErrorKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

/// A value taken from the start of the remaining command text.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed {
    pub value: OptionValue,
    /// Bytes of the input that belong to this value, quotes included.
    pub consumed: usize,
}

/// Splits the first token off `input`: a quoted string or everything up to the next space or
/// newline.
fn isolate_token(input: &str) -> Result<(String, usize), InputError> {
    let Some(quoted) = input.strip_prefix('"') else {
        let end = input.find([' ', '\n']).unwrap_or(input.len());
        return Ok((input[..end].to_owned(), end));
    };

    let mut token = String::new();
    let mut escaped = false;
    for (index, ch) in quoted.char_indices() {
        match ch {
            '"' if !escaped => return Ok((token, index + 2)),
            '\\' if !escaped => escaped = true,
            _ => {
                if escaped && ch != '"' {
                    token.push('\\');
                }
                escaped = false;
                token.push(ch);
            }
        }
    }
    Err(InputError::new(InputErrorKind::UnmatchedQuote, input))
}

fn parse_number(token: &str) -> Result<f64, InputError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| InputError::new(InputErrorKind::NotANumber, token))
}

fn parse_integer(token: &str) -> Result<i64, InputError> {
    if let Ok(integer) = token.trim().parse::<i64>() {
        return Ok(integer);
    }
    let number = parse_number(token)?;
    if number.fract() != 0.0 || number < i64::MIN as f64 || number >= i64::MAX as f64 {
        return Err(InputError::new(InputErrorKind::NotAnInteger, token));
    }
    Ok(number as i64)
}

fn parse_boolean(token: &str) -> bool {
    !(token.starts_with("false") || token.starts_with("no"))
}

fn parse_channel_mention(token: &str) -> Result<ChannelId, InputError> {
    token
        .strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .map(ChannelId)
        .ok_or_else(|| InputError::new(InputErrorKind::NotAChannelMention, token))
}

/// Checks whether the earliest token of `input` is valid for a node of `kind` named `name`.
pub(crate) fn check_input(kind: NodeKind, name: &str, input: &str) -> Result<Parsed, InputError> {
    if input.is_empty() {
        return Err(InputError::new(InputErrorKind::MissingArgument, ""));
    }

    match kind {
        NodeKind::Root => return Err(InputError::new(InputErrorKind::InvalidOption, input)),
        NodeKind::Literal => {
            return if input.starts_with(name) {
                Ok(Parsed {
                    value: OptionValue::String(name.to_owned()),
                    consumed: name.len(),
                })
            } else {
                Err(InputError::new(InputErrorKind::InvalidOption, input))
            };
        }
        _ => {}
    }

    let (token, consumed) = isolate_token(input)?;
    let value = coerce(kind, token)?;
    Ok(Parsed { value, consumed })
}

fn coerce(kind: NodeKind, token: String) -> Result<OptionValue, InputError> {
    Ok(match kind {
        NodeKind::String => OptionValue::String(token),
        NodeKind::Integer => OptionValue::Integer(parse_integer(&token)?),
        NodeKind::Number => OptionValue::Number(parse_number(&token)?),
        NodeKind::Boolean => OptionValue::Boolean(parse_boolean(&token)),
        NodeKind::ChannelRef => OptionValue::Channel(parse_channel_mention(&token)?),
        NodeKind::Root | NodeKind::Literal | NodeKind::StructuredOnly(_) => {
            return Err(InputError::new(InputErrorKind::StructuredOnly, token));
        }
    })
}

/// Brings a structured option value in line with what text parsing would have produced.
pub(crate) fn accept_value(
    kind: NodeKind,
    name: &str,
    value: &OptionValue,
) -> Result<OptionValue, InputError> {
    use OptionValue as V;

    let mismatch = |error| InputError::new(error, value.to_string());
    Ok(match (kind, value) {
        (NodeKind::Literal, _) => V::String(name.to_owned()),
        (NodeKind::StructuredOnly(_), value) => value.clone(),
        (NodeKind::String, V::String(_))
        | (NodeKind::Integer, V::Integer(_))
        | (NodeKind::Number, V::Number(_))
        | (NodeKind::Boolean, V::Boolean(_))
        | (NodeKind::ChannelRef, V::Channel(_)) => value.clone(),
        (NodeKind::Integer, V::Number(number)) => {
            if number.fract() != 0.0 {
                return Err(mismatch(InputErrorKind::NotAnInteger));
            }
            V::Integer(*number as i64)
        }
        (NodeKind::Number, V::Integer(integer)) => V::Number(*integer as f64),
        (NodeKind::ChannelRef, V::Snowflake(id)) => V::Channel(ChannelId(*id)),
        (
            NodeKind::Integer | NodeKind::Number | NodeKind::Boolean | NodeKind::ChannelRef,
            V::String(text),
        ) => coerce(kind, text.clone())?,
        (NodeKind::Integer | NodeKind::Number, _) => {
            return Err(mismatch(InputErrorKind::NotANumber));
        }
        (NodeKind::ChannelRef, _) => return Err(mismatch(InputErrorKind::NotAChannelMention)),
        (NodeKind::Root | NodeKind::String | NodeKind::Boolean, _) => {
            return Err(mismatch(InputErrorKind::InvalidOption));
        }
    })
}

/// One option of a command.
pub struct ArgumentNode<S: ?Sized> {
    kind: NodeKind,
    name: String,
    description: String,
    required: bool,
    action: Option<Action<S>>,
}

impl<S: ?Sized> ArgumentNode<S> {
    pub fn new(kind: NodeKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            action: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Runs when this is the deepest option given that has an action.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Invocation<'_, S>) -> anyhow::Result<RunResult> + Send + Sync + 'static,
    {
        self.action = Some(Action::new(action));
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        !self.required
    }

    pub(crate) fn action_ref(&self) -> Option<&Action<S>> {
        self.action.as_ref()
    }

    /// Name as it appears in syntax help: bare for literals, `<name>` otherwise.
    pub fn placeholder(&self) -> String {
        match self.kind {
            NodeKind::Literal => self.name.clone(),
            _ => format!("<{}>", self.name),
        }
    }

    pub fn check_input(&self, input: &str) -> Result<Parsed, InputError> {
        check_input(self.kind, &self.name, input)
    }

    pub fn accept(&self, value: &OptionValue) -> Result<OptionValue, InputError> {
        accept_value(self.kind, &self.name, value)
    }
}

impl<S: ?Sized> fmt::Debug for ArgumentNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentNode")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("required", &self.required)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

pub(crate) type ActionFn<S> = dyn Fn(&Invocation<'_, S>) -> anyhow::Result<RunResult> + Send + Sync;

/// Shared handle to an action. Aliases clone the handle, not the closure.
pub struct Action<S: ?Sized>(Arc<ActionFn<S>>);

impl<S: ?Sized> Action<S> {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&Invocation<'_, S>) -> anyhow::Result<RunResult> + Send + Sync + 'static,
    {
        Self(Arc::new(action))
    }

    pub(crate) fn run(&self, invocation: &Invocation<'_, S>) -> anyhow::Result<RunResult> {
        (self.0)(invocation)
    }
}

impl<S: ?Sized> Clone for Action<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: NodeKind) -> ArgumentNode<()> {
        ArgumentNode::new(kind, "value", "")
    }

    fn error_kind(kind: NodeKind, input: &str) -> InputErrorKind {
        node(kind).check_input(input).unwrap_err().kind
    }

    #[test]
    fn literal_matches_prefix() {
        let parsed = node(NodeKind::Literal).check_input("value 12").unwrap();

        assert_eq!(parsed.consumed, 5);
        assert_eq!(error_kind(NodeKind::Literal, "valu"), InputErrorKind::InvalidOption);
    }

    #[test]
    fn empty_input_is_missing() {
        assert_eq!(error_kind(NodeKind::String, ""), InputErrorKind::MissingArgument);
    }

    #[test]
    fn unquoted_token_stops_at_nearest_delimiter() {
        let parsed = node(NodeKind::String).check_input("one\ntwo three").unwrap();
        assert_eq!(parsed.value, OptionValue::String("one".into()));
        assert_eq!(parsed.consumed, 3);

        let parsed = node(NodeKind::String).check_input("one two\nthree").unwrap();
        assert_eq!(parsed.consumed, 3);

        let parsed = node(NodeKind::String).check_input("last").unwrap();
        assert_eq!(parsed.consumed, 4);
    }

    #[test]
    fn quoted_token_spans_spaces() {
        let input = "\"hello world\" rest";

        let parsed = node(NodeKind::String).check_input(input).unwrap();

        assert_eq!(parsed.value, OptionValue::String("hello world".into()));
        assert_eq!(&input[parsed.consumed..], " rest");
    }

    #[test]
    fn escaped_quotes_stay_in_token() {
        let input = r#""say \"hi\"" after"#;

        let parsed = node(NodeKind::String).check_input(input).unwrap();

        assert_eq!(parsed.value, OptionValue::String("say \"hi\"".into()));
        assert_eq!(&input[parsed.consumed..], " after");
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = node(NodeKind::String).check_input("\"open ended").unwrap_err();

        assert_eq!(err.kind, InputErrorKind::UnmatchedQuote);
        assert_eq!(err.input, "\"open ended");
    }

    #[test]
    fn numbers_are_isolated_before_coercion() {
        assert_eq!(error_kind(NodeKind::Integer, "12abc"), InputErrorKind::NotANumber);
        assert_eq!(error_kind(NodeKind::Integer, "1.5"), InputErrorKind::NotAnInteger);
        assert_eq!(error_kind(NodeKind::Number, "NaN"), InputErrorKind::NotANumber);
        assert_eq!(error_kind(NodeKind::Number, "inf"), InputErrorKind::NotANumber);

        let parsed = node(NodeKind::Integer).check_input("12 abc").unwrap();
        assert_eq!(parsed.value, OptionValue::Integer(12));
        let parsed = node(NodeKind::Integer).check_input("1e2").unwrap();
        assert_eq!(parsed.value, OptionValue::Integer(100));
        let parsed = node(NodeKind::Number).check_input("-0.25").unwrap();
        assert_eq!(parsed.value, OptionValue::Number(-0.25));
    }

    #[test]
    fn booleans_default_to_true() {
        let value = |input| node(NodeKind::Boolean).check_input(input).unwrap().value;

        assert_eq!(value("false"), OptionValue::Boolean(false));
        assert_eq!(value("no"), OptionValue::Boolean(false));
        assert_eq!(value("true"), OptionValue::Boolean(true));
        assert_eq!(value("yes"), OptionValue::Boolean(true));
        assert_eq!(value("dontStartUncovered"), OptionValue::Boolean(true));
    }

    #[test]
    fn channel_mentions() {
        let parsed = node(NodeKind::ChannelRef).check_input("<#123456> later").unwrap();

        assert_eq!(parsed.value, OptionValue::Channel(ChannelId(123456)));
        assert_eq!(parsed.consumed, 9);
        assert_eq!(
            error_kind(NodeKind::ChannelRef, "#general"),
            InputErrorKind::NotAChannelMention
        );
        assert_eq!(error_kind(NodeKind::ChannelRef, "<#>"), InputErrorKind::NotAChannelMention);
    }

    #[test]
    fn structured_only_kinds_fail_in_text() {
        assert_eq!(
            error_kind(NodeKind::StructuredOnly(OptionType::Attachment), "file.png"),
            InputErrorKind::StructuredOnly
        );
    }

    #[test]
    fn structured_values_are_coerced() {
        let accept = |kind, value: OptionValue| node(kind).accept(&value);

        assert_eq!(
            accept(NodeKind::Integer, OptionValue::Number(4.0)),
            Ok(OptionValue::Integer(4))
        );
        assert_eq!(
            accept(NodeKind::Integer, OptionValue::Number(4.5)).unwrap_err().kind,
            InputErrorKind::NotAnInteger
        );
        assert_eq!(
            accept(NodeKind::Number, OptionValue::Boolean(true)).unwrap_err().kind,
            InputErrorKind::NotANumber
        );
        assert_eq!(
            accept(NodeKind::ChannelRef, OptionValue::Snowflake(9)),
            Ok(OptionValue::Channel(ChannelId(9)))
        );
        assert_eq!(
            accept(NodeKind::Boolean, OptionValue::String("no".into())),
            Ok(OptionValue::Boolean(false))
        );
    }

    #[test]
    fn placeholders() {
        assert_eq!(node(NodeKind::Integer).placeholder(), "<value>");
        assert_eq!(node(NodeKind::Literal).placeholder(), "value");
    }
}
