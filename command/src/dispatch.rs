use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use smallvec::SmallVec;
use spoilsweeper_protocol::{ChannelId, OptionLookup, OptionValue, Reply};

use crate::*;

pub const NOT_IMPLEMENTED_MESSAGE: &str = "It looks like this command has not been implemented yet. \
     Please contact my owner if you think this is an error.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred while evaluating your command.";

/// What an action wants sent back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RunResult {
    #[default]
    Nothing,
    Reply(Reply),
    /// The first is the reply, the rest are follow-ups.
    Replies(Vec<Reply>),
}

impl RunResult {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self::Reply(Reply::ephemeral(content))
    }

    pub fn into_replies(self) -> Vec<Reply> {
        match self {
            Self::Nothing => Vec::new(),
            Self::Reply(reply) => vec![reply],
            Self::Replies(replies) => replies,
        }
    }
}

impl From<Reply> for RunResult {
    fn from(reply: Reply) -> Self {
        Self::Reply(reply)
    }
}

impl From<String> for RunResult {
    fn from(content: String) -> Self {
        Self::Reply(Reply::new(content))
    }
}

impl From<&str> for RunResult {
    fn from(content: &str) -> Self {
        Self::Reply(Reply::new(content))
    }
}

impl From<Vec<String>> for RunResult {
    fn from(contents: Vec<String>) -> Self {
        Self::Replies(contents.into_iter().map(Reply::new).collect())
    }
}

/// Raw text after the prefix, or a slash command already split into named options.
#[derive(Copy, Clone)]
pub enum CommandInput<'a> {
    Text(&'a str),
    /// Names must match exactly. Text-only commands never match.
    Structured {
        name: &'a str,
        options: &'a dyn OptionLookup,
    },
}

/// Parsed values, one slot per option of the matched command.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs {
    values: SmallVec<[Option<OptionValue>; 6]>,
}

impl Inputs {
    fn with_len(len: usize) -> Self {
        Self {
            values: std::iter::repeat_n(None, len).collect(),
        }
    }

    fn set(&mut self, index: usize, value: OptionValue) {
        self.values[index] = Some(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OptionValue> {
        self.values.get(index)?.as_ref()
    }

    pub fn is_supplied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn integer(&self, index: usize) -> Option<i64> {
        self.get(index)?.as_integer()
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.get(index)?.as_number()
    }

    pub fn boolean(&self, index: usize) -> Option<bool> {
        self.get(index)?.as_bool()
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.get(index)?.as_str()
    }

    pub fn channel(&self, index: usize) -> Option<ChannelId> {
        self.get(index)?.as_channel()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&OptionValue>> {
        self.values.iter().map(Option::as_ref)
    }
}

/// Everything an action gets to see.
pub struct Invocation<'a, S: ?Sized> {
    pub source: &'a S,
    pub inputs: &'a Inputs,
    pub tree: &'a CommandTree<S>,
    pub command: &'a Command<S>,
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl<S: ?Sized> CommandTree<S> {
    /// Walks the tree with `input` and runs the most specific action reached.
    ///
    /// Input problems become replies for the user. Failing or panicking actions are logged and
    /// answered with a generic error. Input that names no command gives [`RunResult::Nothing`].
    pub fn dispatch(&self, source: &S, input: CommandInput<'_>) -> RunResult {
        match catch_unwind(AssertUnwindSafe(|| self.try_dispatch(source, input))) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                log::error!("Error while running command: {err:#}");
                RunResult::ephemeral(UNKNOWN_ERROR_MESSAGE)
            }
            Err(panic) => {
                log::error!("Command panicked: {}", panic_message(panic.as_ref()));
                RunResult::ephemeral(UNKNOWN_ERROR_MESSAGE)
            }
        }
    }

    fn try_dispatch(&self, source: &S, input: CommandInput<'_>) -> anyhow::Result<RunResult> {
        let matched = match input {
            CommandInput::Text(text) => self.commands().iter().find_map(|command| {
                let parsed = command.check_input(text).ok()?;
                Some((command, text[parsed.consumed..].trim()))
            }),
            CommandInput::Structured { name, .. } => self
                .command(name)
                .filter(|command| !command.is_text_only())
                .map(|command| (command, "")),
        };
        let Some((command, rest)) = matched else {
            return Ok(RunResult::Nothing);
        };

        let mut candidate = command.action_ref().or(self.action_ref());
        let mut inputs = Inputs::with_len(command.option_nodes().len());
        let consumed = match input {
            CommandInput::Text(_) => parse_text(command, rest, &mut inputs),
            CommandInput::Structured { options, .. } => {
                parse_structured(command, options, &mut inputs)
            }
        };
        if let Err(reply) = consumed {
            return Ok(reply);
        }

        for (index, option) in command.option_nodes().iter().enumerate() {
            if inputs.is_supplied(index) {
                candidate = option.action_ref().or(candidate);
            }
        }

        let Some(action) = candidate else {
            log::warn!("No action found for command `{}`", command.name());
            return Ok(RunResult::ephemeral(NOT_IMPLEMENTED_MESSAGE));
        };

        log::debug!("Running `{}` with {:?}", command.name(), inputs);
        action.run(&Invocation {
            source,
            inputs: &inputs,
            tree: self,
            command,
        })
    }
}

fn input_error_reply<S: ?Sized>(command: &Command<S>, index: usize, err: &InputError) -> RunResult {
    RunResult::ephemeral(format!(
        "{}: `{}` (at `{}`).",
        err.kind,
        err.input,
        command.options_syntax(index, true)
    ))
}

fn parse_text<S: ?Sized>(
    command: &Command<S>,
    mut rest: &str,
    inputs: &mut Inputs,
) -> Result<(), RunResult> {
    for (index, option) in command.option_nodes().iter().enumerate() {
        if rest.is_empty() {
            if option.is_required() {
                return Err(RunResult::ephemeral(format!(
                    "You're missing one or more required arguments: `{}`.",
                    command.options_syntax(index, true)
                )));
            }
            break;
        }

        let parsed = option
            .check_input(rest)
            .map_err(|err| input_error_reply(command, index, &err))?;
        inputs.set(index, parsed.value);
        rest = rest[parsed.consumed..].trim();
    }

    if !rest.is_empty() {
        log::debug!("Ignoring trailing input for `{}`: {rest:?}", command.name());
    }
    Ok(())
}

fn parse_structured<S: ?Sized>(
    command: &Command<S>,
    options: &dyn OptionLookup,
    inputs: &mut Inputs,
) -> Result<(), RunResult> {
    for (index, option) in command.option_nodes().iter().enumerate() {
        let Some(value) = options.get(option.name()) else {
            if option.is_required() {
                return Err(RunResult::ephemeral(format!(
                    "You're missing a required argument: `{}`.",
                    command.options_syntax(index, true)
                )));
            }
            continue;
        };

        let value = option
            .accept(value)
            .map_err(|err| input_error_reply(command, index, &err))?;
        inputs.set(index, value);
    }
    Ok(())
}
