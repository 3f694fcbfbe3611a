use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::*;

/// Violations of the tree invariants, found while building.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Command `{0}` is registered more than once")]
    DuplicateCommand(String),
    #[error("Command `{command}` has more than one option named `{option}`")]
    DuplicateOption { command: String, option: String },
    #[error("Command `{command}` has required option `{option}` after an optional one")]
    RequiredAfterOptional { command: String, option: String },
    #[error("Command `{shadowed}` can never be typed because `{by}` is matched first")]
    ShadowedCommand { shadowed: String, by: String },
    #[error("Alias `{alias}` refers to unknown command `{target}`")]
    UnknownAliasTarget { alias: String, target: String },
}

/// A literal keyword with its ordered options.
pub struct Command<S: ?Sized> {
    name: String,
    description: String,
    text_only: bool,
    options: Arc<[ArgumentNode<S>]>,
    action: Option<Action<S>>,
    alias_of: Option<String>,
}

impl<S: ?Sized> Command<S> {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            text_only: false,
            options: Arc::new([]),
            action: None,
            alias_of: None,
        }
    }

    pub fn options(mut self, options: impl IntoIterator<Item = ArgumentNode<S>>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Invocation<'_, S>) -> anyhow::Result<RunResult> + Send + Sync + 'static,
    {
        self.action = Some(Action::new(action));
        self
    }

    /// Not offered as a slash command.
    pub fn text_only(mut self) -> Self {
        self.text_only = true;
        self
    }

    /// Another name for this command, sharing its options and action. Aliases are text only.
    pub fn alias(&self, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            text_only: true,
            options: Arc::clone(&self.options),
            action: self.action.clone(),
            alias_of: Some(self.name.clone()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_text_only(&self) -> bool {
        self.text_only
    }

    pub fn alias_of(&self) -> Option<&str> {
        self.alias_of.as_deref()
    }

    pub fn option_nodes(&self) -> &[ArgumentNode<S>] {
        &self.options
    }

    pub(crate) fn action_ref(&self) -> Option<&Action<S>> {
        self.action.as_ref()
    }

    pub fn check_input(&self, input: &str) -> Result<Parsed, InputError> {
        crate::node::check_input(NodeKind::Literal, &self.name, input)
    }

    /// Syntax of the options starting at `from`, e.g. `<a> <b> [<c> [<d>]]`.
    ///
    /// With `required_only` the optional suffix is left out, unless `from` itself is optional,
    /// in which case just that option is named.
    pub fn options_syntax(&self, from: usize, required_only: bool) -> String {
        let Some(first) = self.options.get(from) else {
            return String::new();
        };
        if required_only && first.is_optional() {
            return first.placeholder();
        }

        let mut syntax = String::new();
        let mut open = 0;
        for option in &self.options[from..] {
            if required_only && option.is_optional() {
                break;
            }
            if !syntax.is_empty() {
                syntax.push(' ');
            }
            if option.is_optional() {
                syntax.push('[');
                open += 1;
            }
            syntax.push_str(&option.placeholder());
        }
        syntax.extend(std::iter::repeat_n(']', open));
        syntax
    }

    fn validate(&self) -> Result<(), TreeError> {
        let mut names = HashSet::new();
        let mut seen_optional = false;
        for option in self.options.iter() {
            if !names.insert(option.name()) {
                return Err(TreeError::DuplicateOption {
                    command: self.name.clone(),
                    option: option.name().to_owned(),
                });
            }
            if option.is_required() && seen_optional {
                return Err(TreeError::RequiredAfterOptional {
                    command: self.name.clone(),
                    option: option.name().to_owned(),
                });
            }
            seen_optional |= option.is_optional();
        }
        Ok(())
    }
}

impl<S: ?Sized> Clone for Command<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            text_only: self.text_only,
            options: Arc::clone(&self.options),
            action: self.action.clone(),
            alias_of: self.alias_of.clone(),
        }
    }
}

impl<S: ?Sized> fmt::Debug for Command<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("has_action", &self.action.is_some())
            .field("alias_of", &self.alias_of)
            .finish()
    }
}

/// The root of the grammar: an ordered OR-set of commands. Immutable once built.
pub struct CommandTree<S: ?Sized> {
    commands: Vec<Command<S>>,
    action: Option<Action<S>>,
}

impl<S: ?Sized> CommandTree<S> {
    pub fn builder() -> TreeBuilder<S> {
        TreeBuilder {
            commands: Vec::new(),
            action: None,
            pending_aliases: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command<S>] {
        &self.commands
    }

    pub fn command(&self, name: &str) -> Option<&Command<S>> {
        self.commands.iter().find(|command| command.name == name)
    }

    pub(crate) fn action_ref(&self) -> Option<&Action<S>> {
        self.action.as_ref()
    }

    /// `(a|b|c)` followed by ` ...` when some command takes options.
    pub fn options_syntax(&self, required_only: bool) -> String {
        if self.commands.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = self.commands.iter().map(Command::name).collect();
        let has_more = self.commands.iter().any(|command| match command.options.first() {
            Some(first) => !(required_only && first.is_optional()),
            None => false,
        });
        format!("({}){}", names.join("|"), if has_more { " ..." } else { "" })
    }
}

impl<S: ?Sized> fmt::Debug for CommandTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("commands", &self.commands)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

pub struct TreeBuilder<S: ?Sized> {
    commands: Vec<Command<S>>,
    action: Option<Action<S>>,
    pending_aliases: Vec<(String, String)>,
}

impl<S: ?Sized> TreeBuilder<S> {
    pub fn command(mut self, command: Command<S>) -> Self {
        self.commands.push(command);
        self
    }

    /// Registers `alias` for the already added command `target`, at this position.
    pub fn alias(
        mut self,
        alias: impl Into<String>,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let alias = alias.into();
        let target = target.into();
        match self.commands.iter().find(|command| command.name == target) {
            Some(command) => {
                let command = command.alias(alias, description);
                self.commands.push(command);
            }
            None => self.pending_aliases.push((alias, target)),
        }
        self
    }

    /// Runs when input names no command with an action of its own.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Invocation<'_, S>) -> anyhow::Result<RunResult> + Send + Sync + 'static,
    {
        self.action = Some(Action::new(action));
        self
    }

    pub fn build(self) -> Result<CommandTree<S>, TreeError> {
        if let Some((alias, target)) = self.pending_aliases.into_iter().next() {
            return Err(TreeError::UnknownAliasTarget { alias, target });
        }

        for (index, command) in self.commands.iter().enumerate() {
            command.validate()?;
            for earlier in &self.commands[..index] {
                if earlier.name == command.name {
                    return Err(TreeError::DuplicateCommand(command.name.clone()));
                }
                if command.name.starts_with(&earlier.name) {
                    return Err(TreeError::ShadowedCommand {
                        shadowed: command.name.clone(),
                        by: earlier.name.clone(),
                    });
                }
            }
        }

        log::debug!("Built command tree with {} commands", self.commands.len());
        Ok(CommandTree {
            commands: self.commands,
            action: self.action,
        })
    }
}
