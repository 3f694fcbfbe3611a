use std::io::{self, BufRead, Write};

use spoilsweeper_command::{CommandInput, RunResult};
use spoilsweeper_protocol::{InteractionData, InteractionResponse, MessageData};

use crate::*;

/// Dispatches one chat line. Lines without the prefix are not commands.
pub fn respond_to_line(
    tree: &BotTree,
    context: &(dyn BotContext + 'static),
    prefix: &str,
    line: &str,
) -> RunResult {
    match line.strip_prefix(prefix) {
        Some(command) => tree.dispatch(context, CommandInput::Text(command.trim())),
        None => RunResult::Nothing,
    }
}

/// Reads chat lines from `input` until it ends, writing the content of every reply to `output`.
///
/// Returns how many lines produced a reply.
pub fn run_text_session<R: BufRead, W: Write>(
    tree: &BotTree,
    context: &(dyn BotContext + 'static),
    prefix: &str,
    input: R,
    mut output: W,
) -> io::Result<usize> {
    let mut answered = 0;
    for line in input.lines() {
        let replies = respond_to_line(tree, context, prefix, &line?).into_replies();
        if replies.is_empty() {
            continue;
        }
        answered += 1;
        for reply in replies {
            writeln!(output, "{}", reply.content)?;
        }
        output.flush()?;
    }
    Ok(answered)
}

/// Runs a slash command interaction and serializes the responses, one JSON document per reply.
///
/// Only the first reply answers the interaction itself, as an [`InteractionResponse`]. Any further
/// replies are follow-up messages, sent as bare [`MessageData`] bodies.
pub fn respond_to_interaction(
    tree: &BotTree,
    context: &(dyn BotContext + 'static),
    data: &InteractionData,
) -> serde_json::Result<Vec<String>> {
    let input = CommandInput::Structured {
        name: &data.name,
        options: data,
    };
    let replies = tree.dispatch(context, input).into_replies();
    let Some((first, follow_ups)) = replies.split_first() else {
        return Ok(Vec::new());
    };

    let mut documents = vec![serde_json::to_string(&InteractionResponse::from(first))?];
    for reply in follow_ups {
        documents.push(serde_json::to_string(&MessageData::from(reply))?);
    }
    Ok(documents)
}
