use std::fmt::Write;
use std::sync::Arc;

use spoilsweeper_command::*;
use spoilsweeper_core::{GameMessages, GameSettings, RawGameSettings, generate_game, seeded};

use crate::*;

pub type BotTree = CommandTree<dyn BotContext>;
type BotCommand = Command<dyn BotContext>;
type BotInvocation<'a> = Invocation<'a, dyn BotContext>;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

fn game_options() -> [ArgumentNode<dyn BotContext>; 4] {
    [
        ArgumentNode::new(NodeKind::Integer, "game-width", "Amount of squares horizontally."),
        ArgumentNode::new(NodeKind::Integer, "game-height", "Amount of squares vertically."),
        ArgumentNode::new(NodeKind::Integer, "num-mines", "Number of mines in the game."),
        ArgumentNode::new(
            NodeKind::Boolean,
            "dont-start-uncovered",
            "Option to not uncover the first part of the minesweeper field automatically.",
        ),
    ]
}

fn run_game(config: &Config, invocation: &BotInvocation<'_>, is_raw: bool) -> RunResult {
    let inputs = invocation.inputs;
    let raw = RawGameSettings::new(
        inputs.integer(0),
        inputs.integer(1),
        inputs.integer(2),
        inputs.boolean(3).unwrap_or(false),
    );
    let settings = match raw.validate(&config.limits) {
        Ok(settings) => settings,
        Err(err) => return err.to_string().into(),
    };

    log::debug!("Generating {settings:?}");
    let mut rng = seeded(invocation.source.seed());
    match generate_game(&settings, is_raw, &config.render, &mut rng) {
        Ok(GameMessages::Single(message)) => message.into(),
        Ok(GameMessages::Split(messages)) => messages.into(),
        Err(err) => {
            log::warn!("Could not render {settings:?}: {err}");
            err.to_string().into()
        }
    }
}

fn run_help(config: &Config, invocation: &BotInvocation<'_>) -> RunResult {
    let mut text = String::from("You can execute the following commands: ");
    for command in invocation.tree.commands() {
        let mut syntax = format!("{}{}", config.prefix, command.name());
        let options = command.options_syntax(0, false);
        if !options.is_empty() {
            syntax.push(' ');
            syntax.push_str(&options);
        }
        let _ = write!(text, "\n• `{syntax}`\n\t\t{}", command.description());
    }
    text.into()
}

fn run_info(config: &Config, invocation: &BotInvocation<'_>) -> RunResult {
    let prefix = &config.prefix;
    let limits = &config.limits;
    let syntax = invocation
        .tree
        .command("minesweeper")
        .map(|command| command.options_syntax(0, false))
        .unwrap_or_default();

    format!(
        "Hello, I'm a bot that can generate a random Minesweeper game using spoiler tags, for anyone to play! \
         To generate a new minesweeper game, use the `{prefix}minesweeper` command:\n\
         ```\n{prefix}minesweeper {syntax}\n```\
         `<game-width>` and `<game-height>` tell me how many squares the game should be wide and tall, \
         for a maximum of {}x{}. Default is {size}x{size}.\n\
         `<num-mines>` is how many mines there should be in the game, the more mines the more difficult it is. \
         If omitted, I will pick a number based on the size of the game.\n\
         When you run this command, I will reply with a grid of spoiler tags. \
         Unless you set the `<dont-start-uncovered>` parameter to true, the first zeroes will have already been opened for you.\n\n\
         If you don't know how to play Minesweeper, use the `{prefix}howtoplay` command. \
         For a list of all commands and their syntaxes, use `{prefix}help`.\n\n\
         I'm at version {VERSION}. My source code is available at {REPOSITORY}. \
         You can submit bug reports and feature requests there.\n\
         Thank you for using me!",
        limits.max_width,
        limits.max_height,
        size = limits.default_size,
    )
    .into()
}

fn run_how_to_play(config: &Config, invocation: &BotInvocation<'_>) -> anyhow::Result<RunResult> {
    let settings = GameSettings::new((5, 5), 3, false);
    let mut rng = seeded(invocation.source.seed());
    let example = generate_game(&settings, false, &config.render, &mut rng)?
        .into_vec()
        .join("\n");

    Ok(format!(
        "In Minesweeper, you get a rectangular grid of squares. In some of those squares, mines are hidden, \
         but you don't know which squares. The objective is to 'open' all the squares that don't have a hidden mine, \
         but to not touch the ones that do.\n\n\
         Let's start with an example. {example}\n\
         To open a square, click the spoiler tag. So go click one now. The contents of that square will be revealed \
         when you do so. If it's a mine (:bomb:), you lose! If it's not a mine, you get a mysterious number instead, \
         like :two:. This number is there to help you, as it indicates how many mines are in the eight squares that \
         touch it (horizontally, vertically or diagonally). Using this information and some good logic, you can \
         figure out the location of most of the mines!"
    )
    .into())
}

fn run_news(config: &Config) -> RunResult {
    if config.news.is_empty() {
        return "I haven't had any updates yet.".into();
    }
    let mut text = String::from("These were my past three updates:\n");
    for entry in config.news.iter().take(3) {
        let _ = write!(text, "\nVersion {} \u{2013} {}", entry.name, entry.description);
    }
    text.into()
}

fn run_ping(invocation: &BotInvocation<'_>) -> RunResult {
    match invocation.source.heartbeat() {
        Some(heartbeat) => format!("pong ({}ms heartbeat)", heartbeat.as_millis()).into(),
        None => "pong (no heartbeat yet)".into(),
    }
}

/// Builds the bot's command tree. Every action reads from the shared `config`.
pub fn build_commands(config: Arc<Config>) -> Result<BotTree, TreeError> {
    let help = {
        let config = Arc::clone(&config);
        BotCommand::new("help", "Lists available commands.")
            .text_only()
            .action(move |invocation| Ok(run_help(&config, invocation)))
    };
    let minesweeper_raw = {
        let config = Arc::clone(&config);
        BotCommand::new(
            "minesweeperraw",
            "Creates a Minesweeper game and shows the markdown code for copy-pasting.",
        )
        .options(game_options())
        .action(move |invocation| Ok(run_game(&config, invocation, true)))
    };
    let minesweeper = {
        let config = Arc::clone(&config);
        BotCommand::new("minesweeper", "Creates a Minesweeper game for you to play!")
            .options(game_options())
            .action(move |invocation| Ok(run_game(&config, invocation, false)))
    };
    let info = {
        let config = Arc::clone(&config);
        BotCommand::new("info", "Gives info about the bot.")
            .action(move |invocation| Ok(run_info(&config, invocation)))
    };
    let how_to_play = {
        let config = Arc::clone(&config);
        BotCommand::new("howtoplay", "Teaches you how to play Minesweeper.")
            .action(move |invocation| run_how_to_play(&config, invocation))
    };
    let news = BotCommand::new("news", "Lists the past three updates to the bot.")
        .action(move |_| Ok(run_news(&config)));
    let ping =
        BotCommand::new("ping", "Pong?").action(|invocation| Ok(run_ping(invocation)));

    CommandTree::builder()
        .command(help)
        .command(minesweeper_raw)
        .alias("msraw", "minesweeperraw", "Alias of the minesweeperraw command.")
        .command(minesweeper)
        .alias("ms", "minesweeper", "Alias of the minesweeper command.")
        .command(info)
        .command(how_to_play)
        .command(news)
        .command(ping)
        .build()
}
