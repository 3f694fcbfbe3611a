use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use spoilsweeper::*;
use spoilsweeper_protocol::InteractionData;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Configuration file
    #[arg(short, long, default_value = "spoilsweeper.toml")]
    config: PathBuf,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Answer the slash command interaction in this JSON file instead of reading stdin
    #[arg(short, long)]
    interaction: Option<PathBuf>,
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) -> anyhow::Result<()> {
    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbose.log_level_filter().as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Error initializing logger: {err}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose)?;

    let config = Arc::new(Config::load(&args.config)?);
    let tree = build_commands(Arc::clone(&config)).context("Invalid command tree")?;
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {seed}");
    let context = CliContext::new(seed);

    if let Some(path) = &args.interaction {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let data = InteractionData::from_json(&json)
            .with_context(|| format!("Invalid interaction in {}", path.display()))?;
        for response in respond_to_interaction(&tree, &context, &data)? {
            println!("{response}");
        }
        return Ok(());
    }

    log::info!("Reading commands starting with `{}` from stdin", config.prefix);
    let answered = run_text_session(
        &tree,
        &context,
        &config.prefix,
        io::stdin().lock(),
        io::stdout().lock(),
    )
    .context("Could not run the text session")?;
    log::debug!("Answered {answered} commands");
    Ok(())
}
