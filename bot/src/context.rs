use std::cell::Cell;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// What the bot's actions need to know about where a command came from.
pub trait BotContext {
    /// Seed for the random source of this invocation.
    fn seed(&self) -> u64;

    /// Latency of the gateway connection, if one has been measured yet.
    fn heartbeat(&self) -> Option<Duration>;
}

/// Context for commands typed on a terminal. Every invocation gets the next seed in sequence.
#[derive(Debug)]
pub struct CliContext {
    next_seed: Cell<u64>,
}

impl CliContext {
    pub fn new(seed: u64) -> Self {
        Self {
            next_seed: Cell::new(seed),
        }
    }
}

impl BotContext for CliContext {
    fn seed(&self) -> u64 {
        let seed = self.next_seed.get();
        self.next_seed.set(seed.wrapping_add(1));
        seed
    }

    fn heartbeat(&self) -> Option<Duration> {
        None
    }
}

/// A seed from the clock, for runs without `--seed`.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
