use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use spoilsweeper_core::{GameLimits, RenderLimits};

/// One line of the `news` command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsEntry {
    /// Version name, e.g. `1.4`.
    pub name: String,
    pub description: String,
}

/// Bot configuration, read from a TOML file.
///
/// ```toml
/// prefix = "!"
///
/// [limits]
/// max_width = 40
/// max_height = 20
///
/// [[news]]
/// name = "1.4"
/// description = "Games that are too large are now split over several messages."
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text commands start with this.
    pub prefix: String,
    pub limits: GameLimits,
    pub render: RenderLimits,
    /// Newest first.
    pub news: Vec<NewsEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: "!".to_owned(),
            limits: GameLimits::default(),
            render: RenderLimits::default(),
            news: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.prefix.is_empty() {
            anyhow::bail!("prefix must not be empty");
        }
        let limits = &config.limits;
        if limits.max_width == 0 || limits.max_height == 0 {
            anyhow::bail!("maximum game size must be at least 1x1");
        }
        if limits.default_size == 0
            || limits.default_size > limits.max_width
            || limits.default_size > limits.max_height
        {
            anyhow::bail!(
                "default size {} does not fit in the maximum game size {}x{}",
                limits.default_size,
                limits.max_width,
                limits.max_height
            );
        }
        if limits.mine_density_percent > 100 {
            let density = limits.mine_density_percent;
            anyhow::bail!("mine density must be at most 100%, not {density}%");
        }
        if config.render.max_message_chars == 0 || config.render.max_rich_tokens == 0 {
            anyhow::bail!("message limits must be positive");
        }
        Ok(config)
    }

    /// Loads the config at `path`, or the defaults when there is no such file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Could not read {}", path.display()));
            }
        };
        Self::from_toml(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }
}
