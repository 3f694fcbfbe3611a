use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub const DIGIT_GLYPHS: [&str; 10] = [
    ":zero:", ":one:", ":two:", ":three:", ":four:", ":five:", ":six:", ":seven:", ":eight:",
    ":nine:",
];
pub const MINE_GLYPH: &str = ":bomb:";
pub const SPOILER: &str = "||";
pub const FENCE: &str = "```";

/// Per-message budgets of the chat transport.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderLimits {
    /// Kept below the transport's hard cap of 2000 characters.
    pub max_message_chars: usize,
    /// Spoilers and emoji past this count stop rendering. A hidden cell costs two, a shown one one.
    pub max_rich_tokens: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_message_chars: 1900,
            max_rich_tokens: 198,
        }
    }
}

/// Rendered game text, either one message or several that must be sent in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameMessages {
    Single(String),
    Split(Vec<String>),
}

impl GameMessages {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Split(messages) => messages.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(message) => alloc::vec![message],
            Self::Split(messages) => messages,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RenderedRow {
    text: String,
    tokens: usize,
}

/// A generated board together with the part of it that starts uncovered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub board: Board,
    pub reveal: Option<RevealMask>,
}

impl Game {
    pub fn generate<R: RandomSource + ?Sized>(settings: &GameSettings, rng: &mut R) -> Self {
        let board = Board::generate(settings.size, settings.mines, rng);
        let reveal = (!settings.starts_not_uncovered).then(|| RevealMask::opening(&board, rng));
        Self { board, reveal }
    }

    fn is_revealed(&self, coords: Coord2) -> bool {
        self.reveal.as_ref().is_some_and(|mask| mask[coords])
    }

    pub fn header(&self) -> String {
        let (width, height) = self.board.size();
        let mines = self.board.mine_count();
        let plural = if mines == 1 { "" } else { "s" };
        format!("Here's a board sized {width}x{height} with {mines} mine{plural}:")
    }

    fn render_rows(&self) -> Vec<RenderedRow> {
        let (width, height) = self.board.size();
        (0..height)
            .map(|y| {
                let mut row = RenderedRow {
                    text: String::new(),
                    tokens: 0,
                };
                for x in 0..width {
                    let glyph = match self.board[(x, y)] {
                        Cell::Mine => MINE_GLYPH,
                        Cell::Clear(count) => DIGIT_GLYPHS[usize::from(count)],
                    };
                    if self.is_revealed((x, y)) {
                        row.text.push_str(glyph);
                        row.tokens += 1;
                    } else {
                        row.text.push_str(SPOILER);
                        row.text.push_str(glyph);
                        row.text.push_str(SPOILER);
                        row.tokens += 2;
                    }
                }
                row
            })
            .collect()
    }

    /// The whole game as one text, ignoring message limits.
    pub fn render_text(&self, is_raw: bool) -> String {
        let mut text = self.header();
        if is_raw {
            text.push('\n');
            text.push_str(FENCE);
        }
        for row in self.render_rows() {
            text.push('\n');
            text.push_str(&row.text);
        }
        if is_raw {
            text.push('\n');
            text.push_str(FENCE);
        }
        text
    }

    /// Renders the game and packs the rows into as few messages as the limits allow.
    ///
    /// In raw mode every message is a complete fenced block. Joining the messages with newlines
    /// and dropping the fences added at the split points gives back [`Game::render_text`].
    pub fn render(
        &self,
        is_raw: bool,
        limits: &RenderLimits,
    ) -> Result<GameMessages, GenerateError> {
        let fence_len = if is_raw { FENCE.len() + 1 } else { 0 };
        let mut messages = Vec::new();
        let mut buffer = self.header();
        let mut tokens = 0;
        if is_raw {
            buffer.push('\n');
            buffer.push_str(FENCE);
        }

        for (y, row) in self.render_rows().into_iter().enumerate() {
            let fits_chars =
                buffer.len() + 1 + row.text.len() + fence_len <= limits.max_message_chars;
            let fits_tokens = tokens + row.tokens <= limits.max_rich_tokens;
            if fits_chars && fits_tokens {
                buffer.push('\n');
                buffer.push_str(&row.text);
                tokens += row.tokens;
                continue;
            }

            if fence_len + row.text.len() + fence_len > limits.max_message_chars
                || row.tokens > limits.max_rich_tokens
            {
                log::warn!(
                    "Row {y} alone does not fit in a message ({} chars, {} tokens)",
                    row.text.len(),
                    row.tokens
                );
                return Err(GenerateError::OutputOverflow { row: y as Coord });
            }

            if is_raw {
                buffer.push('\n');
                buffer.push_str(FENCE);
            }
            messages.push(core::mem::take(&mut buffer));
            if is_raw {
                buffer.push_str(FENCE);
                buffer.push('\n');
            }
            buffer.push_str(&row.text);
            tokens = row.tokens;
        }

        if is_raw {
            buffer.push('\n');
            buffer.push_str(FENCE);
        }

        if messages.is_empty() {
            return Ok(GameMessages::Single(buffer));
        }
        messages.push(buffer);
        log::debug!("Game split into {} messages", messages.len());
        Ok(GameMessages::Split(messages))
    }
}

/// Generates a game for already validated settings and renders it.
pub fn generate_game<R: RandomSource + ?Sized>(
    settings: &GameSettings,
    is_raw: bool,
    limits: &RenderLimits,
    rng: &mut R,
) -> Result<GameMessages, GenerateError> {
    Game::generate(settings, rng).render(is_raw, limits)
}
