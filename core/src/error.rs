use alloc::format;
use alloc::string::String;
use thiserror::Error;

use crate::Coord;

/// Which side of the board a size error is about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
    Both,
}

impl Dimension {
    pub(crate) const fn of(width_bad: bool, height_bad: bool) -> Option<Self> {
        match (width_bad, height_bad) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Width),
            (false, true) => Some(Self::Height),
            (false, false) => None,
        }
    }
}

/// Rejections from settings validation. The `Display` text is shown to users as is.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{}", too_small_message(.dimension, .width, .height))]
    DimensionTooSmall {
        dimension: Dimension,
        width: i64,
        height: i64,
    },
    #[error("{}", too_large_message(.dimension, .max_width, .max_height))]
    DimensionTooLarge {
        dimension: Dimension,
        max_width: Coord,
        max_height: Coord,
    },
    #[error(
        "You think you can look clever by solving a Minesweeper game without mines? Not gonna happen my friend."
    )]
    MineCountNonPositive,
    #[error("I can't fit {mines} mines in a game sized {width}x{height}!")]
    MineCountOverflow {
        mines: i64,
        width: Coord,
        height: Coord,
    },
}

fn too_small_message(dimension: &Dimension, width: &i64, height: &i64) -> String {
    match dimension {
        Dimension::Width => format!(
            "A game can't be {width} squares wide. I can only use positive numbers. Sorry :cry:"
        ),
        Dimension::Height => format!(
            "A game can't be {height} squares tall. I can only use positive numbers. Sorry :cry:"
        ),
        Dimension::Both => format!(
            "Uh, I'm not smart enough to generate a game sized {width} by {height}. I can only use positive numbers. Sorry :cry:"
        ),
    }
}

fn too_large_message(dimension: &Dimension, max_width: &Coord, max_height: &Coord) -> String {
    match dimension {
        Dimension::Width => format!(
            "That's way too wide! The maximum width is {max_width}. Think of all the mobile users who are going to see this!"
        ),
        Dimension::Height => format!(
            "That's way too tall! The maximum height is {max_height}. Think of all the mobile users who are going to see this!"
        ),
        Dimension::Both => format!(
            "That's way too large! The maximum size is {max_width}x{max_height}. Think of all the mobile users who are going to see this!"
        ),
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error(
        "Sorry, your game appears to be too large to send (because of the message limits). Please try a smaller game next time."
    )]
    OutputOverflow { row: Coord },
}
