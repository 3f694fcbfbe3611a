use serde::{Deserialize, Serialize};

use crate::*;

/// Configured bounds and defaults for generated games.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameLimits {
    pub max_width: Coord,
    pub max_height: Coord,
    /// Used for both sides when neither width nor height is given.
    pub default_size: Coord,
    /// Share of the cells that become mines when no mine count is given.
    pub mine_density_percent: u8,
}

impl Default for GameLimits {
    fn default() -> Self {
        Self {
            max_width: 40,
            max_height: 20,
            default_size: 8,
            mine_density_percent: 20,
        }
    }
}

impl GameLimits {
    /// Mine count used when the player leaves it out, rounded half up and never zero.
    pub fn default_mines(&self, width: i64, height: i64) -> i64 {
        let cells = width.saturating_mul(height);
        let scaled = cells.saturating_mul(self.mine_density_percent.into());
        (scaled.saturating_add(50) / 100).max(1)
    }
}

/// Game settings as they come out of a command: every number may be missing or out of range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGameSettings {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub num_mines: Option<i64>,
    pub starts_not_uncovered: bool,
}

impl RawGameSettings {
    pub const fn new(
        width: Option<i64>,
        height: Option<i64>,
        num_mines: Option<i64>,
        starts_not_uncovered: bool,
    ) -> Self {
        Self {
            width,
            height,
            num_mines,
            starts_not_uncovered,
        }
    }

    /// Fills in defaults and rejects out of range values.
    ///
    /// Defaults are written back into `self`, so a second call on settings that passed is a
    /// no-op. Size errors are reported before mine count errors.
    pub fn check(&mut self, limits: &GameLimits) -> core::result::Result<(), SettingsError> {
        let default_size = i64::from(limits.default_size);
        let (width, height) = match (self.width, self.height) {
            (Some(width), Some(height)) => (width, height),
            (Some(width), None) => (width, width),
            (None, Some(height)) => (height, height),
            (None, None) => (default_size, default_size),
        };
        self.width = Some(width);
        self.height = Some(height);

        if let Some(dimension) = Dimension::of(width <= 0, height <= 0) {
            return Err(SettingsError::DimensionTooSmall {
                dimension,
                width,
                height,
            });
        }

        let too_wide = width > i64::from(limits.max_width);
        let too_tall = height > i64::from(limits.max_height);
        if let Some(dimension) = Dimension::of(too_wide, too_tall) {
            return Err(SettingsError::DimensionTooLarge {
                dimension,
                max_width: limits.max_width,
                max_height: limits.max_height,
            });
        }

        let mines = *self
            .num_mines
            .get_or_insert_with(|| limits.default_mines(width, height));
        if mines <= 0 {
            return Err(SettingsError::MineCountNonPositive);
        }
        if mines > width * height {
            return Err(SettingsError::MineCountOverflow {
                mines,
                width: width as Coord,
                height: height as Coord,
            });
        }

        Ok(())
    }

    /// Checks the settings and converts them into the form the generator takes.
    pub fn validate(
        mut self,
        limits: &GameLimits,
    ) -> core::result::Result<GameSettings, SettingsError> {
        self.check(limits)?;
        // `check` filled every field and bounded it by `Coord::MAX`.
        let width = self.width.unwrap_or_default() as Coord;
        let height = self.height.unwrap_or_default() as Coord;
        let mines = self.num_mines.unwrap_or_default() as CellCount;
        Ok(GameSettings::new_unchecked(
            (width, height),
            mines,
            self.starts_not_uncovered,
        ))
    }
}

/// Free-function form of [`RawGameSettings::check`].
pub fn check_game_settings(
    settings: &mut RawGameSettings,
    limits: &GameLimits,
) -> core::result::Result<(), SettingsError> {
    settings.check(limits)
}

/// Settings for a single generated game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub size: Coord2,
    pub mines: CellCount,
    pub starts_not_uncovered: bool,
}

impl GameSettings {
    pub const fn new_unchecked(size: Coord2, mines: CellCount, starts_not_uncovered: bool) -> Self {
        Self {
            size,
            mines,
            starts_not_uncovered,
        }
    }

    pub fn new((size_x, size_y): Coord2, mines: CellCount, starts_not_uncovered: bool) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let mines = mines.clamp(1, mult(size_x, size_y));
        Self::new_unchecked((size_x, size_y), mines, starts_not_uncovered)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}
