use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Above this share of mined cells, picking random cells and retrying on collisions wastes too
/// many draws, so placement switches to choosing among the free cells directly.
const DENSE_PERCENT: CellCount = 90;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Mine,
    /// Number of mines among the up to eight neighbors.
    Clear(u8),
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Clear(0))
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Clear(0)
    }
}

/// A minefield with its neighbor counts filled in, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    pub fn empty((width, height): Coord2) -> Self {
        Self {
            cells: Array2::default((width, height).to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self, GenerateError> {
        let mut board = Self::empty(size);
        for &coords in mine_coords {
            board.validate_coords(coords)?;
            board.place_mine(coords);
        }
        Ok(board)
    }

    /// Places mines uniformly at random until `mines` cells hold one.
    pub fn generate<R: RandomSource + ?Sized>(size: Coord2, mines: CellCount, rng: &mut R) -> Self {
        let mut board = Self::empty(size);
        let total_cells = board.total_cells();

        // optimize for full boards
        if mines >= total_cells {
            if mines > total_cells {
                log::warn!(
                    "Minefield already full, generated anyway, requested {} but only fits {}",
                    mines,
                    total_cells
                );
            }
            for coords in iter_coords(size) {
                board.place_mine(coords);
            }
            return board;
        }

        let dense = u32::from(mines) * 100 > u32::from(total_cells) * u32::from(DENSE_PERCENT);
        if dense {
            log::debug!("Dense board ({mines}/{total_cells}), placing among free cells");
            while board.mine_count < mines {
                let free_cells = total_cells - board.mine_count;
                let place = rng.below(free_cells.into());
                let coords = iter_coords(size)
                    .filter(|&coords| !board[coords].is_mine())
                    .nth(place);
                match coords {
                    Some(coords) => {
                        board.place_mine(coords);
                    }
                    None => break,
                }
            }
        } else {
            let (width, height) = size;
            while board.mine_count < mines {
                let x = rng.below(width.into()) as Coord;
                let y = rng.below(height.into()) as Coord;
                // retry if there was already a mine there
                board.place_mine((x, y));
            }
        }

        // double check mine count
        if board.mine_count != mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                board.mine_count,
                mines
            );
        }
        board
    }

    /// Puts a mine on `coords` and bumps the counts around it. Returns `false` if there already
    /// was one.
    pub fn place_mine(&mut self, coords: Coord2) -> bool {
        let index = coords.to_nd_index();
        if self.cells[index].is_mine() {
            return false;
        }
        self.cells[index] = Cell::Mine;
        self.mine_count += 1;

        for pos in self.cells.iter_neighbors(coords) {
            if let Cell::Clear(count) = &mut self.cells[pos.to_nd_index()] {
                *count += 1;
            }
        }
        true
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2, GenerateError> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GenerateError::InvalidCoords)
        }
    }

    /// `(width, height)`
    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        mult(width, height)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    /// Every clear cell without mines around it, in row-major order.
    pub fn zero_cells(&self) -> Vec<Coord2> {
        iter_coords(self.size())
            .filter(|&coords| self[coords].is_zero())
            .collect()
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_mines() {
        let board = Board::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board[(1, 1)], Cell::Clear(2));
        assert_eq!(board[(1, 0)], Cell::Clear(1));
        assert_eq!(board[(2, 0)], Cell::Clear(0));
        assert_eq!(board[(0, 0)], Cell::Mine);
    }

    #[test]
    fn duplicate_mine_is_ignored() {
        let mut board = Board::empty((2, 1));

        assert!(board.place_mine((0, 0)));
        assert!(!board.place_mine((0, 0)));
        assert_eq!(board.mine_count(), 1);
        assert_eq!(board[(1, 0)], Cell::Clear(1));
    }

    #[test]
    fn rejects_out_of_bounds_mines() {
        assert_eq!(
            Board::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GenerateError::InvalidCoords)
        );
    }

    #[test]
    fn non_square_board_is_row_major() {
        let board = Board::from_mine_coords((4, 2), &[(3, 1)]).unwrap();

        assert_eq!(board.size(), (4, 2));
        assert_eq!(board.cells().dim(), (2, 4));
        assert_eq!(board[(2, 0)], Cell::Clear(1));
        assert_eq!(board[(0, 0)], Cell::Clear(0));
    }

    #[test]
    fn generates_requested_mine_count() {
        let mut rng = seeded(3);

        for mines in [1, 10, 30, 39, 40] {
            let board = Board::generate((8, 5), mines, &mut rng);
            assert_eq!(board.mine_count(), mines);
            let on_board = board.cells().iter().filter(|cell| cell.is_mine()).count();
            assert_eq!(on_board, usize::from(mines));
        }
    }

    #[test]
    fn single_cell_full_board() {
        let board = Board::generate((1, 1), 1, &mut seeded(0));

        assert_eq!(board[(0, 0)], Cell::Mine);
        assert!(board.zero_cells().is_empty());
    }

    #[test]
    fn counts_match_neighborhood() {
        let board = Board::generate((12, 9), 30, &mut seeded(11));

        for coords in iter_coords(board.size()) {
            if let Cell::Clear(count) = board[coords] {
                assert_eq!(count, board.adjacent_mine_count(coords));
            }
        }
    }
}
