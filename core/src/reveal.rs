use alloc::collections::VecDeque;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Which cells are shown without a spoiler, same shape as the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealMask {
    revealed: Array2<bool>,
    revealed_count: CellCount,
}

impl RevealMask {
    pub fn hidden(board: &Board) -> Self {
        Self {
            revealed: Array2::default(board.cells().raw_dim()),
            revealed_count: 0,
        }
    }

    /// Opens the region around a random zero cell, the way a first click would.
    ///
    /// Boards without any zero cell get nothing revealed.
    pub fn opening<R: RandomSource + ?Sized>(board: &Board, rng: &mut R) -> Self {
        let zero_cells = board.zero_cells();
        if zero_cells.is_empty() {
            log::debug!("No zero cells, nothing to uncover");
            return Self::hidden(board);
        }
        let start = zero_cells[rng.below(zero_cells.len())];
        Self::flood_from(board, start)
    }

    /// Breadth-first reveal from `start` through zero cells. Non-zero cells get revealed but do not
    /// spread further.
    pub fn flood_from(board: &Board, start: Coord2) -> Self {
        let mut mask = Self::hidden(board);
        mask.reveal(start);

        let mut to_visit = VecDeque::from([start]);
        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in board.iter_neighbors(visit_coords) {
                if !mask.reveal(pos) {
                    continue;
                }
                if board[pos].is_zero() {
                    to_visit.push_back(pos);
                }
            }
        }
        mask
    }

    /// Returns `false` if the cell was already revealed.
    fn reveal(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.revealed[coords.to_nd_index()];
        if *cell {
            return false;
        }
        *cell = true;
        self.revealed_count += 1;
        true
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self[coords]
    }
}

impl Index<Coord2> for RevealMask {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.revealed[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn flood_fill_opens_zero_region() {
        let board = layout((3, 3), &[(2, 2)]);

        let mask = RevealMask::flood_from(&board, (0, 0));

        assert!(mask[(0, 0)]);
        assert!(mask[(1, 1)]);
        assert!(!mask[(2, 2)]);
        assert_eq!(mask.revealed_count(), 8);
    }

    #[test]
    fn numbers_stop_the_fill() {
        // zero region on the left, a wall of mines in the middle column
        let board = layout((5, 3), &[(2, 0), (2, 1), (2, 2)]);

        let mask = RevealMask::flood_from(&board, (0, 1));

        for y in 0..3 {
            assert!(mask[(0, y)]);
            assert!(mask[(1, y)]);
            assert!(!mask[(2, y)]);
            assert!(!mask[(3, y)]);
            assert!(!mask[(4, y)]);
        }
    }

    #[test]
    fn only_one_region_is_opened() {
        // two separate zero regions at each end
        let board = layout((7, 1), &[(3, 0)]);
        let mut rng = seeded(5);

        let mask = RevealMask::opening(&board, &mut rng);

        let left = mask[(0, 0)];
        let right = mask[(6, 0)];
        assert!(left != right);
        assert_eq!(mask.revealed_count(), 3);
    }

    #[test]
    fn no_zero_means_no_reveal() {
        let board = layout((2, 2), &[(0, 0), (1, 1)]);

        let mask = RevealMask::opening(&board, &mut seeded(1));

        assert_eq!(mask.revealed_count(), 0);
    }
}
