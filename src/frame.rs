// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// In-memory grid of cells shared by every surface implementation.
///
/// Clearing bumps a generation counter instead of rewriting the grid: a cell
/// whose stamp is not the current generation reads back as blank.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    gen: u32,
    cell_gen: Vec<u32>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
            gen: 1,
            cell_gen: vec![0; len],
        }
    }

    pub fn clear(&mut self) {
        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.cell_gen.fill(0);
            self.gen = 1;
        }
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cell_at_index(i))
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        if self.cell_gen.get(i).copied() == Some(self.gen) {
            self.cells[i]
        } else {
            Cell::BLANK
        }
    }

    /// Stores `cell` at (`x`, `y`). Returns false when the coordinate lies
    /// outside the grid, in which case nothing is written.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        self.cells[i] = cell;
        self.cell_gen[i] = self.gen;
        true
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn count_non_blank(&self) -> usize {
        (0..self.len())
            .filter(|&i| !self.cell_at_index(i).is_blank())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Tier;

    #[test]
    fn clear_makes_cells_effectively_blank() {
        let mut f = Frame::new(2, 2);
        assert!(f.set(0, 0, Cell::new('x', Tier::Bright)));
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');
        f.clear();
        assert_eq!(f.get(0, 0).unwrap(), Cell::BLANK);
        assert_eq!(f.count_non_blank(), 0);
    }

    #[test]
    fn set_ignores_coordinates_past_the_edge() {
        let mut f = Frame::new(4, 3);
        assert!(!f.set(4, 0, Cell::new('x', Tier::Dim)));
        assert!(!f.set(0, 3, Cell::new('x', Tier::Dim)));
        assert!(!f.set(u16::MAX, u16::MAX, Cell::new('x', Tier::Dim)));
        assert!(f.set(3, 2, Cell::new('y', Tier::Dim)));
        assert_eq!(f.count_non_blank(), 1);
        assert_eq!(f.get(4, 0), None);
    }

    #[test]
    fn generation_wrap_resets_stamps() {
        let mut f = Frame::new(1, 1);
        f.gen = u32::MAX;
        f.set(0, 0, Cell::new('z', Tier::Medium));
        f.clear();
        assert_eq!(f.gen, 1);
        assert_eq!(f.get(0, 0), Some(Cell::BLANK));
    }
}
