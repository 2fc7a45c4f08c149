use core::ops::{Index, IndexMut};
use ndarray::Array2;
use smallvec::SmallVec;

use crate::*;

/// A slot stored in a [`Grid`].
pub trait GridCell {
    /// Builds the cell that lives at `position`. The grid calls this exactly once per slot.
    fn at(position: Coord2) -> Self;

    fn position(&self) -> Coord2;

    /// Returns the cell to its initial per-game state, keeping its position.
    fn reset(&mut self);
}

/// Fixed-size two-dimensional container of cells addressed by `(x, y)`.
///
/// The size is fixed at construction, storage is allocated by the first [`Grid::init`] call and
/// every later call only resets the existing cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<C> {
    size: Coord2,
    cells: Option<Array2<C>>,
}

impl<C: GridCell> Grid<C> {
    pub fn init(&mut self) {
        match &mut self.cells {
            Some(cells) => cells.iter_mut().for_each(GridCell::reset),
            None => {
                let (columns, rows) = self.size;
                log::trace!("Allocating {}x{} grid", columns, rows);
                self.cells = Some(Array2::from_shape_fn(
                    (usize::from(rows), usize::from(columns)),
                    |(y, x)| C::at((x as Coord, y as Coord)),
                ));
            }
        }
    }
}

impl<C> Grid<C> {
    pub const fn new(columns: Coord, rows: Coord) -> Self {
        Self {
            size: (columns, rows),
            cells: None,
        }
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn columns(&self) -> Coord {
        self.size.0
    }

    pub const fn rows(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn is_allocated(&self) -> bool {
        self.cells.is_some()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size.0 && coords.1 < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if !self.is_allocated() {
            Err(GameError::GridNotAllocated)
        } else if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// The cell at `coords`, or `None` when out of bounds or not allocated yet.
    pub fn get(&self, coords: Coord2) -> Option<&C> {
        if !self.contains(coords) {
            return None;
        }
        self.cells.as_ref()?.get(coords.to_nd_index())
    }

    pub fn get_mut(&mut self, coords: Coord2) -> Option<&mut C> {
        if !self.contains(coords) {
            return None;
        }
        self.cells.as_mut()?.get_mut(coords.to_nd_index())
    }

    /// Position one step from `coords` along `delta`, if it is on the grid.
    pub fn step(&self, coords: Coord2, delta: Delta) -> Option<Coord2> {
        offset(coords, delta, self.size)
    }

    /// All cells with the given `y`, left to right.
    pub fn row(&self, y: Coord) -> impl Iterator<Item = &C> {
        (0..self.size.0).filter_map(move |x| self.get((x, y)))
    }

    /// All cells with the given `x`, top to bottom.
    pub fn column(&self, x: Coord) -> impl Iterator<Item = &C> {
        (0..self.size.1).filter_map(move |y| self.get((x, y)))
    }

    pub fn neighbor_positions(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }

    /// The up-to-eight adjacent cells, in scan order, never including `coords` itself.
    pub fn neighbors(&self, coords: Coord2) -> SmallVec<[&C; 8]> {
        self.neighbor_positions(coords)
            .filter_map(|pos| self.get(pos))
            .collect()
    }

    /// Walks from `origin` by `direction` until stepping off the grid.
    pub fn line(&self, origin: Coord2, direction: Delta) -> Line<'_, C> {
        Line {
            grid: self,
            next: Some(origin),
            direction,
        }
    }

    /// Cells in scan order (row by row).
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cells.iter().flat_map(|cells| cells.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.cells.iter_mut().flat_map(|cells| cells.iter_mut())
    }

    /// Every in-bounds position in scan order.
    pub fn positions(&self) -> impl Iterator<Item = Coord2> + use<C> {
        let (columns, rows) = self.size;
        (0..rows).flat_map(move |y| (0..columns).map(move |x| (x, y)))
    }

    /// Maps a scan-order index back to its position.
    pub fn position_at(&self, index: usize) -> Option<Coord2> {
        let columns = usize::from(self.size.0);
        if columns == 0 || index >= usize::from(self.total_cells()) {
            return None;
        }
        Some(((index % columns) as Coord, (index / columns) as Coord))
    }

    pub fn count(&self, mut predicate: impl FnMut(&C) -> bool) -> usize {
        self.iter().filter(|cell| predicate(cell)).count()
    }
}

impl<C> Index<Coord2> for Grid<C> {
    type Output = C;

    fn index(&self, coords: Coord2) -> &Self::Output {
        let cells = self.cells.as_ref().expect("grid should be initialized");
        &cells[coords.to_nd_index()]
    }
}

impl<C> IndexMut<Coord2> for Grid<C> {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        let cells = self.cells.as_mut().expect("grid should be initialized");
        &mut cells[coords.to_nd_index()]
    }
}

/// Straight walk over a grid, see [`Grid::line`].
#[derive(Debug)]
pub struct Line<'a, C> {
    grid: &'a Grid<C>,
    next: Option<Coord2>,
    direction: Delta,
}

impl<'a, C> Iterator for Line<'a, C> {
    type Item = &'a C;

    fn next(&mut self) -> Option<Self::Item> {
        let coords = self.next.take()?;
        let cell = self.grid.get(coords)?;
        if self.direction != (0, 0) {
            self.next = self.grid.step(coords, self.direction);
        }
        Some(cell)
    }
}
