use crate::error::SweepError;

/// Square grid stored row-major: cell `(x, y)` lives at `y * size + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Allocate a `size` x `size` grid filled with `value`.
    ///
    /// Fails instead of aborting when the allocation cannot be made.
    pub fn new(size: usize, value: T) -> Result<Self, SweepError> {
        let num_cells = size
            .checked_mul(size)
            .ok_or(SweepError::Allocation { cells: usize::MAX })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(num_cells)
            .map_err(|_| SweepError::Allocation { cells: num_cells })?;
        cells.resize(num_cells, value);
        Ok(Self { size, cells })
    }
}

impl<T> Grid<T> {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.size && y < self.size {
            self.cells.get(y * self.size + x)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.size && y < self.size {
            self.cells.get_mut(y * self.size + x)
        } else {
            None
        }
    }

    /// Row `y`, ordered by `x`.
    pub fn row(&self, y: usize) -> &[T] {
        &self.cells[y * self.size..(y + 1) * self.size]
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, T> {
        self.cells.chunks_mut(self.size.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }
}
