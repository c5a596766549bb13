use mandelcycle_core::DID_NOT_ESCAPE;

/// Per-pixel escape counts for one square frame.
///
/// This is the raw output of the engine before coloring. Keeping counts
/// separate from colored pixels lets the color table be rebuilt and the
/// frame repainted without recomputing anything.
///
/// A grid is only ever handed out fully populated, and it has no mutating
/// API after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    size: u32,
    max_iterations: u32,
    values: Vec<u32>,
}

impl PixelGrid {
    /// Wrap a completed row-major value buffer.
    pub(crate) fn from_values(size: u32, max_iterations: u32, values: Vec<u32>) -> Self {
        debug_assert_eq!(values.len(), size as usize * size as usize);
        Self {
            size,
            max_iterations,
            values,
        }
    }

    /// Side length in pixels.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The iteration budget the grid was computed with.
    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Row-major escape counts, `size²` entries.
    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Escape count at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.values[cell_index(self.size, x, y)])
    }

    /// Stream every cell exactly once, row-major, as `(x, y, value)`.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(u32, u32, u32),
    {
        let size = self.size as usize;
        for (row, chunk) in self.values.chunks_exact(size.max(1)).enumerate() {
            for (col, &value) in chunk.iter().enumerate() {
                visitor(col as u32, row as u32, value);
            }
        }
    }

    /// Number of cells that never escaped.
    pub fn interior_count(&self) -> usize {
        self.values.iter().filter(|&&v| v == DID_NOT_ESCAPE).count()
    }
}

/// Row-major offset of `(x, y)`, widened before multiplying so sides
/// above `u16::MAX` do not wrap.
#[inline]
fn cell_index(size: u32, x: u32, y: u32) -> usize {
    y as usize * size as usize + x as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelGrid {
        PixelGrid::from_values(3, 10, vec![0, 1, 2, 3, DID_NOT_ESCAPE, 5, 6, 7, 8])
    }

    #[test]
    fn visit_is_row_major_and_complete() {
        let grid = sample();
        let mut seen = Vec::new();
        grid.visit(|x, y, v| seen.push((x, y, v)));

        assert_eq!(seen.len(), 9);
        assert_eq!(seen[0], (0, 0, 0));
        assert_eq!(seen[1], (1, 0, 1));
        assert_eq!(seen[3], (0, 1, 3));
        assert_eq!(seen[4], (1, 1, DID_NOT_ESCAPE));
        assert_eq!(seen[8], (2, 2, 8));
    }

    #[test]
    fn get_bounds() {
        let grid = sample();
        assert_eq!(grid.get(2, 1), Some(5));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn counts_interior() {
        assert_eq!(sample().interior_count(), 1);
    }

    #[test]
    fn index_does_not_wrap_for_wide_grids() {
        let size = 70_000;
        assert_eq!(cell_index(size, 1, size - 1), 69_999 * 70_000 + 1);
        assert_eq!(cell_index(4, 3, 2), 11);
    }
}
