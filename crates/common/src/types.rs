use serde::{Deserialize, Serialize};

/// Size of the host surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A signed cell coordinate. May lie outside the grid; callers check with
/// [`GridDims::contains`] before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the simulation grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
}

impl GridDims {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Grid covering `viewport` with square cells of `cell_size` pixels.
    pub fn from_viewport(viewport: Viewport, cell_size: u32) -> Self {
        let cell = cell_size.max(1);
        Self {
            width: viewport.width.div_ceil(cell) as usize,
            height: viewport.height.div_ceil(cell) as usize,
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index. Caller guarantees `x < width && y < height`.
    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Whether a signed coordinate lies inside the grid.
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Whether a coordinate lies strictly inside the one-cell border.
    pub fn is_interior(&self, coord: CellCoord) -> bool {
        coord.x >= 1
            && coord.y >= 1
            && (coord.x as usize) + 1 < self.width
            && (coord.y as usize) + 1 < self.height
    }
}
