// Sample storage: either a sparse list of weighted points or a dense
// fixed-size intensity grid. The two representations are mutually exclusive;
// switching replaces the whole variant and drops the other mode's samples.

/// One weighted point in surface pixel space. Immutable once added.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub weight: f32,
}

/// Dense intensity grid, row-major, dimensions fixed at creation.
/// Cell values accumulate sample weights, clamped to the heatmap's `max`,
/// so every cell stays in [0, max].
pub struct DensityGrid {
    pub w: usize,
    pub h: usize,
    pub cells: Vec<f32>, // length = w * h
}

impl DensityGrid {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            cells: vec![0.0; w * h],
        }
    }

    /// Seed from existing cell values (resized to w * h, zero-padded).
    pub fn from_cells(w: usize, h: usize, mut cells: Vec<f32>) -> Self {
        cells.resize(w * h, 0.0);
        Self { w, h, cells }
    }

    /// Map surface coordinates to a cell index. The computed cell is clamped
    /// into grid bounds: samples at or past the surface edge land in the
    /// outermost cell instead of indexing past the array.
    fn cell_index(&self, x: f32, y: f32, surface_w: usize, surface_h: usize) -> usize {
        let cx = (x / surface_w as f32 * self.w as f32).floor();
        let cy = (y / surface_h as f32 * self.h as f32).floor();
        let cx = cx.clamp(0.0, (self.w - 1) as f32) as usize;
        let cy = cy.clamp(0.0, (self.h - 1) as f32) as usize;
        cy * self.w + cx
    }

    /// Accumulate `weight` into the cell under (x, y), saturating at `max`.
    pub fn add(&mut self, x: f32, y: f32, weight: f32, max: f32, surface_w: usize, surface_h: usize) {
        let i = self.cell_index(x, y, surface_w, surface_h);
        self.cells[i] = (self.cells[i] + weight).min(max);
    }
}

/// Active sample representation. Point mode appends to an unbounded list;
/// grid mode bins into fixed cells. No conversion between the two.
pub enum Samples {
    Points(Vec<Sample>),
    Grid(DensityGrid),
}

impl Samples {
    /// Add a weighted sample through whichever representation is active.
    pub fn add(&mut self, x: f32, y: f32, weight: f32, max: f32, surface_w: usize, surface_h: usize) {
        match self {
            Samples::Points(points) => points.push(Sample { x, y, weight }),
            Samples::Grid(grid) => grid.add(x, y, weight, max, surface_w, surface_h),
        }
    }

    /// Empty the point list. Grid cells are replaced via a new
    /// `data_matrix` call, matching the original's clear semantics.
    pub fn clear(&mut self) {
        if let Samples::Points(points) = self {
            points.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Samples::Points(points) => points.is_empty(),
            Samples::Grid(grid) => grid.cells.iter().all(|&c| c == 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_accumulation_saturates_at_max() {
        let mut grid = DensityGrid::new(4, 4);
        // Two full-weight adds into the same cell stay at max, not 2 * max.
        grid.add(60.0, 60.0, 1.0, 1.0, 100, 100);
        grid.add(60.0, 60.0, 1.0, 1.0, 100, 100);
        assert_eq!(grid.cells[2 * 4 + 2], 1.0);
        assert!(grid.cells.iter().all(|&c| (0.0..=1.0).contains(&c)));
    }

    #[test]
    fn grid_accumulation_sums_below_max() {
        let mut grid = DensityGrid::new(2, 2);
        grid.add(10.0, 10.0, 0.25, 1.0, 100, 100);
        grid.add(10.0, 10.0, 0.25, 1.0, 100, 100);
        assert_eq!(grid.cells[0], 0.5);
    }

    #[test]
    fn edge_coordinates_clamp_into_the_grid() {
        let mut grid = DensityGrid::new(4, 4);
        // x == surface width would floor to column 4; it must land in column 3.
        grid.add(100.0, 100.0, 1.0, 1.0, 100, 100);
        assert_eq!(grid.cells[3 * 4 + 3], 1.0);
        // Negative coordinates land in cell (0, 0).
        grid.add(-5.0, -5.0, 1.0, 1.0, 100, 100);
        assert_eq!(grid.cells[0], 1.0);
    }

    #[test]
    fn from_cells_pads_to_grid_size() {
        let grid = DensityGrid::from_cells(2, 2, vec![0.5]);
        assert_eq!(grid.cells, vec![0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn point_mode_appends_and_clears() {
        let mut samples = Samples::Points(Vec::new());
        samples.add(1.0, 2.0, 0.3, 1.0, 100, 100);
        samples.add(3.0, 4.0, 0.7, 1.0, 100, 100);
        match &samples {
            Samples::Points(points) => assert_eq!(points.len(), 2),
            Samples::Grid(_) => unreachable!(),
        }
        samples.clear();
        assert!(samples.is_empty());
    }
}
