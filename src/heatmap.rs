// One heatmap instance: sample storage, configuration, and the two cached
// derived artifacts (footprint stamp, gradient LUT). Caches are invalidated
// only by their setters and rebuilt lazily on the next draw.

use crate::buffer::{DensityGrid, Sample, Samples};
use crate::gradient::{Color, DEFAULT_GRADIENT, GradientLut};
use crate::render;
use crate::stamp::{DEFAULT_RADIUS, Stamp};
use crate::types::Canvas;

/// Density heatmap renderer for a fixed-size surface.
///
/// Single-threaded and synchronous: every call runs to completion, and the
/// target canvas is only borrowed for the duration of `draw`. Samples
/// persist across draws until cleared or the mode is switched.
pub struct Heatmap {
    width: usize,
    height: usize,
    samples: Samples,
    max: f32,
    min_opacity: f32,
    /// (radius, blur) when explicitly configured. When unset, point mode
    /// falls back to DEFAULT_RADIUS and grid mode derives a radius from the
    /// cell size so footprints stay inside their allotted cell.
    point_style: Option<(f32, f32)>,
    stops: Vec<(f32, Color)>,
    stamp: Option<Stamp>,
    lut: Option<GradientLut>,
}

impl Heatmap {
    /// New point-mode heatmap for a surface of the given pixel size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: Samples::Points(Vec::new()),
            max: 1.0,
            min_opacity: render::DEFAULT_MIN_OPACITY,
            point_style: None,
            stops: DEFAULT_GRADIENT.to_vec(),
            stamp: None,
            lut: None,
        }
    }

    /// Switch to point mode with the given samples. Any grid state is dropped.
    pub fn data(&mut self, points: Vec<Sample>) {
        self.samples = Samples::Points(points);
    }

    /// Switch to grid mode with a zeroed w x h density grid. Any point list
    /// is dropped; there is no conversion between the representations.
    pub fn data_matrix(&mut self, w: usize, h: usize) {
        self.samples = Samples::Grid(DensityGrid::new(w, h));
    }

    /// Grid mode seeded from existing cell values.
    pub fn data_matrix_from(&mut self, w: usize, h: usize, cells: Vec<f32>) {
        self.samples = Samples::Grid(DensityGrid::from_cells(w, h, cells));
    }

    /// Add one weighted sample through the active representation.
    pub fn add(&mut self, x: f32, y: f32, weight: f32) {
        self.samples
            .add(x, y, weight, self.max, self.width, self.height);
    }

    /// Empty the point list (point mode; a no-op for grids).
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Normalization ceiling for clamping and draw-time alpha mapping.
    /// Takes effect on future adds and on the next draw of existing cells.
    pub fn set_max(&mut self, max: f32) {
        self.max = max;
    }

    /// Compositing floor for faint samples. Set to 0.0 for strictly
    /// weight-proportional opacity.
    pub fn set_min_opacity(&mut self, min_opacity: f32) {
        self.min_opacity = min_opacity;
    }

    /// Configure the footprint. Invalidates the cached stamp.
    pub fn set_point_style(&mut self, radius: f32, blur: f32) {
        self.point_style = Some((radius, blur));
        self.stamp = None;
    }

    /// Drop the explicit footprint configuration and return to the
    /// mode-dependent default (25px in point mode, auto-derived from the
    /// cell size in grid mode). Invalidates the cached stamp.
    pub fn reset_point_style(&mut self) {
        self.point_style = None;
        self.stamp = None;
    }

    /// Configure the color ramp. Invalidates the cached LUT.
    pub fn set_gradient(&mut self, stops: &[(f32, Color)]) {
        self.stops = stops.to_vec();
        self.lut = None;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Render the accumulated samples onto `canvas`: build stale caches,
    /// stamp every sample into the alpha channel, then colorize in place.
    /// Drawing twice with unchanged samples produces identical pixels.
    pub fn draw(&mut self, canvas: &mut Canvas) {
        self.ensure_stamp();
        self.ensure_lut();

        // Both caches were just built.
        let (Some(stamp), Some(lut)) = (self.stamp.as_ref(), self.lut.as_ref()) else {
            return;
        };

        render::rasterize(
            canvas,
            stamp,
            &self.samples,
            self.width,
            self.height,
            self.max,
            self.min_opacity,
        );
        render::colorize(canvas.pixels_mut(), lut);
    }

    /// Effective footprint configuration: the explicit style if set, else
    /// the mode-dependent default.
    fn effective_style(&self) -> (f32, f32) {
        if let Some(style) = self.point_style {
            return style;
        }
        match &self.samples {
            Samples::Points(_) => (DEFAULT_RADIUS, 0.0),
            Samples::Grid(grid) => {
                // Auto radius: half the smaller cell edge, so neighboring
                // cells' footprints don't overlap. Integer cell edges match
                // the surface/grid truncating division.
                let rw = self.width / grid.w.max(1);
                let rh = self.height / grid.h.max(1);
                (rw.min(rh) as f32 / 2.0, 0.0)
            }
        }
    }

    fn ensure_stamp(&mut self) {
        let (radius, blur) = self.effective_style();
        let stale = match &self.stamp {
            Some(stamp) => !stamp.matches(radius, blur),
            None => true,
        };
        if stale {
            self.stamp = Some(Stamp::build(radius, blur));
        }
    }

    fn ensure_lut(&mut self) {
        if self.lut.is_none() {
            self.lut = Some(GradientLut::build(&self.stops));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_switch_discards_the_other_modes_samples() {
        let mut heat = Heatmap::new(100, 100);
        heat.add(10.0, 10.0, 0.5);
        heat.add(20.0, 20.0, 0.5);

        // To grid mode: the point list is gone.
        heat.data_matrix(4, 4);
        assert!(heat.samples().is_empty());
        heat.add(60.0, 60.0, 1.0);
        assert!(!heat.samples().is_empty());

        // And back: the grid is gone too.
        heat.data(Vec::new());
        assert!(heat.samples().is_empty());
        match heat.samples() {
            Samples::Points(points) => assert!(points.is_empty()),
            Samples::Grid(_) => unreachable!(),
        }
    }

    #[test]
    fn draw_is_idempotent_for_unchanged_samples() {
        let mut heat = Heatmap::new(64, 64);
        heat.add(30.0, 30.0, 0.8);
        heat.add(40.0, 25.0, 0.3);

        let mut first = Canvas::new(64, 64);
        heat.draw(&mut first);
        let mut second = Canvas::new(64, 64);
        heat.draw(&mut second);
        assert_eq!(first.pixels(), second.pixels());
    }

    #[test]
    fn min_opacity_floor_applies_by_default() {
        let mut heat = Heatmap::new(20, 20);
        heat.set_point_style(3.0, 0.0);
        heat.add(10.0, 10.0, 0.01);

        let mut canvas = Canvas::new(20, 20);
        heat.draw(&mut canvas);
        // Weight 0.01 with max 1 still composites at the 0.05 default floor.
        assert_eq!(canvas.alpha_at(10, 10), (0.05f32 * 255.0).round() as u8);

        // Overriding the floor to 0 makes opacity strictly proportional.
        heat.set_min_opacity(0.0);
        heat.draw(&mut canvas);
        assert_eq!(canvas.alpha_at(10, 10), (0.01f32 * 255.0).round() as u8);
    }

    #[test]
    fn point_style_setter_invalidates_the_stamp_cache() {
        let mut heat = Heatmap::new(100, 100);
        heat.add(50.0, 50.0, 1.0);
        let mut canvas = Canvas::new(100, 100);
        heat.draw(&mut canvas);
        // Default radius 25: pixel 30px from center is inside the footprint.
        assert_ne!(canvas.alpha_at(50, 30), 0);

        heat.set_point_style(5.0, 0.0);
        heat.draw(&mut canvas);
        // Rebuilt stamp is much smaller; that pixel is now empty.
        assert_eq!(canvas.alpha_at(50, 30), 0);
        assert_ne!(canvas.alpha_at(50, 48), 0);
    }

    #[test]
    fn end_to_end_single_point_blob() {
        let mut heat = Heatmap::new(100, 100);
        heat.add(50.0, 50.0, 1.0);

        let mut canvas = Canvas::new(100, 100);
        heat.draw(&mut canvas);

        // Center: full intensity, colored with the 1.0 stop (red), opaque.
        assert_eq!(canvas.rgba_at(50, 50), [255, 0, 0, 255]);
        // Inside the default 25px radius the footprint is present.
        assert_ne!(canvas.alpha_at(50, 30), 0);
        // Corners are farther than radius + blur from the center: untouched.
        assert_eq!(canvas.rgba_at(0, 0), [0, 0, 0, 0]);
        assert_eq!(canvas.rgba_at(99, 99), [0, 0, 0, 0]);
    }

    #[test]
    fn end_to_end_grid_cell_with_auto_radius() {
        let mut heat = Heatmap::new(100, 100);
        heat.data_matrix(4, 4);
        // (60, 60) bins into cell (2, 2).
        heat.add(60.0, 60.0, 1.0);

        let mut canvas = Canvas::new(100, 100);
        heat.draw(&mut canvas);

        // Auto radius is min(100/4, 100/4) / 2 = 12.5, stamped at the cell
        // center (62.5, 62.5): opaque red there, nothing one radius away.
        assert_eq!(canvas.rgba_at(62, 62), [255, 0, 0, 255]);
        assert_eq!(canvas.alpha_at(62, 48), 0);
        assert_eq!(canvas.alpha_at(40, 62), 0);
        assert_eq!(canvas.alpha_at(0, 0), 0);
    }

    #[test]
    fn grid_redraw_uses_the_current_max() {
        let mut heat = Heatmap::new(100, 100);
        heat.data_matrix(2, 2);
        heat.add(10.0, 10.0, 0.5);

        let mut canvas = Canvas::new(100, 100);
        heat.draw(&mut canvas);
        let at_half = canvas.alpha_at(25, 25);

        // Halving max renormalizes the same cell to full intensity.
        heat.set_max(0.5);
        heat.draw(&mut canvas);
        assert_eq!(canvas.alpha_at(25, 25), 255);
        assert!(at_half < 255);
    }
}
