// The two draw passes. Rasterize stamps every sample's footprint into the
// surface's alpha channel; colorize then rewrites each touched pixel's RGB
// from the gradient table, leaving alpha as the final opacity.

use crate::buffer::Samples;
use crate::gradient::GradientLut;
use crate::stamp::Stamp;
use crate::types::Canvas;

/// Compositing opacity applied when no floor was configured. Keeps faint
/// samples visible instead of letting them vanish below perceptibility.
pub const DEFAULT_MIN_OPACITY: f32 = 0.05;

/// Clear the surface and composite one stamp per sample, each at opacity
/// `max(weight / max, min_opacity)`. Grid cells are mapped back to the
/// surface at their cell center. Off-canvas positions are stamped anyway;
/// the canvas clips them.
pub fn rasterize(
    canvas: &mut Canvas,
    stamp: &Stamp,
    samples: &Samples,
    surface_w: usize,
    surface_h: usize,
    max: f32,
    min_opacity: f32,
) {
    canvas.clear();

    match samples {
        Samples::Points(points) => {
            for p in points {
                let opacity = (p.weight / max).max(min_opacity);
                canvas.draw_image(&stamp.image, p.x - stamp.extent, p.y - stamp.extent, opacity);
            }
        }
        Samples::Grid(grid) => {
            for (i, &cell) in grid.cells.iter().enumerate() {
                if cell <= 0.0 {
                    continue;
                }
                let row = i / grid.w;
                let col = i % grid.w;
                let px = (col as f32 + 0.5) / grid.w as f32 * surface_w as f32;
                let py = (row as f32 + 0.5) / grid.h as f32 * surface_h as f32;
                let opacity = (cell / max).max(min_opacity);
                canvas.draw_image(&stamp.image, px - stamp.extent, py - stamp.extent, opacity);
            }
        }
    }
}

/// Replace each pixel's RGB with the gradient color for its accumulated
/// alpha, in place. Alpha 0 pixels are left entirely untouched so unstamped
/// background stays fully transparent; alpha itself is never rewritten, it
/// already carries the pixel's final opacity.
pub fn colorize(pixels: &mut [u8], lut: &GradientLut) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            continue;
        }
        let [r, g, b, _] = lut.entry(a);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::DEFAULT_GRADIENT;

    #[test]
    fn colorize_skips_transparent_pixels() {
        let lut = GradientLut::build(DEFAULT_GRADIENT);
        // One transparent pixel (with stale RGB garbage), one opaque pixel.
        let mut pixels = vec![9, 9, 9, 0, 0, 0, 0, 255];
        colorize(&mut pixels, &lut);
        assert_eq!(&pixels[..4], &[9, 9, 9, 0]); // untouched
        assert_eq!(&pixels[4..], &[255, 0, 0, 255]); // red, alpha kept
    }

    #[test]
    fn colorize_preserves_accumulated_alpha() {
        let lut = GradientLut::build(DEFAULT_GRADIENT);
        let mut pixels = vec![0, 0, 0, 77];
        colorize(&mut pixels, &lut);
        assert_eq!(pixels[3], 77);
        assert_eq!(&pixels[..3], &[0, 0, 255]); // below the 0.4 stop: blue
    }

    #[test]
    fn rasterize_clears_before_stamping() {
        let stamp = Stamp::build(2.0, 0.0);
        let samples = Samples::Points(Vec::new());
        let mut canvas = Canvas::new(8, 8);
        canvas.pixels_mut().fill(123);
        rasterize(&mut canvas, &stamp, &samples, 8, 8, 1.0, 0.05);
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn min_opacity_floors_faint_samples() {
        let stamp = Stamp::build(3.0, 0.0);
        let samples = Samples::Points(vec![crate::buffer::Sample {
            x: 10.0,
            y: 10.0,
            weight: 0.01,
        }]);
        let mut canvas = Canvas::new(20, 20);
        rasterize(&mut canvas, &stamp, &samples, 20, 20, 1.0, DEFAULT_MIN_OPACITY);
        // Footprint center composites at the 0.05 floor, not at 0.01.
        assert_eq!(canvas.alpha_at(10, 10), (0.05f32 * 255.0).round() as u8);
    }

    #[test]
    fn zero_min_opacity_gives_weight_proportional_alpha() {
        let stamp = Stamp::build(3.0, 0.0);
        let samples = Samples::Points(vec![crate::buffer::Sample {
            x: 10.0,
            y: 10.0,
            weight: 0.01,
        }]);
        let mut canvas = Canvas::new(20, 20);
        rasterize(&mut canvas, &stamp, &samples, 20, 20, 1.0, 0.0);
        assert_eq!(canvas.alpha_at(10, 10), (0.01f32 * 255.0).round() as u8);
    }
}
