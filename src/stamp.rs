// Footprint stamp: the grayscale-alpha circle every sample is drawn with.
// Built once per (radius, blur) pair on a private offscreen Canvas and
// reused for every sample, so the per-sample cost is one image composite.

use crate::types::Canvas;

/// Radius used when no point style was configured (point mode).
pub const DEFAULT_RADIUS: f32 = 25.0;

/// Reusable footprint for one sample: a filled circle, optionally softened
/// by a box blur of the alpha channel. RGB stays black; only alpha matters,
/// since the colorize pass derives the final color from accumulated alpha.
pub struct Stamp {
    /// Placement half-size, radius + blur. Stamps are drawn with their
    /// top-left at (x - extent, y - extent) so the footprint is centered.
    pub extent: f32,
    /// Square alpha image, side = round(2 * extent).
    pub image: Canvas,
    radius: f32,
    blur: f32,
}

impl Stamp {
    /// Rasterize the footprint for `radius >= 0`, `blur >= 0`.
    pub fn build(radius: f32, blur: f32) -> Self {
        let extent = radius + blur;
        let side = (2.0 * extent).round() as usize;
        let mut image = Canvas::new(side, side);

        fill_circle_alpha(&mut image, radius);

        let blur_px = blur.round() as usize;
        if blur_px > 0 {
            box_blur_alpha(&mut image, blur_px);
        }

        Self {
            extent,
            image,
            radius,
            blur,
        }
    }

    /// True when the cached stamp was built for exactly this configuration.
    pub fn matches(&self, radius: f32, blur: f32) -> bool {
        self.radius == radius && self.blur == blur
    }
}

/// Fill a centered circle of `radius` into the alpha channel, opaque inside,
/// with a one-pixel coverage ramp at the rim so the hard edge doesn't stair-step.
fn fill_circle_alpha(image: &mut Canvas, radius: f32) {
    let w = image.width();
    let h = image.height();
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;

    let pixels = image.pixels_mut();
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            pixels[(y * w + x) * 4 + 3] = (coverage * 255.0).round() as u8;
        }
    }
}

/// Separable box blur of the alpha channel only: one horizontal pass into a
/// scratch row buffer, one vertical pass back. Edges are extended (clamped
/// indices) so the rim fades instead of darkening.
fn box_blur_alpha(image: &mut Canvas, radius: usize) {
    let w = image.width();
    let h = image.height();
    if w == 0 || h == 0 {
        return;
    }
    let r = radius as i64;
    let win = (2 * r + 1) as u32;

    let alpha_at = |px: &[u8], x: usize, y: usize| px[(y * w + x) * 4 + 3] as u32;

    // Pass 1: horizontal, into tmp (one u8 per pixel).
    let mut tmp = vec![0u8; w * h];
    {
        let pixels = image.pixels();
        for y in 0..h {
            // Prime the window [-r, r] with clamped indices.
            let mut sum = alpha_at(pixels, 0, y) * (r as u32 + 1);
            for x in 1..=r {
                sum += alpha_at(pixels, (x.min(w as i64 - 1)) as usize, y);
            }
            for x in 0..w as i64 {
                tmp[y * w + x as usize] = (sum / win) as u8;
                let left = (x - r).max(0) as usize;
                let right = (x + r + 1).min(w as i64 - 1) as usize;
                sum = sum + alpha_at(pixels, right, y) - alpha_at(pixels, left, y);
            }
        }
    }

    // Pass 2: vertical, from tmp back into the canvas alpha bytes.
    let pixels = image.pixels_mut();
    for x in 0..w {
        let mut sum = tmp[x] as u32 * (r as u32 + 1);
        for y in 1..=r {
            sum += tmp[(y.min(h as i64 - 1)) as usize * w + x] as u32;
        }
        for y in 0..h as i64 {
            pixels[(y as usize * w + x) * 4 + 3] = (sum / win) as u8;
            let top = (y - r).max(0) as usize;
            let bottom = (y + r + 1).min(h as i64 - 1) as usize;
            sum = sum + tmp[bottom * w + x] as u32 - tmp[top * w + x] as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_is_twice_radius_plus_blur() {
        for &(radius, blur) in &[(25.0, 0.0), (10.0, 5.0), (12.5, 0.0), (0.0, 0.0), (3.0, 7.0)] {
            let stamp = Stamp::build(radius, blur);
            let expect = (2.0 * (radius + blur)).round() as usize;
            assert_eq!(stamp.image.width(), expect);
            assert_eq!(stamp.image.height(), expect);
            assert_eq!(stamp.extent, radius + blur);
        }
    }

    #[test]
    fn hard_circle_is_opaque_inside_transparent_outside() {
        let stamp = Stamp::build(10.0, 0.0);
        // Center of the 20x20 image.
        assert_eq!(stamp.image.alpha_at(10, 10), 255);
        // Corner is well outside the circle.
        assert_eq!(stamp.image.alpha_at(0, 0), 0);
        // RGB stays black everywhere.
        assert!(
            stamp
                .image
                .pixels()
                .chunks_exact(4)
                .all(|px| px[0] == 0 && px[1] == 0 && px[2] == 0)
        );
    }

    #[test]
    fn blur_softens_the_rim() {
        let stamp = Stamp::build(10.0, 5.0);
        let side = stamp.image.width(); // 30
        let mid = side / 2;
        // Center still fully opaque: the blur window sits entirely inside the disc.
        assert_eq!(stamp.image.alpha_at(mid, mid), 255);
        // Just outside the unblurred circle there is now partial alpha.
        let ring = stamp.image.alpha_at(mid + 11, mid);
        assert!(ring > 0 && ring < 255, "ring alpha was {ring}");
        // And the falloff is monotone moving outward along the axis.
        let a1 = stamp.image.alpha_at(mid + 10, mid);
        let a2 = stamp.image.alpha_at(mid + 12, mid);
        assert!(a1 >= ring && ring >= a2);
    }

    #[test]
    fn zero_radius_builds_an_empty_stamp() {
        let stamp = Stamp::build(0.0, 0.0);
        assert_eq!(stamp.image.width(), 0);
        assert_eq!(stamp.image.pixels().len(), 0);
    }

    #[test]
    fn matches_tracks_the_built_configuration() {
        let stamp = Stamp::build(25.0, 2.0);
        assert!(stamp.matches(25.0, 2.0));
        assert!(!stamp.matches(25.0, 0.0));
        assert!(!stamp.matches(12.5, 2.0));
    }
}
