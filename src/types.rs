// The drawable surface the pipeline reads from and writes to.
// A Canvas is nothing but an RGBA byte buffer plus the three operations the
// renderer needs: clear, composite-an-image-with-global-opacity, and raw
// pixel access. Offscreen surfaces (stamp construction) are just more
// Canvas values, so no drawing state is ever shared between them.

/// Row-major RGBA pixel surface, 4 bytes per pixel.
#[derive(Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>, // length = width * height * 4
}

impl Canvas {
    /// Fresh, fully transparent surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read back the full RGBA buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// In-place access to the RGBA buffer (the colorize pass rewrites it).
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Reset every pixel to fully transparent black.
    /// Visual: the surface goes blank; only what gets stamped afterwards shows.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Composite `src` onto this surface with its top-left corner at (x, y),
    /// source-over, with every source alpha scaled by `opacity` in [0, 1].
    /// Parts of `src` falling outside the surface are clipped here, so
    /// callers may stamp at any coordinate, including off-canvas.
    ///
    /// Repeated stamps raise the destination alpha monotonically and
    /// saturate toward 255; the blend never overshoots.
    pub fn draw_image(&mut self, src: &Canvas, x: f32, y: f32, opacity: f32) {
        let ox = x.floor() as i64;
        let oy = y.floor() as i64;
        let opacity = opacity.clamp(0.0, 1.0);

        for sy in 0..src.height {
            let dy = oy + sy as i64;
            if dy < 0 || dy >= self.height as i64 {
                continue;
            }
            for sx in 0..src.width {
                let dx = ox + sx as i64;
                if dx < 0 || dx >= self.width as i64 {
                    continue;
                }

                let si = (sy * src.width + sx) * 4;
                let sa = src.pixels[si + 3] as f32 / 255.0 * opacity;
                if sa <= 0.0 {
                    continue;
                }

                let di = (dy as usize * self.width + dx as usize) * 4;
                let da = self.pixels[di + 3] as f32 / 255.0;

                // Source-over: out_a = sa + da * (1 - sa)
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    continue;
                }

                // Blend channels in premultiplied space, then un-premultiply.
                for c in 0..3 {
                    let sc = src.pixels[si + c] as f32;
                    let dc = self.pixels[di + c] as f32;
                    let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
                    self.pixels[di + c] = out.round().clamp(0.0, 255.0) as u8;
                }
                self.pixels[di + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    /// Alpha byte at (x, y). Panics off-canvas; readback helper.
    pub fn alpha_at(&self, x: usize, y: usize) -> u8 {
        self.pixels[(y * self.width + x) * 4 + 3]
    }

    /// RGBA bytes at (x, y). Panics off-canvas; readback helper.
    pub fn rgba_at(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}
