// Gradient lookup table: 256 precomputed RGBA entries, indexed by the alpha
// byte the rasterizer accumulated. This is the table-lookup trick that keeps
// the colorize pass to one array read per pixel instead of a ramp evaluation.

/// RGB color for a gradient stop.
pub type Color = [u8; 3];

pub const BLUE: Color = [0, 0, 255];
pub const CYAN: Color = [0, 255, 255];
pub const LIME: Color = [0, 255, 0];
pub const YELLOW: Color = [255, 255, 0];
pub const RED: Color = [255, 0, 0];

/// Stops used when no gradient was configured.
/// Visual: cold blue for faint heat, through cyan/lime/yellow, red at full.
pub const DEFAULT_GRADIENT: &[(f32, Color)] = &[
    (0.4, BLUE),
    (0.6, CYAN),
    (0.7, LIME),
    (0.8, YELLOW),
    (1.0, RED),
];

/// 256-entry color ramp, one RGBA value per alpha byte.
pub struct GradientLut {
    table: [[u8; 4]; 256],
}

impl GradientLut {
    /// Evaluate the piecewise-linear ramp defined by `stops` across a
    /// 256-step axis, the same result a 1x256 linear-gradient fill plus
    /// readback would give: linear interpolation between adjacent stops,
    /// endpoint colors extended to the ends of the range.
    ///
    /// Stops are (position in [0, 1], color); order doesn't matter, they are
    /// sorted here. An empty stop set yields an all-zero (unusable) table
    /// rather than an error.
    pub fn build(stops: &[(f32, Color)]) -> Self {
        let mut table = [[0u8; 4]; 256];
        if stops.is_empty() {
            return Self { table };
        }

        let mut sorted: Vec<(f32, Color)> = stops.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (i, entry) in table.iter_mut().enumerate() {
            let t = i as f32 / 255.0;
            let [r, g, b] = ramp_color(&sorted, t);
            *entry = [r, g, b, 255];
        }
        Self { table }
    }

    /// Color for an accumulated alpha byte.
    #[inline]
    pub fn entry(&self, alpha: u8) -> [u8; 4] {
        self.table[alpha as usize]
    }
}

/// Piecewise-linear ramp evaluation over sorted stops.
fn ramp_color(sorted: &[(f32, Color)], t: f32) -> Color {
    let (first, last) = (sorted[0], sorted[sorted.len() - 1]);
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    // t lies strictly between two stops; find the bracketing pair.
    let hi = sorted.partition_point(|s| s.0 < t);
    let (p0, c0) = sorted[hi - 1];
    let (p1, c1) = sorted[hi];
    if p1 <= p0 {
        return c1; // coincident stops, take the later one
    }
    let u = (t - p0) / (p1 - p0);
    let mut out = [0u8; 3];
    for c in 0..3 {
        let v = c0[c] as f32 + (c1[c] as f32 - c0[c] as f32) * u;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
