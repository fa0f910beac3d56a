// Software density heatmap: weighted 2D samples in, a colored RGBA raster out.
//
// Pipeline: each sample is stamped with a reusable circular footprint
// (optionally blurred) into the surface's alpha channel; overlapping
// footprints accumulate; the accumulated alpha is then mapped through a
// 256-entry color gradient to produce the final image.
//
// The crate is an embeddable component: the library has no window, no I/O
// and no threads; it borrows a `Canvas` only for the duration of a draw.
// `src/main.rs` ships an interactive demo on top of it.

pub mod buffer;
pub mod gradient;
pub mod heatmap;
pub mod render;
pub mod stamp;
pub mod types;

pub use buffer::{DensityGrid, Sample, Samples};
pub use gradient::{Color, DEFAULT_GRADIENT, GradientLut};
pub use heatmap::Heatmap;
pub use stamp::{DEFAULT_RADIUS, Stamp};
pub use types::Canvas;
