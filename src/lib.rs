//! NdMatch is a CPU-first template matching library for n-dimensional
//! arrays.
//!
//! Given a source array and a smaller template, [`match_template`] scores
//! every fully-overlapping placement of the template under one of six
//! similarity metrics (plain and normalized variants of squared-difference,
//! cross-correlation, and correlation-coefficient). Windowed sums and sums
//! of squares come from padded summed-area tables in O(1) per placement;
//! the remaining cross term uses a sliding dot product, or the frequency
//! domain with the `fft` feature. Parallelism is available via the `rayon`
//! feature and span-level diagnostics via the `tracing` feature.
//!
//! Arrays are `ndarray` dynamic-dimension views; call `.view().into_dyn()`
//! on a fixed-dimension array to use it here.

mod engine;
pub mod metric;
mod shape;
pub mod table;
mod template;
mod trace;
pub mod util;
mod xcorr;

pub use engine::{match_template, match_template_into};
pub use metric::Metric;
pub use shape::{result_shape, MAX_RANK};
pub use table::{IntegralTable, WindowStencil};
pub use template::TemplatePlan;
pub use util::{MatchError, MatchResult};
