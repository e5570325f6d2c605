//! N-dimensional summed-area tables for O(1) windowed aggregates.
//!
//! The table is padded with one zero layer on the low side of every axis, so
//! the cell at padded index `p` holds the sum of all source elements with
//! multi-index elementwise `< p`. Windows touching the source boundary then
//! need no special casing: their low corners land on the zero layer.
//!
//! Construction runs an in-place cumulative sum along each axis in turn,
//! which is the axis-factored form of the inclusion-exclusion recurrence.
//! Lanes of the axis being scanned are independent, so with the `rayon`
//! feature they are processed in parallel, one axis at a time.

use ndarray::{ArrayD, ArrayViewD, ArrayViewMut1, Axis, IxDyn, Slice};

#[cfg(feature = "rayon")]
use ndarray::parallel::prelude::*;

/// Padded prefix-sum table over a source array or its elementwise square.
///
/// Valid for the lifetime of one matching call; it depends on the source
/// values only, but its query stencil depends on the template extents.
pub struct IntegralTable {
    flat: Vec<f64>,
    strides: Vec<usize>,
}

/// Precomputed corner offsets and signs for windows of one fixed shape.
///
/// For each of the `2^rank` corners of a window the stencil stores the
/// linear offset from the window's low corner in the padded table together
/// with the inclusion-exclusion sign, so a windowed sum is a plain
/// sum of `2^rank` signed lookups.
pub struct WindowStencil {
    terms: Vec<(usize, f64)>,
}

impl IntegralTable {
    /// Builds the prefix-sum table of the source values.
    pub fn build(source: ArrayViewD<'_, f64>) -> Self {
        Self::build_with(source, |v| v)
    }

    /// Builds the prefix-sum table of the squared source values.
    pub fn build_squared(source: ArrayViewD<'_, f64>) -> Self {
        Self::build_with(source, |v| v * v)
    }

    fn build_with(source: ArrayViewD<'_, f64>, map: impl Fn(f64) -> f64) -> Self {
        let rank = source.ndim();
        let padded: Vec<usize> = source.shape().iter().map(|&e| e + 1).collect();
        let mut data = ArrayD::<f64>::zeros(IxDyn(&padded));

        {
            let mut interior = data.view_mut();
            for axis in 0..rank {
                interior.slice_axis_inplace(Axis(axis), Slice::from(1..));
            }
            interior.zip_mut_with(&source, |cell, &value| *cell = map(value));
        }

        for axis in 0..rank {
            scan_axis(&mut data, axis);
        }

        let strides = row_major_strides(&padded);
        let flat = data.into_raw_vec_and_offset().0;
        Self { flat, strides }
    }

    /// Precomputes the corner stencil for windows with the given extents.
    pub fn stencil(&self, window: &[usize]) -> WindowStencil {
        let rank = window.len();
        debug_assert_eq!(rank, self.strides.len());

        let corners: u128 = 1 << rank;
        let mut terms = Vec::with_capacity(corners as usize);
        for mask in 0..corners {
            let mask = mask as u64;
            let mut offset = 0usize;
            for (axis, &extent) in window.iter().enumerate() {
                if mask >> axis & 1 == 1 {
                    offset += extent * self.strides[axis];
                }
            }
            let low_picks = rank - mask.count_ones() as usize;
            let sign = if low_picks % 2 == 0 { 1.0 } else { -1.0 };
            terms.push((offset, sign));
        }
        WindowStencil { terms }
    }

    /// Sum over the window whose low corner sits at `start` in source
    /// coordinates. O(2^rank), independent of the window extents.
    #[inline]
    pub fn window_sum(&self, stencil: &WindowStencil, start: &[usize]) -> f64 {
        let mut base = 0usize;
        for (axis, &coord) in start.iter().enumerate() {
            base += coord * self.strides[axis];
        }
        let mut acc = 0.0;
        for &(offset, sign) in &stencil.terms {
            acc += sign * self.flat[base + offset];
        }
        acc
    }
}

fn scan_axis(data: &mut ArrayD<f64>, axis: usize) {
    #[cfg(feature = "rayon")]
    data.lanes_mut(Axis(axis))
        .into_par_iter()
        .for_each(cumsum_lane);

    #[cfg(not(feature = "rayon"))]
    for lane in data.lanes_mut(Axis(axis)) {
        cumsum_lane(lane);
    }
}

fn cumsum_lane(mut lane: ArrayViewMut1<'_, f64>) {
    let mut acc = 0.0;
    for value in lane.iter_mut() {
        acc += *value;
        *value = acc;
    }
}

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}
