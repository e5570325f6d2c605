//! Cross-term evaluation: the product-sum between source windows and the
//! template at every valid placement.
//!
//! This is the one aggregate that cannot come from prefix sums, since it
//! depends on the template values and not just the window shape. Two
//! strategies are available:
//!
//! - a direct sliding dot product, O(result · template), always compiled;
//! - with the `fft` feature, frequency-domain evaluation at
//!   O(source · log source), used once the direct cost crosses a fixed
//!   threshold.
//!
//! The two paths agree only up to floating-point rounding, never
//! bit-for-bit; rounding order differs between direct summation and the
//! transform round trip.

use ndarray::{ArrayViewD, ArrayViewMutD, Zip};

/// Direct-cost threshold (result elements × template elements) above which
/// the FFT path takes over. Below it the plain loop wins on constant
/// overhead.
#[cfg(feature = "fft")]
const FFT_THRESHOLD: usize = 256 * 1024;

/// Writes `C(i) = Σ_j S[i+j]·T[j]` for every placement into `dest`.
///
/// `dest` must already have the result shape; the caller validates.
pub(crate) fn cross_terms_into(
    dest: ArrayViewMutD<'_, f64>,
    source: ArrayViewD<'_, f64>,
    template: ArrayViewD<'_, f64>,
) {
    #[cfg(feature = "fft")]
    {
        let direct_cost = dest.len().saturating_mul(template.len());
        if direct_cost > FFT_THRESHOLD {
            fft::cross_terms_into(dest, source, template);
            return;
        }
    }
    direct_into(dest, source, template);
}

fn direct_into(
    mut dest: ArrayViewMutD<'_, f64>,
    source: ArrayViewD<'_, f64>,
    template: ArrayViewD<'_, f64>,
) {
    let windows = source.windows(template.raw_dim());
    let zip = Zip::from(&mut dest).and(windows);
    let dot = |cell: &mut f64, window: ArrayViewD<'_, f64>| {
        let mut acc = 0.0f64;
        for (&s, &t) in window.iter().zip(template.iter()) {
            acc += s * t;
        }
        *cell = acc;
    };

    #[cfg(feature = "rayon")]
    zip.par_for_each(dot);

    #[cfg(not(feature = "rayon"))]
    zip.for_each(dot);
}

#[cfg(feature = "fft")]
mod fft {
    use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Axis, IxDyn, Slice};
    use rustfft::num_complex::Complex;
    use rustfft::{Fft, FftPlanner};

    /// Frequency-domain cross terms via full linear convolution with the
    /// axis-reversed template. Each axis is padded to the next power of two
    /// above `source + template - 1` and transformed lane by lane.
    pub(super) fn cross_terms_into(
        mut dest: ArrayViewMutD<'_, f64>,
        source: ArrayViewD<'_, f64>,
        template: ArrayViewD<'_, f64>,
    ) {
        let rank = source.ndim();
        let padded: Vec<usize> = source
            .shape()
            .iter()
            .zip(template.shape())
            .map(|(&s, &t)| (s + t - 1).next_power_of_two())
            .collect();

        let mut src_spec = embed(source.view(), &padded);
        let mut reversed = template.view();
        for axis in 0..rank {
            reversed.invert_axis(Axis(axis));
        }
        let mut tpl_spec = embed(reversed, &padded);

        let mut planner = FftPlanner::new();
        for axis in 0..rank {
            let fft = planner.plan_fft_forward(padded[axis]);
            transform_axis(&mut src_spec, axis, fft.as_ref());
            transform_axis(&mut tpl_spec, axis, fft.as_ref());
        }

        src_spec.zip_mut_with(&tpl_spec, |a, &b| *a *= b);

        for axis in 0..rank {
            let ifft = planner.plan_fft_inverse(padded[axis]);
            transform_axis(&mut src_spec, axis, ifft.as_ref());
        }

        // rustfft leaves the round trip unnormalized.
        let norm = 1.0 / padded.iter().map(|&l| l as f64).product::<f64>();

        // The linear convolution holds C(i) at offset template - 1 per axis.
        let mut valid = src_spec.view();
        for (axis, &t) in template.shape().iter().enumerate() {
            let start = (t - 1) as isize;
            let end = start + dest.shape()[axis] as isize;
            valid.slice_axis_inplace(Axis(axis), Slice::from(start..end));
        }
        dest.zip_mut_with(&valid, |d, c| *d = c.re * norm);
    }

    fn embed(values: ArrayViewD<'_, f64>, padded: &[usize]) -> ArrayD<Complex<f64>> {
        let mut out = ArrayD::<Complex<f64>>::zeros(IxDyn(padded));
        {
            let mut corner = out.view_mut();
            for (axis, &extent) in values.shape().iter().enumerate() {
                corner.slice_axis_inplace(Axis(axis), Slice::from(..extent));
            }
            corner.zip_mut_with(&values, |c, &v| *c = Complex::new(v, 0.0));
        }
        out
    }

    fn transform_axis(data: &mut ArrayD<Complex<f64>>, axis: usize, fft: &dyn Fft<f64>) {
        let mut scratch = vec![Complex::default(); fft.get_inplace_scratch_len()];
        let mut lane_buf = vec![Complex::default(); fft.len()];
        for mut lane in data.lanes_mut(Axis(axis)) {
            if let Some(slice) = lane.as_slice_mut() {
                fft.process_with_scratch(slice, &mut scratch);
            } else {
                for (buf, &v) in lane_buf.iter_mut().zip(lane.iter()) {
                    *buf = v;
                }
                fft.process_with_scratch(&mut lane_buf, &mut scratch);
                for (cell, &buf) in lane.iter_mut().zip(lane_buf.iter()) {
                    *cell = buf;
                }
            }
        }
    }
}
