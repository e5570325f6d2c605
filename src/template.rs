//! Template statistics precomputation.

use ndarray::ArrayViewD;

use crate::shape::checked_len;
use crate::util::{MatchError, MatchResult};

/// Precomputed template-level constants shared by every result position.
///
/// Holds the template sum, sum of squares, mean, and the centered sum of
/// squares needed by the correlation-coefficient metrics. Computed once per
/// matching call.
#[derive(Debug)]
pub struct TemplatePlan {
    shape: Vec<usize>,
    len: usize,
    sum: f64,
    sum_sq: f64,
    mean: f64,
    centered_sum_sq: f64,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(template: ArrayViewD<'_, f64>) -> MatchResult<Self> {
        for (axis, &extent) in template.shape().iter().enumerate() {
            if extent == 0 {
                return Err(MatchError::ZeroExtent {
                    what: "template",
                    axis,
                });
            }
        }
        let len = checked_len(template.shape(), "template size")?;

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for &value in template.iter() {
            sum += value;
            sum_sq += value * value;
        }
        let mean = sum / len as f64;
        // Clamped against cancellation on near-constant templates.
        let centered_sum_sq = (sum_sq - len as f64 * mean * mean).max(0.0);

        Ok(Self {
            shape: template.shape().to_vec(),
            len,
            sum,
            sum_sq,
            mean,
            centered_sum_sq,
        })
    }

    /// Returns the template extents.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the template element count.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the template holds no elements; never the case for
    /// a successfully built plan.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the template element count as a float.
    pub(crate) fn len_f(&self) -> f64 {
        self.len as f64
    }

    /// Returns the sum of template values.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the sum of squared template values.
    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Returns the mean template value.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the centered sum of squares `Σ_T² − |T|·mean_T²`.
    pub fn centered_sum_sq(&self) -> f64 {
        self.centered_sum_sq
    }
}

#[cfg(test)]
mod tests {
    use super::TemplatePlan;
    use crate::util::MatchError;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn plan_statistics() {
        let template = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let plan = TemplatePlan::from_view(template.view()).unwrap();
        assert_eq!(plan.len(), 4);
        assert!((plan.sum() - 10.0).abs() < 1e-12);
        assert!((plan.sum_sq() - 30.0).abs() < 1e-12);
        assert!((plan.mean() - 2.5).abs() < 1e-12);
        assert!((plan.centered_sum_sq() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn constant_template_has_zero_centered_sum_sq() {
        let template = ArrayD::from_elem(IxDyn(&[3, 3]), 7.5);
        let plan = TemplatePlan::from_view(template.view()).unwrap();
        assert_eq!(plan.centered_sum_sq(), 0.0);
    }

    #[test]
    fn zero_extent_is_rejected() {
        let template = ArrayD::<f64>::zeros(IxDyn(&[2, 0]));
        let err = TemplatePlan::from_view(template.view()).unwrap_err();
        assert_eq!(
            err,
            MatchError::ZeroExtent {
                what: "template",
                axis: 1
            }
        );
    }
}
