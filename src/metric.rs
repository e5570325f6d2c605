//! Similarity metrics and the per-position score formulas.
//!
//! Each metric is a pure function of the windowed source aggregates, the
//! cross term, and the template constants. The variant is resolved once per
//! call; no per-position dispatch beyond the final `match`.

use crate::template::TemplatePlan;

/// Tolerance below which a denominator radicand counts as degenerate.
///
/// Guards both true zero-variance windows and small negative radicands
/// produced by floating-point cancellation.
pub(crate) const DEGENERATE_EPS: f64 = 1e-12;

/// Similarity metric selecting one of the six score formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Sum of squared differences; lower is better.
    SquareDiff,
    /// Squared differences divided by the product of norms; lower is better.
    NormalizedSquareDiff,
    /// Plain product-sum between window and template; higher is better.
    CrossCorrelation,
    /// Product-sum divided by the product of norms; higher is better.
    NormalizedCrossCorrelation,
    /// Mean-centered product-sum; higher is better.
    CorrelationCoeff,
    /// Mean-centered product-sum over the centered norms; higher is better.
    NormalizedCorrelationCoeff,
}

/// Windowed aggregates feeding one score evaluation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WindowAggregates {
    /// Sum of source values in the window.
    pub sum: f64,
    /// Sum of squared source values in the window.
    pub sum_sq: f64,
    /// Product-sum between the window and the template.
    pub cross: f64,
}

impl Metric {
    /// Whether larger scores indicate better matches.
    pub fn higher_is_better(self) -> bool {
        !matches!(self, Metric::SquareDiff | Metric::NormalizedSquareDiff)
    }

    /// Sentinel substituted when a normalized denominator degenerates:
    /// `1.0` for the distance-like metric, `0.0` for the correlation-like
    /// ones. Plain metrics have no denominator and never degenerate.
    pub fn degenerate_score(self) -> f64 {
        match self {
            Metric::NormalizedSquareDiff => 1.0,
            _ => 0.0,
        }
    }

    pub(crate) fn needs_window_sum(self) -> bool {
        matches!(
            self,
            Metric::CorrelationCoeff | Metric::NormalizedCorrelationCoeff
        )
    }

    pub(crate) fn needs_window_sum_sq(self) -> bool {
        matches!(
            self,
            Metric::SquareDiff
                | Metric::NormalizedSquareDiff
                | Metric::NormalizedCrossCorrelation
                | Metric::NormalizedCorrelationCoeff
        )
    }

    /// Evaluates the score at one position.
    pub(crate) fn score(self, win: WindowAggregates, tpl: &TemplatePlan) -> f64 {
        match self {
            Metric::SquareDiff => win.sum_sq - 2.0 * win.cross + tpl.sum_sq(),
            Metric::NormalizedSquareDiff => {
                let radicand = win.sum_sq * tpl.sum_sq();
                if radicand <= DEGENERATE_EPS {
                    self.degenerate_score()
                } else {
                    (win.sum_sq - 2.0 * win.cross + tpl.sum_sq()) / radicand.sqrt()
                }
            }
            Metric::CrossCorrelation => win.cross,
            Metric::NormalizedCrossCorrelation => {
                let radicand = win.sum_sq * tpl.sum_sq();
                if radicand <= DEGENERATE_EPS {
                    self.degenerate_score()
                } else {
                    win.cross / radicand.sqrt()
                }
            }
            Metric::CorrelationCoeff => {
                let mean_s = win.sum / tpl.len_f();
                win.cross - tpl.len_f() * mean_s * tpl.mean()
            }
            Metric::NormalizedCorrelationCoeff => {
                let len = tpl.len_f();
                let mean_s = win.sum / len;
                let centered_win = win.sum_sq - len * mean_s * mean_s;
                if centered_win <= DEGENERATE_EPS || tpl.centered_sum_sq() <= DEGENERATE_EPS {
                    self.degenerate_score()
                } else {
                    let numerator = win.cross - len * mean_s * tpl.mean();
                    numerator / (centered_win.sqrt() * tpl.centered_sum_sq().sqrt())
                }
            }
        }
    }
}
