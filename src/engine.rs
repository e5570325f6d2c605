//! Matching entry points: validation, aggregate construction, combination.

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Dimension, IxDyn};
#[cfg(feature = "rayon")]
use ndarray::Zip;

use crate::metric::{Metric, WindowAggregates};
use crate::shape;
use crate::table::IntegralTable;
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::util::MatchResult;
use crate::xcorr;

/// Matches `template` against every fully-overlapping window of `source`
/// and returns a freshly allocated score array.
///
/// The result extent on every axis is `source - template + 1`. Whether a
/// larger or smaller score is better depends on the metric; see
/// [`Metric::higher_is_better`].
///
/// ```
/// use ndarray::ArrayD;
/// use ndmatch::{match_template, Metric};
///
/// let source = ArrayD::from_shape_fn(vec![8, 8], |i| (i[0] * 8 + i[1]) as f64);
/// let template = ArrayD::from_shape_fn(vec![3, 3], |i| ((i[0] + 2) * 8 + i[1] + 4) as f64);
/// let scores = match_template(source.view(), template.view(), Metric::SquareDiff).unwrap();
/// assert_eq!(scores.shape(), &[6, 6]);
/// assert!(scores[[2, 4]].abs() < 1e-9);
/// ```
pub fn match_template(
    source: ArrayViewD<'_, f64>,
    template: ArrayViewD<'_, f64>,
    metric: Metric,
) -> MatchResult<ArrayD<f64>> {
    let result_shape = shape::result_shape(source.shape(), template.shape())?;
    shape::checked_len(&result_shape, "result size")?;
    let mut dest = ArrayD::zeros(IxDyn(&result_shape));
    run(dest.view_mut(), source, template, metric)?;
    Ok(dest)
}

/// In-place counterpart of [`match_template`] writing into a caller-owned
/// destination, which must be pre-sized to exactly the result shape.
///
/// Intended for repeated calls that reuse one allocation. Produces scores
/// elementwise identical to the allocating variant.
pub fn match_template_into(
    dest: &mut ArrayViewMutD<'_, f64>,
    source: ArrayViewD<'_, f64>,
    template: ArrayViewD<'_, f64>,
    metric: Metric,
) -> MatchResult<()> {
    let result_shape = shape::result_shape(source.shape(), template.shape())?;
    shape::validate_dest(dest.shape(), &result_shape)?;
    run(dest.view_mut(), source, template, metric)
}

fn run(
    mut dest: ArrayViewMutD<'_, f64>,
    source: ArrayViewD<'_, f64>,
    template: ArrayViewD<'_, f64>,
    metric: Metric,
) -> MatchResult<()> {
    let plan = TemplatePlan::from_view(template.view())?;

    {
        let _span = trace_span!("cross_terms", positions = dest.len()).entered();
        xcorr::cross_terms_into(dest.view_mut(), source.view(), template.view());
    }

    // For plain cross-correlation the cross term already is the score.
    if metric == Metric::CrossCorrelation {
        return Ok(());
    }

    let (sums, sum_sqs) = {
        let _span = trace_span!("aggregate_tables", elements = source.len()).entered();
        let sums = metric.needs_window_sum().then(|| {
            let table = IntegralTable::build(source.view());
            let stencil = table.stencil(plan.shape());
            (table, stencil)
        });
        let sum_sqs = metric.needs_window_sum_sq().then(|| {
            let table = IntegralTable::build_squared(source.view());
            let stencil = table.stencil(plan.shape());
            (table, stencil)
        });
        trace_event!(
            "tables_built",
            sum = sums.is_some(),
            sum_sq = sum_sqs.is_some()
        );
        (sums, sum_sqs)
    };

    let _span = trace_span!("combine", positions = dest.len()).entered();

    let combine = |idx: IxDyn, cell: &mut f64| {
        let start = idx.slice();
        let win = WindowAggregates {
            sum: sums
                .as_ref()
                .map_or(0.0, |(table, stencil)| table.window_sum(stencil, start)),
            sum_sq: sum_sqs
                .as_ref()
                .map_or(0.0, |(table, stencil)| table.window_sum(stencil, start)),
            cross: *cell,
        };
        *cell = metric.score(win, &plan);
    };

    // `Zip::indexed` requires `Dim: Copy`, which `IxDyn` does not implement,
    // so the indexed combine loop uses `indexed_iter_mut` (the equivalent that
    // works for dynamic dimensions). The parallel variant below preserves the
    // design's intent under the `rayon` feature.
    #[cfg(feature = "rayon")]
    Zip::indexed(&mut dest).par_for_each(combine);

    #[cfg(not(feature = "rayon"))]
    dest.indexed_iter_mut()
        .for_each(|(idx, cell)| combine(idx, cell));

    Ok(())
}
