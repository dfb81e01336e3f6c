use crate::{
    foundation::{
        core::{Rect, union_bbox},
        error::LayoutResult,
        math::mean,
    },
    matching::assignment::{MatchThreshold, MatchedPair, match_rects},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Layout matching outcome between a GT and a GEN rect sequence.
///
/// Indices refer to the rect sequences passed to [`match_layouts`].
pub struct LayoutMatchReport {
    /// GT rect count.
    pub num_gt: usize,
    /// GEN rect count.
    pub num_gen: usize,
    /// Matched pair count.
    pub num_matched: usize,
    /// Mean IoU over matched pairs.
    pub mean_iou: f64,
    /// `matched / |GEN|` (1.0 for empty GEN).
    pub precision: f64,
    /// `matched / |GT|` (1.0 for empty GT).
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Mean `1 - L∞` distance between matched centers.
    pub position_similarity: f64,
    /// Matched pairs ordered by GT index.
    pub pairs: Vec<MatchedPair>,
    /// GT indices left without a partner.
    pub unmatched_gt: Vec<usize>,
    /// GEN indices left without a partner.
    pub unmatched_gen: Vec<usize>,
}

/// Match two rect sequences and summarize the result.
pub fn match_layouts(
    gt: &[Rect],
    generated: &[Rect],
    threshold: MatchThreshold,
) -> LayoutResult<LayoutMatchReport> {
    let matching = match_rects(gt, generated, threshold)?;
    Ok(LayoutMatchReport {
        num_gt: matching.num_gt,
        num_gen: matching.num_gen,
        num_matched: matching.num_matched(),
        mean_iou: matching.mean_iou(),
        precision: matching.precision(),
        recall: matching.recall(),
        f1: matching.f1(),
        position_similarity: position_similarity(gt, generated, &matching.pairs),
        unmatched_gt: matching.unmatched_gt(),
        unmatched_gen: matching.unmatched_gen(),
        pairs: matching.pairs,
    })
}

/// Mean over `pairs` of `1 - max(|dx|, |dy|)` between rect centers; 0.0 without pairs.
///
/// Meaningful on normalized coordinates, where the distance is a fraction of the frame.
pub fn position_similarity(gt: &[Rect], generated: &[Rect], pairs: &[MatchedPair]) -> f64 {
    let scores: Vec<f64> = pairs
        .iter()
        .map(|p| center_similarity(gt[p.gt_index], generated[p.gen_index]))
        .collect();
    mean(&scores).unwrap_or(0.0)
}

/// `1 - max(|dx|, |dy|)` between the centers of two rects.
pub fn center_similarity(a: Rect, b: Rect) -> f64 {
    let (a, b) = (a.center(), b.center());
    1.0 - (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// `min(num_gen / num_gt, 1)`, 0.0 when there is nothing in GT.
pub fn element_count_ratio(num_gt: usize, num_gen: usize) -> f64 {
    if num_gt == 0 {
        return 0.0;
    }
    (num_gen as f64 / num_gt as f64).min(1.0)
}

/// Summed GEN area over the GT canvas (union box of GT, area floored at 1), capped at 1.
///
/// Returns 0.0 when GT is empty.
pub fn canvas_fill_ratio(gt: &[Rect], generated: &[Rect]) -> f64 {
    let Some(canvas) = union_bbox(gt.iter().copied()) else {
        return 0.0;
    };
    let canvas_area = canvas.area().max(1.0);
    let gen_area: f64 = generated.iter().map(|r| r.area()).sum();
    (gen_area / canvas_area).min(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/layout.rs"]
mod tests;
