use pathfinding::{kuhn_munkres::kuhn_munkres_min, matrix::Matrix};

use crate::{
    foundation::{
        core::Rect,
        error::{LayoutError, LayoutResult},
        math::{f1_score, mean, ratio_or},
    },
    matching::iou::PairMatrix,
};

/// Fixed-point scale for solver costs (nine decimal digits).
const COST_SCALE: f64 = 1e9;

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Minimum overlap for an assigned pair to be reported as matched.
pub enum MatchThreshold {
    /// Any positive overlap (`iou > 0`).
    #[default]
    AnyOverlap,
    /// `iou >= t`.
    AtLeast(f64),
}

impl MatchThreshold {
    /// Whether a pair with this overlap counts as matched. Zero overlap never does.
    pub fn accepts(self, iou: f64) -> bool {
        match self {
            Self::AnyOverlap => iou > 0.0,
            Self::AtLeast(t) => iou > 0.0 && iou >= t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// One matched `(gt, gen)` pair with its overlap.
pub struct MatchedPair {
    /// Index into the GT sequence.
    pub gt_index: usize,
    /// Index into the GEN sequence.
    pub gen_index: usize,
    /// IoU of the pair.
    pub iou: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Partial injective mapping between a GT and a GEN sequence.
pub struct Matching {
    /// Matched pairs, ordered by GT index.
    pub pairs: Vec<MatchedPair>,
    /// Size of the GT sequence.
    pub num_gt: usize,
    /// Size of the GEN sequence.
    pub num_gen: usize,
}

impl Matching {
    /// Number of matched pairs.
    pub fn num_matched(&self) -> usize {
        self.pairs.len()
    }

    /// `matched / |GEN|`, 1.0 when GEN is empty.
    pub fn precision(&self) -> f64 {
        ratio_or(self.pairs.len(), self.num_gen, 1.0)
    }

    /// `matched / |GT|`, 1.0 when GT is empty.
    pub fn recall(&self) -> f64 {
        ratio_or(self.pairs.len(), self.num_gt, 1.0)
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        f1_score(self.precision(), self.recall())
    }

    /// Mean IoU over matched pairs, 0.0 when nothing matched.
    pub fn mean_iou(&self) -> f64 {
        let ious: Vec<f64> = self.pairs.iter().map(|p| p.iou).collect();
        mean(&ious).unwrap_or(0.0)
    }

    /// GT indices without a partner.
    pub fn unmatched_gt(&self) -> Vec<usize> {
        unmatched(self.num_gt, self.pairs.iter().map(|p| p.gt_index))
    }

    /// GEN indices without a partner.
    pub fn unmatched_gen(&self) -> Vec<usize> {
        unmatched(self.num_gen, self.pairs.iter().map(|p| p.gen_index))
    }
}

fn unmatched(len: usize, used: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut taken = vec![false; len];
    for i in used {
        taken[i] = true;
    }
    (0..len).filter(|&i| !taken[i]).collect()
}

/// Solve the rectangular assignment problem, minimizing total cost.
///
/// Returns `min(rows, cols)` `(row, col)` pairs sorted by row. The solver is deterministic for a
/// given matrix and runs in O(n³) on the larger dimension.
pub fn solve_assignment(costs: &PairMatrix) -> LayoutResult<Vec<(usize, usize)>> {
    if costs.is_empty() {
        return Ok(Vec::new());
    }
    let (rows, cols) = (costs.rows(), costs.cols());
    tracing::trace!(rows, cols, "solving assignment");

    // The solver wants rows <= columns; transpose the taller case.
    let transposed = rows > cols;
    let (n, m) = if transposed { (cols, rows) } else { (rows, cols) };
    let mut fixed = Vec::with_capacity(n * m);
    for r in 0..n {
        for c in 0..m {
            let v = if transposed {
                costs.get(c, r)
            } else {
                costs.get(r, c)
            };
            fixed.push(to_fixed(v));
        }
    }
    let weights = Matrix::from_vec(n, m, fixed)
        .map_err(|e| LayoutError::matching(format!("cost matrix {n}x{m}: {e:?}")))?;
    let (_, assignment) = kuhn_munkres_min(&weights);

    let mut pairs: Vec<(usize, usize)> = assignment
        .into_iter()
        .enumerate()
        .map(|(r, c)| if transposed { (c, r) } else { (r, c) })
        .collect();
    pairs.sort_unstable();
    Ok(pairs)
}

fn to_fixed(cost: f64) -> i64 {
    let cost = if cost.is_finite() { cost.clamp(0.0, 4.0) } else { 4.0 };
    (cost * COST_SCALE).round() as i64
}

/// Keep the assigned pairs whose overlap passes `threshold`.
pub fn accepted_pairs(
    overlaps: &PairMatrix,
    assignment: &[(usize, usize)],
    threshold: MatchThreshold,
) -> Vec<MatchedPair> {
    assignment
        .iter()
        .filter_map(|&(i, j)| {
            let iou = overlaps.get(i, j);
            threshold.accepts(iou).then_some(MatchedPair {
                gt_index: i,
                gen_index: j,
                iou,
            })
        })
        .collect()
}

/// Maximum-overlap one-to-one matching between two rect sequences.
pub fn match_rects(
    gt: &[Rect],
    generated: &[Rect],
    threshold: MatchThreshold,
) -> LayoutResult<Matching> {
    let overlaps = PairMatrix::overlaps(gt, generated);
    let assignment = solve_assignment(&overlaps.to_costs())?;
    let pairs = accepted_pairs(&overlaps, &assignment, threshold);
    tracing::debug!(
        num_gt = gt.len(),
        num_gen = generated.len(),
        num_matched = pairs.len(),
        "matched rects"
    );
    Ok(Matching {
        pairs,
        num_gt: gt.len(),
        num_gen: generated.len(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/matching/assignment.rs"]
mod tests;
