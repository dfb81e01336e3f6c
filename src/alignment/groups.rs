use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::{Axis, Rect, union_bbox},
        error::LayoutResult,
        math::{f1_score, quantize, ratio_or},
    },
    matching::{
        assignment::{MatchThreshold, accepted_pairs, solve_assignment},
        iou::{PairMatrix, iou},
    },
};

/// Cost added to cross-kind group pairs so that equal-overlap ties resolve to same-kind pairs.
const KIND_TIE_BREAK: f64 = 1e-6;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Edge or center line an alignment group shares.
pub enum EdgeKind {
    /// Left edges.
    XLeft,
    /// Horizontal centers.
    XCenter,
    /// Right edges.
    XRight,
    /// Top edges.
    YTop,
    /// Vertical centers.
    YCenter,
    /// Bottom edges.
    YBottom,
}

impl EdgeKind {
    /// Every kind, x-axis first.
    pub const ALL: [EdgeKind; 6] = [
        Self::XLeft,
        Self::XCenter,
        Self::XRight,
        Self::YTop,
        Self::YCenter,
        Self::YBottom,
    ];

    /// Stable label (`"x_left"`, `"y_center"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::XLeft => "x_left",
            Self::XCenter => "x_center",
            Self::XRight => "x_right",
            Self::YTop => "y_top",
            Self::YCenter => "y_center",
            Self::YBottom => "y_bottom",
        }
    }

    /// Axis the line runs across.
    pub fn axis(self) -> Axis {
        match self {
            Self::XLeft | Self::XCenter | Self::XRight => Axis::X,
            Self::YTop | Self::YCenter | Self::YBottom => Axis::Y,
        }
    }

    /// Coordinate of this line for `rect`.
    pub fn value(self, rect: Rect) -> f64 {
        match self {
            Self::XLeft => rect.x0,
            Self::XCenter => (rect.x0 + rect.x1) * 0.5,
            Self::XRight => rect.x1,
            Self::YTop => rect.y0,
            Self::YCenter => (rect.y0 + rect.y1) * 0.5,
            Self::YBottom => rect.y1,
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Options for alignment-group detection.
pub struct GroupConfig {
    /// Quantization step for edge coordinates (normalized units).
    pub tolerance: f64,
    /// Groups with fewer members are discarded.
    pub min_group_size: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.02,
            min_group_size: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Elements sharing one quantized edge or center line.
pub struct AlignmentGroup {
    /// Shared line kind.
    pub kind: EdgeKind,
    /// Quantized coordinate bucket.
    pub bucket: i64,
    /// Union bounding box of the members.
    pub bbox: Rect,
    /// Indices into the input rect sequence.
    pub members: Vec<usize>,
}

/// Bucket rects by quantized edge/center coordinates and keep groups of at least
/// `min_group_size` members.
///
/// Groups come out ordered by kind, then bucket.
pub fn detect_groups(rects: &[Rect], cfg: &GroupConfig) -> Vec<AlignmentGroup> {
    if !(cfg.tolerance > 0.0) {
        tracing::warn!(tolerance = cfg.tolerance, "non-positive group tolerance");
        return Vec::new();
    }

    let mut buckets: BTreeMap<(EdgeKind, i64), Vec<usize>> = BTreeMap::new();
    for (idx, rect) in rects.iter().enumerate() {
        for kind in EdgeKind::ALL {
            let bucket = quantize(kind.value(*rect), cfg.tolerance);
            buckets.entry((kind, bucket)).or_default().push(idx);
        }
    }

    let min_size = cfg.min_group_size.max(1);
    let groups: Vec<AlignmentGroup> = buckets
        .into_iter()
        .filter(|(_, members)| members.len() >= min_size)
        .filter_map(|((kind, bucket), members)| {
            let bbox = union_bbox(members.iter().map(|&i| rects[i]))?;
            Some(AlignmentGroup {
                kind,
                bucket,
                bbox,
                members,
            })
        })
        .collect();
    tracing::debug!(
        rects = rects.len(),
        groups = groups.len(),
        "detected alignment groups"
    );
    groups
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One matched pair of GT/GEN groups.
pub struct GroupPair {
    /// Index into the GT groups.
    pub gt_index: usize,
    /// Index into the GEN groups.
    pub gen_index: usize,
    /// GT group kind.
    pub gt_kind: EdgeKind,
    /// GEN group kind.
    pub gen_kind: EdgeKind,
    /// IoU of the two union boxes.
    pub iou: f64,
    /// Whether both groups share the same kind.
    pub agrees: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Outcome of matching GT alignment groups against GEN alignment groups.
pub struct GroupMatchReport {
    /// `correct / |GEN groups|`, 1.0 when there are no GEN groups.
    pub precision: f64,
    /// `correct / |GT groups|`, 1.0 when there are no GT groups.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Number of GT groups.
    pub num_gt_groups: usize,
    /// Number of GEN groups.
    pub num_gen_groups: usize,
    /// Number of overlapping assigned pairs.
    pub num_matched: usize,
    /// Matched pairs whose kinds agree.
    pub num_correct: usize,
    /// Every matched pair.
    pub pairs: Vec<GroupPair>,
}

/// Match groups by union-box overlap and count the pairs whose kinds agree.
pub fn compare_groups(
    gt: &[AlignmentGroup],
    generated: &[AlignmentGroup],
) -> LayoutResult<GroupMatchReport> {
    let overlaps = PairMatrix::from_fn(gt.len(), generated.len(), |i, j| {
        iou(gt[i].bbox, generated[j].bbox)
    });
    let mut costs = overlaps.to_costs();
    costs.add(|i, j| {
        if gt[i].kind == generated[j].kind {
            0.0
        } else {
            KIND_TIE_BREAK
        }
    });
    let assignment = solve_assignment(&costs)?;

    let pairs: Vec<GroupPair> = accepted_pairs(&overlaps, &assignment, MatchThreshold::AnyOverlap)
        .into_iter()
        .map(|p| {
            let gt_kind = gt[p.gt_index].kind;
            let gen_kind = generated[p.gen_index].kind;
            GroupPair {
                gt_index: p.gt_index,
                gen_index: p.gen_index,
                gt_kind,
                gen_kind,
                iou: p.iou,
                agrees: gt_kind == gen_kind,
            }
        })
        .collect();

    let num_correct = pairs.iter().filter(|p| p.agrees).count();
    let precision = ratio_or(num_correct, generated.len(), 1.0);
    let recall = ratio_or(num_correct, gt.len(), 1.0);
    Ok(GroupMatchReport {
        precision,
        recall,
        f1: f1_score(precision, recall),
        num_gt_groups: gt.len(),
        num_gen_groups: generated.len(),
        num_matched: pairs.len(),
        num_correct,
        pairs,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/alignment/groups.rs"]
mod tests;
