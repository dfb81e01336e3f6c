use std::collections::BTreeMap;

use crate::{
    alignment::kmeans::{KMeansConfig, kmeans_1d},
    foundation::{
        core::Axis,
        math::{mean, median},
    },
    model::element::Element,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Alignment rule a cluster is tested against.
pub enum AlignmentRule {
    /// Shared minimum left edge.
    Left,
    /// Shared median center.
    Center,
    /// Shared maximum right edge.
    Right,
    /// Shared minimum top edge.
    Top,
    /// Shared maximum bottom edge.
    Bottom,
}

impl AlignmentRule {
    /// Candidate rules for an axis, in tie-breaking order.
    pub fn candidates(axis: Axis) -> [Self; 3] {
        match axis {
            Axis::X => [Self::Left, Self::Center, Self::Right],
            Axis::Y => [Self::Top, Self::Center, Self::Bottom],
        }
    }

    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Options for grid (band) and sibling alignment scoring.
pub struct GridConfig {
    /// Target number of column bands.
    pub col_clusters: usize,
    /// Target number of row bands.
    pub row_clusters: usize,
    /// Clusters with fewer members are skipped.
    pub min_elements: usize,
    /// Clusters with more members are skipped (whole-canvas degenerate bands).
    pub max_elements: usize,
    /// Clusters whose normalization base is at or below this are skipped.
    pub min_norm_base: f64,
    /// Added to the median extent before normalizing.
    pub norm_epsilon: f64,
    /// Ceiling for non-finite or huge normalized errors.
    pub error_ceiling: f64,
    /// Centroid-clustering options.
    pub kmeans: KMeansConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            col_clusters: 3,
            row_clusters: 5,
            min_elements: 1,
            max_elements: 200,
            min_norm_base: 1e-2,
            norm_epsilon: 1e-5,
            error_ceiling: 1e4,
            kmeans: KMeansConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
/// What a scored cluster groups by.
pub enum ClusterKey {
    /// A column or row band from centroid clustering.
    Band {
        /// Band label, ascending by centroid.
        index: usize,
    },
    /// Siblings sharing a tree depth and parent.
    Siblings {
        /// Tree depth.
        depth: usize,
        /// Parent node ordinal.
        parent: usize,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Best-fitting alignment rule of one cluster and its score.
pub struct ClusterScore {
    /// Cluster identity.
    pub key: ClusterKey,
    /// Axis the cluster was scored on.
    pub axis: Axis,
    /// Minimum-error rule.
    pub alignment_type: AlignmentRule,
    /// Mean absolute deviation from the rule's reference line.
    pub alignment_error: f64,
    /// Error divided by the cluster's median extent, clipped.
    pub normalized_error: f64,
    /// `1 / (1 + ln(1 + normalized_error))`.
    pub score: f64,
    /// Cluster size.
    pub num_elements: usize,
    /// Indices into the element sequence.
    pub members: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Grid and sibling alignment tables for one layout.
pub struct GridReport {
    /// Column bands scored on the x axis.
    pub col_alignment: Vec<ClusterScore>,
    /// Row bands scored on the y axis.
    pub row_alignment: Vec<ClusterScore>,
    /// Sibling groups scored on the x axis.
    pub local_col_alignment: Vec<ClusterScore>,
    /// Sibling groups scored on the y axis.
    pub local_row_alignment: Vec<ClusterScore>,
    /// Mean of the per-table mean scores over non-empty tables; 0.0 when all are empty.
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Grid alignment of a GT layout next to a generated one.
pub struct GridComparison {
    /// Overall GT score.
    pub gt_score: f64,
    /// Overall GEN score.
    pub gen_score: f64,
    /// `gt_score - gen_score`.
    pub difference: f64,
    /// GT tables.
    pub gt: GridReport,
    /// GEN tables.
    pub generated: GridReport,
}

/// Log-damped score for a normalized error: 1 at zero, decreasing toward 0.
pub fn alignment_score(normalized_error: f64) -> f64 {
    1.0 / (1.0 + normalized_error.ln_1p())
}

/// Mean absolute deviation of `members` from the reference line of `rule`.
///
/// The reference is the minimum start edge, the median center, or the maximum end edge.
pub fn alignment_error(members: &[&Element], axis: Axis, rule: AlignmentRule) -> f64 {
    let coord = |e: &Element| match (axis, rule) {
        (Axis::X, AlignmentRule::Left | AlignmentRule::Top) => e.x(),
        (Axis::Y, AlignmentRule::Left | AlignmentRule::Top) => e.y(),
        (Axis::X, AlignmentRule::Center) => e.center().x,
        (Axis::Y, AlignmentRule::Center) => e.center().y,
        (Axis::X, AlignmentRule::Right | AlignmentRule::Bottom) => e.right(),
        (Axis::Y, AlignmentRule::Right | AlignmentRule::Bottom) => e.bottom(),
    };
    let values: Vec<f64> = members.iter().map(|e| coord(e)).collect();
    let reference = match rule {
        AlignmentRule::Left | AlignmentRule::Top => {
            values.iter().copied().fold(f64::INFINITY, f64::min)
        }
        AlignmentRule::Center => median(&values).unwrap_or(0.0),
        AlignmentRule::Right | AlignmentRule::Bottom => {
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        }
    };
    let deviations: Vec<f64> = values.iter().map(|v| (v - reference).abs()).collect();
    mean(&deviations).unwrap_or(f64::INFINITY)
}

/// Score one cluster, or `None` when it falls outside the configured guards.
pub fn score_cluster(
    key: ClusterKey,
    members: Vec<usize>,
    elements: &[Element],
    axis: Axis,
    cfg: &GridConfig,
) -> Option<ClusterScore> {
    if members.is_empty() || members.len() < cfg.min_elements {
        return None;
    }
    let group: Vec<&Element> = members.iter().map(|&i| &elements[i]).collect();

    let mut best: Option<(AlignmentRule, f64)> = None;
    for rule in AlignmentRule::candidates(axis) {
        let err = alignment_error(&group, axis, rule);
        if best.is_none_or(|(_, b)| err < b) {
            best = Some((rule, err));
        }
    }
    let (alignment_type, alignment_error) = best?;

    let extents: Vec<f64> = group
        .iter()
        .map(|e| match axis {
            Axis::X => e.width(),
            Axis::Y => e.height(),
        })
        .collect();
    let norm_base = median(&extents)? + cfg.norm_epsilon;
    if norm_base <= cfg.min_norm_base || members.len() > cfg.max_elements {
        tracing::trace!(?key, norm_base, size = members.len(), "skipping cluster");
        return None;
    }

    let mut normalized_error = alignment_error / norm_base;
    if !normalized_error.is_finite() || normalized_error > cfg.error_ceiling {
        normalized_error = cfg.error_ceiling;
    }

    Some(ClusterScore {
        key,
        axis,
        alignment_type,
        alignment_error,
        normalized_error,
        score: alignment_score(normalized_error),
        num_elements: members.len(),
        members,
    })
}

/// Cluster element centers into `k` bands along `axis` and score each band.
pub fn band_alignment(
    elements: &[Element],
    axis: Axis,
    k: usize,
    cfg: &GridConfig,
) -> Vec<ClusterScore> {
    if elements.is_empty() {
        return Vec::new();
    }
    let centers: Vec<f64> = elements
        .iter()
        .map(|e| match axis {
            Axis::X => e.center().x,
            Axis::Y => e.center().y,
        })
        .collect();
    let clustering = kmeans_1d(&centers, k, &cfg.kmeans);

    let mut bands: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in clustering.labels.iter().enumerate() {
        bands.entry(label).or_default().push(idx);
    }
    bands
        .into_iter()
        .filter_map(|(index, members)| {
            score_cluster(ClusterKey::Band { index }, members, elements, axis, cfg)
        })
        .collect()
}

/// Group elements by `(depth, parent)` and score each sibling group along `axis`.
///
/// Elements without a tree parent are not part of any sibling group.
pub fn local_alignment(elements: &[Element], axis: Axis, cfg: &GridConfig) -> Vec<ClusterScore> {
    let mut groups: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (idx, e) in elements.iter().enumerate() {
        if let Some(parent) = e.parent {
            groups.entry((e.depth, parent)).or_default().push(idx);
        }
    }
    groups
        .into_iter()
        .filter_map(|((depth, parent), members)| {
            score_cluster(
                ClusterKey::Siblings { depth, parent },
                members,
                elements,
                axis,
                cfg,
            )
        })
        .collect()
}

/// Mean over non-empty tables of each table's mean score; 0.0 when every table is empty.
pub fn overall_alignment_score(tables: &[&[ClusterScore]]) -> f64 {
    let per_table: Vec<f64> = tables
        .iter()
        .filter_map(|t| {
            let scores: Vec<f64> = t.iter().map(|c| c.score).collect();
            mean(&scores)
        })
        .collect();
    mean(&per_table).unwrap_or(0.0)
}

/// Score column bands, row bands, and sibling groups on both axes.
pub fn analyze_grid(elements: &[Element], cfg: &GridConfig) -> GridReport {
    let n = elements.len();
    let k_col = cfg.col_clusters.min(n).max(1);
    let k_row = cfg.row_clusters.min(n).max(1);

    let col_alignment = band_alignment(elements, Axis::X, k_col, cfg);
    let row_alignment = band_alignment(elements, Axis::Y, k_row, cfg);
    let local_col_alignment = local_alignment(elements, Axis::X, cfg);
    let local_row_alignment = local_alignment(elements, Axis::Y, cfg);
    let score = overall_alignment_score(&[
        col_alignment.as_slice(),
        row_alignment.as_slice(),
        local_col_alignment.as_slice(),
        local_row_alignment.as_slice(),
    ]);
    tracing::debug!(
        elements = n,
        cols = col_alignment.len(),
        rows = row_alignment.len(),
        score,
        "grid alignment analyzed"
    );
    GridReport {
        col_alignment,
        row_alignment,
        local_col_alignment,
        local_row_alignment,
        score,
    }
}

/// Analyze both layouts and report the score difference.
pub fn compare_grid_alignment(
    gt: &[Element],
    generated: &[Element],
    cfg: &GridConfig,
) -> GridComparison {
    let gt = analyze_grid(gt, cfg);
    let generated = analyze_grid(generated, cfg);
    GridComparison {
        gt_score: gt.score,
        gen_score: generated.score,
        difference: gt.score - generated.score,
        gt,
        generated,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/alignment/grid.rs"]
mod tests;
