//! Layout comparison engine for hierarchical design documents.
//!
//! A ground-truth (GT) design tree and a generated (GEN) one are flattened into positioned
//! elements and compared:
//!
//! - optimal one-to-one element matching under IoU ([`match_layouts`])
//! - emergent alignment groups from quantized edges ([`detect_groups`], [`compare_groups`])
//! - column/row band and sibling alignment scoring ([`analyze_grid`])
//! - path-signature hierarchy similarity ([`compare_trees`])
//! - text-aware component matching with color and position scores ([`match_components`])
//!
//! [`evaluate`] bundles everything for one pair and [`evaluate_batch`] runs many pairs.
//! Every operation is a pure function of its inputs and an explicit [`EvalConfig`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;

pub(crate) mod alignment;
pub(crate) mod flatten;
pub(crate) mod matching;
pub(crate) mod metrics;
pub(crate) mod model;
pub(crate) mod structure;

pub use crate::config::{EvalConfig, MatchConfig};
pub use crate::foundation::core::{
    Axis, Point, Rect, Rgb8, Size, has_positive_area, rect_from_xywh, union_bbox,
};
pub use crate::foundation::error::{LayoutError, LayoutResult};

pub use crate::alignment::grid::{
    AlignmentRule, ClusterKey, ClusterScore, GridComparison, GridConfig, GridReport,
    alignment_error, alignment_score, analyze_grid, band_alignment, compare_grid_alignment,
    local_alignment, overall_alignment_score, score_cluster,
};
pub use crate::alignment::groups::{
    AlignmentGroup, EdgeKind, GroupConfig, GroupMatchReport, GroupPair, compare_groups,
    detect_groups,
};
pub use crate::alignment::kmeans::{Clustering, KMeansConfig, kmeans_1d};
pub use crate::flatten::frame::{
    NormalizedLayout, find_root_frame, flatten_normalized, normalize_to_frame,
};
pub use crate::flatten::tree::{FlattenConfig, VisibilityMode, flatten_forest, flatten_tree};
pub use crate::matching::assignment::{
    MatchThreshold, MatchedPair, Matching, accepted_pairs, match_rects, solve_assignment,
};
pub use crate::matching::iou::{PairMatrix, iou};
pub use crate::metrics::component::{
    ComponentConfig, ComponentKind, ComponentPair, ComponentReport, color_similarity,
    is_text_block, match_components, match_text_blocks, text_similarity,
};
pub use crate::metrics::evaluate::{BatchThreading, EvaluationReport, evaluate, evaluate_batch};
pub use crate::metrics::layout::{
    LayoutMatchReport, canvas_fill_ratio, center_similarity, element_count_ratio, match_layouts,
    position_similarity,
};
pub use crate::metrics::text::{TextCoverage, normalize_text, text_coverage, text_frequencies};
pub use crate::model::element::{Element, matchable_rects};
pub use crate::model::node::{BoundingBox, Color, DesignDocument, DocumentEntry, Node, Paint};
pub use crate::structure::signature::{
    PathSet, SignatureMode, TreeSimilarity, compare_documents, compare_trees, jaccard, path_set,
};
