use rayon::prelude::*;

use crate::{
    alignment::{
        grid::{GridComparison, compare_grid_alignment},
        groups::{GroupMatchReport, compare_groups, detect_groups},
    },
    config::EvalConfig,
    flatten::{frame::flatten_normalized, tree::flatten_forest},
    foundation::{
        core::Rect,
        error::{LayoutError, LayoutResult},
    },
    metrics::{
        component::{ComponentReport, match_components},
        layout::{LayoutMatchReport, canvas_fill_ratio, element_count_ratio, match_layouts},
        text::{TextCoverage, text_coverage},
    },
    model::{
        element::{Element, matchable_rects},
        node::DesignDocument,
    },
    structure::signature::{SignatureMode, TreeSimilarity, compare_trees},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Every layout metric for one GT/GEN pair.
pub struct EvaluationReport {
    /// Element matching on frame-normalized coordinates.
    pub layout: LayoutMatchReport,
    /// Text-aware component matching with block match, color and position scores.
    pub components: ComponentReport,
    /// `min(|GEN| / |GT|, 1)` over all flattened elements.
    pub element_count_ratio: f64,
    /// GEN area coverage of the GT canvas, absolute coordinates.
    pub canvas_fill_ratio: f64,
    /// Alignment-group matching on frame-normalized coordinates.
    pub alignment_groups: GroupMatchReport,
    /// Grid and sibling alignment, absolute coordinates.
    pub grid: GridComparison,
    /// Hierarchy similarity in the configured signature mode.
    pub hierarchy: TreeSimilarity,
    /// Hierarchy similarity on type tags only.
    pub hierarchy_type: TreeSimilarity,
    /// Text content coverage.
    pub text: TextCoverage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How [`evaluate_batch`] spreads pairs over threads.
pub struct BatchThreading {
    /// Evaluate on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for BatchThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
        }
    }
}

/// Evaluate a GEN document against a GT document.
///
/// Matching and group metrics run on elements normalized to each primary root's frame. Grid,
/// count and canvas metrics run on absolute elements of every top-level document.
#[tracing::instrument(skip(gt, generated, cfg))]
pub fn evaluate(
    gt: &DesignDocument,
    generated: &DesignDocument,
    cfg: &EvalConfig,
) -> LayoutResult<EvaluationReport> {
    cfg.validate()?;
    let gt_root = gt.root()?;
    let gen_root = generated.root()?;

    let gt_norm = flatten_normalized(gt_root, &cfg.flatten)?;
    let gen_norm = flatten_normalized(gen_root, &cfg.flatten)?;
    let gt_abs = flatten_forest(gt.roots(), &cfg.flatten);
    let gen_abs = flatten_forest(generated.roots(), &cfg.flatten);

    let gt_rects = matchable_rects(&gt_norm.elements);
    let gen_rects = matchable_rects(&gen_norm.elements);
    let layout = match_layouts(&gt_rects, &gen_rects, cfg.matching.threshold)?;
    let components = match_components(&gt_norm.elements, &gen_norm.elements, &cfg.components)?;

    let gt_groups = detect_groups(&gt_rects, &cfg.groups);
    let gen_groups = detect_groups(&gen_rects, &cfg.groups);
    let alignment_groups = compare_groups(&gt_groups, &gen_groups)?;

    let grid = compare_grid_alignment(&gt_abs, &gen_abs, &cfg.grid);

    let report = EvaluationReport {
        element_count_ratio: element_count_ratio(gt_abs.len(), gen_abs.len()),
        canvas_fill_ratio: canvas_fill_ratio(&rects(&gt_abs), &rects(&gen_abs)),
        hierarchy: compare_trees(gt_root, gen_root, cfg.signature_mode),
        hierarchy_type: compare_trees(gt_root, gen_root, SignatureMode::TypeOnly),
        text: text_coverage(&gt_norm.elements, &gen_norm.elements),
        layout,
        components,
        alignment_groups,
        grid,
    };
    tracing::debug!(
        mean_iou = report.layout.mean_iou,
        block_match = report.components.block_match_score,
        group_f1 = report.alignment_groups.f1,
        grid_gt = report.grid.gt_score,
        grid_gen = report.grid.gen_score,
        hierarchy = report.hierarchy.jaccard,
        "evaluation finished"
    );
    Ok(report)
}

fn rects(elements: &[Element]) -> Vec<Rect> {
    elements.iter().map(|e| e.rect).collect()
}

/// Evaluate independent pairs, in input order.
///
/// A failing pair yields an `Err` entry; the others still run. The outer error covers only
/// thread-pool setup.
pub fn evaluate_batch(
    pairs: &[(DesignDocument, DesignDocument)],
    cfg: &EvalConfig,
    threading: BatchThreading,
) -> LayoutResult<Vec<LayoutResult<EvaluationReport>>> {
    if !threading.parallel || pairs.len() <= 1 {
        return Ok(pairs
            .iter()
            .map(|(gt, generated)| evaluate(gt, generated, cfg))
            .collect());
    }

    let pool = build_thread_pool(threading.threads)?;
    let out = pool.install(|| {
        pairs
            .par_iter()
            .map(|(gt, generated)| evaluate(gt, generated, cfg))
            .collect::<Vec<_>>()
    });
    tracing::debug!(
        pairs = pairs.len(),
        failed = out.iter().filter(|r| r.is_err()).count(),
        "batch evaluated"
    );
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> LayoutResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LayoutError::config(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LayoutError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/evaluate.rs"]
mod tests;
