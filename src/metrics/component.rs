use std::collections::BTreeSet;

use crate::{
    foundation::{core::Rect, error::LayoutResult, math::mean},
    matching::{
        assignment::{MatchThreshold, match_rects, solve_assignment},
        iou::PairMatrix,
    },
    metrics::layout::center_similarity,
    model::element::Element,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Weights and thresholds of component-level matching.
pub struct ComponentConfig {
    /// Weight of text dissimilarity in the text-block cost.
    pub text_weight: f64,
    /// Weight of center-distance dissimilarity in the text-block cost.
    pub position_weight: f64,
    /// Minimum IoU for a non-text pair to count as matched.
    pub min_block_iou: f64,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            text_weight: 0.5,
            position_weight: 0.5,
            min_block_iou: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Which matcher produced a [`ComponentPair`].
pub enum ComponentKind {
    /// Text blocks matched on content and position.
    Text,
    /// Other blocks matched on IoU.
    Block,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One matched GT/GEN element pair.
pub struct ComponentPair {
    /// Index into the GT element list.
    pub gt_index: usize,
    /// Index into the GEN element list.
    pub gen_index: usize,
    /// Matcher that produced the pair.
    pub kind: ComponentKind,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Component-level similarity between two element lists.
///
/// Text blocks and other blocks are matched separately; every score is computed over the
/// combined pairs.
pub struct ComponentReport {
    /// GT element count.
    pub num_gt: usize,
    /// GEN element count.
    pub num_gen: usize,
    /// Pairs produced by the text matcher.
    pub num_text_matches: usize,
    /// Pairs produced by the IoU matcher.
    pub num_block_matches: usize,
    /// `pairs / |GT|`, 0.0 for empty GT.
    pub block_match_score: f64,
    /// Mean fill-color similarity over pairs where both sides have a solid fill.
    pub color_similarity: f64,
    /// Mean `1 - L∞` center distance over all pairs.
    pub position_similarity: f64,
    /// Text pairs first, then block pairs, each ordered by GT index.
    pub pairs: Vec<ComponentPair>,
}

/// Content similarity of two strings after trimming.
///
/// 0.0 when either side is empty, 1.0 when they are equal ignoring case, otherwise the mean of
/// the length ratio and the Jaccard index of their lowercased character sets.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    if a == b {
        return 1.0;
    }

    let (la, lb) = (a.chars().count(), b.chars().count());
    let len_ratio = la.min(lb) as f64 / la.max(lb) as f64;
    let sa: BTreeSet<char> = a.chars().collect();
    let sb: BTreeSet<char> = b.chars().collect();
    let union = sa.union(&sb).count();
    let jaccard = if union == 0 {
        0.0
    } else {
        sa.intersection(&sb).count() as f64 / union as f64
    };
    (len_ratio + jaccard) / 2.0
}

/// Whether an element takes part in text matching: a `TEXT` node with non-blank content.
pub fn is_text_block(e: &Element) -> bool {
    e.node_type == "TEXT" && e.characters.as_deref().is_some_and(|c| !c.trim().is_empty())
}

/// Assign text blocks one-to-one, minimizing
/// `text_weight * (1 - text_similarity) + position_weight * (1 - center_similarity)`.
///
/// Every assigned pair is kept, so `min(|GT|, |GEN|)` pairs come out, ordered by GT index.
pub fn match_text_blocks(
    gt: &[&Element],
    generated: &[&Element],
    cfg: &ComponentConfig,
) -> LayoutResult<Vec<(usize, usize)>> {
    let text = |e: &Element| e.characters.clone().unwrap_or_default();
    let costs = PairMatrix::from_fn(gt.len(), generated.len(), |i, j| {
        let ts = text_similarity(&text(gt[i]), &text(generated[j]));
        let ps = center_similarity(gt[i].rect, generated[j].rect);
        cfg.text_weight * (1.0 - ts) + cfg.position_weight * (1.0 - ps)
    });
    solve_assignment(&costs)
}

/// Mean fill-color similarity over `pairs` whose elements both carry a solid fill.
///
/// 0.0 when no pair qualifies.
pub fn color_similarity(gt: &[Element], generated: &[Element], pairs: &[ComponentPair]) -> f64 {
    let scores: Vec<f64> = pairs
        .iter()
        .filter_map(|p| {
            let a = gt[p.gt_index].fill?;
            let b = generated[p.gen_index].fill?;
            Some(a.similarity(b))
        })
        .collect();
    mean(&scores).unwrap_or(0.0)
}

/// Match text blocks on content and position, everything else on IoU, and score the union.
///
/// Zero-area elements stay in the lists; they can pair as text blocks but never reach the IoU
/// threshold.
pub fn match_components(
    gt: &[Element],
    generated: &[Element],
    cfg: &ComponentConfig,
) -> LayoutResult<ComponentReport> {
    let (gt_text, gt_other) = split_text_blocks(gt);
    let (gen_text, gen_other) = split_text_blocks(generated);

    let mut pairs = Vec::new();
    if !gt_text.is_empty() && !gen_text.is_empty() {
        let gt_refs: Vec<&Element> = gt_text.iter().map(|&i| &gt[i]).collect();
        let gen_refs: Vec<&Element> = gen_text.iter().map(|&j| &generated[j]).collect();
        for (i, j) in match_text_blocks(&gt_refs, &gen_refs, cfg)? {
            pairs.push(ComponentPair {
                gt_index: gt_text[i],
                gen_index: gen_text[j],
                kind: ComponentKind::Text,
            });
        }
    }
    let num_text_matches = pairs.len();

    if !gt_other.is_empty() && !gen_other.is_empty() {
        let rects = |list: &[Element], idx: &[usize]| -> Vec<Rect> {
            idx.iter().map(|&i| list[i].rect).collect()
        };
        let matching = match_rects(
            &rects(gt, &gt_other),
            &rects(generated, &gen_other),
            MatchThreshold::AtLeast(cfg.min_block_iou),
        )?;
        pairs.extend(matching.pairs.iter().map(|p| ComponentPair {
            gt_index: gt_other[p.gt_index],
            gen_index: gen_other[p.gen_index],
            kind: ComponentKind::Block,
        }));
    }
    let num_block_matches = pairs.len() - num_text_matches;

    let block_match_score = if gt.is_empty() {
        0.0
    } else {
        pairs.len() as f64 / gt.len() as f64
    };
    let centers: Vec<f64> = pairs
        .iter()
        .map(|p| center_similarity(gt[p.gt_index].rect, generated[p.gen_index].rect))
        .collect();
    let report = ComponentReport {
        num_gt: gt.len(),
        num_gen: generated.len(),
        num_text_matches,
        num_block_matches,
        block_match_score,
        color_similarity: color_similarity(gt, generated, &pairs),
        position_similarity: mean(&centers).unwrap_or(0.0),
        pairs,
    };
    tracing::debug!(
        text = report.num_text_matches,
        blocks = report.num_block_matches,
        block_match = report.block_match_score,
        "matched components"
    );
    Ok(report)
}

fn split_text_blocks(elements: &[Element]) -> (Vec<usize>, Vec<usize>) {
    (0..elements.len()).partition(|&i| is_text_block(&elements[i]))
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/component.rs"]
mod tests;
