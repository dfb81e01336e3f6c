use std::collections::BTreeMap;

use crate::{
    foundation::math::{f1_score, ratio_or},
    model::element::Element,
};

const TEXT_TYPE: &str = "TEXT";

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// How much of the GT text content reappears in the GEN layout.
pub struct TextCoverage {
    /// `correct / |GEN texts|`.
    pub precision: f64,
    /// `correct / |GT texts|`.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Normalized GT text occurrences.
    pub num_gt_texts: usize,
    /// Normalized GEN text occurrences.
    pub num_gen_texts: usize,
    /// Sum over distinct texts of `min(gt_count, gen_count)`.
    pub num_correct: usize,
}

/// Lowercase, drop punctuation, and collapse whitespace runs.
pub fn normalize_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Occurrence count of each normalized, non-empty `TEXT` content.
pub fn text_frequencies(elements: &[Element]) -> BTreeMap<String, usize> {
    let mut freq = BTreeMap::new();
    for e in elements.iter().filter(|e| e.node_type == TEXT_TYPE) {
        let Some(chars) = e.characters.as_deref() else {
            continue;
        };
        let norm = normalize_text(chars);
        if !norm.is_empty() {
            *freq.entry(norm).or_insert(0) += 1;
        }
    }
    freq
}

/// Compare text multisets of two layouts.
///
/// Without GT text, recall is 1.0 and precision/F1 are 1.0 only if GEN has no text either.
pub fn text_coverage(gt: &[Element], generated: &[Element]) -> TextCoverage {
    let gt_freq = text_frequencies(gt);
    let gen_freq = text_frequencies(generated);
    let num_gt_texts: usize = gt_freq.values().sum();
    let num_gen_texts: usize = gen_freq.values().sum();

    if gt_freq.is_empty() {
        let score = if gen_freq.is_empty() { 1.0 } else { 0.0 };
        return TextCoverage {
            precision: score,
            recall: 1.0,
            f1: score,
            num_gt_texts,
            num_gen_texts,
            num_correct: 0,
        };
    }

    let num_correct: usize = gt_freq
        .iter()
        .map(|(text, &n)| n.min(gen_freq.get(text).copied().unwrap_or(0)))
        .sum();
    let precision = ratio_or(num_correct, num_gen_texts, 0.0);
    let recall = ratio_or(num_correct, num_gt_texts, 0.0);
    TextCoverage {
        precision,
        recall,
        f1: f1_score(precision, recall),
        num_gt_texts,
        num_gen_texts,
        num_correct,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/text.rs"]
mod tests;
