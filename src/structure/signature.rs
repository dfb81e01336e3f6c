use std::collections::BTreeSet;

use crate::{
    foundation::error::LayoutResult,
    model::node::{DesignDocument, Node},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a node contributes to its path segment.
pub enum SignatureMode {
    /// `name:TYPE`, with the name trimmed and lowercased.
    #[default]
    NameAndType,
    /// `TYPE` alone.
    TypeOnly,
}

/// Set of root-to-node path strings of a tree.
pub type PathSet = BTreeSet<String>;

const UNKNOWN: &str = "unknown";

fn segment(node: &Node, mode: SignatureMode) -> String {
    let ty = node.node_type.as_deref().unwrap_or(UNKNOWN);
    match mode {
        SignatureMode::TypeOnly => ty.to_owned(),
        SignatureMode::NameAndType => {
            let name = node
                .name
                .as_deref()
                .map(|n| n.trim().to_lowercase())
                .unwrap_or_else(|| UNKNOWN.to_owned());
            format!("{name}:{ty}")
        }
    }
}

/// Collect the path signature of every node under `root`.
///
/// Siblings with identical signatures collapse into one entry.
pub fn path_set(root: &Node, mode: SignatureMode) -> PathSet {
    let mut out = PathSet::new();
    let mut stack: Vec<(&Node, String)> = vec![(root, String::new())];
    while let Some((node, prefix)) = stack.pop() {
        let path = format!("{prefix}/{}", segment(node, mode));
        for child in node.children.iter().rev() {
            stack.push((child, path.clone()));
        }
        out.insert(path);
    }
    out
}

/// `|a ∩ b| / |a ∪ b|`, or 1.0 when both sets are empty.
pub fn jaccard(a: &PathSet, b: &PathSet) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Structural overlap of two trees.
pub struct TreeSimilarity {
    /// Signature mode used.
    pub mode: SignatureMode,
    /// Distinct paths in the GT tree.
    pub gt_node_count: usize,
    /// Distinct paths in the GEN tree.
    pub gen_node_count: usize,
    /// Shared paths.
    pub intersection: usize,
    /// Paths in either tree.
    pub union: usize,
    /// `intersection / union`.
    pub jaccard: f64,
    /// `1 - jaccard`.
    pub distance: f64,
}

/// Compare two trees by their path-signature sets.
pub fn compare_trees(gt: &Node, generated: &Node, mode: SignatureMode) -> TreeSimilarity {
    let gt_paths = path_set(gt, mode);
    let gen_paths = path_set(generated, mode);
    let intersection = gt_paths.intersection(&gen_paths).count();
    let union = gt_paths.len() + gen_paths.len() - intersection;
    let jaccard = jaccard(&gt_paths, &gen_paths);
    tracing::debug!(
        ?mode,
        gt = gt_paths.len(),
        generated = gen_paths.len(),
        jaccard,
        "tree signatures compared"
    );
    TreeSimilarity {
        mode,
        gt_node_count: gt_paths.len(),
        gen_node_count: gen_paths.len(),
        intersection,
        union,
        jaccard,
        distance: 1.0 - jaccard,
    }
}

/// Compare the primary roots of two documents.
///
/// Fails with a structure error when either document has no root.
pub fn compare_documents(
    gt: &DesignDocument,
    generated: &DesignDocument,
    mode: SignatureMode,
) -> LayoutResult<TreeSimilarity> {
    Ok(compare_trees(gt.root()?, generated.root()?, mode))
}

#[cfg(test)]
#[path = "../../tests/unit/structure/signature.rs"]
mod tests;
