use crate::{
    foundation::core::is_well_formed,
    model::{element::Element, node::Node},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How an invisible (or fully transparent) node affects its descendants.
pub enum VisibilityMode {
    /// A hidden node hides its whole subtree.
    #[default]
    PruneSubtree,
    /// Only the hidden node itself is dropped; its children are still visited.
    NodeOnly,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Options controlling which nodes of a design tree become [`Element`]s.
pub struct FlattenConfig {
    /// Case-insensitive name substrings marking decorative subtrees, which are dropped whole.
    pub decorative_keywords: Vec<String>,
    /// Nodes deeper than this are not visited.
    pub max_depth: usize,
    /// Nodes with opacity strictly below this are treated as hidden.
    pub min_opacity: f64,
    /// Whether hiding a node also hides its descendants.
    pub visibility: VisibilityMode,
    /// Type tags whose own rect is not emitted; their children are still visited.
    pub excluded_types: Vec<String>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            decorative_keywords: vec!["freepik".to_string()],
            max_depth: 10,
            min_opacity: 0.01,
            visibility: VisibilityMode::PruneSubtree,
            excluded_types: Vec::new(),
        }
    }
}

impl FlattenConfig {
    /// Whether `name` contains any decorative keyword (case-insensitive).
    pub fn is_decorative(&self, name: &str) -> bool {
        if self.decorative_keywords.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        self.decorative_keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| name.contains(&k.to_lowercase()))
    }

    fn is_excluded_type(&self, node_type: &str) -> bool {
        self.excluded_types.iter().any(|t| t == node_type)
    }
}

/// Flatten one design tree into elements in pre-order.
pub fn flatten_tree(root: &Node, cfg: &FlattenConfig) -> Vec<Element> {
    flatten_forest([root], cfg)
}

/// Flatten several top-level trees into one element list.
///
/// Node ordinals keep counting across trees, so parent identities never collide.
pub fn flatten_forest<'a, I>(roots: I, cfg: &FlattenConfig) -> Vec<Element>
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut walker = Walker {
        cfg,
        out: Vec::new(),
        next_ordinal: 0,
    };
    for root in roots {
        walker.visit(root, 0, None);
    }
    tracing::debug!(elements = walker.out.len(), "flattened design tree");
    walker.out
}

struct Walker<'c> {
    cfg: &'c FlattenConfig,
    out: Vec<Element>,
    next_ordinal: usize,
}

impl Walker<'_> {
    fn visit(&mut self, node: &Node, depth: usize, parent: Option<usize>) {
        if depth > self.cfg.max_depth || self.cfg.is_decorative(node.display_name()) {
            return;
        }
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let hidden = node.is_hidden(self.cfg.min_opacity);
        if hidden && self.cfg.visibility == VisibilityMode::PruneSubtree {
            return;
        }

        if !hidden && !self.cfg.is_excluded_type(node.type_tag()) {
            if let Some(rect) = node.rect() {
                if is_well_formed(rect) {
                    self.out.push(Element {
                        ordinal,
                        parent,
                        id: node.id.clone(),
                        name: node.display_name().to_string(),
                        node_type: node.type_tag().to_string(),
                        rect,
                        depth,
                        characters: node.characters.clone(),
                        fill: node.solid_fill(),
                    });
                } else {
                    tracing::warn!(
                        id = node.id.as_deref().unwrap_or(""),
                        name = node.display_name(),
                        "skipping node with malformed geometry"
                    );
                }
            }
        }

        for child in &node.children {
            self.visit(child, depth + 1, Some(ordinal));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flatten/tree.rs"]
mod tests;
