use indexmap::IndexMap;

use crate::foundation::{
    core::{Rect, Rgb8, rect_from_xywh},
    error::{LayoutError, LayoutResult},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Absolute position and size of a node, as exported by the design tool.
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BoundingBox {
    /// Corner-coordinate form of this box.
    pub fn to_rect(self) -> Rect {
        rect_from_xywh(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Unit-range color as exported by the design tool.
pub struct Color {
    /// Red in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    /// Green in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<f64>,
    /// Blue in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    /// Alpha in `[0, 1]`; not used by any metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One entry of a node's `fills` list.
pub struct Paint {
    /// Paint kind (`SOLID`, `GRADIENT_LINEAR`, `IMAGE`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub paint_type: Option<String>,
    /// Explicit visibility flag; absent means visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Color of solid paints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Paint {
    /// A visible solid paint with the given unit-range channels.
    pub fn solid(r: f64, g: f64, b: f64) -> Self {
        Self {
            paint_type: Some("SOLID".to_string()),
            visible: None,
            color: Some(Color {
                r: Some(r),
                g: Some(g),
                b: Some(b),
                a: Some(1.0),
            }),
        }
    }

    /// RGB of a visible `SOLID` paint whose color carries all three channels.
    pub fn solid_rgb(&self) -> Option<Rgb8> {
        if self.paint_type.as_deref() != Some("SOLID") || self.visible == Some(false) {
            return None;
        }
        let c = self.color?;
        Some(Rgb8::from_unit(c.r?, c.g?, c.b?))
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One node of a design tree.
///
/// Only the fields the comparison engine reads are modelled; everything else in the export is
/// ignored on deserialization.
pub struct Node {
    /// Stable node identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Type tag (`FRAME`, `TEXT`, `RECTANGLE`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Absolute geometry, when the node has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<BoundingBox>,
    /// Child nodes in paint order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// Explicit visibility flag; absent means visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Layer opacity in `[0, 1]`; absent means opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Text content of `TEXT` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    /// Fill paints, bottom to top.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
}

impl Node {
    /// Create a node with a type tag and display name and no geometry.
    pub fn new(node_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the node identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set absolute geometry.
    pub fn with_bbox(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.absolute_bounding_box = Some(BoundingBox {
            x,
            y,
            width,
            height,
        });
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Replace the children list.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Set the explicit visibility flag.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Set layer opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set text content.
    pub fn with_characters(mut self, characters: impl Into<String>) -> Self {
        self.characters = Some(characters.into());
        self
    }

    /// Append a fill paint.
    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.fills.push(paint);
        self
    }

    /// Color of the first visible solid fill, if any.
    pub fn solid_fill(&self) -> Option<Rgb8> {
        self.fills.iter().find_map(Paint::solid_rgb)
    }

    /// Type tag, or `""` when absent.
    pub fn type_tag(&self) -> &str {
        self.node_type.as_deref().unwrap_or("")
    }

    /// Display name, or `""` when absent.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Geometry as a rect, when present.
    pub fn rect(&self) -> Option<Rect> {
        self.absolute_bounding_box.map(BoundingBox::to_rect)
    }

    /// Whether the node itself is hidden (explicitly invisible or below `min_opacity`).
    pub fn is_hidden(&self, min_opacity: f64) -> bool {
        if self.visible == Some(false) {
            return true;
        }
        matches!(self.opacity, Some(o) if o < min_opacity)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Entry of the named-documents envelope.
pub struct DocumentEntry {
    /// Root node of this entry, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Node>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A design export in one of the two accepted envelope shapes.
pub enum DesignDocument {
    /// `{"document": {...}}`
    Single {
        /// Root node.
        document: Node,
    },
    /// `{"nodes": {"<key>": {"document": {...}}, ...}}`, keys kept in file order.
    Named {
        /// Named top-level documents.
        nodes: IndexMap<String, DocumentEntry>,
    },
}

impl DesignDocument {
    /// Wrap a single root node.
    pub fn single(root: Node) -> Self {
        Self::Single { document: root }
    }

    /// Parse a JSON export.
    pub fn from_json_str(s: &str) -> LayoutResult<Self> {
        serde_json::from_str(s).map_err(|e| LayoutError::serde(format!("design document: {e}")))
    }

    /// Parse a JSON export from bytes.
    pub fn from_json_slice(bytes: &[u8]) -> LayoutResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| LayoutError::serde(format!("design document: {e}")))
    }

    /// Parse a JSON export from a reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> LayoutResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| LayoutError::serde(format!("design document: {e}")))
    }

    /// All top-level documents in order. Named entries without a document are skipped.
    pub fn roots(&self) -> Vec<&Node> {
        match self {
            Self::Single { document } => vec![document],
            Self::Named { nodes } => nodes.values().filter_map(|e| e.document.as_ref()).collect(),
        }
    }

    /// The primary (first) top-level document.
    pub fn root(&self) -> LayoutResult<&Node> {
        self.roots()
            .into_iter()
            .next()
            .ok_or_else(|| LayoutError::structure("design document has no root node"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/node.rs"]
mod tests;
