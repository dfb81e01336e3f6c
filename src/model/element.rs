use crate::foundation::core::{Point, Rect, Rgb8, has_positive_area};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A flattened, positioned element of a design tree.
///
/// Derived quantities (center, right, bottom) are computed from `rect` on demand.
pub struct Element {
    /// Pre-order index of the source node within its tree.
    pub ordinal: usize,
    /// Pre-order index of the source node's tree parent, if any.
    pub parent: Option<usize>,
    /// Source node identifier.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Type tag.
    pub node_type: String,
    /// Geometry, absolute or normalized to a root frame.
    pub rect: Rect,
    /// Tree depth of the source node (root is 0).
    pub depth: usize,
    /// Text content for `TEXT` nodes.
    pub characters: Option<String>,
    /// Color of the source node's first visible solid fill.
    pub fill: Option<Rgb8>,
}

impl Element {
    /// Left edge.
    pub fn x(&self) -> f64 {
        self.rect.x0
    }

    /// Top edge.
    pub fn y(&self) -> f64 {
        self.rect.y0
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.rect.x1
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.rect.y1
    }

    /// Center point.
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Area of the element's rect.
    pub fn area(&self) -> f64 {
        self.rect.area()
    }

    /// Whether this element takes part in matching-based metrics (finite, positive area).
    pub fn is_matchable(&self) -> bool {
        has_positive_area(self.rect)
    }
}

/// Rects of the elements that take part in matching, in order.
pub fn matchable_rects(elements: &[Element]) -> Vec<Rect> {
    elements
        .iter()
        .filter(|e| e.is_matchable())
        .map(|e| e.rect)
        .collect()
}
