use crate::{
    flatten::tree::{FlattenConfig, flatten_tree},
    foundation::{
        core::{Rect, is_well_formed},
        error::{LayoutError, LayoutResult},
    },
    model::{element::Element, node::Node},
};

const CONTAINER_TYPES: [&str; 2] = ["FRAME", "CANVAS"];

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Elements normalized to a root frame, plus the frame itself (absolute coordinates).
pub struct NormalizedLayout {
    /// Elements with coordinates expressed as fractions of the frame.
    pub elements: Vec<Element>,
    /// Absolute rect used as the normalization basis.
    pub frame: Rect,
}

/// Locate the rect used as the normalization basis for a tree.
///
/// The first `FRAME`/`CANVAS` node with finite, non-negative geometry in pre-order wins, even when
/// it has zero size; otherwise the largest element of `elements` is used. Only a tree with no
/// geometry at all is a structure error.
pub fn find_root_frame(root: &Node, elements: &[Element]) -> LayoutResult<Rect> {
    if let Some(frame) = first_container_rect(root) {
        return Ok(frame);
    }
    elements
        .iter()
        .filter(|e| is_well_formed(e.rect))
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .map(|e| e.rect)
        .ok_or_else(|| {
            LayoutError::structure(format!(
                "no root frame or geometry found under '{}'",
                root.display_name()
            ))
        })
}

fn first_container_rect(node: &Node) -> Option<Rect> {
    if CONTAINER_TYPES.contains(&node.type_tag()) {
        if let Some(rect) = node.rect().filter(|r| is_well_formed(*r)) {
            return Some(rect);
        }
    }
    node.children.iter().find_map(first_container_rect)
}

/// Express every element relative to `frame`: `x' = (x - frame.x) / frame.width`, etc.
///
/// A zero frame extent maps the corresponding coordinates to 0.
pub fn normalize_to_frame(elements: &[Element], frame: Rect) -> Vec<Element> {
    let fw = frame.width();
    let fh = frame.height();
    let scale = |v: f64, extent: f64| if extent > 0.0 { v / extent } else { 0.0 };
    elements
        .iter()
        .map(|e| {
            let x = scale(e.x() - frame.x0, fw);
            let y = scale(e.y() - frame.y0, fh);
            let w = scale(e.width(), fw);
            let h = scale(e.height(), fh);
            Element {
                rect: Rect::new(x, y, x + w, y + h),
                ..e.clone()
            }
        })
        .collect()
}

/// Flatten a tree and normalize it to its root frame.
pub fn flatten_normalized(root: &Node, cfg: &FlattenConfig) -> LayoutResult<NormalizedLayout> {
    let elements = flatten_tree(root, cfg);
    let frame = find_root_frame(root, &elements)?;
    tracing::debug!(
        frame_w = frame.width(),
        frame_h = frame.height(),
        "normalizing to root frame"
    );
    Ok(NormalizedLayout {
        elements: normalize_to_frame(&elements, frame),
        frame,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/flatten/frame.rs"]
mod tests;
