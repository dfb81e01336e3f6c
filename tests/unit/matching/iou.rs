use super::*;
use crate::foundation::core::rect_from_xywh;

#[test]
fn iou_is_symmetric_and_one_on_identity() {
    let a = rect_from_xywh(0.0, 0.0, 2.0, 2.0);
    let b = rect_from_xywh(1.0, 1.0, 2.0, 2.0);
    assert_eq!(iou(a, b), iou(b, a));
    assert!((iou(a, b) - 1.0 / 7.0).abs() < 1e-12);
    assert_eq!(iou(a, a), 1.0);
}

#[test]
fn iou_is_zero_for_disjoint_and_degenerate_rects() {
    let a = rect_from_xywh(0.0, 0.0, 1.0, 1.0);
    assert_eq!(iou(a, rect_from_xywh(5.0, 5.0, 1.0, 1.0)), 0.0);
    assert_eq!(iou(a, rect_from_xywh(0.0, 0.0, 0.0, 1.0)), 0.0);
    let zero = rect_from_xywh(0.0, 0.0, 0.0, 0.0);
    assert_eq!(iou(zero, zero), 0.0);
}

#[test]
fn overlap_matrix_is_row_major_over_gt() {
    let gt = [rect_from_xywh(0.0, 0.0, 1.0, 1.0), rect_from_xywh(2.0, 0.0, 1.0, 1.0)];
    let generated = [rect_from_xywh(2.0, 0.0, 1.0, 1.0)];
    let m = PairMatrix::overlaps(&gt, &generated);
    assert_eq!((m.rows(), m.cols()), (2, 1));
    assert_eq!(m.get(0, 0), 0.0);
    assert_eq!(m.get(1, 0), 1.0);
    let costs = m.to_costs();
    assert_eq!(costs.get(0, 0), 1.0);
    assert_eq!(costs.get(1, 0), 0.0);
}

#[test]
fn add_applies_per_cell_offsets() {
    let mut m = PairMatrix::from_fn(2, 2, |_, _| 0.5);
    m.add(|i, j| if i == j { 0.0 } else { 0.25 });
    assert_eq!(m.get(0, 0), 0.5);
    assert_eq!(m.get(0, 1), 0.75);
}
