use super::*;
use crate::foundation::core::rect_from_xywh;

fn blocks() -> Vec<Rect> {
    vec![
        rect_from_xywh(0.0, 0.0, 0.5, 0.2),
        rect_from_xywh(0.1, 0.3, 0.3, 0.3),
        rect_from_xywh(0.6, 0.6, 0.2, 0.2),
    ]
}

#[test]
fn identical_layouts_match_perfectly() {
    let r = match_layouts(&blocks(), &blocks(), MatchThreshold::AnyOverlap).unwrap();
    assert_eq!(r.num_matched, 3);
    assert_eq!(r.num_gt, 3);
    assert_eq!(r.num_gen, 3);
    assert!((r.mean_iou - 1.0).abs() < 1e-12);
    assert_eq!(r.precision, 1.0);
    assert_eq!(r.recall, 1.0);
    assert_eq!(r.f1, 1.0);
    assert_eq!(r.position_similarity, 1.0);
    assert!(r.unmatched_gt.is_empty() && r.unmatched_gen.is_empty());
}

#[test]
fn empty_gt_gives_full_recall_and_zero_precision() {
    let r = match_layouts(&[], &blocks(), MatchThreshold::AnyOverlap).unwrap();
    assert_eq!(r.num_matched, 0);
    assert_eq!(r.recall, 1.0);
    assert_eq!(r.precision, 0.0);
    assert_eq!(r.f1, 0.0);
    assert_eq!(r.unmatched_gen, vec![0, 1, 2]);
}

#[test]
fn disjoint_layouts_report_everything_unmatched() {
    let gt = vec![rect_from_xywh(0.0, 0.0, 0.1, 0.1)];
    let generated = vec![rect_from_xywh(0.5, 0.5, 0.1, 0.1)];
    let r = match_layouts(&gt, &generated, MatchThreshold::AnyOverlap).unwrap();
    assert_eq!(r.num_matched, 0);
    assert_eq!(r.mean_iou, 0.0);
    assert_eq!(r.position_similarity, 0.0);
    assert_eq!(r.unmatched_gt, vec![0]);
    assert_eq!(r.unmatched_gen, vec![0]);
}

#[test]
fn position_similarity_uses_chebyshev_distance() {
    let gt = vec![rect_from_xywh(0.0, 0.0, 0.5, 0.5)];
    let generated = vec![rect_from_xywh(0.1, 0.25, 0.5, 0.5)];
    let pairs = vec![MatchedPair {
        gt_index: 0,
        gen_index: 0,
        iou: 0.5,
    }];
    let s = position_similarity(&gt, &generated, &pairs);
    assert!((s - 0.75).abs() < 1e-12);
}

#[test]
fn element_count_ratio_is_capped() {
    assert_eq!(element_count_ratio(0, 5), 0.0);
    assert_eq!(element_count_ratio(4, 2), 0.5);
    assert_eq!(element_count_ratio(4, 8), 1.0);
}

#[test]
fn canvas_fill_ratio_uses_gt_union_box() {
    let gt = vec![
        rect_from_xywh(0.0, 0.0, 10.0, 10.0),
        rect_from_xywh(10.0, 10.0, 10.0, 10.0),
    ];
    let generated = vec![rect_from_xywh(0.0, 0.0, 10.0, 10.0)];
    assert!((canvas_fill_ratio(&gt, &generated) - 0.25).abs() < 1e-12);
    assert_eq!(canvas_fill_ratio(&[], &generated), 0.0);

    let big = vec![rect_from_xywh(0.0, 0.0, 100.0, 100.0)];
    assert_eq!(canvas_fill_ratio(&gt, &big), 1.0);
}

#[test]
fn center_similarity_uses_the_larger_axis_offset() {
    let a = rect_from_xywh(0.0, 0.0, 0.2, 0.2);
    let b = rect_from_xywh(0.25, 0.5, 0.2, 0.2);
    assert!((center_similarity(a, b) - 0.5).abs() < 1e-12);
    assert_eq!(center_similarity(a, a), 1.0);
}
