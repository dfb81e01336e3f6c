use super::*;
use crate::foundation::core::rect_from_xywh;

fn spaced_row(dx: f64) -> Vec<Rect> {
    [0.0, 0.3, 0.6]
        .iter()
        .map(|&x| rect_from_xywh(x + dx, 0.0, 0.1, 0.1))
        .collect()
}

#[test]
fn shared_left_edge_groups_with_union_bbox_at_min_x() {
    let rects = vec![
        rect_from_xywh(0.1, 0.0, 0.2, 0.1),
        rect_from_xywh(0.105, 0.3, 0.4, 0.1),
        rect_from_xywh(0.7, 0.6, 0.1, 0.1),
    ];
    let groups = detect_groups(&rects, &GroupConfig::default());
    let left: Vec<&AlignmentGroup> = groups.iter().filter(|g| g.kind == EdgeKind::XLeft).collect();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].members, vec![0, 1]);
    assert_eq!(left[0].bbox.x0, 0.1);
    assert_eq!(left[0].bbox.x1, rects[1].x1);
    assert_eq!(left[0].bbox.y1, rects[1].y1);
}

#[test]
fn singletons_are_discarded() {
    let rects = vec![rect_from_xywh(0.0, 0.0, 0.1, 0.1), rect_from_xywh(0.5, 0.5, 0.2, 0.2)];
    assert!(detect_groups(&rects, &GroupConfig::default()).is_empty());

    let cfg = GroupConfig {
        min_group_size: 1,
        ..GroupConfig::default()
    };
    assert_eq!(detect_groups(&rects, &cfg).len(), 12);
}

#[test]
fn groups_are_ordered_by_kind_then_bucket() {
    let rects = spaced_row(0.0);
    let kinds: Vec<EdgeKind> = detect_groups(&rects, &GroupConfig::default())
        .iter()
        .map(|g| g.kind)
        .collect();
    assert_eq!(kinds, vec![EdgeKind::YTop, EdgeKind::YCenter, EdgeKind::YBottom]);
}

#[test]
fn slightly_shifted_row_matches_every_group() {
    let cfg = GroupConfig::default();
    let gt = detect_groups(&spaced_row(0.0), &cfg);
    let generated = detect_groups(&spaced_row(0.001), &cfg);
    assert_eq!(gt.len(), generated.len());

    let report = compare_groups(&gt, &generated).unwrap();
    assert_eq!(report.precision, 1.0);
    assert_eq!(report.recall, 1.0);
    assert_eq!(report.f1, 1.0);
    assert_eq!(report.num_correct, 3);
    assert!(report.pairs.iter().all(|p| p.agrees && p.iou > 0.99));
}

#[test]
fn kind_disagreement_is_not_correct() {
    let gt = vec![AlignmentGroup {
        kind: EdgeKind::XLeft,
        bucket: 0,
        bbox: rect_from_xywh(0.0, 0.0, 0.5, 0.5),
        members: vec![0, 1],
    }];
    let generated = vec![AlignmentGroup {
        kind: EdgeKind::XRight,
        bucket: 25,
        bbox: rect_from_xywh(0.0, 0.0, 0.5, 0.5),
        members: vec![0, 1],
    }];
    let report = compare_groups(&gt, &generated).unwrap();
    assert_eq!(report.num_matched, 1);
    assert_eq!(report.num_correct, 0);
    assert_eq!(report.precision, 0.0);
    assert_eq!(report.f1, 0.0);
    assert!(!report.pairs[0].agrees);
}

#[test]
fn empty_group_lists_follow_the_conventions() {
    let some = detect_groups(&spaced_row(0.0), &GroupConfig::default());

    let none = compare_groups(&[], &[]).unwrap();
    assert_eq!((none.precision, none.recall, none.f1), (1.0, 1.0, 1.0));

    let missing_gen = compare_groups(&some, &[]).unwrap();
    assert_eq!(missing_gen.precision, 1.0);
    assert_eq!(missing_gen.recall, 0.0);

    let missing_gt = compare_groups(&[], &some).unwrap();
    assert_eq!(missing_gt.recall, 1.0);
    assert_eq!(missing_gt.precision, 0.0);
}

#[test]
fn non_positive_tolerance_yields_no_groups() {
    let cfg = GroupConfig {
        tolerance: 0.0,
        ..GroupConfig::default()
    };
    assert!(detect_groups(&spaced_row(0.0), &cfg).is_empty());
}

#[test]
fn edge_kind_labels_are_stable() {
    let labels: Vec<&str> = EdgeKind::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(
        labels,
        vec!["x_left", "x_center", "x_right", "y_top", "y_center", "y_bottom"]
    );
    assert_eq!(EdgeKind::YBottom.axis(), Axis::Y);
    assert_eq!(EdgeKind::XCenter.to_string(), "x_center");
}
