use super::*;
use crate::foundation::core::rect_from_xywh;

fn el(ordinal: usize, parent: Option<usize>, depth: usize, x: f64, y: f64, w: f64, h: f64) -> Element {
    Element {
        ordinal,
        parent,
        id: None,
        name: format!("e{ordinal}"),
        node_type: "RECTANGLE".to_string(),
        rect: rect_from_xywh(x, y, w, h),
        depth,
        characters: None,
        fill: None,
    }
}

#[test]
fn score_is_one_at_zero_error_and_decreasing() {
    assert_eq!(alignment_score(0.0), 1.0);
    let mut prev = 1.0;
    for e in [0.01, 0.5, 1.0, 10.0, 1e4] {
        let s = alignment_score(e);
        assert!(s > 0.0 && s < prev, "score {s} for error {e}");
        prev = s;
    }
}

#[test]
fn left_aligned_siblings_pick_left_rule() {
    let elements = vec![
        el(0, None, 0, 0.0, 0.0, 500.0, 500.0),
        el(1, Some(0), 1, 10.0, 10.0, 100.0, 20.0),
        el(2, Some(0), 1, 10.0, 40.0, 50.0, 20.0),
        el(3, Some(0), 1, 10.0, 70.0, 80.0, 20.0),
    ];
    let cols = local_alignment(&elements, Axis::X, &GridConfig::default());
    assert_eq!(cols.len(), 1);
    let c = &cols[0];
    assert_eq!(c.key, ClusterKey::Siblings { depth: 1, parent: 0 });
    assert_eq!(c.alignment_type, AlignmentRule::Left);
    assert_eq!(c.alignment_error, 0.0);
    assert_eq!(c.score, 1.0);
    assert_eq!(c.members, vec![1, 2, 3]);
}

#[test]
fn equal_errors_resolve_to_the_first_rule() {
    let a = el(0, None, 0, 5.0, 5.0, 10.0, 10.0);
    let b = el(1, None, 0, 5.0, 5.0, 10.0, 10.0);
    let elements = vec![a, b];
    let c = score_cluster(
        ClusterKey::Band { index: 0 },
        vec![0, 1],
        &elements,
        Axis::Y,
        &GridConfig::default(),
    )
    .unwrap();
    assert_eq!(c.alignment_type, AlignmentRule::Top);
}

#[test]
fn alignment_error_uses_rule_reference_lines() {
    let a = el(0, None, 0, 0.0, 0.0, 10.0, 10.0);
    let b = el(1, None, 0, 4.0, 0.0, 10.0, 10.0);
    let members = [&a, &b];
    assert_eq!(alignment_error(&members, Axis::X, AlignmentRule::Left), 2.0);
    assert_eq!(alignment_error(&members, Axis::X, AlignmentRule::Right), 2.0);
    assert_eq!(alignment_error(&members, Axis::X, AlignmentRule::Center), 2.0);
    assert_eq!(alignment_error(&members, Axis::Y, AlignmentRule::Top), 0.0);
}

#[test]
fn degenerate_extent_clusters_are_skipped() {
    let elements = vec![
        el(0, None, 0, 0.0, 0.0, 0.0, 10.0),
        el(1, None, 0, 3.0, 0.0, 0.0, 10.0),
    ];
    let cfg = GridConfig::default();
    assert!(score_cluster(ClusterKey::Band { index: 0 }, vec![0, 1], &elements, Axis::X, &cfg).is_none());
    assert!(score_cluster(ClusterKey::Band { index: 0 }, vec![0, 1], &elements, Axis::Y, &cfg).is_some());
}

#[test]
fn oversized_clusters_are_skipped() {
    let elements: Vec<Element> = (0..5).map(|i| el(i, None, 0, 0.0, 0.0, 10.0, 10.0)).collect();
    let cfg = GridConfig {
        max_elements: 4,
        ..GridConfig::default()
    };
    assert!(score_cluster(ClusterKey::Band { index: 0 }, (0..5).collect(), &elements, Axis::X, &cfg).is_none());
}

#[test]
fn huge_errors_are_clipped_to_the_ceiling() {
    let elements = vec![
        el(0, None, 0, 0.0, 0.0, 1.0, 1.0),
        el(1, None, 0, 1e7, 0.0, 1.0, 1.0),
    ];
    let cfg = GridConfig::default();
    let c = score_cluster(ClusterKey::Band { index: 0 }, vec![0, 1], &elements, Axis::X, &cfg).unwrap();
    assert_eq!(c.normalized_error, cfg.error_ceiling);
    assert!(c.score > 0.0);
}

#[test]
fn parentless_elements_form_no_sibling_group() {
    let elements = vec![el(0, None, 0, 0.0, 0.0, 100.0, 100.0)];
    assert!(local_alignment(&elements, Axis::X, &GridConfig::default()).is_empty());
}

#[test]
fn empty_layout_scores_zero() {
    let report = analyze_grid(&[], &GridConfig::default());
    assert!(report.col_alignment.is_empty());
    assert!(report.local_row_alignment.is_empty());
    assert_eq!(report.score, 0.0);
}

#[test]
fn overall_score_averages_non_empty_tables() {
    let s = |score: f64| ClusterScore {
        key: ClusterKey::Band { index: 0 },
        axis: Axis::X,
        alignment_type: AlignmentRule::Left,
        alignment_error: 0.0,
        normalized_error: 0.0,
        score,
        num_elements: 1,
        members: vec![0],
    };
    let a = vec![s(1.0), s(0.5)];
    let b = vec![s(0.25)];
    let empty: Vec<ClusterScore> = Vec::new();
    let overall = overall_alignment_score(&[a.as_slice(), b.as_slice(), empty.as_slice()]);
    assert!((overall - 0.5).abs() < 1e-12);
}

#[test]
fn aligned_layout_outscores_jittered_layout() {
    let aligned = vec![
        el(1, Some(0), 1, 20.0, 20.0, 100.0, 40.0),
        el(2, Some(0), 1, 20.0, 80.0, 100.0, 40.0),
        el(3, Some(0), 1, 20.0, 140.0, 100.0, 40.0),
    ];
    let jittered = vec![
        el(1, Some(0), 1, 20.0, 20.0, 100.0, 40.0),
        el(2, Some(0), 1, 63.0, 80.0, 70.0, 40.0),
        el(3, Some(0), 1, 5.0, 140.0, 130.0, 40.0),
    ];
    let cfg = GridConfig {
        col_clusters: 1,
        row_clusters: 1,
        ..GridConfig::default()
    };
    let cmp = compare_grid_alignment(&aligned, &jittered, &cfg);
    assert_eq!(cmp.gt.col_alignment[0].score, 1.0);
    assert_eq!(cmp.generated.col_alignment[0].alignment_type, AlignmentRule::Right);
    assert!(cmp.gt_score > cmp.gen_score);
    assert!(cmp.difference > 0.0);
    assert!((cmp.difference - (cmp.gt_score - cmp.gen_score)).abs() < 1e-12);
}
