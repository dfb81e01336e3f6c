use super::*;
use crate::model::node::Node;

fn page(shift: f64) -> DesignDocument {
    DesignDocument::single(
        Node::new("FRAME", "Page")
            .with_bbox(0.0, 0.0, 1000.0, 800.0)
            .with_children(vec![
                Node::new("TEXT", "Title")
                    .with_bbox(100.0 + shift, 50.0, 400.0, 60.0)
                    .with_characters("Welcome home"),
                Node::new("RECTANGLE", "Hero")
                    .with_bbox(100.0 + shift, 150.0, 800.0, 300.0),
                Node::new("TEXT", "Cta")
                    .with_bbox(100.0 + shift, 500.0, 200.0, 50.0)
                    .with_characters("Sign up!"),
            ]),
    )
}

#[test]
fn identical_documents_score_perfectly() {
    let doc = page(0.0);
    let r = evaluate(&doc, &doc, &EvalConfig::default()).unwrap();
    assert_eq!(r.layout.num_gt, 4);
    assert_eq!(r.layout.num_matched, 4);
    assert_eq!(r.layout.precision, 1.0);
    assert_eq!(r.layout.recall, 1.0);
    assert_eq!(r.components.num_text_matches, 2);
    assert_eq!(r.components.block_match_score, 1.0);
    assert_eq!(r.alignment_groups.f1, 1.0);
    assert_eq!(r.hierarchy.jaccard, 1.0);
    assert_eq!(r.hierarchy_type.jaccard, 1.0);
    assert_eq!(r.text.f1, 1.0);
    assert_eq!(r.element_count_ratio, 1.0);
    assert_eq!(r.grid.difference, 0.0);
}

#[test]
fn shifted_documents_still_match_every_block() {
    let r = evaluate(&page(0.0), &page(10.0), &EvalConfig::default()).unwrap();
    assert_eq!(r.layout.num_matched, 4);
    assert!(r.layout.mean_iou < 1.0);
    assert!(r.layout.position_similarity > 0.98);
    assert_eq!(r.hierarchy.jaccard, 1.0);
}

#[test]
fn document_without_root_is_a_structure_error() {
    let empty = DesignDocument::Named {
        nodes: Default::default(),
    };
    let err = evaluate(&page(0.0), &empty, &EvalConfig::default()).unwrap_err();
    assert!(matches!(err, LayoutError::Structure(_)));
}

#[test]
fn zero_size_generated_frame_scores_instead_of_failing() {
    let blank = DesignDocument::single(Node::new("FRAME", "page").with_bbox(0.0, 0.0, 0.0, 0.0));
    let r = evaluate(&page(0.0), &blank, &EvalConfig::default()).unwrap();
    assert_eq!(r.layout.num_gen, 0);
    assert_eq!(r.layout.num_matched, 0);
    assert_eq!(r.layout.recall, 0.0);
    assert_eq!(r.components.block_match_score, 0.0);
}

#[test]
fn invalid_config_is_rejected_before_work() {
    let mut cfg = EvalConfig::default();
    cfg.groups.tolerance = -1.0;
    let err = evaluate(&page(0.0), &page(0.0), &cfg).unwrap_err();
    assert!(matches!(err, LayoutError::Config(_)));
}

#[test]
fn batch_keeps_order_and_isolates_failures() {
    let bad = DesignDocument::single(Node::new("FRAME", "empty"));
    let pairs = vec![
        (page(0.0), page(0.0)),
        (page(0.0), bad),
        (page(0.0), page(10.0)),
    ];
    for threading in [
        BatchThreading::default(),
        BatchThreading {
            parallel: true,
            threads: Some(2),
        },
    ] {
        let out = evaluate_batch(&pairs, &EvalConfig::default(), threading).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].as_ref().unwrap().layout.mean_iou, 1.0);
        assert!(matches!(out[1], Err(LayoutError::Structure(_))));
        assert!(out[2].as_ref().unwrap().layout.mean_iou < 1.0);
    }
}

#[test]
fn zero_threads_is_a_config_error() {
    let pairs = vec![(page(0.0), page(0.0)), (page(0.0), page(0.0))];
    let threading = BatchThreading {
        parallel: true,
        threads: Some(0),
    };
    let err = evaluate_batch(&pairs, &EvalConfig::default(), threading).unwrap_err();
    assert!(matches!(err, LayoutError::Config(_)));
}
