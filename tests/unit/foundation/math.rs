use super::*;

#[test]
fn median_averages_even_lengths() {
    assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    assert_eq!(median(&[]), None);
}

#[test]
fn mean_of_empty_is_none() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
}

#[test]
fn quantize_rounds_half_to_even() {
    assert_eq!(quantize(2.5, 1.0), 2);
    assert_eq!(quantize(3.5, 1.0), 4);
    assert_eq!(quantize(0.3, 0.02), 15);
    assert_eq!(quantize(0.301, 0.02), 15);
    assert_eq!(quantize(-0.3, 0.02), -15);
}

#[test]
fn ratio_uses_empty_convention() {
    assert_eq!(ratio_or(0, 0, 1.0), 1.0);
    assert_eq!(ratio_or(1, 4, 1.0), 0.25);
}

#[test]
fn f1_is_zero_only_when_both_inputs_are_zero() {
    assert_eq!(f1_score(0.0, 0.0), 0.0);
    assert!((f1_score(1.0, 0.5) - 2.0 / 3.0).abs() < 1e-12);
    assert!(f1_score(0.01, 0.0) == 0.0);
}
