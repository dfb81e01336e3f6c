use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LayoutError::structure("x")
            .to_string()
            .contains("structure error:")
    );
    assert!(LayoutError::config("x").to_string().contains("config error:"));
    assert!(
        LayoutError::matching("x")
            .to_string()
            .contains("matching error:")
    );
    assert!(
        LayoutError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LayoutError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn structure_errors_match_by_variant() {
    let err = LayoutError::structure("no root document");
    assert!(matches!(err, LayoutError::Structure(ref m) if m == "no root document"));
}
