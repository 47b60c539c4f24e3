use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TorsoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TorsoError::resource("x")
            .to_string()
            .contains("resource error:")
    );
    assert!(
        TorsoError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TorsoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_validation());
}

#[test]
fn is_validation_only_matches_validation() {
    assert!(TorsoError::validation("x").is_validation());
    assert!(!TorsoError::resource("x").is_validation());
    assert!(!TorsoError::encoding("x").is_validation());
}
