use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TwinviewError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TwinviewError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        TwinviewError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        TwinviewError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn asset_error_names_the_entity() {
    let err = TwinviewError::asset("witch", "file not found");
    let msg = err.to_string();
    assert!(msg.contains("'witch'"));
    assert!(msg.contains("file not found"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TwinviewError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
