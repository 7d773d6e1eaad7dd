use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ForgeError::invalid_color("x")
            .to_string()
            .contains("invalid color spec:")
    );
    assert!(
        ForgeError::geometry("x")
            .to_string()
            .contains("geometry build failure:")
    );
    assert!(
        ForgeError::shader_link("x")
            .to_string()
            .contains("shader link failure:")
    );
    assert!(
        ForgeError::missing_rig("x")
            .to_string()
            .contains("missing rig object:")
    );
    assert!(
        ForgeError::ArtifactMissing(PathBuf::from("out.png"))
            .to_string()
            .contains("out.png")
    );
}

#[test]
fn render_failure_preserves_source() {
    let base = std::io::Error::other("gpu on fire");
    let err = ForgeError::render(base);
    assert!(err.to_string().contains("gpu on fire"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn only_user_input_is_recoverable() {
    assert!(ForgeError::invalid_color("x").is_recoverable());
    assert!(ForgeError::invalid_parameter("x").is_recoverable());
    assert!(!ForgeError::shader_link("x").is_recoverable());
    assert!(!ForgeError::render(anyhow::anyhow!("boom")).is_recoverable());
    assert!(!ForgeError::ArtifactMissing(PathBuf::new()).is_recoverable());
}
