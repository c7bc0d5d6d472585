use release_bump::boundary::{ReleaseWarning, TagLocation};

// ============================================================================
// ReleaseWarning Display Tests
// ============================================================================

#[test]
fn test_non_semver_version_display() {
    let warning = ReleaseWarning::NonSemverVersion {
        version: "nightly".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("nightly"),
        "Message should contain the version, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("not a semantic version"),
        "Message should explain the problem, got: {}",
        display_msg
    );
}

#[test]
fn test_boilerplate_not_found_display() {
    let display_msg = ReleaseWarning::BoilerplateNotFound.to_string();
    assert!(
        display_msg.contains("Releasing vX.Y.Z"),
        "Message should name the missing line, got: {}",
        display_msg
    );
}

#[test]
fn test_short_changelog_display() {
    let warning = ReleaseWarning::ShortChangelog { lines: 1 };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("only 1 line"),
        "Message should contain the line count, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("appended"),
        "Message should say the entry was appended, got: {}",
        display_msg
    );
}

#[test]
fn test_tag_absent_display_local_and_remote() {
    let local = ReleaseWarning::TagAbsent {
        tag: "v2.0.1".to_string(),
        location: TagLocation::Local,
    };
    let remote = ReleaseWarning::TagAbsent {
        tag: "v2.0.1".to_string(),
        location: TagLocation::Remote,
    };

    assert_eq!(
        local.to_string(),
        "Tag 'v2.0.1' does not exist locally, nothing to delete"
    );
    assert_eq!(
        remote.to_string(),
        "Tag 'v2.0.1' does not exist on the remote, nothing to delete"
    );
}

#[test]
fn test_branch_diverged_display() {
    let warning = ReleaseWarning::BranchDiverged {
        remote: "origin".to_string(),
        branch: "main".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("origin/main"),
        "Message should contain the remote branch, got: {}",
        display_msg
    );
}

#[test]
fn test_remote_branch_missing_display() {
    let warning = ReleaseWarning::RemoteBranchMissing {
        remote: "upstream".to_string(),
        branch: "master".to_string(),
    };

    assert_eq!(warning.to_string(), "Remote 'upstream' has no branch 'master'");
}
