use std::fmt;

/// Where a tag was looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLocation {
    Local,
    Remote,
}

impl fmt::Display for TagLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagLocation::Local => write!(f, "locally"),
            TagLocation::Remote => write!(f, "on the remote"),
        }
    }
}

/// Warnings raised at the edges of a release run.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// Bare version is not a semantic version; it is used anyway
    NonSemverVersion { version: String },
    /// Excerpt had no `Releasing vX.Y.Z` line to strip
    BoilerplateNotFound,
    /// Changelog had fewer lines than the entry offset; entry was appended
    ShortChangelog { lines: usize },
    /// Tag to delete did not exist and the tolerant policy skipped it
    TagAbsent { tag: String, location: TagLocation },
    /// Local branch has diverged from the remote, fast-forward skipped
    BranchDiverged { remote: String, branch: String },
    /// Remote has no such branch yet, nothing pulled
    RemoteBranchMissing { remote: String, branch: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::NonSemverVersion { version } => {
                write!(f, "Version '{}' is not a semantic version", version)
            }
            ReleaseWarning::BoilerplateNotFound => {
                write!(f, "No 'Releasing vX.Y.Z' line found in changelog excerpt")
            }
            ReleaseWarning::ShortChangelog { lines } => {
                write!(
                    f,
                    "Changelog has only {} line(s); release entry appended at the end",
                    lines
                )
            }
            ReleaseWarning::TagAbsent { tag, location } => {
                write!(f, "Tag '{}' does not exist {}, nothing to delete", tag, location)
            }
            ReleaseWarning::BranchDiverged { remote, branch } => {
                write!(
                    f,
                    "Local HEAD has diverged from '{}/{}'; continuing without pulling",
                    remote, branch
                )
            }
            ReleaseWarning::RemoteBranchMissing { remote, branch } => {
                write!(f, "Remote '{}' has no branch '{}'", remote, branch)
            }
        }
    }
}
