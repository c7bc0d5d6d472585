//! Git operations abstraction layer
//!
//! The release committer only talks to the [ReleaseRepository] trait. Two
//! implementations exist:
//!
//! - [repository::Git2Repository]: real repository backed by the `git2` crate
//! - [mock::MockRepository]: records every call, used to test ordering and
//!   tag policies without a remote
//!
//! ```rust
//! # use release_bump::git::ReleaseRepository;
//! # use release_bump::config::TagKind;
//! # fn example<R: ReleaseRepository>(repo: &R) -> release_bump::Result<()> {
//! repo.stage_all()?;
//! repo.commit("Releasing v1.2.3")?;
//! repo.create_tag("v1.2.3", TagKind::Annotated, "v1.2.3")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitOp, MockRepository};
pub use repository::Git2Repository;

use crate::config::TagKind;
use crate::error::Result;
use git2::Oid;

/// Committer identity written to the repository config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Identity {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// What a pull did to the local HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    UpToDate,
    FastForwarded,
    /// Local history is not an ancestor of the remote; left untouched
    Diverged,
    /// Remote has no such branch
    RemoteBranchMissing,
}

/// Source-control operations a release needs.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. A tag that does not exist
/// must be reported as [crate::error::ReleaseError::TagNotFound] so the
/// committer can apply its deletion policy.
pub trait ReleaseRepository {
    /// Fetch `branch` from `remote` and fast-forward HEAD to it if possible.
    fn pull(&self, remote: &str, branch: &str) -> Result<PullOutcome>;

    /// Write `user.name` / `user.email` into the repository config.
    fn configure_identity(&self, identity: &Identity) -> Result<()>;

    /// Delete a local tag. Missing tag is `TagNotFound`.
    fn delete_local_tag(&self, tag: &str) -> Result<()>;

    /// Delete a tag on the remote. Missing tag is `TagNotFound`.
    fn delete_remote_tag(&self, remote: &str, tag: &str) -> Result<()>;

    /// Stage every change in the working tree, deletions included.
    fn stage_all(&self) -> Result<()>;

    /// Commit the index on top of HEAD and return the new commit id.
    fn commit(&self, message: &str) -> Result<Oid>;

    /// Tag the current HEAD.
    fn create_tag(&self, name: &str, kind: TagKind, message: &str) -> Result<()>;

    /// Push HEAD to `refs/heads/<branch>` on `remote`.
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Push the named tags to `remote`.
    fn push_tags(&self, remote: &str, tags: &[&str]) -> Result<()>;
}
