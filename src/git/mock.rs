use crate::config::TagKind;
use crate::error::{ReleaseError, Result};
use crate::git::{Identity, PullOutcome, ReleaseRepository};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOp {
    Pull { remote: String, branch: String },
    ConfigureIdentity(Identity),
    DeleteLocalTag(String),
    DeleteRemoteTag { remote: String, tag: String },
    StageAll,
    Commit(String),
    CreateTag { name: String, kind: TagKind },
    PushBranch { remote: String, branch: String },
    PushTags { remote: String, tags: Vec<String> },
}

impl GitOp {
    /// Short name, handy for ordering assertions and for `fail_on`.
    pub fn kind(&self) -> &'static str {
        match self {
            GitOp::Pull { .. } => "pull",
            GitOp::ConfigureIdentity(_) => "configure_identity",
            GitOp::DeleteLocalTag(_) => "delete_local_tag",
            GitOp::DeleteRemoteTag { .. } => "delete_remote_tag",
            GitOp::StageAll => "stage_all",
            GitOp::Commit(_) => "commit",
            GitOp::CreateTag { .. } => "create_tag",
            GitOp::PushBranch { .. } => "push_branch",
            GitOp::PushTags { .. } => "push_tags",
        }
    }
}

/// Mock repository for testing without actual git operations
///
/// Tracks local and remote tags so deleting a missing tag yields
/// `TagNotFound` and re-creating an existing one fails like git would.
pub struct MockRepository {
    ops: RefCell<Vec<GitOp>>,
    local_tags: RefCell<HashSet<String>>,
    remote_tags: RefCell<HashSet<String>>,
    commits: Cell<u8>,
    pull_outcome: PullOutcome,
    fail_on: Option<&'static str>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            ops: RefCell::new(Vec::new()),
            local_tags: RefCell::new(HashSet::new()),
            remote_tags: RefCell::new(HashSet::new()),
            commits: Cell::new(0),
            pull_outcome: PullOutcome::UpToDate,
            fail_on: None,
        }
    }

    /// Add a tag that exists both locally and on the remote
    pub fn with_tag(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.local_tags.borrow_mut().insert(name.clone());
        self.remote_tags.borrow_mut().insert(name);
        self
    }

    /// Add a tag that only exists locally
    pub fn with_local_tag(self, name: impl Into<String>) -> Self {
        self.local_tags.borrow_mut().insert(name.into());
        self
    }

    /// What `pull` reports
    pub fn with_pull_outcome(mut self, outcome: PullOutcome) -> Self {
        self.pull_outcome = outcome;
        self
    }

    /// Make the operation with this [GitOp::kind] fail
    pub fn failing_on(mut self, kind: &'static str) -> Self {
        self.fail_on = Some(kind);
        self
    }

    /// Every call made so far, in order
    pub fn ops(&self) -> Vec<GitOp> {
        self.ops.borrow().clone()
    }

    /// Kinds of every call made so far, in order
    pub fn op_kinds(&self) -> Vec<&'static str> {
        self.ops.borrow().iter().map(GitOp::kind).collect()
    }

    pub fn has_local_tag(&self, name: &str) -> bool {
        self.local_tags.borrow().contains(name)
    }

    pub fn has_remote_tag(&self, name: &str) -> bool {
        self.remote_tags.borrow().contains(name)
    }

    fn record(&self, op: GitOp) -> Result<()> {
        let kind = op.kind();
        self.ops.borrow_mut().push(op);
        if self.fail_on == Some(kind) {
            return Err(ReleaseError::remote(format!("{} failed", kind)));
        }
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseRepository for MockRepository {
    fn pull(&self, remote: &str, branch: &str) -> Result<PullOutcome> {
        self.record(GitOp::Pull {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })?;
        Ok(self.pull_outcome)
    }

    fn configure_identity(&self, identity: &Identity) -> Result<()> {
        self.record(GitOp::ConfigureIdentity(identity.clone()))
    }

    fn delete_local_tag(&self, tag: &str) -> Result<()> {
        self.record(GitOp::DeleteLocalTag(tag.to_string()))?;
        if !self.local_tags.borrow_mut().remove(tag) {
            return Err(ReleaseError::TagNotFound(tag.to_string()));
        }
        Ok(())
    }

    fn delete_remote_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.record(GitOp::DeleteRemoteTag {
            remote: remote.to_string(),
            tag: tag.to_string(),
        })?;
        if !self.remote_tags.borrow_mut().remove(tag) {
            return Err(ReleaseError::TagNotFound(tag.to_string()));
        }
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.record(GitOp::StageAll)
    }

    fn commit(&self, message: &str) -> Result<Oid> {
        self.record(GitOp::Commit(message.to_string()))?;
        let n = self.commits.get().wrapping_add(1);
        self.commits.set(n);
        Ok(Oid::from_bytes(&[n; 20])?)
    }

    fn create_tag(&self, name: &str, kind: TagKind, _message: &str) -> Result<()> {
        self.record(GitOp::CreateTag {
            name: name.to_string(),
            kind,
        })?;
        if !self.local_tags.borrow_mut().insert(name.to_string()) {
            return Err(ReleaseError::tag(format!("tag '{}' already exists", name)));
        }
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(GitOp::PushBranch {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }

    fn push_tags(&self, remote: &str, tags: &[&str]) -> Result<()> {
        self.record(GitOp::PushTags {
            remote: remote.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })?;

        let mut remote_tags = self.remote_tags.borrow_mut();
        for tag in tags {
            if !self.local_tags.borrow().contains(*tag) {
                return Err(ReleaseError::remote(format!("src refspec {} does not match any", tag)));
            }
            if !remote_tags.insert(tag.to_string()) {
                return Err(ReleaseError::remote(format!("tag '{}' already exists on remote", tag)));
            }
        }
        Ok(())
    }
}
