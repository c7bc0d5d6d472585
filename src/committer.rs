//! Release commit state machine.
//!
//! ```text
//! Unconfigured -> Configured -> TagDeleted -> Staged -> Committed -> Tagged -> Pushed
//! ```
//!
//! The temporary tag left by the release trigger is removed before the
//! release commit exists, so the real tag can be created at that commit
//! without clashing. Any failed step moves to `Failed` and stops.

use git2::Oid;
use tracing::debug;

use crate::boundary::{ReleaseWarning, TagLocation};
use crate::config::{GitConfig, TagDeletion};
use crate::error::{ReleaseError, Result};
use crate::git::{Identity, ReleaseRepository};
use crate::ui::Reporter;
use crate::version::ReleaseVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitState {
    Unconfigured,
    Configured,
    TagDeleted,
    Staged,
    Committed(Oid),
    Tagged(Oid),
    Pushed(Oid),
    Failed,
}

impl CommitState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommitState::Pushed(_) | CommitState::Failed)
    }
}

/// `Releasing <tag>`
pub fn commit_message(version: &ReleaseVersion) -> String {
    format!("Releasing {}", version.tag)
}

/// Drives a [ReleaseRepository] through the release steps.
pub struct ReleaseCommitter<'a, R: ReleaseRepository + ?Sized, P: Reporter + ?Sized> {
    repo: &'a R,
    reporter: &'a P,
    policy: &'a GitConfig,
    tag: String,
    message: String,
    state: CommitState,
}

impl<'a, R, P> ReleaseCommitter<'a, R, P>
where
    R: ReleaseRepository + ?Sized,
    P: Reporter + ?Sized,
{
    pub fn new(repo: &'a R, reporter: &'a P, policy: &'a GitConfig, version: &ReleaseVersion) -> Self {
        ReleaseCommitter {
            repo,
            reporter,
            policy,
            tag: version.tag.clone(),
            message: commit_message(version),
            state: CommitState::Unconfigured,
        }
    }

    pub fn state(&self) -> CommitState {
        self.state
    }

    /// Runs every remaining step; returns the release commit id.
    pub fn run(&mut self) -> Result<Oid> {
        loop {
            match self.state {
                CommitState::Pushed(oid) => return Ok(oid),
                CommitState::Failed => {
                    return Err(ReleaseError::tag(format!(
                        "release of '{}' already failed",
                        self.tag
                    )));
                }
                _ => {
                    self.advance()?;
                }
            }
        }
    }

    /// Performs the single transition out of the current state.
    pub fn advance(&mut self) -> Result<CommitState> {
        match self.step() {
            Ok(next) => {
                debug!(from = ?self.state, to = ?next, "Release commit transition");
                self.state = next;
                Ok(next)
            }
            Err(e) => {
                self.state = CommitState::Failed;
                Err(e)
            }
        }
    }

    fn step(&self) -> Result<CommitState> {
        match self.state {
            CommitState::Unconfigured => {
                let identity = Identity::new(&self.policy.user_name, &self.policy.user_email);
                self.repo.configure_identity(&identity)?;
                self.reporter.info("Git configured");
                Ok(CommitState::Configured)
            }
            CommitState::Configured => {
                self.delete_tag(TagLocation::Local)?;
                if self.policy.delete_remote_tag {
                    self.delete_tag(TagLocation::Remote)?;
                }
                self.reporter.info("Temp tag deleted");
                Ok(CommitState::TagDeleted)
            }
            CommitState::TagDeleted => {
                self.repo.stage_all()?;
                Ok(CommitState::Staged)
            }
            CommitState::Staged => {
                let oid = self.repo.commit(&self.message)?;
                Ok(CommitState::Committed(oid))
            }
            CommitState::Committed(oid) => {
                self.repo
                    .create_tag(&self.tag, self.policy.tag_kind, &self.tag)?;
                self.reporter.info("Changes committed and tagged");
                Ok(CommitState::Tagged(oid))
            }
            CommitState::Tagged(oid) => {
                self.repo.push_branch(&self.policy.remote, &self.policy.branch)?;
                self.repo.push_tags(&self.policy.remote, &[self.tag.as_str()])?;
                self.reporter.success(&format!(
                    "Changes pushed to {}/{}",
                    self.policy.remote, self.policy.branch
                ));
                Ok(CommitState::Pushed(oid))
            }
            CommitState::Pushed(oid) => Ok(CommitState::Pushed(oid)),
            CommitState::Failed => Ok(CommitState::Failed),
        }
    }

    fn delete_tag(&self, location: TagLocation) -> Result<()> {
        let result = match location {
            TagLocation::Local => self.repo.delete_local_tag(&self.tag),
            TagLocation::Remote => self.repo.delete_remote_tag(&self.policy.remote, &self.tag),
        };

        match result {
            Err(e) if e.is_tag_not_found() && self.policy.tag_deletion == TagDeletion::Tolerant => {
                self.reporter.warning(&ReleaseWarning::TagAbsent {
                    tag: self.tag.clone(),
                    location,
                });
                Ok(())
            }
            other => other,
        }
    }
}
