use crate::config::TagKind;
use crate::error::{ReleaseError, Result};
use crate::git::{Identity, PullOutcome};
use git2::build::CheckoutBuilder;
use git2::{
    Commit, ConfigLevel, Cred, CredentialType, Direction, ErrorCode, FetchOptions,
    IndexAddOption, Oid, PushOptions, RemoteCallbacks, Repository as Git2Repo,
};
use std::path::Path;
use tracing::debug;

/// SSH keys tried, in order, when the remote asks for one.
const SSH_KEYS: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo, token: None })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo, token: None }
    }

    /// HTTPS token offered to the remote as `x-access-token`
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Working directory of the repository, `None` for bare repositories
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn find_remote(&self, remote_name: &str) -> Result<git2::Remote<'_>> {
        self.repo
            .find_remote(remote_name)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote_name, e)))
    }

    /// Credentials: token, then SSH keys from ~/.ssh, then the agent, then defaults.
    fn remote_callbacks(&self) -> RemoteCallbacks<'static> {
        let token = self.token.clone();
        let mut callbacks = RemoteCallbacks::new();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = &token {
                    return Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Some(home) = dirs::home_dir() {
                    for key in SSH_KEYS {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }

                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            Cred::default()
        });

        callbacks
    }

    fn remote_has_ref(&self, remote_name: &str, refname: &str) -> Result<bool> {
        let mut remote = self.find_remote(remote_name)?;
        let connection = remote
            .connect_auth(Direction::Fetch, Some(self.remote_callbacks()), None)
            .map_err(|e| {
                ReleaseError::remote(format!("Cannot connect to '{}': {}", remote_name, e))
            })?;

        let found = connection.list()?.iter().any(|head| head.name() == refname);
        Ok(found)
    }

    fn push_refspecs(&self, remote_name: &str, refspecs: &[String]) -> Result<()> {
        let mut remote = self.find_remote(remote_name)?;

        let mut callbacks = self.remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let specs: Vec<&str> = refspecs.iter().map(String::as_str).collect();
        debug!(remote = remote_name, refspecs = ?specs, "Pushing");

        remote
            .push(&specs, Some(&mut push_options))
            .map_err(|e| ReleaseError::remote(format!("Push to '{}' failed: {}", remote_name, e)))
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl super::ReleaseRepository for Git2Repository {
    fn pull(&self, remote_name: &str, branch: &str) -> Result<PullOutcome> {
        let mut remote = self.find_remote(remote_name)?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.remote_callbacks());

        let tracking = format!("refs/remotes/{}/{}", remote_name, branch);
        let refspec = format!("+refs/heads/{}:{}", branch, tracking);
        debug!(remote = remote_name, refspec = %refspec, "Fetching");
        remote
            .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| {
                ReleaseError::remote(format!("Failed to fetch from '{}': {}", remote_name, e))
            })?;

        let remote_ref = match self.repo.find_reference(&tracking) {
            Ok(r) => r,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Ok(PullOutcome::RemoteBranchMissing)
            }
            Err(e) => return Err(e.into()),
        };

        let fetched = self.repo.reference_to_annotated_commit(&remote_ref)?;
        let (analysis, _) = self.repo.merge_analysis(&[&fetched])?;

        if analysis.is_up_to_date() {
            return Ok(PullOutcome::UpToDate);
        }
        if !analysis.is_fast_forward() && !analysis.is_unborn() {
            return Ok(PullOutcome::Diverged);
        }

        let target = fetched.id();
        let object = self.repo.find_object(target, None)?;
        self.repo
            .checkout_tree(&object, Some(CheckoutBuilder::new().safe()))?;

        let head = self.repo.find_reference("HEAD")?;
        let reflog = format!("pull: fast-forward to {}/{}", remote_name, branch);
        match head.symbolic_target() {
            Some(branch_ref) => {
                let branch_ref = branch_ref.to_string();
                self.repo.reference(&branch_ref, target, true, &reflog)?;
            }
            None => self.repo.set_head_detached(target)?,
        }

        debug!(commit = %target, "Fast-forwarded HEAD");
        Ok(PullOutcome::FastForwarded)
    }

    fn configure_identity(&self, identity: &Identity) -> Result<()> {
        let mut config = self.repo.config()?.open_level(ConfigLevel::Local)?;
        config.set_str("user.name", &identity.name)?;
        config.set_str("user.email", &identity.email)?;
        Ok(())
    }

    fn delete_local_tag(&self, tag: &str) -> Result<()> {
        let reference_name = format!("refs/tags/{}", tag);
        match self.repo.find_reference(&reference_name) {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(ReleaseError::TagNotFound(tag.to_string()))
            }
            Err(e) => return Err(ReleaseError::tag(format!("Cannot find tag '{}': {}", tag, e))),
        }

        self.repo
            .tag_delete(tag)
            .map_err(|e| ReleaseError::tag(format!("Cannot delete tag '{}': {}", tag, e)))?;
        debug!(tag, "Deleted local tag");
        Ok(())
    }

    fn delete_remote_tag(&self, remote: &str, tag: &str) -> Result<()> {
        let reference_name = format!("refs/tags/{}", tag);
        if !self.remote_has_ref(remote, &reference_name)? {
            return Err(ReleaseError::TagNotFound(tag.to_string()));
        }

        self.push_refspecs(remote, &[format!(":{}", reference_name)])?;
        debug!(remote, tag, "Deleted remote tag");
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Oid> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        debug!(commit = %oid, message, "Committed");
        Ok(oid)
    }

    fn create_tag(&self, name: &str, kind: TagKind, message: &str) -> Result<()> {
        let head = self
            .head_commit()?
            .ok_or_else(|| ReleaseError::tag(format!("Cannot tag '{}': HEAD has no commit", name)))?;

        let created = match kind {
            TagKind::Annotated => {
                let tagger = self.repo.signature()?;
                self.repo.tag(name, head.as_object(), &tagger, message, false)
            }
            TagKind::Lightweight => self.repo.tag_lightweight(name, head.as_object(), false),
        };

        created.map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;
        debug!(tag = name, ?kind, "Created tag");
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let source = match self.repo.head() {
            Ok(head) if head.is_branch() => head.name().unwrap_or("HEAD").to_string(),
            _ => "HEAD".to_string(),
        };

        self.push_refspecs(remote, &[format!("{}:refs/heads/{}", source, branch)])
    }

    fn push_tags(&self, remote: &str, tags: &[&str]) -> Result<()> {
        let refspecs: Vec<String> = tags
            .iter()
            .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
            .collect();

        self.push_refspecs(remote, &refspecs)
    }
}
