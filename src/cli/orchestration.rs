//! Release workflow orchestration
//!
//! Runs the release end to end against any [ReleaseRepository] and
//! [Reporter], so the binary and the tests share the same path:
//!
//! 1. Normalize the version
//! 2. Pull the remote branch (optional)
//! 3. Load and mutate the project files in memory
//! 4. Publish the cleaned changelog excerpt
//! 5. Write the files
//! 6. Commit, re-tag and push

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use crate::boundary::ReleaseWarning;
use crate::committer::{commit_message, ReleaseCommitter};
use crate::config::{Config, ReleaseInputs};
use crate::error::Result;
use crate::git::{PullOutcome, ReleaseRepository};
use crate::plan::ReleasePlan;
use crate::ui::{self, Reporter};
use crate::version::ReleaseVersion;

/// Name of the output carrying the cleaned changelog excerpt.
pub const CHANGELOG_OUTPUT: &str = "changelog";

/// Arguments for the release workflow
///
/// Decoupled from clap so the workflow can be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Repository root the project files live under
    pub root: PathBuf,

    pub inputs: ReleaseInputs,

    /// Date stamped on the changelog entry
    pub date: NaiveDate,

    /// Compute and report everything, write and push nothing
    pub dry_run: bool,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Tag created for the release, e.g. `v1.2.3`
    pub tag: String,

    /// Version written into the manifests, e.g. `1.2.3`
    pub version: String,

    /// Cleaned changelog excerpt
    pub changelog: String,

    /// Release commit id, `None` on dry runs
    pub commit: Option<String>,

    /// Whether the commit and tag were pushed
    pub pushed: bool,
}

/// Main release workflow
///
/// Any error aborts the remaining steps. Files already written stay written;
/// all file contents are computed before the first write and git mutations
/// start only after every write succeeded.
pub fn run_release_workflow<R, P>(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    repo: &R,
    reporter: &P,
) -> Result<WorkflowResult>
where
    R: ReleaseRepository + ?Sized,
    P: Reporter + ?Sized,
{
    args.inputs.validate()?;
    let version = ReleaseVersion::parse(&args.inputs.version);
    debug!(raw = %version.raw, tag = %version.tag, bare = %version.bare, "Normalized version");

    reporter.info("");

    if config.git.pull && !args.dry_run {
        ui::group(reporter, "Checkout code", || {
            let outcome = repo.pull(&config.git.remote, &config.git.branch)?;
            match outcome {
                PullOutcome::Diverged => reporter.warning(&ReleaseWarning::BranchDiverged {
                    remote: config.git.remote.clone(),
                    branch: config.git.branch.clone(),
                }),
                PullOutcome::RemoteBranchMissing => {
                    reporter.warning(&ReleaseWarning::RemoteBranchMissing {
                        remote: config.git.remote.clone(),
                        branch: config.git.branch.clone(),
                    })
                }
                PullOutcome::UpToDate | PullOutcome::FastForwarded => {}
            }
            reporter.info("Latest changes pulled");
            Ok(())
        })?;
    }

    reporter.info("Read files from filesystem");
    let plan = ui::group(reporter, "Update files", || {
        let plan = ReleasePlan::prepare(
            &args.root,
            config,
            &version,
            &args.inputs.changelog,
            args.date,
        )?;
        for warning in &plan.warnings {
            reporter.warning(warning);
        }
        reporter.info(&format!("Updated {}", config.files.package));
        reporter.info(&format!("Updated {}", config.files.config));
        reporter.info(&format!("Updated {}", config.files.changelog));
        Ok(plan)
    })?;

    reporter.set_output(CHANGELOG_OUTPUT, plan.cleaned_excerpt())?;
    let rendered = plan.render()?;

    if args.dry_run {
        ui::group(reporter, "Dry run", || {
            for (path, _) in &rendered.files {
                reporter.info(&format!("Would write {}", path.display()));
            }
            reporter.info(&format!("Would commit '{}'", commit_message(&version)));
            reporter.info(&format!(
                "Would tag {} and push to {}/{}",
                version.tag, config.git.remote, config.git.branch
            ));
            Ok(())
        })?;

        return Ok(WorkflowResult {
            tag: version.tag,
            version: version.bare,
            changelog: plan.cleaned_excerpt().to_string(),
            commit: None,
            pushed: false,
        });
    }

    ui::group(reporter, "Write files", || {
        rendered.write(|path| reporter.info(&format!("Wrote {}", path.display())))
    })?;

    let commit = ui::group(reporter, "Commit changes", || {
        ReleaseCommitter::new(repo, reporter, &config.git, &version).run()
    })?;

    Ok(WorkflowResult {
        tag: version.tag,
        version: version.bare,
        changelog: plan.cleaned_excerpt().to_string(),
        commit: Some(commit.to_string()),
        pushed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::ui::MemoryReporter;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "leffot", "version": "2.0.0"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"name": "Leffot (v2.0.0)", "version": "2.0.0"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("CHANGELOG.md"),
            "# Changelog\n\n## 2.0.0 (2024-01-01)\n-   Init\n",
        )
        .unwrap();
        dir
    }

    fn args(dir: &TempDir, dry_run: bool) -> ReleaseWorkflowArgs {
        ReleaseWorkflowArgs {
            root: dir.path().to_path_buf(),
            inputs: ReleaseInputs::new("refs/tags/v2.0.1", "-   Releasing v2.0.0\n-   Fixed a bug"),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            dry_run,
        }
    }

    fn config() -> Config {
        Config {
            product_name: Some("Leffot".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_pull_happens_before_git_mutations() {
        let dir = project();
        let repo = MockRepository::new().with_tag("v2.0.1");
        let reporter = MemoryReporter::new();

        let result = run_release_workflow(&args(&dir, false), &config(), &repo, &reporter).unwrap();

        assert_eq!(repo.op_kinds()[0], "pull");
        assert!(result.pushed);
        assert_eq!(result.tag, "v2.0.1");
        assert_eq!(result.version, "2.0.1");
        assert_eq!(
            reporter.groups(),
            vec!["Checkout code", "Update files", "Write files", "Commit changes"]
        );
    }

    #[test]
    fn test_output_is_cleaned_excerpt() {
        let dir = project();
        let repo = MockRepository::new().with_tag("v2.0.1");
        let reporter = MemoryReporter::new();

        run_release_workflow(&args(&dir, false), &config(), &repo, &reporter).unwrap();

        assert_eq!(reporter.output(CHANGELOG_OUTPUT).as_deref(), Some("-   Fixed a bug"));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = project();
        let repo = MockRepository::new();
        let reporter = MemoryReporter::new();

        let result = run_release_workflow(&args(&dir, true), &config(), &repo, &reporter).unwrap();

        assert!(repo.ops().is_empty());
        assert!(!result.pushed);
        assert_eq!(result.commit, None);
        assert_eq!(result.changelog, "-   Fixed a bug");
        let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(!changelog.contains("2.0.1"));
    }

    #[test]
    fn test_bad_manifest_aborts_before_any_write_or_commit() {
        let dir = project();
        fs::write(dir.path().join("config.json"), "{ broken").unwrap();
        let repo = MockRepository::new().with_tag("v2.0.1");
        let reporter = MemoryReporter::new();

        assert!(run_release_workflow(&args(&dir, false), &config(), &repo, &reporter).is_err());
        assert_eq!(repo.op_kinds(), vec!["pull"]);
        let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(package.contains("2.0.0"));
    }

    #[test]
    fn test_diverged_pull_only_warns() {
        let dir = project();
        let repo = MockRepository::new()
            .with_tag("v2.0.1")
            .with_pull_outcome(PullOutcome::Diverged);
        let reporter = MemoryReporter::new();

        run_release_workflow(&args(&dir, false), &config(), &repo, &reporter).unwrap();

        assert!(reporter.warnings().contains(&ReleaseWarning::BranchDiverged {
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }));
    }

    #[test]
    fn test_pull_can_be_disabled() {
        let dir = project();
        let repo = MockRepository::new().with_tag("v2.0.1");
        let reporter = MemoryReporter::new();
        let mut config = config();
        config.git.pull = false;

        run_release_workflow(&args(&dir, false), &config, &repo, &reporter).unwrap();
        assert!(!repo.op_kinds().contains(&"pull"));
    }

    #[test]
    fn test_empty_version_is_rejected() {
        let dir = project();
        let repo = MockRepository::new();
        let reporter = MemoryReporter::new();
        let mut args = args(&dir, false);
        args.inputs.version = String::new();

        assert!(run_release_workflow(&args, &config(), &repo, &reporter).is_err());
        assert!(repo.ops().is_empty());
    }
}
