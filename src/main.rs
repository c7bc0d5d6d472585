use anyhow::{Context, Result};
use clap::Parser;

use release_bump::cli::{run_release_workflow, ReleaseWorkflowArgs};
use release_bump::config::{self, ReleaseInputs, TagDeletion};
use release_bump::git::Git2Repository;
use release_bump::ui::ReporterKind;

#[derive(clap::Parser)]
#[command(
    name = "release-bump",
    version,
    about = "Bump project versions, update the changelog, then commit, tag and push the release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long = "version-ref",
        env = "INPUT_VERSION",
        help = "Release version, e.g. refs/tags/v1.2.3 or v1.2.3"
    )]
    version_ref: String,

    #[arg(
        long,
        env = "INPUT_CHANGELOG",
        default_value = "",
        help = "Changelog excerpt for this release"
    )]
    changelog: String,

    #[arg(long, default_value = ".", help = "Repository root")]
    repo: String,

    #[arg(long, help = "Product name used in config.json's name field")]
    product_name: Option<String>,

    #[arg(short, long, help = "Remote branch to push the release to")]
    branch: Option<String>,

    #[arg(long, help = "Remote to pull from and push to")]
    remote: Option<String>,

    #[arg(long, help = "Fail when the tag to delete does not exist")]
    strict_tags: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, value_enum, default_value = "auto", help = "Where progress is reported")]
    reporter: ReporterKind,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let reporter = args.reporter.build();

    if let Err(e) = run(args, reporter.as_ref()) {
        reporter.set_failed(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args, reporter: &dyn release_bump::ui::Reporter) -> Result<()> {
    let repo = Git2Repository::open(&args.repo)
        .with_context(|| format!("Not in a git repository: {}", args.repo))?;

    let root = repo
        .workdir()
        .map(|p| p.to_path_buf())
        .context("Repository has no working directory")?;

    let mut config = config::load_config(args.config.as_deref(), &root)?;
    if let Some(name) = args.product_name {
        config.product_name = Some(name);
    }
    if let Some(branch) = args.branch {
        config.git.branch = branch;
    }
    if let Some(remote) = args.remote {
        config.git.remote = remote;
    }
    if args.strict_tags {
        config.git.tag_deletion = TagDeletion::Strict;
    }

    let token = std::env::var(&config.git.token_env).ok();
    let repo = repo.with_token(token);

    let workflow_args = ReleaseWorkflowArgs {
        root,
        inputs: ReleaseInputs::new(args.version_ref, args.changelog),
        date: chrono::Utc::now().date_naive(),
        dry_run: args.dry_run,
    };

    let result = run_release_workflow(&workflow_args, &config, &repo, reporter)?;

    if result.pushed {
        reporter.success(&format!("Released {} ({})", result.tag, result.version));
    } else {
        reporter.info(&format!("Dry run for {} complete, nothing changed", result.tag));
    }
    Ok(())
}
