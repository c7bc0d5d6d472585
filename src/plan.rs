//! Everything a release writes, computed before anything is written.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::boundary::ReleaseWarning;
use crate::changelog::{self, SplicedChangelog};
use crate::config::{Config, FilesConfig};
use crate::error::{ReleaseError, Result};
use crate::manifest::JsonManifest;
use crate::version::ReleaseVersion;

/// `package.json` fields tried, in order, for the product name.
const PRODUCT_NAME_FIELDS: [&str; 2] = ["productName", "name"];

/// The three mutated files, held in memory.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub version: ReleaseVersion,
    pub package: JsonManifest,
    pub config: JsonManifest,
    pub changelog_path: PathBuf,
    pub changelog: SplicedChangelog,
    pub warnings: Vec<ReleaseWarning>,
}

impl ReleasePlan {
    /// Loads the project files under `root` and applies the release to them.
    ///
    /// Fails on a missing/unreadable file, on a manifest that is not a JSON
    /// object, or when no product name can be found. Nothing is written.
    pub fn prepare(
        root: &Path,
        config: &Config,
        version: &ReleaseVersion,
        excerpt: &str,
        date: NaiveDate,
    ) -> Result<Self> {
        let files = ProjectFiles::resolve(root, &config.files);

        let mut package = JsonManifest::load(&files.package)?;
        let mut project_config = JsonManifest::load(&files.config)?;
        let changelog_text = fs::read_to_string(&files.changelog)
            .map_err(|e| ReleaseError::file(files.changelog.display().to_string(), e))?;

        let product = product_name(config, &package)?;
        debug!(product = %product, version = %version.bare, "Preparing release files");

        package.set_str("version", &version.bare);
        project_config.set_str("version", &version.bare);
        project_config.set_str("name", format!("{} ({})", product, version.tag));

        let spliced = changelog::splice(&changelog_text, &version.bare, date, excerpt);

        let mut warnings = Vec::new();
        if !version.is_semver() {
            warnings.push(ReleaseWarning::NonSemverVersion {
                version: version.bare.clone(),
            });
        }
        if spliced.excerpt.removed == 0 {
            warnings.push(ReleaseWarning::BoilerplateNotFound);
        }
        if spliced.appended {
            warnings.push(ReleaseWarning::ShortChangelog {
                lines: spliced.original_lines,
            });
        }

        Ok(ReleasePlan {
            version: version.clone(),
            package,
            config: project_config,
            changelog_path: files.changelog,
            changelog: spliced,
            warnings,
        })
    }

    /// The cleaned excerpt, published as the `changelog` output.
    pub fn cleaned_excerpt(&self) -> &str {
        &self.changelog.excerpt.text
    }

    /// Serializes both manifests up front so a bad value fails before any write.
    pub fn render(&self) -> Result<RenderedFiles> {
        Ok(RenderedFiles {
            files: vec![
                (self.package.path().to_path_buf(), self.package.to_pretty_string()?),
                (self.config.path().to_path_buf(), self.config.to_pretty_string()?),
                (self.changelog_path.clone(), self.changelog.text.clone()),
            ],
        })
    }
}

/// Final file contents, ready to be written in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFiles {
    pub files: Vec<(PathBuf, String)>,
}

impl RenderedFiles {
    /// Writes every file; stops at the first failure without rolling back.
    pub fn write<F>(&self, mut on_written: F) -> Result<()>
    where
        F: FnMut(&Path),
    {
        for (path, contents) in &self.files {
            fs::write(path, contents)
                .map_err(|e| ReleaseError::file(path.display().to_string(), e))?;
            on_written(path);
        }
        Ok(())
    }
}

/// Absolute paths of the release files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    pub package: PathBuf,
    pub config: PathBuf,
    pub changelog: PathBuf,
}

impl ProjectFiles {
    pub fn resolve(root: &Path, files: &FilesConfig) -> Self {
        ProjectFiles {
            package: root.join(&files.package),
            config: root.join(&files.config),
            changelog: root.join(&files.changelog),
        }
    }
}

/// Configured product name, else `productName`/`name` from `package.json`.
pub fn product_name(config: &Config, package: &JsonManifest) -> Result<String> {
    if let Some(name) = config.product_name.as_deref().filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }

    PRODUCT_NAME_FIELDS
        .iter()
        .find_map(|field| package.get_str(field).filter(|n| !n.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            ReleaseError::config(format!(
                "no product name configured and {} has no productName or name",
                package.path().display()
            ))
        })
}
