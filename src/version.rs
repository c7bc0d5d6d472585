/// Prefix GitHub puts in front of tag names in `GITHUB_REF`.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// A release version as received, plus the forms derived from it.
///
/// - `raw`: exactly what the caller passed (`refs/tags/v1.2.3`)
/// - `tag`: ref prefix removed (`v1.2.3`); names the tag and the commit
/// - `bare`: leading `v` removed as well (`1.2.3`); goes into manifests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    pub raw: String,
    pub tag: String,
    pub bare: String,
}

impl ReleaseVersion {
    /// Normalizes a raw version string.
    ///
    /// Purely textual: strips `refs/tags/` if present, then a single leading
    /// `v`. Whatever survives is accepted as-is.
    ///
    /// # Example
    /// ```
    /// use release_bump::version::ReleaseVersion;
    ///
    /// let v = ReleaseVersion::parse("refs/tags/v1.2.3");
    /// assert_eq!(v.tag, "v1.2.3");
    /// assert_eq!(v.bare, "1.2.3");
    /// ```
    pub fn parse(raw: &str) -> Self {
        let tag = raw.strip_prefix(TAG_REF_PREFIX).unwrap_or(raw);
        let bare = tag.strip_prefix('v').unwrap_or(tag);

        ReleaseVersion {
            raw: raw.to_string(),
            tag: tag.to_string(),
            bare: bare.to_string(),
        }
    }

    /// Whether the bare form is a valid semantic version.
    ///
    /// Only used to warn; a non-semver version still goes through.
    pub fn is_semver(&self) -> bool {
        semver::Version::parse(&self.bare).is_ok()
    }
}

impl std::fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag)
    }
}
