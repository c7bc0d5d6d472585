//! Changelog splicing.
//!
//! The changelog is treated as a plain sequence of lines with a two-line
//! header (`# Changelog` and a blank line). A new release entry always goes
//! in at [`ENTRY_OFFSET`], directly above the previous release.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Line index the release title is inserted at.
///
/// Title goes to `ENTRY_OFFSET`, the excerpt to `ENTRY_OFFSET + 1` and a blank
/// separator to `ENTRY_OFFSET + 2`.
pub const ENTRY_OFFSET: usize = 2;

// Whole lines, single digit per segment; "-   Releasing v2.0.10" and
// "-   Releasing v2.0.0 (#34)" are left alone.
static BOILERPLATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^-   Releasing v\d\.\d\.\d[ \t]*\r?(?:\n|$)").unwrap()
});

/// Excerpt with the boilerplate release line taken out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedExcerpt {
    pub text: String,
    pub removed: usize,
}

/// Removes `-   Releasing vD.D.D` lines from a changelog excerpt.
///
/// Each removed line takes its own line ending with it. When the last line of
/// the excerpt is removed, the line break in front of it goes too. Everything
/// else is kept byte for byte. No match is not an error.
pub fn clean_excerpt(excerpt: &str) -> CleanedExcerpt {
    let matches: Vec<_> = BOILERPLATE_LINE.find_iter(excerpt).collect();
    let Some(last) = matches.last() else {
        return CleanedExcerpt {
            text: excerpt.to_string(),
            removed: 0,
        };
    };
    let removed_final_line = last.end() == excerpt.len() && !last.as_str().ends_with('\n');

    let mut text = BOILERPLATE_LINE.replace_all(excerpt, "").into_owned();
    if removed_final_line {
        if let Some(rest) = text.strip_suffix('\n') {
            let rest = rest.strip_suffix('\r').unwrap_or(rest);
            text.truncate(rest.len());
        }
    }

    CleanedExcerpt {
        text,
        removed: matches.len(),
    }
}

/// `## <version> (<YYYY-MM-DD>)`
pub fn release_title(bare_version: &str, date: NaiveDate) -> String {
    format!("## {} ({})", bare_version, date.format("%Y-%m-%d"))
}

/// A changelog file as an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    lines: Vec<String>,
}

impl ChangelogDocument {
    pub fn parse(text: &str) -> Self {
        ChangelogDocument {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Inserts title, excerpt block and a blank line at [`ENTRY_OFFSET`].
    ///
    /// The excerpt is inserted as one element even if it spans several lines.
    /// When the document is shorter than the offset the entry is appended
    /// instead, and `false` is returned so the caller can warn about it.
    pub fn insert_release(&mut self, title: &str, excerpt: &str) -> bool {
        let in_place = self.lines.len() >= ENTRY_OFFSET;
        let at = ENTRY_OFFSET.min(self.lines.len());

        let entry = [title.to_string(), excerpt.to_string(), String::new()];
        self.lines.splice(at..at, entry);

        in_place
    }
}

impl std::fmt::Display for ChangelogDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Result of splicing one release into a changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicedChangelog {
    pub excerpt: CleanedExcerpt,
    pub text: String,
    /// Entry landed at the end because the document was too short
    pub appended: bool,
    pub original_lines: usize,
}

/// Runs the whole splice: title, excerpt cleanup, insertion, re-join.
pub fn splice(
    changelog: &str,
    bare_version: &str,
    date: NaiveDate,
    excerpt: &str,
) -> SplicedChangelog {
    let title = release_title(bare_version, date);
    let cleaned = clean_excerpt(excerpt);

    let mut document = ChangelogDocument::parse(changelog);
    let original_lines = document.len();
    let in_place = document.insert_release(&title, &cleaned.text);

    SplicedChangelog {
        text: document.to_string(),
        excerpt: cleaned,
        appended: !in_place,
        original_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_release_title_format() {
        assert_eq!(release_title("2.0.1", date()), "## 2.0.1 (2024-03-09)");
    }

    #[test]
    fn test_clean_excerpt_removes_boilerplate_line() {
        let cleaned = clean_excerpt("-   Releasing v2.0.0\n-   Fixed a bug");
        assert_eq!(cleaned.text, "-   Fixed a bug");
        assert_eq!(cleaned.removed, 1);
    }

    #[test]
    fn test_clean_excerpt_boilerplate_in_middle() {
        let cleaned = clean_excerpt("-   Added X\n-   Releasing v1.2.3\n-   Fixed Y");
        assert_eq!(cleaned.text, "-   Added X\n-   Fixed Y");
    }

    #[test]
    fn test_clean_excerpt_boilerplate_last() {
        let cleaned = clean_excerpt("-   Added X\n-   Releasing v1.2.3");
        assert_eq!(cleaned.text, "-   Added X");
    }

    #[test]
    fn test_clean_excerpt_no_match_is_unchanged() {
        let excerpt = "\n-   Added X\n-   Fixed Y\n";
        let cleaned = clean_excerpt(excerpt);
        assert_eq!(cleaned.text, excerpt);
        assert_eq!(cleaned.removed, 0);
    }

    #[test]
    fn test_clean_excerpt_ignores_multi_digit_versions() {
        let excerpt = "-   Releasing v2.0.10\n-   Fixed a bug";
        assert_eq!(clean_excerpt(excerpt).text, excerpt);
    }

    #[test]
    fn test_clean_excerpt_keeps_release_line_with_suffix() {
        let excerpt = "-   Releasing v2.0.0 (#34)\n-   Fixed a bug";
        let cleaned = clean_excerpt(excerpt);
        assert_eq!(cleaned.text, excerpt);
        assert_eq!(cleaned.removed, 0);
    }

    #[test]
    fn test_clean_excerpt_requires_bullet_spacing() {
        let excerpt = "- Releasing v2.0.0";
        assert_eq!(clean_excerpt(excerpt).removed, 0);
    }

    #[test]
    fn test_clean_excerpt_only_boilerplate() {
        let cleaned = clean_excerpt("-   Releasing v0.0.1");
        assert_eq!(cleaned.text, "");
        assert_eq!(cleaned.removed, 1);
    }

    #[test]
    fn test_clean_excerpt_keeps_trailing_newline() {
        let cleaned = clean_excerpt("-   Releasing v2.0.0\n-   Fixed a bug\n");
        assert_eq!(cleaned.text, "-   Fixed a bug\n");
        assert_eq!(cleaned.text, clean_excerpt("-   Fixed a bug\n").text);
    }

    #[test]
    fn test_clean_excerpt_keeps_leading_blank_lines() {
        let cleaned = clean_excerpt("\n\n-   Added X\n-   Releasing v1.2.3\n-   Fixed Y");
        assert_eq!(cleaned.text, "\n\n-   Added X\n-   Fixed Y");
    }

    #[test]
    fn test_clean_excerpt_boilerplate_last_keeps_blank_line_before() {
        let cleaned = clean_excerpt("-   Added X\n\n-   Releasing v1.2.3");
        assert_eq!(cleaned.text, "-   Added X\n");
    }

    #[test]
    fn test_clean_excerpt_crlf() {
        let cleaned = clean_excerpt("-   Releasing v1.0.0\r\n-   Fixed");
        assert_eq!(cleaned.text, "-   Fixed");
    }

    #[test]
    fn test_insert_release_at_offset() {
        let mut doc = ChangelogDocument::parse("# Changelog\n\n## 1.0.0 (2024-01-01)\n-   Init");
        assert!(doc.insert_release("## 1.1.0 (2024-03-09)", "-   New"));

        let lines = doc.lines();
        assert_eq!(lines[0], "# Changelog");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "## 1.1.0 (2024-03-09)");
        assert_eq!(lines[3], "-   New");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "## 1.0.0 (2024-01-01)");
        assert_eq!(lines[6], "-   Init");
    }

    #[test]
    fn test_insert_multiline_excerpt_is_one_element() {
        let mut doc = ChangelogDocument::parse("# Changelog\n\n## 1.0.0");
        doc.insert_release("## 1.1.0", "-   A\n-   B");
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.lines()[3], "-   A\n-   B");
        assert_eq!(doc.to_string(), "# Changelog\n\n## 1.1.0\n-   A\n-   B\n\n## 1.0.0");
    }

    #[test]
    fn test_insert_into_short_document_appends() {
        let mut doc = ChangelogDocument::parse("# Changelog");
        assert!(!doc.insert_release("## 1.0.0", "-   First"));
        assert_eq!(doc.to_string(), "# Changelog\n## 1.0.0\n-   First\n");
    }

    #[test]
    fn test_insert_into_empty_document() {
        // "" splits into one empty line
        let mut doc = ChangelogDocument::parse("");
        assert_eq!(doc.len(), 1);
        assert!(!doc.insert_release("## 1.0.0", "-   First"));
        assert_eq!(doc.to_string(), "\n## 1.0.0\n-   First\n");
    }

    #[test]
    fn test_two_line_document_is_in_place() {
        let mut doc = ChangelogDocument::parse("# Changelog\n");
        assert!(doc.insert_release("## 1.0.0", "-   First"));
        assert_eq!(doc.to_string(), "# Changelog\n\n## 1.0.0\n-   First\n");
    }

    #[test]
    fn test_trailing_newline_preserved() {
        let doc = ChangelogDocument::parse("# Changelog\n\n## 1.0.0\n");
        assert_eq!(doc.to_string(), "# Changelog\n\n## 1.0.0\n");
    }

    #[test]
    fn test_splice_keeps_other_lines_in_order() {
        let original = "# Changelog\n\n## 2.0.0 (2024-01-01)\n-   A\n\n## 1.0.0 (2023-01-01)\n-   B";
        let spliced = splice(original, "2.0.1", date(), "-   Releasing v2.0.0\n-   Fixed a bug");

        let before: Vec<&str> = original.split('\n').collect();
        let after: Vec<&str> = spliced.text.split('\n').collect();

        assert_eq!(after[2], "## 2.0.1 (2024-03-09)");
        assert_eq!(after[3], "-   Fixed a bug");
        assert_eq!(after[4], "");
        assert_eq!(&after[..2], &before[..2]);
        assert_eq!(&after[5..], &before[2..]);
        assert!(!spliced.appended);
        assert_eq!(spliced.excerpt.text, "-   Fixed a bug");
    }

    #[test]
    fn test_splice_reports_append() {
        let spliced = splice("# Changelog", "1.0.0", date(), "-   First");
        assert!(spliced.appended);
        assert_eq!(spliced.original_lines, 1);
    }
}
