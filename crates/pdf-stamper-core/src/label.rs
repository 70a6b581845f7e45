//! Label derivation from the first document's origin name.
//!
//! A name containing a `<digits>-<digits>` run yields `"<digits>/<digits>"`
//! from the leftmost such run. Any other name is used as-is, minus one
//! trailing `.pdf` extension.

use std::sync::LazyLock;

use regex::Regex;

/// ASCII digit groups joined by a hyphen. Leftmost-first matching picks the
/// first run in the name.
#[allow(clippy::expect_used)] // Pattern is a literal and known to compile
static DIGIT_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([0-9]+)-([0-9]+)").expect("digit pair pattern is valid"));

const PDF_EXTENSION: &str = ".pdf";

/// Derive the stamp label from a source document's origin name.
pub fn derive_label(name: &str) -> String {
    if let Some(caps) = DIGIT_PAIR.captures(name)
        && let (Some(first), Some(second)) = (caps.get(1), caps.get(2))
    {
        return format!("{}/{}", first.as_str(), second.as_str());
    }

    name.strip_suffix(PDF_EXTENSION).unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_pair() {
        assert_eq!(derive_label("scan-12-34.pdf"), "12/34");
        assert_eq!(derive_label("flight-10-20.pdf"), "10/20");
    }

    #[test]
    fn test_leading_zeros_kept() {
        assert_eq!(derive_label("invoice-001-099-copy.pdf"), "001/099");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(derive_label("a-1-2-b-3-4.pdf"), "1/2");
        assert_eq!(derive_label("12-34-56.pdf"), "12/34");
        assert_eq!(derive_label("report-12-34-final.pdf"), "12/34");
    }

    #[test]
    fn test_fallback_strips_extension() {
        assert_eq!(derive_label("report.pdf"), "report");
        assert_eq!(derive_label("report"), "report");
    }

    #[test]
    fn test_fallback_only_strips_trailing_extension() {
        assert_eq!(derive_label("my.pdf.backup"), "my.pdf.backup");
        assert_eq!(derive_label("a.pdf.pdf"), "a.pdf");
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        assert_eq!(derive_label("REPORT.PDF"), "REPORT.PDF");
    }

    #[test]
    fn test_hyphen_without_digits_on_both_sides() {
        assert_eq!(derive_label("page-7.pdf"), "page-7");
        assert_eq!(derive_label("7-page.pdf"), "7-page");
        assert_eq!(derive_label("1--2.pdf"), "1--2");
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        // Arabic-Indic digits are not part of the pattern
        assert_eq!(derive_label("\u{0661}-\u{0662}.pdf"), "\u{0661}-\u{0662}");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(derive_label(""), "");
        assert_eq!(derive_label(".pdf"), "");
    }
}
