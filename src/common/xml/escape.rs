use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Unescape XML special characters.
///
/// Replaces the five standard XML entities with their corresponding characters.
/// Unknown or malformed entities are left unchanged. The reader falls back to
/// this when strict unescaping rejects an attribute value, which happens with
/// HTML entities such as `&nbsp;` that authoring tools leave in titles.
///
/// # Examples
///
/// ```
/// use scorm_manifest::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("Intro&nbsp;&amp; Basics"), "Intro&nbsp;& Basics");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}
