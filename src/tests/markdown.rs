use super::MarkdownFormat;
use crate::formats::Format;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case("```", "```" ; "backticks")]
#[test_case("```ruby", "```" ; "info string dropped")]
#[test_case("  ~~~~", "  ~~~~" ; "indented tildes keep run length")]
fn test_closing_fence(opener: &str, expected: &str) {
    assert_eq!(MarkdownFormat.closing_fence(opener), expected);
}

#[test]
fn test_heading_strips_closing_hashes() {
    assert_eq!(MarkdownFormat.heading("### Added ###"), Some((3, "Added")));
    assert_eq!(MarkdownFormat.heading("## "), None);
    assert_eq!(MarkdownFormat.heading("#tag"), None);
}
