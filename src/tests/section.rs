use super::{branch_end, build_sections, find_section, heading_key, unclosed_fence, Section};
use crate::formats::markdown::MarkdownFormat;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn test_sections_in_document_order() {
    let doc = lines("# Title\n\nintro\n\n## Install\n\nsteps\n\n### From source\n\n## Usage\n");
    let sections = build_sections(&doc, &MarkdownFormat);

    let summary: Vec<(usize, usize, &str)> = sections
        .iter()
        .map(|s| (s.start_line, s.level, s.key.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, 1, "title"),
            (4, 2, "install"),
            (8, 3, "from source"),
            (10, 2, "usage"),
        ]
    );
    assert_eq!(sections[1].heading, "## Install");
}

#[test]
fn test_headings_inside_fences_are_ignored() {
    let doc = lines("## Real\n\n```markdown\n## Fake\n```\n\n## Also real\n");
    let sections = build_sections(&doc, &MarkdownFormat);

    let keys: Vec<&str> = sections.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["real", "also real"]);
}

#[test]
fn test_unterminated_fence_hides_rest_of_document() {
    let doc = lines("## Before\n\n~~~\n## Hidden\n\n## Still hidden\n");
    let sections = build_sections(&doc, &MarkdownFormat);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].key, "before");
}

#[test]
fn test_branch_includes_descendants() {
    let doc = lines("# A\n## B\ntext\n### C\nmore\n## D\nend");
    let sections = build_sections(&doc, &MarkdownFormat);

    assert_eq!(branch_end(&sections, 0, doc.len()), 6, "top level runs to the end");
    assert_eq!(branch_end(&sections, 1, doc.len()), 4, "B owns C");
    assert_eq!(branch_end(&sections, 2, doc.len()), 4, "C stops at D");
    assert_eq!(branch_end(&sections, 3, doc.len()), 6);
    assert_eq!(Section::branch(&sections, 1, doc.len()), 1..=4);
}

#[test]
fn test_branch_end_matches_next_shallower_section() {
    let levels = [2, 3, 4, 3, 2, 4, 1];
    let doc: Vec<String> = levels
        .iter()
        .map(|level| format!("{} heading", "#".repeat(*level)))
        .collect();
    let borrowed: Vec<&str> = doc.iter().map(String::as_str).collect();
    let sections = build_sections(&borrowed, &MarkdownFormat);

    for (i, section) in sections.iter().enumerate() {
        let expected = sections[i + 1..]
            .iter()
            .find(|next| next.level <= section.level)
            .map_or(doc.len() - 1, |next| next.start_line - 1);
        assert_eq!(branch_end(&sections, i, doc.len()), expected, "section {i}");
    }
}

#[test]
fn test_adjacent_headings_have_empty_body() {
    let doc = lines("## One\n## Two");
    let sections = build_sections(&doc, &MarkdownFormat);

    assert_eq!(branch_end(&sections, 0, doc.len()), 0);
}

#[test_case("Synopsis", "synopsis" ; "plain")]
#[test_case("**Basic   Usage**", "basic usage" ; "emphasis and spacing")]
#[test_case("🍲 Kettle Soup", "kettle soup" ; "leading emoji")]
#[test_case("[Unreleased]", "unreleased" ; "brackets")]
#[test_case("Note: read this", "note: read this" ; "inner punctuation kept")]
fn test_heading_key(text: &str, expected: &str) {
    assert_eq!(heading_key(text), expected);
}

#[test]
fn test_find_section_first_occurrence() {
    let doc = lines("## Usage\n## Other\n## Usage");
    let sections = build_sections(&doc, &MarkdownFormat);

    assert_eq!(find_section(&sections, "usage"), Some(0));
    assert_eq!(find_section(&sections, "missing"), None);
}

#[test]
fn test_hash_without_space_is_not_a_heading() {
    let doc = lines("#hashtag\n####### seven\n## ok ##");
    let sections = build_sections(&doc, &MarkdownFormat);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].key, "ok");
}

#[test]
fn test_unclosed_fence() {
    assert_eq!(unclosed_fence(&lines("text\n```ruby\ncode"), &MarkdownFormat), Some("```ruby"));
    assert_eq!(unclosed_fence(&lines("```\ncode\n```"), &MarkdownFormat), None);
    assert_eq!(
        unclosed_fence(&lines("```\n```\n  ~~~\nmore"), &MarkdownFormat),
        Some("  ~~~")
    );
}
