use super::{collapse_magic_comments, ensure_trailing_newline};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case("text", "text\n" ; "adds newline")]
#[test_case("text\n", "text\n" ; "keeps single newline")]
#[test_case("text\n\n\n", "text\n" ; "collapses trailing newlines")]
#[test_case("", "" ; "empty stays empty")]
#[test_case("\n\n", "" ; "only newlines")]
fn test_ensure_trailing_newline(input: &str, expected: &str) {
    assert_eq!(ensure_trailing_newline(input), expected);
}

#[test]
fn test_duplicate_pragma_collapsed() {
    let source = "# frozen_string_literal: true\n# frozen_string_literal: true\n\n\nrequire \"x\"\n";

    assert_eq!(
        collapse_magic_comments(source),
        "# frozen_string_literal: true\n\nrequire \"x\"\n"
    );
}

#[test]
fn test_distinct_pragmas_kept_in_order() {
    let source = "# frozen_string_literal: true\n# encoding: utf-8\n# frozen_string_literal: true\n\nputs 1\n";

    assert_eq!(
        collapse_magic_comments(source),
        "# frozen_string_literal: true\n# encoding: utf-8\n\nputs 1\n"
    );
}

#[test]
fn test_script_without_pragmas_unchanged() {
    let source = "# A plain comment\nrequire \"x\"\n\n\nputs 1\n";
    assert_eq!(collapse_magic_comments(source), source);
}

#[test]
fn test_pragmas_after_code_untouched() {
    let source = "puts 1\n# frozen_string_literal: true\n# frozen_string_literal: true\n";
    assert_eq!(collapse_magic_comments(source), source);
}
