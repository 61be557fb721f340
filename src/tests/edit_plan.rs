use super::{Edit, EditPlan};
use pretty_assertions::assert_eq;

#[test]
fn test_single_replacement() {
    let plan = EditPlan {
        edits: vec![Edit::replace(6, 12, "there")],
    };

    assert_eq!(plan.apply("Hello, world!"), "Hello,there!");
}

#[test]
fn test_edits_applied_from_highest_offset() {
    // Offsets refer to the original buffer; applying the first edit first would shift the second.
    let plan = EditPlan {
        edits: vec![Edit::replace(0, 1, "AAAA"), Edit::replace(4, 5, "E")],
    };

    assert_eq!(plan.apply("abcdefg"), "AAAAbcdEfg");
}

#[test]
fn test_insertions_at_same_offset_keep_collection_order() {
    let plan = EditPlan {
        edits: vec![
            Edit::insert(3, "1"),
            Edit::insert(3, "2"),
            Edit::insert(3, "3"),
        ],
    };

    assert_eq!(plan.apply("abcdef"), "abc123def");
}

#[test]
fn test_removal() {
    let plan = EditPlan {
        edits: vec![Edit::remove(2, 5)],
    };

    assert_eq!(plan.apply("line\nnext"), "linext");
}

#[test]
fn test_out_of_range_edits_are_skipped() {
    let plan = EditPlan {
        edits: vec![
            Edit::replace(100, 101, "x"),
            Edit {
                offset: 2,
                length: usize::MAX,
                replacement: "y".to_string(),
            },
            Edit::insert(0, ">"),
        ],
    };

    assert_eq!(plan.apply("abc"), ">abc");
}

#[test]
fn test_byte_offsets_after_multibyte_text() {
    let source = "🍲 soup = \"old\"";
    let start = source.find("old").unwrap();
    let plan = EditPlan {
        edits: vec![Edit::replace(start, start + 3, "new")],
    };

    assert_eq!(plan.apply(source), "🍲 soup = \"new\"");
}

#[test]
fn test_edit_splitting_a_character_is_skipped() {
    // Offset 1 lands inside the four-byte emoji.
    let plan = EditPlan {
        edits: vec![Edit::replace(1, 2, "x"), Edit::insert(4, "!")],
    };

    assert_eq!(plan.apply("🍲ab"), "🍲!ab");
}

#[test]
fn test_overlapping_edit_is_skipped() {
    let plan = EditPlan {
        edits: vec![Edit::replace(0, 4, "X"), Edit::replace(2, 6, "Y")],
    };

    assert_eq!(plan.apply("abcdefgh"), "abYgh");
}

#[test]
fn test_plan_round_trips_through_json() {
    let plan = EditPlan {
        edits: vec![Edit::insert(3, "x"), Edit::remove(0, 1)],
    };

    let json = serde_json::to_string(&plan).unwrap();
    let loaded: EditPlan = serde_json::from_str(&json).unwrap();

    assert_eq!(loaded, plan);
    assert!(json.contains("\"replacement\":\"x\""));
}

#[test]
fn test_empty_plan_is_identity() {
    let plan = EditPlan::default();
    assert!(plan.is_empty());
    assert_eq!(plan.apply("unchanged"), "unchanged");
}
