//! Tests for extractor.rs

use explorer_shared::extractor::{extract_idea, IdeaExtractor};

#[test]
fn test_marker_found_collects_following_lines() {
    let response = "\
Some preamble about the spiral.

## PHASE 3: GENERATE FROM THE EDGE (Initial Idea)

   Calibration loops are closed curves.   

They can be opened by an external clock.
";
    assert_eq!(
        extract_idea(response),
        "Calibration loops are closed curves.\nThey can be opened by an external clock."
    );
}

#[test]
fn test_marker_match_is_case_insensitive() {
    let response = "intro\n### novel idea\nIdea line one\n";
    assert_eq!(extract_idea(response), "Idea line one");
}

#[test]
fn test_no_marker_returns_trimmed_input() {
    let response = "\n\n  A bold idea with no headers.  \n";
    assert_eq!(extract_idea(response), "A bold idea with no headers.");
}

#[test]
fn test_marker_with_nothing_after_falls_back() {
    let response = "Thinking...\n## PHASE 3\n\n   \n";
    assert_eq!(extract_idea(response), response.trim());
}

#[test]
fn test_custom_markers() {
    let extractor = IdeaExtractor::new(vec!["RESULT".to_string()]);
    let response = "## PHASE 3\nnot this\n== result ==\nthis one\n";
    assert_eq!(extractor.extract(response), "this one");
}

#[test]
fn test_extract_is_total_on_nonempty_input() {
    let inputs = [
        "x",
        " ",
        "\n\n",
        "PHASE 3",
        "phase 3\n\n",
        "Novel Idea:\n\t\n",
        "ERROR: request timed out",
        "multi\nline\ntext",
    ];
    for input in inputs {
        assert!(!extract_idea(input).is_empty(), "empty result for {:?}", input);
    }
}
