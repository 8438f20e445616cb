//! Tests of the streaming behavior: chunked input determinism, per-character
//! updates, reset and position accounting.

use descan::{ContextBuilder, Match, Pattern, PatternId, ScannerContext};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const INPUT: &str =
    "Hi, here is my SSN is 444-42-1234 and  visa number is #4045124442700008, ok";

fn catalog_context() -> ScannerContext {
    ContextBuilder::new()
        .add_pattern(Pattern::new(
            PatternId::new(1, 1),
            "ssn".to_string(),
            "[[:digit:]]{3}[ -][[:digit:]]{2}[ -][[:digit:]]{4}".to_string(),
        ))
        .add_pattern(Pattern::new(
            PatternId::new(2, 1),
            "visa".to_string(),
            "4[[:digit:]]{3}([ -]?[[:digit:]]{4}){3}".to_string(),
        ))
        .build()
}

fn scan_whole(ctxt: &ScannerContext, input: &str) -> Vec<Match> {
    let mut scanner = ctxt.scanner();
    let mut matches = scanner.update(input);
    matches.extend(scanner.complete());
    matches
}

#[test]
fn test_chunked_input_yields_the_same_matches() {
    init();
    let ctxt = catalog_context();
    let reference = scan_whole(&ctxt, INPUT);
    assert_eq!(reference.len(), 2);

    let chars: Vec<char> = INPUT.chars().collect();
    for chunk_size in [1, 2, 3, 7, 13, 29] {
        let mut scanner = ctxt.scanner();
        let mut matches = Vec::new();
        for chunk in chars.chunks(chunk_size) {
            let chunk: String = chunk.iter().collect();
            matches.extend(scanner.update(&chunk));
        }
        matches.extend(scanner.complete());
        assert_eq!(matches, reference, "chunk size {}", chunk_size);
    }
}

#[test]
fn test_update_char_equals_update() {
    init();
    let ctxt = catalog_context();
    let reference = scan_whole(&ctxt, INPUT);

    let mut scanner = ctxt.scanner();
    let mut matches = Vec::new();
    for c in INPUT.chars() {
        matches.extend(scanner.update_char(c));
    }
    matches.extend(scanner.complete());
    assert_eq!(matches, reference);
}

#[test]
fn test_matches_arrive_as_soon_as_they_resolve() {
    init();
    let ctxt = catalog_context();
    let mut scanner = ctxt.scanner();
    // The ssn resolves at the space that follows it.
    assert!(scanner.update("my SSN: 444-42-1234").is_empty());
    let matches = scanner.update(" etc");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name(), "ssn");
    assert_eq!(matches[0].pos(), 8);
}

#[test]
fn test_reset_restores_the_initial_state() {
    init();
    let ctxt = catalog_context();
    let mut scanner = ctxt.scanner();
    let first = scanner.update("444-42-1234 ");
    assert_eq!(first.len(), 1);
    assert!(scanner.position() > 0);

    scanner.reset();
    assert_eq!(scanner.position(), 0);
    let second = scanner.update("444-42-1234 ");
    assert_eq!(first, second);
}

#[test]
fn test_position_counts_committed_characters() {
    init();
    let ctxt = catalog_context();
    let mut scanner = ctxt.scanner();
    scanner.update("abc");
    // Dead characters are committed immediately.
    assert_eq!(scanner.position(), 3);
    scanner.update("444-42");
    // A live prefix stays buffered and uncommitted.
    assert_eq!(scanner.position(), 3);
    scanner.update("-1234 ");
    assert_eq!(scanner.position(), 15);
}

#[test]
fn test_two_scanners_over_one_context_are_independent() {
    init();
    let ctxt = catalog_context();
    let mut left = ctxt.scanner();
    let mut right = ctxt.scanner();
    left.update("444-42-");
    let mut right_matches = right.update("4045124442700008,");
    right_matches.extend(right.complete());
    assert_eq!(right_matches.len(), 1);
    assert_eq!(right_matches[0].name(), "visa");

    let mut left_matches = left.update("1234");
    left_matches.extend(left.complete());
    assert_eq!(left_matches.len(), 1);
    assert_eq!(left_matches[0].name(), "ssn");
}
