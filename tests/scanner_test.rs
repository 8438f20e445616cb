//! End-to-end tests of the scanner semantics: the catalog scenarios,
//! longest-match and earliest-pattern resolution, and ignore masking.

use descan::{ContextBuilder, Match, Pattern, PatternId, ScannerContext};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SSN: &str = "[[:digit:]]{3}[ -][[:digit:]]{2}[ -][[:digit:]]{4}";
const VISA: &str = "4[[:digit:]]{3}([ -]?[[:digit:]]{4}){3}";
const SSN_UNFORMATTED: &str = "[[:digit:]]{9}";
const DIGIT_RULE: &str = "1[^13]";

fn pattern(major: u32, name: &str, regex: &str) -> Pattern {
    Pattern::new(PatternId::new(major, 1), name.to_string(), regex.to_string())
}

fn context(patterns: &[(u32, &str, &str)]) -> ScannerContext {
    ContextBuilder::new()
        .add_patterns(
            patterns
                .iter()
                .map(|(major, name, regex)| pattern(*major, name, regex)),
        )
        .build()
}

fn scan_all(ctxt: &ScannerContext, input: &str) -> Vec<Match> {
    let mut scanner = ctxt.scanner();
    let mut matches = scanner.update(input);
    matches.extend(scanner.complete());
    matches
}

fn as_tuples(matches: &[Match]) -> Vec<(String, String, usize, String)> {
    matches
        .iter()
        .map(|m| {
            (
                m.pattern_id().to_string(),
                m.name().to_string(),
                m.pos(),
                m.text().to_string(),
            )
        })
        .collect()
}

fn expected(items: &[(&str, &str, usize, &str)]) -> Vec<(String, String, usize, String)> {
    items
        .iter()
        .map(|(id, name, pos, text)| (id.to_string(), name.to_string(), *pos, text.to_string()))
        .collect()
}

#[test]
fn test_digit_rule() {
    init();
    let ctxt = context(&[(4, "digit", DIGIT_RULE)]);
    let matches = scan_all(&ctxt, "12 ");
    assert_eq!(
        as_tuples(&matches),
        expected(&[("4.1", "digit", 0, "12")])
    );
}

#[test]
fn test_ssn_at_end_of_input() {
    init();
    let ctxt = context(&[(1, "ssn", SSN), (2, "visa", VISA)]);
    let matches = scan_all(
        &ctxt,
        "Hi, here is my social security number 444-42-1234",
    );
    assert_eq!(
        as_tuples(&matches),
        expected(&[("1.1", "ssn", 38, "444-42-1234")])
    );
}

#[test]
fn test_visa_unformatted() {
    init();
    let ctxt = context(&[(1, "ssn", SSN), (2, "visa", VISA)]);
    let matches = scan_all(
        &ctxt,
        "Hi, here is my visa number 4045124442700008, don't give it to anyone",
    );
    assert_eq!(
        as_tuples(&matches),
        expected(&[("2.1", "visa", 27, "4045124442700008")])
    );
}

#[test]
fn test_visa_with_separators() {
    init();
    let ctxt = context(&[(1, "ssn", SSN), (2, "visa", VISA)]);
    let matches = scan_all(
        &ctxt,
        "Hi, here is my visa number 4045 1244 4270 0008, don't give it to anyone",
    );
    assert_eq!(
        as_tuples(&matches),
        expected(&[("2.1", "visa", 27, "4045 1244 4270 0008")])
    );
}

#[test]
fn test_longest_match_wins_across_patterns() {
    init();
    // The visa number contains a 9-digit prefix that ssn_unformatted
    // accepts; the longer visa match must win at that position.
    let ctxt = context(&[
        (1, "ssn", SSN),
        (3, "ssn_unformatted", SSN_UNFORMATTED),
        (2, "visa", VISA),
    ]);
    let matches = scan_all(
        &ctxt,
        "Hi, here is my visa number 4045124442700008, don't give it to anyone",
    );
    assert_eq!(
        as_tuples(&matches),
        expected(&[("2.1", "visa", 27, "4045124442700008")])
    );
}

#[test]
fn test_two_matches_in_one_input() {
    init();
    let ctxt = context(&[(1, "ssn", SSN), (2, "visa", VISA)]);
    let matches = scan_all(
        &ctxt,
        "Hi, here is my SSN is 444-42-1234 and  visa number is #4045124442700008, don't give it to anyone",
    );
    assert_eq!(
        as_tuples(&matches),
        expected(&[
            ("1.1", "ssn", 22, "444-42-1234"),
            ("2.1", "visa", 55, "4045124442700008"),
        ])
    );
}

#[test]
fn test_longest_match_law() {
    init();
    // L(short) ⊂ L(long) on the same window: the longest candidate is
    // resolved, so `long` wins.
    let ctxt = context(&[(1, "short", "ab"), (2, "long", "ab+")]);
    let matches = scan_all(&ctxt, "abbb c");
    assert_eq!(
        as_tuples(&matches),
        expected(&[("2.1", "long", 0, "abbb")])
    );
}

#[test]
fn test_earliest_pattern_law() {
    init();
    // Same match length at the same position: declaration order decides.
    let ctxt = context(&[(7, "first", "aa"), (8, "second", "aa")]);
    let matches = scan_all(&ctxt, "aa ");
    assert_eq!(as_tuples(&matches), expected(&[("7.1", "first", 0, "aa")]));

    let swapped = context(&[(8, "second", "aa"), (7, "first", "aa")]);
    let matches = scan_all(&swapped, "aa ");
    assert_eq!(
        as_tuples(&matches),
        expected(&[("8.1", "second", 0, "aa")])
    );
}

#[test]
fn test_ignore_pattern_masks_shorter_matches() {
    init();
    let input = "x 4045124442700008 y";
    // Without the masking pattern the 9-digit rule fires inside the visa
    // number.
    let unmasked = context(&[(3, "ssn_unformatted", SSN_UNFORMATTED)]);
    let matches = scan_all(&unmasked, input);
    assert_eq!(
        as_tuples(&matches),
        expected(&[("3.1", "ssn_unformatted", 2, "404512444")])
    );

    // With an ignore pattern for well-formed visa numbers the whole number
    // is consumed silently and nothing is reported.
    let masked = ContextBuilder::new()
        .add_pattern(pattern(2, "visa", VISA).with_ignore())
        .add_pattern(pattern(3, "ssn_unformatted", SSN_UNFORMATTED))
        .build();
    let matches = scan_all(&masked, input);
    assert!(matches.is_empty(), "unexpected matches: {:?}", matches);
}

#[test]
fn test_match_spans_report_char_offsets() {
    init();
    let ctxt = context(&[(4, "digit", DIGIT_RULE)]);
    let matches = scan_all(&ctxt, "ä 12 ö");
    assert_eq!(matches.len(), 1);
    // Positions count characters, not bytes.
    assert_eq!(matches[0].pos(), 2);
    assert_eq!(matches[0].span().range(), 2..4);
}

#[test]
fn test_no_matches_without_complete_while_extensible() {
    init();
    let ctxt = context(&[(4, "digit", DIGIT_RULE)]);
    let mut scanner = ctxt.scanner();
    // "12" is a full match but could not be distinguished from a longer one
    // yet, so it stays buffered until the input ends.
    assert!(scanner.update("12").is_empty());
    let matches = scanner.complete();
    assert_eq!(as_tuples(&matches), expected(&[("4.1", "digit", 0, "12")]));
    // Completing again yields nothing.
    assert!(scanner.complete().is_empty());
}
