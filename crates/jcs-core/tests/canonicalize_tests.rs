/// Canonicalization contract tests for RFC 8785.
///
/// Covers the worked examples from the RFC text, the Appendix B number
/// vectors (given as IEEE-754 bit patterns), key ordering, string escaping
/// and duplicate-key handling, all through the public `transform` entry point.
use jcs_core::{canonicalize, format_number, is_canonical, parse, transform, JcsError, Value};

/// Assert that transforming `input` yields exactly `expected`.
fn assert_canonical(input: &str, expected: &str) {
    let got = transform(input.as_bytes()).expect("transform failed");
    assert_eq!(
        got, expected,
        "Canonical mismatch:\n  input:    {input}\n  got:      {got}\n  expected: {expected}"
    );
}

// ============================================================================
// RFC 8785 worked examples
// ============================================================================

#[test]
fn rfc8785_section_3_2_2_example() {
    let input = r#"{
      "numbers": [333333333.33333329, 1E30, 4.50, 2e-3, 0.000000000000000000000000001],
      "string": "\u20ac$\u000F\u000aA'\u0042\u0022\u005c\\\"\/",
      "literals": [null, true, false]
    }"#;
    let expected = concat!(
        r#"{"literals":[null,true,false],"#,
        r#""numbers":[333333333.3333333,1e+30,4.5,0.002,1e-27],"#,
        "\"string\":\"\u{20ac}$\\u000f\\nA'B\\\"\\\\\\\\\\\"/\"}"
    );
    assert_canonical(input, expected);
}

#[test]
fn rfc8785_section_3_2_3_sorting_example() {
    let input = r#"{
      "\u20ac": "Euro Sign",
      "\r": "Carriage Return",
      "\ufb33": "Hebrew Letter Dalet With Dagesh",
      "1": "One",
      "\ud83d\ude00": "Emoji: Grinning Face",
      "\u0080": "Control",
      "\u00f6": "Latin Small Letter O With Diaeresis"
    }"#;
    let expected = concat!(
        "{\"\\r\":\"Carriage Return\",",
        "\"1\":\"One\",",
        "\"\u{80}\":\"Control\",",
        "\"\u{f6}\":\"Latin Small Letter O With Diaeresis\",",
        "\"\u{20ac}\":\"Euro Sign\",",
        "\"\u{1f600}\":\"Emoji: Grinning Face\",",
        "\"\u{fb33}\":\"Hebrew Letter Dalet With Dagesh\"}"
    );
    assert_canonical(input, expected);
}

// ============================================================================
// Appendix B number vectors
// ============================================================================

#[test]
fn rfc8785_appendix_b_numbers() {
    let vectors: &[(u64, &str)] = &[
        (0x0000000000000000, "0"),
        (0x8000000000000000, "0"),
        (0x0000000000000001, "5e-324"),
        (0x8000000000000001, "-5e-324"),
        (0x7fefffffffffffff, "1.7976931348623157e+308"),
        (0xffefffffffffffff, "-1.7976931348623157e+308"),
        (0x4340000000000000, "9007199254740992"),
        (0xc340000000000000, "-9007199254740992"),
        (0x4430000000000000, "295147905179352830000"),
        (0x44b52d02c7e14af5, "9.999999999999997e+22"),
        (0x44b52d02c7e14af6, "1e+23"),
        (0x44b52d02c7e14af7, "1.0000000000000001e+23"),
        (0x444b1ae4d6e2ef4e, "999999999999999700000"),
        (0x444b1ae4d6e2ef4f, "999999999999999900000"),
        (0x444b1ae4d6e2ef50, "1e+21"),
        (0x3eb0c6f7a0b5ed8c, "9.999999999999997e-7"),
        (0x3eb0c6f7a0b5ed8d, "0.000001"),
        (0x41b3de4355555553, "333333333.3333332"),
        (0x41b3de4355555554, "333333333.33333325"),
        (0x41b3de4355555555, "333333333.3333333"),
        (0x41b3de4355555556, "333333333.3333334"),
        (0x41b3de4355555557, "333333333.33333343"),
        (0xbecbf647612f3696, "-0.0000033333333333333333"),
        (0x43143ff3c1cb0959, "1424953923781206.2"),
    ];

    for &(bits, expected) in vectors {
        let value = f64::from_bits(bits);
        let got = format_number(value).unwrap();
        assert_eq!(got, expected, "bits {bits:#018x}");
    }
}

#[test]
fn appendix_b_non_finite_values_fail() {
    for bits in [0x7fffffffffffffffu64, 0x7ff0000000000000, 0xfff0000000000000] {
        let value = Value::Number(f64::from_bits(bits));
        assert!(matches!(canonicalize(&value), Err(JcsError::Format(_))));
    }
}

#[test]
fn number_text_is_reparsed_to_the_same_double() {
    assert_canonical("[1.0, -0, 1e21, 1E-7, 100000000000000000000]", "[1,0,1e+21,1e-7,100000000000000000000]");
    assert_canonical("[0.1, 0.2, 0.30000000000000004]", "[0.1,0.2,0.30000000000000004]");
    assert_canonical("[5e-324, 2.5e-324]", "[5e-324,5e-324]");
    assert_canonical("[123456789012345678901234567890]", "[1.2345678901234568e+29]");
}

#[test]
fn equidistant_shortest_digits_pick_the_even_one() {
    assert_canonical("[1062007102402498.25]", "[1062007102402498.2]");
    assert_canonical("[-1062007102402498.25]", "[-1062007102402498.2]");
}

// ============================================================================
// Testable properties from the service contract
// ============================================================================

#[test]
fn key_ordering_uppercase_first() {
    assert_canonical(r#"{"b":1,"a":2,"B":3}"#, r#"{"B":3,"a":2,"b":1}"#);
}

#[test]
fn number_formatting_examples() {
    assert_canonical(r#"{"a":1.0}"#, r#"{"a":1}"#);
    assert_canonical(r#"{"a":-0}"#, r#"{"a":0}"#);
    assert_canonical(r#"{"a":1e21}"#, r#"{"a":1e+21}"#);
    assert_canonical(
        r#"{"a":100000000000000000000}"#,
        r#"{"a":100000000000000000000}"#,
    );
}

#[test]
fn string_escaping_examples() {
    assert_canonical("\"line1\\nline2\"", "\"line1\\nline2\"");
    assert_canonical(r#""\u0001""#, r#""\u0001""#);
    assert_canonical(r#""caf\u00e9""#, "\"caf\u{e9}\"");
    assert_canonical("\"caf\u{e9}\"", "\"caf\u{e9}\"");
}

#[test]
fn short_escapes_and_solidus() {
    assert_canonical(r#""\b\t\n\f\r""#, r#""\b\t\n\f\r""#);
    assert_canonical(r#""a\/b""#, r#""a/b""#);
    assert_canonical(r#""\u001F\u000B""#, r#""\u001f\u000b""#);
}

#[test]
fn duplicate_keys_last_wins() {
    assert_canonical(r#"{"a":1,"a":2}"#, r#"{"a":2}"#);
    assert_canonical(r#"{"a":{"x":1},"b":0,"a":[]}"#, r#"{"a":[],"b":0}"#);
}

#[test]
fn escaped_and_literal_keys_are_the_same_key() {
    assert_canonical(r#"{"a":1,"\u0061":2}"#, r#"{"a":2}"#);
}

#[test]
fn empty_containers() {
    assert_canonical("[]", "[]");
    assert_canonical("{}", "{}");
    assert_canonical(" [ { } , [ ] ] ", "[{},[]]");
}

#[test]
fn nested_objects_sorted_at_every_level() {
    assert_canonical(
        r#"{"z":{"b":[{"d":1,"c":2}],"a":null},"y":true}"#,
        r#"{"y":true,"z":{"a":null,"b":[{"c":2,"d":1}]}}"#,
    );
}

#[test]
fn top_level_scalars() {
    assert_canonical(" null ", "null");
    assert_canonical("true", "true");
    assert_canonical("-1.50", "-1.5");
    assert_canonical(r#""x""#, r#""x""#);
}

#[test]
fn idempotent_on_canonical_input() {
    let canonical = r#"{"B":3,"a":[1,"\u0001",{"":null}],"b":1e+21}"#;
    assert_canonical(canonical, canonical);
    assert!(is_canonical(canonical.as_bytes()).unwrap());
}

#[test]
fn is_canonical_detects_whitespace_and_order() {
    assert!(!is_canonical(br#"{"a": 1}"#).unwrap());
    assert!(!is_canonical(br#"{"b":1,"a":2}"#).unwrap());
    assert!(!is_canonical(b"1.0").unwrap());
    assert!(is_canonical(b"1").unwrap());
    assert!(is_canonical(b"{").is_err());
}

#[test]
fn canonical_output_reparses_to_equal_tree() {
    let input = r#"{"k":[1.5,-0.0,"\ud83d\ude00",{"z":false,"y":null}],"e":1e-9}"#;
    let original = parse(input.as_bytes()).unwrap();
    let canonical = canonicalize(&original).unwrap();
    let reparsed = parse(canonical.as_bytes()).unwrap();
    assert_eq!(original, reparsed);
}
