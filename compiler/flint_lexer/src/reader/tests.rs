use super::*;
use crate::tokenize;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Read `skip` tokens from `source`, then return the next one.
fn nth_token(source: &str, skip: usize) -> (String, TokenKind) {
    let mut reader = TokenReader::new(source);
    for _ in 0..skip {
        reader.next_token().unwrap().unwrap();
    }
    let token = reader.next_token().unwrap().unwrap();
    (token.text.into_owned(), token.kind)
}

/// Check that `expr` scans to (`expected`, `kind`) in a range of surrounding contexts.
fn assert_tokens(expected: &str, kind: TokenKind, expr: &str) {
    let contexts = [
        (expr.to_string(), 0),
        (format!("({expr}"), 1),
        (format!("({expr})"), 1),
        (format!("(+ {expr} 123)"), 2),
        (format!("(+ {expr} \"123\")"), 2),
        (format!("(+ (- {expr} 321) 123)"), 4),
        (format!("(- (- 3 1) (+ \"str\" sym {expr} 321) 123)"), 11),
    ];
    for (source, skip) in contexts {
        assert_eq!(
            nth_token(&source, skip),
            (expected.to_string(), kind),
            "in {source:?}"
        );
    }
}

// === Strings ===

#[test]
fn empty_string() {
    assert_tokens("", TokenKind::String, "\"\"");
}

#[test]
fn escaped_string() {
    assert_tokens(
        "esc \t\n\u{1234}\"'\\",
        TokenKind::String,
        r#""esc \t\n\u1234\"'\\""#,
    );
}

#[test]
fn string_keeps_inner_spaces_and_parens() {
    assert_tokens("a (b) c", TokenKind::String, "\"a (b) c\"");
}

#[test]
fn unterminated_string_is_an_error() {
    let mut reader = TokenReader::new("(+ \"abc");
    assert!(reader.next_token().unwrap().is_ok());
    assert!(reader.next_token().unwrap().is_ok());
    assert_eq!(
        reader.next_token(),
        Some(Err(LexError::UnterminatedString { offset: 3 }))
    );
    assert_eq!(reader.next_token(), None);
}

#[test]
fn escaped_quote_at_end_is_unterminated() {
    assert_eq!(
        tokenize(r#""abc\""#),
        Err(LexError::UnterminatedString { offset: 0 })
    );
}

#[test]
fn malformed_escape_is_an_error() {
    assert_eq!(
        tokenize(r#""a\qb""#),
        Err(LexError::MalformedEscape {
            offset: 2,
            escape: 'q'
        })
    );
}

#[test]
fn error_offset_is_uniform() {
    let unterminated = tokenize("(+ \"abc").unwrap_err();
    assert_eq!(unterminated.offset(), 3);
    let malformed = tokenize(r#"  "a\qb""#).unwrap_err();
    assert_eq!(malformed.offset(), 4);
}

// === Numbers ===

#[test]
fn floats() {
    assert_tokens("0.123", TokenKind::Float, "0.123");
    assert_tokens(".456f", TokenKind::Float, ".456f");
    assert_tokens("31536000.", TokenKind::Float, "31536000.");
}

#[test]
fn ints() {
    assert_tokens("0x123ABC", TokenKind::Int, "0x123ABC");
    assert_tokens("0o556677", TokenKind::Int, "0o556677");
    assert_tokens("0556677", TokenKind::Int, "0556677");
}

#[test]
fn signed_numbers_are_symbols() {
    assert_tokens("-.1456f", TokenKind::Symbol, "-.1456f");
    assert_tokens("-0556677", TokenKind::Symbol, "-0556677");
    assert_tokens("+42", TokenKind::Symbol, "+42");
    assert_tokens("-12", TokenKind::Symbol, "-12");
}

// === Bools ===

#[test]
fn bools() {
    assert_tokens("true", TokenKind::Bool, "true");
    assert_tokens("false", TokenKind::Bool, "false");
}

#[test]
fn bool_prefix_is_a_symbol() {
    assert_tokens("trueish", TokenKind::Symbol, "trueish");
}

// === Symbols ===

#[test]
fn symbols() {
    assert_tokens("+", TokenKind::Symbol, "+");
    assert_tokens("-", TokenKind::Symbol, "-");
    assert_tokens("->bool", TokenKind::Symbol, "->bool");
    assert_tokens("contains?", TokenKind::Symbol, "contains?");
    assert_tokens("'\\n", TokenKind::Symbol, "'\\n");
}

// === Parentheses ===

#[test]
fn parentheses() {
    assert_tokens("(", TokenKind::Parenthesis, "(");
    assert_tokens(")", TokenKind::Parenthesis, ")");
}

#[test]
fn adjacent_parentheses_split() {
    let kinds: Vec<_> = tokenize("((a))")
        .unwrap()
        .into_iter()
        .map(|t| (t.text.into_owned(), t.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("(".to_string(), TokenKind::Parenthesis),
            ("(".to_string(), TokenKind::Parenthesis),
            ("a".to_string(), TokenKind::Symbol),
            (")".to_string(), TokenKind::Parenthesis),
            (")".to_string(), TokenKind::Parenthesis),
        ]
    );
}

// === Whitespace and offsets ===

#[test]
fn unicode_whitespace_is_skipped() {
    let tokens = tokenize("\u{3000}\tx\n\u{A0}y").unwrap();
    let texts: Vec<_> = tokens.iter().map(Token::as_str).collect();
    assert_eq!(texts, vec!["x", "y"]);
}

#[test]
fn offsets_point_at_token_start() {
    let tokens = tokenize("(+  ab \"c\")").unwrap();
    let offsets: Vec<_> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 1, 4, 7, 10]);
}

#[test]
fn position_tracks_unread_input() {
    let mut reader = TokenReader::new("(ab  \"c\") ");
    assert_eq!(reader.position(), 0);
    reader.next_token().unwrap().unwrap();
    assert_eq!(reader.position(), 1);
    reader.next_token().unwrap().unwrap();
    assert_eq!(reader.position(), 3);
    reader.next_token().unwrap().unwrap();
    assert_eq!(reader.position(), 8);
    reader.next_token().unwrap().unwrap();
    assert_eq!(reader.position(), 9);
    assert!(reader.next_token().is_none());
    assert_eq!(reader.position(), 10);
}

#[test]
fn empty_and_blank_input_yield_nothing() {
    assert_eq!(tokenize(""), Ok(vec![]));
    assert_eq!(tokenize("  \n\t "), Ok(vec![]));
}

#[test]
fn fresh_reader_rescans() {
    let source = "(* x 2)";
    let first = tokenize(source).unwrap();
    let second = tokenize(source).unwrap();
    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn symbol_runs_round_trip(words in prop::collection::vec("[a-z?!*<>=-]{1,6}", 1..8)) {
        let source = words.join(" ");
        let tokens = tokenize(&source).unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.to_string()).collect();
        prop_assert_eq!(texts, words);
    }

    #[test]
    fn never_panics(source in "\\PC{0,64}") {
        let _ = tokenize(&source);
    }
}
