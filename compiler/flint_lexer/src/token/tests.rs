use super::*;
use pretty_assertions::assert_eq;

#[test]
fn tags_round_trip_in_order() {
    for (expected, kind) in TokenKind::ALL.into_iter().enumerate() {
        assert_eq!(usize::from(kind.tag()), expected);
        assert_eq!(TokenKind::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(TokenKind::from_tag(6), None);
}

#[test]
fn only_literal_kinds_are_values() {
    let values: Vec<_> = TokenKind::ALL
        .into_iter()
        .filter(|kind| kind.is_value())
        .collect();
    assert_eq!(
        values,
        vec![
            TokenKind::Bool,
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::String
        ]
    );
}

#[test]
fn parenthesis_direction() {
    let open = Token::new("(", TokenKind::Parenthesis, 0);
    let close = Token::new(")", TokenKind::Parenthesis, 1);
    assert!(open.is_open() && !open.is_close());
    assert!(close.is_close() && !close.is_open());
    assert!(!Token::new("(", TokenKind::String, 0).is_open());
}
