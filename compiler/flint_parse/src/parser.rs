//! Stack-based parser.

use flint_lexer::{TokenKind, TokenReader};
use smallvec::SmallVec;
use tracing::trace;

use crate::{AstNode, ParseError};

/// Entry on the parse stack.
enum Frame {
    /// An open form: operator seen, closing parenthesis not yet.
    Open { operator: String, offset: usize },
    /// A finished node (atom or closed form).
    Done(AstNode),
}

/// Parse an expression into an AST.
///
/// Parsing stops as soon as one complete expression has been read; input
/// after it is not examined.
///
/// # Errors
///
/// - [`ParseError::ExpectingOperator`] when `(` is not followed by a symbol
/// - [`ParseError::UnexpectedParenthesis`] for a `)` that closes nothing
/// - [`ParseError::UnexpectedEof`] when input ends inside a form (or is empty)
/// - [`ParseError::Lex`] for tokenizer errors
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<AstNode, ParseError> {
    let mut reader = TokenReader::new(source);
    let mut stack: SmallVec<[Frame; 16]> = SmallVec::new();

    loop {
        let token = reader.next_token().ok_or(ParseError::UnexpectedEof)??;

        if token.is_open() {
            let operator = reader.next_token().ok_or(ParseError::UnexpectedEof)??;
            if operator.kind != TokenKind::Symbol {
                return Err(ParseError::ExpectingOperator {
                    offset: operator.offset,
                });
            }
            stack.push(Frame::Open {
                operator: operator.text.into_owned(),
                offset: token.offset,
            });
            continue;
        }

        if token.is_close() {
            let Some(open) = stack
                .iter()
                .rposition(|frame| matches!(frame, Frame::Open { .. }))
            else {
                return Err(ParseError::UnexpectedParenthesis {
                    offset: token.offset,
                });
            };

            let children: Vec<AstNode> = stack
                .drain(open + 1..)
                .filter_map(|frame| match frame {
                    Frame::Done(node) => Some(node),
                    Frame::Open { .. } => None,
                })
                .collect();
            let Some(Frame::Open { operator, offset }) = stack.pop() else {
                return Err(ParseError::UnexpectedParenthesis {
                    offset: token.offset,
                });
            };
            trace!(%operator, offset, arity = children.len(), "closed form");
            let node = AstNode::form(operator, children);

            if stack.is_empty() {
                return Ok(node);
            }
            stack.push(Frame::Done(node));
            continue;
        }

        stack.push(Frame::Done(AstNode::leaf(token.text.into_owned(), token.kind)));
        if stack.len() == 1 {
            if let Some(Frame::Done(node)) = stack.pop() {
                return Ok(node);
            }
        }
    }
}
