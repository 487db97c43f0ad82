//! AST node type and its textual rendering.

use std::fmt;

use flint_lexer::TokenKind;
use flint_stack::ensure_sufficient_stack;

/// A node of the expression tree.
///
/// For a parenthesized form, `value` is the operator symbol, `kind` is
/// [`TokenKind::Parenthesis`] and `children` holds the arguments in source
/// order. Atoms carry their literal text (strings already unescaped) and
/// have no children.
#[derive(Clone, Debug, PartialEq)]
pub struct AstNode {
    pub value: String,
    pub kind: TokenKind,
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// An atomic node.
    pub fn leaf(value: impl Into<String>, kind: TokenKind) -> Self {
        AstNode {
            value: value.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// A parenthesized form `(op children...)`.
    pub fn form(operator: impl Into<String>, children: Vec<AstNode>) -> Self {
        AstNode {
            value: operator.into(),
            kind: TokenKind::Parenthesis,
            children,
        }
    }

    /// Whether this node is a parenthesized form.
    #[inline]
    pub fn is_form(&self) -> bool {
        self.kind == TokenKind::Parenthesis
    }

    /// Number of nodes in this tree, including `self`.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

// Nested forms can be arbitrarily deep; the derived drop glue would recurse
// once per level. Flatten the tree onto a heap worklist instead.
impl Drop for AstNode {
    fn drop(&mut self) {
        if self.children.iter().all(|child| child.children.is_empty()) {
            return;
        }
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self.kind {
            TokenKind::Parenthesis => {
                write!(f, "({}", self.value)?;
                for child in &self.children {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
            TokenKind::String => write!(f, "{:?}", self.value),
            TokenKind::Bool => write!(f, "#{}", self.value),
            _ => f.write_str(&self.value),
        })
    }
}
