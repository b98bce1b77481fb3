//! Bracketed token sequences for classified layout trees

use crate::tree::{LayoutTreeNode, WidgetType};
use std::fmt;

pub const OPEN: &str = "{";
pub const CLOSE: &str = "}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Widget(WidgetType),
    Open,
    Close,
}

impl Token {
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Widget(widget) => widget.as_str(),
            Token::Open => OPEN,
            Token::Close => CLOSE,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-order serialization: `Type` for leaves, `Type { children... }` otherwise
pub fn serialize(root: &LayoutTreeNode) -> Vec<Token> {
    let mut tokens = Vec::new();
    serialize_into(root, &mut tokens);
    tokens
}

fn serialize_into(node: &LayoutTreeNode, tokens: &mut Vec<Token>) {
    tokens.push(Token::Widget(node.widget_type.unwrap_or(WidgetType::Unclassified)));
    if node.has_children() {
        tokens.push(Token::Open);
        for child in &node.children {
            serialize_into(child, tokens);
        }
        tokens.push(Token::Close);
    }
}

/// Space-separated rendering used in token list files
pub fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
