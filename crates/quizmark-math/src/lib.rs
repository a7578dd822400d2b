//! Quizmark math parser
//!
//! Turns a LaTeX-style math subset (control words, braces, brackets, `^`/`_`)
//! into a tree of [`MathNode`]s for the document renderers.
//!
//! Parsing is total: every input string, however malformed, produces a node
//! sequence. Unknown commands, missing arguments and unterminated delimiters
//! degrade to literal text.
//!
//! # Example
//!
//! ```
//! use quizmark_math::{parse, MathNode};
//!
//! let nodes = parse("\\frac{1}{2}");
//! assert_eq!(
//!     nodes,
//!     vec![MathNode::fraction(vec![MathNode::run("1")], vec![MathNode::run("2")])]
//! );
//! ```

pub mod ast;
pub mod commands;
pub mod parser;
pub mod scanner;

pub use ast::{flatten_text, MathNode};
pub use parser::Parser;

/// Character introducing a control word.
pub const ESCAPE: char = '\\';

/// Parse formula source into a node sequence.
pub fn parse(source: &str) -> Vec<MathNode> {
    Parser::parse(source)
}
