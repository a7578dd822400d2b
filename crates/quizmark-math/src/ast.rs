//! Math node tree produced by the parser.
//!
//! Every variant owns its children; a tree is built bottom-up during a single
//! parse call and never mutated afterwards.

use serde::Serialize;

/// A typed element of the parsed formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MathNode {
    /// Literal text segment.
    Run { text: String },

    /// `\frac{a}{b}`
    Fraction {
        numerator: Vec<MathNode>,
        denominator: Vec<MathNode>,
    },

    /// `\sqrt{x}` or `\sqrt[n]{x}`
    Radical {
        content: Vec<MathNode>,
        degree: Option<Vec<MathNode>>,
    },

    /// `base^script`
    SuperScript {
        base: Vec<MathNode>,
        script: Vec<MathNode>,
    },

    /// `base_script`
    SubScript {
        base: Vec<MathNode>,
        script: Vec<MathNode>,
    },

    /// `( ... )`
    RoundBrackets { children: Vec<MathNode> },

    /// `[ ... ]`
    SquareBrackets { children: Vec<MathNode> },
}

impl MathNode {
    pub fn run(text: impl Into<String>) -> Self {
        MathNode::Run { text: text.into() }
    }

    pub fn fraction(numerator: Vec<MathNode>, denominator: Vec<MathNode>) -> Self {
        MathNode::Fraction {
            numerator,
            denominator,
        }
    }

    pub fn radical(content: Vec<MathNode>, degree: Option<Vec<MathNode>>) -> Self {
        MathNode::Radical { content, degree }
    }

    pub fn superscript(base: Vec<MathNode>, script: Vec<MathNode>) -> Self {
        MathNode::SuperScript { base, script }
    }

    pub fn subscript(base: Vec<MathNode>, script: Vec<MathNode>) -> Self {
        MathNode::SubScript { base, script }
    }

    pub fn round(children: Vec<MathNode>) -> Self {
        MathNode::RoundBrackets { children }
    }

    pub fn square(children: Vec<MathNode>) -> Self {
        MathNode::SquareBrackets { children }
    }

    /// Literal text of a `Run`; `None` for every structural variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MathNode::Run { text } => Some(text),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, counting `self`.
    pub fn size(&self) -> usize {
        1 + self.children().map(|seq| seq.iter().map(MathNode::size).sum::<usize>()).sum::<usize>()
    }

    /// Child sequences in document order (base before script, numerator before denominator).
    pub fn children(&self) -> impl Iterator<Item = &[MathNode]> {
        let seqs: [Option<&[MathNode]>; 2] = match self {
            MathNode::Run { .. } => [None, None],
            MathNode::Fraction {
                numerator,
                denominator,
            } => [Some(numerator.as_slice()), Some(denominator.as_slice())],
            MathNode::Radical { content, degree } => [degree.as_deref(), Some(content.as_slice())],
            MathNode::SuperScript { base, script } | MathNode::SubScript { base, script } => {
                [Some(base.as_slice()), Some(script.as_slice())]
            }
            MathNode::RoundBrackets { children } | MathNode::SquareBrackets { children } => {
                [Some(children.as_slice()), None]
            }
        };
        seqs.into_iter().flatten()
    }
}

/// Concatenate the text of every `Run` in `nodes`; structural nodes contribute nothing.
pub fn flatten_text(nodes: &[MathNode]) -> String {
    nodes.iter().filter_map(MathNode::as_text).collect()
}
