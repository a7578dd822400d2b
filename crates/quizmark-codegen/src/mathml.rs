//! MathML code generator.
//!
//! Presentation MathML for the interactive preview. Runs are split into
//! token elements (`mi`, `mn`, `mo`); structural nodes map onto `mfrac`,
//! `msqrt`/`mroot`, `msup`, `msub` and fenced `mrow`s.

use crate::{escape_xml, Render, RenderError};
use quizmark_math::commands::FUNCTION_WORDS;
use quizmark_math::MathNode;

pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Tree-based MathML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathmlRenderer;

impl MathmlRenderer {
    pub fn render_nodes(&self, nodes: &[MathNode]) -> String {
        let mut out = format!("<math xmlns=\"{MATHML_NAMESPACE}\">");
        generate_sequence(nodes, &mut out);
        out.push_str("</math>");
        out
    }
}

impl Render for MathmlRenderer {
    fn target(&self) -> &'static str {
        "mathml"
    }

    fn render(&self, markup: &str) -> Result<String, RenderError> {
        Ok(self.render_nodes(&quizmark_math::parse(markup)))
    }
}

fn generate_sequence(nodes: &[MathNode], out: &mut String) {
    for node in nodes {
        generate_node(node, out);
    }
}

fn generate_node(node: &MathNode, out: &mut String) {
    match node {
        MathNode::Run { text } => generate_run(text, out),
        MathNode::Fraction {
            numerator,
            denominator,
        } => {
            out.push_str("<mfrac>");
            generate_row(numerator, out);
            generate_row(denominator, out);
            out.push_str("</mfrac>");
        }
        MathNode::Radical {
            content,
            degree: None,
        } => {
            out.push_str("<msqrt>");
            generate_sequence(content, out);
            out.push_str("</msqrt>");
        }
        MathNode::Radical {
            content,
            degree: Some(degree),
        } => {
            out.push_str("<mroot>");
            generate_row(content, out);
            generate_row(degree, out);
            out.push_str("</mroot>");
        }
        MathNode::SuperScript { base, script } => {
            out.push_str("<msup>");
            generate_row(base, out);
            generate_row(script, out);
            out.push_str("</msup>");
        }
        MathNode::SubScript { base, script } => {
            out.push_str("<msub>");
            generate_row(base, out);
            generate_row(script, out);
            out.push_str("</msub>");
        }
        MathNode::RoundBrackets { children } => generate_fenced('(', ')', children, out),
        MathNode::SquareBrackets { children } => generate_fenced('[', ']', children, out),
    }
}

/// Script and fraction arguments must be exactly one element each.
fn generate_row(nodes: &[MathNode], out: &mut String) {
    out.push_str("<mrow>");
    generate_sequence(nodes, out);
    out.push_str("</mrow>");
}

fn generate_fenced(open: char, close: char, nodes: &[MathNode], out: &mut String) {
    out.push_str(&format!("<mrow><mo>{open}</mo>"));
    generate_sequence(nodes, out);
    out.push_str(&format!("<mo>{close}</mo></mrow>"));
}

/// Split a text run into token elements.
fn generate_run(text: &str, out: &mut String) {
    if FUNCTION_WORDS.contains(&text) {
        out.push_str(&format!("<mi>{text}</mi>"));
        return;
    }

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let (tag, mut token) = if c.is_ascii_digit() {
            let mut number = c.to_string();
            while let Some(&d) = chars.peek() {
                if !(d.is_ascii_digit() || d == '.') {
                    break;
                }
                number.push(d);
                chars.next();
            }
            ("mn", number)
        } else if c.is_alphabetic() {
            ("mi", c.to_string())
        } else {
            ("mo", c.to_string())
        };

        // Combining marks (the \vec arrow) stay on their base character.
        while let Some(&m) = chars.peek() {
            if !is_combining(m) {
                break;
            }
            token.push(m);
            chars.next();
        }

        out.push_str(&format!("<{tag}>{}</{tag}>", escape_xml(&token)));
    }
}

fn is_combining(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{20D0}'..='\u{20FF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mathml(markup: &str) -> String {
        let out = MathmlRenderer.render(markup).unwrap();
        out.strip_prefix(&format!("<math xmlns=\"{MATHML_NAMESPACE}\">"))
            .and_then(|s| s.strip_suffix("</math>"))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_empty() {
        assert_eq!(mathml(""), "");
    }

    #[test]
    fn test_run_tokens() {
        assert_eq!(mathml("2x + 10.5"), "<mn>2</mn><mi>x</mi><mo>+</mo><mn>10.5</mn>");
    }

    #[test]
    fn test_operator_escaped() {
        assert_eq!(mathml("a<b"), "<mi>a</mi><mo>&lt;</mo><mi>b</mi>");
    }

    #[test]
    fn test_function_word() {
        assert_eq!(mathml("\\sin x"), "<mi>sin</mi><mi>x</mi>");
    }

    #[test]
    fn test_vector_arrow_stays_on_letter() {
        assert_eq!(mathml("\\vec{a}"), "<mi>a\u{20D7}</mi>");
    }

    #[test]
    fn test_fraction() {
        assert_eq!(
            mathml("\\frac{1}{2}"),
            "<mfrac><mrow><mn>1</mn></mrow><mrow><mn>2</mn></mrow></mfrac>"
        );
    }

    #[test]
    fn test_roots() {
        assert_eq!(mathml("\\sqrt{x}"), "<msqrt><mi>x</mi></msqrt>");
        assert_eq!(
            mathml("\\sqrt[3]{x}"),
            "<mroot><mrow><mi>x</mi></mrow><mrow><mn>3</mn></mrow></mroot>"
        );
    }

    #[test]
    fn test_scripts() {
        assert_eq!(
            mathml("x^2"),
            "<msup><mrow><mi>x</mi></mrow><mrow><mn>2</mn></mrow></msup>"
        );
        assert_eq!(
            mathml("a_i"),
            "<msub><mrow><mi>a</mi></mrow><mrow><mi>i</mi></mrow></msub>"
        );
    }

    #[test]
    fn test_brackets() {
        assert_eq!(mathml("(a)"), "<mrow><mo>(</mo><mi>a</mi><mo>)</mo></mrow>");
        assert_eq!(mathml("[a]"), "<mrow><mo>[</mo><mi>a</mi><mo>]</mo></mrow>");
    }
}
