//! OMML code generator.
//!
//! Walks the math tree and emits Office Math Markup, the math dialect embedded
//! in word-processing documents. Each node variant maps to one native construct;
//! child sequences become the construct's argument elements.

use crate::{escape_xml, Render, RenderError};
use quizmark_math::MathNode;

/// Namespace bound to the `m:` prefix.
pub const MATH_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// OMML output settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OmmlOptions {
    /// Wrap the formula in `m:oMathPara` (display math on its own line).
    pub paragraph: bool,
    /// Declare `xmlns:m` on the outermost element, for standalone fragments.
    pub namespace: bool,
}

/// Tree-based OMML renderer used for document export.
#[derive(Debug, Clone, Default)]
pub struct OmmlRenderer {
    pub options: OmmlOptions,
}

impl OmmlRenderer {
    pub fn new(options: OmmlOptions) -> Self {
        Self { options }
    }

    /// Render an already parsed node sequence.
    pub fn render_nodes(&self, nodes: &[MathNode]) -> String {
        let ns = if self.options.namespace {
            format!(" xmlns:m=\"{MATH_NAMESPACE}\"")
        } else {
            String::new()
        };

        let mut out = String::new();
        if self.options.paragraph {
            out.push_str(&format!("<m:oMathPara{ns}><m:oMath>"));
        } else {
            out.push_str(&format!("<m:oMath{ns}>"));
        }

        generate_sequence(nodes, &mut out);

        out.push_str("</m:oMath>");
        if self.options.paragraph {
            out.push_str("</m:oMathPara>");
        }
        out
    }
}

impl Render for OmmlRenderer {
    fn target(&self) -> &'static str {
        "omml"
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
        MathNode::Run { text } => {
            out.push_str("<m:r><m:t xml:space=\"preserve\">");
            out.push_str(&escape_xml(text));
            out.push_str("</m:t></m:r>");
        }
        MathNode::Fraction {
            numerator,
            denominator,
        } => {
            out.push_str("<m:f>");
            generate_argument("m:num", numerator, out);
            generate_argument("m:den", denominator, out);
            out.push_str("</m:f>");
        }
        MathNode::Radical { content, degree } => {
            out.push_str("<m:rad>");
            match degree {
                Some(degree) => generate_argument("m:deg", degree, out),
                None => out.push_str("<m:radPr><m:degHide m:val=\"1\"/></m:radPr><m:deg/>"),
            }
            generate_argument("m:e", content, out);
            out.push_str("</m:rad>");
        }
        MathNode::SuperScript { base, script } => {
            out.push_str("<m:sSup>");
            generate_argument("m:e", base, out);
            generate_argument("m:sup", script, out);
            out.push_str("</m:sSup>");
        }
        MathNode::SubScript { base, script } => {
            out.push_str("<m:sSub>");
            generate_argument("m:e", base, out);
            generate_argument("m:sub", script, out);
            out.push_str("</m:sSub>");
        }
        MathNode::RoundBrackets { children } => {
            // Parentheses are the m:d default
            out.push_str("<m:d>");
            generate_argument("m:e", children, out);
            out.push_str("</m:d>");
        }
        MathNode::SquareBrackets { children } => {
            out.push_str("<m:d><m:dPr><m:begChr m:val=\"[\"/><m:endChr m:val=\"]\"/></m:dPr>");
            generate_argument("m:e", children, out);
            out.push_str("</m:d>");
        }
    }
}

/// `<tag>children</tag>`, or `<tag/>` for an empty sequence.
fn generate_argument(tag: &str, nodes: &[MathNode], out: &mut String) {
    if nodes.is_empty() {
        out.push_str(&format!("<{tag}/>"));
        return;
    }
    out.push_str(&format!("<{tag}>"));
    generate_sequence(nodes, out);
    out.push_str(&format!("</{tag}>"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn omml(markup: &str) -> String {
        OmmlRenderer::default().render(markup).unwrap()
    }

    fn r(text: &str) -> String {
        format!("<m:r><m:t xml:space=\"preserve\">{text}</m:t></m:r>")
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(omml(""), "<m:oMath></m:oMath>");
    }

    #[test]
    fn test_run() {
        assert_eq!(omml("x+1"), format!("<m:oMath>{}</m:oMath>", r("x+1")));
    }

    #[test]
    fn test_run_is_escaped() {
        assert_eq!(omml("a<b"), format!("<m:oMath>{}</m:oMath>", r("a&lt;b")));
    }

    #[test]
    fn test_fraction() {
        assert_eq!(
            omml("\\frac{1}{2}"),
            format!(
                "<m:oMath><m:f><m:num>{}</m:num><m:den>{}</m:den></m:f></m:oMath>",
                r("1"),
                r("2")
            )
        );
    }

    #[test]
    fn test_sqrt_hides_missing_degree() {
        assert_eq!(
            omml("\\sqrt{x}"),
            format!(
                "<m:oMath><m:rad><m:radPr><m:degHide m:val=\"1\"/></m:radPr><m:deg/><m:e>{}</m:e></m:rad></m:oMath>",
                r("x")
            )
        );
    }

    #[test]
    fn test_sqrt_with_degree() {
        assert_eq!(
            omml("\\sqrt[3]{x}"),
            format!(
                "<m:oMath><m:rad><m:deg>{}</m:deg><m:e>{}</m:e></m:rad></m:oMath>",
                r("3"),
                r("x")
            )
        );
    }

    #[test]
    fn test_scripts() {
        assert_eq!(
            omml("x^2"),
            format!(
                "<m:oMath><m:sSup><m:e>{}</m:e><m:sup>{}</m:sup></m:sSup></m:oMath>",
                r("x"),
                r("2")
            )
        );
        assert_eq!(
            omml("a_i"),
            format!(
                "<m:oMath><m:sSub><m:e>{}</m:e><m:sub>{}</m:sub></m:sSub></m:oMath>",
                r("a"),
                r("i")
            )
        );
    }

    #[test]
    fn test_script_without_base() {
        assert_eq!(
            omml("^2"),
            format!(
                "<m:oMath><m:sSup><m:e/><m:sup>{}</m:sup></m:sSup></m:oMath>",
                r("2")
            )
        );
    }

    #[test]
    fn test_brackets() {
        assert_eq!(
            omml("(a)"),
            format!("<m:oMath><m:d><m:e>{}</m:e></m:d></m:oMath>", r("a"))
        );
        assert_eq!(
            omml("[a]"),
            format!(
                "<m:oMath><m:d><m:dPr><m:begChr m:val=\"[\"/><m:endChr m:val=\"]\"/></m:dPr><m:e>{}</m:e></m:d></m:oMath>",
                r("a")
            )
        );
    }

    #[test]
    fn test_paragraph_with_namespace() {
        let renderer = OmmlRenderer::new(OmmlOptions {
            paragraph: true,
            namespace: true,
        });
        assert_eq!(
            renderer.render("x").unwrap(),
            format!(
                "<m:oMathPara xmlns:m=\"{MATH_NAMESPACE}\"><m:oMath>{}</m:oMath></m:oMathPara>",
                r("x")
            )
        );
    }

    #[test]
    fn test_matrix_environment() {
        assert_eq!(
            omml("\\begin{pmatrix}1&0\\\\0&1\\end{pmatrix}"),
            format!(
                "<m:oMath><m:d><m:dPr><m:begChr m:val=\"[\"/><m:endChr m:val=\"]\"/></m:dPr><m:e>{}</m:e></m:d></m:oMath>",
                r("1 0 ; 0 1")
            )
        );
    }

    #[test]
    fn test_elements_balanced() {
        let out = omml("\\frac{\\sqrt[n]{a_1^2}}{(b+[c])}");
        for tag in ["m:f", "m:rad", "m:sSup", "m:sSub", "m:d", "m:num", "m:den", "m:e"] {
            let opens = out.matches(&format!("<{tag}>")).count();
            let closes = out.matches(&format!("</{tag}>")).count();
            assert_eq!(opens, closes, "{tag} in {out}");
        }
    }
}
