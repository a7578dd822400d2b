//! Interactive preview.
//!
//! Renders question text for on-screen display. Text containing `$` is treated
//! as prose with inline `$...$` formulas; anything else is a single formula.
//! Rendering failures never propagate: the original text is shown unchanged
//! together with a [`Notice`] for the user.

use crate::{Render, RenderError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest `$...$` span on a single line.
static INLINE_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(.+?)\$").expect("inline math pattern is valid"));

/// A piece of preview text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// Formula between `$` delimiters, trimmed.
    Formula(&'a str),
}

/// Non-fatal message shown to the user when a preview falls back to source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

/// Preview output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub html: String,
    pub notice: Option<Notice>,
}

/// Split prose into text and inline formula segments.
pub fn split_inline_math(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in INLINE_MATH.captures_iter(text) {
        let (Some(whole), Some(formula)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&text[last..whole.start()]));
        }
        segments.push(Segment::Formula(formula.as_str().trim()));
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }
    segments
}

/// Render preview text with `renderer`, falling back to the original text on error.
pub fn render_preview(text: &str, renderer: &dyn Render) -> Preview {
    if text.is_empty() {
        return Preview {
            html: String::new(),
            notice: None,
        };
    }

    match render_text(text, renderer) {
        Ok(html) => Preview { html, notice: None },
        Err(err) => {
            log::warn!("{} preview failed, showing source text: {err}", renderer.target());
            Preview {
                html: text.to_string(),
                notice: Some(Notice {
                    title: "LaTeX error".into(),
                    description: err.message,
                }),
            }
        }
    }
}

fn render_text(text: &str, renderer: &dyn Render) -> Result<String, RenderError> {
    if !text.contains('$') {
        return renderer.render(text);
    }

    let mut out = String::with_capacity(text.len());
    for segment in split_inline_math(text) {
        match segment {
            Segment::Text(t) => out.push_str(t),
            Segment::Formula(f) => out.push_str(&renderer.render(f)?),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KatexRenderer, MathmlRenderer};
    use pretty_assertions::assert_eq;

    /// Wraps the formula so tests can see exactly what was rendered.
    struct Echo;

    impl Render for Echo {
        fn target(&self) -> &'static str {
            "echo"
        }

        fn render(&self, markup: &str) -> Result<String, RenderError> {
            Ok(format!("<{markup}>"))
        }
    }

    /// Rejects any formula containing `!`.
    struct Strict;

    impl Render for Strict {
        fn target(&self) -> &'static str {
            "strict"
        }

        fn render(&self, markup: &str) -> Result<String, RenderError> {
            if markup.contains('!') {
                Err(RenderError::new(format!("unexpected '!' in {markup}")))
            } else {
                Ok(markup.to_uppercase())
            }
        }
    }

    // =========================================================================
    // Segmentation
    // =========================================================================

    #[test]
    fn test_split_mixed_text() {
        assert_eq!(
            split_inline_math("Solve $x^2 = 4$ for $ x $."),
            vec![
                Segment::Text("Solve "),
                Segment::Formula("x^2 = 4"),
                Segment::Text(" for "),
                Segment::Formula("x"),
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn test_split_unpaired_dollar() {
        assert_eq!(
            split_inline_math("costs $5"),
            vec![Segment::Text("costs $5")]
        );
    }

    #[test]
    fn test_split_does_not_cross_lines() {
        assert_eq!(
            split_inline_math("$a\nb$"),
            vec![Segment::Text("$a\nb$")]
        );
    }

    #[test]
    fn test_split_is_non_greedy() {
        assert_eq!(
            split_inline_math("$a$$b$"),
            vec![Segment::Formula("a"), Segment::Formula("b")]
        );
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn test_empty_text() {
        let preview = render_preview("", &Echo);
        assert_eq!(preview.html, "");
        assert!(preview.notice.is_none());
    }

    #[test]
    fn test_plain_formula_rendered_whole() {
        assert_eq!(render_preview("x^2", &Echo).html, "<x^2>");
    }

    #[test]
    fn test_inline_formulas_spliced() {
        assert_eq!(
            render_preview("Let $a$ and $ b $ be", &Echo).html,
            "Let <a> and <b> be"
        );
    }

    #[test]
    fn test_error_falls_back_to_source() {
        let text = "ok $a$ bad $b!$";
        let preview = render_preview(text, &Strict);
        assert_eq!(preview.html, text);
        let notice = preview.notice.unwrap();
        assert_eq!(notice.title, "LaTeX error");
        assert!(notice.description.contains("b!"));
    }

    #[test]
    fn test_mathml_preview() {
        let preview = render_preview("Area $\\pi r^2$", &MathmlRenderer);
        assert!(preview.html.starts_with("Area <math"));
        assert!(preview.html.contains("<mi>π</mi>"));
        assert!(preview.notice.is_none());
    }

    #[test]
    fn test_katex_preview() {
        let preview = render_preview("Area $\\pi r^2$", &KatexRenderer::default());
        assert!(preview.html.starts_with("Area <span class=\"katex\">"));
        assert!(preview.notice.is_none());
    }

    #[test]
    fn test_katex_errors_fall_back_to_source() {
        let katex = KatexRenderer::default();
        for text in ["see $\\frac{a}{$", "$\\undefinedcmd{x}$", "x^"] {
            let preview = render_preview(text, &katex);
            assert_eq!(preview.html, text);
            let notice = preview.notice.unwrap();
            assert_eq!(notice.title, "LaTeX error");
            assert!(!notice.description.is_empty());
        }
    }
}
