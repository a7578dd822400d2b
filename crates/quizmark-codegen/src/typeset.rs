//! KaTeX typesetting for the interactive preview.
//!
//! Hands the raw markup to KaTeX instead of the quizmark tree, so the preview
//! and the document export are independent and may disagree. KaTeX rejects
//! markup it cannot typeset; the rejection surfaces as a [`RenderError`].

use crate::{Render, RenderError};
use katex::{KatexContext, OutputFormat, Settings};

/// Renders formulas to KaTeX HTML (with hidden MathML for accessibility).
pub struct KatexRenderer {
    context: KatexContext,
    settings: Settings,
}

impl KatexRenderer {
    /// Building the context registers every KaTeX function and symbol, so
    /// keep one renderer around rather than creating one per formula.
    pub fn new(display_mode: bool) -> Self {
        let mut settings = Settings::default();
        settings.display_mode = display_mode;
        settings.output = OutputFormat::HtmlAndMathml;
        settings.throw_on_error = true;
        Self {
            context: KatexContext::default(),
            settings,
        }
    }
}

impl Default for KatexRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Render for KatexRenderer {
    fn target(&self) -> &'static str {
        "katex"
    }

    fn render(&self, markup: &str) -> Result<String, RenderError> {
        katex::render_to_string(&self.context, markup, &self.settings)
            .map_err(|e| RenderError::new(e.to_string()))
    }
}
