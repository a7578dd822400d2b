//! Quizmark renderers
//!
//! Turns formula markup into a target math representation. Every target shares
//! one capability, [`Render`]:
//!
//! ```text
//! markup → quizmark_math::parse() → OmmlRenderer   → <m:oMath> (document export)
//!                                 → MathmlRenderer → <math>
//! markup → KaTeX ─────────────────→ KatexRenderer  → HTML      (interactive preview)
//! ```
//!
//! The preview deliberately skips the quizmark tree: the tree parser accepts
//! any input, while KaTeX rejects markup it cannot typeset.
//!
//! [`preview::render_preview`] handles prose with `$...$` formulas on top of
//! any `Render` implementation.

pub mod mathml;
pub mod omml;
pub mod preview;
pub mod typeset;

pub use mathml::MathmlRenderer;
pub use omml::{OmmlOptions, OmmlRenderer};
pub use preview::{render_preview, split_inline_math, Notice, Preview, Segment};
pub use typeset::KatexRenderer;

/// Rendering error reported by a backend that could not format a formula.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Render error: {message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Render formula markup into a target representation.
pub trait Render {
    /// Short target name, e.g. `"omml"`.
    fn target(&self) -> &'static str;

    /// Render one formula.
    fn render(&self, markup: &str) -> Result<String, RenderError>;
}

/// Escape text for XML element content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
