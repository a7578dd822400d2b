//! WASM bindings for the quizmark renderers.
//!
//! Exposes `to_omml()`, `to_mathml()`, `parse_tree()` and `preview()` to
//! JavaScript via wasm-bindgen.

use quizmark_codegen::{
    render_preview, KatexRenderer, MathmlRenderer, OmmlOptions, OmmlRenderer, Preview, Render,
};
use wasm_bindgen::prelude::*;

thread_local! {
    static PREVIEW: KatexRenderer = KatexRenderer::default();
}

/// Convert formula markup to an OMML `<m:oMath>` fragment.
///
/// With `paragraph` set, the fragment is wrapped in `<m:oMathPara>` for
/// display math.
#[wasm_bindgen]
pub fn to_omml(latex: &str, paragraph: Option<bool>) -> Result<String, JsError> {
    let renderer = OmmlRenderer::new(OmmlOptions {
        paragraph: paragraph.unwrap_or(false),
        namespace: false,
    });
    renderer
        .render(latex)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Convert formula markup to a MathML `<math>` element.
#[wasm_bindgen]
pub fn to_mathml(latex: &str) -> Result<String, JsError> {
    MathmlRenderer
        .render(latex)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Parse formula markup into a plain JS tree.
///
/// Each node is an object tagged by `type`, e.g.
/// `{ type: "fraction", numerator: [...], denominator: [...] }`.
#[wasm_bindgen]
pub fn parse_tree(latex: &str) -> Result<JsValue, JsError> {
    let nodes = quizmark_math::parse(latex);
    serde_wasm_bindgen::to_value(&nodes).map_err(|e| JsError::new(&e.to_string()))
}

/// Render question text for display with KaTeX.
///
/// Returns `{ html: string, notice: null | { title, description } }`. Never
/// throws on bad markup: the notice explains why the source text is shown.
#[wasm_bindgen]
pub fn preview(text: &str) -> Result<JsValue, JsError> {
    let Preview { html, notice } = PREVIEW.with(|katex| render_preview(text, katex));

    let notice = match notice {
        Some(notice) => {
            let obj = js_sys::Object::new();
            set(&obj, "title", &notice.title.into())?;
            set(&obj, "description", &notice.description.into())?;
            obj.into()
        }
        None => JsValue::NULL,
    };

    let js_obj = js_sys::Object::new();
    set(&js_obj, "html", &html.into())?;
    set(&js_obj, "notice", &notice)?;
    Ok(js_obj.into())
}

fn set(obj: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), JsError> {
    js_sys::Reflect::set(obj, &key.into(), value)
        .map(|_| ())
        .map_err(|_| JsError::new(&format!("Failed to set {key} property")))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
