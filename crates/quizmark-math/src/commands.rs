//! Command table.
//!
//! Maps a control-word name to what the parser should do with it. The table is
//! pure data; argument consumption lives in the parser.

/// Classification of a control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fixed glyph, no arguments.
    Symbol(&'static str),
    /// Function word emitted verbatim (`sin`, `lim`, `sum`).
    Function,
    /// `\frac{num}{den}`
    Fraction,
    /// `\sqrt[deg]{content}`
    Radical,
    /// `\binom{n}{k}`
    Binomial,
    /// `\vec{a}` and `\overrightarrow{AB}`
    Arrow,
    /// `\mathbb{R}`
    Blackboard,
    /// `\begin{env} ... \end{env}`
    Environment,
    /// `\left` and `\right`, no node of their own
    Sizing,
    Unknown,
}

/// Combining right arrow appended by `\vec`.
pub const COMBINING_ARROW: char = '\u{20D7}';

/// Row and column separators inside an environment block, and their replacements.
pub const ROW_SEPARATOR: (&str, &str) = ("\\\\", " ; ");
pub const COLUMN_SEPARATOR: (&str, &str) = ("&", " ");

/// Function words rendered as their own name.
pub const FUNCTION_WORDS: &[&str] = &[
    "sum", "prod", "int", "iint", "iiint", "oint", "lim", "sin", "cos", "tan", "cot", "sec",
    "csc", "arcsin", "arccos", "arctan", "sinh", "cosh", "tanh", "log", "ln", "lg", "exp", "max",
    "min",
];

/// Classify a command name.
pub fn lookup(name: &str) -> Command {
    match name {
        "frac" => Command::Fraction,
        "sqrt" => Command::Radical,
        "binom" => Command::Binomial,
        "vec" | "overrightarrow" => Command::Arrow,
        "mathbb" => Command::Blackboard,
        "begin" => Command::Environment,
        "left" | "right" => Command::Sizing,
        _ if FUNCTION_WORDS.contains(&name) => Command::Function,
        _ => symbol(name).map_or(Command::Unknown, Command::Symbol),
    }
}

/// Glyph for a terminal symbol command.
pub fn symbol(name: &str) -> Option<&'static str> {
    let glyph = match name {
        // Lower-case Greek
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "vartheta" => "ϑ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "varpi" => "ϖ",
        "rho" => "ρ",
        "varrho" => "ϱ",
        "sigma" => "σ",
        "varsigma" => "ς",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",

        // Upper-case Greek with distinct glyphs
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Upsilon" => "Υ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",

        // Arithmetic
        "times" => "×",
        "div" => "÷",
        "pm" => "±",
        "mp" => "∓",
        "cdot" => "·",
        "ast" => "*",
        "star" => "⋆",
        "circ" => "∘",
        "bullet" => "•",
        "oplus" => "⊕",
        "ominus" => "⊖",
        "otimes" => "⊗",
        "oslash" => "⊘",
        "coprod" => "∐",
        "bigcup" => "⋃",
        "bigcap" => "⋂",

        // Relations
        "neq" => "≠",
        "leq" => "≤",
        "geq" => "≥",
        "ll" => "≪",
        "gg" => "≫",
        "approx" => "≈",
        "equiv" => "≡",
        "sim" => "∼",
        "simeq" => "≃",
        "cong" => "≅",
        "propto" => "∝",
        "perp" => "⊥",
        "parallel" => "∥",

        // Sets
        "in" => "∈",
        "notin" => "∉",
        "ni" => "∋",
        "subset" => "⊂",
        "subseteq" => "⊆",
        "supset" => "⊃",
        "supseteq" => "⊇",
        "cup" => "∪",
        "cap" => "∩",
        "setminus" => "∖",
        "emptyset" => "∅",

        // Calculus and logic
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "forall" => "∀",
        "exists" => "∃",
        "nexists" => "∄",
        "neg" => "¬",
        "land" => "∧",
        "lor" => "∨",

        // Arrows
        "to" | "rightarrow" => "→",
        "leftarrow" => "←",
        "leftrightarrow" => "↔",
        "Rightarrow" | "implies" => "⇒",
        "Leftarrow" => "⇐",
        "Leftrightarrow" | "iff" => "⇔",

        // Geometry
        "angle" => "∠",
        "triangle" => "△",

        // Dots
        "ldots" => "…",
        "cdots" => "⋯",
        "vdots" => "⋮",
        "ddots" => "⋱",

        // Fences
        "langle" => "⟨",
        "rangle" => "⟩",
        "lceil" => "⌈",
        "rceil" => "⌉",
        "lfloor" => "⌊",
        "rfloor" => "⌋",

        _ => return None,
    };
    Some(glyph)
}

/// Blackboard-bold glyph for a single letter, if it has one.
pub fn blackboard(letter: &str) -> Option<&'static str> {
    match letter {
        "N" => Some("ℕ"),
        "Z" => Some("ℤ"),
        "Q" => Some("ℚ"),
        "R" => Some("ℝ"),
        "C" => Some("ℂ"),
        _ => None,
    }
}
