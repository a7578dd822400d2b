//! Recursive tree builder.
//!
//! Scans formula source left to right and builds a `Vec<MathNode>`. Structural
//! commands, brackets and scripts extract a balanced block and re-enter the
//! builder on that block. The builder is total: unknown commands, missing
//! arguments and unterminated delimiters all degrade to literal text.

use crate::ast::{flatten_text, MathNode};
use crate::commands::{self, Command, COLUMN_SEPARATOR, COMBINING_ARROW, ROW_SEPARATOR};
use crate::scanner::{EndMarkers, Scanner};
use crate::ESCAPE;
use std::collections::HashSet;

/// Nesting depth past which a block is kept as literal text instead of being parsed.
///
/// The fallback covers the whole block, so valid commands inside it come out
/// verbatim in a single `Run` rather than as structure. Recursion, and with it
/// stack use, is bounded by this depth.
pub const MAX_DEPTH: usize = 256;

/// Characters that end a plain-text run.
fn is_run_char(c: char) -> bool {
    !matches!(c, ESCAPE | '^' | '_' | '{' | '}' | '(' | ')' | '[' | ']')
}

/// Formula parser over one (sub-)slice of source.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    nodes: Vec<MathNode>,
    depth: usize,
    /// Built on the first `\begin` in this slice.
    end_markers: Option<EndMarkers>,
    /// Environments whose closing marker is known to be absent from here on.
    unterminated: HashSet<String>,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given characters at nesting depth 0.
    pub fn new(chars: &'a [char]) -> Self {
        Self::at_depth(chars, 0)
    }

    fn at_depth(chars: &'a [char], depth: usize) -> Self {
        Self {
            scanner: Scanner::new(chars),
            nodes: Vec::new(),
            depth,
            end_markers: None,
            unterminated: HashSet::new(),
        }
    }

    /// Parse formula source into a node sequence. Never fails.
    pub fn parse(source: &str) -> Vec<MathNode> {
        let chars: Vec<char> = source.chars().collect();
        Parser::new(&chars).parse_sequence()
    }

    /// Consume the whole slice.
    pub fn parse_sequence(mut self) -> Vec<MathNode> {
        while let Some(c) = self.scanner.peek() {
            let start = self.scanner.pos();

            match c {
                ESCAPE => self.parse_command(),
                '^' | '_' => self.parse_script(c),
                '(' => self.parse_bracket('(', ')'),
                '[' => self.parse_bracket('[', ']'),
                c if is_run_char(c) => self.parse_run(),
                _ => {
                    // Stray brace or closer outside any block
                    self.scanner.advance();
                }
            }

            debug_assert!(self.scanner.pos() > start, "parser did not advance at {start}");
        }

        self.nodes
    }

    /// Parse a nested block one level deeper.
    fn nested(&self, chars: &[char]) -> Vec<MathNode> {
        if self.depth >= MAX_DEPTH {
            log::trace!("nesting limit reached, keeping block as text");
            let text: String = chars.iter().collect();
            return vec![MathNode::run(text)];
        }
        Parser::at_depth(chars, self.depth + 1).parse_sequence()
    }

    // =========================================================================
    // Plain text and brackets
    // =========================================================================

    fn parse_run(&mut self) {
        let start = self.scanner.pos();
        while self.scanner.peek().is_some_and(is_run_char) {
            self.scanner.advance();
        }

        let text: String = self.scanner.chars()[start..self.scanner.pos()].iter().collect();
        let text = text.trim();
        if !text.is_empty() {
            self.nodes.push(MathNode::run(text));
        }
    }

    /// Called with the cursor on `open`, so extraction always matches; an
    /// unterminated block runs to the end of the slice.
    fn parse_bracket(&mut self, open: char, close: char) {
        if let Some(block) = self.scanner.balanced(open, close) {
            let children = self.nested(block.content);
            self.nodes.push(if open == '(' {
                MathNode::round(children)
            } else {
                MathNode::square(children)
            });
        }
    }

    // =========================================================================
    // Scripts
    // =========================================================================

    /// `^` / `_`: the most recent node becomes the base, whatever its kind.
    fn parse_script(&mut self, op: char) {
        self.scanner.advance(); // consume operator
        let base = self.nodes.pop();

        let mut args = self.scanner.clone();
        match self.script_operand(&mut args) {
            Some(script) => {
                self.scanner = args;
                let base: Vec<MathNode> = base.into_iter().collect();
                self.nodes.push(if op == '^' {
                    MathNode::superscript(base, script)
                } else {
                    MathNode::subscript(base, script)
                });
            }
            None => {
                self.nodes.extend(base);
                self.nodes.push(MathNode::run(op));
            }
        }
    }

    /// A brace group, or else exactly one character. `None` only at end of input.
    fn script_operand(&self, args: &mut Scanner<'a>) -> Option<Vec<MathNode>> {
        args.skip_whitespace();
        let c = args.peek()?;

        if c == '{' {
            let block = args.group()?;
            return Some(self.nested(block.content));
        }

        args.advance();
        Some(vec![MathNode::run(c)])
    }

    // =========================================================================
    // Commands
    // =========================================================================

    fn parse_command(&mut self) {
        let name = self.scanner.command_name();
        self.scanner.skip_spaces();

        let command = commands::lookup(&name);
        if command == Command::Sizing {
            // The delimiter after \left / \right is handled as an ordinary bracket.
            return;
        }

        // Arguments are read on a copy so a failed command consumes only its name.
        let mut args = self.scanner.clone();
        match self.build_command(command, &name, &mut args) {
            Some(node) => {
                self.scanner = args;
                self.nodes.push(node);
            }
            None => {
                if command != Command::Unknown {
                    log::trace!("missing argument for \\{name}, keeping it as text");
                }
                self.nodes.push(MathNode::run(format!("{ESCAPE}{name}")));
            }
        }
    }

    fn build_command(
        &mut self,
        command: Command,
        name: &str,
        args: &mut Scanner<'a>,
    ) -> Option<MathNode> {
        match command {
            Command::Symbol(glyph) => Some(MathNode::run(glyph)),
            Command::Function => Some(MathNode::run(name)),
            Command::Fraction => self.build_fraction(args),
            Command::Radical => self.build_radical(args),
            Command::Binomial => self
                .build_fraction(args)
                .map(|frac| MathNode::round(vec![frac])),
            Command::Arrow => {
                let block = args.group()?;
                let mut text = flatten_text(&self.nested(block.content));
                text.push(COMBINING_ARROW);
                Some(MathNode::run(text))
            }
            Command::Blackboard => {
                let block = args.group()?;
                let text = flatten_text(&self.nested(block.content));
                let glyph = commands::blackboard(&text).map(str::to_owned);
                Some(MathNode::run(glyph.unwrap_or(text)))
            }
            Command::Environment => self.build_environment(args),
            Command::Sizing | Command::Unknown => None,
        }
    }

    /// `{num}{den}`, shared by `\frac` and `\binom`.
    fn build_fraction(&self, args: &mut Scanner<'a>) -> Option<MathNode> {
        let numerator = args.group()?;
        let denominator = args.group()?;
        Some(MathNode::fraction(
            self.nested(numerator.content),
            self.nested(denominator.content),
        ))
    }

    /// `[degree]{content}` with the degree optional.
    fn build_radical(&self, args: &mut Scanner<'a>) -> Option<MathNode> {
        let degree = if args.peek_is('[') {
            args.balanced('[', ']')
                .map(|block| self.nested(block.content))
        } else {
            None
        };

        let content = args.group()?;
        Some(MathNode::radical(self.nested(content.content), degree))
    }

    /// `{env} raw text \end{env}`. The body is not parsed.
    fn build_environment(&mut self, args: &mut Scanner<'a>) -> Option<MathNode> {
        let env = args.group()?.text();
        let marker: Vec<char> = format!("{ESCAPE}end{{{env}}}").chars().collect();

        let Some(end) = self.find_end_marker(&env, &marker, args) else {
            log::trace!("no closing marker for environment '{env}'");
            return Some(MathNode::run(format!("{ESCAPE}begin{{{env}}}")));
        };

        let body: String = args.chars()[args.pos()..end].iter().collect();
        args.seek(end + marker.len());

        let body = body
            .replace(ROW_SEPARATOR.0, ROW_SEPARATOR.1)
            .replace(COLUMN_SEPARATOR.0, COLUMN_SEPARATOR.1);
        Some(MathNode::square(vec![MathNode::run(body)]))
    }

    /// Position of the next `\end{env}` at or after the argument cursor.
    ///
    /// The cursor only moves forward, so a marker missing once stays missing
    /// for the rest of the slice.
    fn find_end_marker(
        &mut self,
        env: &str,
        marker: &[char],
        args: &Scanner<'a>,
    ) -> Option<usize> {
        if self.unterminated.contains(env) {
            return None;
        }

        let found = if EndMarkers::indexes(env) {
            let chars = args.chars();
            self.end_markers
                .get_or_insert_with(|| EndMarkers::index(chars))
                .find(env, args.pos())
        } else {
            args.find(marker)
        };

        if found.is_none() {
            self.unterminated.insert(env.to_string());
        }
        found
    }
}
