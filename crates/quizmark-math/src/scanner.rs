use crate::ESCAPE;
use std::collections::HashMap;

/// Content between a matched delimiter pair and the index just past the closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub content: &'a [char],
    pub next: usize,
}

impl Block<'_> {
    pub fn text(&self) -> String {
        self.content.iter().collect()
    }
}

/// Character cursor over formula source.
///
/// Index-based navigation over a `char` slice, so nested blocks can be
/// re-scanned as sub-slices without copying. Every method either advances
/// `pos` or leaves it untouched; none moves backwards.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self { chars, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn chars(&self) -> &'a [char] {
        self.chars
    }

    /// Move to `pos`. Positions behind the cursor are ignored and past-the-end is clamped.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.clamp(self.pos, self.chars.len());
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_is(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skip spaces only (the separator allowed between a command name and its arguments).
    pub fn skip_spaces(&mut self) {
        while self.peek_is(' ') {
            self.advance();
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Read a command name after the escape character: a maximal run of ASCII letters.
    /// The cursor must sit on the escape character.
    pub fn command_name(&mut self) -> String {
        debug_assert!(self.peek_is(ESCAPE));
        self.advance();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Extract a balanced `open ... close` block starting exactly at the cursor.
    ///
    /// Nested pairs are tracked with a depth counter. An unterminated block runs
    /// to end of input. Returns `None` without moving when the cursor is not on `open`.
    pub fn balanced(&mut self, open: char, close: char) -> Option<Block<'a>> {
        let block = extract_balanced(self.chars, self.pos, open, close)?;
        self.pos = block.next;
        Some(block)
    }

    /// Extract a `{...}` group, allowing whitespace before the opening brace.
    /// The cursor is left untouched when no group follows.
    pub fn group(&mut self) -> Option<Block<'a>> {
        let block = extract_group(self.chars, self.pos)?;
        self.pos = block.next;
        Some(block)
    }

    /// Index of the first occurrence of `needle` at or after the cursor.
    pub fn find(&self, needle: &[char]) -> Option<usize> {
        if needle.is_empty() {
            return Some(self.pos);
        }
        self.chars[self.pos..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|offset| self.pos + offset)
    }
}

/// Positions of every `\end{name}` marker in a slice, collected in one pass.
///
/// Only names without `{`, `}` or `\` are indexed; [`EndMarkers::indexes`]
/// tells whether a name can be looked up here.
#[derive(Debug, Default)]
pub struct EndMarkers {
    positions: HashMap<String, Vec<usize>>,
}

const END_PREFIX: [char; 5] = [ESCAPE, 'e', 'n', 'd', '{'];

impl EndMarkers {
    pub fn index(chars: &[char]) -> Self {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        let mut i = 0;

        while i < chars.len() {
            if !chars[i..].starts_with(&END_PREFIX) {
                i += 1;
                continue;
            }
            let start = i + END_PREFIX.len();
            let mut j = start;
            while j < chars.len() && !matches!(chars[j], '{' | '}' | ESCAPE) {
                j += 1;
            }
            if chars.get(j) == Some(&'}') {
                let name: String = chars[start..j].iter().collect();
                positions.entry(name).or_default().push(i);
                i = j + 1;
            } else {
                // Stopped on `{`, `\` or end of input: resume there.
                i = j;
            }
        }

        Self { positions }
    }

    pub fn indexes(name: &str) -> bool {
        !name.contains(['{', '}', ESCAPE])
    }

    /// First `\end{name}` at or after `from`.
    pub fn find(&self, name: &str, from: usize) -> Option<usize> {
        let list = self.positions.get(name)?;
        list.get(list.partition_point(|&p| p < from)).copied()
    }
}

/// Balanced-delimiter extraction on a raw slice. See [`Scanner::balanced`].
pub fn extract_balanced(chars: &[char], pos: usize, open: char, close: char) -> Option<Block<'_>> {
    if chars.get(pos) != Some(&open) {
        return None;
    }

    let start = pos + 1;
    let mut depth = 1usize;
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        if c == open && open != close {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(Block {
                    content: &chars[start..i],
                    next: i + 1,
                });
            }
        }
        i += 1;
    }

    // Unterminated: take everything to end of input.
    Some(Block {
        content: &chars[start..],
        next: chars.len(),
    })
}

/// Curly-brace extraction with leading whitespace skipped.
pub fn extract_group(chars: &[char], pos: usize) -> Option<Block<'_>> {
    let mut i = pos;
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    extract_balanced(chars, i, '{', '}')
}
