//! Parser adapters (spec §4.1).
//!
//! Two adapters, [`c`] and [`python`], each turn source text into a
//! [`ParseTree`]: a comment-stripped, line-indexed view of the file.
//! Neither adapter encodes any rule logic — they only recover from
//! malformed input (an unterminated block comment, a truncated
//! triple-quoted string) well enough that the symbol extractor always
//! gets a best-effort tree, never a hard parse error. A half-written
//! buffer mid-keystroke is the normal case, not an edge case.

pub mod c;
pub mod python;

/// One line of source with comments removed from `code` but preserved
/// (verbatim) in `raw`. 1-based `line` matches editor/diagnostic
/// conventions throughout the engine.
#[derive(Clone, Debug)]
pub struct SourceLine {
    pub line: usize,
    pub raw: String,
    pub code: String,
}

/// A parsed file: just its comment-stripped lines. Adapters expose no
/// richer node structure because every downstream consumer (the
/// extractor) works by pattern-matching against line text, the same
/// way the repo's Python and Rust analyzers already do.
#[derive(Clone, Debug)]
pub struct ParseTree {
    pub lines: Vec<SourceLine>,
}

impl ParseTree {
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().map(|l| (l.line, l.code.as_str()))
    }
}
