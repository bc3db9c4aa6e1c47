//! Layered error types for the translation pipeline.
//!
//! Every variant carries at most a line number — never a byte offset or
//! column — the source-location story here stops at "which line".

use std::path::PathBuf;

/// Failures from the lexer: bad characters, unterminated or multi-line strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("line {line}: invalid character '{ch}'")]
    InvalidCharacter { ch: char, line: u32 },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: u32 },

    #[error("line {line}: newline in string literal")]
    NewlineInString { line: u32 },

    #[error("line {line}: integer constant out of range 0..32767")]
    IntOutOfRange { line: u32 },
}

/// Failures from the recursive-descent parser: the token under the cursor
/// doesn't fit any production the grammar allows there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: expected {expected}, found {found}")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub line: u32,
}

/// A name was used where the symbol table has no entry for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: undefined name '{name}'")]
pub struct LookupError {
    pub name: String,
    pub line: u32,
}

/// A source or output file could not be opened, read, or written.
#[derive(Debug, thiserror::Error)]
#[error("{path}: {source}")]
pub struct IoError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Top-level error for a single compilation unit. `?` composes freely
/// across the lexer, parser, and symbol table layers into this type.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Io(#[from] IoError),
}
