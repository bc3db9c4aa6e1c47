//! Single-pass translator from the Jack object language to a textual
//! stack-VM intermediate representation.
//!
//! [`compile`] is the whole public surface: feed it one class's source
//! text and a sink, get back VM text or a [`error::CompileError`]. There
//! is no AST — the [`engine`] emits instructions as it parses.

pub mod emitter;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod symbol_table;

use std::io::Write;
use std::path::PathBuf;

pub use error::CompileError;

/// Compiles one `.jack` class's source text, writing the translated VM
/// text to `writer`. `path` is carried through only to tag I/O errors.
pub fn compile<W: Write>(source: &str, path: impl Into<PathBuf>, writer: W) -> Result<(), CompileError> {
    engine::compile_unit(source, path, writer)
}
