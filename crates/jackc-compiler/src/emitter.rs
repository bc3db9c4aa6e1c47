//! Line-oriented writer for the stack-VM text format: one instruction per
//! line, space-separated fields, no other structure.

use std::io::{self, BufWriter, Write};

use crate::error::IoError;

/// Wraps any `Write` in a `BufWriter` and exposes one method per VM
/// instruction so the compiler engine never hand-formats a line itself.
pub struct Emitter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
        }
    }

    pub fn write_push(&mut self, segment: &str, index: u16) -> io::Result<()> {
        writeln!(self.out, "push {segment} {index}")
    }

    pub fn write_pop(&mut self, segment: &str, index: u16) -> io::Result<()> {
        writeln!(self.out, "pop {segment} {index}")
    }

    pub fn write_arithmetic(&mut self, command: &str) -> io::Result<()> {
        writeln!(self.out, "{command}")
    }

    pub fn write_label(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "label {label}")
    }

    pub fn write_goto(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "goto {label}")
    }

    pub fn write_if(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "if-goto {label}")
    }

    pub fn write_call(&mut self, name: &str, n_args: u16) -> io::Result<()> {
        writeln!(self.out, "call {name} {n_args}")
    }

    pub fn write_function(&mut self, name: &str, n_locals: u16) -> io::Result<()> {
        writeln!(self.out, "function {name} {n_locals}")
    }

    pub fn write_return(&mut self) -> io::Result<()> {
        writeln!(self.out, "return")
    }

    /// Flushes the buffer, translating any I/O failure into an [`IoError`]
    /// tagged with the given path for the caller's error report.
    pub fn close(mut self, path: &std::path::Path) -> Result<(), IoError> {
        self.out.flush().map_err(|source| IoError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(f: impl FnOnce(&mut Emitter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut emitter = Emitter::new(Vec::new());
        f(&mut emitter).unwrap();
        String::from_utf8(emitter.out.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn push_pop() {
        assert_eq!(emit(|e| e.write_push("constant", 7)), "push constant 7\n");
        assert_eq!(emit(|e| e.write_pop("local", 2)), "pop local 2\n");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(emit(|e| e.write_arithmetic("add")), "add\n");
        assert_eq!(emit(|e| e.write_arithmetic("not")), "not\n");
    }

    #[test]
    fn control_flow() {
        assert_eq!(emit(|e| e.write_label("WHILE_EXP0")), "label WHILE_EXP0\n");
        assert_eq!(emit(|e| e.write_goto("WHILE_END0")), "goto WHILE_END0\n");
        assert_eq!(emit(|e| e.write_if("IF_TRUE0")), "if-goto IF_TRUE0\n");
    }

    #[test]
    fn calls_and_functions() {
        assert_eq!(
            emit(|e| e.write_call("Math.multiply", 2)),
            "call Math.multiply 2\n"
        );
        assert_eq!(
            emit(|e| e.write_function("Main.main", 3)),
            "function Main.main 3\n"
        );
        assert_eq!(emit(|e| e.write_return()), "return\n");
    }
}
