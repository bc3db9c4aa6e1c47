//! Recursive-descent compiler: consumes tokens from a [`Lexer`], mutates a
//! [`SymbolTable`], and writes VM instructions to an [`Emitter`] as it goes.
//! There is no intermediate tree — every parse routine is also an emitter.

mod expressions;
mod statements;

use std::io::{self, Write};
use std::path::PathBuf;

use crate::emitter::Emitter;
use crate::error::{CompileError, IoError, LookupError, ParseError};
use crate::lexer::{Keyword, Lexer, Token};
use crate::symbol_table::{SymbolTable, VarKind};

enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

/// One translation unit's worth of state: token cursor, symbol table,
/// output sink, and the current-class/current-subroutine/label-counter
/// context the grammar needs.
pub struct CompilationEngine<'src, W: Write> {
    lexer: Lexer<'src>,
    symbols: SymbolTable,
    emitter: Emitter<W>,
    path: PathBuf,
    class_name: String,
    label_counter: u32,
}

impl<'src, W: Write> CompilationEngine<'src, W> {
    /// Builds the engine and primes the token cursor with the first token,
    /// so `compile_class` can assume `current()` is always meaningful.
    pub fn new(source: &'src str, path: impl Into<PathBuf>, writer: W) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(source);
        lexer.advance()?;
        Ok(Self {
            lexer,
            symbols: SymbolTable::new(),
            emitter: Emitter::new(writer),
            path: path.into(),
            class_name: String::new(),
            label_counter: 0,
        })
    }

    /// Drives the whole `class ::= 'class' IDENT '{' classVarDec* subroutine* '}'`
    /// production, flushing the emitter on success.
    pub fn compile_class(mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol("{")?;

        while self.current().is_keyword(Keyword::Static) || self.current().is_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }

        while self.is_subroutine_start() {
            self.compile_subroutine()?;
        }

        self.expect_symbol("}")?;
        let path = self.path.clone();
        self.emitter.close(&path)?;
        Ok(())
    }

    fn is_subroutine_start(&self) -> bool {
        self.current().is_keyword(Keyword::Constructor)
            || self.current().is_keyword(Keyword::Function)
            || self.current().is_keyword(Keyword::Method)
    }

    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        let kind = match self.current() {
            Token::Keyword(Keyword::Static) => VarKind::Static,
            Token::Keyword(Keyword::Field) => VarKind::Field,
            _ => unreachable!("guarded by caller"),
        };
        self.advance()?;
        let var_type = self.parse_type()?;
        loop {
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &var_type, kind);
            if self.current().is_symbol(",") {
                self.advance()?;
                continue;
            }
            break;
        }
        self.expect_symbol(";")?;
        Ok(())
    }

    fn compile_subroutine(&mut self) -> Result<(), CompileError> {
        let kind = match self.current() {
            Token::Keyword(Keyword::Constructor) => SubroutineKind::Constructor,
            Token::Keyword(Keyword::Function) => SubroutineKind::Function,
            Token::Keyword(Keyword::Method) => SubroutineKind::Method,
            _ => unreachable!("guarded by caller"),
        };
        self.advance()?;
        self.symbols.start_subroutine();

        let return_type = if self.current().is_keyword(Keyword::Void) {
            self.advance()?;
            "void".to_string()
        } else {
            self.parse_type()?
        };

        let name = self.expect_identifier()?;
        let qualified_name = format!("{}.{name}", self.class_name);
        self.symbols.define_method(&name, &return_type);

        if matches!(kind, SubroutineKind::Method) {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, VarKind::Argument);
        }

        self.expect_symbol("(")?;
        self.compile_parameter_list()?;
        self.expect_symbol(")")?;

        self.expect_symbol("{")?;
        while self.current().is_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let n_locals = self.symbols.var_count(VarKind::Local);
        self.function(&qualified_name, n_locals)?;

        match kind {
            SubroutineKind::Constructor => {
                let n_fields = self.symbols.var_count(VarKind::Field);
                self.push("constant", n_fields)?;
                self.call("Memory.alloc", 1)?;
                self.pop("pointer", 0)?;
            }
            SubroutineKind::Method => {
                self.push("argument", 0)?;
                self.pop("pointer", 0)?;
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements()?;
        self.expect_symbol("}")?;
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), CompileError> {
        if self.current().is_symbol(")") {
            return Ok(());
        }
        loop {
            let var_type = self.parse_type()?;
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &var_type, VarKind::Argument);
            if self.current().is_symbol(",") {
                self.advance()?;
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), CompileError> {
        self.advance()?; // 'var'
        let var_type = self.parse_type()?;
        loop {
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &var_type, VarKind::Local);
            if self.current().is_symbol(",") {
                self.advance()?;
                continue;
            }
            break;
        }
        self.expect_symbol(";")?;
        Ok(())
    }

    fn parse_type(&mut self) -> Result<String, CompileError> {
        let ty = match self.current().clone() {
            Token::Keyword(Keyword::Int) => "int".to_string(),
            Token::Keyword(Keyword::Char) => "char".to_string(),
            Token::Keyword(Keyword::Boolean) => "boolean".to_string(),
            Token::Identifier(name) => name,
            other => return Err(self.parse_error("a type", &other)),
        };
        self.advance()?;
        Ok(ty)
    }

    // --- token-cursor plumbing -------------------------------------------------

    fn current(&self) -> &Token {
        self.lexer.current()
    }

    fn line(&self) -> u32 {
        self.lexer.line()
    }

    fn advance(&mut self) -> Result<(), CompileError> {
        self.lexer.advance().map_err(Into::into)
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<(), CompileError> {
        if !self.current().is_keyword(kw) {
            return Err(self.parse_error(&format!("keyword '{}'", kw.as_str()), &self.current().clone()));
        }
        self.advance()
    }

    fn expect_symbol(&mut self, sym: &str) -> Result<(), CompileError> {
        if !self.current().is_symbol(sym) {
            return Err(self.parse_error(&format!("symbol '{sym}'"), &self.current().clone()));
        }
        self.advance()
    }

    fn expect_identifier(&mut self) -> Result<String, CompileError> {
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(self.parse_error("an identifier", &other)),
        }
    }

    fn parse_error(&self, expected: &str, found: &Token) -> CompileError {
        ParseError {
            expected: expected.to_string(),
            found: found.describe(),
            line: self.line(),
        }
        .into()
    }

    fn lookup_error(&self, name: &str) -> CompileError {
        LookupError {
            name: name.to_string(),
            line: self.line(),
        }
        .into()
    }

    fn next_label(&mut self, prefix: &str) -> String {
        let label = format!("{}_{prefix}_{}", self.class_name, self.label_counter);
        self.label_counter += 1;
        label
    }

    // --- emission plumbing -------------------------------------------------

    fn emit(&mut self, result: io::Result<()>) -> Result<(), CompileError> {
        result.map_err(|source| {
            CompileError::Io(IoError {
                path: self.path.clone(),
                source,
            })
        })
    }

    fn push(&mut self, segment: &str, index: u16) -> Result<(), CompileError> {
        let r = self.emitter.write_push(segment, index);
        self.emit(r)
    }

    fn pop(&mut self, segment: &str, index: u16) -> Result<(), CompileError> {
        let r = self.emitter.write_pop(segment, index);
        self.emit(r)
    }

    fn arith(&mut self, op: &str) -> Result<(), CompileError> {
        let r = self.emitter.write_arithmetic(op);
        self.emit(r)
    }

    fn label(&mut self, name: &str) -> Result<(), CompileError> {
        let r = self.emitter.write_label(name);
        self.emit(r)
    }

    fn goto(&mut self, name: &str) -> Result<(), CompileError> {
        let r = self.emitter.write_goto(name);
        self.emit(r)
    }

    fn if_goto(&mut self, name: &str) -> Result<(), CompileError> {
        let r = self.emitter.write_if(name);
        self.emit(r)
    }

    fn call(&mut self, name: &str, n_args: u16) -> Result<(), CompileError> {
        let r = self.emitter.write_call(name, n_args);
        self.emit(r)
    }

    fn function(&mut self, name: &str, n_locals: u16) -> Result<(), CompileError> {
        let r = self.emitter.write_function(name, n_locals);
        self.emit(r)
    }

    fn ret(&mut self) -> Result<(), CompileError> {
        let r = self.emitter.write_return();
        self.emit(r)
    }

    fn push_variable(&mut self, name: &str) -> Result<(), CompileError> {
        let (segment, index) = self.resolve_variable(name)?;
        self.push(segment, index)
    }

    fn pop_variable(&mut self, name: &str) -> Result<(), CompileError> {
        let (segment, index) = self.resolve_variable(name)?;
        self.pop(segment, index)
    }

    fn resolve_variable(&self, name: &str) -> Result<(&'static str, u16), CompileError> {
        let kind = self.symbols.kind_of(name);
        if kind == VarKind::None {
            return Err(self.lookup_error(name));
        }
        let index = self
            .symbols
            .index_of(name)
            .expect("kind_of confirmed a live entry");
        Ok((kind.segment(), index))
    }
}

/// Convenience entry point: reads a source string, compiles it, writes the
/// translated VM text to `writer`. `path` is carried only for error reports.
pub fn compile_unit<W: Write>(source: &str, path: impl Into<PathBuf>, writer: W) -> Result<(), CompileError> {
    CompilationEngine::new(source, path, writer)?.compile_class()
}
