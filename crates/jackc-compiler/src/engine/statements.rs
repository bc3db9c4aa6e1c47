//! `statements ::= (let|if|while|do|return)*`

use std::io::Write;

use super::CompilationEngine;
use crate::error::CompileError;
use crate::lexer::{Keyword, Token};

impl<W: Write> CompilationEngine<'_, W> {
    pub(super) fn compile_statements(&mut self) -> Result<(), CompileError> {
        loop {
            match self.current() {
                Token::Keyword(Keyword::Let) => self.compile_let()?,
                Token::Keyword(Keyword::If) => self.compile_if()?,
                Token::Keyword(Keyword::While) => self.compile_while()?,
                Token::Keyword(Keyword::Do) => self.compile_do()?,
                Token::Keyword(Keyword::Return) => self.compile_return()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.advance()?; // 'let'
        let name = self.expect_identifier()?;

        if self.current().is_symbol("[") {
            // Canonical idx-first, that-last array store: the RHS may
            // itself index an array and clobber `that`, so the address
            // is scratch-saved in temp 0 before the RHS runs.
            self.advance()?;
            self.push_variable(&name)?;
            self.compile_expression()?;
            self.expect_symbol("]")?;
            self.arith("add")?;
            self.expect_symbol("=")?;
            self.compile_expression()?;
            self.expect_symbol(";")?;
            self.pop("temp", 0)?;
            self.pop("pointer", 1)?;
            self.push("temp", 0)?;
            self.pop("that", 0)
        } else {
            self.expect_symbol("=")?;
            self.compile_expression()?;
            self.expect_symbol(";")?;
            self.pop_variable(&name)
        }
    }

    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.advance()?; // 'if'
        self.expect_symbol("(")?;
        self.compile_expression()?;
        self.expect_symbol(")")?;
        self.arith("not")?;

        let l_false = self.next_label("IF_FALSE");
        let l_end = self.next_label("IF_END");

        self.if_goto(&l_false)?;
        self.expect_symbol("{")?;
        self.compile_statements()?;
        self.expect_symbol("}")?;
        self.goto(&l_end)?;

        self.label(&l_false)?;
        if self.current().is_keyword(Keyword::Else) {
            self.advance()?;
            self.expect_symbol("{")?;
            self.compile_statements()?;
            self.expect_symbol("}")?;
        }
        self.label(&l_end)
    }

    fn compile_while(&mut self) -> Result<(), CompileError> {
        self.advance()?; // 'while'
        let l_start = self.next_label("WHILE_EXP");
        let l_end = self.next_label("WHILE_END");

        self.label(&l_start)?;
        self.expect_symbol("(")?;
        self.compile_expression()?;
        self.expect_symbol(")")?;
        self.arith("not")?;
        self.if_goto(&l_end)?;

        self.expect_symbol("{")?;
        self.compile_statements()?;
        self.expect_symbol("}")?;
        self.goto(&l_start)?;

        self.label(&l_end)
    }

    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.advance()?; // 'do'
        self.compile_subroutine_call()?;
        self.expect_symbol(";")?;
        self.pop("temp", 0)
    }

    fn compile_return(&mut self) -> Result<(), CompileError> {
        self.advance()?; // 'return'
        if self.current().is_symbol(";") {
            self.push("constant", 0)?;
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(";")?;
        self.ret()
    }
}
