//! `expr ::= term (op term)*`, left-to-right with no operator precedence,
//! and subroutine-call compilation shared between `do` statements and
//! call terms.

use std::io::Write;

use super::CompilationEngine;
use crate::error::CompileError;
use crate::lexer::{Keyword, Token};
use crate::symbol_table::VarKind;

fn is_binary_op(sym: &str) -> bool {
    matches!(sym, "+" | "-" | "*" | "/" | "&" | "|" | "<" | ">" | "=" | "<=" | ">=")
}

impl<W: Write> CompilationEngine<'_, W> {
    pub(super) fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;
        loop {
            let op = match self.current() {
                Token::Symbol(s) if is_binary_op(s) => s.clone(),
                _ => break,
            };
            self.advance()?;
            self.compile_term()?;
            self.emit_operator(&op)?;
        }
        Ok(())
    }

    fn emit_operator(&mut self, op: &str) -> Result<(), CompileError> {
        match op {
            "+" => self.arith("add"),
            "-" => self.arith("sub"),
            "*" => self.call("Math.multiply", 2),
            "/" => self.call("Math.divide", 2),
            "&" => self.arith("and"),
            "|" => self.arith("or"),
            "<" => self.arith("lt"),
            ">" => self.arith("gt"),
            "=" => self.arith("eq"),
            "<=" => {
                self.arith("gt")?;
                self.arith("not")
            }
            ">=" => {
                self.arith("lt")?;
                self.arith("not")
            }
            _ => unreachable!("is_binary_op only admits mapped operators"),
        }
    }

    fn compile_term(&mut self) -> Result<(), CompileError> {
        match self.current().clone() {
            Token::IntConst(value) => {
                self.advance()?;
                self.push("constant", value)
            }
            Token::StringConst(s) => {
                self.advance()?;
                self.compile_string_const(&s)
            }
            Token::Keyword(Keyword::True) => {
                self.advance()?;
                self.push("constant", 1)?;
                self.arith("neg")
            }
            Token::Keyword(Keyword::False) | Token::Keyword(Keyword::Null) => {
                self.advance()?;
                self.push("constant", 0)
            }
            Token::Keyword(Keyword::This) => {
                self.advance()?;
                self.push("pointer", 0)
            }
            Token::Symbol(s) if s == "(" => {
                self.advance()?;
                self.compile_expression()?;
                self.expect_symbol(")")
            }
            Token::Symbol(s) if s == "-" => {
                self.advance()?;
                self.compile_term()?;
                self.arith("neg")
            }
            Token::Symbol(s) if s == "~" => {
                self.advance()?;
                self.compile_term()?;
                self.arith("not")
            }
            Token::Identifier(name) => {
                self.advance()?;
                self.compile_identifier_term(&name)
            }
            other => Err(self.parse_error("a term", &other)),
        }
    }

    fn compile_identifier_term(&mut self, name: &str) -> Result<(), CompileError> {
        if self.current().is_symbol("[") {
            self.advance()?;
            self.push_variable(name)?;
            self.compile_expression()?;
            self.expect_symbol("]")?;
            self.arith("add")?;
            self.pop("pointer", 1)?;
            self.push("that", 0)
        } else if self.current().is_symbol("(") || self.current().is_symbol(".") {
            self.compile_subroutine_call_named(name)
        } else {
            self.push_variable(name)
        }
    }

    fn compile_string_const(&mut self, s: &str) -> Result<(), CompileError> {
        self.push("constant", s.chars().count() as u16)?;
        self.call("String.new", 1)?;
        for ch in s.chars() {
            self.push("constant", ch as u16)?;
            self.call("String.appendChar", 2)?;
        }
        Ok(())
    }

    pub(super) fn compile_subroutine_call(&mut self) -> Result<(), CompileError> {
        let name = self.expect_identifier()?;
        self.compile_subroutine_call_named(&name)
    }

    /// Compiles the two surface forms of a call: `name(args)` (implicit
    /// method call on the current object) and `lhs.name(args)` (either a
    /// method call on a variable receiver, or a call on a class name).
    fn compile_subroutine_call_named(&mut self, name: &str) -> Result<(), CompileError> {
        if self.current().is_symbol("(") {
            self.advance()?;
            self.push("pointer", 0)?;
            let n_args = self.compile_expression_list()?;
            self.expect_symbol(")")?;
            let qualified = format!("{}.{name}", self.class_name);
            self.call(&qualified, n_args + 1)
        } else {
            self.expect_symbol(".")?;
            let sub_name = self.expect_identifier()?;
            self.expect_symbol("(")?;

            let kind = self.symbols.kind_of(name);
            if kind != VarKind::None {
                let var_type = self
                    .symbols
                    .type_of(name)
                    .expect("kind_of confirmed a live entry")
                    .to_string();
                self.push_variable(name)?;
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(")")?;
                let qualified = format!("{var_type}.{sub_name}");
                self.call(&qualified, n_args + 1)
            } else {
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(")")?;
                let qualified = format!("{name}.{sub_name}");
                self.call(&qualified, n_args)
            }
        }
    }

    fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        if self.current().is_symbol(")") {
            return Ok(0);
        }
        let mut count: u16 = 0;
        loop {
            self.compile_expression()?;
            count += 1;
            if self.current().is_symbol(",") {
                self.advance()?;
                continue;
            }
            break;
        }
        Ok(count)
    }
}
