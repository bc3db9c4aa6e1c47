//! Pull-based tokenizer for Jack source text.
//!
//! [`Raw`] does the character-class dispatch (keywords, punctuation,
//! identifiers, numbers) via `logos`; [`Lexer`] wraps it to add line
//! tracking, string-literal scanning (context-sensitive enough that a
//! regex alone can't reject an embedded newline and EOF differently),
//! and the pull contract the compiler engine drives one token at a time.

use logos::Logos;

use crate::error::LexError;

/// The closed set of reserved words in the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Method,
    Function,
    Constructor,
    Int,
    Boolean,
    Char,
    Void,
    Var,
    Static,
    Field,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
    True,
    False,
    Null,
    This,
}

/// A single lexical token.
///
/// Symbols carry a `String` rather than a `char` since `<=` and `>=`
/// are two-character symbols in this dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    Symbol(String),
    Identifier(String),
    IntConst(u16),
    StringConst(String),
    End,
}

impl Token {
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == kw)
    }

    pub fn is_symbol(&self, sym: &str) -> bool {
        matches!(self, Token::Symbol(s) if s == sym)
    }

    /// Human-readable description used in parse-error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Keyword(k) => format!("keyword '{}'", k.as_str()),
            Token::Symbol(s) => format!("symbol '{s}'"),
            Token::Identifier(name) => format!("identifier '{name}'"),
            Token::IntConst(v) => format!("integer constant {v}"),
            Token::StringConst(s) => format!("string constant \"{s}\""),
            Token::End => "end of input".to_string(),
        }
    }
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Method => "method",
            Keyword::Function => "function",
            Keyword::Constructor => "constructor",
            Keyword::Int => "int",
            Keyword::Boolean => "boolean",
            Keyword::Char => "char",
            Keyword::Void => "void",
            Keyword::Var => "var",
            Keyword::Static => "static",
            Keyword::Field => "field",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
        }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
enum Raw<'src> {
    #[token("class")]
    KwClass,
    #[token("method")]
    KwMethod,
    #[token("function")]
    KwFunction,
    #[token("constructor")]
    KwConstructor,
    #[token("int")]
    KwInt,
    #[token("boolean")]
    KwBoolean,
    #[token("char")]
    KwChar,
    #[token("void")]
    KwVoid,
    #[token("var")]
    KwVar,
    #[token("static")]
    KwStatic,
    #[token("field")]
    KwField,
    #[token("let")]
    KwLet,
    #[token("do")]
    KwDo,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("return")]
    KwReturn,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("null")]
    KwNull,
    #[token("this")]
    KwThis,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("~")]
    Tilde,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier(&'src str),

    #[regex(r"[0-9]+")]
    IntLiteral(&'src str),

    #[token("\"")]
    Quote,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,
}

fn keyword_of(raw: &Raw) -> Option<Keyword> {
    Some(match raw {
        Raw::KwClass => Keyword::Class,
        Raw::KwMethod => Keyword::Method,
        Raw::KwFunction => Keyword::Function,
        Raw::KwConstructor => Keyword::Constructor,
        Raw::KwInt => Keyword::Int,
        Raw::KwBoolean => Keyword::Boolean,
        Raw::KwChar => Keyword::Char,
        Raw::KwVoid => Keyword::Void,
        Raw::KwVar => Keyword::Var,
        Raw::KwStatic => Keyword::Static,
        Raw::KwField => Keyword::Field,
        Raw::KwLet => Keyword::Let,
        Raw::KwDo => Keyword::Do,
        Raw::KwIf => Keyword::If,
        Raw::KwElse => Keyword::Else,
        Raw::KwWhile => Keyword::While,
        Raw::KwReturn => Keyword::Return,
        Raw::KwTrue => Keyword::True,
        Raw::KwFalse => Keyword::False,
        Raw::KwNull => Keyword::Null,
        Raw::KwThis => Keyword::This,
        _ => return None,
    })
}

fn symbol_str(raw: &Raw) -> Option<&'static str> {
    Some(match raw {
        Raw::LBrace => "{",
        Raw::RBrace => "}",
        Raw::LParen => "(",
        Raw::RParen => ")",
        Raw::LBracket => "[",
        Raw::RBracket => "]",
        Raw::Dot => ".",
        Raw::Comma => ",",
        Raw::Semi => ";",
        Raw::Plus => "+",
        Raw::Minus => "-",
        Raw::Star => "*",
        Raw::Slash => "/",
        Raw::Amp => "&",
        Raw::Pipe => "|",
        Raw::LtEq => "<=",
        Raw::GtEq => ">=",
        Raw::Lt => "<",
        Raw::Gt => ">",
        Raw::Eq => "=",
        Raw::Tilde => "~",
        _ => return None,
    })
}

/// Pull-based token stream over one source file.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Raw<'src>>,
    line: u32,
    current: Token,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: Raw::lexer(source),
            line: 1,
            current: Token::End,
        }
    }

    /// The token under the cursor. Valid after at least one `advance()`.
    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Moves to the next token, skipping whitespace and comments and
    /// tracking line numbers through both.
    pub fn advance(&mut self) -> Result<(), LexError> {
        loop {
            let Some(result) = self.inner.next() else {
                self.current = Token::End;
                return Ok(());
            };

            let raw = match result {
                Ok(raw) => raw,
                Err(()) => {
                    let ch = self.inner.slice().chars().next().unwrap_or('\0');
                    return Err(LexError::InvalidCharacter {
                        ch,
                        line: self.line,
                    });
                }
            };

            match raw {
                Raw::Whitespace | Raw::LineComment => continue,
                Raw::Newline => {
                    self.line += 1;
                    continue;
                }
                Raw::BlockComment => {
                    self.line += count_newlines(self.inner.slice());
                    continue;
                }
                Raw::Quote => {
                    self.current = self.scan_string()?;
                    return Ok(());
                }
                Raw::Identifier(s) => {
                    self.current = match keyword_of(&raw) {
                        Some(kw) => Token::Keyword(kw),
                        None => Token::Identifier(s.to_string()),
                    };
                    return Ok(());
                }
                Raw::IntLiteral(s) => {
                    self.current = self.parse_int(s)?;
                    return Ok(());
                }
                ref other => {
                    if let Some(kw) = keyword_of(other) {
                        self.current = Token::Keyword(kw);
                    } else if let Some(sym) = symbol_str(other) {
                        self.current = Token::Symbol(sym.to_string());
                    } else {
                        unreachable!("every remaining Raw variant is a keyword or symbol")
                    }
                    return Ok(());
                }
            }
        }
    }

    fn parse_int(&self, digits: &str) -> Result<Token, LexError> {
        let value: u32 = digits.parse().map_err(|_| LexError::IntOutOfRange {
            line: self.line,
        })?;
        if value > 32767 {
            return Err(LexError::IntOutOfRange { line: self.line });
        }
        Ok(Token::IntConst(value as u16))
    }

    /// Raw scanning of a string literal's body. Entered right after the
    /// opening quote has been consumed by the `Raw::Quote` token; walks
    /// the unconsumed remainder by hand so EOF and embedded newlines can
    /// be told apart (a regex alone can't distinguish the two failure
    /// modes from "just not closed yet").
    fn scan_string(&mut self) -> Result<Token, LexError> {
        let start_line = self.line;
        let remainder = self.inner.remainder();
        let mut consumed = 0usize;
        let mut body = String::new();

        for ch in remainder.chars() {
            if ch == '"' {
                consumed += ch.len_utf8();
                self.inner.bump(consumed);
                return Ok(Token::StringConst(body));
            }
            if ch == '\n' {
                return Err(LexError::NewlineInString { line: start_line });
            }
            body.push(ch);
            consumed += ch.len_utf8();
        }

        Err(LexError::UnterminatedString { line: start_line })
    }
}

fn count_newlines(s: &str) -> u32 {
    s.bytes().filter(|&b| b == b'\n').count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            lexer.advance().expect("lex ok");
            if *lexer.current() == Token::End {
                break;
            }
            out.push(lexer.current().clone());
        }
        out
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            tokens("class Foo"),
            vec![
                Token::Keyword(Keyword::Class),
                Token::Identifier("Foo".to_string()),
            ]
        );
    }

    #[test]
    fn comparison_symbols_are_two_chars() {
        assert_eq!(
            tokens("a <= b >= c < d > e"),
            vec![
                Token::Identifier("a".into()),
                Token::Symbol("<=".into()),
                Token::Identifier("b".into()),
                Token::Symbol(">=".into()),
                Token::Identifier("c".into()),
                Token::Symbol("<".into()),
                Token::Identifier("d".into()),
                Token::Symbol(">".into()),
                Token::Identifier("e".into()),
            ]
        );
    }

    #[test]
    fn int_const_in_range() {
        assert_eq!(tokens("0 32767"), vec![Token::IntConst(0), Token::IntConst(32767)]);
    }

    #[test]
    fn int_const_out_of_range_is_lex_error() {
        let mut lexer = Lexer::new("32768");
        assert_eq!(
            lexer.advance(),
            Err(LexError::IntOutOfRange { line: 1 })
        );
    }

    #[test]
    fn string_const_body_is_raw() {
        assert_eq!(
            tokens(r#""hello world""#),
            vec![Token::StringConst("hello world".to_string())]
        );
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        let mut lexer = Lexer::new("\"abc");
        assert_eq!(
            lexer.advance(),
            Err(LexError::UnterminatedString { line: 1 })
        );
    }

    #[test]
    fn newline_in_string_is_lex_error() {
        let mut lexer = Lexer::new("\"abc\ndef\"");
        assert_eq!(
            lexer.advance(),
            Err(LexError::NewlineInString { line: 1 })
        );
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(
            tokens("let x = 1; // trailing comment\nlet y = 2;"),
            tokens("let x = 1;\nlet y = 2;")
        );
    }

    #[test]
    fn block_comment_tracks_newlines() {
        let mut lexer = Lexer::new("/* line one\nline two\nline three */ x");
        lexer.advance().unwrap();
        assert_eq!(lexer.line(), 3);
        assert_eq!(*lexer.current(), Token::Identifier("x".to_string()));
    }

    #[test]
    fn invalid_character_is_lex_error() {
        let mut lexer = Lexer::new("@");
        assert_eq!(
            lexer.advance(),
            Err(LexError::InvalidCharacter { ch: '@', line: 1 })
        );
    }
}
