//! Recursive-descent parser producing an [`Expr`] tree.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('^' unary)?
//! primary := number | ident | ident '(' args? ')' | '(' expr ')'
//! args    := expr (',' expr)*
//! ```
//!
//! `^` is right-associative and binds tighter than a leading sign, so
//! `-x^2` is `-(x^2)` and `2^3^2` is `2^9`.

use super::Arity;
use super::MAX_NESTING_DEPTH;
use super::ast::{BinOp, Expr, Func, Var};
use super::lexer::{Token, TokenKind};
use crate::error::{CompileError, CompileResult};

pub(crate) struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    arity: Arity,
    depth: usize,
    input_len: usize,
}

impl<'a> Parser<'a> {
    pub(crate) const fn new(tokens: &'a [Token], arity: Arity, input_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            arity,
            depth: 0,
            input_len,
        }
    }

    /// Parses the whole token stream as a single expression.
    pub(crate) fn parse(mut self) -> CompileResult<Expr> {
        let expr = self.parse_expr()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(CompileError::Syntax {
                message: format!("unexpected {} after expression", describe(&token.kind)),
                position: token.position,
            }),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.input_len, |t| t.position)
    }

    fn enter(&mut self) -> CompileResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(CompileError::TooComplex(format!(
                "nesting deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> CompileResult<()> {
        match self.peek() {
            Some(token) if &token.kind == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(CompileError::Syntax {
                message: format!("expected {what}, found {}", describe(&token.kind)),
                position: token.position,
            }),
            None => Err(CompileError::Syntax {
                message: format!("expected {what}, found end of expression"),
                position: self.input_len,
            }),
        }
    }

    fn parse_expr(&mut self) -> CompileResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> CompileResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> CompileResult<Expr> {
        match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                Ok(Expr::Neg(Box::new(operand)))
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                Ok(operand)
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> CompileResult<Expr> {
        let base = self.parse_primary()?;
        if matches!(self.peek_kind(), Some(TokenKind::Caret)) {
            self.pos += 1;
            self.enter()?;
            let exponent = self.parse_unary()?;
            self.leave();
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> CompileResult<Expr> {
        let position = self.position();
        let Some(token) = self.next() else {
            return Err(CompileError::Syntax {
                message: "unexpected end of expression".to_string(),
                position,
            });
        };

        match &token.kind {
            TokenKind::Number(v) => Ok(Expr::Literal(*v)),
            TokenKind::LParen => {
                self.enter()?;
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                self.leave();
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if matches!(self.peek_kind(), Some(TokenKind::LParen)) {
                    self.parse_call(name, token.position)
                } else {
                    self.resolve_identifier(name, token.position)
                }
            }
            other => Err(CompileError::Syntax {
                message: format!("unexpected {}", describe(other)),
                position: token.position,
            }),
        }
    }

    fn parse_call(&mut self, name: &str, position: usize) -> CompileResult<Expr> {
        let func = Func::lookup(name).ok_or_else(|| CompileError::UnknownIdentifier {
            name: name.to_string(),
            position,
        })?;

        self.pos += 1; // '('
        self.enter()?;
        let mut args = Vec::new();
        if matches!(self.peek_kind(), Some(TokenKind::RParen)) {
            self.pos += 1;
        } else {
            loop {
                args.push(self.parse_expr()?);
                match self.peek_kind() {
                    Some(TokenKind::Comma) => self.pos += 1,
                    _ => break,
                }
            }
            self.expect(&TokenKind::RParen, "',' or ')'")?;
        }
        self.leave();

        if let Some(expected) = func.arity() {
            if args.len() != expected {
                return Err(CompileError::ArgumentCount {
                    function: func.name().to_string(),
                    expected,
                    found: args.len(),
                });
            }
        }
        Ok(Expr::Call(func, args))
    }

    fn resolve_identifier(&self, name: &str, position: usize) -> CompileResult<Expr> {
        match name {
            "x" => Ok(Expr::Var(Var::X)),
            "y" if self.arity == Arity::Two => Ok(Expr::Var(Var::Y)),
            "e" => Ok(Expr::Literal(std::f64::consts::E)),
            _ if name.eq_ignore_ascii_case("pi") => Ok(Expr::Literal(std::f64::consts::PI)),
            _ if Func::lookup(name).is_some() => Err(CompileError::Syntax {
                message: format!("function '{name}' must be called with parentheses"),
                position,
            }),
            _ => Err(CompileError::UnknownIdentifier {
                name: name.to_string(),
                position,
            }),
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(v) => format!("number {v}"),
        TokenKind::Ident(name) => format!("identifier '{name}'"),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::Caret => "'^'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Comma => "','".to_string(),
    }
}
