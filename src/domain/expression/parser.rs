//! Recursive-descent parser producing [`Expr`].
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := NUMBER | CONSTANT | FUNCTION '(' [expr (',' expr)*] ')' | '(' expr ')'
//! ```
//!
//! Before parsing, the whole token stream is scanned for constructs outside
//! the allow-list so that they are reported as unsupported even when the
//! surrounding text is also malformed.

use super::ast::{BinaryOp, Constant, Expr, Function, UnaryOp};
use super::lexer::{tokenize, Spanned, Token};
use super::EvaluationError;

/// Longest expression accepted, in characters.
pub const MAX_EXPRESSION_LEN: usize = 1000;

const MAX_DEPTH: usize = 64;

/// Parses `input` into a syntax tree.
pub fn parse(input: &str) -> Result<Expr, EvaluationError> {
    if input.trim().is_empty() {
        return Err(EvaluationError::invalid("expression is empty"));
    }
    if input.chars().count() > MAX_EXPRESSION_LEN {
        return Err(EvaluationError::invalid(format!(
            "expression exceeds {} characters",
            MAX_EXPRESSION_LEN
        )));
    }

    let tokens = tokenize(input);
    reject_unsupported(&tokens)?;

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expression()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(unexpected(extra));
    }
    Ok(expr)
}

fn reject_unsupported(tokens: &[Spanned]) -> Result<(), EvaluationError> {
    for (i, spanned) in tokens.iter().enumerate() {
        match &spanned.token {
            Token::Forbidden(c) => {
                return Err(EvaluationError::unsupported(format!(
                    "'{}' at position {} is not allowed",
                    c, spanned.offset
                )));
            }
            Token::Ident(name) => {
                let called = matches!(tokens.get(i + 1).map(|t| &t.token), Some(Token::LParen));
                if called {
                    if Function::lookup(name).is_none() {
                        return Err(EvaluationError::unsupported(format!(
                            "function '{}' is not allowed",
                            name
                        )));
                    }
                } else if Constant::lookup(name).is_none() {
                    let message = if Function::lookup(name).is_some() {
                        format!("function '{}' must be called", name)
                    } else {
                        format!("name '{}' is not allowed", name)
                    };
                    return Err(EvaluationError::unsupported(message));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::Ident(name) => format!("name '{}'", name),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::DoubleStar => "'**'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::DoubleSlash => "'//'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::Caret => "'^'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Forbidden(c) | Token::Unknown(c) => format!("character '{}'", c),
    }
}

fn unexpected(spanned: &Spanned) -> EvaluationError {
    EvaluationError::invalid(format!(
        "unexpected {} at position {}",
        describe(&spanned.token),
        spanned.offset
    ))
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn next(&mut self) -> Result<Spanned, EvaluationError> {
        let spanned = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| EvaluationError::invalid("unexpected end of expression"))?;
        self.pos += 1;
        Ok(spanned)
    }

    fn expect_close(&mut self) -> Result<(), EvaluationError> {
        let spanned = self
            .next()
            .map_err(|_| EvaluationError::invalid("missing closing parenthesis"))?;
        match spanned.token {
            Token::RParen => Ok(()),
            _ => Err(unexpected(&spanned)),
        }
    }

    fn enter(&mut self) -> Result<(), EvaluationError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvaluationError::invalid("expression is nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expression(&mut self) -> Result<Expr, EvaluationError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, EvaluationError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, EvaluationError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.power(),
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.unary()?;
        self.leave();
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn power(&mut self) -> Result<Expr, EvaluationError> {
        let base = self.primary()?;
        if !matches!(self.peek(), Some(Token::Caret) | Some(Token::DoubleStar)) {
            return Ok(base);
        }
        self.pos += 1;
        self.enter()?;
        let exponent = self.unary()?;
        self.leave();
        Ok(Expr::Binary(
            BinaryOp::Pow,
            Box::new(base),
            Box::new(exponent),
        ))
    }

    fn primary(&mut self) -> Result<Expr, EvaluationError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Number(n) => Ok(Expr::Literal(n)),
            Token::LParen => {
                self.enter()?;
                let inner = self.expression()?;
                self.expect_close()?;
                self.leave();
                Ok(inner)
            }
            Token::Ident(ref name) if matches!(self.peek(), Some(Token::LParen)) => {
                let function = Function::lookup(name).ok_or_else(|| {
                    EvaluationError::unsupported(format!("function '{}' is not allowed", name))
                })?;
                self.pos += 1;
                self.enter()?;
                let args = self.arguments()?;
                self.leave();
                function.check_arity(args.len())?;
                Ok(Expr::Call(function, args))
            }
            Token::Ident(ref name) => Constant::lookup(name).map(Expr::Constant).ok_or_else(|| {
                EvaluationError::unsupported(format!("name '{}' is not allowed", name))
            }),
            _ => Err(unexpected(&spanned)),
        }
    }

    /// Parses a call's arguments after the opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<Expr>, EvaluationError> {
        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            match self.peek() {
                Some(Token::Comma) => self.pos += 1,
                _ => break,
            }
        }
        self.expect_close()?;
        Ok(args)
    }
}
