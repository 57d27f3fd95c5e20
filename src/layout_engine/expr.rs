//! A closed arithmetic grammar for layout template fields.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := ('+' | '-') factor | primary
//! primary := number | variable | '(' expr ')'
//! variable:= x | y | width | height | '{' (x | y | width | height) '}'
//! ```
//!
//! Nothing outside this grammar is accepted. Expressions are parsed into an
//! [`Expr`] tree and interpreted against a [`Frame`].

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ExprError {
    #[error("expression is empty")]
    Empty,
    #[error("unexpected character {ch:?} at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("unknown variable {0:?}")]
    UnknownVariable(String),
    #[error("unclosed placeholder starting at position {0}")]
    UnclosedPlaceholder(usize),
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("unexpected {found} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("result is not a finite number")]
    NotFinite,
    #[error("result {0} does not fit in a pixel coordinate")]
    OutOfRange(f64),
}

/// Values bound to the template variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    /// Frame used to check that a template is usable before it is stored.
    pub const CANONICAL: Frame = Frame { x: 0, y: 0, width: 1920, height: 1080 };

    fn get(&self, var: Variable) -> f64 {
        f64::from(match var {
            Variable::X => self.x,
            Variable::Y => self.y,
            Variable::Width => self.width,
            Variable::Height => self.height,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variable {
    X,
    Y,
    Width,
    Height,
}

impl Variable {
    fn from_name(name: &str) -> Result<Self, ExprError> {
        match name {
            "x" => Ok(Variable::X),
            "y" => Ok(Variable::Y),
            "width" => Ok(Variable::Width),
            "height" => Ok(Variable::Height),
            other => Err(ExprError::UnknownVariable(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Variable),
    Neg(Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
}

impl Expr {
    pub fn parse(src: &str) -> Result<Expr, ExprError> {
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut parser = Parser { tokens: &tokens, pos: 0 };
        let expr = parser.expr()?;
        match parser.peek() {
            None => Ok(expr),
            Some((_, Token::RParen)) => Err(ExprError::UnbalancedParens),
            Some((pos, tok)) => Err(ExprError::UnexpectedToken {
                found: tok.to_string(),
                pos: *pos,
            }),
        }
    }

    pub fn eval(&self, frame: &Frame) -> Result<f64, ExprError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Var(var) => frame.get(*var),
            Expr::Neg(inner) => -inner.eval(frame)?,
            Expr::Binary(lhs, op, rhs) => {
                let (l, r) = (lhs.eval(frame)?, rhs.eval(frame)?);
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                }
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExprError::NotFinite)
        }
    }
}

/// Parses and evaluates `src` in one step.
pub fn evaluate(src: &str, frame: &Frame) -> Result<f64, ExprError> {
    Expr::parse(src)?.eval(frame)
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Var(Variable),
    Op(BinOp),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Var(v) => write!(f, "variable {v:?}"),
            Token::Op(BinOp::Add) => f.write_str("'+'"),
            Token::Op(BinOp::Sub) => f.write_str("'-'"),
            Token::Op(BinOp::Mul) => f.write_str("'*'"),
            Token::Op(BinOp::Div) => f.write_str("'/'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_ascii_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Op(BinOp::Add),
            '-' => Token::Op(BinOp::Sub),
            '*' => Token::Op(BinOp::Mul),
            '/' => Token::Op(BinOp::Div),
            '(' => Token::LParen,
            ')' => Token::RParen,
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !(c.is_ascii_digit() || c == '.') {
                        break;
                    }
                    literal.push(c);
                    chars.next();
                }
                let value =
                    literal.parse::<f64>().map_err(|_| ExprError::InvalidNumber(literal))?;
                tokens.push((pos, Token::Number(value)));
                continue;
            }
            '{' => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(ExprError::UnclosedPlaceholder(pos)),
                    }
                }
                tokens.push((pos, Token::Var(Variable::from_name(name.trim())?)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                tokens.push((pos, Token::Var(Variable::from_name(&name)?)));
                continue;
            }
            other => return Err(ExprError::UnexpectedChar { ch: other, pos }),
        };
        chars.next();
        tokens.push((pos, token));
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [(usize, Token)],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a (usize, Token)> { self.tokens.get(self.pos) }

    fn advance(&mut self) -> Option<&'a (usize, Token)> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        while let Some((_, Token::Op(op @ (BinOp::Add | BinOp::Sub)))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(Box::new(lhs), *op, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.factor()?;
        while let Some((_, Token::Op(op @ (BinOp::Mul | BinOp::Div)))) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary(Box::new(lhs), *op, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some((_, Token::Op(BinOp::Sub))) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.factor()?)))
            }
            Some((_, Token::Op(BinOp::Add))) => {
                self.pos += 1;
                self.factor()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Some((_, Token::Number(n))) => Ok(Expr::Number(*n)),
            Some((_, Token::Var(var))) => Ok(Expr::Var(*var)),
            Some((_, Token::LParen)) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(inner),
                    Some((pos, tok)) => Err(ExprError::UnexpectedToken {
                        found: tok.to_string(),
                        pos: *pos,
                    }),
                    None => Err(ExprError::UnbalancedParens),
                }
            }
            Some((_, Token::RParen)) => Err(ExprError::UnbalancedParens),
            Some((pos, tok)) => Err(ExprError::UnexpectedToken {
                found: tok.to_string(),
                pos: *pos,
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}
