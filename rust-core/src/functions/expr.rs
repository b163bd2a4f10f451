//! Expression language for user-supplied window functions
//! 
//! Parses expressions such as `exp(-x / T2star)` or `exp(-0.5 * ((x - mu) / sigma)**2)`
//! once into a tree and evaluates the tree for every sample.

use std::collections::HashMap;
use std::fmt;

use super::FunctionError;

/// Built-in unary functions callable from an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exp,
    Ln,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Abs,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "exp" => Some(Builtin::Exp),
            "ln" | "log" => Some(Builtin::Ln),
            "sqrt" => Some(Builtin::Sqrt),
            "sin" => Some(Builtin::Sin),
            "cos" => Some(Builtin::Cos),
            "tan" => Some(Builtin::Tan),
            "abs" => Some(Builtin::Abs),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Builtin::Exp => "exp",
            Builtin::Ln => "ln",
            Builtin::Sqrt => "sqrt",
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Abs => "abs",
        }
    }

    fn apply(&self, v: f64) -> f64 {
        match self {
            Builtin::Exp => v.exp(),
            Builtin::Ln => v.ln(),
            Builtin::Sqrt => v.sqrt(),
            Builtin::Sin => v.sin(),
            Builtin::Cos => v.cos(),
            Builtin::Tan => v.tan(),
            Builtin::Abs => v.abs(),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(String),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Builtin, Box<Expr>),
}

impl Expr {
    /// Parse an expression from text
    /// 
    /// `^` and `**` both denote exponentiation (right associative).
    pub fn parse(source: &str) -> Result<Self, FunctionError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.expression()?;
        match parser.peek() {
            None => Ok(expr),
            Some(tok) => Err(FunctionError::Parse(format!(
                "unexpected '{}' after end of expression",
                tok
            ))),
        }
    }

    /// Evaluate with `x` bound to the given value
    /// 
    /// # Arguments
    /// * `x` - Value of the free variable
    /// * `params` - Named parameter values (by symbol)
    pub fn eval(&self, x: f64, params: &HashMap<String, f64>) -> Result<f64, FunctionError> {
        Ok(match self {
            Expr::Number(v) => *v,
            Expr::Var(name) => lookup(name, x, params)?,
            Expr::Neg(inner) => -inner.eval(x, params)?,
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x, params)?;
                let b = rhs.eval(x, params)?;
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Expr::Call(func, arg) => func.apply(arg.eval(x, params)?),
        })
    }

    /// Names of all free identifiers other than `x` and the constants
    pub fn free_symbols(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Var(name) => {
                if !matches!(name.as_str(), "x" | "pi" | "e") && !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Expr::Neg(inner) | Expr::Call(_, inner) => inner.collect_symbols(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(v) => write!(f, "{}", v),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Neg(inner) => write!(f, "-({})", inner),
            Expr::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Call(func, arg) => write!(f, "{}({})", func.name(), arg),
        }
    }
}

fn lookup(name: &str, x: f64, params: &HashMap<String, f64>) -> Result<f64, FunctionError> {
    if name == "x" {
        return Ok(x);
    }
    if let Some(v) = params.get(name) {
        return Ok(*v);
    }
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        _ => Err(FunctionError::UnknownSymbol(name.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{}", v),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, FunctionError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                // `**` is the power operator
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation: 1e-6, 2.5E3
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FunctionError::Parse(format!("invalid number '{}'", text)))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => {
                return Err(FunctionError::Parse(format!(
                    "unexpected character '{}' at position {}",
                    other, i
                )));
            }
        }
    }

    Ok(tokens)
}

/// Recursive descent parser
/// 
/// expression := term (('+' | '-') term)*
/// term       := unary (('*' | '/') unary)*
/// unary      := '-' unary | power
/// power      := atom ('^' unary)?
/// atom       := number | ident | ident '(' expression ')' | '(' expression ')'
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Token) -> Result<(), FunctionError> {
        match self.next() {
            Some(ref tok) if *tok == expected => Ok(()),
            Some(tok) => Err(FunctionError::Parse(format!(
                "expected '{}', found '{}'",
                expected, tok
            ))),
            None => Err(FunctionError::Parse(format!(
                "expected '{}', found end of expression",
                expected
            ))),
        }
    }

    fn expression(&mut self) -> Result<Expr, FunctionError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, FunctionError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, FunctionError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, FunctionError> {
        let base = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            // Right associative, and -x^2 binds as -(x^2)
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, FunctionError> {
        match self.next() {
            Some(Token::Number(v)) => Ok(Expr::Number(v)),
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    let func = Builtin::from_name(&name)
                        .ok_or_else(|| FunctionError::UnknownFunction(name.clone()))?;
                    self.pos += 1;
                    let arg = self.expression()?;
                    self.expect(Token::RParen)?;
                    Ok(Expr::Call(func, Box::new(arg)))
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(tok) => Err(FunctionError::Parse(format!("unexpected '{}'", tok))),
            None => Err(FunctionError::Parse("unexpected end of expression".to_string())),
        }
    }
}
