//! Tokenizer and precedence-climbing parser
//!
//! Grammar (lowest to highest binding):
//!
//! ```text
//! equation := expr ('=' expr)?
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/') unary)*
//! unary    := ('-' | '+') unary | power
//! power    := primary (('^' | '**') unary)?
//! primary  := number | ident | ident '(' args ')' | '(' expr ')'
//! ```

use logos::Logos;

use super::expr::{Equation, Expr, MAX_DEPTH};
use super::rational::Rational;
use super::SolveError;

/// Longest accepted input, in tokens
pub const MAX_TOKENS: usize = 512;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token {
    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+", |lex| lex.slice().to_string())]
    Num(String),
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    #[token("**")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
}

fn describe(token: Option<&Token>) -> String {
    match token {
        None => "end of input".to_string(),
        Some(Token::Num(n)) => format!("number {}", n),
        Some(Token::Ident(s)) => format!("identifier {}", s),
        Some(Token::Plus) => "'+'".to_string(),
        Some(Token::Minus) => "'-'".to_string(),
        Some(Token::Star) => "'*'".to_string(),
        Some(Token::Slash) => "'/'".to_string(),
        Some(Token::Caret) => "'^'".to_string(),
        Some(Token::LParen) => "'('".to_string(),
        Some(Token::RParen) => "')'".to_string(),
        Some(Token::Comma) => "','".to_string(),
        Some(Token::Equals) => "'='".to_string(),
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Character offset of byte offset `byte` in `input`
fn char_offset(input: &str, byte: usize) -> usize {
    input.get(..byte).map_or(byte, |prefix| prefix.chars().count())
}

/// Split input into `(char offset, token)` pairs
fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, SolveError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let position = char_offset(input, span.start);
        let token = match result {
            Ok(token) => token,
            Err(_) => {
                let found = input
                    .get(span.start..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or_default();
                return Err(SolveError::Parse {
                    position,
                    message: format!("unexpected character {:?}", found),
                });
            }
        };
        if tokens.len() == MAX_TOKENS {
            return Err(SolveError::Parse {
                position,
                message: format!("equation is longer than {} tokens", MAX_TOKENS),
            });
        }
        tokens.push((position, token));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    input_len: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.input_len)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error<T>(&self, message: String) -> Result<T, SolveError> {
        Err(SolveError::Parse {
            position: self.offset(),
            message,
        })
    }

    fn unexpected<T>(&self) -> Result<T, SolveError> {
        self.error(format!("unexpected {}", describe(self.peek())))
    }

    fn equation(&mut self) -> Result<Equation, SolveError> {
        let lhs = self.expr()?;
        let rhs = if self.eat(&Token::Equals) {
            Some(self.expr()?)
        } else {
            None
        };
        if self.peek().is_some() {
            return self.unexpected();
        }
        Ok(Equation { lhs, rhs })
    }

    fn expr(&mut self) -> Result<Expr, SolveError> {
        let mut lhs = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
            } else if self.eat(&Token::Minus) {
                lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, SolveError> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
            } else if self.eat(&Token::Slash) {
                lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, SolveError> {
        if self.depth == MAX_DEPTH {
            return self.error(format!("expression nested deeper than {} levels", MAX_DEPTH));
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Expr, SolveError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, SolveError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, SolveError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Num(literal)) => Ok(Expr::Num(Rational::from_decimal(&literal)?)),
            Some(Token::Ident(name)) => {
                if !self.eat(&Token::LParen) {
                    return Ok(Expr::Sym(name));
                }
                let mut args = Vec::new();
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.expr()?);
                        if self.eat(&Token::RParen) {
                            break;
                        }
                        if !self.eat(&Token::Comma) {
                            return self.error(format!(
                                "expected ',' or ')' in call to {}, found {}",
                                name,
                                describe(self.peek())
                            ));
                        }
                    }
                }
                Ok(Expr::Call(name, args))
            }
            Some(Token::LParen) => {
                let inner = self.expr()?;
                if !self.eat(&Token::RParen) {
                    return self.error(format!("expected ')', found {}", describe(self.peek())));
                }
                Ok(inner)
            }
            other => Err(SolveError::Parse {
                position: offset,
                message: format!("unexpected {}", describe(other.as_ref())),
            }),
        }
    }
}

/// Parse an expression or equation
pub fn parse(input: &str) -> Result<Equation, SolveError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        input_len: input.chars().count(),
        depth: 0,
    };
    let equation = parser.equation()?;
    if equation.height() > MAX_DEPTH {
        return Err(SolveError::Unsupported(format!(
            "expression nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(equation)
}
