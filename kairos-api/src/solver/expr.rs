//! Expression tree produced by the parser

use std::fmt;

use super::rational::Rational;

/// Deepest expression tree accepted from the parser
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(Rational),
    Sym(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

/// Parsed input: an expression, or `lhs = rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Option<Expr>,
}

impl Equation {
    /// The expression whose roots are sought (`lhs - rhs`, or `lhs`)
    pub fn zero_form(&self) -> Expr {
        match &self.rhs {
            Some(rhs) => Expr::Sub(Box::new(self.lhs.clone()), Box::new(rhs.clone())),
            None => self.lhs.clone(),
        }
    }

    /// Height of the deeper side
    pub fn height(&self) -> usize {
        let rhs = self.rhs.as_ref().map_or(0, Expr::height);
        self.lhs.height().max(rhs)
    }
}

impl Expr {
    /// Whether `name` occurs as a free symbol anywhere in the tree
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Sym(s) => s == name,
            Expr::Neg(e) => e.mentions(name),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.mentions(name) || b.mentions(name),
            Expr::Call(_, args) => args.iter().any(|a| a.mentions(name)),
        }
    }

    /// Number of nodes on the longest root-to-leaf path, computed without
    /// recursion
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut pending = vec![(self, 1usize)];
        while let Some((expr, level)) = pending.pop() {
            height = height.max(level);
            match expr {
                Expr::Num(_) | Expr::Sym(_) => {}
                Expr::Neg(e) => pending.push((e.as_ref(), level + 1)),
                Expr::Add(a, b)
                | Expr::Sub(a, b)
                | Expr::Mul(a, b)
                | Expr::Div(a, b)
                | Expr::Pow(a, b) => {
                    pending.push((a.as_ref(), level + 1));
                    pending.push((b.as_ref(), level + 1));
                }
                Expr::Call(_, args) => pending.extend(args.iter().map(|arg| (arg, level + 1))),
            }
        }
        height
    }

    /// Binding strength used to decide where parentheses are needed
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(..) => 3,
            Expr::Pow(..) => 4,
            Expr::Num(r) if !r.is_integer() => 2,
            Expr::Num(r) if r.is_negative() => 3,
            Expr::Num(_) | Expr::Sym(_) | Expr::Call(..) => 5,
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min_prec: u8) -> fmt::Result {
    if expr.precedence() < min_prec {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Plain-text rendering (`**` for powers, `*` for products)
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(r) => write!(f, "{}", r),
            Expr::Sym(s) => write!(f, "{}", s),
            Expr::Neg(e) => {
                write!(f, "-")?;
                write_operand(f, e, 3)
            }
            Expr::Add(a, b) => {
                write!(f, "{} + ", a)?;
                write_operand(f, b, 2)
            }
            Expr::Sub(a, b) => {
                write!(f, "{} - ", a)?;
                write_operand(f, b, 2)
            }
            Expr::Mul(a, b) => {
                write_operand(f, a, 2)?;
                write!(f, "*")?;
                write_operand(f, b, 3)
            }
            Expr::Div(a, b) => {
                write_operand(f, a, 2)?;
                write!(f, "/")?;
                write_operand(f, b, 4)
            }
            Expr::Pow(a, b) => {
                write_operand(f, a, 5)?;
                write!(f, "**")?;
                write_operand(f, b, 5)
            }
            Expr::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
