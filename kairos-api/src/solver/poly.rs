//! Laurent polynomials over named atoms with exact rational coefficients
//!
//! An atom is a free symbol (`x`, `m`, `θ`) or an opaque sub-expression that
//! does not mention the solve variable (`sin(θ)`, `(a + b)`, `2**(1/2)`).
//! Exponents may be negative, which is how division by a single term is
//! represented.

use std::collections::BTreeMap;
use std::fmt;

use super::expr::Expr;
use super::parser::{is_ident_continue, is_ident_start};
use super::rational::Rational;
use super::SolveError;

/// Largest integer exponent expanded symbolically
const MAX_EXPONENT: i128 = 32;

/// Largest exponent any atom may reach after expansion
pub const MAX_DEGREE: i32 = 64;

/// Most terms an expanded polynomial may hold
const MAX_TERMS: usize = 256;

/// Atom name → non-zero exponent
pub type Monomial = BTreeMap<String, i32>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, Rational>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: Rational) -> Self {
        let mut poly = Self::zero();
        if !value.is_zero() {
            poly.terms.insert(Monomial::new(), value);
        }
        poly
    }

    pub fn atom(name: impl Into<String>) -> Self {
        let mut mono = Monomial::new();
        mono.insert(name.into(), 1);
        let mut poly = Self::zero();
        poly.terms.insert(mono, Rational::ONE);
        poly
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value when no atoms remain
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::ZERO),
            1 => self.terms.get(&Monomial::new()).copied(),
            _ => None,
        }
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    fn add_term(&mut self, mono: Monomial, coef: Rational) -> Result<(), SolveError> {
        let sum = match self.terms.get(&mono) {
            Some(existing) => existing.add(&coef)?,
            None => coef,
        };
        if sum.is_zero() {
            self.terms.remove(&mono);
        } else {
            self.terms.insert(mono, sum);
        }
        Ok(())
    }

    pub fn add(&self, other: &Poly) -> Result<Poly, SolveError> {
        let mut result = self.clone();
        for (mono, coef) in &other.terms {
            result.add_term(mono.clone(), *coef)?;
        }
        Ok(result)
    }

    pub fn neg(&self) -> Result<Poly, SolveError> {
        let mut result = Poly::zero();
        for (mono, coef) in &self.terms {
            result.terms.insert(mono.clone(), coef.neg()?);
        }
        Ok(result)
    }

    pub fn sub(&self, other: &Poly) -> Result<Poly, SolveError> {
        self.add(&other.neg()?)
    }

    pub fn scale(&self, factor: Rational) -> Result<Poly, SolveError> {
        self.mul(&Poly::constant(factor))
    }

    pub fn mul(&self, other: &Poly) -> Result<Poly, SolveError> {
        let mut result = Poly::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                let mut mono = m1.clone();
                for (atom, exp) in m2 {
                    let total = mono
                        .get(atom)
                        .copied()
                        .unwrap_or(0)
                        .checked_add(*exp)
                        .ok_or(SolveError::Overflow)?;
                    if !(-MAX_DEGREE..=MAX_DEGREE).contains(&total) {
                        return Err(SolveError::Unsupported(format!(
                            "power of {} exceeds {}",
                            atom, MAX_DEGREE
                        )));
                    }
                    if total == 0 {
                        mono.remove(atom);
                    } else {
                        mono.insert(atom.clone(), total);
                    }
                }
                result.add_term(mono, c1.mul(c2)?)?;
                if result.terms.len() > MAX_TERMS {
                    return Err(SolveError::Unsupported(format!(
                        "expansion exceeds {} terms",
                        MAX_TERMS
                    )));
                }
            }
        }
        Ok(result)
    }

    /// Multiplicative inverse, available only for a single non-zero term
    pub fn recip(&self) -> Result<Option<Poly>, SolveError> {
        if self.terms.len() != 1 {
            return Ok(None);
        }
        let mut result = Poly::zero();
        for (mono, coef) in &self.terms {
            let inverted = mono.iter().map(|(atom, exp)| (atom.clone(), -exp)).collect();
            result.terms.insert(inverted, coef.recip()?);
        }
        Ok(Some(result))
    }

    pub fn pow(&self, exp: i32) -> Result<Option<Poly>, SolveError> {
        let base = if exp < 0 {
            match self.recip()? {
                Some(inverse) => inverse,
                None => return Ok(None),
            }
        } else {
            self.clone()
        };
        let mut result = Poly::constant(Rational::ONE);
        for _ in 0..exp.unsigned_abs() {
            result = result.mul(&base)?;
        }
        Ok(Some(result))
    }

    /// Group terms by the exponent of `var`, removing `var` from each term
    pub fn by_degree(&self, var: &str) -> Result<BTreeMap<i32, Poly>, SolveError> {
        let mut groups: BTreeMap<i32, Poly> = BTreeMap::new();
        for (mono, coef) in &self.terms {
            let mut rest = mono.clone();
            let degree = rest.remove(var).unwrap_or(0);
            groups.entry(degree).or_default().add_term(rest, *coef)?;
        }
        Ok(groups)
    }

    /// Normalize an expression, treating sub-expressions free of `var` that
    /// cannot be expanded as opaque atoms
    pub fn from_expr(expr: &Expr, var: &str) -> Result<Poly, SolveError> {
        match expr {
            Expr::Num(r) => Ok(Poly::constant(*r)),
            Expr::Sym(name) => Ok(Poly::atom(name.clone())),
            Expr::Neg(e) => Poly::from_expr(e, var)?.neg(),
            Expr::Add(a, b) => Poly::from_expr(a, var)?.add(&Poly::from_expr(b, var)?),
            Expr::Sub(a, b) => Poly::from_expr(a, var)?.sub(&Poly::from_expr(b, var)?),
            Expr::Mul(a, b) => Poly::from_expr(a, var)?.mul(&Poly::from_expr(b, var)?),
            Expr::Div(a, b) => {
                let numerator = Poly::from_expr(a, var)?;
                let denominator = Poly::from_expr(b, var)?;
                if denominator.is_zero() {
                    return Err(SolveError::DivisionByZero);
                }
                if let Some(inverse) = denominator.recip()? {
                    return numerator.mul(&inverse);
                }
                if b.mentions(var) {
                    return Err(SolveError::Unsupported(format!(
                        "division by an expression containing {}",
                        var
                    )));
                }
                let inverse = Poly::opaque(&denominator).pow(-1)?;
                numerator.mul(&inverse.unwrap_or_default())
            }
            Expr::Pow(base, exponent) => {
                let base_poly = Poly::from_expr(base, var)?;
                let exponent_value = Poly::from_expr(exponent, var)?.as_constant();

                if let Some(n) = exponent_value.filter(Rational::is_integer) {
                    if n.numer().abs() > MAX_EXPONENT {
                        return Err(SolveError::Unsupported(format!(
                            "exponent {} is too large",
                            n
                        )));
                    }
                    let n = n.numer() as i32;
                    if n < 0 && base_poly.is_zero() {
                        return Err(SolveError::DivisionByZero);
                    }
                    if let Some(power) = base_poly.pow(n)? {
                        return Ok(power);
                    }
                    if !base.mentions(var) {
                        return Ok(Poly::opaque(&base_poly).pow(n)?.unwrap_or_default());
                    }
                    return Err(SolveError::Unsupported(format!(
                        "negative power of a sum containing {}",
                        var
                    )));
                }

                if expr.mentions(var) {
                    return Err(SolveError::Unsupported(format!(
                        "non-integer or symbolic power involving {}",
                        var
                    )));
                }
                Ok(Poly::atom(expr.to_string()))
            }
            Expr::Call(name, args) => {
                if args.iter().any(|arg| arg.mentions(var)) {
                    return Err(SolveError::Unsupported(format!(
                        "{} appears inside {}()",
                        var, name
                    )));
                }
                Ok(Poly::atom(expr.to_string()))
            }
        }
    }

    /// Wrap a multi-term polynomial as a single parenthesized atom
    fn opaque(poly: &Poly) -> Poly {
        Poly::atom(format!("({})", poly))
    }

    fn sorted_terms(&self) -> Vec<(&Monomial, &Rational)> {
        let mut terms: Vec<_> = self.terms.iter().collect();
        terms.sort_by_key(|(mono, _)| std::cmp::Reverse(mono.values().sum::<i32>()));
        terms
    }
}

/// Whether an atom can be raised to a power without parentheses
fn is_simple_atom(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => {}
        Some('(') => return closes_at_end(name),
        _ => return false,
    }
    if name.chars().all(is_ident_continue) {
        return true;
    }
    match name.find('(') {
        Some(open) if name[..open].chars().all(is_ident_continue) => closes_at_end(&name[open..]),
        _ => false,
    }
}

/// Whether the `(` opening `text` is matched by its final character
fn closes_at_end(text: &str) -> bool {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + c.len_utf8() == text.len();
                }
            }
            _ => {}
        }
    }
    false
}

fn power_factor(atom: &str, exp: i32) -> String {
    if exp == 1 {
        atom.to_string()
    } else if is_simple_atom(atom) {
        format!("{}**{}", atom, exp)
    } else {
        format!("({})**{}", atom, exp)
    }
}

/// Magnitude of one term, e.g. `3*a**2/(2*m)`
fn term_magnitude(mono: &Monomial, coef: &Rational) -> String {
    let numer_atoms: Vec<String> = mono
        .iter()
        .filter(|(_, exp)| **exp > 0)
        .map(|(atom, exp)| power_factor(atom, *exp))
        .collect();
    let mut denom: Vec<String> = Vec::new();
    if coef.denom() != 1 {
        denom.push(coef.denom().to_string());
    }
    denom.extend(
        mono.iter()
            .filter(|(_, exp)| **exp < 0)
            .map(|(atom, exp)| power_factor(atom, -exp)),
    );

    let magnitude = coef.numer().abs();
    let numer = if numer_atoms.is_empty() {
        magnitude.to_string()
    } else if magnitude == 1 {
        numer_atoms.join("*")
    } else {
        format!("{}*{}", magnitude, numer_atoms.join("*"))
    };

    match denom.len() {
        0 => numer,
        1 => format!("{}/{}", numer, denom[0]),
        _ => format!("{}/({})", numer, denom.join("*")),
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, (mono, coef)) in self.sorted_terms().into_iter().enumerate() {
            let magnitude = term_magnitude(mono, coef);
            match (i, coef.is_negative()) {
                (0, true) => write!(f, "-{}", magnitude)?,
                (0, false) => write!(f, "{}", magnitude)?,
                (_, true) => write!(f, " - {}", magnitude)?,
                (_, false) => write!(f, " + {}", magnitude)?,
            }
        }
        Ok(())
    }
}
