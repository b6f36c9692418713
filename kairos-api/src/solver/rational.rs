//! Exact rational arithmetic with overflow detection

use std::fmt;

use super::SolveError;

/// Normalized fraction: `den > 0`, `gcd(num, den) == 1`, `num > i128::MIN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i128,
    den: i128,
}

pub(crate) fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    pub fn new(num: i128, den: i128) -> Result<Self, SolveError> {
        if den == 0 {
            return Err(SolveError::DivisionByZero);
        }
        // Keeps every stored value negatable
        if num == i128::MIN || den == i128::MIN {
            return Err(SolveError::Overflow);
        }
        let g = gcd(num, den);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = num.checked_neg().ok_or(SolveError::Overflow)?;
            den = den.checked_neg().ok_or(SolveError::Overflow)?;
        }
        Ok(Self { num, den })
    }

    pub fn integer(value: i128) -> Self {
        Self { num: value, den: 1 }
    }

    /// Parse a decimal literal such as `42`, `0.25` or `.5` exactly
    pub fn from_decimal(literal: &str) -> Result<Self, SolveError> {
        let (whole, frac) = literal.split_once('.').unwrap_or((literal, ""));
        let digits = format!("{}{}", whole, frac);
        let num = digits
            .parse::<i128>()
            .map_err(|_| SolveError::Overflow)?;
        let den = 10i128
            .checked_pow(frac.len() as u32)
            .ok_or(SolveError::Overflow)?;
        Self::new(num, den)
    }

    pub fn numer(&self) -> i128 {
        self.num
    }

    pub fn denom(&self) -> i128 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den,
        }
    }

    pub fn neg(&self) -> Result<Self, SolveError> {
        Ok(Self {
            num: self.num.checked_neg().ok_or(SolveError::Overflow)?,
            den: self.den,
        })
    }

    pub fn add(&self, other: &Self) -> Result<Self, SolveError> {
        let num = mul(self.num, other.den)?
            .checked_add(mul(other.num, self.den)?)
            .ok_or(SolveError::Overflow)?;
        Self::new(num, mul(self.den, other.den)?)
    }

    pub fn sub(&self, other: &Self) -> Result<Self, SolveError> {
        self.add(&other.neg()?)
    }

    pub fn mul(&self, other: &Self) -> Result<Self, SolveError> {
        let g1 = gcd(self.num, other.den).max(1);
        let g2 = gcd(other.num, self.den).max(1);
        Self::new(
            mul(self.num / g1, other.num / g2)?,
            mul(self.den / g2, other.den / g1)?,
        )
    }

    pub fn recip(&self) -> Result<Self, SolveError> {
        Self::new(self.den, self.num)
    }

    pub fn div(&self, other: &Self) -> Result<Self, SolveError> {
        self.mul(&other.recip()?)
    }

    pub fn pow(&self, exp: i32) -> Result<Self, SolveError> {
        let base = if exp < 0 { self.recip()? } else { *self };
        let mut result = Self::ONE;
        for _ in 0..exp.unsigned_abs() {
            result = result.mul(&base)?;
        }
        Ok(result)
    }

    /// Approximate value, used only for ordering roots
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

fn mul(a: i128, b: i128) -> Result<i128, SolveError> {
    a.checked_mul(b).ok_or(SolveError::Overflow)
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
