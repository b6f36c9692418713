//! Root finding for normalized polynomials

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::poly::Poly;
use super::rational::{gcd, Rational};
use super::SolveError;

/// Coefficients larger than this are not factored for rational roots
const MAX_FACTOR_MAGNITUDE: i128 = 1_000_000_000_000;

/// Trial divisors tried when extracting square factors from a discriminant
const MAX_SQUARE_DIVISOR: i128 = 1_000_000;

/// One exact numeric root
#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    Exact(Rational),
    /// `p + q*sqrt(m)`
    Surd { p: Rational, q: Rational, m: i128 },
    /// `p + q*sqrt(m)*I`
    Complex { p: Rational, q: Rational, m: i128 },
}

impl Root {
    fn real_value(&self) -> Option<f64> {
        match self {
            Root::Exact(r) => Some(r.to_f64()),
            Root::Surd { p, q, m } => Some(p.to_f64() + q.to_f64() * (*m as f64).sqrt()),
            Root::Complex { .. } => None,
        }
    }

    /// Reals ascending, then complex roots by real then imaginary part
    fn order(&self, other: &Root) -> Ordering {
        match (self.real_value(), other.real_value()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => match (self, other) {
                (
                    Root::Complex { p: p1, q: q1, m: m1 },
                    Root::Complex { p: p2, q: q2, m: m2 },
                ) => p1.to_f64().total_cmp(&p2.to_f64()).then_with(|| {
                    let i1 = q1.to_f64() * (*m1 as f64).sqrt();
                    let i2 = q2.to_f64() * (*m2 as f64).sqrt();
                    i1.total_cmp(&i2)
                }),
                _ => Ordering::Equal,
            },
        }
    }
}

/// `q*sqrt(m)[*I]` split into sign and magnitude text
fn radical(q: &Rational, m: i128, imaginary: bool) -> (bool, String) {
    let mut factors = Vec::new();
    if q.numer().abs() != 1 {
        factors.push(q.numer().abs().to_string());
    }
    if m > 1 {
        factors.push(format!("sqrt({})", m));
    }
    if imaginary {
        factors.push("I".to_string());
    }
    if factors.is_empty() {
        factors.push("1".to_string());
    }
    let mut text = factors.join("*");
    if q.denom() != 1 {
        text = format!("{}/{}", text, q.denom());
    }
    (q.is_negative(), text)
}

fn with_offset(p: &Rational, (negative, magnitude): (bool, String)) -> String {
    match (p.is_zero(), negative) {
        (true, true) => format!("-{}", magnitude),
        (true, false) => magnitude,
        (false, true) => format!("{} - {}", p, magnitude),
        (false, false) => format!("{} + {}", p, magnitude),
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::Exact(r) => write!(f, "{}", r),
            Root::Surd { p, q, m } => write!(f, "{}", with_offset(p, radical(q, *m, false))),
            Root::Complex { p, q, m } => write!(f, "{}", with_offset(p, radical(q, *m, true))),
        }
    }
}

fn trim(coefficients: &mut Vec<Rational>) {
    while coefficients.last().is_some_and(Rational::is_zero) {
        coefficients.pop();
    }
}

/// Distinct roots of `sum(c[k] * x^k)`
pub fn numeric_roots(mut coefficients: Vec<Rational>) -> Result<Vec<Root>, SolveError> {
    trim(&mut coefficients);
    let mut roots = Vec::new();
    if coefficients.len() <= 1 {
        return Ok(roots);
    }

    if coefficients[0].is_zero() {
        roots.push(Root::Exact(Rational::ZERO));
        let first_nonzero = coefficients.iter().position(|c| !c.is_zero()).unwrap_or(0);
        coefficients.drain(..first_nonzero);
    }

    while coefficients.len() > 3 {
        let degree = coefficients.len() - 1;
        let root = rational_root(&coefficients)?.ok_or_else(|| {
            SolveError::Unsupported(format!(
                "no closed-form solution for a degree {} polynomial",
                degree
            ))
        })?;
        roots.push(Root::Exact(root));
        coefficients = deflate(&coefficients, &root)?;
    }

    match coefficients.len() {
        2 => roots.push(Root::Exact(
            coefficients[0].neg()?.div(&coefficients[1])?,
        )),
        3 => roots.extend(quadratic(&coefficients[2], &coefficients[1], &coefficients[0])?),
        _ => {}
    }

    roots.sort_by(Root::order);
    roots.dedup();
    Ok(roots)
}

fn evaluate(coefficients: &[Rational], x: &Rational) -> Result<Rational, SolveError> {
    coefficients
        .iter()
        .rev()
        .try_fold(Rational::ZERO, |acc, c| acc.mul(x)?.add(c))
}

/// Divide by `(x - root)`, dropping the zero remainder
fn deflate(coefficients: &[Rational], root: &Rational) -> Result<Vec<Rational>, SolveError> {
    let degree = coefficients.len() - 1;
    let mut quotient = vec![Rational::ZERO; degree];
    quotient[degree - 1] = coefficients[degree];
    for k in (0..degree - 1).rev() {
        quotient[k] = coefficients[k + 1].add(&root.mul(&quotient[k + 1])?)?;
    }
    Ok(quotient)
}

fn divisors(n: i128) -> Result<Vec<i128>, SolveError> {
    let n = n.abs();
    if n > MAX_FACTOR_MAGNITUDE {
        return Err(SolveError::Unsupported(
            "coefficients too large to search for rational roots".to_string(),
        ));
    }
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            small.push(i);
            if i != n / i {
                large.push(n / i);
            }
        }
        i += 1;
    }
    small.extend(large.into_iter().rev());
    Ok(small)
}

/// First rational root by the rational root theorem, if any
fn rational_root(coefficients: &[Rational]) -> Result<Option<Rational>, SolveError> {
    let lcm = coefficients.iter().try_fold(1i128, |acc, c| {
        let g = gcd(acc, c.denom());
        (acc / g).checked_mul(c.denom()).ok_or(SolveError::Overflow)
    })?;
    let integers = coefficients
        .iter()
        .map(|c| Ok(c.mul(&Rational::integer(lcm))?.numer()))
        .collect::<Result<Vec<i128>, SolveError>>()?;

    let constant = integers[0];
    let leading = integers[integers.len() - 1];
    for p in divisors(constant)? {
        for q in divisors(leading)? {
            for sign in [1, -1] {
                let candidate = Rational::new(sign * p, q)?;
                if evaluate(coefficients, &candidate)?.is_zero() {
                    return Ok(Some(candidate));
                }
            }
        }
    }
    Ok(None)
}

/// `s = k² * m` with as much of the square factor extracted as trial division finds
fn split_square(mut s: i128) -> (i128, i128) {
    let mut k = 1;
    let mut i = 2;
    while i <= MAX_SQUARE_DIVISOR && i * i <= s {
        while s % (i * i) == 0 {
            s /= i * i;
            k *= i;
        }
        i += 1;
    }
    (k, s)
}

fn quadratic(a: &Rational, b: &Rational, c: &Rational) -> Result<Vec<Root>, SolveError> {
    let two_a = a.mul(&Rational::integer(2))?;
    let discriminant = b.mul(b)?.sub(&Rational::integer(4).mul(a)?.mul(c)?)?;
    let p = b.neg()?.div(&two_a)?;

    if discriminant.is_zero() {
        return Ok(vec![Root::Exact(p)]);
    }

    // sqrt(n/d) = sqrt(n*d)/d
    let scaled = discriminant
        .numer()
        .abs()
        .checked_mul(discriminant.denom())
        .ok_or(SolveError::Overflow)?;
    let (k, m) = split_square(scaled);
    let q = Rational::new(k, discriminant.denom())?.div(&two_a)?.abs();

    let roots = if discriminant.is_negative() {
        vec![
            Root::Complex { p, q: q.neg()?, m },
            Root::Complex { p, q, m },
        ]
    } else if m == 1 {
        vec![Root::Exact(p.sub(&q)?), Root::Exact(p.add(&q)?)]
    } else {
        vec![Root::Surd { p, q: q.neg()?, m }, Root::Surd { p, q, m }]
    };
    Ok(roots)
}

/// Closed-form roots when some coefficient is symbolic
pub fn symbolic_roots(
    by_degree: &BTreeMap<i32, Poly>,
    degree: i32,
) -> Result<Vec<String>, SolveError> {
    let zero = Poly::zero();
    let coef = |d: i32| by_degree.get(&d).unwrap_or(&zero);

    match degree {
        d if d <= 0 => Ok(Vec::new()),
        1 => Ok(vec![quotient(&coef(0).neg()?, coef(1))?]),
        2 => {
            let (a, b, c) = (coef(2), coef(1), coef(0));
            let discriminant = b.mul(b)?.sub(&a.mul(c)?.scale(Rational::integer(4))?)?;
            let two_a = a.scale(Rational::integer(2))?;
            let neg_b = b.neg()?;

            if discriminant.is_zero() {
                return Ok(vec![quotient(&neg_b, &two_a)?]);
            }

            let sqrt = Poly::atom(format!("sqrt({})", discriminant));
            let mut roots = vec![
                quotient(&neg_b.sub(&sqrt)?, &two_a)?,
                quotient(&neg_b.add(&sqrt)?, &two_a)?,
            ];
            roots.dedup();
            Ok(roots)
        }
        d => Err(SolveError::Unsupported(format!(
            "no closed-form solution for a degree {} polynomial with symbolic coefficients",
            d
        ))),
    }
}

/// `numerator / denominator`, expanded when the denominator is a single term
fn quotient(numerator: &Poly, denominator: &Poly) -> Result<String, SolveError> {
    if denominator.is_zero() {
        return Err(SolveError::DivisionByZero);
    }
    if let Some(inverse) = denominator.recip()? {
        return Ok(numerator.mul(&inverse)?.to_string());
    }
    let numerator = if numerator.term_count() > 1 {
        format!("({})", numerator)
    } else {
        numerator.to_string()
    };
    Ok(format!("{}/({})", numerator, denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i128]) -> Vec<Rational> {
        values.iter().map(|v| Rational::integer(*v)).collect()
    }

    #[test]
    fn test_split_square() {
        assert_eq!(split_square(8), (2, 2));
        assert_eq!(split_square(72), (6, 2));
        assert_eq!(split_square(7), (1, 7));
        assert_eq!(split_square(1), (1, 1));
    }

    #[test]
    fn test_divisors() {
        assert_eq!(divisors(12).unwrap(), [1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(-9).unwrap(), [1, 3, 9]);
    }

    #[test]
    fn test_deflate() {
        // x^2 - 3x + 2 = (x - 1)(x - 2)
        let quotient = deflate(&ints(&[2, -3, 1]), &Rational::ONE).unwrap();
        assert_eq!(quotient, ints(&[-2, 1]));
    }

    #[test]
    fn test_repeated_roots_are_distinct() {
        // (x - 1)^2 (x + 2)
        let roots = numeric_roots(ints(&[2, -3, 0, 1])).unwrap();
        assert_eq!(roots, [Root::Exact(Rational::integer(-2)), Root::Exact(Rational::ONE)]);
    }

    #[test]
    fn test_rational_coefficients() {
        // x^2/4 - 1
        let coefficients = vec![
            Rational::integer(-1),
            Rational::ZERO,
            Rational::new(1, 4).unwrap(),
        ];
        let roots: Vec<String> = numeric_roots(coefficients)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(roots, ["-2", "2"]);
    }

    #[test]
    fn test_quartic_with_rational_roots() {
        // (x - 1)(x + 1)(x - 2)(x + 3) = x^4 + x^3 - 7x^2 - x + 6
        let roots: Vec<String> = numeric_roots(ints(&[6, -1, -7, 1, 1]))
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(roots, ["-3", "-1", "1", "2"]);
    }

    #[test]
    fn test_constant_has_no_roots() {
        assert!(numeric_roots(ints(&[5])).unwrap().is_empty());
        assert!(numeric_roots(ints(&[0, 0])).unwrap().is_empty());
        assert!(numeric_roots(Vec::new()).unwrap().is_empty());
    }
}
