//! LaTeX rendering of parsed expressions

use super::expr::{Equation, Expr};
use super::rational::Rational;

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega", "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi",
    "Omega",
];

/// Functions with a dedicated LaTeX command
const NAMED_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc", "sinh", "cosh", "tanh", "log", "ln", "exp",
];

pub fn render_equation(equation: &Equation) -> String {
    match &equation.rhs {
        Some(rhs) => format!("{} = {}", render(&equation.lhs), render(rhs)),
        None => render(&equation.lhs),
    }
}

pub fn render(expr: &Expr) -> String {
    match expr {
        Expr::Num(r) => rational(r),
        Expr::Sym(name) => symbol(name),
        Expr::Neg(e) => format!("- {}", grouped(e, 2)),
        Expr::Add(a, b) => format!("{} + {}", render(a), grouped(b, 2)),
        Expr::Sub(a, b) => format!("{} - {}", render(a), grouped(b, 2)),
        Expr::Mul(a, b) => {
            let separator = if starts_with_digit(b) { " \\cdot " } else { " " };
            format!("{}{}{}", grouped(a, 2), separator, grouped(b, 3))
        }
        Expr::Div(a, b) => format!("\\frac{{{}}}{{{}}}", render(a), render(b)),
        Expr::Pow(base, exponent) if is_one_half(exponent) => {
            format!("\\sqrt{{{}}}", render(base))
        }
        Expr::Pow(base, exponent) => {
            format!("{}^{{{}}}", grouped(base, 5), render(exponent))
        }
        Expr::Call(name, args) => call(name, args),
    }
}

fn grouped(expr: &Expr, min_prec: u8) -> String {
    if expr.precedence() < min_prec {
        format!("\\left({}\\right)", render(expr))
    } else {
        render(expr)
    }
}

fn starts_with_digit(expr: &Expr) -> bool {
    match expr {
        Expr::Num(r) => r.is_integer() && !r.is_negative(),
        Expr::Mul(a, _) | Expr::Pow(a, _) => starts_with_digit(a),
        _ => false,
    }
}

fn is_one_half(expr: &Expr) -> bool {
    let half = Rational::new(1, 2).ok();
    match expr {
        Expr::Num(r) => Some(*r) == half,
        Expr::Div(a, b) => {
            matches!((a.as_ref(), b.as_ref()), (Expr::Num(n), Expr::Num(d))
                if *n == Rational::ONE && *d == Rational::integer(2))
        }
        _ => false,
    }
}

fn rational(r: &Rational) -> String {
    if r.is_integer() {
        r.to_string()
    } else if r.is_negative() {
        format!("- \\frac{{{}}}{{{}}}", -r.numer(), r.denom())
    } else {
        format!("\\frac{{{}}}{{{}}}", r.numer(), r.denom())
    }
}

/// `theta` → `\theta`, `v_0` → `v_{0}`, `x12` → `x_{12}`
fn symbol(name: &str) -> String {
    if let Some((base, sub)) = name.split_once('_') {
        if !base.is_empty() && !sub.is_empty() {
            return format!("{}_{{{}}}", greek(base), sub);
        }
    }
    let digits_at = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    match digits_at {
        Some(i) if i > 0 => format!("{}_{{{}}}", greek(&name[..i]), &name[i..]),
        _ => greek(name),
    }
}

fn greek(name: &str) -> String {
    if GREEK.contains(&name) {
        format!("\\{}", name)
    } else {
        name.to_string()
    }
}

fn call(name: &str, args: &[Expr]) -> String {
    let rendered: Vec<String> = args.iter().map(render).collect();
    let joined = rendered.join(", ");
    if name == "sqrt" && args.len() == 1 {
        format!("\\sqrt{{{}}}", joined)
    } else if NAMED_FUNCTIONS.contains(&name) {
        format!("\\{}{{\\left({} \\right)}}", name, joined)
    } else {
        format!("\\operatorname{{{}}}{{\\left({} \\right)}}", name, joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::parser::parse;

    fn latex(input: &str) -> String {
        render_equation(&parse(input).unwrap())
    }

    #[test]
    fn test_polynomial() {
        assert_eq!(latex("x**2 - 4"), "x^{2} - 4");
        assert_eq!(latex("2*x + 3"), "2 x + 3");
        assert_eq!(latex("2*3"), "2 \\cdot 3");
    }

    #[test]
    fn test_fractions_and_roots() {
        assert_eq!(latex("F/m"), "\\frac{F}{m}");
        assert_eq!(latex("x**(1/2)"), "\\sqrt{x}");
        assert_eq!(latex("sqrt(b**2 - 4*a*c)"), "\\sqrt{b^{2} - 4 a c}");
        assert_eq!(latex("0.5*x"), "\\frac{1}{2} x");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(latex("(x + 1)**2"), "\\left(x + 1\\right)^{2}");
        assert_eq!(latex("(a + b)*c"), "\\left(a + b\\right) c");
        assert_eq!(latex("-(x - 1)"), "- \\left(x - 1\\right)");
    }

    #[test]
    fn test_symbols_and_functions() {
        assert_eq!(latex("theta"), "\\theta");
        assert_eq!(latex("v_0"), "v_{0}");
        assert_eq!(latex("x1"), "x_{1}");
        assert_eq!(latex("omega_2"), "\\omega_{2}");
        assert_eq!(latex("sin(theta)"), "\\sin{\\left(\\theta \\right)}");
        assert_eq!(latex("f(x, y)"), "\\operatorname{f}{\\left(x, y \\right)}");
    }

    #[test]
    fn test_equation() {
        assert_eq!(latex("F = m*a"), "F = m a");
    }
}
