//! Expression tree and tree-walking evaluator.

/// Free variables an expression may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Var {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// The fixed function set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Pow,
    Min,
    Max,
}

impl Func {
    pub(crate) const ALL: [Func; 19] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Asin,
        Func::Acos,
        Func::Atan,
        Func::Sinh,
        Func::Cosh,
        Func::Tanh,
        Func::Exp,
        Func::Log,
        Func::Sqrt,
        Func::Abs,
        Func::Floor,
        Func::Ceil,
        Func::Round,
        Func::Pow,
        Func::Min,
        Func::Max,
    ];

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Floor => "floor",
            Func::Ceil => "ceil",
            Func::Round => "round",
            Func::Pow => "pow",
            Func::Min => "min",
            Func::Max => "max",
        }
    }

    /// Case-insensitive lookup by name.
    pub(crate) fn lookup(name: &str) -> Option<Func> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Fixed argument count, or `None` for the variadic `min` / `max`.
    pub(crate) const fn arity(self) -> Option<usize> {
        match self {
            Func::Min | Func::Max => None,
            Func::Pow => Some(2),
            _ => Some(1),
        }
    }

    fn apply_unary(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Asin => v.asin(),
            Func::Acos => v.acos(),
            Func::Atan => v.atan(),
            Func::Sinh => v.sinh(),
            Func::Cosh => v.cosh(),
            Func::Tanh => v.tanh(),
            Func::Exp => v.exp(),
            Func::Log => v.ln(),
            Func::Sqrt => v.sqrt(),
            Func::Abs => v.abs(),
            Func::Floor => v.floor(),
            Func::Ceil => v.ceil(),
            Func::Round => round_half_up(v),
            Func::Pow | Func::Min | Func::Max => f64::NAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(f64),
    Var(Var),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    pub(crate) fn eval(&self, x: f64, y: f64) -> f64 {
        match self {
            Expr::Literal(v) => *v,
            Expr::Var(Var::X) => x,
            Expr::Var(Var::Y) => y,
            Expr::Neg(inner) => -inner.eval(x, y),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x, y);
                let b = rhs.eval(x, y);
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => pow(a, b),
                }
            }
            Expr::Call(func, args) => match (func, args.as_slice()) {
                (Func::Min, _) => args
                    .iter()
                    .map(|a| a.eval(x, y))
                    .fold(f64::INFINITY, |acc, v| nan_aware(acc, v, f64::min)),
                (Func::Max, _) => args
                    .iter()
                    .map(|a| a.eval(x, y))
                    .fold(f64::NEG_INFINITY, |acc, v| nan_aware(acc, v, f64::max)),
                (Func::Pow, [base, exponent]) => pow(base.eval(x, y), exponent.eval(x, y)),
                (unary, [arg]) => unary.apply_unary(arg.eval(x, y)),
                _ => f64::NAN,
            },
        }
    }
}

/// Rounds to the nearest integer, ties toward positive infinity.
fn round_half_up(v: f64) -> f64 {
    let floor = v.floor();
    if v - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// `powf` with NaN exponents and `(±1)^±inf` yielding NaN.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// `f64::min`/`max` ignore NaN; these reductions must propagate it.
fn nan_aware(acc: f64, v: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        pick(acc, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    fn lit(v: f64) -> Box<Expr> {
        Box::new(Expr::Literal(v))
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Func::lookup("SIN"), Some(Func::Sin));
        assert_eq!(Func::lookup("Max"), Some(Func::Max));
        assert_eq!(Func::lookup("ln"), None);
    }

    #[test]
    fn test_round_ties_toward_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
    }

    #[test]
    fn test_min_max_propagate_nan_and_handle_empty() {
        let with_nan = Expr::Call(Func::Max, vec![Expr::Literal(1.0), Expr::Literal(f64::NAN)]);
        assert!(with_nan.eval(0.0, 0.0).is_nan());
        assert_eq!(Expr::Call(Func::Min, vec![]).eval(0.0, 0.0), f64::INFINITY);
        assert_eq!(Expr::Call(Func::Max, vec![]).eval(0.0, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_pow_edge_cases() {
        assert!(Expr::Binary(BinOp::Pow, lit(1.0), lit(f64::NAN)).eval(0.0, 0.0).is_nan());
        assert!(pow(-1.0, f64::INFINITY).is_nan());
        assert!(pow(-8.0, 1.0 / 3.0).is_nan());
        assert_approx_eq!(pow(2.0, 10.0), 1024.0);
    }

    #[test]
    fn test_log_is_natural() {
        let e = Expr::Call(Func::Log, vec![Expr::Literal(std::f64::consts::E)]);
        assert_approx_eq!(e.eval(0.0, 0.0), 1.0, 1e-12);
    }
}
