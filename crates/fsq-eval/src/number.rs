//! Untyped arbitrary-precision constants.
//!
//! Literals evaluate to a [`Number`]. Operators promote both operands to
//! `Number`, compute exactly, and hand back a new `Number`; only at a call
//! argument, an index bound or a write through a place is the constant
//! demoted to a concrete machine [`Value`].

use std::cmp::Ordering;
use std::fmt;

use fsq_types::ast::{BinOp, LitKind, Literal, UnaryOp};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{EvalError, EvalResult};
use crate::value::{Kind, Value};

/// Largest accepted shift count.
pub const MAX_SHIFT: usize = 10_000;

/// Largest accepted decimal exponent magnitude in a float literal.
const MAX_EXPONENT: i64 = 10_000;

/// An untyped constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Bool(bool),
    String(String),
    Int(BigInt),
    /// Floats are kept as exact rationals.
    Float(BigRational),
}

impl Number {
    /// Evaluate a literal.
    pub fn from_literal(lit: &Literal) -> EvalResult<Number> {
        match lit.kind {
            LitKind::Bool => Ok(Number::Bool(lit.text == "true")),
            LitKind::String => Ok(Number::String(lit.text.clone())),
            LitKind::Rune => lit
                .text
                .chars()
                .next()
                .map(|c| Number::Int(BigInt::from(u32::from(c))))
                .ok_or_else(|| EvalError::UnsupportedLiteral("empty rune".into())),
            LitKind::Int => parse_int(&lit.text),
            LitKind::Float => parse_float(&lit.text),
            LitKind::Imag => Err(EvalError::UnsupportedLiteral(format!(
                "{} (imaginary numbers are not supported)",
                lit.text
            ))),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Number::Bool(_) => "untyped bool",
            Number::String(_) => "untyped string",
            Number::Int(_) => "untyped int",
            Number::Float(_) => "untyped float",
        }
    }

    fn to_rational(&self) -> Option<BigRational> {
        match self {
            Number::Int(i) => Some(BigRational::from_integer(i.clone())),
            Number::Float(r) => Some(r.clone()),
            _ => None,
        }
    }

    /// The integer value, accepting floats with no fractional part.
    fn integer(&self) -> Option<BigInt> {
        match self {
            Number::Int(i) => Some(i.clone()),
            Number::Float(r) if r.is_integer() => Some(r.to_integer()),
            _ => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Bool(b) => write!(f, "{b}"),
            Number::String(s) => f.write_str(s),
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(r) => match r.to_f64() {
                Some(x) if x.is_finite() => write!(f, "{x}"),
                _ => write!(f, "{r}"),
            },
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(BigInt::from(i))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Literals
// ══════════════════════════════════════════════════════════════════════════════

fn parse_int(text: &str) -> EvalResult<Number> {
    let clean: String = text.chars().filter(|&c| c != '_').collect();
    let lower = clean.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    BigInt::parse_bytes(digits.as_bytes(), radix)
        .map(Number::Int)
        .ok_or_else(|| EvalError::UnsupportedLiteral(format!("could not parse literal {text:?}")))
}

fn parse_float(text: &str) -> EvalResult<Number> {
    let malformed = || EvalError::UnsupportedLiteral(format!("could not parse literal {text:?}"));
    let clean: String = text.chars().filter(|&c| c != '_').collect();

    let (mantissa, exponent) = match clean.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => {
            let exponent = clean[at + 1..].parse::<i64>().map_err(|_| malformed())?;
            (&clean[..at], exponent)
        }
        None => (clean.as_str(), 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_part}{frac_part}");
    let numer = if digits.is_empty() {
        BigInt::zero()
    } else {
        BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(malformed)?
    };

    let scale = exponent - frac_part.len() as i64;
    if scale.abs() > MAX_EXPONENT {
        return Err(EvalError::Range(format!("exponent of {text} is too large")));
    }
    let value = if scale >= 0 {
        BigRational::from_integer(numer * pow10(scale.unsigned_abs()))
    } else {
        BigRational::new(numer, pow10(scale.unsigned_abs()))
    };
    Ok(Number::Float(value))
}

fn pow10(exp: u64) -> BigInt {
    num_traits::pow(BigInt::from(10), exp as usize)
}

// ══════════════════════════════════════════════════════════════════════════════
// Promotion & demotion
// ══════════════════════════════════════════════════════════════════════════════

/// Promote an operand to a constant, loading through places.
///
/// Concrete integers and floats become the matching constant kind; a
/// constant passes through unchanged; anything else is a promotion error.
pub fn promote(value: &Value) -> EvalResult<Number> {
    match value.load()? {
        Value::Constant(n) => Ok(n),
        Value::Int(i) => Ok(Number::Int(BigInt::from(i))),
        Value::Float(f) => BigRational::from_float(f)
            .map(Number::Float)
            .ok_or_else(|| EvalError::Range(format!("{f} has no exact value"))),
        other => Err(EvalError::Promotion(other.type_name())),
    }
}

/// Demote a constant to the narrowest concrete value.
///
/// `hint` is the kind the consumer expects, if it declares one: an integer
/// becomes a float for a float target and an integral float becomes an
/// integer for an integer target.
pub fn demote(number: &Number, hint: Option<Kind>) -> EvalResult<Value> {
    match number {
        Number::Bool(b) => Ok(Value::Bool(*b)),
        Number::String(s) => Ok(Value::String(s.clone())),
        Number::Int(i) => match hint {
            Some(Kind::Float) => float_value(&BigRational::from_integer(i.clone())),
            _ => int_value(i),
        },
        Number::Float(r) => match hint {
            Some(Kind::Int) if r.is_integer() => int_value(&r.to_integer()),
            _ => float_value(r),
        },
    }
}

/// Demote `value` if it is a constant; other values are returned as-is.
pub fn demote_value(value: Value, hint: Option<Kind>) -> EvalResult<Value> {
    match value {
        Value::Constant(n) => demote(&n, hint),
        other => Ok(other),
    }
}

fn int_value(i: &BigInt) -> EvalResult<Value> {
    i.to_i64()
        .map(Value::Int)
        .ok_or_else(|| EvalError::Range(format!("constant {i} overflows int")))
}

fn float_value(r: &BigRational) -> EvalResult<Value> {
    match r.to_f64() {
        Some(x) if x.is_finite() => Ok(Value::Float(x)),
        _ => Err(EvalError::Range(format!(
            "constant {} overflows float",
            Number::Float(r.clone())
        ))),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

fn unsupported(op: BinOp, left: &Number, right: &Number) -> EvalError {
    EvalError::UnsupportedOperation(format!(
        "{} {op} {}",
        left.kind_name(),
        right.kind_name()
    ))
}

/// Apply a binary operator to two constants.
pub fn binary_op(op: BinOp, left: &Number, right: &Number) -> EvalResult<Number> {
    match op {
        BinOp::LogicalOr | BinOp::LogicalAnd => match (left, right) {
            (Number::Bool(a), Number::Bool(b)) => Ok(Number::Bool(if op == BinOp::LogicalAnd {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(unsupported(op, left, right)),
        },
        BinOp::Eq
        | BinOp::NotEq
        | BinOp::Less
        | BinOp::LessEq
        | BinOp::Greater
        | BinOp::GreaterEq => compare(op, left, right).map(Number::Bool),
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => arithmetic(op, left, right),
        BinOp::Rem => match (left, right) {
            (Number::Int(_), Number::Int(b)) if b.is_zero() => Err(EvalError::DivisionByZero),
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a % b)),
            _ => Err(unsupported(op, left, right)),
        },
        BinOp::Shl | BinOp::Shr => shift(op, left, right),
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::AndNot => {
            bitwise(op, left, right)
        }
    }
}

fn arithmetic(op: BinOp, left: &Number, right: &Number) -> EvalResult<Number> {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => match op {
            BinOp::Add => Ok(Number::Int(a + b)),
            BinOp::Sub => Ok(Number::Int(a - b)),
            BinOp::Mul => Ok(Number::Int(a * b)),
            // Truncates toward zero.
            _ if b.is_zero() => Err(EvalError::DivisionByZero),
            _ => Ok(Number::Int(a / b)),
        },
        (Number::String(a), Number::String(b)) if op == BinOp::Add => {
            Ok(Number::String(format!("{a}{b}")))
        }
        _ => {
            let (Some(a), Some(b)) = (left.to_rational(), right.to_rational()) else {
                return Err(unsupported(op, left, right));
            };
            let result = match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                _ if b.is_zero() => return Err(EvalError::DivisionByZero),
                _ => a / b,
            };
            Ok(Number::Float(result))
        }
    }
}

fn compare(op: BinOp, left: &Number, right: &Number) -> EvalResult<bool> {
    let ordering = match (left, right) {
        (Number::Bool(a), Number::Bool(b)) => {
            return match op {
                BinOp::Eq => Ok(a == b),
                BinOp::NotEq => Ok(a != b),
                _ => Err(unsupported(op, left, right)),
            };
        }
        (Number::String(a), Number::String(b)) => a.cmp(b),
        _ => match (left.to_rational(), right.to_rational()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => return Err(unsupported(op, left, right)),
        },
    };
    Ok(match op {
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::NotEq => ordering != Ordering::Equal,
        BinOp::Less => ordering == Ordering::Less,
        BinOp::LessEq => ordering != Ordering::Greater,
        BinOp::Greater => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    })
}

fn shift(op: BinOp, left: &Number, right: &Number) -> EvalResult<Number> {
    let (Some(value), Some(count)) = (left.integer(), right.integer()) else {
        return Err(unsupported(op, left, right));
    };
    if count.is_negative() {
        return Err(EvalError::Range(format!("negative shift count {count}")));
    }
    let n = count
        .to_usize()
        .filter(|n| *n <= MAX_SHIFT)
        .ok_or_else(|| EvalError::Range(format!("shift count {count} too large")))?;
    Ok(Number::Int(if op == BinOp::Shl {
        value << n
    } else {
        value >> n
    }))
}

fn bitwise(op: BinOp, left: &Number, right: &Number) -> EvalResult<Number> {
    let (Number::Int(a), Number::Int(b)) = (left, right) else {
        return Err(unsupported(op, left, right));
    };
    let result = match op {
        BinOp::BitAnd => a & b,
        BinOp::BitOr => a | b,
        BinOp::BitXor => a ^ b,
        _ => a & &complement(b),
    };
    Ok(Number::Int(result))
}

fn complement(i: &BigInt) -> BigInt {
    -i - BigInt::one()
}

/// Apply a unary operator to a constant.
pub fn unary_op(op: UnaryOp, operand: &Number) -> EvalResult<Number> {
    match (op, operand) {
        (UnaryOp::Plus, Number::Int(_) | Number::Float(_)) => Ok(operand.clone()),
        (UnaryOp::Neg, Number::Int(i)) => Ok(Number::Int(-i)),
        (UnaryOp::Neg, Number::Float(r)) => Ok(Number::Float(-r)),
        (UnaryOp::Not, Number::Bool(b)) => Ok(Number::Bool(!b)),
        (UnaryOp::Complement, Number::Int(i)) => Ok(Number::Int(complement(i))),
        _ => Err(EvalError::UnsupportedOperation(format!(
            "{op}{}",
            operand.kind_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(kind: LitKind, text: &str) -> Number {
        Number::from_literal(&Literal::new(kind, text)).unwrap()
    }

    fn int(i: i64) -> Number {
        Number::from(i)
    }

    fn ratio(n: i64, d: i64) -> Number {
        Number::Float(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(lit(LitKind::Int, "42"), int(42));
        assert_eq!(lit(LitKind::Int, "0x1F"), int(31));
        assert_eq!(lit(LitKind::Int, "0o17"), int(15));
        assert_eq!(lit(LitKind::Int, "017"), int(15));
        assert_eq!(lit(LitKind::Int, "0b101"), int(5));
        assert_eq!(lit(LitKind::Int, "1_000_000"), int(1_000_000));
        assert_eq!(lit(LitKind::Int, "0"), int(0));
    }

    #[test]
    fn test_float_literals_are_exact() {
        assert_eq!(lit(LitKind::Float, "0.1"), ratio(1, 10));
        assert_eq!(lit(LitKind::Float, ".5"), ratio(1, 2));
        assert_eq!(lit(LitKind::Float, "2.5e2"), ratio(250, 1));
        assert_eq!(lit(LitKind::Float, "1E-3"), ratio(1, 1000));
        assert_eq!(lit(LitKind::Float, "1."), ratio(1, 1));
    }

    #[test]
    fn test_rune_and_imaginary_literals() {
        assert_eq!(lit(LitKind::Rune, "a"), int(97));
        let err = Number::from_literal(&Literal::new(LitKind::Imag, "2i")).unwrap_err();
        assert!(matches!(err, EvalError::UnsupportedLiteral(_)));
    }

    #[test]
    fn test_huge_exponent_is_range_error() {
        let err = Number::from_literal(&Literal::new(LitKind::Float, "1e100000")).unwrap_err();
        assert!(matches!(err, EvalError::Range(_)));
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(binary_op(BinOp::Div, &int(7), &int(2)).unwrap(), int(3));
        assert_eq!(binary_op(BinOp::Div, &int(-7), &int(2)).unwrap(), int(-3));
        assert_eq!(binary_op(BinOp::Rem, &int(-7), &int(2)).unwrap(), int(-1));
    }

    #[test]
    fn test_division_by_zero() {
        for op in [BinOp::Div, BinOp::Rem] {
            assert_eq!(
                binary_op(op, &int(1), &int(0)).unwrap_err(),
                EvalError::DivisionByZero
            );
        }
        assert_eq!(
            binary_op(BinOp::Div, &ratio(1, 2), &ratio(0, 1)).unwrap_err(),
            EvalError::DivisionByZero
        );
    }

    #[test]
    fn test_mixed_arithmetic_is_rational() {
        let third = binary_op(BinOp::Div, &ratio(1, 1), &int(3)).unwrap();
        assert_eq!(third, ratio(1, 3));
        let back = binary_op(BinOp::Mul, &third, &int(3)).unwrap();
        assert_eq!(back, ratio(1, 1));
    }

    #[test]
    fn test_no_overflow() {
        let big = binary_op(BinOp::Shl, &int(1), &int(100)).unwrap();
        let doubled = binary_op(BinOp::Mul, &big, &int(2)).unwrap();
        assert_eq!(doubled, binary_op(BinOp::Shl, &int(1), &int(101)).unwrap());
    }

    #[test]
    fn test_shift_limits() {
        assert!(matches!(
            binary_op(BinOp::Shl, &int(1), &int(-1)).unwrap_err(),
            EvalError::Range(_)
        ));
        assert!(matches!(
            binary_op(BinOp::Shl, &int(1), &int(10_001)).unwrap_err(),
            EvalError::Range(_)
        ));
        assert_eq!(binary_op(BinOp::Shr, &int(-8), &int(1)).unwrap(), int(-4));
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(binary_op(BinOp::BitAnd, &int(6), &int(3)).unwrap(), int(2));
        assert_eq!(binary_op(BinOp::BitOr, &int(6), &int(3)).unwrap(), int(7));
        assert_eq!(binary_op(BinOp::BitXor, &int(6), &int(3)).unwrap(), int(5));
        assert_eq!(binary_op(BinOp::AndNot, &int(6), &int(3)).unwrap(), int(4));
        assert_eq!(unary_op(UnaryOp::Complement, &int(0)).unwrap(), int(-1));
    }

    #[test]
    fn test_comparisons() {
        let t = Number::Bool(true);
        assert_eq!(binary_op(BinOp::Less, &int(1), &ratio(3, 2)).unwrap(), t);
        assert_eq!(binary_op(BinOp::Eq, &int(2), &ratio(4, 2)).unwrap(), t);
        let a = Number::String("a".into());
        let b = Number::String("b".into());
        assert_eq!(binary_op(BinOp::LessEq, &a, &b).unwrap(), t);
        assert_eq!(binary_op(BinOp::NotEq, &t, &Number::Bool(false)).unwrap(), t);
        assert!(binary_op(BinOp::Less, &t, &t).is_err());
    }

    #[test]
    fn test_string_concatenation() {
        let a = Number::String("foo".into());
        let b = Number::String("bar".into());
        assert_eq!(
            binary_op(BinOp::Add, &a, &b).unwrap(),
            Number::String("foobar".into())
        );
        assert!(matches!(
            binary_op(BinOp::Sub, &a, &b).unwrap_err(),
            EvalError::UnsupportedOperation(_)
        ));
    }

    #[test]
    fn test_logical_operators() {
        let t = Number::Bool(true);
        let f = Number::Bool(false);
        assert_eq!(binary_op(BinOp::LogicalAnd, &t, &f).unwrap(), f);
        assert_eq!(binary_op(BinOp::LogicalOr, &t, &f).unwrap(), t);
        assert!(binary_op(BinOp::LogicalOr, &t, &int(1)).is_err());
    }

    #[test]
    fn test_demote_narrowest() {
        assert_eq!(demote(&int(5), None).unwrap(), Value::Int(5));
        assert_eq!(demote(&ratio(5, 2), None).unwrap(), Value::Float(2.5));
        assert_eq!(
            demote(&Number::String("x".into()), None).unwrap(),
            Value::String("x".into())
        );
        let big = binary_op(BinOp::Shl, &int(1), &int(64)).unwrap();
        assert!(matches!(demote(&big, None).unwrap_err(), EvalError::Range(_)));
    }

    #[test]
    fn test_demote_with_hint() {
        assert_eq!(demote(&int(2), Some(Kind::Float)).unwrap(), Value::Float(2.0));
        assert_eq!(demote(&ratio(4, 2), Some(Kind::Int)).unwrap(), Value::Int(2));
        assert_eq!(demote(&ratio(5, 2), Some(Kind::Int)).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_promote() {
        assert_eq!(promote(&Value::Int(3)).unwrap(), int(3));
        assert_eq!(promote(&Value::Float(0.5)).unwrap(), ratio(1, 2));
        assert!(matches!(
            promote(&Value::String("s".into())).unwrap_err(),
            EvalError::Promotion(_)
        ));
        assert!(matches!(
            promote(&Value::Float(f64::NAN)).unwrap_err(),
            EvalError::Range(_)
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ratio(5, 2).to_string(), "2.5");
        assert_eq!(int(-3).to_string(), "-3");
    }
}
