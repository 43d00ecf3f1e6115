//! The value domain and its arithmetic.
//!
//! A [`Value`] is an integer, a float, or a vector of floats. The operator
//! implementations here carry the promotion rules: integer operands stay
//! integer wherever the operation allows it, any float operand promotes the
//! result to float, and any vector operand makes the operation elementwise
//! with scalars broadcast across the vector.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::Real;
use crate::error::{ExprError, Result};

#[cfg(feature = "f32")]
use libm::{floorf as libm_floor, powf as libm_pow};
#[cfg(not(feature = "f32"))]
use libm::{floor as libm_floor, pow as libm_pow};

/// A numeric value produced by evaluation or supplied by a resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A floating-point number ([`Real`] is `f64` unless the `f32` feature is
    /// enabled).
    Float(Real),
    /// A vector of floats, operated on elementwise. Non-integer for promotion
    /// purposes.
    Vector(Rc<[Real]>),
}

impl Value {
    /// Whether this value is integer-kind.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Whether this value is float-kind.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Whether this value is vector-kind.
    pub fn is_vector(&self) -> bool {
        matches!(self, Value::Vector(_))
    }

    /// The value as a float, if it is a scalar.
    pub fn as_real(&self) -> Option<Real> {
        match self {
            Value::Int(i) => Some(*i as Real),
            Value::Float(f) => Some(*f),
            Value::Vector(_) => None,
        }
    }

    /// Addition.
    pub fn add(&self, rhs: &Value) -> Result<Value> {
        self.binary(rhs, int_add, |a, b| a + b)
    }

    /// Subtraction.
    pub fn sub(&self, rhs: &Value) -> Result<Value> {
        self.binary(rhs, int_sub, |a, b| a - b)
    }

    /// Multiplication.
    pub fn mul(&self, rhs: &Value) -> Result<Value> {
        self.binary(rhs, int_mul, |a, b| a * b)
    }

    /// True division. The result is always float-kind, even for two integer
    /// operands; integer division by zero is an error, while float division
    /// follows IEEE semantics.
    pub fn div(&self, rhs: &Value) -> Result<Value> {
        self.binary(rhs, int_div, |a, b| a / b)
    }

    /// Floor division, rounding toward negative infinity.
    pub fn floor_div(&self, rhs: &Value) -> Result<Value> {
        self.binary(rhs, int_floor_div, |a, b| libm_floor(a / b))
    }

    /// Exponentiation. Integer base and non-negative integer exponent stay
    /// integer; a negative integer exponent or any float operand produces a
    /// float.
    pub fn pow(&self, rhs: &Value) -> Result<Value> {
        self.binary(rhs, int_pow, libm_pow)
    }

    /// Unary negation.
    pub fn neg(&self) -> Result<Value> {
        match self {
            Value::Int(i) => i.checked_neg().map(Value::Int).ok_or(ExprError::Overflow),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Vector(v) => Ok(vec_map(v, |x| -x)),
        }
    }

    /// Apply a binary operation with promotion: the integer path only for two
    /// integer operands, elementwise with broadcast when a vector is involved,
    /// the float path otherwise.
    fn binary(
        &self,
        rhs: &Value,
        int_op: fn(i64, i64) -> Result<Value>,
        real_op: fn(Real, Real) -> Real,
    ) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => int_op(*a, *b),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(real_op(*a as Real, *b))),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(real_op(*a, *b as Real))),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(real_op(*a, *b))),
            (Value::Vector(a), Value::Vector(b)) => vec_zip(a, b, real_op),
            (Value::Vector(a), Value::Int(s)) => {
                let s = *s as Real;
                Ok(vec_map(a, |x| real_op(x, s)))
            }
            (Value::Vector(a), Value::Float(s)) => {
                let s = *s;
                Ok(vec_map(a, |x| real_op(x, s)))
            }
            (Value::Int(s), Value::Vector(b)) => {
                let s = *s as Real;
                Ok(vec_map(b, |x| real_op(s, x)))
            }
            (Value::Float(s), Value::Vector(b)) => {
                let s = *s;
                Ok(vec_map(b, |x| real_op(s, x)))
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Real> for Value {
    fn from(value: Real) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Real>> for Value {
    fn from(value: Vec<Real>) -> Self {
        Value::Vector(value.into())
    }
}

impl From<&[Real]> for Value {
    fn from(value: &[Real]) -> Self {
        Value::Vector(value.into())
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Vector(v) => {
                f.write_str("[")?;
                for (idx, x) in v.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", x)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn int_add(a: i64, b: i64) -> Result<Value> {
    a.checked_add(b).map(Value::Int).ok_or(ExprError::Overflow)
}

fn int_sub(a: i64, b: i64) -> Result<Value> {
    a.checked_sub(b).map(Value::Int).ok_or(ExprError::Overflow)
}

fn int_mul(a: i64, b: i64) -> Result<Value> {
    a.checked_mul(b).map(Value::Int).ok_or(ExprError::Overflow)
}

fn int_div(a: i64, b: i64) -> Result<Value> {
    if b == 0 {
        return Err(ExprError::DivideByZero);
    }
    Ok(Value::Float(a as Real / b as Real))
}

fn int_floor_div(a: i64, b: i64) -> Result<Value> {
    if b == 0 {
        return Err(ExprError::DivideByZero);
    }
    let q = a.checked_div(b).ok_or(ExprError::Overflow)?;
    let r = a % b;
    // Truncating division rounds toward zero; correct toward negative
    // infinity when the remainder and divisor disagree in sign.
    if r != 0 && (r < 0) != (b < 0) {
        Ok(Value::Int(q - 1))
    } else {
        Ok(Value::Int(q))
    }
}

fn int_pow(base: i64, exp: i64) -> Result<Value> {
    if exp < 0 {
        return Ok(Value::Float(libm_pow(base as Real, exp as Real)));
    }
    match u32::try_from(exp) {
        Ok(e) => base
            .checked_pow(e)
            .map(Value::Int)
            .ok_or(ExprError::Overflow),
        // Exponents past u32::MAX only stay in range for -1, 0 and 1.
        Err(_) => match base {
            0 => Ok(Value::Int(0)),
            1 => Ok(Value::Int(1)),
            -1 => Ok(Value::Int(if exp % 2 == 0 { 1 } else { -1 })),
            _ => Err(ExprError::Overflow),
        },
    }
}

/// Apply a function elementwise over a vector.
pub(crate) fn vec_map(v: &Rc<[Real]>, f: impl Fn(Real) -> Real) -> Value {
    let out: Rc<[Real]> = v.iter().map(|x| f(*x)).collect();
    Value::Vector(out)
}

/// Combine two vectors elementwise; the lengths must match.
pub(crate) fn vec_zip(
    a: &Rc<[Real]>,
    b: &Rc<[Real]>,
    f: impl Fn(Real, Real) -> Real,
) -> Result<Value> {
    if a.len() != b.len() {
        return Err(ExprError::ShapeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let out: Rc<[Real]> = a.iter().zip(b.iter()).map(|(x, y)| f(*x, *y)).collect();
    Ok(Value::Vector(out))
}
