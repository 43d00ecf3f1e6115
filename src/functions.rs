//! Built-in function libraries.
//!
//! Two [`FuncResolver`] implementations live here: [`ScalarFunctions`], which
//! works on scalar values only, and [`VectorFunctions`], which applies the
//! same functions elementwise over vectors with scalar broadcast. Both use the
//! `libm` crate for the underlying math so the crate stays no_std compatible.

use crate::Real;
use crate::context::{FuncResolution, FuncResolver};
use crate::error::{ExprError, Result};
use crate::value::{Value, vec_map, vec_zip};

#[cfg(feature = "f32")]
use libm::{
    cbrtf as libm_cbrt, ceilf as libm_ceil, expf as libm_exp, fabsf as libm_fabs,
    floorf as libm_floor, log10f as libm_log10, log2f as libm_log2, logf as libm_log,
    powf as libm_pow, sqrtf as libm_sqrt,
};
#[cfg(not(feature = "f32"))]
use libm::{
    cbrt as libm_cbrt, ceil as libm_ceil, exp as libm_exp, fabs as libm_fabs,
    floor as libm_floor, log as libm_log, log2 as libm_log2, log10 as libm_log10,
    pow as libm_pow, sqrt as libm_sqrt,
};

/// The scalar function library.
///
/// Supplies `min/2`, `max/2`, `pow/2`, `abs/1`, `floor/1`, `ceil/1`, `exp/1`,
/// `log/1`, `log2/1`, `log10/1` and `sqrt/1` over scalar values. `min` and
/// `max` preserve the kind of the chosen argument, `floor` and `ceil` return
/// integers, `pow` follows the `**` promotion rule, and the remaining
/// functions return floats. Vector arguments are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarFunctions;

impl FuncResolver for ScalarFunctions {
    fn resolve_func(&self, name: &str, args: &[Value]) -> Result<FuncResolution> {
        let expected = match name {
            "min" | "max" | "pow" => 2,
            "abs" | "floor" | "ceil" | "exp" | "log" | "log2" | "log10" | "sqrt" => 1,
            _ => return Ok(FuncResolution::NotFound),
        };
        if args.len() != expected {
            return Ok(FuncResolution::WrongArity { expected });
        }

        let value = match name {
            "min" => pick(name, &args[0], &args[1], false)?,
            "max" => pick(name, &args[0], &args[1], true)?,
            "pow" => {
                scalar_arg(name, &args[0])?;
                scalar_arg(name, &args[1])?;
                args[0].pow(&args[1])?
            }
            "abs" => Value::Float(libm_fabs(scalar_arg(name, &args[0])?)),
            "floor" => real_to_int(libm_floor(scalar_arg(name, &args[0])?))?,
            "ceil" => real_to_int(libm_ceil(scalar_arg(name, &args[0])?))?,
            "exp" => Value::Float(libm_exp(scalar_arg(name, &args[0])?)),
            "log" => Value::Float(libm_log(scalar_arg(name, &args[0])?)),
            "log2" => Value::Float(libm_log2(scalar_arg(name, &args[0])?)),
            "log10" => Value::Float(libm_log10(scalar_arg(name, &args[0])?)),
            _ => Value::Float(libm_sqrt(scalar_arg(name, &args[0])?)),
        };
        Ok(FuncResolution::Value(value))
    }
}

/// The vectorized function library.
///
/// Same surface as [`ScalarFunctions`] plus `cbrt/1`, applied elementwise
/// over vectors with scalars broadcast. On purely scalar arguments the unary
/// functions return floats (`floor`/`ceil` included), while `min`, `max` and
/// `pow` keep their scalar promotion behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorFunctions;

impl FuncResolver for VectorFunctions {
    fn resolve_func(&self, name: &str, args: &[Value]) -> Result<FuncResolution> {
        let expected = match name {
            "min" | "max" | "pow" => 2,
            "abs" | "floor" | "ceil" | "exp" | "log" | "log2" | "log10" | "sqrt" | "cbrt" => 1,
            _ => return Ok(FuncResolution::NotFound),
        };
        if args.len() != expected {
            return Ok(FuncResolution::WrongArity { expected });
        }

        let value = match name {
            "min" => binary(name, &args[0], &args[1], real_min, |a, b| {
                pick("min", a, b, false)
            })?,
            "max" => binary(name, &args[0], &args[1], real_max, |a, b| {
                pick("max", a, b, true)
            })?,
            "pow" => binary(name, &args[0], &args[1], libm_pow, |a, b| a.pow(b))?,
            "abs" => unary(name, &args[0], libm_fabs)?,
            "floor" => unary(name, &args[0], libm_floor)?,
            "ceil" => unary(name, &args[0], libm_ceil)?,
            "exp" => unary(name, &args[0], libm_exp)?,
            "log" => unary(name, &args[0], libm_log)?,
            "log2" => unary(name, &args[0], libm_log2)?,
            "log10" => unary(name, &args[0], libm_log10)?,
            "sqrt" => unary(name, &args[0], libm_sqrt)?,
            _ => unary(name, &args[0], libm_cbrt)?,
        };
        Ok(FuncResolution::Value(value))
    }
}

/// Extract a scalar argument as a float, rejecting vectors.
fn scalar_arg(name: &str, value: &Value) -> Result<Real> {
    value.as_real().ok_or_else(|| ExprError::InvalidArgument {
        name: name.into(),
    })
}

/// Type-preserving scalar min/max: returns the chosen argument itself, the
/// first one on ties.
fn pick(name: &str, a: &Value, b: &Value, want_max: bool) -> Result<Value> {
    let x = scalar_arg(name, a)?;
    let y = scalar_arg(name, b)?;
    let first = if want_max { x >= y } else { x <= y };
    Ok(if first { a.clone() } else { b.clone() })
}

fn real_min(a: Real, b: Real) -> Real {
    if a <= b { a } else { b }
}

fn real_max(a: Real, b: Real) -> Real {
    if a >= b { a } else { b }
}

/// Convert a rounded float back to the integer kind, guarding the 64-bit
/// range (the bounds are ±2^63).
fn real_to_int(f: Real) -> Result<Value> {
    if f >= i64::MIN as Real && f < -(i64::MIN as Real) {
        Ok(Value::Int(f as i64))
    } else {
        Err(ExprError::Overflow)
    }
}

/// Apply a unary function elementwise, or to a scalar with a float result.
fn unary(name: &str, v: &Value, f: fn(Real) -> Real) -> Result<Value> {
    match v {
        Value::Vector(x) => Ok(vec_map(x, f)),
        _ => Ok(Value::Float(f(scalar_arg(name, v)?))),
    }
}

/// Apply a binary function with vector broadcast; fall back to `scalar` when
/// neither argument is a vector.
fn binary(
    name: &str,
    a: &Value,
    b: &Value,
    f: fn(Real, Real) -> Real,
    scalar: impl Fn(&Value, &Value) -> Result<Value>,
) -> Result<Value> {
    match (a, b) {
        (Value::Vector(x), Value::Vector(y)) => vec_zip(x, y, f),
        (Value::Vector(x), s) => {
            let s = scalar_arg(name, s)?;
            Ok(vec_map(x, |v| f(v, s)))
        }
        (s, Value::Vector(y)) => {
            let s = scalar_arg(name, s)?;
            Ok(vec_map(y, |v| f(s, v)))
        }
        _ => scalar(a, b),
    }
}
