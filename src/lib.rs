#![cfg_attr(not(test), no_std)]
#![doc = r#"
# mathex

A minimal, extensible, no_std-friendly math expression evaluator for Rust.

## Overview

mathex evaluates expressions supplied as text in a single pass: the source is
tokenized once, then a recursive-descent walk over the token sequence computes
the result directly. No syntax tree is built or retained, there is no bytecode
and no caching; an [`Expression`] owns nothing but the source text, its tokens,
and the name resolvers it was configured with.

Results are typed. Integer literals stay integers through `+`, `-`, `*`, `//`
and `**`; any float operand promotes the whole sub-expression to float, and
true division `/` always produces a float. Resolvers may also supply vector
values, which propagate elementwise through the same operators.

Key features:

- Integer/float/vector value domain with arithmetic promotion
- Right-associative exponentiation (`2**3**2` is `2**(3**2)`)
- Layered name resolution: per-call overrides shadow per-expression resolvers,
  which shadow a selectable default library
- Scalar and vectorized function libraries (`min`, `max`, `pow`, `abs`,
  `floor`, `ceil`, `exp`, `log`, `log2`, `log10`, `sqrt`, and `cbrt` in the
  vectorized library) plus the constants `e`, `pi` and `tau`
- Typed errors for every failure; nothing is silently coerced
- no_std compatibility with the `alloc` crate

## Quick Start

```rust
use mathex::{Backend, Expression, Library, Value};

let lib = Library::new(Backend::Scalar);

let expr = Expression::with_library("1 + 3*2**2", &lib).unwrap();
assert_eq!(expr.eval().unwrap(), Value::Int(13));

let expr = Expression::with_library("sqrt(min(9, 16))", &lib).unwrap();
assert_eq!(expr.eval().unwrap(), Value::Float(3.0));
```

## Supplying variables

Anything implementing [`VarResolver`] can take part in name resolution; plain
closures qualify through a blanket implementation, and [`Bindings`] offers a
small fixed-capacity map for hosts that just want to pin a few names:

```rust
use std::rc::Rc;
use mathex::{Bindings, Expression, Value};

let expr = Expression::new("ten * ten").unwrap()
    .with_var_resolver(Rc::new(|name: &str| match name {
        "ten" => Some(Value::Float(10.0)),
        _ => None,
    }));
assert_eq!(expr.eval().unwrap(), Value::Float(100.0));

let mut vars = Bindings::new();
vars.set("ten", 7.0).unwrap();
// The per-call override shadows the resolver bound above.
assert_eq!(expr.eval_with(Some(&vars), None).unwrap(), Value::Float(49.0));
// The override lives only for that call.
assert_eq!(expr.eval().unwrap(), Value::Float(100.0));
```

## Errors

Every failure is a typed [`ExprError`]: lexical errors carry the offending
column, parse errors name the unexpected token kind, and resolution failures
distinguish unknown variables, unknown functions, and arity mismatches. A
resolver answering "not found" is not an error; it is how lookup falls through
to the next resolver in the chain.

```rust
use mathex::{Expression, ExprError};

let err = Expression::new("1 + e").unwrap().eval().unwrap_err();
assert!(matches!(err, ExprError::UnknownVariable { .. }));
```

## Feature Flags

- `f32`: use 32-bit floating point for the float value kind (64-bit is the
  default)
"#]

extern crate alloc;

pub mod context;
pub mod error;
pub mod expression;
pub mod functions;
pub mod lexer;
pub mod library;
pub mod value;

pub use context::{Bindings, FuncResolution, FuncResolver, VarResolver};
pub use error::{ExprError, Result};
pub use expression::Expression;
pub use library::{Backend, Library};
pub use value::Value;

/// Define the floating-point type based on feature flags
#[cfg(feature = "f32")]
pub type Real = f32;

#[cfg(not(feature = "f32"))]
pub type Real = f64;

pub mod constants {
    use super::Real;

    #[cfg(feature = "f32")]
    pub const PI: Real = core::f32::consts::PI;
    #[cfg(feature = "f32")]
    pub const E: Real = core::f32::consts::E;
    #[cfg(feature = "f32")]
    pub const TAU: Real = core::f32::consts::TAU;
    #[cfg(feature = "f32")]
    pub const TEST_PRECISION: Real = 1e-6;

    #[cfg(not(feature = "f32"))]
    pub const PI: Real = core::f64::consts::PI;
    #[cfg(not(feature = "f32"))]
    pub const E: Real = core::f64::consts::E;
    #[cfg(not(feature = "f32"))]
    pub const TAU: Real = core::f64::consts::TAU;
    #[cfg(not(feature = "f32"))]
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check if two floating point values are approximately equal
/// within a specified epsilon.
#[macro_export]
macro_rules! assert_approx_eq {
    // Case 1: assert_approx_eq!(left, right) -> use default epsilon
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    // Case 2: assert_approx_eq!(left, right, epsilon) -> use specified epsilon
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val = $left;
        let right_val = $right;
        let eps = $epsilon;

        let message = format!(
            "assertion failed: `(left ≈ right)` \
             (left: `{}`, right: `{}`, epsilon: `{}`)",
            left_val, right_val, eps
        );

        if left_val.is_nan() && right_val.is_nan() {
            // NaN == NaN for our purposes
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && left_val.signum() == right_val.signum()
        {
            // Same-signed infinities are equal
        } else {
            assert!((left_val - right_val).abs() < eps, "{}", message);
        }
    }};
}
