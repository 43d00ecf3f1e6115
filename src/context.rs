//! Name resolution: resolver traits, the lookup chain, and bindings storage.
//!
//! Variables and functions are resolved through ordered chains of resolvers.
//! Each resolver either answers or signals "not found", in which case lookup
//! falls through to the next resolver; only exhausting the whole chain is an
//! error. Resolvers compose — any type implementing the traits participates,
//! including plain closures through the blanket implementations below.

use alloc::string::String;

use crate::error::{ExprError, Result};
use crate::value::Value;

/// Maximum length of a name stored in [`Bindings`].
pub const MAX_NAME_LEN: usize = 32;

/// Maximum number of entries in [`Bindings`].
pub const MAX_BINDINGS: usize = 16;

type Name = heapless::String<MAX_NAME_LEN>;
type BindingMap = heapless::FnvIndexMap<Name, Value, MAX_BINDINGS>;

/// Resolves bare names to values.
///
/// Returning `None` is not an error; it lets the lookup continue with the
/// next resolver in the chain.
pub trait VarResolver {
    fn resolve_var(&self, name: &str) -> Option<Value>;
}

/// Resolves function names and applies them to already-evaluated arguments.
pub trait FuncResolver {
    /// Resolve `name` against `args`.
    ///
    /// The `Err` path is reserved for failures inside a recognized function
    /// (domain errors, shape mismatches); "this resolver does not know the
    /// name" is the [`FuncResolution::NotFound`] answer instead.
    fn resolve_func(&self, name: &str, args: &[Value]) -> Result<FuncResolution>;
}

/// Outcome of asking one function resolver about a name.
#[derive(Debug, Clone, PartialEq)]
pub enum FuncResolution {
    /// The resolver recognized the name and produced a result.
    Value(Value),
    /// The resolver does not know the name; lookup continues down the chain.
    NotFound,
    /// The resolver knows the name but the argument count is wrong. This
    /// answer is definitive and aborts the chain.
    WrongArity { expected: usize },
}

impl<F> VarResolver for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn resolve_var(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

impl<F> FuncResolver for F
where
    F: Fn(&str, &[Value]) -> Result<FuncResolution>,
{
    fn resolve_func(&self, name: &str, args: &[Value]) -> Result<FuncResolution> {
        self(name, args)
    }
}

/// Walk a variable resolver chain in priority order.
pub(crate) fn lookup_var<'a>(
    chain: impl Iterator<Item = &'a dyn VarResolver>,
    name: &str,
) -> Result<Value> {
    for resolver in chain {
        if let Some(value) = resolver.resolve_var(name) {
            return Ok(value);
        }
    }
    Err(ExprError::UnknownVariable {
        name: String::from(name),
    })
}

/// Walk a function resolver chain in priority order.
pub(crate) fn lookup_func<'a>(
    chain: impl Iterator<Item = &'a dyn FuncResolver>,
    name: &str,
    args: &[Value],
) -> Result<Value> {
    for resolver in chain {
        match resolver.resolve_func(name, args)? {
            FuncResolution::Value(value) => return Ok(value),
            FuncResolution::NotFound => continue,
            FuncResolution::WrongArity { expected } => {
                return Err(ExprError::InvalidFunctionCall {
                    name: String::from(name),
                    expected,
                    found: args.len(),
                });
            }
        }
    }
    Err(ExprError::UnknownFunction {
        name: String::from(name),
    })
}

/// A small fixed-capacity name→value map that acts as a variable resolver.
///
/// Convenient when a host wants to pin a handful of values without writing a
/// resolver. Capacity is bounded ([`MAX_BINDINGS`] entries, names up to
/// [`MAX_NAME_LEN`] bytes); exceeding either bound is a typed error.
///
/// # Examples
///
/// ```
/// use mathex::{Bindings, Expression, Value};
///
/// let mut vars = Bindings::new();
/// vars.set("x", 5.0).unwrap();
/// vars.set("n", 3_i64).unwrap();
///
/// let expr = Expression::new("x ** n").unwrap();
/// assert_eq!(expr.eval_with(Some(&vars), None).unwrap(), Value::Float(125.0));
/// ```
#[derive(Default, Clone)]
pub struct Bindings {
    map: BindingMap,
}

impl Bindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, returning the previous value if any.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = Name::try_from(name).map_err(|_| ExprError::NameTooLong)?;
        self.map
            .insert(key, value.into())
            .map_err(|_| ExprError::CapacityExceeded("bindings"))
    }

    /// Looks up a bound value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let key = Name::try_from(name).ok()?;
        self.map.get(&key)
    }

    /// Removes a binding, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let key = Name::try_from(name).ok()?;
        self.map.remove(&key)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no names are bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl VarResolver for Bindings {
    fn resolve_var(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}
