//! Default name libraries and backend selection.
//!
//! A [`Library`] is the injectable configuration object holding the default
//! resolvers an [`Expression`](crate::Expression) starts from. Selecting a
//! backend installs a constants resolver (`e`, `pi`, `tau`) and the matching
//! function library; selecting none clears both. The evaluator itself only
//! consumes the two accessors, so any host can substitute its own defaults.

use alloc::rc::Rc;

use crate::constants;
use crate::context::{FuncResolver, VarResolver};
use crate::functions::{ScalarFunctions, VectorFunctions};
use crate::value::Value;

/// Which default function library a [`Library`] supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Scalar math functions.
    Scalar,
    /// Vectorized math functions, applied elementwise with broadcast.
    Vector,
}

/// Resolver for the default constants shared by both backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct Constants;

impl VarResolver for Constants {
    fn resolve_var(&self, name: &str) -> Option<Value> {
        match name {
            "e" => Some(Value::Float(constants::E)),
            "pi" => Some(Value::Float(constants::PI)),
            "tau" => Some(Value::Float(constants::TAU)),
            _ => None,
        }
    }
}

/// The default resolver configuration handed to expressions at construction.
///
/// # Examples
///
/// ```
/// use mathex::{Backend, Expression, Library, Value};
///
/// let lib = Library::new(Backend::Scalar);
/// let expr = Expression::with_library("max(2, 3) * pi", &lib).unwrap();
/// assert!(matches!(expr.eval().unwrap(), Value::Float(_)));
/// ```
#[derive(Clone, Default)]
pub struct Library {
    var: Option<Rc<dyn VarResolver>>,
    func: Option<Rc<dyn FuncResolver>>,
}

impl Library {
    /// A library with no defaults at all; every name must come from the
    /// expression's own resolvers.
    pub fn none() -> Self {
        Self::default()
    }

    /// A library with the given backend selected.
    pub fn new(backend: Backend) -> Self {
        let mut lib = Self::none();
        lib.select(Some(backend));
        lib
    }

    /// Select a backend, or clear the defaults with `None`.
    pub fn select(&mut self, backend: Option<Backend>) {
        match backend {
            None => {
                self.var = None;
                self.func = None;
            }
            Some(Backend::Scalar) => {
                self.var = Some(Rc::new(Constants));
                self.func = Some(Rc::new(ScalarFunctions));
            }
            Some(Backend::Vector) => {
                self.var = Some(Rc::new(Constants));
                self.func = Some(Rc::new(VectorFunctions));
            }
        }
    }

    /// The current default variable resolver, if any.
    pub fn var_resolver(&self) -> Option<&Rc<dyn VarResolver>> {
        self.var.as_ref()
    }

    /// The current default function resolver, if any.
    pub fn func_resolver(&self) -> Option<&Rc<dyn FuncResolver>> {
        self.func.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(
            Constants.resolve_var("pi"),
            Some(Value::Float(constants::PI))
        );
        assert_eq!(Constants.resolve_var("e"), Some(Value::Float(constants::E)));
        assert_eq!(
            Constants.resolve_var("tau"),
            Some(Value::Float(constants::TAU))
        );
        assert_eq!(Constants.resolve_var("phi"), None);
    }

    #[test]
    fn test_selection_installs_and_clears() {
        let mut lib = Library::none();
        assert!(lib.var_resolver().is_none());
        assert!(lib.func_resolver().is_none());

        lib.select(Some(Backend::Scalar));
        assert!(lib.var_resolver().is_some());
        assert!(lib.func_resolver().is_some());

        lib.select(None);
        assert!(lib.var_resolver().is_none());
        assert!(lib.func_resolver().is_none());
    }
}
