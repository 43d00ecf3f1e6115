//! Integration tests for the default libraries: scalar and vectorized
//! backends, constants, and selection.

use std::rc::Rc;

use mathex::{
    Backend, ExprError, Expression, Library, Real, Value, assert_approx_eq, constants,
};

fn scalar_eval(source: &str) -> Value {
    let lib = Library::new(Backend::Scalar);
    Expression::with_library(source, &lib)
        .unwrap_or_else(|e| panic!("tokenize {:?}: {}", source, e))
        .eval()
        .unwrap_or_else(|e| panic!("eval {:?}: {}", source, e))
}

fn vector_data(name: &str) -> Option<Value> {
    match name {
        "a" => Some(Value::from(vec![2.0 as Real, 3.0, 4.0])),
        "b" => Some(Value::from(vec![5.0 as Real, 1.0, 2.0])),
        "c" => Some(Value::from(vec![3.0 as Real, 6.0, 4.0])),
        "tot" => Some(Value::from(vec![10.0 as Real, 10.0, 10.0])),
        _ => None,
    }
}

fn vector_eval(source: &str) -> Value {
    let lib = Library::new(Backend::Vector);
    Expression::with_library(source, &lib)
        .unwrap()
        .with_var_resolver(Rc::new(vector_data))
        .eval()
        .unwrap_or_else(|e| panic!("eval {:?}: {}", source, e))
}

fn assert_vector(value: &Value, expected: &[Real]) {
    match value {
        Value::Vector(v) => {
            assert_eq!(v.len(), expected.len());
            for (got, want) in v.iter().zip(expected) {
                assert_approx_eq!(*got, *want);
            }
        }
        other => panic!("expected vector, got {:?}", other),
    }
}

#[test]
fn test_constants() {
    for (source, expected) in [
        ("e", constants::E),
        ("pi", constants::PI),
        ("tau", constants::TAU),
    ] {
        assert_eq!(scalar_eval(source), Value::Float(expected));
    }
    assert_approx_eq!(
        match scalar_eval("2*pi") {
            Value::Float(f) => f,
            other => panic!("expected float, got {:?}", other),
        },
        constants::TAU
    );
}

#[test]
fn test_scalar_min_max_pow() {
    assert_eq!(scalar_eval("min(10, 20)"), Value::Int(10));
    assert_eq!(scalar_eval("max(10, 20)"), Value::Int(20));
    assert_eq!(scalar_eval("pow(2, 10)"), Value::Int(1024));
    assert_eq!(scalar_eval("min(1, 2.5)"), Value::Int(1));
    assert_eq!(scalar_eval("max(1, 2.5)"), Value::Float(2.5));
    assert_eq!(scalar_eval("pow(2., 10)"), Value::Float(1024.0));
}

#[test]
fn test_scalar_rounding_and_abs() {
    assert_eq!(scalar_eval("floor(2.7)"), Value::Int(2));
    assert_eq!(scalar_eval("ceil(2.2)"), Value::Int(3));
    assert_eq!(scalar_eval("floor(-2.5)"), Value::Int(-3));
    assert_eq!(scalar_eval("ceil(-2.5)"), Value::Int(-2));
    assert_eq!(scalar_eval("abs(-3)"), Value::Float(3.0));
    assert_eq!(scalar_eval("abs(3.5)"), Value::Float(3.5));
}

#[test]
fn test_scalar_transcendentals() {
    for (source, expected) in [
        ("exp(2)", (2.0 as Real).exp()),
        ("log(10)", (10.0 as Real).ln()),
        ("log2(8)", 3.0),
        ("log10(1000)", 3.0),
        ("sqrt(2)", (2.0 as Real).sqrt()),
    ] {
        match scalar_eval(source) {
            Value::Float(f) => assert_approx_eq!(f, expected),
            other => panic!("expected float from {:?}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_scalar_functions_compose_with_operators() {
    assert_eq!(scalar_eval("sqrt(min(9, 16)) + 1"), Value::Float(4.0));
    assert_eq!(scalar_eval("min(max(1, 2), 3) * 10"), Value::Int(20));
}

#[test]
fn test_wrong_arity() {
    let lib = Library::new(Backend::Scalar);
    let err = Expression::with_library("min(1)", &lib)
        .unwrap()
        .eval()
        .unwrap_err();
    assert_eq!(
        err,
        ExprError::InvalidFunctionCall {
            name: "min".into(),
            expected: 2,
            found: 1
        }
    );

    let err = Expression::with_library("sqrt(1, 2)", &lib)
        .unwrap()
        .eval()
        .unwrap_err();
    assert_eq!(
        err,
        ExprError::InvalidFunctionCall {
            name: "sqrt".into(),
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn test_cbrt_is_vector_library_only() {
    let scalar = Library::new(Backend::Scalar);
    let err = Expression::with_library("cbrt(8)", &scalar)
        .unwrap()
        .eval()
        .unwrap_err();
    assert_eq!(
        err,
        ExprError::UnknownFunction {
            name: "cbrt".into()
        }
    );

    let vector = Library::new(Backend::Vector);
    match Expression::with_library("cbrt(8)", &vector)
        .unwrap()
        .eval()
        .unwrap()
    {
        Value::Float(f) => assert_approx_eq!(f, 2.0 as Real),
        other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn test_selection_none_clears_defaults() {
    let mut lib = Library::new(Backend::Scalar);
    lib.select(None);
    let err = Expression::with_library("pi", &lib).unwrap().eval().unwrap_err();
    assert!(matches!(err, ExprError::UnknownVariable { .. }));
    let err = Expression::with_library("min(1, 2)", &lib)
        .unwrap()
        .eval()
        .unwrap_err();
    assert!(matches!(err, ExprError::UnknownFunction { .. }));
}

#[test]
fn test_instance_resolver_shadows_library() {
    let lib = Library::new(Backend::Scalar);
    let shadow = |name: &str| (name == "pi").then_some(Value::Float(3.0));
    let expr = Expression::with_library("pi", &lib)
        .unwrap()
        .with_var_resolver(Rc::new(shadow));
    assert_eq!(expr.eval().unwrap(), Value::Float(3.0));
}

#[test]
fn test_vector_constants_stay_scalar() {
    let lib = Library::new(Backend::Vector);
    assert_eq!(
        Expression::with_library("tau", &lib).unwrap().eval().unwrap(),
        Value::Float(constants::TAU)
    );
}

#[test]
fn test_vector_min_max_pow() {
    assert_vector(&vector_eval("max(a, b)"), &[5.0, 3.0, 4.0]);
    assert_vector(&vector_eval("min(a, b)"), &[2.0, 1.0, 2.0]);
    assert_vector(&vector_eval("pow(tot, 2)"), &[100.0, 100.0, 100.0]);
}

#[test]
fn test_vector_modifiers() {
    assert_vector(&vector_eval("abs(-a)"), &[2.0, 3.0, 4.0]);
    assert_vector(&vector_eval("floor(b/2)"), &[2.0, 0.0, 1.0]);
    assert_vector(&vector_eval("ceil(c/4)"), &[1.0, 2.0, 1.0]);
}

#[test]
fn test_vector_transcendentals() {
    let expected: Vec<Real> = [2.0 as Real, 3.0, 4.0].iter().map(|x| x.exp()).collect();
    assert_vector(&vector_eval("exp(a)"), &expected);

    let expected: Vec<Real> = [15.0 as Real, 6.0, 8.0].iter().map(|x| x.ln()).collect();
    assert_vector(&vector_eval("log(b*c)"), &expected);

    let expected: Vec<Real> = [15.0 as Real, 6.0, 8.0].iter().map(|x| x.log2()).collect();
    assert_vector(&vector_eval("log2(b*c)"), &expected);

    let expected: Vec<Real> = [15.0 as Real, 6.0, 8.0]
        .iter()
        .map(|x| x.log10())
        .collect();
    assert_vector(&vector_eval("log10(b*c)"), &expected);

    let expected: Vec<Real> = [15.0 as Real, 6.0, 8.0].iter().map(|x| x.sqrt()).collect();
    assert_vector(&vector_eval("sqrt(b*c)"), &expected);

    let expected: Vec<Real> = [15.0 as Real, 6.0, 8.0].iter().map(|x| x.cbrt()).collect();
    assert_vector(&vector_eval("cbrt(b*c)"), &expected);
}

#[test]
fn test_vector_broadcast_in_functions() {
    assert_vector(&vector_eval("max(a, 3)"), &[3.0, 3.0, 4.0]);
    assert_vector(&vector_eval("min(3, a)"), &[2.0, 3.0, 3.0]);
    assert_vector(&vector_eval("pow(a, 2)"), &[4.0, 9.0, 16.0]);
}

#[test]
fn test_scalar_library_rejects_vectors() {
    let lib = Library::new(Backend::Scalar);
    let err = Expression::with_library("sqrt(a)", &lib)
        .unwrap()
        .with_var_resolver(Rc::new(vector_data))
        .eval()
        .unwrap_err();
    assert_eq!(
        err,
        ExprError::InvalidArgument {
            name: "sqrt".into()
        }
    );
}

#[test]
fn test_vector_shape_mismatch_in_functions() {
    let lib = Library::new(Backend::Vector);
    let short = |name: &str| (name == "s").then_some(Value::from(vec![1.0 as Real, 2.0]));
    let err = Expression::with_library("min(s, 0) + min(a, s)", &lib)
        .unwrap()
        .with_var_resolver(Rc::new(vector_data))
        .with_var_resolver(Rc::new(short))
        .eval()
        .unwrap_err();
    assert_eq!(err, ExprError::ShapeMismatch { left: 3, right: 2 });
}
