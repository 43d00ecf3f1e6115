//! The expression type and its single-pass recursive-descent evaluator.
//!
//! Grammar, evaluated inline at each reduction (no tree is built):
//!
//! ```text
//! expression := [("+"|"-")] term (("+"|"-") term)*
//! term       := factor (("*"|"/"|"//") factor)*
//! factor     := base ("**" base)*              right-associative
//! base       := name "(" [expression ("," expression)*] ")"
//!             | name
//!             | integer-literal | float-literal
//!             | "(" expression ")"
//! ```
//!
//! The walk is strict LL(1): one mutable cursor, one token of lookahead, no
//! backtracking. The cursor and the per-call override resolvers are local to
//! each evaluation call, so an `Expression` holds no transient state between
//! calls and a failed evaluation cannot corrupt later ones.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::context::{FuncResolver, VarResolver, lookup_func, lookup_var};
use crate::error::{ExprError, Result};
use crate::lexer::{Token, TokenKind, tokenize};
use crate::library::Library;
use crate::value::Value;

/// A tokenized expression plus its default name resolvers.
///
/// The source is tokenized once at construction; evaluation walks the token
/// sequence and computes the result directly. An expression may be evaluated
/// any number of times, optionally with per-call override resolvers that
/// shadow the defaults for that call only.
///
/// # Examples
///
/// ```
/// use mathex::{Backend, Expression, Library, Value};
///
/// let lib = Library::new(Backend::Scalar);
/// let expr = Expression::with_library("2**3**2", &lib).unwrap();
/// assert_eq!(expr.eval().unwrap(), Value::Int(512));
/// ```
///
/// Resolution is layered: a per-call override shadows resolvers bound at
/// construction, which shadow the library defaults.
///
/// ```
/// use std::rc::Rc;
/// use mathex::{Expression, Value};
///
/// let expr = Expression::new("a + b").unwrap()
///     .with_var_resolver(Rc::new(|name: &str| match name {
///         "a" => Some(Value::Int(1)),
///         "b" => Some(Value::Int(10)),
///         _ => None,
///     }));
/// assert_eq!(expr.eval().unwrap(), Value::Int(11));
///
/// let shadow_a = |name: &str| (name == "a").then_some(Value::Int(100));
/// assert_eq!(expr.eval_with(Some(&shadow_a), None).unwrap(), Value::Int(110));
/// // The override was scoped to that call.
/// assert_eq!(expr.eval().unwrap(), Value::Int(11));
/// ```
pub struct Expression {
    source: String,
    tokens: Vec<Token>,
    // Default resolver chains in registration order (library first, then
    // instance resolvers); lookup walks them in reverse.
    vars: Vec<Rc<dyn VarResolver>>,
    funcs: Vec<Rc<dyn FuncResolver>>,
}

impl Expression {
    /// Tokenizes `source` with no default resolvers.
    ///
    /// Lexical errors surface here; grammar errors surface on evaluation.
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            source: String::from(source),
            tokens: tokenize(source)?,
            vars: Vec::new(),
            funcs: Vec::new(),
        })
    }

    /// Tokenizes `source` and installs the library's current defaults as the
    /// lowest-priority resolvers.
    pub fn with_library(source: &str, library: &Library) -> Result<Self> {
        let mut expr = Self::new(source)?;
        if let Some(var) = library.var_resolver() {
            expr.vars.push(var.clone());
        }
        if let Some(func) = library.func_resolver() {
            expr.funcs.push(func.clone());
        }
        Ok(expr)
    }

    /// Adds a default variable resolver, shadowing any added earlier.
    pub fn with_var_resolver(mut self, resolver: Rc<dyn VarResolver>) -> Self {
        self.vars.push(resolver);
        self
    }

    /// Adds a default function resolver, shadowing any added earlier.
    pub fn with_func_resolver(mut self, resolver: Rc<dyn FuncResolver>) -> Self {
        self.funcs.push(resolver);
        self
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates with the default resolvers only.
    pub fn eval(&self) -> Result<Value> {
        self.eval_with(None, None)
    }

    /// Evaluates with optional per-call override resolvers.
    ///
    /// An override is consulted before every default resolver, and exists
    /// only for the duration of this call; it is gone on every exit path,
    /// including errors. Each call gets its own cursor, so sequential and
    /// nested evaluations of the same expression never interfere.
    pub fn eval_with(
        &self,
        var_override: Option<&dyn VarResolver>,
        func_override: Option<&dyn FuncResolver>,
    ) -> Result<Value> {
        let mut eval = Eval {
            tokens: &self.tokens,
            cur: 0,
            vars: &self.vars,
            funcs: &self.funcs,
            var_override,
            func_override,
        };
        let value = eval.expression()?;
        // Leftover tokens after a complete expression are a parse error.
        if eval.cur != self.tokens.len() {
            return Err(eval.unexpected());
        }
        Ok(value)
    }
}

/// One evaluation pass: cursor state plus the resolver chains for this call.
struct Eval<'e> {
    tokens: &'e [Token],
    cur: usize,
    vars: &'e [Rc<dyn VarResolver>],
    funcs: &'e [Rc<dyn FuncResolver>],
    var_override: Option<&'e dyn VarResolver>,
    func_override: Option<&'e dyn FuncResolver>,
}

impl<'e> Eval<'e> {
    /// Consume an operator token if its spelling is in `allowed`.
    fn next_operator(&mut self, allowed: &[&'static str]) -> Option<&'static str> {
        if let Some(Token {
            kind: TokenKind::Operator,
            text: Some(text),
            ..
        }) = self.tokens.get(self.cur)
        {
            for &op in allowed {
                if text == op {
                    self.cur += 1;
                    return Some(op);
                }
            }
        }
        None
    }

    /// Consume the next token if it has the given kind.
    fn next_is(&mut self, kind: TokenKind) -> bool {
        match self.tokens.get(self.cur) {
            Some(token) if token.kind == kind => {
                self.cur += 1;
                true
            }
            _ => false,
        }
    }

    /// Consume a name token, yielding its text.
    fn next_name(&mut self) -> Option<String> {
        match self.tokens.get(self.cur) {
            Some(Token {
                kind: TokenKind::Name,
                text: Some(text),
                ..
            }) => {
                let text = text.clone();
                self.cur += 1;
                Some(text)
            }
            _ => None,
        }
    }

    /// Consume a literal token, yielding its decoded value.
    fn next_literal(&mut self) -> Option<Value> {
        match self.tokens.get(self.cur) {
            Some(Token {
                kind: TokenKind::Integer | TokenKind::Float,
                value: Some(value),
                ..
            }) => {
                let value = value.clone();
                self.cur += 1;
                Some(value)
            }
            _ => None,
        }
    }

    /// Require a token of the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.next_is(kind) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// The error for the current cursor position.
    fn unexpected(&self) -> ExprError {
        match self.tokens.get(self.cur) {
            None => ExprError::ParseEnd,
            Some(token) => ExprError::Parse {
                kind: token.kind,
                column: token.column,
            },
        }
    }

    fn expression(&mut self) -> Result<Value> {
        // A leading sign applies to the whole first term, so exponentiation
        // binds tighter: "-10**3" is -(10**3).
        let sign = self.next_operator(&["+", "-"]);
        let mut value = self.term()?;
        if sign == Some("-") {
            value = value.neg()?;
        }

        while let Some(op) = self.next_operator(&["+", "-"]) {
            let rhs = self.term()?;
            value = if op == "+" {
                value.add(&rhs)?
            } else {
                value.sub(&rhs)?
            };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Value> {
        let mut value = self.factor()?;
        while let Some(op) = self.next_operator(&["*", "/", "//"]) {
            let rhs = self.factor()?;
            value = match op {
                "*" => value.mul(&rhs)?,
                "/" => value.div(&rhs)?,
                _ => value.floor_div(&rhs)?,
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<Value> {
        let first = self.base()?;
        let mut rest = Vec::new();
        while self.next_operator(&["**"]).is_some() {
            rest.push(self.base()?);
        }

        // "**" chains fold from the rightmost pair inward.
        let mut exp = match rest.pop() {
            None => return Ok(first),
            Some(last) => last,
        };
        for base in rest.into_iter().rev() {
            exp = base.pow(&exp)?;
        }
        first.pow(&exp)
    }

    fn base(&mut self) -> Result<Value> {
        if let Some(name) = self.next_name() {
            if self.next_is(TokenKind::Open) {
                let mut args = Vec::new();
                if !self.next_is(TokenKind::Close) {
                    args.push(self.expression()?);
                    while self.next_is(TokenKind::Separator) {
                        args.push(self.expression()?);
                    }
                    self.expect(TokenKind::Close)?;
                }
                return self.call(&name, &args);
            }
            return self.variable(&name);
        }

        if let Some(value) = self.next_literal() {
            return Ok(value);
        }

        if self.next_is(TokenKind::Open) {
            let value = self.expression()?;
            self.expect(TokenKind::Close)?;
            return Ok(value);
        }

        Err(self.unexpected())
    }

    fn variable(&self, name: &str) -> Result<Value> {
        let chain = self
            .var_override
            .into_iter()
            .chain(self.vars.iter().rev().map(|r| r.as_ref()));
        lookup_var(chain, name)
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let chain = self
            .func_override
            .into_iter()
            .chain(self.funcs.iter().rev().map(|r| r.as_ref()));
        lookup_func(chain, name, args)
    }
}
