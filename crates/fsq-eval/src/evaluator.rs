//! Core expression evaluator: walks a statement's AST against the
//! environment and the host objects bound in it.

use std::rc::Rc;

use fsq_types::ast::*;
use tracing::{trace, warn};

use crate::builtins;
use crate::config::EvalConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::function::{Builtin, Callee, Function, ParamType};
use crate::members::{self, transform_name};
use crate::number::{binary_op, demote_value, promote, unary_op, Number};
use crate::objects::SliceView;
use crate::place::Place;
use crate::value::{Kind, Value};

/// The evaluator: one global environment plus its configuration.
pub struct Evaluator {
    /// Global bindings. `ls` and `str` are bound at construction.
    pub env: Environment,
    pub(crate) config: EvalConfig,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        let mut env = Environment::new();
        for builtin in [Builtin::Ls, Builtin::Str] {
            let func = Function::builtin(builtin);
            let name = func.name.clone();
            // Builtin names are fixed and valid.
            let _ = env.bind(&name, Value::Function(func));
        }
        Self { env, config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Register a host value under `name`.
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) -> EvalResult<()> {
        self.env.bind(name, value.into())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a value.
    ///
    /// Selectors and indexes yield [`Value::Ref`] places so that assignment
    /// can write through them; everything else yields plain values.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn eval_expr(&self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::Selector { base, name } => {
                let base = self.eval_expr(base)?;
                members::select(&base, &name.name, self.config.tag())
            }
            ExprKind::Index { base, index } => self.eval_index(base, index),
            ExprKind::Slice { base, low, high } => {
                self.eval_slice(base, low.as_deref(), high.as_deref())
            }
            ExprKind::Literal(lit) => Ok(Value::Constant(Number::from_literal(lit)?)),
            ExprKind::Binary { op, left, right } => {
                let left = promote(&self.eval_expr(left)?)?;
                let right = promote(&self.eval_expr(right)?)?;
                Ok(Value::Constant(binary_op(*op, &left, &right)?))
            }
            ExprKind::Unary { op, operand } => {
                let operand = promote(&self.eval_expr(operand)?)?;
                Ok(Value::Constant(unary_op(*op, &operand)?))
            }
            ExprKind::Call { func, args } => {
                let callee = self.eval_expr(func)?.load()?.expect_function()?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call_function(&callee, args)
            }
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    // ── Identifiers ───────────────────────────────────────────────────────

    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        if let Some(value) = self.env.lookup(name) {
            return Ok(value.clone());
        }
        let host_name = transform_name(name);
        if let Some(value) = self.env.lookup(&host_name) {
            trace!(name, host_name = %host_name, "identifier resolved by naming fallback");
            return Ok(value.clone());
        }
        Err(EvalError::UnknownIdentifier(name.to_string()))
    }

    // ── Indexing ──────────────────────────────────────────────────────────

    fn eval_index(&self, base: &Expr, index: &Expr) -> EvalResult<Value> {
        let base = self.eval_expr(base)?.load()?;
        let index = self.eval_expr(index)?.load()?;
        match base {
            Value::Sequence(seq) => {
                let i = to_int(index)?;
                let len = seq.len();
                if i < 0 || i as usize >= len {
                    return Err(EvalError::IndexOutOfRange { index: i, len });
                }
                Ok(Value::Ref(Place::Element {
                    seq,
                    index: i as usize,
                }))
            }
            Value::Mapping(map) => {
                let key_kind = map.key_kind();
                let key = demote_value(index, Some(key_kind))?;
                if key.kind() != key_kind {
                    return Err(EvalError::type_mismatch(format!(
                        "cannot use {} as {key_kind} key of {}",
                        key.type_name(),
                        map.type_name()
                    )));
                }
                if map.get(&key).is_none() {
                    return Err(EvalError::KeyNotFound(key.to_string()));
                }
                Ok(Value::Ref(Place::Entry {
                    map,
                    key: Box::new(key),
                }))
            }
            Value::List(items) => {
                let i = to_int(index)?;
                let len = items.len();
                if i < 0 || i as usize >= len {
                    return Err(EvalError::IndexOutOfRange { index: i, len });
                }
                Ok(items[i as usize].clone())
            }
            other => Err(EvalError::type_mismatch(format!(
                "cannot index {}",
                other.type_name()
            ))),
        }
    }

    fn eval_slice(&self, base: &Expr, low: Option<&Expr>, high: Option<&Expr>) -> EvalResult<Value> {
        let seq = match self.eval_expr(base)?.load()? {
            Value::Sequence(seq) => seq,
            other => {
                return Err(EvalError::type_mismatch(format!(
                    "cannot slice {}",
                    other.type_name()
                )))
            }
        };
        let len = seq.len();
        let low = match low {
            Some(expr) => to_int(self.eval_expr(expr)?.load()?)?,
            None => 0,
        };
        let high = match high {
            Some(expr) => to_int(self.eval_expr(expr)?.load()?)?,
            None => len as i64,
        };
        for bound in [low, high] {
            if bound < 0 || bound as usize > len {
                return Err(EvalError::IndexOutOfRange { index: bound, len });
            }
        }
        if low > high {
            return Err(EvalError::IndexOutOfRange { index: low, len });
        }
        let view = SliceView::new(Rc::clone(&seq), low as usize, high as usize);
        Ok(Value::Sequence(Rc::new(view)))
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    /// Check arity, demote arguments against the signature and dispatch.
    pub(crate) fn call_function(&self, func: &Function, args: Vec<Value>) -> EvalResult<Value> {
        let sig = &func.signature;
        if !sig.accepts_arity(args.len()) {
            return Err(EvalError::ArityError {
                name: func.name.clone(),
                expected: sig.arity(),
                got: args.len(),
            });
        }

        let args = args
            .into_iter()
            .enumerate()
            .map(|(i, arg)| prepare_arg(&func.name, i, sig.param(i), arg))
            .collect::<EvalResult<Vec<_>>>()?;

        trace!(name = %func.name, argc = args.len(), "call");
        let results = match &func.callee {
            Callee::Builtin(Builtin::Ls) => vec![builtins::ls(&self.env, self.config.tag(), &args)],
            Callee::Builtin(Builtin::Str) => vec![builtins::str(&args[0])?],
            Callee::Native(body) => body(&args)?,
        };

        if results.len() != sig.results.len() {
            warn!(
                name = %func.name,
                declared = sig.results.len(),
                returned = results.len(),
                "host function returned an unexpected number of results"
            );
        }

        let mut results = results;
        Ok(match results.len() {
            0 => Value::Invalid,
            1 => results.remove(0),
            _ => Value::List(results),
        })
    }
}

/// Load an argument and demote it using the parameter type as the hint.
fn prepare_arg(name: &str, index: usize, param: ParamType, arg: Value) -> EvalResult<Value> {
    let value = demote_value(arg.load()?, param.hint())?;
    if !param.accepts(&value) {
        return Err(EvalError::type_mismatch(format!(
            "argument {} of {name}: cannot use {} as {param}",
            index + 1,
            value.type_name()
        )));
    }
    Ok(value)
}

/// Demote a loaded index or bound to an integer.
fn to_int(value: Value) -> EvalResult<i64> {
    match demote_value(value, Some(Kind::Int))? {
        Value::Int(i) => Ok(i),
        other => Err(EvalError::type_mismatch(format!(
            "index must be an integer, not {}",
            other.type_name()
        ))),
    }
}
