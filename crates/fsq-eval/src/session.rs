//! Line-level driver: splits input into statements and runs each one
//! behind a panic boundary.

use std::panic::{self, AssertUnwindSafe};

use fsq_parser::{parse_statement, split_statements};
use fsq_types::ast::{Expr, ExprKind, Stmt};
use tracing::{debug, warn};

use crate::config::FunctionPolicy;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::value::Value;

/// Result of one sub-statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The trimmed statement text.
    pub source: String,
    pub result: EvalResult<Value>,
}

impl Evaluator {
    /// Evaluate a full input line.
    ///
    /// Statements run in order and a failing one does not stop the rest.
    /// Blank statements produce no outcome; a blank line produces the
    /// environment snapshot when that is enabled.
    pub fn eval_line(&mut self, line: &str) -> Vec<Outcome> {
        if line.trim().is_empty() {
            return if self.config.snapshot_on_empty {
                vec![Outcome {
                    source: String::new(),
                    result: Ok(self.env.snapshot()),
                }]
            } else {
                Vec::new()
            };
        }

        split_statements(line)
            .into_iter()
            .filter(|segment| !segment.is_blank())
            .map(|segment| {
                let source = segment.text.trim().to_string();
                let result = self.eval(&source);
                Outcome { source, result }
            })
            .collect()
    }

    /// Evaluate a single statement.
    ///
    /// Panics raised by host code are caught and reported as
    /// [`EvalError::HostPanic`]. A failing statement leaves the environment
    /// untouched.
    pub fn eval(&mut self, source: &str) -> EvalResult<Value> {
        let source = source.trim();
        if source.is_empty() {
            return Ok(if self.config.snapshot_on_empty {
                self.env.snapshot()
            } else {
                Value::Invalid
            });
        }

        let stmt = parse_statement(source)
            .into_result()
            .map_err(EvalError::from_parse)?;

        match panic::catch_unwind(AssertUnwindSafe(|| self.exec_stmt(&stmt))) {
            Ok(result) => {
                if let Err(err) = &result {
                    debug!(source, error = %err, "statement failed");
                }
                result
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(source, message = %message, "host code panicked");
                Err(EvalError::HostPanic(message))
            }
        }
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Value> {
        match stmt {
            Stmt::Assign { target, value, .. } => {
                let value = self.eval_expr(value)?;
                self.assign(target, value)?;
                Ok(Value::Invalid)
            }
            Stmt::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                self.apply_function_policy(value)
            }
        }
    }

    fn assign(&mut self, target: &Expr, value: Value) -> EvalResult<()> {
        match &target.kind {
            ExprKind::Identifier(name) => {
                // Places are bound as places: the name aliases the slot.
                debug!(name = %name, kind = %value.kind(), "bind");
                self.env.bind(name, value)
            }
            _ => match self.eval_expr(target)? {
                Value::Ref(place) => {
                    debug!(span = ?target.span, "store");
                    place.store(value)
                }
                other => Err(EvalError::type_mismatch(format!(
                    "cannot assign to {}",
                    other.type_name()
                ))),
            },
        }
    }

    fn apply_function_policy(&self, value: Value) -> EvalResult<Value> {
        if self.config.function_policy == FunctionPolicy::AutoInvoke {
            if let Value::Function(func) = value.load()? {
                if func.signature.is_nullary() {
                    return self.call_function(&func, Vec::new());
                }
            }
        }
        Ok(value)
    }
}
