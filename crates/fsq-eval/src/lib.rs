//! fsq evaluator: dynamic expressions over host object graphs.
//!
//! An embedder binds host objects into an [`Evaluator`] and feeds it input
//! lines. Each `;`-separated statement is parsed and evaluated on its own:
//! identifiers resolve against the environment, selectors against the
//! capabilities a host object exposes through the traits in [`host`], and
//! operators over exact untyped constants ([`Number`]).
//!
//! ```
//! use fsq_eval::Evaluator;
//!
//! let mut ev = Evaluator::new();
//! ev.eval("x = 40").unwrap();
//! let v = ev.eval("x + 2").unwrap();
//! assert_eq!(v.to_string(), "42");
//! ```

mod builtins;
mod config;
mod env;
mod error;
mod evaluator;
mod function;
pub mod host;
mod members;
mod number;
pub mod objects;
mod place;
mod session;
mod value;

pub use config::{EvalConfig, FunctionPolicy};
pub use env::Environment;
pub use error::{EvalError, EvalResult, HostError};
pub use evaluator::Evaluator;
pub use function::{Builtin, Function, NativeFn, ParamType, Signature};
pub use host::{FieldInfo, Mapping, MethodSig, Object, Record, Sequence};
pub use members::transform_name;
pub use number::{binary_op, demote, demote_value, promote, unary_op, Number, MAX_SHIFT};
pub use place::Place;
pub use session::Outcome;
pub use value::{Kind, Value};
