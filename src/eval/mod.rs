//! Constant expression evaluation (spec §4.6): a four-state,
//! arbitrary-precision integer interpreter with precise SystemVerilog
//! semantics, used throughout elaboration for parameters, array bounds,
//! generate conditions, and `` `define``/constant-function evaluation.

pub mod interpreter;
pub mod svint;
pub mod value;

pub use interpreter::{BinaryOp, ConstExpr, ConstStmt, ConstantEvaluator, EvalError, Environment, UnaryOp};
pub use svint::{FourState, SVInt};
pub use value::ConstantValue;
