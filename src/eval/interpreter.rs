//! The constant expression/statement interpreter (spec §4.6, §9).
//!
//! Expressions are evaluated by a plain recursive tree walk (they can't
//! contain loops, so native recursion depth is bounded by expression
//! nesting, which the parser already limits). Statements (inside constant
//! functions) are evaluated by an explicit stack of `Frame`s rather than by
//! recursively calling back into `eval_stmt` for nested blocks/loops, so
//! that a constant function with a deeply nested or long-running loop body
//! can't blow the evaluator's native stack (spec §9 design note).

use crate::base::Name;
use crate::eval::svint::{FourState, SVInt};
use crate::eval::value::ConstantValue;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    LogicalNot,
    ReduceAnd,
    ReduceNand,
    ReduceOr,
    ReduceNor,
    ReduceXor,
    ReduceXnor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    LogicalAnd,
    LogicalOr,
    Shl,
    Lshr,
    Ashr,
    /// Logical equality/inequality (`==`/`!=`): unlike `CaseEq`/`CaseNe`,
    /// any X/Z bit in either operand makes the result unknown rather than
    /// comparing it literally.
    Eq,
    Ne,
    CaseEq,
    CaseNe,
    WildcardEq,
    WildcardNe,
    Lt,
    Le,
    Gt,
    Ge,
    /// `**`: self-determined exponent per the standard's table 11-2 (the
    /// result takes the base's signedness, never equalized with the
    /// exponent's width the way `Add`/`Sub`/etc. are).
    Pow,
}

/// A constant-foldable expression tree. Produced by the binder whenever it
/// needs a compile-time value (parameter defaults, array bounds, generate
/// `if`/`case` conditions, localparams); kept independent of the bound
/// runtime-expression tree in `crate::binder` because constant expressions
/// never need l-value or hierarchical-reference machinery — the binder folds
/// function calls and hierarchical member accesses (`a0.LP`) down to a plain
/// literal before handing a tree to this evaluator at all.
#[derive(Debug, Clone)]
pub enum ConstExpr {
    IntLiteral(SVInt),
    RealLiteral(f64),
    StringLiteral(Arc<str>),
    Identifier(Name),
    Unary(UnaryOp, Box<ConstExpr>),
    Binary(BinaryOp, Box<ConstExpr>, Box<ConstExpr>),
    Conditional(Box<ConstExpr>, Box<ConstExpr>, Box<ConstExpr>),
    Concat(Vec<ConstExpr>),
    Replicate(Box<ConstExpr>, Box<ConstExpr>),
    Index(Box<ConstExpr>, Box<ConstExpr>),
    /// An explicit width/signedness conversion the binder inserts at a
    /// context-determined operand (spec §3.6 `ConversionExpression`) — e.g.
    /// widening a narrower operand of `+` to the context's combined width,
    /// or pinning down an `UnbasedUnsized` literal once its surrounding
    /// context supplies a width.
    Convert(Box<ConstExpr>, u32, bool),
    /// An unbased unsized literal (`'0`/`'1`/`'x`/`'z`) before the binder has
    /// determined the width it fills (spec §3.6); self-determined contexts
    /// evaluate it directly at a 32-bit fallback width, but most uses are
    /// wrapped in a `Convert` once the surrounding context's width is known.
    UnbasedUnsized(FourState),
    /// `$bits`/`$clog2`/`$left`/`$right`/`$low`/`$high`/`$size`, evaluated by
    /// the binder's type-query logic and folded in as a plain literal before
    /// it ever reaches the interpreter — kept as a variant so diagnostics
    /// can still point at the original call site.
    SystemCall(Name, Vec<ConstExpr>),
    Call(Name, Vec<ConstExpr>),
}

#[derive(Debug, Clone)]
pub enum ConstStmt {
    Assign(Name, ConstExpr),
    If {
        cond: ConstExpr,
        then_branch: Vec<ConstStmt>,
        else_branch: Vec<ConstStmt>,
    },
    While {
        cond: ConstExpr,
        body: Vec<ConstStmt>,
    },
    For {
        init: Vec<ConstStmt>,
        cond: ConstExpr,
        step: Vec<ConstStmt>,
        body: Vec<ConstStmt>,
    },
    Block(Vec<ConstStmt>),
    Return(ConstExpr),
}

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("unbound identifier in constant expression: {0:?}")]
    UnboundIdentifier(Name),
    #[error("operand widths do not match ({0} vs {1})")]
    WidthMismatch(u32, u32),
    #[error("unknown system function ${0}")]
    UnknownSystemCall(String),
    #[error("unsupported operation on a non-integer constant")]
    NotAnInteger,
    #[error("constant function exceeded the evaluation step budget")]
    StepBudgetExceeded,
    #[error("constant function did not reach a return statement")]
    NoReturn,
}

/// Local variable bindings visible to a constant-function body; the binder
/// seeds this with parameter values before calling `eval_function`.
#[derive(Default, Debug, Clone)]
pub struct Environment {
    vars: FxHashMap<Name, ConstantValue>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: Name, value: ConstantValue) {
        self.vars.insert(name, value);
    }

    pub fn get(&self, name: &Name) -> Option<&ConstantValue> {
        self.vars.get(name)
    }
}

/// Caps recursion/iteration inside constant-function evaluation so a
/// pathological input (e.g. an infinite `while (1)` in a constant function)
/// fails with a diagnosable error instead of hanging the compiler, per spec
/// §4.6's evaluator contract.
const MAX_EVAL_STEPS: u64 = 1_000_000;

pub struct ConstantEvaluator {
    steps: u64,
}

impl ConstantEvaluator {
    pub fn new() -> Self {
        ConstantEvaluator { steps: 0 }
    }

    fn tick(&mut self) -> Result<(), EvalError> {
        self.steps += 1;
        if self.steps > MAX_EVAL_STEPS {
            return Err(EvalError::StepBudgetExceeded);
        }
        Ok(())
    }

    pub fn eval_expr(&mut self, expr: &ConstExpr, env: &Environment) -> Result<ConstantValue, EvalError> {
        self.tick()?;
        match expr {
            ConstExpr::IntLiteral(i) => Ok(ConstantValue::Integer(i.clone())),
            ConstExpr::RealLiteral(r) => Ok(ConstantValue::Real(*r)),
            ConstExpr::StringLiteral(s) => Ok(ConstantValue::Str(s.clone())),
            ConstExpr::Identifier(name) => env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundIdentifier(name.clone())),
            ConstExpr::Unary(op, operand) => {
                let v = self.eval_expr(operand, env)?;
                self.eval_unary(*op, v)
            }
            ConstExpr::Binary(op, lhs, rhs) => {
                let l = self.eval_expr(lhs, env)?;
                let r = self.eval_expr(rhs, env)?;
                self.eval_binary(*op, l, r)
            }
            ConstExpr::Conditional(cond, t, f) => {
                let c = self.eval_expr(cond, env)?;
                match c.truth_value() {
                    Some(true) => self.eval_expr(t, env),
                    Some(false) => self.eval_expr(f, env),
                    None => {
                        // Condition is X/Z: merge both branches bitwise
                        // rather than picking one (spec §4.6).
                        let tv = self.eval_expr(t, env)?;
                        let fv = self.eval_expr(f, env)?;
                        match (tv.as_integer(), fv.as_integer()) {
                            (Some(a), Some(b)) if a.width() == b.width() => {
                                Ok(ConstantValue::Integer(SVInt::merge_unknown_cond(a, b)))
                            }
                            _ => Ok(ConstantValue::Integer(SVInt::all_x(1, false))),
                        }
                    }
                }
            }
            ConstExpr::Concat(parts) => {
                let mut ints = Vec::with_capacity(parts.len());
                for p in parts {
                    let v = self.eval_expr(p, env)?;
                    ints.push(v.as_integer().cloned().ok_or(EvalError::NotAnInteger)?);
                }
                Ok(ConstantValue::Integer(SVInt::concat(&ints)))
            }
            ConstExpr::Replicate(count, value) => {
                let c = self.eval_expr(count, env)?;
                let n = c
                    .as_integer()
                    .and_then(SVInt::to_u64)
                    .ok_or(EvalError::NotAnInteger)?;
                let v = self.eval_expr(value, env)?;
                let i = v.as_integer().ok_or(EvalError::NotAnInteger)?;
                Ok(ConstantValue::Integer(SVInt::replicate(i, n)))
            }
            ConstExpr::Index(base, index) => {
                let b = self.eval_expr(base, env)?;
                let idx = self.eval_expr(index, env)?;
                let i = idx
                    .as_integer()
                    .and_then(SVInt::to_u64)
                    .ok_or(EvalError::NotAnInteger)? as usize;
                match b {
                    ConstantValue::Array(items) => {
                        Ok(items.get(i).cloned().unwrap_or(ConstantValue::Error))
                    }
                    ConstantValue::Integer(v) => {
                        let mut bit = SVInt::zero(1, false);
                        let state = v.get_bit(i as u32);
                        bit = match state {
                            FourState::Zero => bit,
                            other => {
                                let lit = SVInt::unbased_unsized(other, 1, false);
                                lit
                            }
                        };
                        Ok(ConstantValue::Integer(bit))
                    }
                    _ => Ok(ConstantValue::Error),
                }
            }
            ConstExpr::Convert(inner, width, signed) => {
                if let ConstExpr::UnbasedUnsized(state) = inner.as_ref() {
                    return Ok(ConstantValue::Integer(SVInt::unbased_unsized(*state, *width, *signed)));
                }
                match self.eval_expr(inner, env)? {
                    ConstantValue::Integer(i) => {
                        Ok(ConstantValue::Integer(i.resize(*width).with_signed(*signed)))
                    }
                    ConstantValue::Real(r) => {
                        Ok(ConstantValue::Integer(SVInt::from_i64(r as i64, *width, *signed)))
                    }
                    other => Ok(other),
                }
            }
            ConstExpr::UnbasedUnsized(state) => {
                Ok(ConstantValue::Integer(SVInt::unbased_unsized(*state, 32, false)))
            }
            ConstExpr::SystemCall(name, _) | ConstExpr::Call(name, _) => {
                Err(EvalError::UnknownSystemCall(name.to_string()))
            }
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, v: ConstantValue) -> Result<ConstantValue, EvalError> {
        let i = v.as_integer().ok_or(EvalError::NotAnInteger)?;
        let result = match op {
            UnaryOp::Plus => i.clone(),
            UnaryOp::Minus => SVInt::neg(i),
            UnaryOp::BitNot => SVInt::bitnot(i),
            UnaryOp::LogicalNot => SVInt::logical_not(i),
            UnaryOp::ReduceAnd => reduce(i, |a, b| SVInt::bitand(&a, &b)),
            UnaryOp::ReduceOr => reduce(i, |a, b| SVInt::bitor(&a, &b)),
            UnaryOp::ReduceXor => reduce(i, |a, b| SVInt::bitxor(&a, &b)),
            UnaryOp::ReduceNand => SVInt::bitnot(&reduce(i, |a, b| SVInt::bitand(&a, &b))),
            UnaryOp::ReduceNor => SVInt::bitnot(&reduce(i, |a, b| SVInt::bitor(&a, &b))),
            UnaryOp::ReduceXnor => SVInt::bitnot(&reduce(i, |a, b| SVInt::bitxor(&a, &b))),
        };
        Ok(ConstantValue::Integer(result))
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: ConstantValue,
        rhs: ConstantValue,
    ) -> Result<ConstantValue, EvalError> {
        if let (ConstantValue::Real(a), ConstantValue::Real(b)) = (&lhs, &rhs) {
            return self.eval_real_binary(op, *a, *b);
        }
        let a = lhs.as_integer().ok_or(EvalError::NotAnInteger)?;
        let b = rhs.as_integer().ok_or(EvalError::NotAnInteger)?;
        if matches!(
            op,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Rem
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
        ) && a.width() != b.width()
        {
            return Err(EvalError::WidthMismatch(a.width(), b.width()));
        }
        let result = match op {
            BinaryOp::Add => SVInt::add(a, b),
            BinaryOp::Sub => SVInt::sub(a, b),
            BinaryOp::Mul => SVInt::mul(a, b),
            BinaryOp::Div => SVInt::div(a, b),
            BinaryOp::Rem => SVInt::rem(a, b),
            BinaryOp::BitAnd => SVInt::bitand(a, b),
            BinaryOp::BitOr => SVInt::bitor(a, b),
            BinaryOp::BitXor => SVInt::bitxor(a, b),
            BinaryOp::LogicalAnd => logical_combine(a, b, |x, y| x && y),
            BinaryOp::LogicalOr => logical_combine(a, b, |x, y| x || y),
            BinaryOp::Shl => SVInt::shl(a, b.to_u64().unwrap_or(u64::MAX)),
            BinaryOp::Lshr => SVInt::lshr(a, b.to_u64().unwrap_or(u64::MAX)),
            BinaryOp::Ashr => SVInt::ashr(a, b.to_u64().unwrap_or(u64::MAX)),
            BinaryOp::Eq => logical_eq(a, b),
            BinaryOp::Ne => SVInt::bitnot(&logical_eq(a, b)),
            BinaryOp::CaseEq => SVInt::case_eq(a, b),
            BinaryOp::CaseNe => SVInt::case_ne(a, b),
            BinaryOp::WildcardEq => SVInt::wildcard_eq(a, b),
            BinaryOp::WildcardNe => SVInt::wildcard_ne(a, b),
            BinaryOp::Lt => SVInt::lt(a, b),
            BinaryOp::Le => SVInt::le(a, b),
            BinaryOp::Gt => SVInt::gt(a, b),
            BinaryOp::Ge => SVInt::ge(a, b),
            BinaryOp::Pow => self.eval_pow(a, b)?,
        };
        Ok(ConstantValue::Integer(result))
    }

    /// `**` (spec table 11-2): a negative exponent collapses to `0`, except
    /// base `1` (always `1`) and base `-1` (`1` for an even exponent, `-1`
    /// otherwise); any unknown bit in either operand makes the whole result
    /// `X`. Bounded by the same step budget as everything else so a huge
    /// exponent fails with `StepBudgetExceeded` rather than looping forever.
    fn eval_pow(&mut self, a: &SVInt, b: &SVInt) -> Result<SVInt, EvalError> {
        let width = a.width();
        let signed = a.is_signed();
        if !a.is_two_state() || !b.is_two_state() {
            return Ok(SVInt::all_x(width, signed));
        }
        let exp = b.to_i64().unwrap_or(0);
        if exp < 0 {
            return Ok(match a.to_i64() {
                Some(1) => SVInt::from_i64(1, width, signed),
                Some(-1) => SVInt::from_i64(if exp % 2 == 0 { 1 } else { -1 }, width, signed),
                _ => SVInt::from_i64(0, width, signed),
            });
        }
        let mut result = SVInt::from_i64(1, width, signed);
        for _ in 0..exp {
            self.tick()?;
            result = SVInt::mul(&result, a);
        }
        Ok(result)
    }

    fn eval_real_binary(&mut self, op: BinaryOp, a: f64, b: f64) -> Result<ConstantValue, EvalError> {
        let result = match op {
            BinaryOp::Add => ConstantValue::Real(a + b),
            BinaryOp::Sub => ConstantValue::Real(a - b),
            BinaryOp::Mul => ConstantValue::Real(a * b),
            BinaryOp::Div => ConstantValue::Real(a / b),
            BinaryOp::Lt => bool_bit(a < b),
            BinaryOp::Le => bool_bit(a <= b),
            BinaryOp::Gt => bool_bit(a > b),
            BinaryOp::Ge => bool_bit(a >= b),
            BinaryOp::Eq | BinaryOp::CaseEq => bool_bit(a == b),
            BinaryOp::Ne | BinaryOp::CaseNe => bool_bit(a != b),
            BinaryOp::Pow => ConstantValue::Real(a.powf(b)),
            _ => return Err(EvalError::NotAnInteger),
        };
        Ok(result)
    }

    /// Runs a constant-function body to completion using an explicit frame
    /// stack instead of recursive calls, so loop/block nesting depth is
    /// bounded only by the step budget, not the native call stack.
    pub fn eval_function(
        &mut self,
        body: &[ConstStmt],
        mut env: Environment,
    ) -> Result<ConstantValue, EvalError> {
        let mut stack: Vec<Frame<'_>> = vec![Frame::Block {
            stmts: body,
            index: 0,
        }];
        loop {
            self.tick()?;
            let Some(top) = stack.last_mut() else {
                return Err(EvalError::NoReturn);
            };
            match top {
                Frame::Block { stmts, index } => {
                    if *index >= stmts.len() {
                        stack.pop();
                        if stack.is_empty() {
                            return Err(EvalError::NoReturn);
                        }
                        continue;
                    }
                    let stmt = &stmts[*index];
                    *index += 1;
                    match stmt {
                        ConstStmt::Assign(name, expr) => {
                            let v = self.eval_expr(expr, &env)?;
                            env.bind(name.clone(), v);
                        }
                        ConstStmt::Block(inner) => stack.push(Frame::Block {
                            stmts: inner,
                            index: 0,
                        }),
                        ConstStmt::If {
                            cond,
                            then_branch,
                            else_branch,
                        } => {
                            let c = self.eval_expr(cond, &env)?;
                            let taken = match c.truth_value() {
                                Some(true) | None => then_branch,
                                Some(false) => else_branch,
                            };
                            stack.push(Frame::Block {
                                stmts: taken,
                                index: 0,
                            });
                        }
                        ConstStmt::While { cond, body } => {
                            stack.push(Frame::Loop {
                                cond,
                                body,
                                post: &[],
                                phase: LoopPhase::CheckCond,
                            });
                        }
                        ConstStmt::For {
                            init,
                            cond,
                            step,
                            body,
                        } => {
                            stack.push(Frame::Block {
                                stmts: init,
                                index: 0,
                            });
                            stack.push(Frame::Loop {
                                cond,
                                body,
                                post: step,
                                phase: LoopPhase::CheckCond,
                            });
                        }
                        ConstStmt::Return(expr) => {
                            return self.eval_expr(expr, &env);
                        }
                    }
                }
                Frame::Loop {
                    cond,
                    body,
                    post,
                    phase,
                } => match phase {
                    LoopPhase::CheckCond => {
                        let c = self.eval_expr(cond, &env)?;
                        if matches!(c.truth_value(), Some(true)) {
                            *phase = LoopPhase::RunBody;
                            let body_slice: &[ConstStmt] = body;
                            stack.push(Frame::Block {
                                stmts: body_slice,
                                index: 0,
                            });
                        } else {
                            stack.pop();
                        }
                    }
                    LoopPhase::RunBody => {
                        *phase = LoopPhase::RunPost;
                        if !post.is_empty() {
                            let post_slice: &[ConstStmt] = post;
                            stack.push(Frame::Block {
                                stmts: post_slice,
                                index: 0,
                            });
                        }
                    }
                    LoopPhase::RunPost => {
                        *phase = LoopPhase::CheckCond;
                    }
                },
            }
        }
    }
}

impl Default for ConstantEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopPhase {
    CheckCond,
    RunBody,
    RunPost,
}

enum Frame<'a> {
    Block {
        stmts: &'a [ConstStmt],
        index: usize,
    },
    Loop {
        cond: &'a ConstExpr,
        body: &'a [ConstStmt],
        post: &'a [ConstStmt],
        phase: LoopPhase,
    },
}

fn reduce(i: &SVInt, op: impl Fn(SVInt, SVInt) -> SVInt) -> SVInt {
    let mut acc = SVInt::zero(1, false);
    for b in 0..i.width() {
        let mut bit = SVInt::zero(1, false);
        match i.get_bit(b) {
            FourState::One => {
                bit = SVInt::from_u64(1, 1, false);
            }
            FourState::Zero => {}
            other => bit = SVInt::unbased_unsized(other, 1, false),
        }
        acc = if b == 0 { bit } else { op(acc, bit) };
    }
    acc
}

/// Logical (`==`) equality: known-bit comparison only when both operands are
/// fully two-state; an X/Z anywhere in either operand makes the result
/// unknown rather than comparing literally (spec §4.6), unlike `===`.
fn logical_eq(a: &SVInt, b: &SVInt) -> SVInt {
    if a.is_two_state() && b.is_two_state() {
        SVInt::case_eq(a, b)
    } else {
        SVInt::all_x(1, false)
    }
}

fn logical_combine(a: &SVInt, b: &SVInt, f: impl Fn(bool, bool) -> bool) -> SVInt {
    match (a.is_nonzero_known(), b.is_nonzero_known()) {
        _ if a.is_two_state() && b.is_two_state() => {
            let r = f(a.is_nonzero_known(), b.is_nonzero_known());
            SVInt::from_u64(r as u64, 1, false)
        }
        _ => SVInt::all_x(1, false),
    }
}

fn bool_bit(b: bool) -> ConstantValue {
    ConstantValue::Integer(SVInt::from_u64(b as u64, 1, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: u64, w: u32) -> ConstExpr {
        ConstExpr::IntLiteral(SVInt::from_u64(v, w, false))
    }

    #[test]
    fn folds_simple_arithmetic() {
        let mut eval = ConstantEvaluator::new();
        let expr = ConstExpr::Binary(BinaryOp::Add, Box::new(lit(4, 32)), Box::new(lit(9, 32)));
        let result = eval.eval_expr(&expr, &Environment::new()).unwrap();
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(13));
    }

    #[test]
    fn constant_function_loop_runs_on_explicit_frames() {
        let mut eval = ConstantEvaluator::new();
        let mut env = Environment::new();
        env.bind(Name::new("acc"), ConstantValue::Integer(SVInt::from_u64(0, 32, false)));
        env.bind(Name::new("i"), ConstantValue::Integer(SVInt::from_u64(0, 32, false)));
        let body = vec![ConstStmt::For {
            init: vec![],
            cond: ConstExpr::Binary(
                BinaryOp::Lt,
                Box::new(ConstExpr::Identifier(Name::new("i"))),
                Box::new(lit(5, 32)),
            ),
            step: vec![ConstStmt::Assign(
                Name::new("i"),
                ConstExpr::Binary(
                    BinaryOp::Add,
                    Box::new(ConstExpr::Identifier(Name::new("i"))),
                    Box::new(lit(1, 32)),
                ),
            )],
            body: vec![ConstStmt::Assign(
                Name::new("acc"),
                ConstExpr::Binary(
                    BinaryOp::Add,
                    Box::new(ConstExpr::Identifier(Name::new("acc"))),
                    Box::new(lit(1, 32)),
                ),
            )],
        }, ConstStmt::Return(ConstExpr::Identifier(Name::new("acc")))];
        let result = eval.eval_function(&body, env).unwrap();
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(5));
    }

    #[test]
    fn exponentiation_folds_to_repeated_multiplication() {
        let mut eval = ConstantEvaluator::new();
        let expr = ConstExpr::Binary(BinaryOp::Pow, Box::new(lit(2, 32)), Box::new(lit(10, 32)));
        let result = eval.eval_expr(&expr, &Environment::new()).unwrap();
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(1024));
    }

    #[test]
    fn unbound_identifier_errors() {
        let mut eval = ConstantEvaluator::new();
        let err = eval
            .eval_expr(&ConstExpr::Identifier(Name::new("missing")), &Environment::new())
            .unwrap_err();
        assert!(matches!(err, EvalError::UnboundIdentifier(_)));
    }
}
