//! `ConstantValue`: the closed sum of values a constant expression can
//! evaluate to (spec §4.6).

use crate::base::Name;
use crate::eval::svint::SVInt;
use std::sync::Arc;

/// A single evaluated constant. Aggregates hold their elements by `Arc` so
/// that copying a `ConstantValue` (as happens constantly while threading
/// values through the interpreter's per-frame state machine, spec §9) never
/// deep-clones array/struct contents.
#[derive(Debug, Clone)]
pub enum ConstantValue {
    Integer(SVInt),
    Real(f64),
    ShortReal(f32),
    Str(Arc<str>),
    /// The `null` class-handle / chandle / event value.
    Null,
    /// The result of evaluating `$` in a context that doesn't resolve it to
    /// a concrete bound yet (spec §4.6 "unbounded queue/array size").
    Unbounded,
    /// Fixed-size unpacked array, dynamic array, or queue element storage.
    Array(Arc<Vec<ConstantValue>>),
    /// Associative array; kept as a sorted `Vec` of entries rather than a
    /// hash map so two associative-array constants compare and print
    /// deterministically.
    Associative(Arc<Vec<(ConstantValue, ConstantValue)>>),
    /// A `struct`/`union` member snapshot, member order matching
    /// declaration order.
    Struct(Arc<Vec<(Name, ConstantValue)>>),
    /// Evaluation could not produce a value (diagnostic already recorded by
    /// the caller); distinct from `Integer` all-X because it's untyped.
    Error,
}

impl ConstantValue {
    pub fn is_error(&self) -> bool {
        matches!(self, ConstantValue::Error)
    }

    pub fn as_integer(&self) -> Option<&SVInt> {
        match self {
            ConstantValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// The truthiness SystemVerilog applies to `if`/`?:`/`&&` conditions:
    /// any nonzero known integer is true, any unknown-containing integer is
    /// indeterminate (`None`), reals compare against `0.0`.
    pub fn truth_value(&self) -> Option<bool> {
        match self {
            ConstantValue::Integer(i) => {
                if !i.is_two_state() {
                    None
                } else {
                    Some(i.is_nonzero_known())
                }
            }
            ConstantValue::Real(r) => Some(*r != 0.0),
            ConstantValue::ShortReal(r) => Some(*r != 0.0),
            ConstantValue::Null => Some(false),
            _ => None,
        }
    }
}

impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        use ConstantValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => SVInt::exact_equal(a, b),
            (Real(a), Real(b)) => a.to_bits() == b.to_bits(),
            (ShortReal(a), ShortReal(b)) => a.to_bits() == b.to_bits(),
            (Str(a), Str(b)) => a == b,
            (Null, Null) | (Unbounded, Unbounded) | (Error, Error) => true,
            (Array(a), Array(b)) => a == b,
            (Associative(a), Associative(b)) => a == b,
            (Struct(a), Struct(b)) => a == b,
            _ => false,
        }
    }
}
