//! The four type relations spec §3.4 requires, each built on the previous
//! one in weakening order — `is_cast_compatible` is the most permissive and
//! the only one a `static_cast`-style construct needs; ordinary assignment
//! checks stop at `is_assignment_compatible`.

use super::{Field, Type, TypeId, TypeTable};

/// Structural identity (the language standard's §6.22.1 "matching types").
/// Integral types compare by interned `TypeId` first (the common case) and
/// fall back to comparing shape for the few callers handed two tables'
/// worth of ids; compound types recurse structurally.
pub fn is_matching(table: &TypeTable, a: TypeId, b: TypeId) -> bool {
    let a = table.resolve_alias(a);
    let b = table.resolve_alias(b);
    if a == b {
        return true;
    }
    match (table.get(a), table.get(b)) {
        (Type::Integral(x), Type::Integral(y)) => x == y,
        (Type::Floating(x), Type::Floating(y)) => real_kind_matches(*x, *y),
        (Type::PackedArray { element: e1, left: l1, right: r1 }, Type::PackedArray { element: e2, left: l2, right: r2 }) => {
            l1 == l2 && r1 == r2 && is_matching(table, *e1, *e2)
        }
        (
            Type::FixedUnpackedArray { element: e1, left: l1, right: r1 },
            Type::FixedUnpackedArray { element: e2, left: l2, right: r2 },
        ) => l1 == l2 && r1 == r2 && is_matching(table, *e1, *e2),
        (Type::DynamicArray { element: e1 }, Type::DynamicArray { element: e2 }) => is_matching(table, *e1, *e2),
        (Type::Queue { element: e1, max_bound: m1 }, Type::Queue { element: e2, max_bound: m2 }) => {
            m1 == m2 && is_matching(table, *e1, *e2)
        }
        (
            Type::AssociativeArray { element: e1, index: i1 },
            Type::AssociativeArray { element: e2, index: i2 },
        ) => is_matching(table, *e1, *e2) && optional_types_match(table, *i1, *i2),
        (Type::PackedStruct { fields: f1 }, Type::PackedStruct { fields: f2 })
        | (Type::UnpackedStruct { fields: f1 }, Type::UnpackedStruct { fields: f2 }) => fields_match(table, f1, f2),
        (Type::PackedUnion { fields: f1, tagged: t1 }, Type::PackedUnion { fields: f2, tagged: t2 })
        | (Type::UnpackedUnion { fields: f1, tagged: t1 }, Type::UnpackedUnion { fields: f2, tagged: t2 }) => {
            t1 == t2 && fields_match(table, f1, f2)
        }
        (Type::Enum { base: b1, variants: v1 }, Type::Enum { base: b2, variants: v2 }) => {
            is_matching(table, *b1, *b2) && v1 == v2
        }
        (Type::VirtualInterface { iface: i1, modport: m1 }, Type::VirtualInterface { iface: i2, modport: m2 }) => {
            i1 == i2 && m1 == m2
        }
        // Scalar singletons and `Class` (reference/nominal identity) only
        // match by the `a == b` pointer check above.
        _ => false,
    }
}

fn real_kind_matches(a: super::RealKind, b: super::RealKind) -> bool {
    use super::RealKind::*;
    matches!(
        (a, b),
        (ShortReal, ShortReal) | (Real, Real) | (RealTime, RealTime) | (Real, RealTime) | (RealTime, Real)
    )
}

fn optional_types_match(table: &TypeTable, a: Option<TypeId>, b: Option<TypeId>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => is_matching(table, a, b),
        (None, None) => true,
        _ => false,
    }
}

fn fields_match(table: &TypeTable, a: &[Field], b: &[Field]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name && is_matching(table, x.ty, y.ty))
}

/// `matching OR (integral with same signedness/four-stateness/width) OR
/// (fixed unpacked arrays with equivalent elements and same range width) OR
/// (dynamic/associative/queue with equivalent element and, for
/// associative, equivalent index)` (spec §3.4).
pub fn is_equivalent(table: &TypeTable, a: TypeId, b: TypeId) -> bool {
    if is_matching(table, a, b) {
        return true;
    }
    let a_id = table.resolve_alias(a);
    let b_id = table.resolve_alias(b);
    match (table.get(a_id), table.get(b_id)) {
        (Type::Integral(x), Type::Integral(y)) => x == y,
        (
            Type::FixedUnpackedArray { element: e1, left: l1, right: r1 },
            Type::FixedUnpackedArray { element: e2, left: l2, right: r2 },
        ) => range_width(*l1, *r1) == range_width(*l2, *r2) && is_equivalent(table, *e1, *e2),
        (Type::DynamicArray { element: e1 }, Type::DynamicArray { element: e2 }) => is_equivalent(table, *e1, *e2),
        (Type::Queue { element: e1, .. }, Type::Queue { element: e2, .. }) => is_equivalent(table, *e1, *e2),
        (
            Type::AssociativeArray { element: e1, index: i1 },
            Type::AssociativeArray { element: e2, index: i2 },
        ) => is_equivalent(table, *e1, *e2) && equivalent_optional(table, *i1, *i2),
        _ => false,
    }
}

fn equivalent_optional(table: &TypeTable, a: Option<TypeId>, b: Option<TypeId>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => is_equivalent(table, a, b),
        (None, None) => true,
        _ => false,
    }
}

fn range_width(left: i64, right: i64) -> i64 {
    (left - right).abs() + 1
}

fn is_numeric(table: &TypeTable, id: TypeId) -> bool {
    matches!(table.get(table.resolve_alias(id)), Type::Integral(_) | Type::Floating(_))
}

/// `equivalent OR integral<->integral/floating, OR unpacked-array element
/// equivalence with size-rule slack, OR class up-cast, OR interface-class
/// implementation, OR null to chandle/event/class/virtual-interface` (spec
/// §3.4).
pub fn is_assignment_compatible(table: &TypeTable, target: TypeId, source: TypeId) -> bool {
    if is_equivalent(table, target, source) {
        return true;
    }
    if is_numeric(table, target) && is_numeric(table, source) {
        return true;
    }
    let t_id = table.resolve_alias(target);
    let s_id = table.resolve_alias(source);
    match (table.get(t_id), table.get(s_id)) {
        (Type::FixedUnpackedArray { element: e1, .. }, Type::FixedUnpackedArray { element: e2, .. })
        | (Type::FixedUnpackedArray { element: e1, .. }, Type::DynamicArray { element: e2 })
        | (Type::DynamicArray { element: e1 }, Type::FixedUnpackedArray { element: e2, .. })
        | (Type::Queue { element: e1, .. }, Type::FixedUnpackedArray { element: e2, .. })
        | (Type::FixedUnpackedArray { element: e1, .. }, Type::Queue { element: e2, .. }) => {
            is_equivalent(table, *e1, *e2)
        }
        (Type::Class(_), Type::Class(_)) => is_base_class_of(table, t_id, s_id) || implements(table, s_id, t_id),
        (Type::CHandle | Type::Event | Type::Class(_) | Type::VirtualInterface { .. }, Type::Null) => true,
        _ => false,
    }
}

/// Walks `source`'s `base` chain looking for `target` (an up-cast:
/// assigning a derived-class handle to a base-class handle is always legal).
fn is_base_class_of(table: &TypeTable, target: TypeId, source: TypeId) -> bool {
    let mut current = Some(source);
    while let Some(id) = current {
        if id == target {
            return true;
        }
        current = match table.get(id) {
            Type::Class(c) => c.base,
            _ => None,
        };
    }
    false
}

fn implements(table: &TypeTable, class: TypeId, iface: TypeId) -> bool {
    match table.get(class) {
        Type::Class(c) => c.implements.iter().any(|&i| i == iface || implements(table, i, iface)),
        _ => false,
    }
}

/// `assignment-compatible, OR enum<->integral/floating, OR
/// string<->integral` (spec §3.4).
pub fn is_cast_compatible(table: &TypeTable, target: TypeId, source: TypeId) -> bool {
    if is_assignment_compatible(table, target, source) {
        return true;
    }
    let t_id = table.resolve_alias(target);
    let s_id = table.resolve_alias(source);
    let t = table.get(t_id);
    let s = table.get(s_id);
    let enum_numeric = matches!(t, Type::Enum { .. }) && is_numeric(table, s_id)
        || matches!(s, Type::Enum { .. }) && is_numeric(table, t_id);
    let string_integral = matches!(t, Type::String) && matches!(s, Type::Integral(_))
        || matches!(s, Type::String) && matches!(t, Type::Integral(_));
    enum_numeric || string_integral
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntegralType, BIT, BYTE, INT, LOGIC};

    #[test]
    fn matching_is_reflexive_for_interned_integrals() {
        let mut table = TypeTable::new();
        let int_ty = table.intern_integral(INT);
        assert!(is_matching(&table, int_ty, int_ty));
    }

    #[test]
    fn bit_and_int_do_not_match_or_equal() {
        let mut table = TypeTable::new();
        let bit_ty = table.intern_integral(BIT);
        let int_ty = table.intern_integral(INT);
        assert!(!is_matching(&table, bit_ty, int_ty));
        assert!(!is_equivalent(&table, bit_ty, int_ty));
    }

    #[test]
    fn differing_width_integrals_are_assignment_compatible_but_not_equivalent() {
        let mut table = TypeTable::new();
        let byte_ty = table.intern_integral(BYTE);
        let int_ty = table.intern_integral(INT);
        assert!(!is_equivalent(&table, byte_ty, int_ty));
        assert!(is_assignment_compatible(&table, byte_ty, int_ty));
    }

    #[test]
    fn same_shape_different_keyword_is_equivalent() {
        let mut table = TypeTable::new();
        let logic_ty = table.intern_integral(LOGIC);
        let reg_ty = table.intern_integral(IntegralType::new(1, false, true));
        assert!(is_matching(&table, logic_ty, reg_ty));
    }

    #[test]
    fn enum_casts_to_its_base_integral() {
        let mut table = TypeTable::new();
        let int_ty = table.intern_integral(INT);
        let enum_ty = table.alloc(Type::Enum {
            base: int_ty,
            variants: vec![("RED".into(), 0), ("GREEN".into(), 1)],
        });
        assert!(!is_assignment_compatible(&table, int_ty, enum_ty));
        assert!(is_cast_compatible(&table, int_ty, enum_ty));
    }

    #[test]
    fn null_is_assignment_compatible_with_chandle() {
        let mut table = TypeTable::new();
        assert!(is_assignment_compatible(&table, table.chandle(), table.null()));
    }

    #[test]
    fn string_casts_to_and_from_integral() {
        let mut table = TypeTable::new();
        let byte_ty = table.intern_integral(BYTE);
        assert!(is_cast_compatible(&table, table.string(), byte_ty));
        assert!(is_cast_compatible(&table, byte_ty, table.string()));
    }
}
