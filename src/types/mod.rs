//! The type system (spec §3.4): a closed sum of type shapes, one arena per
//! `Compilation`, and the four progressively weaker type relations the
//! standard defines (§6.22.1).
//!
//! Mirrors the teacher's `hir_ty` layering: a `TypeTable` arena (like the
//! teacher's interned `Ty` table) holding every `Type` a `Compilation` ever
//! constructs, with primitive integral shapes interned so most `is_matching`
//! checks reduce to comparing two `TypeId`s.

pub mod relations;

use crate::base::{Arena, Idx, Name};
use rustc_hash::FxHashMap;

pub use relations::{is_assignment_compatible, is_cast_compatible, is_equivalent, is_matching};

/// An index into a [`TypeTable`]'s arena — cheap to copy and compare.
pub type TypeId = Idx<Type>;

/// The named integral keywords spec §3.4 lists, kept only for display and
/// for picking a canonical name back out of a `(width, signed, four_state)`
/// shape; identity and the type relations never look at this field; `reg`
/// and `logic` are literal aliases of the same shape and must compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegralKeyword {
    Bit,
    Logic,
    Reg,
    Byte,
    ShortInt,
    Int,
    LongInt,
    Integer,
    Time,
}

/// `{bit_width, is_signed, is_four_state}` (spec §3.4) — the entire identity
/// of an integral type. Two `IntegralType`s with equal fields are the same
/// type no matter which keyword produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegralType {
    pub width: u32,
    pub signed: bool,
    pub four_state: bool,
}

impl IntegralType {
    pub const fn new(width: u32, signed: bool, four_state: bool) -> Self {
        Self { width, signed, four_state }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealKind {
    ShortReal,
    Real,
    /// `realtime` — a synonym of `Real` (spec §3.4); kept distinct only so a
    /// pretty-printer can reproduce the keyword the user wrote.
    RealTime,
}

/// One field of a packed/unpacked struct or union.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: Name,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub base: Option<TypeId>,
    pub implements: Vec<TypeId>,
    pub members: Vec<Field>,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_interface: bool,
}

/// The closed type sum spec §3.4 describes. `TypeAlias` is a lazy pointer —
/// callers walk through it with [`TypeTable::resolve_alias`] rather than
/// matching on it directly, the same way the teacher's `Ty::Alias` variant
/// is never matched on outside its own resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Integral(IntegralType),
    PackedArray {
        element: TypeId,
        left: i64,
        right: i64,
    },
    FixedUnpackedArray {
        element: TypeId,
        left: i64,
        right: i64,
    },
    DynamicArray {
        element: TypeId,
    },
    Queue {
        element: TypeId,
        max_bound: Option<u32>,
    },
    AssociativeArray {
        element: TypeId,
        index: Option<TypeId>,
    },
    PackedStruct {
        fields: Vec<Field>,
    },
    PackedUnion {
        fields: Vec<Field>,
        tagged: bool,
    },
    UnpackedStruct {
        fields: Vec<Field>,
    },
    UnpackedUnion {
        fields: Vec<Field>,
        tagged: bool,
    },
    Enum {
        base: TypeId,
        variants: Vec<(Name, i128)>,
    },
    Floating(RealKind),
    Void,
    Null,
    CHandle,
    String,
    Event,
    Unbounded,
    TypeRef,
    Untyped,
    Sequence,
    Property,
    Error,
    Class(ClassType),
    VirtualInterface {
        iface: Name,
        modport: Option<Name>,
    },
    TypeAlias {
        target: TypeId,
    },
}

/// Per-`Compilation` owner of every `Type` (spec §9 arena allocation).
/// Primitive integral shapes are interned: requesting the same
/// `(width, signed, four_state)` twice returns the same `TypeId`.
#[derive(Debug)]
pub struct TypeTable {
    arena: Arena<Type>,
    integral_cache: FxHashMap<IntegralType, TypeId>,
    void: TypeId,
    error: TypeId,
    string: TypeId,
    chandle: TypeId,
    event: TypeId,
    null: TypeId,
}

/// Builtin `int`/`logic`/etc. shapes spec §3.4 names, seeded once so a
/// binder never has to hand-roll an `IntegralType` for a keyword it sees.
pub const BIT: IntegralType = IntegralType::new(1, false, false);
pub const LOGIC: IntegralType = IntegralType::new(1, false, true);
pub const REG: IntegralType = LOGIC;
pub const BYTE: IntegralType = IntegralType::new(8, true, false);
pub const SHORTINT: IntegralType = IntegralType::new(16, true, false);
pub const INT: IntegralType = IntegralType::new(32, true, false);
pub const LONGINT: IntegralType = IntegralType::new(64, true, false);
pub const INTEGER: IntegralType = IntegralType::new(32, true, true);
pub const TIME: IntegralType = IntegralType::new(64, false, true);

impl Default for TypeTable {
    fn default() -> Self {
        let mut arena = Arena::new();
        let void = arena.alloc(Type::Void);
        let error = arena.alloc(Type::Error);
        let string = arena.alloc(Type::String);
        let chandle = arena.alloc(Type::CHandle);
        let event = arena.alloc(Type::Event);
        let null = arena.alloc(Type::Null);
        Self {
            arena,
            integral_cache: FxHashMap::default(),
            void,
            error,
            string,
            chandle,
            event,
            null,
        }
    }
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn void(&self) -> TypeId {
        self.void
    }
    pub fn error(&self) -> TypeId {
        self.error
    }
    pub fn string(&self) -> TypeId {
        self.string
    }
    pub fn chandle(&self) -> TypeId {
        self.chandle
    }
    pub fn event(&self) -> TypeId {
        self.event
    }
    pub fn null(&self) -> TypeId {
        self.null
    }

    pub fn get(&self, id: TypeId) -> &Type {
        self.arena.get(id)
    }

    /// Allocate a non-integral type. Never interned — compound types are
    /// compared structurally by [`relations::is_matching`], not by pointer
    /// equality, so there is no benefit to deduplicating them here.
    pub fn alloc(&mut self, ty: Type) -> TypeId {
        self.arena.alloc(ty)
    }

    /// Intern an integral shape (spec §3.4: "primitive integral types of
    /// each canonical shape are interned once per Compilation").
    pub fn intern_integral(&mut self, integral: IntegralType) -> TypeId {
        if let Some(&id) = self.integral_cache.get(&integral) {
            return id;
        }
        let id = self.arena.alloc(Type::Integral(integral));
        self.integral_cache.insert(integral, id);
        id
    }

    /// Follow `TypeAlias` chains to the first non-alias type. Does not
    /// guard against cycles beyond a fixed depth, matching the "cyclic type
    /// references" handling spec §9 describes for class references — a
    /// `TypeAlias` cycle is a binder-level error caught before it reaches
    /// here in practice.
    pub fn resolve_alias(&self, mut id: TypeId) -> TypeId {
        for _ in 0..256 {
            match self.get(id) {
                Type::TypeAlias { target } => id = *target,
                _ => return id,
            }
        }
        id
    }

    /// The integral shape underlying `id`, if any — unwraps `TypeAlias` and
    /// `Enum` (whose values are always representable in their base type).
    pub fn underlying_integral(&self, id: TypeId) -> Option<IntegralType> {
        match self.get(self.resolve_alias(id)) {
            Type::Integral(i) => Some(*i),
            Type::Enum { base, .. } => self.underlying_integral(*base),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_shape_twice_dedups() {
        let mut table = TypeTable::new();
        let a = table.intern_integral(INT);
        let b = table.intern_integral(INT);
        assert_eq!(a, b);
    }

    #[test]
    fn reg_and_logic_intern_to_the_same_type() {
        let mut table = TypeTable::new();
        let reg = table.intern_integral(REG);
        let logic = table.intern_integral(LOGIC);
        assert_eq!(reg, logic);
    }

    #[test]
    fn distinct_shapes_do_not_share_ids() {
        let mut table = TypeTable::new();
        let int_ty = table.intern_integral(INT);
        let bit_ty = table.intern_integral(BIT);
        assert_ne!(int_ty, bit_ty);
    }

    #[test]
    fn resolve_alias_follows_chain() {
        let mut table = TypeTable::new();
        let int_ty = table.intern_integral(INT);
        let alias1 = table.alloc(Type::TypeAlias { target: int_ty });
        let alias2 = table.alloc(Type::TypeAlias { target: alias1 });
        assert_eq!(table.resolve_alias(alias2), int_ty);
    }
}
