//! Serializable AST/symbol-table output (spec §6.4), behind the
//! `serialize` feature. Produces a `serde_json::Value` tree rather than a
//! `Serialize` impl directly on `Compilation`/`Symbol` — neither owns a
//! borrow-free snapshot of its own state (a `Symbol`'s child scope lives
//! in the same arena as every other scope), so walking it by hand here,
//! the way the teacher's `interchange::xmi` module walks a `Model` by
//! hand rather than deriving `Serialize` on it, is the natural fit.

use crate::eval::value::ConstantValue;
use crate::eval::svint::SVInt;
use crate::symbols::{ScopeId, Symbol, SymbolId, SymbolKind, SymbolTable};
use crate::compilation::Compilation;
use serde_json::{json, Value};

fn kind_name(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Module => "module",
        SymbolKind::Interface => "interface",
        SymbolKind::Program => "program",
        SymbolKind::Package => "package",
        SymbolKind::Class => "class",
        SymbolKind::Checker => "checker",
        SymbolKind::Function => "function",
        SymbolKind::Task => "task",
        SymbolKind::Parameter => "parameter",
        SymbolKind::LocalParameter => "localparam",
        SymbolKind::Variable => "variable",
        SymbolKind::Net => "net",
        SymbolKind::Typedef => "typedef",
        SymbolKind::Instance => "instance",
        SymbolKind::FormalArgument => "formal_argument",
        SymbolKind::EnumValue => "enum_value",
        SymbolKind::Field => "field",
        SymbolKind::GenerateBlock => "generate_block",
        SymbolKind::Modport => "modport",
    }
}

/// An integer constant as `{width, signed, four_state, bits}` (spec
/// §6.4): `bits` is the canonical MSB-first `0`/`1`/`x`/`z` string so the
/// value round-trips exactly even when it's not two-state.
fn serialize_svint(i: &SVInt) -> Value {
    let canonical = i.to_canonical_string();
    let bits = canonical.rsplit('b').next().unwrap_or_default();
    json!({
        "width": i.width(),
        "signed": i.is_signed(),
        "four_state": !i.is_two_state(),
        "bits": bits,
    })
}

pub fn serialize_value(value: &ConstantValue) -> Value {
    match value {
        ConstantValue::Integer(i) => json!({ "kind": "integer", "value": serialize_svint(i) }),
        ConstantValue::Real(r) => json!({ "kind": "real", "value": r }),
        ConstantValue::ShortReal(r) => json!({ "kind": "shortreal", "value": r }),
        ConstantValue::Str(s) => json!({ "kind": "string", "value": s.as_ref() }),
        ConstantValue::Null => json!({ "kind": "null" }),
        ConstantValue::Unbounded => json!({ "kind": "unbounded" }),
        ConstantValue::Array(elems) => {
            json!({ "kind": "array", "elements": elems.iter().map(serialize_value).collect::<Vec<_>>() })
        }
        ConstantValue::Associative(entries) => {
            let entries: Vec<Value> = entries
                .iter()
                .map(|(k, v)| json!({ "key": serialize_value(k), "value": serialize_value(v) }))
                .collect();
            json!({ "kind": "associative", "entries": entries })
        }
        ConstantValue::Struct(fields) => {
            let fields: Vec<Value> = fields
                .iter()
                .map(|(name, v)| json!({ "name": name.as_str(), "value": serialize_value(v) }))
                .collect();
            json!({ "kind": "struct", "fields": fields })
        }
        ConstantValue::Error => json!({ "kind": "error" }),
    }
}

fn serialize_symbol(symbols: &SymbolTable, compilation: &Compilation, symbol: &Symbol, id: SymbolId) -> Value {
    let mut obj = json!({
        "kind": kind_name(symbol.kind),
        "name": symbol.name.as_str(),
        "index": symbol.index,
    });
    if let Some(value) = compilation.value_of(id) {
        obj["value"] = serialize_value(value);
    }
    if let Some(scope) = symbol.scope {
        obj["members"] = serialize_scope(symbols, compilation, scope);
    }
    obj
}

fn serialize_scope(symbols: &SymbolTable, compilation: &Compilation, scope: ScopeId) -> Value {
    let members: Vec<Value> = symbols
        .get_scope(scope)
        .members()
        .iter()
        .map(|&id| serialize_symbol(symbols, compilation, symbols.get(id), id))
        .collect();
    Value::Array(members)
}

/// The full `$unit` scope of `compilation`, every declaration it has seen
/// so far with its elaborated value (if any) and recursively its own
/// child scope (spec §6.4).
pub fn serialize_compilation(compilation: &Compilation) -> Value {
    let members = serialize_scope(compilation.symbols(), compilation, compilation.root_scope());
    json!({ "unit": members })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilation::CompilationOptions;

    #[test]
    fn serializes_a_parameter_with_its_folded_value() {
        let mut c = Compilation::new(CompilationOptions::new());
        c.eval_text("parameter int P = 4 + 9;");
        let json = serialize_compilation(&c);
        let members = json["unit"].as_array().unwrap();
        let p = members.iter().find(|m| m["name"] == "P").unwrap();
        assert_eq!(p["kind"], "parameter");
        let svint = &p["value"]["value"];
        assert_eq!(svint["width"], 32);
        assert_eq!(svint["signed"], true);
        assert_eq!(svint["four_state"], false);
        assert_eq!(svint["bits"].as_str().unwrap().len(), 32);
        assert!(svint["bits"].as_str().unwrap().ends_with("1101"));
    }
}
