//! End-to-end `ScriptSession` scenarios and boundary behaviors.

use slang_front::compilation::Compilation;
use slang_front::script::ScriptSession;
use slang_front::SourceManager;

fn signed_value(session: &mut ScriptSession, text: &str) -> i64 {
    let result = session.eval(text);
    result.as_integer().expect("expected an integer result").to_i64().expect("expected a known two-state value")
}

fn canonical(session: &mut ScriptSession, text: &str) -> String {
    let result = session.eval(text);
    result.as_integer().expect("expected an integer result").to_canonical_string()
}

#[test]
fn scenario_1_variable_persists_across_eval_calls() {
    let mut session = ScriptSession::new();
    session.eval("int i = 4;");
    let result = session.eval("i + 9");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 32);
    assert!(v.is_signed());
    assert_eq!(v.to_i64(), Some(13));
}

#[test]
fn scenario_2_constant_function_call() {
    let mut session = ScriptSession::new();
    session.eval("function logic [15:0] foo(int a, int b); return a + b; endfunction");
    let result = session.eval("foo(3, 4)");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 16);
    assert!(!v.is_signed());
    assert_eq!(v.to_u64(), Some(7));
}

#[test]
fn scenario_3_concatenation() {
    let mut session = ScriptSession::new();
    let result = session.eval("{2'b11, 3'b101}");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 5);
    assert!(v.is_two_state());
    assert_eq!(v.to_u64(), Some(0b11101));
}

#[test]
fn scenario_4_replication() {
    let mut session = ScriptSession::new();
    let result = session.eval("{4 {2'b10}}");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 8);
    assert_eq!(v.to_u64(), Some(0b10101010));
}

#[test]
fn scenario_5_arithmetic_shift_right_preserves_sign() {
    let mut session = ScriptSession::new();
    let result = session.eval("-65'sd4 >>> 1");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 65);
    // Top two bits of -4 >>> 1 (arithmetic) stay set: sign-extended.
    assert_eq!(v.get_bit(64), slang_front::eval::FourState::One);
    assert_eq!(v.get_bit(63), slang_front::eval::FourState::One);
}

#[test]
fn scenario_6_unknown_condition_merges_branches_bitwise() {
    let mut session = ScriptSession::new();
    let result = session.eval("(1/0) ? 128'b101 : 128'b110");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 128);
    assert_eq!(v.get_bit(0), slang_front::eval::FourState::X);
    assert_eq!(v.get_bit(1), slang_front::eval::FourState::X);
    assert_eq!(v.get_bit(2), slang_front::eval::FourState::One);
}

#[test]
fn scenario_7_wildcard_equality_ignores_unknown_in_right_operand() {
    let mut session = ScriptSession::new();
    let result = session.eval("{1'b1 / 1'b0, 4'b1001} ==? 5'b11001");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 1);
    assert_eq!(v.to_u64(), Some(1));
}

#[test]
fn scenario_8_hierarchical_parameter_after_instantiation() {
    let mut session = ScriptSession::new();
    session.eval("module A #(parameter int P); localparam LP = P + 3; endmodule");
    session.eval("A #(.P(2)) a0();");
    assert_eq!(signed_value(&mut session, "a0.LP"), 5);
}

#[test]
fn boundary_unbased_unsized_literal_fills_a_wide_context() {
    let mut session = ScriptSession::new();
    let result = canonical(&mut session, "'1 + 65'b0");
    assert_eq!(result, "65'b1" .to_string() + &"1".repeat(64));
}

#[test]
fn boundary_zero_count_replication_in_a_concatenation_is_zero_width() {
    let mut session = ScriptSession::new();
    let result = session.eval("{ {0 {1'b1}}, 2'b10 }");
    let v = result.as_integer().unwrap();
    assert_eq!(v.width(), 2);
    assert_eq!(v.to_u64(), Some(0b10));
}

#[test]
fn boundary_real_literal_zero() {
    let mut session = ScriptSession::new();
    let result = session.eval("0.0");
    match result {
        slang_front::eval::ConstantValue::Real(r) => assert_eq!(r, 0.0),
        other => panic!("expected a real value, got {other:?}"),
    }
}

#[test]
fn boundary_real_literal_round_trips_through_display() {
    let mut session = ScriptSession::new();
    let result = session.eval("1.5");
    match result {
        slang_front::eval::ConstantValue::Real(r) => {
            let text = r.to_string();
            let reparsed: f64 = text.parse().unwrap();
            assert_eq!(r.to_bits(), reparsed.to_bits());
        }
        other => panic!("expected a real value, got {other:?}"),
    }
}

#[test]
fn boundary_include_of_an_absent_file_emits_exactly_one_diagnostic() {
    let sm = SourceManager::new();
    let mut compilation = Compilation::new(Default::default());
    compilation.add_file(&sm, "does/not/exist.sv");
    assert_eq!(compilation.diagnostics().len(), 1);
}
