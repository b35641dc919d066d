//! Binds the parser's untyped CST/AST into the constant-foldable trees
//! `crate::eval::ConstantEvaluator` consumes (spec §4.5's "bound expression/
//! statement" layer, §3.6).
//!
//! Function calls and hierarchical member accesses (`a0.LP`) are folded
//! down to a plain literal right here rather than carried into the bound
//! tree as their own node kinds — `ConstExpr`/`ConstStmt` stay a pure
//! constant-expression language (see `eval::interpreter`'s module doc),
//! and neither form can appear inside a constant-function body the way the
//! standard restricts `$bits`/array methods, so eagerly evaluating them at
//! bind time costs nothing a deferred representation would have bought.
//!
//! Hierarchical resolution specifically can't be done here directly: by the
//! time a script evaluates `a0.LP`, `a0`'s parameter values only exist once
//! an instance has been elaborated, which is `crate::compilation`'s job, not
//! this module's. [`NameResolver`] is the seam that lets `compilation` hand
//! already-elaborated values back across that boundary without `binder`
//! depending on `compilation` (which depends on `binder` to do its own
//! elaboration — a dependency cycle otherwise).

pub mod diagnostic;
mod literals;
mod operators;

pub use diagnostic::{Diagnostic, Severity};

use crate::base::Name;
use crate::eval::{BinaryOp, ConstExpr, ConstStmt, ConstantEvaluator, Environment, SVInt};
use crate::eval::value::ConstantValue;
use crate::parser::ast::{
    AssignmentPatternExpression, AstNode, CallExpression, CastExpression, ConcatenationExpression,
    ConditionalExpression, DataType, Expression, FormalArgument, FunctionDeclaration, IndexExpression,
    MemberAccessExpression, RangeExpression, ReplicationExpression, Statement,
};
use crate::parser::syntax_kind::{SyntaxKind, SyntaxNode};
use crate::symbols::{ScopeId, SymbolId, SymbolTable};
use crate::types::{RealKind, Type, TypeId, TypeTable, BIT, BYTE, INT, INTEGER, LOGIC, LONGINT, REG, SHORTINT, TIME};

/// Supplies a hierarchical reference's value once its instance has been
/// elaborated. `crate::compilation` is the only real implementor; tests bind
/// without one and get a diagnostic instead of a value for `a.b`-style
/// expressions.
pub trait NameResolver {
    fn resolve_member(&self, scope: ScopeId, member: &str) -> Option<ConstantValue>;
}

/// One bind pass's working state: which scope names resolve in, how far
/// into that scope's declaration order the binder may see (spec §3.5's
/// index-bounded visibility), and the type/diagnostic sinks everything
/// along the way writes into.
pub struct BindContext<'a> {
    symbols: &'a SymbolTable,
    types: &'a mut TypeTable,
    scope: ScopeId,
    visible_upto: usize,
    resolver: Option<&'a dyn NameResolver>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> BindContext<'a> {
    pub fn new(symbols: &'a SymbolTable, types: &'a mut TypeTable, scope: ScopeId, visible_upto: usize) -> Self {
        Self { symbols, types, scope, visible_upto, resolver: None, diagnostics: Vec::new() }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn NameResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn bind_expr(&mut self, expr: &Expression) -> ConstExpr {
        match expr {
            Expression::Literal(lit) => lit
                .token()
                .map(|t| literals::bind_literal_token(&t))
                .unwrap_or_else(error_literal),
            Expression::Ident(id) => id
                .name()
                .map(|t| ConstExpr::Identifier(Name::new(t.text())))
                .unwrap_or_else(error_literal),
            Expression::Paren(p) => p.inner().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal),
            Expression::Unary(u) => {
                let operand = u.operand().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                match u.operator().map(|t| t.kind()).and_then(operators::unary_op) {
                    Some(op) => ConstExpr::Unary(op, Box::new(operand)),
                    None => operand,
                }
            }
            Expression::Binary(b) => {
                let lhs = b.lhs().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                let rhs = b.rhs().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                match b.operator().map(|t| t.kind()) {
                    Some(kind) if operators::is_xnor(kind) => operators::make_xnor(lhs, rhs),
                    Some(kind) => match operators::binary_op(kind) {
                        Some(op) => self.apply_binary(op, lhs, rhs),
                        None => lhs,
                    },
                    None => lhs,
                }
            }
            Expression::Conditional(c) => self.bind_conditional(c),
            Expression::Concatenation(c) => self.bind_concat(c),
            Expression::Replication(r) => self.bind_replication(r),
            Expression::Index(ix) => self.bind_index(ix),
            Expression::Range(r) => self.bind_range(r),
            Expression::Call(call) => self.fold_call(call),
            Expression::MemberAccess(ma) => self.fold_member_access(ma),
            Expression::AssignmentPattern(ap) => self.bind_assignment_pattern(ap),
            Expression::Cast(cast) => self.bind_cast(cast),
        }
    }

    fn bind_conditional(&mut self, c: &ConditionalExpression) -> ConstExpr {
        let cond = c.condition().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
        let then_b = c.then_branch().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
        let else_b = c.else_branch().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
        ConstExpr::Conditional(Box::new(cond), Box::new(then_b), Box::new(else_b))
    }

    fn bind_concat(&mut self, c: &ConcatenationExpression) -> ConstExpr {
        ConstExpr::Concat(c.elements().map(|e| self.bind_expr(&e)).collect())
    }

    fn bind_replication(&mut self, r: &ReplicationExpression) -> ConstExpr {
        let count = r.count().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
        let value = match r.value() {
            Some(v) => self.bind_concat(&v),
            None => error_literal(),
        };
        ConstExpr::Replicate(Box::new(count), Box::new(value))
    }

    fn bind_index(&mut self, ix: &IndexExpression) -> ConstExpr {
        let base = ix.base().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
        let index = ix.index().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
        ConstExpr::Index(Box::new(base), Box::new(index))
    }

    /// Part-selects on a constant expression aren't in the constant-folding
    /// language `ConstExpr` supports (no range-select node); the base value
    /// passes through so the rest of the containing expression still folds,
    /// flagged so the caller knows the select itself was dropped.
    fn bind_range(&mut self, r: &RangeExpression) -> ConstExpr {
        self.diagnostics.push(Diagnostic::warning(
            "part-select on a constant expression is not evaluated; using its base value",
            r.syntax().text_range(),
        ));
        r.base().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal)
    }

    fn bind_assignment_pattern(&mut self, ap: &AssignmentPatternExpression) -> ConstExpr {
        ConstExpr::Concat(ap.elements().map(|e| self.bind_expr(&e)).collect())
    }

    fn bind_cast(&mut self, cast: &CastExpression) -> ConstExpr {
        let operand = cast.operand().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
        match cast.target_type() {
            Some(dt) => {
                let ty = self.bind_data_type(&dt);
                let (width, signed) = self.width_signed_of_type(ty);
                ConstExpr::Convert(Box::new(operand), width, signed)
            }
            None => operand,
        }
    }

    /// Eagerly evaluates a call to a constant function (spec §4.6's
    /// constant-function subset): binds and evaluates each argument, binds
    /// them into the callee's formal names, runs the callee's body through
    /// `ConstantEvaluator::eval_function`, and folds the result straight to
    /// a literal.
    fn fold_call(&mut self, call: &CallExpression) -> ConstExpr {
        let range = call.syntax().text_range();
        let Some(Expression::Ident(callee)) = call.callee() else {
            self.diagnostics.push(Diagnostic::error("call target must be a plain identifier", range));
            return error_literal();
        };
        let Some(name_tok) = callee.name() else { return error_literal() };
        let name = name_tok.text().to_string();
        let Some(symbol_id) = self.symbols.lookup(self.scope, &name) else {
            self.diagnostics.push(Diagnostic::error(format!("unknown function '{name}'"), range));
            return error_literal();
        };
        let Some(node) = self.symbols.get(symbol_id).syntax.clone() else {
            return error_literal();
        };
        let Some(func) = FunctionDeclaration::cast(node) else {
            self.diagnostics.push(Diagnostic::error(format!("'{name}' is not a function"), range));
            return error_literal();
        };

        let arg_exprs: Vec<Expression> =
            call.arguments().map(|args| args.arguments().collect()).unwrap_or_default();
        let formals: Vec<FormalArgument> = func.arguments().collect();

        let mut env = Environment::new();
        let mut eval = ConstantEvaluator::new();
        for (formal, arg) in formals.iter().zip(arg_exprs.iter()) {
            let bound = self.bind_expr(arg);
            let value = eval.eval_expr(&bound, &Environment::new()).unwrap_or(ConstantValue::Error);
            let value = match formal.data_type() {
                Some(dt) => {
                    let ty = self.bind_data_type(&dt);
                    self.convert_value(value, ty)
                }
                None => value,
            };
            if let Some(formal_name) = formal.name() {
                env.bind(Name::new(formal_name.text()), value);
            }
        }

        let body: Vec<ConstStmt> = func.body().map(|s| self.bind_stmt(&s)).collect();
        let result = eval.eval_function(&body, env).unwrap_or(ConstantValue::Error);
        let result = match func.return_type() {
            Some(dt) => {
                let ty = self.bind_data_type(&dt);
                self.convert_value(result, ty)
            }
            None => result,
        };
        value_to_literal(result)
    }

    /// Resolves `base.member` via [`NameResolver`] against `base`'s own
    /// elaborated scope, folding straight to a literal on success.
    fn fold_member_access(&mut self, ma: &MemberAccessExpression) -> ConstExpr {
        let range = ma.syntax().text_range();
        let (Some(Expression::Ident(base)), Some(member_tok)) = (ma.base(), ma.member()) else {
            self.diagnostics.push(Diagnostic::error("unsupported hierarchical reference base", range));
            return error_literal();
        };
        let Some(base_name_tok) = base.name() else { return error_literal() };
        let base_name = base_name_tok.text().to_string();
        let member_name = member_tok.text().to_string();

        let resolved = self.symbols.lookup(self.scope, &base_name).and_then(|id| {
            let inner_scope = self.symbols.get(id).scope?;
            self.resolver.and_then(|r| r.resolve_member(inner_scope, &member_name))
        });
        match resolved {
            Some(value) => value_to_literal(value),
            None => {
                self.diagnostics.push(Diagnostic::error(
                    format!("cannot resolve hierarchical reference '{base_name}.{member_name}'"),
                    range,
                ));
                error_literal()
            }
        }
    }

    pub fn bind_stmt(&mut self, stmt: &Statement) -> ConstStmt {
        match stmt {
            Statement::Variable(v) => {
                let name = v.names().next().map(|t| Name::new(t.text())).unwrap_or_else(|| Name::new("_"));
                let value = v
                    .initializer()
                    .map(|e| self.bind_expr(&e))
                    .unwrap_or_else(|| ConstExpr::IntLiteral(SVInt::zero(32, true)));
                ConstStmt::Assign(name, value)
            }
            Statement::Assignment(a) => {
                let name = match a.target() {
                    Some(Expression::Ident(id)) => id.name().map(|t| Name::new(t.text())),
                    _ => None,
                }
                .unwrap_or_else(|| Name::new("_"));
                let value = a.value().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                ConstStmt::Assign(name, value)
            }
            Statement::If(i) => {
                let cond = i.condition().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                let branches: Vec<Statement> = i.branches().collect();
                let then_branch = branches.first().map(|s| self.bind_block(s)).unwrap_or_default();
                let else_branch = branches.get(1).map(|s| self.bind_block(s)).unwrap_or_default();
                ConstStmt::If { cond, then_branch, else_branch }
            }
            Statement::While(w) => {
                let cond = w.condition().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                let body = w.body().map(|s| self.bind_block(&s)).unwrap_or_default();
                ConstStmt::While { cond, body }
            }
            Statement::For(f) => {
                let init = f.init().map(|s| vec![self.bind_stmt(&s)]).unwrap_or_default();
                let cond = f
                    .condition()
                    .map(|e| self.bind_expr(&e))
                    .unwrap_or_else(|| ConstExpr::IntLiteral(SVInt::from_u64(1, 1, false)));
                let step = f.step().map(|s| vec![self.bind_stmt(&s)]).unwrap_or_default();
                let body = f.body().map(|s| self.bind_block(&s)).unwrap_or_default();
                ConstStmt::For { init, cond, step, body }
            }
            Statement::Return(r) => {
                let value = r.value().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                ConstStmt::Return(value)
            }
            Statement::Block(b) => ConstStmt::Block(b.statements().map(|s| self.bind_stmt(&s)).collect()),
            Statement::Procedural(p) => {
                p.body().map(|s| self.bind_stmt(&s)).unwrap_or(ConstStmt::Block(Vec::new()))
            }
            Statement::Labeled(l) => {
                l.statement().map(|s| self.bind_stmt(&s)).unwrap_or(ConstStmt::Block(Vec::new()))
            }
            Statement::Expression(e) => {
                let value = e.expression().map(|e| self.bind_expr(&e)).unwrap_or_else(error_literal);
                ConstStmt::Block(vec![ConstStmt::Assign(Name::new("_"), value)])
            }
            // `break`/`continue`/`case`/`do-while`/`foreach` have no
            // counterpart in `ConstStmt` yet; folding them to an empty
            // block keeps a constant function that merely contains one
            // (but never actually executes it) from binding-failing.
            Statement::Break(_)
            | Statement::Continue(_)
            | Statement::Case(_)
            | Statement::DoWhile(_)
            | Statement::Foreach(_) => ConstStmt::Block(Vec::new()),
        }
    }

    fn bind_block(&mut self, stmt: &Statement) -> Vec<ConstStmt> {
        match stmt {
            Statement::Block(b) => b.statements().map(|s| self.bind_stmt(&s)).collect(),
            other => vec![self.bind_stmt(other)],
        }
    }

    /// Context-determined operands (table 11-2) are widened/re-signed to a
    /// shared shape before the op runs; everything else passes through.
    fn apply_binary(&mut self, op: BinaryOp, lhs: ConstExpr, rhs: ConstExpr) -> ConstExpr {
        if !operators::is_context_determined(op) {
            return ConstExpr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        let (lw, ls) = self.infer_width(&lhs);
        let (rw, rs) = self.infer_width(&rhs);
        let width = lw.max(rw);
        let signed = ls && rs;
        let lhs = if lw == width && ls == signed { lhs } else { ConstExpr::Convert(Box::new(lhs), width, signed) };
        let rhs = if rw == width && rs == signed { rhs } else { ConstExpr::Convert(Box::new(rhs), width, signed) };
        ConstExpr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Structural self-determined width/signedness of a bound expression,
    /// used only to equalize context-determined operands — an approximation
    /// good enough for that purpose, not a full type-checker.
    fn infer_width(&mut self, expr: &ConstExpr) -> (u32, bool) {
        match expr {
            ConstExpr::IntLiteral(i) => (i.width(), i.is_signed()),
            ConstExpr::RealLiteral(_) => (64, true),
            ConstExpr::StringLiteral(_) => (8, false),
            ConstExpr::Identifier(name) => match self.symbols.lookup_upto(self.scope, name, self.visible_upto) {
                Some(id) => self.width_of_symbol(id),
                None => (32, true),
            },
            ConstExpr::Unary(_, inner) => self.infer_width(inner),
            ConstExpr::Binary(op, lhs, rhs) => {
                if operators::is_context_determined(*op) {
                    let (lw, ls) = self.infer_width(lhs);
                    let (rw, rs) = self.infer_width(rhs);
                    (lw.max(rw), ls && rs)
                } else {
                    self.infer_width(lhs)
                }
            }
            ConstExpr::Conditional(_, t, _) => self.infer_width(t),
            ConstExpr::Concat(parts) => {
                let total = parts.iter().fold(0u32, |acc, p| acc + self.infer_width(p).0);
                (total, false)
            }
            ConstExpr::Replicate(_, value) => self.infer_width(value),
            ConstExpr::Index(..) => (1, false),
            ConstExpr::Convert(_, w, s) => (*w, *s),
            ConstExpr::UnbasedUnsized(_) => (32, false),
            ConstExpr::SystemCall(..) | ConstExpr::Call(..) => (32, true),
        }
    }

    fn width_of_symbol(&mut self, id: SymbolId) -> (u32, bool) {
        let Some(node) = self.symbols.get(id).syntax.clone() else { return (32, true) };
        let data_type = crate::parser::ast::VariableDeclaration::cast(node.clone())
            .and_then(|v| v.data_type())
            .or_else(|| FormalArgument::cast(node.clone()).and_then(|f| f.data_type()))
            .or_else(|| crate::parser::ast::ParameterDeclaration::cast(node.clone()).and_then(|p| p.data_type()));
        if let Some(dt) = data_type {
            let ty = self.bind_data_type(&dt);
            return self.width_signed_of_type(ty);
        }
        if let Some(p) = crate::parser::ast::ParameterDeclaration::cast(node) {
            if let Some(default) = p.default_value() {
                let bound = self.bind_expr(&default);
                return self.infer_width(&bound);
            }
        }
        (32, true)
    }

    fn width_signed_of_type(&self, ty: TypeId) -> (u32, bool) {
        match self.types.underlying_integral(ty) {
            Some(i) => (i.width, i.signed),
            None => (32, true),
        }
    }

    fn convert_value(&self, value: ConstantValue, ty: TypeId) -> ConstantValue {
        match (self.types.underlying_integral(ty), value) {
            (Some(i), ConstantValue::Integer(v)) => ConstantValue::Integer(v.resize(i.width).with_signed(i.signed)),
            (_, other) => other,
        }
    }

    /// Binds a `DataType` node to an interned `TypeId` (spec §3.4): maps the
    /// non-integral keywords directly, applies an explicit `signed`/
    /// `unsigned` override and a packed-dimension-derived width override to
    /// the nine integral keywords, and falls back to `TypeTable::error` with
    /// a diagnostic for struct/union/enum/user-defined types, none of which
    /// a `ScriptSession`'s constant-expression scenarios exercise.
    pub fn bind_data_type(&mut self, dt: &DataType) -> TypeId {
        use SyntaxKind::*;
        let Some(kw) = dt.keyword() else {
            self.diagnostics.push(Diagnostic::warning("unsupported data type", dt.syntax().text_range()));
            return self.types.error();
        };
        match kw.kind() {
            VOID_KW => self.types.void(),
            STRING_KW => self.types.string(),
            CHANDLE_KW => self.types.chandle(),
            EVENT_KW => self.types.event(),
            SHORTREAL_KW => self.types.alloc(Type::Floating(RealKind::ShortReal)),
            REAL_KW => self.types.alloc(Type::Floating(RealKind::Real)),
            REALTIME_KW => self.types.alloc(Type::Floating(RealKind::RealTime)),
            BIT_KW | LOGIC_KW | REG_KW | BYTE_KW | SHORTINT_KW | INT_KW | LONGINT_KW | INTEGER_KW | TIME_KW => {
                let mut base = match kw.kind() {
                    BIT_KW => BIT,
                    LOGIC_KW => LOGIC,
                    REG_KW => REG,
                    BYTE_KW => BYTE,
                    SHORTINT_KW => SHORTINT,
                    INT_KW => INT,
                    LONGINT_KW => LONGINT,
                    INTEGER_KW => INTEGER,
                    TIME_KW => TIME,
                    _ => unreachable!(),
                };
                if has_token(dt.syntax(), SIGNED_KW) {
                    base.signed = true;
                } else if has_token(dt.syntax(), UNSIGNED_KW) {
                    base.signed = false;
                }
                if let Some(width) = self.packed_dimension_width(dt) {
                    base.width = width;
                }
                self.types.intern_integral(base)
            }
            other => {
                self.diagnostics.push(Diagnostic::warning(
                    format!("unsupported data type keyword {other:?}"),
                    dt.syntax().text_range(),
                ));
                self.types.error()
            }
        }
    }

    /// Sums every `[msb:lsb]`/`[n]` packed dimension's bit width, evaluating
    /// each bound as a constant expression. Returns `None` when the type has
    /// no packed dimensions at all, so callers can fall back to the base
    /// keyword's default width rather than zeroing it out.
    fn packed_dimension_width(&mut self, dt: &DataType) -> Option<u32> {
        let mut total = 0u32;
        let mut any = false;
        let mut eval = ConstantEvaluator::new();
        let env = Environment::new();
        for dim in dt.packed_dimensions() {
            any = true;
            let Some(msb_expr) = dim.msb() else { continue };
            let msb_bound = self.bind_expr(&msb_expr);
            let Some(msb) = eval
                .eval_expr(&msb_bound, &env)
                .ok()
                .and_then(|v| v.as_integer().and_then(SVInt::to_i64))
            else {
                continue;
            };
            let width = match dim.lsb() {
                Some(lsb_expr) => {
                    let lsb_bound = self.bind_expr(&lsb_expr);
                    let lsb = eval
                        .eval_expr(&lsb_bound, &env)
                        .ok()
                        .and_then(|v| v.as_integer().and_then(SVInt::to_i64))
                        .unwrap_or(0);
                    (msb - lsb).unsigned_abs() as u32 + 1
                }
                None => msb.max(0) as u32,
            };
            total += width;
        }
        any.then_some(total)
    }
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens().filter_map(|it| it.into_token()).any(|t| t.kind() == kind)
}

fn error_literal() -> ConstExpr {
    ConstExpr::IntLiteral(SVInt::zero(32, true))
}

fn value_to_literal(value: ConstantValue) -> ConstExpr {
    match value {
        ConstantValue::Integer(i) => ConstExpr::IntLiteral(i),
        ConstantValue::Real(r) => ConstExpr::RealLiteral(r),
        ConstantValue::ShortReal(r) => ConstExpr::RealLiteral(r as f64),
        ConstantValue::Str(s) => ConstExpr::StringLiteral(s),
        _ => error_literal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{FunctionDeclaration, ModuleBodyItem, ModuleDeclaration, ModuleItem, SourceFile};
    use crate::parser::parse_source_file_text;
    use crate::symbols::SymbolKind;

    fn parse_function(src: &str) -> (SourceFile, FunctionDeclaration) {
        let parse = parse_source_file_text(src);
        let file = SourceFile::cast(parse.syntax()).expect("parses");
        let func = file
            .syntax()
            .descendants()
            .find_map(FunctionDeclaration::cast)
            .expect("contains a function");
        (file, func)
    }

    fn first_localparam_init(src: &str) -> Expression {
        let parse = parse_source_file_text(src);
        let file = SourceFile::cast(parse.syntax()).expect("parses");
        let module = file.items().find_map(|item| match item {
            ModuleItem::Module(m) => Some(m),
            _ => None,
        });
        let module: ModuleDeclaration = module.expect("has a module");
        module
            .items()
            .find_map(|item| match item {
                ModuleBodyItem::Parameter(p) => p.default_value(),
                _ => None,
            })
            .expect("localparam has an initializer")
    }

    #[test]
    fn binds_context_determined_arithmetic_with_width_equalization() {
        let expr = first_localparam_init("module m; localparam x = 4'd3 + 8'd9; endmodule");
        let mut types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let scope = symbols.new_scope(None);
        let mut ctx = BindContext::new(&symbols, &mut types, scope, usize::MAX);
        let bound = ctx.bind_expr(&expr);
        let mut eval = ConstantEvaluator::new();
        let result = eval.eval_expr(&bound, &Environment::new()).unwrap();
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(12));
        assert_eq!(result.as_integer().unwrap().width(), 8);
    }

    #[test]
    fn folds_a_constant_function_call() {
        let src = "function int foo(int a, int b); foo = a + b; endfunction";
        let (file, _func) = parse_function(src);
        let mut types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let scope = symbols.new_scope(None);
        let func_node = file.syntax().descendants().find_map(FunctionDeclaration::cast).unwrap();
        symbols.add_symbol(scope, SymbolKind::Function, "foo".into(), Some(func_node.syntax().clone()));

        let call_src = "module m; localparam x = foo(3, 4); endmodule";
        let call_expr = first_localparam_init(call_src);
        // Bind the call against a symbol table that already knows `foo`,
        // not the throwaway module the call text itself parsed into.
        let mut ctx = BindContext::new(&symbols, &mut types, scope, usize::MAX);
        let bound = ctx.bind_expr(&call_expr);
        match bound {
            ConstExpr::IntLiteral(v) => assert_eq!(v.to_u64(), Some(7)),
            other => panic!("expected a folded int literal, got {other:?}"),
        }
    }
}
