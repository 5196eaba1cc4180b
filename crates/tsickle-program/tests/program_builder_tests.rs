//! Building programs by hand and walking them with `VisitMut`.

use tsickle_common::CompilerOptions;
use tsickle_program::ast::{Expression, ExpressionKind, ModifierFlags, VariableDeclaration, VariableStatement};
use tsickle_program::visit::{VisitMut, walk_expression};
use tsickle_program::{Program, ProgramBuilder, StatementKind, SymbolFlags, TypeChecker, VarKind};

struct RenameIdentifiers;

impl VisitMut for RenameIdentifiers {
    fn visit_expression(&mut self, expr: &mut Expression) {
        if let ExpressionKind::Identifier(name) = &mut expr.kind {
            name.insert_str(0, "renamed_");
        }
        walk_expression(self, expr);
    }
}

#[test]
fn test_visitor_reaches_nested_expressions() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let module = b.module("a.ts");
    let y = b.declare(module, "y", SymbolFlags::VARIABLE);
    let name = b.ident_for("x", y);
    let inner = b.ident_ref("y", y);
    let call = Expression::call(Expression::ident("f"), vec![inner]);
    let stmt = b.stmt(StatementKind::Variable(VariableStatement {
        modifiers: ModifierFlags::EXPORT,
        kind: VarKind::Let,
        declarations: vec![VariableDeclaration {
            name,
            type_annotation: None,
            initializer: Some(call),
        }],
    }));
    b.add_file("a.ts", vec![stmt]);
    let program = b.build();

    let mut file = program.source_files()[0].clone();
    RenameIdentifiers.visit_source_file(&mut file);
    let StatementKind::Variable(var) = &file.statements[0].kind else {
        panic!("expected variable statement");
    };
    let Some(Expression {
        kind: ExpressionKind::Call { callee, arguments },
        ..
    }) = &var.declarations[0].initializer
    else {
        panic!("expected call initializer");
    };
    assert_eq!(callee.entity_name().as_deref(), Some("renamed_f"));
    assert_eq!(arguments[0].entity_name().as_deref(), Some("renamed_y"));
    assert_eq!(
        program.symbol_of_node(arguments[0].id),
        Some(y),
        "node ids survive rewriting"
    );
}

#[test]
fn test_pre_emit_diagnostics_are_reported() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    b.add_diagnostic(tsickle_common::Diagnostic::error("a.ts", 0, 1, "bad", 2304));
    let program = b.build();
    assert_eq!(program.pre_emit_diagnostics().len(), 1);
    assert_eq!(program.compiler_options(), &CompilerOptions::default());
}
