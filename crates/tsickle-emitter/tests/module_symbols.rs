use super::*;
use crate::host::HostOptions;
use tsickle_common::CompilerOptions;
use tsickle_program::ast::{Identifier, ImportClause, ImportSpecifier, StringLiteral};
use tsickle_program::{InMemoryProgram, Program, ProgramBuilder, Statement, SymbolFlags};

fn named_import(b: &mut ProgramBuilder, specifier: &str, names: &[(&str, SymbolId)]) -> Statement {
    let specs = names
        .iter()
        .map(|&(name, sym)| ImportSpecifier {
            property_name: None,
            name: b.ident_for(name, sym),
            is_type_only: false,
        })
        .collect();
    b.stmt(StatementKind::Import(ImportDeclaration {
        clause: Some(ImportClause {
            default: None,
            bindings: Some(NamedImportBindings::Named(specs)),
        }),
        module_specifier: StringLiteral::new(specifier),
        is_type_only: false,
    }))
}

fn table(program: &InMemoryProgram, host: &TsickleHost, module_kind: ModuleKind) -> ModuleSymbolTable {
    ModuleSymbolTable::build(
        &program.source_files()[0],
        program.checker(),
        host,
        module_kind,
        host.options.googmodule,
    )
}

#[test]
fn test_alias_base() {
    assert_eq!(alias_base("./foo/bar-baz.js"), "bar_baz");
    assert_eq!(alias_base("@scope/pkg"), "pkg");
    assert_eq!(alias_base("./2d"), "_2d");
    assert_eq!(alias_base("./dir/"), "dir");
}

#[test]
fn test_imports_are_classified_by_value_use() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let module_b = b.module("src/b.ts");
    let value = b.declare(module_b, "value", SymbolFlags::FUNCTION);
    let shape = b.declare(module_b, "Shape", SymbolFlags::INTERFACE);
    let value_alias = b.alias("src/a.ts", "value", value);
    let shape_alias = b.alias("src/a.ts", "Shape", shape);
    b.mark_value_alias(value_alias);
    let mixed = named_import(&mut b, "./b", &[("value", value_alias)]);
    let types = named_import(&mut b, "./b", &[("Shape", shape_alias)]);
    let side_effect = b.stmt(StatementKind::Import(ImportDeclaration {
        clause: None,
        module_specifier: StringLiteral::new("./polyfill"),
        is_type_only: false,
    }));
    b.add_file("src/a.ts", vec![mixed, types, side_effect]);
    let program = b.build();

    let table = table(&program, &TsickleHost::default(), ModuleKind::CommonJS);
    let entries = table.entries();
    assert_eq!(entries.len(), 3);

    assert!(!entries[0].is_type_only);
    assert_eq!(entries[0].module_id, "src.b");
    assert_eq!(entries[0].module_symbol, Some(module_b));
    assert_eq!(entries[0].require_alias.as_deref(), Some("b_1"));

    assert!(entries[1].is_type_only);
    assert_eq!(entries[1].require_alias, None);

    assert!(entries[2].side_effect_only);
    assert!(!entries[2].is_type_only);
    assert_eq!(entries[2].resolved_file, None);

    assert_eq!(table.value_rewrite(value_alias).as_deref(), Some("b_1.value"));
    assert_eq!(table.value_rewrite(shape_alias), None);
    assert!(table.entry_for("./b", Some("Shape")).is_some_and(|e| e.is_type_only));
    assert!(table.entry_for("./polyfill", None).is_some());
}

#[test]
fn test_es_module_output_keeps_local_names() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let module_b = b.module("src/b.ts");
    let value = b.declare(module_b, "value", SymbolFlags::FUNCTION);
    let alias = b.alias("src/a.ts", "value", value);
    b.mark_value_alias(alias);
    let import = named_import(&mut b, "./b", &[("value", alias)]);
    b.add_file("src/a.ts", vec![import]);
    let program = b.build();

    let table = table(&program, &TsickleHost::default(), ModuleKind::ES2015);
    assert_eq!(table.entries()[0].require_alias, None);
    assert_eq!(table.value_rewrite(alias), None);
}

#[test]
fn test_googmodule_type_only_import_gets_type_alias() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let module_b = b.module("src/b.ts");
    let shape = b.declare(module_b, "Shape", SymbolFlags::INTERFACE);
    let alias = b.alias("src/a.ts", "Shape", shape);
    let import = named_import(&mut b, "./b", &[("Shape", alias)]);
    b.add_file("src/a.ts", vec![import]);
    let program = b.build();
    let host = TsickleHost::new(HostOptions {
        googmodule: true,
        ..HostOptions::default()
    });

    let mut table = table(&program, &host, ModuleKind::CommonJS);
    assert_eq!(table.entries()[0].type_alias.as_deref(), Some("tsickle_b_1"));
    let program_checker = program.checker();
    assert_eq!(
        table
            .reference_to_module_export(program_checker, &host, module_b, shape, "Shape")
            .as_deref(),
        Some("tsickle_b_1.Shape")
    );
}

#[test]
fn test_fresh_names_avoid_declared_names() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let ident = b.ident("b_1");
    let declared = b.stmt(StatementKind::Import(ImportDeclaration {
        clause: Some(ImportClause {
            default: Some(ident),
            bindings: None,
        }),
        module_specifier: StringLiteral::new("./other"),
        is_type_only: false,
    }));
    b.add_file("src/a.ts", vec![declared]);
    let program = b.build();

    let mut table = table(&program, &TsickleHost::default(), ModuleKind::CommonJS);
    assert_eq!(table.fresh_name("b"), "b_2");
    assert_eq!(table.fresh_name("b"), "b_3");
}

#[test]
fn test_index_import_shorthand() {
    let host = TsickleHost::new(HostOptions {
        convert_index_import_shorthand: true,
        ..HostOptions::default()
    });
    assert_eq!(module_id(&host, "src/a.ts", "./lib", Some("src/lib/index.ts")), "src.lib.index");
    assert_eq!(module_id(&host, "src/a.ts", "./lib/index", Some("src/lib/index.ts")), "src.lib.index");
    assert_eq!(module_id(&TsickleHost::default(), "src/a.ts", "./lib", Some("src/lib/index.ts")), "src.lib");
}

#[test]
fn test_index_import_shorthand_uses_fallback_resolution() {
    struct IndexOnly;
    impl crate::host::ModuleResolutionHost for IndexOnly {
        fn file_exists(&self, file_name: &str) -> bool {
            file_name == "src/lib/index.ts"
        }
    }
    let host = TsickleHost::new(HostOptions {
        convert_index_import_shorthand: true,
        ..HostOptions::default()
    })
    .with_module_resolution_host(IndexOnly);
    assert_eq!(module_id(&host, "src/a.ts", "./lib", None), "src.lib.index");
    assert_eq!(module_id(&host, "src/a.ts", "./other", None), "src.other");
}

#[test]
fn test_import_local() {
    let decl = ImportDeclaration {
        clause: Some(ImportClause {
            default: None,
            bindings: Some(NamedImportBindings::Namespace(Identifier::synthetic("ns"))),
        }),
        module_specifier: StringLiteral::new("./x"),
        is_type_only: false,
    };
    assert_eq!(import_local(&decl), Some("ns"));
    let side_effect = ImportDeclaration {
        clause: None,
        ..decl
    };
    assert_eq!(import_local(&side_effect), None);
}
