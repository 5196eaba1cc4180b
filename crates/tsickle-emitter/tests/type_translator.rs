use super::*;
use crate::host::HostOptions;
use tsickle_common::{CompilerOptions, ModuleKind};
use tsickle_program::ast::{ImportClause, ImportDeclaration, ImportSpecifier, NamedImportBindings, StringLiteral};
use tsickle_program::types::SignatureParameter;
use tsickle_program::{InMemoryProgram, Program, ProgramBuilder, StatementKind};

fn with_translator<R>(
    program: &InMemoryProgram,
    host: &TsickleHost,
    f: impl FnOnce(&mut TypeTranslator<'_>) -> R,
) -> (R, ModuleSymbolTable) {
    let file = &program.source_files()[0];
    let mut symbols = ModuleSymbolTable::build(
        file,
        program.checker(),
        host,
        ModuleKind::CommonJS,
        host.options.googmodule,
    );
    let result = f(&mut TypeTranslator::new(program.checker(), host, &mut symbols));
    (result, symbols)
}

fn translate(program: &InMemoryProgram, ty: TypeId) -> String {
    with_translator(program, &TsickleHost::default(), |t| t.translate(ty)).0
}

fn builder() -> ProgramBuilder {
    ProgramBuilder::new(CompilerOptions::default())
}

#[test]
fn test_primitives_and_unions() {
    let mut b = builder();
    let string = b.string();
    let null = b.null();
    let undefined = b.undefined();
    let literal = b.string_literal("a");
    let nullable = b.union(vec![string, null, undefined]);
    let nested = b.union(vec![nullable, literal]);
    let (any, unknown, number) = (b.any(), b.unknown(), b.number());
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    assert_eq!(translate(&program, any), "?");
    assert_eq!(translate(&program, unknown), "*");
    assert_eq!(translate(&program, number), "number");
    assert_eq!(translate(&program, literal), "string");
    assert_eq!(translate(&program, nullable), "(string|null|undefined)");
    assert_eq!(
        translate(&program, nested),
        "(string|null|undefined)",
        "nested unions flatten and literal members collapse into their base type"
    );
}

#[test]
fn test_self_referential_function_type_terminates() {
    let mut b = builder();
    let number = b.number();
    let string = b.string();
    let f = b.reserve_type();
    let signature = ProgramBuilder::signature(vec![("a", number, false), ("b", string, true)], f);
    b.set_type(
        f,
        TypeData::Object(ObjectType {
            call_signatures: vec![signature],
            ..ObjectType::default()
        }),
    );
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    assert_eq!(translate(&program, f), "function(number, string=): ?");
    assert_eq!(
        translate(&program, f),
        "function(number, string=): ?",
        "every top-level translation starts with a fresh visited set"
    );
}

#[test]
fn test_class_and_generic_references() {
    let mut b = builder();
    let number = b.number();
    let null = b.null();
    let class = b.local("src/a.ts", "C", SymbolFlags::CLASS);
    let instance = b.instance_type(class);
    let nullable = b.union(vec![instance, null]);
    let array = b.global("Array", SymbolFlags::INTERFACE);
    let numbers = b.reference(array, vec![number]);
    let ctor = b.object(ObjectType {
        construct_signatures: vec![ProgramBuilder::signature(vec![("n", number, false)], instance)],
        ..ObjectType::default()
    });
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    assert_eq!(translate(&program, instance), "!C");
    assert_eq!(translate(&program, nullable), "(!C|null)");
    assert_eq!(translate(&program, numbers), "!Array<number>");
    assert_eq!(translate(&program, ctor), "function(new:C, number)");
}

#[test]
fn test_records_and_index_signatures() {
    let mut b = builder();
    let number = b.number();
    let string = b.string();
    let boolean = b.boolean();
    let record = b.object(ObjectType {
        properties: vec![
            PropertySignature {
                name: "a".to_string(),
                type_id: number,
                optional: false,
            },
            PropertySignature {
                name: "b".to_string(),
                type_id: string,
                optional: true,
            },
            PropertySignature {
                name: "my-key".to_string(),
                type_id: boolean,
                optional: false,
            },
        ],
        ..ObjectType::default()
    });
    let dictionary = b.object(ObjectType {
        string_index: Some(number),
        ..ObjectType::default()
    });
    let empty = b.object(ObjectType::default());
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    assert_eq!(
        translate(&program, record),
        "{a: number, b: (string|undefined), 'my-key': boolean}"
    );
    assert_eq!(translate(&program, dictionary), "!Object<string,number>");
    assert_eq!(translate(&program, empty), "*");
}

#[test]
fn test_parameters_and_erased_type_parameters() {
    let mut b = builder();
    let number = b.number();
    let string = b.string();
    let t = b.add_type(TypeData::TypeParameter { name: "T".to_string() });
    let array = b.global("Array", SymbolFlags::INTERFACE);
    let strings = b.reference(array, vec![string]);
    let generic = b.object(ObjectType {
        call_signatures: vec![Signature {
            this_type: None,
            type_parameters: vec!["T".to_string()],
            parameters: vec![SignatureParameter {
                name: "x".to_string(),
                type_id: t,
                optional: false,
                rest: false,
            }],
            return_type: t,
        }],
        ..ObjectType::default()
    });
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    let (texts, _) = with_translator(&program, &TsickleHost::default(), |tr| {
        let before = tr.translate(t);
        let generic = tr.translate(generic);
        let optional = tr.parameter_type(&[number, string], true, false);
        let rest = tr.parameter_type(&[strings], false, true);
        tr.erase_type_parameters(["T"]);
        let erased = tr.translate(t);
        (before, generic, optional, rest, erased)
    });
    assert_eq!(texts.0, "T");
    assert_eq!(texts.1, "function(?): ?", "signature type parameters are invisible to Closure");
    assert_eq!(texts.2, "(number|string)=");
    assert_eq!(texts.3, "...string");
    assert_eq!(texts.4, "?");
}

fn import_foo(b: &mut ProgramBuilder, alias: SymbolId) -> tsickle_program::Statement {
    let local = b.ident_for("Foo", alias);
    b.stmt(StatementKind::Import(ImportDeclaration {
        clause: Some(ImportClause {
            default: None,
            bindings: Some(NamedImportBindings::Named(vec![ImportSpecifier {
                property_name: None,
                name: local,
                is_type_only: false,
            }])),
        }),
        module_specifier: StringLiteral::new("./b"),
        is_type_only: false,
    }))
}

#[test]
fn test_imported_types_are_named_through_their_binding() {
    let mut b = builder();
    let module_b = b.module("src/b.ts");
    let foo = b.declare(module_b, "Foo", SymbolFlags::CLASS);
    let foo_type = b.instance_type(foo);
    let alias = b.alias("src/a.ts", "Foo", foo);
    let import = import_foo(&mut b, alias);
    b.add_file("src/a.ts", vec![import]);
    let type_only = b.build();
    assert_eq!(translate(&type_only, foo_type), "!Foo");

    let mut b = builder();
    let module_b = b.module("src/b.ts");
    let foo = b.declare(module_b, "Foo", SymbolFlags::CLASS);
    let foo_type = b.instance_type(foo);
    let alias = b.alias("src/a.ts", "Foo", foo);
    b.mark_value_alias(alias);
    let import = import_foo(&mut b, alias);
    b.add_file("src/a.ts", vec![import]);
    let value = b.build();
    assert_eq!(
        translate(&value, foo_type),
        "!b_1.Foo",
        "value imports are reached through the CommonJS module object"
    );
}

#[test]
fn test_unimported_module_type_is_forward_declared_in_googmodule() {
    let mut b = builder();
    let module_c = b.module("src/c.ts");
    let bar = b.declare(module_c, "Bar", SymbolFlags::INTERFACE);
    let bar_type = b.instance_type(bar);
    b.add_file("src/a.ts", Vec::new());
    let program = b.build();

    assert_eq!(translate(&program, bar_type), "?", "not nameable without goog.module");

    let host = TsickleHost::new(HostOptions {
        googmodule: true,
        ..HostOptions::default()
    });
    let (text, mut symbols) = with_translator(&program, &host, |t| {
        let first = t.translate(bar_type);
        let second = t.translate(bar_type);
        (first, second)
    });
    assert_eq!(text.0, "!tsickle_c_1.Bar");
    assert_eq!(text.1, "!tsickle_c_1.Bar");
    let declares = symbols.take_forward_declares();
    assert_eq!(
        declares,
        vec![crate::module_symbols::ForwardDeclare {
            alias: "tsickle_c_1".to_string(),
            module_id: "src.c".to_string(),
        }]
    );
    assert!(symbols.take_forward_declares().is_empty());
}

#[test]
fn test_union_text_dedupes() {
    assert_eq!(union_text(Vec::new()), "?");
    assert_eq!(union_text(vec!["a".to_string(), "a".to_string()]), "a");
    assert_eq!(union_text(vec!["a".to_string(), "b".to_string(), "a".to_string()]), "(a|b)");
}
