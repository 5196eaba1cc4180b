use super::*;
use tsickle_common::CompilerOptions;
use tsickle_program::types::SignatureParameter;
use tsickle_program::{InMemoryProgram, Program, ProgramBuilder, SymbolFlags};

fn show(program: &InMemoryProgram, ty: TypeId) -> String {
    TypeDisplay::new(program.checker()).display(ty)
}

#[test]
fn primitives_literals_and_unions() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let string = b.string();
    let null = b.null();
    let literal = b.string_literal("a\"b");
    let union = b.union(vec![string, null, literal]);
    let program = b.build();

    assert_eq!(show(&program, string), "string");
    assert_eq!(show(&program, union), "string | null | \"a\\\"b\"");
}

#[test]
fn references_arrays_and_aliases() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let number = b.number();
    let string = b.string();
    let array = b.global("Array", SymbolFlags::INTERFACE);
    let map = b.global("Map", SymbolFlags::CLASS);
    let numbers = b.reference(array, vec![number]);
    let union = b.union(vec![number, string]);
    let mixed = b.reference(array, vec![union]);
    let dict = b.reference(map, vec![string, number]);
    let alias = b.local("src/a.ts", "Id", SymbolFlags::TYPE_ALIAS);
    let aliased = b.union(vec![number, string]);
    b.set_type_alias(aliased, alias);
    let program = b.build();

    assert_eq!(show(&program, numbers), "number[]");
    assert_eq!(show(&program, mixed), "(number | string)[]");
    assert_eq!(show(&program, dict), "Map<string, number>");
    assert_eq!(show(&program, aliased), "Id");
}

#[test]
fn function_and_object_types() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let number = b.number();
    let string = b.string();
    let boolean = b.boolean();
    let function = b.function_type(vec![("a", number, false), ("b", string, true)], boolean);
    let mut rest = ProgramBuilder::signature(Vec::new(), number);
    rest.parameters.push(SignatureParameter {
        name: "xs".to_string(),
        type_id: string,
        optional: false,
        rest: true,
    });
    let object = b.object(ObjectType {
        call_signatures: vec![rest],
        string_index: Some(number),
        properties: vec![
            PropertySignature {
                name: "x".to_string(),
                type_id: number,
                optional: false,
            },
            PropertySignature {
                name: "my-key".to_string(),
                type_id: function,
                optional: true,
            },
        ],
        ..ObjectType::default()
    });
    let empty = b.object(ObjectType::default());
    let program = b.build();

    assert_eq!(show(&program, function), "(a: number, b?: string) => boolean");
    assert_eq!(
        show(&program, object),
        "{ (...xs: string): number; [key: string]: number; x: number; \"my-key\"?: (a: number, b?: string) => boolean; }"
    );
    assert_eq!(show(&program, empty), "{}");
}

#[test]
fn recursive_anonymous_type_prints_any() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let node = b.reserve_type();
    b.set_type(
        node,
        TypeData::Object(ObjectType {
            properties: vec![PropertySignature {
                name: "next".to_string(),
                type_id: node,
                optional: true,
            }],
            ..ObjectType::default()
        }),
    );
    let program = b.build();

    assert_eq!(show(&program, node), "{ next?: any; }");
}
