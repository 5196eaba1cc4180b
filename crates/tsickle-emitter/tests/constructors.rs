use super::*;
use tsickle_common::CompilerOptions;
use tsickle_program::ast::Identifier;
use tsickle_program::types::{ObjectType, SignatureParameter};
use tsickle_program::{Program, ProgramBuilder};

fn rest(name: &str, type_id: TypeId) -> SignatureParameter {
    SignatureParameter {
        name: name.to_string(),
        type_id,
        optional: false,
        rest: true,
    }
}

#[test]
fn test_overloads_union_positions_and_mark_missing_ones_optional() {
    let b = ProgramBuilder::new(CompilerOptions::default());
    let (number, string, void) = (b.number(), b.string(), b.void());
    let one = ProgramBuilder::signature(vec![("a", number, false)], void);
    let two = ProgramBuilder::signature(vec![("x", string, false), ("y", number, false)], void);
    let implementation = ProgramBuilder::signature(vec![("value", number, false), ("extra", number, true)], number);

    let merged = merge_signatures(&[&one, &two, &implementation], &["value".to_string(), "extra".to_string()]);
    assert_eq!(merged.parameters.len(), 2);

    let first = &merged.parameters[0];
    assert_eq!(first.name, "value", "implementation names win");
    assert_eq!(first.types.as_slice(), &[number, string, number]);
    assert!(!first.optional);

    let second = &merged.parameters[1];
    assert_eq!(second.name, "extra");
    assert!(second.optional, "the first overload lacks this position");
    assert_eq!(merged.return_types.as_slice(), &[void, void, number]);
}

#[test]
fn test_rest_parameter_swallows_later_positions() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let (number, string, void) = (b.number(), b.string(), b.void());
    let mut spread = ProgramBuilder::signature(vec![("first", number, false)], void);
    spread.parameters.push(rest("others", string));
    let long = ProgramBuilder::signature(
        vec![("a", number, false), ("b", string, false), ("c", string, false)],
        void,
    );

    let merged = merge_signatures(&[&spread, &long], &[]);
    assert_eq!(merged.parameters.len(), 2);
    assert_eq!(merged.parameters[0].name, "first");
    assert!(merged.parameters[1].rest);
    assert_eq!(merged.parameters[1].name, "others");
}

#[test]
fn test_unnamed_positions_and_type_parameters() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let number = b.number();
    let mut generic = ProgramBuilder::signature(vec![("", number, false)], number);
    generic.type_parameters = vec!["T".to_string(), "U".to_string()];
    let mut other = ProgramBuilder::signature(Vec::new(), number);
    other.type_parameters = vec!["U".to_string(), "V".to_string()];

    let merged = merge_signatures(&[&generic, &other], &[]);
    assert_eq!(merged.parameters[0].name, "arg0");
    assert!(merged.parameters[0].optional);
    assert_eq!(merged.type_parameters, vec!["T", "U", "V"]);
}

#[test]
fn test_signatures_of_reads_call_and_construct_signatures() {
    let mut b = ProgramBuilder::new(CompilerOptions::default());
    let (number, string) = (b.number(), b.string());
    let callable = b.object(ObjectType {
        call_signatures: vec![ProgramBuilder::signature(Vec::new(), number)],
        construct_signatures: vec![ProgramBuilder::signature(vec![("s", string, false)], string)],
        ..ObjectType::default()
    });
    let program = b.build();

    let signatures = signatures_of(program.checker(), callable);
    assert_eq!(signatures.len(), 2);
    assert_eq!(signatures[1].parameters[0].name, "s");
    assert!(signatures_of(program.checker(), number).is_empty());
}

#[test]
fn test_parameter_names() {
    let params = vec![
        Parameter::new(Identifier::synthetic("a")),
        Parameter::new(Identifier::synthetic("b")),
    ];
    assert_eq!(parameter_names(&params), vec!["a", "b"]);
}
