use super::*;

#[test]
fn test_default_options_target_commonjs_es2015() {
    let options = CompilerOptions::default();
    assert_eq!(options.module, ModuleKind::CommonJS);
    assert_eq!(options.target, ScriptTarget::ES2015);
    assert!(!options.preserve_const_enums);
    assert!(options.import_helpers);
}

#[test]
fn test_options_deserialize_from_tsconfig_names() {
    let options: CompilerOptions = serde_json::from_str(
        r#"{"module": "ES2015", "preserveConstEnums": true, "declaration": true}"#,
    )
    .expect("valid options json");
    assert_eq!(options.module, ModuleKind::ES2015);
    assert!(options.preserve_const_enums);
    assert!(options.declaration);
    assert_eq!(options.target, ScriptTarget::ES2015, "unset fields default");
}

#[test]
fn test_module_kind_es_module() {
    assert!(ModuleKind::ES2015.is_es_module());
    assert!(ModuleKind::ESNext.is_es_module());
    assert!(!ModuleKind::CommonJS.is_es_module());
}

#[test]
fn test_lowercase_tsconfig_spellings() {
    let options: CompilerOptions =
        serde_json::from_str(r#"{"module": "commonjs", "target": "es5"}"#).expect("valid options json");
    assert_eq!(options.module, ModuleKind::CommonJS);
    assert_eq!(options.target, ScriptTarget::ES5);
}
