use super::diagnostic_codes::*;
use super::*;

#[test]
fn test_format_message_substitutes_positional_args() {
    assert_eq!(format_message("{0} and {1}", &["a", "b"]), "a and b");
    assert_eq!(format_message("{0}{0}", &["x"]), "xx");
}

#[test]
fn test_from_message_uses_template_code_and_category() {
    let template = message_for(AMBIGUOUS_EXPORT_STAR).expect("registered");
    let diag = Diagnostic::from_message(template, "a.ts", 3, 4, &["x", "./b", "./c"]);
    assert_eq!(diag.code, AMBIGUOUS_EXPORT_STAR);
    assert_eq!(diag.category, DiagnosticCategory::Warning);
    assert!(
        diag.message_text.starts_with("'x' is exported by more than one"),
        "unexpected message: {}",
        diag.message_text
    );
    assert_eq!(diag.start, 3);
    assert_eq!(diag.length, 4);
}

#[test]
fn test_every_code_has_a_template() {
    for code in [
        PLAIN_NAMESPACE_UNSUPPORTED,
        REDUNDANT_JSDOC_TYPE,
        REDUNDANT_JSDOC_TAG,
        UNNAMED_STUB_MEMBER,
        TRANSFORM_FAILED,
        TS_MIGRATION_SHIM_DISABLED,
        GOOGMODULE_REQUIRES_COMMONJS,
    ] {
        assert!(get_message_template(code).is_some(), "missing template for {code}");
    }
}

#[test]
fn test_display_includes_file_and_code() {
    let diag = Diagnostic::warning("a.ts", 10, 1, "oops", 90001);
    assert_eq!(diag.to_string(), "a.ts(10): warning tsickle90001: oops");
    assert!(!diag.is_error());
    assert!(diag.is_tsickle());
    let global = Diagnostic::error("", 0, 0, "bad", 5023);
    assert_eq!(global.to_string(), "error TS5023: bad");
    assert!(!global.is_tsickle());
}
