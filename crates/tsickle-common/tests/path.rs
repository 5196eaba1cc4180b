use super::*;

#[test]
fn test_normalize_folds_dot_segments() {
    assert_eq!(normalize("a/./b/../c"), "a/c");
    assert_eq!(normalize("/root/src/../lib/x.ts"), "/root/lib/x.ts");
    assert_eq!(normalize("..\\up\\x.ts"), "../up/x.ts");
    assert_eq!(normalize("./"), ".");
}

#[test]
fn test_absolute_detection() {
    assert!(is_absolute("/a/b.ts"));
    assert!(is_absolute("C:/a/b.ts"));
    assert!(!is_absolute("a/b.ts"));
    assert!(!is_absolute("./b.ts"));
}

#[test]
fn test_relative_specifier_detection() {
    assert!(is_relative_specifier("./a"));
    assert!(is_relative_specifier("../a/b"));
    assert!(is_relative_specifier(".."));
    assert!(!is_relative_specifier("tslib"));
    assert!(!is_relative_specifier("@scope/pkg"));
}

#[test]
fn test_join_and_dirname() {
    assert_eq!(dirname("a/b/c.ts"), "a/b");
    assert_eq!(dirname("c.ts"), ".");
    assert_eq!(join("a/b", "../c"), "a/c");
    assert_eq!(join(".", "./c"), "c");
    assert_eq!(join("a", "/abs/c"), "/abs/c");
}

#[test]
fn test_strip_script_extension() {
    assert_eq!(strip_script_extension("a/b.d.ts"), "a/b");
    assert_eq!(strip_script_extension("a/b.ts"), "a/b");
    assert_eq!(strip_script_extension("a/b.js"), "a/b");
    assert_eq!(strip_script_extension("a/b.css"), "a/b.css");
}

#[test]
fn test_relative_paths() {
    assert_eq!(relative("/root", "/root/src/a.ts"), "src/a.ts");
    assert_eq!(relative("/root/src", "/root/lib/a.ts"), "../lib/a.ts");
}

#[test]
fn test_output_file_name_reroots_into_out_dir() {
    assert_eq!(output_file_name("a/b.ts", ".js", None, None), "a/b.js");
    assert_eq!(
        output_file_name("/p/src/a/b.ts", ".js", Some("/p/src"), Some("/p/out")),
        "/p/out/a/b.js"
    );
    assert_eq!(output_file_name("a/b.ts", ".d.ts", None, None), "a/b.d.ts");
}
