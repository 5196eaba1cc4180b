use super::*;

#[test]
fn records_modules_and_references_in_order() {
    let mut manifest = ModulesManifest::new();
    manifest.add_module("/app/a.ts", "app.a");
    manifest.add_referenced_module("/app/a.ts", "app.c");
    manifest.add_referenced_module("/app/a.ts", "app.b");
    manifest.add_referenced_module("/app/a.ts", "app.c");

    assert_eq!(manifest.file_name_from_module_name("app.a"), Some("/app/a.ts"));
    assert_eq!(manifest.referenced_modules("/app/a.ts"), vec!["app.c", "app.b"]);
    assert!(manifest.referenced_modules("/app/missing.ts").is_empty());
}

#[test]
fn merge_combines_both_manifests() {
    let mut first = ModulesManifest::new();
    first.add_module("/app/a.ts", "app.a");
    let mut second = ModulesManifest::new();
    second.add_module("/app/b.ts", "app.b");
    second.add_referenced_module("/app/b.ts", "app.a");

    first.merge(second);
    assert_eq!(first.module_names().collect::<Vec<_>>(), vec!["app.a", "app.b"]);
    assert_eq!(first.file_names().collect::<Vec<_>>(), vec!["/app/a.ts", "/app/b.ts"]);
    assert_eq!(first.referenced_modules("/app/b.ts"), vec!["app.a"]);
}

#[test]
fn serializes_with_camel_case_keys() {
    let mut manifest = ModulesManifest::new();
    manifest.add_module("/app/a.ts", "app.a");
    let json = serde_json::to_string(&manifest).unwrap();
    assert!(json.contains("\"moduleToFileName\":{\"app.a\":\"/app/a.ts\"}"), "{json}");
    let back: ModulesManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, manifest);
}
