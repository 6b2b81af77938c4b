//! Property tests for name construction and call ordering.

use callmap::languages::java::fqcn;
use callmap::{Indexer, Registry};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    // Java keywords are all lowercase, so a leading capital keeps these valid.
    "[A-Z][A-Za-z0-9]{0,8}"
}

fn package() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::collection::vec("[a-z][a-z0-9]{0,6}", 1..4).prop_map(|parts| {
        parts
            .into_iter()
            .map(|p| format!("pkg{p}"))
            .collect::<Vec<_>>()
            .join(".")
    }))
}

/// `class A { class B { ... } }` for the given nesting path.
fn nested_source(package: Option<&str>, path: &[String]) -> String {
    let mut source = String::new();
    if let Some(pkg) = package {
        source.push_str(&format!("package {pkg};\n"));
    }
    for name in path {
        source.push_str(&format!("class {name} {{\n"));
    }
    for _ in path {
        source.push_str("}\n");
    }
    source
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fqcn_is_package_dot_nesting_path(
        pkg in package(),
        path in prop::collection::vec(identifier(), 1..5),
    ) {
        let expected = match &pkg {
            Some(p) => format!("{p}.{}", path.join(".")),
            None => path.join("."),
        };
        prop_assert_eq!(fqcn(pkg.as_deref(), path.iter().map(String::as_str)), expected.clone());

        let mut indexer = Indexer::new().expect("indexer");
        let mut registry = Registry::new();
        indexer
            .index_source(&nested_source(pkg.as_deref(), &path), "Gen.java", &mut registry)
            .expect("index");

        prop_assert!(registry.contains_class(&expected));
        prop_assert_eq!(registry.class_count(), path.len());
    }

    #[test]
    fn calls_are_recorded_in_source_order(count in 1usize..20) {
        let body: String = (0..count).map(|i| format!("c{i}();\n")).collect();
        let source = format!("class Seq {{ void run() {{\n{body}}} }}");

        let mut indexer = Indexer::new().expect("indexer");
        let mut registry = Registry::new();
        indexer.index_source(&source, "Seq.java", &mut registry).expect("index");

        let run = &registry.class("Seq").expect("Seq").overloads("run")[0];
        let names: Vec<_> = run.calls.iter().map(|c| c.name.clone()).collect();
        let expected: Vec<_> = (0..count).map(|i| format!("c{i}")).collect();
        prop_assert_eq!(names, expected);
    }
}
