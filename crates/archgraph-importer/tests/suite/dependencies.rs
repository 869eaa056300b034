use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use archgraph_config::ImportConfig;
use archgraph_importer::{ClassFileImporter, ClassRecord};
use archgraph_test_utils::fixtures::{self, EXTERNAL_BOUND, EXTERNAL_FUNCTION};
use archgraph_test_utils::{assert_type_parameters, init_test_tracing};
use archgraph_types::{ClassKind, ClassPool, OBJECT};
use pretty_assertions::assert_eq;

fn resolving(max_resolution_iterations: u32) -> ImportConfig {
    ImportConfig {
        resolve_missing_dependencies: true,
        max_resolution_iterations,
        ..ImportConfig::default()
    }
}

#[test]
fn resolver_completes_stubbed_dependencies() {
    init_test_tracing();
    let importer =
        ClassFileImporter::with_config(resolving(5)).with_resolver(fixtures::jdk_resolver());
    let pool = ClassPool::new();
    let records = fixtures::generic_record(EXTERNAL_BOUND).into_iter().collect();
    let summary = importer.import_into(&pool, records);
    let classes = pool.freeze();

    let function = classes.get(EXTERNAL_FUNCTION).unwrap();
    assert!(!function.is_stub());
    assert_eq!(function.kind(), Some(ClassKind::Interface));
    assert_type_parameters(function, &["T", "R"]);

    // Pulled in transitively: Long -> Number -> Serializable, Comparable.
    for name in [
        OBJECT,
        "java.lang.String",
        "java.lang.Long",
        "java.lang.Number",
        "java.io.Serializable",
        "java.lang.Comparable",
    ] {
        assert!(classes.contains(name), "{name} should be resolved");
    }
    assert_eq!(classes.stubs().count(), 0);
    assert_eq!(summary.stubs, 0);
    assert!(summary.resolution_rounds >= 2);
    assert_eq!(summary.imported, 1 + summary.resolved_dependencies);
}

#[test]
fn completion_is_bounded_by_max_iterations() {
    let importer =
        ClassFileImporter::with_config(resolving(1)).with_resolver(fixtures::jdk_resolver());
    let classes = importer.import_classes(fixtures::generic_record(EXTERNAL_BOUND));

    // First round: the classes named by the signature and Object.
    assert!(classes.contains(EXTERNAL_FUNCTION));
    assert!(classes.contains("java.lang.Long"));
    // Discovered in the first round, never offered to the resolver.
    assert!(classes.get("java.lang.Number").unwrap().is_stub());
}

#[test]
fn completion_is_off_by_default() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let resolver = move |_: &str| -> Option<ClassRecord> {
        counter.fetch_add(1, Ordering::SeqCst);
        None
    };
    let importer = ClassFileImporter::new().with_resolver(resolver);

    let classes = importer.import_classes(fixtures::generic_record(EXTERNAL_BOUND));
    assert!(classes.get(EXTERNAL_FUNCTION).unwrap().is_stub());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_classes_stay_stubs_and_are_asked_for_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let resolver = move |name: &str| -> Option<ClassRecord> {
        counter.fetch_add(1, Ordering::SeqCst);
        (name == "com.example.Known").then(|| ClassRecord::class("com/example/Known"))
    };
    let importer = ClassFileImporter::with_config(resolving(10)).with_resolver(resolver);

    let classes = importer.import_classes(vec![ClassRecord::class("com/example/Root")
        .implements("com/example/Known")
        .implements("com/example/Missing")]);

    assert!(classes.contains("com.example.Known"));
    assert!(classes.get("com.example.Missing").unwrap().is_stub());
    // Object, Known, Missing; the second round finds nothing new.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(classes.diagnostics().next().is_none());
}
