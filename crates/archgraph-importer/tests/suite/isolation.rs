use archgraph_importer::{
    import_record, ClassFileImporter, ClassRecord, ImportOutcome, MALFORMED_SIGNATURE,
    UNRESOLVED_TYPE_VARIABLE,
};
use archgraph_signature::MAX_NESTING_DEPTH;
use archgraph_test_utils::fixtures::{self, SIMPLE_BOUND};
use archgraph_test_utils::{assert_type_parameters, init_test_tracing};
use archgraph_types::{ClassKind, ClassPool, Severity, Span};
use pretty_assertions::assert_eq;

#[test]
fn malformed_signature_degrades_only_its_class() {
    init_test_tracing();
    let records = fixtures::jdk_records()
        .into_iter()
        .chain(fixtures::generic_record(SIMPLE_BOUND))
        .chain([
            // Missing the `;` terminating the bound.
            ClassRecord::class("com/example/broken/Unterminated")
                .with_signature("<T:Ljava/lang/String>Ljava/lang/Object;"),
            ClassRecord::class("com/example/broken/EmptyArguments")
                .with_signature("<T:Ljava/util/List<>;>Ljava/lang/Object;"),
        ]);
    let classes = ClassFileImporter::new().import_classes(records);

    let healthy = classes.get(SIMPLE_BOUND).unwrap();
    assert_type_parameters(healthy, &["T"]);
    assert!(healthy.diagnostics().is_empty());

    let broken = classes.get("com.example.broken.Unterminated").unwrap();
    assert!(!broken.is_stub());
    assert_eq!(broken.kind(), Some(ClassKind::Class));
    assert_type_parameters(broken, &[]);
    let [diagnostic] = broken.diagnostics() else {
        panic!("expected one diagnostic: {:?}", broken.diagnostics());
    };
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.code, MALFORMED_SIGNATURE);
    assert_eq!(diagnostic.span, Some(Span::at(20)));

    let empty = classes.get("com.example.broken.EmptyArguments").unwrap();
    assert_eq!(empty.diagnostics()[0].span, Some(Span::at(19)));

    // Workers register classes in any order.
    let mut codes: Vec<_> = classes
        .diagnostics()
        .map(|(class, d)| (class.name(), d.code))
        .collect();
    codes.sort();
    assert_eq!(
        codes,
        vec![
            ("com.example.broken.EmptyArguments", MALFORMED_SIGNATURE),
            ("com.example.broken.Unterminated", MALFORMED_SIGNATURE),
        ]
    );
}

#[test]
fn deeply_nested_signature_degrades_only_its_class() {
    let deep_array = format!(
        "<T:{}Ljava/lang/Object;>Ljava/lang/Object;",
        "[".repeat(3000)
    );
    let deep_arguments = format!(
        "Ljava/lang/Object;Ljava/lang/Comparable<{}Ljava/lang/Object;{}>;",
        "Ljava/util/List<".repeat(60_000),
        ">;".repeat(60_000)
    );
    let records = fixtures::jdk_records()
        .into_iter()
        .chain(fixtures::generic_record(SIMPLE_BOUND))
        .chain([
            ClassRecord::class("com/example/broken/DeepArray").with_signature(deep_array),
            ClassRecord::class("com/example/broken/DeepArguments").with_signature(deep_arguments),
        ]);
    let classes = ClassFileImporter::new().import_classes(records);

    let healthy = classes.get(SIMPLE_BOUND).unwrap();
    assert_type_parameters(healthy, &["T"]);
    assert!(healthy.diagnostics().is_empty());

    let array = classes.get("com.example.broken.DeepArray").unwrap();
    assert_type_parameters(array, &[]);
    let [diagnostic] = array.diagnostics() else {
        panic!("expected one diagnostic: {:?}", array.diagnostics());
    };
    assert_eq!(diagnostic.code, MALFORMED_SIGNATURE);
    assert_eq!(diagnostic.span, Some(Span::at(3 + MAX_NESTING_DEPTH)));

    let arguments = classes.get("com.example.broken.DeepArguments").unwrap();
    assert_eq!(arguments.diagnostics()[0].code, MALFORMED_SIGNATURE);
    assert!(arguments.generic_interfaces().is_empty());
}

#[test]
fn undeclared_type_variable_is_a_class_diagnostic() {
    let classes = ClassFileImporter::new().import_classes(vec![ClassRecord::class(
        "com/example/broken/Dangling",
    )
    .with_signature("<T:Ljava/util/List<TU;>;>Ljava/lang/Object;")]);

    let class = classes.get("com.example.broken.Dangling").unwrap();
    assert_type_parameters(class, &[]);
    let diagnostic = &class.diagnostics()[0];
    assert_eq!(diagnostic.code, UNRESOLVED_TYPE_VARIABLE);
    assert_eq!(diagnostic.span, Some(Span::new(19, 22)));
    assert!(diagnostic.message.contains("`U`"), "{}", diagnostic.message);
}

#[test]
fn duplicate_type_parameter_names_are_malformed() {
    let classes = ClassFileImporter::new().import_classes(vec![ClassRecord::class(
        "com/example/broken/Twice",
    )
    .with_signature("<T:Ljava/lang/Object;T:Ljava/lang/Object;>Ljava/lang/Object;")]);

    let class = classes.get("com.example.broken.Twice").unwrap();
    assert_type_parameters(class, &[]);
    assert_eq!(class.diagnostics()[0].code, MALFORMED_SIGNATURE);
    assert_eq!(class.diagnostics()[0].span, Some(Span::at(21)));
}

#[test]
fn second_record_for_a_resolved_class_is_ignored() {
    init_test_tracing();
    let pool = ClassPool::new();
    let first = ClassRecord::class("com/example/Twin")
        .with_signature("<A:Ljava/lang/Object;>Ljava/lang/Object;");
    let second = ClassRecord::interface("com/example/Twin");

    assert_eq!(import_record(&pool, &first), ImportOutcome::Imported);
    assert_eq!(import_record(&pool, &second), ImportOutcome::Duplicate);

    let classes = pool.freeze();
    let twin = classes.get("com.example.Twin").unwrap();
    assert_eq!(twin.kind(), Some(ClassKind::Class));
    assert_type_parameters(twin, &["A"]);
    assert!(twin.diagnostics().is_empty());
}

#[test]
fn duplicate_records_in_one_batch_are_counted() {
    let pool = ClassPool::new();
    let summary = ClassFileImporter::new().import_into(
        &pool,
        vec![
            ClassRecord::class("com/example/Twin"),
            ClassRecord::class("com.example.Twin"),
        ],
    );
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.degraded, 0);
}

#[test]
fn imported_object_upgrades_the_preregistered_stub() {
    let pool = ClassPool::new();
    let object = pool.well_known().object;
    assert!(pool.is_stub(object));

    let outcome = import_record(&pool, &ClassRecord::class("java/lang/Object"));
    assert_eq!(outcome, ImportOutcome::Imported);
    assert!(!pool.is_stub(object));
    assert_eq!(pool.node(object).unwrap().super_class(), None);
}
