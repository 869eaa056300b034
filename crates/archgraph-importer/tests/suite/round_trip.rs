use archgraph_importer::{ClassFileImporter, ClassRecord};
use archgraph_signature::parse_class_signature;
use archgraph_test_utils::fixtures;
use archgraph_types::ImportedClasses;
use pretty_assertions::assert_eq;

/// Renders a class's imported signature back into grammar form.
fn render(classes: &ImportedClasses, name: &str) -> String {
    let class = classes.get(name).unwrap();
    let mut out = String::new();
    if !class.type_parameters().is_empty() {
        out.push('<');
        for param in class.type_parameters() {
            out.push_str(&param.to_signature(classes));
        }
        out.push('>');
    }
    match class.generic_super_class() {
        Some(super_class) => out.push_str(&super_class.to_signature(classes)),
        None => out.push_str("Ljava/lang/Object;"),
    }
    for iface in class.generic_interfaces() {
        out.push_str(&iface.to_signature(classes));
    }
    out
}

#[test]
fn imported_signatures_render_back_to_their_source() {
    let records: Vec<ClassRecord> = fixtures::jdk_records()
        .into_iter()
        .chain(fixtures::generic_records())
        .collect();
    let classes = ClassFileImporter::new().import_classes(records.clone());

    for record in records {
        let Some(signature) = record.signature.as_deref() else {
            continue;
        };
        let name = record.name.replace('/', ".");
        let rendered = render(&classes, &name);

        assert_eq!(rendered, signature, "{name}");
        assert!(parse_class_signature(&rendered).is_ok());
    }
}

#[test]
fn interface_first_bound_renders_with_empty_class_bound() {
    let classes = ClassFileImporter::new().import_classes(
        fixtures::jdk_records()
            .into_iter()
            .chain(fixtures::generic_record(fixtures::SELF_REFERENCE)),
    );
    let class = classes.get(fixtures::SELF_REFERENCE).unwrap();
    assert_eq!(
        class.type_parameters()[0].to_signature(&classes),
        "T::Ljava/lang/Comparable<TT;>;"
    );
}

#[test]
fn stubbed_interface_bound_renders_as_class_bound() {
    // Without the JDK the bound's kind is unknown, so it comes back as a class bound.
    let classes = ClassFileImporter::new().import_classes(vec![ClassRecord::class(
        "com/example/Task",
    )
    .with_signature("<T::Ljava/lang/Runnable;>Ljava/lang/Object;")]);
    let rendered = render(&classes, "com.example.Task");
    assert_eq!(rendered, "<T:Ljava/lang/Runnable;>Ljava/lang/Object;");

    let original = parse_class_signature("<T::Ljava/lang/Runnable;>Ljava/lang/Object;").unwrap();
    let reparsed = parse_class_signature(&rendered).unwrap();
    let bounds = |sig: &archgraph_signature::ClassSignature| -> Vec<String> {
        sig.type_params[0].bounds().map(ToString::to_string).collect()
    };
    assert_eq!(bounds(&reparsed), bounds(&original));
}
