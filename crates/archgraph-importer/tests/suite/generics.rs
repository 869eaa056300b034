use archgraph_importer::{ClassFileImporter, ClassRecord, UNRESOLVED_TYPE_VARIABLE};
use archgraph_test_utils::fixtures::{self, *};
use archgraph_test_utils::{
    array_of, assert_bounds, assert_type_parameters, class, parameterized, type_variable,
    wildcard, wildcard_extends, wildcard_super,
};
use archgraph_types::{ImportedClasses, TypeUsage, OBJECT};
use pretty_assertions::assert_eq;

fn import_with_jdk(names: &[&str]) -> ImportedClasses {
    let records = fixtures::jdk_records()
        .into_iter()
        .chain(names.iter().filter_map(|name| fixtures::generic_record(name)));
    ClassFileImporter::new().import_classes(records)
}

fn import_without_jdk(names: &[&str]) -> ImportedClasses {
    let records = names.iter().filter_map(|name| fixtures::generic_record(name));
    ClassFileImporter::new().import_classes(records)
}

#[test]
fn class_without_signature_has_no_type_parameters() {
    let classes = import_with_jdk(&[WITHOUT_TYPE_PARAMETERS]);
    let class = classes.get(WITHOUT_TYPE_PARAMETERS).unwrap();
    assert!(!class.is_stub());
    assert_type_parameters(class, &[]);
    assert!(class.diagnostics().is_empty());
}

#[test]
fn single_parameter_without_bound_is_bounded_by_object() {
    let classes = import_with_jdk(&[SINGLE_UNBOUNDED]);
    let class = classes.get(SINGLE_UNBOUNDED).unwrap();
    assert_type_parameters(class, &["T"]);
    assert_bounds(&classes, &class.type_parameters()[0], &[self::class(OBJECT)]);
}

#[test]
fn parameters_keep_declaration_order() {
    let classes = import_with_jdk(&[THREE_UNBOUNDED]);
    let class = classes.get(THREE_UNBOUNDED).unwrap();
    assert_type_parameters(class, &["A", "B", "C"]);
    for param in class.type_parameters() {
        assert_eq!(param.owner(), class.id());
        assert_bounds(&classes, param, &[self::class(OBJECT)]);
    }
}

#[test]
fn simple_class_bound() {
    let classes = import_with_jdk(&[SIMPLE_BOUND]);
    let class = classes.get(SIMPLE_BOUND).unwrap();
    assert_type_parameters(class, &["T"]);
    assert_bounds(
        &classes,
        &class.type_parameters()[0],
        &[self::class("java.lang.String")],
    );
}

#[test]
fn multiple_parameters_with_simple_bounds() {
    let classes = import_with_jdk(&[MULTIPLE_SIMPLE_BOUNDS]);
    let class = classes.get(MULTIPLE_SIMPLE_BOUNDS).unwrap();
    assert_type_parameters(class, &["A", "B", "C"]);

    let expected = ["java.lang.String", "java.lang.System", "java.io.File"];
    for (param, name) in class.type_parameters().iter().zip(expected) {
        assert_bounds(&classes, param, &[self::class(name)]);
        let bound = classes.class(param.bounds()[0].class_id().unwrap()).unwrap();
        assert!(!bound.is_stub(), "{name} was imported");
    }
}

#[test]
fn class_and_interface_bounds_keep_declaration_order() {
    let classes = import_with_jdk(&[CLASS_AND_INTERFACE_BOUNDS]);
    let class = classes.get(CLASS_AND_INTERFACE_BOUNDS).unwrap();
    assert_bounds(
        &classes,
        &class.type_parameters()[0],
        &[
            self::class("java.lang.String"),
            self::class("java.io.Serializable"),
            self::class("java.lang.Runnable"),
            self::class("java.io.Closeable"),
        ],
    );
}

#[test]
fn interface_only_bounds_have_no_implicit_object() {
    let classes = import_with_jdk(&[INTERFACE_ONLY_BOUNDS]);
    let class = classes.get(INTERFACE_ONLY_BOUNDS).unwrap();
    assert_bounds(
        &classes,
        &class.type_parameters()[0],
        &[
            self::class("java.io.Serializable"),
            self::class("java.lang.Runnable"),
        ],
    );
}

#[test]
fn parameterized_bound_with_concrete_argument() {
    let classes = import_with_jdk(&[BOX, PARAMETERIZED_BOUND]);
    let class = classes.get(PARAMETERIZED_BOUND).unwrap();
    let param = &class.type_parameters()[0];
    assert_bounds(
        &classes,
        param,
        &[parameterized(BOX).with_type_arguments([self::class("java.lang.String")])],
    );

    let TypeUsage::Parameterized(bound) = &param.bounds()[0] else {
        panic!("expected parameterized bound");
    };
    assert_eq!(bound.class, classes.lookup(BOX).unwrap());
    assert_eq!(bound.outer, None);
    assert!(!classes.class(bound.class).unwrap().is_stub());
}

#[test]
fn self_referencing_bound_points_back_at_its_parameter() {
    let classes = import_with_jdk(&[SELF_REFERENCE]);
    let class = classes.get(SELF_REFERENCE).unwrap();
    let param = &class.type_parameters()[0];
    assert_bounds(
        &classes,
        param,
        &[parameterized("java.lang.Comparable").with_type_arguments([type_variable("T")])],
    );

    let var = param.bounds()[0].type_arguments()[0]
        .as_type_variable()
        .unwrap();
    assert_eq!(var.param, param.id());
    let referenced = classes.type_parameter(var.param).unwrap();
    assert!(std::ptr::eq(referenced, param));
}

#[test]
fn mutually_referencing_bounds_resolve() {
    let classes = import_with_jdk(&[MUTUAL_REFERENCE]);
    let class = classes.get(MUTUAL_REFERENCE).unwrap();
    let [a, b] = class.type_parameters() else {
        panic!("expected two type parameters");
    };
    assert_bounds(
        &classes,
        a,
        &[parameterized("java.util.List").with_type_arguments([type_variable("B")])],
    );
    assert_bounds(
        &classes,
        b,
        &[parameterized("java.util.Map")
            .with_type_arguments([type_variable("A"), type_variable("B")])],
    );

    let from_a = a.bounds()[0].type_arguments()[0].as_type_variable().unwrap();
    assert!(std::ptr::eq(classes.type_parameter(from_a.param).unwrap(), b));
    let from_b = b.bounds()[0].type_arguments()[1].as_type_variable().unwrap();
    assert!(std::ptr::eq(classes.type_parameter(from_b.param).unwrap(), b));
}

#[test]
fn wildcard_bounds() {
    let classes = import_with_jdk(&[WILDCARDS]);
    let class = classes.get(WILDCARDS).unwrap();
    let params = class.type_parameters();
    assert_bounds(
        &classes,
        &params[0],
        &[parameterized("java.util.List").with_type_arguments([wildcard()])],
    );
    assert_bounds(
        &classes,
        &params[1],
        &[parameterized("java.util.Map").with_type_arguments([
            wildcard_extends(self::class("java.lang.Number")),
            wildcard_super(self::class("java.lang.Integer")),
        ])],
    );
}

#[test]
fn type_variable_and_array_bounds() {
    let classes = import_with_jdk(&[TYPE_VARIABLE_BOUNDS]);
    let class = classes.get(TYPE_VARIABLE_BOUNDS).unwrap();
    assert_type_parameters(class, &["A", "B", "C", "D"]);
    let params = class.type_parameters();
    assert_bounds(&classes, &params[1], &[type_variable("A")]);
    assert_bounds(&classes, &params[2], &[array_of(type_variable("A"))]);
    assert_bounds(
        &classes,
        &params[3],
        &[array_of(array_of(self::class("java.lang.String")))],
    );

    // Type variables stay variables; they are not replaced by their bound.
    let b_bound = params[1].bounds()[0].as_type_variable().unwrap();
    assert_eq!(b_bound.param, params[0].id());
    assert_eq!(
        params[2].bounds()[0].erasure(&classes),
        TypeUsage::Array(Box::new(TypeUsage::Class(classes.lookup(OBJECT).unwrap())))
    );
}

#[test]
fn referenced_classes_outside_the_import_are_stubs() {
    let classes = import_without_jdk(&[EXTERNAL_BOUND, MULTIPLE_SIMPLE_BOUNDS]);

    let class = classes.get(EXTERNAL_BOUND).unwrap();
    assert!(class.diagnostics().is_empty());
    assert_bounds(
        &classes,
        &class.type_parameters()[0],
        &[parameterized(EXTERNAL_FUNCTION).with_type_arguments([
            self::class("java.lang.String"),
            self::class("java.lang.Long"),
        ])],
    );

    for name in [
        EXTERNAL_FUNCTION,
        "java.lang.String",
        "java.lang.Long",
        "java.lang.System",
        "java.io.File",
    ] {
        let stub = classes.get(name).unwrap();
        assert!(stub.is_stub(), "{name} should be a stub");
        assert_eq!(stub.super_class(), None);
        assert!(stub.interfaces().is_empty());
        assert!(stub.type_parameters().is_empty());
    }
    assert!(!classes.contains(EXTERNAL_FUNCTION));
    assert_eq!(classes.diagnostics().count(), 0);
}

#[test]
fn generic_supertypes_are_materialized() {
    let classes = import_with_jdk(&[BOX, GENERIC_SUPERTYPES]);
    let class = classes.get(GENERIC_SUPERTYPES).unwrap();

    assert_eq!(class.super_class(), classes.lookup(BOX));
    assert_eq!(
        class.interfaces(),
        &[
            classes.lookup("java.lang.Iterable").unwrap(),
            classes.lookup("java.lang.Comparable").unwrap(),
        ]
    );

    let t = &class.type_parameters()[0];
    let super_class = class.generic_super_class().unwrap();
    assert_eq!(super_class.class_id(), classes.lookup(BOX));
    assert_eq!(
        super_class.type_arguments()[0].as_type_variable().map(|v| v.param),
        Some(t.id())
    );

    let comparable = &class.generic_interfaces()[1];
    let self_type = &comparable.type_arguments()[0];
    assert_eq!(self_type.class_id(), Some(class.id()));
    assert_eq!(
        self_type.type_arguments()[0].as_type_variable().map(|v| v.param),
        Some(t.id())
    );
}

#[test]
fn interfaces_have_no_generic_superclass() {
    let classes = ClassFileImporter::new().import_classes(vec![ClassRecord::interface(
        "com/example/generics/Api",
    )
    .with_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")]);
    let api = classes.get("com.example.generics.Api").unwrap();
    assert_eq!(api.generic_super_class(), None);
    assert_type_parameters(api, &["T"]);
}

#[test]
fn nested_bound_carries_parameterized_outer() {
    let classes = import_with_jdk(&[OUTER, OUTER_INNER, NESTED_BOUND]);
    let class = classes.get(NESTED_BOUND).unwrap();
    let param = &class.type_parameters()[0];
    assert_bounds(
        &classes,
        param,
        &[parameterized(OUTER_INNER).with_type_arguments([self::class("java.lang.Integer")])],
    );

    let TypeUsage::Parameterized(inner) = &param.bounds()[0] else {
        panic!("expected parameterized bound");
    };
    let outer = inner.outer.as_deref().unwrap();
    assert_eq!(outer.class_id(), classes.lookup(OUTER));
    assert_eq!(
        outer.type_arguments(),
        &[TypeUsage::Class(classes.lookup("java.lang.String").unwrap())]
    );
    assert_eq!(classes.get(OUTER_INNER).unwrap().simple_name(), "Inner");
}

#[test]
fn inner_class_references_type_variable_of_its_outer_class() {
    let classes = import_with_jdk(&[INNER_USING_OUTER_VARIABLE, BOX, OUTER]);
    let outer = classes.get(OUTER).unwrap();
    let member = classes.get(INNER_USING_OUTER_VARIABLE).unwrap();
    assert!(member.diagnostics().is_empty(), "{:?}", member.diagnostics());
    assert_eq!(member.enclosing_class(), Some(outer.id()));

    assert_type_parameters(member, &["M"]);
    let param = &member.type_parameters()[0];
    assert_bounds(&classes, param, &[type_variable("O")]);
    let var = param.bounds()[0].as_type_variable().unwrap();
    assert_eq!(var.param, outer.type_parameters()[0].id());
    assert_eq!(
        param.bounds()[0].erasure(&classes),
        TypeUsage::Class(classes.lookup(OBJECT).unwrap())
    );

    let super_class = member.generic_super_class().unwrap();
    assert_eq!(super_class.type_arguments()[0].as_type_variable(), Some(var));
}

#[test]
fn type_variable_unknown_to_every_enclosing_class_is_unresolved() {
    let classes = ClassFileImporter::new().import_classes(
        fixtures::jdk_records()
            .into_iter()
            .chain(fixtures::generic_record(OUTER))
            .chain([ClassRecord::class("com/example/generics/Outer$Stray")
                .with_signature("<S:TX;>Ljava/lang/Object;")]),
    );
    let stray = classes.get("com.example.generics.Outer$Stray").unwrap();
    assert_type_parameters(stray, &[]);
    assert_eq!(stray.enclosing_class(), classes.lookup(OUTER));
    assert_eq!(stray.diagnostics()[0].code, UNRESOLVED_TYPE_VARIABLE);
}

#[test]
fn duplicate_bounds_are_preserved_in_order() {
    let classes = import_with_jdk(&[DUPLICATE_BOUNDS]);
    let class = classes.get(DUPLICATE_BOUNDS).unwrap();
    assert_type_parameters(class, &["T"]);
    let param = &class.type_parameters()[0];
    assert_bounds(
        &classes,
        param,
        &[
            self::class("java.io.Serializable"),
            self::class("java.io.Serializable"),
        ],
    );
    assert_eq!(
        param.to_signature(&classes),
        "T::Ljava/io/Serializable;:Ljava/io/Serializable;"
    );
}

#[test]
fn import_order_does_not_matter() {
    let forward = import_with_jdk(&[BOX, PARAMETERIZED_BOUND]);
    let records = fixtures::generic_records()
        .into_iter()
        .filter(|r| r.name.ends_with("ClassWithParameterizedBound") || r.name.ends_with("/Box"))
        .rev()
        .chain(fixtures::jdk_records().into_iter().rev());
    let backward = ClassFileImporter::new().import_classes(records);

    for classes in [&forward, &backward] {
        let class = classes.get(PARAMETERIZED_BOUND).unwrap();
        let bound = &class.type_parameters()[0].bounds()[0];
        let box_class = classes.class(bound.class_id().unwrap()).unwrap();
        assert_eq!(box_class.name(), BOX);
        assert!(!box_class.is_stub());
        assert_type_parameters(box_class, &["T"]);
    }
}
