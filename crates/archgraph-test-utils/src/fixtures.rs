use std::collections::HashMap;

use archgraph_importer::ClassRecord;
use archgraph_types::binary_name;

pub const GENERICS: &str = "com.example.generics";

pub const WITHOUT_TYPE_PARAMETERS: &str = "com.example.generics.ClassWithoutTypeParameters";
pub const SINGLE_UNBOUNDED: &str = "com.example.generics.ClassWithSingleTypeParameterWithoutBound";
pub const THREE_UNBOUNDED: &str = "com.example.generics.ClassWithThreeTypeParametersWithoutBounds";
pub const SIMPLE_BOUND: &str = "com.example.generics.ClassWithSimpleBound";
pub const MULTIPLE_SIMPLE_BOUNDS: &str = "com.example.generics.ClassWithMultipleSimpleBounds";
pub const CLASS_AND_INTERFACE_BOUNDS: &str = "com.example.generics.ClassWithClassAndInterfaceBounds";
pub const INTERFACE_ONLY_BOUNDS: &str = "com.example.generics.ClassWithInterfaceOnlyBounds";
pub const BOX: &str = "com.example.generics.Box";
pub const PARAMETERIZED_BOUND: &str = "com.example.generics.ClassWithParameterizedBound";
pub const SELF_REFERENCE: &str = "com.example.generics.ClassWithSelfReferencingBound";
pub const MUTUAL_REFERENCE: &str = "com.example.generics.ClassWithMutuallyReferencingBounds";
pub const WILDCARDS: &str = "com.example.generics.ClassWithWildcardBounds";
pub const TYPE_VARIABLE_BOUNDS: &str = "com.example.generics.ClassWithTypeVariableBounds";
pub const EXTERNAL_BOUND: &str = "com.example.generics.ClassWithExternalBound";
pub const GENERIC_SUPERTYPES: &str = "com.example.generics.ClassWithGenericSupertypes";
pub const NESTED_BOUND: &str = "com.example.generics.ClassWithNestedBound";
pub const OUTER: &str = "com.example.generics.Outer";
pub const OUTER_INNER: &str = "com.example.generics.Outer$Inner";
pub const INNER_USING_OUTER_VARIABLE: &str = "com.example.generics.Outer$Member";
pub const DUPLICATE_BOUNDS: &str = "com.example.generics.ClassWithDuplicateBounds";

/// Not part of [`generic_records`]; only reachable through [`jdk_resolver`].
pub const EXTERNAL_FUNCTION: &str = "com.example.base.Function";

/// JDK classes referenced by the generic fixtures.
pub fn jdk_records() -> Vec<ClassRecord> {
    vec![
        ClassRecord::class("java/lang/Object"),
        ClassRecord::class("java/lang/String")
            .implements("java/io/Serializable")
            .implements("java/lang/Comparable")
            .with_signature(
                "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;",
            ),
        ClassRecord::class("java/lang/System"),
        ClassRecord::class("java/io/File")
            .implements("java/io/Serializable")
            .implements("java/lang/Comparable")
            .with_signature(
                "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/io/File;>;",
            ),
        ClassRecord::interface("java/io/Serializable"),
        ClassRecord::interface("java/lang/Runnable"),
        ClassRecord::interface("java/lang/AutoCloseable"),
        ClassRecord::interface("java/io/Closeable").implements("java/lang/AutoCloseable"),
        ClassRecord::interface("java/lang/Comparable")
            .with_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassRecord::interface("java/lang/Iterable")
            .with_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassRecord::interface("java/util/Map")
            .with_signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassRecord::interface("java/util/List")
            .implements("java/lang/Iterable")
            .with_signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;"),
        ClassRecord::class("java/lang/Number").implements("java/io/Serializable"),
        ClassRecord::class("java/lang/Integer")
            .extends("java/lang/Number")
            .implements("java/lang/Comparable")
            .with_signature("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Integer;>;"),
        ClassRecord::class("java/lang/Long")
            .extends("java/lang/Number")
            .implements("java/lang/Comparable")
            .with_signature("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Long;>;"),
        ClassRecord::new("java/lang/Enum", 0x0421)
            .extends("java/lang/Object")
            .implements("java/lang/Comparable")
            .implements("java/io/Serializable")
            .with_signature(
                "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
            ),
    ]
}

/// Generic classes in [`GENERICS`], one per signature shape.
pub fn generic_records() -> Vec<ClassRecord> {
    vec![
        ClassRecord::class("com/example/generics/ClassWithoutTypeParameters"),
        ClassRecord::class("com/example/generics/ClassWithSingleTypeParameterWithoutBound")
            .with_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassRecord::class("com/example/generics/ClassWithThreeTypeParametersWithoutBounds")
            .with_signature(
                "<A:Ljava/lang/Object;B:Ljava/lang/Object;C:Ljava/lang/Object;>Ljava/lang/Object;",
            ),
        ClassRecord::class("com/example/generics/ClassWithSimpleBound")
            .with_signature("<T:Ljava/lang/String;>Ljava/lang/Object;"),
        ClassRecord::class("com/example/generics/ClassWithMultipleSimpleBounds").with_signature(
            "<A:Ljava/lang/String;B:Ljava/lang/System;C:Ljava/io/File;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithClassAndInterfaceBounds").with_signature(
            "<T:Ljava/lang/String;:Ljava/io/Serializable;:Ljava/lang/Runnable;:Ljava/io/Closeable;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithInterfaceOnlyBounds").with_signature(
            "<T::Ljava/io/Serializable;:Ljava/lang/Runnable;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/Box")
            .with_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassRecord::class("com/example/generics/ClassWithParameterizedBound").with_signature(
            "<T:Lcom/example/generics/Box<Ljava/lang/String;>;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithSelfReferencingBound")
            .with_signature("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;"),
        ClassRecord::class("com/example/generics/ClassWithMutuallyReferencingBounds").with_signature(
            "<A:Ljava/util/List<TB;>;B:Ljava/util/Map<TA;TB;>;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithWildcardBounds").with_signature(
            "<A:Ljava/util/List<*>;B:Ljava/util/Map<+Ljava/lang/Number;-Ljava/lang/Integer;>;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithTypeVariableBounds").with_signature(
            "<A:Ljava/lang/Object;B:TA;C:[TA;D:[[Ljava/lang/String;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithExternalBound").with_signature(
            "<T:Lcom/example/base/Function<Ljava/lang/String;Ljava/lang/Long;>;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithGenericSupertypes")
            .extends("com/example/generics/Box")
            .implements("java/lang/Iterable")
            .implements("java/lang/Comparable")
            .with_signature(
                "<T:Ljava/lang/Object;>Lcom/example/generics/Box<TT;>;Ljava/lang/Iterable<TT;>;Ljava/lang/Comparable<Lcom/example/generics/ClassWithGenericSupertypes<TT;>;>;",
            ),
        // Listed before its outer class; nested classes are built after their enclosing ones.
        ClassRecord::class("com/example/generics/Outer$Member")
            .extends("com/example/generics/Box")
            .with_signature("<M:TO;>Lcom/example/generics/Box<TO;>;"),
        ClassRecord::class("com/example/generics/Outer")
            .with_signature("<O:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassRecord::class("com/example/generics/Outer$Inner")
            .with_signature("<I:Ljava/lang/Object;>Ljava/lang/Object;"),
        ClassRecord::class("com/example/generics/ClassWithDuplicateBounds").with_signature(
            "<T::Ljava/io/Serializable;:Ljava/io/Serializable;>Ljava/lang/Object;",
        ),
        ClassRecord::class("com/example/generics/ClassWithNestedBound").with_signature(
            "<T:Lcom/example/generics/Outer<Ljava/lang/String;>.Inner<Ljava/lang/Integer;>;>Ljava/lang/Object;",
        ),
    ]
}

/// Classes outside the imported set, available to dependency completion.
pub fn external_records() -> Vec<ClassRecord> {
    vec![ClassRecord::interface("com/example/base/Function")
        .with_signature("<T:Ljava/lang/Object;R:Ljava/lang/Object;>Ljava/lang/Object;")]
}

/// The single generic fixture named `name` (binary or internal form).
pub fn generic_record(name: &str) -> Option<ClassRecord> {
    let name = binary_name(name);
    generic_records()
        .into_iter()
        .find(|record| binary_name(&record.name) == name)
}

/// A resolver over the JDK and external fixtures, keyed by binary name.
pub fn jdk_resolver() -> HashMap<String, ClassRecord> {
    jdk_records()
        .into_iter()
        .chain(external_records())
        .map(|record| (binary_name(&record.name).into_owned(), record))
        .collect()
}
