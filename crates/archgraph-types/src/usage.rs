use std::collections::HashSet;

use archgraph_signature::BaseType;

use crate::class::{ClassId, ClassKind};
use crate::classes::ImportedClasses;

/// Identifies a type parameter by its declaring class and its position in that class's list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamId {
    pub owner: ClassId,
    pub index: u32,
}

/// A declared type parameter, e.g. `T extends Comparable<T>`.
///
/// Bounds are never empty: a parameter declared without bounds is bounded by
/// `java.lang.Object`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameter {
    id: TypeParamId,
    name: String,
    bounds: Vec<TypeUsage>,
}

impl TypeParameter {
    pub fn new(id: TypeParamId, name: impl Into<String>, bounds: Vec<TypeUsage>) -> Self {
        debug_assert!(!bounds.is_empty(), "type parameters always carry a bound");
        Self {
            id,
            name: name.into(),
            bounds,
        }
    }

    pub fn id(&self) -> TypeParamId {
        self.id
    }

    pub fn owner(&self) -> ClassId {
        self.id.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[TypeUsage] {
        &self.bounds
    }

    /// Renders the declaration in signature grammar, e.g. `T:Ljava/lang/Object;`.
    ///
    /// Interface-only bounds get the leading empty class bound (`T::Ljava/io/Serializable;`).
    pub fn to_signature(&self, classes: &ImportedClasses) -> String {
        let mut out = format!("{}:", self.name);
        for (idx, bound) in self.bounds.iter().enumerate() {
            let is_interface = bound
                .class_id()
                .and_then(|id| classes.class(id))
                .and_then(|class| class.kind())
                == Some(ClassKind::Interface);
            if idx > 0 || is_interface {
                out.push(':');
            }
            bound.write_signature(classes, &mut out);
        }
        out
    }
}

/// A type as used in a signature: a bound, a type argument, a supertype.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeUsage {
    /// A raw class reference.
    Class(ClassId),
    Parameterized(ParameterizedTypeUsage),
    TypeVariable(TypeVariableUsage),
    Wildcard(WildcardUsage),
    /// An array of the wrapped component type.
    Array(Box<TypeUsage>),
}

/// A class reference with type arguments, e.g. `Map<String, T>`.
///
/// `args` is non-empty unless the class is a nested class of a parameterized `outer` type
/// that is itself used raw (`Outer<String>.Inner`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterizedTypeUsage {
    pub class: ClassId,
    pub args: Vec<TypeUsage>,
    /// The parameterized enclosing type for nested classes, e.g. `Outer<A>` in
    /// `Outer<A>.Inner<B>`.
    pub outer: Option<Box<TypeUsage>>,
}

/// A reference to a declared type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVariableUsage {
    pub param: TypeParamId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardUsage {
    /// `?`
    Unbounded,
    /// `? extends T`
    Extends(Box<TypeUsage>),
    /// `? super T`
    Super(Box<TypeUsage>),
}

impl TypeUsage {
    pub fn class(id: ClassId) -> Self {
        TypeUsage::Class(id)
    }

    pub fn parameterized(id: ClassId, args: Vec<TypeUsage>) -> Self {
        TypeUsage::Parameterized(ParameterizedTypeUsage {
            class: id,
            args,
            outer: None,
        })
    }

    /// The referenced class for class and parameterized usages.
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            TypeUsage::Class(id) => Some(*id),
            TypeUsage::Parameterized(p) => Some(p.class),
            _ => None,
        }
    }

    pub fn type_arguments(&self) -> &[TypeUsage] {
        match self {
            TypeUsage::Parameterized(p) => &p.args,
            _ => &[],
        }
    }

    pub fn component_type(&self) -> Option<&TypeUsage> {
        match self {
            TypeUsage::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn array_dimensions(&self) -> usize {
        let mut dims = 0;
        let mut ty = self;
        while let TypeUsage::Array(component) = ty {
            dims += 1;
            ty = component;
        }
        dims
    }

    pub fn as_type_variable(&self) -> Option<&TypeVariableUsage> {
        match self {
            TypeUsage::TypeVariable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&WildcardUsage> {
        match self {
            TypeUsage::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    /// The erased form: a raw class, or an array of erased components.
    ///
    /// Type variables erase to the erasure of their first bound, wildcards to their upper bound.
    /// Cycles through type-variable bounds (only possible in malformed input) erase to
    /// `java.lang.Object`.
    pub fn erasure(&self, classes: &ImportedClasses) -> TypeUsage {
        self.erasure_inner(classes, &mut HashSet::new())
    }

    fn erasure_inner(&self, classes: &ImportedClasses, seen: &mut HashSet<TypeParamId>) -> TypeUsage {
        let object = TypeUsage::Class(classes.well_known().object);
        match self {
            TypeUsage::Class(id) => TypeUsage::Class(*id),
            TypeUsage::Parameterized(p) => TypeUsage::Class(p.class),
            TypeUsage::TypeVariable(var) => {
                if !seen.insert(var.param) {
                    return object;
                }
                classes
                    .type_parameter(var.param)
                    .and_then(|param| param.bounds().first())
                    .map(|bound| bound.erasure_inner(classes, seen))
                    .unwrap_or(object)
            }
            TypeUsage::Wildcard(WildcardUsage::Extends(upper)) => upper.erasure_inner(classes, seen),
            TypeUsage::Wildcard(_) => object,
            TypeUsage::Array(component) => {
                TypeUsage::Array(Box::new(component.erasure_inner(classes, seen)))
            }
        }
    }

    /// Renders this usage in signature grammar, e.g. `Ljava/util/List<TT;>;`.
    pub fn to_signature(&self, classes: &ImportedClasses) -> String {
        let mut out = String::new();
        self.write_signature(classes, &mut out);
        out
    }

    pub(crate) fn write_signature(&self, classes: &ImportedClasses, out: &mut String) {
        match self {
            TypeUsage::Class(id) => {
                if let Some(base) = primitive(classes, *id) {
                    out.push(base.descriptor());
                    return;
                }
                out.push('L');
                out.push_str(&internal_name(classes, *id));
                out.push(';');
            }
            TypeUsage::Parameterized(p) => {
                write_parameterized(p, classes, out);
                out.push(';');
            }
            TypeUsage::TypeVariable(var) => {
                out.push('T');
                out.push_str(&var.name);
                out.push(';');
            }
            TypeUsage::Wildcard(WildcardUsage::Unbounded) => out.push('*'),
            TypeUsage::Wildcard(WildcardUsage::Extends(bound)) => {
                out.push('+');
                bound.write_signature(classes, out);
            }
            TypeUsage::Wildcard(WildcardUsage::Super(bound)) => {
                out.push('-');
                bound.write_signature(classes, out);
            }
            TypeUsage::Array(component) => {
                out.push('[');
                component.write_signature(classes, out);
            }
        }
    }
}

/// Writes `Lpkg/Outer<..>.Inner<..>` without the terminating `;`.
fn write_parameterized(p: &ParameterizedTypeUsage, classes: &ImportedClasses, out: &mut String) {
    let name = classes
        .class(p.class)
        .map(|c| c.name().to_string())
        .unwrap_or_default();
    let outer = p.outer.as_deref().and_then(|outer| match outer {
        TypeUsage::Parameterized(outer) => Some(outer),
        _ => None,
    });
    match outer {
        Some(outer) => {
            write_parameterized(outer, classes, out);
            let outer_name = classes
                .class(outer.class)
                .map(|c| c.name().to_string())
                .unwrap_or_default();
            let segment = name
                .strip_prefix(outer_name.as_str())
                .and_then(|rest| rest.strip_prefix('$'))
                .unwrap_or(&name);
            out.push('.');
            out.push_str(segment);
        }
        None => {
            out.push('L');
            out.push_str(&name.replace('.', "/"));
        }
    }
    if !p.args.is_empty() {
        out.push('<');
        for arg in &p.args {
            arg.write_signature(classes, out);
        }
        out.push('>');
    }
}

fn internal_name(classes: &ImportedClasses, id: ClassId) -> String {
    classes
        .class(id)
        .map(|c| c.internal_name())
        .unwrap_or_default()
}

fn primitive(classes: &ImportedClasses, id: ClassId) -> Option<BaseType> {
    let class = classes.class(id)?;
    if class.kind() != Some(ClassKind::Primitive) {
        return None;
    }
    BaseType::from_java_name(class.name())
}
