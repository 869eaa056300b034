use std::fmt;

use archgraph_types::{ClassNode, ImportedClasses, TypeParameter, TypeUsage, WildcardUsage};

/// Expected shape of a type usage, written in Java source notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundMatcher {
    Class(String),
    Parameterized { class: String, args: Vec<BoundMatcher> },
    TypeVariable(String),
    Wildcard,
    WildcardExtends(Box<BoundMatcher>),
    WildcardSuper(Box<BoundMatcher>),
    Array(Box<BoundMatcher>),
}

pub fn class(name: &str) -> BoundMatcher {
    BoundMatcher::Class(name.to_string())
}

/// Use [`BoundMatcher::with_type_arguments`] to add the expected arguments.
pub fn parameterized(name: &str) -> BoundMatcher {
    BoundMatcher::Parameterized {
        class: name.to_string(),
        args: Vec::new(),
    }
}

pub fn type_variable(name: &str) -> BoundMatcher {
    BoundMatcher::TypeVariable(name.to_string())
}

pub fn wildcard() -> BoundMatcher {
    BoundMatcher::Wildcard
}

pub fn wildcard_extends(bound: BoundMatcher) -> BoundMatcher {
    BoundMatcher::WildcardExtends(Box::new(bound))
}

pub fn wildcard_super(bound: BoundMatcher) -> BoundMatcher {
    BoundMatcher::WildcardSuper(Box::new(bound))
}

pub fn array_of(component: BoundMatcher) -> BoundMatcher {
    BoundMatcher::Array(Box::new(component))
}

impl BoundMatcher {
    pub fn with_type_arguments(self, args: impl IntoIterator<Item = BoundMatcher>) -> Self {
        match self {
            BoundMatcher::Class(class) | BoundMatcher::Parameterized { class, .. } => {
                BoundMatcher::Parameterized {
                    class,
                    args: args.into_iter().collect(),
                }
            }
            other => panic!("type arguments only apply to class matchers, not {other}"),
        }
    }

    pub fn matches(&self, usage: &TypeUsage, classes: &ImportedClasses) -> bool {
        self.to_string() == describe_usage(usage, classes)
    }
}

impl fmt::Display for BoundMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundMatcher::Class(name) => f.write_str(name),
            BoundMatcher::Parameterized { class, args } if args.is_empty() => f.write_str(class),
            BoundMatcher::Parameterized { class, args } => {
                write!(f, "{class}<")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            BoundMatcher::TypeVariable(name) => f.write_str(name),
            BoundMatcher::Wildcard => f.write_str("?"),
            BoundMatcher::WildcardExtends(bound) => write!(f, "? extends {bound}"),
            BoundMatcher::WildcardSuper(bound) => write!(f, "? super {bound}"),
            BoundMatcher::Array(component) => write!(f, "{component}[]"),
        }
    }
}

/// Renders `usage` the way [`BoundMatcher`] displays, e.g. `java.util.Map<?, ? extends T>`.
///
/// Nested classes render by binary name; the enclosing type's arguments are not shown, so a raw
/// inner class of a parameterized outer renders as a plain class.
pub fn describe_usage(usage: &TypeUsage, classes: &ImportedClasses) -> String {
    let class_name = |id| {
        classes
            .class(id)
            .map(|class| class.name().to_string())
            .unwrap_or_else(|| format!("<unknown {id:?}>"))
    };
    match usage {
        TypeUsage::Class(id) => class_name(*id),
        TypeUsage::Parameterized(p) if p.args.is_empty() => class_name(p.class),
        TypeUsage::Parameterized(p) => {
            let args: Vec<_> = p
                .args
                .iter()
                .map(|arg| describe_usage(arg, classes))
                .collect();
            format!("{}<{}>", class_name(p.class), args.join(", "))
        }
        TypeUsage::TypeVariable(var) => var.name.clone(),
        TypeUsage::Wildcard(WildcardUsage::Unbounded) => "?".to_string(),
        TypeUsage::Wildcard(WildcardUsage::Extends(bound)) => {
            format!("? extends {}", describe_usage(bound, classes))
        }
        TypeUsage::Wildcard(WildcardUsage::Super(bound)) => {
            format!("? super {}", describe_usage(bound, classes))
        }
        TypeUsage::Array(component) => format!("{}[]", describe_usage(component, classes)),
    }
}

#[track_caller]
pub fn assert_type_parameters(class: &ClassNode, expected: &[&str]) {
    let names: Vec<&str> = class.type_parameters().iter().map(|p| p.name()).collect();
    pretty_assertions::assert_eq!(
        names,
        expected,
        "type parameters of {}",
        class.name()
    );
}

#[track_caller]
pub fn assert_bounds(classes: &ImportedClasses, param: &TypeParameter, expected: &[BoundMatcher]) {
    let actual: Vec<String> = param
        .bounds()
        .iter()
        .map(|bound| describe_usage(bound, classes))
        .collect();
    let expected: Vec<String> = expected.iter().map(ToString::to_string).collect();
    pretty_assertions::assert_eq!(actual, expected, "bounds of type parameter {}", param.name());
}
