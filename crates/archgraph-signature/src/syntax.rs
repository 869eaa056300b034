//! Syntax tree for JVM generic signatures.
//!
//! Nodes mirror the grammar productions one-to-one. Class names are kept in the internal
//! (slash-separated) form they have in the signature; [`ClassTypeSignature::binary_name`]
//! converts to the dotted form used as a lookup key by the class model.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub const ALL: [BaseType; 8] = [
        BaseType::Byte,
        BaseType::Char,
        BaseType::Double,
        BaseType::Float,
        BaseType::Int,
        BaseType::Long,
        BaseType::Short,
        BaseType::Boolean,
    ];

    pub fn from_descriptor(code: u8) -> Option<Self> {
        Some(match code {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn descriptor(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    /// The Java keyword naming this type, e.g. `int`.
    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }

    pub fn from_java_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.java_name() == name)
    }
}

/// `ClassSignature := [TypeParams] SuperclassSig InterfaceSig*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_params: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

/// `MethodSignature := [TypeParams] '(' JavaTypeSig* ')' Result ThrowsSig*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<FieldTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    /// Byte offset of the parameter name in the raw signature.
    pub offset: usize,
    pub class_bound: Option<FieldTypeSignature>,
    pub interface_bounds: Vec<FieldTypeSignature>,
}

impl TypeParameter {
    /// All written bounds in declaration order: the class bound (if any) followed by the
    /// interface bounds.
    pub fn bounds(&self) -> impl Iterator<Item = &FieldTypeSignature> {
        self.class_bound.iter().chain(self.interface_bounds.iter())
    }
}

/// A reference type signature (`RefTypeSig`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTypeSignature {
    Class(ClassTypeSignature),
    TypeVariable(TypeVariableSignature),
    Array(Box<TypeSignature>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVariableSignature {
    pub name: String,
    /// Byte offset of the leading `T` marker in the raw signature.
    pub offset: usize,
}

/// Any Java type: a primitive or a reference type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Reference(FieldTypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// Slash-separated package prefix, empty for the default package.
    pub package: String,
    /// The outermost class followed by each nested class segment. Never empty.
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub fn binary_name(&self) -> String {
        let mut out = String::new();
        if !self.package.is_empty() {
            out.push_str(&self.package.replace('/', "."));
            out.push('.');
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                out.push('$');
            }
            out.push_str(&segment.name);
        }
        out
    }

    /// Whether any segment carries type arguments.
    pub fn is_parameterized(&self) -> bool {
        self.segments.iter().any(|s| !s.type_args.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleClassTypeSignature {
    pub name: String,
    pub type_args: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    Exact(FieldTypeSignature),
    /// `+`
    Extends(FieldTypeSignature),
    /// `-`
    Super(FieldTypeSignature),
}
