use archgraph_signature::{
    parse_class_signature, ClassSignature, ClassTypeSignature, FieldTypeSignature,
    SignatureError, TypeArgument, TypeSignature,
};
use archgraph_types::{
    ClassId, ClassPool, ParameterizedTypeUsage, TypeParamId, TypeParameter, TypeUsage,
    TypeVariableUsage, WildcardUsage,
};

use crate::cache::ReferenceCache;
use crate::error::{BuildError, Result};

/// The type graph of one class signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub super_class: TypeUsage,
    pub interfaces: Vec<TypeUsage>,
}

/// Parses `signature` and builds its type graph for the class `owner`, nested in `enclosing`.
pub fn build_class_signature(
    pool: &ClassPool,
    owner: ClassId,
    enclosing: Option<ClassId>,
    signature: &str,
) -> Result<BuiltSignature> {
    let sig = parse_class_signature(signature)?;
    TypeGraphBuilder::new(pool, owner)
        .with_enclosing(enclosing)
        .build(&sig)
}

/// Turns signature syntax into [`TypeUsage`]s linked to the class pool.
///
/// Every class name is resolved through the pool (registering stubs for unknown names). Type
/// variables resolve through the [`ReferenceCache`] of the owning declaration first, then
/// against the type parameters of the resolved enclosing classes, innermost first.
pub struct TypeGraphBuilder<'a> {
    pool: &'a ClassPool,
    owner: ClassId,
    enclosing: Option<ClassId>,
    cache: ReferenceCache,
}

impl<'a> TypeGraphBuilder<'a> {
    pub fn new(pool: &'a ClassPool, owner: ClassId) -> Self {
        Self {
            pool,
            owner,
            enclosing: None,
            cache: ReferenceCache::new(),
        }
    }

    pub fn with_enclosing(mut self, enclosing: Option<ClassId>) -> Self {
        self.enclosing = enclosing;
        self
    }

    pub fn build(mut self, sig: &ClassSignature) -> Result<BuiltSignature> {
        // Two passes: declare every parameter, then build bounds, so self-referential and
        // forward-referencing bounds (`T extends Comparable<T>`) resolve.
        let mut ids = Vec::with_capacity(sig.type_params.len());
        for (index, param) in sig.type_params.iter().enumerate() {
            let index = u32::try_from(index).map_err(|_| {
                SignatureError::Malformed {
                    offset: param.offset,
                    message: "too many type parameters".to_string(),
                }
            })?;
            let id = self
                .cache
                .declare(self.owner, &param.name, index)
                .ok_or_else(|| SignatureError::Malformed {
                    offset: param.offset,
                    message: format!("duplicate type parameter `{}`", param.name),
                })?;
            ids.push(id);
        }

        let mut type_parameters = Vec::with_capacity(ids.len());
        for (param, id) in sig.type_params.iter().zip(ids) {
            let mut bounds = param
                .bounds()
                .map(|bound| self.field_type(bound))
                .collect::<Result<Vec<_>>>()?;
            if bounds.is_empty() {
                bounds.push(TypeUsage::Class(self.pool.well_known().object));
            }
            self.cache.complete(self.owner, &param.name);
            type_parameters.push(TypeParameter::new(id, param.name.clone(), bounds));
        }

        let super_class = self.class_type(&sig.super_class)?;
        let interfaces = sig
            .interfaces
            .iter()
            .map(|iface| self.class_type(iface))
            .collect::<Result<Vec<_>>>()?;

        Ok(BuiltSignature {
            type_parameters,
            super_class,
            interfaces,
        })
    }

    fn field_type(&self, sig: &FieldTypeSignature) -> Result<TypeUsage> {
        match sig {
            FieldTypeSignature::Class(class) => self.class_type(class),
            FieldTypeSignature::TypeVariable(var) => {
                let param = self
                    .cache
                    .lookup(self.owner, &var.name)
                    .or_else(|| self.enclosing_type_parameter(&var.name))
                    .ok_or_else(|| BuildError::UnresolvedTypeVariable {
                        name: var.name.clone(),
                        offset: var.offset,
                    })?;
                Ok(TypeUsage::TypeVariable(TypeVariableUsage {
                    param,
                    name: var.name.clone(),
                }))
            }
            FieldTypeSignature::Array(component) => {
                Ok(TypeUsage::Array(Box::new(self.type_signature(component)?)))
            }
        }
    }

    fn enclosing_type_parameter(&self, name: &str) -> Option<TypeParamId> {
        let mut next = self.enclosing;
        // Bounded by the pool size so a cyclic chain still terminates.
        for _ in 0..self.pool.len() {
            let node = self.pool.node(next?)?;
            if let Some(param) = node.type_parameter(name) {
                return Some(param.id());
            }
            next = node.enclosing_class();
        }
        None
    }

    fn type_signature(&self, sig: &TypeSignature) -> Result<TypeUsage> {
        match sig {
            TypeSignature::Base(base) => {
                Ok(TypeUsage::Class(self.pool.well_known().primitive(*base)))
            }
            TypeSignature::Reference(reference) => self.field_type(reference),
        }
    }

    /// `Lpkg/Outer<A>.Inner<B>;` becomes `Outer$Inner<B>` with outer `Outer<A>`. Raw enclosing
    /// segments are not materialized.
    fn class_type(&self, sig: &ClassTypeSignature) -> Result<TypeUsage> {
        let mut name = if sig.package.is_empty() {
            String::new()
        } else {
            format!("{}.", sig.package.replace('/', "."))
        };

        let mut outer: Option<TypeUsage> = None;
        let mut usage = None;
        let last = sig.segments.len().saturating_sub(1);
        for (idx, segment) in sig.segments.iter().enumerate() {
            if idx > 0 {
                name.push('$');
            }
            name.push_str(&segment.name);

            let args = segment
                .type_args
                .iter()
                .map(|arg| self.type_argument(arg))
                .collect::<Result<Vec<_>>>()?;
            let enclosing = outer.take().map(Box::new);

            if args.is_empty() && enclosing.is_none() {
                if idx == last {
                    usage = Some(TypeUsage::Class(self.pool.resolve(&name)));
                }
                continue;
            }

            let parameterized = TypeUsage::Parameterized(ParameterizedTypeUsage {
                class: self.pool.resolve(&name),
                args,
                outer: enclosing,
            });
            if idx == last {
                usage = Some(parameterized);
            } else {
                outer = Some(parameterized);
            }
        }

        Ok(usage.unwrap_or_else(|| TypeUsage::Class(self.pool.resolve(&name))))
    }

    fn type_argument(&self, arg: &TypeArgument) -> Result<TypeUsage> {
        Ok(match arg {
            TypeArgument::Any => TypeUsage::Wildcard(WildcardUsage::Unbounded),
            TypeArgument::Exact(ty) => self.field_type(ty)?,
            TypeArgument::Extends(ty) => {
                TypeUsage::Wildcard(WildcardUsage::Extends(Box::new(self.field_type(ty)?)))
            }
            TypeArgument::Super(ty) => {
                TypeUsage::Wildcard(WildcardUsage::Super(Box::new(self.field_type(ty)?)))
            }
        })
    }
}
