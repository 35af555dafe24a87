use graphforge_metadata::{
    ArgDescriptor, EnumValueDescriptor, FieldDescriptor, TypeDescriptor, TypeKind, TypeRef,
};
use indexmap::IndexMap;
use serde_json::Value;

/// Scalars every schema provides without declaring them.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub args: Vec<InputValue>,
    pub deprecation_reason: Option<String>,
}

/// An argument or an input object field.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamedType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(t) => t.description.as_deref(),
            Self::Object(t) => t.description.as_deref(),
            Self::Interface(t) => t.description.as_deref(),
            Self::Union(t) => t.description.as_deref(),
            Self::Enum(t) => t.description.as_deref(),
            Self::InputObject(t) => t.description.as_deref(),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::Enum(_) => TypeKind::Enum,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Output fields of objects and interfaces.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::Object(t) => Some(&t.fields),
            Self::Interface(t) => Some(&t.fields),
            _ => None,
        }
    }

    fn sort(&mut self) {
        fn sort_fields(fields: &mut [Field]) {
            fields.sort_by(|a, b| a.name.cmp(&b.name));
            for field in fields {
                field.args.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
        match self {
            Self::Scalar(_) => {}
            Self::Object(t) => {
                sort_fields(&mut t.fields);
                t.interfaces.sort();
            }
            Self::Interface(t) => sort_fields(&mut t.fields),
            Self::Union(t) => t.members.sort(),
            Self::Enum(t) => t.values.sort_by(|a, b| a.name.cmp(&b.name)),
            Self::InputObject(t) => t.fields.sort_by(|a, b| a.name.cmp(&b.name)),
        }
    }
}

impl From<&ArgDescriptor> for InputValue {
    fn from(arg: &ArgDescriptor) -> Self {
        Self {
            name: arg.name.clone(),
            description: arg.description.clone(),
            ty: arg.ty.clone(),
            default_value: arg.default_value.clone(),
        }
    }
}

impl From<&FieldDescriptor> for InputValue {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            description: field.description.clone(),
            ty: field.ty.clone(),
            default_value: field.default_value.clone(),
        }
    }
}

impl From<&FieldDescriptor> for Field {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            description: field.description.clone(),
            ty: field.ty.clone(),
            args: field.args.iter().map(InputValue::from).collect(),
            deprecation_reason: field.deprecation_reason.clone(),
        }
    }
}

impl From<&EnumValueDescriptor> for EnumValue {
    fn from(value: &EnumValueDescriptor) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            deprecation_reason: value.deprecation_reason.clone(),
        }
    }
}

impl From<&TypeDescriptor> for NamedType {
    fn from(d: &TypeDescriptor) -> Self {
        let name = d.name.clone();
        let description = d.description.clone();
        match d.kind {
            TypeKind::Scalar => Self::Scalar(ScalarType { name, description }),
            TypeKind::Object => Self::Object(ObjectType {
                name,
                description,
                fields: d.fields.iter().map(Field::from).collect(),
                interfaces: d.implements.clone(),
            }),
            TypeKind::Interface => Self::Interface(InterfaceType {
                name,
                description,
                fields: d.fields.iter().map(Field::from).collect(),
            }),
            TypeKind::Union => Self::Union(UnionType {
                name,
                description,
                members: d.members.clone(),
            }),
            TypeKind::Enum => Self::Enum(EnumType {
                name,
                description,
                values: d.values.iter().map(EnumValue::from).collect(),
            }),
            TypeKind::InputObject => Self::InputObject(InputObjectType {
                name,
                description,
                fields: d.fields.iter().map(InputValue::from).collect(),
            }),
        }
    }
}

/// A generated GraphQL schema.
///
/// Holds every named type except the built-in scalars, in generation order:
/// root operation types first, then declared types, then scalars added during
/// generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    types: IndexMap<String, NamedType>,
    query: String,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl Schema {
    /// Assemble a schema from already-checked parts.
    ///
    /// No validation happens here; [`crate::MetadataSchemaGenerator`] is the
    /// checked way to build one.
    pub fn new(
        types: IndexMap<String, NamedType>,
        query: String,
        mutation: Option<String>,
        subscription: Option<String>,
    ) -> Self {
        Self {
            types,
            query,
            mutation,
            subscription,
        }
    }

    pub fn query_type_name(&self) -> &str {
        &self.query
    }

    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation.as_deref()
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription.as_deref()
    }

    pub fn get_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        match self.types.get(name)? {
            NamedType::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Whether `name` can appear in argument and input field positions.
    pub fn is_input_type(&self, name: &str) -> bool {
        is_builtin_scalar(name)
            || matches!(
                self.types.get(name),
                Some(NamedType::Scalar(_) | NamedType::Enum(_) | NamedType::InputObject(_))
            )
    }

    /// Whether `name` can appear as a field's return type.
    pub fn is_output_type(&self, name: &str) -> bool {
        is_builtin_scalar(name)
            || matches!(self.types.get(name), Some(t) if !matches!(t, NamedType::InputObject(_)))
    }

    /// A copy with types, fields, arguments, enum values, interfaces and
    /// union members in lexicographic order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut sorted = self.clone();
        sorted.types.sort_keys();
        for ty in sorted.types.values_mut() {
            ty.sort();
        }
        sorted
    }
}
