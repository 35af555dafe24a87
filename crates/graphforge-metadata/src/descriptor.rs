use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::TypeRef;

/// The kind of a declared GraphQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Object,
    Interface,
    InputObject,
    Enum,
    Union,
    Scalar,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Interface => "interface",
            Self::InputObject => "input_object",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::Scalar => "scalar",
        }
    }
}

/// A declared GraphQL type.
///
/// Which of `fields`, `implements`, `values` and `members` apply depends on
/// `kind`: objects and interfaces use `fields` (objects also `implements`),
/// input objects use `fields` with optional `default_value`s, enums use
/// `values`, unions use `members`. Scalars only carry a name and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "Type")]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
    /// Interfaces implemented by an object type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnumValueDescriptor>,
    /// Object types that make up a union.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            fields: Vec::new(),
            implements: Vec::new(),
            values: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: EnumValueDescriptor) -> Self {
        self.values.push(value);
        self
    }

    #[must_use]
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.members.push(member.into());
        self
    }
}

/// A field on an object, interface or input object, or a root operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "Field")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgDescriptor>,
    /// Default value; only meaningful on input object fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            deprecation_reason: None,
            args: Vec::new(),
            default_value: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn arg(mut self, arg: ArgDescriptor) -> Self {
        self.args.push(arg);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "Argument")]
pub struct ArgDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl ArgDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            default_value: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "Enum Value")]
pub struct EnumValueDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
}

impl EnumValueDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecation_reason: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

/// Extra fields contributed to an existing object type by a resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "Field Resolver")]
pub struct FieldResolverDescriptor {
    /// Name of the object type the fields are added to.
    #[serde(rename = "type")]
    pub type_name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// A resolver: a named group of root operations and field resolvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "Resolver")]
pub struct ResolverDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutations: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscriptions: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_resolvers: Vec<FieldResolverDescriptor>,
}

impl ResolverDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queries: Vec::new(),
            mutations: Vec::new(),
            subscriptions: Vec::new(),
            field_resolvers: Vec::new(),
        }
    }

    #[must_use]
    pub fn query(mut self, field: FieldDescriptor) -> Self {
        self.queries.push(field);
        self
    }

    #[must_use]
    pub fn mutation(mut self, field: FieldDescriptor) -> Self {
        self.mutations.push(field);
        self
    }

    #[must_use]
    pub fn subscription(mut self, field: FieldDescriptor) -> Self {
        self.subscriptions.push(field);
        self
    }

    #[must_use]
    pub fn field_resolver(mut self, type_name: impl Into<String>, field: FieldDescriptor) -> Self {
        let type_name = type_name.into();
        match self
            .field_resolvers
            .iter_mut()
            .find(|r| r.type_name == type_name)
        {
            Some(existing) => existing.fields.push(field),
            None => self.field_resolvers.push(FieldResolverDescriptor {
                type_name,
                fields: vec![field],
            }),
        }
        self
    }
}
