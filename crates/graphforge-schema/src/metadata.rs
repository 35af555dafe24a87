use std::collections::HashMap;

use graphforge_metadata::{
    FieldDescriptor, ResolverDescriptor, is_valid_name, load_resolvers, load_resolvers_async,
};
use indexmap::IndexMap;

use crate::{
    DateScalarMode, Field, GenerationError, NamedType, ObjectType, Schema, SchemaGenerator,
    SchemaGeneratorOptions, is_builtin_scalar, validate,
};

const QUERY: &str = "Query";
const MUTATION: &str = "Mutation";
const SUBSCRIPTION: &str = "Subscription";

/// Name fields may use instead of a concrete date scalar.
const DATE_TYPE: &str = "Date";

/// The default [`SchemaGenerator`]: loads resolver descriptors, then assembles
/// and checks the schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataSchemaGenerator;

#[async_trait::async_trait]
impl SchemaGenerator for MetadataSchemaGenerator {
    #[tracing::instrument(skip_all, fields(types = options.types.len()))]
    async fn generate_from_metadata(
        &self,
        options: &SchemaGeneratorOptions,
    ) -> Result<Schema, GenerationError> {
        let resolvers = load_resolvers_async(&options.resolvers).await?;
        assemble(options, &resolvers)
    }

    #[tracing::instrument(skip_all, fields(types = options.types.len()))]
    fn generate_from_metadata_sync(
        &self,
        options: &SchemaGeneratorOptions,
    ) -> Result<Schema, GenerationError> {
        let resolvers = load_resolvers(&options.resolvers)?;
        assemble(options, &resolvers)
    }
}

fn assemble(
    options: &SchemaGeneratorOptions,
    resolvers: &[ResolverDescriptor],
) -> Result<Schema, GenerationError> {
    let mut types = IndexMap::new();

    let query = root_type(QUERY, resolvers.iter().flat_map(|r| &r.queries))?;
    if query.fields.is_empty() {
        return Err(GenerationError::MissingQuery);
    }
    types.insert(QUERY.to_string(), NamedType::Object(query));

    let mutation = optional_root(
        &mut types,
        MUTATION,
        resolvers.iter().flat_map(|r| &r.mutations),
    )?;
    let subscription = optional_root(
        &mut types,
        SUBSCRIPTION,
        resolvers.iter().flat_map(|r| &r.subscriptions),
    )?;

    for descriptor in &options.types {
        check_type_name(&descriptor.name)?;
        if types.contains_key(&descriptor.name) {
            return Err(GenerationError::DuplicateType {
                name: descriptor.name.clone(),
            });
        }
        types.insert(descriptor.name.clone(), NamedType::from(descriptor));
    }

    attach_field_resolvers(&mut types, resolvers)?;
    inherit_interface_fields(&mut types)?;
    map_date_type(&mut types, options.date_scalar_mode);
    check_references(&types)?;

    let schema = Schema::new(types, QUERY.to_string(), mutation, subscription);
    if options.skip_check {
        tracing::debug!("skipping schema validation");
    } else {
        validate::validate(&schema)?;
    }
    tracing::debug!(types = schema.type_count(), "generated schema");
    Ok(schema)
}

fn root_type<'a>(
    name: &str,
    operations: impl IntoIterator<Item = &'a FieldDescriptor>,
) -> Result<ObjectType, GenerationError> {
    let mut root = ObjectType {
        name: name.to_string(),
        description: None,
        fields: Vec::new(),
        interfaces: Vec::new(),
    };
    for op in operations {
        push_field(&mut root, Field::from(op))?;
    }
    Ok(root)
}

/// Register a root type when it has operations. Returns its name if registered.
fn optional_root<'a>(
    types: &mut IndexMap<String, NamedType>,
    name: &str,
    operations: impl IntoIterator<Item = &'a FieldDescriptor>,
) -> Result<Option<String>, GenerationError> {
    let root = root_type(name, operations)?;
    if root.fields.is_empty() {
        return Ok(None);
    }
    types.insert(name.to_string(), NamedType::Object(root));
    Ok(Some(name.to_string()))
}

fn push_field(object: &mut ObjectType, field: Field) -> Result<(), GenerationError> {
    if object.fields.iter().any(|f| f.name == field.name) {
        return Err(GenerationError::DuplicateField {
            type_name: object.name.clone(),
            field: field.name,
        });
    }
    object.fields.push(field);
    Ok(())
}

fn check_type_name(name: &str) -> Result<(), GenerationError> {
    if [QUERY, MUTATION, SUBSCRIPTION].contains(&name) || is_builtin_scalar(name) {
        return Err(GenerationError::ReservedTypeName {
            name: name.to_string(),
        });
    }
    if !is_valid_name(name) || name.starts_with("__") {
        return Err(GenerationError::InvalidName {
            location: "type declaration".into(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn attach_field_resolvers(
    types: &mut IndexMap<String, NamedType>,
    resolvers: &[ResolverDescriptor],
) -> Result<(), GenerationError> {
    for resolver in resolvers {
        for field_resolver in &resolver.field_resolvers {
            match types.get_mut(&field_resolver.type_name) {
                Some(NamedType::Object(object)) => {
                    for field in &field_resolver.fields {
                        push_field(object, Field::from(field))?;
                    }
                }
                Some(other) => {
                    return Err(GenerationError::InvalidFieldResolverTarget {
                        resolver: resolver.name.clone(),
                        type_name: field_resolver.type_name.clone(),
                        kind: other.kind(),
                    });
                }
                None => {
                    return Err(GenerationError::UnknownType {
                        name: field_resolver.type_name.clone(),
                        referenced_by: format!("resolver `{}`", resolver.name),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Copy interface fields an implementing object does not declare itself.
fn inherit_interface_fields(types: &mut IndexMap<String, NamedType>) -> Result<(), GenerationError> {
    let mut interfaces: HashMap<String, Option<Vec<Field>>> = HashMap::new();
    for ty in types.values() {
        let fields = match ty {
            NamedType::Interface(interface) => Some(interface.fields.clone()),
            _ => None,
        };
        interfaces.insert(ty.name().to_string(), fields);
    }

    for ty in types.values_mut() {
        let NamedType::Object(object) = ty else {
            continue;
        };
        for interface in &object.interfaces {
            let inherited = match interfaces.get(interface) {
                Some(Some(fields)) => fields,
                Some(None) => {
                    return Err(GenerationError::NotAnInterface {
                        object: object.name.clone(),
                        name: interface.clone(),
                    });
                }
                None => {
                    return Err(GenerationError::UnknownType {
                        name: interface.clone(),
                        referenced_by: format!("`{}` implements", object.name),
                    });
                }
            };
            for field in inherited {
                if !object.fields.iter().any(|f| f.name == field.name) {
                    object.fields.push(field.clone());
                }
            }
        }
    }
    Ok(())
}

/// Point `Date` references at the configured date scalar, declaring it when used.
///
/// A user-declared `Date` type is left alone.
fn map_date_type(types: &mut IndexMap<String, NamedType>, mode: DateScalarMode) {
    if types.contains_key(DATE_TYPE) {
        return;
    }
    let scalar = mode.scalar();
    let mut used = false;
    for ty in types.values_mut() {
        match ty {
            NamedType::Object(t) => used |= rename_in_fields(&mut t.fields, &scalar.name),
            NamedType::Interface(t) => used |= rename_in_fields(&mut t.fields, &scalar.name),
            NamedType::InputObject(t) => {
                for field in &mut t.fields {
                    used |= field.ty.rename_named(DATE_TYPE, &scalar.name);
                }
            }
            NamedType::Scalar(_) | NamedType::Union(_) | NamedType::Enum(_) => {}
        }
    }
    if used && !types.contains_key(&scalar.name) {
        tracing::debug!(scalar = %scalar.name, "declaring date scalar");
        types.insert(scalar.name.clone(), NamedType::Scalar(scalar));
    }
}

fn rename_in_fields(fields: &mut [Field], to: &str) -> bool {
    let mut used = false;
    for field in fields {
        used |= field.ty.rename_named(DATE_TYPE, to);
        for arg in &mut field.args {
            used |= arg.ty.rename_named(DATE_TYPE, to);
        }
    }
    used
}

fn check_references(types: &IndexMap<String, NamedType>) -> Result<(), GenerationError> {
    let check = |name: &str, referenced_by: &dyn Fn() -> String| {
        if is_builtin_scalar(name) || types.contains_key(name) {
            Ok(())
        } else {
            Err(GenerationError::UnknownType {
                name: name.to_string(),
                referenced_by: referenced_by(),
            })
        }
    };

    for ty in types.values() {
        let type_name = ty.name();
        match ty {
            NamedType::Object(_) | NamedType::Interface(_) => {
                for field in ty.fields().unwrap_or_default() {
                    check(field.ty.named_type(), &|| {
                        format!("`{type_name}.{}`", field.name)
                    })?;
                    for arg in &field.args {
                        check(arg.ty.named_type(), &|| {
                            format!("`{type_name}.{}({})`", field.name, arg.name)
                        })?;
                    }
                }
            }
            NamedType::InputObject(input) => {
                for field in &input.fields {
                    check(field.ty.named_type(), &|| {
                        format!("`{type_name}.{}`", field.name)
                    })?;
                }
            }
            NamedType::Union(union) => {
                for member in &union.members {
                    check(member, &|| format!("union `{type_name}`"))?;
                }
            }
            NamedType::Scalar(_) | NamedType::Enum(_) => {}
        }
    }
    Ok(())
}
