//! Structural checks over an assembled schema.

use graphforge_metadata::{TypeKind, TypeRef, is_valid_name};

use crate::{Field, GenerationError, NamedType, ObjectType, Schema};

pub(crate) fn validate(schema: &Schema) -> Result<(), GenerationError> {
    for ty in schema.types() {
        match ty {
            NamedType::Object(object) => {
                check_non_empty(&object.name, TypeKind::Object, object.fields.len())?;
                check_output_fields(schema, &object.name, &object.fields)?;
                check_interfaces(schema, object)?;
            }
            NamedType::Interface(interface) => {
                check_non_empty(&interface.name, TypeKind::Interface, interface.fields.len())?;
                check_output_fields(schema, &interface.name, &interface.fields)?;
            }
            NamedType::InputObject(input) => {
                check_non_empty(&input.name, TypeKind::InputObject, input.fields.len())?;
                for field in &input.fields {
                    let location = format!("`{}.{}`", input.name, field.name);
                    check_name(&location, &field.name)?;
                    if !schema.is_input_type(field.ty.named_type()) {
                        return Err(GenerationError::InvalidInputType {
                            location,
                            ty: field.ty.to_string(),
                        });
                    }
                }
            }
            NamedType::Union(union) => {
                check_non_empty(&union.name, TypeKind::Union, union.members.len())?;
                for member in &union.members {
                    if schema.object(member).is_none() {
                        return Err(GenerationError::InvalidUnionMember {
                            union: union.name.clone(),
                            member: member.clone(),
                        });
                    }
                }
            }
            NamedType::Enum(enumeration) => {
                check_non_empty(&enumeration.name, TypeKind::Enum, enumeration.values.len())?;
                for value in &enumeration.values {
                    let location = format!("enum `{}`", enumeration.name);
                    check_name(&location, &value.name)?;
                    if matches!(value.name.as_str(), "true" | "false" | "null") {
                        return Err(GenerationError::InvalidName {
                            location,
                            name: value.name.clone(),
                        });
                    }
                }
            }
            NamedType::Scalar(_) => {}
        }
    }
    Ok(())
}

fn check_non_empty(name: &str, kind: TypeKind, len: usize) -> Result<(), GenerationError> {
    if len == 0 {
        return Err(GenerationError::EmptyType {
            name: name.to_string(),
            kind,
        });
    }
    Ok(())
}

fn check_name(location: &str, name: &str) -> Result<(), GenerationError> {
    if !is_valid_name(name) || name.starts_with("__") {
        return Err(GenerationError::InvalidName {
            location: location.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_output_fields(
    schema: &Schema,
    type_name: &str,
    fields: &[Field],
) -> Result<(), GenerationError> {
    for field in fields {
        let location = format!("`{type_name}.{}`", field.name);
        check_name(&location, &field.name)?;
        if !schema.is_output_type(field.ty.named_type()) {
            return Err(GenerationError::InvalidOutputType {
                location,
                ty: field.ty.to_string(),
            });
        }
        for arg in &field.args {
            let location = format!("`{type_name}.{}({})`", field.name, arg.name);
            check_name(&location, &arg.name)?;
            if !schema.is_input_type(arg.ty.named_type()) {
                return Err(GenerationError::InvalidInputType {
                    location,
                    ty: arg.ty.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn check_interfaces(schema: &Schema, object: &ObjectType) -> Result<(), GenerationError> {
    for name in &object.interfaces {
        let Some(NamedType::Interface(interface)) = schema.get_type(name) else {
            return Err(GenerationError::NotAnInterface {
                object: object.name.clone(),
                name: name.clone(),
            });
        };
        for expected in &interface.fields {
            let found = object.fields.iter().find(|f| f.name == expected.name);
            if !found.is_some_and(|found| is_compatible(&found.ty, &expected.ty)) {
                return Err(GenerationError::InterfaceFieldMismatch {
                    object: object.name.clone(),
                    interface: interface.name.clone(),
                    field: expected.name.clone(),
                    expected: expected.ty.to_string(),
                    found: found.map_or_else(|| "nothing".to_string(), |f| f.ty.to_string()),
                });
            }
            if let Some(found) = found {
                check_interface_args(object, &interface.name, found, expected)?;
            }
        }
    }
    Ok(())
}

/// Interface arguments must be repeated with the same type. Extra arguments must be optional.
fn check_interface_args(
    object: &ObjectType,
    interface: &str,
    found: &Field,
    expected: &Field,
) -> Result<(), GenerationError> {
    for arg in &expected.args {
        let actual = found.args.iter().find(|a| a.name == arg.name);
        if actual.is_none_or(|actual| actual.ty != arg.ty) {
            return Err(GenerationError::InterfaceArgumentMismatch {
                object: object.name.clone(),
                interface: interface.to_string(),
                field: found.name.clone(),
                argument: arg.name.clone(),
                expected: arg.ty.to_string(),
                found: actual.map_or_else(|| "nothing".to_string(), |a| a.ty.to_string()),
            });
        }
    }
    let extra = found.args.iter().find(|a| {
        a.ty.is_non_null()
            && a.default_value.is_none()
            && !expected.args.iter().any(|e| e.name == a.name)
    });
    if let Some(extra) = extra {
        return Err(GenerationError::InterfaceExtraRequiredArgument {
            object: object.name.clone(),
            interface: interface.to_string(),
            field: found.name.clone(),
            argument: extra.name.clone(),
        });
    }
    Ok(())
}

/// An implementing field may tighten a nullable interface field to non-null.
fn is_compatible(found: &TypeRef, expected: &TypeRef) -> bool {
    found == expected || matches!(found, TypeRef::NonNull(inner) if **inner == *expected)
}

#[cfg(test)]
mod tests {
    use graphforge_metadata::{
        ArgDescriptor, EnumValueDescriptor, FieldDescriptor, ResolverDescriptor, ResolverSource,
        TypeDescriptor,
    };

    use super::*;
    use crate::{MetadataSchemaGenerator, SchemaGenerator, SchemaGeneratorOptions};

    fn field(name: &str, t: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, t.parse().expect("valid type reference"))
    }

    fn generate(extra: Vec<TypeDescriptor>, query: FieldDescriptor) -> Result<Schema, GenerationError> {
        let options = SchemaGeneratorOptions {
            resolvers: vec![ResolverSource::from(ResolverDescriptor::new("R").query(query))],
            types: extra,
            ..SchemaGeneratorOptions::default()
        };
        MetadataSchemaGenerator.generate_from_metadata_sync(&options)
    }

    fn filter_input() -> TypeDescriptor {
        TypeDescriptor::new("Filter", TypeKind::InputObject).field(field("term", "String"))
    }

    #[test]
    fn input_objects_cannot_be_returned() {
        let err = generate(vec![filter_input()], field("filter", "Filter"));
        assert!(matches!(
            err,
            Err(GenerationError::InvalidOutputType { location, .. }) if location == "`Query.filter`"
        ));
    }

    #[test]
    fn objects_cannot_be_arguments() {
        let user = TypeDescriptor::new("User", TypeKind::Object).field(field("id", "ID!"));
        let query = field("find", "User").arg(ArgDescriptor::new("like", "User".parse().expect("valid")));
        let err = generate(vec![user], query);
        assert!(matches!(
            err,
            Err(GenerationError::InvalidInputType { location, ty }) if location == "`Query.find(like)`" && ty == "User"
        ));
    }

    #[test]
    fn input_objects_accept_input_types() -> anyhow::Result<()> {
        let query = field("search", "[String!]!")
            .arg(ArgDescriptor::new("filter", "Filter!".parse()?));
        generate(vec![filter_input()], query)?;
        Ok(())
    }

    #[test]
    fn union_members_must_be_objects() {
        let result = TypeDescriptor::new("Result", TypeKind::Union).member("Filter");
        let err = generate(vec![filter_input(), result], field("r", "Result"));
        assert!(matches!(err, Err(GenerationError::InvalidUnionMember { .. })));
    }

    #[test]
    fn enums_need_values_with_valid_names() {
        let empty = TypeDescriptor::new("Role", TypeKind::Enum);
        let err = generate(vec![empty], field("role", "Role"));
        assert!(matches!(err, Err(GenerationError::EmptyType { kind: TypeKind::Enum, .. })));

        let reserved = TypeDescriptor::new("Flag", TypeKind::Enum).value(EnumValueDescriptor::new("true"));
        let err = generate(vec![reserved], field("flag", "Flag"));
        assert!(matches!(err, Err(GenerationError::InvalidName { name, .. }) if name == "true"));
    }

    #[test]
    fn interface_fields_may_be_tightened() -> anyhow::Result<()> {
        let node = TypeDescriptor::new("Named", TypeKind::Interface).field(field("name", "String"));
        let user = TypeDescriptor::new("User", TypeKind::Object)
            .implements("Named")
            .field(field("name", "String!"));
        generate(vec![node, user], field("me", "User"))?;
        Ok(())
    }

    #[test]
    fn interface_field_types_must_match() {
        let node = TypeDescriptor::new("Named", TypeKind::Interface).field(field("name", "String!"));
        let user = TypeDescriptor::new("User", TypeKind::Object)
            .implements("Named")
            .field(field("name", "Int"));
        let Err(err) = generate(vec![node, user], field("me", "User")) else {
            panic!("expected an interface mismatch");
        };
        assert_eq!(
            err.to_string(),
            "`User.name` has type `Int` but interface `Named` expects `String!`"
        );
    }

    fn paged_interface() -> TypeDescriptor {
        TypeDescriptor::new("Paged", TypeKind::Interface).field(
            field("items", "[String!]!").arg(ArgDescriptor::new("first", "Int".parse().expect("valid"))),
        )
    }

    #[test]
    fn interface_arguments_must_be_repeated() {
        let feed = TypeDescriptor::new("Feed", TypeKind::Object)
            .implements("Paged")
            .field(field("items", "[String!]!"));
        let Err(err) = generate(vec![paged_interface(), feed], field("feed", "Feed")) else {
            panic!("expected an argument mismatch");
        };
        assert_eq!(
            err.to_string(),
            "`Feed.items(first)` has type `nothing` but interface `Paged` expects `Int`"
        );
    }

    #[test]
    fn interface_argument_types_must_match() {
        let feed = TypeDescriptor::new("Feed", TypeKind::Object)
            .implements("Paged")
            .field(field("items", "[String!]!").arg(ArgDescriptor::new("first", "Int!".parse().expect("valid"))));
        let err = generate(vec![paged_interface(), feed], field("feed", "Feed"));
        assert!(matches!(
            err,
            Err(GenerationError::InterfaceArgumentMismatch { argument, found, .. })
                if argument == "first" && found == "Int!"
        ));
    }

    #[test]
    fn extra_arguments_must_be_optional() -> anyhow::Result<()> {
        let optional = TypeDescriptor::new("Feed", TypeKind::Object)
            .implements("Paged")
            .field(
                field("items", "[String!]!")
                    .arg(ArgDescriptor::new("first", "Int".parse()?))
                    .arg(ArgDescriptor::new("after", "String".parse()?)),
            );
        generate(vec![paged_interface(), optional], field("feed", "Feed"))?;

        let required = TypeDescriptor::new("Feed", TypeKind::Object)
            .implements("Paged")
            .field(
                field("items", "[String!]!")
                    .arg(ArgDescriptor::new("first", "Int".parse()?))
                    .arg(ArgDescriptor::new("after", "String!".parse()?)),
            );
        let err = generate(vec![paged_interface(), required], field("feed", "Feed"));
        assert!(matches!(
            err,
            Err(GenerationError::InterfaceExtraRequiredArgument { argument, .. }) if argument == "after"
        ));
        Ok(())
    }

    #[test]
    fn inherited_fields_keep_interface_arguments() -> anyhow::Result<()> {
        let feed = TypeDescriptor::new("Feed", TypeKind::Object)
            .implements("Paged")
            .field(field("title", "String"));
        generate(vec![paged_interface(), feed], field("feed", "Feed"))?;
        Ok(())
    }

    #[test]
    fn compatibility_rules() -> anyhow::Result<()> {
        let nullable: TypeRef = "String".parse()?;
        let required: TypeRef = "String!".parse()?;
        assert!(is_compatible(&required, &nullable));
        assert!(is_compatible(&nullable, &nullable));
        assert!(!is_compatible(&nullable, &required));
        Ok(())
    }
}
