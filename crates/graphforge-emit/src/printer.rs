use graphforge_schema::{EnumValue, Field, InputValue, NamedType, Schema};
use serde_json::Value;

use crate::PrintSchemaOptions;

/// Reason implied by a bare `@deprecated`.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Descriptions longer than this are printed as multi-line block strings.
const MAX_SINGLE_LINE_DESCRIPTION: usize = 70;

/// Render `schema` as SDL.
///
/// Types are separated by a blank line and the output ends with a newline.
/// Built-in scalars are never printed; root types keep their conventional
/// names, so no `schema { ... }` block is emitted.
pub fn print_schema(schema: &Schema, options: &PrintSchemaOptions) -> String {
    let sorted;
    let schema = if options.sorted_schema {
        sorted = schema.sorted();
        &sorted
    } else {
        schema
    };
    let printer = Printer { schema, options };
    let mut out = schema
        .types()
        .map(|ty| printer.print_type(ty))
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

struct Printer<'a> {
    schema: &'a Schema,
    options: &'a PrintSchemaOptions,
}

impl<'a> Printer<'a> {
    fn print_type(&self, ty: &NamedType) -> String {
        let description = self.description(ty.description(), "", true);
        match ty {
            NamedType::Scalar(t) => format!("{description}scalar {}", t.name),
            NamedType::Object(t) => format!(
                "{description}type {}{}{}",
                t.name,
                implements(&t.interfaces),
                self.fields(&t.fields)
            ),
            NamedType::Interface(t) => {
                format!("{description}interface {}{}", t.name, self.fields(&t.fields))
            }
            NamedType::Union(t) => {
                let members = if t.members.is_empty() {
                    String::new()
                } else {
                    format!(" = {}", t.members.join(" | "))
                };
                format!("{description}union {}{members}", t.name)
            }
            NamedType::Enum(t) => {
                format!("{description}enum {}{}", t.name, self.enum_values(&t.values))
            }
            NamedType::InputObject(t) => {
                let fields = t
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, f)| {
                        format!(
                            "{}  {}",
                            self.description(f.description.as_deref(), "  ", i == 0),
                            self.input_value(f)
                        )
                    })
                    .collect();
                format!("{description}input {}{}", t.name, block(fields))
            }
        }
    }

    fn fields(&self, fields: &[Field]) -> String {
        block(
            fields
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    format!(
                        "{}  {}{}: {}{}",
                        self.description(f.description.as_deref(), "  ", i == 0),
                        f.name,
                        self.args(&f.args, "  "),
                        f.ty,
                        deprecated(f.deprecation_reason.as_deref())
                    )
                })
                .collect(),
        )
    }

    fn enum_values(&self, values: &[EnumValue]) -> String {
        block(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    format!(
                        "{}  {}{}",
                        self.description(v.description.as_deref(), "  ", i == 0),
                        v.name,
                        deprecated(v.deprecation_reason.as_deref())
                    )
                })
                .collect(),
        )
    }

    /// Arguments go on one line unless one of them carries a description.
    fn args(&self, args: &[InputValue], indentation: &str) -> String {
        if args.is_empty() {
            return String::new();
        }
        if args.iter().all(|a| a.description.is_none()) {
            let inline: Vec<_> = args.iter().map(|a| self.input_value(a)).collect();
            return format!("({})", inline.join(", "));
        }
        let nested = format!("  {indentation}");
        let lines: Vec<_> = args
            .iter()
            .enumerate()
            .map(|(i, a)| {
                format!(
                    "{}{nested}{}",
                    self.description(a.description.as_deref(), &nested, i == 0),
                    self.input_value(a)
                )
            })
            .collect();
        format!("(\n{}\n{indentation})", lines.join("\n"))
    }

    fn input_value(&self, value: &InputValue) -> String {
        let default = value
            .default_value
            .as_ref()
            .map(|d| format!(" = {}", self.literal(d, value.ty.named_type())))
            .unwrap_or_default();
        format!("{}: {}{default}", value.name, value.ty)
    }

    /// A JSON default value as a GraphQL literal; strings of enum type print bare.
    fn literal(&self, value: &Value, type_name: &str) -> String {
        match value {
            Value::String(s) if matches!(self.schema.get_type(type_name), Some(NamedType::Enum(_))) => {
                s.clone()
            }
            Value::Array(items) => {
                let items: Vec<_> = items.iter().map(|v| self.literal(v, type_name)).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Object(map) => {
                let fields: Vec<_> = map
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", self.literal(v, self.input_field_type(type_name, k))))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            other => other.to_string(),
        }
    }

    fn input_field_type(&self, type_name: &str, field: &str) -> &'a str {
        match self.schema.get_type(type_name) {
            Some(NamedType::InputObject(input)) => input
                .fields
                .iter()
                .find(|f| f.name == field)
                .map_or("", |f| f.ty.named_type()),
            _ => "",
        }
    }

    fn description(&self, description: Option<&str>, indentation: &str, first_in_block: bool) -> String {
        let Some(description) = description else {
            return String::new();
        };
        let separated = !indentation.is_empty() && !first_in_block;

        if self.options.comment_descriptions {
            let comment = description
                .split('\n')
                .map(|line| {
                    if line.is_empty() {
                        format!("{indentation}#")
                    } else {
                        format!("{indentation}# {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            let prefix = if separated { "\n" } else { "" };
            return format!("{prefix}{comment}\n");
        }

        let block = block_string(
            description,
            description.len() > MAX_SINGLE_LINE_DESCRIPTION,
        );
        let prefix = if separated {
            format!("\n{indentation}")
        } else {
            indentation.to_string()
        };
        format!("{prefix}{}\n", block.replace('\n', &format!("\n{indentation}")))
    }
}

fn block(items: Vec<String>) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!(" {{\n{}\n}}", items.join("\n"))
    }
}

fn implements(interfaces: &[String]) -> String {
    if interfaces.is_empty() {
        String::new()
    } else {
        format!(" implements {}", interfaces.join(" & "))
    }
}

fn deprecated(reason: Option<&str>) -> String {
    match reason {
        None => String::new(),
        Some(DEFAULT_DEPRECATION_REASON) => " @deprecated".to_string(),
        Some(reason) => format!(
            " @deprecated(reason: {})",
            Value::String(reason.to_string())
        ),
    }
}

fn block_string(value: &str, prefer_multiple_lines: bool) -> String {
    let is_single_line = !value.contains('\n');
    let has_leading_space = value.starts_with(' ') || value.starts_with('\t');
    let has_trailing_quote = value.ends_with('"');
    let has_trailing_slash = value.ends_with('\\');
    let multiple_lines =
        !is_single_line || has_trailing_quote || has_trailing_slash || prefer_multiple_lines;

    let mut result = String::new();
    if multiple_lines && !(is_single_line && has_leading_space) {
        result.push('\n');
    }
    result.push_str(value);
    if multiple_lines {
        result.push('\n');
    }
    format!("\"\"\"{}\"\"\"", result.replace("\"\"\"", "\\\"\"\""))
}
