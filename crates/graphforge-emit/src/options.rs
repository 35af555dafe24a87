use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Formatting options for [`print_schema`](crate::print_schema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PrintSchemaOptions {
    /// Print descriptions as `#` comments instead of block strings.
    pub comment_descriptions: bool,

    /// Order types, fields, arguments and enum values lexicographically.
    pub sorted_schema: bool,
}

impl Default for PrintSchemaOptions {
    fn default() -> Self {
        Self {
            comment_descriptions: false,
            sorted_schema: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() -> anyhow::Result<()> {
        let options: PrintSchemaOptions = serde_json::from_str(r#"{"comment_descriptions": true}"#)?;
        assert!(options.comment_descriptions);
        assert!(options.sorted_schema);
        Ok(())
    }
}
