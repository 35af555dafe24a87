use miette::IntoDiagnostic;

/// Pretty-printed JSON Schema of `graphforge.toml`.
pub fn run() -> miette::Result<String> {
    serde_json::to_string_pretty(&graphforge_config::schema()).into_diagnostic()
}
