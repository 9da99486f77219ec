use std::{fs, path::Path};

use anyhow::{Context, Result};
use jsonschema::validator_for;
use schemars::schema_for;
use serde_json::Value;
use tracing::debug;

use crate::domain::{DefinitionError, WizardDefinition};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// JSON Schema describing a wizard definition document.
pub fn definition_schema() -> Value {
    serde_json::to_value(schema_for!(WizardDefinition)).unwrap_or(Value::Null)
}

/// Parses, schema-checks and validates a definition document.
pub fn load_definition_str(
    contents: &str,
    format: DocumentFormat,
) -> Result<WizardDefinition, DefinitionError> {
    let document = parse_document_str(contents, format)
        .map_err(|err| DefinitionError::Parse(format!("{err:#}")))?;
    definition_from_value(document)
}

pub fn load_definition_path(path: &Path) -> Result<WizardDefinition> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read definition {}", path.display()))?;
    let format = DocumentFormat::from_path(path);
    debug!(path = %path.display(), %format, "loading definition");
    load_definition_str(&contents, format)
        .with_context(|| format!("invalid definition {}", path.display()))
}

fn definition_from_value(document: Value) -> Result<WizardDefinition, DefinitionError> {
    let schema = definition_schema();
    let validator =
        validator_for(&schema).map_err(|err| DefinitionError::Parse(err.to_string()))?;
    let issues: Vec<String> = validator
        .iter_errors(&document)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let pointer = if pointer.is_empty() { "/".to_string() } else { pointer };
            format!("{pointer}: {error}")
        })
        .collect();
    if !issues.is_empty() {
        return Err(DefinitionError::Schema { issues });
    }

    let definition: WizardDefinition =
        serde_json::from_value(document).map_err(|err| DefinitionError::Parse(err.to_string()))?;
    definition.validate()?;
    Ok(definition)
}
