//! JSON and YAML output, straight from the serde model

use super::{OutputFormat, RenderError};
use crate::lesson::ast::Document;

pub fn to_json_str(doc: &Document) -> Result<String, RenderError> {
    serde_json::to_string_pretty(doc).map_err(|e| RenderError::Encode {
        format: OutputFormat::Json,
        message: e.to_string(),
    })
}

pub fn to_yaml_str(doc: &Document) -> Result<String, RenderError> {
    serde_yaml::to_string(doc).map_err(|e| RenderError::Encode {
        format: OutputFormat::Yaml,
        message: e.to_string(),
    })
}
