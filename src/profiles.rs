//! Per-provider model profiles

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::schema::{GoogleJsonSchemaTransformer, JsonSchemaTransformer, SchemaWarning};

/// What a model family supports and how its tool schemas must be shaped
#[derive(Debug, Clone)]
pub struct ModelProfile {
    pub json_schema_transformer: Arc<dyn JsonSchemaTransformer>,
    pub supports_json_schema_output: bool,
    pub supports_json_object_output: bool,
}

impl ModelProfile {
    /// Rewrite a schema node with this profile's transformer
    pub fn transform_schema(
        &self,
        schema: Value,
        warnings: &mut Vec<SchemaWarning>,
    ) -> Result<Value> {
        self.json_schema_transformer.transform_value(schema, warnings)
    }
}

/// Get the model profile for a Google model.
///
/// Every Gemini model currently shares the same schema restrictions, so the
/// name is only used for tracing.
pub fn google_model_profile(model_name: &str) -> Option<ModelProfile> {
    tracing::debug!(model = model_name, "using google model profile");
    Some(ModelProfile {
        json_schema_transformer: Arc::new(GoogleJsonSchemaTransformer::new()),
        supports_json_schema_output: true,
        supports_json_object_output: true,
    })
}
