pub mod commands;
pub mod config;
pub mod error;
pub mod profiles;
pub mod schema;
pub mod thinking;

pub use error::{AdapterError, Result};
pub use profiles::{ModelProfile, google_model_profile};
pub use schema::{GoogleJsonSchemaTransformer, JsonSchema, JsonSchemaTransformer, SchemaWarning};
pub use thinking::{TextFragment, render_with_tags, split_content_into_text_and_thinking};
