//! Bodies of the CLI subcommands, kept in the library so they can be tested

use serde_json::Value;
use tracing::{info, warn};

use crate::config::SchemaConfig;
use crate::error::{AdapterError, Result};
use crate::profiles::google_model_profile;
use crate::thinking::{TextFragment, split_content_into_text_and_thinking};

/// `split`: partition raw model output into fragments
pub fn split_output(content: &str) -> Vec<TextFragment> {
    let fragments = split_content_into_text_and_thinking(content);
    info!(fragments = fragments.len(), "split model output");
    fragments
}

/// `schema`: parse one JSON Schema node and rewrite it for `settings.model_name`.
///
/// Warnings are logged. With `fail_on_warning` set they turn into
/// [`AdapterError::WarningsRaised`] after logging.
pub fn rewrite_schema(raw: &str, settings: &SchemaConfig) -> Result<Value> {
    let profile =
        google_model_profile(&settings.model_name).ok_or_else(|| AdapterError::Config {
            message: format!("no model profile for {}", settings.model_name),
        })?;

    let schema: Value = serde_json::from_str(raw)?;
    let mut warnings = Vec::new();
    let rewritten = profile.transform_schema(schema, &mut warnings)?;

    for warning in &warnings {
        warn!(kind = ?warning.kind, "{}", warning.message);
    }
    if settings.fail_on_warning && !warnings.is_empty() {
        return Err(AdapterError::WarningsRaised {
            count: warnings.len(),
        });
    }
    Ok(rewritten)
}
