//! JSON Schema rewriting for Gemini function declarations
//!
//! Gemini [supports](https://ai.google.dev/gemini-api/docs/function-calling#function_declarations)
//! a subset of OpenAPI v3.0.3. The transformer here rewrites a single schema
//! node into that subset; walking nested nodes and inlining `$defs` is left
//! to the caller.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{AdapterError, Result};

/// One JSON Schema node
pub type JsonSchema = Map<String, Value>;

/// Keys Gemini rejects that carry no validation meaning worth preserving
const DROPPED_KEYS: &[&str] = &[
    "title",
    "default",
    "$schema",
    "discriminator",
    "examples",
    "exclusiveMaximum",
    "exclusiveMinimum",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaWarningKind {
    AdditionalPropertiesDropped,
}

/// Non-fatal capability loss reported while rewriting a node
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaWarning {
    pub kind: SchemaWarningKind,
    pub message: String,
    /// The node as it was before rewriting
    pub source: JsonSchema,
}

/// Rewrites one schema node for a particular provider.
///
/// Implementations take ownership of the node and return the rewritten one.
/// Non-fatal problems are pushed onto `warnings`.
pub trait JsonSchemaTransformer: Send + Sync + std::fmt::Debug {
    fn transform(&self, schema: JsonSchema, warnings: &mut Vec<SchemaWarning>)
    -> Result<JsonSchema>;

    /// Like [`transform`](Self::transform), for an untyped JSON value that must be an object.
    fn transform_value(&self, value: Value, warnings: &mut Vec<SchemaWarning>) -> Result<Value> {
        match value {
            Value::Object(schema) => Ok(Value::Object(self.transform(schema, warnings)?)),
            other => Err(AdapterError::InvalidSchema {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

/// Transforms a JSON Schema node to be suitable for Gemini.
///
/// Gemini doesn't allow `title`, `$ref`, `oneOf` on untyped nodes,
/// non-string enums, `prefixItems`, or `additionalProperties`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleJsonSchemaTransformer;

impl GoogleJsonSchemaTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl JsonSchemaTransformer for GoogleJsonSchemaTransformer {
    fn transform(
        &self,
        mut schema: JsonSchema,
        warnings: &mut Vec<SchemaWarning>,
    ) -> Result<JsonSchema> {
        drop_additional_properties(&mut schema, warnings);

        for key in DROPPED_KEYS {
            schema.remove(*key);
        }

        const_to_enum(&mut schema);
        stringify_enum(&mut schema);
        one_of_to_any_of(&mut schema);
        format_into_description(&mut schema);
        collapse_prefix_items(&mut schema);

        // Checked last so the error reflects a fully rewritten node.
        if let Some(reference) = schema.get("$ref") {
            let reference = match reference {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(AdapterError::RecursiveRef { reference });
        }

        Ok(schema)
    }
}

fn drop_additional_properties(schema: &mut JsonSchema, warnings: &mut Vec<SchemaWarning>) {
    if !schema.contains_key("additionalProperties") {
        return;
    }
    let source = schema.clone();
    let Some(additional) = schema.remove("additionalProperties") else {
        return;
    };
    if !is_truthy(&additional) {
        return;
    }
    let message = format!(
        "`additionalProperties` is not supported by Gemini; it will be removed from the tool JSON schema. \
         Source of additionalProperties: {}. \
         If this came from a field with a type like `dict[str, MyType]` or `HashMap<String, T>`, \
         that field will always be empty.",
        Value::Object(source.clone())
    );
    warnings.push(SchemaWarning {
        kind: SchemaWarningKind::AdditionalPropertiesDropped,
        message,
        source,
    });
}

fn const_to_enum(schema: &mut JsonSchema) {
    match schema.remove("const") {
        None | Some(Value::Null) => {}
        Some(value) => {
            debug!("rewriting const into single-value enum");
            schema.insert("enum".to_string(), Value::Array(vec![value]));
        }
    }
}

fn stringify_enum(schema: &mut JsonSchema) {
    let Some(Value::Array(members)) = schema.get_mut("enum") else {
        return;
    };
    if members.is_empty() {
        return;
    }
    for member in members.iter_mut() {
        if !member.is_string() {
            *member = Value::String(member.to_string());
        }
    }
    schema.insert("type".to_string(), json!("string"));
}

fn one_of_to_any_of(schema: &mut JsonSchema) {
    if schema.contains_key("type") {
        return;
    }
    if let Some(one_of) = schema.remove("oneOf") {
        debug!("renaming untyped oneOf to anyOf");
        schema.insert("anyOf".to_string(), one_of);
    }
}

fn format_into_description(schema: &mut JsonSchema) {
    if schema.get("type").and_then(Value::as_str) != Some("string") {
        return;
    }
    let Some(format) = schema.remove("format") else {
        return;
    };
    let format = match format {
        Value::String(s) => s,
        other => other.to_string(),
    };
    let description = match schema.get("description").and_then(Value::as_str) {
        Some(desc) if !desc.is_empty() => format!("{desc} (format: {format})"),
        _ => format!("Format: {format}"),
    };
    schema.insert("description".to_string(), Value::String(description));
}

fn collapse_prefix_items(schema: &mut JsonSchema) {
    let Some(prefix_items) = schema.remove("prefixItems") else {
        return;
    };
    let prefix_items = match prefix_items {
        Value::Array(items) => items,
        other => vec![other],
    };
    let prefix_len = prefix_items.len();
    // A null `items` counts as no items schema at all.
    let mut unique: Vec<Value> = schema
        .remove("items")
        .filter(|items| !items.is_null())
        .into_iter()
        .collect();
    let had_items = !unique.is_empty();
    for item in prefix_items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }

    match unique.len() {
        0 => {}
        1 => {
            if let Some(only) = unique.pop() {
                schema.insert("items".to_string(), only);
            }
        }
        _ => {
            schema.insert("items".to_string(), json!({ "anyOf": unique }));
        }
    }

    schema
        .entry("minItems")
        .or_insert_with(|| json!(prefix_len));
    if !had_items {
        schema
            .entry("maxItems")
            .or_insert_with(|| json!(prefix_len));
    }
    debug!(prefix_len, had_items, "collapsed prefixItems into items");
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: Value) -> JsonSchema {
        value.as_object().cloned().unwrap_or_else(Map::new)
    }

    #[test]
    fn test_const_rule_produces_single_value_enum() {
        let mut schema = node(json!({"const": 5}));
        const_to_enum(&mut schema);
        assert_eq!(Value::Object(schema), json!({"enum": [5]}));
    }

    #[test]
    fn test_null_const_is_dropped() {
        let mut schema = node(json!({"const": null, "type": "null"}));
        const_to_enum(&mut schema);
        assert_eq!(Value::Object(schema), json!({"type": "null"}));
    }

    #[test]
    fn test_string_enum_keeps_members_and_forces_type() {
        let mut schema = node(json!({"enum": ["a", "b"]}));
        stringify_enum(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"type": "string", "enum": ["a", "b"]})
        );
    }

    #[test]
    fn test_mixed_enum_members_use_json_text() {
        let mut schema = node(json!({"type": "number", "enum": [1, 2.5, true, null, "x"]}));
        stringify_enum(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"type": "string", "enum": ["1", "2.5", "true", "null", "x"]})
        );
    }

    #[test]
    fn test_empty_enum_is_left_alone() {
        let mut schema = node(json!({"type": "integer", "enum": []}));
        stringify_enum(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"type": "integer", "enum": []})
        );
    }

    #[test]
    fn test_format_without_description() {
        let mut schema = node(json!({"type": "string", "format": "uuid"}));
        format_into_description(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"type": "string", "description": "Format: uuid"})
        );
    }

    #[test]
    fn test_format_kept_on_non_string_types() {
        let mut schema = node(json!({"type": "integer", "format": "int64"}));
        format_into_description(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"type": "integer", "format": "int64"})
        );
    }

    #[test]
    fn test_prefix_items_dedup_against_existing_items() {
        let mut schema = node(json!({
            "type": "array",
            "items": {"type": "string"},
            "prefixItems": [{"type": "string"}, {"type": "integer"}, {"type": "integer"}]
        }));
        collapse_prefix_items(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({
                "type": "array",
                "items": {"anyOf": [{"type": "string"}, {"type": "integer"}]},
                "minItems": 3
            })
        );
    }

    #[test]
    fn test_prefix_items_single_unique_entry_is_inlined() {
        let mut schema = node(json!({"prefixItems": [{"type": "number"}, {"type": "number"}]}));
        collapse_prefix_items(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"items": {"type": "number"}, "minItems": 2, "maxItems": 2})
        );
    }

    #[test]
    fn test_empty_prefix_items_leaves_items_unset() {
        let mut schema = node(json!({"prefixItems": []}));
        collapse_prefix_items(&mut schema);
        assert_eq!(Value::Object(schema), json!({"minItems": 0, "maxItems": 0}));
    }

    #[test]
    fn test_prefix_items_respects_existing_bounds() {
        let mut schema = node(json!({
            "prefixItems": [{"type": "string"}],
            "minItems": 1,
            "maxItems": 4
        }));
        collapse_prefix_items(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"items": {"type": "string"}, "minItems": 1, "maxItems": 4})
        );
    }

    #[test]
    fn test_null_items_is_treated_as_absent() {
        let mut schema = node(json!({"items": null, "prefixItems": [{"type": "string"}]}));
        collapse_prefix_items(&mut schema);
        assert_eq!(
            Value::Object(schema),
            json!({"items": {"type": "string"}, "minItems": 1, "maxItems": 1})
        );
    }

    #[test]
    fn test_truthiness_matches_json_semantics() {
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!({"type": "integer"})));
    }

    #[test]
    fn test_transform_value_rejects_non_objects() {
        let mut warnings = Vec::new();
        let err = GoogleJsonSchemaTransformer
            .transform_value(json!([1, 2]), &mut warnings)
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidSchema { .. }));
    }
}
