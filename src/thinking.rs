//! Splitting of inline `<think>` markup out of raw model output
//!
//! Some models don't return their reasoning as a separate part, but inline in
//! the content wrapped in `<think>...</think>`. This module partitions such
//! content into ordered text and thought fragments.

use serde::{Deserialize, Serialize};

/// Opening delimiter of an inline thinking block
pub const START_THINK_TAG: &str = "<think>";
/// Closing delimiter of an inline thinking block
pub const END_THINK_TAG: &str = "</think>";

/// One piece of model output, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "snake_case")]
pub enum TextFragment {
    Text { content: String },
    Thought { content: String },
}

impl TextFragment {
    pub fn text(content: impl Into<String>) -> Self {
        TextFragment::Text {
            content: content.into(),
        }
    }

    pub fn thought(content: impl Into<String>) -> Self {
        TextFragment::Thought {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            TextFragment::Text { content } | TextFragment::Thought { content } => content,
        }
    }

    pub fn is_thought(&self) -> bool {
        matches!(self, TextFragment::Thought { .. })
    }
}

/// Split a string into text and thought fragments.
///
/// Plain text between tags becomes [`TextFragment::Text`] (never empty),
/// the body of each `<think>...</think>` pair becomes
/// [`TextFragment::Thought`] (kept even when empty). An unterminated
/// `<think>` loses its tag and the rest of the input is demoted to text.
///
/// ```
/// use mind_adapters::thinking::{split_content_into_text_and_thinking, TextFragment};
///
/// let parts = split_content_into_text_and_thinking("a<think>b</think>c");
/// assert_eq!(
///     parts,
///     vec![TextFragment::text("a"), TextFragment::thought("b"), TextFragment::text("c")]
/// );
/// ```
pub fn split_content_into_text_and_thinking(content: &str) -> Vec<TextFragment> {
    let mut parts = Vec::new();
    let mut cursor = 0usize;

    while cursor < content.len() {
        let rest = &content[cursor..];
        let Some(start_rel) = rest.find(START_THINK_TAG) else {
            parts.push(TextFragment::text(rest));
            break;
        };
        if start_rel > 0 {
            parts.push(TextFragment::text(&rest[..start_rel]));
        }

        let think_start = cursor + start_rel + START_THINK_TAG.len();
        let body = &content[think_start..];
        let Some(end_rel) = body.find(END_THINK_TAG) else {
            // The `<think>` tag itself is dropped here.
            if !body.is_empty() {
                parts.push(TextFragment::text(body));
            }
            break;
        };
        parts.push(TextFragment::thought(&body[..end_rel]));
        cursor = think_start + end_rel + END_THINK_TAG.len();
    }

    parts
}

/// Re-render fragments as a single string, wrapping thoughts in the tag pair.
///
/// For content whose tags are well formed this is the inverse of
/// [`split_content_into_text_and_thinking`].
pub fn render_with_tags(fragments: &[TextFragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            TextFragment::Text { content } => out.push_str(content),
            TextFragment::Thought { content } => {
                out.push_str(START_THINK_TAG);
                out.push_str(content);
                out.push_str(END_THINK_TAG);
            }
        }
    }
    out
}
