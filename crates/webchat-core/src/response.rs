//! Normalization of agent run results into API answers.
//!
//! Run results come from a nondeterministic upstream whose shape is not
//! guaranteed. Nothing in this module fails the request: text extraction always
//! produces a non-empty string, and source extraction degrades to an empty
//! list at a single logged boundary ([`extract_sources`]).

use serde_json::Value;
use webchat_types::agent::{AgentMessage, AgentRunResult, RunOutput, Source};

/// Payload fields probed for the answer text, in priority order.
pub const PAYLOAD_FIELDS: [&str; 3] = ["content", "output_text", "text"];

/// Title used when a source carries neither `title` nor `snippet`.
pub const DEFAULT_SOURCE_TITLE: &str = "source";

/// Why a run result's sources could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("sources field is not a list")]
    SourcesNotList,

    #[error("source entry {0} is not an object")]
    SourceNotObject(usize),
}

/// Extract the answer text from a run result.
///
/// Resolution order, first match wins:
/// 1. the first non-blank payload field in [`PAYLOAD_FIELDS`] order
/// 2. the last assistant message with non-blank content
/// 3. the string rendering of the whole result (its `Debug` form if blank)
pub fn extract_text(result: &AgentRunResult) -> String {
    payload_text(result)
        .or_else(|| last_assistant_message(result))
        .unwrap_or_else(|| coerce_to_string(result))
}

fn payload_text(result: &AgentRunResult) -> Option<String> {
    PAYLOAD_FIELDS
        .iter()
        .find_map(|field| match result {
            AgentRunResult::Completion(output) => output_field(output, field),
            AgentRunResult::Json(value) => value.get(*field).and_then(Value::as_str),
            AgentRunResult::Opaque(_) => None,
        }
        .and_then(non_blank))
}

fn output_field<'a>(output: &'a RunOutput, field: &str) -> Option<&'a str> {
    match field {
        "content" => output.content.as_deref(),
        "output_text" => output.output_text.as_deref(),
        "text" => output.text.as_deref(),
        _ => None,
    }
}

fn last_assistant_message(result: &AgentRunResult) -> Option<String> {
    match result {
        AgentRunResult::Completion(output) => output
            .messages
            .iter()
            .rev()
            .filter(|m: &&AgentMessage| m.role == "assistant")
            .find_map(|m| m.content.as_deref().and_then(non_blank)),
        AgentRunResult::Json(value) => value
            .get("messages")
            .and_then(Value::as_array)?
            .iter()
            .rev()
            .filter(|m| m.get("role").and_then(Value::as_str) == Some("assistant"))
            .find_map(|m| m.get("content").and_then(Value::as_str).and_then(non_blank)),
        AgentRunResult::Opaque(_) => None,
    }
}

fn coerce_to_string(result: &AgentRunResult) -> String {
    let rendered = result.to_string();
    if rendered.trim().is_empty() {
        format!("{result:?}")
    } else {
        rendered
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extract source citations, swallowing malformed shapes.
///
/// This is the one place where source-extraction errors are discarded:
/// sources decorate the answer and never block it. Entries read before a
/// malformed one are kept; reading stops at the first malformed entry. A
/// `sources` field that is not a list yields nothing.
pub fn extract_sources(result: &AgentRunResult) -> Vec<Source> {
    let entries = match source_entries(result) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed agent sources");
            return Vec::new();
        }
    };

    let mut sources = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match parse_source(index, entry) {
            Ok(Some(source)) => sources.push(source),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, kept = sources.len(), "Stopping at malformed agent source");
                break;
            }
        }
    }
    sources
}

/// Read source citations from a run result, failing on any malformed entry.
///
/// Entries without a URL (`href`, then `url`) are dropped. Titles fall back
/// from `title` to `snippet` to [`DEFAULT_SOURCE_TITLE`]. A missing or null
/// `sources` field yields an empty list.
pub fn try_extract_sources(result: &AgentRunResult) -> Result<Vec<Source>, ExtractError> {
    let entries = source_entries(result)?;
    let mut sources = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if let Some(source) = parse_source(index, entry)? {
            sources.push(source);
        }
    }
    Ok(sources)
}

fn source_entries(result: &AgentRunResult) -> Result<&[Value], ExtractError> {
    match result {
        AgentRunResult::Completion(output) => Ok(output.sources.as_deref().unwrap_or_default()),
        AgentRunResult::Json(value) => match value.get("sources") {
            None | Some(Value::Null) => Ok(&[][..]),
            Some(Value::Array(entries)) => Ok(entries.as_slice()),
            Some(_) => Err(ExtractError::SourcesNotList),
        },
        AgentRunResult::Opaque(_) => Ok(&[][..]),
    }
}

/// One source entry; `Ok(None)` when it carries no URL.
fn parse_source(index: usize, entry: &Value) -> Result<Option<Source>, ExtractError> {
    let obj = entry
        .as_object()
        .ok_or(ExtractError::SourceNotObject(index))?;

    let Some(url) = ["href", "url"].iter().find_map(|k| obj.get(*k).and_then(scalar_text)) else {
        return Ok(None);
    };
    let title = ["title", "snippet"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(scalar_text))
        .unwrap_or_else(|| DEFAULT_SOURCE_TITLE.to_string());

    Ok(Some(Source { title, url }))
}

/// Present, non-empty value as text: strings verbatim, other scalars as JSON.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use webchat_types::agent::AgentMessage;

    use super::*;

    fn assistant(content: &str) -> AgentMessage {
        AgentMessage {
            role: "assistant".to_string(),
            content: Some(content.to_string()),
        }
    }

    #[test]
    fn test_content_field_wins() {
        let result = AgentRunResult::Completion(RunOutput {
            content: Some("hi".to_string()),
            text: Some("ignored".to_string()),
            ..Default::default()
        });
        assert_eq!(extract_text(&result), "hi");
    }

    #[test]
    fn test_blank_payload_falls_through_in_order() {
        let result = AgentRunResult::Completion(RunOutput {
            content: Some("   ".to_string()),
            output_text: None,
            text: Some("  from text  ".to_string()),
            ..Default::default()
        });
        assert_eq!(extract_text(&result), "from text");
    }

    #[test]
    fn test_last_assistant_message() {
        let result = AgentRunResult::Completion(RunOutput {
            messages: vec![
                assistant("earlier"),
                AgentMessage {
                    role: "user".to_string(),
                    content: Some("question".to_string()),
                },
                assistant("ok"),
                AgentMessage {
                    role: "tool".to_string(),
                    content: Some("tool output".to_string()),
                },
            ],
            ..Default::default()
        });
        assert_eq!(extract_text(&result), "ok");
    }

    #[test]
    fn test_json_payload_and_messages() {
        let result = AgentRunResult::Json(json!({"output_text": "from json"}));
        assert_eq!(extract_text(&result), "from json");

        let result = AgentRunResult::Json(json!({
            "messages": [
                {"role": "assistant", "content": "first"},
                {"role": "assistant", "content": ""},
                {"role": "user", "content": "thanks"}
            ]
        }));
        assert_eq!(extract_text(&result), "first");
    }

    #[test]
    fn test_opaque_falls_back_to_string() {
        let result = AgentRunResult::Opaque("RunResponse(status=done)".to_string());
        assert_eq!(extract_text(&result), "RunResponse(status=done)");
    }

    #[test]
    fn test_never_empty() {
        let cases = vec![
            AgentRunResult::Opaque(String::new()),
            AgentRunResult::Opaque("  ".to_string()),
            AgentRunResult::Json(json!(null)),
            AgentRunResult::Json(json!({"content": 42})),
            AgentRunResult::Completion(RunOutput::default()),
        ];
        for result in cases {
            let text = extract_text(&result);
            assert!(!text.trim().is_empty(), "empty text for {result:?}");
        }
    }

    #[test]
    fn test_sources_drop_missing_url_and_default_title() {
        let result = AgentRunResult::Json(json!({
            "content": "answer",
            "sources": [
                {"title": "Docs", "href": "https://a.example"},
                {"snippet": "A snippet", "url": "https://b.example"},
                {"url": "https://c.example"},
                {"title": "No link"},
                {"title": "", "href": "", "url": "https://d.example"}
            ]
        }));

        let sources = extract_sources(&result);
        assert_eq!(
            sources,
            vec![
                Source { title: "Docs".into(), url: "https://a.example".into() },
                Source { title: "A snippet".into(), url: "https://b.example".into() },
                Source { title: "source".into(), url: "https://c.example".into() },
                Source { title: "source".into(), url: "https://d.example".into() },
            ]
        );
    }

    #[test]
    fn test_sources_absent() {
        let result = AgentRunResult::Completion(RunOutput::from_content("x"));
        assert!(extract_sources(&result).is_empty());
        assert!(extract_sources(&AgentRunResult::Opaque("x".into())).is_empty());
        assert!(extract_sources(&AgentRunResult::Json(json!({"sources": null}))).is_empty());
    }

    #[test]
    fn test_malformed_sources_are_swallowed() {
        let result = AgentRunResult::Json(json!({"sources": "not a list"}));
        assert!(matches!(
            try_extract_sources(&result),
            Err(ExtractError::SourcesNotList)
        ));
        assert!(extract_sources(&result).is_empty());

        let result = AgentRunResult::Json(json!({"sources": [7, {"url": "https://a"}]}));
        assert!(matches!(
            try_extract_sources(&result),
            Err(ExtractError::SourceNotObject(0))
        ));
        assert!(extract_sources(&result).is_empty());
    }

    #[test]
    fn test_sources_before_malformed_entry_are_kept() {
        let result = AgentRunResult::Json(json!({
            "content": "answer",
            "sources": [
                {"title": "Docs", "href": "https://a.example"},
                {"title": "No link"},
                "oops",
                {"title": "Later", "url": "https://b.example"}
            ]
        }));

        assert!(matches!(
            try_extract_sources(&result),
            Err(ExtractError::SourceNotObject(2))
        ));
        assert_eq!(
            extract_sources(&result),
            vec![Source { title: "Docs".into(), url: "https://a.example".into() }]
        );
    }

    #[test]
    fn test_completion_sources() {
        let result = AgentRunResult::Completion(RunOutput {
            content: Some("x".into()),
            sources: Some(vec![json!({"title": "T", "url": "https://t"})]),
            ..Default::default()
        });
        assert_eq!(
            extract_sources(&result),
            vec![Source { title: "T".into(), url: "https://t".into() }]
        );
    }
}
