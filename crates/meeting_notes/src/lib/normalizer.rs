//! # Response Normalizer
//!
//! Turns the free-form text a chat model returns into a [`MeetingAnalysis`].
//! Models asked for JSON still wrap it in code fences, surround it with
//! commentary, drop fields or cram several bullet points into one string;
//! every one of those is repaired here, and a reply that holds no parseable
//! object at all degrades to [`MeetingAnalysis::fallback`] instead of an error.

use std::borrow::Cow;

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::types::{ListItem, MeetingAnalysis};

const FENCE: &str = "```";
const ITEM_DELIMITER: &str = " - ";
/// An item is split only when it holds strictly more delimiters than this
const SPLIT_THRESHOLD: usize = 2;

const SUMMARY_KEYS: &[&str] = &["summary", "meeting_summary"];
const PARTICIPANT_KEYS: &[&str] = &["participants"];
const DECISION_KEYS: &[&str] = &["keyDecisions", "key_decisions"];
const ACTION_KEYS: &[&str] = &["actionItems", "action_items"];
const DISCUSSION_KEYS: &[&str] = &["discussionPoints", "discussion_points"];

#[derive(Debug, thiserror::Error)]
enum NormalizeError {
    #[error("No JSON object found in response")]
    NoObject,
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Normalizes a raw model reply into a complete [`MeetingAnalysis`].
///
/// # Parameters
/// * `raw_response`: the model's reply, verbatim.
///
/// # Returns
/// * The repaired record, or the fallback record when no JSON object can be
///   parsed out of the reply. This function never fails.
#[tracing::instrument(skip_all, fields(len = raw_response.len()))]
pub fn normalize(raw_response: &str) -> MeetingAnalysis {
    parse_analysis(raw_response).unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            excerpt = %raw_response.chars().take(200).collect::<String>(),
            "Falling back to degraded analysis"
        );
        MeetingAnalysis::fallback(raw_response)
    })
}

fn parse_analysis(raw_response: &str) -> Result<MeetingAnalysis, NormalizeError> {
    let unwrapped = strip_code_fence(raw_response);
    let span = brace_span(&unwrapped).ok_or(NormalizeError::NoObject)?;

    // a span that starts with `{` can only parse to an object
    let Value::Object(mut object) = serde_json::from_str::<Value>(span)? else {
        return Err(NormalizeError::NoObject);
    };

    let summary = match take_field(&mut object, SUMMARY_KEYS) {
        None | Some(Value::Null) => MeetingAnalysis::NO_SUMMARY.to_string(),
        Some(value) => ListItem::from(value).into_text(),
    };

    Ok(MeetingAnalysis {
        summary,
        participants: list_items(take_field(&mut object, PARTICIPANT_KEYS)).collect(),
        key_decisions: split_items(take_field(&mut object, DECISION_KEYS)),
        action_items: split_items(take_field(&mut object, ACTION_KEYS)),
        discussion_points: split_items(take_field(&mut object, DISCUSSION_KEYS)),
    })
}

/// Removes a surrounding code fence, working on whole lines only.
///
/// The opening line (with its optional language tag) is dropped, and the last
/// non-empty line is dropped when it is a closing fence. Text that does not
/// start with a fence is returned untouched.
pub fn strip_code_fence(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim();
    if !trimmed.starts_with(FENCE) {
        return Cow::Borrowed(text);
    }

    let mut lines = trimmed.lines().skip(1).collect::<Vec<_>>();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    if lines.last().is_some_and(|line| line.trim_start().starts_with(FENCE)) {
        lines.pop();
    }

    Cow::Owned(lines.into_iter().join("\n"))
}

/// Returns the longest `{ ... }` span: first opening brace through last closing brace.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Removes the first present key among `keys`; null counts as absent only
/// when no other spelling carries a value.
fn take_field(object: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let mut found = None;
    for key in keys {
        match object.remove(*key) {
            Some(Value::Null) => found = found.or(Some(Value::Null)),
            Some(value) => return Some(value),
            None => {}
        }
    }
    found
}

/// Coerces a list field to its elements' text; a scalar counts as a one-item list.
fn list_items(field: Option<Value>) -> impl Iterator<Item = String> {
    let values = match field {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values,
        Some(scalar) => vec![scalar],
    };

    values
        .into_iter()
        .map(|value| ListItem::from(value).into_text())
}

/// Coerces a list field and un-concatenates items that pack several bullets
/// joined by `" - "`.
fn split_items(field: Option<Value>) -> Vec<String> {
    list_items(field).flat_map(split_item).collect()
}

fn split_item(item: String) -> Vec<String> {
    if item.matches(ITEM_DELIMITER).count() > SPLIT_THRESHOLD {
        item.split(ITEM_DELIMITER)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![item.trim().to_string()]
    }
}
