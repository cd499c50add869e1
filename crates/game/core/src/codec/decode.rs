//! Record text → values.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::{CodecError, INF_SENTINEL, NAN_SENTINEL, NEG_INF_SENTINEL, Result};
use crate::command::{ActionCommand, ValidationError};
use crate::snapshot::WorldSnapshot;

/// Extracts the four raw action components, in [`ActionCommand::FIELDS`] order.
///
/// Returns `Ok(None)` for empty or empty-object input: the producer
/// has not written anything yet, which is not an error. Field order and
/// whitespace are irrelevant; any missing field rejects the whole record.
pub fn decode_action_fields(text: &str) -> Result<Option<[i64; 4]>> {
    if is_blank(text) {
        return Ok(None);
    }

    let mut raw = [0_i64; 4];
    for (slot, field) in raw.iter_mut().zip(ActionCommand::FIELDS) {
        *slot = match_integer_field(text, field)?;
    }
    Ok(Some(raw))
}

/// Outcome of [`decode_action`]: the record was malformed, or well-formed but
/// out of domain.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionDecodeError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Field-matches and validates an action record in one step.
pub fn decode_action(
    text: &str,
) -> std::result::Result<Option<ActionCommand>, ActionDecodeError> {
    let Some(raw) = decode_action_fields(text)? else {
        return Ok(None);
    };
    Ok(Some(ActionCommand::from_components(raw)?))
}

/// Decodes a full state record on the consumer side.
///
/// Returns `Ok(None)` for near-empty input.
pub fn decode_snapshot(text: &str) -> Result<Option<WorldSnapshot>> {
    if is_blank(text) {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| CodecError::Json(e.to_string()))
}

/// Whitespace only, or an empty object: nothing left once whitespace and
/// one outer pair of braces are stripped.
fn is_blank(text: &str) -> bool {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);
    inner.trim().is_empty()
}

/// Finds `"field"` used as a key and parses the signed integer after the colon.
fn match_integer_field(text: &str, field: &'static str) -> Result<i64> {
    let needle = format!("\"{}\"", field);
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find(&needle) {
        let after_key = search_from + found + needle.len();
        let rest = text[after_key..].trim_start();
        if let Some(value) = rest.strip_prefix(':') {
            return parse_signed_integer(value.trim_start(), field);
        }
        search_from = after_key;
    }

    Err(CodecError::MissingField(field))
}

/// `-?[0-9]+` followed by a delimiter or end of input.
fn parse_signed_integer(text: &str, field: &'static str) -> Result<i64> {
    let invalid = || CodecError::InvalidValue {
        field,
        found: text.chars().take(16).collect(),
    };

    let bytes = text.as_bytes();
    let sign_len = usize::from(bytes.first() == Some(&b'-'));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(invalid());
    }

    let end = sign_len + digits;
    match bytes.get(end) {
        None => {}
        Some(b) if b.is_ascii_whitespace() || *b == b',' || *b == b'}' => {}
        Some(_) => return Err(invalid()),
    }

    text[..end].parse::<i64>().map_err(|_| invalid())
}

/// Deserializes a float field that may hold a number or one of the
/// non-finite sentinels.
pub fn lenient_f32<'de, D>(deserializer: D) -> std::result::Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Text(String),
    }

    match Wire::deserialize(deserializer)? {
        Wire::Number(n) => Ok(n as f32),
        Wire::Text(s) => match s.as_str() {
            NAN_SENTINEL => Ok(f32::NAN),
            INF_SENTINEL => Ok(f32::INFINITY),
            NEG_INF_SENTINEL => Ok(f32::NEG_INFINITY),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or non-finite sentinel, found `{}`",
                other
            ))),
        },
    }
}
