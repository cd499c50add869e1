//! Text codec for the state and action records.
//!
//! The encoder renders any [`Value`] tree into a compact JSON-compatible
//! record with three deliberate deviations from a general JSON writer:
//!
//! - floats always use a fixed number of fractional digits, never exponents
//! - non-finite floats become the quoted sentinels `"nan"`, `"inf"`, `"-inf"`
//! - tables nested deeper than the cap become the `"<depth exceeded>"` marker
//!
//! Tables are rendered as arrays when their keys are exactly the dense range
//! `1..=n`, and as objects otherwise.
//!
//! Decoding is asymmetric. The action record is read with a field matcher
//! keyed by literal field names and a signed-integer grammar
//! ([`decode_action_fields`]); it never needs a general value grammar. The
//! consumer side of the state record uses `serde_json` with lenient float
//! fields that accept the sentinels ([`decode_snapshot`]).

mod decode;
mod encode;
mod value;

pub use decode::{
    ActionDecodeError, decode_action, decode_action_fields, decode_snapshot, lenient_f32,
};
pub use encode::{EncodeOptions, encode, encode_with};
pub use value::{Key, Table, Value};

use thiserror::Error;

/// Sentinel written in place of a table nested beyond the depth cap.
pub const DEPTH_EXCEEDED: &str = "<depth exceeded>";
/// Sentinel for a not-a-number float.
pub const NAN_SENTINEL: &str = "nan";
/// Sentinel for positive infinity.
pub const INF_SENTINEL: &str = "inf";
/// Sentinel for negative infinity.
pub const NEG_INF_SENTINEL: &str = "-inf";

/// Malformed or incomplete record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("field `{field}` does not hold a signed integer (found `{found}`)")]
    InvalidValue { field: &'static str, found: String },

    #[error("malformed state record: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
