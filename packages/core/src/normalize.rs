//! Flattening of raw remote results and detection of embedded errors.
//!
//! The remote service wraps every answer in an object with exactly one entry
//! (`{"runMutalyzerResult": {...}}`), and wraps each record-valued field of
//! that answer once more (`"messages": {"SoapMessage": [...]}`). Both layers
//! are peeled off here with [`SingletonWrapper`], leaving a
//! [`NormalizedResult`] whose top-level values are scalars or arrays.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PipelineError;

// --- singleton wrapper -------------------------------------------------------

/// An object known to hold exactly one entry.
///
/// Constructing one from anything else fails with
/// [`PipelineError::MalformedResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct SingletonWrapper {
    key: String,
    value: Value,
}

impl SingletonWrapper {
    /// The name of the single entry (e.g. `runMutalyzerResult`).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Discard the wrapper and return the wrapped value.
    pub fn unwrap_value(self) -> Value {
        self.value
    }
}

impl TryFrom<Value> for SingletonWrapper {
    type Error = PipelineError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(PipelineError::MalformedResult(format!(
                "expected a single-entry object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

impl TryFrom<Map<String, Value>> for SingletonWrapper {
    type Error = PipelineError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(PipelineError::MalformedResult(format!(
                "expected exactly one entry in wrapper, found {}",
                map.len()
            )));
        }
        let (key, value) = map
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::MalformedResult("empty wrapper".into()))?;
        Ok(Self { key, value })
    }
}

// --- normalized result -------------------------------------------------------

/// A flat, ordered mapping from field name to scalar or array value.
///
/// Key order follows the remote result; the transcript scan depends on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResult {
    fields: Map<String, Value>,
}

impl NormalizedResult {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A message embedded in a remote result.
///
/// Codes starting with `E` are fatal; everything else is informational.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "errorcode")]
    pub code: String,
    #[serde(rename = "message", default)]
    pub text: String,
}

impl ErrorMessage {
    pub fn is_fatal(&self) -> bool {
        self.code.starts_with('E')
    }
}

/// Unwrap, flatten and error-check a raw remote result.
///
/// Fails with [`PipelineError::MalformedResult`] when either wrapper layer
/// does not hold exactly one entry, and with [`PipelineError::Domain`] for
/// the first fatal message when the result reports errors.
pub fn normalize(raw: Value) -> Result<NormalizedResult, PipelineError> {
    let outer = SingletonWrapper::try_from(raw)?;
    let Value::Object(record) = outer.value else {
        return Err(PipelineError::MalformedResult(format!(
            "{} is not a record",
            outer.key
        )));
    };

    let mut fields = Map::with_capacity(record.len());
    for (name, value) in record {
        let value = match value {
            Value::Object(nested) => SingletonWrapper::try_from(nested)
                .map_err(|e| PipelineError::MalformedResult(format!("field {name:?}: {e}")))?
                .unwrap_value(),
            other => other,
        };
        fields.insert(name, value);
    }

    let result = NormalizedResult { fields };
    if error_count(&result) > 0 {
        if let Some(fatal) = messages(&result).into_iter().find(ErrorMessage::is_fatal) {
            return Err(PipelineError::Domain {
                code: fatal.code,
                text: fatal.text,
            });
        }
    }
    Ok(result)
}

// --- helpers -----------------------------------------------------------------

fn error_count(result: &NormalizedResult) -> i64 {
    match result.get("errors") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Messages in list order. A lone message object counts as a list of one;
/// entries that do not look like messages are skipped.
fn messages(result: &NormalizedResult) -> Vec<ErrorMessage> {
    let parse = |v: &Value| ErrorMessage::deserialize(v).ok();
    match result.get("messages") {
        Some(Value::Array(items)) => items.iter().filter_map(parse).collect(),
        Some(v @ Value::Object(_)) => parse(v).into_iter().collect(),
        _ => vec![],
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// --- tests -------------------------------------------------------------------
