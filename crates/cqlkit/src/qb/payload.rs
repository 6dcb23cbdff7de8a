//! Mutation payloads for INSERT and UPDATE.

use crate::convert::to_native;
use crate::error::{CqlError, CqlResult};
use crate::value::Value;
use chrono::{DateTime, Utc};

/// How a single column is written.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Bound as `?` and converted through the table schema.
    Value(Value),
    /// Fragment appended right after the column name: `col = col + 1`.
    Increment(String),
    /// Inserted verbatim, never bound.
    Raw(String),
    /// Inserted verbatim; each `?` in the literal binds the next trailing parameter.
    RawWithParams { literal: String, params: Vec<Value> },
    /// Conditional write marker: `!value`, or `!col` when no value is given.
    Coalesce(Option<String>),
}

impl Assignment {
    /// `col = col + delta` (or `- |delta|` for negative deltas).
    pub fn increment(delta: i64) -> Self {
        if delta < 0 {
            Assignment::Increment(format!(" - {}", delta.unsigned_abs()))
        } else {
            Assignment::Increment(format!(" + {delta}"))
        }
    }

    /// `col = col - delta` (or `+ |delta|` for negative deltas).
    pub fn decrement(delta: i64) -> Self {
        if delta < 0 {
            Assignment::Increment(format!(" + {}", delta.unsigned_abs()))
        } else {
            Assignment::Increment(format!(" - {delta}"))
        }
    }

    pub fn raw(literal: impl Into<String>) -> Self {
        Assignment::Raw(literal.into())
    }

    pub fn raw_with_params(literal: impl Into<String>, params: Vec<Value>) -> Self {
        Assignment::RawWithParams {
            literal: literal.into(),
            params,
        }
    }

    /// Null-coalescing marker. A null value refers back to the column itself.
    pub fn coalesce(value: impl Into<Value>) -> Self {
        Assignment::Coalesce(render_literal(value.into()))
    }
}

impl From<Value> for Assignment {
    fn from(v: Value) -> Self {
        Assignment::Value(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Assignment {
    fn from(v: Option<T>) -> Self {
        Assignment::Value(v.into())
    }
}

macro_rules! impl_assignment_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Assignment {
                fn from(v: $t) -> Self {
                    Assignment::Value(v.into())
                }
            }
        )*
    };
}

impl_assignment_value!(
    i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, Vec<u8>, DateTime<Utc>, uuid::Uuid
);

fn render_literal(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Int(v) => Some(v.to_string()),
        Value::Double(v) => Some(v.to_string()),
        Value::Text(v) => Some(v),
        Value::Bytes(v) => Some(v.iter().fold(String::from("0x"), |mut acc, b| {
            acc.push_str(&format!("{b:02x}"));
            acc
        })),
        Value::Timestamp(v) => Some(v.timestamp_millis().to_string()),
        Value::Typed(v) => render_literal(to_native(v)),
    }
}

/// Ordered column → assignment list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    entries: Vec<(String, Assignment)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column. Setting the same column again replaces the earlier assignment in place.
    pub fn set(mut self, column: impl Into<String>, assignment: impl Into<Assignment>) -> Self {
        self.push(column, assignment);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, assignment: impl Into<Assignment>) {
        let column = column.into();
        let assignment = assignment.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = assignment,
            None => self.entries.push((column, assignment)),
        }
    }

    pub fn increment(self, column: impl Into<String>, delta: i64) -> Self {
        self.set(column, Assignment::increment(delta))
    }

    pub fn decrement(self, column: impl Into<String>, delta: i64) -> Self {
        self.set(column, Assignment::decrement(delta))
    }

    pub fn raw(self, column: impl Into<String>, literal: impl Into<String>) -> Self {
        self.set(column, Assignment::raw(literal))
    }

    pub fn raw_with_params(
        self,
        column: impl Into<String>,
        literal: impl Into<String>,
        params: Vec<Value>,
    ) -> Self {
        self.set(column, Assignment::raw_with_params(literal, params))
    }

    pub fn coalesce(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, Assignment::coalesce(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Assignment)> {
        self.entries.iter().map(|(c, a)| (c.as_str(), a))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a payload from a JSON object.
    ///
    /// Plain values are bound. A single-key object whose key starts with `$` selects a
    /// special form: `{"$inc": n}`, `{"$dec": n}`, `{"$raw": "expr"}`,
    /// `{"$raw": ["expr", p1, ...]}` or `{"$not": v}`. Any other `$` tag is rejected with
    /// [`CqlError::UnsupportedMutation`].
    pub fn from_json(json: serde_json::Value) -> CqlResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(CqlError::Other("mutation payload must be a JSON object".to_string()));
        };

        let mut payload = Payload::new();
        for (column, value) in map {
            let assignment = match value {
                serde_json::Value::Object(tagged) if is_tagged(&tagged) => {
                    let Some((tag, arg)) = tagged.into_iter().next() else {
                        continue;
                    };
                    tagged_assignment(&column, &tag, arg)?
                }
                other => Assignment::Value(json_to_value(&column, other)?),
            };
            payload.push(column, assignment);
        }
        Ok(payload)
    }
}

fn is_tagged(map: &serde_json::Map<String, serde_json::Value>) -> bool {
    map.len() == 1 && map.keys().all(|k| k.starts_with('$'))
}

fn tagged_assignment(column: &str, tag: &str, arg: serde_json::Value) -> CqlResult<Assignment> {
    let delta = |arg: &serde_json::Value| {
        arg.as_i64()
            .ok_or_else(|| CqlError::conversion(column, format!("{tag} expects an integer")))
    };

    match tag {
        "$inc" => Ok(Assignment::increment(delta(&arg)?)),
        "$dec" => Ok(Assignment::decrement(delta(&arg)?)),
        "$raw" => match arg {
            serde_json::Value::String(literal) => Ok(Assignment::Raw(literal)),
            serde_json::Value::Array(items) => {
                let mut items = items.into_iter();
                let Some(serde_json::Value::String(literal)) = items.next() else {
                    return Err(CqlError::conversion(column, "$raw array must start with a string"));
                };
                let params = items
                    .map(|item| json_to_value(column, item))
                    .collect::<CqlResult<Vec<_>>>()?;
                Ok(Assignment::RawWithParams { literal, params })
            }
            _ => Err(CqlError::conversion(column, "$raw expects a string or array")),
        },
        "$not" => Ok(Assignment::coalesce(json_to_value(column, arg)?)),
        other => Err(CqlError::UnsupportedMutation(other.to_string())),
    }
}

fn json_to_value(column: &str, json: serde_json::Value) -> CqlResult<Value> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Double))
            .ok_or_else(|| CqlError::conversion(column, format!("number {n} out of range"))),
        serde_json::Value::String(s) => Ok(Value::Text(s)),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(CqlError::conversion(
            column,
            "nested JSON values are not supported",
        )),
    }
}
