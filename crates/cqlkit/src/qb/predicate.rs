//! WHERE predicates.

use crate::error::{CqlError, CqlResult};
use crate::value::Value;
use chrono::{DateTime, Utc};

/// Boolean connector placed before a predicate. The first predicate's connector is never emitted.
///
/// CQL itself only accepts `AND`; `Or` is rendered but the client never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

/// The comparison applied to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field text is emitted alone, without a bind (hand-written fragments).
    Raw,
    /// `field = ?`
    Eq(Value),
    /// `field <op> ?`
    Compare { op: String, value: Value },
    /// `field IN (?, ...)` / `field NOT IN (?, ...)`
    In { negated: bool, values: Vec<Value> },
    /// `field BETWEEN ? AND ?` / `field NOT BETWEEN ? AND ?`
    Between { negated: bool, from: Value, to: Value },
}

/// Right-hand side of an operator condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    One(Value),
    List(Vec<Value>),
}

impl Condition {
    /// Equality, or a raw clause when the value is null.
    pub fn eq(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => Condition::Raw,
            value => Condition::Eq(value),
        }
    }

    /// Build a condition from an operator string (matched case-insensitively).
    pub fn with_operator(op: &str, operand: impl Into<Operand>) -> CqlResult<Self> {
        let normalized = op.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
        let operand = operand.into();

        match (normalized.as_str(), operand) {
            ("IN" | "NOT IN", Operand::List(values)) => Ok(Condition::In {
                negated: normalized.starts_with("NOT"),
                values,
            }),
            ("BETWEEN" | "NOT BETWEEN", Operand::List(values)) => {
                let [from, to]: [Value; 2] = values.try_into().map_err(|v: Vec<Value>| {
                    CqlError::InvalidCondition(format!(
                        "{normalized} expects exactly 2 values, got {}",
                        v.len()
                    ))
                })?;
                Ok(Condition::Between {
                    negated: normalized.starts_with("NOT"),
                    from,
                    to,
                })
            }
            ("IN" | "NOT IN" | "BETWEEN" | "NOT BETWEEN", Operand::One(_)) => Err(
                CqlError::InvalidCondition(format!("{normalized} expects a list of values")),
            ),
            ("", _) => Err(CqlError::InvalidCondition("empty operator".to_string())),
            ("=", Operand::One(value)) => Ok(Condition::Eq(value)),
            (_, Operand::One(value)) => Ok(Condition::Compare {
                op: op.trim().to_string(),
                value,
            }),
            (_, Operand::List(_)) => Err(CqlError::InvalidCondition(format!(
                "operator '{}' expects a single value",
                op.trim()
            ))),
        }
    }
}

/// One WHERE entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub connector: BoolOp,
    pub field: String,
    pub condition: Condition,
}

impl Predicate {
    pub fn and(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            connector: BoolOp::And,
            field: field.into(),
            condition,
        }
    }

    pub fn or(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            connector: BoolOp::Or,
            field: field.into(),
            condition,
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::One(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Operand::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(v: [T; N]) -> Self {
        Operand::List(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_operand_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::One(v.into())
                }
            }
        )*
    };
}

impl_operand_scalar!(
    i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, DateTime<Utc>, uuid::Uuid
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_are_case_insensitive() {
        assert_eq!(
            Condition::with_operator("in", vec![1, 2]).unwrap(),
            Condition::In {
                negated: false,
                values: vec![Value::Int(1), Value::Int(2)]
            }
        );
        assert_eq!(
            Condition::with_operator("Not  Between", [1, 9]).unwrap(),
            Condition::Between {
                negated: true,
                from: Value::Int(1),
                to: Value::Int(9)
            }
        );
        assert_eq!(
            Condition::with_operator(">=", 5).unwrap(),
            Condition::Compare {
                op: ">=".into(),
                value: Value::Int(5)
            }
        );
        assert_eq!(Condition::with_operator("=", "x").unwrap(), Condition::Eq(Value::from("x")));
    }

    #[test]
    fn operand_shape_is_checked() {
        assert!(Condition::with_operator("BETWEEN", [1, 2, 3]).is_err());
        assert!(Condition::with_operator("IN", 1).is_err());
        assert!(Condition::with_operator(">", vec![1, 2]).is_err());
        assert!(Condition::with_operator("  ", 1).is_err());
    }

    #[test]
    fn null_equality_is_raw() {
        assert_eq!(Condition::eq(Value::Null), Condition::Raw);
        assert_eq!(Condition::eq(None::<i64>), Condition::Raw);
    }
}
