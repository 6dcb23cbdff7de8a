//! Per-chain builder state.

use crate::error::CqlError;
use crate::qb::predicate::{Condition, Operand, Predicate};

/// Pending WHERE predicates for the next terminal operation.
///
/// Bind parameters are derived from the predicates at compile time, so they can never
/// drift out of placeholder order.
#[derive(Debug, Default)]
pub struct BuilderState {
    predicates: Vec<Predicate>,
    error: Option<String>,
}

impl BuilderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Add an operator condition, recording a build error if the operand does not fit.
    pub fn push_operator(&mut self, field: &str, op: &str, operand: Operand) {
        match Condition::with_operator(op, operand) {
            Ok(condition) => self.push(Predicate::and(field, condition)),
            Err(err) => {
                let message = match err {
                    CqlError::InvalidCondition(message) => message,
                    other => other.to_string(),
                };
                // first error wins
                self.error.get_or_insert(message);
            }
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The first invalid condition recorded in this chain, if any.
    pub fn error(&self) -> Option<CqlError> {
        self.error.clone().map(CqlError::InvalidCondition)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.error.is_none()
    }

    pub fn reset(&mut self) {
        self.predicates.clear();
        self.error = None;
    }
}
