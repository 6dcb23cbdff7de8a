//! Statement compiler.
//!
//! Turns builder state into CQL text with positional `?` placeholders and the matching
//! [`BindParams`]. Compilation runs three phases in a fixed order (payload, WHERE, LIMIT)
//! and never executes anything.

use crate::qb::param::BindParams;
use crate::qb::payload::{Assignment, Payload};
use crate::qb::predicate::{Condition, Predicate};
use std::fmt;

/// Kind of statement being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Select => "SELECT",
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        })
    }
}

/// Row cap: `LIMIT n` or `LIMIT offset, count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Window { offset: u64, count: u64 },
}

impl From<u64> for Limit {
    fn from(n: u64) -> Self {
        Limit::Count(n)
    }
}

impl From<[u64; 2]> for Limit {
    fn from([offset, count]: [u64; 2]) -> Self {
        Limit::Window { offset, count }
    }
}

impl From<(u64, u64)> for Limit {
    fn from((offset, count): (u64, u64)) -> Self {
        Limit::Window { offset, count }
    }
}

/// Compiled statement text plus its bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub operation: Operation,
    pub table: String,
    pub cql: String,
    pub params: BindParams,
}

/// Everything the compiler reads.
#[derive(Debug, Clone, Copy)]
pub struct QueryParts<'a> {
    pub operation: Operation,
    pub table: &'a str,
    pub columns: &'a [String],
    pub payload: Option<&'a Payload>,
    pub predicates: &'a [Predicate],
    pub limit: Option<Limit>,
}

impl<'a> QueryParts<'a> {
    pub fn new(operation: Operation, table: &'a str) -> Self {
        Self {
            operation,
            table,
            columns: &[],
            payload: None,
            predicates: &[],
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &'a [String]) -> Self {
        self.columns = columns;
        self
    }

    pub fn payload(mut self, payload: &'a Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn predicates(mut self, predicates: &'a [Predicate]) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn limit(mut self, limit: Option<Limit>) -> Self {
        self.limit = limit;
        self
    }
}

/// Compile a statement.
pub fn compile(parts: QueryParts<'_>) -> CompiledQuery {
    let mut params = BindParams::new();
    let mut cql = head(&parts);

    if let Some(payload) = parts.payload {
        push_payload(&mut cql, &mut params, parts.operation, payload);
    }
    push_where(&mut cql, &mut params, parts.predicates);
    if let Some(limit) = parts.limit {
        push_limit(&mut cql, limit);
    }

    CompiledQuery {
        operation: parts.operation,
        table: parts.table.to_string(),
        cql: cql.trim_end().to_string(),
        params,
    }
}

fn head(parts: &QueryParts<'_>) -> String {
    match parts.operation {
        Operation::Select => {
            let cols = if parts.columns.is_empty() {
                "*".to_string()
            } else {
                parts.columns.join(", ")
            };
            format!("SELECT {} FROM {}", cols, parts.table)
        }
        Operation::Insert => format!("INSERT INTO {}", parts.table),
        Operation::Update => format!("UPDATE {} SET", parts.table),
        Operation::Delete => format!("DELETE FROM {}", parts.table),
    }
}

fn push_payload(cql: &mut String, params: &mut BindParams, op: Operation, payload: &Payload) {
    if op == Operation::Insert {
        let cols: Vec<&str> = payload.columns().collect();
        cql.push_str(&format!(" ({}) VALUES (", cols.join(", ")));
    } else {
        cql.push(' ');
    }

    let mut items = Vec::with_capacity(payload.len());
    for (column, assignment) in payload.iter() {
        let mut item = String::new();
        if op == Operation::Update {
            item.push_str(column);
            item.push_str(" = ");
        }
        match assignment {
            Assignment::Value(value) => {
                params.push_payload(column, value.clone());
                item.push('?');
            }
            Assignment::Increment(fragment) => {
                item.push_str(column);
                item.push_str(fragment);
            }
            Assignment::Raw(literal) => item.push_str(literal),
            Assignment::RawWithParams { literal, params: extra } => {
                for value in extra {
                    params.push(column, value.clone());
                }
                item.push_str(literal);
            }
            Assignment::Coalesce(Some(value)) => {
                item.push('!');
                item.push_str(value);
            }
            Assignment::Coalesce(None) => {
                item.push('!');
                item.push_str(column);
            }
        }
        items.push(item);
    }
    cql.push_str(&items.join(", "));

    if op == Operation::Insert {
        cql.push(')');
    }
}

fn push_where(cql: &mut String, params: &mut BindParams, predicates: &[Predicate]) {
    if predicates.is_empty() {
        return;
    }

    cql.push_str(" WHERE");
    for (i, predicate) in predicates.iter().enumerate() {
        let connector = if i == 0 { "" } else { predicate.connector.as_str() };
        cql.push(' ');
        cql.push_str(connector);
        cql.push(' ');
        cql.push_str(&predicate.field);

        let field = predicate.field.as_str();
        match &predicate.condition {
            Condition::Raw => {}
            Condition::Eq(value) => {
                params.push(field, value.clone());
                cql.push_str(" = ?");
            }
            Condition::Compare { op, value } => {
                params.push(field, value.clone());
                cql.push_str(&format!(" {op} ?"));
            }
            Condition::In { negated, values } => {
                for value in values {
                    params.push(field, value.clone());
                }
                let op = if *negated { "NOT IN" } else { "IN" };
                let placeholders = vec!["?"; values.len()].join(", ");
                cql.push_str(&format!(" {op} ({placeholders})"));
            }
            Condition::Between { negated, from, to } => {
                params.push(field, from.clone());
                params.push(field, to.clone());
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                cql.push_str(&format!(" {op} ? AND ?"));
            }
        }
    }
}

fn push_limit(cql: &mut String, limit: Limit) {
    match limit {
        Limit::Count(n) => cql.push_str(&format!(" LIMIT {n}")),
        Limit::Window { offset, count } => cql.push_str(&format!(" LIMIT {offset}, {count}")),
    }
}
