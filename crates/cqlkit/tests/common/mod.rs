#![allow(dead_code)]

//! In-memory driver used by the integration tests.

use cqlkit::{ColumnType, Connector, CqlError, CqlResult, CqlValue, ResultSet, Session};
use std::collections::{HashMap, VecDeque};
use std::future::{Future, ready};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    schemas: HashMap<String, Vec<(String, ColumnType)>>,
    responses: VecDeque<ResultSet>,
    prepared: Vec<String>,
    executed: Vec<(String, Vec<CqlValue>)>,
    connects: usize,
    fail_connect: bool,
    fail_prepare: Option<String>,
    fail_execute: Option<String>,
}

/// Connector handing out sessions that share one recorded state.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn with_table(self, table: &str, columns: &[(&str, ColumnType)]) -> Self {
        let columns = columns.iter().map(|(c, t)| (c.to_string(), *t)).collect();
        self.lock().schemas.insert(table.to_string(), columns);
        self
    }

    /// Queue the result of the next execution.
    pub fn push_response(&self, result: ResultSet) {
        self.lock().responses.push_back(result);
    }

    pub fn fail_connect(self) -> Self {
        self.lock().fail_connect = true;
        self
    }

    /// Refuse to prepare statements containing `needle`.
    pub fn fail_prepare_on(&self, needle: &str) {
        self.lock().fail_prepare = Some(needle.to_string());
    }

    /// Fail executions of statements containing `needle`.
    pub fn fail_execute_on(&self, needle: &str) {
        self.lock().fail_execute = Some(needle.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.fail_prepare = None;
        state.fail_execute = None;
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    pub fn prepared(&self) -> Vec<String> {
        self.lock().prepared.clone()
    }

    pub fn executed(&self) -> Vec<(String, Vec<CqlValue>)> {
        self.lock().executed.clone()
    }

    pub fn last_executed(&self) -> (String, Vec<CqlValue>) {
        self.lock().executed.last().cloned().expect("nothing executed")
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    fn connect(&self) -> impl Future<Output = CqlResult<MockSession>> + Send {
        let mut state = self.lock();
        state.connects += 1;
        let result = if state.fail_connect {
            Err(CqlError::Connect("connection refused".to_string()))
        } else {
            Ok(MockSession {
                state: Arc::clone(&self.state),
            })
        };
        ready(result)
    }
}

#[derive(Debug)]
pub struct MockSession {
    state: Arc<Mutex<MockState>>,
}

impl Session for MockSession {
    type Statement = String;

    fn prepare(&self, cql: &str) -> impl Future<Output = CqlResult<String>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match &state.fail_prepare {
            Some(needle) if cql.contains(needle.as_str()) => {
                Err(CqlError::prepare(cql, "line 1:0 no viable alternative"))
            }
            _ => {
                state.prepared.push(cql.to_string());
                Ok(cql.to_string())
            }
        };
        ready(result)
    }

    fn execute(
        &self,
        statement: &String,
        values: &[CqlValue],
    ) -> impl Future<Output = CqlResult<ResultSet>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match &state.fail_execute {
            Some(needle) if statement.contains(needle.as_str()) => {
                Err(CqlError::Other("write timeout".to_string()))
            }
            _ => {
                state.executed.push((statement.clone(), values.to_vec()));
                Ok(state.responses.pop_front().unwrap_or_default())
            }
        };
        ready(result)
    }

    fn table_schema(
        &self,
        table: &str,
    ) -> impl Future<Output = CqlResult<Vec<(String, ColumnType)>>> + Send {
        let state = self.state.lock().unwrap();
        ready(Ok(state.schemas.get(table).cloned().unwrap_or_default()))
    }
}
