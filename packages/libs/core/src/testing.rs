//! 테스트용 인메모리 세션
//!
//! 딕셔너리 조회(`*_tables`, `*_synonyms`, `*_tab_columns`)는 등록된 데이터로 응답하고,
//! 그 밖의 쿼리는 미리 지정한 행을 돌려줍니다. 실행된 모든 SQL과 바인드 값을 기록합니다.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::session::{Row, Session, SessionError};

/// 테스트용 세션 에러
#[derive(Debug, thiserror::Error)]
#[error("mock session failure: {0}")]
pub struct MockError(pub String);

#[derive(Debug, Clone)]
struct SynonymEntry {
    owner: String,
    name: String,
    table_owner: String,
    table_name: String,
}

/// 테스트용 세션
#[derive(Debug, Default)]
pub struct MockSession {
    schema_name: String,
    tables: Vec<(String, String)>,
    synonyms: Vec<SynonymEntry>,
    columns: HashMap<(String, String), Vec<Row>>,
    rows: Vec<Row>,
    affected: u64,
    failing_fragment: Option<String>,
    failing_execute: Option<usize>,
    log: Mutex<Vec<(String, Vec<Value>)>>,
    execute_calls: Mutex<usize>,
}

impl MockSession {
    pub fn new(schema_name: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            affected: 1,
            ..Default::default()
        }
    }

    /// 물리 테이블 등록
    pub fn with_table(mut self, owner: &str, table_name: &str) -> Self {
        self.tables.push((owner.to_string(), table_name.to_string()));
        self
    }

    /// 시노님 등록 (등록 순서대로 조회됨)
    pub fn with_synonym(mut self, owner: &str, name: &str, table_owner: &str, table_name: &str) -> Self {
        self.synonyms.push(SynonymEntry {
            owner: owner.to_string(),
            name: name.to_string(),
            table_owner: table_owner.to_string(),
            table_name: table_name.to_string(),
        });
        self
    }

    /// 컬럼 딕셔너리 행 등록
    pub fn with_column(mut self, owner: &str, table_name: &str, row: Value) -> Self {
        let row = match row {
            Value::Array(values) => values,
            other => vec![other],
        };
        self.columns
            .entry((owner.to_string(), table_name.to_string()))
            .or_default()
            .push(row);
        self
    }

    /// 일반 쿼리 결과 행
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// execute 결과 행 수
    pub fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    /// 지정한 문자열을 포함하는 SQL은 실패
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.failing_fragment = Some(fragment.to_string());
        self
    }

    /// n번째(1부터) execute 호출은 실패
    pub fn failing_execute(mut self, nth: usize) -> Self {
        self.failing_execute = Some(nth);
        self
    }

    /// 기록된 모든 쿼리
    pub fn queries(&self) -> Vec<(String, Vec<Value>)> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// 마지막 쿼리
    pub fn last_query(&self) -> Option<(String, Vec<Value>)> {
        self.queries().pop()
    }

    fn record(&self, sql: &str, binds: &[Value]) -> Result<(), SessionError> {
        if let Ok(mut log) = self.log.lock() {
            log.push((sql.to_string(), binds.to_vec()));
        }
        match &self.failing_fragment {
            Some(fragment) if sql.contains(fragment.as_str()) => {
                Err(Box::new(MockError(format!("query failed: {}", fragment))))
            }
            _ => Ok(()),
        }
    }

    fn query(&self, sql: &str, binds: &[Value]) -> Result<Vec<Row>, SessionError> {
        self.record(sql, binds)?;
        let text = |idx: usize| binds.get(idx).and_then(Value::as_str).unwrap_or_default();

        if sql.contains("_tab_columns") {
            let key = (text(0).to_string(), text(1).to_string());
            return Ok(self.columns.get(&key).cloned().unwrap_or_default());
        }

        if sql.contains("_synonyms") {
            let (owner, public_owner, name) = (text(0), text(1), text(2));
            return Ok(self
                .synonyms
                .iter()
                .filter(|s| (s.owner == owner || s.owner == public_owner) && s.name == name)
                .filter(|s| {
                    self.tables
                        .iter()
                        .any(|(o, t)| *o == s.table_owner && *t == s.table_name)
                })
                .map(|s| {
                    vec![
                        Value::from(s.owner.as_str()),
                        Value::from(s.table_owner.as_str()),
                        Value::from(s.table_name.as_str()),
                    ]
                })
                .collect());
        }

        if sql.contains("_tables") {
            let (owner, table_name) = (text(0), text(1));
            return Ok(self
                .tables
                .iter()
                .filter(|(o, t)| o == owner && t == table_name)
                .map(|(_, t)| vec![Value::from(t.as_str())])
                .collect());
        }

        Ok(self.rows.clone())
    }
}

impl Session for MockSession {
    fn schema_name(&self) -> &str {
        &self.schema_name
    }

    fn select_first(&self, sql: &str, binds: &[Value]) -> Result<Option<Row>, SessionError> {
        Ok(self.query(sql, binds)?.into_iter().next())
    }

    fn select_all(&self, sql: &str, binds: &[Value]) -> Result<Vec<Row>, SessionError> {
        self.query(sql, binds)
    }

    fn execute(&self, sql: &str, binds: &[Value]) -> Result<u64, SessionError> {
        self.record(sql, binds)?;
        let call = match self.execute_calls.lock() {
            Ok(mut calls) => {
                *calls += 1;
                *calls
            }
            Err(_) => 0,
        };
        if self.failing_execute == Some(call) {
            return Err(Box::new(MockError(format!("execute #{} failed", call))));
        }
        Ok(self.affected)
    }
}
