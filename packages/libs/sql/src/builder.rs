//! SELECT/COUNT/DELETE SQL 빌더
//!
//! 테이블 메타데이터와 조건을 받아 SQL과 바인드 값 목록을 생성합니다.
//! 스키마/테이블 이름은 항상 큰따옴표로 감싸며, 바인드 변수는 `:column` 형태입니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ora_core::schema::Table;
use ora_core::{Error, Result};

use crate::params::{Condition, EqualityMap, ORDER_BY_KEY};

/// 조회/삭제 연산
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// 첫 번째 행
    First,
    /// 모든 행
    All,
    /// 행 수
    Count,
    /// 삭제
    Delete,
}

impl Operation {
    /// 문자열에서 파싱
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(Operation::First),
            "all" => Ok(Operation::All),
            "count" => Ok(Operation::Count),
            "delete" => Ok(Operation::Delete),
            other => Err(Error::UnsupportedOperation {
                operation: other.to_string(),
            }),
        }
    }

    /// 생성되는 문장 종류
    pub fn kind(&self) -> StatementKind {
        match self {
            Operation::First | Operation::All => StatementKind::Select,
            Operation::Count => StatementKind::Count,
            Operation::Delete => StatementKind::Delete,
        }
    }
}

/// 문장 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Count,
    Delete,
    Insert,
    Update,
    /// 프로시저 호출 (익명 블록)
    Call,
}

/// 생성된 SQL 문장
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// 문장 종류
    pub kind: StatementKind,

    /// SQL 텍스트
    pub sql: String,

    /// 플레이스홀더 순서대로의 바인드 값
    pub binds: Vec<Value>,
}

/// SELECT/COUNT/DELETE 빌더
pub struct StatementBuilder<'a> {
    table: &'a Table,
}

impl<'a> StatementBuilder<'a> {
    /// 새 빌더 생성
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// SQL 생성
    ///
    /// # Arguments
    /// * `operation` - first/all/count/delete
    /// * `condition` - SQL 조각 또는 equality 조건
    /// * `binds` - SQL 조각용 바인드 값 (equality 조건과 함께 쓸 수 없음)
    pub fn build(&self, operation: Operation, condition: &Condition, binds: Vec<Value>) -> Result<Statement> {
        let mut sql = match operation {
            Operation::First | Operation::All => "SELECT * ".to_string(),
            Operation::Count => "SELECT COUNT(*) ".to_string(),
            Operation::Delete => "DELETE ".to_string(),
        };
        sql.push_str("FROM ");
        sql.push_str(&self.table.quoted_name());
        sql.push(' ');

        let binds = match condition {
            Condition::Fragment(fragment) => {
                sql.push_str(fragment);
                binds
            }
            Condition::Equality(map) => {
                if !binds.is_empty() {
                    return Err(Error::ConflictingBindSpecification);
                }
                let allow_order_by = operation != Operation::Delete;
                append_equality(&mut sql, map, allow_order_by)
            }
        };

        tracing::trace!(sql = %sql, binds = binds.len(), "built statement");
        Ok(Statement {
            kind: operation.kind(),
            sql,
            binds,
        })
    }

    /// SELECT 생성
    pub fn select(&self, condition: &Condition, binds: Vec<Value>) -> Result<Statement> {
        self.build(Operation::All, condition, binds)
    }

    /// COUNT 생성
    pub fn count(&self, condition: &Condition, binds: Vec<Value>) -> Result<Statement> {
        self.build(Operation::Count, condition, binds)
    }

    /// DELETE 생성
    pub fn delete(&self, condition: &Condition, binds: Vec<Value>) -> Result<Statement> {
        self.build(Operation::Delete, condition, binds)
    }
}

/// equality 조건을 `WHERE a = :a AND b = :b ORDER BY ...` 로 변환
fn append_equality(sql: &mut String, map: &EqualityMap, allow_order_by: bool) -> Vec<Value> {
    let mut predicates = Vec::new();
    let mut binds = Vec::new();
    let mut order_by = None;

    for (column, value) in map {
        if allow_order_by && column == ORDER_BY_KEY {
            // ORDER BY 값은 바인드하지 않고 그대로 사용
            order_by = Some(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            continue;
        }
        predicates.push(format!("{} = :{}", column, column));
        binds.push(value.clone());
    }

    if !predicates.is_empty() {
        sql.push_str("WHERE ");
        sql.push_str(&predicates.join(" AND "));
        sql.push(' ');
    }
    if let Some(order_by) = order_by {
        sql.push_str("ORDER BY ");
        sql.push_str(&order_by);
        sql.push(' ');
    }

    binds
}
