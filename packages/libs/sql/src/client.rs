//! 테이블 CRUD 실행
//!
//! 빌더가 만든 SQL을 세션으로 실행합니다. SQL 생성 자체는 I/O가 없고,
//! 실행 결과(행/행 수)는 세션이 돌려준 그대로 반환합니다.

use serde_json::Value;

use ora_core::schema::Table;
use ora_core::{Error, Result, Row, Session};

use crate::builder::{Operation, StatementBuilder};
use crate::params::{Condition, UpdateParams};
use crate::procedure::{ProcedureCall, TableProcedure};

/// 테이블 + 세션
pub struct TableClient<'a, S: Session + ?Sized> {
    table: &'a Table,
    session: &'a S,
}

impl<'a, S: Session + ?Sized> TableClient<'a, S> {
    pub fn new(table: &'a Table, session: &'a S) -> Self {
        Self { table, session }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// 모든 행 조회
    pub fn all(&self, condition: &Condition, binds: Vec<Value>) -> Result<Vec<Row>> {
        let stmt = StatementBuilder::new(self.table).build(Operation::All, condition, binds)?;
        Ok(self.session.select_all(&stmt.sql, &stmt.binds)?)
    }

    /// 첫 번째 행 조회
    pub fn first(&self, condition: &Condition, binds: Vec<Value>) -> Result<Option<Row>> {
        let stmt = StatementBuilder::new(self.table).build(Operation::First, condition, binds)?;
        Ok(self.session.select_first(&stmt.sql, &stmt.binds)?)
    }

    /// 행 수 조회
    pub fn count(&self, condition: &Condition, binds: Vec<Value>) -> Result<u64> {
        let stmt = StatementBuilder::new(self.table).build(Operation::Count, condition, binds)?;
        match self.session.select_one(&stmt.sql, &stmt.binds)? {
            None | Some(Value::Null) => Ok(0),
            Some(value) => parse_count(&value),
        }
    }

    /// 삭제, 삭제된 행 수 반환
    pub fn delete(&self, condition: &Condition, binds: Vec<Value>) -> Result<u64> {
        let stmt = StatementBuilder::new(self.table).build(Operation::Delete, condition, binds)?;
        Ok(self.session.execute(&stmt.sql, &stmt.binds)?)
    }

    /// 레코드 삽입
    ///
    /// 배열이 오면 각 레코드를 따로 삽입합니다.
    pub fn insert(&self, record: &Value) -> Result<()> {
        if let Value::Array(records) = record {
            return self.insert_all(records);
        }
        let procedure = TableProcedure::insert(self.table);
        ProcedureCall::new(&procedure, vec![record.clone()])?.exec(self.session)?;
        Ok(())
    }

    /// 여러 레코드 삽입
    ///
    /// 레코드마다 독립 실행이며, 실패하면 그 지점에서 멈추고 앞선 삽입은 되돌리지 않습니다.
    pub fn insert_all(&self, records: &[Value]) -> Result<()> {
        let procedure = TableProcedure::insert(self.table);
        for (idx, record) in records.iter().enumerate() {
            let result = ProcedureCall::new(&procedure, vec![record.clone()])
                .and_then(|call| call.exec(self.session));
            if let Err(e) = result {
                tracing::debug!(
                    table = %self.table.quoted_name(),
                    index = idx,
                    "insert stopped: {}",
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// 갱신, 갱신된 행 수 반환
    pub fn update(&self, params: &UpdateParams) -> Result<u64> {
        let procedure = TableProcedure::update(self.table, params)?;
        ProcedureCall::new(&procedure, procedure.argument_values())?.exec(self.session)
    }
}

fn parse_count(value: &Value) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::InvalidArgument {
        message: format!("unexpected COUNT(*) result: {}", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ora_core::testing::MockSession;
    use ora_core::CatalogConfig;
    use serde_json::json;

    fn session() -> MockSession {
        MockSession::new("HR")
            .with_table("HR", "EMP")
            .with_column("HR", "EMP", json!(["ID", 1, "NUMBER", 22, null, null, null, null, null]))
            .with_column("HR", "EMP", json!(["NAME", 2, "VARCHAR2", 40, null, null, "B", null, null]))
    }

    fn emp(session: &MockSession) -> Table {
        Table::find(session, "emp", &CatalogConfig::default()).unwrap().unwrap()
    }

    #[test]
    fn test_count_parses_scalar() {
        let session = session().with_rows(vec![vec![json!("42")]]);
        let table = emp(&session);
        let client = TableClient::new(&table, &session);

        assert_eq!(client.count(&Condition::none(), vec![]).unwrap(), 42);
        let (sql, binds) = session.last_query().unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM \"HR\".\"EMP\" ");
        assert!(binds.is_empty());
    }

    #[test]
    fn test_first_and_all_pass_binds() {
        let session = session().with_rows(vec![vec![json!(1), json!("Bob")], vec![json!(2), json!("Ann")]]);
        let table = emp(&session);
        let client = TableClient::new(&table, &session);

        let row = client
            .first(&Condition::equality().eq("id", 1), vec![])
            .unwrap()
            .unwrap();
        assert_eq!(row, vec![json!(1), json!("Bob")]);
        assert_eq!(session.last_query().unwrap().1, vec![json!(1)]);

        let rows = client.all(&Condition::fragment("WHERE id > :id"), vec![json!(0)]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_delete_returns_affected() {
        let session = session().with_affected(3);
        let table = emp(&session);
        let client = TableClient::new(&table, &session);

        assert_eq!(client.delete(&Condition::equality().eq("name", "Bob"), vec![]).unwrap(), 3);
        let (sql, _) = session.last_query().unwrap();
        assert_eq!(sql, "DELETE FROM \"HR\".\"EMP\" WHERE name = :name ");
    }

    #[test]
    fn test_update_executes_block() {
        let session = session();
        let table = emp(&session);
        let client = TableClient::new(&table, &session);

        let params = UpdateParams::try_from(json!({ "name": "Bob", "where": { "id": 1 } })).unwrap();
        client.update(&params).unwrap();

        let (sql, binds) = session.last_query().unwrap();
        assert_eq!(sql, "BEGIN\nUPDATE \"HR\".\"EMP\" SET name=:name WHERE id=:w_id;\nEND;\n");
        assert_eq!(binds, vec![json!("Bob"), json!(1)]);
    }

    #[test]
    fn test_update_unknown_column_does_not_execute() {
        let session = session();
        let table = emp(&session);
        let client = TableClient::new(&table, &session);
        let before = session.queries().len();

        let err = client.update(&UpdateParams::new().set("salary", 1)).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { ref column } if column == "salary"));
        assert_eq!(session.queries().len(), before);
    }

    #[test]
    fn test_update_without_set_does_not_execute() {
        let session = session();
        let table = emp(&session);
        let client = TableClient::new(&table, &session);
        let before = session.queries().len();

        let params = UpdateParams::new().filter(Condition::equality().eq("id", 1));
        let err = client.update(&params).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(session.queries().len(), before);
    }

    #[test]
    fn test_update_set_column_named_like_where_bind() {
        let session = session()
            .with_column("HR", "EMP", json!(["W_ID", 3, "NUMBER", 22, null, null, null, null, null]));
        let table = emp(&session);
        let client = TableClient::new(&table, &session);

        let params = UpdateParams::new()
            .set("w_id", 9)
            .filter(Condition::equality().eq("id", 1));
        client.update(&params).unwrap();

        let (sql, binds) = session.last_query().unwrap();
        assert_eq!(sql, "BEGIN\nUPDATE \"HR\".\"EMP\" SET w_id=:w_id WHERE id=:w_w_id;\nEND;\n");
        assert_eq!(binds, vec![json!(9), json!(1)]);
    }

    #[test]
    fn test_insert_array_inserts_each() {
        let session = session();
        let table = emp(&session);
        let client = TableClient::new(&table, &session);
        let before = session.queries().len();

        client
            .insert(&json!([{ "id": 1, "name": "Bob" }, { "id": 2, "name": "Ann" }]))
            .unwrap();

        let queries = session.queries();
        let inserts = &queries[before..];
        assert_eq!(inserts.len(), 2);
        assert_eq!(inserts[1].1, vec![json!(2), json!("Ann")]);
    }

    #[test]
    fn test_insert_all_stops_at_failure() {
        let session = session().failing_execute(2);
        let table = emp(&session);
        let client = TableClient::new(&table, &session);
        let before = session.queries().len();

        let records = vec![json!({ "id": 1 }), json!({ "id": 2 }), json!({ "id": 3 })];
        let err = client.insert_all(&records).unwrap_err();
        assert_eq!(err.code(), "SESSION_ERROR");
        assert_eq!(session.queries().len() - before, 2);
    }
}
