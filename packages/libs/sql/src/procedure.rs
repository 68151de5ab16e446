//! 호출 가능 객체 (프로시저/테이블 INSERT·UPDATE)
//!
//! 저장 프로시저 호출과 테이블 INSERT/UPDATE를 같은 방식으로 실행하기 위한 계약입니다.
//! `ProcedureCall`은 [`Invocable`]의 인자 메타데이터로 파라미터 목록과 바인드 값을 만들고,
//! 최종 SQL은 익명 블록(`BEGIN ... END;`)으로 감쌉니다.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ora_core::schema::{ColumnCatalog, ColumnDescriptor, Table};
use ora_core::{Error, Result, Session};

use crate::binder::MutationArgumentBinder;
use crate::builder::{Statement, StatementKind};
use crate::params::{json_type_name, UpdateParams};

/// INSERT 레코드 인자 이름
pub const RECORD_ARGUMENT: &str = "p_record";

/// 레코드 인자 타입 이름
pub const RECORD_DATA_TYPE: &str = "PL/SQL RECORD";

/// 인자 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgumentMetadata {
    /// 단일 컬럼 값
    Column(ColumnDescriptor),

    /// 필드 목록을 가진 레코드
    Record {
        data_type: String,
        fields: ColumnCatalog,
    },
}

/// 호출 가능 객체 계약
pub trait Invocable {
    /// 인자 이름 -> 메타데이터 (호출 순서)
    fn arguments(&self) -> &IndexMap<String, ArgumentMetadata>;

    /// 인자 이름 목록
    fn argument_list(&self) -> Vec<&str> {
        self.arguments().keys().map(|s| s.as_str()).collect()
    }

    /// 반환값 메타데이터
    fn return_metadata(&self) -> Option<&ArgumentMetadata> {
        None
    }

    /// OUT 파라미터 이름 목록
    fn out_list(&self) -> &[String] {
        &[]
    }

    /// 생성되는 문장 종류
    fn statement_kind(&self) -> StatementKind {
        StatementKind::Call
    }

    /// 렌더링된 파라미터 목록으로 호출 SQL 생성
    fn call_sql(&self, params: &str) -> String;
}

/// 테이블 변경 종류
#[derive(Debug, Clone)]
enum TableMutation<'a> {
    Insert,
    Update(MutationArgumentBinder<'a>),
}

/// 테이블 INSERT/UPDATE를 프로시저처럼 보이게 하는 어댑터
///
/// 반환값과 OUT 파라미터는 없습니다.
#[derive(Debug, Clone)]
pub struct TableProcedure<'a> {
    table: &'a Table,
    mutation: TableMutation<'a>,
    arguments: IndexMap<String, ArgumentMetadata>,
}

impl<'a> TableProcedure<'a> {
    /// INSERT 어댑터: 전체 컬럼을 필드로 갖는 레코드 인자 하나
    pub fn insert(table: &'a Table) -> Self {
        let mut arguments = IndexMap::new();
        arguments.insert(
            RECORD_ARGUMENT.to_string(),
            ArgumentMetadata::Record {
                data_type: RECORD_DATA_TYPE.to_string(),
                fields: table.columns().clone(),
            },
        );
        Self {
            table,
            mutation: TableMutation::Insert,
            arguments,
        }
    }

    /// UPDATE 어댑터: SET/WHERE 인자를 검증하여 바인딩
    ///
    /// SET 컬럼이 하나도 없으면 `InvalidArgument`.
    pub fn update(table: &'a Table, params: &UpdateParams) -> Result<Self> {
        if params.set.is_empty() {
            return Err(Error::InvalidArgument {
                message: format!("no columns to update in {}", table.quoted_name()),
            });
        }
        let binder = MutationArgumentBinder::bind(table, &params.set, params.r#where.as_ref())?;
        let arguments = binder
            .arguments()
            .iter()
            .map(|(name, column)| (name.clone(), ArgumentMetadata::Column(column.clone())))
            .collect();
        Ok(Self {
            table,
            mutation: TableMutation::Update(binder),
            arguments,
        })
    }

    /// UPDATE 바인드 값 (SET 다음 WHERE)
    pub fn argument_values(&self) -> Vec<Value> {
        match &self.mutation {
            TableMutation::Insert => Vec::new(),
            TableMutation::Update(binder) => binder.values(),
        }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }
}

impl Invocable for TableProcedure<'_> {
    fn arguments(&self) -> &IndexMap<String, ArgumentMetadata> {
        &self.arguments
    }

    fn statement_kind(&self) -> StatementKind {
        match self.mutation {
            TableMutation::Insert => StatementKind::Insert,
            TableMutation::Update(_) => StatementKind::Update,
        }
    }

    fn call_sql(&self, params: &str) -> String {
        match &self.mutation {
            TableMutation::Insert => {
                format!("INSERT INTO {} VALUES {};\n", self.table.quoted_name(), params)
            }
            TableMutation::Update(binder) => {
                let mut sql = format!("UPDATE {} SET {}", self.table.quoted_name(), binder.set_clause());
                if let Some(where_clause) = binder.where_clause() {
                    sql.push_str(" WHERE ");
                    sql.push_str(&where_clause);
                }
                sql.push_str(";\n");
                sql
            }
        }
    }
}

/// 저장 프로시저 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProcedure {
    pub schema_name: String,
    pub procedure_name: String,
    pub arguments: IndexMap<String, ArgumentMetadata>,
}

impl StoredProcedure {
    pub fn new(schema_name: impl Into<String>, procedure_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            procedure_name: procedure_name.into().to_uppercase(),
            arguments: IndexMap::new(),
        }
    }

    /// 인자 추가
    pub fn argument(mut self, name: impl Into<String>, column: ColumnDescriptor) -> Self {
        self.arguments
            .insert(name.into().to_lowercase(), ArgumentMetadata::Column(column));
        self
    }
}

impl Invocable for StoredProcedure {
    fn arguments(&self) -> &IndexMap<String, ArgumentMetadata> {
        &self.arguments
    }

    fn call_sql(&self, params: &str) -> String {
        format!("\"{}\".\"{}\"{};\n", self.schema_name, self.procedure_name, params)
    }
}

/// 호출 (인자 값 바인딩 + SQL 생성 + 실행)
pub struct ProcedureCall<'p, P: Invocable + ?Sized> {
    procedure: &'p P,
    values: Vec<Value>,
}

impl<'p, P: Invocable + ?Sized> ProcedureCall<'p, P> {
    /// 인자 순서대로의 값으로 호출 생성
    pub fn new(procedure: &'p P, values: Vec<Value>) -> Result<Self> {
        let expected = procedure.arguments().len();
        if values.len() != expected {
            return Err(Error::InvalidArgument {
                message: format!("wrong number of arguments: expected {}, got {}", expected, values.len()),
            });
        }
        Ok(Self { procedure, values })
    }

    /// SQL과 바인드 값 생성
    pub fn statement(&self) -> Result<Statement> {
        let mut parts = Vec::new();
        let mut binds = Vec::new();

        for ((name, metadata), value) in self.procedure.arguments().iter().zip(&self.values) {
            match metadata {
                ArgumentMetadata::Record { fields, .. } => {
                    parts.push(render_record(fields, value, &mut binds)?);
                }
                ArgumentMetadata::Column(_) => {
                    parts.push(format!("{} => :{}", name, name));
                    binds.push(value.clone());
                }
            }
        }

        let params = format!("({})", parts.join(", "));
        let sql = format!("BEGIN\n{}END;\n", self.procedure.call_sql(&params));

        tracing::trace!(sql = %sql, binds = binds.len(), "built procedure call");
        Ok(Statement {
            kind: self.procedure.statement_kind(),
            sql,
            binds,
        })
    }

    /// 실행
    pub fn exec<S: Session + ?Sized>(&self, session: &S) -> Result<u64> {
        let statement = self.statement()?;
        Ok(session.execute(&statement.sql, &statement.binds)?)
    }
}

/// 레코드 값을 필드 순서대로 `:field, ...` 로 렌더링
///
/// 없는 필드는 NULL, 모르는 필드는 에러입니다.
fn render_record(fields: &ColumnCatalog, value: &Value, binds: &mut Vec<Value>) -> Result<String> {
    let Value::Object(record) = value else {
        return Err(Error::InvalidArgument {
            message: format!("record argument must be an object, got {}", json_type_name(value)),
        });
    };

    if let Some(unknown) = record.keys().find(|key| !fields.contains(key.as_str())) {
        return Err(Error::UnknownColumn {
            column: unknown.clone(),
        });
    }

    let placeholders: Vec<String> = fields
        .names()
        .map(|field| {
            binds.push(record.get(field).cloned().unwrap_or(Value::Null));
            format!(":{}", field)
        })
        .collect();
    Ok(placeholders.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Condition;
    use ora_core::testing::MockSession;
    use serde_json::json;

    fn table() -> Table {
        let mut columns = ColumnCatalog::new();
        columns.push("id", ColumnDescriptor::primitive(1, "NUMBER")).unwrap();
        columns.push("name", ColumnDescriptor::primitive(2, "VARCHAR2")).unwrap();
        columns.push("addr", ColumnDescriptor::object(3, "HR", "T_ADDRESS")).unwrap();
        Table::from_parts("HR", "EMP", columns)
    }

    #[test]
    fn test_insert_adapter_shape() {
        let table = table();
        let procedure = TableProcedure::insert(&table);

        assert_eq!(procedure.argument_list(), vec![RECORD_ARGUMENT]);
        assert!(procedure.return_metadata().is_none());
        assert!(procedure.out_list().is_empty());
        assert_eq!(procedure.statement_kind(), StatementKind::Insert);

        let Some(ArgumentMetadata::Record { data_type, fields }) = procedure.arguments().get(RECORD_ARGUMENT) else {
            panic!("expected record argument");
        };
        assert_eq!(data_type, RECORD_DATA_TYPE);
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["id", "name", "addr"]);
    }

    #[test]
    fn test_insert_call_renders_record_in_catalog_order() {
        let table = table();
        let procedure = TableProcedure::insert(&table);
        let call = ProcedureCall::new(&procedure, vec![json!({ "name": "Bob", "id": 1 })]).unwrap();
        let stmt = call.statement().unwrap();

        assert_eq!(
            stmt.sql,
            "BEGIN\nINSERT INTO \"HR\".\"EMP\" VALUES (:id, :name, :addr);\nEND;\n"
        );
        assert_eq!(stmt.binds, vec![json!(1), json!("Bob"), Value::Null]);
        assert_eq!(stmt.kind, StatementKind::Insert);
    }

    #[test]
    fn test_insert_unknown_field() {
        let table = table();
        let procedure = TableProcedure::insert(&table);
        let call = ProcedureCall::new(&procedure, vec![json!({ "salary": 1 })]).unwrap();
        let err = call.statement().unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { ref column } if column == "salary"));
    }

    #[test]
    fn test_insert_record_must_be_object() {
        let table = table();
        let procedure = TableProcedure::insert(&table);
        let call = ProcedureCall::new(&procedure, vec![json!([1, "Bob"])]).unwrap();
        assert_eq!(call.statement().unwrap_err().code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_update_call_sql() {
        let table = table();
        let params = UpdateParams::new()
            .set("name", "Bob")
            .filter(Condition::equality().eq("id", 1));
        let procedure = TableProcedure::update(&table, &params).unwrap();

        assert_eq!(procedure.argument_list(), vec!["name", "w_id"]);
        assert_eq!(
            procedure.call_sql(""),
            "UPDATE \"HR\".\"EMP\" SET name=:name WHERE id=:w_id;\n"
        );

        let call = ProcedureCall::new(&procedure, procedure.argument_values()).unwrap();
        let stmt = call.statement().unwrap();
        assert!(stmt.sql.contains("UPDATE \"HR\".\"EMP\" SET name=:name WHERE id=:w_id;"));
        assert_eq!(stmt.binds, vec![json!("Bob"), json!(1)]);
        assert_eq!(stmt.kind, StatementKind::Update);
    }

    #[test]
    fn test_update_without_where() {
        let table = table();
        let params = UpdateParams::new().set("name", "Bob");
        let procedure = TableProcedure::update(&table, &params).unwrap();
        assert_eq!(procedure.call_sql(""), "UPDATE \"HR\".\"EMP\" SET name=:name;\n");
    }

    #[test]
    fn test_update_requires_set_columns() {
        let table = table();
        let params = UpdateParams::new().filter(Condition::equality().eq("id", 1));
        let err = TableProcedure::update(&table, &params).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");

        let params = UpdateParams::try_from(json!({ "where": { "id": 1 } })).unwrap();
        assert!(matches!(
            TableProcedure::update(&table, &params),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_stored_procedure_shares_protocol() {
        let procedure = StoredProcedure::new("HR", "raise_salary")
            .argument("P_ID", ColumnDescriptor::primitive(1, "NUMBER"))
            .argument("p_pct", ColumnDescriptor::primitive(2, "NUMBER"));

        let call = ProcedureCall::new(&procedure, vec![json!(7), json!(10)]).unwrap();
        let stmt = call.statement().unwrap();

        assert_eq!(
            stmt.sql,
            "BEGIN\n\"HR\".\"RAISE_SALARY\"(p_id => :p_id, p_pct => :p_pct);\nEND;\n"
        );
        assert_eq!(stmt.binds, vec![json!(7), json!(10)]);
        assert_eq!(stmt.kind, StatementKind::Call);
    }

    #[test]
    fn test_wrong_argument_count() {
        let procedure = StoredProcedure::new("HR", "p").argument("a", ColumnDescriptor::primitive(1, "NUMBER"));
        assert!(ProcedureCall::new(&procedure, vec![]).is_err());
    }

    #[test]
    fn test_exec_through_session() {
        let table = table();
        let session = MockSession::new("HR");
        let procedure = TableProcedure::insert(&table);

        let affected = ProcedureCall::new(&procedure, vec![json!({ "id": 1 })])
            .unwrap()
            .exec(&session)
            .unwrap();
        assert_eq!(affected, 1);

        let (sql, binds) = session.last_query().unwrap();
        assert!(sql.starts_with("BEGIN\nINSERT INTO"));
        assert_eq!(binds, vec![json!(1), Value::Null, Value::Null]);
    }
}
