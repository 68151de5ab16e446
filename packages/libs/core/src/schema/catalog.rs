//! 컬럼 카탈로그
//!
//! 테이블의 컬럼 메타데이터를 딕셔너리 순서(column_id)대로 보관합니다.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::column::{CatalogColumnRow, ColumnDescriptor};
use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::session::Session;

/// 컬럼 카탈로그 (소문자 컬럼 이름 -> 메타데이터)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnCatalog(IndexMap<String, ColumnDescriptor>);

impl ColumnCatalog {
    /// 빈 카탈로그
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// 컬럼 추가
    ///
    /// position은 이전 컬럼보다 커야 합니다.
    pub fn push(&mut self, name: impl Into<String>, column: ColumnDescriptor) -> Result<()> {
        let name = name.into().to_lowercase();
        if let Some((_, last)) = self.0.last() {
            if column.position <= last.position {
                return Err(Error::CatalogRow {
                    message: format!(
                        "column {} has position {} after position {}",
                        name, column.position, last.position
                    ),
                });
            }
        }
        if self.0.contains_key(&name) {
            return Err(Error::CatalogRow {
                message: format!("duplicate column {}", name),
            });
        }
        self.0.insert(name, column);
        Ok(())
    }

    /// 딕셔너리에서 컬럼 목록 로드
    pub fn load<S: Session + ?Sized>(
        session: &S,
        owner: &str,
        table_name: &str,
        config: &CatalogConfig,
    ) -> Result<Self> {
        let sql = format!(
            "SELECT column_name, column_id position, \
             data_type, data_length, data_precision, data_scale, char_used, \
             data_type_owner, data_type_mod \
             FROM {} \
             WHERE owner = :owner \
             AND table_name = :table_name \
             ORDER BY column_id",
            config.dictionary.view("tab_columns")
        );
        let binds = [Value::from(owner), Value::from(table_name)];

        let mut catalog = Self::new();
        for row in session.select_all(&sql, &binds)? {
            let parsed = CatalogColumnRow::from_row(&row)?;
            let key = parsed.key();
            catalog.push(key, parsed.into_descriptor())?;
        }

        tracing::debug!(
            owner = owner,
            table_name = table_name,
            columns = catalog.len(),
            "loaded column catalog"
        );
        Ok(catalog)
    }

    /// 컬럼 조회
    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.0.get(name)
    }

    /// 컬럼 존재 여부
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// 컬럼 이름 (순서대로)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|s| s.as_str())
    }

    /// (이름, 메타데이터) 순회
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnDescriptor)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DictionaryScope;
    use crate::testing::MockSession;
    use serde_json::json;

    #[test]
    fn test_push_keeps_order_and_lowercases() {
        let mut catalog = ColumnCatalog::new();
        catalog.push("ID", ColumnDescriptor::primitive(1, "NUMBER")).unwrap();
        catalog.push("Name", ColumnDescriptor::primitive(2, "VARCHAR2")).unwrap();

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(catalog.contains("name"));
        assert!(!catalog.contains("Name"));
    }

    #[test]
    fn test_push_rejects_non_increasing_position() {
        let mut catalog = ColumnCatalog::new();
        catalog.push("id", ColumnDescriptor::primitive(2, "NUMBER")).unwrap();
        assert!(catalog.push("name", ColumnDescriptor::primitive(2, "VARCHAR2")).is_err());
        assert!(catalog.push("id", ColumnDescriptor::primitive(3, "NUMBER")).is_err());
    }

    #[test]
    fn test_load_from_session() {
        let session = MockSession::new("HR")
            .with_column("HR", "EMP", json!(["ID", 1, "NUMBER", 22, 10, 0, null, null, null]))
            .with_column("HR", "EMP", json!(["NAME", 2, "VARCHAR2", 50, null, null, "B", null, null]))
            .with_column("HR", "EMP", json!(["ADDR", 3, "T_ADDRESS", 1, null, null, null, "COMMON", null]));

        let catalog = ColumnCatalog::load(&session, "HR", "EMP", &CatalogConfig::default()).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["id", "name", "addr"]);

        let mut last = 0;
        for (_, column) in catalog.iter() {
            assert!(column.position > last);
            last = column.position;
            assert!(!(column.sql_type_name.is_some() && column.data_length.is_some()));
        }
        assert_eq!(catalog.get("addr").unwrap().sql_type_name.as_deref(), Some("COMMON.T_ADDRESS"));

        let (sql, binds) = session.last_query().unwrap();
        assert!(sql.contains("FROM all_tab_columns"));
        assert_eq!(binds, vec![json!("HR"), json!("EMP")]);
    }

    #[test]
    fn test_load_unknown_table_is_empty() {
        let session = MockSession::new("HR");
        let catalog = ColumnCatalog::load(&session, "HR", "NOPE", &CatalogConfig::default()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_dba_scope_queries_dba_view() {
        let session = MockSession::new("HR")
            .with_column("HR", "EMP", json!(["ID", 1, "NUMBER", 22, null, null, null, null, null]));
        let config = CatalogConfig {
            dictionary: DictionaryScope::Dba,
            ..Default::default()
        };

        let catalog = ColumnCatalog::load(&session, "HR", "EMP", &config).unwrap();
        assert_eq!(catalog.len(), 1);
        let (sql, _) = session.last_query().unwrap();
        assert!(sql.contains("FROM dba_tab_columns"));
        assert!(!sql.contains("all_tab_columns"));
    }
}
