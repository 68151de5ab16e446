//! 테이블 정의
//!
//! 생성 시점에 딕셔너리를 한 번 조회하고 이후에는 변경되지 않습니다.
//! 외부 DDL로 구조가 바뀌어도 갱신하지 않으므로, 필요하면 새로 `find` 해야 합니다.

use serde::{Deserialize, Serialize};

use super::catalog::ColumnCatalog;
use super::column::ColumnDescriptor;
use super::synonym::SynonymResolver;
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::session::Session;

/// 테이블 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    schema_name: String,
    table_name: String,
    columns: ColumnCatalog,
}

impl Table {
    /// 테이블 또는 시노님 이름으로 조회
    ///
    /// 테이블도 시노님도 없으면 `Ok(None)`입니다.
    pub fn find<S: Session + ?Sized>(
        session: &S,
        name: &str,
        config: &CatalogConfig,
    ) -> Result<Option<Self>> {
        match SynonymResolver::new(session, config).resolve(name)? {
            Some(resolved) => {
                let table = Self::load(session, &resolved.owner, &resolved.table_name, config)?;
                Ok(Some(table))
            }
            None => Ok(None),
        }
    }

    /// owner/테이블 이름으로 컬럼 메타데이터 로드
    pub fn load<S: Session + ?Sized>(
        session: &S,
        schema_name: &str,
        table_name: &str,
        config: &CatalogConfig,
    ) -> Result<Self> {
        let table_name = table_name.to_uppercase();
        let columns = ColumnCatalog::load(session, schema_name, &table_name, config)?;
        Ok(Self {
            schema_name: schema_name.to_string(),
            table_name,
            columns,
        })
    }

    /// 이미 알고 있는 메타데이터로 생성
    pub fn from_parts(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        columns: ColumnCatalog,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into().to_uppercase(),
            columns,
        }
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &ColumnCatalog {
        &self.columns
    }

    /// 컬럼 조회
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.get(name)
    }

    /// `"SCHEMA"."TABLE"`
    pub fn quoted_name(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema_name, self.table_name)
    }
}
