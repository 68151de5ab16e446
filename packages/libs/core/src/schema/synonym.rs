//! 시노님 해석
//!
//! 요청한 이름이 현재 스키마의 테이블이 아니면 시노님을 따라 실제 테이블을 찾습니다.
//! 같은 이름의 private 시노님과 public 시노님이 모두 있으면 private 쪽이 우선입니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::session::{Row, Session};

/// 해석된 테이블 위치
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTable {
    /// 실제 테이블 owner
    pub owner: String,

    /// 실제 테이블 이름
    pub table_name: String,

    /// 시노님을 거쳐 찾았는지
    pub via_synonym: bool,
}

/// 시노님 해석기
pub struct SynonymResolver<'a, S: Session + ?Sized> {
    session: &'a S,
    config: &'a CatalogConfig,
}

impl<'a, S: Session + ?Sized> SynonymResolver<'a, S> {
    pub fn new(session: &'a S, config: &'a CatalogConfig) -> Self {
        Self { session, config }
    }

    /// 이름 해석
    ///
    /// 찾지 못하면 `Ok(None)`을 반환합니다.
    pub fn resolve(&self, name: &str) -> Result<Option<ResolvedTable>> {
        let owner = self.session.schema_name();
        let table_name = name.to_uppercase();

        if self.table_exists(owner, &table_name)? {
            tracing::debug!(owner = owner, table_name = %table_name, "resolved table directly");
            return Ok(Some(ResolvedTable {
                owner: owner.to_string(),
                table_name,
                via_synonym: false,
            }));
        }

        match self.find_synonym_target(owner, &table_name)? {
            Some(resolved) => {
                tracing::debug!(
                    synonym = %table_name,
                    owner = %resolved.owner,
                    table_name = %resolved.table_name,
                    "resolved table through synonym"
                );
                Ok(Some(resolved))
            }
            None => {
                tracing::debug!(owner = owner, name = %table_name, "table or synonym not found");
                Ok(None)
            }
        }
    }

    fn table_exists(&self, owner: &str, table_name: &str) -> Result<bool> {
        let sql = format!(
            "SELECT table_name FROM {} \
             WHERE owner = :owner \
             AND table_name = :table_name",
            self.config.dictionary.view("tables")
        );
        let binds = [Value::from(owner), Value::from(table_name)];
        Ok(self.session.select_first(&sql, &binds)?.is_some())
    }

    fn find_synonym_target(&self, owner: &str, synonym_name: &str) -> Result<Option<ResolvedTable>> {
        let public = self.config.public_owner.as_str();
        let sql = format!(
            "SELECT s.owner, t.owner, t.table_name \
             FROM {} s, {} t \
             WHERE s.owner IN (:owner, :public_owner) \
             AND s.synonym_name = :synonym_name \
             AND t.owner = s.table_owner \
             AND t.table_name = s.table_name \
             ORDER BY DECODE(s.owner, :public_owner, 1, 0)",
            self.config.dictionary.view("synonyms"),
            self.config.dictionary.view("tables")
        );
        let binds = [
            Value::from(owner),
            Value::from(public),
            Value::from(synonym_name),
            Value::from(public),
        ];
        let rows = self.session.select_all(&sql, &binds)?;
        pick_synonym(rows, public)
    }
}

/// private 시노님 우선, 같은 순위면 먼저 온 행
///
/// 세 컬럼 중 하나라도 문자열이 아니면 `CatalogRow` 에러입니다.
fn pick_synonym(rows: Vec<Row>, public_owner: &str) -> Result<Option<ResolvedTable>> {
    let mut best: Option<(bool, String, String)> = None;
    for row in rows {
        let synonym_owner = synonym_text(&row, 0, "owner")?;
        let owner = synonym_text(&row, 1, "table_owner")?;
        let table_name = synonym_text(&row, 2, "table_name")?;
        let is_public = synonym_owner == public_owner;
        if best.as_ref().map_or(true, |(best_public, _, _)| *best_public && !is_public) {
            best = Some((is_public, owner, table_name));
        }
    }
    Ok(best.map(|(_, owner, table_name)| ResolvedTable {
        owner,
        table_name,
        via_synonym: true,
    }))
}

fn synonym_text(row: &Row, idx: usize, field: &str) -> Result<String> {
    match row.get(idx) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(Error::CatalogRow {
            message: format!("synonym row has no {}: {:?}", field, other),
        }),
    }
}
