//! UPDATE 인자 바인딩
//!
//! SET/WHERE 인자를 컬럼 카탈로그와 대조하여 검증하고,
//! `col=:col` / `col=:w_col` 절과 바인드 값 목록을 만듭니다.
//! 바인드 값 순서는 SET 값 전체 다음에 WHERE 값이며, SQL의 플레이스홀더 순서와 같습니다.

use indexmap::IndexMap;
use serde_json::Value;

use ora_core::schema::{ColumnDescriptor, Table};
use ora_core::{Error, Result};

use crate::params::{Condition, EqualityMap};

/// WHERE 쪽 바인드 이름 prefix (같은 컬럼의 SET 바인드와 충돌 방지)
pub const WHERE_BIND_PREFIX: &str = "w_";

/// UPDATE 인자 바인더
#[derive(Debug, Clone)]
pub struct MutationArgumentBinder<'a> {
    table: &'a Table,
    arguments: IndexMap<String, ColumnDescriptor>,
    set_clauses: Vec<String>,
    set_values: Vec<Value>,
    where_clauses: Vec<String>,
    where_values: Vec<Value>,
}

impl<'a> MutationArgumentBinder<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            arguments: IndexMap::new(),
            set_clauses: Vec::new(),
            set_values: Vec::new(),
            where_clauses: Vec::new(),
            where_values: Vec::new(),
        }
    }

    /// SET/WHERE 인자를 한 번에 바인딩
    pub fn bind(table: &'a Table, set: &EqualityMap, r#where: Option<&Condition>) -> Result<Self> {
        let mut binder = Self::new(table);
        binder.add_set_arguments(set)?;
        if let Some(condition) = r#where {
            binder.add_where_arguments(condition)?;
        }
        Ok(binder)
    }

    /// SET 인자 추가
    pub fn add_set_arguments(&mut self, set: &EqualityMap) -> Result<()> {
        for (column, value) in set {
            let metadata = self.column(column)?;
            if self.arguments.contains_key(column) {
                return Err(Error::InvalidArgument {
                    message: format!("bind name {} is already in use", column),
                });
            }
            self.arguments.insert(column.clone(), metadata);
            self.set_clauses.push(format!("{}=:{}", column, column));
            self.set_values.push(value.clone());
        }
        Ok(())
    }

    /// WHERE 인자 추가
    ///
    /// SQL 조각은 바인드 값 없이 그대로 WHERE 절에 붙습니다.
    pub fn add_where_arguments(&mut self, condition: &Condition) -> Result<()> {
        match condition {
            Condition::Equality(map) => {
                for (column, value) in map {
                    let metadata = self.column(column)?;
                    let bind_name = self.where_bind_name(column);
                    self.where_clauses.push(format!("{}=:{}", column, bind_name));
                    self.arguments.insert(bind_name, metadata);
                    self.where_values.push(value.clone());
                }
            }
            Condition::Fragment(fragment) => {
                if !fragment.trim().is_empty() {
                    self.where_clauses.push(fragment.clone());
                }
            }
        }
        Ok(())
    }

    /// `w_column`, 이미 쓰인 이름이면 접두사를 더 붙임 (SET 컬럼 `w_id` + WHERE `id`)
    fn where_bind_name(&self, column: &str) -> String {
        let mut bind_name = format!("{}{}", WHERE_BIND_PREFIX, column);
        while self.arguments.contains_key(&bind_name) {
            bind_name.insert_str(0, WHERE_BIND_PREFIX);
        }
        bind_name
    }

    fn column(&self, name: &str) -> Result<ColumnDescriptor> {
        self.table
            .column(name)
            .cloned()
            .ok_or_else(|| Error::UnknownColumn {
                column: name.to_string(),
            })
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// 바인드 이름 목록 (SET 다음 WHERE)
    pub fn argument_list(&self) -> impl Iterator<Item = &str> {
        self.arguments.keys().map(|s| s.as_str())
    }

    /// 바인드 이름 -> 컬럼 메타데이터
    pub fn arguments(&self) -> &IndexMap<String, ColumnDescriptor> {
        &self.arguments
    }

    /// `a=:a, b=:b`
    pub fn set_clause(&self) -> String {
        self.set_clauses.join(", ")
    }

    /// `c=:w_c AND ...` (없으면 None)
    pub fn where_clause(&self) -> Option<String> {
        if self.where_clauses.is_empty() {
            None
        } else {
            Some(self.where_clauses.join(" AND "))
        }
    }

    /// 바인드 값 (SET 다음 WHERE)
    pub fn values(&self) -> Vec<Value> {
        self.set_values
            .iter()
            .chain(self.where_values.iter())
            .cloned()
            .collect()
    }
}
