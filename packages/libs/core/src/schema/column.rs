//! 컬럼 정의
//!
//! 데이터 딕셔너리(`*_tab_columns`)의 한 행을 컬럼 메타데이터로 변환합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::session::Row;

/// 오브젝트 타입 컬럼의 `data_type` 값
pub const OBJECT_DATA_TYPE: &str = "OBJECT";

/// 컬럼 메타데이터
///
/// 오브젝트 타입 컬럼은 `data_type`이 [`OBJECT_DATA_TYPE`]이고
/// `type_owner`/`type_name`/`sql_type_name`이 채워지며, `data_length`는 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// 컬럼 순서 (1부터 시작)
    pub position: u32,

    /// 딕셔너리 타입 이름 또는 `OBJECT`
    pub data_type: String,

    /// 길이 (오브젝트 타입이면 None)
    #[serde(default)]
    pub data_length: Option<u32>,

    /// 숫자 정밀도
    #[serde(default)]
    pub data_precision: Option<u32>,

    /// 숫자 스케일 (음수 가능)
    #[serde(default)]
    pub data_scale: Option<i32>,

    /// `char_used` 플래그 (가공 없이 전달)
    #[serde(default)]
    pub char_used: Option<String>,

    /// 오브젝트 타입 owner
    #[serde(default)]
    pub type_owner: Option<String>,

    /// 오브젝트 타입 원래 이름
    #[serde(default)]
    pub type_name: Option<String>,

    /// `OWNER.TYPENAME`
    #[serde(default)]
    pub sql_type_name: Option<String>,
}

impl ColumnDescriptor {
    /// 기본 타입 컬럼 생성
    pub fn primitive(position: u32, data_type: impl Into<String>) -> Self {
        Self {
            position,
            data_type: data_type.into(),
            data_length: None,
            data_precision: None,
            data_scale: None,
            char_used: None,
            type_owner: None,
            type_name: None,
            sql_type_name: None,
        }
    }

    /// 오브젝트 타입 컬럼 생성
    pub fn object(position: u32, type_owner: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_owner = type_owner.into();
        let type_name = type_name.into();
        Self {
            position,
            data_type: OBJECT_DATA_TYPE.to_string(),
            data_length: None,
            data_precision: None,
            data_scale: None,
            char_used: None,
            sql_type_name: Some(format!("{}.{}", type_owner, type_name)),
            type_owner: Some(type_owner),
            type_name: Some(type_name),
        }
    }

    /// 길이 지정
    pub fn with_length(mut self, length: u32) -> Self {
        if !self.is_object() {
            self.data_length = Some(length);
        }
        self
    }

    /// 오브젝트 타입 컬럼 여부
    pub fn is_object(&self) -> bool {
        self.sql_type_name.is_some()
    }
}

/// `*_tab_columns` 조회 결과 한 행
///
/// `(column_name, position, data_type, data_length, data_precision,
///   data_scale, char_used, data_type_owner, data_type_mod)`
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogColumnRow {
    pub column_name: String,
    pub position: u32,
    pub data_type: String,
    pub data_length: Option<u32>,
    pub data_precision: Option<u32>,
    pub data_scale: Option<i32>,
    pub char_used: Option<String>,
    pub data_type_owner: Option<String>,
    pub data_type_mod: Option<String>,
}

impl CatalogColumnRow {
    /// 결과 행 파싱
    pub fn from_row(row: &Row) -> Result<Self> {
        let column_name = text_at(row, 0).ok_or_else(|| malformed("column_name is null"))?;
        let position = int_at(row, 1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| malformed(format!("position is missing for column {}", column_name)))?;
        let data_type = text_at(row, 2)
            .ok_or_else(|| malformed(format!("data_type is null for column {}", column_name)))?;

        Ok(Self {
            column_name,
            position,
            data_type,
            data_length: int_at(row, 3).and_then(|n| u32::try_from(n).ok()),
            data_precision: int_at(row, 4).and_then(|n| u32::try_from(n).ok()),
            data_scale: int_at(row, 5).and_then(|n| i32::try_from(n).ok()),
            char_used: text_at(row, 6),
            data_type_owner: text_at(row, 7),
            data_type_mod: text_at(row, 8),
        })
    }

    /// 소문자 컬럼 키
    pub fn key(&self) -> String {
        self.column_name.to_lowercase()
    }

    /// 컬럼 메타데이터로 변환
    ///
    /// 타입 owner가 있으면 오브젝트 타입으로 취급합니다.
    pub fn into_descriptor(self) -> ColumnDescriptor {
        match self.data_type_owner {
            Some(owner) => {
                let mut column = ColumnDescriptor::object(self.position, owner, self.data_type);
                column.data_precision = self.data_precision;
                column.data_scale = self.data_scale;
                column.char_used = self.char_used;
                column
            }
            None => ColumnDescriptor {
                position: self.position,
                data_type: self.data_type,
                data_length: self.data_length,
                data_precision: self.data_precision,
                data_scale: self.data_scale,
                char_used: self.char_used,
                type_owner: None,
                type_name: None,
                sql_type_name: None,
            },
        }
    }
}

fn malformed(message: impl Into<String>) -> Error {
    Error::CatalogRow {
        message: message.into(),
    }
}

fn text_at(row: &Row, idx: usize) -> Option<String> {
    match row.get(idx)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// 드라이버에 따라 NUMBER가 문자열로 올 수 있음
fn int_at(row: &Row, idx: usize) -> Option<i64> {
    match row.get(idx)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
