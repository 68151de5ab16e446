//! 조건/갱신 파라미터
//!
//! SELECT/DELETE 조건과 UPDATE의 SET/WHERE 인자를 표현합니다.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ora_core::{Error, Result};

/// ORDER BY를 지정하는 예약 키
pub const ORDER_BY_KEY: &str = "order_by";

/// UPDATE 파라미터에서 WHERE 조건을 지정하는 예약 키
pub const WHERE_KEY: &str = "where";

/// 컬럼 이름 -> 값 (삽입 순서 유지)
pub type EqualityMap = IndexMap<String, Value>;

/// SQL 조건
///
/// # 예시
///
/// ```json
/// "WHERE deptno = :deptno"              // Fragment: 그대로 덧붙임
/// { "id": 5, "order_by": "name" }       // Equality: id = :id ORDER BY name
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// 테이블 이름 뒤에 그대로 붙는 SQL 조각
    Fragment(String),

    /// AND로 묶이는 equality 조건
    Equality(EqualityMap),
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Equality(EqualityMap::new())
    }
}

impl Condition {
    /// 빈 조건 (전체 행)
    ///
    /// 빈 equality 조건이므로 `eq`/`order_by`를 이어 붙일 수 있습니다.
    pub fn none() -> Self {
        Self::default()
    }

    /// SQL 조각 조건
    pub fn fragment(sql: impl Into<String>) -> Self {
        Condition::Fragment(sql.into())
    }

    /// 빈 equality 조건
    pub fn equality() -> Self {
        Condition::Equality(EqualityMap::new())
    }

    /// equality 조건 추가
    ///
    /// `Fragment`에는 붙일 곳이 없으므로 아무 것도 바꾸지 않습니다.
    /// 조각과 equality를 섞으려면 조각 안에 직접 `:name` 바인드를 쓰세요.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Condition::Equality(map) = &mut self {
            map.insert(column.into(), value.into());
        }
        self
    }

    /// ORDER BY 지정 (Equality 전용)
    pub fn order_by(self, expr: impl Into<String>) -> Self {
        self.eq(ORDER_BY_KEY, Value::String(expr.into()))
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::Fragment(sql.to_string())
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Fragment(sql)
    }
}

impl From<EqualityMap> for Condition {
    fn from(map: EqualityMap) -> Self {
        Condition::Equality(map)
    }
}

impl TryFrom<Value> for Condition {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Condition::Fragment(s)),
            Value::Object(obj) => Ok(Condition::Equality(obj.into_iter().collect())),
            other => Err(Error::InvalidConditionType {
                found: json_type_name(&other).to_string(),
            }),
        }
    }
}

/// UPDATE 파라미터
///
/// JSON 객체의 `where` 키는 WHERE 조건으로 분리되고 나머지는 SET 인자가 됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateParams {
    /// SET 컬럼 -> 값
    pub set: EqualityMap,

    /// WHERE 조건
    pub r#where: Option<Condition>,
}

impl UpdateParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// SET 인자 추가
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(column.into(), value.into());
        self
    }

    /// WHERE 조건 지정
    pub fn filter(mut self, condition: impl Into<Condition>) -> Self {
        self.r#where = Some(condition.into());
        self
    }
}

impl TryFrom<Value> for UpdateParams {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(obj) = value else {
            return Err(Error::InvalidArgument {
                message: format!(
                    "only an object can be passed to table update, got {}",
                    json_type_name(&value)
                ),
            });
        };

        let mut set: EqualityMap = obj.into_iter().collect();
        let r#where = set
            .shift_remove(WHERE_KEY)
            .map(Condition::try_from)
            .transpose()?;

        Ok(Self { set, r#where })
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
