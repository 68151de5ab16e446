//! 실행 계층(세션) 인터페이스
//!
//! 실제 DB 연결, 커서 실행, 커넥션 풀은 이 크레이트의 범위 밖입니다.
//! 이 모듈은 메타데이터 조회와 생성된 SQL 실행에 필요한 최소 계약만 정의합니다.
//!
//! 모든 메서드는 `:name` 형태의 바인드 변수를 포함한 SQL과,
//! 플레이스홀더가 생성된 순서대로 정렬된 바인드 값 목록을 받습니다.

use serde_json::Value;

/// 결과 행 (컬럼 순서대로의 값 튜플)
pub type Row = Vec<Value>;

/// 실행 계층 에러
///
/// 드라이버 고유의 에러를 감싸지 않고 그대로 전달합니다.
pub type SessionError = Box<dyn std::error::Error + Send + Sync>;

/// 실행 계층 계약
pub trait Session {
    /// 현재 세션의 스키마(owner) 이름
    fn schema_name(&self) -> &str;

    /// 첫 번째 행 조회 (없으면 None)
    fn select_first(&self, sql: &str, binds: &[Value]) -> Result<Option<Row>, SessionError>;

    /// 모든 행 조회
    fn select_all(&self, sql: &str, binds: &[Value]) -> Result<Vec<Row>, SessionError>;

    /// 첫 번째 행의 첫 번째 값 조회
    fn select_one(&self, sql: &str, binds: &[Value]) -> Result<Option<Value>, SessionError> {
        Ok(self
            .select_first(sql, binds)?
            .and_then(|row| row.into_iter().next()))
    }

    /// DML/PL/SQL 블록 실행, 영향받은 행 수 반환
    fn execute(&self, sql: &str, binds: &[Value]) -> Result<u64, SessionError>;
}

impl<S: Session + ?Sized> Session for &S {
    fn schema_name(&self) -> &str {
        (**self).schema_name()
    }

    fn select_first(&self, sql: &str, binds: &[Value]) -> Result<Option<Row>, SessionError> {
        (**self).select_first(sql, binds)
    }

    fn select_all(&self, sql: &str, binds: &[Value]) -> Result<Vec<Row>, SessionError> {
        (**self).select_all(sql, binds)
    }

    fn select_one(&self, sql: &str, binds: &[Value]) -> Result<Option<Value>, SessionError> {
        (**self).select_one(sql, binds)
    }

    fn execute(&self, sql: &str, binds: &[Value]) -> Result<u64, SessionError> {
        (**self).execute(sql, binds)
    }
}
