//! 공통 에러 타입
//!
//! 테이블 메타데이터 조회와 SQL 생성 전반에서 사용되는 에러 타입을 정의합니다.
//! 테이블/시노님을 찾지 못한 경우는 에러가 아니라 `Ok(None)`으로 표현합니다.

use thiserror::Error;

use crate::session::SessionError;

pub type Result<T> = std::result::Result<T, Error>;

/// 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Statement Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("only a string fragment or an object can be used as SQL condition, got {found}")]
    InvalidConditionType { found: String },

    #[error("cannot specify bind variables when passing WHERE conditions as a map")]
    ConflictingBindSpecification,

    #[error("invalid column name {column:?} specified as argument")]
    UnknownColumn { column: String },

    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Catalog Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("malformed catalog row: {message}")]
    CatalogRow { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Config Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("config error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Session Errors (실행 계층 에러는 그대로 전달)
    // ─────────────────────────────────────────────────────────────────────────────
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl Error {
    /// 호출자 입력 오류 여부
    ///
    /// 세션/카탈로그 I/O 오류를 제외한 모든 에러는 호출자 입력 문제입니다.
    pub fn is_caller_fault(&self) -> bool {
        !matches!(self, Error::Session(_) | Error::CatalogRow { .. })
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidConditionType { .. } => "INVALID_CONDITION_TYPE",
            Error::ConflictingBindSpecification => "CONFLICTING_BIND_SPECIFICATION",
            Error::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            Error::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Error::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Error::CatalogRow { .. } => "CATALOG_ROW_ERROR",
            Error::Config { .. } => "CONFIG_ERROR",
            Error::Session(_) => "SESSION_ERROR",
        }
    }
}
