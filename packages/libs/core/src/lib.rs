//! ora-core: 테이블 메타데이터 공통 라이브러리
//!
//! 데이터 딕셔너리에서 테이블의 컬럼 정의를 읽고, 시노님을 해석하여
//! SQL 빌더(`ora-sql`)가 사용하는 테이블 엔티티를 만듭니다.
//!
//! # 모듈 구조
//!
//! - `schema`: 컬럼 카탈로그, 시노님 해석, 테이블 엔티티
//! - `session`: 실행 계층(DB 연결) 인터페이스
//! - `config`: 카탈로그 조회 설정
//! - `error`: 공통 에러 타입
//! - `testing`: 테스트용 인메모리 세션 (`test-utils` feature)

pub mod config;
pub mod error;
pub mod schema;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{CatalogConfig, DictionaryScope};
pub use error::{Error, Result};
pub use session::{Row, Session, SessionError};
