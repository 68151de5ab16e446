//! ora-sql: 메타데이터 기반 SQL 생성 라이브러리
//!
//! `ora-core`의 테이블 메타데이터를 기반으로 바인드 변수를 사용하는
//! SELECT/INSERT/UPDATE/DELETE 문장과 바인드 값 목록을 생성합니다.
//!
//! # 모듈 구조
//!
//! - `params`: 조건(SQL 조각/equality)과 UPDATE 파라미터
//! - `builder`: SELECT/COUNT/DELETE 빌더
//! - `binder`: UPDATE SET/WHERE 인자 바인딩
//! - `procedure`: 프로시저 호출 계약과 테이블 INSERT/UPDATE 어댑터
//! - `client`: 세션을 통한 테이블 CRUD 실행

pub mod binder;
pub mod builder;
pub mod client;
pub mod params;
pub mod procedure;

pub use binder::MutationArgumentBinder;
pub use builder::{Operation, Statement, StatementBuilder, StatementKind};
pub use client::TableClient;
pub use params::{Condition, EqualityMap, UpdateParams};
pub use procedure::{ArgumentMetadata, Invocable, ProcedureCall, StoredProcedure, TableProcedure};
