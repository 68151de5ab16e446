//! 테이블 메타데이터
//!
//! # 개요
//!
//! 데이터 딕셔너리(`ALL_*`/`DBA_*` 뷰)를 조회하여 테이블의 컬럼 정의를 만듭니다.
//! 요청한 이름이 테이블이 아니면 시노님을 따라 실제 테이블을 찾습니다.
//!
//! # 모듈 구조
//!
//! - `column`: 컬럼 메타데이터와 딕셔너리 행 변환
//! - `catalog`: 순서가 보존되는 컬럼 카탈로그
//! - `synonym`: 시노님 해석 (private 우선)
//! - `table`: 테이블 엔티티

mod catalog;
mod column;
mod synonym;
mod table;

pub use catalog::ColumnCatalog;
pub use column::{CatalogColumnRow, ColumnDescriptor, OBJECT_DATA_TYPE};
pub use synonym::{ResolvedTable, SynonymResolver};
pub use table::Table;
