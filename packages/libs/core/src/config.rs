//! 카탈로그 조회 설정

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 조회할 데이터 딕셔너리 뷰 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryScope {
    /// `ALL_*` 뷰 (접근 가능한 객체, 기본값)
    #[default]
    All,

    /// `DBA_*` 뷰 (DB 전체 객체, 권한 필요)
    Dba,
}

impl DictionaryScope {
    /// 문자열에서 파싱
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(DictionaryScope::All),
            "dba" => Some(DictionaryScope::Dba),
            _ => None,
        }
    }

    /// 뷰 이름 prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            DictionaryScope::All => "all",
            DictionaryScope::Dba => "dba",
        }
    }

    /// 딕셔너리 뷰 이름 (`all_tables`, `dba_synonyms` 등)
    pub fn view(&self, name: &str) -> String {
        format!("{}_{}", self.prefix(), name)
    }
}

/// 카탈로그 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 딕셔너리 뷰 범위
    pub dictionary: DictionaryScope,

    /// public 시노님 owner 이름
    pub public_owner: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dictionary: DictionaryScope::default(),
            public_owner: default_public_owner(),
        }
    }
}

fn default_public_owner() -> String {
    "PUBLIC".to_string()
}

impl CatalogConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 키 조회 함수로 설정 로드
    ///
    /// - `ORA_DICTIONARY_SCOPE`: `all` | `dba` (기본 `all`)
    /// - `ORA_PUBLIC_OWNER`: 공백 제거 후 대문자 (비어 있으면 `PUBLIC`)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dictionary = match lookup("ORA_DICTIONARY_SCOPE") {
            Some(raw) => DictionaryScope::from_str(&raw).ok_or_else(|| Error::Config {
                message: format!("ORA_DICTIONARY_SCOPE must be 'all' or 'dba', got {:?}", raw),
            })?,
            None => DictionaryScope::default(),
        };

        let public_owner = lookup("ORA_PUBLIC_OWNER")
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_public_owner);

        Ok(Self {
            dictionary,
            public_owner,
        })
    }
}
