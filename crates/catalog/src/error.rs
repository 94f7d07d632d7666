//! 카탈로그 에러 타입
//!
//! [`CatalogError`]는 카탈로거 실행, 카탈로그 조립, 출력 모델 변환,
//! 스키마 생성 중의 에러를 나타냅니다.
//! `From<CatalogError> for StrataError` 구현으로 상위 에러 타입으로 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **카탈로거**: `CatalogerFailure`, `Parse`
//! - **조립/출력**: `UnsupportedSource`, `Serialization`
//! - **스키마**: `SchemaConflict`
//! - **하위 계층**: `Source`, `Io`, `Config`

use strata_core::error::{ConfigError, SbomError, StrataError};
use strata_source::SourceError;

/// 카탈로그 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 카탈로거 하나의 실행 실패 (실행 전체는 계속됨)
    #[error("cataloger '{cataloger}' failed: {reason}")]
    CatalogerFailure {
        /// 카탈로거 이름
        cataloger: String,
        /// 실패 사유 (에러 또는 패닉 메시지)
        reason: String,
    },

    /// 입력 파일 파싱 실패
    #[error("parse error: {path}: {reason}")]
    Parse {
        /// 파싱 대상 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 출력 모델로 기술할 수 없는 소스 스킴
    #[error("unsupported source scheme: {scheme}")]
    UnsupportedSource {
        /// 스킴 이름
        scheme: String,
    },

    /// 같은 버전의 기존 스키마 파일과 내용이 다름
    #[error("schema conflict: {path} already exists with different content")]
    SchemaConflict {
        /// 기존 스키마 파일 경로
        path: String,
    },

    /// 파일 해석 에러
    #[error(transparent)]
    Source(#[from] SourceError),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 직렬화 실패
    #[error("serialization error: {0}")]
    Serialization(String),

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },
}

impl CatalogError {
    /// 파싱 에러를 생성합니다.
    pub fn parse(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<CatalogError> for StrataError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CatalogerFailure { cataloger, reason } => {
                StrataError::Sbom(SbomError::CatalogerFailed(format!("{cataloger}: {reason}")))
            }
            CatalogError::Parse { path, reason } => {
                StrataError::Sbom(SbomError::ParseFailed(format!("{path}: {reason}")))
            }
            CatalogError::UnsupportedSource { scheme } => {
                StrataError::Sbom(SbomError::UnsupportedSource(scheme))
            }
            CatalogError::SchemaConflict { path } => {
                StrataError::Sbom(SbomError::SchemaConflict(path))
            }
            CatalogError::Source(e) => e.into(),
            CatalogError::Config { field, reason } => {
                StrataError::Config(ConfigError::InvalidValue { field, reason })
            }
            CatalogError::Serialization(msg) => {
                StrataError::Sbom(SbomError::GenerationFailed(msg))
            }
            CatalogError::Io { path, source } => StrataError::Sbom(SbomError::GenerationFailed(
                format!("io error: {path}: {source}"),
            )),
        }
    }
}
