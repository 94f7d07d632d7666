//! 파일 해석 에러 타입
//!
//! [`SourceError`]는 resolver와 소스 인덱싱 과정의 에러를 나타냅니다.
//! `From<SourceError> for StrataError` 구현으로 `?` 연산자를 통해
//! 상위 에러 타입으로 전파됩니다.

use strata_core::error::{ResolveError, StrataError};

/// 파일 해석 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 위치나 경로가 현재 (제외 필터가 적용된) 뷰에서 해석되지 않음
    #[error("not found: {path}")]
    NotFound {
        /// 요청된 경로
        path: String,
    },

    /// 잘못된 glob 패턴
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// 요청된 패턴
        pattern: String,
        /// 실패 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 지원하지 않는 소스 입력
    #[error("unsupported source: {0}")]
    Unsupported(String),
}

impl SourceError {
    /// `NotFound` 에러를 생성합니다.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// 존재하지 않음을 나타내는 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<SourceError> for StrataError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound { path } => StrataError::Resolve(ResolveError::NotFound(path)),
            SourceError::InvalidPattern { pattern, reason } => StrataError::Resolve(
                ResolveError::InvalidPattern(format!("{pattern}: {reason}")),
            ),
            SourceError::Io { path, source } => {
                StrataError::Resolve(ResolveError::Unavailable(format!("{path}: {source}")))
            }
            SourceError::Unsupported(msg) => StrataError::Resolve(ResolveError::Unavailable(msg)),
        }
    }
}
