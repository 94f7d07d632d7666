//! 에러 타입 -- 도메인별 에러 정의
//!
//! 라이브러리 크레이트는 각자 세분화된 에러 타입을 가지며,
//! `From` 구현을 통해 여기 정의된 거친(coarse) 에러로 변환됩니다.

/// strata 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum StrataError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파일 해석(resolver) 에러
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// 카탈로그 / SBOM 조립 에러
    #[error("sbom error: {0}")]
    Sbom(#[from] SbomError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파일 해석 에러
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// 경로 또는 위치가 현재 뷰에서 해석되지 않음
    #[error("not found: {0}")]
    NotFound(String),

    /// 잘못된 검색 패턴
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// 소스 자체를 읽을 수 없음
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// 카탈로그 / SBOM 조립 에러
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
    /// 단일 카탈로거 실행 실패
    #[error("cataloger failed: {0}")]
    CatalogerFailed(String),

    /// 기술할 수 없는 소스 스킴
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// 같은 버전의 기존 스키마와 내용이 다름
    #[error("schema conflict: {0}")]
    SchemaConflict(String),

    /// 입력 파싱 실패
    #[error("parse failed: {0}")]
    ParseFailed(String),

    /// 그 외 생성 실패
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}
