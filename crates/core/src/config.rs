//! 설정 관리 -- strata.toml 파싱 및 런타임 설정
//!
//! [`StrataConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`STRATA_CATALOG_PARALLELISM=8` 형식)
//! 3. 설정 파일 (`strata.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), strata_core::error::StrataError> {
//! use strata_core::config::StrataConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = StrataConfig::load("strata.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = StrataConfig::parse("[catalog]\ncatalogers = [\"go\"]")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, StrataError};

/// 지원하는 다이제스트 알고리즘
pub const SUPPORTED_DIGESTS: &[&str] = &["sha256", "sha512"];

/// 동시 실행 카탈로거 상한
const MAX_PARALLELISM: usize = 64;

/// strata 통합 설정
///
/// `strata.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 패키지 카탈로깅 설정
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// 파일 분석 설정
    #[serde(default)]
    pub file: FileConfig,
}

impl StrataConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StrataError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값을 사용하고, 있으면 [`load`](Self::load)와 같이 동작합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, StrataError> {
        match Self::load(path.as_ref()).await {
            Err(StrataError::Config(ConfigError::FileNotFound { path })) => {
                tracing::debug!(path = %path, "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, StrataError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StrataError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                StrataError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, StrataError> {
        toml::from_str(toml_str).map_err(|e| {
            StrataError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `STRATA_{SECTION}_{FIELD}`
    /// 예: `STRATA_CATALOG_CATALOGERS=go,rust`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "STRATA_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "STRATA_GENERAL_LOG_FORMAT");

        // Catalog
        override_csv(&mut self.catalog.catalogers, "STRATA_CATALOG_CATALOGERS");
        override_csv(&mut self.catalog.exclude, "STRATA_CATALOG_EXCLUDE");
        override_usize(
            &mut self.catalog.parallelism,
            "STRATA_CATALOG_PARALLELISM",
        );
        override_usize(
            &mut self.catalog.max_file_size,
            "STRATA_CATALOG_MAX_FILE_SIZE",
        );

        // File
        override_bool(&mut self.file.metadata, "STRATA_FILE_METADATA");
        override_csv(&mut self.file.digests, "STRATA_FILE_DIGESTS");
        override_csv(&mut self.file.contents_globs, "STRATA_FILE_CONTENTS_GLOBS");
        override_usize(
            &mut self.file.max_contents_size,
            "STRATA_FILE_MAX_CONTENTS_SIZE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), StrataError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.catalog.parallelism == 0 || self.catalog.parallelism > MAX_PARALLELISM {
            return Err(ConfigError::InvalidValue {
                field: "catalog.parallelism".to_owned(),
                reason: format!("must be 1-{MAX_PARALLELISM}"),
            }
            .into());
        }

        if self.catalog.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.max_file_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        for pattern in &self.catalog.exclude {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(ConfigError::InvalidValue {
                    field: "catalog.exclude".to_owned(),
                    reason: format!("invalid glob '{pattern}': {e}"),
                }
                .into());
            }
        }

        for digest in &self.file.digests {
            if !SUPPORTED_DIGESTS.contains(&digest.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "file.digests".to_owned(),
                    reason: format!(
                        "unknown algorithm '{digest}', expected one of: {}",
                        SUPPORTED_DIGESTS.join(", ")
                    ),
                }
                .into());
            }
        }

        for pattern in &self.file.contents_globs {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(ConfigError::InvalidValue {
                    field: "file.contents_globs".to_owned(),
                    reason: format!("invalid glob '{pattern}': {e}"),
                }
                .into());
            }
        }

        if self.file.max_contents_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "file.max_contents_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 패키지 카탈로깅 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 카탈로거 선택 패턴 (비어 있거나 "all"이면 전체)
    pub catalogers: Vec<String>,
    /// 제외할 경로 glob 패턴
    pub exclude: Vec<String>,
    /// 동시에 실행할 카탈로거 수
    pub parallelism: usize,
    /// 카탈로거가 읽을 파일의 최대 크기 (바이트)
    pub max_file_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalogers: Vec::new(),
            exclude: Vec::new(),
            parallelism: 4,
            max_file_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// 파일 분석 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// 위치별 파일 메타데이터 수집 여부
    pub metadata: bool,
    /// 계산할 다이제스트 알고리즘
    pub digests: Vec<String>,
    /// 내용을 수집할 파일 glob 패턴
    pub contents_globs: Vec<String>,
    /// 내용 수집 최대 크기 (바이트)
    pub max_contents_size: usize,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            metadata: true,
            digests: vec!["sha256".to_owned()],
            contents_globs: Vec::new(),
            max_contents_size: 1024 * 1024, // 1 MB
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
