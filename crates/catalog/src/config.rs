//! 카탈로그 실행 설정
//!
//! [`CatalogerConfig`]는 core의 [`StrataConfig`](strata_core::config::StrataConfig)
//! `[catalog]`/`[file]` 섹션에서 파생되며, 카탈로거 선택, 제외 패턴, 동시성,
//! 파일 분석 옵션을 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use strata_catalog::CatalogerConfigBuilder;
//!
//! let config = CatalogerConfigBuilder::new()
//!     .catalogers(vec!["go".to_owned()])
//!     .parallelism(2)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.parallelism, 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CatalogError;
use crate::file::DigestAlgorithm;

/// 설정 상한값 상수
const MAX_PARALLELISM: usize = 64;
const MAX_FILE_SIZE: usize = 1024 * 1024 * 1024; // 1 GB

/// 카탈로그 실행 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogerConfig {
    /// 카탈로거 선택 패턴 (비어 있거나 `all`이면 전부)
    pub catalogers: Vec<String>,
    /// 제외할 실제 경로 glob 패턴
    pub exclude: Vec<String>,
    /// 동시에 실행할 카탈로거 수
    pub parallelism: usize,
    /// 카탈로거가 읽는 파일의 최대 크기 (바이트)
    pub max_file_size: usize,

    // --- 파일 분석 ---
    /// 위치별 파일 메타데이터 수집 여부
    pub file_metadata: bool,
    /// 계산할 다이제스트 알고리즘
    pub digests: Vec<DigestAlgorithm>,
    /// 내용을 기록할 파일 glob 패턴
    pub contents_globs: Vec<String>,
    /// 내용을 기록할 파일의 최대 크기 (바이트)
    pub max_contents_size: usize,
}

impl Default for CatalogerConfig {
    fn default() -> Self {
        Self {
            catalogers: Vec::new(),
            exclude: Vec::new(),
            parallelism: 4,
            max_file_size: 10 * 1024 * 1024, // 10 MB
            file_metadata: true,
            digests: vec![DigestAlgorithm::Sha256],
            contents_globs: Vec::new(),
            max_contents_size: 1024 * 1024, // 1 MB
        }
    }
}

impl CatalogerConfig {
    /// core 설정에서 카탈로그 설정을 생성합니다.
    ///
    /// 알 수 없는 다이제스트 이름은 경고 후 무시합니다.
    pub fn from_core(core: &strata_core::config::StrataConfig) -> Self {
        let digests = core
            .file
            .digests
            .iter()
            .filter_map(|name| {
                let parsed = DigestAlgorithm::from_str_loose(name);
                if parsed.is_none() {
                    warn!(digest = %name, "unknown digest algorithm, ignoring");
                }
                parsed
            })
            .collect();

        Self {
            catalogers: core.catalog.catalogers.clone(),
            exclude: core.catalog.exclude.clone(),
            parallelism: core.catalog.parallelism,
            max_file_size: core.catalog.max_file_size,
            file_metadata: core.file.metadata,
            digests,
            contents_globs: core.file.contents_globs.clone(),
            max_contents_size: core.file.max_contents_size,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `parallelism`: 1-64
    /// - `max_file_size`, `max_contents_size`: 1-1073741824 (1GB)
    /// - `exclude`, `contents_globs`: 올바른 glob 패턴
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.parallelism == 0 || self.parallelism > MAX_PARALLELISM {
            return Err(CatalogError::Config {
                field: "parallelism".to_owned(),
                reason: format!("must be 1-{MAX_PARALLELISM}"),
            });
        }

        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE {
            return Err(CatalogError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            });
        }

        if self.max_contents_size == 0 || self.max_contents_size > MAX_FILE_SIZE {
            return Err(CatalogError::Config {
                field: "max_contents_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            });
        }

        for (field, patterns) in [
            ("exclude", &self.exclude),
            ("contents_globs", &self.contents_globs),
        ] {
            for pattern in patterns {
                if let Err(e) = glob::Pattern::new(pattern) {
                    return Err(CatalogError::Config {
                        field: field.to_owned(),
                        reason: format!("invalid glob '{pattern}': {e}"),
                    });
                }
            }
        }

        Ok(())
    }
}

/// [`CatalogerConfig`] 빌더
#[derive(Default)]
pub struct CatalogerConfigBuilder {
    config: CatalogerConfig,
}

impl CatalogerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 카탈로거 선택 패턴을 설정합니다.
    pub fn catalogers(mut self, patterns: Vec<String>) -> Self {
        self.config.catalogers = patterns;
        self
    }

    /// 제외 패턴을 설정합니다.
    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.config.exclude = patterns;
        self
    }

    /// 동시 실행 수를 설정합니다.
    pub fn parallelism(mut self, n: usize) -> Self {
        self.config.parallelism = n;
        self
    }

    /// 카탈로거 최대 파일 크기를 설정합니다.
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 파일 메타데이터 수집 여부를 설정합니다.
    pub fn file_metadata(mut self, enabled: bool) -> Self {
        self.config.file_metadata = enabled;
        self
    }

    /// 다이제스트 알고리즘을 설정합니다.
    pub fn digests(mut self, algorithms: Vec<DigestAlgorithm>) -> Self {
        self.config.digests = algorithms;
        self
    }

    /// 내용 기록 glob 패턴을 설정합니다.
    pub fn contents_globs(mut self, patterns: Vec<String>) -> Self {
        self.config.contents_globs = patterns;
        self
    }

    /// 내용 기록 최대 크기를 설정합니다.
    pub fn max_contents_size(mut self, size: usize) -> Self {
        self.config.max_contents_size = size;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `CatalogError::Config` 반환
    pub fn build(self) -> Result<CatalogerConfig, CatalogError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        CatalogerConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let mut core = strata_core::config::StrataConfig::default();
        core.catalog.catalogers = vec!["go".to_owned(), "rust".to_owned()];
        core.catalog.exclude = vec!["**/testdata/**".to_owned()];
        core.catalog.parallelism = 8;
        core.file.digests = vec!["sha256".to_owned(), "sha512".to_owned()];
        core.file.metadata = false;

        let config = CatalogerConfig::from_core(&core);
        assert_eq!(config.catalogers, vec!["go", "rust"]);
        assert_eq!(config.exclude, vec!["**/testdata/**"]);
        assert_eq!(config.parallelism, 8);
        assert_eq!(
            config.digests,
            vec![DigestAlgorithm::Sha256, DigestAlgorithm::Sha512]
        );
        assert!(!config.file_metadata);
    }

    #[test]
    fn from_core_drops_unknown_digest() {
        let mut core = strata_core::config::StrataConfig::default();
        core.file.digests = vec!["md5".to_owned(), "SHA256".to_owned()];
        let config = CatalogerConfig::from_core(&core);
        assert_eq!(config.digests, vec![DigestAlgorithm::Sha256]);
    }

    #[test]
    fn validate_rejects_zero_parallelism() {
        let config = CatalogerConfig {
            parallelism: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_excessive_parallelism() {
        let config = CatalogerConfig {
            parallelism: 65,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let config = CatalogerConfig {
            max_file_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_exclude_glob() {
        let config = CatalogerConfig {
            exclude: vec!["[oops".to_owned()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exclude"));
    }

    #[test]
    fn builder_all_setters() {
        let config = CatalogerConfigBuilder::new()
            .catalogers(vec!["javascript".to_owned()])
            .exclude(vec!["**/node_modules/**".to_owned()])
            .parallelism(2)
            .max_file_size(1024)
            .file_metadata(false)
            .digests(vec![DigestAlgorithm::Sha512])
            .contents_globs(vec!["**/*.conf".to_owned()])
            .max_contents_size(512)
            .build()
            .unwrap();

        assert_eq!(config.catalogers, vec!["javascript"]);
        assert_eq!(config.parallelism, 2);
        assert_eq!(config.max_file_size, 1024);
        assert!(!config.file_metadata);
        assert_eq!(config.digests, vec![DigestAlgorithm::Sha512]);
        assert_eq!(config.max_contents_size, 512);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        assert!(CatalogerConfigBuilder::new().parallelism(0).build().is_err());
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = CatalogerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: CatalogerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
