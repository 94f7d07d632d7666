//! strata.toml 통합 설정 테스트
//!
//! - strata.toml.example 파싱 테스트
//! - 환경변수 우선순위 테스트
//! - 파일 로딩 에러 테스트

use std::io::Write;

use strata_core::config::StrataConfig;
use strata_core::error::{ConfigError, StrataError};

// =============================================================================
// strata.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../strata.toml.example");
    let config = StrataConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.catalog.exclude, vec!["**/testdata/**"]);
    assert_eq!(config.file.max_contents_size, 1_048_576);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../strata.toml.example");
    let config = StrataConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[catalog]
parallelism = 2
"#;

    let original = std::env::var("STRATA_CATALOG_PARALLELISM").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("STRATA_CATALOG_PARALLELISM", "8");
    }

    let mut config = StrataConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.catalog.parallelism;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("STRATA_CATALOG_PARALLELISM", val),
            None => std::env::remove_var("STRATA_CATALOG_PARALLELISM"),
        }
    }

    assert_eq!(result, 8);
}

#[test]
#[serial_test::serial]
fn env_override_csv_for_cataloger_patterns() {
    let original = std::env::var("STRATA_CATALOG_CATALOGERS").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("STRATA_CATALOG_CATALOGERS", "go, javascript-lock");
    }

    let mut config = StrataConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.catalog.catalogers.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("STRATA_CATALOG_CATALOGERS", val),
            None => std::env::remove_var("STRATA_CATALOG_CATALOGERS"),
        }
    }

    assert_eq!(result, vec!["go", "javascript-lock"]);
}

#[test]
#[serial_test::serial]
fn invalid_env_value_keeps_file_value() {
    let original = std::env::var("STRATA_FILE_METADATA").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("STRATA_FILE_METADATA", "maybe");
    }

    let mut config = StrataConfig::parse("[file]\nmetadata = false").expect("should parse");
    config.apply_env_overrides();
    let result = config.file.metadata;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("STRATA_FILE_METADATA", val),
            None => std::env::remove_var("STRATA_FILE_METADATA"),
        }
    }

    assert!(!result);
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn load_reads_file_and_validates() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[catalog]\ncatalogers = [\"rust\"]\nparallelism = 3").expect("write");

    let config = StrataConfig::load(file.path()).await.expect("should load");
    assert_eq!(config.catalog.catalogers, vec!["rust"]);
    assert_eq!(config.catalog.parallelism, 3);
}

#[tokio::test]
async fn load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[file]\ndigests = [\"crc32\"]").expect("write");

    let err = StrataConfig::from_file(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        StrataError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn load_missing_file_reports_path() {
    let err = StrataConfig::load("/definitely/not/here/strata.toml")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here/strata.toml"));
}
