//! 메트릭 이름 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다. 익스포터 설치는 호출자의 몫입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `strata_`
//! - 접미어: `_total` (counter), `_seconds` (histogram), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(strata_core::metrics::CATALOGER_FAILURES_TOTAL,
//!     strata_core::metrics::LABEL_CATALOGER => "go-mod-file-cataloger").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 카탈로거 이름 레이블 키
pub const LABEL_CATALOGER: &str = "cataloger";

/// 결과 레이블 키 (success, failure, panic)
pub const LABEL_RESULT: &str = "result";

// ─── 카탈로그 메트릭 ──────────────────────────────────────────────

/// 카탈로그에 추가 요청된 패키지 수 (counter)
pub const CATALOG_PACKAGES_ADDED_TOTAL: &str = "strata_catalog_packages_added_total";

/// 기존 항목과 병합된 패키지 관찰 수 (counter)
pub const CATALOG_PACKAGES_MERGED_TOTAL: &str = "strata_catalog_packages_merged_total";

/// 최종 카탈로그의 고유 패키지 수 (gauge)
pub const CATALOG_PACKAGES: &str = "strata_catalog_packages";

// ─── 카탈로거 메트릭 ──────────────────────────────────────────────

/// 실행된 카탈로거 수 (counter, label: cataloger, result)
pub const CATALOGER_RUNS_TOTAL: &str = "strata_cataloger_runs_total";

/// 실패한 카탈로거 수 (counter, label: cataloger)
pub const CATALOGER_FAILURES_TOTAL: &str = "strata_cataloger_failures_total";

/// 카탈로거 실행 시간 (histogram, 초, label: cataloger)
pub const CATALOGER_DURATION_SECONDS: &str = "strata_cataloger_duration_seconds";

// ─── 파일 분석 메트릭 ─────────────────────────────────────────────

/// 인덱싱된 파일 수 (counter)
pub const SOURCE_FILES_INDEXED_TOTAL: &str = "strata_source_files_indexed_total";

/// 다이제스트를 계산한 파일 수 (counter)
pub const FILE_DIGESTS_TOTAL: &str = "strata_file_digests_total";
