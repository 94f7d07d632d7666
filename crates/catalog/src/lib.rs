#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 타입 (`CatalogError`)
//! - [`config`]: 카탈로그 실행 설정 (`CatalogerConfig`, builder)
//! - [`pkg`]: 패키지 모델, 메타데이터, PURL, 중복 제거 카탈로그
//! - [`relationship`]: 관계 간선과 결정적 정렬
//! - [`cataloger`]: `Cataloger` trait, 범용 파일 카탈로거, 생태계별 파서, 레지스트리/선택
//! - [`orchestrator`]: 카탈로거 병렬 실행과 실패 격리 (`run_catalogers`)
//! - [`file`]: 파일 메타데이터/다이제스트/내용 카탈로거
//! - [`sbom`]: SBOM 집계 (`Sbom`, `Descriptor`)
//! - [`format`]: JSON 문서 모델 변환 (`to_format_model`)
//! - [`schema`]: 문서 JSON Schema 생성
//! - [`scanner`]: 전체 스캔 흐름 (`Scanner`, `ScannerBuilder`)

pub mod cataloger;
pub mod config;
pub mod error;
pub mod file;
pub mod format;
pub mod orchestrator;
pub mod pkg;
pub mod relationship;
pub mod sbom;
pub mod scanner;
pub mod schema;

// --- Public API Re-exports ---

// Scanner (main entry point)
pub use scanner::{ScanOutput, Scanner, ScannerBuilder};

// Configuration
pub use config::{CatalogerConfig, CatalogerConfigBuilder};

// Error
pub use error::CatalogError;

// Package model
pub use pkg::{Catalog, Language, Metadata, MetadataType, Package, PackageType, Purl};

// Relationships
pub use relationship::{Relationship, RelationshipType};

// Catalogers
pub use cataloger::{Cataloger, CatalogerOutput, CatalogerRegistry, Scope, select_catalogers};
pub use orchestrator::{CatalogRun, CatalogerFailure, run_catalogers};

// SBOM & output
pub use format::{JSON_SCHEMA_VERSION, to_format_model, to_source_model};
pub use sbom::{Descriptor, FileArtifacts, Sbom};
