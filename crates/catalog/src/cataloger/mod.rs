//! 카탈로거 -- 생태계별 패키지 탐지기
//!
//! [`Cataloger`] trait은 모든 탐지기가 구현해야 하는 인터페이스입니다.
//! 카탈로거는 resolver만 받아 패키지와 관계를 돌려주며, 공유 상태를 변경하지 않습니다.
//!
//! # 구현 목록
//!
//! - `go-mod-file-cataloger` -- [`golang::GoModParser`]
//! - `go-module-binary-cataloger` -- [`golang::GoBinaryParser`]
//! - `javascript-lock-cataloger` -- [`javascript::PackageLockParser`]
//! - `javascript-package-cataloger` -- [`javascript::PackageJsonParser`]
//! - `rust-cargo-lock-cataloger` -- [`rust::CargoLockParser`]
//!
//! # 확장
//!
//! 파일 하나를 파싱하는 형식은 [`FileParser`]를 구현하고 [`GenericCataloger`]로 감싸
//! [`CatalogerRegistry`]에 등록합니다.

pub mod generic;
pub mod golang;
pub mod javascript;
pub mod registry;
pub mod rust;

use strata_source::Resolver;

use crate::error::CatalogError;
use crate::pkg::Package;
use crate::relationship::Relationship;

pub use generic::{FileParser, FileSelector, GenericCataloger, dependency_relationships};
pub use registry::{CatalogerRegistry, Scope, select_catalogers};

/// 카탈로거 하나가 찾은 패키지와 관계
pub type CatalogerOutput = (Vec<Package>, Vec<Relationship>);

/// 패키지 탐지기 trait
pub trait Cataloger: Send + Sync {
    /// 카탈로거 이름 (관례상 `-cataloger`로 끝남)
    fn name(&self) -> &str;

    /// resolver에서 패키지와 관계를 찾습니다.
    fn catalog(&self, resolver: &dyn Resolver) -> Result<CatalogerOutput, CatalogError>;
}
