//! 패키지 모델
//!
//! - [`Package`]: 발견된 소프트웨어 단위와 결정적 ID
//! - [`Catalog`]: 중복 제거 누적기
//! - [`Metadata`]: 생태계별 메타데이터의 닫힌 집합
//! - [`Purl`]: Package URL 생성

pub mod catalog;
pub mod metadata;
pub mod package;
pub mod purl;
pub mod types;

pub use catalog::Catalog;
pub use metadata::{Metadata, MetadataType};
pub use package::Package;
pub use purl::Purl;
pub use types::{Language, PackageType};
